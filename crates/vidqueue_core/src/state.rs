use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::delivery::is_deliverable;
use crate::view_model::{
    paginate, AppViewModel, JobRowView, QueueStats, NO_DIRECTORY_LABEL,
};
use crate::{
    DeliveredSet, DeliveryOutcome, DeliveryRequest, DirectoryHandle, Effect, JobId, Snapshot,
};

pub const PAGE_SIZES: [usize; 4] = [25, 50, 100, 200];
pub const DEFAULT_ROWS_PER_PAGE: usize = 50;

/// One-shot message for the user; cleared once rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Input was rejected before any request was made.
    Validation(String),
    /// A platform capability misbehaved.
    Advisory(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Validation(text) | Notice::Advisory(text) => text,
        }
    }
}

/// Everything one session knows. Created at session start, dropped at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    snapshot: Snapshot,
    delivered: DeliveredSet,
    outcomes: BTreeMap<JobId, DeliveryOutcome>,
    directory: Option<DirectoryHandle>,
    link_input: String,
    batch_file: Option<PathBuf>,
    page: usize,
    rows_per_page: usize,
    poll_in_flight: bool,
    notice: Option<Notice>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            snapshot: Snapshot::default(),
            delivered: DeliveredSet::new(),
            outcomes: BTreeMap::new(),
            directory: None,
            link_input: String::new(),
            batch_file: None,
            page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            poll_in_flight: false,
            notice: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a configured page size; unsupported sizes keep the default.
    pub fn with_rows_per_page(rows_per_page: usize) -> Self {
        let mut state = Self::default();
        if PAGE_SIZES.contains(&rows_per_page) {
            state.rows_per_page = rows_per_page;
        }
        state
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn delivered(&self) -> &DeliveredSet {
        &self.delivered
    }

    pub fn directory(&self) -> Option<&DirectoryHandle> {
        self.directory.as_ref()
    }

    pub fn link_input(&self) -> &str {
        &self.link_input
    }

    pub fn batch_file(&self) -> Option<&Path> {
        self.batch_file.as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn poll_in_flight(&self) -> bool {
        self.poll_in_flight
    }

    pub fn outcome(&self, job_id: JobId) -> Option<&DeliveryOutcome> {
        self.outcomes.get(&job_id)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let page = paginate(self.snapshot.queue.len(), self.page, self.rows_per_page);
        let rows = self
            .snapshot
            .queue
            .iter()
            .skip(page.offset())
            .take(self.rows_per_page)
            .map(|job| JobRowView::from_job(job, self.outcomes.get(&job.id).cloned()))
            .collect();

        AppViewModel {
            stats: QueueStats::from_snapshot(&self.snapshot),
            rows,
            page,
            directory_label: self
                .directory
                .as_ref()
                .map(|dir| dir.name())
                .unwrap_or_else(|| NO_DIRECTORY_LABEL.to_string()),
            has_directory: self.directory.is_some(),
            link_input: self.link_input.clone(),
            batch_file: self
                .batch_file
                .as_ref()
                .map(|path| path.display().to_string()),
            notice: self.notice.clone(),
            delivered_count: self.delivered.len(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns `true` if a read may start now; at most one is outstanding.
    pub(crate) fn begin_poll(&mut self) -> bool {
        if self.poll_in_flight {
            return false;
        }
        self.poll_in_flight = true;
        true
    }

    pub(crate) fn finish_poll(&mut self) {
        self.poll_in_flight = false;
    }

    /// Replace the whole snapshot and claim every newly deliverable job.
    pub(crate) fn replace_snapshot(&mut self, snapshot: Snapshot) -> Vec<Effect> {
        if self.snapshot != snapshot {
            self.snapshot = snapshot;
            self.mark_dirty();
        }
        self.claim_deliveries()
    }

    /// Claims happen here, before any effect runs, so a snapshot that arrives
    /// mid-delivery cannot trigger a second attempt.
    pub(crate) fn claim_deliveries(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        for job in self.snapshot.queue.iter().filter(|job| is_deliverable(job)) {
            if !self.delivered.claim(job.id) {
                continue;
            }
            let Some(filename) = job.filename.clone() else {
                continue;
            };
            effects.push(Effect::Deliver(DeliveryRequest {
                job_id: job.id,
                filename,
                directory: self.directory.clone(),
            }));
        }
        if !effects.is_empty() {
            self.mark_dirty();
        }
        effects
    }

    pub(crate) fn record_outcome(&mut self, job_id: JobId, outcome: DeliveryOutcome) {
        self.outcomes.insert(job_id, outcome);
        self.mark_dirty();
    }

    pub(crate) fn set_directory(&mut self, directory: Option<DirectoryHandle>) {
        self.directory = directory;
        self.mark_dirty();
    }

    pub(crate) fn set_link_input(&mut self, text: String) {
        self.link_input = text;
        self.mark_dirty();
    }

    pub(crate) fn set_batch_file(&mut self, path: Option<PathBuf>) {
        self.batch_file = path;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn total_pages(&self) -> usize {
        paginate(self.snapshot.queue.len(), self.page, self.rows_per_page).total_pages
    }

    pub(crate) fn select_page(&mut self, page: usize) {
        let page = page.clamp(1, self.total_pages());
        if page != self.page {
            self.page = page;
            self.mark_dirty();
        }
    }

    pub(crate) fn select_rows_per_page(&mut self, rows_per_page: usize) -> bool {
        if !PAGE_SIZES.contains(&rows_per_page) {
            return false;
        }
        self.rows_per_page = rows_per_page;
        self.page = 1;
        self.mark_dirty();
        true
    }
}
