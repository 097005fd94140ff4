use crate::platform::{detect_platform, Platform};
use crate::state::Notice;
use crate::{DeliveryOutcome, Job, JobId, JobStatus, Snapshot};

pub const NO_DIRECTORY_LABEL: &str = "No folder selected (will use browser default)";
pub const UNKNOWN_STATUS_LABEL: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub stats: QueueStats,
    pub rows: Vec<JobRowView>,
    pub page: PageInfo,
    pub directory_label: String,
    pub has_directory: bool,
    pub link_input: String,
    pub batch_file: Option<String>,
    pub notice: Option<Notice>,
    pub delivered_count: usize,
    pub dirty: bool,
}

/// Aggregate counters for the stat cards.
///
/// `failed` counts `Error` rows. `failed_by_subtraction` is the server-counter
/// arithmetic; when the two disagree `counters_consistent` is false and
/// neither value is adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    pub total: i64,
    pub completed: i64,
    pub downloading: i64,
    pub queued: i64,
    pub failed: i64,
    pub failed_by_subtraction: i64,
    pub counters_consistent: bool,
}

impl QueueStats {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let count = |status: &JobStatus| {
            snapshot
                .queue
                .iter()
                .filter(|job| &job.status == status)
                .count() as i64
        };
        let queued = count(&JobStatus::Queued);
        let failed = count(&JobStatus::Error);
        let failed_by_subtraction =
            snapshot.total - snapshot.completed - snapshot.downloading - queued;

        Self {
            total: snapshot.total,
            completed: snapshot.completed,
            downloading: snapshot.downloading,
            queued,
            failed,
            failed_by_subtraction,
            counters_consistent: failed == failed_by_subtraction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// 1-based, already clamped to `total_pages`.
    pub page: usize,
    pub total_pages: usize,
    pub rows_per_page: usize,
    pub total_items: usize,
    /// 1-based index of the first visible row; 0 when there are no rows.
    pub showing_from: usize,
    pub showing_to: usize,
}

impl Default for PageInfo {
    fn default() -> Self {
        paginate(0, 1, crate::state::DEFAULT_ROWS_PER_PAGE)
    }
}

impl PageInfo {
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.rows_per_page
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn summary(&self) -> String {
        if self.total_items == 0 {
            "No items".to_string()
        } else {
            format!(
                "Showing {} to {} of {} items",
                self.showing_from, self.showing_to, self.total_items
            )
        }
    }
}

pub fn paginate(total_items: usize, page: usize, rows_per_page: usize) -> PageInfo {
    let rows_per_page = rows_per_page.max(1);
    let total_pages = total_items.div_ceil(rows_per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * rows_per_page;
    let (showing_from, showing_to) = if total_items == 0 {
        (0, 0)
    } else {
        (start + 1, (start + rows_per_page).min(total_items))
    };

    PageInfo {
        page,
        total_pages,
        rows_per_page,
        total_items,
        showing_from,
        showing_to,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub url: String,
    pub status_label: String,
    pub terminal: bool,
    pub progress: f64,
    pub filename: Option<String>,
    pub error: Option<String>,
    pub size: Option<String>,
    pub duration: Option<String>,
    pub platform: Platform,
    pub delivery: Option<DeliveryOutcome>,
}

impl JobRowView {
    pub fn from_job(job: &Job, delivery: Option<DeliveryOutcome>) -> Self {
        let status_label = if job.status.is_known() {
            job.status.as_str().to_string()
        } else {
            UNKNOWN_STATUS_LABEL.to_string()
        };
        let progress = if job.progress.is_finite() {
            job.progress.clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            job_id: job.id,
            url: job.url.clone(),
            status_label,
            terminal: job.status.is_terminal(),
            progress,
            filename: job.filename.clone(),
            error: job.error.clone(),
            size: job.size.clone(),
            duration: job.duration.clone(),
            platform: detect_platform(&job.url),
            delivery,
        }
    }
}
