use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::{DirectoryHandle, Job, JobId, JobStatus};

/// Job ids whose delivery has already been attempted in this session.
///
/// Ids are claimed before any IO starts and are never released.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveredSet {
    ids: HashSet<JobId>,
}

impl DeliveredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only the first time `id` is claimed.
    pub fn claim(&mut self, id: JobId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: JobId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// A completed job with a named artifact is ready to be delivered.
pub fn is_deliverable(job: &Job) -> bool {
    job.status == JobStatus::Completed
        && job
            .filename
            .as_deref()
            .is_some_and(|filename| !filename.is_empty())
}

/// Everything the dispatcher needs to deliver one artifact.
///
/// `directory` is the handle held when the job qualified; later changes to
/// the holder do not redirect this delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub job_id: JobId,
    pub filename: String,
    pub directory: Option<DirectoryHandle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    SavedToDirectory { path: PathBuf },
    FallbackTriggered { reason: FallbackReason },
}

impl DeliveryOutcome {
    pub fn used_fallback(&self) -> bool {
        matches!(self, DeliveryOutcome::FallbackTriggered { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NoDirectory,
    FetchFailed(String),
    WriteFailed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoDirectory => write!(f, "no folder selected"),
            FallbackReason::FetchFailed(reason) => write!(f, "artifact fetch failed: {reason}"),
            FallbackReason::WriteFailed(reason) => write!(f, "folder write failed: {reason}"),
        }
    }
}
