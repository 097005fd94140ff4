use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub type JobId = u64;

/// Status token reported by the job processor.
///
/// Tokens are matched case-sensitively; anything else is kept verbatim in
/// `Unknown` so it can be shown and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Queued,
    Starting,
    Downloading,
    Merging,
    Completed,
    Error,
    Unknown(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Queued => "Queued",
            JobStatus::Starting => "Starting",
            JobStatus::Downloading => "Downloading",
            JobStatus::Merging => "Merging",
            JobStatus::Completed => "Completed",
            JobStatus::Error => "Error",
            JobStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, JobStatus::Unknown(_))
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "Queued" => JobStatus::Queued,
            "Starting" => JobStatus::Starting,
            "Downloading" => JobStatus::Downloading,
            "Merging" => JobStatus::Merging,
            "Completed" => JobStatus::Completed,
            "Error" => JobStatus::Error,
            other => JobStatus::Unknown(other.to_string()),
        }
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        match JobStatus::from(raw.as_str()) {
            JobStatus::Unknown(_) => JobStatus::Unknown(raw),
            known => known,
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the processor's queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub url: String,
    pub status: JobStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub filepath: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub duration: Option<String>,
}

impl Job {
    pub fn new(id: JobId, url: impl Into<String>, status: impl Into<JobStatus>) -> Self {
        Self {
            id,
            url: url.into(),
            status: status.into(),
            progress: 0.0,
            filename: None,
            filepath: None,
            error: None,
            size: None,
            duration: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }
}

/// Full queue state as last reported by the processor.
///
/// The counters are whatever the server sent; they are never used to decide
/// delivery.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub total: i64,
    pub completed: i64,
    pub downloading: i64,
    pub queue: Vec<Job>,
}

impl Snapshot {
    pub fn from_jobs(jobs: Vec<Job>) -> Self {
        let completed = jobs
            .iter()
            .filter(|job| job.status == JobStatus::Completed)
            .count() as i64;
        let downloading = jobs
            .iter()
            .filter(|job| job.status == JobStatus::Downloading)
            .count() as i64;
        Self {
            total: jobs.len() as i64,
            completed,
            downloading,
            queue: jobs,
        }
    }
}

// Informational fields arrive as text from some processors and as numbers from others.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::Str(s) => s,
        Text::Int(n) => n.to_string(),
        Text::Float(n) => n.to_string(),
    }))
}
