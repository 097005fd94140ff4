use std::fmt;
use std::path::PathBuf;

use crate::DeliveryRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Read the full queue snapshot (heartbeat).
    FetchSnapshot,
    SubmitLinks { urls: Vec<String> },
    UploadBatch { path: PathBuf },
    ClearQueue,
    PickDirectory { requested: Option<PathBuf> },
    Deliver(DeliveryRequest),
}

/// User-initiated round trips whose response replaces the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    SubmitLinks,
    UploadBatch,
    ClearQueue,
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::SubmitLinks => write!(f, "submit links"),
            CommandKind::UploadBatch => write!(f, "upload batch"),
            CommandKind::ClearQueue => write!(f, "clear queue"),
        }
    }
}

/// A request to the processor that produced no usable snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub message: String,
    /// The request never left this machine (e.g. the batch file was unreadable).
    pub local: bool,
}

impl RemoteFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            local: false,
        }
    }

    pub fn local(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            local: true,
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
