use std::path::PathBuf;

use crate::{
    CommandKind, DeliveryOutcome, DirectoryHandle, JobId, PickError, RemoteFailure, Snapshot,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The view was shown; issue the first snapshot read.
    SessionStarted,
    /// Heartbeat timer fired.
    HeartbeatTick,
    /// Heartbeat read finished.
    SnapshotPolled(Result<Snapshot, RemoteFailure>),
    /// User edited the single-link input.
    LinkInputChanged(String),
    /// User asked to queue the single link.
    SubmitLinkClicked,
    /// User chose (or un-chose) a batch file.
    BatchFileChosen(Option<PathBuf>),
    /// User asked to upload the chosen batch file.
    UploadBatchClicked,
    /// User asked the processor to purge its queue.
    ClearAllClicked,
    /// A user-initiated command finished.
    CommandCompleted {
        command: CommandKind,
        result: Result<Snapshot, RemoteFailure>,
    },
    /// User asked to pick a target folder.
    ChooseDirectoryClicked { requested: Option<PathBuf> },
    /// The directory chooser finished.
    DirectoryPicked(Result<DirectoryHandle, PickError>),
    /// User dropped the target folder.
    ClearDirectoryClicked,
    /// An artifact delivery finished, one way or the other.
    DeliveryFinished {
        job_id: JobId,
        outcome: DeliveryOutcome,
    },
    PageSelected(usize),
    NextPage,
    PreviousPage,
    RowsPerPageSelected(usize),
    /// Ask for a re-render without changing state.
    RefreshRequested,
    /// Render tick.
    Tick,
    NoOp,
}
