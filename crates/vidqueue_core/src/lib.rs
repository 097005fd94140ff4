//! Vidqueue core: pure session state machine and view-model helpers.
mod delivery;
mod directory;
mod effect;
mod job;
mod msg;
mod platform;
mod state;
mod update;
mod view_model;

pub use delivery::{
    is_deliverable, DeliveredSet, DeliveryOutcome, DeliveryRequest, FallbackReason,
};
pub use directory::{DirectoryHandle, PickError};
pub use effect::{CommandKind, Effect, RemoteFailure};
pub use job::{Job, JobId, JobStatus, Snapshot};
pub use msg::Msg;
pub use platform::{detect_platform, Platform};
pub use state::{AppState, Notice, DEFAULT_ROWS_PER_PAGE, PAGE_SIZES};
pub use update::{
    update, BATCH_FILE_UNREADABLE_MESSAGE, CHOOSE_FILE_MESSAGE, ENTER_LINK_MESSAGE,
    PICKER_FAILED_MESSAGE, PICKER_UNSUPPORTED_MESSAGE,
};
pub use view_model::{
    paginate, AppViewModel, JobRowView, PageInfo, QueueStats, NO_DIRECTORY_LABEL,
    UNKNOWN_STATUS_LABEL,
};
