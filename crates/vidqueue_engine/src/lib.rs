//! Vidqueue engine: processor client, artifact delivery and the session loop.
mod client;
mod delivery;
mod filename;
mod persist;
mod picker;
mod save;
mod session;
mod transfer;
mod types;

pub use client::{ArtifactStream, JobProcessor, ProcessorSettings, ReqwestProcessor, DEFAULT_API_BASE_URL};
pub use delivery::deliver;
pub use filename::safe_entry_name;
pub use persist::{ensure_output_dir, DirectoryWriter, PersistError, Placement, StagedFile};
pub use picker::{DirectoryPicker, DisabledPicker, PathPicker};
pub use save::{DownloadsFolderSave, SaveTrigger};
pub use session::{Renderer, Services, Session, SessionConfig, SessionHandle};
pub use transfer::{stream_to_file, TransferError};
pub use types::{ClientError, FailureKind};
