use crate::state::Notice;
use crate::{AppState, CommandKind, Effect, Msg, PickError};

pub const ENTER_LINK_MESSAGE: &str = "Please enter a link";
pub const CHOOSE_FILE_MESSAGE: &str = "Choose .txt file";
pub const PICKER_UNSUPPORTED_MESSAGE: &str = "Directory picker is not supported on this platform.";
pub const PICKER_FAILED_MESSAGE: &str = "Failed to select directory. Please try again.";
pub const BATCH_FILE_UNREADABLE_MESSAGE: &str = "Could not read the chosen file";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionStarted => {
            // First frame goes out even if the queue stays empty.
            state.mark_dirty();
            if state.begin_poll() {
                vec![Effect::FetchSnapshot]
            } else {
                Vec::new()
            }
        }
        Msg::HeartbeatTick => {
            if state.begin_poll() {
                vec![Effect::FetchSnapshot]
            } else {
                Vec::new()
            }
        }
        Msg::SnapshotPolled(result) => {
            state.finish_poll();
            match result {
                Ok(snapshot) => state.replace_snapshot(snapshot),
                // Keep the previous snapshot; the next tick retries.
                Err(_) => Vec::new(),
            }
        }
        Msg::LinkInputChanged(text) => {
            state.set_link_input(text);
            Vec::new()
        }
        Msg::SubmitLinkClicked => {
            let link = state.link_input().trim().to_string();
            if link.is_empty() {
                state.set_notice(Notice::Validation(ENTER_LINK_MESSAGE.to_string()));
                Vec::new()
            } else {
                vec![Effect::SubmitLinks { urls: vec![link] }]
            }
        }
        Msg::BatchFileChosen(path) => {
            state.set_batch_file(path);
            Vec::new()
        }
        Msg::UploadBatchClicked => match state.batch_file() {
            Some(path) => vec![Effect::UploadBatch {
                path: path.to_path_buf(),
            }],
            None => {
                state.set_notice(Notice::Validation(CHOOSE_FILE_MESSAGE.to_string()));
                Vec::new()
            }
        },
        Msg::ClearAllClicked => vec![Effect::ClearQueue],
        Msg::CommandCompleted { command, result } => match result {
            Ok(snapshot) => {
                match command {
                    CommandKind::SubmitLinks => state.set_link_input(String::new()),
                    CommandKind::UploadBatch => state.set_batch_file(None),
                    CommandKind::ClearQueue => state.select_page(1),
                }
                state.replace_snapshot(snapshot)
            }
            // Network failures stay silent; a file that cannot be read is the
            // user's to fix.
            Err(failure) => {
                if failure.local {
                    state.set_notice(Notice::Advisory(format!(
                        "{BATCH_FILE_UNREADABLE_MESSAGE}: {}",
                        failure.message
                    )));
                }
                Vec::new()
            }
        },
        Msg::ChooseDirectoryClicked { requested } => vec![Effect::PickDirectory { requested }],
        Msg::DirectoryPicked(result) => match result {
            Ok(handle) => {
                // Deliverable jobs were claimed as their snapshot arrived;
                // only later claims capture this handle.
                state.set_directory(Some(handle));
                Vec::new()
            }
            Err(PickError::Cancelled) => Vec::new(),
            Err(PickError::Unsupported) => {
                state.set_notice(Notice::Advisory(PICKER_UNSUPPORTED_MESSAGE.to_string()));
                Vec::new()
            }
            Err(PickError::Failed(_)) => {
                state.set_notice(Notice::Advisory(PICKER_FAILED_MESSAGE.to_string()));
                Vec::new()
            }
        },
        Msg::ClearDirectoryClicked => {
            state.set_directory(None);
            Vec::new()
        }
        Msg::DeliveryFinished { job_id, outcome } => {
            state.record_outcome(job_id, outcome);
            Vec::new()
        }
        Msg::PageSelected(page) => {
            state.select_page(page);
            Vec::new()
        }
        Msg::NextPage => {
            let next = state.page().saturating_add(1);
            state.select_page(next);
            Vec::new()
        }
        Msg::PreviousPage => {
            let previous = state.page().saturating_sub(1);
            state.select_page(previous);
            Vec::new()
        }
        Msg::RowsPerPageSelected(rows) => {
            state.select_rows_per_page(rows);
            Vec::new()
        }
        Msg::RefreshRequested => {
            state.mark_dirty();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
