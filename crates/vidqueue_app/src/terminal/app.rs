use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use vidqueue_core::Msg;
use vidqueue_engine::{
    DirectoryPicker, DisabledPicker, DownloadsFolderSave, PathPicker, ReqwestProcessor, Services,
    Session, SessionHandle,
};

use super::commands::{parse_line, Command, HELP_TEXT};
use super::render::TerminalRenderer;
use crate::config::ClientConfig;

pub async fn run_app(config: ClientConfig, initial_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let processor = ReqwestProcessor::new(config.processor_settings())
        .with_context(|| format!("invalid processor url {:?}", config.api_base_url))?;
    let picker: Arc<dyn DirectoryPicker> = if config.directory_picker {
        Arc::new(PathPicker)
    } else {
        Arc::new(DisabledPicker)
    };
    let saver = DownloadsFolderSave::new(
        config.fallback_dir.clone(),
        processor.settings().artifact_timeout,
    );
    let services = Services {
        processor: Arc::new(processor),
        picker,
        saver: Arc::new(saver),
    };

    let (session, handle) = Session::new(services, config.session_config());
    engine_info!(
        "Using processor at {}, save flow folder {}",
        config.api_base_url,
        config.fallback_dir.display()
    );

    if let Some(dir) = initial_dir {
        handle.send(Msg::ChooseDirectoryClicked {
            requested: Some(dir),
        });
    }

    println!("{HELP_TEXT}");
    spawn_input_reader(handle);

    let mut renderer = TerminalRenderer::new(io::stdout());
    let state = session.run(&mut renderer).await;
    engine_info!(
        "Exiting with {} job(s) in the last snapshot",
        state.snapshot().queue.len()
    );
    Ok(())
}

/// Stdin is blocking, so it gets its own thread; end of input or `quit`
/// tears the session down.
fn spawn_input_reader(handle: SessionHandle) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    engine_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            match parse_line(&line) {
                Command::Send(msgs) => {
                    for msg in msgs {
                        if !handle.send(msg) {
                            return;
                        }
                    }
                }
                Command::Help => println!("{HELP_TEXT}"),
                Command::Quit => break,
            }
        }
        handle.shutdown();
    });
}
