use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use vidqueue_core::{
    update, AppState, AppViewModel, CommandKind, Effect, Msg, PickError, RemoteFailure, Snapshot,
    DEFAULT_ROWS_PER_PAGE,
};

use crate::delivery::deliver;
use crate::{ClientError, DirectoryPicker, FailureKind, JobProcessor, SaveTrigger};

const MAX_DRAIN: usize = 256;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    /// How long teardown waits for deliveries that are still running.
    pub delivery_grace: Duration,
    pub rows_per_page: usize,
    /// Deliveries allowed to transfer at once; the rest wait their turn.
    pub max_concurrent_deliveries: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            delivery_grace: Duration::from_secs(10),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            max_concurrent_deliveries: 4,
        }
    }
}

/// Receives a fresh view whenever the state changed.
pub trait Renderer {
    fn render(&mut self, view: &AppViewModel);
}

/// Platform capabilities the session drives.
#[derive(Clone)]
pub struct Services {
    pub processor: Arc<dyn JobProcessor>,
    pub picker: Arc<dyn DirectoryPicker>,
    pub saver: Arc<dyn SaveTrigger>,
}

/// Cheap handle for feeding user input into a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    msg_tx: mpsc::UnboundedSender<Msg>,
    cancel: CancellationToken,
}

impl SessionHandle {
    /// Returns `false` once the session is gone.
    pub fn send(&self, msg: Msg) -> bool {
        self.msg_tx.send(msg).is_ok()
    }

    /// Tear the session down: the heartbeat stops, running deliveries get
    /// the grace period.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// One session: owns the state and is the only writer to it.
///
/// Effects run as spawned tasks that answer with a `Msg`; every message is
/// applied on the session task, one at a time.
pub struct Session {
    state: AppState,
    services: Services,
    config: SessionConfig,
    msg_tx: mpsc::UnboundedSender<Msg>,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    cancel: CancellationToken,
    deliveries: JoinSet<()>,
    delivery_slots: Arc<Semaphore>,
    poll_failures: u32,
}

impl Session {
    pub fn new(services: Services, config: SessionConfig) -> (Self, SessionHandle) {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = SessionHandle {
            msg_tx: msg_tx.clone(),
            cancel: cancel.clone(),
        };
        let delivery_slots = Arc::new(Semaphore::new(config.max_concurrent_deliveries.max(1)));
        let session = Self {
            state: AppState::with_rows_per_page(config.rows_per_page),
            services,
            config,
            msg_tx,
            msg_rx,
            cancel,
            deliveries: JoinSet::new(),
            delivery_slots,
            poll_failures: 0,
        };
        (session, handle)
    }

    /// Run until the handle shuts the session down; returns the final state.
    pub async fn run(mut self, renderer: &mut dyn Renderer) -> AppState {
        let mut heartbeat = tokio::time::interval(self.config.poll_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick is immediate; SessionStarted already reads once.
        heartbeat.tick().await;

        engine_info!(
            "Session started, polling every {:?}",
            self.config.poll_interval
        );
        self.dispatch(Msg::SessionStarted);
        self.render_if_dirty(renderer);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = heartbeat.tick() => self.dispatch(Msg::HeartbeatTick),
                Some(msg) = self.msg_rx.recv() => {
                    self.dispatch(msg);
                    self.drain_pending();
                }
                Some(joined) = self.deliveries.join_next(), if !self.deliveries.is_empty() => {
                    if let Err(err) = joined {
                        engine_error!("Delivery task failed: {}", err);
                    }
                }
            }
            self.render_if_dirty(renderer);
        }

        self.finish_deliveries().await;
        self.render_if_dirty(renderer);
        engine_info!(
            "Session ended, {} delivery attempt(s)",
            self.state.delivered().len()
        );
        self.state
    }

    fn dispatch(&mut self, msg: Msg) {
        self.observe(&msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.execute(effect);
        }
    }

    fn drain_pending(&mut self) {
        for _ in 0..MAX_DRAIN {
            match self.msg_rx.try_recv() {
                Ok(msg) => self.dispatch(msg),
                Err(_) => break,
            }
        }
    }

    fn render_if_dirty(&mut self, renderer: &mut dyn Renderer) {
        if !self.state.consume_dirty() {
            return;
        }
        let view = self.state.view();
        renderer.render(&view);
        // Notices are shown once.
        let _ = self.state.take_notice();
    }

    /// Failures are swallowed by the state machine; this is where they are
    /// written down.
    fn observe(&mut self, msg: &Msg) {
        match msg {
            Msg::SnapshotPolled(Err(failure)) => {
                self.poll_failures += 1;
                if self.poll_failures == 1 {
                    engine_warn!("Failed to fetch status: {}", failure);
                } else {
                    engine_debug!(
                        "Failed to fetch status ({} in a row): {}",
                        self.poll_failures,
                        failure
                    );
                }
            }
            Msg::SnapshotPolled(Ok(_)) => {
                if self.poll_failures > 0 {
                    engine_info!(
                        "Status polling recovered after {} failure(s)",
                        self.poll_failures
                    );
                }
                self.poll_failures = 0;
            }
            Msg::CommandCompleted {
                command,
                result: Err(failure),
            } => engine_warn!("Failed to {}: {}", command, failure),
            Msg::CommandCompleted {
                command,
                result: Ok(snapshot),
            } => engine_info!("{} ok, queue holds {} job(s)", command, snapshot.queue.len()),
            Msg::DirectoryPicked(Err(PickError::Cancelled)) => {
                engine_debug!("Directory selection cancelled")
            }
            Msg::DirectoryPicked(Err(err)) => engine_warn!("Error selecting directory: {}", err),
            Msg::DirectoryPicked(Ok(handle)) => {
                engine_info!("Saving artifacts into {}", handle.path().display())
            }
            Msg::ClearDirectoryClicked => {
                engine_info!("Folder cleared; artifacts go through the save flow")
            }
            Msg::DeliveryFinished { job_id, outcome } => {
                engine_debug!("Delivery finished job_id={} outcome={:?}", job_id, outcome)
            }
            _ => {}
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::FetchSnapshot => {
                let processor = self.services.processor.clone();
                self.spawn_reply(async move {
                    Msg::SnapshotPolled(processor.status().await.map_err(RemoteFailure::from))
                });
            }
            Effect::SubmitLinks { urls } => {
                engine_info!("Submitting {} link(s)", urls.len());
                let processor = self.services.processor.clone();
                self.spawn_reply(async move {
                    let result = processor.submit_links(&urls).await;
                    command_completed(CommandKind::SubmitLinks, result)
                });
            }
            Effect::UploadBatch { path } => {
                engine_info!("Uploading batch file {}", path.display());
                let processor = self.services.processor.clone();
                self.spawn_reply(async move {
                    let result = upload_file(processor.as_ref(), &path).await;
                    command_completed(CommandKind::UploadBatch, result)
                });
            }
            Effect::ClearQueue => {
                engine_info!("Clearing the processor queue");
                let processor = self.services.processor.clone();
                self.spawn_reply(async move {
                    let result = processor.clear().await;
                    command_completed(CommandKind::ClearQueue, result)
                });
            }
            Effect::PickDirectory { requested } => {
                let picker = self.services.picker.clone();
                self.spawn_reply(async move {
                    Msg::DirectoryPicked(picker.pick(requested.as_deref()).await)
                });
            }
            Effect::Deliver(request) => {
                engine_info!(
                    "Delivering job_id={} name={:?} to {}",
                    request.job_id,
                    request.filename,
                    request
                        .directory
                        .as_ref()
                        .map(|dir| dir.path().display().to_string())
                        .unwrap_or_else(|| "the save flow".to_string())
                );
                let services = self.services.clone();
                let msg_tx = self.msg_tx.clone();
                let slots = self.delivery_slots.clone();
                self.deliveries.spawn(async move {
                    // The semaphore is never closed.
                    let _slot = slots.acquire_owned().await.ok();
                    let outcome =
                        deliver(services.processor.as_ref(), services.saver.as_ref(), &request)
                            .await;
                    let _ = msg_tx.send(Msg::DeliveryFinished {
                        job_id: request.job_id,
                        outcome,
                    });
                });
            }
        }
    }

    fn spawn_reply<F>(&self, work: F)
    where
        F: Future<Output = Msg> + Send + 'static,
    {
        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let _ = msg_tx.send(work.await);
        });
    }

    /// Deliveries are already claimed, so they are allowed to finish rather
    /// than being cancelled; anything past the grace period is detached.
    async fn finish_deliveries(&mut self) {
        if self.deliveries.is_empty() {
            return;
        }
        engine_info!(
            "Waiting up to {:?} for {} running delivery(ies)",
            self.config.delivery_grace,
            self.deliveries.len()
        );

        let deliveries = &mut self.deliveries;
        let drained = tokio::time::timeout(self.config.delivery_grace, async {
            while let Some(joined) = deliveries.join_next().await {
                if let Err(err) = joined {
                    engine_error!("Delivery task failed: {}", err);
                }
            }
        })
        .await;

        if drained.is_err() {
            engine_warn!(
                "{} delivery(ies) still running at teardown",
                self.deliveries.len()
            );
            self.deliveries.detach_all();
        }

        while let Ok(msg) = self.msg_rx.try_recv() {
            if matches!(msg, Msg::DeliveryFinished { .. }) {
                self.dispatch(msg);
            }
        }
    }
}

fn command_completed(command: CommandKind, result: Result<Snapshot, ClientError>) -> Msg {
    Msg::CommandCompleted {
        command,
        result: result.map_err(RemoteFailure::from),
    }
}

async fn upload_file(processor: &dyn JobProcessor, path: &Path) -> Result<Snapshot, ClientError> {
    let contents = tokio::fs::read(path).await.map_err(|err| {
        ClientError::new(FailureKind::Io, format!("{}: {}", path.display(), err))
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "links.txt".to_string());
    processor.upload_batch(&file_name, contents).await
}
