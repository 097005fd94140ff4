use vidqueue_core::{update, AppState, Effect, Job, Msg, RemoteFailure, Snapshot};

fn snapshot(status: &str) -> Snapshot {
    Snapshot::from_jobs(vec![Job::new(1, "https://v.example/1", status).with_progress(40.0)])
}

#[test]
fn session_start_reads_immediately() {
    let (mut state, effects) = update(AppState::new(), Msg::SessionStarted);

    assert_eq!(effects, vec![Effect::FetchSnapshot]);
    assert!(state.poll_in_flight());
    assert!(state.consume_dirty());
}

#[test]
fn ticks_while_a_read_is_outstanding_are_skipped() {
    let (state, effects) = update(AppState::new(), Msg::HeartbeatTick);
    assert_eq!(effects, vec![Effect::FetchSnapshot]);

    let (state, effects) = update(state, Msg::HeartbeatTick);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::HeartbeatTick);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::SnapshotPolled(Ok(snapshot("Queued"))));
    let (_state, effects) = update(state, Msg::HeartbeatTick);
    assert_eq!(effects, vec![Effect::FetchSnapshot]);
}

#[test]
fn failed_read_keeps_previous_snapshot() {
    let (state, _) = update(AppState::new(), Msg::HeartbeatTick);
    let (state, _) = update(state, Msg::SnapshotPolled(Ok(snapshot("Downloading"))));
    let (mut state, _) = update(state, Msg::HeartbeatTick);
    let _ = state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::SnapshotPolled(Err(RemoteFailure::new("connection refused"))),
    );

    assert!(effects.is_empty());
    assert_eq!(state.snapshot(), &snapshot("Downloading"));
    assert!(!state.poll_in_flight());
    assert!(state.notice().is_none());
    assert!(!state.consume_dirty());
}

#[test]
fn latest_response_wins_even_if_progress_goes_backwards() {
    let ahead = Snapshot::from_jobs(vec![Job::new(1, "u", "Downloading").with_progress(80.0)]);
    let behind = Snapshot::from_jobs(vec![Job::new(1, "u", "Downloading").with_progress(20.0)]);

    let (state, _) = update(AppState::new(), Msg::SnapshotPolled(Ok(ahead)));
    let (state, _) = update(state, Msg::SnapshotPolled(Ok(behind.clone())));

    assert_eq!(state.snapshot(), &behind);
}

#[test]
fn identical_snapshot_does_not_dirty_state() {
    let (mut state, _) = update(AppState::new(), Msg::SnapshotPolled(Ok(snapshot("Queued"))));
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::SnapshotPolled(Ok(snapshot("Queued"))));
    assert!(!state.consume_dirty());
}
