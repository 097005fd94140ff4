use vidqueue_core::{
    update, AppState, DirectoryHandle, Effect, Msg, Notice, PickError, PICKER_FAILED_MESSAGE,
    PICKER_UNSUPPORTED_MESSAGE,
};

#[test]
fn choose_directory_emits_pick_effect() {
    let (_state, effects) = update(
        AppState::new(),
        Msg::ChooseDirectoryClicked {
            requested: Some("out".into()),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::PickDirectory {
            requested: Some("out".into())
        }]
    );
}

#[test]
fn cancelled_pick_keeps_previous_handle_silently() {
    let first = DirectoryHandle::new("/data/first");
    let (state, _) = update(AppState::new(), Msg::DirectoryPicked(Ok(first.clone())));

    let (state, effects) = update(state, Msg::DirectoryPicked(Err(PickError::Cancelled)));

    assert!(effects.is_empty());
    assert_eq!(state.directory(), Some(&first));
    assert!(state.notice().is_none());
}

#[test]
fn failed_pick_surfaces_one_advisory_and_keeps_handle() {
    let first = DirectoryHandle::new("/data/first");
    let (state, _) = update(AppState::new(), Msg::DirectoryPicked(Ok(first.clone())));

    let (mut state, _) = update(
        state,
        Msg::DirectoryPicked(Err(PickError::Failed("not writable".to_string()))),
    );

    assert_eq!(state.directory(), Some(&first));
    assert_eq!(
        state.take_notice(),
        Some(Notice::Advisory(PICKER_FAILED_MESSAGE.to_string()))
    );
    assert!(state.take_notice().is_none());
}

#[test]
fn unsupported_picker_is_reported() {
    let (mut state, _) = update(AppState::new(), Msg::DirectoryPicked(Err(PickError::Unsupported)));

    assert!(state.directory().is_none());
    assert_eq!(
        state.take_notice(),
        Some(Notice::Advisory(PICKER_UNSUPPORTED_MESSAGE.to_string()))
    );
}

#[test]
fn repick_replaces_handle_wholesale() {
    let (state, _) = update(
        AppState::new(),
        Msg::DirectoryPicked(Ok(DirectoryHandle::new("/data/first"))),
    );
    let (state, _) = update(
        state,
        Msg::DirectoryPicked(Ok(DirectoryHandle::new("/data/second"))),
    );

    assert_eq!(state.directory(), Some(&DirectoryHandle::new("/data/second")));
}
