use pretty_assertions::assert_eq;
use transcode_core::{update, AppState, FileEntry, Msg, TreeNode};

fn loaded_session() -> AppState {
    let movies = TreeNode::new(
        "Movies",
        Vec::new(),
        vec![FileEntry::new("a.mkv", "/Movies/a.mkv")],
    )
    .unwrap();
    let root = TreeNode::new("/", vec![movies], Vec::new()).unwrap();

    let (state, _) = update(AppState::new(), Msg::Started);
    let (state, _) = update(state, Msg::TreeLoaded(root));
    let (mut state, _) = update(state, Msg::QueueListed(Vec::new()));
    state.consume_dirty();
    state
}

#[test]
fn up_at_root_changes_nothing() {
    let state = loaded_session();
    let (mut next, effects) = update(state.clone(), Msg::UpClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn unknown_directory_changes_nothing() {
    let state = loaded_session();
    let (mut next, effects) = update(state.clone(), Msg::DirectoryClicked("missing".into()));

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn toggling_an_unlisted_file_changes_nothing() {
    let state = loaded_session();
    let (next, effects) = update(
        state.clone(),
        Msg::FileToggled {
            path: "/Movies/a.mkv".into(),
        },
    );

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
