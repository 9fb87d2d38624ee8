use crate::{AppState, DirectoryCursor, Effect, ListingEntry, Msg, PushStatus, SessionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    // Teardown is final: late fetch results and socket frames are dropped.
    if state.session() == SessionState::Closed {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Started => {
            if state.session() != SessionState::Starting {
                return (state, Vec::new());
            }
            state.start_session();
            let mut effects = vec![Effect::FetchTree];
            effects.extend(poll_now(&mut state));
            effects.push(Effect::OpenPushChannel);
            effects.push(Effect::StartPolling);
            effects
        }
        Msg::TreeLoaded(root) => {
            state.set_tree(DirectoryCursor::new(root));
            Vec::new()
        }
        Msg::TreeFailed(reason) => {
            state.set_tree_failed(reason);
            Vec::new()
        }
        Msg::DirectoryClicked(target) => {
            state.navigate_with(|cursor| cursor.navigate(&target));
            Vec::new()
        }
        Msg::UpClicked => {
            state.navigate_with(DirectoryCursor::leave);
            Vec::new()
        }
        Msg::EntryActivated(index) => {
            match state.listing().get(index).cloned() {
                Some(ListingEntry::Up) => state.navigate_with(DirectoryCursor::leave),
                Some(ListingEntry::Directory { name }) => {
                    state.navigate_with(|cursor| cursor.enter(&name))
                }
                Some(ListingEntry::File { path, .. }) => state.toggle_selection(&path),
                None => {}
            }
            Vec::new()
        }
        Msg::FileToggled { path } => {
            state.toggle_selection(&path);
            Vec::new()
        }
        Msg::SubmitClicked => state
            .selection()
            .selected_in(&state.listing())
            .into_iter()
            .map(|path| Effect::Enqueue { path })
            .collect(),
        Msg::PollTick | Msg::RefreshClicked => poll_now(&mut state),
        Msg::QueueListed(listing) => {
            if state.queue_mut().merge_listing(&listing).changed() {
                state.mark_dirty();
            }
            state.mark_queue_synced();
            state.set_last_error(None);
            poll_follow_up(&mut state)
        }
        Msg::QueueFailed(reason) => {
            state.set_last_error(Some(format!("queue refresh failed: {reason}")));
            poll_follow_up(&mut state)
        }
        Msg::SubmissionAccepted { .. } => poll_now(&mut state),
        Msg::SubmissionFailed { path, reason } => {
            state.set_last_error(Some(format!("could not queue {path}: {reason}")));
            Vec::new()
        }
        Msg::PushConnected => {
            state.set_push_status(PushStatus::Connected);
            Vec::new()
        }
        Msg::PushReceived { name, progress } => {
            if state.queue_mut().apply_push(&name, progress) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PushUnavailable(_) => {
            state.set_push_status(PushStatus::Unavailable);
            Vec::new()
        }
        Msg::PushClosed => {
            state.set_push_status(PushStatus::Closed);
            Vec::new()
        }
        Msg::Shutdown => {
            state.close_session();
            vec![Effect::Teardown]
        }
    };

    (state, effects)
}

fn poll_now(state: &mut AppState) -> Vec<Effect> {
    if state.request_poll() {
        vec![Effect::FetchQueue]
    } else {
        Vec::new()
    }
}

fn poll_follow_up(state: &mut AppState) -> Vec<Effect> {
    if state.finish_poll() {
        vec![Effect::FetchQueue]
    } else {
        Vec::new()
    }
}
