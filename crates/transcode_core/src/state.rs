use crate::cursor::{DirectoryCursor, ListingEntry};
use crate::queue::QueueStore;
use crate::selection::Selection;
use crate::view_model::{AppViewModel, ListingRow, QueueRowView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Starting,
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushStatus {
    #[default]
    Connecting,
    Connected,
    /// Never opened; the session runs on polling alone.
    Unavailable,
    /// Was open and went away; the session runs on polling alone.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TreeStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum TreeState {
    #[default]
    Loading,
    Ready(DirectoryCursor),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PollState {
    in_flight: bool,
    pending: bool,
}

/// Session context: everything one console session knows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    session: SessionState,
    tree: TreeState,
    selection: Selection,
    queue: QueueStore,
    queue_synced: bool,
    poll: PollState,
    push: PushStatus,
    last_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn cursor(&self) -> Option<&DirectoryCursor> {
        match &self.tree {
            TreeState::Ready(cursor) => Some(cursor),
            _ => None,
        }
    }

    pub fn queue(&self) -> &QueueStore {
        &self.queue
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn push_status(&self) -> PushStatus {
        self.push
    }

    pub fn poll_in_flight(&self) -> bool {
        self.poll.in_flight
    }

    pub fn listing(&self) -> Vec<ListingEntry> {
        self.cursor().map(DirectoryCursor::listing).unwrap_or_default()
    }

    pub fn view(&self) -> AppViewModel {
        let (tree, location) = match &self.tree {
            TreeState::Loading => (TreeStatus::Loading, Vec::new()),
            TreeState::Ready(cursor) => (TreeStatus::Ready, cursor.location()),
            TreeState::Failed(reason) => (TreeStatus::Failed(reason.clone()), Vec::new()),
        };
        let listing = self
            .listing()
            .into_iter()
            .map(|entry| {
                let selected = match &entry {
                    ListingEntry::File { path, .. } => self.selection.contains(path),
                    _ => false,
                };
                ListingRow { entry, selected }
            })
            .collect();
        let queue = self
            .queue
            .items()
            .iter()
            .map(|item| QueueRowView {
                name: item.name.clone(),
                progress: item.progress,
            })
            .collect();

        AppViewModel {
            tree,
            location,
            listing,
            queue,
            queue_synced: self.queue_synced,
            push: self.push,
            last_error: self.last_error.clone(),
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn start_session(&mut self) {
        self.session = SessionState::Active;
    }

    pub(crate) fn close_session(&mut self) {
        self.session = SessionState::Closed;
        self.mark_dirty();
    }

    pub(crate) fn set_tree(&mut self, cursor: DirectoryCursor) {
        self.tree = TreeState::Ready(cursor);
        self.selection.clear();
        self.mark_dirty();
    }

    pub(crate) fn set_tree_failed(&mut self, reason: String) {
        self.tree = TreeState::Failed(reason);
        self.mark_dirty();
    }

    /// Runs a navigation step against the cursor. The selection belongs to
    /// the listing on screen, so it is dropped whenever the directory changes.
    pub(crate) fn navigate_with(&mut self, step: impl FnOnce(&mut DirectoryCursor) -> bool) {
        let TreeState::Ready(cursor) = &mut self.tree else {
            return;
        };
        if step(cursor) {
            self.selection.clear();
            self.mark_dirty();
        }
    }

    pub(crate) fn toggle_selection(&mut self, path: &str) {
        let listed = self.listing().iter().any(|entry| {
            matches!(entry, ListingEntry::File { path: listed, .. } if listed == path)
        });
        if listed {
            self.selection.toggle(path);
            self.mark_dirty();
        }
    }

    pub(crate) fn queue_mut(&mut self) -> &mut QueueStore {
        &mut self.queue
    }

    pub(crate) fn mark_queue_synced(&mut self) {
        if !self.queue_synced {
            self.queue_synced = true;
            self.mark_dirty();
        }
    }

    /// Claims the poll slot. Returns `true` when a fetch should go out now;
    /// otherwise one follow-up fetch is remembered for when the slot frees.
    pub(crate) fn request_poll(&mut self) -> bool {
        if self.poll.in_flight {
            self.poll.pending = true;
            false
        } else {
            self.poll.in_flight = true;
            true
        }
    }

    /// Releases the poll slot. Returns `true` when a coalesced follow-up
    /// fetch should go out now.
    pub(crate) fn finish_poll(&mut self) -> bool {
        self.poll.in_flight = false;
        if std::mem::take(&mut self.poll.pending) {
            self.poll.in_flight = true;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_push_status(&mut self, status: PushStatus) {
        if self.push != status {
            self.push = status;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_last_error(&mut self, error: Option<String>) {
        if self.last_error != error {
            self.last_error = error;
            self.mark_dirty();
        }
    }
}
