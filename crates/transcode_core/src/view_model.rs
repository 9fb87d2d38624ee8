use crate::{ListingEntry, PushStatus, TreeStatus};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub tree: TreeStatus,
    /// Directory names from the root to the one on screen.
    pub location: Vec<String>,
    pub listing: Vec<ListingRow>,
    pub queue: Vec<QueueRowView>,
    /// Set once the first queue listing has arrived.
    pub queue_synced: bool,
    pub push: PushStatus,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub entry: ListingEntry,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueRowView {
    pub name: String,
    pub progress: f64,
}
