//! Transcode console core: pure state machine and view-model helpers.
mod cursor;
mod effect;
mod msg;
mod queue;
mod selection;
mod state;
mod tree;
mod update;
mod view_model;

pub use cursor::{CursorId, DirectoryCursor, ListingEntry};
pub use effect::Effect;
pub use msg::Msg;
pub use queue::{round_progress, MergeOutcome, PollEntry, QueueItem, QueueStore};
pub use selection::Selection;
pub use state::{AppState, PushStatus, SessionState, TreeStatus};
pub use tree::{is_reserved_name, FileEntry, TreeError, TreeNode, UP_TOKEN};
pub use update::update;
pub use view_model::{AppViewModel, ListingRow, QueueRowView};
