use crate::{PollEntry, TreeNode};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Session context constructed; kicks off the initial fetches.
    Started,
    /// Source tree fetched and validated.
    TreeLoaded(TreeNode),
    /// Source tree could not be fetched or decoded.
    TreeFailed(String),
    /// User picked a directory row by name (`..` goes up).
    DirectoryClicked(String),
    /// User asked to go to the parent directory.
    UpClicked,
    /// User activated the row at this position of the current listing.
    EntryActivated(usize),
    /// User checked or unchecked a file of the current listing.
    FileToggled { path: String },
    /// User submitted the checked files.
    SubmitClicked,
    /// User asked for an immediate queue refresh.
    RefreshClicked,
    /// Poll timer fired.
    PollTick,
    /// Full queue listing received.
    QueueListed(Vec<PollEntry>),
    /// Queue listing failed; the store is kept as is.
    QueueFailed(String),
    /// Server accepted an enqueue request.
    SubmissionAccepted { path: String },
    /// Enqueue request failed.
    SubmissionFailed { path: String, reason: String },
    /// Push channel is open.
    PushConnected,
    /// Progress event from the push channel.
    PushReceived { name: String, progress: f64 },
    /// Push channel could not be opened.
    PushUnavailable(String),
    /// Push channel closed by the peer or by an error.
    PushClosed,
    /// User quit; the session tears down.
    Shutdown,
}
