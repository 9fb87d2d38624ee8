/// I/O requested by [`crate::update`]. Executed outside the core; results
/// come back as [`crate::Msg`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the whole source tree once.
    FetchTree,
    /// Fetch the full queue listing.
    FetchQueue,
    /// Submit one file for transcoding.
    Enqueue { path: String },
    /// Open the push channel for progress events.
    OpenPushChannel,
    /// Start the periodic poll timer.
    StartPolling,
    /// Cancel timers and close the push channel.
    Teardown,
}
