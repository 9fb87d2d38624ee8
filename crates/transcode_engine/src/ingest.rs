//! Conversion of wire payloads into core model types.

use session_logging::session_warn;
use transcode_core::{FileEntry, PollEntry, TreeNode};

use crate::{WireDirectory, WireQueueItem};

/// Builds the validated tree. Entries the cursor could not navigate to
/// (reserved or empty names, duplicate siblings) are dropped with a warning.
pub fn ingest_tree(wire: WireDirectory) -> TreeNode {
    let children = wire.children.into_iter().map(ingest_tree).collect();
    let files = wire
        .files
        .into_iter()
        .map(|file| FileEntry::new(file.name, file.path))
        .collect();
    let (node, issues) = TreeNode::build(wire.name, children, files);
    for issue in issues {
        session_warn!("Dropping tree entry: {}", issue);
    }
    node
}

pub fn ingest_queue(items: Option<Vec<WireQueueItem>>) -> Vec<PollEntry> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| PollEntry::new(item.name, item.progress))
        .collect()
}
