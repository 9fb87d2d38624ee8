//! Directory navigation over an in-memory tree.
//!
//! Cursors live in an arena owned by [`DirectoryCursor`]. A record points at
//! its parent by id and owns a map from child name to the id of the cursor
//! created the first time that child was entered, so revisiting a directory
//! reuses the record instead of rebuilding it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::tree::{TreeNode, UP_TOKEN};

/// Stable handle of one cursor record inside a [`DirectoryCursor`].
pub type CursorId = usize;

const ROOT: CursorId = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CursorRecord {
    node: Arc<TreeNode>,
    parent: Option<CursorId>,
    cache: HashMap<String, CursorId>,
}

impl CursorRecord {
    fn new(node: Arc<TreeNode>, parent: Option<CursorId>) -> Self {
        Self {
            node,
            parent,
            cache: HashMap::new(),
        }
    }
}

/// One row of the directory listing, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry {
    Up,
    Directory { name: String },
    File { name: String, path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryCursor {
    records: Vec<CursorRecord>,
    active: CursorId,
}

impl DirectoryCursor {
    pub fn new(root: TreeNode) -> Self {
        Self {
            records: vec![CursorRecord::new(Arc::new(root), None)],
            active: ROOT,
        }
    }

    /// Enters the named subdirectory of the active node. Returns `false`
    /// and changes nothing when no child has that name.
    pub fn enter(&mut self, child_name: &str) -> bool {
        let active = self.active;
        if let Some(&cached) = self.records[active].cache.get(child_name) {
            self.active = cached;
            return true;
        }

        let Some(child) = self.records[active].node.child(child_name).cloned() else {
            return false;
        };
        let id = self.records.len();
        self.records.push(CursorRecord::new(child, Some(active)));
        self.records[active].cache.insert(child_name.to_string(), id);
        self.active = id;
        true
    }

    /// Moves to the parent directory. No-op at the root.
    pub fn leave(&mut self) -> bool {
        match self.records[self.active].parent {
            Some(parent) => {
                self.active = parent;
                true
            }
            None => false,
        }
    }

    /// Follows a listing target: the up token leaves, anything else enters.
    pub fn navigate(&mut self, target: &str) -> bool {
        if target == UP_TOKEN {
            self.leave()
        } else {
            self.enter(target)
        }
    }

    pub fn current(&self) -> &TreeNode {
        &self.records[self.active].node
    }

    pub fn has_parent(&self) -> bool {
        self.records[self.active].parent.is_some()
    }

    pub fn active_id(&self) -> CursorId {
        self.active
    }

    pub fn cached_child(&self, id: CursorId, name: &str) -> Option<CursorId> {
        self.records.get(id)?.cache.get(name).copied()
    }

    /// Number of cursor records built so far, the root included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn listing(&self) -> Vec<ListingEntry> {
        let node = self.current();
        let mut entries = Vec::with_capacity(
            usize::from(self.has_parent()) + node.children().len() + node.files().len(),
        );
        if self.has_parent() {
            entries.push(ListingEntry::Up);
        }
        entries.extend(node.children().iter().map(|child| ListingEntry::Directory {
            name: child.name().to_string(),
        }));
        entries.extend(node.files().iter().map(|file| ListingEntry::File {
            name: file.name.clone(),
            path: file.path.clone(),
        }));
        entries
    }

    /// Names from the root down to the active directory.
    pub fn location(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = Some(self.active);
        while let Some(id) = cursor {
            let record = &self.records[id];
            names.push(record.node.name().to_string());
            cursor = record.parent;
        }
        names.reverse();
        names
    }
}
