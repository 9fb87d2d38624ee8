use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

/// Navigation token for the "go up" affordance. Never a valid entry name.
pub const UP_TOKEN: &str = "..";

/// A file shown in a directory listing. `path` is what gets enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Immutable snapshot of one directory as served by the tree endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    name: String,
    children: Vec<Arc<TreeNode>>,
    files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("directory {parent:?} has an entry with an empty name")]
    EmptyName { parent: String },
    #[error("directory {parent:?} has an entry named {name:?}, which is reserved")]
    ReservedName { parent: String, name: String },
    #[error("directory {parent:?} lists subdirectory {name:?} more than once")]
    DuplicateChild { parent: String, name: String },
}

impl TreeNode {
    /// Builds a node, rejecting every entry that would be unreachable or
    /// ambiguous during navigation. Rejected entries are dropped and
    /// reported; the remaining ones keep their order.
    pub fn build(
        name: impl Into<String>,
        children: Vec<TreeNode>,
        files: Vec<FileEntry>,
    ) -> (Self, Vec<TreeError>) {
        let name = name.into();
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        let mut kept_children = Vec::with_capacity(children.len());
        for child in children {
            if let Err(err) = check_entry_name(&name, &child.name) {
                issues.push(err);
                continue;
            }
            if !seen.insert(child.name.clone()) {
                issues.push(TreeError::DuplicateChild {
                    parent: name.clone(),
                    name: child.name.clone(),
                });
                continue;
            }
            kept_children.push(Arc::new(child));
        }

        let mut kept_files = Vec::with_capacity(files.len());
        for file in files {
            match check_entry_name(&name, &file.name) {
                Ok(()) => kept_files.push(file),
                Err(err) => issues.push(err),
            }
        }

        let node = Self {
            name,
            children: kept_children,
            files: kept_files,
        };
        (node, issues)
    }

    /// Strict constructor: fails on the first entry `build` would drop.
    pub fn new(
        name: impl Into<String>,
        children: Vec<TreeNode>,
        files: Vec<FileEntry>,
    ) -> Result<Self, TreeError> {
        let (node, mut issues) = Self::build(name, children, files);
        if issues.is_empty() {
            Ok(node)
        } else {
            Err(issues.remove(0))
        }
    }

    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Arc<TreeNode>] {
        &self.children
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn child(&self, name: &str) -> Option<&Arc<TreeNode>> {
        self.children.iter().find(|child| child.name == name)
    }
}

pub fn is_reserved_name(name: &str) -> bool {
    name == UP_TOKEN || name == "."
}

fn check_entry_name(parent: &str, name: &str) -> Result<(), TreeError> {
    if name.is_empty() {
        return Err(TreeError::EmptyName {
            parent: parent.to_string(),
        });
    }
    if is_reserved_name(name) {
        return Err(TreeError::ReservedName {
            parent: parent.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}
