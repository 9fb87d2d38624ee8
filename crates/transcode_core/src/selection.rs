use std::collections::HashSet;

use crate::cursor::ListingEntry;

/// Checked files of the listing currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    paths: HashSet<String>,
}

impl Selection {
    /// Flips the checked state of `path`. Returns the new state.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.paths.remove(path) {
            false
        } else {
            self.paths.insert(path.to_string());
            true
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Selected file paths in listing order.
    pub fn selected_in(&self, listing: &[ListingEntry]) -> Vec<String> {
        listing
            .iter()
            .filter_map(|entry| match entry {
                ListingEntry::File { path, .. } if self.paths.contains(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}
