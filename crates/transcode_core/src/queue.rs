//! Queue synchronization store.
//!
//! Presence of an item is decided by full poll listings only. Push events
//! may change the progress of an item that is already known and nothing else.

/// Progress is kept and shown with two decimals. Values too large to scale
/// are kept as reported.
pub fn round_progress(progress: f64) -> f64 {
    let scaled = progress * 100.0;
    if !scaled.is_finite() {
        return progress;
    }
    scaled.round() / 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub name: String,
    pub progress: f64,
}

impl QueueItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            progress: 0.0,
        }
    }
}

/// One entry of a full queue listing. Servers that do not track progress
/// omit it, in which case the local value is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct PollEntry {
    pub name: String,
    pub progress: Option<f64>,
}

impl PollEntry {
    pub fn new(name: impl Into<String>, progress: Option<f64>) -> Self {
        Self {
            name: name.into(),
            progress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    pub inserted: usize,
    pub updated: usize,
    pub removed: usize,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        self.inserted + self.updated + self.removed > 0
    }
}

/// Insertion-ordered collection of queue items keyed by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueueStore {
    items: Vec<QueueItem>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    /// Reconciles the store against a full listing. Listed items are
    /// inserted or updated; unlisted ones are removed. Surviving items keep
    /// their position and new ones are appended in listing order.
    pub fn merge_listing(&mut self, listing: &[PollEntry]) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        let before = self.items.len();
        self.items
            .retain(|item| listing.iter().any(|entry| entry.name == item.name));
        outcome.removed = before - self.items.len();

        for entry in listing {
            match self.items.iter_mut().find(|item| item.name == entry.name) {
                Some(item) => {
                    if let Some(progress) = entry.progress.map(round_progress) {
                        if !same_progress(item.progress, progress) {
                            item.progress = progress;
                            outcome.updated += 1;
                        }
                    }
                }
                None => {
                    let mut item = QueueItem::new(entry.name.clone());
                    if let Some(progress) = entry.progress {
                        item.progress = round_progress(progress);
                    }
                    self.items.push(item);
                    outcome.inserted += 1;
                }
            }
        }

        outcome
    }

    /// Applies a push progress event. Unknown names are discarded; returns
    /// whether the store changed.
    pub fn apply_push(&mut self, name: &str, progress: f64) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.name == name) else {
            return false;
        };
        let progress = round_progress(progress);
        if same_progress(item.progress, progress) {
            return false;
        }
        item.progress = progress;
        true
    }
}

fn same_progress(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
