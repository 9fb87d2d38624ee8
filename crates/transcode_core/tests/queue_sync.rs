use pretty_assertions::assert_eq;
use transcode_core::{PollEntry, QueueStore};

fn entry(name: &str, progress: f64) -> PollEntry {
    PollEntry::new(name, Some(progress))
}

fn names(store: &QueueStore) -> Vec<&str> {
    store.items().iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn poll_then_push_then_empty_poll() {
    let mut store = QueueStore::new();

    store.merge_listing(&[entry("job1", 0.0)]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("job1").unwrap().progress, 0.0);

    assert!(store.apply_push("job1", 42.5));
    assert_eq!(store.get("job1").unwrap().progress, 42.5);

    let outcome = store.merge_listing(&[]);
    assert_eq!(outcome.removed, 1);
    assert!(store.is_empty());
}

#[test]
fn push_before_any_poll_is_discarded() {
    let mut store = QueueStore::new();
    assert!(!store.apply_push("ghost", 10.0));
    assert!(store.is_empty());
}

#[test]
fn push_never_grows_the_store() {
    let mut store = QueueStore::new();
    store.merge_listing(&[entry("a", 1.0), entry("b", 2.0)]);

    for name in ["c", "d", "a", "e", "b"] {
        store.apply_push(name, 50.0);
        assert!(store.len() <= 2);
    }
    assert_eq!(names(&store), vec!["a", "b"]);
}

#[test]
fn merge_is_idempotent() {
    let listing = vec![entry("a", 10.0), entry("b", 20.25), PollEntry::new("c", None)];
    let mut store = QueueStore::new();
    store.merge_listing(&[entry("stale", 3.0)]);

    let first = store.merge_listing(&listing);
    assert!(first.changed());
    let after_first = store.clone();

    let second = store.merge_listing(&listing);
    assert!(!second.changed());
    assert_eq!(store, after_first);
}

#[test]
fn merge_inserts_updates_and_removes() {
    let mut store = QueueStore::new();
    store.merge_listing(&[entry("a", 1.0), entry("b", 2.0), entry("c", 3.0)]);

    let outcome = store.merge_listing(&[entry("c", 30.0), entry("new", 7.5), entry("a", 1.0)]);

    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.updated, 1);
    assert_eq!(outcome.removed, 1);
    assert_eq!(names(&store), vec!["a", "c", "new"]);
    assert_eq!(store.get("c").unwrap().progress, 30.0);
    assert_eq!(store.get("new").unwrap().progress, 7.5);
}

#[test]
fn push_values_are_rounded() {
    let mut store = QueueStore::new();
    store.merge_listing(&[entry("a", 0.0)]);

    assert!(store.apply_push("a", 33.333_33));
    assert_eq!(store.get("a").unwrap().progress, 33.33);
    assert!(!store.apply_push("a", 33.334));
}
