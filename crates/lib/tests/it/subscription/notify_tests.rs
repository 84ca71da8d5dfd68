use std::rc::Rc;

use showstate::{UpdateOptions, Value};

use crate::helpers::{ChangeRecorder, Recorder, counter_store, record_change, show_store};

#[test]
fn test_scoped_listeners_run_before_global_ones() {
    let store = show_store();
    let order = Recorder::<&'static str>::new();

    let log = order.clone();
    let _g1 = store.subscribe(move |_| log.record("global-1"));
    let log = order.clone();
    let _p1 = store.subscribe_to("ui", move |_, _| log.record("ui"));
    let log = order.clone();
    let _g2 = store.subscribe(move |_| log.record("global-2"));
    let log = order.clone();
    let _p2 = store.subscribe_to("ui.zoom", move |_, _| log.record("ui.zoom"));

    store.set("ui.zoom", 3).unwrap();
    assert_eq!(order.calls(), vec!["ui", "ui.zoom", "global-1", "global-2"]);
}

#[test]
fn test_global_listener_receives_next_tree() {
    let store = counter_store();
    let trees = Recorder::<Value>::new();
    let sink = trees.clone();
    let _sub = store.subscribe(move |tree| sink.record(tree.clone()));

    store.set("count", 1).unwrap();
    assert_eq!(trees.count(), 1);
    assert!(Value::same(&trees.calls()[0], &store.state()));
}

#[test]
fn test_undo_notifies_even_for_silent_edits() {
    let store = show_store();
    let zoom = ChangeRecorder::new();
    let globals = Recorder::<()>::new();
    let sink = globals.clone();
    let _p = store.subscribe_to("ui.zoom", record_change(&zoom));
    let _g = store.subscribe(move |_| sink.record(()));

    store
        .set_with("ui.zoom", 5, UpdateOptions::skip_notify())
        .unwrap();
    assert_eq!(zoom.count(), 0);
    assert_eq!(globals.count(), 0);

    store.undo().unwrap();
    assert_eq!(
        zoom.calls(),
        vec![(Some(Value::Int(100)), Some(Value::Int(5)))]
    );
    assert_eq!(globals.count(), 1);

    store.redo().unwrap();
    assert_eq!(zoom.count(), 2);
    assert_eq!(globals.count(), 2);
}

#[test]
fn test_failed_undo_does_not_notify() {
    let store = show_store();
    let globals = Recorder::<()>::new();
    let sink = globals.clone();
    let _g = store.subscribe(move |_| sink.record(()));
    assert!(!store.undo().unwrap());
    assert!(!store.redo().unwrap());
    assert_eq!(globals.count(), 0);
}

#[test]
fn test_dropping_guard_unsubscribes() {
    let store = show_store();
    let calls = Recorder::<()>::new();
    let sink = calls.clone();
    let sub = store.subscribe(move |_| sink.record(()));

    store.set("ui.zoom", 1).unwrap();
    drop(sub);
    store.set("ui.zoom", 2).unwrap();

    assert_eq!(calls.count(), 1);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn test_explicit_dispose() {
    let store = show_store();
    let zoom = ChangeRecorder::new();
    let sub = store.subscribe_to("ui.zoom", record_change(&zoom));
    assert!(sub.is_active());
    sub.dispose();

    store.set("ui.zoom", 1).unwrap();
    assert_eq!(zoom.count(), 0);
}

#[test]
fn test_subscriber_can_read_and_update_the_store() {
    let store = Rc::new(counter_store());
    let seen = Recorder::<i64>::new();

    let watcher = Rc::clone(&store);
    let sink = seen.clone();
    let _sub = store.subscribe_to("count", move |next, _| {
        let count = next.and_then(Value::as_int).unwrap_or_default();
        sink.record(count);
        // Reading from inside a callback sees the committed tree
        assert_eq!(watcher.get_as::<i64>("count"), Some(count));
        // Clamp as a follow-up commit
        if count > 10 {
            watcher.set("count", 10).unwrap();
        }
    });

    store.set("count", 50).unwrap();
    assert_eq!(store.get_as::<i64>("count"), Some(10));
    assert_eq!(seen.calls(), vec![50, 10]);
    assert_eq!(store.history_info().undo_count, 2);
}

#[test]
fn test_subscriber_can_unsubscribe_others_while_notified() {
    let store = Rc::new(show_store());
    let calls = Recorder::<()>::new();
    let sink = calls.clone();
    let victim = Rc::new(std::cell::RefCell::new(Some(
        store.subscribe(move |_| sink.record(())),
    )));

    let slot = Rc::clone(&victim);
    let _killer = store.subscribe_to("ui.zoom", move |_, _| {
        slot.borrow_mut().take();
    });

    // The victim was already scheduled for this commit
    store.set("ui.zoom", 1).unwrap();
    assert_eq!(calls.count(), 1);
    store.set("ui.zoom", 2).unwrap();
    assert_eq!(calls.count(), 1);
    assert_eq!(store.subscriber_count(), 1);
}
