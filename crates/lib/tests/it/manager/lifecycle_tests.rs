use showstate::{StateManager, StoreConfig, Value, value::Map};

use crate::helpers::{Recorder, show_store, show_tree};

#[test]
fn test_reset_replaces_tree_and_history() {
    let store = show_store();
    store.set("ui.zoom", 10).unwrap();
    let trees = Recorder::<Value>::new();
    let sink = trees.clone();
    let _sub = store.subscribe(move |tree| sink.record(tree.clone()));

    let fresh: Value = Map::new().with("project", Map::new().with("name", "New")).into();
    store.reset(fresh.clone()).unwrap();

    assert!(Value::same(&store.state(), &fresh));
    assert!(!store.history_info().can_undo);
    assert!(!store.undo().unwrap());
    assert_eq!(trees.count(), 1);
    assert!(Value::same(&trees.calls()[0], &fresh));
}

#[test]
fn test_reset_inside_update_is_rejected() {
    let store = show_store();
    let err = store
        .update(|_| {
            store.reset(show_tree())?;
            Ok(())
        })
        .unwrap_err();
    assert!(err.is_reentrant());
}

#[test]
fn test_teardown_disposes_everything() {
    let store = show_store();
    let calls = Recorder::<()>::new();
    let global = calls.clone();
    let scoped = calls.clone();
    let global_sub = store.subscribe(move |_| global.record(()));
    store
        .subscribe_to("ui", move |_, _| scoped.record(()))
        .detach();
    store.set("ui.zoom", 1).unwrap();
    assert_eq!(calls.count(), 2);
    assert_eq!(store.subscriber_count(), 2);

    store.teardown();
    assert_eq!(store.subscriber_count(), 0);
    assert!(!global_sub.is_active());
    assert!(!store.history_info().can_undo);

    store.set("ui.zoom", 2).unwrap();
    assert_eq!(calls.count(), 2);
    // Dropping a guard after teardown is harmless
    global_sub.dispose();
    assert_eq!(store.get_as::<i64>("ui.zoom"), Some(2));
}

#[test]
fn test_guard_outlives_store() {
    let store = show_store();
    let sub = store.subscribe(|_| {});
    drop(store);
    assert!(!sub.is_active());
    drop(sub);
}

#[test]
fn test_config_is_applied() {
    let config = StoreConfig {
        max_history: 3,
        path_cache_capacity: 0,
    };
    let store = StateManager::with_config(Map::new().with("count", 0), config.clone());
    assert_eq!(store.config(), config);

    for count in 1..=5 {
        store.set("count", count).unwrap();
    }
    assert_eq!(store.history_info().undo_count, 3);
    // Reads work without a path cache
    assert_eq!(store.get_as::<i64>("count"), Some(5));
}

#[test]
fn test_store_is_shareable_by_rc() {
    use std::rc::Rc;

    let store = Rc::new(show_store());
    let controller = {
        let store = Rc::clone(&store);
        move |zoom: i64| store.set("ui.zoom", zoom)
    };
    controller(64).unwrap();
    assert_eq!(store.get_as::<i64>("ui.zoom"), Some(64));
}
