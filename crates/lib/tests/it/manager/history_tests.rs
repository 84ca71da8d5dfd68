use showstate::{HistoryInfo, UpdateOptions, Value};

use crate::helpers::{counter_store, show_store, show_store_with_history};

#[test]
fn test_counter_scenario() {
    let store = counter_store();
    store.set("count", 1).unwrap();
    store.set("count", 2).unwrap();

    assert!(store.undo().unwrap());
    assert_eq!(store.get_as::<i64>("count"), Some(1));
    assert!(store.undo().unwrap());
    assert_eq!(store.get_as::<i64>("count"), Some(0));
    assert!(!store.undo().unwrap());
    assert_eq!(store.get_as::<i64>("count"), Some(0));

    assert!(store.redo().unwrap());
    assert_eq!(store.get_as::<i64>("count"), Some(1));
    assert!(store.redo().unwrap());
    assert_eq!(store.get_as::<i64>("count"), Some(2));
    assert!(!store.redo().unwrap());
    assert_eq!(store.get_as::<i64>("count"), Some(2));
}

#[test]
fn test_round_trip_restores_trees() {
    let store = show_store();
    let initial = store.state();

    store.set("ui.zoom", 50).unwrap();
    store.set("project.name", "Finale").unwrap();
    store
        .update(|draft| {
            draft.push("selection", "t2")?;
            draft.remove("project.tracks.0")?;
            Ok(())
        })
        .unwrap();
    let last = store.state();

    for _ in 0..3 {
        assert!(store.undo().unwrap());
    }
    assert_eq!(store.state(), initial);
    // Undo reinstates the very same tree
    assert!(Value::same(&store.state(), &initial));

    for _ in 0..3 {
        assert!(store.redo().unwrap());
    }
    assert!(Value::same(&store.state(), &last));
}

#[test]
fn test_history_is_bounded() {
    let store = show_store_with_history(50);
    for zoom in 1..=60 {
        store.set("ui.zoom", zoom).unwrap();
    }
    assert_eq!(store.history_info().undo_count, 50);

    for _ in 0..50 {
        assert!(store.undo().unwrap());
    }
    assert!(!store.undo().unwrap());
    // The ten oldest steps were evicted
    assert_eq!(store.get_as::<i64>("ui.zoom"), Some(10));
}

#[test]
fn test_zero_history_disables_undo() {
    let store = show_store_with_history(0);
    store.set("ui.zoom", 1).unwrap();
    assert!(!store.undo().unwrap());
    assert_eq!(store.get_as::<i64>("ui.zoom"), Some(1));
}

#[test]
fn test_new_edit_invalidates_redo() {
    let store = counter_store();
    store.set("count", 1).unwrap();
    store.set("count", 2).unwrap();
    store.undo().unwrap();
    assert!(store.history_info().can_redo);

    store.set("count", 3).unwrap();
    assert!(!store.history_info().can_redo);
    assert!(!store.redo().unwrap());
    assert_eq!(store.get_as::<i64>("count"), Some(3));
}

#[test]
fn test_skip_history_edit_is_dropped_by_undo() {
    let store = show_store();
    store.set("ui.zoom", 80).unwrap();
    store
        .set_with("playback.currentTime", 42.0, UpdateOptions::skip_history())
        .unwrap();
    assert_eq!(store.history_info().undo_count, 1);

    assert!(store.undo().unwrap());
    assert_eq!(store.get_as::<i64>("ui.zoom"), Some(100));
    // Restored to the tree before the zoom edit, so the playhead moves back too
    assert_eq!(store.get_as::<f64>("playback.currentTime"), Some(0.0));
}

#[test]
fn test_skip_history_does_not_clear_redo() {
    let store = counter_store();
    store.set("count", 1).unwrap();
    store.undo().unwrap();
    store
        .set_with("transient", true, UpdateOptions::skip_history())
        .unwrap();
    assert!(store.history_info().can_redo);
}

#[test]
fn test_history_info_tracks_both_stacks() {
    let store = counter_store();
    assert_eq!(store.history_info(), HistoryInfo::default());

    store.set("count", 1).unwrap();
    store.set("count", 2).unwrap();
    store.undo().unwrap();
    assert_eq!(
        store.history_info(),
        HistoryInfo {
            undo_count: 1,
            redo_count: 1,
            can_undo: true,
            can_redo: true,
        }
    );

    store.clear_history();
    assert_eq!(store.history_info(), HistoryInfo::default());
    assert_eq!(store.get_as::<i64>("count"), Some(1));
}

#[test]
fn test_shrinking_history_keeps_newest() {
    let store = counter_store();
    for count in 1..=10 {
        store.set("count", count).unwrap();
    }
    store.set_max_history(2);
    assert!(store.undo().unwrap());
    assert!(store.undo().unwrap());
    assert!(!store.undo().unwrap());
    assert_eq!(store.get_as::<i64>("count"), Some(8));
}
