use std::sync::Arc;

use showstate::value::{Handle, List, Map, Value};

use crate::helpers::{AudioContext, show_tree, show_tree_with};

#[test]
fn test_same_is_identity_for_composites() {
    let tree = show_tree();
    let copy = tree.clone();
    let rebuilt = show_tree_with(tree.get("audio.ctx").and_then(Value::as_handle).unwrap().clone());

    assert!(Value::same(&tree, &copy));
    assert!(!Value::same(&tree, &rebuilt));
    // Structurally equal all the same
    assert_eq!(tree, rebuilt);
}

#[test]
fn test_same_compares_scalars_by_value() {
    assert!(Value::same(&Value::Int(3), &Value::Int(3)));
    assert!(Value::same(&Value::from("a"), &Value::from("a")));
    assert!(!Value::same(&Value::Int(1), &Value::Float(1.0)));
    assert!(Value::same(&Value::Float(f64::NAN), &Value::Float(f64::NAN)));
    assert!(Value::same_opt(None, None));
    assert!(!Value::same_opt(Some(&Value::Null), None));
}

#[test]
fn test_handles_compare_by_identity() {
    let a = Handle::new(AudioContext { sample_rate: 44_100 });
    let b = Handle::new(AudioContext { sample_rate: 44_100 });
    assert!(Value::same(&Value::from(a.clone()), &Value::from(a.clone())));
    assert!(!Value::same(&Value::from(a.clone()), &Value::from(b)));

    let ctx = a.downcast_ref::<AudioContext>().unwrap();
    assert_eq!(ctx.sample_rate, 44_100);
    assert!(a.downcast_ref::<String>().is_none());
}

#[test]
fn test_handle_from_shared_arc() {
    let shared = Arc::new(AudioContext { sample_rate: 96_000 });
    let handle = Handle::from_arc(Arc::clone(&shared));
    let back = handle.downcast_arc::<AudioContext>().unwrap();
    assert!(Arc::ptr_eq(&shared, &back));
}

#[test]
fn test_typed_reads() {
    let tree = show_tree();
    assert_eq!(tree.get_as::<i64>("ui.zoom"), Some(100));
    assert_eq!(tree.get_as::<f64>("ui.gridSize"), Some(0.25));
    assert_eq!(tree.get_as::<bool>("ui.snapEnabled"), Some(true));
    assert_eq!(tree.get_as::<String>("project.name"), Some("Untitled Show".to_string()));
    assert_eq!(tree.get_as::<i64>("project.name"), None);
    assert_eq!(tree.get_as::<List>("selection").map(|l| l.len()), Some(0));
    assert!(tree.get_as::<Map>("project.settings").is_some());
}

#[test]
fn test_conversion_error_reports_types() {
    let value = Value::from("text");
    let err = i64::try_from(&value).unwrap_err();
    assert!(err.is_type_error());
    assert!(err.to_string().contains("text"));
}

#[test]
fn test_maps_keep_insertion_order() {
    let map = Map::new().with("zeta", 1).with("alpha", 2).with("mid", 3);
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_json_round_trip_preserves_plain_data() {
    let tree = show_tree();
    let json = tree.to_json();
    assert_eq!(json["project"]["tracks"][0]["id"], "t1");
    assert!(json["audio"]["ctx"].is_null());

    let back = Value::from(json);
    assert_eq!(back.get("project"), tree.get("project"));
    assert_eq!(back.get("audio.ctx"), Some(&Value::Null));
}
