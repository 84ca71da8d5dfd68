use showstate::{
    path,
    path::{Path, PathBuf, Segment},
    value::Value,
};

use crate::helpers::show_tree;

#[test]
fn test_numeric_segments_index_lists() {
    let tree = show_tree();
    assert_eq!(
        tree.get("project.tracks.1.name"),
        Some(&Value::from("Audio"))
    );
    assert_eq!(tree.get("project.tracks.2"), None);
    assert_eq!(tree.get("project.tracks.01"), None);
}

#[test]
fn test_empty_path_is_root() {
    let tree = show_tree();
    assert!(Value::same(tree.get("").unwrap(), &tree));
    assert!(Value::same(tree.get("...").unwrap(), &tree));
}

#[test]
fn test_resolution_stops_at_leaves() {
    let tree = show_tree();
    assert_eq!(tree.get("ui.zoom.level"), None);
    assert_eq!(tree.get("audio.ctx.sampleRate"), None);
    assert_eq!(tree.get("missing.deeper"), None);
}

#[test]
fn test_path_macro_builds_paths() {
    let index = 1;
    let path = path!("project", "tracks", index, "name");
    assert_eq!(path.as_str(), "project.tracks.1.name");
    assert_eq!(
        show_tree().get(&path).and_then(Value::as_text),
        Some("Audio")
    );

    let literal: &Path = path!("ui.zoom");
    assert_eq!(literal.len(), 2);
    assert!(path!().is_empty());
}

#[test]
fn test_path_relations() {
    let path = PathBuf::normalize("project.settings.profiles");
    assert!(path.starts_with("project.settings"));
    assert!(!path.starts_with("project.set"));
    assert_eq!(path.parent().map(|p| p.to_string()), Some("project.settings".to_string()));
    assert_eq!(path.last(), Some("profiles"));

    let segments: Vec<Segment> = PathBuf::new().push("tracks").push_index(0).segments().collect();
    assert_eq!(segments, vec![Segment::Key("tracks".into()), Segment::Index(0)]);
}
