use showstate::{
    draft::produce,
    value::{List, Map, Value},
};

use crate::helpers::show_tree;

fn track_ids(tree: &Value) -> Vec<String> {
    tree.get("project.tracks")
        .and_then(Value::as_list)
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|track| track.get_as::<String>("id"))
                .collect()
        })
        .unwrap_or_default()
}

fn track(id: &str) -> Map {
    Map::new().with("id", id).with("clips", List::new())
}

#[test]
fn test_push_and_insert() {
    let base = show_tree();
    let (next, len) = produce(&base, |draft| {
        draft.insert("project.tracks", 0, track("t0"))?;
        draft.push("project.tracks", track("t3"))
    })
    .unwrap();

    assert_eq!(len, 4);
    assert_eq!(track_ids(&next), vec!["t0", "t1", "t2", "t3"]);
    // Existing items are moved, not copied
    assert!(Value::same(
        next.get("project.tracks.1").unwrap(),
        base.get("project.tracks.0").unwrap()
    ));
}

#[test]
fn test_set_at_length_appends() {
    let base = show_tree();
    let (next, _) = produce(&base, |draft| {
        draft.set("project.tracks.2", track("t3"))?;
        Ok(())
    })
    .unwrap();
    assert_eq!(track_ids(&next), vec!["t1", "t2", "t3"]);

    let err = produce(&base, |draft| draft.set("project.tracks.5", track("t9"))).unwrap_err();
    assert!(err.is_out_of_bounds());
}

#[test]
fn test_remove_by_predicate() {
    let base = show_tree();
    let (next, removed) = produce(&base, |draft| {
        let Some(index) = draft.position("project.tracks", |track| {
            track.get_as::<String>("id").as_deref() == Some("t1")
        }) else {
            return Ok(None);
        };
        draft.remove(format!("project.tracks.{index}"))
    })
    .unwrap();

    assert_eq!(removed.and_then(|t| t.get_as::<String>("name")), Some("Lights".to_string()));
    assert_eq!(track_ids(&next), vec!["t2"]);
}

#[test]
fn test_nested_list_append() {
    let base = show_tree();
    let clip = Map::new().with("start", 0.0).with("duration", 4.0);
    let (next, _) = produce(&base, |draft| {
        draft.push("project.tracks.1.clips", clip.clone())?;
        Ok(())
    })
    .unwrap();

    assert_eq!(
        next.get("project.tracks.1.clips.0.duration"),
        Some(&Value::Float(4.0))
    );
    assert!(Value::same(
        next.get("project.tracks.0").unwrap(),
        base.get("project.tracks.0").unwrap()
    ));
}

#[test]
fn test_splice_and_retain() {
    let base: Value = Map::new()
        .with("selection", List::from(vec![Value::from("a"), Value::from("b"), Value::from("c")]))
        .into();
    let (next, (spliced, dropped)) = produce(&base, |draft| {
        let spliced = draft.splice("selection", 1, 1, ["x", "y"])?;
        let dropped = draft.retain("selection", |item| item != "c")?;
        Ok((spliced, dropped))
    })
    .unwrap();

    assert_eq!(spliced, vec![Value::from("b")]);
    assert_eq!(dropped, 1);
    let items: Vec<&str> = next
        .get("selection")
        .and_then(Value::as_list)
        .map(|list| list.iter().filter_map(Value::as_text).collect())
        .unwrap_or_default();
    assert_eq!(items, vec!["a", "x", "y"]);
}

#[test]
fn test_clearing_an_empty_list_is_a_no_op() {
    let base = show_tree();
    let (next, _) = produce(&base, |draft| {
        draft.truncate("selection", 0)?;
        draft.pop("selection")?;
        Ok(())
    })
    .unwrap();
    assert!(Value::same(&next, &base));
}
