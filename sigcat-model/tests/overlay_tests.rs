use pretty_assertions::assert_eq;
use sigcat_model::{ModelError, Node, OverlayMap};
use sigcat_types::{CatalogPath, DataType};

fn dome() -> Node {
    Node::actuator(DataType::Boolean, "Custom dome light")
}

// ── Insert / lookup / remove ─────────────────────────────────────

#[test]
fn insert_and_get() {
    let mut overlay = OverlayMap::new();
    assert!(overlay.insert("Vehicle.Cabin", "CustomDome", dome()).is_none());

    assert!(overlay.contains("Vehicle.Cabin", "CustomDome"));
    assert_eq!(overlay.get("Vehicle.Cabin", "CustomDome"), Some(&dome()));
    assert_eq!(
        overlay.get_path(&CatalogPath::from_dotted("Vehicle.Cabin.CustomDome")),
        Some(&dome())
    );
    assert_eq!(overlay.len(), 1);
}

#[test]
fn get_path_on_root_is_none() {
    let overlay = OverlayMap::new();
    assert!(overlay.get_path(&CatalogPath::root("Vehicle")).is_none());
}

#[test]
fn remove_drops_empty_bucket() {
    let mut overlay = OverlayMap::new();
    overlay.insert("Vehicle", "A", dome());
    assert_eq!(overlay.remove("Vehicle", "A"), Some(dome()));
    assert!(overlay.is_empty());
    assert_eq!(overlay.parents().count(), 0);
    assert!(overlay.remove("Vehicle", "A").is_none());
}

#[test]
fn children_keep_insertion_order() {
    let mut overlay = OverlayMap::new();
    overlay.insert("Vehicle", "Zulu", dome());
    overlay.insert("Vehicle", "Alpha", dome());
    overlay.insert("Vehicle", "Mike", dome());
    overlay.remove("Vehicle", "Alpha");

    let names: Vec<&str> = overlay.children_of("Vehicle").map(|(n, _)| n).collect();
    assert_eq!(names, ["Zulu", "Mike"]);
    assert!(overlay.has_children("Vehicle"));
    assert!(!overlay.has_children("Vehicle.Cabin"));
}

#[test]
fn entries_lists_every_bucket_flat() {
    let mut overlay = OverlayMap::new();
    overlay.insert("Vehicle", "Custom", Node::branch(""));
    overlay.insert("Vehicle.Custom", "Inner", dome());
    overlay.insert("Vehicle.Cabin", "CustomDome", dome());

    let paths: Vec<String> = overlay.entries().map(|e| e.full_path()).collect();
    assert_eq!(
        paths,
        ["Vehicle.Custom", "Vehicle.Custom.Inner", "Vehicle.Cabin.CustomDome"]
    );
}

#[test]
fn descendants_respect_segment_boundaries() {
    let mut overlay = OverlayMap::new();
    overlay.insert("Vehicle", "Custom", Node::branch(""));
    overlay.insert("Vehicle.Custom", "Inner", Node::branch(""));
    overlay.insert("Vehicle.Custom.Inner", "Deep", dome());
    overlay.insert("Vehicle.CustomOther", "X", dome());

    let paths: Vec<String> = overlay
        .descendants_of("Vehicle.Custom")
        .map(|e| e.full_path())
        .collect();
    assert_eq!(paths, ["Vehicle.Custom.Inner", "Vehicle.Custom.Inner.Deep"]);
}

// ── Persisted form ───────────────────────────────────────────────

#[test]
fn json_roundtrip() {
    let mut overlay = OverlayMap::new();
    overlay.insert("Vehicle.Cabin", "CustomDome", dome());
    let json = overlay.to_json().unwrap();
    assert_eq!(OverlayMap::from_json(&json).unwrap(), overlay);
}

#[test]
fn from_json_drops_empty_buckets() {
    let json = r#"{
        "Vehicle": {"Custom": {"type": "branch"}},
        "Vehicle.Empty": {}
    }"#;
    let overlay = OverlayMap::from_json(json).unwrap();
    assert_eq!(overlay.parents().collect::<Vec<_>>(), ["Vehicle"]);
    assert_eq!(overlay.len(), 1);
}

// ── Load validation ──────────────────────────────────────────────

#[test]
fn from_json_rejects_branch_with_inline_children() {
    let json = r#"{
        "Vehicle": {
            "Custom": {
                "type": "branch",
                "children": {"Inner": {"type": "sensor", "datatype": "float"}}
            }
        }
    }"#;
    assert!(matches!(
        OverlayMap::from_json(json),
        Err(ModelError::InvalidNode(msg)) if msg.contains("Vehicle.Custom")
    ));
}

#[test]
fn from_json_rejects_dotted_or_empty_leaf_names() {
    for leaf in ["A.B", ""] {
        let json = format!(r#"{{"Vehicle": {{"{leaf}": {{"type": "branch"}}}}}}"#);
        assert!(
            matches!(OverlayMap::from_json(&json), Err(ModelError::InvalidName(_))),
            "{leaf:?}"
        );
    }
}

#[test]
fn from_json_rejects_malformed_parent_paths() {
    for parent in ["", "Vehicle.", ".Vehicle", "Vehicle..Cabin"] {
        let json = format!(r#"{{"{parent}": {{"X": {{"type": "branch"}}}}}}"#);
        assert!(
            matches!(OverlayMap::from_json(&json), Err(ModelError::InvalidName(_))),
            "{parent:?}"
        );
    }
}

#[test]
fn validate_accepts_built_overlay() {
    let mut overlay = OverlayMap::new();
    overlay.insert("Vehicle.Cabin", "Dome", dome());
    overlay.insert("Vehicle-2", "Custom", Node::branch(""));
    assert!(overlay.validate().is_ok());

    overlay.insert("Vehicle", "Bad.Name", dome());
    assert!(overlay.validate().is_err());
}
