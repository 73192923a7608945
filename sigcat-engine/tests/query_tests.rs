use pretty_assertions::assert_eq;
use sigcat_engine::{
    custom_entries, list_apis, list_children, orphaned_entries, search, stats,
    used_by_prototype, ApiView, CatalogStats, FlattenFilter, Origin, Page,
};
use sigcat_model::{BaseCatalog, Model, Node, OverlayMap};
use sigcat_types::{CatalogPath, DataType, NodeKind};
use std::collections::HashSet;

const BASE: &str = r#"{
    "Vehicle": {
        "type": "branch",
        "children": {
            "Speed": {"type": "sensor", "datatype": "float"},
            "Cabin": {
                "type": "branch",
                "children": {
                    "Light": {"type": "branch"},
                    "Door": {"type": "branch",
                        "children": {"IsOpen": {"type": "sensor", "datatype": "boolean"}}}
                }
            }
        }
    }
}"#;

fn model(overlay: OverlayMap) -> Model {
    Model::new("m", "Vehicle", BaseCatalog::from_json(BASE).unwrap(), overlay).unwrap()
}

fn cabin_overlay() -> OverlayMap {
    let mut overlay = OverlayMap::new();
    overlay.insert("Vehicle.Cabin", "CustomDome", Node::actuator(DataType::Boolean, ""));
    overlay.insert("Vehicle.Cabin", "AmbientMood", Node::branch(""));
    overlay.insert("Vehicle.Cabin.AmbientMood", "Hue", Node::actuator(DataType::Uint16, ""));
    overlay
}

fn names(m: &Model, path: &str, filter: &FlattenFilter) -> Vec<String> {
    list_children(m, &CatalogPath::from_dotted(path), filter)
        .into_iter()
        .map(|c| c.name.to_string())
        .collect()
}

// ── list_children ────────────────────────────────────────────────

#[test]
fn merges_base_and_overlay_children() {
    let m = model(cabin_overlay());
    assert_eq!(
        names(&m, "Vehicle.Cabin", &FlattenFilter::all()),
        ["Light", "Door", "CustomDome", "AmbientMood"]
    );
}

#[test]
fn marks_custom_children() {
    let m = model(cabin_overlay());
    let children = list_children(&m, &CatalogPath::from_dotted("Vehicle.Cabin"), &FlattenFilter::all());
    let custom: Vec<bool> = children.iter().map(|c| c.is_custom).collect();
    assert_eq!(custom, [false, false, true, true]);
}

#[test]
fn lists_children_of_custom_branch() {
    let m = model(cabin_overlay());
    assert_eq!(
        names(&m, "Vehicle.Cabin.AmbientMood", &FlattenFilter::all()),
        ["Hue"]
    );
}

#[test]
fn empty_for_leaf_and_unknown_paths() {
    let m = model(cabin_overlay());
    assert!(names(&m, "Vehicle.Speed", &FlattenFilter::all()).is_empty());
    assert!(names(&m, "Vehicle.Nowhere", &FlattenFilter::all()).is_empty());
    assert!(names(&m, "Vehicle.Cabin.Light", &FlattenFilter::all()).is_empty());
}

#[test]
fn child_filter_by_kind_and_origin() {
    let m = model(cabin_overlay());
    assert_eq!(
        names(&m, "Vehicle.Cabin", &FlattenFilter::all().with_kind(NodeKind::Branch)),
        ["Light", "Door", "AmbientMood"]
    );
    assert_eq!(
        names(&m, "Vehicle.Cabin", &FlattenFilter::all().with_origin(Origin::Custom)),
        ["CustomDome", "AmbientMood"]
    );
}

// ── search ───────────────────────────────────────────────────────

fn hit_paths(hits: Vec<sigcat_engine::FlatEntry<'_>>) -> Vec<String> {
    hits.into_iter().map(|e| e.path.to_dotted()).collect()
}

#[test]
fn search_is_case_insensitive_on_path() {
    let m = model(cabin_overlay());
    assert_eq!(
        hit_paths(search(&m, "cabin.door", None, Page::ALL)),
        ["Vehicle.Cabin.Door", "Vehicle.Cabin.Door.IsOpen"]
    );
}

#[test]
fn search_matches_leaf_name() {
    let m = model(cabin_overlay());
    assert_eq!(
        hit_paths(search(&m, "HUE", None, Page::ALL)),
        ["Vehicle.Cabin.AmbientMood.Hue"]
    );
}

#[test]
fn search_with_kind_filter() {
    let m = model(cabin_overlay());
    assert_eq!(
        hit_paths(search(&m, "", Some(NodeKind::Actuator), Page::ALL)),
        ["Vehicle.Cabin.CustomDome", "Vehicle.Cabin.AmbientMood.Hue"]
    );
}

#[test]
fn search_pages_results() {
    let m = model(cabin_overlay());
    let all = hit_paths(search(&m, "vehicle", None, Page::ALL));
    let second = hit_paths(search(&m, "vehicle", None, Page::new(2, 3)));
    assert_eq!(second, all[2..5].to_vec());
}

#[test]
fn search_without_hits_is_empty() {
    let m = model(cabin_overlay());
    assert!(search(&m, "zzz", None, Page::ALL).is_empty());
}

// ── in-use view ──────────────────────────────────────────────────

#[test]
fn used_by_prototype_intersects() {
    let m = model(cabin_overlay());
    let used: HashSet<String> = ["Vehicle.Speed", "Vehicle.Cabin.CustomDome", "Vehicle.Removed"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(
        hit_paths(used_by_prototype(&m, &used, Page::ALL)),
        ["Vehicle.Speed", "Vehicle.Cabin.CustomDome"]
    );
    assert!(used_by_prototype(&m, &HashSet::new(), Page::ALL).is_empty());
}

#[test]
fn list_apis_toggle() {
    let m = model(cabin_overlay());
    let used: HashSet<String> = HashSet::from(["Vehicle.Speed".to_string()]);
    assert_eq!(list_apis(&m, ApiView::All, Page::ALL).len(), 9);
    assert_eq!(
        hit_paths(list_apis(&m, ApiView::InUse(&used), Page::ALL)),
        ["Vehicle.Speed"]
    );
}

// ── stats / orphans ──────────────────────────────────────────────

#[test]
fn stats_count_merged_namespace() {
    let m = model(cabin_overlay());
    assert_eq!(
        stats(&m),
        CatalogStats {
            branches: 5,
            sensors: 2,
            actuators: 2,
            attributes: 0,
            base: 6,
            custom: 3,
        }
    );
    assert_eq!(stats(&m).total(), 9);
}

#[test]
fn orphans_include_entries_below_unreachable_custom_branches() {
    let mut overlay = cabin_overlay();
    overlay.insert("Vehicle.Gone", "Lost", Node::branch(""));
    overlay.insert("Vehicle.Gone.Lost", "Deeper", Node::sensor(DataType::Float, ""));
    overlay.insert("Vehicle.Speed", "UnderLeaf", Node::sensor(DataType::Float, ""));
    let m = model(overlay);

    assert_eq!(
        orphaned_entries(&m),
        ["Vehicle.Gone.Lost", "Vehicle.Gone.Lost.Deeper", "Vehicle.Speed.UnderLeaf"]
    );
}

#[test]
fn custom_entries_in_walk_order() {
    let m = model(cabin_overlay());
    assert_eq!(
        hit_paths(custom_entries(&m, Page::ALL)),
        [
            "Vehicle.Cabin.CustomDome",
            "Vehicle.Cabin.AmbientMood",
            "Vehicle.Cabin.AmbientMood.Hue",
        ]
    );
}
