//! Integration tests for branching undo/redo through the editor core.

use glam::Vec3;
use scene_editor_lib::fixtures;
use scene_editor_lib::harness::TestHarness;
use scene_editor_lib::state::{Action, EditorEvent, HistoryValue, Property};

fn three_models() -> TestHarness {
    TestHarness::with_project(&fixtures::project_three_models()).unwrap()
}

fn set_position(h: &mut TestHarness, id: &str, pos: [f32; 3]) -> bool {
    h.core
        .set_property(id, Property::Position, HistoryValue::Vec3(Vec3::from(pos)))
}

#[test]
fn test_undo_redo_inverse_law() {
    let mut h = three_models();
    assert!(set_position(&mut h, "a", [1.0, 2.0, 3.0]));

    assert!(h.core.undo());
    assert_eq!(h.position("a"), Vec3::ZERO);

    assert!(h.core.redo());
    assert_eq!(h.position("a"), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_null_edit_is_not_recorded() {
    let mut h = three_models();
    let before = h.core.kill_ring().current();
    assert!(!set_position(&mut h, "b", [2.0, 0.0, 0.0]));
    assert_eq!(h.history_depth(), 0);
    assert_eq!(h.core.kill_ring().current(), before);
    assert!(!h.core.is_dirty());
}

#[test]
fn test_undo_at_root_and_redo_without_children_are_noops() {
    let mut h = three_models();
    assert!(!h.core.undo());
    assert!(!h.core.redo());
    assert!(!h.core.cycle_redo());
    assert!(!h.core.is_dirty());
    assert!(h.events().is_empty());
}

#[test]
fn test_new_action_after_undo_keeps_old_branch() {
    let mut h = three_models();
    set_position(&mut h, "a", [1.0, 0.0, 0.0]);
    h.core.undo();
    set_position(&mut h, "a", [2.0, 0.0, 0.0]);

    let ring = h.core.kill_ring();
    let root = ring.root();
    assert_eq!(ring.children(root).len(), 2);
    let next = ring.next_redo(root).unwrap();
    assert_eq!(ring.record(next).unwrap().new, HistoryValue::Vec3(Vec3::new(2.0, 0.0, 0.0)));
    assert_eq!(ring.current(), next);

    // step sideways onto the older branch
    assert!(h.core.cycle_redo());
    assert_eq!(h.position("a"), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(h.history_depth(), 1);

    // and back again
    assert!(h.core.cycle_redo());
    assert_eq!(h.position("a"), Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_cycle_redo_with_single_branch_reapplies_it() {
    let mut h = three_models();
    set_position(&mut h, "c", [4.0, 1.0, 0.0]);
    assert!(h.core.cycle_redo());
    assert_eq!(h.position("c"), Vec3::new(4.0, 1.0, 0.0));
    assert_eq!(h.core.kill_ring().len(), 1);
}

#[test]
fn test_kill_undo_restores_light() {
    let mut h = TestHarness::with_project(&fixtures::project_hierarchy()).unwrap();
    assert!(h.core.registry().lights().contains("lamp"));

    assert_eq!(h.core.remove(&["lamp".to_string()], true), 1);
    assert!(!h.exists("lamp"));
    assert!(h.core.registry().lights().is_empty());

    assert!(h.core.undo());
    assert!(h.exists("lamp"));
    assert!(h.core.registry().lights().contains("lamp"));

    assert!(h.core.redo());
    assert!(!h.exists("lamp"));
    assert!(h.core.registry().lights().is_empty());
}

#[test]
fn test_remove_parent_hides_and_deselects_child() {
    let mut h = TestHarness::with_project(&fixtures::project_hierarchy()).unwrap();
    h.core.select("child", false);

    h.core.remove(&["parent".to_string()], true);
    assert!(!h.exists("child"));
    assert!(h.selected().is_empty());

    h.core.undo();
    assert!(h.exists("child"));
    assert!(h.selected().is_empty());
}

#[test]
fn test_remove_without_record_leaves_history_alone() {
    let mut h = three_models();
    assert_eq!(h.core.remove(&["a".to_string()], false), 1);
    assert!(!h.exists("a"));
    assert_eq!(h.history_depth(), 0);
    assert!(h.core.is_dirty());
}

#[test]
fn test_undo_add_stashes_and_deselects() {
    let mut h = TestHarness::new();
    let id = h.add_model("Box", [0.0; 3]);
    h.core.select(&id, false);

    assert!(h.core.undo());
    assert!(!h.exists(&id));
    assert!(h.core.registry().contains(&id));
    assert!(h.selected().is_empty());

    assert!(h.core.redo());
    assert!(h.exists(&id));
}

#[test]
fn test_copy_paste_under_primary_and_undo() {
    let mut h = three_models();
    h.core.select("a", false);
    assert_eq!(h.core.copy_elements(), 1);
    h.core.select("b", false);

    let pasted = h.core.paste_elements();
    assert_eq!(pasted.len(), 1);
    let copy = &pasted[0];
    assert_ne!(copy, "a");
    assert_eq!(h.core.get(copy).unwrap().parent.as_deref(), Some("b"));
    assert_eq!(h.selected(), pasted);

    let record = h.core.kill_ring().current_record().unwrap();
    assert_eq!(record.action, Action::Copy);

    assert!(h.core.undo());
    assert!(!h.exists(copy));
    assert!(h.core.redo());
    assert!(h.exists(copy));

    // the copy buffer survives a paste
    h.core.deselect_all();
    assert_eq!(h.core.paste_elements().len(), 1);
    assert_eq!(h.object_count(), 5);
}

#[test]
fn test_copy_of_parent_brings_children() {
    let mut h = TestHarness::with_project(&fixtures::project_hierarchy()).unwrap();
    h.core.select("parent", false);
    h.core.copy_elements();
    h.core.deselect_all();

    let pasted = h.core.paste_elements();
    assert_eq!(pasted.len(), 1);
    assert_eq!(h.object_count(), 5);
    assert_eq!(h.core.registry().children_of(Some(pasted[0].as_str())).len(), 1);

    // one record covers the whole copied subtree
    h.core.undo();
    assert_eq!(h.object_count(), 3);
}

#[test]
fn test_cut_paste_reparents_and_undo_restores_parent() {
    let mut h = TestHarness::with_project(&fixtures::project_hierarchy()).unwrap();
    h.core.select("child", false);
    assert_eq!(h.core.cut_elements(), 1);
    h.core.select("lamp", false);

    assert_eq!(h.core.paste_elements(), vec!["child".to_string()]);
    assert_eq!(h.core.get("child").unwrap().parent.as_deref(), Some("lamp"));
    let record = h.core.kill_ring().current_record().unwrap();
    assert_eq!(record.action, Action::Cut);
    assert_eq!(record.old, HistoryValue::Parent(Some("parent".to_string())));

    h.core.undo();
    assert_eq!(h.core.get("child").unwrap().parent.as_deref(), Some("parent"));
    h.core.redo();
    assert_eq!(h.core.get("child").unwrap().parent.as_deref(), Some("lamp"));

    // the cut buffer is consumed
    assert!(h.core.paste_elements().is_empty());
}

#[test]
fn test_cut_into_own_descendant_is_skipped() {
    let mut h = TestHarness::with_project(&fixtures::project_hierarchy()).unwrap();
    h.core.select("parent", false);
    h.core.cut_elements();
    h.core.select("child", false);

    assert!(h.core.paste_elements().is_empty());
    assert!(h.core.get("parent").unwrap().parent.is_none());
    assert_eq!(h.history_depth(), 0);
}

#[test]
fn test_param_edit_roundtrip() {
    let project = fixtures::project(vec![fixtures::collision_box("box", [1.0, 1.0, 1.0])]);
    let mut h = TestHarness::with_project(&project).unwrap();
    let radius = Property::Param("radius".to_string());

    assert!(h.core.set_property("box", radius.clone(), HistoryValue::Json(serde_json::json!(0.5))));
    assert_eq!(h.core.get("box").unwrap().param("radius"), Some(&serde_json::json!(0.5)));
    assert!(h.core.get("box").unwrap().edited.contains(&radius));

    h.core.undo();
    // the param was absent before the edit, so undo removes it again
    assert_eq!(h.core.get("box").unwrap().param("radius"), None);
    assert_eq!(h.core.export_project().objects[0].params, project.objects[0].params);

    h.core.redo();
    assert_eq!(h.core.get("box").unwrap().param("radius"), Some(&serde_json::json!(0.5)));
}

#[test]
fn test_setting_absent_param_to_null_is_a_null_edit() {
    let project = fixtures::project(vec![fixtures::collision_box("box", [1.0, 1.0, 1.0])]);
    let mut h = TestHarness::with_project(&project).unwrap();
    let radius = Property::Param("radius".to_string());
    assert!(!h.core.set_property("box", radius, HistoryValue::Json(serde_json::Value::Null)));
    assert_eq!(h.history_depth(), 0);
}

#[test]
fn test_light_under_removed_parent_goes_dark() {
    let mut lamp = fixtures::light("lamp");
    lamp.parent = Some("parent".to_string());
    let project = fixtures::project(vec![fixtures::model_at("parent", [1.0, 0.0, 0.0]), lamp]);
    let mut h = TestHarness::with_project(&project).unwrap();
    assert!(h.core.registry().lights().contains("lamp"));

    h.core.remove(&["parent".to_string()], true);
    assert!(!h.exists("lamp"));
    assert!(h.core.registry().lights().is_empty());

    h.core.undo();
    assert!(h.core.registry().lights().contains("lamp"));
}

#[test]
fn test_undo_broadcasts_marker_and_dirty() {
    let mut h = three_models();
    h.core.select("a", false);
    set_position(&mut h, "a", [6.0, 0.0, 0.0]);
    h.core.mark_clean();
    h.clear_events();

    h.core.undo();
    let events = h.events();
    assert!(events.contains(&EditorEvent::SelectionMarkerMoved(Some(Vec3::ZERO))));
    assert!(events.contains(&EditorEvent::DirtyChanged(true)));
    assert!(events.contains(&EditorEvent::PropertiesChanged));
}

#[test]
fn test_new_project_clears_history() {
    let mut h = three_models();
    set_position(&mut h, "a", [1.0, 0.0, 0.0]);
    h.core.new_project();
    assert_eq!(h.object_count(), 0);
    assert!(h.core.kill_ring().is_empty());
    assert!(!h.core.undo());
    assert!(!h.core.is_dirty());
}
