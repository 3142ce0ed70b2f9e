//! Factory functions for creating test data.
//!
//! Helpers to construct `ObjectEntry` and `ProjectFile` values used in tests
//! and by the command protocol.

use shared::*;

// ── Object factories ────────────────────────────────────────────

/// Create an object entry at the scene root.
pub fn entry(id: &str, name: &str, kind: ObjectKind) -> ObjectEntry {
    ObjectEntry {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        parent: None,
        transform: Transform::new(),
        visible: true,
        params: serde_json::Value::Null,
    }
}

/// Create a model entry at a specific position.
pub fn model_at(id: &str, pos: [f32; 3]) -> ObjectEntry {
    ObjectEntry {
        transform: Transform::at(pos),
        ..entry(id, id, ObjectKind::Model)
    }
}

/// Create an entry under `parent`.
pub fn child_of(id: &str, parent: &str, pos: [f32; 3]) -> ObjectEntry {
    ObjectEntry {
        parent: Some(parent.to_string()),
        ..model_at(id, pos)
    }
}

/// Create a point light entry.
pub fn light(id: &str) -> ObjectEntry {
    ObjectEntry {
        params: serde_json::json!({ "light_type": "point", "color": [1.0, 1.0, 1.0] }),
        ..entry(id, "Light", ObjectKind::Light)
    }
}

/// Create a collision box entry with its dimensions in params.
pub fn collision_box(id: &str, size: [f32; 3]) -> ObjectEntry {
    ObjectEntry {
        params: serde_json::json!({ "solid": "box", "size": size }),
        ..entry(id, "Collision", ObjectKind::Collision)
    }
}

// ── ProjectFile factories ───────────────────────────────────────

/// Wrap entries into a project.
pub fn project(objects: Vec<ObjectEntry>) -> ProjectFile {
    ProjectFile {
        project_version: 1,
        objects,
    }
}

/// Empty project.
pub fn empty_project() -> ProjectFile {
    ProjectFile::default()
}

/// Three models side by side on the X axis: `a` at 0, `b` at 2, `c` at 4.
pub fn project_three_models() -> ProjectFile {
    project(vec![
        model_at("a", [0.0, 0.0, 0.0]),
        model_at("b", [2.0, 0.0, 0.0]),
        model_at("c", [4.0, 0.0, 0.0]),
    ])
}

/// A parent at (1, 0, 0) with one child offset by (0, 0, 1), and a light.
pub fn project_hierarchy() -> ProjectFile {
    project(vec![
        model_at("parent", [1.0, 0.0, 0.0]),
        child_of("child", "parent", [0.0, 0.0, 1.0]),
        light("lamp"),
    ])
}
