//! JSON command protocol.
//!
//! The narrow surface an external dispatcher (scripting console, test driver,
//! remote UI) uses to drive the editor core.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shared::{ObjectKind, ProjectFile, Transform};

use crate::state::{Axis, EditorCore, GestureKind, Highlight, HistoryRecord, HistoryValue, Property, SceneObject};

/// A command the dispatcher can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Create an object (recorded in history)
    AddObject {
        name: String,
        #[serde(default = "default_kind")]
        kind: ObjectKind,
        #[serde(default)]
        parent: Option<String>,
        #[serde(default)]
        transform: Transform,
        #[serde(default)]
        params: serde_json::Value,
    },
    /// Remove objects by ID; an empty list removes the selection.
    Remove {
        #[serde(default)]
        ids: Vec<String>,
    },
    RemoveAll,
    Select {
        id: String,
        #[serde(default)]
        multiselect: bool,
    },
    Deselect {
        id: String,
    },
    DeselectAll,
    /// Start a gesture on the selection, or on `ids` when given.
    BeginGesture {
        kind: GestureKind,
        pointer: [f32; 2],
        #[serde(default)]
        ids: Option<Vec<String>>,
    },
    UpdateGesture {
        pointer: [f32; 2],
    },
    CommitGesture,
    CancelGesture,
    /// Toggle an axis constraint
    LimitAxis {
        axis: Axis,
    },
    /// Properties-panel edit: `position`/`rotation`/`scale` take `[x, y, z]`,
    /// any other name is stored in the object's params.
    SetProperty {
        id: String,
        property: String,
        value: serde_json::Value,
    },
    Undo,
    Redo,
    /// Undo, switch to the next redo branch, redo
    CycleRedo,
    Copy,
    Cut,
    Paste,
    ToggleVisibility {
        id: String,
    },
    MoveInStructure {
        id: String,
        direction: i32,
    },
    /// List live objects and the selection
    Inspect,
    /// Describe the history cursor and its neighbours
    InspectHistory,
    ExportProject,
    LoadProject {
        project: ProjectFile,
    },
    NewProject,
}

fn default_kind() -> ObjectKind {
    ObjectKind::Model
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

/// Turn a wire value into the history value a property carries
pub fn property_value(property: &Property, value: serde_json::Value) -> Result<HistoryValue, String> {
    if property.is_transform() {
        let v: [f32; 3] = serde_json::from_value(value)
            .map_err(|e| format!("Expected [x, y, z] for {}: {e}", property.name()))?;
        Ok(HistoryValue::Vec3(Vec3::from(v)))
    } else if *property == Property::Element {
        Err("element is not an editable property".to_string())
    } else {
        Ok(HistoryValue::Json(value))
    }
}

fn object_json(core: &EditorCore, obj: &SceneObject) -> serde_json::Value {
    let highlight = match core.highlight(&obj.id) {
        Highlight::Primary => "primary",
        Highlight::Secondary => "secondary",
        Highlight::None => "none",
    };
    serde_json::json!({
        "id": obj.id,
        "name": obj.name,
        "kind": obj.kind,
        "parent": obj.parent,
        "position": obj.transform.position.to_array(),
        "rotation": obj.transform.rotation.to_array(),
        "scale": obj.transform.scale.to_array(),
        "visible": obj.visible,
        "params": obj.params,
        "highlight": highlight,
        "tint": core.highlight_tint(&obj.id),
        "edited": obj.edited.iter().map(|p| p.name()).collect::<Vec<_>>(),
    })
}

fn marker_json(core: &EditorCore) -> serde_json::Value {
    if core.selection().is_empty() {
        return serde_json::Value::Null;
    }
    let style = &core.settings().highlight;
    serde_json::json!({
        "position": core.centroid().to_array(),
        "color": style.marker_color,
        "scale": style.marker_scale,
    })
}

fn record_json(record: Option<&HistoryRecord>) -> serde_json::Value {
    record.map(HistoryRecord::to_json).unwrap_or(serde_json::Value::Null)
}

/// Execute a single command on the editor core.
pub fn execute_command(core: &mut EditorCore, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::AddObject {
            name,
            kind,
            parent,
            transform,
            params,
        } => match core.add_object(name, kind, parent.as_deref(), (&transform).into(), params) {
            Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
            Err(e) => CommandResponse::err(e),
        },

        EditorCommand::Remove { ids } => {
            let ids = if ids.is_empty() {
                core.selection().all().to_vec()
            } else {
                ids
            };
            let removed = core.remove(&ids, true);
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::RemoveAll => {
            let removed = core.remove_all();
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::Select { id, multiselect } => {
            if !core.select(&id, multiselect) {
                return CommandResponse::err(format!("Object not found: {id}"));
            }
            CommandResponse::ok_with_data(serde_json::json!({ "selected": core.selection().all() }))
        }

        EditorCommand::Deselect { id } => {
            let removed = core.deselect(&id);
            CommandResponse::ok_with_data(serde_json::json!({ "deselected": removed }))
        }

        EditorCommand::DeselectAll => {
            core.deselect_all();
            CommandResponse::ok()
        }

        EditorCommand::BeginGesture { kind, pointer, ids } => {
            let pointer = Vec2::from(pointer);
            let started = match ids {
                Some(ids) => core.begin_gesture_with(kind, &ids, pointer),
                None => core.begin_gesture(kind, pointer),
            };
            CommandResponse::ok_with_data(serde_json::json!({ "started": started }))
        }

        EditorCommand::UpdateGesture { pointer } => {
            let changed = core.update_gesture(Vec2::from(pointer));
            CommandResponse::ok_with_data(serde_json::json!({ "changed": changed }))
        }

        EditorCommand::CommitGesture => {
            let records = core.commit_gesture();
            CommandResponse::ok_with_data(serde_json::json!({ "records": records }))
        }

        EditorCommand::CancelGesture => {
            let cancelled = core.cancel_gesture();
            CommandResponse::ok_with_data(serde_json::json!({ "cancelled": cancelled }))
        }

        EditorCommand::LimitAxis { axis } => {
            let active = core.limit_axis(axis);
            CommandResponse::ok_with_data(serde_json::json!({ "axis": active }))
        }

        EditorCommand::SetProperty { id, property, value } => {
            let property = Property::parse(&property);
            match property_value(&property, value) {
                Ok(value) => {
                    let changed = core.set_property(&id, property, value);
                    CommandResponse::ok_with_data(serde_json::json!({ "changed": changed }))
                }
                Err(e) => CommandResponse::err(e),
            }
        }

        EditorCommand::Undo => {
            let success = core.undo();
            CommandResponse::ok_with_data(serde_json::json!({ "undone": success }))
        }

        EditorCommand::Redo => {
            let success = core.redo();
            CommandResponse::ok_with_data(serde_json::json!({ "redone": success }))
        }

        EditorCommand::CycleRedo => {
            let success = core.cycle_redo();
            CommandResponse::ok_with_data(serde_json::json!({ "cycled": success }))
        }

        EditorCommand::Copy => {
            let count = core.copy_elements();
            CommandResponse::ok_with_data(serde_json::json!({ "copied": count }))
        }

        EditorCommand::Cut => {
            let count = core.cut_elements();
            CommandResponse::ok_with_data(serde_json::json!({ "cut": count }))
        }

        EditorCommand::Paste => {
            let pasted = core.paste_elements();
            CommandResponse::ok_with_data(serde_json::json!({ "pasted": pasted }))
        }

        EditorCommand::ToggleVisibility { id } => match core.toggle_visibility(&id) {
            Some(visible) => CommandResponse::ok_with_data(serde_json::json!({ "visible": visible })),
            None => CommandResponse::err(format!("Object not found: {id}")),
        },

        EditorCommand::MoveInStructure { id, direction } => {
            let moved = core.move_in_structure(&id, direction);
            CommandResponse::ok_with_data(serde_json::json!({ "moved": moved }))
        }

        EditorCommand::Inspect => {
            let core: &EditorCore = core;
            let objects: Vec<serde_json::Value> = core
                .get_all_tracked_objects()
                .into_iter()
                .map(|obj| object_json(core, obj))
                .collect();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "objects": objects,
                "selected": core.selection().all(),
                "centroid": core.centroid().to_array(),
                "marker": marker_json(core),
                "lights": core.registry().lights(),
                "dirty": core.is_dirty(),
                "gesture": core.gesture_kind(),
                "axis": core.axis_constraint(),
            }))
        }

        EditorCommand::InspectHistory => {
            let ring = core.kill_ring();
            CommandResponse::ok_with_data(serde_json::json!({
                "depth": ring.depth(),
                "records": ring.len(),
                "can_undo": ring.can_undo(),
                "can_redo": ring.can_redo(),
                "branches": ring.children(ring.current()).len(),
                "current": record_json(ring.current_record()),
                "redo_candidate": record_json(ring.redo_candidate()),
            }))
        }

        EditorCommand::ExportProject => {
            let project = core.export_project();
            CommandResponse::ok_with_data(serde_json::json!({ "project": project }))
        }

        EditorCommand::LoadProject { project } => match core.load_project(&project) {
            Ok(()) => CommandResponse::ok_with_data(
                serde_json::json!({ "object_count": core.get_all_tracked_objects().len() }),
            ),
            Err(e) => CommandResponse::err(e),
        },

        EditorCommand::NewProject => {
            core.new_project();
            CommandResponse::ok()
        }
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(core: &mut EditorCore, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(core, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(core: &mut EditorCore, json: &str) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(core, cmd))
        .collect())
}
