//! Project snapshots and autosave

use std::path::{Path, PathBuf};

use shared::ProjectFile;

use crate::state::events::EditorEvent;
use crate::state::registry::{ObjectRegistry, SceneObject};

use super::EditorCore;

const PROJECT_VERSION: u32 = 1;

impl EditorCore {
    /// Drop the whole scene and its history
    pub fn new_project(&mut self) {
        self.reset(ObjectRegistry::new());
        tracing::info!("New project");
    }

    /// Snapshot of every live object, parents first
    pub fn export_project(&self) -> ProjectFile {
        ProjectFile {
            project_version: PROJECT_VERSION,
            objects: self
                .registry
                .live_objects_depth_first()
                .into_iter()
                .map(SceneObject::to_entry)
                .collect(),
        }
    }

    pub fn export_project_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.export_project())
            .map_err(|e| format!("Failed to serialize project: {e}"))
    }

    /// Replace the scene with a project snapshot.
    ///
    /// The snapshot is validated before anything is touched; on success the
    /// history is empty and the project is clean.
    pub fn load_project(&mut self, project: &ProjectFile) -> Result<(), String> {
        if project.project_version > PROJECT_VERSION {
            return Err(format!(
                "Unsupported project version {} (expected at most {PROJECT_VERSION})",
                project.project_version
            ));
        }
        let mut registry = ObjectRegistry::new();
        for entry in &project.objects {
            registry.insert(SceneObject::from_entry(entry))?;
        }
        let count = registry.len();
        self.reset(registry);
        tracing::info!("Loaded project with {count} objects");
        Ok(())
    }

    pub fn load_project_json(&mut self, json: &str) -> Result<(), String> {
        let project: ProjectFile =
            serde_json::from_str(json).map_err(|e| format!("Invalid project JSON: {e}"))?;
        self.load_project(&project)
    }

    fn reset(&mut self, registry: ObjectRegistry) {
        self.gesture = None;
        self.clear_limit();
        self.registry = registry;
        self.selection.clear();
        self.copied.clear();
        self.cut.clear();
        self.kill_ring.clear();
        self.emit(EditorEvent::StructureChanged);
        self.selection_changed();
        self.set_dirty(false);
    }

    pub fn autosave_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "scene-editor", "scene-editor")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Write the current project to the autosave file
    pub fn autosave(&self) -> Result<PathBuf, String> {
        let path = Self::autosave_path().ok_or("No data directory available")?;
        self.save_project_to(&path)?;
        tracing::info!("Autosaved to {}", path.display());
        Ok(path)
    }

    /// Load the autosave file if there is one. Returns whether it was restored.
    pub fn restore_autosave(&mut self) -> Result<bool, String> {
        match Self::autosave_path() {
            Some(path) if path.exists() => self.load_project_from(&path).map(|()| true),
            _ => Ok(false),
        }
    }

    pub fn save_project_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Cannot create {}: {e}", parent.display()))?;
        }
        let json = self.export_project_json()?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
    }

    pub fn load_project_from(&mut self, path: &Path) -> Result<(), String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        self.load_project_json(&json)
    }
}
