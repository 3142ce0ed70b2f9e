//! Object CRUD, clipboard and property edits

use shared::{ObjectId, ObjectKind};

use crate::state::events::EditorEvent;
use crate::state::kill_ring::{HistoryRecord, HistoryValue, Property};
use crate::state::registry::Transform;

use super::EditorCore;

impl EditorCore {
    /// Create an object and record its creation
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        kind: ObjectKind,
        parent: Option<&str>,
        transform: Transform,
        params: serde_json::Value,
    ) -> Result<ObjectId, String> {
        if let Some(parent) = parent {
            if !self.registry.exists(parent) {
                return Err(format!("Unknown parent {parent}"));
            }
        }
        let id = self
            .registry
            .create(name, kind, parent.map(str::to_string), transform, params)?;
        tracing::debug!("Added {} {id}", kind.label());
        self.add_to_history(HistoryRecord::add(id.clone()));
        self.set_dirty(true);
        self.emit(EditorEvent::StructureChanged);
        Ok(id)
    }

    /// Soft-delete objects, recording one `Kill` per object when `record` is set.
    ///
    /// Returns how many objects were removed.
    pub fn remove(&mut self, ids: &[ObjectId], record: bool) -> usize {
        if self.gesture.is_some() {
            tracing::warn!("Cannot remove objects while a gesture is active");
            return 0;
        }
        let mut removed = 0;
        for id in ids {
            if !self.registry.exists(id) {
                continue;
            }
            self.registry.stash(id);
            if record {
                self.add_to_history(HistoryRecord::kill(id.clone()));
            }
            removed += 1;
        }
        if removed > 0 {
            // also drops selected descendants
            self.prune_selection();
            self.set_dirty(true);
            self.emit(EditorEvent::StructureChanged);
        }
        removed
    }

    /// Remove every root-level object (their children follow)
    pub fn remove_all(&mut self) -> usize {
        let roots: Vec<ObjectId> = self
            .registry
            .children_of(None)
            .into_iter()
            .map(|o| o.id.clone())
            .collect();
        self.remove(&roots, true)
    }

    /// Flip visibility; returns the new state. Not recorded in history.
    pub fn toggle_visibility(&mut self, id: &str) -> Option<bool> {
        if !self.registry.exists(id) {
            return None;
        }
        let obj = self.registry.get_mut(id)?;
        obj.visible = !obj.visible;
        let visible = obj.visible;
        self.set_dirty(true);
        self.emit(EditorEvent::StructureChanged);
        Some(visible)
    }

    /// Shift an object among its siblings. The sort key never goes below zero.
    pub fn move_in_structure(&mut self, id: &str, direction: i32) -> bool {
        if !self.registry.exists(id) {
            return false;
        }
        let Some(obj) = self.registry.get_mut(id) else {
            return false;
        };
        let sort = obj.sort.saturating_add(direction).max(0);
        if sort == obj.sort {
            return false;
        }
        obj.sort = sort;
        self.set_dirty(true);
        self.emit(EditorEvent::StructureChanged);
        true
    }

    /// Remember the selection for pasting copies
    pub fn copy_elements(&mut self) -> usize {
        self.cut.clear();
        self.copied = self.selection.all().to_vec();
        self.copied.len()
    }

    /// Remember the selection for moving on the next paste
    pub fn cut_elements(&mut self) -> usize {
        self.copied.clear();
        self.cut = self.selection.all().to_vec();
        self.cut.len()
    }

    /// Paste under the primary selection (or the scene root).
    ///
    /// A pending cut reparents its objects and is consumed. Otherwise the copy
    /// buffer is duplicated. Pasted objects become the new selection.
    pub fn paste_elements(&mut self) -> Vec<ObjectId> {
        if self.gesture.is_some() {
            tracing::warn!("Cannot paste while a gesture is active");
            return Vec::new();
        }
        let target = self.selection.primary().cloned();
        self.selection.clear();

        let mut pasted = Vec::new();
        if !self.cut.is_empty() {
            for id in std::mem::take(&mut self.cut) {
                if !self.registry.exists(&id) || target.as_deref() == Some(id.as_str()) {
                    continue;
                }
                let old_parent = self.registry.get(&id).and_then(|o| o.parent.clone());
                if !self.registry.reparent(&id, target.as_deref()) {
                    tracing::warn!("Cannot move {id} under its own descendant");
                    continue;
                }
                self.add_to_history(HistoryRecord::cut(id.clone(), old_parent, target.clone()));
                pasted.push(id);
            }
        } else {
            for id in self.copied.clone() {
                if !self.registry.exists(&id) {
                    continue;
                }
                let Some(copy) = self.registry.copy_object(&id, target.as_deref()) else {
                    continue;
                };
                self.add_to_history(HistoryRecord::copy(copy.clone()));
                pasted.push(copy);
            }
        }

        for id in &pasted {
            self.selection.push(id.clone());
        }
        if !pasted.is_empty() {
            self.set_dirty(true);
            self.emit(EditorEvent::StructureChanged);
        }
        self.selection_changed();
        pasted
    }

    /// Properties-panel edit of a single value, recorded as one `Set`.
    ///
    /// Returns false when nothing changed (unknown object, mismatched value,
    /// or the value already in place).
    pub fn set_property(&mut self, id: &str, property: Property, value: HistoryValue) -> bool {
        if self.gesture.is_some() {
            tracing::warn!("Cannot edit {} while a gesture is active", property.name());
            return false;
        }
        if !self.registry.exists(id) {
            return false;
        }
        let Some(obj) = self.registry.get_mut(id) else {
            return false;
        };

        let old = match (&property, &value) {
            (Property::Param(name), HistoryValue::Json(v)) => {
                // an absent param is recorded as `None` so undo removes it again
                let old = match obj.param(name) {
                    Some(old) if old == v => return false,
                    Some(old) => HistoryValue::Json(old.clone()),
                    None if v.is_null() => return false,
                    None => HistoryValue::None,
                };
                if !obj.set_param(name, v.clone()) {
                    return false;
                }
                old
            }
            (p, HistoryValue::Vec3(v)) if p.is_transform() => {
                let Some(old) = obj.transform.get(p) else {
                    return false;
                };
                if old == *v {
                    return false;
                }
                obj.transform.set(p, *v);
                HistoryValue::Vec3(old)
            }
            _ => {
                tracing::warn!("{} cannot be set to {:?}", property.name(), value);
                return false;
            }
        };
        obj.edited.insert(property.clone());

        let is_transform = property.is_transform();
        self.add_to_history(HistoryRecord::set(id.to_string(), property, old, value));
        self.set_dirty(true);
        if is_transform && self.selection.is_selected(id) {
            self.refresh_marker();
        }
        self.emit(EditorEvent::PropertiesChanged);
        true
    }
}
