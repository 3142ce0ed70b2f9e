//! Selection operations

use crate::state::events::EditorEvent;

use super::EditorCore;

impl EditorCore {
    /// Select an object.
    ///
    /// Without `multiselect` the selection is replaced. With it, an already
    /// selected object is toggled off, anything else is appended and becomes
    /// primary. Returns false if the object is not live.
    pub fn select(&mut self, id: &str, multiselect: bool) -> bool {
        if !self.registry.exists(id) {
            tracing::warn!("Cannot select {id}: not in the scene");
            return false;
        }
        if multiselect {
            self.selection.toggle(id.to_string());
        } else {
            self.selection.clear();
            self.selection.push(id.to_string());
        }
        self.selection_changed();
        // primary/secondary tints moved
        self.emit(EditorEvent::StructureChanged);
        true
    }

    /// Remove one object from the selection; false if it was not selected
    pub fn deselect(&mut self, id: &str) -> bool {
        if !self.selection.remove(id) {
            return false;
        }
        self.selection_changed();
        true
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
        self.selection_changed();
    }

    /// Drop selected objects that stopped being live (stashed directly or
    /// through an ancestor). Returns how many were dropped.
    pub(crate) fn prune_selection(&mut self) -> usize {
        let dead: Vec<String> = self
            .selection
            .all()
            .iter()
            .filter(|id| !self.registry.exists(id))
            .cloned()
            .collect();
        for id in &dead {
            self.selection.remove(id);
        }
        if !dead.is_empty() {
            tracing::debug!("Dropped {} dead objects from the selection", dead.len());
            self.selection_changed();
        }
        dead.len()
    }

    pub(crate) fn selection_changed(&mut self) {
        self.refresh_marker();
        let selected = self.selection.all().to_vec();
        self.emit(EditorEvent::SelectionChanged { selected });
    }
}
