//! Undo/redo through the kill ring

use crate::state::events::EditorEvent;
use crate::state::kill_ring::{Action, HistoryRecord, HistoryValue, Property};

use super::EditorCore;

impl EditorCore {
    /// Record an edit that has already been applied. Null edits are dropped.
    pub(crate) fn add_to_history(&mut self, record: HistoryRecord) -> bool {
        self.kill_ring.push(record).is_some()
    }

    /// Revert the record at the cursor and step back. False at the root.
    pub fn undo(&mut self) -> bool {
        if self.gesture.is_some() {
            tracing::warn!("Undo ignored while a gesture is active");
            return false;
        }
        let Some(record) = self.kill_ring.pop() else {
            return false;
        };
        tracing::debug!("undo {} {} on {}", record.action.name(), record.property.name(), record.target);
        self.apply(&record, false);
        self.after_history_step();
        true
    }

    /// Reapply the selected child of the cursor. False when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if self.gesture.is_some() {
            tracing::warn!("Redo ignored while a gesture is active");
            return false;
        }
        let Some(record) = self.kill_ring.pull() else {
            return false;
        };
        tracing::debug!("redo {} {} on {}", record.action.name(), record.property.name(), record.target);
        self.apply(&record, true);
        self.after_history_step();
        true
    }

    /// Step sideways: undo, pick the next sibling branch, redo it.
    ///
    /// With a single branch this is an undo followed by the same redo.
    pub fn cycle_redo(&mut self) -> bool {
        if self.kill_ring.is_at_root() || !self.undo() {
            return false;
        }
        self.kill_ring.cycle_children();
        self.redo()
    }

    fn after_history_step(&mut self) {
        self.prune_selection();
        if !self.selection.is_empty() {
            self.refresh_marker();
        }
        self.set_dirty(true);
        self.emit(EditorEvent::StructureChanged);
        self.emit(EditorEvent::PropertiesChanged);
    }

    /// Apply a record forward (redo) or inverted (undo).
    ///
    /// Records that no longer fit their target are logged and skipped.
    fn apply(&mut self, record: &HistoryRecord, forward: bool) {
        let target = record.target.as_str();
        if !self.registry.contains(target) {
            tracing::warn!("History target {target} is gone, skipping {}", record.action.name());
            return;
        }
        match record.action {
            Action::Set => self.apply_set(record, forward),
            Action::Add | Action::Copy => {
                if forward {
                    self.registry.unstash(target);
                } else {
                    self.registry.stash(target);
                }
            }
            Action::Kill => {
                if forward {
                    self.registry.stash(target);
                } else {
                    self.registry.unstash(target);
                }
            }
            Action::Cut => {
                let value = if forward { &record.new } else { &record.old };
                match value {
                    HistoryValue::Parent(parent) => {
                        if !self.registry.reparent(target, parent.as_deref()) {
                            tracing::warn!("Cannot move {target} back under {parent:?}");
                        }
                    }
                    other => tracing::warn!("Cut record on {target} carries {other:?}"),
                }
            }
        }
    }

    fn apply_set(&mut self, record: &HistoryRecord, forward: bool) {
        let value = if forward { &record.new } else { &record.old };
        let Some(obj) = self.registry.get_mut(&record.target) else {
            return;
        };
        match (&record.property, value) {
            (Property::Param(name), HistoryValue::Json(v)) => {
                if !obj.set_param(name, v.clone()) {
                    tracing::warn!("Cannot restore {name} on {}", record.target);
                }
            }
            (Property::Param(name), HistoryValue::None) => {
                obj.remove_param(name);
            }
            (p, HistoryValue::Vec3(v)) if p.is_transform() => {
                obj.transform.set(p, *v);
            }
            (p, _) => tracing::warn!(
                "Unsupported set of {} on {}, skipping",
                p.name(),
                record.target
            ),
        }
    }
}
