//! Editor core: one struct owning the registry, selection, history and the
//! in-flight gesture.
//!
//! Operations are grouped by concern in the sibling modules. Every mutation
//! goes through `EditorCore` so history, selection and notifications stay in
//! step; outside code only observes through [`EditorEvent`]s.

mod history_ops;
mod object_ops;
mod persistence;
mod selection_ops;
mod transform_ops;

use glam::Vec3;
use shared::ObjectId;

use super::events::{EditorEvent, EventBus, ListenerId};
use super::gesture::{AxisConstraint, GestureState};
use super::kill_ring::KillRing;
use super::registry::{ObjectRegistry, SceneObject};
use super::selection::{Highlight, SelectionSet};
use super::settings::EditorSettings;
use crate::viewport::projection::ScreenProjection;

pub struct EditorCore {
    pub(crate) registry: ObjectRegistry,
    pub(crate) selection: SelectionSet,
    pub(crate) kill_ring: KillRing,
    pub(crate) gesture: Option<GestureState>,
    pub(crate) constraint: AxisConstraint,
    pub(crate) events: EventBus,
    pub(crate) settings: EditorSettings,
    pub(crate) projection: Box<dyn ScreenProjection>,
    /// Unsaved changes present
    pub(crate) dirty: bool,
    /// Copy buffer, survives paste
    pub(crate) copied: Vec<ObjectId>,
    /// Cut buffer, consumed by paste
    pub(crate) cut: Vec<ObjectId>,
}

impl EditorCore {
    pub fn new(settings: EditorSettings, projection: Box<dyn ScreenProjection>) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            selection: SelectionSet::default(),
            kill_ring: KillRing::new(),
            gesture: None,
            constraint: AxisConstraint::default(),
            events: EventBus::new(),
            settings,
            projection,
            dirty: false,
            copied: Vec::new(),
            cut: Vec::new(),
        }
    }

    /// Swap in the projection of the current camera
    pub fn set_projection(&mut self, projection: Box<dyn ScreenProjection>) {
        self.projection = projection;
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn kill_ring(&self) -> &KillRing {
        &self.kill_ring
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Selected objects, primary last
    pub fn get_selected_objects(&self) -> Vec<&SceneObject> {
        self.selection
            .all()
            .iter()
            .filter_map(|id| self.registry.get(id))
            .collect()
    }

    /// Every live object, parents before children (structure panel order)
    pub fn get_all_tracked_objects(&self) -> Vec<&SceneObject> {
        self.registry.live_objects_depth_first()
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.registry.get(id).filter(|_| self.registry.exists(id))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set the unsaved-changes flag, notifying only on a flip
    pub fn set_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            self.events.emit(EditorEvent::DirtyChanged(dirty));
        }
    }

    /// Called by the external serializer after a successful save
    pub fn mark_clean(&mut self) {
        self.set_dirty(false);
    }

    /// Middle of the selection's world-space bounding box; zero when nothing is selected
    pub fn centroid(&self) -> Vec3 {
        self.selection
            .bounds_center(|id| self.registry.world_position(id))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn highlight(&self, id: &str) -> Highlight {
        self.selection.highlight(id)
    }

    /// Highlight color configured for the object's selection state
    pub fn highlight_tint(&self, id: &str) -> Option<[f32; 4]> {
        self.settings.highlight.tint(self.highlight(id))
    }

    pub(crate) fn emit(&mut self, event: EditorEvent) {
        self.events.emit(event);
    }

    /// Re-broadcast where the selection marker sits
    pub(crate) fn refresh_marker(&mut self) {
        let marker = if self.selection.is_empty() {
            None
        } else {
            Some(self.centroid())
        };
        self.emit(EditorEvent::SelectionMarkerMoved(marker));
    }
}

impl std::fmt::Debug for EditorCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorCore")
            .field("objects", &self.registry.len())
            .field("selected", &self.selection.all())
            .field("history", &self.kill_ring.len())
            .field("gesture", &self.gesture.as_ref().map(|g| g.kind))
            .field("dirty", &self.dirty)
            .finish()
    }
}
