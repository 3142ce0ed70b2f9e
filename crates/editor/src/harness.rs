//! Headless test harness for driving the editor core programmatically.
//!
//! Wraps an [`EditorCore`] with a fixed front-view camera and records every
//! event it emits, so tests can assert on notifications as well as state.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use shared::{ObjectId, ObjectKind, ProjectFile};

use crate::state::{EditorCore, EditorEvent, EditorSettings, GestureKind, Transform};
use crate::viewport::CameraLens;

/// Half extent of the harness camera: one screen unit spans ten world units
pub const HARNESS_VIEW_EXTENT: f32 = 10.0;

/// Headless test harness: editor core plus an event log
pub struct TestHarness {
    pub core: EditorCore,
    events: Rc<RefCell<Vec<EditorEvent>>>,
}

impl TestHarness {
    /// Create a new empty harness.
    ///
    /// The camera looks along +Y with Z up, so screen x follows world x and
    /// screen y follows world z.
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let mut core = EditorCore::new(settings, Box::new(CameraLens::front(HARNESS_VIEW_EXTENT)));
        let events = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&events);
        core.subscribe(move |e| log.borrow_mut().push(e.clone()));
        Self { core, events }
    }

    /// Harness with a project already loaded (history empty, clean)
    pub fn with_project(project: &ProjectFile) -> Result<Self, String> {
        let mut h = Self::new();
        h.core.load_project(project)?;
        h.clear_events();
        Ok(h)
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add a model at a position and return its ID
    pub fn add_model(&mut self, name: &str, pos: [f32; 3]) -> ObjectId {
        self.add_object(name, ObjectKind::Model, pos)
    }

    pub fn add_object(&mut self, name: &str, kind: ObjectKind, pos: [f32; 3]) -> ObjectId {
        self.core
            .add_object(name, kind, None, Transform::at(Vec3::from(pos)), serde_json::Value::Null)
            .unwrap_or_default()
    }

    /// ID of the first live object with this name
    pub fn id_of(&self, name: &str) -> Option<ObjectId> {
        self.core
            .get_all_tracked_objects()
            .into_iter()
            .find(|o| o.name == name)
            .map(|o| o.id.clone())
    }

    pub fn position(&self, id: &str) -> Vec3 {
        self.core
            .registry()
            .get(id)
            .map(|o| o.transform.position)
            .unwrap_or(Vec3::ZERO)
    }

    pub fn rotation(&self, id: &str) -> Vec3 {
        self.core
            .registry()
            .get(id)
            .map(|o| o.transform.rotation)
            .unwrap_or(Vec3::ZERO)
    }

    pub fn scale(&self, id: &str) -> Vec3 {
        self.core
            .registry()
            .get(id)
            .map(|o| o.transform.scale)
            .unwrap_or(Vec3::ZERO)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.core.registry().exists(id)
    }

    // ── Gestures ──────────────────────────────────────────────

    /// Full press-drag-release on the selection; returns the records pushed
    pub fn drag(&mut self, kind: GestureKind, from: [f32; 2], to: [f32; 2]) -> usize {
        if !self.core.begin_gesture(kind, Vec2::from(from)) {
            return 0;
        }
        self.core.update_gesture(Vec2::from(to));
        self.core.commit_gesture()
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn selected(&self) -> Vec<ObjectId> {
        self.core.selection().all().to_vec()
    }

    pub fn selected_names(&self) -> Vec<String> {
        self.core
            .get_selected_objects()
            .iter()
            .map(|o| o.name.clone())
            .collect()
    }

    // ── Events ────────────────────────────────────────────────

    /// Every event emitted since the last `clear_events`
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&mut self) {
        self.events.borrow_mut().clear();
    }

    pub fn count_events(&self, pred: impl Fn(&EditorEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    /// Last `DirtyChanged` value seen, if any
    pub fn last_dirty_event(&self) -> Option<bool> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            EditorEvent::DirtyChanged(d) => Some(*d),
            _ => None,
        })
    }

    // ── Inspection ────────────────────────────────────────────

    /// Number of live objects
    pub fn object_count(&self) -> usize {
        self.core.get_all_tracked_objects().len()
    }

    /// Distance of the history cursor from the root
    pub fn history_depth(&self) -> usize {
        self.core.kill_ring().depth()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
