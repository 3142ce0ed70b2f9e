//! Notifications the editor core raises for the outside world.
//!
//! Panels, the structure tree and the window title subscribe here instead of
//! being called directly. Listeners run synchronously, in subscription order,
//! while the event is emitted.

use glam::Vec3;
use shared::ObjectId;

use super::gesture::Axis;

/// Something observable changed in the editor
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Objects were added, removed, reparented, reordered or re-tinted
    StructureChanged,
    /// Selection membership or order changed
    SelectionChanged { selected: Vec<ObjectId> },
    /// Property values of existing objects changed (refresh inspectors)
    PropertiesChanged,
    /// The unsaved-changes flag flipped
    DirtyChanged(bool),
    /// Where the selection marker sits; `None` hides it
    SelectionMarkerMoved(Option<Vec3>),
    /// An axis constraint was toggled; `None` clears the guide line
    AxisConstraintChanged {
        axis: Option<Axis>,
        origin: Vec3,
        extent: f32,
    },
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&EditorEvent)>;

/// Synchronous fan-out of editor events
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was already gone
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: EditorEvent) {
        tracing::trace!("event {:?}", event);
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_every_listener_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |e| log.borrow_mut().push((tag, e.clone())));
        }
        bus.emit(EditorEvent::DirtyChanged(true));
        let log = log.borrow();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], ("first", EditorEvent::DirtyChanged(true)));
        assert_eq!(log[1].0, "second");
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let id = {
            let count = Rc::clone(&count);
            bus.subscribe(move |_| *count.borrow_mut() += 1)
        };
        bus.emit(EditorEvent::StructureChanged);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(EditorEvent::StructureChanged);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_emit_without_listeners_is_fine() {
        let mut bus = EventBus::new();
        bus.emit(EditorEvent::PropertiesChanged);
    }
}
