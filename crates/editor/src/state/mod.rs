pub mod editor;
pub mod events;
pub mod gesture;
pub mod kill_ring;
pub mod registry;
pub mod selection;
pub mod settings;

pub use editor::EditorCore;
pub use events::{EditorEvent, EventBus, ListenerId};
pub use gesture::{Axis, GestureKind};
pub use kill_ring::{Action, HistoryRecord, HistoryValue, KillRing, NodeId, Property};
pub use registry::{ObjectRegistry, SceneObject, Transform};
pub use selection::{Highlight, SelectionSet};
pub use settings::{EditorSettings, GestureSettings, HighlightSettings};
