//! Branching undo/redo history (the "kill ring").
//!
//! History is a tree, not a stack: pushing after an undo adds a new branch
//! next to the old future instead of discarding it. The cursor moves up on
//! undo and down into the parent's selected child on redo. Records only
//! describe an edit; applying them to the scene is the editor's job.

use glam::Vec3;
use shared::ObjectId;

/// What kind of edit a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A property changed from `old` to `new`
    Set,
    /// An object was created
    Add,
    /// An object was removed (stashed)
    Kill,
    /// An object was pasted as a copy
    Copy,
    /// An object was moved to a new parent
    Cut,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Set => "set",
            Action::Add => "add",
            Action::Kill => "kill",
            Action::Copy => "copy",
            Action::Cut => "cut",
        }
    }
}

/// Which part of the target a record touches
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Property {
    Position,
    Rotation,
    Scale,
    /// The object as a whole (add/kill/copy/cut)
    Element,
    /// A named entry inside the object's kind-specific parameters
    Param(String),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Property::Position => "position",
            Property::Rotation => "rotation",
            Property::Scale => "scale",
            Property::Element => "element",
            Property::Param(name) => name,
        }
    }

    /// Parse a property name as used by the properties panel and the command protocol
    pub fn parse(name: &str) -> Self {
        match name {
            "position" | "pos" => Property::Position,
            "rotation" | "hpr" => Property::Rotation,
            "scale" => Property::Scale,
            "element" => Property::Element,
            other => Property::Param(other.to_string()),
        }
    }

    /// Transform components are the only properties carried as vectors
    pub fn is_transform(&self) -> bool {
        matches!(self, Property::Position | Property::Rotation | Property::Scale)
    }
}

/// A value captured by a record
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryValue {
    None,
    Vec3(Vec3),
    /// A parent reference; `None` is the scene root
    Parent(Option<ObjectId>),
    Json(serde_json::Value),
}

impl HistoryValue {
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            HistoryValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            HistoryValue::None => serde_json::Value::Null,
            HistoryValue::Vec3(v) => serde_json::json!([v.x, v.y, v.z]),
            HistoryValue::Parent(p) => serde_json::json!(p),
            HistoryValue::Json(v) => v.clone(),
        }
    }
}

/// A single undoable edit
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub target: ObjectId,
    pub action: Action,
    pub property: Property,
    pub old: HistoryValue,
    pub new: HistoryValue,
}

impl HistoryRecord {
    pub fn set(target: ObjectId, property: Property, old: HistoryValue, new: HistoryValue) -> Self {
        Self {
            target,
            action: Action::Set,
            property,
            old,
            new,
        }
    }

    fn element(target: ObjectId, action: Action) -> Self {
        Self {
            target,
            action,
            property: Property::Element,
            old: HistoryValue::None,
            new: HistoryValue::None,
        }
    }

    pub fn add(target: ObjectId) -> Self {
        Self::element(target, Action::Add)
    }

    pub fn kill(target: ObjectId) -> Self {
        Self::element(target, Action::Kill)
    }

    pub fn copy(target: ObjectId) -> Self {
        Self::element(target, Action::Copy)
    }

    pub fn cut(target: ObjectId, old_parent: Option<ObjectId>, new_parent: Option<ObjectId>) -> Self {
        Self {
            target,
            action: Action::Cut,
            property: Property::Element,
            old: HistoryValue::Parent(old_parent),
            new: HistoryValue::Parent(new_parent),
        }
    }

    /// A `Set` whose old and new values match changes nothing
    pub fn is_null_edit(&self) -> bool {
        self.action == Action::Set && self.old == self.new
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "action": self.action.name(),
            "property": self.property.name(),
            "old": self.old.to_json(),
            "new": self.new.to_json(),
        })
    }
}

/// Index of a node in the ledger
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug)]
struct Node {
    /// `None` only for the root sentinel
    record: Option<HistoryRecord>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Index into `children` of the branch the next redo follows
    next_redo: usize,
}

impl Node {
    fn new(record: Option<HistoryRecord>, parent: Option<NodeId>) -> Self {
        Self {
            record,
            parent,
            children: Vec::new(),
            next_redo: 0,
        }
    }
}

/// Undo/redo tree with a single cursor
#[derive(Debug)]
pub struct KillRing {
    nodes: Vec<Node>,
    current: NodeId,
}

impl Default for KillRing {
    fn default() -> Self {
        Self::new()
    }
}

impl KillRing {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None, None)],
            current: ROOT,
        }
    }

    /// Record an edit under the cursor and move the cursor onto it.
    ///
    /// Existing children of the cursor are kept as alternate branches; the new
    /// node becomes the parent's redo candidate. Null `Set` edits are rejected
    /// and return `None`.
    pub fn push(&mut self, record: HistoryRecord) -> Option<NodeId> {
        if record.is_null_edit() {
            tracing::debug!(
                "{} {} on {} not recorded: old equals new",
                record.action.name(),
                record.property.name(),
                record.target
            );
            return None;
        }

        tracing::debug!(
            "history push {} {} on {}",
            record.action.name(),
            record.property.name(),
            record.target
        );

        let id = self.nodes.len();
        self.nodes.push(Node::new(Some(record), Some(self.current)));

        let parent = &mut self.nodes[self.current];
        parent.children.push(id);
        parent.next_redo = parent.children.len() - 1;

        self.current = id;
        Some(id)
    }

    /// Step the cursor back to its parent, returning the record to revert
    pub fn pop(&mut self) -> Option<HistoryRecord> {
        let node = &self.nodes[self.current];
        let parent = node.parent?;
        let record = node.record.clone();
        self.current = parent;
        record
    }

    /// Step the cursor into the selected child, returning the record to reapply
    pub fn pull(&mut self) -> Option<HistoryRecord> {
        let next = self.next_redo(self.current)?;
        self.current = next;
        self.nodes[next].record.clone()
    }

    /// Rotate which branch the next redo follows among the cursor's children.
    ///
    /// Returns false when there is nothing to choose between.
    pub fn cycle_children(&mut self) -> bool {
        let node = &mut self.nodes[self.current];
        if node.children.len() < 2 {
            return false;
        }
        node.next_redo = (node.next_redo + 1) % node.children.len();
        true
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn is_at_root(&self) -> bool {
        self.current == ROOT
    }

    pub fn can_undo(&self) -> bool {
        !self.is_at_root()
    }

    pub fn can_redo(&self) -> bool {
        !self.nodes[self.current].children.is_empty()
    }

    /// Distance from the cursor to the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.current;
        while let Some(parent) = self.nodes[node].parent {
            depth += 1;
            node = parent;
        }
        depth
    }

    /// Number of records stored, across all branches
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn record(&self, node: NodeId) -> Option<&HistoryRecord> {
        self.nodes.get(node)?.record.as_ref()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The child a redo from `node` would enter
    pub fn next_redo(&self, node: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(node)?;
        node.children.get(node.next_redo).copied()
    }

    /// Record at the cursor (what the next undo reverts)
    pub fn current_record(&self) -> Option<&HistoryRecord> {
        self.record(self.current)
    }

    /// Record the next redo would apply
    pub fn redo_candidate(&self) -> Option<&HistoryRecord> {
        self.next_redo(self.current).and_then(|n| self.record(n))
    }

    /// Drop every record and reset the cursor to the root
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT];
        root.children.clear();
        root.next_redo = 0;
        self.current = ROOT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(target: &str, old: [f32; 3], new: [f32; 3]) -> HistoryRecord {
        HistoryRecord::set(
            target.to_string(),
            Property::Position,
            HistoryValue::Vec3(Vec3::from(old)),
            HistoryValue::Vec3(Vec3::from(new)),
        )
    }

    #[test]
    fn test_new_ring_is_at_root() {
        let ring = KillRing::new();
        assert!(ring.is_at_root());
        assert!(!ring.can_undo());
        assert!(!ring.can_redo());
        assert_eq!(ring.depth(), 0);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_push_moves_cursor() {
        let mut ring = KillRing::new();
        let a = ring.push(pos("a", [0.0; 3], [1.0, 0.0, 0.0])).unwrap();
        assert_eq!(ring.current(), a);
        assert_eq!(ring.parent(a), Some(ring.root()));
        assert_eq!(ring.depth(), 1);
        assert!(ring.can_undo());
    }

    #[test]
    fn test_null_set_is_elided() {
        let mut ring = KillRing::new();
        ring.push(pos("a", [0.0; 3], [1.0, 0.0, 0.0]));
        let before = ring.current();
        assert!(ring.push(pos("a", [2.0; 3], [2.0; 3])).is_none());
        assert_eq!(ring.current(), before);
        assert_eq!(ring.depth(), 1);
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_element_actions_are_never_elided() {
        let mut ring = KillRing::new();
        assert!(ring.push(HistoryRecord::kill("a".into())).is_some());
        assert!(ring.push(HistoryRecord::add("b".into())).is_some());
        assert!(ring.push(HistoryRecord::cut("c".into(), None, None)).is_some());
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_pop_at_root_is_noop() {
        let mut ring = KillRing::new();
        assert!(ring.pop().is_none());
        assert!(ring.is_at_root());
    }

    #[test]
    fn test_pull_without_children_is_noop() {
        let mut ring = KillRing::new();
        ring.push(pos("a", [0.0; 3], [1.0; 3]));
        let at = ring.current();
        assert!(ring.pull().is_none());
        assert_eq!(ring.current(), at);
    }

    #[test]
    fn test_pop_then_pull_returns_same_record() {
        let mut ring = KillRing::new();
        let record = pos("a", [0.0; 3], [1.0; 3]);
        let a = ring.push(record.clone()).unwrap();

        assert_eq!(ring.pop(), Some(record.clone()));
        assert!(ring.is_at_root());
        assert_eq!(ring.pull(), Some(record));
        assert_eq!(ring.current(), a);
    }

    #[test]
    fn test_push_after_undo_preserves_branch() {
        let mut ring = KillRing::new();
        let a = ring.push(pos("o", [0.0; 3], [1.0, 0.0, 0.0])).unwrap();
        ring.pop();
        let b = ring.push(pos("o", [0.0; 3], [2.0, 0.0, 0.0])).unwrap();

        let root = ring.root();
        assert_eq!(ring.children(root), &[a, b]);
        assert_eq!(ring.next_redo(root), Some(b));
        assert!(ring.record(a).is_some());
    }

    #[test]
    fn test_cycle_selects_older_branch() {
        let mut ring = KillRing::new();
        let a_rec = pos("o", [0.0; 3], [1.0, 0.0, 0.0]);
        let a = ring.push(a_rec.clone()).unwrap();
        ring.pop();
        ring.push(pos("o", [0.0; 3], [2.0, 0.0, 0.0]));

        ring.pop();
        assert!(ring.cycle_children());
        assert_eq!(ring.pull(), Some(a_rec));
        assert_eq!(ring.current(), a);
    }

    #[test]
    fn test_cycle_wraps_around() {
        let mut ring = KillRing::new();
        let mut ids = Vec::new();
        for x in 1..=3 {
            ids.push(ring.push(pos("o", [0.0; 3], [x as f32, 0.0, 0.0])).unwrap());
            ring.pop();
        }
        let root = ring.root();
        assert_eq!(ring.next_redo(root), Some(ids[2]));
        ring.cycle_children();
        assert_eq!(ring.next_redo(root), Some(ids[0]));
        ring.cycle_children();
        ring.cycle_children();
        assert_eq!(ring.next_redo(root), Some(ids[2]));
    }

    #[test]
    fn test_cycle_with_single_child_does_nothing() {
        let mut ring = KillRing::new();
        let a = ring.push(pos("o", [0.0; 3], [1.0; 3])).unwrap();
        ring.pop();
        assert!(!ring.cycle_children());
        assert_eq!(ring.next_redo(ring.root()), Some(a));
    }

    #[test]
    fn test_redo_candidate_and_current_record() {
        let mut ring = KillRing::new();
        let record = HistoryRecord::kill("x".into());
        ring.push(record.clone());
        assert_eq!(ring.current_record(), Some(&record));
        assert!(ring.redo_candidate().is_none());
        ring.pop();
        assert!(ring.current_record().is_none());
        assert_eq!(ring.redo_candidate(), Some(&record));
    }

    #[test]
    fn test_depth_follows_chain() {
        let mut ring = KillRing::new();
        for i in 0..4 {
            ring.push(pos("o", [i as f32; 3], [i as f32 + 1.0; 3]));
        }
        assert_eq!(ring.depth(), 4);
        ring.pop();
        ring.pop();
        assert_eq!(ring.depth(), 2);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut ring = KillRing::new();
        ring.push(pos("o", [0.0; 3], [1.0; 3]));
        ring.push(HistoryRecord::add("p".into()));
        ring.clear();
        assert!(ring.is_at_root());
        assert!(ring.is_empty());
        assert!(!ring.can_redo());
    }

    #[test]
    fn test_property_parse() {
        assert_eq!(Property::parse("pos"), Property::Position);
        assert_eq!(Property::parse("rotation"), Property::Rotation);
        assert_eq!(Property::parse("scale"), Property::Scale);
        assert_eq!(Property::parse("radius"), Property::Param("radius".into()));
        assert!(Property::Scale.is_transform());
        assert!(!Property::Element.is_transform());
    }

    #[test]
    fn test_record_json_shape() {
        let json = HistoryRecord::cut("a".into(), None, Some("p".into())).to_json();
        assert_eq!(json["action"], "cut");
        assert_eq!(json["property"], "element");
        assert!(json["old"].is_null());
        assert_eq!(json["new"], "p");
    }
}
