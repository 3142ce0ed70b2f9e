//! Object registry: the authoritative set of editable scene objects.
//!
//! Removal is soft. A stashed object keeps its slot so history can bring it
//! back; it (and everything below it) simply stops being live.

use std::collections::{BTreeSet, HashMap};

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{ObjectEntry, ObjectId, ObjectKind};

use super::kill_ring::Property;

/// Local transform of an object relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Heading / pitch / roll in degrees (heading about Z, pitch about X, roll about Y)
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::ZXY,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    pub fn set_rotation_quat(&mut self, rotation: Quat) {
        let (h, p, r) = rotation.to_euler(EulerRot::ZXY);
        self.rotation = Vec3::new(h.to_degrees(), p.to_degrees(), r.to_degrees());
    }

    /// Local model matrix
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }

    /// Read a transform component; `None` for non-transform properties
    pub fn get(&self, property: &Property) -> Option<Vec3> {
        match property {
            Property::Position => Some(self.position),
            Property::Rotation => Some(self.rotation),
            Property::Scale => Some(self.scale),
            _ => None,
        }
    }

    /// Write a transform component; returns false for non-transform properties
    pub fn set(&mut self, property: &Property, value: Vec3) -> bool {
        match property {
            Property::Position => self.position = value,
            Property::Rotation => self.rotation = value,
            Property::Scale => self.scale = value,
            _ => return false,
        }
        true
    }
}

impl From<&shared::Transform> for Transform {
    fn from(t: &shared::Transform) -> Self {
        Self {
            position: Vec3::from(t.position),
            rotation: Vec3::from(t.rotation),
            scale: Vec3::from(t.scale),
        }
    }
}

impl From<&Transform> for shared::Transform {
    fn from(t: &Transform) -> Self {
        Self {
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
        }
    }
}

/// An editable scene entity
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    /// `None` means the object hangs directly under the scene root
    pub parent: Option<ObjectId>,
    pub transform: Transform,
    pub visible: bool,
    /// Soft-deleted
    pub stashed: bool,
    /// Ordering among siblings
    pub sort: i32,
    /// Kind-specific parameters, opaque to the core
    pub params: serde_json::Value,
    /// Properties the user has modified since the object was created or loaded
    pub edited: BTreeSet<Property>,
}

impl SceneObject {
    pub fn new(id: ObjectId, name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            parent: None,
            transform: Transform::default(),
            visible: true,
            stashed: false,
            sort: 0,
            params: serde_json::Value::Null,
            edited: BTreeSet::new(),
        }
    }

    pub fn from_entry(entry: &ObjectEntry) -> Self {
        Self {
            parent: entry.parent.clone(),
            transform: Transform::from(&entry.transform),
            visible: entry.visible,
            params: entry.params.clone(),
            ..Self::new(entry.id.clone(), entry.name.clone(), entry.kind)
        }
    }

    pub fn to_entry(&self) -> ObjectEntry {
        ObjectEntry {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            parent: self.parent.clone(),
            transform: shared::Transform::from(&self.transform),
            visible: self.visible,
            params: self.params.clone(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&serde_json::Value> {
        self.params.get(name)
    }

    /// Drop a named parameter. Returns the removed value.
    pub fn remove_param(&mut self, name: &str) -> Option<serde_json::Value> {
        self.params.as_object_mut()?.remove(name)
    }

    /// Store a named parameter, turning a null blob into an object first.
    /// Returns false when the blob is some other non-object value.
    pub fn set_param(&mut self, name: &str, value: serde_json::Value) -> bool {
        if self.params.is_null() {
            self.params = serde_json::Value::Object(serde_json::Map::new());
        }
        match self.params.as_object_mut() {
            Some(map) => {
                map.insert(name.to_string(), value);
                true
            }
            None => false,
        }
    }
}

/// Owns every editable object
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: HashMap<ObjectId, SceneObject>,
    /// Creation order
    order: Vec<ObjectId>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh object with a new id
    pub fn create(
        &mut self,
        name: impl Into<String>,
        kind: ObjectKind,
        parent: Option<ObjectId>,
        transform: Transform,
        params: serde_json::Value,
    ) -> Result<ObjectId, String> {
        let id = uuid::Uuid::new_v4().to_string();
        let object = SceneObject {
            parent,
            transform,
            params,
            ..SceneObject::new(id.clone(), name, kind)
        };
        self.insert(object)?;
        Ok(id)
    }

    /// Register an existing object (ids come from the caller, e.g. a loaded project)
    pub fn insert(&mut self, object: SceneObject) -> Result<(), String> {
        if self.objects.contains_key(&object.id) {
            return Err(format!("Duplicate object id {}", object.id));
        }
        if let Some(parent) = &object.parent {
            if !self.objects.contains_key(parent) {
                return Err(format!("Unknown parent {parent} for object {}", object.id));
            }
        }
        self.order.push(object.id.clone());
        self.objects.insert(object.id.clone(), object);
        Ok(())
    }

    /// Whether the object is tracked and live (neither it nor an ancestor is stashed)
    pub fn exists(&self, id: &str) -> bool {
        self.objects.contains_key(id) && !self.is_stashed(id)
    }

    /// Whether the object is tracked at all, live or stashed
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// Stashed directly or through an ancestor
    pub fn is_stashed(&self, id: &str) -> bool {
        let mut next = self.objects.get(id);
        while let Some(obj) = next {
            if obj.stashed {
                return true;
            }
            next = obj.parent.as_deref().and_then(|p| self.objects.get(p));
        }
        false
    }

    /// Soft-delete an object. Returns false if unknown or already stashed.
    pub fn stash(&mut self, id: &str) -> bool {
        let Some(obj) = self.objects.get_mut(id) else {
            return false;
        };
        if obj.stashed {
            return false;
        }
        obj.stashed = true;
        true
    }

    /// Restore a stashed object
    pub fn unstash(&mut self, id: &str) -> bool {
        let Some(obj) = self.objects.get_mut(id) else {
            return false;
        };
        if !obj.stashed {
            return false;
        }
        obj.stashed = false;
        true
    }

    /// Lights currently lighting the scene: live objects of kind `Light`,
    /// so a lamp under a stashed ancestor drops out with it
    pub fn lights(&self) -> BTreeSet<ObjectId> {
        self.live_objects()
            .filter(|o| o.kind == ObjectKind::Light)
            .map(|o| o.id.clone())
            .collect()
    }

    /// True if `id` sits somewhere below `ancestor`
    pub fn is_descendant_of(&self, id: &str, ancestor: &str) -> bool {
        let mut next = self.objects.get(id).and_then(|o| o.parent.as_deref());
        while let Some(parent) = next {
            if parent == ancestor {
                return true;
            }
            next = self.objects.get(parent).and_then(|o| o.parent.as_deref());
        }
        false
    }

    /// Move an object under a new parent (`None` = scene root).
    ///
    /// Rejects unknown ids and parents that would create a cycle.
    pub fn reparent(&mut self, id: &str, new_parent: Option<&str>) -> bool {
        if !self.objects.contains_key(id) {
            return false;
        }
        if let Some(parent) = new_parent {
            if parent == id || !self.objects.contains_key(parent) || self.is_descendant_of(parent, id) {
                return false;
            }
        }
        if let Some(obj) = self.objects.get_mut(id) {
            obj.parent = new_parent.map(str::to_string);
        }
        true
    }

    /// Duplicate an object and its live descendants under `parent`,
    /// returning the id of the copied root
    pub fn copy_object(&mut self, id: &str, parent: Option<&str>) -> Option<ObjectId> {
        let source = self.objects.get(id)?;
        let copy_id = uuid::Uuid::new_v4().to_string();
        let copy = SceneObject {
            id: copy_id.clone(),
            parent: parent.map(str::to_string),
            stashed: false,
            ..source.clone()
        };
        let children: Vec<ObjectId> = self
            .children_of(Some(id))
            .into_iter()
            .map(|c| c.id.clone())
            .collect();
        self.insert(copy).ok()?;
        for child in children {
            self.copy_object(&child, Some(copy_id.as_str()));
        }
        Some(copy_id)
    }

    /// World matrix of the object's parent (identity for root-level objects)
    pub fn parent_world_matrix(&self, id: &str) -> Mat4 {
        self.objects
            .get(id)
            .and_then(|o| o.parent.as_deref())
            .map(|p| self.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY)
    }

    pub fn world_matrix(&self, id: &str) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut next = self.objects.get(id);
        while let Some(obj) = next {
            matrix = obj.transform.to_mat4() * matrix;
            next = obj.parent.as_deref().and_then(|p| self.objects.get(p));
        }
        matrix
    }

    pub fn world_position(&self, id: &str) -> Option<Vec3> {
        let obj = self.objects.get(id)?;
        Some(self.parent_world_matrix(id).transform_point3(obj.transform.position))
    }

    /// Every live object, in creation order
    pub fn live_objects(&self) -> impl Iterator<Item = &SceneObject> + '_ {
        self.order
            .iter()
            .filter(|id| !self.is_stashed(id))
            .filter_map(|id| self.objects.get(id))
    }

    /// Live direct children of `parent` (`None` = scene root), by sort key then creation order
    pub fn children_of(&self, parent: Option<&str>) -> Vec<&SceneObject> {
        let mut children: Vec<&SceneObject> = self
            .live_objects()
            .filter(|o| o.parent.as_deref() == parent)
            .collect();
        children.sort_by_key(|o| o.sort);
        children
    }

    /// Live objects with every parent listed before its children
    pub fn live_objects_depth_first(&self) -> Vec<&SceneObject> {
        let mut out = Vec::new();
        let mut stack: Vec<&SceneObject> = self.children_of(None).into_iter().rev().collect();
        while let Some(obj) = stack.pop() {
            out.push(obj);
            stack.extend(self.children_of(Some(obj.id.as_str())).into_iter().rev());
        }
        out
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.order.clear();
    }
}
