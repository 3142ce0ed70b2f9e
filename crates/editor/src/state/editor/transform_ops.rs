//! Interactive move/rotate/scale gestures

use glam::{Quat, Vec2, Vec3};
use shared::ObjectId;

use crate::state::events::EditorEvent;
use crate::state::gesture::{
    constrain, grown_scale, same_rotation, screen_bounds_center, turned_hpr, Axis, GestureKind,
    GestureState, ObjectSnapshot, MIN_TURN,
};
use crate::state::kill_ring::{HistoryRecord, HistoryValue, Property};

use super::EditorCore;

impl EditorCore {
    /// Start a gesture on the current selection
    pub fn begin_gesture(&mut self, kind: GestureKind, pointer: Vec2) -> bool {
        let objects = self.selection.all().to_vec();
        self.begin_gesture_with(kind, &objects, pointer)
    }

    /// Start a gesture on explicit objects.
    ///
    /// Stays idle when no listed object is live. A second `begin` while a
    /// gesture is running is a caller error and is rejected.
    pub fn begin_gesture_with(&mut self, kind: GestureKind, objects: &[ObjectId], pointer: Vec2) -> bool {
        if let Some(active) = &self.gesture {
            tracing::warn!("Cannot begin {kind:?}: {:?} gesture already active", active.kind);
            return false;
        }
        let property = kind.property();
        let mut snapshots: Vec<ObjectSnapshot> = Vec::new();
        for id in objects {
            if !self.registry.exists(id) || snapshots.iter().any(|s| s.id == *id) {
                continue;
            }
            let Some(obj) = self.registry.get(id) else {
                continue;
            };
            let Some(start) = obj.transform.get(&property) else {
                continue;
            };
            snapshots.push(ObjectSnapshot {
                id: id.clone(),
                start,
                start_quat: obj.transform.rotation_quat(),
            });
        }
        if snapshots.is_empty() {
            return false;
        }

        let pivot = screen_bounds_center(snapshots.iter().filter_map(|s| {
            let world = self.registry.world_position(&s.id)?;
            self.projection.project(world).map(|p| p.truncate())
        }))
        .unwrap_or(pointer);

        tracing::debug!("begin {kind:?} on {} objects", snapshots.len());
        self.gesture = Some(GestureState::new(kind, snapshots, pointer, pivot));
        true
    }

    /// Feed one pointer frame. Returns true when objects changed.
    pub fn update_gesture(&mut self, pointer: Vec2) -> bool {
        let Self {
            registry,
            gesture,
            constraint,
            settings,
            projection,
            ..
        } = self;
        let Some(g) = gesture.as_mut() else {
            return false;
        };
        if !g.has_changed && !g.past_dead_zone(pointer, settings.gesture.dead_zone) {
            return false;
        }
        let axis = constraint.axis();
        let mut changed = false;

        match g.kind {
            GestureKind::Move => {
                let delta = (pointer - g.last_pointer).extend(0.0);
                for snap in &g.snapshots {
                    let parent_world = registry.parent_world_matrix(&snap.id);
                    if parent_world.determinant().abs() <= f32::EPSILON {
                        continue;
                    }
                    let Some(obj) = registry.get_mut(&snap.id) else {
                        continue;
                    };
                    let world = parent_world.transform_point3(obj.transform.position);
                    let Some(moved) = projection
                        .project(world)
                        .and_then(|screen| projection.unproject(screen + delta))
                    else {
                        continue;
                    };
                    let local = parent_world.inverse().transform_point3(moved);
                    let next = constrain(obj.transform.position, local, axis);
                    if next != obj.transform.position {
                        obj.transform.position = next;
                        changed = true;
                    }
                }
            }
            GestureKind::Rotate => {
                // total turn since begin, applied to the snapshot
                let turned = g.accumulate_turn(pointer);
                let view = projection.view_direction();
                for snap in &g.snapshots {
                    let parent_world = registry.parent_world_matrix(&snap.id);
                    let Some(obj) = registry.get_mut(&snap.id) else {
                        continue;
                    };
                    let before = obj.transform.rotation;
                    match axis {
                        // no turn: keep the stored angles exactly as they were
                        _ if turned.abs() < MIN_TURN => obj.transform.rotation = snap.start,
                        Some(axis) => obj.transform.rotation = turned_hpr(snap.start, turned, axis),
                        None => {
                            let spin_axis = parent_world.inverse().transform_vector3(view).normalize_or_zero();
                            if spin_axis == Vec3::ZERO {
                                continue;
                            }
                            let spin = Quat::from_axis_angle(spin_axis, turned.to_radians());
                            obj.transform.set_rotation_quat(spin * snap.start_quat);
                        }
                    }
                    changed |= obj.transform.rotation != before;
                }
            }
            GestureKind::Scale => {
                let distance = (g.pivot - pointer).length();
                let diff = (distance - g.start_distance) * settings.gesture.scale_sensitivity;
                for snap in &g.snapshots {
                    let Some(obj) = registry.get_mut(&snap.id) else {
                        continue;
                    };
                    let next = grown_scale(snap.start, diff, axis);
                    if next != obj.transform.scale {
                        obj.transform.scale = next;
                        changed = true;
                    }
                }
            }
        }

        g.last_pointer = pointer;
        g.has_changed |= changed;
        if changed {
            self.refresh_marker();
        }
        changed
    }

    /// Finish the gesture, recording one `Set` per object whose value moved.
    ///
    /// Returns the number of records pushed.
    pub fn commit_gesture(&mut self) -> usize {
        let Some(g) = self.gesture.take() else {
            return 0;
        };
        let property = g.property();
        let mut pushed = 0;
        if g.has_changed {
            for snap in &g.snapshots {
                let Some(obj) = self.registry.get_mut(&snap.id) else {
                    continue;
                };
                let Some(now) = obj.transform.get(&property) else {
                    continue;
                };
                let unchanged = match property {
                    Property::Rotation => same_rotation(now, snap.start),
                    _ => now == snap.start,
                };
                if unchanged {
                    obj.transform.set(&property, snap.start);
                    continue;
                }
                obj.edited.insert(property.clone());
                let record = HistoryRecord::set(
                    snap.id.clone(),
                    property.clone(),
                    HistoryValue::Vec3(snap.start),
                    HistoryValue::Vec3(now),
                );
                if self.kill_ring.push(record).is_some() {
                    pushed += 1;
                }
            }
        }
        tracing::debug!("commit {:?}: {pushed} records", g.kind);
        self.clear_limit();
        if pushed > 0 {
            self.set_dirty(true);
            self.refresh_marker();
            self.emit(EditorEvent::PropertiesChanged);
        }
        pushed
    }

    /// Abort the gesture and put every object back where it started
    pub fn cancel_gesture(&mut self) -> bool {
        let Some(g) = self.gesture.take() else {
            return false;
        };
        let property = g.property();
        for snap in &g.snapshots {
            if let Some(obj) = self.registry.get_mut(&snap.id) {
                obj.transform.set(&property, snap.start);
            }
        }
        tracing::debug!("cancel {:?}", g.kind);
        self.clear_limit();
        if g.has_changed {
            self.refresh_marker();
        }
        true
    }

    /// Toggle an axis constraint. Ignored with nothing selected and no gesture.
    pub fn limit_axis(&mut self, axis: Axis) -> Option<Axis> {
        if self.selection.is_empty() && self.gesture.is_none() {
            return None;
        }
        let active = self.constraint.toggle(axis);
        let origin = self.centroid();
        self.emit(EditorEvent::AxisConstraintChanged {
            axis: active,
            origin,
            extent: self.settings.gesture.limit_line_extent,
        });
        active
    }

    /// Drop the axis constraint (and its guide line) if one is active
    pub fn clear_limit(&mut self) {
        if self.constraint.clear() {
            self.emit(EditorEvent::AxisConstraintChanged {
                axis: None,
                origin: self.centroid(),
                extent: self.settings.gesture.limit_line_extent,
            });
        }
    }

    pub fn axis_constraint(&self) -> Option<Axis> {
        self.constraint.axis()
    }

    pub fn gesture_kind(&self) -> Option<GestureKind> {
        self.gesture.as_ref().map(|g| g.kind)
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }
}
