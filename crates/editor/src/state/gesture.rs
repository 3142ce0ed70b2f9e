//! Interactive move/rotate/scale gesture state.
//!
//! A gesture lives from the press that starts it to the commit or cancel
//! that ends it. It holds the per-object snapshot taken at the start, the
//! pointer history and the screen-space pivot. The frame-by-frame driving
//! happens in the editor's transform ops; the math that does not need the
//! scene lives here.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shared::ObjectId;

use super::kill_ring::Property;
use super::registry::Transform;

/// Coordinate axis used for constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Which heading/pitch/roll component a rotation about this axis changes
    pub fn rotation_index(&self) -> usize {
        match self {
            Axis::X => 1,
            Axis::Y => 2,
            Axis::Z => 0,
        }
    }
}

/// At most one axis limits a gesture at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisConstraint {
    active: Option<Axis>,
}

impl AxisConstraint {
    pub fn axis(&self) -> Option<Axis> {
        self.active
    }

    /// Activating an axis clears the others; activating the active one turns it off
    pub fn toggle(&mut self, axis: Axis) -> Option<Axis> {
        self.active = if self.active == Some(axis) {
            None
        } else {
            Some(axis)
        };
        self.active
    }

    /// Returns whether a constraint was active
    pub fn clear(&mut self) -> bool {
        self.active.take().is_some()
    }
}

/// Which transform component the gesture edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Move,
    Rotate,
    Scale,
}

impl GestureKind {
    pub fn property(&self) -> Property {
        match self {
            GestureKind::Move => Property::Position,
            GestureKind::Rotate => Property::Rotation,
            GestureKind::Scale => Property::Scale,
        }
    }
}

/// Per-object state captured when the gesture starts
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSnapshot {
    pub id: ObjectId,
    /// Value of the edited property at gesture start
    pub start: Vec3,
    /// Rotation at gesture start as a quaternion (rotate gestures)
    pub start_quat: Quat,
}

/// An in-progress gesture
#[derive(Debug, Clone)]
pub struct GestureState {
    pub kind: GestureKind,
    pub snapshots: Vec<ObjectSnapshot>,
    pub start_pointer: Vec2,
    /// Pointer position of the last applied frame
    pub last_pointer: Vec2,
    /// Middle of the projected selection's screen-space bounding box
    pub pivot: Vec2,
    /// Degrees the pointer has turned around the pivot so far
    pub turned: f32,
    /// Pointer distance from the pivot at start
    pub start_distance: f32,
    /// Whether any update actually changed an object
    pub has_changed: bool,
}

impl GestureState {
    pub fn new(kind: GestureKind, snapshots: Vec<ObjectSnapshot>, pointer: Vec2, pivot: Vec2) -> Self {
        Self {
            kind,
            snapshots,
            start_pointer: pointer,
            last_pointer: pointer,
            pivot,
            turned: 0.0,
            start_distance: (pivot - pointer).length(),
            has_changed: false,
        }
    }

    pub fn property(&self) -> Property {
        self.kind.property()
    }

    /// The pointer has left the click dead zone around the start position
    pub fn past_dead_zone(&self, pointer: Vec2, dead_zone: f32) -> bool {
        (pointer - self.start_pointer).length() >= dead_zone
    }

    /// Accumulate the turn around the pivot between the last frame and `pointer`.
    ///
    /// Summing per-frame deltas keeps the angle continuous past half a turn.
    pub fn accumulate_turn(&mut self, pointer: Vec2) -> f32 {
        let before = pointer_angle(self.pivot, self.last_pointer);
        let now = pointer_angle(self.pivot, pointer);
        self.turned += angle_delta(before, now);
        self.turned
    }
}

/// Angle of the pointer around the pivot, in degrees
pub fn pointer_angle(pivot: Vec2, pointer: Vec2) -> f32 {
    let d = pivot - pointer;
    -d.y.atan2(d.x).to_degrees()
}

/// Smallest signed difference between two angles in degrees
pub fn angle_delta(from: f32, to: f32) -> f32 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Turns smaller than this many degrees leave a rotation untouched
pub const MIN_TURN: f32 = 1e-4;

/// Whether two heading/pitch/roll triples describe the same orientation.
///
/// Compares quaternions, so 370° and 10° match, and so does the float noise
/// of an Euler round trip.
pub fn same_rotation(a: Vec3, b: Vec3) -> bool {
    let qa = hpr_quat(a);
    let qb = hpr_quat(b);
    qa.abs_diff_eq(qb, 1e-5) || qa.abs_diff_eq(-qb, 1e-5)
}

fn hpr_quat(hpr: Vec3) -> Quat {
    Transform {
        rotation: hpr,
        ..Transform::default()
    }
    .rotation_quat()
}

/// Middle of the bounding box of a set of screen points
pub fn screen_bounds_center(points: impl IntoIterator<Item = Vec2>) -> Option<Vec2> {
    let mut bounds: Option<(Vec2, Vec2)> = None;
    for p in points {
        bounds = Some(match bounds {
            None => (p, p),
            Some((min, max)) => (min.min(p), max.max(p)),
        });
    }
    bounds.map(|(min, max)| (min + max) * 0.5)
}

/// Keep only the constrained component of `proposed`, the rest stays at `previous`
pub fn constrain(previous: Vec3, proposed: Vec3, axis: Option<Axis>) -> Vec3 {
    match axis {
        None => proposed,
        Some(axis) => {
            let mut out = previous;
            out[axis.index()] = proposed[axis.index()];
            out
        }
    }
}

/// Scale after growing by `diff`, uniformly or on a single component
pub fn grown_scale(start: Vec3, diff: f32, axis: Option<Axis>) -> Vec3 {
    match axis {
        None => start + Vec3::splat(diff),
        Some(axis) => {
            let mut out = start;
            out[axis.index()] += diff;
            out
        }
    }
}

/// Heading/pitch/roll after turning one constrained component by `delta` degrees
pub fn turned_hpr(start: Vec3, delta: f32, axis: Axis) -> Vec3 {
    let mut out = start;
    out[axis.rotation_index()] += delta;
    out
}
