//! Physics engine seam
//!
//! The simulation never resolves contacts itself. It creates bodies, pushes
//! impulses and kinematic targets, casts rays, and reads translations back
//! through [`PhysicsWorld`]. Operations on a handle the world no longer knows
//! are silent no-ops.

use glam::{Quat, Vec3};

#[cfg(feature = "rapier")]
pub mod rapier;

#[cfg(test)]
pub(crate) mod testing;

/// Opaque handle to a body owned by a [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// How the engine integrates a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Force-integrated
    Dynamic,
    /// Moved to a target pose each step, infinite mass
    KinematicPosition,
    /// Never moves
    Fixed,
}

/// Body creation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub translation: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
}

impl BodyDesc {
    pub fn new(kind: BodyKind, translation: Vec3) -> Self {
        Self {
            kind,
            translation,
            linear_damping: 0.0,
            angular_damping: 0.0,
            can_sleep: true,
        }
    }

    pub fn fixed() -> Self {
        Self::new(BodyKind::Fixed, Vec3::ZERO)
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn never_sleep(mut self) -> Self {
        self.can_sleep = false;
        self
    }
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Collider attached to a body
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderDesc {
    pub shape: Shape,
    /// Offset from the parent body origin
    pub offset: Vec3,
    pub restitution: f32,
    pub friction: f32,
}

impl ColliderDesc {
    pub fn ball(radius: f32) -> Self {
        Self {
            shape: Shape::Ball { radius },
            offset: Vec3::ZERO,
            restitution: 0.0,
            friction: 0.5,
        }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            shape: Shape::Cuboid { half_extents },
            offset: Vec3::ZERO,
            restitution: 0.0,
            friction: 0.5,
        }
    }

    pub fn at(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn material(mut self, restitution: f32, friction: f32) -> Self {
        self.restitution = restitution;
        self.friction = friction;
        self
    }
}

/// A ray for scene queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Need not be normalized; time-of-impact is in units of this vector
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

/// Everything the simulation needs from a rigid-body engine
pub trait PhysicsWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;
    /// Removes the body and its colliders
    fn destroy_body(&mut self, body: BodyHandle);
    fn add_collider(&mut self, body: BodyHandle, desc: &ColliderDesc);
    /// Detach and drop every collider of the body
    fn remove_colliders(&mut self, body: BodyHandle);
    fn contains(&self, body: BodyHandle) -> bool;

    fn translation(&self, body: BodyHandle) -> Option<Vec3>;
    fn linvel(&self, body: BodyHandle) -> Option<Vec3>;
    fn angvel(&self, body: BodyHandle) -> Option<Vec3>;

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);
    fn apply_torque_impulse(&mut self, body: BodyHandle, torque: Vec3);
    fn set_translation(&mut self, body: BodyHandle, translation: Vec3);
    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec3);
    fn set_angvel(&mut self, body: BodyHandle, angvel: Vec3);

    fn set_next_kinematic_translation(&mut self, body: BodyHandle, translation: Vec3);
    fn set_next_kinematic_rotation(&mut self, body: BodyHandle, rotation: Quat);

    /// First time-of-impact along the ray within `max_toi`, if any
    fn cast_ray(&self, ray: &Ray, max_toi: f32, solid: bool) -> Option<f32>;

    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);
}
