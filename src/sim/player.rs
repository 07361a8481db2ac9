//! Player-controlled marble
//!
//! Owns the marble body handle and the chase camera. All motion goes through
//! engine impulses; the only direct pose writes happen in [`PlayerController::reset`].

use glam::Vec3;

use super::camera::CameraFrame;
use super::input::ControlState;
use crate::consts::*;
use crate::physics::{BodyDesc, BodyHandle, BodyKind, ColliderDesc, PhysicsWorld, Ray};

/// Outcome of the per-frame position checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Termination {
    /// Past the last segment
    pub finished: bool,
    /// Below the fall threshold
    pub fell: bool,
}

impl Termination {
    pub fn evaluate(position: Vec3, finish_line_z: f32) -> Self {
        Self {
            finished: position.z < finish_line_z,
            fell: position.y < FALL_THRESHOLD,
        }
    }
}

/// Linear and torque impulse for the held directions over `dt` seconds
pub fn movement_impulses(controls: &ControlState, dt: f32) -> (Vec3, Vec3) {
    let impulse_strength = IMPULSE_STRENGTH * dt;
    let torque_strength = TORQUE_STRENGTH * dt;
    let mut impulse = Vec3::ZERO;
    let mut torque = Vec3::ZERO;

    if controls.forward {
        impulse.z -= impulse_strength;
        torque.x -= torque_strength;
    }
    if controls.backward {
        impulse.z += impulse_strength;
        torque.x += torque_strength;
    }
    if controls.leftward {
        impulse.x -= impulse_strength;
        torque.z += torque_strength;
    }
    if controls.rightward {
        impulse.x += impulse_strength;
        torque.z -= torque_strength;
    }

    (impulse, torque)
}

#[derive(Debug, Clone)]
pub struct PlayerController {
    body: Option<BodyHandle>,
    radius: f32,
    camera: CameraFrame,
    position: Vec3,
}

impl PlayerController {
    pub fn new(radius: f32) -> Self {
        Self {
            body: None,
            radius,
            camera: CameraFrame::default(),
            position: SPAWN_POINT,
        }
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn camera(&self) -> &CameraFrame {
        &self.camera
    }

    /// Last translation read back from the engine
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Create the marble at the spawn point
    pub fn attach(&mut self, world: &mut impl PhysicsWorld) -> BodyHandle {
        let desc = BodyDesc::new(BodyKind::Dynamic, SPAWN_POINT)
            .with_damping(MARBLE_DAMPING, MARBLE_DAMPING)
            .never_sleep();
        let body = world.create_body(&desc);
        world.add_collider(body, &self.collider());
        self.body = Some(body);
        self.position = SPAWN_POINT;
        body
    }

    pub fn detach(&mut self, world: &mut impl PhysicsWorld) {
        if let Some(body) = self.body.take() {
            world.destroy_body(body);
        }
    }

    /// Resize the ball collider in place; the body itself survives
    pub fn set_radius(&mut self, world: &mut impl PhysicsWorld, radius: f32) {
        if (radius - self.radius).abs() < f32::EPSILON {
            return;
        }
        self.radius = radius;
        if let Some(body) = self.live_body(world) {
            world.remove_colliders(body);
            world.add_collider(body, &self.collider());
            log::debug!("Marble collider resized to {:.2}", radius);
        }
    }

    fn collider(&self) -> ColliderDesc {
        ColliderDesc::ball(self.radius).material(MARBLE_RESTITUTION, MARBLE_FRICTION)
    }

    fn live_body(&self, world: &impl PhysicsWorld) -> Option<BodyHandle> {
        let body = self.body.filter(|b| world.contains(*b));
        if body.is_none() {
            log::trace!("Marble body not attached yet");
        }
        body
    }

    /// Push the marble for every held direction
    pub fn apply_controls(&self, world: &mut impl PhysicsWorld, controls: &ControlState, dt: f32) {
        let Some(body) = self.live_body(world) else {
            return;
        };
        let (impulse, torque) = movement_impulses(controls, dt);
        if impulse != Vec3::ZERO {
            world.apply_impulse(body, impulse);
        }
        if torque != Vec3::ZERO {
            world.apply_torque_impulse(body, torque);
        }
    }

    /// Jump if a surface is right under the marble. Returns whether it jumped.
    pub fn try_jump(&self, world: &mut impl PhysicsWorld) -> bool {
        let Some(body) = self.live_body(world) else {
            return false;
        };
        let Some(center) = world.translation(body) else {
            return false;
        };

        let origin = center - Vec3::new(0.0, self.radius + JUMP_RAY_CLEARANCE, 0.0);
        let ray = Ray::new(origin, Vec3::NEG_Y);
        match world.cast_ray(&ray, JUMP_RAY_LENGTH, true) {
            Some(toi) if toi < JUMP_GROUND_TOI => {
                world.apply_impulse(body, Vec3::new(0.0, JUMP_IMPULSE, 0.0));
                true
            }
            _ => false,
        }
    }

    /// Back to spawn, motionless
    pub fn reset(&mut self, world: &mut impl PhysicsWorld) {
        self.position = SPAWN_POINT;
        let Some(body) = self.live_body(world) else {
            return;
        };
        world.set_translation(body, SPAWN_POINT);
        world.set_linvel(body, Vec3::ZERO);
        world.set_angvel(body, Vec3::ZERO);
        log::debug!("Marble reset to spawn");
    }

    /// Read the body back after the engine step and move the camera
    pub fn sync(&mut self, world: &impl PhysicsWorld, dt: f32) -> Option<Vec3> {
        let body = self.live_body(world)?;
        self.position = world.translation(body)?;
        self.camera.follow(self.position, dt);
        Some(self.position)
    }
}
