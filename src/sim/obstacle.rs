//! Obstacle kinematics
//!
//! Each obstacle holds the random parameter it was created with and derives
//! its kinematic target from elapsed simulation time alone.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::physics::{BodyDesc, BodyHandle, BodyKind, ColliderDesc, PhysicsWorld};

/// Animated obstacle kinds a track can draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    /// Bar rotating about the vertical axis
    Spinner,
    /// Bar bobbing up and down
    Limbo,
    /// Blade swinging side to side
    Axe,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::Spinner, ObstacleKind::Limbo, ObstacleKind::Axe];

    /// Collider half extents of the moving part
    pub fn half_extents(&self) -> Vec3 {
        match self {
            ObstacleKind::Spinner | ObstacleKind::Limbo => Vec3::new(1.75, 0.15, 0.15),
            ObstacleKind::Axe => Vec3::new(0.75, 0.75, 0.15),
        }
    }
}

/// Per-instance motion parameters, drawn once
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Signed angular speed (rad/s)
    Spin { speed: f32 },
    /// Sine frequency of the vertical sweep
    Limbo { frequency: f32 },
    /// Sine frequency of the horizontal swing
    Axe { frequency: f32 },
}

impl Motion {
    /// Draw the random parameter for `kind`
    pub fn random(kind: ObstacleKind, rng: &mut impl Rng) -> Self {
        match kind {
            ObstacleKind::Spinner => {
                let magnitude = rng.random_range(SPINNER_MIN_SPEED..SPINNER_MAX_SPEED);
                let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
                Motion::Spin {
                    speed: magnitude * sign,
                }
            }
            ObstacleKind::Limbo => Motion::Limbo {
                frequency: rng.random_range(0.0..TAU),
            },
            ObstacleKind::Axe => Motion::Axe {
                frequency: rng.random_range(0.0..TAU),
            },
        }
    }

    pub fn kind(&self) -> ObstacleKind {
        match self {
            Motion::Spin { .. } => ObstacleKind::Spinner,
            Motion::Limbo { .. } => ObstacleKind::Limbo,
            Motion::Axe { .. } => ObstacleKind::Axe,
        }
    }
}

/// Target the engine moves a kinematic body to on its next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KinematicPose {
    Rotation(Quat),
    Translation(Vec3),
}

/// One obstacle instance, fixed at track generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleState {
    /// Index of the segment housing this obstacle
    pub segment: u32,
    /// Segment origin in world space
    pub origin: Vec3,
    pub motion: Motion,
}

impl ObstacleState {
    pub fn kind(&self) -> ObstacleKind {
        self.motion.kind()
    }

    /// Where the body is created, before any kinematic target is applied
    pub fn rest_translation(&self) -> Vec3 {
        self.origin + Vec3::new(0.0, OBSTACLE_BODY_HEIGHT, 0.0)
    }

    /// Pure function of elapsed time
    pub fn pose_at(&self, elapsed: f32) -> KinematicPose {
        match self.motion {
            Motion::Spin { speed } => KinematicPose::Rotation(Quat::from_rotation_y(elapsed * speed)),
            Motion::Limbo { frequency } => {
                let y = (elapsed * frequency).sin() + LIMBO_BIAS;
                KinematicPose::Translation(self.origin + Vec3::new(0.0, y, 0.0))
            }
            Motion::Axe { frequency } => {
                let x = (elapsed * frequency).sin() * AXE_AMPLITUDE;
                KinematicPose::Translation(self.origin + Vec3::new(x, AXE_HEIGHT, 0.0))
            }
        }
    }
}

/// An obstacle and its (possibly not yet attached) physics body
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub state: ObstacleState,
    pub body: Option<BodyHandle>,
}

impl Obstacle {
    pub fn new(state: ObstacleState) -> Self {
        Self { state, body: None }
    }

    /// Create the kinematic body and its collider
    pub fn attach(&mut self, world: &mut impl PhysicsWorld) -> BodyHandle {
        let desc = BodyDesc::new(BodyKind::KinematicPosition, self.state.rest_translation());
        let body = world.create_body(&desc);
        world.add_collider(
            body,
            &ColliderDesc::cuboid(self.state.kind().half_extents())
                .material(OBSTACLE_RESTITUTION, OBSTACLE_FRICTION),
        );
        self.body = Some(body);
        body
    }

    pub fn detach(&mut self, world: &mut impl PhysicsWorld) {
        if let Some(body) = self.body.take() {
            world.destroy_body(body);
        }
    }

    /// Push this frame's target to the engine; no body means nothing to move
    pub fn update(&self, world: &mut impl PhysicsWorld, elapsed: f32) {
        let Some(body) = self.body.filter(|b| world.contains(*b)) else {
            log::trace!("Obstacle {} has no body yet", self.state.segment);
            return;
        };
        match self.state.pose_at(elapsed) {
            KinematicPose::Rotation(rotation) => world.set_next_kinematic_rotation(body, rotation),
            KinematicPose::Translation(translation) => {
                world.set_next_kinematic_translation(body, translation)
            }
        }
    }
}

/// Update every obstacle in one pass
pub fn update_obstacles(obstacles: &[Obstacle], world: &mut impl PhysicsWorld, elapsed: f32) {
    for obstacle in obstacles {
        obstacle.update(world, elapsed);
    }
}
