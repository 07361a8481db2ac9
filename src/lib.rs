//! Marble Runner - simulation core of a 3D marble obstacle course
//!
//! Core modules:
//! - `sim`: Track generation, obstacle kinematics, player control, phase machine
//! - `physics`: Physics engine seam (`PhysicsWorld`) and the optional rapier backend
//! - `settings`: Game configuration and marble appearance

pub mod physics;
pub mod settings;
pub mod sim;

pub use physics::{BodyHandle, PhysicsWorld};
pub use settings::{ConfigError, GameConfig, MarbleAppearance};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Length of one track segment along -z
    pub const SEGMENT_LENGTH: f32 = 4.0;
    /// Default number of obstacle segments between start and end
    pub const DEFAULT_SEGMENT_COUNT: u32 = 5;
    /// Longest course the generator will build
    pub const MAX_SEGMENT_COUNT: u32 = 1000;

    /// Where the marble is placed on every ready-entry
    pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    /// Below this height the marble has left the track
    pub const FALL_THRESHOLD: f32 = -4.0;
    /// Past the last segment by this much counts as finishing
    pub const FINISH_MARGIN: f32 = 2.0;

    /// Movement impulse per second of held input
    pub const IMPULSE_STRENGTH: f32 = 0.6;
    /// Rolling torque impulse per second of held input
    pub const TORQUE_STRENGTH: f32 = 0.2;
    /// Upward impulse of a jump
    pub const JUMP_IMPULSE: f32 = 0.5;
    /// Grounding ray length
    pub const JUMP_RAY_LENGTH: f32 = 10.0;
    /// Ray hits closer than this count as standing on a surface
    pub const JUMP_GROUND_TOI: f32 = 0.15;
    /// Gap between the marble surface and the grounding ray origin
    pub const JUMP_RAY_CLEARANCE: f32 = 0.01;

    /// Marble body material
    pub const MARBLE_RESTITUTION: f32 = 0.2;
    pub const MARBLE_FRICTION: f32 = 1.0;
    pub const MARBLE_DAMPING: f32 = 0.5;

    /// Camera sits behind and above the marble
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.65, 2.25);
    /// Camera looks slightly above the marble
    pub const CAMERA_TARGET_OFFSET: Vec3 = Vec3::new(0.0, 0.25, 0.0);
    /// Camera starts far away and zooms in
    pub const CAMERA_START: Vec3 = Vec3::new(10.0, 10.0, 10.0);
    /// Exponential smoothing rate (per second)
    pub const CAMERA_SMOOTHING: f32 = 5.0;

    /// Obstacle bodies rest this high above their segment
    pub const OBSTACLE_BODY_HEIGHT: f32 = 0.3;
    /// Spinner angular speed magnitude range (rad/s)
    pub const SPINNER_MIN_SPEED: f32 = 0.2;
    pub const SPINNER_MAX_SPEED: f32 = 1.2;
    /// Limbo bar sweeps through the marble's height around this offset
    pub const LIMBO_BIAS: f32 = 1.15;
    /// Axe swing half-width
    pub const AXE_AMPLITUDE: f32 = 1.25;
    /// Axe blade center height
    pub const AXE_HEIGHT: f32 = 0.75;
    /// Obstacle material
    pub const OBSTACLE_RESTITUTION: f32 = 0.2;
    pub const OBSTACLE_FRICTION: f32 = 0.0;
}

/// Fraction to move toward a target this frame for exponential smoothing.
///
/// Scaled by `dt` so the motion is frame-rate independent, clamped so a long
/// frame never overshoots.
#[inline]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

/// Move `current` toward `target` by the smoothing factor for this frame
#[inline]
pub fn smooth_toward(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, smoothing_factor(rate, dt))
}

/// Format seconds for the timer display (two decimals)
pub fn format_seconds(secs: f64) -> String {
    format!("{:.2}", secs)
}
