//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded track generation
//! - Kinematic obstacles driven purely by elapsed time
//! - Marble control through a physics engine abstraction
//! - No rendering or platform dependencies

pub mod bounds;
pub mod camera;
pub mod input;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod tick;
pub mod track;

pub use bounds::{BoundaryPart, BoundaryVolume, Bounds};
pub use camera::CameraFrame;
pub use input::{Control, ControlState, InputEvent, InputTracker, SubscriptionId, Subscriptions};
pub use obstacle::{KinematicPose, Motion, Obstacle, ObstacleKind, ObstacleState, update_obstacles};
pub use player::{PlayerController, Termination, movement_impulses};
pub use state::{GamePhase, PhaseEvent, PhaseMachine, SessionClock, SimClock};
pub use tick::{MAX_FRAME_DT, Session};
pub use track::{SegmentKind, Track, TrackError, TrackSegment, generate, segment_position};
