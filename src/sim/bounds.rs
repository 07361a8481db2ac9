//! Static corridor around the track
//!
//! Two side walls, an end wall, a floor-level catch volume, and the finish
//! block on the end pad, all placed from the number of segments the track
//! spans.

use glam::Vec3;

use crate::consts::SEGMENT_LENGTH;
use crate::physics::{BodyDesc, BodyHandle, ColliderDesc, PhysicsWorld};

const WALL_RESTITUTION: f32 = 0.2;
const WALL_FRICTION: f32 = 0.0;
const FLOOR_FRICTION: f32 = 1.0;
const WALL_HEIGHT: f32 = 1.5;
const WALL_THICKNESS: f32 = 0.3;
const FLOOR_THICKNESS: f32 = 0.2;
/// Corridor half-width (segments are 4 wide)
const HALF_WIDTH: f32 = SEGMENT_LENGTH / 2.0;
/// Finish block sits on the end pad, raised off the pad surface
const FINISH_BLOCK_LIFT: f32 = 0.25;
const FINISH_BLOCK_HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.25, 0.3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPart {
    RightWall,
    LeftWall,
    EndWall,
    Floor,
    /// Slippery block on the end pad
    FinishBlock,
}

/// One axis-aligned collision box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryVolume {
    pub part: BoundaryPart,
    pub center: Vec3,
    pub half_extents: Vec3,
    pub friction: f32,
}

impl BoundaryVolume {
    fn collider(&self) -> ColliderDesc {
        ColliderDesc::cuboid(self.half_extents)
            .at(self.center)
            .material(WALL_RESTITUTION, self.friction)
    }

    /// Inclusive z range covered by this volume
    pub fn z_range(&self) -> (f32, f32) {
        (
            self.center.z - self.half_extents.z,
            self.center.z + self.half_extents.z,
        )
    }
}

/// The corridor for a track spanning `length` segments (start and end included)
#[derive(Debug, Clone)]
pub struct Bounds {
    length: u32,
    volumes: [BoundaryVolume; 5],
    body: Option<BodyHandle>,
}

impl Bounds {
    pub fn new(length: u32) -> Self {
        let l = length as f32;
        // Segment 0 is centered on z=0, so the corridor starts half a segment ahead
        let mid_z = -(l * SEGMENT_LENGTH / 2.0) + HALF_WIDTH;
        let half_len = l * SEGMENT_LENGTH / 2.0;
        let wall_x = HALF_WIDTH + WALL_THICKNESS / 2.0;
        let wall_y = WALL_HEIGHT / 2.0;

        let side = |part, x| BoundaryVolume {
            part,
            center: Vec3::new(x, wall_y, mid_z),
            half_extents: Vec3::new(WALL_THICKNESS / 2.0, WALL_HEIGHT / 2.0, half_len),
            friction: WALL_FRICTION,
        };

        let volumes = [
            side(BoundaryPart::RightWall, wall_x),
            side(BoundaryPart::LeftWall, -wall_x),
            BoundaryVolume {
                part: BoundaryPart::EndWall,
                center: Vec3::new(0.0, wall_y, -(l * SEGMENT_LENGTH) + HALF_WIDTH),
                half_extents: Vec3::new(HALF_WIDTH, WALL_HEIGHT / 2.0, WALL_THICKNESS / 2.0),
                friction: WALL_FRICTION,
            },
            BoundaryVolume {
                part: BoundaryPart::Floor,
                center: Vec3::new(0.0, -FLOOR_THICKNESS / 2.0, mid_z),
                half_extents: Vec3::new(HALF_WIDTH, FLOOR_THICKNESS / 2.0, half_len),
                friction: FLOOR_FRICTION,
            },
            BoundaryVolume {
                part: BoundaryPart::FinishBlock,
                center: Vec3::new(
                    0.0,
                    FINISH_BLOCK_LIFT + FINISH_BLOCK_HALF_EXTENTS.y,
                    -(l - 1.0) * SEGMENT_LENGTH,
                ),
                half_extents: FINISH_BLOCK_HALF_EXTENTS,
                friction: WALL_FRICTION,
            },
        ];

        Self {
            length,
            volumes,
            body: None,
        }
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn volumes(&self) -> &[BoundaryVolume] {
        &self.volumes
    }

    pub fn volume(&self, part: BoundaryPart) -> &BoundaryVolume {
        // volumes always holds one of each part
        self.volumes
            .iter()
            .find(|v| v.part == part)
            .unwrap_or(&self.volumes[0])
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Create one fixed body carrying every volume as a collider
    pub fn attach(&mut self, world: &mut impl PhysicsWorld) -> BodyHandle {
        let body = world.create_body(&BodyDesc::fixed());
        for volume in &self.volumes {
            world.add_collider(body, &volume.collider());
        }
        self.body = Some(body);
        body
    }

    pub fn detach(&mut self, world: &mut impl PhysicsWorld) {
        if let Some(body) = self.body.take() {
            world.destroy_body(body);
        }
    }
}
