//! Procedural track generation
//!
//! A track is a start pad, `count` obstacle segments, and an end pad laid out
//! along -z. Obstacle kinds and their motion parameters come from one seeded
//! PCG stream, so a (count, types, seed) triple always yields the same course.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::obstacle::{Motion, ObstacleKind, ObstacleState};
use crate::consts::{FINISH_MARGIN, MAX_SEGMENT_COUNT, SEGMENT_LENGTH};

/// Reasons a track cannot be generated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    #[error("track needs at least one obstacle segment")]
    NoSegments,
    #[error("obstacle type set is empty")]
    EmptyTypeSet,
    #[error("{count} obstacle segments requested, at most {max} allowed")]
    TooManySegments { count: u32, max: u32 },
}

/// What a segment houses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Start,
    End,
    Obstacle(ObstacleKind),
}

/// One fixed-length slice of the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSegment {
    pub kind: SegmentKind,
    pub index: u32,
    pub position: Vec3,
}

impl TrackSegment {
    fn new(kind: SegmentKind, index: u32) -> Self {
        Self {
            kind,
            index,
            position: segment_position(index),
        }
    }
}

/// World position of the segment at `index`
#[inline]
pub fn segment_position(index: u32) -> Vec3 {
    Vec3::new(0.0, 0.0, -(index as f32) * SEGMENT_LENGTH)
}

/// A generated course. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    seed: u64,
    segments: Vec<TrackSegment>,
    obstacles: Vec<ObstacleState>,
}

impl Track {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Start, obstacles, end, in index order
    pub fn segments(&self) -> &[TrackSegment] {
        &self.segments
    }

    /// One state per obstacle segment, in index order
    pub fn obstacles(&self) -> &[ObstacleState] {
        &self.obstacles
    }

    /// Number of obstacle segments
    pub fn obstacle_count(&self) -> u32 {
        self.obstacles.len() as u32
    }

    /// Segments the boundary walls must enclose
    pub fn bounds_length(&self) -> u32 {
        self.segments.len() as u32
    }

    /// Crossing below this z finishes the run
    pub fn finish_line_z(&self) -> f32 {
        -(self.obstacle_count() as f32 * SEGMENT_LENGTH + FINISH_MARGIN)
    }

    pub fn last_segment(&self) -> &TrackSegment {
        // generate() always emits start and end
        &self.segments[self.segments.len() - 1]
    }
}

/// Build a course of `count` obstacles drawn uniformly from `types`.
///
/// Repeating a kind in `types` raises its weight.
pub fn generate(count: u32, types: &[ObstacleKind], seed: u64) -> Result<Track, TrackError> {
    if count == 0 {
        return Err(TrackError::NoSegments);
    }
    if count > MAX_SEGMENT_COUNT {
        return Err(TrackError::TooManySegments {
            count,
            max: MAX_SEGMENT_COUNT,
        });
    }
    if types.is_empty() {
        return Err(TrackError::EmptyTypeSet);
    }

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut segments = Vec::with_capacity(count as usize + 2);
    let mut obstacles = Vec::with_capacity(count as usize);

    segments.push(TrackSegment::new(SegmentKind::Start, 0));
    for index in 1..=count {
        let kind = types[rng.random_range(0..types.len())];
        let segment = TrackSegment::new(SegmentKind::Obstacle(kind), index);
        obstacles.push(ObstacleState {
            segment: index,
            origin: segment.position,
            motion: Motion::random(kind, &mut rng),
        });
        segments.push(segment);
    }
    segments.push(TrackSegment::new(SegmentKind::End, count + 1));

    log::info!(
        "Generated track: {} obstacles, seed {}, kinds {:?}",
        count,
        seed,
        obstacles.iter().map(|o| o.kind()).collect::<Vec<_>>()
    );

    Ok(Track {
        seed,
        segments,
        obstacles,
    })
}
