//! Per-frame session driver
//!
//! A [`Session`] owns the physics world and everything living in it, and
//! advances them once per rendered frame in a fixed order: sample input,
//! push the marble, step physics, read the marble back and move the camera,
//! retarget obstacles, check finish/fall, then hand phase transitions to
//! observers.

use super::bounds::Bounds;
use super::camera::CameraFrame;
use super::input::{ControlState, InputEvent, InputTracker, SubscriptionId, Subscriptions};
use super::obstacle::{Obstacle, update_obstacles};
use super::player::{PlayerController, Termination};
use super::state::{GamePhase, PhaseEvent, PhaseMachine, SimClock};
use super::track::{Track, TrackError, generate};
use crate::physics::PhysicsWorld;
use crate::settings::{GameConfig, MarbleAppearance};

/// Longest frame the simulation will integrate at once
pub const MAX_FRAME_DT: f32 = 0.1;

/// One game session: track, obstacles, walls, marble, phase and timer
pub struct Session<W: PhysicsWorld> {
    config: GameConfig,
    world: W,
    clock: SimClock,
    phase: PhaseMachine,
    track: Track,
    obstacles: Vec<Obstacle>,
    bounds: Bounds,
    player: PlayerController,
    input: InputTracker,
    input_observers: Subscriptions<InputEvent>,
    phase_observers: Subscriptions<PhaseEvent>,
    torn_down: bool,
}

impl<W: PhysicsWorld> Session<W> {
    /// Generate the track and populate `world`. Invalid configs build nothing.
    pub fn new(config: GameConfig, mut world: W) -> Result<Self, TrackError> {
        let track = generate(config.segment_count, &config.obstacle_types, config.seed)?;
        let marble = config.marble.clone().clamped();

        let mut player = PlayerController::new(marble.radius);
        player.attach(&mut world);

        let mut session = Self {
            config: GameConfig { marble, ..config },
            world,
            clock: SimClock::new(),
            phase: PhaseMachine::new(),
            obstacles: Vec::new(),
            bounds: Bounds::new(track.bounds_length()),
            track,
            player,
            input: InputTracker::new(),
            input_observers: Subscriptions::new(),
            phase_observers: Subscriptions::new(),
            torn_down: false,
        };
        session.populate();

        log::info!(
            "Session ready: {} segments, seed {}",
            session.track.segments().len(),
            session.track.seed()
        );
        Ok(session)
    }

    fn populate(&mut self) {
        self.obstacles = self
            .track
            .obstacles()
            .iter()
            .map(|state| {
                let mut obstacle = Obstacle::new(*state);
                obstacle.attach(&mut self.world);
                obstacle
            })
            .collect();
        self.bounds = Bounds::new(self.track.bounds_length());
        self.bounds.attach(&mut self.world);
    }

    fn depopulate(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.detach(&mut self.world);
        }
        self.obstacles.clear();
        self.bounds.detach(&mut self.world);
    }

    /// Advance one frame. Returns the phase transitions it caused.
    pub fn tick(&mut self, dt: f32, controls: ControlState) -> Vec<PhaseEvent> {
        if self.torn_down {
            return Vec::new();
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.clock.advance(dt);
        let now = self.clock.elapsed();

        // Input edges
        let events = self.input.sample(controls);
        for event in &events {
            self.input_observers.notify(event);
            if *event == InputEvent::JumpPressed {
                self.player.try_jump(&mut self.world);
            }
        }
        if !events.is_empty() {
            self.phase.start(now);
        }

        self.player.apply_controls(&mut self.world, &controls, dt);
        self.world.step(dt);
        let position = self.player.sync(&self.world, dt);

        update_obstacles(&self.obstacles, &mut self.world, now as f32);

        if let Some(position) = position {
            let check = Termination::evaluate(position, self.track.finish_line_z());
            if check.finished && self.phase.phase() == GamePhase::Playing {
                self.phase.end(now);
            }
            if check.fell {
                self.phase.restart();
            }
        }

        self.dispatch_phase_events()
    }

    /// Hand queued transitions to the marble and observers.
    ///
    /// Each ready-entry resets the marble exactly once.
    fn dispatch_phase_events(&mut self) -> Vec<PhaseEvent> {
        let events = self.phase.drain_events();
        for event in &events {
            if let PhaseEvent::Restarted { .. } = event {
                self.player.reset(&mut self.world);
            }
            self.phase_observers.notify(event);
        }
        events
    }

    /// Back to `Ready` from any phase
    pub fn restart(&mut self) -> Vec<PhaseEvent> {
        self.phase.restart();
        self.dispatch_phase_events()
    }

    /// Rebuild track, obstacles and walls from a new config.
    ///
    /// The marble body is kept and reset. On error nothing changes.
    pub fn regenerate(&mut self, config: GameConfig) -> Result<(), TrackError> {
        let track = generate(config.segment_count, &config.obstacle_types, config.seed)?;
        self.depopulate();
        self.track = track;
        self.populate();
        self.input.reset();

        let marble = config.marble.clone().clamped();
        self.player.set_radius(&mut self.world, marble.radius);
        self.config = GameConfig { marble, ..config };

        self.phase.restart();
        self.dispatch_phase_events();
        log::info!("Track regenerated with seed {}", self.track.seed());
        Ok(())
    }

    /// Change the marble; refused once the run has started
    pub fn set_marble(&mut self, appearance: MarbleAppearance) -> bool {
        if !self.phase.appearance_editable() {
            log::debug!("Marble appearance is locked in {:?}", self.phase.phase());
            return false;
        }
        let appearance = appearance.clamped();
        self.player.set_radius(&mut self.world, appearance.radius);
        self.config.marble = appearance;
        true
    }

    /// Remove every body this session created and drop all observers
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.depopulate();
        self.player.detach(&mut self.world);
        self.input_observers.clear();
        self.phase_observers.clear();
        self.torn_down = true;
        log::info!("Session torn down");
    }

    pub fn subscribe_input(&mut self, callback: impl FnMut(&InputEvent) + 'static) -> SubscriptionId {
        self.input_observers.subscribe(callback)
    }

    pub fn unsubscribe_input(&mut self, id: SubscriptionId) -> bool {
        self.input_observers.unsubscribe(id)
    }

    pub fn subscribe_phase(&mut self, callback: impl FnMut(&PhaseEvent) + 'static) -> SubscriptionId {
        self.phase_observers.subscribe(callback)
    }

    pub fn unsubscribe_phase(&mut self, id: SubscriptionId) -> bool {
        self.phase_observers.unsubscribe(id)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase.phase()
    }

    /// Read-only view of phase and timestamps
    pub fn phase_machine(&self) -> &PhaseMachine {
        &self.phase
    }

    /// Simulation seconds since the session began
    pub fn now(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Timer value for display
    pub fn elapsed(&self) -> f64 {
        self.phase.elapsed(self.now())
    }

    pub fn format_elapsed(&self) -> String {
        self.phase.format_elapsed(self.now())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn marble(&self) -> &MarbleAppearance {
        &self.config.marble
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn camera(&self) -> &CameraFrame {
        self.player.camera()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl<W: PhysicsWorld> Drop for Session<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}
