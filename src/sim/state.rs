//! Game phase machine and session timer
//!
//! The phase is owned by the session and passed by reference to whoever
//! needs it. Every transition that actually happens queues a [`PhaseEvent`];
//! repeated or illegal requests are absorbed as no-ops.

use serde::{Deserialize, Serialize};

use crate::format_seconds;

/// Top-level mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Marble at spawn, appearance editable, waiting for any input
    #[default]
    Ready,
    /// Timer running
    Playing,
    /// Finish line crossed, timer frozen
    Ended,
}

/// Timestamps in seconds of the simulation clock
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionClock {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

/// Monotonic simulation time, advanced by frame deltas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimClock {
    elapsed: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Negative deltas are ignored so time never runs backwards
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += f64::from(dt.max(0.0));
    }

    /// Seconds since the session began
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// A transition that took effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseEvent {
    Started { at: f64 },
    Ended { at: f64, elapsed: f64 },
    /// Entered `Ready` from `from` (may be `Ready` itself)
    Restarted { from: GamePhase },
}

impl PhaseEvent {
    /// The phase this event leaves the machine in
    pub fn phase(&self) -> GamePhase {
        match self {
            PhaseEvent::Started { .. } => GamePhase::Playing,
            PhaseEvent::Ended { .. } => GamePhase::Ended,
            PhaseEvent::Restarted { .. } => GamePhase::Ready,
        }
    }
}

/// Phase + timer with idempotent transition entry points
#[derive(Debug, Clone, Default)]
pub struct PhaseMachine {
    phase: GamePhase,
    clock: SessionClock,
    pending: Vec<PhaseEvent>,
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn clock(&self) -> SessionClock {
        self.clock
    }

    /// `Ready -> Playing`, recording the start time
    pub fn start(&mut self, now: f64) -> Option<PhaseEvent> {
        if self.phase != GamePhase::Ready {
            log::debug!("start() ignored in {:?}", self.phase);
            return None;
        }
        self.phase = GamePhase::Playing;
        self.clock.start_time = Some(now);
        self.clock.end_time = None;
        log::info!("Run started at {:.2}s", now);
        Some(self.push(PhaseEvent::Started { at: now }))
    }

    /// `Playing -> Ended`, recording the end time
    pub fn end(&mut self, now: f64) -> Option<PhaseEvent> {
        if self.phase != GamePhase::Playing {
            log::debug!("end() ignored in {:?}", self.phase);
            return None;
        }
        self.phase = GamePhase::Ended;
        self.clock.end_time = Some(now);
        let elapsed = self.elapsed(now);
        log::info!("Run finished in {}s", format_seconds(elapsed));
        Some(self.push(PhaseEvent::Ended { at: now, elapsed }))
    }

    /// Any phase `-> Ready`, clearing both timestamps.
    ///
    /// A ready-entry that observers have not drained yet absorbs further
    /// restarts, so the marble is reset once per entry.
    pub fn restart(&mut self) -> Option<PhaseEvent> {
        let from = self.phase;
        self.phase = GamePhase::Ready;
        self.clock = SessionClock::default();

        if matches!(self.pending.last(), Some(PhaseEvent::Restarted { .. })) {
            log::debug!("restart() coalesced with pending ready-entry");
            return None;
        }
        log::info!("Restart from {:?}", from);
        Some(self.push(PhaseEvent::Restarted { from }))
    }

    /// Seconds on the timer: running while playing, frozen once ended
    pub fn elapsed(&self, now: f64) -> f64 {
        match (self.phase, self.clock.start_time, self.clock.end_time) {
            (GamePhase::Playing, Some(start), _) => (now - start).max(0.0),
            (GamePhase::Ended, Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Timer text with two decimals
    pub fn format_elapsed(&self, now: f64) -> String {
        format_seconds(self.elapsed(now))
    }

    /// The restart control is only offered after finishing
    pub fn restart_available(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// Marble appearance may only change before the run starts
    pub fn appearance_editable(&self) -> bool {
        self.phase == GamePhase::Ready
    }

    /// Take queued transitions in the order they happened
    pub fn drain_events(&mut self) -> Vec<PhaseEvent> {
        std::mem::take(&mut self.pending)
    }

    fn push(&mut self, event: PhaseEvent) -> PhaseEvent {
        self.pending.push(event);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_only_from_ready() {
        let mut m = PhaseMachine::new();
        assert_eq!(m.phase(), GamePhase::Ready);

        assert_eq!(m.start(100.0), Some(PhaseEvent::Started { at: 100.0 }));
        assert_eq!(m.phase(), GamePhase::Playing);
        assert_eq!(m.clock().start_time, Some(100.0));

        // Repeated starts are no-ops and keep the original timestamp
        assert_eq!(m.start(101.0), None);
        assert_eq!(m.start(150.0), None);
        assert_eq!(m.clock().start_time, Some(100.0));
        assert_eq!(m.drain_events().len(), 1);
    }

    #[test]
    fn test_end_only_from_playing() {
        let mut m = PhaseMachine::new();
        assert_eq!(m.end(5.0), None);
        assert_eq!(m.phase(), GamePhase::Ready);

        m.start(1.0);
        assert!(m.end(4.5).is_some());
        assert_eq!(m.phase(), GamePhase::Ended);
        assert_eq!(m.end(9.0), None);
        assert_eq!(m.clock().end_time, Some(4.5));

        // Ended cannot be started again without a restart
        assert_eq!(m.start(10.0), None);
        assert_eq!(m.phase(), GamePhase::Ended);
    }

    #[test]
    fn test_restart_from_every_phase_clears_clock() {
        for setup in [0, 1, 2] {
            let mut m = PhaseMachine::new();
            if setup >= 1 {
                m.start(2.0);
            }
            if setup >= 2 {
                m.end(3.0);
            }
            m.drain_events();

            assert!(m.restart().is_some());
            assert_eq!(m.phase(), GamePhase::Ready);
            assert_eq!(m.clock(), SessionClock::default());
        }
    }

    #[test]
    fn test_restart_coalesces_until_drained() {
        let mut m = PhaseMachine::new();
        m.start(0.0);
        assert_eq!(
            m.restart(),
            Some(PhaseEvent::Restarted {
                from: GamePhase::Playing
            })
        );
        assert_eq!(m.restart(), None);

        let events = m.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].phase(), GamePhase::Ready);

        // Once observed, a new restart is a new ready-entry
        assert!(m.restart().is_some());
    }

    #[test]
    fn test_elapsed_running_and_frozen() {
        let mut m = PhaseMachine::new();
        assert_eq!(m.elapsed(50.0), 0.0);

        m.start(10.0);
        let a = m.elapsed(12.0);
        let b = m.elapsed(12.5);
        assert!(b >= a);
        assert_eq!(m.format_elapsed(12.5), "2.50");

        m.end(13.25);
        assert_eq!(m.elapsed(20.0), 3.25);
        assert_eq!(m.elapsed(99.0), 3.25);
        assert_eq!(m.format_elapsed(99.0), "3.25");
    }

    #[test]
    fn test_sim_clock_is_monotonic() {
        let mut clock = SimClock::new();
        clock.advance(0.5);
        clock.advance(-1.0);
        clock.advance(0.25);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn test_ui_queries_follow_phase() {
        let mut m = PhaseMachine::new();
        assert!(m.appearance_editable());
        assert!(!m.restart_available());

        m.start(0.0);
        assert!(!m.appearance_editable());
        assert!(!m.restart_available());

        m.end(1.0);
        assert!(m.restart_available());
    }
}
