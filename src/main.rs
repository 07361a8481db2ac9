//! Marble Runner headless demo
//!
//! Builds a session on the rapier backend from an optional JSON config path
//! and drives the marble down the track with a scripted autopilot.

use std::error::Error;

use marble_runner::GameConfig;
use marble_runner::physics::rapier::RapierWorld;
use marble_runner::sim::{Control, ControlState, GamePhase, PhaseEvent, Session};

const FRAME_DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 60;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Marble Runner (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {}", path);
            GameConfig::from_json(&std::fs::read_to_string(path)?)?
        }
        None => GameConfig::default(),
    };

    let mut session = Session::new(config, RapierWorld::new())?;
    session.subscribe_phase(|event| match event {
        PhaseEvent::Started { at } => log::info!("GO at {:.2}s", at),
        PhaseEvent::Ended { elapsed, .. } => log::info!("Finished in {:.2}s", elapsed),
        PhaseEvent::Restarted { from } => log::info!("Back to start from {:?}", from),
    });

    for frame in 0..MAX_FRAMES {
        let controls = autopilot(&session, frame);
        session.tick(FRAME_DT, controls);
        if session.phase() == GamePhase::Ended {
            break;
        }
    }

    match session.phase() {
        GamePhase::Ended => println!("Finished in {}s", session.format_elapsed()),
        phase => println!("Gave up in {:?} after {}s", phase, session.format_elapsed()),
    }
    Ok(())
}

/// Roll forward, keep to the centre line, hop every two seconds
fn autopilot(session: &Session<RapierWorld>, frame: u32) -> ControlState {
    let x = session.player().position().x;
    let mut controls = ControlState::default().with(Control::Forward);
    if x > 0.3 {
        controls.set(Control::Leftward, true);
    } else if x < -0.3 {
        controls.set(Control::Rightward, true);
    }
    if frame % 120 == 60 {
        controls.set(Control::Jump, true);
    }
    controls
}
