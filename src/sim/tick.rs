//! Fixed-cadence simulation tick
//!
//! Motion completes for every shape before any pair is checked, so
//! collisions always see post-move positions.

use super::collision::resolve_collisions;
use super::motion::integrate;
use super::state::{Bounds, GamePhase, GameState, Rect};
use crate::tuning::Tuning;

/// Arena geometry for a single tick (refreshed by the presentation layer)
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub bounds: Bounds,
    pub panel: Rect,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// False when the phase did not allow the simulation to advance
    pub advanced: bool,
    /// Raw circle/triangle contact this tick (before confirmation)
    pub contact: bool,
    /// Contact was confirmed and the session entered `Over`
    pub game_over: bool,
    pub bounces: u32,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning) -> TickOutcome {
    if state.phase != GamePhase::Running {
        return TickOutcome::default();
    }

    state.time_ticks += 1;

    for shape in state.shapes.iter_mut() {
        integrate(shape, input.bounds, &input.panel);
    }

    let report = resolve_collisions(&mut state.shapes, input.bounds, tuning.hit_epsilon);
    let confirmed = state.contact.observe(report.contact);

    if confirmed {
        state.phase = GamePhase::Over;
        log::info!(
            "Contact confirmed after {} ticks: game over at tick {} with score {}",
            state.contact.streak(),
            state.time_ticks,
            state.score
        );
    }

    TickOutcome {
        advanced: true,
        contact: report.contact,
        game_over: confirmed,
        bounces: report.bounces,
    }
}
