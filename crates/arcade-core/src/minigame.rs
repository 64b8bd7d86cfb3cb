use serde::{Deserialize, Serialize};

use crate::session::SessionCore;

/// Domain logic plugged into a [`Session`](crate::session::Session).
///
/// The session owns the phase machine, countdown, scoring and events; a
/// minigame only fills in what happens on start, on each frame, on end, and
/// when input arrives. Hooks receive the [`SessionCore`] to score, emit
/// events, or ask for the session to end.
pub trait Minigame {
    /// Input accepted by [`Session::handle_input`](crate::session::Session::handle_input).
    type Input;
    /// What the game reports back for a piece of input.
    type Outcome;

    /// Display metadata for menus and logs.
    fn metadata(&self) -> MinigameMetadata;

    /// Countdown length in milliseconds, read on every start. 0 = untimed.
    fn time_limit_ms(&self) -> f32 {
        0.0
    }

    /// Called after the session has reset its stats and entered `Playing`.
    fn on_start(&mut self, core: &mut SessionCore);

    /// Called once per frame while `Playing`, after the countdown advanced.
    /// Call [`SessionCore::request_end`] and return to finish the session.
    fn on_update(&mut self, core: &mut SessionCore, delta_ms: f32);

    /// Called once when the session ends, before the `End` event.
    fn on_end(&mut self, _core: &mut SessionCore) {}

    /// Single mutation point for player or controller input.
    fn on_input(&mut self, core: &mut SessionCore, input: Self::Input) -> Self::Outcome;
}

/// Minigame metadata for menus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinigameMetadata {
    pub name: String,
    pub description: String,
}
