use crate::minigame::Minigame;
use crate::session::Session;
use crate::skill::SkillLevel;

/// A synthetic player that reads a session each frame and feeds it input.
///
/// The frame driver calls [`AutoPlayer::update`] once per frame, in a fixed
/// order relative to [`Session::update`]. Input written here is consumed by
/// the session's next update.
pub trait AutoPlayer {
    type Game: Minigame;

    fn level(&self) -> SkillLevel;

    /// Inspect the session and push input. Must be a no-op while the session
    /// is not playing or after [`AutoPlayer::destroy`].
    fn update(&mut self, session: &mut Session<Self::Game>, delta_ms: f32);

    /// Release cached state and stop reacting. Idempotent.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

/// Run one frame in controller-then-session order.
pub fn drive_frame<P: AutoPlayer>(
    player: &mut P,
    session: &mut Session<P::Game>,
    delta_ms: f32,
) {
    player.update(session, delta_ms);
    session.update(delta_ms);
}
