pub mod autoplay;
pub mod emitter;
pub mod events;
pub mod minigame;
pub mod rng;
pub mod session;
pub mod skill;
pub mod timer;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::events::{EventKind, GameEvent};
    use crate::minigame::Minigame;
    use crate::session::{Phase, Session};

    /// Shared log of every event a session emits.
    pub type EventLog = Rc<RefCell<Vec<GameEvent>>>;

    /// Subscribe a recorder to every event kind.
    pub fn record_events<G: Minigame>(session: &mut Session<G>) -> EventLog {
        let log: EventLog = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        session.on_any(move |e| sink.borrow_mut().push(e.clone()));
        log
    }

    pub fn count_events(log: &EventLog, kind: EventKind) -> usize {
        log.borrow().iter().filter(|e| e.kind() == kind).count()
    }

    /// Run `n` session updates of `delta_ms` each.
    pub fn run_ticks<G: Minigame>(session: &mut Session<G>, n: usize, delta_ms: f32) {
        for _ in 0..n {
            session.update(delta_ms);
        }
    }

    // ================================================================
    // Minigame Contract Tests
    // ================================================================
    // Every Minigame implementation must pass these. Game crates call them
    // from their own #[cfg(test)] modules with a fresh session.

    /// start() from idle must enter Playing and emit exactly one Start.
    pub fn contract_start_enters_playing<G: Minigame>(session: &mut Session<G>) {
        let log = record_events(session);
        assert!(session.start(), "start() from idle must succeed");
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(count_events(&log, EventKind::Start), 1);
        assert_eq!(session.stats().score, 0);
        assert_eq!(session.stats().combo, 1.0);
    }

    /// update() before start() must not move time forward.
    pub fn contract_update_is_noop_when_idle<G: Minigame>(session: &mut Session<G>) {
        assert_eq!(session.phase(), Phase::Idle);
        run_ticks(session, 10, 100.0);
        assert_eq!(session.stats().play_time_ms, 0.0);
        assert_eq!(session.phase(), Phase::Idle);
    }

    /// pause() must freeze play time; resume() must unfreeze it.
    pub fn contract_pause_stops_updates<G: Minigame>(session: &mut Session<G>) {
        if session.phase() != Phase::Playing {
            session.start();
        }
        assert!(session.pause());
        let frozen = session.stats().clone();
        run_ticks(session, 5, 100.0);
        assert_eq!(*session.stats(), frozen, "stats must not change while paused");

        assert!(session.resume());
        session.update(10.0);
        assert!(
            session.stats().play_time_ms > frozen.play_time_ms
                || session.phase() == Phase::Ended,
            "play time must advance after resume"
        );
    }

    /// end() must emit End carrying the same stats it returns.
    pub fn contract_end_reports_final_stats<G: Minigame>(session: &mut Session<G>) {
        if session.phase() != Phase::Playing {
            session.start();
        }
        let log = record_events(session);
        let stats = session.end().expect("end() during a run must report stats");
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(log.borrow().last(), Some(&GameEvent::End(stats)));
        assert!(session.end().is_none(), "second end() must be a no-op");
    }

    /// destroy() must be idempotent and leave the session ended and silent.
    pub fn contract_destroy_is_idempotent<G: Minigame>(session: &mut Session<G>) {
        if session.phase() != Phase::Playing {
            session.start();
        }
        let log = record_events(session);
        session.destroy();
        session.destroy();
        assert_eq!(session.phase(), Phase::Ended);
        assert_eq!(count_events(&log, EventKind::End), 1);

        session.start();
        assert_eq!(
            count_events(&log, EventKind::Start),
            0,
            "destroy() must clear listeners"
        );
    }
}
