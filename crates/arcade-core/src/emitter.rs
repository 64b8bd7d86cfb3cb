use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::events::{EventKind, GameEvent};

/// Handle returned by [`EventBus::on`]; pass it to [`EventBus::off`] to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&GameEvent)>;

/// Per-kind listener registry.
///
/// Listeners for a kind fire in subscription order. Emission walks a snapshot
/// of the registry, so subscribing or unsubscribing during an emit only
/// affects later emits. A listener that panics is logged and skipped; the
/// remaining listeners still run and the panic never reaches the emitter.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, listener: impl Fn(&GameEvent) + 'static) -> ListenerId {
        let id = self.next_listener_id();
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Rc::new(listener)));
        id
    }

    /// Subscribe one listener to every event kind. A single `off` removes all
    /// of its registrations.
    pub fn on_any(&mut self, listener: impl Fn(&GameEvent) + 'static) -> ListenerId {
        let id = self.next_listener_id();
        let listener: Listener = Rc::new(listener);
        for kind in EventKind::ALL {
            self.listeners
                .entry(kind)
                .or_default()
                .push((id, Rc::clone(&listener)));
        }
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for entries in self.listeners.values_mut() {
            let before = entries.len();
            entries.retain(|(lid, _)| *lid != id);
            removed |= entries.len() != before;
        }
        self.listeners.retain(|_, entries| !entries.is_empty());
        removed
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&self, event: &GameEvent) {
        let kind = event.kind();
        let Some(entries) = self.listeners.get(&kind) else {
            return;
        };
        let snapshot: Vec<(ListenerId, Listener)> = entries
            .iter()
            .map(|(id, l)| (*id, Rc::clone(l)))
            .collect();

        for (id, listener) in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::error!(?kind, listener = id.0, "event listener panicked");
            }
        }
    }

    fn next_listener_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }
}
