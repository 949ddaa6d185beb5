//! Listener bookkeeping for provider notifications

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::{ProviderEvent, ProviderEventKind};

pub type Listener = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    listeners: HashMap<ProviderEventKind, Vec<(ListenerId, Listener)>>,
}

/// Registered listeners per event kind
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Mutex<RegistryInner>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: ProviderEventKind, listener: Listener) -> ListenerId {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let id = ListenerId(inner.next_id);
        inner.listeners.entry(kind).or_default().push((id, listener));
        id
    }

    pub fn unsubscribe(&self, kind: ProviderEventKind, id: ListenerId) -> bool {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(listeners) = inner.listeners.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        before != listeners.len()
    }

    /// Call every listener for the event's kind, returns how many were called
    pub fn emit(&self, event: &ProviderEvent) -> usize {
        // Listeners run outside the lock so they may (un)subscribe themselves
        let listeners: Vec<Listener> = {
            let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner
                .listeners
                .get(&event.kind())
                .map(|l| l.iter().map(|(_, listener)| listener.clone()).collect())
                .unwrap_or_default()
        };

        tracing::debug!(event = event.kind().as_str(), listeners = listeners.len(), "Emitting provider event");
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn listener_count(&self, kind: ProviderEventKind) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.listeners.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("accounts_changed", &self.listener_count(ProviderEventKind::AccountsChanged))
            .field("chain_changed", &self.listener_count(ProviderEventKind::ChainChanged))
            .finish()
    }
}
