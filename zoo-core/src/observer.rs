//! Listener registry for animal state changes.

use log::debug;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Receives formatted `"<animal> <event>"` messages.
///
/// Called synchronously from whichever thread changed the animal, so
/// implementations should return quickly.
pub trait Observer: Send + Sync {
    fn notify(&self, message: &str);
}

/// Handle returned by [`ObserverHub::register`]; one per registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserverError {
    #[error("observer {0:?} is not registered")]
    NotRegistered(ObserverId),
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(ObserverId, Arc<dyn Observer>)>,
}

/// Keyed collection of listeners. Registering the same listener twice
/// yields two ids and two deliveries per event.
#[derive(Default)]
pub struct ObserverHub {
    registry: Mutex<Registry>,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, listener: Arc<dyn Observer>) -> ObserverId {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = ObserverId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, listener));
        debug!("observer {:?} registered", id);
        id
    }

    /// Removes exactly the registration behind `id`.
    pub fn unregister(&self, id: ObserverId) -> Result<(), ObserverError> {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let index = registry
            .listeners
            .iter()
            .position(|(registered, _)| *registered == id)
            .ok_or(ObserverError::NotRegistered(id))?;
        registry.listeners.remove(index);
        debug!("observer {:?} unregistered", id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers `"<subject> <event>"` to every registration.
    pub fn notify(&self, subject: &str, event: &str) {
        // Deliver outside the lock so listeners may (un)register from notify.
        let listeners: Vec<Arc<dyn Observer>> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let message = format!("{} {}", subject, event);
        for listener in listeners {
            listener.notify(&message);
        }
    }
}
