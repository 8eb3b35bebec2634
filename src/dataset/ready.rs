use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

pub type ReadyCallback<T> = Box<dyn FnOnce(&Arc<T>) + Send>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subscription {
    Registered,
    /// The signal already fired; the callback was dropped without running.
    AlreadyFired,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("data-ready signal already fired for this load")]
pub struct AlreadyPublished;

/// Single-fire, fan-out readiness signal for one load cycle.
///
/// Callbacks registered before [`DataReady::publish`] run exactly once, in
/// registration order. Later subscribers are not replayed; they can poll
/// [`DataReady::get`] instead.
pub struct DataReady<T> {
    callbacks: Vec<ReadyCallback<T>>,
    fired: Option<Arc<T>>,
}

impl<T> DataReady<T> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            fired: None,
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnOnce(&Arc<T>) + Send + 'static,
    {
        if self.fired.is_some() {
            return Subscription::AlreadyFired;
        }
        self.callbacks.push(Box::new(callback));
        Subscription::Registered
    }

    pub fn publish(&mut self, value: T) -> Result<usize, AlreadyPublished> {
        if self.fired.is_some() {
            return Err(AlreadyPublished);
        }

        let value = Arc::new(value);
        let callbacks = std::mem::take(&mut self.callbacks);
        let notified = callbacks.len();
        for callback in callbacks {
            callback(&value);
        }
        self.fired = Some(value);
        debug!(notified, "data ready");

        Ok(notified)
    }

    pub fn is_ready(&self) -> bool {
        self.fired.is_some()
    }

    pub fn get(&self) -> Option<&Arc<T>> {
        self.fired.as_ref()
    }

    pub fn pending_subscribers(&self) -> usize {
        self.callbacks.len()
    }
}

impl<T> Default for DataReady<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DataReady<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataReady")
            .field("pending_subscribers", &self.callbacks.len())
            .field("fired", &self.fired.is_some())
            .finish()
    }
}
