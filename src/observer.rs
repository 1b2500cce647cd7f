//! Diagnostic observers for resolution events.
//!
//! Observers are notified synchronously around every resolution the container
//! performs. They are copied into scope clones, so one observer registered on
//! the application container also sees every per-request resolution.

use std::sync::Arc;
use std::time::Duration;

use crate::{DiError, Key};

/// Observer trait for dependency injection resolution events.
///
/// # Examples
///
/// ```
/// use hemlock_di::{Container, DiError, DiObserver, Key, Resolver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     seen: Mutex<Vec<&'static str>>,
/// }
///
/// impl DiObserver for Recorder {
///     fn resolving(&self, key: &Key) {
///         self.seen.lock().unwrap().push(key.display_name());
///     }
///
///     fn resolved(&self, _key: &Key, _duration: Duration) {}
///
///     fn resolution_failed(&self, _key: &Key, _error: &DiError) {}
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let mut container = Container::new();
/// container.add_observer(recorder.clone());
/// container.instance(7u16);
///
/// let _ = container.make::<u16>();
/// assert_eq!(*recorder.seen.lock().unwrap(), vec!["u16"]);
/// ```
pub trait DiObserver: Send + Sync {
    /// Called before a request is matched against the registrations.
    fn resolving(&self, key: &Key);

    /// Called after a request was satisfied.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when a request fails. `error` tells the cases apart: nothing
    /// matched (`NotFound`), a tie was rejected (`Ambiguous`), or the selected
    /// factory returned a failure (`FactoryFailed`).
    fn resolution_failed(&self, key: &Key, error: &DiError);
}

/// Registered observers. Cheap to clone into scopes.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(key, error);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Successful resolutions are logged at `DEBUG`, failures at `WARN`, all under
/// the `hemlock_di` target.
///
/// # Examples
///
/// ```
/// use hemlock_di::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::new()));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "container".to_string(),
        }
    }

    /// Creates a logging observer whose events carry a custom `scope` field.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(target: "hemlock_di", scope = %self.prefix, service = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            target: "hemlock_di",
            scope = %self.prefix,
            service = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(
            target: "hemlock_di",
            scope = %self.prefix,
            service = key.display_name(),
            error = %error,
            "resolution failed"
        );
    }
}
