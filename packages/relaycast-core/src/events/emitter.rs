//! Event emitter abstraction for decoupling the supervisor from observers.

use super::SupervisorEvent;

/// Receives supervisor events without knowledge of where they end up.
pub trait EventEmitter: Send + Sync {
    /// Emits a supervisor lifecycle event.
    fn emit(&self, event: SupervisorEvent);
}

/// No-op emitter for tests and embedders that don't observe events.
pub struct NoopEventEmitter;

impl EventEmitter for NoopEventEmitter {
    fn emit(&self, _event: SupervisorEvent) {
        // No-op
    }
}

/// Logging emitter for debugging and development.
///
/// Logs all events at debug level. Without a tracing subscriber the records
/// reach whatever `log` logger the binary installed.
pub struct LoggingEventEmitter;

impl EventEmitter for LoggingEventEmitter {
    fn emit(&self, event: SupervisorEvent) {
        tracing::debug!("[Supervisor] event: {:?}", event);
    }
}
