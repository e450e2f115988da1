//! Ledger event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::LedgerEvent;

/// Trait for receiving ledger events.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no DB writes)
/// - Failure to emit must not affect ledger operations (best-effort)
pub trait LedgerEventSink: Send + Sync {
    /// Emit a single event.
    fn emit(&self, event: LedgerEvent);
}

/// No-op implementation for tests or contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpLedgerEventSink;

impl LedgerEventSink for NoOpLedgerEventSink {
    fn emit(&self, _event: LedgerEvent) {
        // Intentionally empty - events are discarded
    }
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockLedgerEventSink {
    events: Arc<Mutex<Vec<LedgerEvent>>>,
}

impl MockLedgerEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl LedgerEventSink for MockLedgerEventSink {
    fn emit(&self, event: LedgerEvent) {
        self.events.lock().unwrap().push(event);
    }
}
