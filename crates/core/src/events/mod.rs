//! Ledger events module.
//!
//! Provides event types and the sink trait for notifying the presentation
//! layer after successful mutations. The sink replaces the implicit
//! observer/delegate pattern: subscribers are injected explicitly and the
//! ledger emits events only after settlement persists.

mod ledger_event;
mod sink;

pub use ledger_event::*;
pub use sink::*;
