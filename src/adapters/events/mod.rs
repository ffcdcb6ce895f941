//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus that records and logs events
//! - `LoggingEventPublisher` - Logs each event and keeps nothing

mod in_memory;
mod logging;

pub use in_memory::InMemoryEventBus;
pub use logging::LoggingEventPublisher;
