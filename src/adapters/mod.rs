//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed repositories
//! - `memory` - process-local repositories
//! - `events` - Event bus implementations
//! - `scheduler` - Background expiry sweep

pub mod events;
pub mod memory;
pub mod postgres;
pub mod scheduler;

pub use events::{InMemoryEventBus, LoggingEventPublisher};
pub use scheduler::ExpirySweeper;
