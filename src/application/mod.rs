//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (write) are kept apart from query handlers (read).

pub mod handlers;
mod settings_store;

pub use handlers::*;
pub use settings_store::{SettingsStore, CLUB_PRO_DURATION_DAYS_KEY, CLUB_PRO_PRICE_KEY};
