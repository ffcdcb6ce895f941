//! Scheduled background work.

mod expiry_sweeper;

pub use expiry_sweeper::ExpirySweeper;
