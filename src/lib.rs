//! motorclub - Club governance for a motoring enthusiast network
//!
//! Officer roles and their capabilities, free and pro tiers, the manually
//! verified club subscription with coupon discounts, and per-action
//! authorization for club members.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
