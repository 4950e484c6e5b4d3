//! Pricewatch - scheduled product price watcher with Telegram alerts

pub mod app;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use config::Config;
pub use domain::TriggerPolicy;
pub use shared::types::{Observation, PriceHistory};
