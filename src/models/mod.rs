// src/models/mod.rs

//! Domain models for the stock watcher.

mod availability;
mod config;
mod state;

// Re-export all public types
pub use availability::AvailabilityReading;
pub use config::{
    Config, HttpConfig, NotifyConfig, ProductConfig, RequestMode, StateConfig, env_keys,
};
pub use state::StockState;
