//! Service layer for the stock watcher.
//!
//! This module contains the business logic for:
//! - Availability fetching (`AvailabilityFetcher`)
//! - Stock classification (`is_in_stock`)
//! - Transition notification (`TransitionNotifier`)

pub mod classifier;
mod fetcher;
mod notifier;

pub use classifier::is_in_stock;
pub use fetcher::{
    AvailabilityFetcher, AvailabilitySource, VIEW_ITEM_EVENT, extract_availability,
    parse_availability,
};
pub use notifier::{Notification, Notifier, NtfyNotifier, TransitionNotifier, should_notify};
