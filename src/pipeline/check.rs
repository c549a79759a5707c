// src/pipeline/check.rs

//! Single availability check.
//!
//! Fetch, classify, compare with the previous snapshot, alert on a
//! false-to-true transition, then persist the new snapshot. Every step is
//! awaited in order; nothing runs concurrently.

use crate::error::Result;
use crate::models::StockState;
use crate::services::{AvailabilitySource, TransitionNotifier};
use crate::storage::StateStore;

/// Summary of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Availability label reported upstream
    pub availability: String,
    /// Classification of `availability`
    pub in_stock: bool,
    /// Classification recorded by the previous run, if any
    pub previous: Option<bool>,
    /// Whether an alert was sent
    pub notified: bool,
}

/// Run one check.
///
/// A failed fetch or notification aborts the run before the snapshot is
/// written, so the previous snapshot is kept and a missed alert is retried
/// on the next run.
pub async fn run_check(
    source: &dyn AvailabilitySource,
    store: &dyn StateStore,
    notifier: &TransitionNotifier<'_>,
) -> Result<CheckOutcome> {
    let reading = source.fetch().await?;
    let in_stock = reading.is_in_stock();
    log::info!("Availability: {} (in stock: {})", reading, in_stock);

    let previous = store.load().await.in_stock;

    let notified = notifier
        .maybe_notify(previous, in_stock, reading.as_str())
        .await?;

    store
        .save(&StockState::observed(in_stock, reading.as_str()))
        .await?;

    Ok(CheckOutcome {
        availability: reading.into_inner(),
        in_stock,
        previous,
        notified,
    })
}
