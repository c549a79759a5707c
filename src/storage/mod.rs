//! Storage abstractions for the persisted stock snapshot.
//!
//! Only the latest snapshot is kept; each run reads it once at the start and
//! overwrites it once at the end.
//!
//! ```text
//! .state/
//! └── last.json     # {"in_stock": bool|null, "availability": string|null}
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StockState;

// Re-export for convenience
pub use local::LocalStateStore;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the previous snapshot.
    ///
    /// Never fails: a missing or unreadable snapshot is reported as
    /// [`StockState::default`], i.e. no prior observation.
    async fn load(&self) -> StockState;

    /// Replace the stored snapshot.
    async fn save(&self, state: &StockState) -> Result<()>;
}
