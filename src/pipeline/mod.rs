//! Pipeline entry points for stock watcher operations.
//!
//! - `run_check`: one availability check, from fetch to snapshot write

pub mod check;

pub use check::{CheckOutcome, run_check};
