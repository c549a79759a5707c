// src/lib.rs

//! Stock watcher library.
//!
//! Checks one product variant for availability, compares the result with
//! the previous run and pushes an alert when the variant comes back in stock.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
