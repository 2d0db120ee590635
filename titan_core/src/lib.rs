#![forbid(unsafe_code)]

//! Core domain model and business logic for the Titan gym tracker.
//!
//! This crate provides:
//! - Domain types (exercises, entries, aggregates)
//! - The exercise catalog (MET table)
//! - Calorie estimation
//! - The workout log, its durable JSON store and the pending session
//! - Body metrics and CSV export

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod estimator;
pub mod log;
pub mod store;
pub mod session;
pub mod body;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, default_catalog, ExerciseCatalog};
pub use config::{Config, EstimatorConfig};
pub use estimator::{estimate_calories, CalorieEstimator};
pub use log::WorkoutLog;
pub use store::WorkoutStore;
pub use session::PendingSession;
pub use body::{bmi, gauge_percent, BmiCategory};
pub use export::export_csv;
