//! # Literary Clock Common Library
//!
//! Shared code for the litclock grading service and seeding tool:
//! - Dataset descriptors (time and date datasets)
//! - Database schema bootstrap, migrations and models
//! - Entry ingestion
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod dataset;
pub mod db;
pub mod error;

pub use dataset::{Dataset, DatasetConfig};
pub use error::{Error, Result};
