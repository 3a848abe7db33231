//! CLI library components for the evaluation importer.

pub mod config;
pub mod logging;
pub mod summary;
