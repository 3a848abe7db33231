//! Choice tables and column schema for the evaluation import.
//!
//! Both tables ship embedded in the crate (`standards/choices.csv` and
//! `standards/schema.csv`). Setting `EVA_STANDARDS_DIR` replaces them with
//! files of the same names from that directory.

#![deny(unsafe_code)]

pub mod choices;
pub mod csv_utils;
pub mod error;
pub mod paths;
pub mod registry;
pub mod schema;

pub use crate::choices::load_choice_catalog;
pub use crate::error::StandardsError;
pub use crate::paths::STANDARDS_ENV_VAR;
pub use crate::registry::Standards;
pub use crate::schema::load_schema_map;
