//! Standards directory resolution.

use std::path::PathBuf;

/// Environment variable pointing at a directory that replaces the embedded tables.
pub const STANDARDS_ENV_VAR: &str = "EVA_STANDARDS_DIR";

pub const CHOICES_FILE: &str = "choices.csv";
pub const SCHEMA_FILE: &str = "schema.csv";

/// Directory named by `EVA_STANDARDS_DIR`, if set and non-empty.
pub fn standards_override() -> Option<PathBuf> {
    std::env::var(STANDARDS_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}
