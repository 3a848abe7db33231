//! Loaded standards: the choice catalog and the column schema built from it.

use std::path::Path;

use eva_model::{ChoiceCatalog, SchemaMap};

use crate::choices::load_choice_catalog;
use crate::error::{Result, StandardsError};
use crate::paths::{CHOICES_FILE, SCHEMA_FILE, standards_override};
use crate::schema::load_schema_map;

const EMBEDDED_CHOICES: &str = include_str!("../standards/choices.csv");
const EMBEDDED_SCHEMA: &str = include_str!("../standards/schema.csv");

/// Immutable import configuration, built once and passed to the resolvers.
#[derive(Debug, Clone)]
pub struct Standards {
    pub catalog: ChoiceCatalog,
    pub schema: SchemaMap,
}

impl Standards {
    /// Load from `EVA_STANDARDS_DIR` when set, otherwise the embedded tables.
    pub fn load() -> Result<Self> {
        match standards_override() {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "loading standards from directory");
                Self::from_dir(&dir)
            }
            None => Self::embedded(),
        }
    }

    /// Tables compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_text(EMBEDDED_CHOICES, EMBEDDED_SCHEMA)
    }

    /// Load `choices.csv` and `schema.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let choices_path = dir.join(CHOICES_FILE);
        let schema_path = dir.join(SCHEMA_FILE);
        let choices = std::fs::read_to_string(&choices_path)
            .map_err(|error| StandardsError::io(&choices_path, error))?;
        let schema = std::fs::read_to_string(&schema_path)
            .map_err(|error| StandardsError::io(&schema_path, error))?;
        let catalog = load_choice_catalog(&choices, &choices_path.display().to_string())?;
        let schema = load_schema_map(&schema, &schema_path.display().to_string(), &catalog)?;
        Ok(Self { catalog, schema })
    }

    fn from_text(choices: &str, schema: &str) -> Result<Self> {
        let catalog = load_choice_catalog(choices, CHOICES_FILE)?;
        let schema = load_schema_map(schema, SCHEMA_FILE, &catalog)?;
        Ok(Self { catalog, schema })
    }
}
