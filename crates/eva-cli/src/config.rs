//! Importer settings read from a TOML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eva_transform::ValueFilter;
use serde::Deserialize;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "eva-import.toml";
/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "EVA_IMPORT_CONFIG";

const DEFAULT_DATA_DIR: &str = "temp-data";
const DEFAULT_STORE_FILE: &str = "evaluations.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Where downloaded exports are kept between runs.
    pub data_dir: PathBuf,
    pub store_path: PathBuf,
    /// Replaces the built-in list of placeholder phrases when set.
    pub deny_list: Option<Vec<String>>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            store_path: data_dir.join(DEFAULT_STORE_FILE),
            data_dir,
            deny_list: None,
        }
    }
}

impl ImportConfig {
    /// Load from `$EVA_IMPORT_CONFIG`, else `eva-import.toml` in the working directory.
    ///
    /// Only the default file may be missing; a named file must exist.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }
        let default_path = Path::new(CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn value_filter(&self) -> ValueFilter {
        match &self.deny_list {
            Some(phrases) => ValueFilter::new(phrases.iter().map(String::as_str)),
            None => ValueFilter::default(),
        }
    }
}
