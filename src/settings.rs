use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AuditError, Result};
use crate::utils::constants::DEFAULT_DATA_DIR;

/// Runtime configuration, layered: built-in defaults, then an optional
/// `sitecheck.toml`, then `SITECHECK_*` environment variables. CLI flags
/// override all of these at the call site.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("data_dir", DEFAULT_DATA_DIR)
            .map_err(|e| AuditError::Config(e.to_string()))?;

        match config_file {
            Some(path) => {
                builder = builder.add_source(config::File::from(path));
            }
            None => {
                builder = builder.add_source(config::File::with_name("sitecheck").required(false));
            }
        }

        builder
            .add_source(config::Environment::with_prefix("SITECHECK"))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AuditError::Config(e.to_string()))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}
