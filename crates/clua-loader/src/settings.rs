//! Loader configuration
//!
//! Settings come from [`LoaderSettings::default`] or from a YAML settings
//! file. Missing keys in a file fall back to the defaults.

use std::path::{Path, PathBuf};

use clua_core::{
    COMPILER_DATA_FILES, CONFIG_FILENAME, DOCUMENT_EXTENSION, Pick, SOURCE_EXTENSION, TraceOrder,
};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the compiler data directory.
pub const COMPILER_DIR_ENV: &str = "CLUA_COMPILER_DIR";

/// The data directory shipped with this crate.
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderSettings {
    /// Directory holding the compiler's own YAML documents
    pub compiler_dir: PathBuf,
    /// Extensions kept in the compiler tree
    pub data_extensions: Vec<String>,
    /// Documents loaded into the compiler database
    pub data_files: Vec<String>,
    pub source_extension: String,
    /// Per-directory configuration file name in projects
    pub config_filename: String,
    pub trace_order: TraceOrder,
    /// Which copy of a data file wins when the compiler tree holds several
    pub pick: Pick,
    /// Fail the compiler phase when a data file is missing or invalid
    pub strict_data: bool,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        let compiler_dir = std::env::var_os(COMPILER_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(bundled_data_dir);

        Self {
            compiler_dir,
            data_extensions: vec![DOCUMENT_EXTENSION.to_string()],
            data_files: COMPILER_DATA_FILES.iter().map(|name| name.to_string()).collect(),
            source_extension: SOURCE_EXTENSION.to_string(),
            config_filename: CONFIG_FILENAME.to_string(),
            trace_order: TraceOrder::default(),
            pick: Pick::default(),
            strict_data: false,
        }
    }
}

impl LoaderSettings {
    /// Read settings from a YAML file. A relative `compiler_dir` is resolved
    /// against the directory containing the file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut settings: Self = serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if settings.compiler_dir.is_relative() {
            if let Some(base) = path.parent() {
                settings.compiler_dir = base.join(&settings.compiler_dir);
            }
        }

        tracing::debug!("Loaded loader settings from {}", path.display());
        Ok(settings)
    }

    pub fn with_compiler_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.compiler_dir = dir.into();
        self
    }

    pub fn with_trace_order(mut self, order: TraceOrder) -> Self {
        self.trace_order = order;
        self
    }

    pub fn with_pick(mut self, pick: Pick) -> Self {
        self.pick = pick;
        self
    }

    pub fn with_strict_data(mut self, strict: bool) -> Self {
        self.strict_data = strict;
        self
    }
}
