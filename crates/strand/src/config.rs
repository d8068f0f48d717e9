//! Pipeline manifest (TOML) parsing.
//!
//! A manifest is a list of `[[step]]` tables:
//!
//! ```toml
//! [[step]]
//! kind = "strip"
//!
//! [[step]]
//! kind = "wasm"
//! module = "plugin.wasm"
//! buffer_size = 1048576   # optional
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use strand_pipeline::{DEFAULT_BUFFER_SIZE, PipelineStep, StepError, StripStep, WasmStep};

/// A parsed pipeline manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// The steps, in execution order.
    #[serde(rename = "step", default)]
    pub steps: Vec<StepConfig>,
}

/// One `[[step]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepConfig {
    /// Header-strip step.
    Strip,
    /// Sandboxed WASM plugin step.
    Wasm {
        /// Path to the compiled guest module.
        module: PathBuf,
        /// Shared-buffer capacity; defaults to 1 MiB.
        #[serde(default)]
        buffer_size: Option<u32>,
    },
}

/// Manifest loading and materialisation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the manifest file failed.
    #[error("failed to read pipeline manifest '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The manifest is not valid TOML for this schema.
    #[error("invalid pipeline manifest: {0}")]
    Parse(#[from] toml::de::Error),
    /// A configured step could not be constructed.
    #[error(transparent)]
    Step(#[from] StepError),
}

impl PipelineConfig {
    /// Load a manifest from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse a manifest from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Construct the configured step chain. WASM steps load and
    /// instantiate their guest modules here.
    pub fn build_steps(&self) -> Result<Vec<Box<dyn PipelineStep>>, ConfigError> {
        let mut steps: Vec<Box<dyn PipelineStep>> = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            match step {
                StepConfig::Strip => steps.push(Box::new(StripStep)),
                StepConfig::Wasm {
                    module,
                    buffer_size,
                } => {
                    let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
                    steps.push(Box::new(WasmStep::from_file_with_buffer_size(
                        module, size,
                    )?));
                }
            }
        }
        Ok(steps)
    }
}
