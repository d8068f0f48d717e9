//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by individual pipeline steps.
#[derive(Debug, Error)]
pub enum StepError {
    /// Input shorter than the fixed header a step needs to remove.
    #[error("input is {len} bytes, shorter than the {expected} byte header")]
    ShortInput { len: usize, expected: usize },
    /// Input larger than the guest's shared buffer. The host never grows
    /// the shared region; re-construct the step with a larger
    /// `buffer_size` instead.
    #[error("input of {len} bytes exceeds the {capacity} byte shared buffer")]
    OversizeInput { len: usize, capacity: usize },
    /// The guest runtime rejected a write into the shared buffer. This
    /// indicates a tampered or corrupted module.
    #[error("failed to write {len} bytes into guest memory at {ptr:#x}")]
    MemoryWrite { ptr: u32, len: usize },
    /// The guest returned a result region that is not readable.
    #[error("guest result region {ptr:#x}+{len} lies outside guest memory")]
    BadResultRegion { ptr: u32, len: u32 },
    /// The guest trapped (out-of-bounds access, unreachable, overflow...).
    /// Untrusted code failing is a normal outcome; the step stays usable
    /// but the embedder may prefer to rebuild it.
    #[error("guest trapped: {0}")]
    GuestTrap(String),
    /// A required export is missing from the guest module.
    #[error("guest module does not export '{0}'")]
    MissingExport(&'static str),
    /// A required export exists with the wrong type.
    #[error("guest export '{name}' has the wrong signature: {reason}")]
    BadSignature { name: &'static str, reason: String },
    /// The artefact is not an instantiable WebAssembly module.
    #[error("invalid guest module: {0}")]
    InvalidModule(String),
    /// Reading the artefact from disk failed.
    #[error("failed to read module file '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A pipeline failure, tagged with the step that caused it.
#[derive(Debug, Error)]
#[error("step '{step}' failed")]
pub struct PipelineError {
    /// Name of the failing step.
    pub step: String,
    /// The underlying step error.
    #[source]
    pub source: StepError,
}
