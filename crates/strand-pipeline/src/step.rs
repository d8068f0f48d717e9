//! The pipeline step contract.

use crate::error::StepError;

/// One stage of byte-to-byte transformation.
///
/// A step has a stable human-readable name (used to tag errors) and a
/// fallible `process` operation. The step borrows the input only for the
/// duration of the call and returns freshly owned output; the driver is
/// free to drop the input as soon as `process` returns.
///
/// A step may hold resources — a [`crate::WasmStep`] owns an instantiated
/// guest module — and processes packets strictly sequentially. Instances
/// are not safe for concurrent `process` calls; embedders that want
/// parallelism construct one step per worker.
pub trait PipelineStep {
    /// Stable name for diagnostics.
    fn name(&self) -> &str;

    /// Transform one packet.
    fn process(&mut self, input: &[u8]) -> Result<Vec<u8>, StepError>;
}
