//! The pipeline driver.

use tracing::{debug, info};

use crate::error::PipelineError;
use crate::step::PipelineStep;

/// Thread `input` through the steps in declaration order.
///
/// Each step receives the previous step's output. The first failure
/// aborts the run; the error carries the failing step's name and no later
/// step is invoked. On success the final buffer is returned — what to do
/// with it (write it somewhere, feed it onward) is the embedder's choice.
pub fn run_pipeline(
    steps: &mut [Box<dyn PipelineStep>],
    input: &[u8],
) -> Result<Vec<u8>, PipelineError> {
    info!(steps = steps.len(), input_len = input.len(), "pipeline start");

    let mut current = input.to_vec();
    for step in steps.iter_mut() {
        debug!(step = step.name(), input_len = current.len(), "step start");
        current = step.process(&current).map_err(|source| PipelineError {
            step: step.name().to_string(),
            source,
        })?;
        debug!(step = step.name(), output_len = current.len(), "step done");
    }

    info!(output_len = current.len(), "pipeline done");
    Ok(current)
}
