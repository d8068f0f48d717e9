//! Header-strip step.

use crate::error::StepError;
use crate::step::PipelineStep;

/// Bytes removed from the front of every packet.
pub const HEADER_LEN: usize = 4;

/// Removes the first four octets of its input and passes on the rest.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripStep;

impl PipelineStep for StripStep {
    fn name(&self) -> &str {
        "strip"
    }

    fn process(&mut self, input: &[u8]) -> Result<Vec<u8>, StepError> {
        if input.len() < HEADER_LEN {
            return Err(StepError::ShortInput {
                len: input.len(),
                expected: HEADER_LEN,
            });
        }
        Ok(input[HEADER_LEN..].to_vec())
    }
}
