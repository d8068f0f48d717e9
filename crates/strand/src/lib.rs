//! Strand
//!
//! Umbrella crate for the two strand cores:
//!
//! - **Pipeline** (`strand-pipeline`): an ordered chain of byte-in/byte-out
//!   steps, including the sandboxed WebAssembly plugin step, driven
//!   sequentially with first-error abort.
//! - **VM** (`strand-vm` + `strand-lang`): a stack-based bytecode machine
//!   for a small vector expression language, with a compiler from source
//!   text.
//!
//! This crate re-exports both surfaces, adds the [`eval`] convenience for
//! one-shot source evaluation, and loads pipeline descriptions from TOML
//! manifests ([`config`]).

pub mod config;

pub use config::{ConfigError, PipelineConfig, StepConfig};
pub use strand_lang::{CompileError, Compiler, ParseError, Parser};
pub use strand_pipeline::{
    PipelineError, PipelineStep, StepError, StripStep, WasmStep, run_pipeline,
};
pub use strand_vm::{Instruction, Opcode, Value, Vec3, Vec3Batch, Vm, VmError};

use thiserror::Error;

/// Any failure between source text and a result value.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    /// Lexing, parsing, or lowering failed.
    #[error(transparent)]
    Compile(#[from] strand_lang::Error),
    /// The program failed at runtime.
    #[error(transparent)]
    Run(#[from] VmError),
}

/// Compile and run a source program, returning the top-of-stack value.
///
/// ```
/// use strand::Value;
///
/// let result = strand::eval("return 2 + 3").unwrap();
/// assert_eq!(result, Value::Scalar(5.0));
/// ```
pub fn eval(source: &str) -> Result<Value, EvalError> {
    let code = strand_lang::compile(source)?;
    let mut vm = Vm::new(code);
    vm.run()?;
    let value = *vm.result()?;
    Ok(value)
}
