//! Strand virtual machine
//!
//! This crate provides the stack-based bytecode VM at the heart of strand.
//! Programs are flat sequences of [`Instruction`]s; execution runs a
//! fetch/decode/dispatch loop over them until `Halt` or an error.
//!
//! # Architecture
//!
//! The VM owns:
//! - an operand stack of tagged [`Value`]s (bounded, overflow and underflow
//!   are distinct errors),
//! - a separate call stack of [`CallFrame`]s for nested function calls,
//! - the instruction pointer.
//!
//! Values cover scalars, booleans, nil, 3-vectors, and 4-lane vector
//! batches in structure-of-arrays layout. The generic arithmetic opcodes
//! are polymorphic over scalars and vectors; type dispatch happens at
//! runtime by exhaustive matching on the operand tags.
//!
//! # Example
//!
//! ```
//! use strand_vm::{Instruction, Opcode, Value, Vm};
//!
//! let code = vec![
//!     Instruction::with_arg(Opcode::Push, 2.0),
//!     Instruction::with_arg(Opcode::Push, 3.0),
//!     Instruction::new(Opcode::Add),
//!     Instruction::new(Opcode::Halt),
//! ];
//!
//! let mut vm = Vm::new(code);
//! vm.run().unwrap();
//! assert_eq!(vm.result().unwrap(), &Value::Scalar(5.0));
//! ```

mod bytecode;
mod error;
mod frame;
mod machine;
mod stack;
mod value;
mod vector;

pub use bytecode::{Instruction, Opcode, disassemble};
pub use error::{StackError, VmError};
pub use frame::{CALL_STACK_MAX, CallFrame, CallStack};
pub use machine::Vm;
pub use stack::{STACK_MAX, ValueStack};
pub use value::Value;
pub use vector::{BATCH_LANES, Vec3, Vec3Batch};
