//! Bytecode opcodes and instructions.
//!
//! An instruction is an opcode paired with a single numeric argument. The
//! argument is interpreted per-opcode: constant value for `Push`, operand
//! stack offset for `Load`, absolute instruction address for `Jump` and
//! `Call`, value count for `Return`. Opcodes that take no argument leave it
//! at zero.

use std::fmt;

/// Bytecode opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    // === Stack operations ===
    /// Push the instruction argument as a scalar.
    Push,
    /// Discard the top of the stack.
    Pop,
    /// Push a copy of the value at `base + arg`, where `base` is the
    /// current frame's base pointer (0 outside any call).
    Load,

    // === Function calls ===
    /// Call the function at address `arg`. The parameter count is popped
    /// from the stack; the parameters below it become the callee's locals.
    Call,
    /// Return `arg` values to the caller, truncating the callee's frame.
    Return,

    // === Scalar arithmetic (polymorphic over vectors where noted) ===
    /// Add: scalar + scalar, or vec3 + vec3.
    Add,
    /// Subtract: scalar - scalar, or vec3 - vec3.
    Sub,
    /// Multiply: scalar * scalar, or vec3 * scalar / scalar * vec3.
    Mul,
    /// Divide: scalar / scalar only. Division by zero fails.
    Div,

    // === Vector operations ===
    /// Vector addition: pops two vec3s, pushes their sum.
    VecAdd,
    /// Vector subtraction.
    VecSub,
    /// Dot product: pops two vec3s, pushes a scalar.
    VecDot,
    /// Scale: pops a scalar then a vec3, pushes the scaled vec3.
    VecScale,
    /// Cross product: pops two vec3s, pushes a vec3.
    VecCross,
    /// Magnitude: pops a vec3, pushes a scalar.
    VecMag,
    /// Pop three scalars (z on top) and push a vec3.
    MakeVec3,

    // === Batch operations ===
    /// Pop four vec3s (lane 3 on top) and push one batch.
    BatchPack,
    /// Component-wise batch addition.
    BatchAdd,
    /// Component-wise batch subtraction.
    BatchSub,
    /// Four-wide dot product: pushes the four scalar results individually,
    /// lane 0 first.
    BatchDot,
    /// Pop four scalars (lane 3 on top) then a batch; push the batch with
    /// each lane scaled by its scalar.
    BatchScale,

    // === Control flow ===
    /// Unconditional jump to address `arg`.
    Jump,
    /// Stop execution, leaving the stack in place for observation.
    Halt,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Load => "LOAD",
            Opcode::Call => "CALL",
            Opcode::Return => "RET",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::VecAdd => "VADD",
            Opcode::VecSub => "VSUB",
            Opcode::VecDot => "VDOT",
            Opcode::VecScale => "VSCALE",
            Opcode::VecCross => "VCROSS",
            Opcode::VecMag => "VMAG",
            Opcode::MakeVec3 => "VEC3",
            Opcode::BatchPack => "BPACK",
            Opcode::BatchAdd => "BADD",
            Opcode::BatchSub => "BSUB",
            Opcode::BatchDot => "BDOT",
            Opcode::BatchScale => "BSCALE",
            Opcode::Jump => "JMP",
            Opcode::Halt => "HALT",
        };
        f.write_str(name)
    }
}

/// A complete bytecode instruction: opcode plus numeric argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instruction {
    /// The operation to perform.
    pub op: Opcode,
    /// Argument for opcodes that need one; zero otherwise.
    pub arg: f64,
}

impl Instruction {
    /// Create an instruction with no argument.
    pub fn new(op: Opcode) -> Self {
        Self { op, arg: 0.0 }
    }

    /// Create an instruction with an argument.
    pub fn with_arg(op: Opcode, arg: f64) -> Self {
        Self { op, arg }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Opcode::Push | Opcode::Load | Opcode::Call | Opcode::Return | Opcode::Jump => {
                write!(f, "{} {}", self.op, self.arg)
            }
            _ => write!(f, "{}", self.op),
        }
    }
}

/// Format a program one instruction per line, with addresses.
///
/// Intended for diagnostics and compiler debugging output.
pub fn disassemble(code: &[Instruction]) -> String {
    use fmt::Write;

    let mut out = String::new();
    for (addr, inst) in code.iter().enumerate() {
        let _ = writeln!(out, "{addr:4}  {inst}");
    }
    out
}
