//! The interpreter loop.
//!
//! Fetch/decode/dispatch on the instruction pointer. The loop terminates
//! normally on `Halt` (or by running off the end of the program) and
//! abnormally on any error. On failure the stacks and the instruction
//! pointer are left in place for inspection; call [`Vm::reset`] before
//! reusing the instance.

use smallvec::SmallVec;

use crate::bytecode::{Instruction, Opcode};
use crate::error::{StackError, VmError};
use crate::frame::{CallFrame, CallStack};
use crate::stack::ValueStack;
use crate::value::Value;
use crate::vector::{BATCH_LANES, Vec3, Vec3Batch};

/// The virtual machine: operand stack, call stack, program, and
/// instruction pointer.
///
/// Single-threaded and not re-entrant. One instance per worker; instances
/// never share state.
#[derive(Debug, Default)]
pub struct Vm {
    stack: ValueStack,
    calls: CallStack,
    code: Vec<Instruction>,
    ip: usize,
}

impl Vm {
    /// Create a VM for the given program.
    pub fn new(code: Vec<Instruction>) -> Self {
        Self {
            stack: ValueStack::new(),
            calls: CallStack::new(),
            code,
            ip: 0,
        }
    }

    /// Run until `Halt`, the end of the program, or an error.
    pub fn run(&mut self) -> Result<(), VmError> {
        while self.ip < self.code.len() {
            let inst = self.code[self.ip];
            self.ip += 1;

            match inst.op {
                Opcode::Push => self.stack.push(Value::Scalar(inst.arg))?,
                Opcode::Pop => {
                    self.stack.pop()?;
                }
                Opcode::Load => self.op_load(inst.arg)?,
                Opcode::Call => self.op_call(inst.arg)?,
                Opcode::Return => self.op_return(inst.arg)?,
                Opcode::Add => self.op_add()?,
                Opcode::Sub => self.op_sub()?,
                Opcode::Mul => self.op_mul()?,
                Opcode::Div => self.op_div()?,
                Opcode::VecAdd => self.op_vec_add()?,
                Opcode::VecSub => self.op_vec_sub()?,
                Opcode::VecDot => self.op_vec_dot()?,
                Opcode::VecScale => self.op_vec_scale()?,
                Opcode::VecCross => self.op_vec_cross()?,
                Opcode::VecMag => self.op_vec_mag()?,
                Opcode::MakeVec3 => self.op_make_vec3()?,
                Opcode::BatchPack => self.op_batch_pack()?,
                Opcode::BatchAdd => self.op_batch_add()?,
                Opcode::BatchSub => self.op_batch_sub()?,
                Opcode::BatchDot => self.op_batch_dot()?,
                Opcode::BatchScale => self.op_batch_scale()?,
                Opcode::Jump => self.ip = self.code_addr(inst.arg)?,
                Opcode::Halt => return Ok(()),
            }
        }

        Ok(())
    }

    /// Top-of-stack value after a run, for observation.
    pub fn result(&self) -> Result<&Value, VmError> {
        Ok(self.stack.peek()?)
    }

    /// Clear both stacks and rewind the instruction pointer. Required
    /// before reusing an instance that hit an error.
    pub fn reset(&mut self) {
        self.stack.reset();
        self.calls.reset();
        self.ip = 0;
    }

    /// The operand stack, bottom to top. Left intact after errors for
    /// diagnostics.
    pub fn stack(&self) -> &[Value] {
        self.stack.values()
    }

    /// Current call depth.
    pub fn call_depth(&self) -> usize {
        self.calls.depth()
    }

    /// Current instruction pointer. After an error this locates the
    /// instruction past the one that failed.
    pub fn ip(&self) -> usize {
        self.ip
    }

    // ========================================================================
    // Operand helpers
    // ========================================================================

    fn pop_scalar(&mut self) -> Result<f64, VmError> {
        let value = self.stack.pop()?;
        value.as_scalar().ok_or(VmError::TypeMismatch {
            expected: "scalar",
            found: value.type_name(),
        })
    }

    fn pop_vec3(&mut self) -> Result<Vec3, VmError> {
        let value = self.stack.pop()?;
        value.as_vec3().ok_or(VmError::TypeMismatch {
            expected: "vec3",
            found: value.type_name(),
        })
    }

    fn pop_batch(&mut self) -> Result<Vec3Batch, VmError> {
        let value = self.stack.pop()?;
        value.as_batch().ok_or(VmError::TypeMismatch {
            expected: "batch",
            found: value.type_name(),
        })
    }

    /// Convert an instruction argument to a non-negative integer by
    /// truncation toward zero.
    fn index_arg(arg: f64) -> Result<usize, VmError> {
        if !arg.is_finite() || arg < 0.0 || arg > u32::MAX as f64 {
            return Err(VmError::InvalidArgument(arg));
        }
        Ok(arg.trunc() as usize)
    }

    /// An instruction argument that must address into the program.
    fn code_addr(&self, arg: f64) -> Result<usize, VmError> {
        let target = Self::index_arg(arg)?;
        if target >= self.code.len() {
            return Err(VmError::InvalidAddress {
                target,
                len: self.code.len(),
            });
        }
        Ok(target)
    }

    // ========================================================================
    // Stack and frame opcodes
    // ========================================================================

    fn op_load(&mut self, arg: f64) -> Result<(), VmError> {
        let mut offset = Self::index_arg(arg)?;
        // Inside a call, offsets are relative to the frame's base pointer.
        if let Some(frame) = self.calls.peek() {
            offset += frame.base;
        }
        let value = self.stack.get(offset)?;
        self.stack.push(value)?;
        Ok(())
    }

    fn op_call(&mut self, arg: f64) -> Result<(), VmError> {
        let target = self.code_addr(arg)?;

        // The caller pushes the arguments, then the argument count.
        let count = self.pop_scalar()?;
        let params = Self::index_arg(count)?;
        if params > self.stack.len() {
            return Err(StackError::Underflow.into());
        }

        let frame = CallFrame {
            return_addr: self.ip,
            base: self.stack.len() - params,
            locals: params,
        };
        self.calls.push(frame)?;
        self.ip = target;
        Ok(())
    }

    fn op_return(&mut self, arg: f64) -> Result<(), VmError> {
        let count = Self::index_arg(arg)?;

        // Collect return values in source order (bottom to top).
        let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(count);
        for _ in 0..count {
            values.push(self.stack.pop()?);
        }
        values.reverse();

        let frame = self.calls.pop()?;

        // Drop the callee's parameters and locals, then re-push the
        // return values so the caller sees only them.
        self.stack.truncate(frame.base);
        for value in values {
            self.stack.push(value)?;
        }

        self.ip = frame.return_addr;
        Ok(())
    }

    // ========================================================================
    // Polymorphic arithmetic
    // ========================================================================

    fn op_add(&mut self) -> Result<(), VmError> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = match (a, b) {
            (Value::Scalar(x), Value::Scalar(y)) => Value::Scalar(x + y),
            (Value::Vec3(x), Value::Vec3(y)) => Value::Vec3(x.add(y)),
            (a, b) => return Err(Self::binary_mismatch(a, b)),
        };
        self.stack.push(result)?;
        Ok(())
    }

    fn op_sub(&mut self) -> Result<(), VmError> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = match (a, b) {
            (Value::Scalar(x), Value::Scalar(y)) => Value::Scalar(x - y),
            (Value::Vec3(x), Value::Vec3(y)) => Value::Vec3(x.sub(y)),
            (a, b) => return Err(Self::binary_mismatch(a, b)),
        };
        self.stack.push(result)?;
        Ok(())
    }

    fn op_mul(&mut self) -> Result<(), VmError> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = match (a, b) {
            (Value::Scalar(x), Value::Scalar(y)) => Value::Scalar(x * y),
            (Value::Vec3(v), Value::Scalar(s)) => Value::Vec3(v.scale(s)),
            (Value::Scalar(s), Value::Vec3(v)) => Value::Vec3(v.scale(s)),
            (a, b) => return Err(Self::binary_mismatch(a, b)),
        };
        self.stack.push(result)?;
        Ok(())
    }

    fn op_div(&mut self) -> Result<(), VmError> {
        let b = self.pop_scalar()?;
        let a = self.pop_scalar()?;
        if b == 0.0 {
            return Err(VmError::DivisionByZero);
        }
        self.stack.push(Value::Scalar(a / b))?;
        Ok(())
    }

    fn binary_mismatch(a: Value, b: Value) -> VmError {
        // Report whichever operand broke the pairing; the left one when
        // neither is a scalar or vec3.
        let found = if a.is_scalar() || a.is_vec3() {
            b.type_name()
        } else {
            a.type_name()
        };
        VmError::TypeMismatch {
            expected: "scalar or vec3",
            found,
        }
    }

    // ========================================================================
    // Vector opcodes
    // ========================================================================

    fn op_vec_add(&mut self) -> Result<(), VmError> {
        let b = self.pop_vec3()?;
        let a = self.pop_vec3()?;
        self.stack.push(Value::Vec3(a.add(b)))?;
        Ok(())
    }

    fn op_vec_sub(&mut self) -> Result<(), VmError> {
        let b = self.pop_vec3()?;
        let a = self.pop_vec3()?;
        self.stack.push(Value::Vec3(a.sub(b)))?;
        Ok(())
    }

    fn op_vec_dot(&mut self) -> Result<(), VmError> {
        let b = self.pop_vec3()?;
        let a = self.pop_vec3()?;
        self.stack.push(Value::Scalar(a.dot(b)))?;
        Ok(())
    }

    fn op_vec_scale(&mut self) -> Result<(), VmError> {
        let s = self.pop_scalar()?;
        let v = self.pop_vec3()?;
        self.stack.push(Value::Vec3(v.scale(s)))?;
        Ok(())
    }

    fn op_vec_cross(&mut self) -> Result<(), VmError> {
        let b = self.pop_vec3()?;
        let a = self.pop_vec3()?;
        self.stack.push(Value::Vec3(a.cross(b)))?;
        Ok(())
    }

    fn op_vec_mag(&mut self) -> Result<(), VmError> {
        let v = self.pop_vec3()?;
        self.stack.push(Value::Scalar(v.magnitude()))?;
        Ok(())
    }

    fn op_make_vec3(&mut self) -> Result<(), VmError> {
        let z = self.pop_scalar()?;
        let y = self.pop_scalar()?;
        let x = self.pop_scalar()?;
        self.stack.push(Value::Vec3(Vec3::new(x, y, z)))?;
        Ok(())
    }

    // ========================================================================
    // Batch opcodes
    // ========================================================================

    fn op_batch_pack(&mut self) -> Result<(), VmError> {
        let mut batch = Vec3Batch::new();
        // Top of stack is lane 3.
        for lane in (0..BATCH_LANES).rev() {
            let v = self.pop_vec3()?;
            batch.set(lane, v);
        }
        self.stack.push(Value::Batch(batch))?;
        Ok(())
    }

    fn op_batch_add(&mut self) -> Result<(), VmError> {
        let b = self.pop_batch()?;
        let a = self.pop_batch()?;
        self.stack.push(Value::Batch(a.add(&b)))?;
        Ok(())
    }

    fn op_batch_sub(&mut self) -> Result<(), VmError> {
        let b = self.pop_batch()?;
        let a = self.pop_batch()?;
        self.stack.push(Value::Batch(a.sub(&b)))?;
        Ok(())
    }

    fn op_batch_dot(&mut self) -> Result<(), VmError> {
        let b = self.pop_batch()?;
        let a = self.pop_batch()?;
        // The four results go on individually, lane 0 first, so ordinary
        // scalar code can consume them.
        for dot in a.dot(&b) {
            self.stack.push(Value::Scalar(dot))?;
        }
        Ok(())
    }

    fn op_batch_scale(&mut self) -> Result<(), VmError> {
        // Top of stack is the lane-3 scalar.
        let mut scalars = [0.0; BATCH_LANES];
        for lane in (0..BATCH_LANES).rev() {
            scalars[lane] = self.pop_scalar()?;
        }
        let batch = self.pop_batch()?;
        self.stack.push(Value::Batch(batch.scale(scalars)))?;
        Ok(())
    }
}
