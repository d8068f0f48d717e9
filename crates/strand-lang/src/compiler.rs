//! AST-to-bytecode compiler.
//!
//! Lowering is two-pass. Pass one walks the top-level statements,
//! collecting function declarations into a table (name, arity, reserved
//! address slot) and everything else into the main list. Pass two emits a
//! placeholder jump, compiles each function body in declaration order
//! recording its entry address, patches the jump to land on the first
//! main instruction, compiles main, and appends `Halt`. Call sites are
//! emitted with placeholder targets and patched once every entry address
//! is known, so functions may call functions declared after them.
//!
//! Scoping: parameters occupy frame-relative slots `0..p`; `let` inside a
//! body extends the local table at the current depth. Outside any
//! function, `let` allocates a global slot at the current declaration
//! depth and references load with zero base. Locals shadow globals.

use std::collections::HashMap;

use strand_vm::{Instruction, Opcode};

use crate::ast::{BinOp, Expr, FnDecl, Program, Stmt};
use crate::error::CompileError;

struct FnInfo {
    arity: usize,
    /// Bytecode entry address, filled in as bodies are compiled.
    entry: Option<usize>,
}

/// Compiles a parsed program to a flat instruction stream.
pub struct Compiler {
    code: Vec<Instruction>,
    functions: HashMap<String, FnInfo>,
    globals: HashMap<String, usize>,
    global_depth: usize,
    /// Local table while inside a function body, with the next free slot.
    locals: Option<HashMap<String, usize>>,
    local_depth: usize,
    /// Call sites awaiting a function entry address.
    fixups: Vec<(usize, String)>,
}

impl Compiler {
    /// Create an empty compiler.
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            functions: HashMap::new(),
            globals: HashMap::new(),
            global_depth: 0,
            locals: None,
            local_depth: 0,
            fixups: Vec::new(),
        }
    }

    /// Compile a program to bytecode.
    pub fn compile(mut self, program: &Program) -> Result<Vec<Instruction>, CompileError> {
        // Pass one: function table and main list.
        let mut decls: Vec<&FnDecl> = Vec::new();
        let mut main: Vec<&Stmt> = Vec::new();
        for stmt in &program.stmts {
            match stmt {
                Stmt::Fn(decl) => {
                    if self.functions.contains_key(&decl.name) {
                        return Err(CompileError::DuplicateFunction(decl.name.clone()));
                    }
                    self.functions.insert(decl.name.clone(), FnInfo {
                        arity: decl.params.len(),
                        entry: None,
                    });
                    decls.push(decl);
                }
                other => main.push(other),
            }
        }

        // Pass two: function bodies first, behind a jump to main.
        let jump_to_main = if decls.is_empty() {
            None
        } else {
            self.emit_arg(Opcode::Jump, 0.0);
            Some(0)
        };

        for decl in decls {
            let entry = self.code.len();
            if let Some(info) = self.functions.get_mut(&decl.name) {
                info.entry = Some(entry);
            }
            self.compile_fn_body(decl)?;
        }

        if let Some(pos) = jump_to_main {
            self.code[pos].arg = self.code.len() as f64;
        }

        for stmt in main {
            self.compile_stmt(stmt)?;
        }
        self.emit(Opcode::Halt);

        // Resolve call sites now that every entry address is known.
        for (pos, name) in std::mem::take(&mut self.fixups) {
            if let Some(entry) = self.functions.get(&name).and_then(|info| info.entry) {
                self.code[pos].arg = entry as f64;
            }
        }

        Ok(self.code)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn compile_fn_body(&mut self, decl: &FnDecl) -> Result<(), CompileError> {
        let mut locals = HashMap::new();
        for (slot, param) in decl.params.iter().enumerate() {
            locals.insert(param.clone(), slot);
        }
        self.locals = Some(locals);
        self.local_depth = decl.params.len();

        for stmt in &decl.body {
            self.compile_stmt(stmt)?;
        }

        // A body that does not end in `return` returns zero.
        if !matches!(decl.body.last(), Some(Stmt::Return(_))) {
            self.emit_arg(Opcode::Push, 0.0);
            self.emit_arg(Opcode::Return, 1.0);
        }

        self.locals = None;
        self.local_depth = 0;
        Ok(())
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::Let { name, value } => {
                self.compile_expr(value)?;
                // The value stays put; its slot is the current depth.
                if let Some(locals) = self.locals.as_mut() {
                    locals.insert(name.clone(), self.local_depth);
                    self.local_depth += 1;
                } else {
                    self.globals.insert(name.clone(), self.global_depth);
                    self.global_depth += 1;
                }
                Ok(())
            }
            Stmt::Return(value) => {
                self.compile_expr(value)?;
                // Top-level `return` just leaves the value for observation;
                // inside a function it unwinds the frame.
                if self.locals.is_some() {
                    self.emit_arg(Opcode::Return, 1.0);
                }
                Ok(())
            }
            Stmt::Fn(decl) => Err(CompileError::NestedFunction(decl.name.clone())),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn compile_expr(&mut self, expr: &Expr) -> Result<(), CompileError> {
        match expr {
            Expr::Number(value) => {
                self.emit_arg(Opcode::Push, *value);
                Ok(())
            }
            Expr::Ident(name) => self.compile_ident(name),
            Expr::Binary { op, lhs, rhs } => {
                self.compile_expr(lhs)?;
                self.compile_expr(rhs)?;
                self.emit(match op {
                    BinOp::Add => Opcode::Add,
                    BinOp::Sub => Opcode::Sub,
                    BinOp::Mul => Opcode::Mul,
                    BinOp::Div => Opcode::Div,
                });
                Ok(())
            }
            Expr::Neg(inner) => {
                // Negation is multiplication by -1; works for scalars and
                // vectors alike through the polymorphic Mul.
                self.compile_expr(inner)?;
                self.emit_arg(Opcode::Push, -1.0);
                self.emit(Opcode::Mul);
                Ok(())
            }
            Expr::Vec3 { x, y, z } => {
                self.compile_expr(x)?;
                self.compile_expr(y)?;
                self.compile_expr(z)?;
                self.emit(Opcode::MakeVec3);
                Ok(())
            }
            Expr::Call { callee, args } => self.compile_call(callee, args),
        }
    }

    fn compile_ident(&mut self, name: &str) -> Result<(), CompileError> {
        // Locals shadow globals.
        if let Some(locals) = &self.locals
            && let Some(&slot) = locals.get(name)
        {
            self.emit_arg(Opcode::Load, slot as f64);
            return Ok(());
        }
        if let Some(&slot) = self.globals.get(name) {
            self.emit_arg(Opcode::Load, slot as f64);
            return Ok(());
        }
        Err(CompileError::UndefinedVariable(name.to_string()))
    }

    fn compile_call(&mut self, callee: &str, args: &[Expr]) -> Result<(), CompileError> {
        // Built-ins lower straight to vector opcodes.
        let builtin = match callee {
            "cross" => Some((2, Opcode::VecCross)),
            "dot" => Some((2, Opcode::VecDot)),
            "mag" => Some((1, Opcode::VecMag)),
            _ => None,
        };

        if let Some((arity, op)) = builtin {
            if args.len() != arity {
                return Err(CompileError::ArityMismatch {
                    name: callee.to_string(),
                    expected: arity,
                    found: args.len(),
                });
            }
            for arg in args {
                self.compile_expr(arg)?;
            }
            self.emit(op);
            return Ok(());
        }

        let Some(info) = self.functions.get(callee) else {
            return Err(CompileError::UnknownFunction(callee.to_string()));
        };
        if args.len() != info.arity {
            return Err(CompileError::ArityMismatch {
                name: callee.to_string(),
                expected: info.arity,
                found: args.len(),
            });
        }

        for arg in args {
            self.compile_expr(arg)?;
        }
        self.emit_arg(Opcode::Push, args.len() as f64);
        // Target patched once all entry addresses are known.
        self.fixups.push((self.code.len(), callee.to_string()));
        self.emit_arg(Opcode::Call, 0.0);
        Ok(())
    }

    // ========================================================================
    // Emission
    // ========================================================================

    fn emit(&mut self, op: Opcode) {
        self.code.push(Instruction::new(op));
    }

    fn emit_arg(&mut self, op: Opcode, arg: f64) {
        self.code.push(Instruction::with_arg(op, arg));
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
