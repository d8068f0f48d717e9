//! Failure paths through the full pipeline.

use strand::{CompileError, EvalError, ParseError, Value, VmError};
use strand_lang::Error as LangError;

fn eval_err(source: &str) -> EvalError {
    strand::eval(source).unwrap_err()
}

#[test]
fn parse_error_reports_line() {
    let EvalError::Compile(LangError::Parse(ParseError::Expected { line, .. })) =
        eval_err("let x = 1\nlet y =")
    else {
        panic!("expected parse error");
    };
    assert_eq!(line, 2);
}

#[test]
fn lexer_error_reports_character() {
    assert!(matches!(
        eval_err("return 1 $ 2"),
        EvalError::Compile(LangError::Parse(ParseError::UnexpectedChar {
            ch: '$',
            ..
        }))
    ));
}

#[test]
fn undefined_variable() {
    assert_eq!(
        eval_err("return velocity"),
        EvalError::Compile(LangError::Compile(CompileError::UndefinedVariable(
            "velocity".to_string()
        )))
    );
}

#[test]
fn unknown_function() {
    assert_eq!(
        eval_err("return warp(9)"),
        EvalError::Compile(LangError::Compile(CompileError::UnknownFunction(
            "warp".to_string()
        )))
    );
}

#[test]
fn builtin_arity() {
    assert!(matches!(
        eval_err("return dot(vec3(1, 2, 3))"),
        EvalError::Compile(LangError::Compile(CompileError::ArityMismatch { .. }))
    ));
}

#[test]
fn type_mismatch_vector_plus_scalar() {
    assert!(matches!(
        eval_err("return vec3(1, 2, 3) + 1"),
        EvalError::Run(VmError::TypeMismatch { .. })
    ));
}

#[test]
fn type_mismatch_vector_division() {
    assert!(matches!(
        eval_err("return vec3(1, 2, 3) / 2"),
        EvalError::Run(VmError::TypeMismatch { .. })
    ));
}

#[test]
fn builtin_on_scalar_fails_at_runtime() {
    assert!(matches!(
        eval_err("return mag(7)"),
        EvalError::Run(VmError::TypeMismatch { .. })
    ));
}

#[test]
fn vm_instance_reusable_after_reset() {
    let code = strand_lang::compile("let x = 2 return x * x").unwrap();
    let mut vm = strand::Vm::new(code);
    vm.run().unwrap();
    assert_eq!(vm.result().unwrap(), &Value::Scalar(4.0));

    // A second run needs an explicit reset; without one the instruction
    // pointer is parked past the end.
    vm.reset();
    assert!(vm.stack().is_empty());
    vm.run().unwrap();
    assert_eq!(vm.result().unwrap(), &Value::Scalar(4.0));
}
