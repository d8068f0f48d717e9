//! Batch operations at the bytecode level.
//!
//! The surface language has no batch syntax; batches are produced by
//! embedders emitting bytecode directly, so these tests drive the VM with
//! hand-built programs.

use strand::{Instruction, Opcode, Value, Vec3, Vm};

fn push(v: f64) -> Instruction {
    Instruction::with_arg(Opcode::Push, v)
}

fn push_vec3(code: &mut Vec<Instruction>, x: f64, y: f64, z: f64) {
    code.push(push(x));
    code.push(push(y));
    code.push(push(z));
    code.push(Instruction::new(Opcode::MakeVec3));
}

fn run(code: Vec<Instruction>) -> Vm {
    let mut vm = Vm::new(code);
    vm.run().unwrap();
    vm
}

#[test]
fn batch_add_lanes() {
    let mut code = Vec::new();
    for i in 1..=4 {
        push_vec3(&mut code, i as f64, i as f64, i as f64);
    }
    code.push(Instruction::new(Opcode::BatchPack));
    for i in 1..=4 {
        let s = i as f64 * 10.0;
        push_vec3(&mut code, s, s, s);
    }
    code.push(Instruction::new(Opcode::BatchPack));
    code.push(Instruction::new(Opcode::BatchAdd));
    code.push(Instruction::new(Opcode::Halt));

    let vm = run(code);
    let batch = vm.result().unwrap().as_batch().unwrap();
    assert_eq!(batch.get(0), Vec3::new(11.0, 11.0, 11.0));
    assert_eq!(batch.get(3), Vec3::new(44.0, 44.0, 44.0));
}

#[test]
fn batch_sub_lanes() {
    let mut code = Vec::new();
    for _ in 0..4 {
        push_vec3(&mut code, 10.0, 10.0, 10.0);
    }
    code.push(Instruction::new(Opcode::BatchPack));
    for i in 0..4 {
        push_vec3(&mut code, i as f64, 0.0, 0.0);
    }
    code.push(Instruction::new(Opcode::BatchPack));
    code.push(Instruction::new(Opcode::BatchSub));
    code.push(Instruction::new(Opcode::Halt));

    let vm = run(code);
    let batch = vm.result().unwrap().as_batch().unwrap();
    assert_eq!(batch.get(0), Vec3::new(10.0, 10.0, 10.0));
    assert_eq!(batch.get(3), Vec3::new(7.0, 10.0, 10.0));
}

#[test]
fn batch_dot_results_feed_scalar_code() {
    // Four dots land as plain scalars; sum them with ordinary ADDs.
    let mut code = Vec::new();
    for _ in 0..4 {
        push_vec3(&mut code, 1.0, 2.0, 3.0);
    }
    code.push(Instruction::new(Opcode::BatchPack));
    for _ in 0..4 {
        push_vec3(&mut code, 4.0, 5.0, 6.0);
    }
    code.push(Instruction::new(Opcode::BatchPack));
    code.push(Instruction::new(Opcode::BatchDot));
    code.push(Instruction::new(Opcode::Add));
    code.push(Instruction::new(Opcode::Add));
    code.push(Instruction::new(Opcode::Add));
    code.push(Instruction::new(Opcode::Halt));

    let vm = run(code);
    assert_eq!(vm.result().unwrap(), &Value::Scalar(128.0));
}

#[test]
fn batch_scale_per_lane() {
    let mut code = Vec::new();
    for _ in 0..4 {
        push_vec3(&mut code, 1.0, 1.0, 1.0);
    }
    code.push(Instruction::new(Opcode::BatchPack));
    for s in [2.0, 4.0, 6.0, 8.0] {
        code.push(push(s));
    }
    code.push(Instruction::new(Opcode::BatchScale));
    code.push(Instruction::new(Opcode::Halt));

    let vm = run(code);
    let batch = vm.result().unwrap().as_batch().unwrap();
    assert_eq!(batch.get(0), Vec3::new(2.0, 2.0, 2.0));
    assert_eq!(batch.get(3), Vec3::new(8.0, 8.0, 8.0));
}

#[test]
fn batch_pack_requires_vectors() {
    let mut code = Vec::new();
    for _ in 0..4 {
        code.push(push(1.0));
    }
    code.push(Instruction::new(Opcode::BatchPack));
    let mut vm = Vm::new(code);
    assert!(vm.run().is_err());
}
