//! Capability-free WASI preview-1 surface.
//!
//! Guest toolchains (TinyGo, Rust `wasm32-wasip1`) emit imports from
//! `wasi_snapshot_preview1` even for reactor modules that never touch the
//! outside world. These stubs let such modules link while granting
//! nothing: no filesystem, no clock, no randomness, no environment. Every
//! capability-shaped call reports `ERRNO_NOSYS` or `ERRNO_BADF`; the
//! argument/environment queries report empty lists.

use wasmi::{Caller, Extern, Linker};

const ERRNO_SUCCESS: i32 = 0;
const ERRNO_BADF: i32 = 8;
const ERRNO_INVAL: i32 = 28;
const ERRNO_NOSYS: i32 = 52;

/// Write a little-endian u32 into the caller's exported memory.
fn write_u32(caller: &mut Caller<'_, ()>, ptr: i32, value: u32) -> i32 {
    let Some(Extern::Memory(memory)) = caller.get_export("memory") else {
        return ERRNO_INVAL;
    };
    if memory
        .write(&mut *caller, ptr as u32 as usize, &value.to_le_bytes())
        .is_err()
    {
        return ERRNO_INVAL;
    }
    ERRNO_SUCCESS
}

/// Register the stub surface on a linker.
///
/// The set covers the imports the common reactor toolchains emit; an
/// import outside it fails instantiation, which is the right outcome for
/// a guest that expects a real capability.
pub fn add_to_linker(linker: &mut Linker<()>) -> Result<(), wasmi::Error> {
    let m = "wasi_snapshot_preview1";

    // Zero arguments, zero environment.
    linker.func_wrap(m, "args_get", |_: Caller<'_, ()>, _argv: i32, _buf: i32| {
        ERRNO_SUCCESS
    })?;
    linker.func_wrap(
        m,
        "args_sizes_get",
        |mut caller: Caller<'_, ()>, argc: i32, buf_size: i32| {
            let rc = write_u32(&mut caller, argc, 0);
            if rc != ERRNO_SUCCESS {
                return rc;
            }
            write_u32(&mut caller, buf_size, 0)
        },
    )?;
    linker.func_wrap(m, "environ_get", |_: Caller<'_, ()>, _env: i32, _buf: i32| {
        ERRNO_SUCCESS
    })?;
    linker.func_wrap(
        m,
        "environ_sizes_get",
        |mut caller: Caller<'_, ()>, count: i32, buf_size: i32| {
            let rc = write_u32(&mut caller, count, 0);
            if rc != ERRNO_SUCCESS {
                return rc;
            }
            write_u32(&mut caller, buf_size, 0)
        },
    )?;

    // No file descriptors beyond the (closed) standard trio.
    linker.func_wrap(
        m,
        "fd_write",
        |_: Caller<'_, ()>, _fd: i32, _iovs: i32, _len: i32, _nwritten: i32| ERRNO_BADF,
    )?;
    linker.func_wrap(
        m,
        "fd_read",
        |_: Caller<'_, ()>, _fd: i32, _iovs: i32, _len: i32, _nread: i32| ERRNO_BADF,
    )?;
    linker.func_wrap(m, "fd_close", |_: Caller<'_, ()>, _fd: i32| ERRNO_BADF)?;
    linker.func_wrap(
        m,
        "fd_seek",
        |_: Caller<'_, ()>, _fd: i32, _offset: i64, _whence: i32, _newoffset: i32| ERRNO_BADF,
    )?;
    linker.func_wrap(m, "fd_fdstat_get", |_: Caller<'_, ()>, _fd: i32, _buf: i32| {
        ERRNO_BADF
    })?;
    linker.func_wrap(
        m,
        "fd_fdstat_set_flags",
        |_: Caller<'_, ()>, _fd: i32, _flags: i32| ERRNO_BADF,
    )?;
    linker.func_wrap(
        m,
        "fd_prestat_get",
        |_: Caller<'_, ()>, _fd: i32, _buf: i32| ERRNO_BADF,
    )?;
    linker.func_wrap(
        m,
        "fd_prestat_dir_name",
        |_: Caller<'_, ()>, _fd: i32, _path: i32, _len: i32| ERRNO_BADF,
    )?;
    linker.func_wrap(
        m,
        "path_open",
        |_: Caller<'_, ()>,
         _fd: i32,
         _dirflags: i32,
         _path: i32,
         _path_len: i32,
         _oflags: i32,
         _rights_base: i64,
         _rights_inheriting: i64,
         _fdflags: i32,
         _opened_fd: i32| ERRNO_NOSYS,
    )?;

    // No ambient clock, randomness, or scheduling.
    linker.func_wrap(
        m,
        "clock_time_get",
        |_: Caller<'_, ()>, _id: i32, _precision: i64, _time: i32| ERRNO_NOSYS,
    )?;
    linker.func_wrap(
        m,
        "random_get",
        |_: Caller<'_, ()>, _buf: i32, _len: i32| ERRNO_NOSYS,
    )?;
    linker.func_wrap(
        m,
        "poll_oneoff",
        |_: Caller<'_, ()>, _in: i32, _out: i32, _nsubs: i32, _nevents: i32| ERRNO_NOSYS,
    )?;
    linker.func_wrap(m, "sched_yield", |_: Caller<'_, ()>| ERRNO_SUCCESS)?;

    // Reactor modules never call proc_exit; returning is harmless for the
    // ones that do anyway.
    linker.func_wrap(m, "proc_exit", |_: Caller<'_, ()>, _code: i32| {})?;

    Ok(())
}
