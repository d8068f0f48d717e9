//! Sandboxed WebAssembly plugin step.
//!
//! Loads a precompiled guest module into a fresh `wasmi` interpreter,
//! reserves a shared buffer inside the guest's linear memory once, then
//! drives the two-function guest ABI per packet:
//!
//! 1. the host writes the packet into the shared buffer,
//! 2. calls `process_packet(shared_ptr, len)`,
//! 3. unpacks the returned `(result_ptr << 32) | result_len`,
//! 4. copies the result region into a fresh host buffer.
//!
//! The copy in step 4 is deliberate: the next call overwrites the shared
//! region, so returned bytes must not alias guest memory. The shared
//! pointer and buffer size are fixed for the step's lifetime; the host
//! never grows the region.

use std::fs;
use std::path::Path;

use tracing::debug;
use wasmi::{Engine, Instance, Linker, Memory, Module, Store, TypedFunc};

use crate::error::StepError;
use crate::step::PipelineStep;
use crate::wasi;

/// Default shared-buffer capacity: 1 MiB.
pub const DEFAULT_BUFFER_SIZE: u32 = 1024 * 1024;

/// A pipeline step backed by an untrusted WebAssembly guest.
///
/// Safe for sequential use only; one instance per worker. Dropping the
/// step tears down the guest runtime and with it the shared buffer.
#[derive(Debug)]
pub struct WasmStep {
    store: Store<()>,
    memory: Memory,
    process_packet: TypedFunc<(u32, u32), u64>,
    shared_ptr: u32,
    buffer_size: u32,
}

impl WasmStep {
    /// Load a guest module from disk with the default buffer size.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StepError> {
        Self::from_file_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Load a guest module from disk with an explicit buffer size. The
    /// buffer size is the upper bound on packet length for this step.
    pub fn from_file_with_buffer_size(
        path: impl AsRef<Path>,
        buffer_size: u32,
    ) -> Result<Self, StepError> {
        let path = path.as_ref();
        let wasm = fs::read(path).map_err(|source| StepError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = wasm.len(), "read guest module");
        Self::from_bytes(&wasm, buffer_size)
    }

    /// Instantiate a guest module from its raw bytes.
    pub fn from_bytes(wasm: &[u8], buffer_size: u32) -> Result<Self, StepError> {
        let engine = Engine::default();
        let module = Module::new(&engine, wasm)
            .map_err(|e| StepError::InvalidModule(e.to_string()))?;

        let mut store = Store::new(&engine, ());
        let mut linker = <Linker<()>>::new(&engine);
        wasi::add_to_linker(&mut linker)
            .map_err(|e| StepError::InvalidModule(e.to_string()))?;

        // Instantiate without running anything: a module that declares a
        // start function is rejected outright.
        let instance = linker
            .instantiate(&mut store, &module)
            .map_err(|e| StepError::InvalidModule(e.to_string()))?
            .ensure_no_start(&mut store)
            .map_err(|e| StepError::InvalidModule(e.to_string()))?;

        // Reactor-convention initialiser, once, if the toolchain emitted one.
        if let Some(init) = instance.get_func(&store, "_initialize") {
            let init = init
                .typed::<(), ()>(&store)
                .map_err(|e| StepError::BadSignature {
                    name: "_initialize",
                    reason: e.to_string(),
                })?;
            init.call(&mut store, ())
                .map_err(|e| StepError::GuestTrap(e.to_string()))?;
        }

        let allocate_buffer = instance
            .get_func(&store, "allocate_buffer")
            .ok_or(StepError::MissingExport("allocate_buffer"))?
            .typed::<u32, u32>(&store)
            .map_err(|e| StepError::BadSignature {
                name: "allocate_buffer",
                reason: e.to_string(),
            })?;

        let process_packet = instance
            .get_func(&store, "process_packet")
            .ok_or(StepError::MissingExport("process_packet"))?
            .typed::<(u32, u32), u64>(&store)
            .map_err(|e| StepError::BadSignature {
                name: "process_packet",
                reason: e.to_string(),
            })?;

        let memory = Self::exported_memory(&instance, &store)?;

        // Reserve the shared region once; the offset is fixed for the
        // module's lifetime.
        let shared_ptr = allocate_buffer
            .call(&mut store, buffer_size)
            .map_err(|e| StepError::GuestTrap(e.to_string()))?;

        let memory_len = memory.data(&store).len();
        if shared_ptr as usize + buffer_size as usize > memory_len {
            return Err(StepError::InvalidModule(format!(
                "allocate_buffer returned {shared_ptr:#x}, but {buffer_size} bytes \
                 there exceed the {memory_len} byte guest memory"
            )));
        }

        debug!(shared_ptr, buffer_size, "guest module ready");

        Ok(Self {
            store,
            memory,
            process_packet,
            shared_ptr,
            buffer_size,
        })
    }

    fn exported_memory(instance: &Instance, store: &Store<()>) -> Result<Memory, StepError> {
        instance
            .get_memory(store, "memory")
            .ok_or(StepError::MissingExport("memory"))
    }

    /// The fixed capacity of the shared buffer, i.e. the largest packet
    /// this step accepts.
    pub fn buffer_size(&self) -> u32 {
        self.buffer_size
    }
}

impl PipelineStep for WasmStep {
    fn name(&self) -> &str {
        "wasm"
    }

    fn process(&mut self, input: &[u8]) -> Result<Vec<u8>, StepError> {
        if input.len() > self.buffer_size as usize {
            return Err(StepError::OversizeInput {
                len: input.len(),
                capacity: self.buffer_size as usize,
            });
        }

        self.memory
            .write(&mut self.store, self.shared_ptr as usize, input)
            .map_err(|_| StepError::MemoryWrite {
                ptr: self.shared_ptr,
                len: input.len(),
            })?;

        let packed = self
            .process_packet
            .call(&mut self.store, (self.shared_ptr, input.len() as u32))
            .map_err(|e| StepError::GuestTrap(e.to_string()))?;

        // High half is the pointer, low half the length.
        let result_ptr = (packed >> 32) as u32;
        let result_len = packed as u32;

        let mut output = vec![0u8; result_len as usize];
        self.memory
            .read(&self.store, result_ptr as usize, &mut output)
            .map_err(|_| StepError::BadResultRegion {
                ptr: result_ptr,
                len: result_len,
            })?;

        debug!(
            input_len = input.len(),
            result_ptr,
            result_len,
            "process_packet returned"
        );

        Ok(output)
    }
}
