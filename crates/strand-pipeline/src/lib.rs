//! Strand packet pipeline
//!
//! A pipeline is an ordered list of byte-in/byte-out steps. The driver
//! threads an input buffer through them in declaration order, stopping at
//! the first failure and tagging the error with the failing step's name.
//!
//! The interesting step is [`WasmStep`]: it loads a precompiled
//! WebAssembly module into a sandboxed interpreter, reserves a shared
//! buffer inside the guest's linear memory once at construction, and
//! invokes the guest's `process_packet` export per input packet. Guests
//! are untrusted; they get a capability-free WASI surface and nothing
//! else, and a guest trap is an ordinary step failure, never a host
//! crash.
//!
//! # Guest ABI
//!
//! A guest module must export:
//!
//! | Export            | Type                   | Purpose                         |
//! |-------------------|------------------------|---------------------------------|
//! | `memory`          | memory                 | shared linear memory            |
//! | `allocate_buffer` | `(u32) -> u32`         | reserve the shared buffer once  |
//! | `process_packet`  | `(u32, u32) -> u64`    | transform one packet            |
//!
//! `process_packet` receives the shared-buffer offset and the packet
//! length, and returns `(result_ptr << 32) | result_len`. The optional
//! `_initialize` export is called once after instantiation (WASI reactor
//! convention).

mod driver;
mod error;
mod step;
mod strip;
mod wasi;
mod wasm;

pub use driver::run_pipeline;
pub use error::{PipelineError, StepError};
pub use step::PipelineStep;
pub use strip::{HEADER_LEN, StripStep};
pub use wasm::{DEFAULT_BUFFER_SIZE, WasmStep};
