//! Tessera runtime: the stream engine behind generated format code
//!
//! Format authors describe binary layouts in Tessera schemas; the
//! compiler emits Rust parser/serializer types from them. Those types are
//! deliberately thin — every primitive read and write, bit-level
//! extraction, substream carve-out, terminator search and validation
//! check delegates to this crate. The contracts here are what make
//! generated code across targets produce identical bytes for identical
//! inputs.
//!
//! # Key pieces
//!
//! - **[`Stream`]**: a seekable dual-mode cursor over a byte source, with
//!   typed reads/writes in both endiannesses and a sub-byte accumulator
//!   for bit fields in either bit order
//! - **Substreams**: bounded child cursors carved from a parent, sharing
//!   memory where the backing allows it
//! - **Write-back**: deferred handlers that fill parse-determined
//!   placeholders (sizes, offsets, checksums) once child contents are
//!   final
//! - **Process helpers**: XOR, rotation and zlib transforms applied
//!   between the raw stream and parsed fields, plus the [`Decoder`] /
//!   [`Processor`] traits for user-supplied transforms
//! - **[`StreamError`]**: the error taxonomy generated validation code
//!   reports through
//!
//! # Usage
//!
//! Generated code drives the API, but it is usable by hand:
//!
//! ```
//! use tessera_runtime::Stream;
//!
//! let mut io = Stream::from_bytes(vec![0x02, 0x68, 0x69, 0x00]);
//! let count = io.read_u1()?;
//! let name = io.read_bytes_term(0x00, false, true, true)?;
//! assert_eq!(count, 2);
//! assert_eq!(name, b"hi");
//! # Ok::<(), tessera_runtime::StreamError>(())
//! ```
//!
//! Streams are strictly single-threaded; generated code is synchronous
//! and sequential, and the runtime never suspends or retries.

mod error;
mod process;
mod span;
mod storage;
mod stream;

pub use error::{Result, StreamError, ValidationFailed, Value};
pub use process::{
    byte_array_compare, byte_array_index_of, byte_array_max, byte_array_min, bytes_strip_right,
    bytes_terminate, bytes_terminate_multi, modulo, process_rotate_left, process_xor_many,
    process_xor_one, process_zlib, unprocess_zlib, Decoder, Processor,
};
pub use span::{ArraySpan, Span};
pub use stream::{BitOrder, Stream, WriteBackHandler};
