//! Backing stores for streams
//!
//! A stream front does all the format-level work (alignment, bit
//! accumulation, typed decoding); the storage layer below it only moves
//! raw bytes at absolute positions. Four stores cover the constructor
//! surface:
//!
//! - [`BufferStore`] — owned in-memory buffer, fixed size, read/write
//! - [`SharedStore`] — read-only window over a shared allocation; this is
//!   the mapped-style read-only view and the zero-copy substream carrier
//! - [`FileStore`] — random-access read-only file handle
//! - [`ListStore`] — growable write sink for serialization when the final
//!   size is unknown upfront
//!
//! The set is a tagged enum rather than a trait object: the variants are
//! closed, and every operation dispatches in one match.

mod buffer;
mod file;
mod list;
mod shared;


pub(crate) use buffer::BufferStore;
pub(crate) use file::FileStore;
pub(crate) use list::ListStore;
pub(crate) use shared::SharedStore;

use crate::error::{Result, StreamError};

/// The byte container behind a stream.
///
/// Positionless: the stream front owns the cursor and passes absolute
/// positions down. `Closed` is the terminal state entered by
/// `Stream::close` once resources are released.
pub(crate) enum Storage {
    Buffer(BufferStore),
    Shared(SharedStore),
    File(FileStore),
    List(ListStore),
    Closed,
}

impl Storage {
    /// Total size of the store in bytes.
    ///
    /// For the growable list store this is the current length.
    pub(crate) fn len(&self) -> Result<u64> {
        match self {
            Storage::Buffer(s) => Ok(s.len()),
            Storage::Shared(s) => Ok(s.len()),
            Storage::File(s) => Ok(s.len()),
            Storage::List(s) => Ok(s.len()),
            Storage::Closed => Err(closed()),
        }
    }

    /// Read exactly `buf.len()` bytes starting at `pos`.
    pub(crate) fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
        match self {
            Storage::Buffer(s) => s.read_at(pos, buf),
            Storage::Shared(s) => s.read_at(pos, buf),
            Storage::File(s) => s.read_at(pos, buf),
            Storage::List(_) => Err(StreamError::UnsupportedOperation(
                "read on a write-only stream".to_string(),
            )),
            Storage::Closed => Err(closed()),
        }
    }

    /// Write all of `bytes` starting at `pos`.
    pub(crate) fn write_at(&mut self, pos: u64, bytes: &[u8]) -> Result<()> {
        match self {
            Storage::Buffer(s) => s.write_at(pos, bytes),
            Storage::Shared(_) => Err(StreamError::UnsupportedOperation(
                "write on a read-only stream".to_string(),
            )),
            Storage::File(_) => Err(StreamError::UnsupportedOperation(
                "write on a read-only file stream".to_string(),
            )),
            Storage::List(s) => {
                s.write_at(pos, bytes);
                Ok(())
            }
            Storage::Closed => Err(closed()),
        }
    }

    /// Whether a seek to `pos` is in bounds for this store.
    ///
    /// The growable list store accepts any position; the gap is
    /// zero-filled if a write follows.
    pub(crate) fn seek_in_bounds(&self, pos: u64) -> Result<bool> {
        match self {
            Storage::List(_) => Ok(true),
            _ => Ok(pos <= self.len()?),
        }
    }

    /// Copy of the store's full contents, independent of any cursor.
    pub(crate) fn snapshot(&mut self) -> Result<Vec<u8>> {
        match self {
            Storage::Buffer(s) => Ok(s.as_slice().to_vec()),
            Storage::Shared(s) => Ok(s.window().to_vec()),
            Storage::File(s) => {
                let len = s.len();
                let mut buf = vec![0u8; len as usize];
                s.read_at(0, &mut buf)?;
                Ok(buf)
            }
            Storage::List(s) => Ok(s.bytes().to_vec()),
            Storage::Closed => Err(closed()),
        }
    }

    /// Release OS resources. In-memory stores stay readable afterwards so
    /// serialization results remain retrievable; only the file handle
    /// variant transitions to `Closed`.
    pub(crate) fn close(&mut self) -> Result<()> {
        if matches!(self, Storage::File(_)) {
            *self = Storage::Closed;
        }
        Ok(())
    }
}

fn closed() -> StreamError {
    StreamError::UnsupportedOperation("stream is closed".to_string())
}
