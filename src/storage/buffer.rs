//! Owned in-memory buffer store

use crate::error::{Result, StreamError};

/// Fixed-size read/write buffer.
///
/// Writes past the end fail with `EndOfStream`; the buffer never grows.
pub(crate) struct BufferStore {
    data: Vec<u8>,
}

impl BufferStore {
    pub(crate) fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Zero-filled buffer of `n` bytes, for serialization with a known size.
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self { data: vec![0u8; n] }
    }

    pub(crate) fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn read_at(&self, pos: u64, buf: &mut [u8]) -> Result<()> {
        let end = pos + buf.len() as u64;
        if end > self.len() {
            return Err(StreamError::EndOfStream {
                requested: buf.len() as u64,
                pos,
                size: self.len(),
            });
        }
        buf.copy_from_slice(&self.data[pos as usize..end as usize]);
        Ok(())
    }

    pub(crate) fn write_at(&mut self, pos: u64, bytes: &[u8]) -> Result<()> {
        let end = pos + bytes.len() as u64;
        if end > self.len() {
            return Err(StreamError::EndOfStream {
                requested: bytes.len() as u64,
                pos,
                size: self.len(),
            });
        }
        self.data[pos as usize..end as usize].copy_from_slice(bytes);
        Ok(())
    }
}
