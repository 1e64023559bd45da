//! Shared read-only window store

use std::sync::Arc;

use crate::error::{Result, StreamError};

/// Read-only window `[start, end)` over a shared allocation.
///
/// Carving a substream from a shared store clones the `Arc` and narrows
/// the window, so nested substreams never copy bytes. There is no write
/// path: a single allocation is never mutable through two streams.
#[derive(Clone)]
pub(crate) struct SharedStore {
    data: Arc<[u8]>,
    start: u64,
    end: u64,
}

impl SharedStore {
    pub(crate) fn new(data: impl Into<Arc<[u8]>>) -> Self {
        let data = data.into();
        let end = data.len() as u64;
        Self {
            data,
            start: 0,
            end,
        }
    }

    pub(crate) fn len(&self) -> u64 {
        self.end - self.start
    }

    pub(crate) fn window(&self) -> &[u8] {
        &self.data[self.start as usize..self.end as usize]
    }

    /// Narrowed window `[at, at + len)` relative to this store.
    ///
    /// Bounds are the caller's responsibility; the stream front checks
    /// against `len()` before carving.
    pub(crate) fn carve(&self, at: u64, len: u64) -> SharedStore {
        debug_assert!(at + len <= self.len());
        SharedStore {
            data: Arc::clone(&self.data),
            start: self.start + at,
            end: self.start + at + len,
        }
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
        let window = self.window();
        buf.copy_from_slice(&window[pos as usize..end as usize]);
        Ok(())
    }
}
