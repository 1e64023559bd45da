//! The stream front: cursor, substreams, write-back, lifecycle
//!
//! A [`Stream`] is a seekable dual-mode cursor over a backing store. All
//! format-level behavior lives here and in the sibling modules: typed
//! primitive codecs in `read`/`write`, the sub-byte accumulator in
//! `bits`. Generated parser/serializer types hold a `Stream` and call
//! straight into this surface.

mod bits;
mod read;
mod write;

#[cfg(test)]
mod tests;

pub use bits::BitOrder;

use std::fmt;
use std::mem;
use std::path::Path;

use tracing::trace;

use crate::error::{Result, StreamError};
use crate::storage::{BufferStore, FileStore, ListStore, SharedStore, Storage};

/// A seekable read/write cursor over a byte source.
///
/// Streams are single-threaded and strictly sequential: every operation
/// mutates the cursor (and possibly the bit accumulator) in program
/// order. Byte-aligned operations align the bit accumulator first, so
/// interleaving bit-level and byte-level access is always well defined.
///
/// # Example
///
/// ```
/// use tessera_runtime::Stream;
///
/// let mut io = Stream::from_bytes(vec![0x12, 0x34, 0x56, 0x78]);
/// assert_eq!(io.read_u2be().unwrap(), 0x1234);
/// assert_eq!(io.read_u2le().unwrap(), 0x7856);
/// assert!(io.is_eof().unwrap());
/// ```
pub struct Stream {
    storage: Storage,
    pos: u64,

    // Bit accumulator: `bits_left` residue bits (0..=7) tagged with the
    // order and mode of the bit op that produced them.
    bits: u64,
    bits_left: u32,
    bit_order: BitOrder,
    bits_write_mode: bool,

    // Absolute position of this stream's origin within the root stream.
    offset: u64,

    write_back: Option<WriteBackHandler>,
    children: Vec<Stream>,
}

impl Stream {
    fn with_storage(storage: Storage, offset: u64) -> Self {
        Self {
            storage,
            pos: 0,
            bits: 0,
            bits_left: 0,
            bit_order: BitOrder::Be,
            bits_write_mode: false,
            offset,
            write_back: None,
            children: Vec::new(),
        }
    }

    /// Open a read-only stream over a file with random access.
    ///
    /// The file is read through the handle on demand; for small files,
    /// `Stream::from_bytes(std::fs::read(path)?)` is usually faster.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let store = FileStore::open(path.as_ref())?;
        Ok(Self::with_storage(Storage::File(store), 0))
    }

    /// Read-only stream over a copy of the given bytes.
    ///
    /// Substreams carved from it share the allocation without copying.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::with_storage(Storage::Shared(SharedStore::new(data.into())), 0)
    }

    /// Read/write stream over an owned buffer of fixed size.
    pub fn from_buffer(data: Vec<u8>) -> Self {
        Self::with_storage(Storage::Buffer(BufferStore::new(data)), 0)
    }

    /// Read/write stream over a zero-filled buffer of `n` bytes, for
    /// serialization with a known final size.
    pub fn with_capacity(n: usize) -> Self {
        Self::with_storage(Storage::Buffer(BufferStore::with_capacity(n)), 0)
    }

    /// Write-only stream over a growable byte list, for serialization
    /// when the final size is unknown upfront. Seeking past the end and
    /// writing zero-fills the gap.
    pub fn from_byte_list() -> Self {
        Self::with_storage(Storage::List(ListStore::new()), 0)
    }

    // ------------------------------------------------------------------
    // Stream positioning
    // ------------------------------------------------------------------

    /// Current cursor position: whole bytes consumed or produced since
    /// the stream origin. A partial bit tail is not counted until it is
    /// flushed to the store.
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Total size of the stream in bytes.
    pub fn size(&self) -> Result<u64> {
        self.storage.len()
    }

    /// Absolute position of this stream's origin within the root stream.
    ///
    /// Zero for root streams; substreams inherit the parent's offset plus
    /// the carve position. Consumed by [`crate::Span`].
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Move the cursor to an absolute position.
    ///
    /// Aligns the bit accumulator first (flushing a partial write byte if
    /// one is pending). Seeking past the end fails with `EndOfStream`
    /// except on a growable stream, where the gap is zero-filled if a
    /// write follows.
    pub fn seek(&mut self, new_pos: u64) -> Result<()> {
        self.align_to_byte()?;
        if !self.storage.seek_in_bounds(new_pos)? {
            return Err(StreamError::EndOfStream {
                requested: 0,
                pos: new_pos,
                size: self.size()?,
            });
        }
        self.pos = new_pos;
        Ok(())
    }

    /// Whether the cursor is at the end of the stream with no unconsumed
    /// bit residue.
    pub fn is_eof(&self) -> Result<bool> {
        if !self.bits_write_mode && self.bits_left > 0 {
            return Ok(false);
        }
        Ok(self.pos >= self.storage.len()?)
    }

    /// Close the stream.
    ///
    /// Flushes a pending partial bit byte first, then releases the
    /// backing store; the release happens even if the flush fails. If
    /// both steps fail, the close error is primary and the flush error is
    /// attached as suppressed context. In-memory contents remain
    /// retrievable through [`Stream::to_byte_array`] after close; a file
    /// handle is dropped.
    pub fn close(&mut self) -> Result<()> {
        trace!(pos = self.pos, "closing stream");
        let flushed = self.align_to_byte();
        let released = self.storage.close();
        match (flushed, released) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(flush), Ok(())) => Err(flush),
            (Ok(()), Err(close)) => Err(close),
            (Err(flush), Err(close)) => Err(StreamError::CloseFailed {
                primary: Box::new(close),
                suppressed: Box::new(flush),
            }),
        }
    }

    /// Full contents of the stream as a byte array, independent of the
    /// cursor. Flushes a pending partial bit byte first.
    pub fn to_byte_array(&mut self) -> Result<Vec<u8>> {
        self.align_to_byte()?;
        self.storage.snapshot()
    }

    /// Read-only stream over this stream's current contents, positioned
    /// at the start.
    ///
    /// Zero-copy when the stream is already backed by a shared window;
    /// otherwise the contents are copied out once.
    pub fn as_readonly_view(&mut self) -> Result<Stream> {
        self.align_to_byte()?;
        let storage = match &self.storage {
            Storage::Shared(s) => Storage::Shared(s.clone()),
            _ => Storage::Shared(SharedStore::new(self.storage.snapshot()?)),
        };
        Ok(Self::with_storage(storage, self.offset))
    }

    // ------------------------------------------------------------------
    // Substreams
    // ------------------------------------------------------------------

    /// Carve a bounded substream of the next `n` bytes.
    ///
    /// The parent cursor advances past the window; the child starts at
    /// position 0 with size `n`, an empty bit accumulator and an origin
    /// offset pointing at the carve position. Over a shared-window parent
    /// the child shares the allocation; otherwise it owns an independent
    /// read-only copy of the window.
    pub fn substream(&mut self, n: u64) -> Result<Stream> {
        self.align_to_byte()?;
        let size = self.size()?;
        if n > size.saturating_sub(self.pos) {
            return Err(StreamError::EndOfStream {
                requested: n,
                pos: self.pos,
                size,
            });
        }
        let child_offset = self.offset + self.pos;
        let storage = match &mut self.storage {
            Storage::Shared(s) => Storage::Shared(s.carve(self.pos, n)),
            _ => {
                let mut window = vec![0u8; n as usize];
                self.storage.read_at(self.pos, &mut window)?;
                Storage::Shared(SharedStore::new(window))
            }
        };
        self.pos += n;
        trace!(offset = child_offset, len = n, "carved substream");
        Ok(Self::with_storage(storage, child_offset))
    }

    // ------------------------------------------------------------------
    // Write-back and child tracking
    // ------------------------------------------------------------------

    /// Remember how this stream's finalized contents should be written
    /// back into its parent.
    pub fn set_write_back_handler(&mut self, handler: WriteBackHandler) {
        self.write_back = Some(handler);
    }

    /// Register a child stream whose write-back runs when this stream's
    /// [`Stream::write_back_child_streams`] walk executes. The child is
    /// owned by this stream from now on, which makes handler cycles
    /// unrepresentable.
    pub fn add_child_stream(&mut self, child: Stream) {
        self.children.push(child);
    }

    /// Run the write-back protocol over all registered children.
    ///
    /// Children are processed in registration order; each child first
    /// recurses into its own children, then its handler re-enters this
    /// stream at the remembered position. The child list is cleared and
    /// the cursor restored afterwards. Every handler runs exactly once;
    /// errors propagate immediately.
    pub fn write_back_child_streams(&mut self) -> Result<()> {
        let saved = self.pos;
        let mut children = mem::take(&mut self.children);
        trace!(children = children.len(), "write-back walk");
        for child in &mut children {
            child.write_back_into(self)?;
        }
        self.seek(saved)?;
        Ok(())
    }

    /// Recursive step of the write-back walk: finalize our own children,
    /// then dispatch our handler against the parent.
    fn write_back_into(&mut self, parent: &mut Stream) -> Result<()> {
        let saved = self.pos;
        let mut children = mem::take(&mut self.children);
        for child in &mut children {
            child.write_back_into(self)?;
        }
        self.seek(saved)?;
        let handler = self.write_back.take().ok_or_else(|| {
            StreamError::UnsupportedOperation(
                "child stream registered without a write-back handler".to_string(),
            )
        })?;
        handler.run(parent, self)
    }

    // ------------------------------------------------------------------
    // Unaligned raw access shared by the codec and bit layers
    // ------------------------------------------------------------------

    /// Read exactly `buf.len()` bytes at the cursor without touching the
    /// bit accumulator. Used mid-bit-field and by aligned ops after they
    /// have aligned.
    pub(crate) fn read_bytes_not_aligned(&mut self, buf: &mut [u8]) -> Result<()> {
        self.storage.read_at(self.pos, buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Step the cursor back `n` bytes after an overshooting probe read.
    pub(crate) fn unread(&mut self, n: u64) {
        self.pos -= n;
    }

    /// Write `buf` at the cursor without touching the bit accumulator.
    pub(crate) fn write_bytes_not_aligned(&mut self, buf: &[u8]) -> Result<()> {
        self.storage.write_at(self.pos, buf)?;
        self.pos += buf.len() as u64;
        Ok(())
    }

    /// Align, then read exactly `buf.len()` bytes.
    pub(crate) fn read_aligned(&mut self, buf: &mut [u8]) -> Result<()> {
        self.align_to_byte()?;
        self.read_bytes_not_aligned(buf)
    }

    /// Align (flushing any partial write byte), then write `buf`.
    pub(crate) fn write_aligned(&mut self, buf: &[u8]) -> Result<()> {
        self.align_to_byte()?;
        self.write_bytes_not_aligned(buf)
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("pos", &self.pos)
            .field("offset", &self.offset)
            .field("bits_left", &self.bits_left)
            .field("children", &self.children.len())
            .finish_non_exhaustive()
    }
}

/// Deferred write of parse-determined values (sizes, offsets, checksums)
/// into a parent stream.
///
/// Registered on a child stream together with the parent position where
/// the placeholder lives. During the parent's write-back walk the parent
/// seeks to that position and the callback runs with both streams, the
/// child's contents being final by then.
pub struct WriteBackHandler {
    pos: u64,
    write: Box<dyn FnOnce(&mut Stream, &mut Stream) -> Result<()>>,
}

impl WriteBackHandler {
    /// `write` receives the parent (already seeked to `pos`) and the
    /// finalized child.
    pub fn new(
        pos: u64,
        write: impl FnOnce(&mut Stream, &mut Stream) -> Result<()> + 'static,
    ) -> Self {
        Self {
            pos,
            write: Box::new(write),
        }
    }

    fn run(self, parent: &mut Stream, child: &mut Stream) -> Result<()> {
        trace!(pos = self.pos, "write-back");
        parent.seek(self.pos)?;
        (self.write)(parent, child)
    }
}

impl fmt::Debug for WriteBackHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteBackHandler")
            .field("pos", &self.pos)
            .finish_non_exhaustive()
    }
}
