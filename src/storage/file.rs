//! Random-access read-only file store

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Result, StreamError};

/// Read-only random-access file.
///
/// Useful for files too large to slurp into memory; for small inputs,
/// reading the file and using an in-memory stream is usually faster.
/// The size is captured at open time; the runtime assumes no concurrent
/// truncation.
pub(crate) struct FileStore {
    file: File,
    size: u64,
}

impl FileStore {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }

    pub(crate) fn len(&self) -> u64 {
        self.size
    }

    pub(crate) fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> Result<()> {
        if pos + buf.len() as u64 > self.size {
            return Err(StreamError::EndOfStream {
                requested: buf.len() as u64,
                pos,
                size: self.size,
            });
        }
        self.file.seek(SeekFrom::Start(pos))?;
        self.file.read_exact(buf)?;
        Ok(())
    }
}
