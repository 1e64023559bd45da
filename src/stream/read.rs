//! Read-side primitive codec: typed integers, floats, byte arrays

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Result, StreamError};
use crate::stream::Stream;

impl Stream {
    // ------------------------------------------------------------------
    // Signed integers
    // ------------------------------------------------------------------

    pub fn read_s1(&mut self) -> Result<i8> {
        let mut buf = [0u8; 1];
        self.read_aligned(&mut buf)?;
        Ok(buf[0] as i8)
    }

    pub fn read_s2be(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.read_aligned(&mut buf)?;
        Ok(BigEndian::read_i16(&buf))
    }

    pub fn read_s4be(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_aligned(&mut buf)?;
        Ok(BigEndian::read_i32(&buf))
    }

    pub fn read_s8be(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.read_aligned(&mut buf)?;
        Ok(BigEndian::read_i64(&buf))
    }

    pub fn read_s2le(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.read_aligned(&mut buf)?;
        Ok(LittleEndian::read_i16(&buf))
    }

    pub fn read_s4le(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_aligned(&mut buf)?;
        Ok(LittleEndian::read_i32(&buf))
    }

    pub fn read_s8le(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.read_aligned(&mut buf)?;
        Ok(LittleEndian::read_i64(&buf))
    }

    // ------------------------------------------------------------------
    // Unsigned integers
    // ------------------------------------------------------------------

    pub fn read_u1(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_aligned(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u2be(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_aligned(&mut buf)?;
        Ok(BigEndian::read_u16(&buf))
    }

    pub fn read_u4be(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_aligned(&mut buf)?;
        Ok(BigEndian::read_u32(&buf))
    }

    /// Reads an unsigned 8-byte integer. The bit pattern is the same one
    /// the signed path yields; hosts without a native u64 transport it
    /// through `read_s8be`.
    pub fn read_u8be(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_aligned(&mut buf)?;
        Ok(BigEndian::read_u64(&buf))
    }

    pub fn read_u2le(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_aligned(&mut buf)?;
        Ok(LittleEndian::read_u16(&buf))
    }

    pub fn read_u4le(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_aligned(&mut buf)?;
        Ok(LittleEndian::read_u32(&buf))
    }

    pub fn read_u8le(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_aligned(&mut buf)?;
        Ok(LittleEndian::read_u64(&buf))
    }

    // ------------------------------------------------------------------
    // Floating point
    // ------------------------------------------------------------------

    pub fn read_f4be(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.read_aligned(&mut buf)?;
        Ok(BigEndian::read_f32(&buf))
    }

    pub fn read_f8be(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.read_aligned(&mut buf)?;
        Ok(BigEndian::read_f64(&buf))
    }

    pub fn read_f4le(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.read_aligned(&mut buf)?;
        Ok(LittleEndian::read_f32(&buf))
    }

    pub fn read_f8le(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.read_aligned(&mut buf)?;
        Ok(LittleEndian::read_f64(&buf))
    }

    // ------------------------------------------------------------------
    // Byte arrays
    // ------------------------------------------------------------------

    /// Read exactly `n` bytes, or fail with `EndOfStream` if fewer remain.
    pub fn read_bytes(&mut self, n: u64) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n as usize];
        self.read_aligned(&mut buf)?;
        Ok(buf)
    }

    /// Read all remaining bytes from the cursor to the end of the stream.
    pub fn read_bytes_full(&mut self) -> Result<Vec<u8>> {
        self.align_to_byte()?;
        let remaining = self.size()?.saturating_sub(self.pos());
        let mut buf = vec![0u8; remaining as usize];
        self.read_bytes_not_aligned(&mut buf)?;
        Ok(buf)
    }

    /// Read bytes until one equals `term`.
    ///
    /// The returned array includes the terminator iff `include_term`. The
    /// cursor ends one past the terminator iff `consume_term`, otherwise
    /// directly on it. Hitting the end of the stream without a match
    /// fails with `EndOfStream` iff `eos_error`, otherwise returns what
    /// was read.
    pub fn read_bytes_term(
        &mut self,
        term: u8,
        include_term: bool,
        consume_term: bool,
        eos_error: bool,
    ) -> Result<Vec<u8>> {
        self.align_to_byte()?;
        let size = self.size()?;
        let mut out = Vec::new();
        loop {
            if self.pos() >= size {
                if eos_error {
                    return Err(StreamError::EndOfStream {
                        requested: 1,
                        pos: self.pos(),
                        size,
                    });
                }
                return Ok(out);
            }
            let mut byte = [0u8; 1];
            self.read_bytes_not_aligned(&mut byte)?;
            if byte[0] == term {
                if include_term {
                    out.push(term);
                }
                if !consume_term {
                    self.unread(1);
                }
                return Ok(out);
            }
            out.push(byte[0]);
        }
    }

    /// Read bytes until the next `term.len()` bytes equal `term`.
    ///
    /// The scan advances one byte at a time, so matches at any alignment
    /// are found. If the end of the stream is reached with fewer than
    /// `term.len()` bytes left and `eos_error` is false, those trailing
    /// partial bytes are included in the returned array — unlike the
    /// single-byte variant, which never has a partial tail.
    pub fn read_bytes_term_multi(
        &mut self,
        term: &[u8],
        include_term: bool,
        consume_term: bool,
        eos_error: bool,
    ) -> Result<Vec<u8>> {
        self.align_to_byte()?;
        let unit = term.len() as u64;
        let size = self.size()?;
        let mut out = Vec::new();
        let mut probe = vec![0u8; term.len()];
        loop {
            let rest = size.saturating_sub(self.pos());
            if rest < unit {
                if eos_error {
                    return Err(StreamError::EndOfStream {
                        requested: unit,
                        pos: self.pos(),
                        size,
                    });
                }
                let mut tail = vec![0u8; rest as usize];
                self.read_bytes_not_aligned(&mut tail)?;
                out.extend_from_slice(&tail);
                return Ok(out);
            }
            self.read_bytes_not_aligned(&mut probe)?;
            if probe == term {
                if include_term {
                    out.extend_from_slice(term);
                }
                if !consume_term {
                    self.unread(unit);
                }
                return Ok(out);
            }
            out.push(probe[0]);
            self.unread(unit - 1);
        }
    }

    /// Read `expected.len()` bytes and require them to equal `expected`.
    pub fn ensure_fixed_contents(&mut self, expected: &[u8]) -> Result<Vec<u8>> {
        let actual = self.read_bytes(expected.len() as u64)?;
        if actual != expected {
            return Err(StreamError::UnexpectedFixedContent {
                actual,
                expected: expected.to_vec(),
            });
        }
        Ok(actual)
    }
}
