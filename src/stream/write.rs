//! Write-side primitive codec: typed integers, floats, byte arrays

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Result, StreamError, Value};
use crate::stream::Stream;

impl Stream {
    // ------------------------------------------------------------------
    // Signed integers
    // ------------------------------------------------------------------

    pub fn write_s1(&mut self, v: i8) -> Result<()> {
        self.write_aligned(&[v as u8])
    }

    pub fn write_s2be(&mut self, v: i16) -> Result<()> {
        let mut buf = [0u8; 2];
        BigEndian::write_i16(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_s4be(&mut self, v: i32) -> Result<()> {
        let mut buf = [0u8; 4];
        BigEndian::write_i32(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_s8be(&mut self, v: i64) -> Result<()> {
        let mut buf = [0u8; 8];
        BigEndian::write_i64(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_s2le(&mut self, v: i16) -> Result<()> {
        let mut buf = [0u8; 2];
        LittleEndian::write_i16(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_s4le(&mut self, v: i32) -> Result<()> {
        let mut buf = [0u8; 4];
        LittleEndian::write_i32(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_s8le(&mut self, v: i64) -> Result<()> {
        let mut buf = [0u8; 8];
        LittleEndian::write_i64(&mut buf, v);
        self.write_aligned(&buf)
    }

    // ------------------------------------------------------------------
    // Unsigned integers
    // ------------------------------------------------------------------

    pub fn write_u1(&mut self, v: u8) -> Result<()> {
        self.write_aligned(&[v])
    }

    pub fn write_u2be(&mut self, v: u16) -> Result<()> {
        let mut buf = [0u8; 2];
        BigEndian::write_u16(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_u4be(&mut self, v: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        BigEndian::write_u32(&mut buf, v);
        self.write_aligned(&buf)
    }

    /// Writes an unsigned 8-byte integer; the emitted bit pattern is the
    /// same one the signed path produces.
    pub fn write_u8be(&mut self, v: u64) -> Result<()> {
        let mut buf = [0u8; 8];
        BigEndian::write_u64(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_u2le(&mut self, v: u16) -> Result<()> {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_u4le(&mut self, v: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_u8le(&mut self, v: u64) -> Result<()> {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, v);
        self.write_aligned(&buf)
    }

    // ------------------------------------------------------------------
    // Floating point
    // ------------------------------------------------------------------

    pub fn write_f4be(&mut self, v: f32) -> Result<()> {
        let mut buf = [0u8; 4];
        BigEndian::write_f32(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_f8be(&mut self, v: f64) -> Result<()> {
        let mut buf = [0u8; 8];
        BigEndian::write_f64(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_f4le(&mut self, v: f32) -> Result<()> {
        let mut buf = [0u8; 4];
        LittleEndian::write_f32(&mut buf, v);
        self.write_aligned(&buf)
    }

    pub fn write_f8le(&mut self, v: f64) -> Result<()> {
        let mut buf = [0u8; 8];
        LittleEndian::write_f64(&mut buf, v);
        self.write_aligned(&buf)
    }

    // ------------------------------------------------------------------
    // Byte arrays
    // ------------------------------------------------------------------

    /// Write the whole buffer at the cursor.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.write_aligned(buf)
    }

    /// Write `buf` into a field of exactly `size` bytes: the contents,
    /// then — when shorter than `size` — one `term` byte and `pad` bytes
    /// up to the limit. A buffer longer than `size` is a consistency
    /// error in the serialized structure.
    pub fn write_bytes_limit(&mut self, buf: &[u8], size: u64, term: u8, pad: u8) -> Result<()> {
        let len = buf.len() as u64;
        if len > size {
            return Err(StreamError::ConsistencyCheckFailed {
                id: "WriteLimitExceeded".to_string(),
                actual: Value::UInt(len),
                expected: Value::UInt(size),
            });
        }
        self.write_bytes(buf)?;
        if len < size {
            self.write_u1(term)?;
            let padding = vec![pad; (size - len - 1) as usize];
            self.write_bytes_not_aligned(&padding)?;
        }
        Ok(())
    }

    /// Append another stream's full contents at the cursor.
    ///
    /// This is the injection primitive write-back handlers use to copy an
    /// independent child substream into its parent once its size is
    /// final.
    pub fn write_stream(&mut self, other: &mut Stream) -> Result<()> {
        let bytes = other.to_byte_array()?;
        self.write_bytes(&bytes)
    }
}
