//! Byte-transform helpers for `process` pipelines
//!
//! Pure functions applied to byte arrays between the raw stream and the
//! parsed field: XOR unmasking, per-byte rotation, zlib. Each transform
//! has a forward (parse) direction and, where serialization needs it, an
//! inverse. Custom transforms plug in through [`Decoder`] / [`Processor`].

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Result, StreamError};

/// Custom byte-transform plugin, parse direction only.
///
/// Schemas can name a user-supplied transform; the generated code calls
/// `decode` on the raw field bytes during parsing. Implementations must
/// be pure with respect to their input — the runtime never caches
/// results. Read-only formats need nothing more; formats compiled with
/// serialization support implement [`Processor`] instead.
pub trait Decoder {
    fn decode(&self, src: &[u8]) -> Result<Vec<u8>>;
}

/// Custom byte-transform plugin with a serialization direction.
///
/// `encode` must invert `decode`: for all `b`, `decode(&encode(b)?)? == b`.
pub trait Processor: Decoder {
    fn encode(&self, src: &[u8]) -> Result<Vec<u8>>;
}

/// XOR every byte with a single key byte. Self-inverse.
pub fn process_xor_one(data: &[u8], key: u8) -> Vec<u8> {
    data.iter().map(|b| b ^ key).collect()
}

/// XOR every byte with a repeating key, cycling through `key` as many
/// times as the data requires. Self-inverse.
pub fn process_xor_many(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}

/// Circular left rotation in groups of `group_size` bytes.
///
/// Only `group_size == 1` is supported: each byte rotates independently
/// by `amount` bits (taken mod 8; negative amounts rotate right).
pub fn process_rotate_left(data: &[u8], amount: i32, group_size: usize) -> Result<Vec<u8>> {
    if group_size != 1 {
        return Err(StreamError::UnsupportedOperation(format!(
            "unable to rotate group of {} bytes",
            group_size
        )));
    }
    let amount = amount.rem_euclid(8) as u32;
    Ok(data.iter().map(|b| b.rotate_left(amount)).collect())
}

/// Inflate zlib-compressed data (with the usual zlib header).
pub fn process_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

/// Deflate data into the zlib format, default compression level.
pub fn unprocess_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Strip trailing `pad` bytes.
pub fn bytes_strip_right(bytes: &[u8], pad: u8) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == pad {
        end -= 1;
    }
    &bytes[..end]
}

/// Truncate at the first occurrence of `term`, keeping the terminator
/// iff `include_term`. Without a terminator the input passes through.
pub fn bytes_terminate(bytes: &[u8], term: u8, include_term: bool) -> &[u8] {
    match bytes.iter().position(|&b| b == term) {
        Some(i) => &bytes[..i + usize::from(include_term)],
        None => bytes,
    }
}

/// Truncate at the first occurrence of the multi-byte `term` at any
/// alignment. An empty terminator yields empty output.
pub fn bytes_terminate_multi<'a>(bytes: &'a [u8], term: &[u8], include_term: bool) -> &'a [u8] {
    let unit = term.len();
    if unit == 0 {
        return &bytes[..0];
    }
    let mut i = 0;
    while i + unit <= bytes.len() {
        if &bytes[i..i + unit] == term {
            return &bytes[..i + if include_term { unit } else { 0 }];
        }
        i += 1;
    }
    bytes
}

/// Unsigned lexicographic comparison, exposed for generated comparison
/// expressions over byte-array fields.
pub fn byte_array_compare(a: &[u8], b: &[u8]) -> std::cmp::Ordering {
    a.cmp(b)
}

/// Smallest byte value, `None` for empty input.
pub fn byte_array_min(data: &[u8]) -> Option<u8> {
    data.iter().copied().min()
}

/// Largest byte value, `None` for empty input.
pub fn byte_array_max(data: &[u8]) -> Option<u8> {
    data.iter().copied().max()
}

/// Index of the first occurrence of `b`, or -1 when absent.
///
/// The -1 contract is kept (rather than `Option`) because generated
/// expression code does arithmetic on the result.
pub fn byte_array_index_of(data: &[u8], b: u8) -> i64 {
    data.iter()
        .position(|&x| x == b)
        .map(|i| i as i64)
        .unwrap_or(-1)
}

/// Euclidean modulo: the result is always in `[0, b)`.
///
/// Schema expressions define `%` this way regardless of the host
/// language's native remainder. A divisor ≤ 0 is an arithmetic error.
pub fn modulo(a: i64, b: i64) -> Result<i64> {
    if b <= 0 {
        return Err(StreamError::Arithmetic { divisor: b });
    }
    Ok(a.rem_euclid(b))
}
