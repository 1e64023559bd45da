//! Error types surfaced by the stream runtime and by generated code

use std::fmt;
use std::io;

use thiserror::Error;

/// Result alias used throughout the runtime.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors that can occur while reading or writing a stream.
///
/// Generated parser/serializer code threads this type through every
/// fallible operation; nothing is silently swallowed.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Read, write or seek past the end of the stream
    #[error("unexpected end of stream (requested {requested} bytes at position {pos}, stream size {size})")]
    EndOfStream { requested: u64, pos: u64, size: u64 },

    /// Fixed contents in the stream differ from the schema's expectation
    #[error("unexpected fixed contents: got [{}], expected [{}]", hex(.actual), hex(.expected))]
    UnexpectedFixedContent { actual: Vec<u8>, expected: Vec<u8> },

    /// A schema-level switch on endianness produced no match
    #[error("unable to decide on endianness, at {src_path}")]
    UndecidedEndianness { src_path: String },

    /// A `valid` constraint in the schema failed
    #[error(transparent)]
    Validation(#[from] ValidationFailed),

    /// A serialization-side `_check` found a field inconsistent with the
    /// value implied by the rest of the structure
    #[error("consistency check failed: {id}, expected: {expected}, actual: {actual}")]
    ConsistencyCheckFailed {
        id: String,
        actual: Value,
        expected: Value,
    },

    /// Modulo by a non-positive divisor
    #[error("modulo by non-positive divisor {divisor}")]
    Arithmetic { divisor: i64 },

    /// Operation not supported by this stream or these arguments
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// IO error from the backing store or a byte-transform codec
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Close-path failure carrying a suppressed earlier flush failure
    #[error("{primary} (suppressed: {suppressed})")]
    CloseFailed {
        primary: Box<StreamError>,
        suppressed: Box<StreamError>,
    },
}

/// A `valid` constraint from the schema failed against parsed data.
///
/// Every variant carries the offending value, the stream position at the
/// point of failure and the source path of the constraint in the schema
/// document, so that tooling can point the format author at the exact line.
#[derive(Debug, Error)]
pub enum ValidationFailed {
    /// Value differs from the single expected value
    #[error("value {actual} is not equal to expected {expected}, at pos {pos}, at {src_path}")]
    NotEqual {
        actual: Value,
        expected: Value,
        pos: u64,
        src_path: String,
    },

    /// Value is below the allowed minimum
    #[error("value {actual} is less than allowed minimum {min}, at pos {pos}, at {src_path}")]
    LessThan {
        actual: Value,
        min: Value,
        pos: u64,
        src_path: String,
    },

    /// Value is above the allowed maximum
    #[error("value {actual} is greater than allowed maximum {max}, at pos {pos}, at {src_path}")]
    GreaterThan {
        actual: Value,
        max: Value,
        pos: u64,
        src_path: String,
    },

    /// Value is not in the list of allowed values
    #[error("value {actual} is not in the list of allowed values, at pos {pos}, at {src_path}")]
    NotAnyOf {
        actual: Value,
        pos: u64,
        src_path: String,
    },

    /// Value has no matching variant in the schema enum
    #[error("value {actual} is not in the enum, at pos {pos}, at {src_path}")]
    NotInEnum {
        actual: Value,
        pos: u64,
        src_path: String,
    },

    /// An arbitrary validation expression evaluated to false
    #[error("validation expression failed for value {actual}, at pos {pos}, at {src_path}")]
    ExprFailed {
        actual: Value,
        pos: u64,
        src_path: String,
    },
}

/// A scalar carried inside validation and consistency errors.
///
/// The schema language produces integers of both signs, floats, byte
/// arrays, strings and booleans; this sum keeps the reported value typed
/// instead of flattening everything to a display string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bytes(Vec<u8>),
    Str(String),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "[{}]", hex(v)),
            Value::Str(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Format a byte slice as space-separated lowercase hex pairs
pub(crate) fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_stream_display() {
        let err = StreamError::EndOfStream {
            requested: 6,
            pos: 0,
            size: 5,
        };
        assert_eq!(
            err.to_string(),
            "unexpected end of stream (requested 6 bytes at position 0, stream size 5)"
        );
    }

    #[test]
    fn test_fixed_content_display() {
        let err = StreamError::UnexpectedFixedContent {
            actual: vec![0xde, 0xad],
            expected: vec![0xbe, 0xef],
        };
        assert_eq!(
            err.to_string(),
            "unexpected fixed contents: got [de ad], expected [be ef]"
        );
    }

    #[test]
    fn test_validation_display() {
        let err = ValidationFailed::NotEqual {
            actual: Value::UInt(7),
            expected: Value::UInt(42),
            pos: 16,
            src_path: "/seq/0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "value 7 is not equal to expected 42, at pos 16, at /seq/0"
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Bytes(vec![0x01, 0xff]).to_string(), "[01 ff]");
        assert_eq!(Value::Str("abc".into()).to_string(), "\"abc\"");
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(hex(&[]), "");
        assert_eq!(hex(&[0x00]), "00");
        assert_eq!(hex(&[0x0d, 0x0a]), "0d 0a");
    }
}
