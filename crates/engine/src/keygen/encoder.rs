//! Composite key encoding
//!
//! ## Tuple format
//!
//! ```text
//! user_key = escaped(index name) value*
//! value    = TAG_NULL
//!          | TAG_FALSE | TAG_TRUE
//!          | TAG_INT    u64be(i ^ 1<<63)
//!          | TAG_FLOAT  u64be(order-flipped bits)
//!          | TAG_STRING escaped(utf8)
//!          | TAG_BYTES  escaped(bytes)
//! escaped  = bytes with 0x00 → 0x00 0xFF, then 0x00
//! ```
//!
//! Byte-wise comparison of two encoded keys from the same index matches
//! element-wise comparison of their values.

use byteorder::{BigEndian, WriteBytesExt};
use strata_core::{Index, Key, StrataError, StrataResult, Value};

const TAG_NULL: u8 = 0x00;
const TAG_BYTES: u8 = 0x01;
const TAG_STRING: u8 = 0x02;
const TAG_INT: u8 = 0x14;
const TAG_FLOAT: u8 = 0x21;
const TAG_FALSE: u8 = 0x26;
const TAG_TRUE: u8 = 0x27;

/// Turns ordered key values into a storage key
pub trait KeyEncoder: Send + Sync {
    /// Encode `values` (one per index field, in index order) for `table`
    fn encode_key(&self, table: &str, index: &Index, values: &[Value]) -> StrataResult<Key>;
}

/// Order-preserving tuple encoder for the data subspace
#[derive(Debug, Clone, Copy, Default)]
pub struct TupleKeyEncoder;

impl TupleKeyEncoder {
    /// Create the encoder
    pub fn new() -> Self {
        Self
    }
}

impl KeyEncoder for TupleKeyEncoder {
    fn encode_key(&self, table: &str, index: &Index, values: &[Value]) -> StrataResult<Key> {
        if values.len() != index.fields().len() {
            return Err(StrataError::invalid_input(format!(
                "index '{}' has {} field(s) but {} value(s) were supplied",
                index.name(),
                index.fields().len(),
                values.len()
            )));
        }

        let mut buf = Vec::with_capacity(index.name().len() + 1 + values.len() * 9);
        write_escaped(&mut buf, index.name().as_bytes());
        for value in values {
            encode_value(&mut buf, value)?;
        }
        Ok(Key::new_data(table, buf))
    }
}

fn encode_value(buf: &mut Vec<u8>, value: &Value) -> StrataResult<()> {
    match value {
        Value::Null => buf.push(TAG_NULL),
        Value::Bool(false) => buf.push(TAG_FALSE),
        Value::Bool(true) => buf.push(TAG_TRUE),
        Value::Int(i) => {
            buf.push(TAG_INT);
            buf.write_u64::<BigEndian>((*i as u64) ^ (1 << 63))
                .map_err(|e| StrataError::internal(e.to_string()))?;
        }
        Value::Float(f) => {
            buf.push(TAG_FLOAT);
            buf.write_u64::<BigEndian>(float_order_bits(*f))
                .map_err(|e| StrataError::internal(e.to_string()))?;
        }
        Value::String(s) => {
            buf.push(TAG_STRING);
            write_escaped(buf, s.as_bytes());
        }
        Value::Bytes(b) => {
            buf.push(TAG_BYTES);
            write_escaped(buf, b);
        }
    }
    Ok(())
}

// Negative floats: flip all bits. Positive: flip the sign bit.
fn float_order_bits(f: f64) -> u64 {
    let bits = f.to_bits();
    if bits & (1 << 63) != 0 {
        !bits
    } else {
        bits ^ (1 << 63)
    }
}

fn write_escaped(buf: &mut Vec<u8>, bytes: &[u8]) {
    for &b in bytes {
        buf.push(b);
        if b == 0x00 {
            buf.push(0xFF);
        }
    }
    buf.push(0x00);
}
