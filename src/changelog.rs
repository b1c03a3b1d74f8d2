//! Parsing of `<OP>;<json>` changelog lines.

use std::io::{self, BufRead};

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A JSON object with its keys in insertion order.
pub type Fields = Map<String, Value>;

/// Operation named at the start of a changelog line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOp {
    /// Append a new live record.
    Insert,
    /// Merge fields into the first live record with the same ISBN.
    Patch,
    /// Soft-delete the first live record with the same ISBN.
    Delete,
    /// Any other operation name. Parsed, then ignored.
    Other(String),
}

impl From<&str> for ChangeOp {
    fn from(op: &str) -> Self {
        match op {
            "INSERT" => ChangeOp::Insert,
            "PATCH" => ChangeOp::Patch,
            "DELETE" => ChangeOp::Delete,
            other => ChangeOp::Other(other.to_string()),
        }
    }
}

/// One parsed changelog line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    /// What to do.
    pub op: ChangeOp,
    /// The record payload.
    pub fields: Fields,
}

/// Raw lines of `reader` without their `\n` or `\r\n` terminator.
///
/// Lines are not decoded here, so one bad line cannot end the iteration.
pub(crate) fn raw_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<Vec<u8>>> {
    reader.split(b'\n').map(|line| {
        line.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            bytes
        })
    })
}

/// Decode one raw line.
///
/// # Errors
/// `InvalidUtf8` if the bytes are not UTF-8.
pub(crate) fn decode_line(bytes: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(bytes)?)
}

/// Split a line at its first `;` into a tag and a JSON object.
///
/// Returns `Ok(None)` for lines without a separator.
pub(crate) fn split_tagged(line: &str) -> Result<Option<(&str, Fields)>> {
    let Some((tag, data)) = line.split_once(';') else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(data)? {
        Value::Object(fields) => Ok(Some((tag, fields))),
        other => Err(Error::MalformedRecord(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Parse a single changelog line.
///
/// Lines without a `;` are not entries and yield `Ok(None)`.
///
/// # Errors
/// `Json` if the payload does not parse, `MalformedRecord` if it is not an
/// object.
pub fn parse_line(line: &str) -> Result<Option<ChangeEntry>> {
    Ok(split_tagged(line)?.map(|(op, fields)| ChangeEntry {
        op: ChangeOp::from(op),
        fields,
    }))
}
