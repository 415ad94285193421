//! Newline-delimited JSON codec
//!
//! Every message is one JSON object terminated by `\n`:
//! ```text
//! {"type":"arm","enabled":true}\n
//! ```
//!
//! Decoding never panics. Any malformed, truncated or oversized line is a
//! [`CodecError`], which the executor reports as `invalid_json`.

use bytes::{BufMut, Bytes, BytesMut};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::limits::MAX_LINE_LENGTH;
use crate::messages::{CommandRequest, ErrorKind, Inbound, Outbound};

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Line too long: {0} bytes (max: {MAX_LINE_LENGTH})")]
    LineTooLong(usize),

    #[error("Line is not valid UTF-8")]
    InvalidUtf8,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message is not a JSON object")]
    NotAnObject,

    #[error("Message has no type field")]
    MissingType,
}

impl CodecError {
    /// Wire error reported for this failure
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidJson
    }
}

/// Decode one line of text into an inbound message
pub fn decode_line(line: &str) -> Result<Inbound, CodecError> {
    if line.len() > MAX_LINE_LENGTH {
        return Err(CodecError::LineTooLong(line.len()));
    }

    let object = match serde_json::from_str::<Value>(line)? {
        Value::Object(map) => map,
        _ => return Err(CodecError::NotAnObject),
    };

    let is_arm = match object.get("type") {
        Some(msg_type) => msg_type.as_str() == Some("arm"),
        None => return Err(CodecError::MissingType),
    };

    if is_arm {
        let enabled = object
            .get("enabled")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        return Ok(Inbound::Arm { enabled });
    }

    decode_command(object)
}

/// Decode raw line bytes (without the trailing newline)
pub fn decode_bytes(line: &[u8]) -> Result<Inbound, CodecError> {
    if line.len() > MAX_LINE_LENGTH {
        return Err(CodecError::LineTooLong(line.len()));
    }
    let text = std::str::from_utf8(line).map_err(|_| CodecError::InvalidUtf8)?;
    decode_line(text)
}

fn decode_command(object: Map<String, Value>) -> Result<Inbound, CodecError> {
    let request: CommandRequest = serde_json::from_value(Value::Object(object))?;
    Ok(Inbound::Command(request))
}

/// Encode an outbound message as a single newline-terminated line
pub fn encode(message: &Outbound) -> Result<Bytes, CodecError> {
    let mut buf = BytesMut::with_capacity(128).writer();
    serde_json::to_writer(&mut buf, message)?;
    let mut buf = buf.into_inner();
    buf.put_u8(b'\n');
    Ok(buf.freeze())
}

/// A unit produced by [`LineDecoder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A complete non-empty line, newline and trailing `\r` removed
    Complete(Bytes),
    /// A line that exceeded the limit; its bytes were dropped
    Oversized(usize),
}

/// Decoder state machine for streaming line framing
#[derive(Debug)]
pub struct LineDecoder {
    buffer: BytesMut,
    max_len: usize,
    /// Set while dropping the tail of an oversized line
    discarding: bool,
    discarded: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    /// Create a decoder with the default line limit
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LENGTH)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(1024),
            max_len,
            discarding: false,
            discarded: 0,
        }
    }

    /// Add data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to take the next line from the buffer
    ///
    /// Call this repeatedly until it returns `None` to drain all complete lines.
    /// Empty lines are skipped.
    pub fn decode_next(&mut self) -> Option<Line> {
        loop {
            let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') else {
                if self.buffer.len() > self.max_len {
                    self.discarding = true;
                    self.discarded += self.buffer.len();
                    self.buffer.clear();
                }
                return None;
            };

            let mut line = self.buffer.split_to(pos + 1);
            line.truncate(pos);

            if self.discarding {
                let total = self.discarded + line.len();
                self.discarding = false;
                self.discarded = 0;
                return Some(Line::Oversized(total));
            }

            if line.last() == Some(&b'\r') {
                line.truncate(line.len() - 1);
            }
            if line.is_empty() {
                continue;
            }
            if line.len() > self.max_len {
                return Some(Line::Oversized(line.len()));
            }
            return Some(Line::Complete(line.freeze()));
        }
    }

    /// Get the current buffer length (for debugging)
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any partial line, e.g. after the stream reconnects
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
        self.discarded = 0;
    }
}
