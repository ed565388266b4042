//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! Both directions use the same frame shape:
//!
//! ```text
//! ┌─────────────────┬─────────────────────────────┐
//! │ Length (4, LE)  │       Payload (bincode)     │
//! └─────────────────┴─────────────────────────────┘
//! ```
//!
//! The payload is a bincode-encoded [`Request`] (client → host) or
//! [`Reply`] (host → client). There are no other transport-level headers.

use std::io::{Read, Write};

use bytes::BufMut;

use super::{Reply, Request};
use crate::error::{BridgeError, Result};

/// Length prefix size: 4-byte little-endian unsigned payload length
pub const LEN_PREFIX_SIZE: usize = 4;

/// Default maximum payload size (8 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 8 * 1024 * 1024;

// =============================================================================
// Payload Encoding/Decoding
// =============================================================================

/// Encode a request to payload bytes
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    Ok(bincode::serialize(request)?)
}

/// Decode a request from payload bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    Ok(bincode::deserialize(bytes)?)
}

/// Encode a reply to payload bytes
pub fn encode_reply(reply: &Reply) -> Result<Vec<u8>> {
    Ok(bincode::serialize(reply)?)
}

/// Decode a reply from payload bytes
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    Ok(bincode::deserialize(bytes)?)
}

// =============================================================================
// Frame I/O
// =============================================================================

/// Read one length-prefixed frame payload from a stream
///
/// Blocks until the full frame is received or an error occurs. Partial reads
/// are absorbed by `read_exact`; a stream that closes mid-frame surfaces as
/// an `UnexpectedEof` I/O error.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut len_bytes = [0u8; LEN_PREFIX_SIZE];
    reader.read_exact(&mut len_bytes)?;

    let len = u32::from_le_bytes(len_bytes);
    if len > MAX_PAYLOAD_SIZE {
        return Err(BridgeError::FrameTooLarge {
            len,
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut payload = vec![0u8; len as usize];
    if len > 0 {
        reader.read_exact(&mut payload)?;
    }

    Ok(payload)
}

/// Write one length-prefixed frame to a stream
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_PAYLOAD_SIZE as usize {
        return Err(BridgeError::FrameTooLarge {
            len: payload.len() as u32,
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(LEN_PREFIX_SIZE + payload.len());
    frame.put_u32_le(payload.len() as u32);
    frame.put_slice(payload);

    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Stream-based message helpers
// =============================================================================

/// Read a complete request from a stream
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let payload = read_frame(reader)?;
    decode_request(&payload)
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let payload = encode_request(request)?;
    write_frame(writer, &payload)
}

/// Read a complete reply from a stream
pub fn read_reply<R: Read>(reader: &mut R) -> Result<Reply> {
    let payload = read_frame(reader)?;
    decode_reply(&payload)
}

/// Write a reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    let payload = encode_reply(reply)?;
    write_frame(writer, &payload)
}
