//! Self-identifying payload compression.
//!
//! A transmitted payload carries one leading marker byte so the
//! receiver can detect compression without out-of-band configuration:
//!
//! ```text
//! [1 byte] marker: 0x00 raw, 0x01 zlib
//! [payload bytes, possibly zlib-compressed]
//! ```

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use vigil_core::TransportError;

/// Marker byte for an uncompressed payload.
pub const MARKER_RAW: u8 = 0x00;
/// Marker byte for a zlib-compressed payload.
pub const MARKER_ZLIB: u8 = 0x01;

/// Wrap an encoded message for transmission, compressing if asked.
pub fn encode_payload(message: &[u8], compress: bool) -> Result<Vec<u8>, TransportError> {
    if !compress {
        let mut out = Vec::with_capacity(message.len() + 1);
        out.push(MARKER_RAW);
        out.extend_from_slice(message);
        return Ok(out);
    }

    let mut encoder = ZlibEncoder::new(vec![MARKER_ZLIB], Compression::default());
    encoder
        .write_all(message)
        .and_then(|()| encoder.finish())
        .map_err(|e| TransportError::Compression {
            reason: e.to_string(),
        })
}

/// Unwrap a received payload, decompressing if its marker says so.
pub fn decode_payload(payload: &[u8]) -> Result<Vec<u8>, TransportError> {
    let (&marker, body) = payload.split_first().ok_or(TransportError::Compression {
        reason: "empty payload".into(),
    })?;
    match marker {
        MARKER_RAW => Ok(body.to_vec()),
        MARKER_ZLIB => {
            let mut out = Vec::with_capacity(body.len() * 4);
            ZlibDecoder::new(body)
                .read_to_end(&mut out)
                .map_err(|e| TransportError::Compression {
                    reason: e.to_string(),
                })?;
            Ok(out)
        }
        other => Err(TransportError::UnknownMarker { marker: other }),
    }
}
