use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame delimiter.
pub const END: u8 = 0xC0;

/// Escape marker.
pub const ESC: u8 = 0xDB;

/// Follows [`ESC`] to stand for a literal [`END`] in the payload.
pub const ESC_END: u8 = 0xDC;

/// Follows [`ESC`] to stand for a literal [`ESC`] in the payload.
pub const ESC_ESC: u8 = 0xDD;

/// Wire size of `datagram` once escaped and wrapped in delimiters.
pub fn encoded_len(datagram: &[u8]) -> usize {
    let reserved = datagram.iter().filter(|&&b| b == END || b == ESC).count();
    datagram.len() + reserved + 2
}

/// Append the escaped form of `payload` to `dst`, without delimiters.
///
/// `ESC` becomes `ESC ESC_ESC` and `END` becomes `ESC ESC_END`. Each input
/// byte is visited once, so inserted escape markers are never escaped again.
pub fn escape_into(payload: &[u8], dst: &mut BytesMut) {
    let mut rest = payload;
    while let Some(pos) = rest.iter().position(|&b| b == END || b == ESC) {
        dst.put_slice(&rest[..pos]);
        let substitute = if rest[pos] == END { ESC_END } else { ESC_ESC };
        dst.put_slice(&[ESC, substitute]);
        rest = &rest[pos + 1..];
    }
    dst.put_slice(rest);
}

/// Encode a datagram into a SLIP frame.
///
/// Wire format:
/// ```text
/// ┌──────┬─────────────────────┬──────┐
/// │ END  │ escape(datagram)    │ END  │
/// │ 0xC0 │ 0xC0 → 0xDB 0xDC    │ 0xC0 │
/// │      │ 0xDB → 0xDB 0xDD    │      │
/// └──────┴─────────────────────┴──────┘
/// ```
///
/// The leading `END` flushes any line noise the receiver may have buffered.
/// Datagrams of any length, including zero, are accepted.
pub fn encode_frame(datagram: &[u8], dst: &mut BytesMut) {
    dst.reserve(encoded_len(datagram));
    dst.put_u8(END);
    escape_into(datagram, dst);
    dst.put_u8(END);
}

/// Reverse [`escape_into`] on one frame body (the bytes between two `END`s).
///
/// `ESC ESC_END` yields `END` and `ESC ESC_ESC` yields `ESC`. `ESC_END` and
/// `ESC_ESC` bytes not preceded by `ESC` are ordinary payload. An `ESC` that
/// ends the body, or is followed by any other byte, makes the frame malformed.
pub fn unescape(body: &[u8]) -> Result<Bytes> {
    let mut out = BytesMut::with_capacity(body.len());
    let mut rest = body;
    let mut offset = 0usize;
    while let Some(pos) = rest.iter().position(|&b| b == ESC) {
        out.put_slice(&rest[..pos]);
        let literal = match rest.get(pos + 1) {
            Some(&ESC_END) => END,
            Some(&ESC_ESC) => ESC,
            Some(&byte) => {
                return Err(FrameError::InvalidEscape {
                    byte,
                    offset: offset + pos,
                })
            }
            None => return Err(FrameError::DanglingEscape),
        };
        out.put_u8(literal);
        rest = &rest[pos + 2..];
        offset += pos + 2;
    }
    out.put_slice(rest);
    Ok(out.freeze())
}
