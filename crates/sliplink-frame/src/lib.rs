//! SLIP (RFC 1055) framing over byte-stream serial lines.
//!
//! Every datagram travels as `END · escape(datagram) · END`:
//! - `END` (0xC0) delimits frames
//! - `ESC` (0xDB) introduces a two-byte substitute for a reserved byte
//! - `ESC_END` (0xDC) and `ESC_ESC` (0xDD) only mean anything after `ESC`
//!
//! [`Framer`] binds one [`SerialLine`](sliplink_transport::SerialLine),
//! escapes outgoing datagrams and reassembles incoming ones however the line
//! happens to chunk them.

pub mod codec;
pub mod decoder;
pub mod error;
pub mod framer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use codec::{encode_frame, encoded_len, escape_into, unescape, END, ESC, ESC_END, ESC_ESC};
pub use decoder::{Frames, FramerConfig, SlipDecoder, DEFAULT_BUFFER_CAPACITY};
pub use error::{FrameError, Result};
pub use framer::{DatagramReceiver, DeliveryError, Framer};

#[cfg(feature = "async")]
pub use async_codec::SlipCodec;
