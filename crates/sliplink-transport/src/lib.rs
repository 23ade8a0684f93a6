//! Serial line abstraction for SLIP framing.
//!
//! A serial line is anything that can write raw bytes and call back with raw
//! bytes as they arrive: a pseudo-terminal, a UART, a socket. Chunk
//! boundaries carry no meaning; reassembling frames is the job of the layer
//! above.
//!
//! This is the lowest layer of sliplink. Everything else builds on the
//! [`SerialLine`] trait provided here.

pub mod error;
pub mod memory;
pub mod stream;
pub mod traits;

pub use error::{Result, TransportError};
pub use memory::MemoryLine;
pub use stream::StreamLine;
pub use traits::{RawReceiver, SerialLine};
