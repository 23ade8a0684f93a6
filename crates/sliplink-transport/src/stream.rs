use std::io::{ErrorKind, Read, Write};
use std::sync::Mutex;

use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::memory::lock;
use crate::traits::{RawReceiver, SerialLine};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Serial line over any blocking `Write` half, with a read pump for the
/// matching `Read` half.
///
/// Wraps a serial device, a pty master, or one end of a socket pair. Writes
/// are serialized through an internal lock so a whole frame lands on the wire
/// contiguously.
pub struct StreamLine<W> {
    writer: Mutex<W>,
    receiver: Mutex<Option<RawReceiver>>,
}

impl<W: Write + Send> StreamLine<W> {
    /// Create a line writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            receiver: Mutex::new(None),
        }
    }

    /// Read from `reader` until EOF, handing every chunk to the receiver.
    ///
    /// Blocks the calling thread. Returns the number of bytes read. Chunks
    /// read while no receiver is registered are dropped.
    pub fn pump<R: Read>(&self, mut reader: R) -> Result<u64> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let read = match reader.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            };

            if read == 0 {
                debug!(total, "serial line reached EOF");
                return Ok(total);
            }
            total += read as u64;

            match lock(&self.receiver).as_mut() {
                Some(receiver) => receiver(&chunk[..read]),
                None => trace!(len = read, "no receiver on stream line; dropping chunk"),
            }
        }
    }

    /// Consume the line and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> SerialLine for StreamLine<W> {
    fn send(&self, raw: &[u8]) -> Result<()> {
        let mut writer = lock(&self.writer);

        let mut offset = 0usize;
        while offset < raw.len() {
            match writer.write(&raw[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        loop {
            match writer.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn register_receiver(&self, receiver: RawReceiver) {
        *lock(&self.receiver) = Some(receiver);
    }
}

impl<W> std::fmt::Debug for StreamLine<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamLine").finish_non_exhaustive()
    }
}
