use bytes::{Buf, Bytes, BytesMut};

use crate::codec::{unescape, END, ESC};
use crate::error::{FrameError, Result};

/// Default reassembly buffer preallocation: 8 KiB.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Configuration for frame reassembly.
#[derive(Debug, Clone)]
pub struct FramerConfig {
    /// Bytes preallocated for the reassembly buffer. Default: 8 KiB.
    pub initial_buffer_capacity: usize,
    /// Upper bound on an unterminated frame. Default: unbounded.
    ///
    /// When exceeded, the partial frame is dropped and input is skipped up to
    /// the next `END`.
    pub max_pending_size: Option<usize>,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            initial_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_pending_size: None,
        }
    }
}

/// Reassembles SLIP frames from an arbitrarily chunked byte stream.
///
/// Push raw chunks in arrival order, then pull frames until `None`. After
/// such a pass the buffer holds at most one unterminated frame.
#[derive(Debug)]
pub struct SlipDecoder {
    buf: BytesMut,
    // Prefix of `buf` already known to contain no END.
    scanned: usize,
    // Skipping the tail of an oversized frame.
    discarding: bool,
    config: FramerConfig,
}

impl SlipDecoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(FramerConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.initial_buffer_capacity),
            scanned: 0,
            discarding: false,
            config,
        }
    }

    /// Append a raw chunk to the reassembly buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pull the next complete frame out of the buffer.
    ///
    /// Returns `None` once no terminated frame remains. Empty frames are
    /// skipped. A malformed frame yields `Some(Err(_))` and is consumed, so the
    /// following call moves on to the next frame.
    pub fn next_frame(&mut self) -> Option<Result<Bytes>> {
        loop {
            let Some(found) = self.buf[self.scanned..].iter().position(|&b| b == END) else {
                self.scanned = self.buf.len();
                return self.check_pending();
            };

            let body = self.buf.split_to(self.scanned + found);
            self.buf.advance(1);
            self.scanned = 0;

            if std::mem::take(&mut self.discarding) || body.is_empty() {
                continue;
            }
            if !body.contains(&ESC) {
                return Some(Ok(body.freeze()));
            }
            return Some(unescape(&body));
        }
    }

    /// Push `chunk` and iterate over every frame it completes.
    pub fn decode<'a>(&'a mut self, chunk: &[u8]) -> Frames<'a> {
        self.push(chunk);
        Frames { decoder: self }
    }

    /// Bytes of the unterminated frame currently buffered.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Drop any buffered partial frame.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.scanned = 0;
        self.discarding = false;
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    fn check_pending(&mut self) -> Option<Result<Bytes>> {
        if self.discarding {
            self.buf.clear();
            self.scanned = 0;
            return None;
        }
        let max = self.config.max_pending_size?;
        let size = self.buf.len();
        if size <= max {
            return None;
        }
        self.buf.clear();
        self.scanned = 0;
        self.discarding = true;
        Some(Err(FrameError::PendingTooLarge { size, max }))
    }
}

impl Default for SlipDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the frames completed by one [`SlipDecoder::decode`] call.
pub struct Frames<'a> {
    decoder: &'a mut SlipDecoder,
}

impl Iterator for Frames<'_> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_frame()
    }
}
