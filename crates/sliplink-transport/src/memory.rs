use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::error::{Result, TransportError};
use crate::traits::{RawReceiver, SerialLine};

/// In-memory serial line.
///
/// Every `send` is recorded as one write; [`MemoryLine::inject`] plays raw
/// chunks into the registered receiver as if they had been read from a wire.
/// Useful for wiring framers together in tests and simulations.
#[derive(Default)]
pub struct MemoryLine {
    writes: Mutex<Vec<Vec<u8>>>,
    receiver: Mutex<Option<RawReceiver>>,
    fail_next: Mutex<Option<String>>,
}

impl MemoryLine {
    /// Create an empty line with no receiver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a raw chunk to the registered receiver.
    ///
    /// Returns `false` when no receiver is installed and the chunk was dropped.
    pub fn inject(&self, chunk: &[u8]) -> bool {
        match lock(&self.receiver).as_mut() {
            Some(receiver) => {
                receiver(chunk);
                true
            }
            None => {
                trace!(len = chunk.len(), "no receiver on memory line; dropping chunk");
                false
            }
        }
    }

    /// Make the next `send` fail with [`TransportError::Injected`].
    pub fn fail_next_send(&self, message: impl Into<String>) {
        *lock(&self.fail_next) = Some(message.into());
    }

    /// Snapshot of every successful write, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        lock(&self.writes).clone()
    }

    /// Drain and return the recorded writes.
    pub fn take_writes(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut *lock(&self.writes))
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        lock(&self.writes).len()
    }

    /// Whether a receiver has been registered.
    pub fn has_receiver(&self) -> bool {
        lock(&self.receiver).is_some()
    }
}

impl SerialLine for MemoryLine {
    fn send(&self, raw: &[u8]) -> Result<()> {
        if let Some(message) = lock(&self.fail_next).take() {
            return Err(TransportError::Injected(message));
        }
        lock(&self.writes).push(raw.to_vec());
        Ok(())
    }

    fn register_receiver(&self, receiver: RawReceiver) {
        *lock(&self.receiver) = Some(receiver);
    }
}

impl std::fmt::Debug for MemoryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryLine")
            .field("writes", &self.write_count())
            .field("has_receiver", &self.has_receiver())
            .finish()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
