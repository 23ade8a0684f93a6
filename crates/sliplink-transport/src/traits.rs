use crate::error::Result;

/// Handler a serial line invokes with each raw chunk it reads.
pub type RawReceiver = Box<dyn FnMut(&[u8]) + Send>;

/// A byte-oriented, unreliable serial line.
///
/// Implementations deliver raw chunks to the registered receiver in arrival
/// order, with no guarantee about where chunk boundaries fall relative to
/// frames. Both methods take `&self`; lines are shared between the sending
/// side and the receive callback, so implementations use interior mutability.
pub trait SerialLine: Send + Sync {
    /// Write raw bytes to the line.
    fn send(&self, raw: &[u8]) -> Result<()>;

    /// Install the handler for incoming raw chunks, replacing any previous one.
    fn register_receiver(&self, receiver: RawReceiver);
}

impl<T: SerialLine + ?Sized> SerialLine for std::sync::Arc<T> {
    fn send(&self, raw: &[u8]) -> Result<()> {
        (**self).send(raw)
    }

    fn register_receiver(&self, receiver: RawReceiver) {
        (**self).register_receiver(receiver)
    }
}
