use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::{Bytes, BytesMut};
use sliplink_transport::SerialLine;
use tracing::{debug, trace, warn};

use crate::codec::{encode_frame, encoded_len};
use crate::decoder::{FramerConfig, SlipDecoder};

/// Error a consumer returns to reject a datagram.
pub type DeliveryError = Box<dyn std::error::Error + Send + Sync>;

/// Consumer invoked once per reassembled datagram.
///
/// Runs with no framer lock held.
pub type DatagramReceiver =
    Arc<dyn Fn(Bytes) -> std::result::Result<(), DeliveryError> + Send + Sync>;

/// SLIP endpoint bound to one serial line.
///
/// Construction installs the framer as the line's raw receiver. From then on
/// every chunk the line reads goes through the framer's reassembly buffer and
/// each completed datagram is handed to the registered consumer.
///
/// A frame that fails to unescape, or that the consumer rejects, is logged
/// and dropped on its own; the frames around it are unaffected.
pub struct Framer<L: ?Sized> {
    shared: Arc<Shared>,
    line: Arc<L>,
}

struct Shared {
    decoder: Mutex<SlipDecoder>,
    receiver: Mutex<Option<DatagramReceiver>>,
}

impl<L: SerialLine + ?Sized> Framer<L> {
    /// Attach a framer with default configuration to `line`.
    pub fn new(line: Arc<L>) -> Self {
        Self::with_config(line, FramerConfig::default())
    }

    /// Attach a framer with explicit configuration to `line`.
    pub fn with_config(line: Arc<L>, config: FramerConfig) -> Self {
        let shared = Arc::new(Shared {
            decoder: Mutex::new(SlipDecoder::with_config(config)),
            receiver: Mutex::new(None),
        });

        let handler = Arc::clone(&shared);
        line.register_receiver(Box::new(move |chunk: &[u8]| handler.on_raw_bytes(chunk)));
        debug!("framer attached to serial line");

        Self { shared, line }
    }

    /// Escape, delimit and write one datagram to the line.
    ///
    /// The frame goes out in a single `send` call. Line errors are returned
    /// as-is.
    pub fn send(&self, datagram: &[u8]) -> sliplink_transport::Result<()> {
        let mut frame = BytesMut::with_capacity(encoded_len(datagram));
        encode_frame(datagram, &mut frame);
        trace!(datagram = datagram.len(), wire = frame.len(), "sending frame");
        self.line.send(&frame)
    }

    /// Install the consumer for decoded datagrams, replacing any previous one.
    pub fn register_consumer<F>(&self, consumer: F)
    where
        F: Fn(Bytes) -> std::result::Result<(), DeliveryError> + Send + Sync + 'static,
    {
        *lock(&self.shared.receiver) = Some(Arc::new(consumer));
    }

    /// Feed raw bytes as if the line had just read them.
    pub fn on_raw_bytes(&self, chunk: &[u8]) {
        self.shared.on_raw_bytes(chunk);
    }

    /// Number of bytes buffered for the current unterminated frame.
    pub fn pending_len(&self) -> usize {
        lock(&self.shared.decoder).pending().len()
    }

    /// The serial line this framer writes to.
    pub fn line(&self) -> &Arc<L> {
        &self.line
    }
}

impl Shared {
    fn on_raw_bytes(&self, chunk: &[u8]) {
        let mut complete = Vec::new();
        {
            let mut decoder = lock(&self.decoder);
            decoder.push(chunk);
            while let Some(frame) = decoder.next_frame() {
                match frame {
                    Ok(datagram) => complete.push(datagram),
                    Err(err) => warn!(error = %err, "discarding malformed frame"),
                }
            }
        }

        for datagram in complete {
            self.deliver(datagram);
        }
    }

    fn deliver(&self, datagram: Bytes) {
        let len = datagram.len();
        let consumer = lock(&self.receiver).clone();
        match consumer {
            Some(consumer) => {
                trace!(len, "delivering datagram");
                if let Err(err) = consumer(datagram) {
                    warn!(len, error = %err, "consumer rejected datagram; frame discarded");
                }
            }
            None => trace!(len, "no consumer registered; dropping datagram"),
        }
    }
}

impl<L: ?Sized> std::fmt::Debug for Framer<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framer")
            .field("pending", &lock(&self.shared.decoder).pending().len())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
