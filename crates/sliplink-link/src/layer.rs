use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use sliplink_frame::{DatagramReceiver, DeliveryError, Framer, FramerConfig};
use sliplink_transport::SerialLine;
use tracing::{debug, trace, warn};

use crate::error::{LinkError, Result};

type ConsumerSlot = Arc<Mutex<Option<DatagramReceiver>>>;

/// One logical link layer spread over several serial lines.
///
/// Each line gets its own [`Framer`], keyed by the network address of the
/// host at the far end. The address table is fixed at construction.
///
/// Datagrams decoded on any line are relayed to the single registered
/// consumer without their origin; the layer above recovers addressing from
/// the datagram itself if it needs to.
pub struct LinkLayer<L: ?Sized = dyn SerialLine> {
    links: HashMap<String, Framer<L>>,
    consumer: ConsumerSlot,
}

impl<L: SerialLine + ?Sized> LinkLayer<L> {
    /// Build a link layer from `(peer address, line)` pairs.
    ///
    /// If an address appears twice the later line wins for sending.
    pub fn new<I, A>(lines: I) -> Self
    where
        I: IntoIterator<Item = (A, Arc<L>)>,
        A: Into<String>,
    {
        Self::with_config(lines, FramerConfig::default())
    }

    /// Build a link layer applying `config` to every framer.
    pub fn with_config<I, A>(lines: I, config: FramerConfig) -> Self
    where
        I: IntoIterator<Item = (A, Arc<L>)>,
        A: Into<String>,
    {
        let consumer = ConsumerSlot::default();
        let mut links = HashMap::new();

        for (address, line) in lines {
            let address = address.into();
            let framer = Framer::with_config(line, config.clone());

            let relay = Arc::clone(&consumer);
            framer.register_consumer(move |datagram| relay_to(&relay, datagram));

            debug!(%address, "link attached");
            if links.insert(address.clone(), framer).is_some() {
                warn!(%address, "duplicate link address; previous line no longer used for sending");
            }
        }

        debug!(links = links.len(), "link layer ready");
        Self { links, consumer }
    }

    /// Install the consumer for datagrams from every line, replacing any
    /// previous one.
    ///
    /// The consumer may send through this layer, even when the line loops
    /// the reply straight back into it.
    pub fn register_consumer<F>(&self, consumer: F)
    where
        F: Fn(Bytes) -> std::result::Result<(), DeliveryError> + Send + Sync + 'static,
    {
        *lock(&self.consumer) = Some(Arc::new(consumer));
    }

    /// Send a datagram over the line that reaches `next_hop`.
    ///
    /// Fails with [`LinkError::Unreachable`] when no line is configured for
    /// `next_hop`; nothing is written in that case.
    pub fn send(&self, datagram: &[u8], next_hop: &str) -> Result<()> {
        let framer = self
            .links
            .get(next_hop)
            .ok_or_else(|| LinkError::Unreachable {
                address: next_hop.to_string(),
            })?;
        framer.send(datagram)?;
        Ok(())
    }

    /// The framer serving `address`, if any.
    pub fn link(&self, address: &str) -> Option<&Framer<L>> {
        self.links.get(address)
    }

    /// Whether a line is configured for `address`.
    pub fn contains(&self, address: &str) -> bool {
        self.links.contains_key(address)
    }

    /// Configured peer addresses, in no particular order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    /// Number of configured lines.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no lines are configured.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl<L: ?Sized> std::fmt::Debug for LinkLayer<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkLayer")
            .field("links", &self.links.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn relay_to(slot: &ConsumerSlot, datagram: Bytes) -> std::result::Result<(), DeliveryError> {
    let consumer = lock(slot).clone();
    match consumer {
        Some(consumer) => consumer(datagram),
        None => {
            trace!(len = datagram.len(), "no link consumer registered; dropping datagram");
            Ok(())
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
