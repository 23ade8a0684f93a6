//! Links whose `send` hands bytes straight to the far end's receiver, on the
//! calling thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use sliplink::transport::{RawReceiver, SerialLine};
use sliplink::LinkLayer;

#[derive(Default)]
struct WireEnd {
    receiver: Mutex<Option<RawReceiver>>,
    peer: OnceLock<Weak<WireEnd>>,
}

impl SerialLine for WireEnd {
    fn send(&self, raw: &[u8]) -> sliplink::transport::Result<()> {
        let Some(peer) = self.peer.get().and_then(Weak::upgrade) else {
            return Err(sliplink::transport::TransportError::Closed);
        };
        if let Some(receiver) = peer.receiver.lock().unwrap().as_mut() {
            receiver(raw);
        }
        Ok(())
    }

    fn register_receiver(&self, receiver: RawReceiver) {
        *self.receiver.lock().unwrap() = Some(receiver);
    }
}

fn wire() -> (Arc<WireEnd>, Arc<WireEnd>) {
    let a = Arc::new(WireEnd::default());
    let b = Arc::new(WireEnd::default());
    a.peer.set(Arc::downgrade(&b)).unwrap();
    b.peer.set(Arc::downgrade(&a)).unwrap();
    (a, b)
}

#[test]
fn router_forwards_echo_reply_within_one_call() {
    // host --(h/r)-- router --(e/r)-- echo
    let (host_end, router_h) = wire();
    let (router_e, echo_end) = wire();

    let host = LinkLayer::new([("router", Arc::clone(&host_end))]);
    let router = Arc::new(LinkLayer::new([
        ("host", Arc::clone(&router_h)),
        ("echo", Arc::clone(&router_e)),
    ]));
    let echo = Arc::new(LinkLayer::new([("router", Arc::clone(&echo_end))]));

    let forward = Arc::clone(&router);
    router.register_consumer(move |datagram: Bytes| {
        let next_hop = if datagram.as_ref() == b"ping" { "echo" } else { "host" };
        forward.send(&datagram, next_hop)?;
        Ok(())
    });

    let reply = Arc::clone(&echo);
    echo.register_consumer(move |datagram: Bytes| {
        if datagram.as_ref() == b"ping" {
            reply.send(b"pong", "router")?;
        }
        Ok(())
    });

    let (tx, rx) = mpsc::channel();
    host.register_consumer(move |datagram| {
        tx.send(datagram)?;
        Ok(())
    });

    let sender = thread::spawn(move || host.send(b"ping", "router").map_err(|e| e.to_string()));

    let got = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("reply did not come back through the router");
    assert_eq!(got.as_ref(), b"pong");
    assert_eq!(sender.join().unwrap(), Ok(()));
}

#[test]
fn consumer_may_reregister_while_bytes_loop_back() {
    let (left, right) = wire();
    let a = Arc::new(LinkLayer::new([("b", Arc::clone(&left))]));
    let b = Arc::new(LinkLayer::new([("a", Arc::clone(&right))]));

    let bounce = Arc::clone(&b);
    b.register_consumer(move |datagram: Bytes| {
        bounce.send(&datagram, "a")?;
        Ok(())
    });

    let seen = Arc::new(Mutex::new(Vec::new()));
    let this = Arc::clone(&a);
    let sink = Arc::clone(&seen);
    a.register_consumer(move |datagram: Bytes| {
        sink.lock().unwrap().push(datagram);
        let sink = Arc::clone(&sink);
        this.register_consumer(move |_| {
            sink.lock().unwrap().push(Bytes::from_static(b"second"));
            Ok(())
        });
        Ok(())
    });

    a.send(b"one", "b").unwrap();
    a.send(b"two", "b").unwrap();

    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [Bytes::from_static(b"one"), Bytes::from_static(b"second")]
    );
}
