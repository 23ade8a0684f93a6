//! Two hosts joined by a simulated serial cable, pinging each other over SLIP.
//!
//! Run with:
//!   cargo run --example serial-bridge --features logging

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::Shutdown;
    use std::os::unix::net::UnixStream;
    use std::sync::{mpsc, Arc};
    use std::time::Duration;

    use sliplink::logging::{init_logging, LogFormat, LogLevel};
    use sliplink::transport::StreamLine;
    use sliplink::LinkLayer;

    init_logging(LogFormat::Text, LogLevel::Debug);

    let (cable_a, cable_b) = UnixStream::pair()?;
    let line_a = Arc::new(StreamLine::new(cable_a.try_clone()?));
    let line_b = Arc::new(StreamLine::new(cable_b.try_clone()?));

    let host_a = LinkLayer::new([("10.0.0.2", Arc::clone(&line_a))]);
    let host_b = Arc::new(LinkLayer::new([("10.0.0.1", Arc::clone(&line_b))]));

    // Host B echoes everything back to host A.
    let echo = Arc::clone(&host_b);
    host_b.register_consumer(move |datagram| {
        eprintln!("host B received {} bytes: {:?}", datagram.len(), datagram);
        echo.send(&datagram, "10.0.0.1")?;
        Ok(())
    });

    let (tx, rx) = mpsc::channel();
    host_a.register_consumer(move |datagram| {
        tx.send(datagram)?;
        Ok(())
    });

    let pump_a = {
        let line = Arc::clone(&line_a);
        let reader = cable_a.try_clone()?;
        std::thread::spawn(move || line.pump(reader))
    };
    let pump_b = {
        let line = Arc::clone(&line_b);
        let reader = cable_b.try_clone()?;
        std::thread::spawn(move || line.pump(reader))
    };

    // Payload deliberately contains END and ESC bytes.
    let ping = [0x45, 0x00, 0xC0, 0xDB, 0xDC, 0xDD];
    host_a.send(&ping, "10.0.0.2")?;

    let reply = rx.recv_timeout(Duration::from_secs(2))?;
    eprintln!("host A received echo: {:?}", reply);
    assert_eq!(reply.as_ref(), ping);

    match host_a.send(&ping, "10.0.0.99") {
        Err(err) => eprintln!("expected failure: {err}"),
        Ok(()) => eprintln!("unexpected success"),
    }

    cable_a.shutdown(Shutdown::Both)?;
    let _ = pump_a.join();
    let _ = pump_b.join();
    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("serial-bridge requires Unix socket pairs");
}
