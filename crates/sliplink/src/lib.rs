//! SLIP link layer over one or more serial lines.
//!
//! sliplink carries opaque datagrams over byte-oriented serial lines using
//! RFC 1055 framing, and routes them across several lines by next-hop address.
//!
//! # Crate Structure
//!
//! - [`transport`]: Serial line abstraction and reference lines
//! - [`frame`]: SLIP escaping, stream reassembly and the per-line `Framer`
//! - [`link`]: Multi-line link layer with next-hop routing
//! - [`logging`]: `tracing` subscriber bootstrap (behind `logging` feature)

/// Re-export transport types.
pub mod transport {
    pub use sliplink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use sliplink_frame::*;
}

/// Re-export link types.
pub mod link {
    pub use sliplink_link::*;
}

#[cfg(feature = "logging")]
pub mod logging;

pub use sliplink_frame::{Framer, FramerConfig};
pub use sliplink_link::{LinkError, LinkLayer};
pub use sliplink_transport::SerialLine;
