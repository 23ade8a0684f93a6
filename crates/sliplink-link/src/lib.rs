//! Link layer over several SLIP serial lines.
//!
//! [`LinkLayer`] owns one [`Framer`](sliplink_frame::Framer) per peer
//! address. Outbound datagrams are routed by next-hop address; inbound
//! datagrams from every line are funnelled into one consumer.

pub mod error;
pub mod layer;

pub use error::{LinkError, Result};
pub use layer::LinkLayer;
