use sliplink_transport::TransportError;

/// Errors that can occur when sending through the link layer.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// No serial line is configured for the next-hop address.
    #[error("destination unreachable: no link to {address}")]
    Unreachable { address: String },

    /// The serial line failed to write the frame.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, LinkError>;
