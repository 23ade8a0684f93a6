/// Errors that can occur on a serial line.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the line (a write accepted zero bytes).
    #[error("serial line closed")]
    Closed,

    /// A failure injected by a test double.
    #[error("injected transport failure: {0}")]
    Injected(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
