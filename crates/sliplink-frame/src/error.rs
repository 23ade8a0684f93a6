/// Errors that can occur while decoding SLIP frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame body ends with an escape byte.
    #[error("dangling escape byte at end of frame")]
    DanglingEscape,

    /// An escape byte is followed by something other than ESC_END or ESC_ESC.
    #[error("invalid escape sequence 0xDB 0x{byte:02X} at offset {offset}")]
    InvalidEscape { byte: u8, offset: usize },

    /// An unterminated frame outgrew the configured reassembly limit.
    #[error("pending frame too large ({size} bytes, max {max})")]
    PendingTooLarge { size: usize, max: usize },

    /// An I/O error occurred beneath an async codec.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
