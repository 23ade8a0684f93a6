use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, warn};

use crate::codec::encode_frame;
use crate::decoder::{FramerConfig, SlipDecoder};
use crate::error::{FrameError, Result};

/// SLIP codec for `tokio_util::codec::Framed` and friends.
///
/// Yields one `Bytes` per datagram. Malformed frames are logged and skipped
/// instead of ending the stream, and an unterminated tail at EOF is dropped.
#[derive(Debug, Default)]
pub struct SlipCodec {
    decoder: SlipDecoder,
}

impl SlipCodec {
    /// Create a codec with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with explicit configuration.
    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            decoder: SlipDecoder::with_config(config),
        }
    }
}

impl Decoder for SlipCodec {
    type Item = Bytes;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if !src.is_empty() {
            let chunk = src.split();
            self.decoder.push(&chunk);
        }

        while let Some(frame) = self.decoder.next_frame() {
            match frame {
                Ok(datagram) => return Ok(Some(datagram)),
                Err(err) => warn!(error = %err, "discarding malformed frame"),
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        let frame = self.decode(src)?;
        if frame.is_none() && !self.decoder.pending().is_empty() {
            debug!(
                len = self.decoder.pending().len(),
                "dropping unterminated frame at EOF"
            );
            self.decoder.clear();
        }
        Ok(frame)
    }
}

impl Encoder<&[u8]> for SlipCodec {
    type Error = FrameError;

    fn encode(&mut self, datagram: &[u8], dst: &mut BytesMut) -> Result<()> {
        encode_frame(datagram, dst);
        Ok(())
    }
}

impl Encoder<Bytes> for SlipCodec {
    type Error = FrameError;

    fn encode(&mut self, datagram: Bytes, dst: &mut BytesMut) -> Result<()> {
        encode_frame(&datagram, dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use tokio_util::codec::{FramedRead, FramedWrite};

    use super::*;
    use crate::codec::{END, ESC};

    #[tokio::test]
    async fn framed_write_then_read() {
        let mut sink = FramedWrite::new(Vec::new(), SlipCodec::new());
        sink.send(Bytes::from_static(&[1, END, 2])).await.unwrap();
        sink.send(Bytes::from_static(&[ESC])).await.unwrap();
        let wire = sink.into_inner();

        let mut stream = FramedRead::new(wire.as_slice(), SlipCodec::new());
        assert_eq!(stream.next().await.unwrap().unwrap().as_ref(), [1, END, 2]);
        assert_eq!(stream.next().await.unwrap().unwrap().as_ref(), [ESC]);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn malformed_frame_does_not_end_stream() {
        let wire: &[u8] = &[END, b'a', END, END, ESC, END, END, b'b', END];
        let mut stream = FramedRead::new(wire, SlipCodec::new());

        assert_eq!(stream.next().await.unwrap().unwrap().as_ref(), b"a");
        assert_eq!(stream.next().await.unwrap().unwrap().as_ref(), b"b");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn unterminated_tail_is_dropped_at_eof() {
        let wire: &[u8] = &[END, b'o', b'k', END, b'c', b'u', b't'];
        let mut stream = FramedRead::new(wire, SlipCodec::new());

        assert_eq!(stream.next().await.unwrap().unwrap().as_ref(), b"ok");
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn slice_encoder_matches_bytes_encoder() {
        let mut codec = SlipCodec::new();
        let mut from_slice = BytesMut::new();
        let mut from_bytes = BytesMut::new();

        Encoder::<&[u8]>::encode(&mut codec, &[END, ESC], &mut from_slice).unwrap();
        Encoder::<Bytes>::encode(&mut codec, Bytes::from_static(&[END, ESC]), &mut from_bytes)
            .unwrap();

        assert_eq!(from_slice, from_bytes);
    }
}
