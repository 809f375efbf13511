//! Stream glue: pulls exactly the bytes [`super::frame::step`] asks for and
//! writes rendered packets back out. This is the "realize as an async
//! function reading from the stream directly" option named in spec.md §9
//! for the streaming parser contract.

use std::io::{self, ErrorKind};

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::frame::{self, ParseOutcome, RawFrame};
use super::session::Session;
use super::BUF_SIZE;

/// Read one frame from `stream`, using `buf` as the accumulation buffer
/// across calls (so a caller can hold a single buffer for a connection's
/// lifetime rather than reallocating per frame).
///
/// Returns `Ok(None)` on clean EOF at a frame boundary. Returns `Err` on
/// EOF mid-frame, or on a malformed frame — both fatal per spec.md §7.
pub async fn read_frame<R: AsyncRead + Unpin>(
    session: &Session,
    buf: &mut BytesMut,
    stream: &mut R,
) -> io::Result<Option<RawFrame>> {
    loop {
        match frame::step(session, buf)? {
            ParseOutcome::Done { consumed, frame } => {
                let _ = buf.split_to(consumed);
                return Ok(Some(frame));
            }
            ParseOutcome::NeedMore(_) => {
                let had_bytes = !buf.is_empty();

                let mut tmp = [0u8; BUF_SIZE];
                let n = stream.read(&mut tmp).await?;

                if n == 0 {
                    if had_bytes {
                        return Err(io::Error::new(
                            ErrorKind::UnexpectedEof,
                            "connection closed mid-frame",
                        ));
                    }
                    return Ok(None);
                }

                buf.extend_from_slice(&tmp[..n]);
            }
        }
    }
}

/// Render `id`/`payload` to a wire frame and write it to `writer`.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    session: &Session,
    id: i32,
    payload: &[u8],
    writer: &mut W,
) -> io::Result<()> {
    let wire = frame::encode(session, id, payload)?;
    writer.write_all(&wire).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_a_frame_split_across_multiple_reads() {
        let session = Session::new();
        let wire = frame::encode(&session, 0x01, &[9, 9, 9]).unwrap();

        // Feed the bytes to the reader in two chunks to exercise NeedMore.
        let (first, second) = wire.split_at(wire.len() / 2);
        let mut stream = tokio_test_stream(vec![first.to_vec(), second.to_vec()]);

        let mut buf = BytesMut::new();
        let frame = read_frame(&session, &mut buf, &mut stream)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(frame.id, 0x01);
        assert_eq!(frame.data, vec![9, 9, 9]);
    }

    #[tokio::test]
    async fn clean_eof_at_frame_boundary_returns_none() {
        let session = Session::new();
        let mut stream = tokio_test_stream(vec![]);
        let mut buf = BytesMut::new();
        assert!(read_frame(&session, &mut buf, &mut stream)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn eof_mid_frame_is_an_error() {
        let session = Session::new();
        let wire = frame::encode(&session, 0x01, &[9, 9, 9]).unwrap();
        let mut stream = tokio_test_stream(vec![wire[..wire.len() - 1].to_vec()]);
        let mut buf = BytesMut::new();
        assert!(read_frame(&session, &mut buf, &mut stream).await.is_err());
    }

    /// A minimal `AsyncRead` that yields the given chunks in order, then EOF.
    struct ChunkStream {
        chunks: std::collections::VecDeque<Vec<u8>>,
    }

    fn tokio_test_stream(chunks: Vec<Vec<u8>>) -> ChunkStream {
        ChunkStream {
            chunks: chunks.into(),
        }
    }

    impl AsyncRead for ChunkStream {
        fn poll_read(
            mut self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<io::Result<()>> {
            if let Some(chunk) = self.chunks.pop_front() {
                buf.put_slice(&chunk);
            }
            std::task::Poll::Ready(Ok(()))
        }
    }
}
