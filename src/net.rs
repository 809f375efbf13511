//! Small TCP helpers shared by the handlers and the connector.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// Gracefully close a stream half. Also succeeds if already closed.
pub async fn close_write_half<W: AsyncWrite + Unpin>(writer: &mut W) -> io::Result<()> {
    match writer.shutdown().await {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
        Err(err) => Err(err),
    }
}

/// Half-close semantics for a handler that has finished its side of the
/// protocol normally (spec.md §5): shut down the write half, then read for
/// the peer's own close. A handler that has already consumed every byte of
/// the protocol it understands has nothing left to receive; any further
/// bytes are a protocol violation rather than a clean disconnect.
pub async fn half_close<R, W>(reader: &mut R, writer: &mut W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    close_write_half(writer).await?;

    let mut probe = [0u8; 1];
    match reader.read(&mut probe).await {
        Ok(0) => Ok(()),
        Ok(_) => Err(crate::error::ProxyError::Framing(
            "peer sent data after the session ended".to_string(),
        )),
        Err(err) if err.kind() == io::ErrorKind::ConnectionReset => Ok(()),
        Err(err) => Err(err.into()),
    }
}
