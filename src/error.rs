//! The error taxonomy from spec.md §7.

use thiserror::Error;

/// A fatal, session-ending error.
///
/// Every variant here corresponds to one bullet in spec.md §7's taxonomy.
/// Unknown packets are *not* represented here: per §7 they are non-fatal in
/// Play (decoded as [`crate::proto::packet::Packet::Unknown`]) and only
/// become a [`ProxyError::DispatchMismatch`] in Handshaking/Status/Login,
/// where the packet sequence is prescribed.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Malformed length, malformed VarInt, unexpected EOF mid-frame, or
    /// trailing bytes after a packet payload.
    #[error("framing error: {0}")]
    Framing(String),

    /// A packet ID was recognised but did not match the type expected for
    /// the current (phase, direction, step).
    #[error("protocol error: unexpected packet in {phase:?}: {detail}")]
    DispatchMismatch { phase: crate::proto::session::Phase, detail: String },

    /// A field parsed but failed its validity assertion.
    #[error("invalid packet payload: {0}")]
    PayloadInvariant(String),

    /// Clean EOF before a required packet arrived.
    #[error("{side} disconnected before completing {phase:?}")]
    PeerDisconnected {
        side: &'static str,
        phase: crate::proto::session::Phase,
    },

    /// Upstream server connect failure, after retries were exhausted or a
    /// non-retryable OS error occurred.
    #[error("failed to connect to upstream server: {0}")]
    Connect(std::io::Error),
}

impl From<std::io::Error> for ProxyError {
    fn from(err: std::io::Error) -> Self {
        ProxyError::Framing(err.to_string())
    }
}

impl ProxyError {
    /// Build a [`ProxyError::DispatchMismatch`] from what the handler
    /// expected to see next against the packet it actually decoded.
    pub fn mismatch(
        phase: crate::proto::session::Phase,
        expected: &str,
        got: &crate::proto::packet::Packet,
    ) -> Self {
        ProxyError::DispatchMismatch {
            phase,
            detail: format!("expected {expected}, got {got}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
