//! Login phase packets.
//!
//! Encryption is out of scope (spec.md §1 Non-goals): `EncryptionRequest`
//! is recognised only so the session can terminate cleanly rather than
//! stalling, per the Open Question resolution in spec.md §9.

use std::io;

use uuid::Uuid;

use crate::proto::types::{Reader, Writer};

/// `LoginStart` (ServerBound, ID 0x00).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginStart {
    pub name: String,
}

impl LoginStart {
    pub const ID: i32 = 0x00;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let name = r.string()?;
        r.finish()?;
        Ok(Self { name })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_string(&self.name);
        buf
    }
}

/// `EncryptionRequest` (ClientBound, ID 0x01).
///
/// Recognised only by ID so the session can terminate cleanly; fields are
/// not parsed since the proxy never negotiates encryption.
#[derive(Debug, Clone)]
pub struct EncryptionRequest {
    pub raw: Vec<u8>,
}

impl EncryptionRequest {
    pub const ID: i32 = 0x01;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        Ok(Self {
            raw: payload.to_vec(),
        })
    }

    pub fn render(&self) -> Vec<u8> {
        self.raw.clone()
    }
}

/// `LoginSuccess` (ClientBound, ID 0x02).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub uuid: Uuid,
    pub name: String,
    /// Tail bytes (property array in later protocol revisions) relayed
    /// verbatim without interpretation.
    pub raw_tail: Vec<u8>,
}

impl LoginSuccess {
    pub const ID: i32 = 0x02;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let uuid = r.uuid()?;
        let name = r.string()?;
        let raw_tail = r.raw_tail();
        Ok(Self {
            uuid,
            name,
            raw_tail,
        })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_uuid(&self.uuid);
        buf.write_string(&self.name);
        buf.write_raw(&self.raw_tail);
        buf
    }
}

/// `SetCompression` (ClientBound, ID 0x03).
///
/// Absorbed by `ServerHandler`, never forwarded to the client — see
/// spec.md §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetCompression {
    pub threshold: i32,
}

impl SetCompression {
    pub const ID: i32 = 0x03;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let threshold = r.var_int()?;
        r.finish()?;
        Ok(Self { threshold })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_var_int(self.threshold);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_start_round_trip() {
        let login = LoginStart {
            name: "Notch".to_string(),
        };
        let encoded = login.render();
        let decoded = LoginStart::parse(&encoded).unwrap();
        assert_eq!(decoded, login);
    }

    #[test]
    fn login_success_round_trip_with_tail() {
        let success = LoginSuccess {
            uuid: Uuid::from_u128(1),
            name: "Notch".to_string(),
            raw_tail: vec![0x00],
        };
        let encoded = success.render();
        let decoded = LoginSuccess::parse(&encoded).unwrap();
        assert_eq!(decoded, success);
    }

    #[test]
    fn set_compression_round_trip() {
        let packet = SetCompression { threshold: 256 };
        let encoded = packet.render();
        let decoded = SetCompression::parse(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }
}
