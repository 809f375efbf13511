//! Handshaking phase packets. ServerBound only — no ClientBound packets
//! exist in this phase.

use std::io;

use crate::proto::session::PROTOCOL_VERSION;
use crate::proto::types::{Reader, Writer};

/// `Handshake` (ServerBound, ID 0x00).
///
/// The first packet of every connection. Selects whether the session
/// continues into Status or Login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol: i32,
    pub address: String,
    pub port: u16,
    pub next_state: u8,
}

impl Handshake {
    pub const ID: i32 = 0x00;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let protocol = r.var_int()?;
        let address = r.string()?;
        let port = r.u16_be()?;
        let next_state = r.u8()?;
        r.finish()?;

        if next_state != 1 && next_state != 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid next_state {next_state}, expected 1 or 2"),
            ));
        }

        Ok(Self {
            protocol,
            address,
            port,
            next_state,
        })
    }

    /// Assert the protocol version matches the one this proxy dissects.
    pub fn assert_supported_protocol(&self) -> io::Result<()> {
        if self.protocol != PROTOCOL_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "unsupported protocol version {} (expected {})",
                    self.protocol, PROTOCOL_VERSION
                ),
            ));
        }
        Ok(())
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_var_int(self.protocol);
        buf.write_string(&self.address);
        buf.write_u16_be(self.port);
        buf.write_u8(self.next_state);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_spec_example() {
        let bytes = [
            0x00, 0xF5, 0x05, 0x09, 0x6C, 0x6F, 0x63, 0x61, 0x6C, 0x68, 0x6F, 0x73, 0x74, 0x63,
            0xDD, 0x02,
        ];
        // Strip the packet ID byte (0x00) the same way the frame codec would.
        let handshake = Handshake::parse(&bytes[1..]).unwrap();
        assert_eq!(handshake.protocol, 757);
        assert_eq!(handshake.address, "localhost");
        assert_eq!(handshake.port, 25565);
        assert_eq!(handshake.next_state, 2);
    }

    #[test]
    fn render_is_inverse_of_parse() {
        let bytes = [
            0x00, 0xF5, 0x05, 0x09, 0x6C, 0x6F, 0x63, 0x61, 0x6C, 0x68, 0x6F, 0x73, 0x74, 0x63,
            0xDD, 0x02,
        ];
        let handshake = Handshake::parse(&bytes[1..]).unwrap();
        assert_eq!(handshake.render(), &bytes[1..]);
    }

    #[test]
    fn rejects_bad_next_state() {
        let mut buf = Vec::new();
        buf.write_var_int(757);
        buf.write_string("localhost");
        buf.write_u16_be(25565);
        buf.write_u8(3);
        assert!(Handshake::parse(&buf).is_err());
    }
}
