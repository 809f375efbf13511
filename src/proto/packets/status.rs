//! Status phase packets.

use std::io;

use crate::proto::types::{Reader, Writer};

/// `Request` (ServerBound, ID 0x00). Empty body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Request;

impl Request {
    pub const ID: i32 = 0x00;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        Reader::new(payload).finish()?;
        Ok(Self)
    }

    pub fn render(&self) -> Vec<u8> {
        Vec::new()
    }
}

/// `Ping` (ServerBound, ID 0x01).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    pub value: i64,
}

impl Ping {
    pub const ID: i32 = 0x01;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let value = r.i64_be()?;
        r.finish()?;
        Ok(Self { value })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_i64_be(self.value);
        buf
    }
}

/// `Response` (ClientBound, ID 0x00). `json` holds the server-list-ping
/// status document verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub json: String,
}

impl Response {
    pub const ID: i32 = 0x00;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let json = r.string()?;
        r.finish()?;
        Ok(Self { json })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_string(&self.json);
        buf
    }
}

/// `Pong` (ClientBound, ID 0x01).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pong {
    pub value: i64,
}

impl Pong {
    pub const ID: i32 = 0x01;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let value = r.i64_be()?;
        r.finish()?;
        Ok(Self { value })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_i64_be(self.value);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The shape of a server-list-ping status document (spec.md §8 scenario
    /// 3). Only used here to build a fixture `Response`: the proxy itself
    /// never originates this JSON, it relays the real server's `Response`
    /// verbatim.
    #[derive(serde::Serialize)]
    struct StatusDocument {
        version: StatusVersion,
        players: StatusPlayers,
        description: StatusDescription,
    }

    #[derive(serde::Serialize)]
    struct StatusVersion {
        name: String,
        protocol: i32,
    }

    #[derive(serde::Serialize)]
    struct StatusPlayers {
        max: u32,
        online: u32,
        sample: Vec<String>,
    }

    #[derive(serde::Serialize)]
    struct StatusDescription {
        text: String,
    }

    #[test]
    fn status_fixture_json_matches_the_spec_example() {
        let document = StatusDocument {
            version: StatusVersion {
                name: "Minecraft Server".to_string(),
                protocol: crate::proto::session::PROTOCOL_VERSION,
            },
            players: StatusPlayers {
                max: 20,
                online: 0,
                sample: Vec::new(),
            },
            description: StatusDescription {
                text: String::new(),
            },
        };
        let json = serde_json::to_string(&document).unwrap();
        assert_eq!(
            json,
            r#"{"version":{"name":"Minecraft Server","protocol":757},"players":{"max":20,"online":0,"sample":[]},"description":{"text":""}}"#
        );

        let response = Response { json };
        let decoded = Response::parse(&response.render()).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn ping_pong_payload_is_byte_identical() {
        let ping = Ping { value: 12345 };
        let pong = Pong { value: ping.value };
        assert_eq!(ping.render(), pong.render());
        assert_eq!(ping.render().len(), 8);
    }

    #[test]
    fn response_round_trip() {
        let response = Response {
            json: r#"{"version":{"name":"mcproxy","protocol":757}}"#.to_string(),
        };
        let encoded = response.render();
        let decoded = Response::parse(&encoded).unwrap();
        assert_eq!(decoded, response);
    }
}
