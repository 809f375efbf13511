//! Play phase packets.
//!
//! Only the handful needed to reach play-relay steady state are fully
//! typed (spec.md §4.2). Several world/entity packets are only partially
//! parsed upstream in the source material this spec was distilled from;
//! per the Open Question in spec.md §9 they ship here as opaque-tail
//! packets: the leading fields a client needs to recognise the packet are
//! left unparsed too, and the entire payload is retained verbatim so
//! relaying never loses bytes.

use std::io;

use crate::proto::types::{Identifier, Reader, Writer};

/// `JoinGame` (ClientBound). Only the entity ID and game mode are parsed;
/// the dimension codec, world list, and remaining fields are carried as
/// `raw_tail` (see the Open Question note above).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinGame {
    pub entity_id: i32,
    pub is_hardcore: bool,
    pub game_mode: u8,
    pub raw_tail: Vec<u8>,
}

impl JoinGame {
    pub const ID: i32 = 0x26;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let entity_id = r.i32_be()?;
        let is_hardcore = r.bool()?;
        let game_mode = r.u8()?;
        let raw_tail = r.raw_tail();
        Ok(Self {
            entity_id,
            is_hardcore,
            game_mode,
            raw_tail,
        })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_i32_be(self.entity_id);
        buf.write_bool(self.is_hardcore);
        buf.write_u8(self.game_mode);
        buf.write_raw(&self.raw_tail);
        buf
    }
}

/// `ClientSettings` (ServerBound, ID 0x05).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub locale: String,
    pub view_distance: i8,
    pub chat_mode: i32,
    pub chat_colors: bool,
    pub displayed_skin_parts: u8,
    pub main_hand: i32,
}

impl ClientSettings {
    pub const ID: i32 = 0x05;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let locale = r.string()?;
        let view_distance = r.i8()?;
        let chat_mode = r.var_int()?;
        let chat_colors = r.bool()?;
        let displayed_skin_parts = r.u8()?;
        let main_hand = r.var_int()?;
        r.finish()?;
        Ok(Self {
            locale,
            view_distance,
            chat_mode,
            chat_colors,
            displayed_skin_parts,
            main_hand,
        })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_string(&self.locale);
        buf.write_u8(self.view_distance as u8);
        buf.write_var_int(self.chat_mode);
        buf.write_bool(self.chat_colors);
        buf.write_u8(self.displayed_skin_parts);
        buf.write_var_int(self.main_hand);
        buf
    }
}

/// `PluginMessage`, used both ServerBound (ID 0x0A) and ClientBound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginMessage {
    pub channel: Identifier,
    pub data: Vec<u8>,
}

impl PluginMessage {
    pub const SERVERBOUND_ID: i32 = 0x0A;

    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        let mut r = Reader::new(payload);
        let channel = r.identifier()?;
        let data = r.raw_tail();
        Ok(Self { channel, data })
    }

    pub fn render(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_identifier(&self.channel);
        buf.write_raw(&self.data);
        buf
    }
}

/// An opaque-tail packet: a recognised ID in Play whose payload the proxy
/// does not interpret further, only relays. Used for `ChunkData`,
/// `UpdateLight`, `DeclareRecipes`, `Tags`, `EntityMetadata`,
/// `EntityProperties`, and `DeclareCommands` per spec.md §9's Open
/// Question resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueTail {
    pub raw_tail: Vec<u8>,
}

impl OpaqueTail {
    pub fn parse(payload: &[u8]) -> io::Result<Self> {
        Ok(Self {
            raw_tail: payload.to_vec(),
        })
    }

    pub fn render(&self) -> Vec<u8> {
        self.raw_tail.clone()
    }
}

/// ClientBound IDs recognised as opaque-tail packets for logging/filtering
/// purposes (the `ChunkData` monitor filter in spec.md §4.5 needs to tell
/// these apart by kind even though their payload is not parsed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    ChunkData,
    UpdateLight,
    DeclareRecipes,
    Tags,
    EntityMetadata,
    EntityProperties,
    DeclareCommands,
}

impl OpaqueKind {
    pub fn from_clientbound_id(id: i32) -> Option<Self> {
        match id {
            0x22 => Some(Self::ChunkData),
            0x25 => Some(Self::UpdateLight),
            0x5B => Some(Self::DeclareRecipes),
            0x5C => Some(Self::Tags),
            0x4D => Some(Self::EntityMetadata),
            0x64 => Some(Self::EntityProperties),
            0x12 => Some(Self::DeclareCommands),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_game_tail_round_trips() {
        let packet = JoinGame {
            entity_id: 42,
            is_hardcore: false,
            game_mode: 0,
            raw_tail: vec![1, 2, 3, 4, 5],
        };
        let encoded = packet.render();
        let decoded = JoinGame::parse(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn client_settings_round_trip() {
        let packet = ClientSettings {
            locale: "en_US".to_string(),
            view_distance: 10,
            chat_mode: 0,
            chat_colors: true,
            displayed_skin_parts: 0x7F,
            main_hand: 1,
        };
        let encoded = packet.render();
        let decoded = ClientSettings::parse(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn plugin_message_round_trip() {
        let packet = PluginMessage {
            channel: Identifier::new("minecraft", "brand"),
            data: b"mcproxy".to_vec(),
        };
        let encoded = packet.render();
        let decoded = PluginMessage::parse(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn opaque_tail_is_identity() {
        let payload = vec![9, 9, 9, 1, 2, 3];
        let packet = OpaqueTail::parse(&payload).unwrap();
        assert_eq!(packet.render(), payload);
    }
}
