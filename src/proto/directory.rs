//! `PacketDirectory`: the `(phase, direction) -> id` dispatch table from
//! spec.md §3.
//!
//! Built once as a `const` table (no metaclass-style mutation at class
//! definition time, per the REDESIGN FLAGS in spec.md §9) and consulted by
//! [`super::packet::Packet::decode`]. Kept here mainly as the documented,
//! testable source of truth for directory determinism — one entry per
//! named packet type.

use super::packets::{handshaking, login, play, status};
use super::session::Phase;
use super::Direction;

/// One directory entry: the ID a packet type occupies within its
/// (phase, direction) namespace, plus a human name for logging/tests.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub phase: Phase,
    pub direction: Direction,
    pub id: i32,
    pub name: &'static str,
}

/// The full static directory across all four phases.
///
/// A frame whose ID is absent here falls through `Packet::decode` to the
/// Play opaque-tail set ([`super::packets::play::OpaqueKind`]) and, failing
/// that, to [`super::packet::Packet::Unknown`] — this table does not need
/// (and must not gain) a catch-all entry.
pub const ENTRIES: &[Entry] = &[
    Entry {
        phase: Phase::Handshaking,
        direction: Direction::ServerBound,
        id: handshaking::Handshake::ID,
        name: "Handshake",
    },
    Entry {
        phase: Phase::Status,
        direction: Direction::ServerBound,
        id: status::Request::ID,
        name: "Request",
    },
    Entry {
        phase: Phase::Status,
        direction: Direction::ServerBound,
        id: status::Ping::ID,
        name: "Ping",
    },
    Entry {
        phase: Phase::Status,
        direction: Direction::ClientBound,
        id: status::Response::ID,
        name: "Response",
    },
    Entry {
        phase: Phase::Status,
        direction: Direction::ClientBound,
        id: status::Pong::ID,
        name: "Pong",
    },
    Entry {
        phase: Phase::Login,
        direction: Direction::ServerBound,
        id: login::LoginStart::ID,
        name: "LoginStart",
    },
    Entry {
        phase: Phase::Login,
        direction: Direction::ClientBound,
        id: login::EncryptionRequest::ID,
        name: "EncryptionRequest",
    },
    Entry {
        phase: Phase::Login,
        direction: Direction::ClientBound,
        id: login::LoginSuccess::ID,
        name: "LoginSuccess",
    },
    Entry {
        phase: Phase::Login,
        direction: Direction::ClientBound,
        id: login::SetCompression::ID,
        name: "SetCompression",
    },
    Entry {
        phase: Phase::Play,
        direction: Direction::ClientBound,
        id: play::JoinGame::ID,
        name: "JoinGame",
    },
    Entry {
        phase: Phase::Play,
        direction: Direction::ServerBound,
        id: play::ClientSettings::ID,
        name: "ClientSettings",
    },
    Entry {
        phase: Phase::Play,
        direction: Direction::ServerBound,
        id: play::PluginMessage::SERVERBOUND_ID,
        name: "PluginMessage",
    },
];

/// Look up directory entries for one (phase, direction) pair.
pub fn for_phase_direction(phase: Phase, direction: Direction) -> impl Iterator<Item = &'static Entry> {
    ENTRIES
        .iter()
        .filter(move |e| e.phase == phase && e.direction == direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn no_duplicate_ids_within_a_phase_direction() {
        let phases = [Phase::Handshaking, Phase::Status, Phase::Login, Phase::Play];
        let directions = [Direction::ServerBound, Direction::ClientBound];

        for &phase in &phases {
            for &direction in &directions {
                let mut seen = HashSet::new();
                for entry in for_phase_direction(phase, direction) {
                    assert!(
                        seen.insert(entry.id),
                        "duplicate id {} in {:?}/{:?}",
                        entry.id,
                        phase,
                        direction
                    );
                }
            }
        }
    }
}
