//! Typed per-packet payload parsers and renderers, grouped by phase.

pub mod handshaking;
pub mod login;
pub mod play;
pub mod status;
