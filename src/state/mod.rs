//! The per-connection state machines (spec.md §4.3): `ClientHandler` drives
//! the client-facing side of a session, `ServerHandler` the server-facing
//! side. Both share one [`crate::proto::session::Session`] and exchange
//! structured packets with [`crate::relay::mirror`] over bounded channels.

pub mod client_handler;
pub mod server_handler;

use tokio::sync::mpsc;

use crate::proto::packet::Packet;

/// Channel capacity between a handler and the mirror. `1` rather than `0`
/// (tokio's mpsc requires a nonzero buffer): strict send-then-await use on
/// both ends keeps the prologue lock-step even though the channel can
/// technically hold one packet ahead, per the REDESIGN FLAGS in spec.md §9.
pub const HANDLER_CHANNEL_CAPACITY: usize = 1;

pub fn packet_channel() -> (mpsc::Sender<Packet>, mpsc::Receiver<Packet>) {
    mpsc::channel(HANDLER_CHANNEL_CAPACITY)
}
