//! `PacketMirror` and `PacketMonitor` (spec.md §4.4/§4.5): the tap that
//! sits between `ClientHandler` and `ServerHandler`, forwarding packets in
//! both directions and teeing a copy to the monitor.

pub mod mirror;
pub mod monitor;
