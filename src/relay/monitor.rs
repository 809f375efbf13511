//! `PacketMonitor` (spec.md §4.5): a read-only tap that logs every packet
//! the mirror relays, at debug level, prefixed by direction.

use log::debug;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::proto::packet::Packet;
use crate::proto::packets::play::OpaqueKind;
use crate::proto::Direction;

pub struct PacketMonitor {
    rx: mpsc::Receiver<(Direction, Packet)>,
}

impl PacketMonitor {
    pub fn new(rx: mpsc::Receiver<(Direction, Packet)>) -> Self {
        Self { rx }
    }

    /// Log every tapped packet until the mirror closes its end. `ChunkData`
    /// is logged once per session and then suppressed — a steady-state
    /// connection can emit thousands of them and they add nothing after
    /// the first.
    pub async fn run(mut self) -> Result<()> {
        let mut chunk_data_logged = false;

        while let Some((direction, packet)) = self.rx.recv().await {
            if matches!(&packet, Packet::PlayOpaque { kind: OpaqueKind::ChunkData, .. }) {
                if chunk_data_logged {
                    continue;
                }
                chunk_data_logged = true;
            }

            let arrow = match direction {
                Direction::ServerBound => "->",
                Direction::ClientBound => "<-",
            };
            debug!(target: "mcproxy", "{arrow} {packet}");
        }

        Ok(())
    }
}
