//! `PacketMirror` (spec.md §4.4): couples the two handlers, relaying
//! packets in both directions and teeing a copy of each to the monitor.

use tokio::sync::mpsc;

use crate::error::Result;
use crate::proto::packet::Packet;
use crate::proto::Direction;

pub struct PacketMirror {
    client_in: mpsc::Receiver<Packet>,
    server_out: mpsc::Sender<Packet>,
    server_in: mpsc::Receiver<Packet>,
    client_out: mpsc::Sender<Packet>,
    monitor_tx: mpsc::Sender<(Direction, Packet)>,
}

impl PacketMirror {
    pub fn new(
        client_in: mpsc::Receiver<Packet>,
        server_out: mpsc::Sender<Packet>,
        server_in: mpsc::Receiver<Packet>,
        client_out: mpsc::Sender<Packet>,
        monitor_tx: mpsc::Sender<(Direction, Packet)>,
    ) -> Self {
        Self {
            client_in,
            server_out,
            server_in,
            client_out,
            monitor_tx,
        }
    }

    /// Run both relay directions concurrently until their source channel
    /// closes. Ending is normal teardown, not an error — the handlers
    /// decide when a session is over.
    ///
    /// Each direction owns its destination sender outright (`async move`,
    /// no shared struct field): the moment a direction's source channel
    /// closes, its sender drops with it, regardless of whether the other
    /// direction is still running. Capturing `server_out`/`client_out` by
    /// reference instead would keep both alive in `run`'s frame until
    /// `tokio::join!` returns, so neither side's peer would ever see EOF on
    /// a one-sided disconnect.
    pub async fn run(self) -> Result<()> {
        let Self {
            mut client_in,
            server_out,
            mut server_in,
            client_out,
            monitor_tx,
        } = self;

        let monitor_serverbound = monitor_tx.clone();
        let serverbound = async move {
            while let Some(packet) = client_in.recv().await {
                let _ = monitor_serverbound
                    .send((Direction::ServerBound, packet.clone()))
                    .await;
                if server_out.send(packet).await.is_err() {
                    break;
                }
            }
        };
        let clientbound = async move {
            while let Some(packet) = server_in.recv().await {
                let _ = monitor_tx.send((Direction::ClientBound, packet.clone())).await;
                if client_out.send(packet).await.is_err() {
                    break;
                }
            }
        };

        tokio::join!(serverbound, clientbound);
        Ok(())
    }
}
