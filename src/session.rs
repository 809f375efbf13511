//! Per-connection orchestration (spec.md §5): wires a freshly accepted
//! client socket and a freshly dialled server socket together into the
//! four cooperating tasks (`ClientHandler`, `ServerHandler`,
//! `PacketMirror`, `PacketMonitor`) and runs them to completion.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time;

use crate::error::{ProxyError, Result};
use crate::proto::session::Session;
use crate::relay::mirror::PacketMirror;
use crate::relay::monitor::PacketMonitor;
use crate::state::client_handler::ClientHandler;
use crate::state::server_handler::ServerHandler;
use crate::state::packet_channel;

/// Capacity of the channel feeding the monitor. Bounded so a slow monitor
/// applies backpressure to the relay rather than growing without limit.
const MONITOR_CHANNEL_CAPACITY: usize = 100;

/// Dial the upstream server, retrying on connection-refused (the server may
/// still be starting) and failing fast on anything else.
pub async fn connect_upstream(connect_addr: &str, retry_delay: Duration) -> Result<TcpStream> {
    loop {
        match TcpStream::connect(connect_addr).await {
            Ok(stream) => return Ok(stream),
            Err(err) if is_retryable(&err) => {
                warn!(
                    target: "mcproxy",
                    "upstream connect to {connect_addr} failed ({err}), retrying in {retry_delay:?}"
                );
                time::sleep(retry_delay).await;
            }
            Err(err) => return Err(ProxyError::Connect(err)),
        }
    }
}

fn is_retryable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused | io::ErrorKind::TimedOut
    )
}

/// Run one client's session to completion: connect upstream, then drive the
/// four cooperating tasks until one of them ends, then tear the rest down.
pub async fn run(client_stream: TcpStream, connect_addr: &str, retry_delay: Duration) {
    let server_stream = match connect_upstream(connect_addr, retry_delay).await {
        Ok(stream) => stream,
        Err(err) => {
            warn!(target: "mcproxy", "dropping client, {err}");
            return;
        }
    };

    let session = Arc::new(Session::new());

    let (up1_tx, up1_rx) = packet_channel();
    let (dn1_tx, dn1_rx) = packet_channel();
    let (up2_tx, up2_rx) = packet_channel();
    let (dn2_tx, dn2_rx) = packet_channel();
    let (mon_tx, mon_rx) = mpsc::channel(MONITOR_CHANNEL_CAPACITY);

    let client_handler = ClientHandler::new(client_stream, session.clone(), up1_tx, dn1_rx);
    let server_handler = ServerHandler::new(server_stream, session.clone(), up2_rx, dn2_tx);
    let mirror = PacketMirror::new(up1_rx, up2_tx, dn2_rx, dn1_tx, mon_tx);
    let monitor = PacketMonitor::new(mon_rx);

    let mut tasks = JoinSet::new();
    tasks.spawn(labelled("client", client_handler.run()));
    tasks.spawn(labelled("server", server_handler.run()));
    tasks.spawn(labelled("mirror", mirror.run()));
    tasks.spawn(labelled("monitor", monitor.run()));

    while let Some(outcome) = tasks.join_next().await {
        match outcome {
            Ok((name, Ok(()))) => debug!(target: "mcproxy", "{name} task ended"),
            Ok((name, Err(err))) => {
                debug!(target: "mcproxy", "{name} task failed: {err}, ending session");
                tasks.abort_all();
            }
            Err(join_err) => {
                warn!(target: "mcproxy", "session task panicked: {join_err}");
                tasks.abort_all();
            }
        }
    }
}

async fn labelled(
    name: &'static str,
    fut: impl std::future::Future<Output = Result<()>>,
) -> (&'static str, Result<()>) {
    (name, fut.await)
}
