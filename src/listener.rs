//! `ClientListener` (spec.md §4/§6): the long-lived accept loop. Each
//! accepted connection is handed off to [`crate::session::run`] on its own
//! task; the listener itself never blocks on a single client.

use std::time::Duration;

use log::{debug, info};
use tokio::net::TcpListener;

use crate::error::{ProxyError, Result};
use crate::session;

pub async fn serve(listen_addr: &str, connect_addr: &str, retry_delay: Duration) -> Result<()> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .map_err(ProxyError::Connect)?;

    info!(
        target: "mcproxy",
        "listening on {listen_addr}, relaying to {connect_addr}"
    );

    loop {
        let (client_stream, peer) = match listener.accept().await {
            Ok(pair) => pair,
            Err(err) => {
                debug!(target: "mcproxy", "failed to accept a connection: {err}");
                continue;
            }
        };
        debug!(target: "mcproxy", "accepted connection from {peer}");

        let connect_addr = connect_addr.to_string();
        tokio::spawn(async move {
            session::run(client_stream, &connect_addr, retry_delay).await;
        });
    }
}
