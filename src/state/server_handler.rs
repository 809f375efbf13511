//! `ServerHandler`: the server-facing half of a session's trampoline
//! (spec.md §4.3). Mirrors `ClientHandler`'s sequencing, with the added
//! responsibility of absorbing `SetCompression` — it updates the shared
//! session and is never forwarded to the client.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use crate::error::{ProxyError, Result};
use crate::net;
use crate::proto::packet::{self, Packet};
use crate::proto::session::{Phase, Session};
use crate::proto::{io, Direction};

enum LoginOutcome {
    ReachedPlay,
    Terminated,
}

pub struct ServerHandler {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    session: Arc<Session>,
    read_buf: BytesMut,
    up_rx: mpsc::Receiver<Packet>,
    down_tx: mpsc::Sender<Packet>,
}

impl ServerHandler {
    pub fn new(
        stream: TcpStream,
        session: Arc<Session>,
        up_rx: mpsc::Receiver<Packet>,
        down_tx: mpsc::Sender<Packet>,
    ) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader,
            writer,
            session,
            read_buf: BytesMut::new(),
            up_rx,
            down_tx,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.handshaking().await?;
        match self.session.phase() {
            Phase::Status => self.status().await?,
            Phase::Login => {
                if let LoginOutcome::ReachedPlay = self.login().await? {
                    self.play().await?;
                }
            }
            other => unreachable!("handshake only selects Status or Login, got {other:?}"),
        }
        net::half_close(&mut self.reader, &mut self.writer).await?;
        Ok(())
    }

    async fn handshaking(&mut self) -> Result<()> {
        let phase = Phase::Handshaking;
        let packet = self.recv_up(phase).await?;
        match &packet {
            Packet::Handshake(_) => {}
            other => return Err(ProxyError::mismatch(phase, "Handshake", other)),
        }
        self.write_packet(&packet).await
    }

    async fn status(&mut self) -> Result<()> {
        let phase = Phase::Status;

        let request = self.recv_up(phase).await?;
        match &request {
            Packet::StatusRequest(_) => {}
            other => return Err(ProxyError::mismatch(phase, "Request", other)),
        }
        self.write_packet(&request).await?;

        let packet = self.read_expected(phase).await?;
        let response = match packet {
            Packet::StatusResponse(r) => r,
            other => return Err(ProxyError::mismatch(phase, "Response", &other)),
        };
        self.send_down(Packet::StatusResponse(response), phase).await?;

        let ping = self.recv_up(phase).await?;
        match &ping {
            Packet::StatusPing(_) => {}
            other => return Err(ProxyError::mismatch(phase, "Ping", other)),
        }
        self.write_packet(&ping).await?;

        let packet = self.read_expected(phase).await?;
        let pong = match packet {
            Packet::StatusPong(p) => p,
            other => return Err(ProxyError::mismatch(phase, "Pong", &other)),
        };
        self.send_down(Packet::StatusPong(pong), phase).await
    }

    async fn login(&mut self) -> Result<LoginOutcome> {
        let phase = Phase::Login;

        let login_start = self.recv_up(phase).await?;
        match &login_start {
            Packet::LoginStart(_) => {}
            other => return Err(ProxyError::mismatch(phase, "LoginStart", other)),
        }
        self.write_packet(&login_start).await?;

        loop {
            let packet = self.read_expected(phase).await?;
            match packet {
                Packet::LoginSetCompression(set) => {
                    self.session.set_compression_threshold(set.threshold);
                }
                Packet::LoginEncryptionRequest(req) => {
                    crate::notice!(
                        target: "mcproxy",
                        "server requested encryption; mcproxy does not negotiate it, ending session"
                    );
                    self.send_down(Packet::LoginEncryptionRequest(req), phase)
                        .await?;
                    return Ok(LoginOutcome::Terminated);
                }
                Packet::LoginSuccess(success) => {
                    self.send_down(Packet::LoginSuccess(success), phase).await?;
                    return Ok(LoginOutcome::ReachedPlay);
                }
                other => {
                    return Err(ProxyError::mismatch(
                        phase,
                        "SetCompression, EncryptionRequest, or LoginSuccess",
                        &other,
                    ))
                }
            }
        }
    }

    async fn play(&mut self) -> Result<()> {
        let phase = Phase::Play;

        let join_game = self.read_expected(phase).await?;
        match &join_game {
            Packet::PlayJoinGame(_) => {}
            other => return Err(ProxyError::mismatch(phase, "JoinGame", other)),
        }
        self.send_down(join_game, phase).await?;

        let client_settings = self.recv_up(phase).await?;
        match &client_settings {
            Packet::PlayClientSettings(_) => {}
            other => return Err(ProxyError::mismatch(phase, "ClientSettings", other)),
        }
        self.write_packet(&client_settings).await?;

        let Self {
            reader,
            writer,
            session,
            read_buf,
            up_rx,
            down_tx,
        } = &mut self;
        let session: &Session = session.as_ref();

        let downstream = async {
            loop {
                match io::read_frame(session, read_buf, reader).await? {
                    None => return Ok(()),
                    Some(frame) => {
                        let packet = Packet::decode(phase, Direction::ClientBound, frame)?;
                        if down_tx.send(packet).await.is_err() {
                            return Ok(());
                        }
                    }
                }
            }
        };
        let upstream = async {
            while let Some(packet) = up_rx.recv().await {
                let wire = packet::encode_for_wire(session, &packet)?;
                writer.write_all(&wire).await?;
            }
            Ok::<(), ProxyError>(())
        };

        tokio::try_join!(downstream, upstream)?;
        Ok(())
    }

    async fn read_expected(&mut self, phase: Phase) -> Result<Packet> {
        let frame = io::read_frame(&self.session, &mut self.read_buf, &mut self.reader)
            .await?
            .ok_or(ProxyError::PeerDisconnected { side: "server", phase })?;
        Packet::decode(phase, Direction::ClientBound, frame)
    }

    async fn recv_up(&mut self, phase: Phase) -> Result<Packet> {
        self.up_rx
            .recv()
            .await
            .ok_or(ProxyError::PeerDisconnected { side: "mirror", phase })
    }

    async fn send_down(&mut self, packet: Packet, phase: Phase) -> Result<()> {
        self.down_tx
            .send(packet)
            .await
            .map_err(|_| ProxyError::PeerDisconnected { side: "mirror", phase })
    }

    async fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        let wire = packet::encode_for_wire(&self.session, packet)?;
        self.writer.write_all(&wire).await?;
        Ok(())
    }
}

