//! `ClientHandler`: the client-facing half of a session's trampoline
//! (spec.md §4.3). Sequences Handshaking -> Status|Login -> Play, handing
//! every parsed packet to the mirror and writing back whatever the mirror
//! hands down.

use bytes::BytesMut;
use log::debug;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use std::sync::Arc;
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

pub struct ClientHandler {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    session: Arc<Session>,
    read_buf: BytesMut,
    up_tx: mpsc::Sender<Packet>,
    down_rx: mpsc::Receiver<Packet>,
}

impl ClientHandler {
    pub fn new(
        stream: TcpStream,
        session: Arc<Session>,
        up_tx: mpsc::Sender<Packet>,
        down_rx: mpsc::Receiver<Packet>,
    ) -> Self {
        let (reader, writer) = stream.into_split();
        Self {
            reader,
            writer,
            session,
            read_buf: BytesMut::new(),
            up_tx,
            down_rx,
        }
    }

    /// Drive the session to completion: Handshaking, then whichever of
    /// Status/Login the handshake selected, then Play if reached.
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
        let packet = self.read_expected(phase).await?;
        let handshake = match packet {
            Packet::Handshake(h) => h,
            other => return Err(ProxyError::mismatch(phase, "Handshake", &other)),
        };
        handshake
            .assert_supported_protocol()
            .map_err(|err| ProxyError::PayloadInvariant(err.to_string()))?;

        let next_phase = match handshake.next_state {
            1 => Phase::Status,
            2 => Phase::Login,
            other => unreachable!("Handshake::parse rejects next_state {other}"),
        };
        debug!(target: "mcproxy", "handshake selects {next_phase:?}");
        self.session.set_phase(next_phase);
        self.send_up(Packet::Handshake(handshake), phase).await
    }

    async fn status(&mut self) -> Result<()> {
        let phase = Phase::Status;

        let packet = self.read_expected(phase).await?;
        let request = match packet {
            Packet::StatusRequest(r) => r,
            other => return Err(ProxyError::mismatch(phase, "Request", &other)),
        };
        self.send_up(Packet::StatusRequest(request), phase).await?;

        let response = self.recv_down(phase).await?;
        match &response {
            Packet::StatusResponse(_) => {}
            other => return Err(ProxyError::mismatch(phase, "Response", other)),
        }
        self.write_packet(&response).await?;

        let packet = self.read_expected(phase).await?;
        let ping = match packet {
            Packet::StatusPing(p) => p,
            other => return Err(ProxyError::mismatch(phase, "Ping", &other)),
        };
        self.send_up(Packet::StatusPing(ping), phase).await?;

        let pong = self.recv_down(phase).await?;
        match &pong {
            Packet::StatusPong(_) => {}
            other => return Err(ProxyError::mismatch(phase, "Pong", other)),
        }
        self.write_packet(&pong).await
    }

    async fn login(&mut self) -> Result<LoginOutcome> {
        let phase = Phase::Login;

        let packet = self.read_expected(phase).await?;
        let login_start = match packet {
            Packet::LoginStart(p) => p,
            other => return Err(ProxyError::mismatch(phase, "LoginStart", &other)),
        };
        self.send_up(Packet::LoginStart(login_start), phase).await?;

        match self.recv_down(phase).await? {
            Packet::LoginEncryptionRequest(_) => {
                crate::notice!(
                    target: "mcproxy",
                    "server requested encryption; mcproxy does not negotiate it, ending session"
                );
                Ok(LoginOutcome::Terminated)
            }
            Packet::LoginSuccess(success) => {
                self.write_packet(&Packet::LoginSuccess(success)).await?;
                self.session.set_phase(Phase::Play);
                Ok(LoginOutcome::ReachedPlay)
            }
            other => Err(ProxyError::mismatch(phase, "LoginSuccess", &other)),
        }
    }

    async fn play(&mut self) -> Result<()> {
        let phase = Phase::Play;

        let join_game = self.recv_down(phase).await?;
        match &join_game {
            Packet::PlayJoinGame(_) => {}
            other => return Err(ProxyError::mismatch(phase, "JoinGame", other)),
        }
        self.write_packet(&join_game).await?;

        let packet = self.read_expected(phase).await?;
        match &packet {
            Packet::PlayClientSettings(_) => {}
            other => return Err(ProxyError::mismatch(phase, "ClientSettings", other)),
        }
        self.send_up(packet, phase).await?;

        let Self {
            reader,
            writer,
            session,
            read_buf,
            up_tx,
            down_rx,
        } = &mut self;
        let session: &Session = session.as_ref();

        let upstream = async {
            loop {
                match io::read_frame(session, read_buf, reader).await? {
                    None => return Ok(()),
                    Some(frame) => {
                        let packet = Packet::decode(phase, Direction::ServerBound, frame)?;
                        if up_tx.send(packet).await.is_err() {
                            return Ok(());
                        }
                    }
                }
            }
        };
        let downstream = async {
            while let Some(packet) = down_rx.recv().await {
                let wire = packet::encode_for_wire(session, &packet)?;
                writer.write_all(&wire).await?;
            }
            Ok::<(), ProxyError>(())
        };

        tokio::try_join!(upstream, downstream)?;
        Ok(())
    }

    async fn read_expected(&mut self, phase: Phase) -> Result<Packet> {
        let frame = io::read_frame(&self.session, &mut self.read_buf, &mut self.reader)
            .await?
            .ok_or(ProxyError::PeerDisconnected { side: "client", phase })?;
        Packet::decode(phase, Direction::ServerBound, frame)
    }

    async fn send_up(&mut self, packet: Packet, phase: Phase) -> Result<()> {
        self.up_tx
            .send(packet)
            .await
            .map_err(|_| ProxyError::PeerDisconnected { side: "mirror", phase })
    }

    async fn recv_down(&mut self, phase: Phase) -> Result<Packet> {
        self.down_rx
            .recv()
            .await
            .ok_or(ProxyError::PeerDisconnected { side: "mirror", phase })
    }

    async fn write_packet(&mut self, packet: &Packet) -> Result<()> {
        let wire = packet::encode_for_wire(&self.session, packet)?;
        self.writer.write_all(&wire).await?;
        Ok(())
    }
}

