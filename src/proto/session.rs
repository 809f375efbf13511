//! Per-connection state shared by the codec and both handlers.
//!
//! Mirrors the teacher's `proto::client::Client`: a `Mutex<Phase>` plus an
//! `AtomicI32` compression threshold, passed explicitly (never process-global,
//! per spec.md §9's REDESIGN FLAGS).

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use log::trace;

/// Protocol version asserted during Handshaking. spec.md targets 757 only.
pub const PROTOCOL_VERSION: i32 = 757;

/// One of the four connection phases a session moves through.
///
/// Transitions are strictly forward: Handshaking -> Status|Login, Login ->
/// Play. There is no path back to an earlier phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Handshaking,
    Status,
    Login,
    Play,
}

/// Connection-scoped state: current phase and compression threshold.
///
/// Compression is set exactly once, by `ServerHandler` upon receiving a
/// `SetCompression` packet, and from then on applies to both directions.
#[derive(Debug)]
pub struct Session {
    phase: Mutex<Phase>,
    /// Negative disables compression; see spec.md §3.
    compression: AtomicI32,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(Phase::Handshaking),
            compression: AtomicI32::new(-1),
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock().unwrap()
    }

    pub fn set_phase(&self, phase: Phase) {
        *self.phase.lock().unwrap() = phase;
    }

    pub fn compression_threshold(&self) -> i32 {
        self.compression.load(Ordering::Relaxed)
    }

    pub fn is_compressed(&self) -> bool {
        self.compression_threshold() >= 0
    }

    pub fn set_compression_threshold(&self, threshold: i32) {
        trace!(target: "mcproxy", "compression threshold set to {threshold}");
        self.compression.store(threshold, Ordering::Relaxed);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
