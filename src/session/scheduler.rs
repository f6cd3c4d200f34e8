//! Delayed opponent turns on a worker thread.
//!
//! Every scheduled turn is tagged with the session generation it was issued
//! against and reports back on one long-lived channel. The worker only ever
//! sees a private copy of the board. Cancelling just forgets the pending turn;
//! a late reply still arrives but carries an old generation and is dropped by
//! the session.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::ai::Opponent;
use crate::config::OpponentConfig;
use crate::game::{Board, Side};

/// Reply from a worker: the column chosen for the given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpponentMove {
    pub generation: u64,
    pub column: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    generation: u64,
    started: Instant,
}

pub(crate) struct OpponentScheduler {
    tx: Sender<OpponentMove>,
    rx: Receiver<OpponentMove>,
    pending: Option<Pending>,
    rng: StdRng,
    think_min_ms: u64,
    think_max_ms: u64,
}

impl OpponentScheduler {
    pub fn new(config: &OpponentConfig) -> Self {
        let (tx, rx) = channel();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        OpponentScheduler {
            tx,
            rx,
            pending: None,
            rng,
            think_min_ms: config.think_min_ms,
            think_max_ms: config.think_max_ms.max(config.think_min_ms),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Generation of the turn currently being computed
    pub fn pending_generation(&self) -> Option<u64> {
        self.pending.map(|p| p.generation)
    }

    /// How long the pending turn has been thinking
    pub fn elapsed(&self) -> Option<Duration> {
        self.pending.map(|p| p.started.elapsed())
    }

    /// Start one opponent turn for `side` on a copy of `board`.
    pub fn schedule(&mut self, generation: u64, board: Board, side: Side, mut opponent: Box<dyn Opponent>) {
        let delay = Duration::from_millis(self.rng.random_range(self.think_min_ms..=self.think_max_ms));
        let tx = self.tx.clone();
        debug!(generation, ?delay, opponent = opponent.name(), "opponent turn scheduled");

        thread::spawn(move || {
            thread::sleep(delay);
            let column = opponent.choose_column(&board, side);
            // The session may be gone by now.
            let _ = tx.send(OpponentMove { generation, column });
        });

        self.pending = Some(Pending {
            generation,
            started: Instant::now(),
        });
    }

    /// Forget the pending turn. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Mark the pending turn as answered.
    pub fn finish(&mut self) {
        self.pending = None;
    }

    /// Next reply, if one has arrived
    pub fn try_recv(&self) -> Option<OpponentMove> {
        match self.rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("opponent channel disconnected");
                None
            }
        }
    }

    /// Block for the next reply, up to `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<OpponentMove> {
        match self.rx.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("opponent channel disconnected");
                None
            }
        }
    }
}
