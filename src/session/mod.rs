//! Game session: owns the rule engine for one game, routes human moves in,
//! schedules the automated opponent, and reports every change as a
//! [`GameEvent`].

mod events;
mod scheduler;

use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

pub use events::GameEvent;
use scheduler::{OpponentMove, OpponentScheduler};

use crate::ai::{HeuristicOpponent, Opponent};
use crate::config::AppConfig;
use crate::error::{InvalidState, MoveError};
use crate::game::{Board, GameResult, RuleEngine, Side, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    HumanVsHuman,
    HumanVsOpponent,
}

impl GameMode {
    pub fn toggled(self) -> GameMode {
        match self {
            GameMode::HumanVsHuman => GameMode::HumanVsOpponent,
            GameMode::HumanVsOpponent => GameMode::HumanVsHuman,
        }
    }

    /// Label for display
    pub fn label(self) -> &'static str {
        match self {
            GameMode::HumanVsHuman => "Human vs Human",
            GameMode::HumanVsOpponent => "Human vs Computer",
        }
    }
}

/// What became of one worker reply.
#[derive(Debug, PartialEq)]
enum ReplyOutcome {
    Applied(Transition),
    /// Issued against an earlier game.
    Stale { issued: u64, current: u64 },
    Rejected(MoveError),
}

pub struct GameSession {
    engine: RuleEngine,
    mode: GameMode,
    human_side: Side,
    /// Bumped on every new game; opponent replies from older games are dropped.
    generation: u64,
    opponent: Box<dyn Opponent>,
    /// Plays the opponent's turn when its own reply is unusable.
    fallback: HeuristicOpponent,
    scheduler: OpponentScheduler,
    events: Sender<GameEvent>,
}

impl GameSession {
    /// Session using the heuristic opponent, started in the configured mode.
    pub fn new(config: &AppConfig, events: Sender<GameEvent>) -> Self {
        let opponent: Box<dyn Opponent> = match config.opponent.seed {
            Some(seed) => Box::new(HeuristicOpponent::with_seed(seed)),
            None => Box::new(HeuristicOpponent::new()),
        };
        Self::with_opponent(config, opponent, events)
    }

    /// Session with a caller-supplied opponent.
    pub fn with_opponent(
        config: &AppConfig,
        opponent: Box<dyn Opponent>,
        events: Sender<GameEvent>,
    ) -> Self {
        let mut session = GameSession {
            engine: RuleEngine::new(),
            mode: config.game.mode,
            human_side: config.game.human_side,
            generation: 0,
            opponent,
            fallback: match config.opponent.seed {
                Some(seed) => HeuristicOpponent::with_seed(seed),
                None => HeuristicOpponent::new(),
            },
            scheduler: OpponentScheduler::new(&config.opponent),
            events,
        };
        session.new_game(config.game.mode);
        session
    }

    /// Replace the current game wholesale, cancelling any pending opponent turn.
    pub fn new_game(&mut self, mode: GameMode) {
        if self.scheduler.cancel() {
            debug!(generation = self.generation, "pending opponent turn cancelled");
            self.emit(GameEvent::OpponentThinkingEnded);
        }

        self.generation += 1;
        self.engine = RuleEngine::new();
        self.mode = mode;

        let first = Side::PlayerA;
        info!(generation = self.generation, mode = mode.label(), "new game");
        self.emit(GameEvent::GameStarted { mode, first });
        self.schedule_opponent_if_due();
    }

    /// New game in the current mode
    pub fn reset(&mut self) {
        self.new_game(self.mode);
    }

    /// Switching mode always starts a new game.
    pub fn set_mode(&mut self, mode: GameMode) {
        self.new_game(mode);
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn human_side(&self) -> Side {
        self.human_side
    }

    pub fn side_to_move(&self) -> Option<Side> {
        self.engine.side_to_move()
    }

    pub fn result(&self) -> GameResult {
        self.engine.result()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn opponent_name(&self) -> &str {
        self.opponent.name()
    }

    pub fn is_opponent_thinking(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn opponent_thinking_elapsed(&self) -> Option<Duration> {
        self.scheduler.elapsed()
    }

    /// Drop a disc for `side`. Refused without any state change or event if the
    /// opponent is thinking, the game is over, or `side` is not to move.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn request_move(&mut self, column: usize, side: Side) -> Result<Transition, MoveError> {
        if self.scheduler.is_pending() {
            return Err(InvalidState::OpponentThinking.into());
        }
        let to_move = self.engine.side_to_move().ok_or(InvalidState::GameOver)?;
        if side != to_move {
            return Err(InvalidState::WrongSide { requested: side, to_move }.into());
        }
        self.apply(column)
    }

    /// Apply the opponent's reply if it has arrived. Returns whether a move was made.
    pub fn poll_opponent(&mut self) -> bool {
        while let Some(reply) = self.scheduler.try_recv() {
            if self.handle_reply(reply) {
                return true;
            }
        }
        false
    }

    /// Block until the pending opponent turn is applied or `timeout` passes.
    pub fn wait_for_opponent(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.scheduler.is_pending() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.scheduler.recv_timeout(remaining) {
                Some(reply) => {
                    if self.handle_reply(reply) {
                        return true;
                    }
                }
                None => return false,
            }
        }
        false
    }

    fn handle_reply(&mut self, reply: OpponentMove) -> bool {
        match self.accept_opponent_move(reply) {
            ReplyOutcome::Applied(transition) => {
                debug!(column = transition.placed.col, "opponent move applied");
                true
            }
            ReplyOutcome::Stale { issued, current } => {
                debug!(issued, current, "stale opponent move discarded");
                false
            }
            ReplyOutcome::Rejected(err) => {
                warn!(%err, "opponent turn could not be played");
                false
            }
        }
    }

    fn accept_opponent_move(&mut self, reply: OpponentMove) -> ReplyOutcome {
        if self.scheduler.pending_generation() != Some(reply.generation) {
            return ReplyOutcome::Stale {
                issued: reply.generation,
                current: self.generation,
            };
        }
        self.scheduler.finish();
        self.emit(GameEvent::OpponentThinkingEnded);

        match reply.column {
            Some(column) => match self.apply(column) {
                Ok(transition) => return ReplyOutcome::Applied(transition),
                Err(err) => {
                    warn!(%err, column, opponent = self.opponent.name(), "opponent move rejected, using fallback")
                }
            },
            None => {
                warn!(opponent = self.opponent.name(), "opponent chose no column, using fallback")
            }
        }
        self.apply_fallback_move()
    }

    /// Play the opponent's turn with the fallback heuristic on the live board.
    fn apply_fallback_move(&mut self) -> ReplyOutcome {
        let Some(side) = self.engine.side_to_move() else {
            return ReplyOutcome::Rejected(InvalidState::GameOver.into());
        };
        let board = *self.engine.board();
        let Some(column) = self.fallback.choose_column(&board, side) else {
            return ReplyOutcome::Rejected(InvalidState::GameOver.into());
        };
        match self.apply(column) {
            Ok(transition) => ReplyOutcome::Applied(transition),
            Err(err) => ReplyOutcome::Rejected(err),
        }
    }

    fn apply(&mut self, column: usize) -> Result<Transition, MoveError> {
        let transition = self.engine.apply_move(column)?;
        for event in GameEvent::from_transition(&transition) {
            self.emit(event);
        }
        match self.engine.result() {
            GameResult::Win(side, _) => info!(winner = side.name(), "game won"),
            GameResult::Draw => info!("game drawn"),
            GameResult::InProgress => self.schedule_opponent_if_due(),
        }
        Ok(transition)
    }

    fn schedule_opponent_if_due(&mut self) {
        if self.mode != GameMode::HumanVsOpponent || self.scheduler.is_pending() {
            return;
        }
        let Some(side) = self.engine.side_to_move() else {
            return;
        };
        if side == self.human_side {
            return;
        }
        self.emit(GameEvent::OpponentThinkingStarted);
        let worker = self.opponent.fork();
        self.scheduler
            .schedule(self.generation, *self.engine.board(), side, worker);
    }

    fn emit(&self, event: GameEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpponentConfig;
    use crate::game::{Cell, COLS, DRAW_SEQUENCE, ROWS};
    use std::sync::mpsc::{channel, Receiver};

    /// Always drops into the lowest-numbered open column.
    struct LeftmostOpponent;

    impl Opponent for LeftmostOpponent {
        fn choose_column(&mut self, board: &Board, _side: Side) -> Option<usize> {
            board.available_columns().first().copied()
        }

        fn name(&self) -> &str {
            "Leftmost"
        }

        fn fork(&mut self) -> Box<dyn Opponent> {
            Box::new(LeftmostOpponent)
        }
    }

    /// Returns the same reply whatever the board looks like.
    struct FixedReplyOpponent(Option<usize>);

    impl Opponent for FixedReplyOpponent {
        fn choose_column(&mut self, _board: &Board, _side: Side) -> Option<usize> {
            self.0
        }

        fn name(&self) -> &str {
            "FixedReply"
        }

        fn fork(&mut self) -> Box<dyn Opponent> {
            Box::new(FixedReplyOpponent(self.0))
        }
    }

    fn config(mode: GameMode, human_side: Side, think_ms: u64) -> AppConfig {
        let mut config = AppConfig::default();
        config.game.mode = mode;
        config.game.human_side = human_side;
        config.opponent = OpponentConfig {
            think_min_ms: think_ms,
            think_max_ms: think_ms,
            seed: Some(11),
        };
        config
    }

    fn session(mode: GameMode, human_side: Side, think_ms: u64) -> (GameSession, Receiver<GameEvent>) {
        let (tx, rx) = channel();
        let session = GameSession::with_opponent(
            &config(mode, human_side, think_ms),
            Box::new(LeftmostOpponent),
            tx,
        );
        (session, rx)
    }

    fn drain(rx: &Receiver<GameEvent>) -> Vec<GameEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_new_session_announces_game() {
        let (session, rx) = session(GameMode::HumanVsHuman, Side::PlayerA, 0);
        assert_eq!(
            drain(&rx),
            vec![GameEvent::GameStarted {
                mode: GameMode::HumanVsHuman,
                first: Side::PlayerA
            }]
        );
        assert_eq!(session.generation(), 1);
        assert_eq!(session.side_to_move(), Some(Side::PlayerA));
    }

    #[test]
    fn test_wrong_side_is_ignored() {
        let (mut session, rx) = session(GameMode::HumanVsHuman, Side::PlayerA, 0);
        drain(&rx);
        let before = *session.board();

        let err = session.request_move(3, Side::PlayerB).unwrap_err();
        assert_eq!(
            err,
            MoveError::InvalidState(InvalidState::WrongSide {
                requested: Side::PlayerB,
                to_move: Side::PlayerA
            })
        );
        assert!(drain(&rx).is_empty());
        assert_eq!(*session.board(), before);
        assert_eq!(session.side_to_move(), Some(Side::PlayerA));
    }

    #[test]
    fn test_hotseat_moves_emit_events() {
        let (mut session, rx) = session(GameMode::HumanVsHuman, Side::PlayerA, 0);
        drain(&rx);

        session.request_move(3, Side::PlayerA).unwrap();
        session.request_move(3, Side::PlayerB).unwrap();

        assert_eq!(
            drain(&rx),
            vec![
                GameEvent::DiscPlaced { row: 5, col: 3, side: Side::PlayerA },
                GameEvent::TurnChanged(Side::PlayerB),
                GameEvent::DiscPlaced { row: 4, col: 3, side: Side::PlayerB },
                GameEvent::TurnChanged(Side::PlayerA),
            ]
        );
        assert!(!session.is_opponent_thinking());
    }

    #[test]
    fn test_win_then_moves_are_ignored() {
        let (mut session, rx) = session(GameMode::HumanVsHuman, Side::PlayerA, 0);
        let mut side = Side::PlayerA;
        for col in [0, 1, 0, 1, 0, 1, 0] {
            session.request_move(col, side).unwrap();
            side = side.other();
        }
        let events = drain(&rx);
        match events.last() {
            Some(GameEvent::GameWon { side, run }) => {
                assert_eq!(*side, Side::PlayerA);
                assert_eq!(run.cells, [(2, 0), (3, 0), (4, 0), (5, 0)]);
            }
            other => panic!("expected win event, got {other:?}"),
        }

        let before = *session.board();
        for col in 0..COLS {
            for side in [Side::PlayerA, Side::PlayerB] {
                assert_eq!(
                    session.request_move(col, side),
                    Err(MoveError::InvalidState(InvalidState::GameOver))
                );
            }
        }
        assert!(drain(&rx).is_empty());
        assert_eq!(*session.board(), before);
    }

    #[test]
    fn test_draw_then_moves_are_ignored() {
        let (mut session, rx) = session(GameMode::HumanVsHuman, Side::PlayerA, 0);
        let mut side = Side::PlayerA;
        for col in DRAW_SEQUENCE {
            session.request_move(col, side).unwrap();
            side = side.other();
        }
        assert_eq!(drain(&rx).last(), Some(&GameEvent::GameDraw));
        assert_eq!(session.result(), GameResult::Draw);

        let before = session.engine().clone();
        for col in 0..COLS {
            for side in [Side::PlayerA, Side::PlayerB] {
                assert_eq!(
                    session.request_move(col, side),
                    Err(MoveError::InvalidState(InvalidState::GameOver))
                );
            }
        }
        assert!(drain(&rx).is_empty());
        assert_eq!(*session.engine(), before);
    }

    #[test]
    fn test_full_column_is_ignored() {
        let (mut session, rx) = session(GameMode::HumanVsHuman, Side::PlayerA, 0);
        let mut side = Side::PlayerA;
        for _ in 0..6 {
            session.request_move(4, side).unwrap();
            side = side.other();
        }
        drain(&rx);

        assert_eq!(
            session.request_move(4, side),
            Err(MoveError::ColumnFull { column: 4 })
        );
        assert!(drain(&rx).is_empty());
        assert_eq!(session.side_to_move(), Some(side));
    }

    #[test]
    fn test_opponent_replies_after_human_move() {
        let (mut session, rx) = session(GameMode::HumanVsOpponent, Side::PlayerA, 0);
        drain(&rx);

        session.request_move(3, Side::PlayerA).unwrap();
        assert!(session.is_opponent_thinking());

        // Rejected while the opponent is thinking, even for the opponent's side.
        for side in [Side::PlayerA, Side::PlayerB] {
            assert_eq!(
                session.request_move(4, side),
                Err(MoveError::InvalidState(InvalidState::OpponentThinking))
            );
        }

        assert!(session.wait_for_opponent(Duration::from_secs(5)));
        assert!(!session.is_opponent_thinking());
        assert_eq!(session.board().get(5, 0), Cell::PlayerB);
        assert_eq!(session.side_to_move(), Some(Side::PlayerA));

        assert_eq!(
            drain(&rx),
            vec![
                GameEvent::DiscPlaced { row: 5, col: 3, side: Side::PlayerA },
                GameEvent::TurnChanged(Side::PlayerB),
                GameEvent::OpponentThinkingStarted,
                GameEvent::OpponentThinkingEnded,
                GameEvent::DiscPlaced { row: 5, col: 0, side: Side::PlayerB },
                GameEvent::TurnChanged(Side::PlayerA),
            ]
        );
    }

    #[test]
    fn test_opponent_opens_when_human_plays_second() {
        let (mut session, rx) = session(GameMode::HumanVsOpponent, Side::PlayerB, 0);
        assert!(session.is_opponent_thinking());
        assert_eq!(
            session.request_move(2, Side::PlayerB),
            Err(MoveError::InvalidState(InvalidState::OpponentThinking))
        );

        assert!(session.wait_for_opponent(Duration::from_secs(5)));
        assert_eq!(session.board().get(5, 0), Cell::PlayerA);
        session.request_move(2, Side::PlayerB).unwrap();
        assert!(session.is_opponent_thinking());

        let events = drain(&rx);
        assert_eq!(events[1], GameEvent::OpponentThinkingStarted);
    }

    #[test]
    fn test_unusable_opponent_reply_is_replaced() {
        for reply in [Some(9), None] {
            let (tx, rx) = channel();
            let mut session = GameSession::with_opponent(
                &config(GameMode::HumanVsOpponent, Side::PlayerA, 0),
                Box::new(FixedReplyOpponent(reply)),
                tx,
            );
            session.request_move(3, Side::PlayerA).unwrap();

            assert!(session.wait_for_opponent(Duration::from_secs(5)));
            assert!(!session.is_opponent_thinking());
            assert_eq!(session.board().disc_count(), 2);
            assert_eq!(session.side_to_move(), Some(Side::PlayerA));

            let events = drain(&rx);
            assert!(events
                .iter()
                .any(|e| matches!(e, GameEvent::DiscPlaced { side: Side::PlayerB, .. })));
            assert_eq!(events.last(), Some(&GameEvent::TurnChanged(Side::PlayerA)));

            // The human can keep playing.
            session.request_move(3, Side::PlayerA).unwrap();
            assert!(session.wait_for_opponent(Duration::from_secs(5)));
            assert_eq!(session.board().disc_count(), 4);
        }
    }

    #[test]
    fn test_full_column_reply_is_replaced() {
        let (tx, rx) = channel();
        let mut session = GameSession::with_opponent(
            &config(GameMode::HumanVsOpponent, Side::PlayerA, 0),
            Box::new(FixedReplyOpponent(Some(0))),
            tx,
        );

        // Fill column 0 with the opponent answering into it.
        for _ in 0..ROWS / 2 {
            session.request_move(0, Side::PlayerA).unwrap();
            assert!(session.wait_for_opponent(Duration::from_secs(5)));
        }
        assert!(session.board().is_column_full(0));
        drain(&rx);

        session.request_move(1, Side::PlayerA).unwrap();
        assert!(session.wait_for_opponent(Duration::from_secs(5)));
        assert_eq!(session.board().disc_count(), ROWS + 2);
        assert_eq!(session.side_to_move(), Some(Side::PlayerA));
    }

    #[test]
    fn test_reset_discards_pending_opponent_move() {
        let (mut session, rx) = session(GameMode::HumanVsOpponent, Side::PlayerA, 50);
        session.request_move(3, Side::PlayerA).unwrap();
        assert!(session.is_opponent_thinking());
        drain(&rx);

        session.reset();
        assert!(!session.is_opponent_thinking());
        assert_eq!(session.generation(), 2);
        assert_eq!(
            drain(&rx),
            vec![
                GameEvent::OpponentThinkingEnded,
                GameEvent::GameStarted {
                    mode: GameMode::HumanVsOpponent,
                    first: Side::PlayerA
                },
            ]
        );

        // Let the cancelled worker fire; its reply must not touch the new game.
        std::thread::sleep(Duration::from_millis(250));
        assert!(!session.poll_opponent());
        assert_eq!(session.board().disc_count(), 0);
        assert!(drain(&rx).is_empty());
        assert_eq!(session.side_to_move(), Some(Side::PlayerA));
    }

    #[test]
    fn test_stale_generation_is_rejected() {
        let (mut session, rx) = session(GameMode::HumanVsOpponent, Side::PlayerA, 0);
        session.set_mode(GameMode::HumanVsOpponent);
        drain(&rx);

        let stale = OpponentMove { generation: 1, column: Some(0) };
        assert_eq!(
            session.accept_opponent_move(stale),
            ReplyOutcome::Stale { issued: 1, current: 2 }
        );
        assert_eq!(session.board().disc_count(), 0);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_mode_switch_starts_new_game() {
        let (mut session, rx) = session(GameMode::HumanVsHuman, Side::PlayerA, 0);
        session.request_move(3, Side::PlayerA).unwrap();
        drain(&rx);

        session.set_mode(session.mode().toggled());
        assert_eq!(session.mode(), GameMode::HumanVsOpponent);
        assert_eq!(session.board().disc_count(), 0);
        assert_eq!(
            drain(&rx),
            vec![GameEvent::GameStarted {
                mode: GameMode::HumanVsOpponent,
                first: Side::PlayerA
            }]
        );
    }

    #[test]
    fn test_heuristic_opponent_plays_through_session() {
        let (tx, rx) = channel();
        let mut session = GameSession::new(&config(GameMode::HumanVsOpponent, Side::PlayerA, 0), tx);
        assert_eq!(session.opponent_name(), "Heuristic");

        for _ in 0..3 {
            session.request_move(0, Side::PlayerA).unwrap();
            assert!(session.wait_for_opponent(Duration::from_secs(5)));
        }
        drain(&rx);

        let board = session.board();
        assert_eq!(board.disc_count(), 6);
        // Three stacked red discs are always capped by the opponent.
        if (3..6).all(|row| board.get(row, 0) == Cell::PlayerA) {
            assert_eq!(board.get(2, 0), Cell::PlayerB);
        }
        assert_eq!(session.result(), GameResult::InProgress);
        assert_eq!(session.side_to_move(), Some(Side::PlayerA));
    }
}
