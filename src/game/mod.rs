//! Timed mini-game sessions.
//!
//! Every variant shares one lifecycle: `NotStarted -> Active -> Ended`. A
//! session ends on timeout, on its completion predicate, or when the player
//! skips; in every case the score is computed from whatever progress exists at
//! that moment, and exactly one `GameOutcome` is handed out via `take_outcome`.
//! Ended sessions are never resumed; replaying means building a new session.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::content::{GameKind, GamePayload, MiniGameDefinition};
use crate::error::SessionError;
use crate::score;

pub mod clock;
pub mod connections;
pub mod matching;
pub mod quickfire;

pub use clock::Countdown;
pub use connections::{ConnectionsSession, SubmitResult};
pub use matching::{Face, MatchingSession, SelectResult};
pub use quickfire::{AnswerResult, QuickfireSession};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EndCause {
    Completed,
    Timeout,
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    NotStarted,
    Active,
    Ended(EndCause),
}

/// The single result a finished session emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOutcome {
    pub success: bool,
    pub score_percent: u8,
    pub cause: EndCause,
}

impl GameOutcome {
    pub fn from_progress(correct: usize, total: usize, cause: EndCause) -> Self {
        let score_percent = score::score_percent(correct, total);
        Self { success: score::is_success(score_percent as f64), score_percent, cause }
    }
}

/// Lifecycle bookkeeping shared by all variants.
#[derive(Clone, Debug)]
pub struct SessionCore {
    phase: Phase,
    clock: Countdown,
    outcome: Option<GameOutcome>,
    delivered: bool,
}

impl SessionCore {
    pub fn new(time_limit: u32) -> Self {
        Self { phase: Phase::NotStarted, clock: Countdown::new(time_limit), outcome: None, delivered: false }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn time_left(&self) -> u32 {
        self.clock.remaining()
    }

    pub fn elapsed(&self) -> u32 {
        self.clock.elapsed()
    }

    fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::NotStarted => {
                self.phase = Phase::Active;
                Ok(())
            }
            Phase::Active => Err(SessionError::AlreadyStarted),
            Phase::Ended(_) => Err(SessionError::AlreadyEnded),
        }
    }

    pub(crate) fn ensure_active(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::NotStarted => Err(SessionError::NotStarted),
            Phase::Ended(_) => Err(SessionError::AlreadyEnded),
        }
    }

    fn end(&mut self, outcome: GameOutcome) -> GameOutcome {
        self.phase = Phase::Ended(outcome.cause);
        self.outcome = Some(outcome);
        outcome
    }
}

/// Behaviour common to every mini-game variant. Implementors supply the
/// lifecycle core and their progress counts; scoring and transitions are shared.
pub trait ScoredGame {
    fn core(&self) -> &SessionCore;
    fn core_mut(&mut self) -> &mut SessionCore;

    /// `(correct, total)` for the score formula.
    fn progress(&self) -> (usize, usize);

    fn is_complete(&self) -> bool {
        let (correct, total) = self.progress();
        correct >= total
    }

    fn phase(&self) -> Phase {
        self.core().phase()
    }

    fn time_left(&self) -> u32 {
        self.core().time_left()
    }

    fn start(&mut self) -> Result<(), SessionError> {
        self.core_mut().start()?;
        log::debug!("mini-game started ({}s)", self.time_left());
        Ok(())
    }

    /// One second passes. Ignored before start; ends the session at zero.
    fn tick(&mut self) -> Result<Phase, SessionError> {
        match self.phase() {
            Phase::NotStarted => return Ok(Phase::NotStarted),
            Phase::Ended(_) => return Err(SessionError::AlreadyEnded),
            Phase::Active => {}
        }
        if self.core_mut().clock.tick() {
            self.finish(EndCause::Timeout);
        }
        Ok(self.phase())
    }

    /// Player ends the game early. Partial progress still scores.
    fn skip(&mut self) -> Result<GameOutcome, SessionError> {
        self.core().ensure_active()?;
        Ok(self.finish(EndCause::Skipped))
    }

    fn finish(&mut self, cause: EndCause) -> GameOutcome {
        let (correct, total) = self.progress();
        let outcome = GameOutcome::from_progress(correct, total, cause);
        log::debug!("mini-game ended: {:?}, {}/{} -> {}%", cause, correct, total, outcome.score_percent);
        self.core_mut().end(outcome)
    }

    /// End with `Completed` if the predicate now holds.
    fn settle(&mut self) -> Option<GameOutcome> {
        if self.is_complete() {
            Some(self.finish(EndCause::Completed))
        } else {
            None
        }
    }

    fn outcome(&self) -> Option<GameOutcome> {
        self.core().outcome
    }

    /// Hands out the outcome exactly once.
    fn take_outcome(&mut self) -> Option<GameOutcome> {
        let core = self.core_mut();
        if core.delivered {
            return None;
        }
        let outcome = core.outcome?;
        core.delivered = true;
        Some(outcome)
    }
}

/// Deals a board in a seed-determined order so authoring order doesn't give answers away.
pub(crate) fn deal<T>(items: &mut [T], seed: u64) {
    items.shuffle(&mut SmallRng::seed_from_u64(seed));
}

/// Seed from the browser RNG when the `rng` feature is on.
#[cfg(feature = "rng")]
pub fn entropy_seed() -> Option<u64> {
    let mut buf = [0u8; 8];
    getrandom::getrandom(&mut buf).ok()?;
    Some(u64::from_le_bytes(buf))
}

#[cfg(not(feature = "rng"))]
pub fn entropy_seed() -> Option<u64> {
    None
}

/// A running mini-game of any type.
#[derive(Clone, Debug)]
pub enum MiniGameSession {
    Matching(MatchingSession),
    Connections(ConnectionsSession),
    Quickfire(QuickfireSession),
}

impl MiniGameSession {
    pub fn new(def: &MiniGameDefinition, seed: u64, hint_threshold: u32) -> Self {
        let id = def.id.clone();
        match &def.payload {
            GamePayload::Matching { pairs } => {
                MiniGameSession::Matching(MatchingSession::new(id, pairs, def.time_limit, seed))
            }
            GamePayload::Connections { words, groups } => MiniGameSession::Connections(
                ConnectionsSession::new(id, words, groups, def.time_limit, seed, hint_threshold),
            ),
            GamePayload::Quickfire { questions } => {
                MiniGameSession::Quickfire(QuickfireSession::new(id, questions, def.time_limit))
            }
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            MiniGameSession::Matching(_) => GameKind::Matching,
            MiniGameSession::Connections(_) => GameKind::Connections,
            MiniGameSession::Quickfire(_) => GameKind::Quickfire,
        }
    }

    pub fn game_id(&self) -> &str {
        match self {
            MiniGameSession::Matching(s) => s.game_id(),
            MiniGameSession::Connections(s) => s.game_id(),
            MiniGameSession::Quickfire(s) => s.game_id(),
        }
    }

    fn scored(&self) -> &dyn ScoredGame {
        match self {
            MiniGameSession::Matching(s) => s,
            MiniGameSession::Connections(s) => s,
            MiniGameSession::Quickfire(s) => s,
        }
    }

    fn scored_mut(&mut self) -> &mut dyn ScoredGame {
        match self {
            MiniGameSession::Matching(s) => s,
            MiniGameSession::Connections(s) => s,
            MiniGameSession::Quickfire(s) => s,
        }
    }

    pub fn phase(&self) -> Phase {
        self.scored().phase()
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase(), Phase::Ended(_))
    }

    pub fn time_left(&self) -> u32 {
        self.scored().time_left()
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        self.scored_mut().start()
    }

    pub fn tick(&mut self) -> Result<Phase, SessionError> {
        self.scored_mut().tick()
    }

    pub fn skip(&mut self) -> Result<GameOutcome, SessionError> {
        self.scored_mut().skip()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.scored().outcome()
    }

    pub fn take_outcome(&mut self) -> Option<GameOutcome> {
        self.scored_mut().take_outcome()
    }

    pub fn select_card(&mut self, index: usize) -> Result<SelectResult, SessionError> {
        match self {
            MiniGameSession::Matching(s) => s.select(index),
            other => Err(SessionError::WrongGameKind(other.kind().as_str())),
        }
    }

    pub fn toggle_word(&mut self, word: &str) -> Result<bool, SessionError> {
        match self {
            MiniGameSession::Connections(s) => s.toggle(word),
            other => Err(SessionError::WrongGameKind(other.kind().as_str())),
        }
    }

    pub fn submit(&mut self) -> Result<SubmitResult, SessionError> {
        match self {
            MiniGameSession::Connections(s) => s.submit(),
            other => Err(SessionError::WrongGameKind(other.kind().as_str())),
        }
    }

    pub fn answer(&mut self, text: &str) -> Result<AnswerResult, SessionError> {
        match self {
            MiniGameSession::Quickfire(s) => s.answer(text),
            other => Err(SessionError::WrongGameKind(other.kind().as_str())),
        }
    }

    pub fn view(&self) -> GameView {
        let (correct, total) = self.scored().progress();
        let board = match self {
            MiniGameSession::Matching(s) => s.board_view(),
            MiniGameSession::Connections(s) => s.board_view(),
            MiniGameSession::Quickfire(s) => s.board_view(),
        };
        GameView {
            game_id: self.game_id().to_string(),
            phase: self.phase(),
            time_left: self.time_left(),
            correct,
            total,
            outcome: self.outcome(),
            board,
        }
    }
}

/// Snapshot of a session for rendering.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_id: String,
    pub phase: Phase,
    pub time_left: u32,
    pub correct: usize,
    pub total: usize,
    pub outcome: Option<GameOutcome>,
    pub board: BoardView,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoardView {
    Matching {
        cards: Vec<matching::CardView>,
        selected: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    Connections {
        words: Vec<String>,
        selection: Vec<String>,
        found: Vec<String>,
        wrong_attempts: u32,
        hint: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Quickfire {
        prompt: Option<String>,
        streak: u32,
        best_streak: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{AffectionImpact, QuickfireQuestion};

    fn quickfire_def() -> MiniGameDefinition {
        MiniGameDefinition {
            id: "qf".to_string(),
            title: "qf".to_string(),
            description: String::new(),
            time_limit: 3,
            affection_impact: AffectionImpact { perfect: 10, good: 5, poor: -5 },
            payload: GamePayload::Quickfire {
                questions: vec![
                    QuickfireQuestion { chinese: "你好".to_string(), english: "hello".to_string() },
                    QuickfireQuestion { chinese: "謝謝".to_string(), english: "thank you".to_string() },
                ],
            },
        }
    }

    #[test]
    fn test_tick_before_start_does_not_spend_time() {
        let mut s = MiniGameSession::new(&quickfire_def(), 1, 3);
        assert_eq!(s.tick().unwrap(), Phase::NotStarted);
        assert_eq!(s.time_left(), 3);
        assert_eq!(s.answer("hello"), Err(SessionError::NotStarted));
    }

    #[test]
    fn test_timeout_ends_with_partial_score() {
        let mut s = MiniGameSession::new(&quickfire_def(), 1, 3);
        s.start().unwrap();
        s.answer("hello").unwrap();
        s.tick().unwrap();
        s.tick().unwrap();
        assert_eq!(s.tick().unwrap(), Phase::Ended(EndCause::Timeout));
        let outcome = s.take_outcome().unwrap();
        assert_eq!(outcome.score_percent, 50);
        assert!(!outcome.success);
        assert_eq!(s.take_outcome(), None);
        assert_eq!(s.tick(), Err(SessionError::AlreadyEnded));
    }

    #[test]
    fn test_ended_session_rejects_everything() {
        let mut s = MiniGameSession::new(&quickfire_def(), 1, 3);
        s.start().unwrap();
        s.skip().unwrap();
        assert_eq!(s.start(), Err(SessionError::AlreadyEnded));
        assert_eq!(s.skip(), Err(SessionError::AlreadyEnded));
        assert_eq!(s.answer("hello"), Err(SessionError::AlreadyEnded));
    }

    #[test]
    fn test_wrong_kind_action_is_rejected() {
        let mut s = MiniGameSession::new(&quickfire_def(), 1, 3);
        s.start().unwrap();
        assert_eq!(s.submit(), Err(SessionError::WrongGameKind("quickfire")));
        assert_eq!(s.select_card(0), Err(SessionError::WrongGameKind("quickfire")));
    }

    #[test]
    fn test_deal_is_deterministic_permutation() {
        let mut a: Vec<u32> = (0..16).collect();
        let mut b = a.clone();
        deal(&mut a, 42);
        deal(&mut b, 42);
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_view_serializes_tagged_board() {
        let s = MiniGameSession::new(&quickfire_def(), 1, 3);
        let json = serde_json::to_string(&s.view()).unwrap();
        assert!(json.contains("\"type\":\"quickfire\""));
        assert!(json.contains("\"phase\":\"notStarted\""));
        assert!(json.contains("\"prompt\":\"你好\""));
    }
}
