use thiserror::Error;

/// Structural problems in authored story content. Raised once, at load time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("content has no chapters")]
    Empty,

    #[error("chapter ids must be contiguous from 1: expected {expected}, found {found}")]
    NonContiguousChapter { expected: u32, found: u32 },

    #[error("chapter {chapter}: perfect affection {perfect} must exceed required affection {required}")]
    PerfectBelowRequired { chapter: u32, required: i32, perfect: i32 },

    #[error("chapter {chapter}: required affection must not be negative")]
    NegativeRequirement { chapter: u32 },

    #[error("chapter {chapter}: voice practice reward must not be negative")]
    NegativeReward { chapter: u32 },

    #[error("chapter {chapter}: voice practice has no key phrases")]
    NoKeyPhrases { chapter: u32 },

    #[error("duplicate mini-game id '{0}'")]
    DuplicateGame(String),

    #[error("mini-game '{game}': perfect impact {perfect} is below good impact {good}")]
    ImpactOrder { game: String, perfect: i32, good: i32 },

    #[error("mini-game '{0}': time limit must be positive")]
    ZeroTimeLimit(String),

    #[error("mini-game '{0}': payload is empty")]
    EmptyPayload(String),

    #[error("mini-game '{game}': {reason}")]
    InvalidPayload { game: String, reason: String },

    #[error("content parse error: {0}")]
    Parse(String),
}

/// Misuse of a mini-game session. These are caller bugs, not player-facing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has already ended")]
    AlreadyEnded,

    #[error("session has not been started")]
    NotStarted,

    #[error("session is already running")]
    AlreadyStarted,

    #[error("no card at index {0}")]
    InvalidCard(usize),

    #[error("selection already holds {0} words")]
    SelectionFull(usize),

    #[error("word '{0}' is not on the board")]
    UnknownWord(String),

    #[error("action does not apply to a {0} game")]
    WrongGameKind(&'static str),
}

/// Persistence collaborator failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("progress store unavailable: {0}")]
    Unavailable(String),

    #[error("progress serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Conversational agent collaborator failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("conversation agent unavailable: {0}")]
    Unavailable(String),

    #[error("no conversation session is open")]
    NoSession,

    #[error("this conversation's replies come from the host")]
    Relayed,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by the story reducer and the play-through orchestrator.
#[derive(Error, Debug)]
pub enum StoryError {
    #[error("unknown chapter {0}")]
    UnknownChapter(u32),

    #[error("unknown mini-game '{0}'")]
    UnknownGame(String),

    #[error("chapter {0} is locked")]
    ChapterLocked(u32),

    #[error("no mini-game is in progress")]
    NoActiveGame,

    #[error("mini-game has not ended yet")]
    GameNotFinished,

    #[error("no voice practice is in progress")]
    NoActiveVoicePractice,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

pub type Result<T> = std::result::Result<T, StoryError>;
