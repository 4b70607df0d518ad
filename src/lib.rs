//! TaiwanScript story engine.
//!
//! The romance learning mode in rules form: timed vocabulary mini-games score
//! into affection tiers, affection moves the player through five chapters, and
//! the last chapter's finale decides one of five endings. Everything outside
//! `bridge` is plain Rust and runs natively; `bridge` exposes it to the web
//! page through `wasm-bindgen`.

use wasm_bindgen::prelude::*;

pub mod affection;
pub mod bridge;
pub mod config;
pub mod content;
pub mod ending;
pub mod error;
pub mod game;
pub mod play;
pub mod progress;
pub mod score;
pub mod store;
pub mod voice;

pub use affection::{AffectionStatus, Ledger, StatusBadge};
pub use bridge::StoryEngine;
pub use config::EngineConfig;
pub use content::{Chapter, ContentRegistry, GamePayload, MiniGameDefinition};
pub use ending::StoryEnding;
pub use error::{ContentError, SessionError, StoryError};
pub use game::{EndCause, GameOutcome, MiniGameSession, Phase, ScoredGame};
pub use play::{PlayThrough, SoftWarning};
pub use progress::{GameProgress, GatePolicy, StoryEvent, Transition};
pub use score::Tier;
pub use store::{MemoryStore, ProgressStore};
pub use voice::{AgentReply, ConversationAgent, HostRelay, PhraseCoach, VoicePracticeSession};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
