//! One player's run through the story.
//!
//! `PlayThrough` ties the pieces together: it loads progress once, routes the
//! player's actions to the active mini-game or voice finale, turns finished
//! activities into `StoryEvent`s, and saves after every change. Persistence and
//! agent trouble never stop play; they are collected as soft warnings for the UI.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;

use crate::affection::StatusBadge;
use crate::config::EngineConfig;
use crate::content::{Chapter, ContentRegistry};
use crate::error::{AgentError, Result, StoryError};
use crate::game::{self, GameView, MiniGameSession, Phase, SelectResult, SubmitResult, AnswerResult};
use crate::progress::{self, ChapterStatus, GameProgress, StoryEvent, StoryWarning, Transition};
use crate::store::ProgressStore;
use crate::voice::{AgentReply, ConversationAgent, VoicePracticeSession, VoiceResult};

/// Something the player should hear about that did not stop the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SoftWarning {
    LoadFailed { reason: String },
    SaveFailed { reason: String },
    AgentUnavailable { reason: String },
    Story(StoryWarning),
}

pub struct PlayThrough<'c, S> {
    registry: &'c ContentRegistry,
    config: EngineConfig,
    user_id: String,
    store: S,
    progress: GameProgress,
    game: Option<MiniGameSession>,
    voice: Option<VoicePracticeSession>,
    rng: SmallRng,
    pending_save: bool,
    warnings: Vec<SoftWarning>,
}

impl<'c, S: ProgressStore> PlayThrough<'c, S> {
    /// Load the player's progress, starting fresh if there is none or the store fails.
    pub fn open(registry: &'c ContentRegistry, config: EngineConfig, user_id: impl Into<String>, store: S) -> Self {
        let user_id = user_id.into();
        let mut warnings = Vec::new();
        let progress = match store.load(&user_id) {
            Ok(Some(p)) => {
                log::info!("loaded progress for {}: chapter {}, affection {}", user_id, p.current_chapter, p.total_affection);
                p
            }
            Ok(None) => GameProgress::new(config.initial_affection),
            Err(e) => {
                log::warn!("could not load progress for {}, starting fresh: {}", user_id, e);
                warnings.push(SoftWarning::LoadFailed { reason: e.to_string() });
                GameProgress::new(config.initial_affection)
            }
        };
        let seed = config.shuffle_seed.or_else(game::entropy_seed).unwrap_or_default();
        Self {
            registry,
            rng: SmallRng::seed_from_u64(seed),
            config,
            user_id,
            store,
            progress,
            game: None,
            voice: None,
            pending_save: false,
            warnings,
        }
    }

    pub fn registry(&self) -> &'c ContentRegistry {
        self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn status(&self) -> StatusBadge {
        StatusBadge::for_total(self.progress.total_affection)
    }

    pub fn chapter_statuses(&self) -> Vec<ChapterStatus> {
        progress::chapter_statuses(self.registry, &self.progress)
    }

    pub fn is_unlocked(&self, chapter_id: u32) -> bool {
        self.progress.is_unlocked(chapter_id)
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save
    }

    pub fn warnings(&self) -> &[SoftWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<SoftWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Run one event through the reducer, adopt the result, and save if anything changed.
    pub fn dispatch(&mut self, event: StoryEvent) -> Result<Transition> {
        let transition = progress::reduce(self.registry, &self.progress, event, self.config.gate_policy)?;
        self.warnings.extend(transition.warnings().cloned().map(SoftWarning::Story));
        if !transition.is_noop(&self.progress) {
            self.progress = transition.progress.clone();
            self.save();
        }
        Ok(transition)
    }

    fn save(&mut self) {
        match self.store.save(&self.user_id, &self.progress) {
            Ok(()) => self.pending_save = false,
            Err(e) => {
                log::warn!("saving progress for {} failed, keeping it in memory: {}", self.user_id, e);
                self.pending_save = true;
                self.warnings.push(SoftWarning::SaveFailed { reason: e.to_string() });
            }
        }
    }

    /// Retry a save that failed earlier. Returns true once nothing is pending.
    pub fn flush(&mut self) -> bool {
        if self.pending_save {
            self.save();
        }
        !self.pending_save
    }

    pub fn select_chapter(&mut self, chapter_id: u32) -> Result<&'c Chapter> {
        self.dispatch(StoryEvent::ChapterSelected { chapter_id })?;
        self.registry.chapter(chapter_id).ok_or(StoryError::UnknownChapter(chapter_id))
    }

    // ---------------------------------------------------------------------
    // Mini-games
    // ---------------------------------------------------------------------

    fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Build and start a fresh session. Any game still running is abandoned unscored.
    pub fn start_mini_game(&mut self, game_id: &str) -> Result<GameView> {
        let (chapter, def) = self.registry.game(game_id).ok_or_else(|| StoryError::UnknownGame(game_id.to_string()))?;
        if !self.progress.is_unlocked(chapter.id) {
            return Err(StoryError::ChapterLocked(chapter.id));
        }
        if let Some(old) = self.game.take() {
            if !old.is_ended() {
                log::debug!("abandoning unfinished mini-game {}", old.game_id());
            }
        }
        let seed = self.next_seed();
        let mut session = MiniGameSession::new(def, seed, self.config.hint_threshold);
        session.start()?;
        let view = session.view();
        self.game = Some(session);
        Ok(view)
    }

    pub fn active_game(&self) -> Option<&MiniGameSession> {
        self.game.as_ref()
    }

    fn game_mut(&mut self) -> Result<&mut MiniGameSession> {
        self.game.as_mut().ok_or(StoryError::NoActiveGame)
    }

    pub fn game_view(&self) -> Option<GameView> {
        self.game.as_ref().map(MiniGameSession::view)
    }

    pub fn tick(&mut self) -> Result<Phase> {
        Ok(self.game_mut()?.tick()?)
    }

    pub fn select_card(&mut self, index: usize) -> Result<SelectResult> {
        Ok(self.game_mut()?.select_card(index)?)
    }

    pub fn toggle_word(&mut self, word: &str) -> Result<bool> {
        Ok(self.game_mut()?.toggle_word(word)?)
    }

    pub fn submit(&mut self) -> Result<SubmitResult> {
        Ok(self.game_mut()?.submit()?)
    }

    pub fn answer(&mut self, text: &str) -> Result<AnswerResult> {
        Ok(self.game_mut()?.answer(text)?)
    }

    pub fn skip(&mut self) -> Result<GameView> {
        let game = self.game_mut()?;
        game.skip()?;
        Ok(game.view())
    }

    /// Score the ended session and apply its affection change.
    pub fn finish_mini_game(&mut self) -> Result<Transition> {
        let game = self.game.as_mut().ok_or(StoryError::NoActiveGame)?;
        if !game.is_ended() {
            return Err(StoryError::GameNotFinished);
        }
        let outcome = game.take_outcome().ok_or(StoryError::GameNotFinished)?;
        let event = StoryEvent::mini_game_completed(game.game_id(), &outcome);
        self.game = None;
        self.dispatch(event)
    }

    // ---------------------------------------------------------------------
    // Voice practice
    // ---------------------------------------------------------------------

    pub fn start_voice_practice(&mut self, chapter_id: u32, agent: Box<dyn ConversationAgent>) -> Result<()> {
        let chapter = self.registry.chapter(chapter_id).ok_or(StoryError::UnknownChapter(chapter_id))?;
        if !self.progress.is_unlocked(chapter_id) {
            return Err(StoryError::ChapterLocked(chapter_id));
        }
        let session = VoicePracticeSession::open(agent, &self.user_id, chapter);
        if let Some(reason) = session.degraded_reason() {
            self.warnings.push(SoftWarning::AgentUnavailable { reason: reason.to_string() });
        }
        self.voice = Some(session);
        Ok(())
    }

    pub fn active_voice_practice(&self) -> Option<&VoicePracticeSession> {
        self.voice.as_ref()
    }

    pub fn say(&mut self, text: &str) -> Result<AgentReply> {
        let voice = self.voice.as_mut().ok_or(StoryError::NoActiveVoicePractice)?;
        let was_degraded = voice.is_degraded();
        voice.say(text).map_err(|e| {
            if !was_degraded && e != AgentError::Relayed {
                self.warnings.push(SoftWarning::AgentUnavailable { reason: e.to_string() });
            }
            StoryError::Agent(e)
        })
    }

    /// Folds in a reply the page fetched from the remote agent. Returns the reward so far.
    pub fn record_agent_reply(&mut self, text: &str, reply: &AgentReply) -> Result<i32> {
        let voice = self.voice.as_mut().ok_or(StoryError::NoActiveVoicePractice)?;
        voice.record_reply(text, reply)?;
        Ok(voice.reward())
    }

    /// The host lost the agent (speech service down, network gone).
    pub fn agent_failed(&mut self, reason: &str) -> Result<()> {
        let voice = self.voice.as_mut().ok_or(StoryError::NoActiveVoicePractice)?;
        voice.mark_unavailable(reason);
        self.warnings.push(SoftWarning::AgentUnavailable { reason: reason.to_string() });
        Ok(())
    }

    /// End the conversation and run the chapter finale with whatever reward it earned.
    pub fn finish_voice_practice(&mut self) -> Result<(VoiceResult, Transition)> {
        let voice = self.voice.take().ok_or(StoryError::NoActiveVoicePractice)?;
        let result = voice.finish();
        let transition = self.dispatch(StoryEvent::VoicePracticeCompleted {
            chapter_id: result.chapter_id,
            reward: result.reward,
        })?;
        Ok((result, transition))
    }
}
