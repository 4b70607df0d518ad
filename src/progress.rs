//! Per-user story progress and the rules that move it forward.
//!
//! `reduce` is the only place progress changes. It takes the current record and
//! a named event, and returns the next record plus what happened, leaving the
//! caller's copy untouched. The UI dispatches events and renders the result.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::affection::{self, Ledger};
use crate::content::ContentRegistry;
use crate::ending::{self, StoryEnding};
use crate::error::{Result, StoryError};
use crate::game::GameOutcome;
use crate::score::{self, Tier};

/// Affection a brand-new play-through starts with.
pub const DEFAULT_INITIAL_AFFECTION: i32 = 15;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameProgress {
    /// Highest chapter the player may enter.
    pub current_chapter: u32,
    pub total_affection: i32,
    #[serde(default)]
    pub chapters_completed: BTreeSet<u32>,
    #[serde(default)]
    pub games_completed: BTreeSet<String>,
    #[serde(default)]
    pub perfect_chapters: BTreeSet<u32>,
    #[serde(default)]
    pub story_ending: StoryEnding,
}

impl Default for GameProgress {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_AFFECTION)
    }
}

impl GameProgress {
    pub fn new(initial_affection: i32) -> Self {
        Self {
            current_chapter: 1,
            total_affection: initial_affection.max(0),
            chapters_completed: BTreeSet::new(),
            games_completed: BTreeSet::new(),
            perfect_chapters: BTreeSet::new(),
            story_ending: StoryEnding::Incomplete,
        }
    }

    pub fn is_unlocked(&self, chapter_id: u32) -> bool {
        is_unlocked(chapter_id, self)
    }

    pub fn is_finished(&self) -> bool {
        self.story_ending.is_resolved()
    }
}

/// Chapter 1 is always open; anything else needs `current_chapter` to have reached it.
pub fn is_unlocked(chapter_id: u32, progress: &GameProgress) -> bool {
    chapter_id == 1 || chapter_id <= progress.current_chapter
}

/// The chapter after `chapter_id`, capped at the last one.
pub fn next_chapter_id(chapter_id: u32, chapter_count: u32) -> u32 {
    (chapter_id + 1).min(chapter_count)
}

/// What happens when a finale leaves the player short of a chapter's requirement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GatePolicy {
    /// Unlock the next chapter anyway and report the shortfall.
    #[default]
    WarnOnly,
    /// Keep the next chapter locked until the requirement is met.
    Block,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoryEvent {
    #[serde(rename_all = "camelCase")]
    ChapterSelected { chapter_id: u32 },
    #[serde(rename_all = "camelCase")]
    MiniGameCompleted { game_id: String, score_percent: u8 },
    #[serde(rename_all = "camelCase")]
    VoicePracticeCompleted { chapter_id: u32, reward: i32 },
}

impl StoryEvent {
    pub fn mini_game_completed(game_id: impl Into<String>, outcome: &GameOutcome) -> Self {
        StoryEvent::MiniGameCompleted { game_id: game_id.into(), score_percent: outcome.score_percent }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoryWarning {
    /// Finale finished below the chapter's requirement; the next chapter opened anyway.
    #[serde(rename_all = "camelCase")]
    BelowRequired { chapter_id: u32, required: i32, total: i32 },
    /// Same shortfall under `GatePolicy::Block`; the next chapter stays locked.
    #[serde(rename_all = "camelCase")]
    AdvancementBlocked { chapter_id: u32, required: i32, total: i32 },
}

/// Result of the finale rule for one chapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinaleOutcome {
    pub chapter_id: u32,
    pub unlocked: Option<u32>,
    pub perfect: bool,
    pub warning: Option<StoryWarning>,
    /// Set only on the transition that resolves the ending.
    pub ending: Option<StoryEnding>,
}

/// Next state after one event, plus what the UI may want to show about it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub progress: GameProgress,
    /// Change that actually landed after the zero floor.
    pub affection_change: i32,
    pub tier: Option<Tier>,
    pub finale: Option<FinaleOutcome>,
}

impl Transition {
    fn unchanged(progress: &GameProgress) -> Self {
        Self { progress: progress.clone(), affection_change: 0, tier: None, finale: None }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &StoryWarning> {
        self.finale.iter().filter_map(|f| f.warning.as_ref())
    }

    pub fn is_noop(&self, before: &GameProgress) -> bool {
        self.progress == *before
    }
}

/// Apply a chapter finale's reward and advance the gate.
pub fn on_chapter_finale_completed(
    registry: &ContentRegistry,
    chapter_id: u32,
    reward: i32,
    progress: &mut GameProgress,
    policy: GatePolicy,
) -> Result<FinaleOutcome> {
    let chapter = registry.chapter(chapter_id).ok_or(StoryError::UnknownChapter(chapter_id))?;
    let total = affection::apply_delta(progress.total_affection, reward);
    progress.total_affection = total;
    progress.chapters_completed.insert(chapter_id);

    let short = total < chapter.required_affection;
    let mut warning = None;
    let mut unlocked = None;
    if chapter_id < registry.chapter_count() {
        let next = next_chapter_id(chapter_id, registry.chapter_count());
        if short && policy == GatePolicy::Block {
            warning = Some(StoryWarning::AdvancementBlocked {
                chapter_id,
                required: chapter.required_affection,
                total,
            });
        } else {
            if short {
                warning = Some(StoryWarning::BelowRequired {
                    chapter_id,
                    required: chapter.required_affection,
                    total,
                });
            }
            if next > progress.current_chapter {
                progress.current_chapter = next;
                unlocked = Some(next);
            }
        }
    }
    if let Some(w) = &warning {
        log::warn!("chapter {} finished short of its requirement: {:?}", chapter_id, w);
    }

    let perfect = total >= chapter.perfect_affection;
    if perfect {
        progress.perfect_chapters.insert(chapter_id);
    }

    let mut resolved = None;
    if chapter_id == registry.final_chapter_id() && !progress.story_ending.is_resolved() {
        let e = ending::resolve(total);
        progress.story_ending = e;
        resolved = Some(e);
        log::info!("story finished with {} affection: {}", total, e.title());
    }

    log::info!("chapter {} complete, affection {}", chapter_id, total);
    Ok(FinaleOutcome { chapter_id, unlocked, perfect, warning, ending: resolved })
}

/// The single state-transition function for a play-through.
pub fn reduce(
    registry: &ContentRegistry,
    progress: &GameProgress,
    event: StoryEvent,
    policy: GatePolicy,
) -> Result<Transition> {
    match event {
        StoryEvent::ChapterSelected { chapter_id } => {
            registry.chapter(chapter_id).ok_or(StoryError::UnknownChapter(chapter_id))?;
            if !progress.is_unlocked(chapter_id) {
                return Err(StoryError::ChapterLocked(chapter_id));
            }
            Ok(Transition::unchanged(progress))
        }
        StoryEvent::MiniGameCompleted { game_id, score_percent } => {
            let (chapter, game) = registry.game(&game_id).ok_or_else(|| StoryError::UnknownGame(game_id.clone()))?;
            if !progress.is_unlocked(chapter.id) {
                return Err(StoryError::ChapterLocked(chapter.id));
            }
            let score = f64::from(score_percent);
            let tier = score::classify(score);
            let delta = score::resolve_delta(tier, &game.affection_impact);

            let mut next = progress.clone();
            let mut ledger = Ledger::new(next.total_affection);
            let landed = ledger.apply(delta);
            next.total_affection = ledger.total();
            next.games_completed.insert(game_id);
            log::debug!("{} scored {}% ({}), affection {:+}", game.id, score_percent, tier, landed);
            Ok(Transition {
                affection_change: landed,
                progress: next,
                tier: Some(tier),
                finale: None,
            })
        }
        StoryEvent::VoicePracticeCompleted { chapter_id, reward } => {
            registry.chapter(chapter_id).ok_or(StoryError::UnknownChapter(chapter_id))?;
            if !progress.is_unlocked(chapter_id) {
                return Err(StoryError::ChapterLocked(chapter_id));
            }
            let mut next = progress.clone();
            let before = next.total_affection;
            let finale = on_chapter_finale_completed(registry, chapter_id, reward, &mut next, policy)?;
            Ok(Transition {
                affection_change: next.total_affection - before,
                progress: next,
                tier: None,
                finale: Some(finale),
            })
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChapterState {
    Locked,
    Unlocked,
    Completed,
    Perfect,
}

/// Overview row for one chapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterStatus {
    pub id: u32,
    pub title: String,
    pub state: ChapterState,
    pub games_completed: usize,
    pub games_total: usize,
    /// Affection still missing before `required_affection`; 0 once met.
    pub affection_gap: i32,
}

pub fn chapter_statuses(registry: &ContentRegistry, progress: &GameProgress) -> Vec<ChapterStatus> {
    registry
        .chapters()
        .iter()
        .map(|c| {
            let state = if progress.perfect_chapters.contains(&c.id) {
                ChapterState::Perfect
            } else if progress.chapters_completed.contains(&c.id) {
                ChapterState::Completed
            } else if progress.is_unlocked(c.id) {
                ChapterState::Unlocked
            } else {
                ChapterState::Locked
            };
            ChapterStatus {
                id: c.id,
                title: c.title.clone(),
                state,
                games_completed: c.mini_games.iter().filter(|g| progress.games_completed.contains(&g.id)).count(),
                games_total: c.mini_games.len(),
                affection_gap: (c.required_affection - progress.total_affection).max(0),
            }
        })
        .collect()
}
