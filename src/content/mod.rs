//! Story content: chapters, their mini-games and voice-practice finales.
//!
//! Content is immutable once loaded. `ContentRegistry` validates everything up
//! front and indexes mini-games by id, so the scoring code never has to second
//! guess the shape of a game. The builtin story lives in `chapterN.rs` files
//! (one per chapter) and is assembled once behind a `OnceLock`.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::game::connections::MAX_SELECTION;

mod chapter1;
mod chapter2;
mod chapter3;
mod chapter4;
mod chapter5;

/// Signed affection change per performance tier. `perfect >= good`; `poor` is
/// usually a penalty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectionImpact {
    pub perfect: i32,
    pub good: i32,
    pub poor: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub chinese: String,
    #[serde(default)]
    pub pinyin: String,
    pub english: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsGroup {
    pub category: String,
    pub items: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickfireQuestion {
    pub chinese: String,
    pub english: String,
}

/// Type-specific mini-game content, tagged by `type` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GamePayload {
    Matching { pairs: Vec<WordPair> },
    Connections { words: Vec<String>, groups: Vec<ConnectionsGroup> },
    Quickfire { questions: Vec<QuickfireQuestion> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Matching,
    Connections,
    Quickfire,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Matching => "matching",
            GameKind::Connections => "connections",
            GameKind::Quickfire => "quickfire",
        }
    }
}

impl GamePayload {
    pub fn kind(&self) -> GameKind {
        match self {
            GamePayload::Matching { .. } => GameKind::Matching,
            GamePayload::Connections { .. } => GameKind::Connections,
            GamePayload::Quickfire { .. } => GameKind::Quickfire,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            GamePayload::Matching { pairs } => pairs.is_empty(),
            GamePayload::Connections { groups, .. } => groups.is_empty(),
            GamePayload::Quickfire { questions } => questions.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniGameDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Countdown length in seconds.
    pub time_limit: u32,
    pub affection_impact: AffectionImpact,
    #[serde(flatten)]
    pub payload: GamePayload,
}

impl MiniGameDefinition {
    pub fn kind(&self) -> GameKind {
        self.payload.kind()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub chinese: String,
    pub pinyin: String,
    pub english: String,
    #[serde(default)]
    pub context: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoicePracticeDefinition {
    pub scenario: String,
    pub objective: String,
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub cultural_context: Vec<String>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    /// Upper bound on what the finale can grant.
    pub affection_reward: i32,
}

impl VoicePracticeDefinition {
    /// The Chinese half of each key phrase: `"你人真好 (You're really nice)"` -> `"你人真好"`.
    pub fn phrase_stems(&self) -> Vec<&str> {
        self.key_phrases
            .iter()
            .map(|p| p.split('(').next().unwrap_or(p).trim())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub setting: String,
    /// Affection needed to continue past this chapter.
    pub required_affection: i32,
    /// Bonus threshold; reaching it marks the chapter perfect.
    pub perfect_affection: i32,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyItem>,
    pub mini_games: Vec<MiniGameDefinition>,
    pub voice_practice: VoicePracticeDefinition,
}

/// Immutable, validated content indexed by chapter and mini-game id.
#[derive(Clone, Debug)]
pub struct ContentRegistry {
    chapters: Vec<Chapter>,
    // game id -> (chapter index, game index)
    games: HashMap<String, (usize, usize)>,
}

impl ContentRegistry {
    pub fn new(chapters: Vec<Chapter>) -> Result<Self, ContentError> {
        if chapters.is_empty() {
            return Err(ContentError::Empty);
        }
        let mut games = HashMap::new();
        for (ci, chapter) in chapters.iter().enumerate() {
            let expected = ci as u32 + 1;
            if chapter.id != expected {
                return Err(ContentError::NonContiguousChapter { expected, found: chapter.id });
            }
            validate_chapter(chapter)?;
            for (gi, game) in chapter.mini_games.iter().enumerate() {
                validate_game(game)?;
                if games.insert(game.id.clone(), (ci, gi)).is_some() {
                    return Err(ContentError::DuplicateGame(game.id.clone()));
                }
            }
        }
        Ok(Self { chapters, games })
    }

    /// Load chapters from a JSON array (same camelCase shape the registry serializes to).
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let chapters: Vec<Chapter> =
            serde_json::from_str(json).map_err(|e| ContentError::Parse(e.to_string()))?;
        Self::new(chapters)
    }

    /// The story shipped with the app, built and validated on first use.
    pub fn builtin() -> Result<&'static ContentRegistry, ContentError> {
        static BUILTIN: OnceLock<Result<ContentRegistry, ContentError>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                ContentRegistry::new(vec![
                    chapter1::chapter(),
                    chapter2::chapter(),
                    chapter3::chapter(),
                    chapter4::chapter(),
                    chapter5::chapter(),
                ])
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, id: u32) -> Option<&Chapter> {
        let idx = (id as usize).checked_sub(1)?;
        self.chapters.get(idx)
    }

    pub fn chapter_count(&self) -> u32 {
        self.chapters.len() as u32
    }

    pub fn final_chapter_id(&self) -> u32 {
        self.chapter_count()
    }

    /// Look up a mini-game together with the chapter that owns it.
    pub fn game(&self, id: &str) -> Option<(&Chapter, &MiniGameDefinition)> {
        let &(ci, gi) = self.games.get(id)?;
        let chapter = &self.chapters[ci];
        Some((chapter, &chapter.mini_games[gi]))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.chapters)
    }
}

fn validate_chapter(chapter: &Chapter) -> Result<(), ContentError> {
    let id = chapter.id;
    if chapter.required_affection < 0 {
        return Err(ContentError::NegativeRequirement { chapter: id });
    }
    if chapter.perfect_affection <= chapter.required_affection {
        return Err(ContentError::PerfectBelowRequired {
            chapter: id,
            required: chapter.required_affection,
            perfect: chapter.perfect_affection,
        });
    }
    if chapter.voice_practice.affection_reward < 0 {
        return Err(ContentError::NegativeReward { chapter: id });
    }
    if chapter.voice_practice.phrase_stems().is_empty() {
        return Err(ContentError::NoKeyPhrases { chapter: id });
    }
    Ok(())
}

fn invalid(game: &MiniGameDefinition, reason: impl Into<String>) -> ContentError {
    ContentError::InvalidPayload { game: game.id.clone(), reason: reason.into() }
}

fn validate_game(game: &MiniGameDefinition) -> Result<(), ContentError> {
    let impact = game.affection_impact;
    if impact.perfect < impact.good {
        return Err(ContentError::ImpactOrder {
            game: game.id.clone(),
            perfect: impact.perfect,
            good: impact.good,
        });
    }
    if game.time_limit == 0 {
        return Err(ContentError::ZeroTimeLimit(game.id.clone()));
    }
    if game.payload.is_empty() {
        return Err(ContentError::EmptyPayload(game.id.clone()));
    }
    match &game.payload {
        GamePayload::Matching { pairs } => {
            let mut seen = HashSet::new();
            for pair in pairs {
                if pair.chinese.trim().is_empty() || pair.english.trim().is_empty() {
                    return Err(invalid(game, "matching pair with an empty face"));
                }
                if !seen.insert(pair.chinese.as_str()) {
                    return Err(invalid(game, format!("duplicate pair '{}'", pair.chinese)));
                }
            }
        }
        GamePayload::Connections { words, groups } => {
            let board: HashSet<&str> = words.iter().map(String::as_str).collect();
            if board.len() != words.len() {
                return Err(invalid(game, "duplicate word on the board"));
            }
            let mut grouped = HashSet::new();
            for group in groups {
                if group.items.is_empty() || group.items.len() > MAX_SELECTION {
                    return Err(invalid(
                        game,
                        format!("group '{}' must hold 1..={} words", group.category, MAX_SELECTION),
                    ));
                }
                for item in &group.items {
                    if !board.contains(item.as_str()) {
                        return Err(invalid(game, format!("'{}' is grouped but not on the board", item)));
                    }
                    if !grouped.insert(item.as_str()) {
                        return Err(invalid(game, format!("'{}' belongs to two groups", item)));
                    }
                }
            }
        }
        GamePayload::Quickfire { questions } => {
            if questions.iter().any(|q| q.english.trim().is_empty()) {
                return Err(invalid(game, "question without an expected answer"));
            }
        }
    }
    Ok(())
}

// --- Authoring helpers used by the chapterN files ---------------------------

fn text(s: &str) -> String {
    s.to_string()
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn vocabulary(items: &[(&str, &str, &str, &str)]) -> Vec<VocabularyItem> {
    items
        .iter()
        .map(|&(chinese, pinyin, english, context)| VocabularyItem {
            chinese: text(chinese),
            pinyin: text(pinyin),
            english: text(english),
            context: text(context),
        })
        .collect()
}

fn pairs(items: &[(&str, &str, &str)]) -> GamePayload {
    GamePayload::Matching {
        pairs: items
            .iter()
            .map(|&(chinese, pinyin, english)| WordPair {
                chinese: text(chinese),
                pinyin: text(pinyin),
                english: text(english),
            })
            .collect(),
    }
}

fn questions(items: &[(&str, &str)]) -> GamePayload {
    GamePayload::Quickfire {
        questions: items
            .iter()
            .map(|&(chinese, english)| QuickfireQuestion { chinese: text(chinese), english: text(english) })
            .collect(),
    }
}

/// Board words are taken from the groups in authoring order; sessions shuffle them.
fn connections(groups: &[(&str, &str, [&str; 4], Option<&str>)]) -> GamePayload {
    let groups: Vec<ConnectionsGroup> = groups
        .iter()
        .map(|&(category, color, items, note)| ConnectionsGroup {
            category: text(category),
            items: texts(&items),
            color: text(color),
            cultural_note: note.map(text),
        })
        .collect();
    let words = groups.iter().flat_map(|g| g.items.iter().cloned()).collect();
    GamePayload::Connections { words, groups }
}

fn impact(perfect: i32, good: i32, poor: i32) -> AffectionImpact {
    AffectionImpact { perfect, good, poor }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, payload: GamePayload) -> MiniGameDefinition {
        MiniGameDefinition {
            id: text(id),
            title: text("t"),
            description: String::new(),
            time_limit: 60,
            affection_impact: impact(10, 5, -5),
            payload,
        }
    }

    fn chapter(id: u32, games: Vec<MiniGameDefinition>) -> Chapter {
        Chapter {
            id,
            title: format!("chapter {id}"),
            subtitle: String::new(),
            description: String::new(),
            setting: String::new(),
            required_affection: 10,
            perfect_affection: 20,
            vocabulary: vec![],
            mini_games: games,
            voice_practice: VoicePracticeDefinition {
                scenario: text("s"),
                objective: text("o"),
                key_phrases: texts(&["你好 (Hello)"]),
                cultural_context: vec![],
                success_criteria: vec![],
                affection_reward: 30,
            },
        }
    }

    #[test]
    fn test_builtin_story_is_valid() {
        let registry = ContentRegistry::builtin().unwrap();
        assert_eq!(registry.chapter_count(), 5);
        assert_eq!(registry.final_chapter_id(), 5);
        let (owner, def) = registry.game("intro_vocabulary_matching").unwrap();
        assert_eq!(owner.id, 1);
        assert_eq!(def.kind(), GameKind::Matching);
    }

    #[test]
    fn test_rejects_gap_in_chapter_ids() {
        let err = ContentRegistry::new(vec![chapter(1, vec![]), chapter(3, vec![])]).unwrap_err();
        assert_eq!(err, ContentError::NonContiguousChapter { expected: 2, found: 3 });
    }

    #[test]
    fn test_rejects_inverted_impact() {
        let mut g = game("m", pairs(&[("你", "nǐ", "you")]));
        g.affection_impact = impact(5, 10, -1);
        let err = ContentRegistry::new(vec![chapter(1, vec![g])]).unwrap_err();
        assert!(matches!(err, ContentError::ImpactOrder { .. }));
    }

    #[test]
    fn test_rejects_empty_payload_and_duplicates() {
        let empty = game("q", GamePayload::Quickfire { questions: vec![] });
        assert_eq!(
            ContentRegistry::new(vec![chapter(1, vec![empty])]).unwrap_err(),
            ContentError::EmptyPayload(text("q"))
        );

        let a = game("dup", pairs(&[("你", "nǐ", "you")]));
        let b = game("dup", questions(&[("你", "you")]));
        assert_eq!(
            ContentRegistry::new(vec![chapter(1, vec![a]), chapter(2, vec![b])]).unwrap_err(),
            ContentError::DuplicateGame(text("dup"))
        );
    }

    #[test]
    fn test_rejects_group_word_missing_from_board() {
        let payload = GamePayload::Connections {
            words: texts(&["一", "二"]),
            groups: vec![ConnectionsGroup {
                category: text("numbers"),
                items: texts(&["一", "三"]),
                color: String::new(),
                cultural_note: None,
            }],
        };
        let err = ContentRegistry::new(vec![chapter(1, vec![game("c", payload)])]).unwrap_err();
        assert!(matches!(err, ContentError::InvalidPayload { .. }));
    }

    #[test]
    fn test_json_shape_round_trips_through_registry() {
        let registry = ContentRegistry::builtin().unwrap();
        let json = registry.to_json().unwrap();
        assert!(json.contains("\"type\":\"connections\""));
        assert!(json.contains("\"affectionImpact\""));
        let reloaded = ContentRegistry::from_json(&json).unwrap();
        assert_eq!(reloaded.chapters(), registry.chapters());
    }

    #[test]
    fn test_phrase_stems() {
        let c = chapter(1, vec![]);
        assert_eq!(c.voice_practice.phrase_stems(), vec!["你好"]);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(ContentRegistry::from_json("{"), Err(ContentError::Parse(_))));
    }
}
