// Invariants over the builtin story content.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use taiwan_script::content::{ContentRegistry, GamePayload};
use taiwan_script::game::connections::MAX_SELECTION;

fn registry() -> &'static ContentRegistry {
    ContentRegistry::builtin().expect("builtin content is valid")
}

#[test]
fn five_contiguous_chapters() {
    let ids: Vec<u32> = registry().chapters().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(registry().final_chapter_id(), 5);
}

#[test]
fn requirements_rise_chapter_by_chapter() {
    let chapters = registry().chapters();
    for pair in chapters.windows(2) {
        assert!(
            pair[1].required_affection > pair[0].required_affection,
            "chapter {} does not ask for more than chapter {}",
            pair[1].id,
            pair[0].id
        );
    }
    for c in chapters {
        assert!(c.perfect_affection > c.required_affection, "chapter {}", c.id);
    }
    assert_eq!(chapters.last().unwrap().perfect_affection, 200);
}

#[test]
fn every_game_id_is_unique_and_resolvable() {
    let mut seen = HashSet::new();
    for c in registry().chapters() {
        assert!(!c.mini_games.is_empty(), "chapter {} has no mini-games", c.id);
        for g in &c.mini_games {
            assert!(seen.insert(g.id.as_str()), "duplicate game id '{}'", g.id);
            let (owner, _) = registry().game(&g.id).unwrap();
            assert_eq!(owner.id, c.id);
            assert!(g.affection_impact.perfect >= g.affection_impact.good);
            assert!(g.affection_impact.poor < 0, "'{}' has no penalty for a poor run", g.id);
        }
    }
}

#[test]
fn payloads_are_playable() {
    for c in registry().chapters() {
        for g in &c.mini_games {
            match &g.payload {
                GamePayload::Matching { pairs } => {
                    let english: HashSet<&str> = pairs.iter().map(|p| p.english.as_str()).collect();
                    assert_eq!(english.len(), pairs.len(), "'{}' repeats an English face", g.id);
                    assert!(pairs.iter().all(|p| !p.pinyin.is_empty()), "'{}' is missing pinyin", g.id);
                }
                GamePayload::Connections { words, groups } => {
                    assert!(groups.iter().all(|gr| gr.items.len() == MAX_SELECTION), "'{}'", g.id);
                    let total: usize = groups.iter().map(|gr| gr.items.len()).sum();
                    assert_eq!(total, words.len(), "'{}' has words outside every group", g.id);
                }
                GamePayload::Quickfire { questions } => {
                    let prompts: HashSet<&str> = questions.iter().map(|q| q.chinese.as_str()).collect();
                    assert_eq!(prompts.len(), questions.len(), "'{}' repeats a prompt", g.id);
                }
            }
        }
    }
}

#[test]
fn voice_practice_has_phrases_and_reward() {
    for c in registry().chapters() {
        let vp = &c.voice_practice;
        assert!(vp.affection_reward > 0, "chapter {}", c.id);
        let stems = vp.phrase_stems();
        assert_eq!(stems.len(), vp.key_phrases.len(), "chapter {} has a phrase without Chinese", c.id);
        let unique: HashSet<&str> = stems.iter().copied().collect();
        assert_eq!(unique.len(), stems.len(), "chapter {} repeats a key phrase", c.id);
    }
}

#[test]
fn builtin_content_reloads_from_json() {
    let json = registry().to_json().unwrap();
    let reloaded = ContentRegistry::from_json(&json).unwrap();
    assert_eq!(reloaded.chapters(), registry().chapters());
}
