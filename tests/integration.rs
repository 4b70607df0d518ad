// Integration tests (native) for the `taiwan-script` crate.
// These avoid the browser bridge and exercise the story rules end to end.

use taiwan_script::affection::{self, AffectionStatus};
use taiwan_script::content::{ContentRegistry, GamePayload, MiniGameDefinition};
use taiwan_script::ending::{self, StoryEnding};
use taiwan_script::game::matching::Face;
use taiwan_script::game::{EndCause, MiniGameSession};
use taiwan_script::progress::{self, GameProgress, GatePolicy, StoryEvent, StoryWarning};
use taiwan_script::score::{self, Tier};
use taiwan_script::{EngineConfig, MemoryStore, PhraseCoach, PlayThrough, SoftWarning, StoryError};

fn registry() -> &'static ContentRegistry {
    ContentRegistry::builtin().expect("builtin content is valid")
}

fn def(id: &str) -> &'static MiniGameDefinition {
    registry().game(id).expect("game exists").1
}

fn match_pair(session: &mut MiniGameSession, chinese: &str, english: &str) {
    let MiniGameSession::Matching(m) = &*session else { panic!("not a matching game") };
    let a = m.find_card(chinese, Face::Source).unwrap();
    let b = m.find_card(english, Face::Target).unwrap();
    session.select_card(a).unwrap();
    session.select_card(b).unwrap();
}

// P1
#[test]
fn classifier_is_monotonic() {
    let mut last = Tier::Poor;
    for tenth in 0..=1000 {
        let tier = score::classify(tenth as f64 / 10.0);
        assert!(tier >= last, "tier dropped at {}", tenth as f64 / 10.0);
        last = tier;
    }
    assert_eq!(score::classify(89.9), Tier::Good);
    assert_eq!(score::classify(90.0), Tier::Perfect);
    assert_eq!(score::classify(69.9), Tier::Poor);
}

// P2
#[test]
fn ledger_never_goes_negative() {
    for current in [0, 1, 15, 199, 200, i32::MAX] {
        for delta in [i32::MIN, -1000, -15, -1, 0, 1, 30, i32::MAX] {
            assert!(affection::apply_delta(current, delta) >= 0, "{current} + {delta}");
        }
    }
}

// P3
#[test]
fn ending_thresholds() {
    assert_eq!(ending::resolve(199), StoryEnding::Good);
    assert_eq!(ending::resolve(200), StoryEnding::Perfect);
    assert_eq!(ending::resolve(49), StoryEnding::Failed);
    assert_eq!(ending::resolve(50), StoryEnding::Bad);
    for f in 0..=400 {
        assert!(ending::resolve(f).is_resolved());
    }
}

// P4
#[test]
fn chapter_one_is_always_unlocked() {
    assert!(progress::is_unlocked(1, &GameProgress::default()));
    let mut odd = GameProgress::new(0);
    odd.current_chapter = 0;
    assert!(progress::is_unlocked(1, &odd));
    assert!(!progress::is_unlocked(2, &odd));
}

// P5
#[test]
fn matching_replay_always_scores_100() {
    let def = def("intro_vocabulary_matching");
    let GamePayload::Matching { pairs } = &def.payload else { panic!("not matching") };
    for (seed, reversed) in [(1u64, false), (2, true), (3, false)] {
        let mut session = MiniGameSession::new(def, seed, 3);
        session.start().unwrap();
        let order: Vec<_> = if reversed { pairs.iter().rev().collect() } else { pairs.iter().collect() };
        for p in order {
            match_pair(&mut session, &p.chinese, &p.english);
        }
        let outcome = session.take_outcome().unwrap();
        assert_eq!(outcome.score_percent, 100);
        assert!(outcome.success);
    }
}

#[test]
fn scenario_a_five_of_six_before_timeout() {
    let def = def("night_market_matching");
    let GamePayload::Matching { pairs } = &def.payload else { panic!("not matching") };
    assert_eq!(pairs.len(), 6);
    let mut session = MiniGameSession::new(def, 4, 3);
    session.start().unwrap();
    for p in &pairs[..5] {
        match_pair(&mut session, &p.chinese, &p.english);
    }
    while !session.is_ended() {
        session.tick().unwrap();
    }
    let outcome = session.take_outcome().unwrap();
    assert_eq!(outcome.cause, EndCause::Timeout);
    assert_eq!(outcome.score_percent, 83);
    assert_eq!(score::classify(83.0), Tier::Good);
    assert_eq!(score::affection_delta(83.0, &def.affection_impact), def.affection_impact.good);
}

#[test]
fn scenario_b_quickfire_all_correct() {
    let def = def("note_writing_quickfire");
    let GamePayload::Quickfire { questions } = &def.payload else { panic!("not quickfire") };
    assert_eq!(questions.len(), 8);
    let mut session = MiniGameSession::new(def, 0, 3);
    session.start().unwrap();
    session.tick().unwrap();
    for q in questions {
        session.answer(&q.english).unwrap();
    }
    assert!(session.time_left() > 0);
    let outcome = session.take_outcome().unwrap();
    assert_eq!(outcome.cause, EndCause::Completed);
    assert_eq!(outcome.score_percent, 100);
    assert!(outcome.success);
    assert_eq!(score::affection_delta(100.0, &def.affection_impact), def.affection_impact.perfect);
}

#[test]
fn scenario_c_voice_reward_moves_status() {
    let progress = GameProgress::new(45);
    let t = progress::reduce(
        registry(),
        &progress,
        StoryEvent::VoicePracticeCompleted { chapter_id: 1, reward: 30 },
        GatePolicy::WarnOnly,
    )
    .unwrap();
    assert_eq!(t.progress.total_affection, 75);
    assert_eq!(affection::status_for(75), AffectionStatus::GettingCloser);
    assert_eq!(affection::status_for(75).text(), "Getting Closer");
}

#[test]
fn scenario_d_final_chapter_perfect_ending() {
    let mut progress = GameProgress::new(155);
    progress.current_chapter = 5;
    let finale =
        progress::on_chapter_finale_completed(registry(), 5, 50, &mut progress, GatePolicy::WarnOnly).unwrap();
    assert_eq!(progress.total_affection, 205);
    assert_eq!(finale.ending, Some(StoryEnding::Perfect));
    assert_eq!(progress.story_ending, StoryEnding::Perfect);
}

#[test]
fn scenario_e_skip_connections_with_one_group() {
    let def = def("classroom_connections");
    let GamePayload::Connections { groups, .. } = &def.payload else { panic!("not connections") };
    let mut session = MiniGameSession::new(def, 9, 3);
    session.start().unwrap();
    for word in &groups[0].items {
        session.toggle_word(word).unwrap();
    }
    session.submit().unwrap();
    let outcome = session.skip().unwrap();
    assert_eq!(outcome.score_percent, 33);
    assert_eq!(score::classify(33.0), Tier::Poor);

    let progress = GameProgress::new(5);
    let t = progress::reduce(
        registry(),
        &progress,
        StoryEvent::mini_game_completed(&def.id, &outcome),
        GatePolicy::WarnOnly,
    )
    .unwrap();
    assert_eq!(def.affection_impact.poor, -12);
    assert_eq!(t.progress.total_affection, 0);
}

#[test]
fn ending_is_fixed_after_first_resolution() {
    let mut progress = GameProgress::new(40);
    progress.current_chapter = 5;
    progress::on_chapter_finale_completed(registry(), 5, 20, &mut progress, GatePolicy::WarnOnly).unwrap();
    assert_eq!(progress.story_ending, StoryEnding::Bad);
    progress::on_chapter_finale_completed(registry(), 5, 200, &mut progress, GatePolicy::WarnOnly).unwrap();
    assert_eq!(progress.story_ending, StoryEnding::Bad);
}

fn solve_active_game(play: &mut PlayThrough<'static, MemoryStore>, game_id: &str) {
    play.start_mini_game(game_id).unwrap();
    match &def(game_id).payload {
        GamePayload::Matching { pairs } => {
            for p in pairs {
                let (a, b) = match play.active_game() {
                    Some(MiniGameSession::Matching(m)) => (
                        m.find_card(&p.chinese, Face::Source).unwrap(),
                        m.find_card(&p.english, Face::Target).unwrap(),
                    ),
                    _ => panic!("expected a matching game"),
                };
                play.select_card(a).unwrap();
                play.select_card(b).unwrap();
            }
        }
        GamePayload::Connections { groups, .. } => {
            for g in groups {
                for w in &g.items {
                    play.toggle_word(w).unwrap();
                }
                play.submit().unwrap();
            }
        }
        GamePayload::Quickfire { questions } => {
            for q in questions {
                play.answer(&q.english).unwrap();
            }
        }
    }
    let t = play.finish_mini_game().unwrap();
    assert_eq!(t.tier, Some(Tier::Perfect), "{game_id}");
}

#[test]
fn full_play_through_reaches_perfect_ending() {
    let config = EngineConfig { shuffle_seed: Some(2024), ..EngineConfig::default() };
    let mut play = PlayThrough::open(registry(), config, "amy", MemoryStore::new());

    for chapter in registry().chapters() {
        play.select_chapter(chapter.id).unwrap();
        for game in &chapter.mini_games {
            solve_active_game(&mut play, &game.id);
        }
        play.start_voice_practice(chapter.id, Box::new(PhraseCoach::new())).unwrap();
        for phrase in chapter.voice_practice.phrase_stems() {
            play.say(phrase).unwrap();
        }
        let (voice, _) = play.finish_voice_practice().unwrap();
        assert!(voice.reward > 0);
        assert!(voice.reward <= chapter.voice_practice.affection_reward);
    }

    let progress = play.progress();
    assert_eq!(progress.chapters_completed.len(), 5);
    assert_eq!(progress.current_chapter, 5);
    assert_eq!(progress.story_ending, StoryEnding::Perfect);
    assert!(play.warnings().is_empty());

    let saved = play.store().document("amy").unwrap();
    assert!(saved.contains("\"storyEnding\":\"perfect\""));
}

#[test]
fn progress_survives_reopen() {
    let mut store = MemoryStore::new();
    {
        let mut play = PlayThrough::open(registry(), EngineConfig::default(), "amy", store.clone());
        play.start_mini_game("intro_vocabulary_matching").unwrap();
        play.skip().unwrap();
        play.finish_mini_game().unwrap();
        store = play.store().clone();
    }
    let play = PlayThrough::open(registry(), EngineConfig::default(), "amy", store);
    assert_eq!(play.progress().total_affection, 7);
    assert!(play.progress().games_completed.contains("intro_vocabulary_matching"));
}

#[test]
fn replaying_chapter_one_is_allowed() {
    let mut play = PlayThrough::open(registry(), EngineConfig::default(), "amy", MemoryStore::new());
    for _ in 0..2 {
        play.select_chapter(1).unwrap();
        play.start_mini_game("classroom_connections").unwrap();
        play.skip().unwrap();
        play.finish_mini_game().unwrap();
    }
    assert_eq!(play.progress().total_affection, 0);
    assert_eq!(play.progress().games_completed.len(), 1);
}

#[test]
fn blocking_gate_keeps_next_chapter_locked() {
    let config = EngineConfig { gate_policy: GatePolicy::Block, shuffle_seed: Some(5), ..EngineConfig::default() };
    let mut play = PlayThrough::open(registry(), config, "amy", MemoryStore::new());

    // 15 affection and a silent finale fall short of chapter 1's 35.
    play.start_voice_practice(1, Box::new(PhraseCoach::new())).unwrap();
    let (voice, t) = play.finish_voice_practice().unwrap();
    assert_eq!(voice.reward, 0);
    assert!(t.progress.chapters_completed.contains(&1));
    assert_eq!(t.progress.current_chapter, 1);
    assert!(!play.is_unlocked(2));

    let err = play.start_mini_game("note_writing_quickfire").unwrap_err();
    assert!(matches!(err, StoryError::ChapterLocked(2)), "{err}");
    assert!(play.warnings().iter().any(|w| matches!(
        w,
        SoftWarning::Story(StoryWarning::AdvancementBlocked { chapter_id: 1, required: 35, total: 15 })
    )));
}
