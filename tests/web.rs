// Browser tests for the wasm bridge. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use taiwan_script::StoryEngine;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn engine_round_trip() {
    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.remove_item("ts.test.web-test").unwrap();

    let engine = StoryEngine::new("web-test", r#"{"shuffleSeed":1,"storageKeyPrefix":"ts.test."}"#).unwrap();
    assert!(engine.is_unlocked(1).unwrap());
    assert!(!engine.is_unlocked(2).unwrap());

    let view = engine.start_game("classroom_connections").unwrap();
    assert!(view.contains("\"type\":\"connections\""));
    engine.skip().unwrap();
    let transition = engine.finish_game().unwrap();
    assert!(transition.contains("\"affectionChange\":-12"));

    let progress = engine.progress().unwrap();
    assert!(progress.contains("\"totalAffection\":3"));
    assert!(engine.flush().unwrap());
}

#[wasm_bindgen_test]
fn locked_chapter_is_an_error() {
    let engine = StoryEngine::new("web-test-locked", "").unwrap();
    assert!(engine.start_game("typhoon_matching").is_err());
    assert_eq!(engine.game_view().unwrap(), "null");
}

#[wasm_bindgen_test]
fn remote_agent_replies_are_rewarded() {
    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    storage.remove_item("ts.test.web-remote").unwrap();

    let engine = StoryEngine::new("web-remote", r#"{"storageKeyPrefix":"ts.test."}"#).unwrap();
    engine.start_remote_voice(1, "agent-session-1").unwrap();
    assert!(engine.say("你好").is_err());
    let reward = engine
        .record_agent_reply("台灣真的很美", r#"{"responseText":"謝謝！","toolResults":[{"tool":"affection_update","change":12}]}"#)
        .unwrap();
    assert_eq!(reward, 12);
    assert!(engine.record_agent_reply("嗯", "not json").is_err());

    let finish = engine.finish_voice().unwrap();
    assert!(finish.contains("\"reward\":12"));
    assert!(engine.is_unlocked(2).unwrap());
}
