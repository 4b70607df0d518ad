//! Browser surface. The page creates one `StoryEngine`, forwards UI events to it
//! and renders the JSON it returns. The play-through itself lives in a
//! thread-local slot so timer callbacks and event handlers share it.

use std::cell::RefCell;
use std::fmt::Display;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::affection::StatusBadge;
use crate::config::EngineConfig;
use crate::content::ContentRegistry;
use crate::ending::{self, EndingRequirement, StoryEnding};
use crate::play::{PlayThrough, SoftWarning};
use crate::progress::{ChapterStatus, Transition};
use crate::store::BrowserStore;
use crate::voice::{AgentReply, HostRelay, PhraseCoach, VoiceResult};

thread_local! {
    static ENGINE: RefCell<Option<PlayThrough<'static, BrowserStore>>> = RefCell::new(None);
}

fn js_err(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

fn with_engine<R>(f: impl FnOnce(&mut PlayThrough<'static, BrowserStore>) -> Result<R, JsValue>) -> Result<R, JsValue> {
    ENGINE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let play = slot.as_mut().ok_or_else(|| JsValue::from_str("story engine not initialised"))?;
        f(play)
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView {
    badge: StatusBadge,
    chapters: Vec<ChapterStatus>,
    requirements: Vec<EndingRequirement>,
    ending: StoryEnding,
    ending_title: &'static str,
    pending_save: bool,
    warnings: Vec<SoftWarning>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceFinish {
    voice: VoiceResult,
    transition: Transition,
}

#[wasm_bindgen]
pub struct StoryEngine {
    user_id: String,
}

#[wasm_bindgen]
impl StoryEngine {
    /// Loads the player's progress and replaces any engine created earlier.
    #[wasm_bindgen(constructor)]
    pub fn new(user_id: &str, config_json: &str) -> Result<StoryEngine, JsValue> {
        let config = EngineConfig::from_json(config_json).map_err(js_err)?;
        // A second engine on the same page keeps the logger from the first.
        let _ = console_log::init_with_level(config.level());
        let registry = ContentRegistry::builtin().map_err(js_err)?;
        let store = BrowserStore::new(config.storage_key_prefix.clone());
        let play = PlayThrough::open(registry, config, user_id, store);
        ENGINE.with(|cell| cell.replace(Some(play)));
        log::info!("story engine ready for {}", user_id);
        Ok(StoryEngine { user_id: user_id.to_string() })
    }

    #[wasm_bindgen(getter)]
    pub fn user_id(&self) -> String {
        self.user_id.clone()
    }

    pub fn chapters(&self) -> Result<String, JsValue> {
        ContentRegistry::builtin().map_err(js_err)?.to_json().map_err(js_err)
    }

    pub fn progress(&self) -> Result<String, JsValue> {
        with_engine(|p| to_json(p.progress()))
    }

    /// Badge, chapter overview, ending requirements, and any warnings gathered
    /// since the last call.
    pub fn status(&self) -> Result<String, JsValue> {
        with_engine(|p| {
            let total = p.progress().total_affection;
            let story_ending = p.progress().story_ending;
            let view = StatusView {
                badge: p.status(),
                chapters: p.chapter_statuses(),
                requirements: ending::requirements(total),
                ending: story_ending,
                ending_title: story_ending.title(),
                pending_save: p.has_pending_save(),
                warnings: p.take_warnings(),
            };
            to_json(&view)
        })
    }

    pub fn is_unlocked(&self, chapter_id: u32) -> Result<bool, JsValue> {
        with_engine(|p| Ok(p.is_unlocked(chapter_id)))
    }

    pub fn select_chapter(&self, chapter_id: u32) -> Result<String, JsValue> {
        with_engine(|p| to_json(p.select_chapter(chapter_id).map_err(js_err)?))
    }

    pub fn start_game(&self, game_id: &str) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.start_mini_game(game_id).map_err(js_err)?))
    }

    /// Call once per second while a game is on screen.
    pub fn tick(&self) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.tick().map_err(js_err)?))
    }

    pub fn select_card(&self, index: usize) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.select_card(index).map_err(js_err)?))
    }

    pub fn toggle_word(&self, word: &str) -> Result<bool, JsValue> {
        with_engine(|p| p.toggle_word(word).map_err(js_err))
    }

    pub fn submit(&self) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.submit().map_err(js_err)?))
    }

    pub fn answer(&self, text: &str) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.answer(text).map_err(js_err)?))
    }

    pub fn skip(&self) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.skip().map_err(js_err)?))
    }

    /// `"null"` when no game is running.
    pub fn game_view(&self) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.game_view()))
    }

    pub fn finish_game(&self) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.finish_mini_game().map_err(js_err)?))
    }

    /// Opens the finale with the offline phrase coach.
    pub fn start_voice(&self, chapter_id: u32) -> Result<(), JsValue> {
        with_engine(|p| p.start_voice_practice(chapter_id, Box::new(PhraseCoach::new())).map_err(js_err))
    }

    /// Opens the finale for a conversation the page holds with the remote agent
    /// under `session_id`. Feed its replies to `record_agent_reply`.
    pub fn start_remote_voice(&self, chapter_id: u32, session_id: &str) -> Result<(), JsValue> {
        with_engine(|p| p.start_voice_practice(chapter_id, Box::new(HostRelay::new(session_id))).map_err(js_err))
    }

    /// `reply_json` is the agent's `{ responseText, toolResults }`. Returns the reward so far.
    pub fn record_agent_reply(&self, text: &str, reply_json: &str) -> Result<i32, JsValue> {
        let reply: AgentReply = serde_json::from_str(reply_json).map_err(js_err)?;
        with_engine(|p| p.record_agent_reply(text, &reply).map_err(js_err))
    }

    pub fn say(&self, text: &str) -> Result<String, JsValue> {
        with_engine(|p| to_json(&p.say(text).map_err(js_err)?))
    }

    pub fn finish_voice(&self) -> Result<String, JsValue> {
        with_engine(|p| {
            let (voice, transition) = p.finish_voice_practice().map_err(js_err)?;
            to_json(&VoiceFinish { voice, transition })
        })
    }

    pub fn agent_failed(&self, reason: &str) -> Result<(), JsValue> {
        with_engine(|p| p.agent_failed(reason).map_err(js_err))
    }

    /// Retry a failed save. True once everything is stored.
    pub fn flush(&self) -> Result<bool, JsValue> {
        with_engine(|p| Ok(p.flush()))
    }
}
