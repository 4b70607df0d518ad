//! Voice-practice finale: a short conversation with Xiao Ai at the end of a chapter.
//!
//! The speech and language side is someone else's problem; all the engine sees is
//! a `ConversationAgent` that replies with text plus a list of tool results, each
//! carrying an affection change. The session sums those changes and clamps the sum
//! into `[0, affection_reward]`. If the agent cannot be reached the finale still
//! completes, with a reward of zero.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::content::Chapter;
use crate::error::AgentError;

/// Affection the offline coach grants for each key phrase used for the first time.
pub const PHRASE_BONUS: i32 = 8;
pub const AFFECTION_TOOL: &str = "affection_update";

/// What the agent is told about the chapter when a conversation starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContext {
    pub chapter_id: u32,
    pub title: String,
    pub scenario: String,
    pub objective: String,
    pub key_phrases: Vec<String>,
    pub cultural_context: Vec<String>,
    pub success_criteria: Vec<String>,
}

impl ChapterContext {
    pub fn for_chapter(chapter: &Chapter) -> Self {
        let vp = &chapter.voice_practice;
        Self {
            chapter_id: chapter.id,
            title: chapter.title.clone(),
            scenario: vp.scenario.clone(),
            objective: vp.objective.clone(),
            key_phrases: vp.key_phrases.clone(),
            cultural_context: vp.cultural_context.clone(),
            success_criteria: vp.success_criteria.clone(),
        }
    }

    fn phrase_stems(&self) -> Vec<String> {
        self.key_phrases
            .iter()
            .map(|p| p.split('(').next().unwrap_or(p).trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionHandle(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub tool: String,
    pub change: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReply {
    pub response_text: String,
    #[serde(default)]
    pub tool_results: Vec<ToolResult>,
}

/// The conversational backend. Implementations may talk to a remote service or,
/// like `PhraseCoach`, run entirely in process.
pub trait ConversationAgent {
    fn start_session(&mut self, user_id: &str, context: &ChapterContext) -> Result<SessionHandle, AgentError>;
    fn send_message(&mut self, session: &SessionHandle, text: &str) -> Result<AgentReply, AgentError>;
}

/// Summary handed back when the player ends the conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceResult {
    pub chapter_id: u32,
    pub reward: i32,
    pub phrases_used: Vec<String>,
    pub degraded: bool,
}

/// One finale conversation.
pub struct VoicePracticeSession {
    chapter_id: u32,
    reward_cap: i32,
    agent: Box<dyn ConversationAgent>,
    handle: Option<SessionHandle>,
    reported: i64,
    stems: Vec<String>,
    used: BTreeSet<String>,
    degraded: Option<String>,
}

impl VoicePracticeSession {
    /// Starts the conversation. An agent that fails to start leaves the session
    /// degraded rather than failing the finale.
    pub fn open(mut agent: Box<dyn ConversationAgent>, user_id: &str, chapter: &Chapter) -> Self {
        let context = ChapterContext::for_chapter(chapter);
        let (handle, degraded) = match agent.start_session(user_id, &context) {
            Ok(h) => (Some(h), None),
            Err(e) => {
                log::warn!("voice practice for chapter {} running without agent: {}", chapter.id, e);
                (None, Some(e.to_string()))
            }
        };
        Self {
            chapter_id: chapter.id,
            reward_cap: chapter.voice_practice.affection_reward.max(0),
            agent,
            handle,
            reported: 0,
            stems: context.phrase_stems(),
            used: BTreeSet::new(),
            degraded,
        }
    }

    pub fn chapter_id(&self) -> u32 {
        self.chapter_id
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        self.degraded.as_deref()
    }

    pub fn phrases_used(&self) -> impl Iterator<Item = &str> {
        self.used.iter().map(String::as_str)
    }

    pub fn say(&mut self, text: &str) -> Result<AgentReply, AgentError> {
        if let Some(reason) = &self.degraded {
            return Err(AgentError::Unavailable(reason.clone()));
        }
        let handle = self.handle.as_ref().ok_or(AgentError::NoSession)?;
        match self.agent.send_message(handle, text) {
            Ok(reply) => {
                self.fold(text, &reply);
                Ok(reply)
            }
            Err(AgentError::Relayed) => Err(AgentError::Relayed),
            Err(e) => {
                self.mark_unavailable(e.to_string());
                Err(e)
            }
        }
    }

    /// Takes a reply the host got from the agent itself, for the player's `text`.
    pub fn record_reply(&mut self, text: &str, reply: &AgentReply) -> Result<(), AgentError> {
        if let Some(reason) = &self.degraded {
            return Err(AgentError::Unavailable(reason.clone()));
        }
        if self.handle.is_none() {
            return Err(AgentError::NoSession);
        }
        self.fold(text, reply);
        Ok(())
    }

    fn fold(&mut self, text: &str, reply: &AgentReply) {
        for stem in &self.stems {
            if text.contains(stem.as_str()) {
                self.used.insert(stem.clone());
            }
        }
        let change: i64 = reply.tool_results.iter().map(|t| i64::from(t.change)).sum();
        self.reported = self.reported.saturating_add(change);
    }

    /// The host lost contact with the agent on its own (speech service down, etc.).
    pub fn mark_unavailable(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        log::warn!("voice practice for chapter {} degraded: {}", self.chapter_id, reason);
        self.degraded = Some(reason);
    }

    /// Current reward if the conversation ended now.
    pub fn reward(&self) -> i32 {
        if self.is_degraded() {
            return 0;
        }
        self.reported.clamp(0, i64::from(self.reward_cap)) as i32
    }

    pub fn finish(self) -> VoiceResult {
        let reward = self.reward();
        log::debug!("voice practice for chapter {} finished: reward {} (reported {})", self.chapter_id, reward, self.reported);
        VoiceResult {
            chapter_id: self.chapter_id,
            reward,
            degraded: self.is_degraded(),
            phrases_used: self.used.into_iter().collect(),
        }
    }
}

const PRAISE: [&str; 3] = ["太好了！", "哇，你的中文進步好多！", "嘿嘿，我好開心。"];

/// Offline agent: rewards each key phrase the first time it shows up.
#[derive(Clone, Debug, Default)]
pub struct PhraseCoach {
    opened: u32,
    handle: Option<SessionHandle>,
    stems: Vec<String>,
    used: BTreeSet<String>,
}

impl PhraseCoach {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationAgent for PhraseCoach {
    fn start_session(&mut self, user_id: &str, context: &ChapterContext) -> Result<SessionHandle, AgentError> {
        self.opened += 1;
        let handle = SessionHandle(format!("coach-{}-{}-{}", user_id, context.chapter_id, self.opened));
        self.handle = Some(handle.clone());
        self.stems = context.phrase_stems();
        self.used.clear();
        Ok(handle)
    }

    fn send_message(&mut self, session: &SessionHandle, text: &str) -> Result<AgentReply, AgentError> {
        if self.handle.as_ref() != Some(session) {
            return Err(AgentError::NoSession);
        }
        let mut tool_results = Vec::new();
        for stem in &self.stems {
            if text.contains(stem.as_str()) && self.used.insert(stem.clone()) {
                tool_results.push(ToolResult {
                    tool: AFFECTION_TOOL.to_string(),
                    change: PHRASE_BONUS,
                    message: Some(format!("Used new key phrase: {stem}")),
                });
            }
        }

        let response_text = if !tool_results.is_empty() {
            PRAISE[self.used.len() % PRAISE.len()].to_string()
        } else if let Some(next) = self.stems.iter().find(|s| !self.used.contains(*s)) {
            format!("嗯？你可以試試說「{next}」。")
        } else {
            "謝謝你陪我聊天。".to_string()
        };
        Ok(AgentReply { response_text, tool_results })
    }
}

/// Stands in for an agent the page talks to directly. The engine only opens the
/// conversation under the host's session id; replies arrive through
/// `VoicePracticeSession::record_reply`.
#[derive(Clone, Debug)]
pub struct HostRelay {
    session_id: String,
}

impl HostRelay {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self { session_id: session_id.into() }
    }
}

impl ConversationAgent for HostRelay {
    fn start_session(&mut self, _user_id: &str, _context: &ChapterContext) -> Result<SessionHandle, AgentError> {
        if self.session_id.trim().is_empty() {
            return Err(AgentError::Unavailable("host opened no agent session".into()));
        }
        Ok(SessionHandle(self.session_id.clone()))
    }

    fn send_message(&mut self, _session: &SessionHandle, _text: &str) -> Result<AgentReply, AgentError> {
        Err(AgentError::Relayed)
    }
}
