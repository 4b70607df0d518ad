//! Quickfire: translate each Chinese prompt into English before time runs out.

use serde::Serialize;

use super::{BoardView, ScoredGame, SessionCore};
use crate::content::QuickfireQuestion;
use crate::error::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum AnswerResult {
    /// Blank input.
    Ignored,
    Correct { streak: u32 },
    Wrong,
}

#[derive(Clone, Debug)]
pub struct QuickfireSession {
    core: SessionCore,
    game_id: String,
    questions: Vec<QuickfireQuestion>,
    answered: Vec<bool>,
    current: usize,
    streak: u32,
    best_streak: u32,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

impl QuickfireSession {
    pub fn new(game_id: String, questions: &[QuickfireQuestion], time_limit: u32) -> Self {
        Self {
            core: SessionCore::new(time_limit),
            game_id,
            questions: questions.to_vec(),
            answered: vec![false; questions.len()],
            current: 0,
            streak: 0,
            best_streak: 0,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn correct_count(&self) -> usize {
        self.answered.iter().filter(|a| **a).count()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// The prompt waiting for an answer, or `None` once every question is done.
    pub fn current_question(&self) -> Option<&QuickfireQuestion> {
        if self.answered.get(self.current).copied().unwrap_or(true) {
            return None;
        }
        self.questions.get(self.current)
    }

    pub fn answer(&mut self, text: &str) -> Result<AnswerResult, SessionError> {
        self.core.ensure_active()?;
        let given = normalize(text);
        if given.is_empty() {
            return Ok(AnswerResult::Ignored);
        }
        let Some(question) = self.current_question() else {
            return Ok(AnswerResult::Ignored);
        };
        if normalize(&question.english) != given {
            self.streak = 0;
            return Ok(AnswerResult::Wrong);
        }

        self.answered[self.current] = true;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
        let streak = self.streak;
        self.advance();
        self.settle();
        Ok(AnswerResult::Correct { streak })
    }

    // Next unanswered question after the current one, wrapping around.
    fn advance(&mut self) {
        let len = self.questions.len();
        if let Some(next) = (1..=len).map(|step| (self.current + step) % len).find(|&i| !self.answered[i]) {
            self.current = next;
        }
    }

    pub(super) fn board_view(&self) -> BoardView {
        BoardView::Quickfire {
            prompt: self.current_question().map(|q| q.chinese.clone()),
            streak: self.streak,
            best_streak: self.best_streak,
        }
    }
}

impl ScoredGame for QuickfireSession {
    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }

    fn progress(&self) -> (usize, usize) {
        (self.correct_count(), self.questions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EndCause, Phase};
    use crate::score::{self, Tier};

    fn questions() -> Vec<QuickfireQuestion> {
        [
            ("你好", "hello"),
            ("謝謝", "thank you"),
            ("老師", "teacher"),
            ("同學", "classmate"),
            ("作業", "homework"),
            ("考試", "exam"),
            ("下課", "class is over"),
            ("再見", "goodbye"),
        ]
        .iter()
        .map(|(c, e)| QuickfireQuestion { chinese: c.to_string(), english: e.to_string() })
        .collect()
    }

    fn started() -> QuickfireSession {
        let mut s = QuickfireSession::new("q".into(), &questions(), 60);
        s.start().unwrap();
        s
    }

    #[test]
    fn test_answer_is_trimmed_and_case_insensitive() {
        let mut s = started();
        assert_eq!(s.answer("  Hello ").unwrap(), AnswerResult::Correct { streak: 1 });
        assert_eq!(s.current_question().unwrap().chinese, "謝謝");
    }

    #[test]
    fn test_wrong_answer_stays_and_resets_streak() {
        let mut s = started();
        s.answer("hello").unwrap();
        assert_eq!(s.answer("thanks").unwrap(), AnswerResult::Wrong);
        assert_eq!(s.streak(), 0);
        assert_eq!(s.best_streak(), 1);
        assert_eq!(s.current_question().unwrap().chinese, "謝謝");
        assert_eq!(s.answer("   ").unwrap(), AnswerResult::Ignored);
    }

    #[test]
    fn test_all_eight_correct_is_perfect() {
        let mut s = started();
        for q in questions() {
            s.answer(&q.english).unwrap();
        }
        assert_eq!(s.phase(), Phase::Ended(EndCause::Completed));
        assert_eq!(s.best_streak(), 8);
        let outcome = s.take_outcome().unwrap();
        assert_eq!(outcome.score_percent, 100);
        assert_eq!(score::classify(outcome.score_percent as f64), Tier::Perfect);
    }

    #[test]
    fn test_prompt_clears_once_everything_is_answered() {
        let qs = questions();
        let mut s = QuickfireSession::new("q".into(), &qs[..3], 60);
        s.start().unwrap();
        s.answer("hello").unwrap();
        s.answer("thank you").unwrap();
        assert_eq!(s.current_question().unwrap().chinese, "老師");
        s.answer("teacher").unwrap();
        assert_eq!(s.current_question(), None);
        assert_eq!(s.phase(), Phase::Ended(EndCause::Completed));
    }
}
