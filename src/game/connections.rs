//! Connections: find the hidden groups of four among the board words.

use std::collections::HashSet;

use serde::Serialize;

use super::{BoardView, ScoredGame, SessionCore, deal};
use crate::content::ConnectionsGroup;
use crate::error::SessionError;

/// Most words a player can hold in one selection.
pub const MAX_SELECTION: usize = 4;
/// Wrong submissions before the next category is hinted.
pub const DEFAULT_HINT_THRESHOLD: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum SubmitResult {
    /// Nothing selected; not counted as an attempt.
    Empty,
    Correct { category: String },
    Wrong { attempts: u32 },
}

#[derive(Clone, Debug)]
pub struct ConnectionsSession {
    core: SessionCore,
    game_id: String,
    words: Vec<String>,
    groups: Vec<ConnectionsGroup>,
    found: Vec<usize>,
    selection: Vec<String>,
    wrong_attempts: u32,
    hint_threshold: u32,
}

impl ConnectionsSession {
    pub fn new(
        game_id: String,
        words: &[String],
        groups: &[ConnectionsGroup],
        time_limit: u32,
        seed: u64,
        hint_threshold: u32,
    ) -> Self {
        let mut words = words.to_vec();
        deal(&mut words, seed);
        Self {
            core: SessionCore::new(time_limit),
            game_id,
            words,
            groups: groups.to_vec(),
            found: Vec::new(),
            selection: Vec::new(),
            wrong_attempts: 0,
            hint_threshold,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn wrong_attempts(&self) -> u32 {
        self.wrong_attempts
    }

    pub fn found_categories(&self) -> Vec<&str> {
        self.found.iter().map(|&g| self.groups[g].category.as_str()).collect()
    }

    fn is_grouped(&self, word: &str) -> bool {
        self.found.iter().any(|&g| self.groups[g].items.iter().any(|w| w == word))
    }

    /// Add or remove a word from the selection. Returns whether it is now selected.
    /// Words from groups already found are left alone.
    pub fn toggle(&mut self, word: &str) -> Result<bool, SessionError> {
        self.core.ensure_active()?;
        if !self.words.iter().any(|w| w == word) {
            return Err(SessionError::UnknownWord(word.to_string()));
        }
        if self.is_grouped(word) {
            return Ok(false);
        }
        if let Some(pos) = self.selection.iter().position(|w| w == word) {
            self.selection.remove(pos);
            return Ok(false);
        }
        if self.selection.len() >= MAX_SELECTION {
            return Err(SessionError::SelectionFull(MAX_SELECTION));
        }
        self.selection.push(word.to_string());
        Ok(true)
    }

    pub fn submit(&mut self) -> Result<SubmitResult, SessionError> {
        self.core.ensure_active()?;
        if self.selection.is_empty() {
            return Ok(SubmitResult::Empty);
        }
        let picked: HashSet<&str> = self.selection.iter().map(String::as_str).collect();
        let hit = self.groups.iter().enumerate().find(|(idx, group)| {
            !self.found.contains(idx)
                && group.items.len() == picked.len()
                && group.items.iter().all(|w| picked.contains(w.as_str()))
        });
        let result = match hit {
            Some((idx, group)) => {
                let category = group.category.clone();
                self.found.push(idx);
                SubmitResult::Correct { category }
            }
            None => {
                self.wrong_attempts += 1;
                SubmitResult::Wrong { attempts: self.wrong_attempts }
            }
        };
        self.selection.clear();
        self.settle();
        Ok(result)
    }

    /// After enough wrong attempts, the category of the next group still hidden.
    pub fn hint(&self) -> Option<&str> {
        if self.wrong_attempts < self.hint_threshold {
            return None;
        }
        self.groups
            .iter()
            .enumerate()
            .find(|(idx, _)| !self.found.contains(idx))
            .map(|(_, g)| g.category.as_str())
    }

    pub(super) fn board_view(&self) -> BoardView {
        BoardView::Connections {
            words: self.words.clone(),
            selection: self.selection.clone(),
            found: self.found_categories().into_iter().map(str::to_string).collect(),
            wrong_attempts: self.wrong_attempts,
            hint: self.hint().map(str::to_string),
        }
    }
}

impl ScoredGame for ConnectionsSession {
    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }

    fn progress(&self) -> (usize, usize) {
        (self.found.len(), self.groups.len())
    }
}
