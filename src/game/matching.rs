//! Matching: pair each Chinese card with its English card.

use serde::Serialize;

use super::{BoardView, ScoredGame, SessionCore, deal};
use crate::content::WordPair;
use crate::error::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    /// Chinese side.
    Source,
    /// English side.
    Target,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Card {
    pair: usize,
    face: Face,
    text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub text: String,
    pub face: Face,
    pub matched: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum SelectResult {
    /// First card of a pair attempt is now held.
    Held,
    /// The held card was tapped again and released.
    Released,
    Matched { pair: usize },
    Mismatch,
    /// Card belongs to a pair that is already matched.
    Ignored,
}

#[derive(Clone, Debug)]
pub struct MatchingSession {
    core: SessionCore,
    game_id: String,
    cards: Vec<Card>,
    matched: Vec<bool>,
    selected: Option<usize>,
}

impl MatchingSession {
    pub fn new(game_id: String, pairs: &[WordPair], time_limit: u32, seed: u64) -> Self {
        let mut cards: Vec<Card> = pairs
            .iter()
            .enumerate()
            .flat_map(|(pair, p)| {
                [
                    Card { pair, face: Face::Source, text: p.chinese.clone() },
                    Card { pair, face: Face::Target, text: p.english.clone() },
                ]
            })
            .collect();
        deal(&mut cards, seed);
        Self {
            core: SessionCore::new(time_limit),
            game_id,
            cards,
            matched: vec![false; pairs.len()],
            selected: None,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Index of the card showing `text` on the given face, if any.
    pub fn find_card(&self, text: &str, face: Face) -> Option<usize> {
        self.cards.iter().position(|c| c.face == face && c.text == text)
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched.iter().filter(|m| **m).count()
    }

    pub fn select(&mut self, index: usize) -> Result<SelectResult, SessionError> {
        self.core.ensure_active()?;
        let card = self.cards.get(index).ok_or(SessionError::InvalidCard(index))?;
        if self.matched[card.pair] {
            return Ok(SelectResult::Ignored);
        }
        let Some(held) = self.selected else {
            self.selected = Some(index);
            return Ok(SelectResult::Held);
        };
        if held == index {
            self.selected = None;
            return Ok(SelectResult::Released);
        }
        self.selected = None;
        let first = &self.cards[held];
        if first.pair == card.pair && first.face != card.face {
            let pair = card.pair;
            self.matched[pair] = true;
            self.settle();
            Ok(SelectResult::Matched { pair })
        } else {
            Ok(SelectResult::Mismatch)
        }
    }

    pub(super) fn board_view(&self) -> BoardView {
        BoardView::Matching {
            cards: self
                .cards
                .iter()
                .map(|c| CardView { text: c.text.clone(), face: c.face, matched: self.matched[c.pair] })
                .collect(),
            selected: self.selected,
        }
    }
}

impl ScoredGame for MatchingSession {
    fn core(&self) -> &SessionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SessionCore {
        &mut self.core
    }

    fn progress(&self) -> (usize, usize) {
        (self.matched_pairs(), self.matched.len())
    }
}
