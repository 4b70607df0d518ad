//! Affection ledger and the relationship status bands shown next to the meter.

use serde::{Deserialize, Serialize};

/// Apply a signed change to a running total. Affection never drops below zero
/// and has no ceiling.
pub fn apply_delta(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).max(0)
}

/// Presentation-only relationship band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AffectionStatus {
    Acquaintances,
    GettingCloser,
    GoodFriends,
    StrongRomance,
    DeeplyInLove,
}

// Highest band first; the first floor that `total` reaches wins.
const BANDS: [(i32, AffectionStatus); 4] = [
    (180, AffectionStatus::DeeplyInLove),
    (150, AffectionStatus::StrongRomance),
    (100, AffectionStatus::GoodFriends),
    (50, AffectionStatus::GettingCloser),
];

pub fn status_for(total: i32) -> AffectionStatus {
    BANDS
        .iter()
        .find(|(floor, _)| total >= *floor)
        .map(|(_, status)| *status)
        .unwrap_or(AffectionStatus::Acquaintances)
}

impl AffectionStatus {
    pub fn text(&self) -> &'static str {
        match self {
            AffectionStatus::DeeplyInLove => "Deeply in Love",
            AffectionStatus::StrongRomance => "Strong Romance",
            AffectionStatus::GoodFriends => "Good Friends",
            AffectionStatus::GettingCloser => "Getting Closer",
            AffectionStatus::Acquaintances => "Acquaintances",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            AffectionStatus::DeeplyInLove => "💕",
            AffectionStatus::StrongRomance => "😍",
            AffectionStatus::GoodFriends => "😊",
            AffectionStatus::GettingCloser => "🙂",
            AffectionStatus::Acquaintances => "😐",
        }
    }

    /// Stable key for front-end styling hooks.
    pub fn key(&self) -> &'static str {
        match self {
            AffectionStatus::DeeplyInLove => "deeply-in-love",
            AffectionStatus::StrongRomance => "strong-romance",
            AffectionStatus::GoodFriends => "good-friends",
            AffectionStatus::GettingCloser => "getting-closer",
            AffectionStatus::Acquaintances => "acquaintances",
        }
    }
}

impl std::fmt::Display for AffectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Serializable status badge handed to the UI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub key: &'static str,
    pub text: &'static str,
    pub emoji: &'static str,
    pub total: i32,
}

impl StatusBadge {
    pub fn for_total(total: i32) -> Self {
        let status = status_for(total);
        Self {
            key: status.key(),
            text: status.text(),
            emoji: status.emoji(),
            total,
        }
    }
}

/// Running affection total for one play-through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    total: i32,
}

impl Ledger {
    pub fn new(total: i32) -> Self {
        Self { total: total.max(0) }
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    /// Applies `delta` and returns the change that actually landed after the floor.
    pub fn apply(&mut self, delta: i32) -> i32 {
        let before = self.total;
        self.total = apply_delta(before, delta);
        self.total - before
    }

    pub fn status(&self) -> AffectionStatus {
        status_for(self.total)
    }
}
