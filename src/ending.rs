//! Story endings. Resolved once, after the final chapter's finale reward lands.

use serde::{Deserialize, Serialize};

pub const PERFECT_ENDING: i32 = 200;
pub const GOOD_ENDING: i32 = 150;
pub const OKAY_ENDING: i32 = 100;
pub const BAD_ENDING: i32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryEnding {
    #[default]
    Incomplete,
    Failed,
    Bad,
    Okay,
    Good,
    Perfect,
}

impl StoryEnding {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, StoryEnding::Incomplete)
    }

    pub fn title(&self) -> &'static str {
        match self {
            StoryEnding::Perfect => "Perfect Love Story!",
            StoryEnding::Good => "Happy Romance!",
            StoryEnding::Okay => "Close Friends Forever",
            StoryEnding::Bad => "Distant but Polite",
            StoryEnding::Failed => "Story Failed",
            StoryEnding::Incomplete => "To Be Continued",
        }
    }
}

/// Classify final affection. Never returns `Incomplete`.
pub fn resolve(final_affection: i32) -> StoryEnding {
    match final_affection {
        a if a >= PERFECT_ENDING => StoryEnding::Perfect,
        a if a >= GOOD_ENDING => StoryEnding::Good,
        a if a >= OKAY_ENDING => StoryEnding::Okay,
        a if a >= BAD_ENDING => StoryEnding::Bad,
        _ => StoryEnding::Failed,
    }
}

/// How far the current total is from one of the headline endings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndingRequirement {
    pub ending: StoryEnding,
    pub threshold: i32,
    pub achieved: bool,
    pub missing: i32,
}

/// Progress toward the perfect, good and okay endings, best first.
pub fn requirements(total: i32) -> Vec<EndingRequirement> {
    [
        (StoryEnding::Perfect, PERFECT_ENDING),
        (StoryEnding::Good, GOOD_ENDING),
        (StoryEnding::Okay, OKAY_ENDING),
    ]
    .into_iter()
    .map(|(ending, threshold)| EndingRequirement {
        ending,
        threshold,
        achieved: total >= threshold,
        missing: (threshold - total).max(0),
    })
    .collect()
}
