//! Score classification: turns a mini-game percentage into a tier and the tier
//! into an affection delta. Thresholds are shared by every game type.

use serde::{Deserialize, Serialize};

use crate::content::AffectionImpact;

/// Lowest percentage that still counts as a perfect run.
pub const PERFECT_THRESHOLD: f64 = 90.0;
/// Lowest percentage that counts as good. Also the pass/fail line for `success`.
pub const GOOD_THRESHOLD: f64 = 70.0;

/// Performance bucket. Ordered `Poor < Good < Perfect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Poor,
    Good,
    Perfect,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Poor => "poor",
            Tier::Good => "good",
            Tier::Perfect => "perfect",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Out-of-range input comes from a ratio of bounded counts, so clamp instead of failing.
fn clamp_percent(score_percent: f64) -> f64 {
    if score_percent.is_nan() {
        0.0
    } else {
        score_percent.clamp(0.0, 100.0)
    }
}

pub fn classify(score_percent: f64) -> Tier {
    let s = clamp_percent(score_percent);
    if s >= PERFECT_THRESHOLD {
        Tier::Perfect
    } else if s >= GOOD_THRESHOLD {
        Tier::Good
    } else {
        Tier::Poor
    }
}

pub fn resolve_delta(tier: Tier, impact: &AffectionImpact) -> i32 {
    match tier {
        Tier::Perfect => impact.perfect,
        Tier::Good => impact.good,
        Tier::Poor => impact.poor,
    }
}

/// `classify` followed by `resolve_delta`.
pub fn affection_delta(score_percent: f64, impact: &AffectionImpact) -> i32 {
    resolve_delta(classify(score_percent), impact)
}

/// Rounded percentage of `correct` out of `total`. An empty game scores 0.
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (correct.min(total) as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

pub fn is_success(score_percent: f64) -> bool {
    clamp_percent(score_percent) >= GOOD_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impact() -> AffectionImpact {
        AffectionImpact { perfect: 20, good: 12, poor: -8 }
    }

    #[test]
    fn test_threshold_edges() {
        assert_eq!(classify(100.0), Tier::Perfect);
        assert_eq!(classify(90.0), Tier::Perfect);
        assert_eq!(classify(89.99), Tier::Good);
        assert_eq!(classify(70.0), Tier::Good);
        assert_eq!(classify(69.9), Tier::Poor);
        assert_eq!(classify(0.0), Tier::Poor);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(classify(150.0), Tier::Perfect);
        assert_eq!(classify(-3.0), Tier::Poor);
        assert_eq!(classify(f64::NAN), Tier::Poor);
        assert!(!is_success(f64::NAN));
    }

    #[test]
    fn test_classifier_is_monotonic() {
        let mut last = Tier::Poor;
        for tenth in 0..=1000 {
            let tier = classify(tenth as f64 / 10.0);
            assert!(tier >= last, "tier dropped at {}", tenth as f64 / 10.0);
            last = tier;
        }
    }

    #[test]
    fn test_delta_lookup() {
        let i = impact();
        assert_eq!(resolve_delta(Tier::Perfect, &i), 20);
        assert_eq!(resolve_delta(Tier::Good, &i), 12);
        assert_eq!(resolve_delta(Tier::Poor, &i), -8);
        assert_eq!(affection_delta(83.0, &i), 12);
    }

    #[test]
    fn test_score_percent_rounding() {
        assert_eq!(score_percent(5, 6), 83);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(8, 8), 100);
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(score_percent(9, 8), 100);
    }

    #[test]
    fn test_success_line() {
        assert!(is_success(70.0));
        assert!(!is_success(69.0));
    }
}
