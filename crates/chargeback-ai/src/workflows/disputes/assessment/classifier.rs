use std::fmt;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::{ConfidenceBand, ConfidenceBands, RecommendationThresholds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Approve,
    Review,
    Reject,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::Approve => "approve",
            Recommendation::Review => "review",
            Recommendation::Reject => "reject",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(score: u8, thresholds: RecommendationThresholds) -> Recommendation {
    if score <= thresholds.approve_max {
        Recommendation::Approve
    } else if score >= thresholds.reject_min {
        Recommendation::Reject
    } else {
        Recommendation::Review
    }
}

/// Source of the confidence jitter, the only nondeterministic input to a decision.
pub trait ConfidenceSource: Send + Sync {
    /// Returns a value in `lo..=hi`.
    fn next(&self, lo: u8, hi: u8) -> u8;
}

/// Draws from the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngConfidence;

impl ConfidenceSource for ThreadRngConfidence {
    fn next(&self, lo: u8, hi: u8) -> u8 {
        if lo >= hi {
            return lo;
        }
        rand::thread_rng().gen_range(lo..=hi)
    }
}

/// Reproducible jitter for replays and tests.
#[derive(Debug)]
pub struct SeededConfidence {
    rng: Mutex<StdRng>,
}

impl SeededConfidence {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ConfidenceSource for SeededConfidence {
    fn next(&self, lo: u8, hi: u8) -> u8 {
        if lo >= hi {
            return lo;
        }
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(lo..=hi),
            Err(poisoned) => poisoned.into_inner().gen_range(lo..=hi),
        }
    }
}

pub fn confidence_for(
    recommendation: Recommendation,
    bands: &ConfidenceBands,
    source: &dyn ConfidenceSource,
) -> u8 {
    let band: ConfidenceBand = match recommendation {
        Recommendation::Approve => bands.approve,
        Recommendation::Review => bands.review,
        Recommendation::Reject => bands.reject,
    };
    let jitter = source.next(0, band.spread).min(band.spread);
    band.base.saturating_add(jitter)
}
