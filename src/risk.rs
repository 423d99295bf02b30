//! Priority classification of outlets by miss-cleaning probability.

use serde::{Deserialize, Serialize};

/// Scheduling urgency tier for an outlet.
///
/// Derived purely from the miss-cleaning probability; never stored,
/// recomputed on read. Ordering: `High < Medium < Low`, so an ascending
/// sort puts the most urgent outlets first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "High",
            PriorityTier::Medium => "Medium",
            PriorityTier::Low => "Low",
        }
    }
}

/// Classify a miss-cleaning probability into a priority tier.
///
/// `p >= 0.7` is High, `0.4 <= p < 0.7` is Medium, below that Low.
/// Values outside [0, 1] are clamped before classification.
pub fn classify(p_miss_cleaning: f64) -> PriorityTier {
    let p = p_miss_cleaning.clamp(0.0, 1.0);
    if p >= 0.7 {
        PriorityTier::High
    } else if p >= 0.4 {
        PriorityTier::Medium
    } else {
        PriorityTier::Low
    }
}
