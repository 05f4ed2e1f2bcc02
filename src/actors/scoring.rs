//! Actor prioritization: six manually scored dimensions (0-3 each), summed and
//! bucketed into four tiers.

use crate::records::DimensionScores;
use serde::Serialize;
use std::fmt;

pub const MAX_DIMENSION_SCORE: i64 = 3;
pub const MAX_TOTAL: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PriorityTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4,
}

impl PriorityTier {
    /// Tier for a total: 14+ is Tier 1, 9-13 Tier 2, 5-8 Tier 3, the rest Tier 4.
    pub fn for_total(total: u32) -> Self {
        match total {
            14.. => PriorityTier::Tier1,
            9..=13 => PriorityTier::Tier2,
            5..=8 => PriorityTier::Tier3,
            _ => PriorityTier::Tier4,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            PriorityTier::Tier1 => 1,
            PriorityTier::Tier2 => 2,
            PriorityTier::Tier3 => 3,
            PriorityTier::Tier4 => 4,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PriorityTier::Tier1 => "Priority partner",
            PriorityTier::Tier2 => "Strategic partner",
            PriorityTier::Tier3 => "Monitor",
            PriorityTier::Tier4 => "Low priority",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {}", self.number())
    }
}

/// Outcome of scoring one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Score {
    Scored { total: u32, tier: PriorityTier },
    /// Dimensions that are missing or outside 0-3
    Incomplete { dimensions: Vec<&'static str> },
}

impl Score {
    pub fn tier(&self) -> Option<PriorityTier> {
        match self {
            Score::Scored { tier, .. } => Some(*tier),
            Score::Incomplete { .. } => None,
        }
    }

    pub fn total(&self) -> Option<u32> {
        match self {
            Score::Scored { total, .. } => Some(*total),
            Score::Incomplete { .. } => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Score::Scored { .. })
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Scored { total, tier } => write!(f, "{}/{} ({})", total, MAX_TOTAL, tier),
            Score::Incomplete { dimensions } => write!(f, "incomplete: {}", dimensions.join(", ")),
        }
    }
}

/// Display form of one dimension: `2/3`, or `invalid` outside 0-3.
/// `None` when the dimension is not scored.
pub fn dimension_display(value: Option<i64>) -> Option<String> {
    value.map(|v| {
        if (0..=MAX_DIMENSION_SCORE).contains(&v) {
            format!("{}/{}", v, MAX_DIMENSION_SCORE)
        } else {
            "invalid".to_string()
        }
    })
}

/// Score an actor. Total over the whole registry: every actor gets a score
/// or is flagged incomplete.
pub fn score(scores: Option<&DimensionScores>) -> Score {
    let Some(scores) = scores else {
        return Score::Incomplete {
            dimensions: DimensionScores::default()
                .dimensions()
                .iter()
                .map(|(name, _)| *name)
                .collect(),
        };
    };

    let mut total = 0u32;
    let mut invalid = Vec::new();
    for (name, value) in scores.dimensions() {
        match value {
            Some(v) if (0..=MAX_DIMENSION_SCORE).contains(&v) => total += v as u32,
            _ => invalid.push(name),
        }
    }

    if invalid.is_empty() {
        Score::Scored {
            total,
            tier: PriorityTier::for_total(total),
        }
    } else {
        Score::Incomplete {
            dimensions: invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [i64; 6]) -> DimensionScores {
        DimensionScores {
            language_coverage: Some(values[0]),
            technical_capacity: Some(values[1]),
            openness: Some(values[2]),
            regional_presence: Some(values[3]),
            child_relevance: Some(values[4]),
            partnership_readiness: Some(values[5]),
        }
    }

    // ==================== Tier Tests ====================

    #[test]
    fn test_strong_actor_is_tier_1() {
        let result = score(Some(&scores([3, 3, 3, 2, 3, 2])));
        assert_eq!(
            result,
            Score::Scored {
                total: 16,
                tier: PriorityTier::Tier1
            }
        );
    }

    #[test]
    fn test_mid_actor_is_tier_2() {
        let result = score(Some(&scores([2, 2, 2, 1, 2, 1])));
        assert_eq!(result.total(), Some(10));
        assert_eq!(result.tier(), Some(PriorityTier::Tier2));
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(score(Some(&scores([3, 3, 2, 2, 2, 2]))).tier(), Some(PriorityTier::Tier1));
        assert_eq!(score(Some(&scores([3, 2, 2, 2, 2, 2]))).tier(), Some(PriorityTier::Tier2));
        assert_eq!(PriorityTier::for_total(9), PriorityTier::Tier2);
        assert_eq!(PriorityTier::for_total(8), PriorityTier::Tier3);
        assert_eq!(PriorityTier::for_total(5), PriorityTier::Tier3);
        assert_eq!(PriorityTier::for_total(4), PriorityTier::Tier4);
        assert_eq!(PriorityTier::for_total(0), PriorityTier::Tier4);
        assert_eq!(PriorityTier::for_total(MAX_TOTAL), PriorityTier::Tier1);
    }

    // ==================== Incomplete Tests ====================

    #[test]
    fn test_missing_scores_are_incomplete() {
        let result = score(None);
        assert!(!result.is_complete());
        assert_eq!(result.to_string().matches(',').count(), 5);
    }

    #[test]
    fn test_missing_and_out_of_range_dimensions_are_listed() {
        let mut partial = scores([3, 3, 3, 3, 3, 3]);
        partial.openness = None;
        partial.child_relevance = Some(4);
        partial.regional_presence = Some(-1);

        assert_eq!(
            score(Some(&partial)),
            Score::Incomplete {
                dimensions: vec!["openness", "regional_presence", "child_relevance"]
            }
        );
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(dimension_display(Some(2)).as_deref(), Some("2/3"));
        assert_eq!(dimension_display(Some(4)).as_deref(), Some("invalid"));
        assert_eq!(dimension_display(None), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(score(Some(&scores([3, 3, 3, 2, 3, 2]))).to_string(), "16/18 (Tier 1)");
    }
}
