//! Autonomy Index types: weights, sub-scores, and derived guidance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::activity::{ActivityFeatures, UserId};
use crate::error::ScoreError;

/// The four areas that make up the Autonomy Index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Skills,
    Budgeting,
    Community,
    Judgment,
}

impl Area {
    pub const ALL: [Area; 4] = [Area::Skills, Area::Budgeting, Area::Community, Area::Judgment];
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Area::Skills => write!(f, "Skills"),
            Area::Budgeting => write!(f, "Budgeting"),
            Area::Community => write!(f, "Community"),
            Area::Judgment => write!(f, "Judgment"),
        }
    }
}

/// Relative weight of each area in the combined index.
///
/// Weights need not sum to 1; the scorer divides by their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutonomyWeights {
    pub skills: f64,
    pub budgeting: f64,
    pub community: f64,
    pub judgment: f64,
}

impl Default for AutonomyWeights {
    fn default() -> Self {
        Self {
            skills: 0.30,
            budgeting: 0.30,
            community: 0.15,
            judgment: 0.25,
        }
    }
}

impl AutonomyWeights {
    /// Build a weight set, rejecting configurations where every weight is
    /// negative (or not a number). All-zero is accepted.
    pub fn try_new(
        skills: f64,
        budgeting: f64,
        community: f64,
        judgment: f64,
    ) -> Result<Self, ScoreError> {
        let weights = Self {
            skills,
            budgeting,
            community,
            judgment,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        let values = [self.skills, self.budgeting, self.community, self.judgment];
        if values.iter().any(|w| !w.is_finite()) {
            return Err(ScoreError::InvalidWeightConfiguration(
                "weights must be finite numbers".to_string(),
            ));
        }
        if values.iter().all(|w| *w < 0.0) {
            return Err(ScoreError::InvalidWeightConfiguration(
                "all four weights are negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get(&self, area: Area) -> f64 {
        match area {
            Area::Skills => self.skills,
            Area::Budgeting => self.budgeting,
            Area::Community => self.community,
            Area::Judgment => self.judgment,
        }
    }

    /// Weight used in the index formula: negative weights count as zero.
    pub fn effective(&self, area: Area) -> f64 {
        let w = self.get(area);
        if w.is_finite() && w > 0.0 { w } else { 0.0 }
    }
}

/// Four clamped sub-scores plus the combined index, all in [0, 100].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AutonomyResult {
    pub skills: f64,
    pub budgeting: f64,
    pub community: f64,
    pub judgment: f64,
    pub index: f64,
}

impl AutonomyResult {
    pub fn score(&self, area: Area) -> f64 {
        match area {
            Area::Skills => self.skills,
            Area::Budgeting => self.budgeting,
            Area::Community => self.community,
            Area::Judgment => self.judgment,
        }
    }
}

/// Everything computed for one `compute_autonomy_index` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutonomyReport {
    pub user_id: UserId,
    pub features: ActivityFeatures,
    pub weights: AutonomyWeights,
    pub result: AutonomyResult,
    pub computed_at: DateTime<Utc>,
}

/// A guidance line for one area, chosen from the area's score band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub area: Area,
    pub message: String,
}

/// The next target to reach in one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub area: Area,
    pub description: String,
    pub current: u32,
    pub target: u32,
    pub reward: String,
}
