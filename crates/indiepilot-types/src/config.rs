//! Global configuration types for IndiePilot.
//!
//! `GlobalConfig` represents the top-level `config.toml` in the data
//! directory. Today it only carries the `[scoring]` table with the tunables
//! of the Autonomy Index.

use serde::{Deserialize, Serialize};

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Tunables for the autonomy sub-scores and recommendation display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Skills points per completed quest (saturates at 100).
    #[serde(default = "default_points_per_quest")]
    pub points_per_quest: f64,

    /// Budgeting bonus per consecutive logging day.
    #[serde(default = "default_streak_bonus_per_day")]
    pub streak_bonus_per_day: f64,

    /// Maximum streak bonus.
    #[serde(default = "default_streak_bonus_cap")]
    pub streak_bonus_cap: f64,

    /// Budgeting penalty per unit of spend-jar overdraft.
    #[serde(default = "default_overspend_penalty_per_unit")]
    pub overspend_penalty_per_unit: f64,

    /// Maximum overspend penalty.
    #[serde(default = "default_overspend_penalty_cap")]
    pub overspend_penalty_cap: f64,

    /// Community points per post created.
    #[serde(default = "default_points_per_post")]
    pub points_per_post: f64,

    /// Community points per claim received on the user's own posts.
    #[serde(default = "default_points_per_claim")]
    pub points_per_claim: f64,

    /// Number of most recent simulation runs averaged for judgment.
    #[serde(default = "default_judgment_window")]
    pub judgment_window: usize,

    /// Judgment score when no simulation has been run.
    #[serde(default = "default_judgment_default")]
    pub judgment_default: f64,

    /// How many recommendations to show when the caller does not say.
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
}

fn default_points_per_quest() -> f64 {
    10.0
}

fn default_streak_bonus_per_day() -> f64 {
    2.0
}

fn default_streak_bonus_cap() -> f64 {
    20.0
}

fn default_overspend_penalty_per_unit() -> f64 {
    1.0
}

fn default_overspend_penalty_cap() -> f64 {
    30.0
}

fn default_points_per_post() -> f64 {
    5.0
}

fn default_points_per_claim() -> f64 {
    10.0
}

fn default_judgment_window() -> usize {
    5
}

fn default_judgment_default() -> f64 {
    50.0
}

fn default_top_k() -> usize {
    3
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_quest: default_points_per_quest(),
            streak_bonus_per_day: default_streak_bonus_per_day(),
            streak_bonus_cap: default_streak_bonus_cap(),
            overspend_penalty_per_unit: default_overspend_penalty_per_unit(),
            overspend_penalty_cap: default_overspend_penalty_cap(),
            points_per_post: default_points_per_post(),
            points_per_claim: default_points_per_claim(),
            judgment_window: default_judgment_window(),
            judgment_default: default_judgment_default(),
            default_top_k: default_top_k(),
        }
    }
}
