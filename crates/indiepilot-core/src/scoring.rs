//! Autonomy Scorer.
//!
//! Turns an [`ActivityFeatures`] snapshot into four sub-scores and the
//! weighted Autonomy Index. Every value is clamped to [0, 100] on its own;
//! nothing here returns an error for odd input. Weight validation lives on
//! [`AutonomyWeights`] and is only enforced by [`AutonomyScorer::compute_checked`].

use indiepilot_types::activity::ActivityFeatures;
use indiepilot_types::autonomy::{Area, AutonomyResult, AutonomyWeights};
use indiepilot_types::config::ScoringConfig;
use indiepilot_types::error::ScoreError;

use crate::activity::mean_or;

const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Default)]
pub struct AutonomyScorer {
    config: ScoringConfig,
}

impl AutonomyScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// `min(100, completed_quests * points_per_quest)`.
    pub fn skills(&self, features: &ActivityFeatures) -> f64 {
        clamp_score(f64::from(features.completed_quests) * self.config.points_per_quest)
    }

    /// Savings ratio as a percentage, plus a streak bonus, minus an overspend
    /// penalty. Bonus and penalty are both capped.
    pub fn budgeting(&self, features: &ActivityFeatures) -> f64 {
        let base = finite_or_zero(features.health_proxy.clamp(0.0, 1.0)) * 100.0;
        clamp_score(base + self.streak_bonus(features.streak_days) - self.overspend_penalty(features))
    }

    pub fn streak_bonus(&self, streak_days: u32) -> f64 {
        capped(
            f64::from(streak_days) * self.config.streak_bonus_per_day,
            self.config.streak_bonus_cap,
        )
    }

    /// Zero unless the spend jar has been overdrawn.
    pub fn overspend_penalty(&self, features: &ActivityFeatures) -> f64 {
        let deficit = finite_or_zero(features.jars.spend.deficit());
        capped(
            deficit * self.config.overspend_penalty_per_unit,
            self.config.overspend_penalty_cap,
        )
    }

    /// Rewards posts created and claims received from other users.
    pub fn community(&self, features: &ActivityFeatures) -> f64 {
        clamp_score(
            f64::from(features.posts_created) * self.config.points_per_post
                + f64::from(features.claims_received) * self.config.points_per_claim,
        )
    }

    /// Mean of the recent simulation window, or the neutral default.
    pub fn judgment(&self, features: &ActivityFeatures) -> f64 {
        let window = self.config.judgment_window;
        let scores = &features.recent_sim_scores;
        let recent = &scores[scores.len().saturating_sub(window)..];
        clamp_score(mean_or(recent, self.config.judgment_default))
    }

    /// All four sub-scores and the weight-normalised index.
    ///
    /// Negative weights count as zero; if no weight is positive the index is 0.
    pub fn compute(&self, features: &ActivityFeatures, weights: &AutonomyWeights) -> AutonomyResult {
        let mut result = AutonomyResult {
            skills: self.skills(features),
            budgeting: self.budgeting(features),
            community: self.community(features),
            judgment: self.judgment(features),
            index: 0.0,
        };

        let total_weight: f64 = Area::ALL.iter().map(|a| weights.effective(*a)).sum();
        if total_weight > 0.0 {
            let weighted: f64 = Area::ALL
                .iter()
                .map(|a| result.score(*a) * weights.effective(*a))
                .sum();
            result.index = clamp_score(weighted / total_weight);
        }

        tracing::debug!(
            skills = result.skills,
            budgeting = result.budgeting,
            community = result.community,
            judgment = result.judgment,
            index = result.index,
            "computed autonomy scores"
        );
        result
    }

    /// Like [`compute`](Self::compute), but rejects weights that fail validation.
    pub fn compute_checked(
        &self,
        features: &ActivityFeatures,
        weights: &AutonomyWeights,
    ) -> Result<AutonomyResult, ScoreError> {
        weights.validate()?;
        Ok(self.compute(features, weights))
    }
}

fn clamp_score(value: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, MAX_SCORE)
}

fn capped(value: f64, cap: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, finite_or_zero(cap).max(0.0))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indiepilot_types::activity::{JarLedger, JarTotals};

    fn scorer() -> AutonomyScorer {
        AutonomyScorer::default()
    }

    fn features_with_quests(n: u32) -> ActivityFeatures {
        ActivityFeatures {
            completed_quests: n,
            ..ActivityFeatures::default()
        }
    }

    fn jar_scenario(streak_days: u32) -> ActivityFeatures {
        ActivityFeatures {
            streak_days,
            jars: JarLedger {
                spend: JarTotals {
                    deposited: 40.0,
                    withdrawn: 50.0,
                },
                save: JarTotals {
                    deposited: 30.0,
                    withdrawn: 0.0,
                },
                share: JarTotals {
                    deposited: 10.0,
                    withdrawn: 0.0,
                },
            },
            health_proxy: 0.375,
            ..ActivityFeatures::default()
        }
    }

    #[test]
    fn test_skills_saturates_at_100() {
        let s = scorer();
        assert_eq!(s.skills(&features_with_quests(12)), 100.0);
        assert_eq!(s.skills(&features_with_quests(10)), 100.0);
        assert_eq!(s.skills(&features_with_quests(3)), 30.0);
    }

    #[test]
    fn test_skills_monotonic() {
        let s = scorer();
        let mut prev = 0.0;
        for n in 0..25 {
            let score = s.skills(&features_with_quests(n));
            assert!(score >= prev);
            prev = score;
        }
    }

    #[test]
    fn test_budgeting_jar_scenario() {
        let s = scorer();
        // 37.5 base, no streak, penalty min(30, 10 * 1.0)
        assert!((s.budgeting(&jar_scenario(0)) - 27.5).abs() < 1e-9);
        // streak of 3 days adds 6
        assert!((s.budgeting(&jar_scenario(3)) - 33.5).abs() < 1e-9);
    }

    #[test]
    fn test_streak_bonus_capped() {
        let s = scorer();
        assert_eq!(s.streak_bonus(0), 0.0);
        assert_eq!(s.streak_bonus(5), 10.0);
        assert_eq!(s.streak_bonus(10), 20.0);
        assert_eq!(s.streak_bonus(365), 20.0);
    }

    #[test]
    fn test_overspend_penalty_capped() {
        let mut features = jar_scenario(0);
        features.jars.spend.withdrawn = 1_000.0;
        assert_eq!(scorer().overspend_penalty(&features), 30.0);
        assert_eq!(scorer().budgeting(&features), 7.5);
    }

    #[test]
    fn test_budgeting_clamped_high() {
        let features = ActivityFeatures {
            health_proxy: 1.0,
            streak_days: 30,
            ..ActivityFeatures::default()
        };
        assert_eq!(scorer().budgeting(&features), 100.0);
    }

    #[test]
    fn test_community_rewards_claims_received() {
        let features = ActivityFeatures {
            posts_created: 2,
            claims_received: 3,
            posts_claimed: 50,
            ..ActivityFeatures::default()
        };
        assert_eq!(scorer().community(&features), 40.0);
    }

    #[test]
    fn test_judgment_defaults_to_50_without_sims() {
        assert_eq!(scorer().judgment(&ActivityFeatures::default()), 50.0);
    }

    #[test]
    fn test_judgment_uses_latest_window() {
        let features = ActivityFeatures {
            recent_sim_scores: vec![0.0, 60.0, 70.0, 80.0, 90.0, 100.0],
            ..ActivityFeatures::default()
        };
        assert_eq!(scorer().judgment(&features), 80.0);
    }

    #[test]
    fn test_index_with_default_weights() {
        let features = ActivityFeatures {
            completed_quests: 10,
            health_proxy: 0.5,
            posts_created: 4,
            recent_sim_scores: vec![80.0],
            ..ActivityFeatures::default()
        };
        let result = scorer().compute(&features, &AutonomyWeights::default());
        // 100*.30 + 50*.30 + 20*.15 + 80*.25
        assert!((result.index - 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_index_normalises_non_unit_weights() {
        let features = features_with_quests(5);
        let weights = AutonomyWeights::try_new(2.0, 0.0, 0.0, 2.0).unwrap();
        let result = scorer().compute(&features, &weights);
        // (50*2 + 50*2) / 4
        assert!((result.index - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_zero_weights_give_zero_index() {
        let weights = AutonomyWeights::try_new(0.0, 0.0, 0.0, 0.0).unwrap();
        let result = scorer().compute(&features_with_quests(10), &weights);
        assert_eq!(result.index, 0.0);
        assert_eq!(result.skills, 100.0);
    }

    #[test]
    fn test_single_negative_weight_counts_as_zero() {
        let weights = AutonomyWeights {
            skills: -5.0,
            budgeting: 0.0,
            community: 0.0,
            judgment: 1.0,
        };
        let result = scorer().compute(&features_with_quests(10), &weights);
        assert_eq!(result.index, 50.0);
    }

    #[test]
    fn test_compute_checked_rejects_all_negative() {
        let weights = AutonomyWeights {
            skills: -1.0,
            budgeting: -1.0,
            community: -1.0,
            judgment: -1.0,
        };
        let err = scorer()
            .compute_checked(&ActivityFeatures::default(), &weights)
            .unwrap_err();
        assert!(matches!(err, ScoreError::InvalidWeightConfiguration(_)));
    }

    #[test]
    fn test_index_bounded_for_extreme_inputs() {
        let features = ActivityFeatures {
            completed_quests: u32::MAX,
            streak_days: u32::MAX,
            health_proxy: f64::NAN,
            posts_created: u32::MAX,
            claims_received: u32::MAX,
            recent_sim_scores: vec![f64::INFINITY],
            ..ActivityFeatures::default()
        };
        for weights in [
            AutonomyWeights::default(),
            AutonomyWeights::try_new(1e9, 0.0, 3.0, 1e-9).unwrap(),
        ] {
            let result = scorer().compute(&features, &weights);
            for area in Area::ALL {
                let v = result.score(area);
                assert!((0.0..=100.0).contains(&v), "{area} out of range: {v}");
            }
            assert!((0.0..=100.0).contains(&result.index));
        }
    }

    #[test]
    fn test_custom_config_changes_rates() {
        let s = AutonomyScorer::new(ScoringConfig {
            points_per_quest: 25.0,
            ..ScoringConfig::default()
        });
        assert_eq!(s.skills(&features_with_quests(2)), 50.0);
    }
}
