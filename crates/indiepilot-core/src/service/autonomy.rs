//! Autonomy service.
//!
//! Fetches a user's records through the repository ports, then runs the
//! pure aggregation, scoring, and recommendation functions over them. The
//! skill graph is built once by the caller and shared read-only.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use indiepilot_types::activity::{ActivityFeatures, ActivityRecords, BudgetBadge, UserId};
use indiepilot_types::autonomy::{AutonomyReport, AutonomyWeights, Insight, Milestone};
use indiepilot_types::config::ScoringConfig;
use indiepilot_types::error::ServiceError;
use indiepilot_types::settings::{JarSplit, UserSettings};
use indiepilot_types::skill::{
    RecommendedSkill, SkillDefinition, SkillId, SkillStats, SkillTreeNode,
};

use crate::activity::{aggregate, budget_badges, completed_skill_set, jar_ledger, logging_streak};
use crate::graph::SkillGraph;
use crate::guidance;
use crate::progress;
use crate::recommend::recommend;
use crate::repository::activity::ActivityRepository;
use crate::repository::settings::SettingsRepository;
use crate::scoring::AutonomyScorer;

/// Service computing autonomy scores and skill recommendations per user.
///
/// Generic over repository traits to maintain clean architecture --
/// indiepilot-core never depends on indiepilot-infra.
pub struct AutonomyService<A: ActivityRepository, S: SettingsRepository> {
    activity: A,
    settings: S,
    graph: Arc<SkillGraph>,
    scorer: AutonomyScorer,
}

impl<A: ActivityRepository, S: SettingsRepository> AutonomyService<A, S> {
    pub fn new(activity: A, settings: S, graph: Arc<SkillGraph>, config: ScoringConfig) -> Self {
        Self {
            activity,
            settings,
            graph,
            scorer: AutonomyScorer::new(config),
        }
    }

    pub fn graph(&self) -> &SkillGraph {
        &self.graph
    }

    pub fn config(&self) -> &ScoringConfig {
        self.scorer.config()
    }

    /// Stored settings, or defaults when none are saved.
    ///
    /// Weights that fail validation are replaced by the defaults.
    pub async fn settings(&self, user: &UserId) -> Result<UserSettings, ServiceError> {
        let Some(mut settings) = self.settings.get_settings(user).await? else {
            tracing::debug!(user = %user, "no stored settings, using defaults");
            return Ok(UserSettings::default());
        };
        if let Err(e) = settings.weights.validate() {
            tracing::warn!(user = %user, error = %e, "stored weights rejected, using defaults");
            settings.weights = AutonomyWeights::default();
        }
        Ok(settings)
    }

    /// Everything the aggregator reads for one user.
    pub async fn load_records(&self, user: &UserId) -> Result<ActivityRecords, ServiceError> {
        Ok(ActivityRecords {
            completions: self.activity.fetch_completions(user).await?,
            budget_entries: self.activity.fetch_budget_entries(user).await?,
            posts_authored: self.activity.fetch_posts_authored(user).await?,
            claims_on_own_posts: self.activity.fetch_claims_on_posts_by(user).await?,
            claims_made: self.activity.fetch_claims_made_by(user).await?,
            recent_sim_runs: self
                .activity
                .fetch_recent_sim_runs(user, self.config().judgment_window)
                .await?,
        })
    }

    pub async fn completed_skills(&self, user: &UserId) -> Result<BTreeSet<SkillId>, ServiceError> {
        let completions = self.activity.fetch_completions(user).await?;
        Ok(completed_skill_set(&completions))
    }

    pub async fn features(&self, user: &UserId) -> Result<ActivityFeatures, ServiceError> {
        let records = self.load_records(user).await?;
        Ok(aggregate(user, &records, Utc::now(), self.config()))
    }

    /// Sub-scores and Autonomy Index for `user` as of now.
    pub async fn compute_autonomy_index(&self, user: &UserId) -> Result<AutonomyReport, ServiceError> {
        self.compute_autonomy_index_at(user, Utc::now()).await
    }

    /// Sub-scores and Autonomy Index for `user` as of `now`.
    #[tracing::instrument(name = "compute_autonomy_index", skip(self, user, now), fields(user = %user))]
    pub async fn compute_autonomy_index_at(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<AutonomyReport, ServiceError> {
        let settings = self.settings(user).await?;
        let records = self.load_records(user).await?;
        let features = aggregate(user, &records, now, self.config());
        let result = self.scorer.compute(&features, &settings.weights);

        tracing::info!(index = result.index, "autonomy index computed");
        Ok(AutonomyReport {
            user_id: user.clone(),
            features,
            weights: settings.weights,
            result,
            computed_at: now,
        })
    }

    /// The best `top_k` next skills, joined with their definitions.
    ///
    /// `None` uses the configured default.
    #[tracing::instrument(name = "recommend_skills", skip(self, user), fields(user = %user))]
    pub async fn recommend_skills(
        &self,
        user: &UserId,
        top_k: Option<usize>,
    ) -> Result<Vec<RecommendedSkill>, ServiceError> {
        let completed = self.completed_skills(user).await?;
        let top_k = top_k.unwrap_or(self.config().default_top_k);

        recommend(&self.graph, &completed)
            .into_iter()
            .take(top_k)
            .map(|recommendation| -> Result<RecommendedSkill, ServiceError> {
                let skill = self.graph.get(&recommendation.skill_id)?.clone();
                Ok(RecommendedSkill {
                    recommendation,
                    skill,
                })
            })
            .collect()
    }

    pub async fn learning_path(
        &self,
        user: &UserId,
        target: &SkillId,
    ) -> Result<Vec<SkillDefinition>, ServiceError> {
        let completed = self.completed_skills(user).await?;
        let path = self.graph.learning_path(target, &completed)?;
        Ok(path.into_iter().cloned().collect())
    }

    pub async fn skill_tree(&self, user: &UserId) -> Result<Vec<SkillTreeNode>, ServiceError> {
        let completed = self.completed_skills(user).await?;
        Ok(progress::skill_tree(&self.graph, &completed))
    }

    pub async fn skill_stats(&self, user: &UserId) -> Result<SkillStats, ServiceError> {
        let completed = self.completed_skills(user).await?;
        Ok(progress::skill_stats(&self.graph, &completed))
    }

    pub async fn insights(&self, user: &UserId) -> Result<Vec<Insight>, ServiceError> {
        let report = self.compute_autonomy_index(user).await?;
        Ok(guidance::insights(&report.result))
    }

    pub async fn milestones(&self, user: &UserId) -> Result<Vec<Milestone>, ServiceError> {
        let features = self.features(user).await?;
        let sim_runs = self.activity.count_sim_runs(user).await?;
        Ok(guidance::next_milestones(&features, sim_runs))
    }

    pub async fn badges(&self, user: &UserId) -> Result<Vec<BudgetBadge>, ServiceError> {
        let entries = self.activity.fetch_budget_entries(user).await?;
        let jars = jar_ledger(&entries);
        let streak = logging_streak(&entries, Utc::now());
        Ok(budget_badges(&entries, streak, &jars))
    }

    /// Split an income amount across the jars using the user's allocation,
    /// or the default allocation when no user is given.
    pub async fn split(&self, user: Option<&UserId>, amount: f64) -> Result<JarSplit, ServiceError> {
        let settings = match user {
            Some(user) => self.settings(user).await?,
            None => UserSettings::default(),
        };
        Ok(settings.allocation.split(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use indiepilot_types::activity::{
        BoardClaim, BoardPost, BudgetEntry, CompletionRecord, Jar, SimRun,
    };
    use indiepilot_types::error::{GraphError, RepositoryError};
    use indiepilot_types::settings::JarAllocation;

    // --- Mock repositories for testing ---

    #[derive(Default)]
    struct MockActivity {
        completions: Vec<CompletionRecord>,
        entries: Vec<BudgetEntry>,
        posts: Vec<BoardPost>,
        claims_on_mine: Vec<BoardClaim>,
        claims_made: Vec<BoardClaim>,
        sims: Vec<SimRun>,
        fail: bool,
    }

    impl MockActivity {
        fn with_completed(mut self, user: &str, skills: &[&str]) -> Self {
            for s in skills {
                self.completions.push(CompletionRecord::finished(
                    UserId::new(user),
                    SkillId::new(*s),
                    now(),
                ));
            }
            self
        }

        fn check(&self) -> Result<(), RepositoryError> {
            if self.fail {
                Err(RepositoryError::Query("database is locked".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl ActivityRepository for MockActivity {
        async fn fetch_completions(
            &self,
            _user: &UserId,
        ) -> Result<Vec<CompletionRecord>, RepositoryError> {
            self.check()?;
            Ok(self.completions.clone())
        }

        async fn fetch_budget_entries(
            &self,
            _user: &UserId,
        ) -> Result<Vec<BudgetEntry>, RepositoryError> {
            self.check()?;
            Ok(self.entries.clone())
        }

        async fn fetch_posts_authored(
            &self,
            _user: &UserId,
        ) -> Result<Vec<BoardPost>, RepositoryError> {
            self.check()?;
            Ok(self.posts.clone())
        }

        async fn fetch_claims_on_posts_by(
            &self,
            _author: &UserId,
        ) -> Result<Vec<BoardClaim>, RepositoryError> {
            self.check()?;
            Ok(self.claims_on_mine.clone())
        }

        async fn fetch_claims_made_by(
            &self,
            _user: &UserId,
        ) -> Result<Vec<BoardClaim>, RepositoryError> {
            self.check()?;
            Ok(self.claims_made.clone())
        }

        async fn fetch_recent_sim_runs(
            &self,
            _user: &UserId,
            limit: usize,
        ) -> Result<Vec<SimRun>, RepositoryError> {
            self.check()?;
            Ok(self.sims.iter().take(limit).cloned().collect())
        }

        async fn count_sim_runs(&self, _user: &UserId) -> Result<u32, RepositoryError> {
            self.check()?;
            Ok(self.sims.len() as u32)
        }
    }

    struct MockSettings(Option<UserSettings>);

    impl SettingsRepository for MockSettings {
        async fn get_settings(
            &self,
            _user: &UserId,
        ) -> Result<Option<UserSettings>, RepositoryError> {
            Ok(self.0)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn service(
        activity: MockActivity,
        settings: Option<UserSettings>,
    ) -> AutonomyService<MockActivity, MockSettings> {
        AutonomyService::new(
            activity,
            MockSettings(settings),
            Arc::new(SkillGraph::builtin().unwrap()),
            ScoringConfig::default(),
        )
    }

    fn user() -> UserId {
        UserId::new("demo")
    }

    #[tokio::test]
    async fn test_new_user_gets_neutral_report() {
        let svc = service(MockActivity::default(), None);
        let report = svc.compute_autonomy_index_at(&user(), now()).await.unwrap();
        assert_eq!(report.result.skills, 0.0);
        assert_eq!(report.result.budgeting, 0.0);
        assert_eq!(report.result.community, 0.0);
        assert_eq!(report.result.judgment, 50.0);
        // only judgment contributes: 50 * 0.25
        assert!((report.result.index - 12.5).abs() < 1e-9);
        assert_eq!(report.weights, AutonomyWeights::default());
    }

    #[tokio::test]
    async fn test_report_uses_stored_weights() {
        let settings = UserSettings {
            allocation: JarAllocation::default(),
            weights: AutonomyWeights::try_new(1.0, 0.0, 0.0, 0.0).unwrap(),
        };
        let activity = MockActivity::default().with_completed("demo", &["a", "b", "c"]);
        let svc = service(activity, Some(settings));
        let report = svc.compute_autonomy_index_at(&user(), now()).await.unwrap();
        assert_eq!(report.result.index, 30.0);
    }

    #[tokio::test]
    async fn test_invalid_stored_weights_fall_back_to_defaults() {
        let settings = UserSettings {
            allocation: JarAllocation::default(),
            weights: AutonomyWeights {
                skills: -1.0,
                budgeting: -1.0,
                community: -1.0,
                judgment: -1.0,
            },
        };
        let svc = service(MockActivity::default(), Some(settings));
        let report = svc.compute_autonomy_index_at(&user(), now()).await.unwrap();
        assert_eq!(report.weights, AutonomyWeights::default());
    }

    #[tokio::test]
    async fn test_judgment_window_from_sims() {
        let sims = (0..7)
            .map(|i| SimRun {
                scenario_id: "rent_day".to_string(),
                score: 100.0 - f64::from(i) * 10.0,
                ran_at: now() - Duration::hours(i64::from(i)),
            })
            .collect();
        let activity = MockActivity {
            sims,
            ..MockActivity::default()
        };
        let svc = service(activity, None);
        let report = svc.compute_autonomy_index_at(&user(), now()).await.unwrap();
        // newest five: 100, 90, 80, 70, 60
        assert_eq!(report.result.judgment, 80.0);
        assert_eq!(report.features.recent_sim_scores, vec![60.0, 70.0, 80.0, 90.0, 100.0]);
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let activity = MockActivity {
            fail: true,
            ..MockActivity::default()
        };
        let svc = service(activity, None);
        let err = svc.compute_autonomy_index_at(&user(), now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(RepositoryError::Query(_))));
    }

    #[tokio::test]
    async fn test_recommend_skills_truncates_and_joins() {
        let svc = service(MockActivity::default(), None);
        let recs = svc.recommend_skills(&user(), Some(2)).await.unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].skill.id.as_str(), "time_management");
        assert_eq!(recs[0].recommendation.skill_id, recs[0].skill.id);
        assert_eq!(recs[1].skill.id.as_str(), "budget_tracking");

        let default_k = svc.recommend_skills(&user(), None).await.unwrap();
        assert_eq!(default_k.len(), 3);
    }

    #[tokio::test]
    async fn test_recommend_skills_excludes_completed() {
        let activity = MockActivity::default().with_completed("demo", &["time_management"]);
        let svc = service(activity, None);
        let recs = svc.recommend_skills(&user(), Some(50)).await.unwrap();
        assert!(recs.iter().all(|r| r.skill.id.as_str() != "time_management"));
        for r in &recs {
            assert!(svc.graph().get(&r.skill.id).is_ok());
        }
    }

    #[tokio::test]
    async fn test_learning_path_unknown_target() {
        let svc = service(MockActivity::default(), None);
        let err = svc
            .learning_path(&user(), &SkillId::new("skydiving"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Graph(GraphError::UnknownSkill(_))));
    }

    #[tokio::test]
    async fn test_milestones_use_sim_count() {
        let activity = MockActivity {
            sims: vec![SimRun {
                scenario_id: "first_paycheck".to_string(),
                score: 70.0,
                ran_at: now(),
            }],
            ..MockActivity::default()
        };
        let svc = service(activity, None);
        let milestones = svc.milestones(&user()).await.unwrap();
        let judgment = milestones.last().unwrap();
        assert_eq!(judgment.current, 1);
        assert_eq!(judgment.target, 2);
    }

    #[tokio::test]
    async fn test_badges_for_saver() {
        let activity = MockActivity {
            entries: vec![BudgetEntry {
                id: uuid::Uuid::now_v7(),
                jar: Jar::Save,
                amount: 150.0,
                logged_at: now() - Duration::days(400),
            }],
            ..MockActivity::default()
        };
        let svc = service(activity, None);
        let badges = svc.badges(&user()).await.unwrap();
        assert_eq!(badges, vec![BudgetBadge::FirstSteps, BudgetBadge::Saver]);
    }

    #[tokio::test]
    async fn test_split_defaults_without_user() {
        let svc = service(MockActivity::default(), None);
        let split = svc.split(None, 100.0).await.unwrap();
        assert!((split.spend - 60.0).abs() < 1e-9);
        assert!((split.save - 30.0).abs() < 1e-9);
        assert!((split.share - 10.0).abs() < 1e-9);
    }
}
