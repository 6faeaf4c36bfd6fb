//! SQLite snapshot repository implementation.
//!
//! Appends one `autonomy_snapshot` row per saved report. Rows are never
//! updated or read back by the scorer.

use indiepilot_core::repository::snapshot::SnapshotRepository;
use indiepilot_types::autonomy::AutonomyReport;
use indiepilot_types::error::RepositoryError;
use uuid::Uuid;

use super::format_timestamp;
use super::pool::DatabasePool;

pub struct SqliteSnapshotRepository {
    pool: DatabasePool,
}

impl SqliteSnapshotRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository {
    async fn save_snapshot(&self, report: &AutonomyReport) -> Result<(), RepositoryError> {
        let weights = serde_json::to_string(&report.weights)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize weights: {e}")))?;
        let result = &report.result;

        sqlx::query(
            r#"INSERT INTO autonomy_snapshot
               (id, user_id, skills, budgeting, community, judgment, autonomy, weights, computed_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(report.user_id.as_str())
        .bind(result.skills)
        .bind(result.budgeting)
        .bind(result.community)
        .bind(result.judgment)
        .bind(result.index)
        .bind(&weights)
        .bind(format_timestamp(&report.computed_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tracing::debug!(user = %report.user_id, index = result.index, "saved autonomy snapshot");
        Ok(())
    }
}
