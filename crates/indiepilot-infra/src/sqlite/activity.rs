//! SQLite activity repository implementation.
//!
//! Reads the tables the companion app writes: `quest_progress`,
//! `budget_log`, `board_post`, `board_claim` and `sim_run`.

use std::str::FromStr;

use indiepilot_core::repository::activity::ActivityRepository;
use indiepilot_types::activity::{
    BoardClaim, BoardPost, BudgetEntry, CompletionRecord, Jar, SimRun, UserId,
};
use indiepilot_types::error::RepositoryError;
use indiepilot_types::skill::SkillId;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{RowError, decode_rows, parse_timestamp};

/// SQLite-backed implementation of `ActivityRepository`.
pub struct SqliteActivityRepository {
    pool: DatabasePool,
}

impl SqliteActivityRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        sql: &'static str,
        user: &UserId,
    ) -> Result<Vec<SqliteRow>, RepositoryError> {
        sqlx::query(sql)
            .bind(user.as_str())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Row decoding
// ---------------------------------------------------------------------------

fn completion_from_row(row: &SqliteRow) -> Result<CompletionRecord, RowError> {
    let user_id: String = row.try_get("user_id")?;
    let quest_id: String = row.try_get("quest_id")?;
    let raw: Option<String> = row.try_get("completed_at")?;
    let completed_at = match raw.as_deref().map(parse_timestamp) {
        Some(Ok(at)) => Some(at),
        Some(Err(e)) => {
            tracing::warn!(
                user = %user_id,
                quest = %quest_id,
                error = %e,
                "unreadable completed_at, counting quest as completed"
            );
            None
        }
        None => None,
    };
    Ok(CompletionRecord {
        completed: raw.is_some(),
        user_id: UserId::new(user_id),
        skill_id: SkillId::new(quest_id),
        completed_at,
    })
}

fn budget_entry_from_row(row: &SqliteRow) -> Result<BudgetEntry, RowError> {
    let id: String = row.try_get("id")?;
    let jar: String = row.try_get("jar")?;
    let ts: String = row.try_get("ts")?;
    Ok(BudgetEntry {
        id: Uuid::parse_str(&id)?,
        jar: Jar::from_str(&jar).map_err(RowError::Jar)?,
        amount: row.try_get("amount")?,
        logged_at: parse_timestamp(&ts)?,
    })
}

fn post_from_row(row: &SqliteRow) -> Result<BoardPost, RowError> {
    let author: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;
    Ok(BoardPost {
        id: row.try_get("id")?,
        author: UserId::new(author),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn claim_from_row(row: &SqliteRow) -> Result<BoardClaim, RowError> {
    let claimant: String = row.try_get("user_id")?;
    let claimed_at: String = row.try_get("claimed_at")?;
    Ok(BoardClaim {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        claimant: UserId::new(claimant),
        claimed_at: parse_timestamp(&claimed_at)?,
    })
}

fn sim_run_from_row(row: &SqliteRow) -> Result<SimRun, RowError> {
    let ran_at: String = row.try_get("ran_at")?;
    Ok(SimRun {
        scenario_id: row.try_get("scenario_id")?,
        score: row.try_get("score")?,
        ran_at: parse_timestamp(&ran_at)?,
    })
}

// ---------------------------------------------------------------------------
// ActivityRepository implementation
// ---------------------------------------------------------------------------

impl ActivityRepository for SqliteActivityRepository {
    async fn fetch_completions(
        &self,
        user: &UserId,
    ) -> Result<Vec<CompletionRecord>, RepositoryError> {
        let rows = self
            .fetch(
                "SELECT user_id, quest_id, completed_at FROM quest_progress WHERE user_id = ? ORDER BY quest_id",
                user,
            )
            .await?;
        Ok(decode_rows("quest_progress", &rows, completion_from_row))
    }

    async fn fetch_budget_entries(
        &self,
        user: &UserId,
    ) -> Result<Vec<BudgetEntry>, RepositoryError> {
        let rows = self
            .fetch(
                "SELECT id, amount, jar, ts FROM budget_log WHERE user_id = ? ORDER BY datetime(ts), id",
                user,
            )
            .await?;
        Ok(decode_rows("budget_log", &rows, budget_entry_from_row))
    }

    async fn fetch_posts_authored(&self, user: &UserId) -> Result<Vec<BoardPost>, RepositoryError> {
        let rows = self
            .fetch(
                "SELECT id, user_id, created_at FROM board_post WHERE user_id = ? ORDER BY datetime(created_at), id",
                user,
            )
            .await?;
        Ok(decode_rows("board_post", &rows, post_from_row))
    }

    async fn fetch_claims_on_posts_by(
        &self,
        author: &UserId,
    ) -> Result<Vec<BoardClaim>, RepositoryError> {
        let rows = self
            .fetch(
                r#"SELECT bc.id, bc.post_id, bc.user_id, bc.claimed_at
                   FROM board_claim bc
                   JOIN board_post bp ON bc.post_id = bp.id
                   WHERE bp.user_id = ?
                   ORDER BY datetime(bc.claimed_at), bc.id"#,
                author,
            )
            .await?;
        Ok(decode_rows("board_claim", &rows, claim_from_row))
    }

    async fn fetch_claims_made_by(&self, user: &UserId) -> Result<Vec<BoardClaim>, RepositoryError> {
        let rows = self
            .fetch(
                "SELECT id, post_id, user_id, claimed_at FROM board_claim WHERE user_id = ? ORDER BY datetime(claimed_at), id",
                user,
            )
            .await?;
        Ok(decode_rows("board_claim", &rows, claim_from_row))
    }

    async fn fetch_recent_sim_runs(
        &self,
        user: &UserId,
        limit: usize,
    ) -> Result<Vec<SimRun>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            "SELECT scenario_id, score, ran_at FROM sim_run WHERE user_id = ? ORDER BY datetime(ran_at) DESC, id DESC LIMIT ?",
        )
        .bind(user.as_str())
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(decode_rows("sim_run", &rows, sim_run_from_row))
    }

    async fn count_sim_runs(&self, user: &UserId) -> Result<u32, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sim_run WHERE user_id = ?")
            .bind(user.as_str())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use indiepilot_core::activity::{completed_quest_count, completed_skill_set};
    use tempfile::TempDir;

    pub(crate) async fn test_pool() -> (TempDir, DatabasePool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::open(&dir.path().join("activity.db")).await.unwrap();
        (dir, pool)
    }

    async fn exec(pool: &DatabasePool, sql: &str) {
        sqlx::query(sql).execute(&pool.writer).await.unwrap();
    }

    fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    #[tokio::test]
    async fn test_completions_include_open_rows() {
        let (_dir, pool) = test_pool().await;
        exec(
            &pool,
            r#"INSERT INTO quest_progress (id, user_id, quest_id, started_at, completed_at) VALUES
               ('1', 'demo', 'time_management', '2026-03-01T10:00:00', '2026-03-01T11:00:00.123456'),
               ('2', 'demo', 'budget_tracking', '2026-03-02T10:00:00', NULL),
               ('3', 'other', 'basic_laundry', '2026-03-02T10:00:00', '2026-03-02T10:30:00')"#,
        )
        .await;

        let repo = SqliteActivityRepository::new(pool);
        let rows = repo.fetch_completions(&user("demo")).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().filter(|r| r.is_completed()).count(), 1);
        assert!(rows.iter().all(|r| r.user_id.as_str() == "demo"));
    }

    #[tokio::test]
    async fn test_unreadable_completed_at_still_counts_as_completed() {
        let (_dir, pool) = test_pool().await;
        exec(
            &pool,
            r#"INSERT INTO quest_progress (id, user_id, quest_id, started_at, completed_at) VALUES
               ('1', 'demo', 'time_management', '2026-03-01T10:00:00', '2026-03-01T11:00:00'),
               ('2', 'demo', 'budget_tracking', '2026-03-02T10:00:00', '03/02/2026 10:00'),
               ('3', 'demo', 'basic_laundry', '2026-03-03T10:00:00', NULL)"#,
        )
        .await;

        let non_null: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quest_progress WHERE user_id = 'demo' AND completed_at IS NOT NULL",
        )
        .fetch_one(&pool.reader)
        .await
        .unwrap();

        let repo = SqliteActivityRepository::new(pool);
        let rows = repo.fetch_completions(&user("demo")).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            i64::from(completed_quest_count(&rows)),
            non_null,
            "every non-null completed_at is a completion"
        );

        let done = completed_skill_set(&rows);
        assert!(done.contains(&SkillId::new("budget_tracking")));
        assert!(!done.contains(&SkillId::new("basic_laundry")));

        let unreadable = rows
            .iter()
            .find(|r| r.skill_id.as_str() == "budget_tracking")
            .unwrap();
        assert!(unreadable.is_completed());
        assert!(unreadable.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_budget_entries_ordered_and_malformed_skipped() {
        let (_dir, pool) = test_pool().await;
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        exec(
            &pool,
            &format!(
                r#"INSERT INTO budget_log (id, user_id, ts, amount, jar) VALUES
                   ('{a}', 'demo', '2026-03-02 09:00:00', -12.5, 'spend'),
                   ('{b}', 'demo', '2026-03-01T09:00:00+00:00', 40.0, 'save'),
                   ('not-a-uuid', 'demo', '2026-03-03 09:00:00', 1.0, 'save'),
                   ('{}', 'demo', 'last tuesday', 1.0, 'share')"#,
                Uuid::now_v7()
            ),
        )
        .await;

        let repo = SqliteActivityRepository::new(pool);
        let entries = repo.fetch_budget_entries(&user("demo")).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, b);
        assert_eq!(entries[0].jar, Jar::Save);
        assert_eq!(entries[1].id, a);
        assert!((entries[1].amount + 12.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_board_claim_directions() {
        let (_dir, pool) = test_pool().await;
        exec(
            &pool,
            r#"INSERT INTO board_post (id, user_id, created_at) VALUES
               ('p1', 'demo', '2026-03-01 08:00:00'),
               ('p2', 'ana', '2026-03-01 08:00:00')"#,
        )
        .await;
        exec(
            &pool,
            r#"INSERT INTO board_claim (id, post_id, user_id, claimed_at) VALUES
               ('c1', 'p1', 'ana', '2026-03-01 09:00:00'),
               ('c2', 'p1', 'ben', '2026-03-01 10:00:00'),
               ('c3', 'p2', 'demo', '2026-03-01 11:00:00')"#,
        )
        .await;

        let repo = SqliteActivityRepository::new(pool);
        let me = user("demo");
        assert_eq!(repo.fetch_posts_authored(&me).await.unwrap().len(), 1);

        let on_mine = repo.fetch_claims_on_posts_by(&me).await.unwrap();
        let ids: Vec<&str> = on_mine.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);

        let made = repo.fetch_claims_made_by(&me).await.unwrap();
        assert_eq!(made.len(), 1);
        assert_eq!(made[0].post_id, "p2");
    }

    #[tokio::test]
    async fn test_recent_sim_runs_newest_first_with_limit() {
        let (_dir, pool) = test_pool().await;
        exec(
            &pool,
            r#"INSERT INTO sim_run (id, user_id, scenario_id, score, ran_at) VALUES
               ('s1', 'demo', 'rent_day', 40.0, '2026-03-01 08:00:00'),
               ('s2', 'demo', 'rent_day', 55.0, '2026-03-02T08:00:00'),
               ('s3', 'demo', 'first_paycheck', 90.0, '2026-03-03 08:00:00'),
               ('s4', 'ana', 'rent_day', 10.0, '2026-03-04 08:00:00')"#,
        )
        .await;

        let repo = SqliteActivityRepository::new(pool);
        let runs = repo.fetch_recent_sim_runs(&user("demo"), 2).await.unwrap();
        let scores: Vec<f64> = runs.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![90.0, 55.0]);
        assert_eq!(repo.count_sim_runs(&user("demo")).await.unwrap(), 3);
        assert_eq!(repo.count_sim_runs(&user("nobody")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_activity() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteActivityRepository::new(pool);
        let ghost = user("ghost");
        assert!(repo.fetch_completions(&ghost).await.unwrap().is_empty());
        assert!(repo.fetch_budget_entries(&ghost).await.unwrap().is_empty());
        assert!(repo.fetch_recent_sim_runs(&ghost, 5).await.unwrap().is_empty());
    }
}
