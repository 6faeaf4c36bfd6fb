//! SQLite settings repository implementation.

use indiepilot_core::repository::settings::SettingsRepository;
use indiepilot_types::activity::UserId;
use indiepilot_types::autonomy::AutonomyWeights;
use indiepilot_types::error::RepositoryError;
use indiepilot_types::settings::{JarAllocation, UserSettings};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SettingsRepository` over `user_settings`.
pub struct SqliteSettingsRepository {
    pool: DatabasePool,
}

impl SqliteSettingsRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SettingsRow {
    spend_ratio: f64,
    save_ratio: f64,
    share_ratio: f64,
    skills_weight: f64,
    budgeting_weight: f64,
    community_weight: f64,
    judgment_weight: f64,
}

impl SettingsRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            spend_ratio: row.try_get("spend_ratio")?,
            save_ratio: row.try_get("save_ratio")?,
            share_ratio: row.try_get("share_ratio")?,
            skills_weight: row.try_get("skills_weight")?,
            budgeting_weight: row.try_get("budgeting_weight")?,
            community_weight: row.try_get("community_weight")?,
            judgment_weight: row.try_get("judgment_weight")?,
        })
    }

    /// Weights are passed through unvalidated; the service decides what to
    /// do with an unusable set.
    fn into_settings(self) -> UserSettings {
        UserSettings {
            allocation: JarAllocation {
                spend: self.spend_ratio,
                save: self.save_ratio,
                share: self.share_ratio,
            },
            weights: AutonomyWeights {
                skills: self.skills_weight,
                budgeting: self.budgeting_weight,
                community: self.community_weight,
                judgment: self.judgment_weight,
            },
        }
    }
}

impl SettingsRepository for SqliteSettingsRepository {
    async fn get_settings(&self, user: &UserId) -> Result<Option<UserSettings>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT spend_ratio, save_ratio, share_ratio,
                      skills_weight, budgeting_weight, community_weight, judgment_weight
               FROM user_settings WHERE user_id = ?"#,
        )
        .bind(user.as_str())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let settings = SettingsRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(settings.into_settings()))
            }
            None => Ok(None),
        }
    }
}
