//! Application state wiring all services together.
//!
//! The service is generic over repository traits; AppState pins it to the
//! SQLite implementations from indiepilot-infra.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use indiepilot_core::graph::SkillGraph;
use indiepilot_core::service::autonomy::AutonomyService;
use indiepilot_infra::config::load_global_config;
use indiepilot_infra::filesystem::{database_path, resolve_data_dir};
use indiepilot_infra::sqlite::activity::SqliteActivityRepository;
use indiepilot_infra::sqlite::pool::DatabasePool;
use indiepilot_infra::sqlite::settings::SqliteSettingsRepository;
use indiepilot_infra::sqlite::snapshot::SqliteSnapshotRepository;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteAutonomyService = AutonomyService<SqliteActivityRepository, SqliteSettingsRepository>;

/// Shared application state used by every CLI command.
#[derive(Clone)]
pub struct AppState {
    pub autonomy: Arc<ConcreteAutonomyService>,
    pub snapshots: Arc<SqliteSnapshotRepository>,
    pub graph: Arc<SkillGraph>,
    pub db_path: PathBuf,
}

impl AppState {
    /// Initialize the application state: build the skill graph, load
    /// config, connect to the database, wire services.
    ///
    /// A catalog that fails to build is fatal.
    pub async fn init(db_override: Option<&Path>) -> anyhow::Result<Self> {
        let graph = Arc::new(SkillGraph::builtin().context("built-in skill catalog is invalid")?);

        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;

        let db_path = db_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| database_path(&data_dir));
        let db_pool = DatabasePool::open(&db_path)
            .await
            .with_context(|| format!("failed to open database {}", db_path.display()))?;

        let autonomy = AutonomyService::new(
            SqliteActivityRepository::new(db_pool.clone()),
            SqliteSettingsRepository::new(db_pool.clone()),
            graph.clone(),
            config.scoring,
        );

        tracing::debug!(
            data_dir = %data_dir.display(),
            db = %db_path.display(),
            skills = graph.len(),
            "application state ready"
        );

        Ok(Self {
            autonomy: Arc::new(autonomy),
            snapshots: Arc::new(SqliteSnapshotRepository::new(db_pool)),
            graph,
            db_path,
        })
    }
}
