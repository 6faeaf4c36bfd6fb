use thiserror::Error;

use crate::skill::SkillId;

/// Errors raised while building or querying the skill graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown skill '{0}'")]
    UnknownSkill(SkillId),

    #[error("cyclic dependency detected involving skill '{0}'")]
    CyclicDependency(SkillId),

    #[error("skill '{0}' is defined more than once")]
    DuplicateSkill(SkillId),

    #[error("invalid skill catalog: {0}")]
    Catalog(String),
}

/// Errors related to autonomy scoring configuration.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("invalid weight configuration: {0}")]
    InvalidWeightConfiguration(String),
}

/// Errors from repository operations (used by trait definitions in indiepilot-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors surfaced by the autonomy service to its callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
