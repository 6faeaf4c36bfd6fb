//! Activity repository trait definition.

use indiepilot_types::activity::{BoardClaim, BoardPost, BudgetEntry, CompletionRecord, SimRun, UserId};
use indiepilot_types::error::RepositoryError;

/// Read access to a user's recorded activity.
///
/// Implementations live in indiepilot-infra (e.g., SqliteActivityRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait ActivityRepository: Send + Sync {
    /// All quest progress rows for the user, completed or not.
    fn fetch_completions(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<CompletionRecord>, RepositoryError>> + Send;

    /// All budget entries for the user, oldest first.
    fn fetch_budget_entries(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<BudgetEntry>, RepositoryError>> + Send;

    /// Board posts authored by the user.
    fn fetch_posts_authored(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<BoardPost>, RepositoryError>> + Send;

    /// Claims placed on the user's own posts, by anyone.
    fn fetch_claims_on_posts_by(
        &self,
        author: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<BoardClaim>, RepositoryError>> + Send;

    /// Claims the user has placed.
    fn fetch_claims_made_by(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Vec<BoardClaim>, RepositoryError>> + Send;

    /// The user's most recent simulation runs, newest first.
    fn fetch_recent_sim_runs(
        &self,
        user: &UserId,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SimRun>, RepositoryError>> + Send;

    /// Total number of simulation runs for the user.
    fn count_sim_runs(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
