//! Snapshot repository trait definition.

use indiepilot_types::autonomy::AutonomyReport;
use indiepilot_types::error::RepositoryError;

/// Write side for derived autonomy results.
///
/// Snapshots are a cache of computed values for the host; nothing in the
/// core reads them back.
pub trait SnapshotRepository: Send + Sync {
    fn save_snapshot(
        &self,
        report: &AutonomyReport,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
