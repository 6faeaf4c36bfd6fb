//! Settings repository trait definition.

use indiepilot_types::activity::UserId;
use indiepilot_types::error::RepositoryError;
use indiepilot_types::settings::UserSettings;

/// Read access to per-user settings.
pub trait SettingsRepository: Send + Sync {
    /// The stored settings, or `None` when the user never saved any.
    fn get_settings(
        &self,
        user: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<UserSettings>, RepositoryError>> + Send;
}
