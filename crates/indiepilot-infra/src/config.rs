//! `config.toml` loading.
//!
//! The file lives in the data directory and only carries `[scoring]`
//! tunables. Anything unusable (unreadable, bad TOML, values the scorer
//! cannot work with) is reported and replaced by [`GlobalConfig::default()`].

use std::path::Path;

use indiepilot_types::config::{GlobalConfig, ScoringConfig};

pub const CONFIG_FILE: &str = "config.toml";

/// Load `{data_dir}/config.toml`, or defaults.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let path = data_dir.join(CONFIG_FILE);

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using default scoring");
            return GlobalConfig::default();
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config unreadable, using default scoring");
            return GlobalConfig::default();
        }
    };

    let config: GlobalConfig = match toml::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config malformed, using default scoring");
            return GlobalConfig::default();
        }
    };

    if let Err(reason) = check_scoring(&config.scoring) {
        tracing::warn!(path = %path.display(), reason, "scoring section rejected, using default scoring");
        return GlobalConfig::default();
    }

    tracing::debug!(path = %path.display(), "loaded scoring config");
    config
}

/// Values the scorer cannot use: non-finite or negative rates and caps, a
/// judgment default outside [0, 100], or zero-sized windows.
fn check_scoring(scoring: &ScoringConfig) -> Result<(), &'static str> {
    let rates = [
        scoring.points_per_quest,
        scoring.streak_bonus_per_day,
        scoring.streak_bonus_cap,
        scoring.overspend_penalty_per_unit,
        scoring.overspend_penalty_cap,
        scoring.points_per_post,
        scoring.points_per_claim,
    ];
    if rates.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("rates and caps must be finite and non-negative");
    }
    if !(0.0..=100.0).contains(&scoring.judgment_default) {
        return Err("judgment_default must be within 0..=100");
    }
    if scoring.judgment_window == 0 {
        return Err("judgment_window must be at least 1");
    }
    if scoring.default_top_k == 0 {
        return Err("default_top_k must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indiepilot_types::config::ScoringConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[scoring]
points_per_quest = 5.0
overspend_penalty_cap = 15.0
default_top_k = 5
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.scoring.points_per_quest, 5.0);
        assert_eq!(config.scoring.overspend_penalty_cap, 15.0);
        assert_eq!(config.scoring.default_top_k, 5);
        assert_eq!(config.scoring.judgment_window, 5);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_wrong_types_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "[scoring]\njudgment_window = \"five\"\n",
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.scoring.judgment_window, 5);
    }

    #[tokio::test]
    async fn load_global_config_unusable_scoring_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join(CONFIG_FILE),
            "[scoring]\npoints_per_quest = 12.0\njudgment_window = 0\n",
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn check_scoring_rejects_negative_cap_and_out_of_range_default() {
        let mut scoring = ScoringConfig::default();
        assert!(check_scoring(&scoring).is_ok());

        scoring.overspend_penalty_cap = -1.0;
        assert!(check_scoring(&scoring).is_err());

        scoring = ScoringConfig::default();
        scoring.judgment_default = 150.0;
        assert!(check_scoring(&scoring).is_err());
    }
}
