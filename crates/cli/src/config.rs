//! Layered configuration loading.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `GITHUB_TOKEN` (token only)
//! 3. `.sprintboard/config.toml`, or the file passed with `--config`
//! 4. Environment variables (`SPRINTBOARD_*` prefix, `__` separates sections)
//!
//! `SPRINTBOARD_GITHUB__OWNER` maps to `github.owner`, `SPRINTBOARD_PROJECT`
//! to `project`, and so on.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use github::GithubConfig;
use serde::{Deserialize, Serialize};

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".sprintboard/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,

    /// Title of the board used when `--project` is not given.
    #[serde(default)]
    pub project: Option<String>,
}

impl AppConfig {
    /// Loads configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(config_path).extract()
    }

    /// Builds the provider chain.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default())).merge(
            Env::raw()
                .only(&["GITHUB_TOKEN"])
                .map(|_| "github.token".into()),
        );

        let path = config_path.map_or_else(|| PathBuf::from(LOCAL_CONFIG_PATH), Path::to_path_buf);
        if path.exists() {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("SPRINTBOARD_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_without_any_source() {
        Jail::expect_with(|_| {
            let config = AppConfig::load(None)?;
            assert!(config.project.is_none());
            assert!(config.github.owner.is_none());
            assert_eq!(config.github.endpoint, github::DEFAULT_ENDPOINT);
            Ok(())
        });
    }

    #[test]
    fn file_values_are_loaded() {
        Jail::expect_with(|jail| {
            jail.create_dir(".sprintboard")?;
            jail.create_file(
                LOCAL_CONFIG_PATH,
                r#"
                project = "Release 1"

                [github]
                owner = "octo-org"
                timeout_secs = 5
                "#,
            )?;

            let config = AppConfig::load(None)?;
            assert_eq!(config.project.as_deref(), Some("Release 1"));
            assert_eq!(
                config.github.owner.as_ref().map(|o| o.as_str()),
                Some("octo-org")
            );
            assert_eq!(config.github.timeout_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "project = \"From File\"")?;
            jail.set_env("SPRINTBOARD_PROJECT", "From Env");
            jail.set_env("SPRINTBOARD_GITHUB__OWNER", "octocat");

            let config = AppConfig::load(Some(Path::new("custom.toml")))?;
            assert_eq!(config.project.as_deref(), Some("From Env"));
            assert_eq!(
                config.github.owner.as_ref().map(|o| o.as_str()),
                Some("octocat")
            );
            Ok(())
        });
    }

    #[test]
    fn github_token_is_a_fallback() {
        Jail::expect_with(|jail| {
            jail.set_env("GITHUB_TOKEN", "ghp_fallback");
            let config = AppConfig::load(None)?;
            assert_eq!(
                config.github.token.as_ref().map(|t| t.expose()),
                Some("ghp_fallback")
            );

            jail.set_env("SPRINTBOARD_GITHUB__TOKEN", " ghp_explicit\n");
            let config = AppConfig::load(None)?;
            assert_eq!(
                config.github.token.as_ref().map(|t| t.expose()),
                Some("ghp_explicit")
            );
            Ok(())
        });
    }

    #[test]
    fn blank_token_and_owner_are_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("GITHUB_TOKEN", "");
            assert!(AppConfig::load(None).is_err());

            jail.set_env("GITHUB_TOKEN", "ghp_valid");
            jail.set_env("SPRINTBOARD_GITHUB__OWNER", "");
            assert!(AppConfig::load(None).is_err());

            jail.set_env("SPRINTBOARD_GITHUB__OWNER", "octo-org");
            let config = AppConfig::load(None)?;
            assert!(config.github.validate().is_ok());
            Ok(())
        });
    }
}
