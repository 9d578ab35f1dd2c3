//! Configuration management
//!
//! settings.json layout (camelCase, shared with the bot frontend):
//! ```json
//! {
//!   "app": { "demoMode": false, ... },
//!   "links": { "projectWebsite": "...", "socialTwitter": "...", "socialTelegram": "..." }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    links: LinkSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkSettings {
    #[serde(default = "default_website")]
    project_website: String,
    #[serde(default = "default_twitter")]
    social_twitter: String,
    #[serde(default = "default_telegram")]
    social_telegram: String,
}

fn default_website() -> String {
    "https://www.g3zgraphene.com/".to_string()
}

fn default_twitter() -> String {
    "https://twitter.com/example".to_string()
}

fn default_telegram() -> String {
    "https://t.me/example".to_string()
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            project_website: default_website(),
            social_twitter: default_twitter(),
            social_telegram: default_telegram(),
        }
    }
}

/// Project and social links shown by the bot
#[derive(Debug, Clone, Serialize)]
pub struct ProjectLinks {
    pub website: String,
    pub twitter: String,
    pub telegram: String,
}

/// Graphene configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    pub links: ProjectLinks,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        let raw = SettingsFile::default();
        Self {
            demo_mode: false,
            links: links_from(&raw.links),
            _raw_settings: raw,
        }
    }
}

fn links_from(raw: &LinkSettings) -> ProjectLinks {
    ProjectLinks {
        website: raw.project_website.clone(),
        twitter: raw.social_twitter.clone(),
        telegram: raw.social_telegram.clone(),
    }
}

impl Config {
    /// Load config from the graphene directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file
    /// 2. Environment variable GRAPHENE_DEMO_MODE (for CI/testing)
    pub fn load(graphene_dir: &Path) -> Result<Self> {
        let settings_path = graphene_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Check env var for demo mode override (for CI/testing)
        let demo_mode = match std::env::var("GRAPHENE_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        Ok(Self {
            demo_mode,
            links: links_from(&raw.links),
            _raw_settings: raw,
        })
    }

    /// Save config to the graphene directory.
    /// Preserves settings fields this library doesn't manage.
    pub fn save(&self, graphene_dir: &Path) -> Result<()> {
        let settings_path = graphene_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.links.project_website = self.links.website.clone();
        settings.links.social_twitter = self.links.twitter.clone();
        settings.links.social_telegram = self.links.telegram.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.demo_mode);
        assert!(config.links.website.starts_with("https://"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.demo_mode = true;
        config.links.website = "https://example.org".to_string();
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert!(reloaded.demo_mode);
        assert_eq!(reloaded.links.website, "https://example.org");
    }

    #[test]
    fn test_unknown_app_fields_preserved() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"demoMode": false, "theme": "dark"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
        assert!(content.contains("theme"));
    }
}
