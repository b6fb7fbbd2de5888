use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::OutchanError;

const SLUG_PLACEHOLDER: &str = "{slug}";

/// Configuration file structure for outchan.
///
/// Everything here is fixed once the output channel is built; nothing is
/// reconfigurable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Emit timestamped debug traces instead of animating spinners
    #[serde(default)]
    pub debug: bool,

    /// Render links as clickable terminal hyperlinks when stderr is a terminal
    #[serde(default = "default_hyperlinks")]
    pub hyperlinks: bool,

    /// Where documentation slugs point to
    #[serde(default)]
    pub docs: DocsConfig,

    /// Spinner timing
    #[serde(default)]
    pub spinner: SpinnerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocsConfig {
    /// URL template for documentation slugs, must contain `{slug}`
    #[serde(default = "default_slug_url_template")]
    pub slug_url_template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpinnerConfig {
    /// Milliseconds before a spinner becomes visible
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Milliseconds between two animation frames
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            hyperlinks: default_hyperlinks(),
            docs: DocsConfig::default(),
            spinner: SpinnerConfig::default(),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            slug_url_template: default_slug_url_template(),
        }
    }
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            tick_ms: default_tick_ms(),
        }
    }
}

fn default_slug_url_template() -> String {
    "https://err.sh/vercel/{slug}".to_string()
}

fn default_delay_ms() -> u64 {
    300
}

fn default_tick_ms() -> u64 {
    80
}

fn default_hyperlinks() -> bool {
    true
}

impl DocsConfig {
    /// Builds the documentation URL for a slug.
    pub fn url_for(&self, slug: &str) -> String {
        self.slug_url_template.replace(SLUG_PLACEHOLDER, slug)
    }

    /// # Errors
    ///
    /// Returns error if the template has no `{slug}` placeholder.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.slug_url_template.contains(SLUG_PLACEHOLDER) {
            Ok(())
        } else {
            Err(OutchanError::Config(format!(
                "slug-url-template `{}` must contain {SLUG_PLACEHOLDER}",
                self.slug_url_template
            )))
        }
    }
}

impl SpinnerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./outchan.toml
    /// 3. ./outchan.json
    /// 4. ./outchan.yaml
    /// 5. ./outchan.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["outchan.toml", "outchan.json", "outchan.yaml", "outchan.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let config: Self = match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        config
            .docs
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("yaml" | "yml") => serde_yaml::to_string(self)?,
            _ => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.debug);
        assert_eq!(config.docs.slug_url_template, "https://err.sh/vercel/{slug}");
        assert_eq!(config.spinner.delay_ms, 300);
        assert_eq!(config.spinner.tick_ms, 80);
        assert!(config.hyperlinks);
    }

    #[test]
    fn test_url_for_slug() {
        let docs = DocsConfig::default();
        assert_eq!(docs.url_for("my-slug"), "https://err.sh/vercel/my-slug");
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        let docs = DocsConfig {
            slug_url_template: "https://docs.example.com/errors".to_string(),
        };
        let err = docs.validate().unwrap_err();
        assert!(err.to_string().contains("{slug}"));
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
debug = true
hyperlinks = false

[docs]
slug-url-template = "https://docs.example.com/errors/{slug}"

[spinner]
delay-ms = 50
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert!(config.debug);
        assert!(!config.hyperlinks);
        assert_eq!(
            config.docs.url_for("timeout"),
            "https://docs.example.com/errors/timeout"
        );
        assert_eq!(config.spinner.delay(), Duration::from_millis(50));
        assert_eq!(config.spinner.tick_ms, 80);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "debug": true,
  "spinner": { "tick-ms": 120 }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert!(config.debug);
        assert!(config.hyperlinks);
        assert_eq!(config.spinner.tick(), Duration::from_millis(120));
        assert_eq!(config.spinner.delay_ms, 300);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        write!(
            temp_file,
            "docs:\n  slug-url-template: \"https://help.example.org/{{slug}}.html\"\n"
        )
        .unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(
            config.docs.url_for("oops"),
            "https://help.example.org/oops.html"
        );
    }

    #[test]
    fn test_load_rejects_template_without_placeholder() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(
            temp_file,
            "[docs]\nslug-url-template = \"https://docs.example.com\"\n"
        )
        .unwrap();

        let err = Config::load_from_path(temp_file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("must contain {slug}"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = Config::load(Some(Path::new("does-not-exist.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("outchan.yaml");

        let config = Config {
            debug: true,
            ..Config::default()
        };
        config.save(&path).unwrap();

        let reloaded = Config::load(Some(path.as_path())).unwrap();
        assert!(reloaded.debug);
        assert_eq!(reloaded.docs, config.docs);
        assert_eq!(reloaded.spinner, config.spinner);
    }
}
