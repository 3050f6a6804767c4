use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the backend origin
pub const ENV_BASE_URL: &str = "SITESCOUT_BASE_URL";
/// Environment variable overriding the API base path
pub const ENV_API_BASE: &str = "SITESCOUT_API_BASE";

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Session manager for the site search backend")]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend origin (e.g. http://127.0.0.1:8000)
    #[arg(long)]
    pub base_url: Option<String>,

    /// API base path on the backend (default: /api)
    #[arg(long)]
    pub api_base: Option<String>,

    /// Number of rows requested per list call
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run against an in-memory backend with sample data (no server required)
    Demo,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check if running in demo mode
    pub fn is_demo_mode(&self) -> bool {
        matches!(self.command, Some(Command::Demo))
    }
}

/// Application settings (from config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendSettings,

    /// UI settings
    #[serde(default)]
    pub ui: UiSettings,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Scheme, host and port of the backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path prefix all endpoints live under
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// `limit` sent to list endpoints
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_api_base() -> String {
    "/api".to_string()
}

fn default_page_size() -> u32 {
    50
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_base: default_api_base(),
            page_size: default_page_size(),
        }
    }
}

impl BackendSettings {
    /// Full URL prefix for endpoint paths, e.g. `http://127.0.0.1:8000/api`
    pub fn endpoint_root(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.api_base)
    }
}

/// UI-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Event poll interval of the terminal loop in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// Show key hints in the status bar
    #[serde(default = "default_show_help_hint")]
    pub show_help_hint: bool,
}

fn default_tick_rate() -> u64 {
    50
}

fn default_show_help_hint() -> bool {
    true
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            show_help_hint: default_show_help_hint(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::read_file(p);
            }
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("sitescout/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/sitescout/config.toml")),
            dirs::home_dir().map(|p| p.join(".sitescout.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::read_file(path);
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply `SITESCOUT_*` environment overrides
    pub fn merge_env(&mut self) {
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            if !base_url.trim().is_empty() {
                self.backend.base_url = base_url;
            }
        }
        if let Ok(api_base) = std::env::var(ENV_API_BASE) {
            self.backend.api_base = api_base;
        }
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(base_url) = &cli.base_url {
            self.backend.base_url = base_url.clone();
        }
        if let Some(api_base) = &cli.api_base {
            self.backend.api_base = api_base.clone();
        }
        if let Some(page_size) = cli.page_size {
            self.backend.page_size = page_size;
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        const MIN_PAGE_SIZE: u32 = 1;
        const MAX_PAGE_SIZE: u32 = 500;
        const MIN_TICK_RATE: u64 = 10;

        self.backend.page_size = self.backend.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        let trimmed = self.backend.api_base.trim().trim_matches('/');
        self.backend.api_base = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        };

        if self.ui.tick_rate_ms < MIN_TICK_RATE {
            self.ui.tick_rate_ms = MIN_TICK_RATE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend.api_base, "/api");
        assert_eq!(settings.backend.page_size, 50);
        assert_eq!(
            settings.backend.endpoint_root(),
            "http://127.0.0.1:8000/api"
        );
        assert_eq!(settings.ui.tick_rate_ms, 50);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [backend]
            base_url = "https://scout.example.com/"
            page_size = 20

            [ui]
            show_help_hint = false
        "#;

        let settings: Settings = toml::from_str(toml).expect("Should parse TOML");
        assert_eq!(settings.backend.page_size, 20);
        assert_eq!(settings.backend.api_base, "/api");
        assert_eq!(
            settings.backend.endpoint_root(),
            "https://scout.example.com/api"
        );
        assert!(!settings.ui.show_help_hint);
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\napi_base = \"/v2\"").unwrap();

        let settings = Settings::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(settings.backend.api_base, "/v2");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[backend\npage_size = ").unwrap();

        assert!(Settings::load(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_env_then_cli_precedence() {
        temp_env::with_vars(
            [
                (ENV_BASE_URL, Some("http://env-host:9000")),
                (ENV_API_BASE, Some("/from-env")),
            ],
            || {
                let mut settings = Settings::default();
                settings.merge_env();
                assert_eq!(settings.backend.base_url, "http://env-host:9000");
                assert_eq!(settings.backend.api_base, "/from-env");

                let cli = Config::parse_from(["sitescout", "--api-base", "/from-cli"]);
                settings.merge_cli(&cli);
                assert_eq!(settings.backend.base_url, "http://env-host:9000");
                assert_eq!(settings.backend.api_base, "/from-cli");
            },
        );
    }

    #[test]
    fn test_validate_normalizes() {
        let mut settings = Settings::default();
        settings.backend.api_base = "api/".to_string();
        settings.backend.page_size = 0;
        settings.ui.tick_rate_ms = 0;
        settings.validate();

        assert_eq!(settings.backend.api_base, "/api");
        assert_eq!(settings.backend.page_size, 1);
        assert_eq!(settings.ui.tick_rate_ms, 10);

        settings.backend.api_base = "/".to_string();
        settings.backend.page_size = 10_000;
        settings.validate();
        assert_eq!(settings.backend.api_base, "");
        assert_eq!(settings.backend.page_size, 500);
    }

    #[test]
    fn test_demo_subcommand() {
        let cli = Config::parse_from(["sitescout", "--debug", "demo"]);
        assert!(cli.debug);
        assert!(cli.is_demo_mode());
    }
}
