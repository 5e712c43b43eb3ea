use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audit::AuditConfig;
use crate::cli::{
    AuditArgs, Cli, Command, CrawlArgs, DEFAULT_BATCH_SIZE, DEFAULT_BIND, DEFAULT_MAX_PAGES,
    DEFAULT_OUTPUT, DEFAULT_RATE_LIMIT, ServeArgs,
};
use crate::crawler::CrawlerConfig;

/// Environment variable holding the PageSpeed API key
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Environment variable holding the search results API key
pub const SERPAPI_KEY_ENV: &str = "SERPAPI_KEY";

/// Configuration file structure.
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Maximum number of pages analyzed per crawl
    pub max_pages: Option<usize>,

    /// Pages analyzed concurrently per batch
    pub batch_size: Option<usize>,

    /// Per-page request timeout in seconds
    pub page_timeout: Option<u64>,

    /// Homepage request timeout in seconds
    pub homepage_timeout: Option<u64>,

    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Address the API server listens on
    pub bind: Option<String>,

    /// API requests allowed per client per minute
    pub rate_limit: Option<u32>,

    /// Directory where the API server stores finished reports
    pub store_dir: Option<String>,

    pub google_api_key: Option<String>,
    pub serpapi_key: Option<String>,
    pub pagespeed_endpoint: Option<String>,
    pub rdap_endpoint: Option<String>,
    pub serp_endpoint: Option<String>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    const ALL: [ConfigFormat; 3] = [ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml];

    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Config file locations in priority order: current directory, then
    /// `$XDG_CONFIG_HOME/sitepulse` (or `~/.config/sitepulse`)
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &ConfigFormat::ALL {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("sitepulse.{}", ext)));
            }
        }

        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_dir = config_home.join("sitepulse");
            for format in &ConfigFormat::ALL {
                for ext in format.extensions() {
                    paths.push(app_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Loads `--config` when given, otherwise the first default path found
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(Path::new(path)),
            None => Ok(Self::from_default_paths()?.unwrap_or_default()),
        }
    }

    /// Merge this configuration with CLI arguments.
    /// CLI values that differ from their defaults take precedence.
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        let command = match &cli.command {
            Command::Crawl(args) => Command::Crawl(CrawlArgs {
                url: args.url.clone(),
                max_pages: pick(args.max_pages, DEFAULT_MAX_PAGES, self.max_pages),
                batch_size: pick(args.batch_size, DEFAULT_BATCH_SIZE, self.batch_size),
                output: self.merge_output(&args.output),
                save: args.save.clone().or_else(|| self.save.clone()),
            }),
            Command::Audit(args) => Command::Audit(AuditArgs {
                url: args.url.clone(),
                keywords: args.keywords.clone(),
                output: self.merge_output(&args.output),
                save: args.save.clone().or_else(|| self.save.clone()),
            }),
            Command::Serve(args) => Command::Serve(ServeArgs {
                bind: pick(args.bind.clone(), DEFAULT_BIND.to_string(), self.bind.clone()),
                rate_limit: pick(args.rate_limit, DEFAULT_RATE_LIMIT, self.rate_limit),
                store_dir: args.store_dir.clone().or_else(|| self.store_dir.clone()),
            }),
        };

        Cli {
            command,
            config: cli.config.clone(),
            verbose: cli.verbose || self.verbose.unwrap_or(false),
        }
    }

    fn merge_output(&self, cli_output: &str) -> String {
        pick(
            cli_output.to_string(),
            DEFAULT_OUTPUT.to_string(),
            self.output.clone(),
        )
    }

    /// Crawler settings; page and batch limits come from the merged CLI values
    pub fn crawler_config(&self, max_pages: usize, batch_size: usize) -> CrawlerConfig {
        let defaults = CrawlerConfig::default();
        CrawlerConfig {
            max_pages: max_pages.max(1),
            batch_size: batch_size.max(1),
            page_timeout_secs: self.page_timeout.unwrap_or(defaults.page_timeout_secs),
            homepage_timeout_secs: self
                .homepage_timeout
                .unwrap_or(defaults.homepage_timeout_secs),
        }
    }

    /// Audit provider settings. API keys fall back to the environment.
    pub fn audit_config(&self) -> AuditConfig {
        let defaults = AuditConfig::default();
        AuditConfig {
            google_api_key: non_empty(self.google_api_key.clone())
                .or_else(|| env_key(GOOGLE_API_KEY_ENV)),
            serpapi_key: non_empty(self.serpapi_key.clone()).or_else(|| env_key(SERPAPI_KEY_ENV)),
            pagespeed_endpoint: self
                .pagespeed_endpoint
                .clone()
                .unwrap_or(defaults.pagespeed_endpoint),
            rdap_endpoint: self.rdap_endpoint.clone().unwrap_or(defaults.rdap_endpoint),
            serp_endpoint: self.serp_endpoint.clone().unwrap_or(defaults.serp_endpoint),
        }
    }
}

/// The CLI value when it was changed from its default, else the config value
fn pick<T: PartialEq>(cli: T, default: T, config: Option<T>) -> T {
    if cli != default {
        cli
    } else {
        config.unwrap_or(cli)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_key(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use std::env;
    use tempfile::{NamedTempFile, tempdir};

    fn write_config(ext: &str, contents: &str) -> (NamedTempFile, PathBuf) {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension(ext);
        fs::write(&temp_path, contents).unwrap();
        (temp_file, temp_path)
    }

    fn crawl_args(cli: &Cli) -> &CrawlArgs {
        match &cli.command {
            Command::Crawl(args) => args,
            other => panic!("expected crawl command, got {:?}", other),
        }
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.TOML")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("config.txt")), None);
    }

    #[test]
    fn test_load_each_format() {
        let cases = [
            ("json", r#"{"max_pages": 10, "batch_size": 2, "output": "json"}"#),
            ("toml", "max_pages = 10\nbatch_size = 2\noutput = \"json\"\n"),
            ("yaml", "max_pages: 10\nbatch_size: 2\noutput: json\n"),
        ];

        for (ext, contents) in cases {
            let (_file, path) = write_config(ext, contents);
            let config = Config::from_file(&path).unwrap();
            assert_eq!(config.max_pages, Some(10), "{}", ext);
            assert_eq!(config.batch_size, Some(2), "{}", ext);
            assert_eq!(config.output.as_deref(), Some("json"), "{}", ext);
            fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_invalid_and_unsupported_configs_fail() {
        let (_a, invalid) = write_config("json", "{ invalid json }");
        assert!(Config::from_file(&invalid).is_err());

        let (_b, unsupported) = write_config("txt", "max_pages = 3");
        let err = Config::from_file(&unsupported).unwrap_err();
        assert!(err.to_string().contains("Unsupported config file format"));

        fs::remove_file(invalid).ok();
        fs::remove_file(unsupported).ok();
    }

    #[test]
    fn test_merge_uses_config_when_cli_is_default() {
        let config = Config {
            max_pages: Some(10),
            batch_size: Some(2),
            output: Some("json".to_string()),
            save: Some("report.json".to_string()),
            verbose: Some(true),
            ..Default::default()
        };
        let cli = Cli::parse_from(["sitepulse", "crawl", "https://example.com"]);

        let merged = config.merge_with_cli(&cli);
        let args = crawl_args(&merged);
        assert_eq!(args.max_pages, 10);
        assert_eq!(args.batch_size, 2);
        assert_eq!(args.output, "json");
        assert_eq!(args.save.as_deref(), Some("report.json"));
        assert!(merged.verbose);
    }

    #[test]
    fn test_merge_cli_overrides_config() {
        let config = Config {
            max_pages: Some(10),
            output: Some("json".to_string()),
            ..Default::default()
        };
        let cli = Cli::parse_from([
            "sitepulse",
            "crawl",
            "https://example.com",
            "--max-pages",
            "3",
            "--output",
            "text",
        ]);

        let args = crawl_args(&config.merge_with_cli(&cli)).clone();
        assert_eq!(args.max_pages, 3);
        // "text" is the default, so the config file still wins
        assert_eq!(args.output, "json");
    }

    #[test]
    fn test_merge_serve_args() {
        let config = Config {
            bind: Some("0.0.0.0:9000".to_string()),
            rate_limit: Some(30),
            store_dir: Some("/var/lib/sitepulse".to_string()),
            ..Default::default()
        };
        let cli = Cli::parse_from(["sitepulse", "serve", "--rate-limit", "10"]);

        match config.merge_with_cli(&cli).command {
            Command::Serve(args) => {
                assert_eq!(args.bind, "0.0.0.0:9000");
                assert_eq!(args.rate_limit, 10);
                assert_eq!(args.store_dir.as_deref(), Some("/var/lib/sitepulse"));
            }
            other => panic!("expected serve command, got {:?}", other),
        }
    }

    #[test]
    fn test_crawler_config_clamps_and_uses_timeouts() {
        let config = Config {
            page_timeout: Some(4),
            ..Default::default()
        };
        let crawler = config.crawler_config(0, 0);

        assert_eq!(crawler.max_pages, 1);
        assert_eq!(crawler.batch_size, 1);
        assert_eq!(crawler.page_timeout_secs, 4);
        assert_eq!(crawler.homepage_timeout_secs, 15);
    }

    #[test]
    #[serial]
    fn test_audit_config_falls_back_to_environment() {
        unsafe {
            env::set_var(GOOGLE_API_KEY_ENV, "env-google");
            env::set_var(SERPAPI_KEY_ENV, "");
        }

        let audit = Config::default().audit_config();
        assert_eq!(audit.google_api_key.as_deref(), Some("env-google"));
        assert_eq!(audit.serpapi_key, None);

        let config = Config {
            google_api_key: Some("file-google".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.audit_config().google_api_key.as_deref(),
            Some("file-google")
        );

        unsafe {
            env::remove_var(GOOGLE_API_KEY_ENV);
            env::remove_var(SERPAPI_KEY_ENV);
        }
    }

    #[test]
    #[serial]
    fn test_default_paths_with_xdg_config_home() {
        unsafe {
            env::set_var("XDG_CONFIG_HOME", "/custom/config/path");
        }

        let paths = Config::default_paths();
        assert!(paths[0].ends_with("sitepulse.json"));
        assert!(
            paths
                .iter()
                .any(|p| p.starts_with("/custom/config/path/sitepulse"))
        );

        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_from_default_paths_prefers_current_dir() {
        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        let temp_config_dir = tempdir().unwrap();
        let app_dir = temp_config_dir.path().join("sitepulse");
        fs::create_dir_all(&app_dir).unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        fs::write(app_dir.join("config.toml"), "max_pages = 20").unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.max_pages, Some(20));

        fs::write(temp_dir.path().join("sitepulse.yaml"), "max_pages: 7").unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.max_pages, Some(7));

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial]
    fn test_load_without_any_config_is_default() {
        let temp_dir = tempdir().unwrap();
        let original_dir = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();
        let temp_config_dir = tempdir().unwrap();
        unsafe {
            env::set_var("XDG_CONFIG_HOME", temp_config_dir.path());
        }

        assert_eq!(Config::load(None).unwrap(), Config::default());

        env::set_current_dir(&original_dir).ok();
        unsafe {
            env::remove_var("XDG_CONFIG_HOME");
        }
    }
}
