mod file_config;

pub use file_config::{DjFileConfig, FileConfig, S3FileConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RADIO_NAME: &str = "Save Point Radio";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_DJ_TIMEOUT_SEC: u64 = 5;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub page_size: Option<usize>,
    pub radio_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub page_size: usize,
    pub radio_name: String,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        // The file itself is created on first run, its directory must exist.
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let page_size = file
            .page_size
            .or(cli.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            bail!("page_size must be greater than zero");
        }

        let radio_name = file
            .radio_name
            .or_else(|| cli.radio_name.clone())
            .unwrap_or_else(|| DEFAULT_RADIO_NAME.to_string());

        Ok(Self {
            db_path,
            port,
            logging_level,
            page_size,
            radio_name,
        })
    }
}

/// Overrides given on the DJ client command line.
#[derive(Debug, Clone, Default)]
pub struct DjCliConfig {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub timeout_sec: Option<u64>,
    pub radio_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DjSettings {
    /// Base URL of the API, always ending with a slash.
    pub api_url: String,
    pub token: String,
    pub timeout: Duration,
    pub radio_name: String,
}

impl DjSettings {
    pub fn resolve(cli: &DjCliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let dj = file.dj.unwrap_or_default();

        let Some(mut api_url) = dj.api_url.or_else(|| cli.api_url.clone()) else {
            bail!("api_url must be specified via --api-url or in the [dj] config section");
        };
        if !api_url.ends_with('/') {
            api_url.push('/');
        }
        let Some(token) = dj.token.or_else(|| cli.token.clone()) else {
            bail!("token must be specified via --token or in the [dj] config section");
        };
        let timeout_sec = dj
            .timeout_sec
            .or(cli.timeout_sec)
            .unwrap_or(DEFAULT_DJ_TIMEOUT_SEC);
        let radio_name = file
            .radio_name
            .or_else(|| cli.radio_name.clone())
            .unwrap_or_else(|| DEFAULT_RADIO_NAME.to_string());

        Ok(Self {
            api_url,
            token,
            timeout: Duration::from_secs(timeout_sec),
            radio_name,
        })
    }
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub region: String,
    /// Base URL of the S3 service, without trailing slash.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Needed for uploads only, downloads name the bucket in the object path.
    pub bucket: Option<String>,
}

impl S3Settings {
    /// Resolves the `[s3]` section, falling back to `S3_*` variables read
    /// through `env`.
    pub fn resolve(
        file_config: Option<&FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let s3 = file_config
            .and_then(|f| f.s3.clone())
            .unwrap_or_default();

        let region = s3
            .region
            .or_else(|| env("S3_REGION"))
            .unwrap_or_else(|| "us-east-1".to_string());
        let endpoint = s3
            .endpoint
            .or_else(|| env("S3_ENDPOINT"))
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", region));
        let Some(access_key) = s3.access_key.or_else(|| env("S3_ACCESS_KEY")) else {
            bail!("S3 access key missing, set [s3] access_key or S3_ACCESS_KEY");
        };
        let Some(secret_key) = s3.secret_key.or_else(|| env("S3_SECRET_KEY")) else {
            bail!("S3 secret key missing, set [s3] secret_key or S3_SECRET_KEY");
        };
        let bucket = s3.bucket.or_else(|| env("S3_BUCKET"));

        Ok(Self {
            region,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_key,
            secret_key,
            bucket,
        })
    }

    pub fn from_env(file_config: Option<&FileConfig>) -> Result<Self> {
        Self::resolve(file_config, |name| std::env::var(name).ok())
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_parse_logging_level() {
        assert!(matches!(
            parse_logging_level("none"),
            Some(RequestsLoggingLevel::None)
        ));
        assert!(matches!(
            parse_logging_level("BODY"),
            Some(RequestsLoggingLevel::Body)
        ));
        assert!(parse_logging_level("invalid").is_none());
    }

    #[test]
    fn test_resolve_cli_only() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(temp_dir.path().join("radio.db")),
            port: 3001,
            logging_level: RequestsLoggingLevel::Headers,
            page_size: None,
            radio_name: None,
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.db_path, temp_dir.path().join("radio.db"));
        assert_eq!(config.port, 3001);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Headers);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.radio_name, DEFAULT_RADIO_NAME);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/should/be/overridden.db")),
            port: 3001,
            logging_level: RequestsLoggingLevel::Path,
            page_size: Some(10),
            radio_name: None,
        };
        let file_config = FileConfig {
            db_path: Some(temp_dir.path().join("radio.db").to_string_lossy().to_string()),
            port: Some(4000),
            logging_level: Some("body".to_string()),
            radio_name: Some("Game Tunes".to_string()),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        assert_eq!(config.db_path, temp_dir.path().join("radio.db"));
        assert_eq!(config.port, 4000);
        assert_eq!(config.logging_level, RequestsLoggingLevel::Body);
        assert_eq!(config.radio_name, "Game Tunes");
        // CLI value used when TOML doesn't specify
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_resolve_missing_db_path_error() {
        let result = AppConfig::resolve(&CliConfig::default(), None);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("db_path must be specified"));
    }

    #[test]
    fn test_resolve_missing_db_dir_error() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/nonexistent/path/radio.db")),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_zero_page_size_error() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(temp_dir.path().join("radio.db")),
            page_size: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli, None).is_err());
    }

    #[test]
    fn test_dj_settings() {
        let cli = DjCliConfig {
            api_url: Some("http://localhost:3001/api".to_string()),
            token: Some("cli-token".to_string()),
            ..Default::default()
        };
        let settings = DjSettings::resolve(&cli, None).unwrap();
        assert_eq!(settings.api_url, "http://localhost:3001/api/");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.radio_name, DEFAULT_RADIO_NAME);

        let file_config = FileConfig {
            dj: Some(DjFileConfig {
                token: Some("file-token".to_string()),
                timeout_sec: Some(2),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = DjSettings::resolve(&cli, Some(file_config)).unwrap();
        assert_eq!(settings.token, "file-token");
        assert_eq!(settings.timeout, Duration::from_secs(2));

        assert!(DjSettings::resolve(&DjCliConfig::default(), None).is_err());
    }

    #[test]
    fn test_s3_settings_fall_back_to_env() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("S3_ACCESS_KEY", "AKID"),
            ("S3_SECRET_KEY", "secret"),
            ("S3_REGION", "eu-central-1"),
        ]);
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());

        let settings = S3Settings::resolve(None, lookup).unwrap();
        assert_eq!(settings.endpoint, "https://s3.eu-central-1.amazonaws.com");
        assert_eq!(settings.access_key, "AKID");
        assert!(settings.bucket.is_none());

        let file_config = FileConfig {
            s3: Some(S3FileConfig {
                endpoint: Some("https://ams3.digitaloceanspaces.com/".to_string()),
                bucket: Some("radio".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = S3Settings::resolve(Some(&file_config), lookup).unwrap();
        assert_eq!(settings.endpoint, "https://ams3.digitaloceanspaces.com");
        assert_eq!(settings.bucket.as_deref(), Some("radio"));

        assert!(S3Settings::resolve(None, |_| None).is_err());
    }
}
