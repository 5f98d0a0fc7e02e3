use eink_quantize::{Algorithm, Background};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "INKFRAME_CONFIG";

/// Config file looked up in the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "inkframe.yaml";

/// Application configuration loaded from inkframe.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL or bare address of the picture frame (e.g. "192.168.1.50")
    #[serde(default)]
    pub device_url: Option<String>,

    /// Path of the frame's upload endpoint
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    /// Upload timeout in seconds
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,

    /// Fill for canvas areas the photo does not cover
    #[serde(default, deserialize_with = "from_str")]
    pub background: Background,

    /// Algorithm used when none is given on the command line
    #[serde(default, deserialize_with = "from_str")]
    pub algorithm: Algorithm,

    /// Panel simulator settings
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

fn default_upload_path() -> String {
    "/upload".to_string()
}

fn default_upload_timeout() -> u64 {
    60
}

/// Configuration for `inkframe simulate`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Port the simulated frame listens on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Deserialize any `FromStr` type from a YAML string
fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

impl AppConfig {
    /// Resolve which config file to read: explicit path, then
    /// `INKFRAME_CONFIG`, then `inkframe.yaml` if it exists.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    }

    /// Load configuration, falling back to defaults on any problem
    pub fn load(explicit: Option<&Path>) -> Self {
        let Some(path) = Self::resolve_path(explicit) else {
            tracing::debug!("No config file, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        device = ?config.device_url,
                        algorithm = %config.algorithm.slug(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Full upload URL for a device address.
    ///
    /// Bare hosts get an `http://` scheme; the upload path is joined with
    /// exactly one slash.
    pub fn upload_url(&self, device: &str) -> String {
        let device = device.trim().trim_end_matches('/');
        let base = if device.contains("://") {
            device.to_string()
        } else {
            format!("http://{device}")
        };
        format!("{}/{}", base, self.upload_path.trim_start_matches('/'))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device_url: None,
            upload_path: default_upload_path(),
            upload_timeout_secs: default_upload_timeout(),
            background: Background::White,
            algorithm: Algorithm::FloydSteinberg,
            simulator: SimulatorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.device_url, None);
        assert_eq!(config.upload_path, "/upload");
        assert_eq!(config.upload_timeout_secs, 60);
        assert_eq!(config.background, Background::White);
        assert_eq!(config.algorithm, Algorithm::FloydSteinberg);
        assert_eq!(config.simulator.port, 8080);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
device_url: "192.168.1.50"
upload_path: /api/upload
upload_timeout_secs: 10
background: black
algorithm: atkinson
simulator:
  port: 9000
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.device_url.as_deref(), Some("192.168.1.50"));
        assert_eq!(config.upload_path, "/api/upload");
        assert_eq!(config.upload_timeout_secs, 10);
        assert_eq!(config.background, Background::Black);
        assert_eq!(config.algorithm, Algorithm::Atkinson);
        assert_eq!(config.simulator.port, 9000);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = AppConfig::from_yaml("algorithm: \"Black & White\"\n").unwrap();
        assert_eq!(config.algorithm, Algorithm::BlackAndWhite);
        assert_eq!(config.upload_path, "/upload");
        assert_eq!(config.simulator, SimulatorConfig::default());
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(AppConfig::from_yaml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_algorithm() {
        let err = AppConfig::from_yaml("algorithm: sierra\n").unwrap_err();
        assert!(err.to_string().contains("unknown algorithm"));
    }

    #[test]
    fn test_load_falls_back_on_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "background: [not, a, string]").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_falls_back_on_missing_file() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/inkframe.yaml")));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_reads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_url: http://frame.local").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.device_url.as_deref(), Some("http://frame.local"));
    }

    #[test]
    fn test_upload_url() {
        let config = AppConfig::default();
        assert_eq!(
            config.upload_url("192.168.1.50"),
            "http://192.168.1.50/upload"
        );
        assert_eq!(
            config.upload_url("http://frame.local:8080/"),
            "http://frame.local:8080/upload"
        );

        let config = AppConfig {
            upload_path: "api/upload".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.upload_url("https://frame"),
            "https://frame/api/upload"
        );
    }
}
