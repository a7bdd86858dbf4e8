use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::{Path, PathBuf}};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "WEATHER_CONFIG";

/// HTTP listener and frontend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the single-page frontend.
    pub static_dir: PathBuf,
    /// Explicit cross-origin allow list. Empty means "derive from mode".
    pub cors_origins: Vec<String>,
    /// Hides internal error details and tightens CORS defaults.
    pub production: bool,
    /// Public hostname used for the production CORS default.
    pub public_hostname: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
            cors_origins: Vec::new(),
            production: false,
            public_hostname: None,
        }
    }
}

/// Credentials and endpoint for the upstream weather provider.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            timeout_ms: 5000,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("ProviderConfig")
            .field("api_key", &key)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Location used when a caller supplies no coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultLocation {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub country: String,
}

impl Default for DefaultLocation {
    fn default() -> Self {
        Self {
            lat: -37.8136,
            lon: 144.9631,
            name: "Melbourne".to_string(),
            country: "AU".to_string(),
        }
    }
}

/// Top-level configuration, read once at startup.
///
/// Example TOML:
/// ```toml
/// [server]
/// port = 8080
///
/// [openweather]
/// api_key = "..."
///
/// [default_location]
/// lat = 51.5072
/// lon = -0.1276
/// name = "London"
/// country = "GB"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub openweather: ProviderConfig,
    pub default_location: DefaultLocation,
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    ///
    /// File lookup order: `path`, then `$WEATHER_CONFIG`, then the platform
    /// config directory. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match std::env::var_os(CONFIG_PATH_ENV) {
                Some(p) => PathBuf::from(p),
                None => Self::config_file_path()?,
            },
        };

        let mut cfg = Self::from_file(&path)?;
        cfg.apply_env(|name| std::env::var(name).ok())?;
        Ok(cfg)
    }

    /// Read a TOML config file, or return the defaults if it doesn't exist yet.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Override fields from environment-style variables supplied by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{port}'"))?;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(dir) = get("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
        if let Some(env) = get("APP_ENV") {
            self.server.production = env.trim().eq_ignore_ascii_case("production");
        }
        if let Some(origins) = get("CORS_ORIGIN") {
            self.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
        if let Some(hostname) = get("WEBSITE_HOSTNAME") {
            self.server.public_hostname = Some(hostname);
        }
        if let Some(key) = get("OPENWEATHER_API_KEY") {
            self.openweather.api_key = key;
        }
        if let Some(url) = get("OPENWEATHER_BASE_URL") {
            self.openweather.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = get("OPENWEATHER_TIMEOUT_MS") {
            self.openweather.timeout_ms = timeout.trim().parse().with_context(|| {
                format!("OPENWEATHER_TIMEOUT_MS must be a number of milliseconds, got '{timeout}'")
            })?;
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        !self.openweather.api_key.trim().is_empty()
    }

    /// Origins allowed to make cross-origin requests.
    ///
    /// An empty list means any origin is accepted.
    pub fn allowed_origins(&self) -> Vec<String> {
        if !self.server.cors_origins.is_empty() {
            return self.server.cors_origins.clone();
        }

        if self.server.production {
            self.server
                .public_hostname
                .iter()
                .map(|host| format!("https://{host}"))
                .collect()
        } else {
            vec![format!("http://localhost:{}", self.server.port)]
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the platform config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-proxy", "weather-server")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
