use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, path::PathBuf, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,

    #[serde(default = "default_secrets_path")]
    pub secrets_path: PathBuf,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Projects-API".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_database_url() -> String {
    "postgres://localhost:5432/projects_db".to_string()
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads/images")
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_max_request_bytes() -> usize {
    30 * 1024 * 1024
}
fn default_secrets_path() -> PathBuf {
    PathBuf::from("private/config.json")
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true)
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.database_url = fill_or_env(config.database_url, &["APP_DATABASE_URL", "DATABASE_URL"]);

        config.validate()?;
        Ok(config)
    }

    /// Configuration used by tests and local tooling; skips every external source.
    pub fn for_testing(upload_dir: PathBuf, secrets_path: PathBuf) -> Self {
        AppConfig {
            env: AppEnvironment::Testing,
            name: default_name(),
            port: 0,
            host: default_host(),
            worker_count: 1,
            database_url: default_database_url(),
            upload_dir,
            max_upload_bytes: default_max_upload_bytes(),
            max_request_bytes: default_max_request_bytes(),
            secrets_path,
            cors_allowed_origins: default_cors_origins(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.max_upload_bytes == 0 {
            errors.push("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if self.max_request_bytes < self.max_upload_bytes {
            errors.push("MAX_REQUEST_BYTES cannot be smaller than MAX_UPLOAD_BYTES");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn fill_or_env(current: String, env_keys: &[&str]) -> String {
    if !current.trim().is_empty() {
        return current;
    }

    env_keys
        .iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(default_database_url)
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

/// Hides credentials embedded in a connection string.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://[REDACTED]{}", &url[..scheme_end], &url[at..])
        }
        _ if url.is_empty() => "[MISSING]".to_string(),
        _ => url.to_string(),
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &redact_url(&self.database_url))
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("max_request_bytes", &self.max_request_bytes)
            .field("secrets_path", &self.secrets_path)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}
