use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const MEGABYTE: usize = 1024 * 1024;

/// Controls whether internal error details are echoed back to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Production,
}

impl RuntimeMode {
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            RuntimeMode::Production
        } else {
            RuntimeMode::Development
        }
    }

    pub fn exposes_error_details(self) -> bool {
        self != RuntimeMode::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuntimeMode::Development => "development",
            RuntimeMode::Production => "production",
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub runtime_mode: RuntimeMode,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_seconds: Option<u64>,
    pub upload_dir: PathBuf,
    pub max_file_size_mb: usize,
    pub max_files_per_upload: usize,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| {
                    info!("{} not set, using default: {}", name, default);
                    default.to_string()
                })
        };

        let gemini_api_key = lookup("GEMINI_API_KEY").unwrap_or_default();
        if gemini_api_key.trim().is_empty() {
            warn!("GEMINI_API_KEY is not set; completion requests will fail");
        }

        let config = Config {
            server_host: string_or("SERVER_HOST", "0.0.0.0"),
            server_port: Self::parse_var(&lookup, "PORT", 3000)
                .context("Failed to parse PORT")?,
            runtime_mode: RuntimeMode::parse(&string_or("APP_ENV", "development")),
            gemini_api_key,
            gemini_model: string_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: string_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            gemini_timeout_seconds: lookup("GEMINI_TIMEOUT_SECONDS")
                .and_then(|v| match v.trim().parse() {
                    Ok(seconds) => Some(seconds),
                    Err(e) => {
                        warn!("Failed to parse GEMINI_TIMEOUT_SECONDS: {} (no timeout set)", e);
                        None
                    }
                }),
            upload_dir: PathBuf::from(string_or("UPLOAD_DIR", "uploads")),
            max_file_size_mb: Self::parse_var(&lookup, "MAX_FILE_SIZE_MB", 5)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            max_files_per_upload: Self::parse_var(&lookup, "MAX_FILES_PER_UPLOAD", 10)
                .context("Failed to parse MAX_FILES_PER_UPLOAD")?,
            static_dir: PathBuf::from(string_or("STATIC_DIR", "public")),
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> Result<T>
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr + Copy + fmt::Debug,
        T::Err: fmt::Display,
    {
        match lookup(var_name) {
            Some(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            None => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_files_per_upload == 0 {
            return Err(anyhow::anyhow!("MAX_FILES_PER_UPLOAD must be greater than 0"));
        }
        if self.checked_request_body_bytes().is_none() {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB ({}) and MAX_FILES_PER_UPLOAD ({}) exceed the addressable request size",
                self.max_file_size_mb,
                self.max_files_per_upload
            ));
        }
        Ok(())
    }

    fn checked_file_size_bytes(&self) -> Option<usize> {
        self.max_file_size_mb.checked_mul(MEGABYTE)
    }

    fn checked_request_body_bytes(&self) -> Option<usize> {
        self.checked_file_size_bytes()?
            .checked_mul(self.max_files_per_upload)?
            .checked_add(MEGABYTE)
    }

    /// Saturates at `usize::MAX`; `validate` rejects configs that would.
    pub fn max_file_size_bytes(&self) -> usize {
        self.checked_file_size_bytes().unwrap_or(usize::MAX)
    }

    /// Upper bound for a whole multipart request: every file at the limit plus framing overhead.
    pub fn max_request_body_bytes(&self) -> usize {
        self.checked_request_body_bytes().unwrap_or(usize::MAX)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("runtime_mode", &self.runtime_mode)
            .field(
                "gemini_api_key",
                &if self.gemini_api_key.is_empty() { "<unset>" } else { "<redacted>" },
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_timeout_seconds", &self.gemini_timeout_seconds)
            .field("upload_dir", &self.upload_dir)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("max_files_per_upload", &self.max_files_per_upload)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}
