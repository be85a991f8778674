//! Configuration loading and resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (fallback)
//!
//! Clap handles tiers 1 and 2 together (`#[arg(env = ...)]`), so the
//! resolution here only has to merge the parsed arguments over the file.

use crate::{Error, Result, SecretKey};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Default database name (file `<data_dir>/<db_name>.db`)
pub const DEFAULT_DB_NAME: &str = "fyyur";

/// Connection variables understood by network databases. The store is a
/// SQLite file, so these are reported when present and otherwise ignored.
pub const NETWORK_DB_VARS: &[&str] = &["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD"];

/// Command-line arguments (with environment fallbacks)
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "fyyur")]
#[command(about = "Fyyur venue, artist and show listings")]
#[command(version)]
pub struct CliArgs {
    /// Host address to bind
    #[arg(long, env = "FYYUR_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FYYUR_PORT")]
    pub port: Option<u16>,

    /// Enable debug mode (verbose logging)
    #[arg(long, env = "FYYUR_DEBUG")]
    pub debug: bool,

    /// Folder holding the database file
    #[arg(long, env = "FYYUR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, env = "FYYUR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Secret key for signing cookies (random per process if unset)
    #[arg(long, env = "FYYUR_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,
}

/// Settings read from the TOML config file
///
/// All fields are optional; anything missing falls through to the defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: Option<bool>,
    pub data_dir: Option<PathBuf>,
    pub db_name: Option<String>,
    pub secret_key: Option<String>,
}

/// Fully resolved service settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub data_dir: PathBuf,
    pub db_name: String,
    pub secret_key: SecretKey,
    /// True when no key was configured and one was generated for this process
    pub secret_key_generated: bool,
}

impl Settings {
    /// Merge command-line/environment arguments over the config file
    pub fn resolve(args: CliArgs, file: TomlConfig) -> Result<Self> {
        let db_name = args
            .db_name
            .or(file.db_name)
            .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
        if !is_valid_db_name(&db_name) {
            return Err(Error::Config(format!("Invalid database name: {:?}", db_name)));
        }

        let configured_key = args
            .secret_key
            .or(file.secret_key)
            .and_then(|k| SecretKey::from_configured(&k));
        let secret_key_generated = configured_key.is_none();
        let secret_key = configured_key.unwrap_or_else(SecretKey::generate);

        Ok(Self {
            host: args
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            debug: args.debug || file.debug.unwrap_or(false),
            data_dir: args
                .data_dir
                .or(file.data_dir)
                .unwrap_or_else(default_data_dir),
            db_name,
            secret_key,
            secret_key_generated,
        })
    }

    /// Path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.db_name))
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the TOML config file
///
/// An explicitly named file must exist. The platform default location
/// (`<config_dir>/fyyur/config.toml`) is optional: when it is missing the
/// empty config is returned.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(TomlConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Network connection variables present in the environment
pub fn ignored_network_vars() -> Vec<&'static str> {
    NETWORK_DB_VARS
        .iter()
        .copied()
        .filter(|name| std::env::var_os(name).is_some())
        .collect()
}

/// Platform config file location
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fyyur").join("config.toml"))
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fyyur"))
        .unwrap_or_else(|| PathBuf::from("./fyyur_data"))
}

/// Database names become file names: alphanumerics, `_` and `-` only
fn is_valid_db_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() < 100
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
