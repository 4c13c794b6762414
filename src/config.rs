//! Runtime configuration read from the environment (and `.env` via dotenvy)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Defaults
/// ---------------------------------------------------------------------------

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_PATH: &str = "./rehab.db";
const DEFAULT_UPLOAD_PATH: &str = "public/uploads/";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value}")]
  Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub port: u16,
  pub database_path: PathBuf,
  pub upload_dir: PathBuf,
  pub public_dir: PathBuf,
  pub max_upload_bytes: usize,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Ok(Self {
      port: parse_var("PORT", DEFAULT_PORT)?,
      database_path: path_var("DATABASE_PATH", DEFAULT_DATABASE_PATH),
      upload_dir: path_var("UPLOAD_PATH", DEFAULT_UPLOAD_PATH),
      public_dir: path_var("PUBLIC_DIR", DEFAULT_PUBLIC_DIR),
      max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
    })
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      port: DEFAULT_PORT,
      database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
      upload_dir: PathBuf::from(DEFAULT_UPLOAD_PATH),
      public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
      max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
  }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
  match env::var(key) {
    Ok(value) => value
      .trim()
      .parse()
      .map_err(|_| ConfigError::Invalid { key, value }),
    Err(_) => Ok(default),
  }
}

fn path_var(key: &str, default: &str) -> PathBuf {
  env::var(key)
    .ok()
    .filter(|v| !v.trim().is_empty())
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(default))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
