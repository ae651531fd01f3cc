use crate::normalizers::DateOrder;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "ledger-tidy.toml";

pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_OUTPUT_DIR: &str = "cleaned";
pub const DEFAULT_TRANSACTIONS_FILE: &str = "transactions.csv";
pub const DEFAULT_COMPLAINTS_FILE: &str = "complaints.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub date_order: DateOrder,
    pub preview_rows: usize,
    pub output_dir: PathBuf,
    pub inputs: InputsConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputsConfig {
    pub transactions: PathBuf,
    pub complaints: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            inputs: InputsConfig {
                transactions: PathBuf::from(DEFAULT_TRANSACTIONS_FILE),
                complaints: PathBuf::from(DEFAULT_COMPLAINTS_FILE),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid preview_rows value: {0}")]
    InvalidPreviewRows(usize),
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    date_order: Option<DateOrder>,
    preview_rows: Option<usize>,
    output_dir: Option<PathBuf>,
    inputs: Option<InputsFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputsFile {
    transactions: Option<PathBuf>,
    complaints: Option<PathBuf>,
}

/// Load configuration. An explicit path must exist; otherwise
/// `ledger-tidy.toml` in the working directory is used when present.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = resolve_config_path(config_path)?;
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) if path.as_os_str().is_empty() => Err(ConfigError::InvalidConfigPath(path)),
        Some(path) => Ok(path),
        None => Ok(PathBuf::from(CONFIG_FILENAME)),
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&contents).map_err(|err| match err {
        ConfigError::Parse { source, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    Ok(Some(config))
}

/// Parse TOML text on top of the defaults
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let parsed: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: PathBuf::new(),
        source,
    })?;
    merge_config(parsed)
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(order) = parsed.date_order {
        config.date_order = order;
    }

    if let Some(rows) = parsed.preview_rows {
        if rows == 0 {
            return Err(ConfigError::InvalidPreviewRows(rows));
        }
        config.preview_rows = rows;
    }

    if let Some(dir) = parsed.output_dir {
        config.output_dir = dir;
    }

    if let Some(inputs) = parsed.inputs {
        if let Some(path) = inputs.transactions {
            config.inputs.transactions = path;
        }
        if let Some(path) = inputs.complaints {
            config.inputs.complaints = path;
        }
    }

    Ok(config)
}
