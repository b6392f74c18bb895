use core::fmt;
use core::str::FromStr;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

const DEFAULT_BOT_DELAY_MS: u64 = 500;
const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_LOG_PATH: &str = "fivehundred.log";

/// Root game configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_seats")]
    pub seats: Vec<SeatKind>,
    #[serde(default = "default_bot_delay_ms")]
    pub bot_delay_ms: u64,
    #[serde(default = "default_remote_timeout_ms")]
    pub remote_timeout_ms: u64,
    #[serde(default)]
    pub gamestate_log: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            seats: default_seats(),
            bot_delay_ms: DEFAULT_BOT_DELAY_MS,
            remote_timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
            gamestate_log: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: GameConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_seats(&self.seats)?;
        if self.remote_timeout_ms == 0 {
            return Err(ValidationError::InvalidField {
                field: "remote_timeout_ms".to_string(),
                message: "remote timeout must be greater than zero".to_string(),
            });
        }
        if let Some(path) = &self.gamestate_log {
            if path.as_os_str().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "gamestate_log".to_string(),
                    message: "path must not be empty".to_string(),
                });
            }
        }
        self.logging.validate()
    }

    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }

    pub fn has_human(&self) -> bool {
        self.seats.iter().any(|seat| matches!(seat, SeatKind::Human))
    }
}

fn default_seats() -> Vec<SeatKind> {
    vec![
        SeatKind::Human,
        SeatKind::Heuristic,
        SeatKind::Heuristic,
        SeatKind::Heuristic,
    ]
}

fn default_bot_delay_ms() -> u64 {
    DEFAULT_BOT_DELAY_MS
}

fn default_remote_timeout_ms() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_MS
}

fn validate_seats(seats: &[SeatKind]) -> Result<(), ValidationError> {
    if seats.len() != 4 {
        return Err(ValidationError::InvalidField {
            field: "seats".to_string(),
            message: format!("exactly four seats are required, got {}", seats.len()),
        });
    }

    let humans = seats
        .iter()
        .filter(|seat| matches!(seat, SeatKind::Human))
        .count();
    if humans > 1 {
        return Err(ValidationError::InvalidField {
            field: "seats".to_string(),
            message: "at most one human seat is supported".to_string(),
        });
    }

    for (index, seat) in seats.iter().enumerate() {
        if let SeatKind::Remote(addr) = seat {
            if addr.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: format!("seats[{index}]"),
                    message: "remote seat needs an address".to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Who sits in a seat. Parsed from `human`, `random`, `heuristic` or `remote:ADDR`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum SeatKind {
    Human,
    Random,
    Heuristic,
    /// The table listens on the address and waits for one player to join.
    Remote(String),
}

impl FromStr for SeatKind {
    type Err = SeatKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Some(addr) = value.strip_prefix("remote:") {
            return Ok(SeatKind::Remote(addr.trim().to_string()));
        }
        match value.to_ascii_lowercase().as_str() {
            "human" => Ok(SeatKind::Human),
            "random" => Ok(SeatKind::Random),
            "heuristic" => Ok(SeatKind::Heuristic),
            _ => Err(SeatKindError(value.to_string())),
        }
    }
}

impl TryFrom<String> for SeatKind {
    type Error = SeatKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatKind::Human => f.write_str("human"),
            SeatKind::Random => f.write_str("random"),
            SeatKind::Heuristic => f.write_str("heuristic"),
            SeatKind::Remote(addr) => write!(f, "remote:{addr}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown seat kind '{0}' (expected human, random, heuristic or remote:ADDR)")]
pub struct SeatKindError(pub String);

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub level: String,
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            level: default_tracing_level(),
            path: default_log_path(),
        }
    }
}

impl LoggingConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.level.trim().is_empty() {
            self.level = default_tracing_level();
        }
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.level".to_string(),
                message: format!(
                    "unknown level '{}' (expected trace, debug, info, warn or error)",
                    self.level
                ),
            });
        }
        if self.enable_structured && self.path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "logging.path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
