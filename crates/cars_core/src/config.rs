//! Store configuration loaded from key/value properties.
//!
//! # Responsibility
//! - Describe how to reach the SQLite store and how to size the pool.
//! - Parse flat `key=value` property sources into a typed config.
//!
//! # Invariants
//! - `store.path` is mandatory; every other key has a default.
//! - `pool.max_size` is never zero.
//! - An in-memory store uses exactly one pooled connection, since every
//!   `:memory:` connection opens its own private database.
//! - Unknown keys are ignored so callers may share one properties file.

use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const KEY_STORE_PATH: &str = "store.path";
pub const KEY_POOL_MAX_SIZE: &str = "pool.max_size";
pub const KEY_POOL_CONNECTION_TIMEOUT_MS: &str = "pool.connection_timeout_ms";
pub const KEY_STORE_BUSY_TIMEOUT_MS: &str = "store.busy_timeout_ms";

/// Path value that selects a private in-memory database per connection.
pub const IN_MEMORY_PATH: &str = ":memory:";

const DEFAULT_POOL_MAX_SIZE: u32 = 4;
const IN_MEMORY_POOL_MAX_SIZE: u32 = 1;
const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    MissingKey(&'static str),
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::MissingKey(key) => write!(f, "missing required config key `{key}`"),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for `{key}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MissingKey(_) | Self::InvalidValue { .. } => None,
        }
    }
}

/// Settings for opening the car store and its connection pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// SQLite file path, or `:memory:`.
    pub store_path: PathBuf,
    pub pool_max_size: u32,
    /// How long a caller waits for a free pooled connection.
    pub connection_timeout: Duration,
    /// SQLite busy handler timeout applied to every connection.
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Creates a config for `store_path` with default pool settings.
    ///
    /// An in-memory store defaults to a single pooled connection.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        let store_path = store_path.into();
        Self {
            pool_max_size: default_pool_max_size(&store_path),
            store_path,
            connection_timeout: Duration::from_millis(DEFAULT_CONNECTION_TIMEOUT_MS),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    /// Returns whether the store lives in memory rather than on disk.
    pub fn is_in_memory(&self) -> bool {
        self.store_path.as_os_str() == IN_MEMORY_PATH
    }

    /// Builds a config from already-split key/value pairs.
    ///
    /// # Errors
    /// - `MissingKey` when `store.path` is absent or blank.
    /// - `InvalidValue` when a numeric key does not parse or is out of range.
    pub fn from_properties<I, K, V>(properties: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut store_path = None;
        let mut pool_max_size = None;
        let mut connection_timeout_ms = DEFAULT_CONNECTION_TIMEOUT_MS;
        let mut busy_timeout_ms = DEFAULT_BUSY_TIMEOUT_MS;

        for (key, value) in properties {
            let value = value.as_ref().trim();
            match key.as_ref().trim() {
                KEY_STORE_PATH => {
                    if !value.is_empty() {
                        store_path = Some(PathBuf::from(value));
                    }
                }
                KEY_POOL_MAX_SIZE => {
                    pool_max_size = Some(parse_number(KEY_POOL_MAX_SIZE, value)?);
                }
                KEY_POOL_CONNECTION_TIMEOUT_MS => {
                    connection_timeout_ms = parse_number(KEY_POOL_CONNECTION_TIMEOUT_MS, value)?;
                }
                KEY_STORE_BUSY_TIMEOUT_MS => {
                    busy_timeout_ms = parse_number(KEY_STORE_BUSY_TIMEOUT_MS, value)?;
                }
                other => debug!("event=config_parse module=config status=ignored key={other}"),
            }
        }

        let store_path = store_path.ok_or(ConfigError::MissingKey(KEY_STORE_PATH))?;
        let config = Self {
            pool_max_size: pool_max_size.unwrap_or_else(|| default_pool_max_size(&store_path)),
            store_path,
            connection_timeout: Duration::from_millis(connection_timeout_ms),
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the limits the connection pool requires.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey(KEY_STORE_PATH));
        }
        if self.pool_max_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: KEY_POOL_MAX_SIZE,
                value: self.pool_max_size.to_string(),
                reason: "pool needs at least one connection",
            });
        }
        if self.is_in_memory() && self.pool_max_size > IN_MEMORY_POOL_MAX_SIZE {
            return Err(ConfigError::InvalidValue {
                key: KEY_POOL_MAX_SIZE,
                value: self.pool_max_size.to_string(),
                reason: "an in-memory store cannot be shared across pooled connections",
            });
        }
        if self.connection_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: KEY_POOL_CONNECTION_TIMEOUT_MS,
                value: "0".to_string(),
                reason: "checkout timeout must be positive",
            });
        }
        Ok(())
    }

    /// Parses properties text (`key=value` or `key: value` per line).
    ///
    /// Blank lines and lines starting with `#` or `!` are skipped. Lines
    /// without a separator are treated as a key with an empty value.
    pub fn parse_properties(text: &str) -> Result<Self, ConfigError> {
        let pairs = text.lines().filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                return None;
            }
            match line.find(['=', ':']) {
                Some(split) => Some((&line[..split], &line[split + 1..])),
                None => Some((line, "")),
            }
        });
        Self::from_properties(pairs)
    }

    /// Reads and parses a properties file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_properties(&text)
    }
}

fn default_pool_max_size(store_path: &Path) -> u32 {
    if store_path.as_os_str() == IN_MEMORY_PATH {
        IN_MEMORY_POOL_MAX_SIZE
    } else {
        DEFAULT_POOL_MAX_SIZE
    }
}

fn parse_number<N: std::str::FromStr>(key: &'static str, value: &str) -> Result<N, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason: "expected a non-negative integer",
    })
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, DbConfig, KEY_POOL_CONNECTION_TIMEOUT_MS, KEY_POOL_MAX_SIZE, KEY_STORE_PATH,
    };
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn parse_properties_applies_defaults() {
        let config = DbConfig::parse_properties("store.path = /tmp/cars.db\n").unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/cars.db"));
        assert_eq!(config.pool_max_size, 4);
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert!(!config.is_in_memory());
    }

    #[test]
    fn parse_properties_skips_comments_and_unknown_keys() {
        let text = "# cars store\n\
                    ! legacy comment\n\
                    \n\
                    store.path: :memory:\n\
                    pool.max_size=1\n\
                    pool.connection_timeout_ms = 250\n\
                    store.busy_timeout_ms=10\n\
                    jdbc.user=test\n";
        let config = DbConfig::parse_properties(text).unwrap();
        assert!(config.is_in_memory());
        assert_eq!(config.pool_max_size, 1);
        assert_eq!(config.connection_timeout, Duration::from_millis(250));
        assert_eq!(config.busy_timeout, Duration::from_millis(10));
    }

    #[test]
    fn missing_store_path_is_rejected() {
        let err = DbConfig::from_properties([(KEY_POOL_MAX_SIZE, "2")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(key) if key == KEY_STORE_PATH));

        let blank = DbConfig::from_properties([(KEY_STORE_PATH, "  ")]).unwrap_err();
        assert!(matches!(blank, ConfigError::MissingKey(_)));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = DbConfig::from_properties([
            (KEY_STORE_PATH, "cars.db"),
            (KEY_POOL_MAX_SIZE, "many"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("pool.max_size"));

        let zero = DbConfig::from_properties([
            (KEY_STORE_PATH, "cars.db"),
            (KEY_POOL_MAX_SIZE, "0"),
        ])
        .unwrap_err();
        assert!(matches!(zero, ConfigError::InvalidValue { key, .. } if key == KEY_POOL_MAX_SIZE));

        let no_wait = DbConfig::from_properties([
            (KEY_STORE_PATH, "cars.db"),
            (KEY_POOL_CONNECTION_TIMEOUT_MS, "0"),
        ])
        .unwrap_err();
        assert!(matches!(
            no_wait,
            ConfigError::InvalidValue { key, .. } if key == KEY_POOL_CONNECTION_TIMEOUT_MS
        ));
    }

    #[test]
    fn in_memory_store_defaults_to_one_connection_and_rejects_more() {
        let config = DbConfig::from_properties([(KEY_STORE_PATH, ":memory:")]).unwrap();
        assert_eq!(config.pool_max_size, 1);
        assert_eq!(DbConfig::new(":memory:").pool_max_size, 1);
        assert_eq!(DbConfig::new("cars.db").pool_max_size, 4);

        let err = DbConfig::from_properties([
            (KEY_STORE_PATH, ":memory:"),
            (KEY_POOL_MAX_SIZE, "4"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == KEY_POOL_MAX_SIZE));

        let mut widened = DbConfig::new(":memory:");
        widened.pool_max_size = 2;
        assert!(widened.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DbConfig::load(dir.path().join("absent.properties")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
