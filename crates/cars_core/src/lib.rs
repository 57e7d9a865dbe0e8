//! Persistence core for cars stored in a SQLite `car` table.
//! Exposes an identifier-generic repository contract and its pooled SQLite
//! implementation.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{ConfigError, DbConfig};
pub use db::{ConnectionPool, ConnectionProvider, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::car::{Car, CarId};
pub use model::Identifiable;
pub use repo::car_repo::{CarRepository, SqliteCarRepository};
pub use repo::degrading::DegradingCarRepository;
pub use repo::{RepoError, RepoErrorKind, RepoResult, Repository};
