//! SQLite connection provisioning for the car store.
//!
//! # Responsibility
//! - Hand out scoped SQLite connections to repositories.
//! - Build a configured connection pool from `DbConfig`.
//!
//! # Invariants
//! - A connection obtained from a provider is released when its guard drops.
//! - Providers never create or migrate schema.

use crate::config::ConfigError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

mod pool;

pub use pool::ConnectionPool;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Config(ConfigError),
    Pool(r2d2::Error),
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Pool(err) => write!(f, "connection pool error: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Pool(err) => Some(err),
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<ConfigError> for DbError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<r2d2::Error> for DbError {
    fn from(value: r2d2::Error) -> Self {
        Self::Pool(value)
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Source of live SQLite connections, borrowed for one operation at a time.
pub trait ConnectionProvider {
    /// Scoped connection handle; dropping it releases the connection.
    type Conn<'a>: Deref<Target = Connection>
    where
        Self: 'a;

    fn connection(&self) -> DbResult<Self::Conn<'_>>;
}

/// A single owned connection lends itself out for every call.
impl ConnectionProvider for Connection {
    type Conn<'a> = &'a Connection;

    fn connection(&self) -> DbResult<Self::Conn<'_>> {
        Ok(self)
    }
}
