//! Repository contracts and persistence implementations.
//!
//! # Responsibility
//! - Define identifier-generic data access contracts.
//! - Isolate SQLite query and row-mapping details from callers.
//!
//! # Invariants
//! - Every store failure surfaces as a `RepoError`, never a panic.
//! - Callers that need empty-on-failure behavior opt in through
//!   `DegradingCarRepository`.

use crate::db::DbError;
use crate::model::Identifiable;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod car_repo;
pub mod degrading;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store access failure raised by a repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// No connection could be acquired from the provider.
    Connection(DbError),
    /// Statement preparation, execution, or row stepping failed.
    Query(rusqlite::Error),
    /// A row could not be mapped onto an entity.
    InvalidData(String),
}

/// Coarse failure category, stable enough for log fields and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoErrorKind {
    Connection,
    Query,
    InvalidData,
}

impl RepoErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Query => "query",
            Self::InvalidData => "invalid_data",
        }
    }
}

impl RepoError {
    pub fn kind(&self) -> RepoErrorKind {
        match self {
            Self::Connection(_) => RepoErrorKind::Connection,
            Self::Query(_) => RepoErrorKind::Query,
            Self::InvalidData(_) => RepoErrorKind::InvalidData,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(err) => write!(f, "store unavailable: {err}"),
            Self::Query(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted car data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Connection(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Query(value)
    }
}

/// Generic persistence contract over identifier `Id` and entity `T`.
pub trait Repository<Id, T: Identifiable<Id>> {
    /// Persists a new entity; the store assigns its identifier.
    ///
    /// The assigned identifier is neither written back into `elem` nor
    /// returned. Read it back through a query.
    fn add(&self, elem: &T) -> RepoResult<()>;

    /// Overwrites the attributes of the row identified by `id`.
    ///
    /// The identifier carried by `elem` is ignored. Updating an identifier
    /// with no stored row changes nothing and still succeeds.
    fn update(&self, id: Id, elem: &T) -> RepoResult<()>;

    /// Returns every stored entity, fully materialized.
    fn find_all(&self) -> RepoResult<Vec<T>>;
}
