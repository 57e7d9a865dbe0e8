//! Car repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide add/update/list APIs plus the manufacturer and year filters.
//! - Keep SQL text and row mapping inside the persistence boundary.
//!
//! # Invariants
//! - Every call acquires one connection, runs one statement, and releases
//!   both before returning, on success and failure alike.
//! - The `id` column is never bound on insert; SQLite assigns it.
//! - NULL attribute columns read as empty text or year `0`; values of the
//!   wrong type are rejected instead of masked.

use super::{RepoError, RepoResult, Repository};
use crate::config::DbConfig;
use crate::db::{ConnectionPool, ConnectionProvider, DbResult};
use crate::model::car::{Car, CarId};
use log::{debug, error, info, trace};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Params, Row};
use std::time::Instant;

const CAR_SELECT_SQL: &str = "SELECT
    id,
    manufacturer,
    model,
    year
FROM car";

/// Car-specific queries layered on the generic contract.
pub trait CarRepository: Repository<CarId, Car> {
    /// Returns cars whose manufacturer equals `manufacturer` exactly.
    ///
    /// Comparison uses the column collation (case-sensitive by default).
    fn find_by_manufacturer(&self, manufacturer: &str) -> RepoResult<Vec<Car>>;

    /// Returns cars with `min <= year <= max`; empty when `min > max`.
    fn find_between_years(&self, min: i32, max: i32) -> RepoResult<Vec<Car>>;
}

/// SQLite-backed car repository borrowing connections per call.
pub struct SqliteCarRepository<P: ConnectionProvider = ConnectionPool> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteCarRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs `op` on a freshly acquired connection and logs the outcome.
    fn run<R>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> RepoResult<R>,
    ) -> RepoResult<R> {
        let started_at = Instant::now();
        trace!("event={event} module=repo status=start");

        let result = self
            .provider
            .connection()
            .map_err(RepoError::from)
            .and_then(|conn| op(&*conn));

        match &result {
            Ok(_) => debug!(
                "event={event} module=repo status=ok duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event={event} module=repo status=error duration_ms={} error_kind={} error={}",
                started_at.elapsed().as_millis(),
                err.kind().as_str(),
                err
            ),
        }
        result
    }
}

impl SqliteCarRepository<ConnectionPool> {
    /// Opens a connection pool from `config` and wraps it.
    pub fn from_config(config: &DbConfig) -> DbResult<Self> {
        info!(
            "event=repo_init module=repo store_path={} pool_max_size={} connection_timeout_ms={}",
            config.store_path.display(),
            config.pool_max_size,
            config.connection_timeout.as_millis()
        );
        Ok(Self::new(ConnectionPool::open(config)?))
    }
}

impl<P: ConnectionProvider> Repository<CarId, Car> for SqliteCarRepository<P> {
    fn add(&self, elem: &Car) -> RepoResult<()> {
        self.run("car_add", |conn| {
            let changed = conn.execute(
                "INSERT INTO car (manufacturer, model, year) VALUES (?1, ?2, ?3);",
                params![elem.manufacturer.as_str(), elem.model.as_str(), elem.year],
            )?;
            trace!("event=car_add module=repo rows_affected={changed}");
            Ok(())
        })
    }

    fn update(&self, id: CarId, elem: &Car) -> RepoResult<()> {
        self.run("car_update", |conn| {
            let changed = conn.execute(
                "UPDATE car
                 SET
                    manufacturer = ?1,
                    model = ?2,
                    year = ?3
                 WHERE id = ?4;",
                params![
                    elem.manufacturer.as_str(),
                    elem.model.as_str(),
                    elem.year,
                    id
                ],
            )?;
            trace!("event=car_update module=repo car_id={id} rows_affected={changed}");
            Ok(())
        })
    }

    fn find_all(&self) -> RepoResult<Vec<Car>> {
        self.run("car_find_all", |conn| {
            query_cars(conn, &format!("{CAR_SELECT_SQL} ORDER BY id ASC;"), params![])
        })
    }
}

impl<P: ConnectionProvider> CarRepository for SqliteCarRepository<P> {
    fn find_by_manufacturer(&self, manufacturer: &str) -> RepoResult<Vec<Car>> {
        self.run("car_find_by_manufacturer", |conn| {
            query_cars(
                conn,
                &format!("{CAR_SELECT_SQL} WHERE manufacturer = ?1 ORDER BY id ASC;"),
                params![manufacturer],
            )
        })
    }

    fn find_between_years(&self, min: i32, max: i32) -> RepoResult<Vec<Car>> {
        self.run("car_find_between_years", |conn| {
            query_cars(
                conn,
                &format!("{CAR_SELECT_SQL} WHERE year BETWEEN ?1 AND ?2 ORDER BY id ASC;"),
                params![min, max],
            )
        })
    }
}

fn query_cars(conn: &Connection, sql: &str, params: impl Params) -> RepoResult<Vec<Car>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut cars = Vec::new();

    while let Some(row) = rows.next()? {
        cars.push(parse_car_row(row)?);
    }

    trace!("event=car_query module=repo rows={}", cars.len());
    Ok(cars)
}

fn parse_car_row(row: &Row<'_>) -> RepoResult<Car> {
    Ok(Car::with_id(
        column::<CarId>(row, "id")?,
        column::<Option<String>>(row, "manufacturer")?.unwrap_or_default(),
        column::<Option<String>>(row, "model")?.unwrap_or_default(),
        column::<Option<i32>>(row, "year")?.unwrap_or(0),
    ))
}

fn column<T: FromSql>(row: &Row<'_>, name: &str) -> RepoResult<T> {
    row.get(name).map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => {
            RepoError::InvalidData(format!("invalid value in car.{name}: {err}"))
        }
        other => RepoError::Query(other),
    })
}
