//! Pooled SQLite connections built from `DbConfig`.
//!
//! # Responsibility
//! - Open file or in-memory SQLite pools.
//! - Configure connection pragmas on every new pooled connection.
//!
//! # Invariants
//! - Pooled connections have `foreign_keys=ON` and the configured busy timeout.
//! - With `:memory:` every pooled connection sees its own private database.
//!
//! # See also
//! - `crate::config` for recognized keys.

use super::{ConnectionProvider, DbResult};
use crate::config::DbConfig;
use log::{debug, error, info};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::time::{Duration, Instant};

/// Cloneable handle to an r2d2 pool of SQLite connections.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Pool<SqliteConnectionManager>,
}

impl ConnectionPool {
    /// Builds a pool and eagerly opens its first connections.
    ///
    /// # Side effects
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(config: &DbConfig) -> DbResult<Self> {
        config.validate()?;
        let started_at = Instant::now();
        let mode = if config.is_in_memory() { "memory" } else { "file" };
        info!(
            "event=db_open module=db status=start mode={} pool_max_size={}",
            mode, config.pool_max_size
        );

        let manager = if config.is_in_memory() {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(&config.store_path)
        };
        let busy_timeout = config.busy_timeout;
        let manager = manager.with_init(move |conn| bootstrap_connection(conn, busy_timeout));

        let built = Pool::builder()
            .max_size(config.pool_max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager);

        match built {
            Ok(inner) => {
                info!(
                    "event=db_open module=db status=ok mode={} duration_ms={}",
                    mode,
                    started_at.elapsed().as_millis()
                );
                Ok(Self { inner })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode={} duration_ms={} error_code=db_pool_failed error={}",
                    mode,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Returns `(connections, idle_connections)` currently held by the pool.
    pub fn state(&self) -> (u32, u32) {
        let state = self.inner.state();
        (state.connections, state.idle_connections)
    }

    pub fn max_size(&self) -> u32 {
        self.inner.max_size()
    }
}

impl ConnectionProvider for ConnectionPool {
    type Conn<'a> = PooledConnection<SqliteConnectionManager>;

    fn connection(&self) -> DbResult<Self::Conn<'_>> {
        match self.inner.get() {
            Ok(conn) => Ok(conn),
            Err(err) => {
                debug!("event=db_checkout module=db status=error error={}", err);
                Err(err.into())
            }
        }
    }
}

fn bootstrap_connection(
    conn: &mut rusqlite::Connection,
    busy_timeout: Duration,
) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(busy_timeout)?;
    Ok(())
}
