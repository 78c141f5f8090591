//! Connection pool and schema setup for the `SQLite` store.

use super::schema::SCHEMA_SQL;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// `SQLite` connection pool type used by workflow adapters.
pub type WorkflowPool = Pool<ConnectionManager<SqliteConnection>>;

/// Pooled connection handed to repository operations.
type WorkflowConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

/// Errors raised while opening a store.
#[derive(Debug, Error)]
pub enum OpenStoreError {
    /// The connection pool could not be built.
    #[error("failed to open database '{url}': {source}")]
    Pool {
        /// Database URL or path.
        url: String,
        /// Pool failure.
        #[source]
        source: diesel::r2d2::PoolError,
    },
    /// The schema could not be applied.
    #[error("failed to prepare schema in '{url}': {source}")]
    Schema {
        /// Database URL or path.
        url: String,
        /// Query failure.
        #[source]
        source: diesel::result::Error,
    },
}

/// Applies per-connection pragmas when a connection is handed out.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute(CONNECTION_PRAGMAS)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// `SQLite`-backed workflow store.
#[derive(Debug, Clone)]
pub struct SqliteWorkflowStore {
    pool: WorkflowPool,
}

impl SqliteWorkflowStore {
    /// Opens (creating if needed) the database at `url` and applies the
    /// schema.
    ///
    /// The pool holds exactly one long-lived connection, so `:memory:`
    /// databases keep their contents for the lifetime of the store.
    ///
    /// # Errors
    ///
    /// Returns [`OpenStoreError`] when the database cannot be opened or the
    /// schema cannot be applied.
    pub fn open(url: &str) -> Result<Self, OpenStoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(url);
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .connection_timeout(Duration::from_secs(5))
            .connection_customizer(Box::new(ConnectionPragmas))
            .build(manager)
            .map_err(|source| OpenStoreError::Pool {
                url: url.to_owned(),
                source,
            })?;

        let store = Self { pool };
        store.apply_schema(url)?;
        debug!(url, "opened workflow store");
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`OpenStoreError`] when `SQLite` cannot be initialized.
    pub fn in_memory() -> Result<Self, OpenStoreError> {
        Self::open(":memory:")
    }

    fn apply_schema(&self, url: &str) -> Result<(), OpenStoreError> {
        let mut connection = self.pool.get().map_err(|source| OpenStoreError::Pool {
            url: url.to_owned(),
            source,
        })?;
        connection
            .batch_execute(SCHEMA_SQL)
            .map_err(|source| OpenStoreError::Schema {
                url: url.to_owned(),
                source,
            })
    }

    /// Runs `f` with a pooled connection.
    pub(super) fn run<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, E>,
        E: From<diesel::r2d2::PoolError>,
    {
        let mut connection: WorkflowConnection = self.pool.get()?;
        f(&mut connection)
    }
}
