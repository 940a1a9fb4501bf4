// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Common utilities to interact with an SQLite database.

use crate::db::{Db, DbError, DbOptions, DbResult, Executor, split_schema};
use async_trait::async_trait;
use log::warn;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{Sqlite, SqlitePool, SqlitePoolOptions};

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e if e.to_string().contains("FOREIGN KEY constraint failed") => DbError::NotFound,
        e if e.to_string().contains("UNIQUE constraint failed") => DbError::AlreadyExists,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Returns true if `url` names a database that only lives in memory.
fn is_in_memory(url: &str) -> bool {
    let path = url.strip_prefix("sqlite:").unwrap_or(url);
    let path = path.strip_prefix("//").unwrap_or(path);
    path.is_empty() || path == ":memory:" || url.contains("mode=memory")
}

/// Builds the pool configuration for `opts`.
///
/// An in-memory database is freed as soon as its last connection closes, so its pool keeps one
/// connection open for as long as the pool lives.
fn pool_options(opts: &DbOptions) -> SqlitePoolOptions {
    let mut pool_options = SqlitePoolOptions::new();
    if let Some(min_connections) = opts.min_connections {
        pool_options = pool_options.min_connections(min_connections);
    }
    if let Some(max_connections) = opts.max_connections {
        pool_options = pool_options.max_connections(max_connections);
    }
    if is_in_memory(&opts.url) {
        let min_connections = pool_options.get_min_connections().max(1);
        pool_options = pool_options
            .min_connections(min_connections)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    pool_options
}

/// A database executor for SQLite backed by a connection taken from the pool.
pub type SqliteExecutor = PoolConnection<Sqlite>;

/// A database instance backed by an SQLite database, either on disk or in memory.
pub struct SqliteDb {
    /// Shared SQLite connection pool.  This is a cloneable type that all concurrent
    /// requests can use concurrently.
    pool: SqlitePool,
}

impl SqliteDb {
    /// Opens the database described by `opts`.
    ///
    /// Unlike the PostgreSQL backend, this establishes the first connection eagerly, so a bad
    /// connection string is reported right away.
    pub async fn connect(opts: DbOptions) -> DbResult<Self> {
        let pool = pool_options(&opts).connect(&opts.url).await.map_err(map_sqlx_error)?;
        Ok(Self { pool })
    }

    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<SqliteExecutor> {
        self.pool.acquire().await.map_err(map_sqlx_error)
    }
}

impl Drop for SqliteDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

#[async_trait]
impl Db for SqliteDb {
    async fn ex(&self) -> DbResult<Executor> {
        let conn = self.typed_ex().await?;
        Ok(Executor::Sqlite(conn))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
pub async fn run_schema(ex: &mut SqliteExecutor, schema: &str) -> DbResult<()> {
    for query_str in split_schema(schema) {
        sqlx::query(&query_str).execute(&mut **ex).await.map_err(map_sqlx_error)?;
    }
    Ok(())
}

/// Test utilities for the SQLite connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Initializes a test database that lives in memory for as long as the returned object.
    pub async fn setup() -> SqliteDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();
        let opts = DbOptions { url: ":memory:".to_owned(), ..Default::default() };
        SqliteDb::connect(opts).await.unwrap()
    }
}
