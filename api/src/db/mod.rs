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

//! Database abstraction to store documents grouped in collections.

use crate::model::{Collection, Document, DocumentId};
#[cfg(feature = "postgres")]
use docrud_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use docrud_core::db::sqlite;
use docrud_core::db::{DbError, DbResult, Executor, ensure_one_change};
use serde::Serialize;
use serde_json::{Map, Value};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Parses the textual `raw` body of the document `id` as stored in the database.
fn parse_body(id: &DocumentId, raw: &str) -> DbResult<Map<String, Value>> {
    match serde_json::from_str(raw)? {
        Value::Object(body) => Ok(body),
        _ => Err(DbError::DataIntegrityError(format!("Body of document {} is not an object", id))),
    }
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Document {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let body: String = row.try_get("body").map_err(postgres::map_sqlx_error)?;

        let id = DocumentId::parse(id)?;
        let body = parse_body(&id, &body)?;
        Ok(Document::new(id, body))
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Document {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let body: String = row.try_get("body").map_err(sqlite::map_sqlx_error)?;

        let id = DocumentId::parse(id)?;
        let body = parse_body(&id, &body)?;
        Ok(Document::new(id, body))
    }
}

/// Gets all documents in `collection` in the order in which they were inserted.
pub(crate) async fn find_all(ex: &mut Executor, collection: Collection) -> DbResult<Vec<Document>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, body::TEXT AS body FROM documents
                WHERE collection = $1
                ORDER BY seq";
            let rows = sqlx::query(query_str)
                .bind(collection.as_str())
                .fetch_all(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Document::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT id, body FROM documents
                WHERE collection = ?
                ORDER BY seq";
            let rows = sqlx::query(query_str)
                .bind(collection.as_str())
                .fetch_all(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Document::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the document `id` from `collection`.
pub(crate) async fn find_one(
    ex: &mut Executor,
    collection: Collection,
    id: &DocumentId,
) -> DbResult<Document> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                SELECT id, body::TEXT AS body FROM documents
                WHERE collection = $1 AND id = $2";
            let row = sqlx::query(query_str)
                .bind(collection.as_str())
                .bind(id.to_string())
                .fetch_one(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?;
            Document::try_from(row)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT id, body FROM documents WHERE collection = ? AND id = ?";
            let row = sqlx::query(query_str)
                .bind(collection.as_str())
                .bind(id.to_string())
                .fetch_one(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Document::try_from(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Inserts a new document with contents `body` into `collection` and returns its new identifier.
///
/// `body` must serialize to a JSON object.
pub(crate) async fn insert_one<B: Serialize + Sync>(
    ex: &mut Executor,
    collection: Collection,
    body: &B,
) -> DbResult<DocumentId> {
    let id = DocumentId::generate();
    let body = serde_json::to_string(body)?;

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3::JSONB)";
            sqlx::query(query_str)
                .bind(collection.as_str())
                .bind(id.to_string())
                .bind(body)
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)";
            sqlx::query(query_str)
                .bind(collection.as_str())
                .bind(id.to_string())
                .bind(body)
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_change(rows_affected)?;
    Ok(id)
}

/// Replaces the contents of the existing document `id` in `collection` with `body`.
///
/// `body` must serialize to a JSON object.
pub(crate) async fn replace_one<B: Serialize + Sync>(
    ex: &mut Executor,
    collection: Collection,
    id: &DocumentId,
    body: &B,
) -> DbResult<()> {
    let body = serde_json::to_string(body)?;

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str =
                "UPDATE documents SET body = $1::JSONB WHERE collection = $2 AND id = $3";
            sqlx::query(query_str)
                .bind(body)
                .bind(collection.as_str())
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE documents SET body = ? WHERE collection = ? AND id = ?";
            sqlx::query(query_str)
                .bind(body)
                .bind(collection.as_str())
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_change(rows_affected)
}

/// Deletes the existing document `id` from `collection`.
pub(crate) async fn delete_one(
    ex: &mut Executor,
    collection: Collection,
    id: &DocumentId,
) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM documents WHERE collection = $1 AND id = $2";
            sqlx::query(query_str)
                .bind(collection.as_str())
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM documents WHERE collection = ? AND id = ?";
            sqlx::query(query_str)
                .bind(collection.as_str())
                .bind(id.to_string())
                .execute(&mut **ex)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_change(rows_affected)
}
