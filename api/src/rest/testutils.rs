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

//! Utilities to help testing the REST interface.

use crate::db;
use crate::driver::Driver;
use crate::model::{Balance, Collection, DocumentId, Item, User, UserFields};
use crate::rest::app;
use axum::Router;
use docrud_core::db::{Db, DbError, Executor};
use serde_json::Value;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The app router under test.
    app: Router,

    /// The database backing the app, for direct access.
    db: Arc<dyn Db + Send + Sync>,
}

impl TestContext {
    /// Initializes the app using an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(docrud_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let app = app(Driver::new(db.clone()));
        Self { app, db }
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Gets a direct executor against the database.
    async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Drops the documents table so that every later database operation fails.
    pub(crate) async fn break_store(&self) {
        match self.ex().await {
            Executor::Sqlite(mut ex) => {
                sqlx::query("DROP TABLE documents").execute(&mut *ex).await.unwrap();
            }

            #[allow(unused)]
            _ => unreachable!(),
        }
    }

    /// Stores a user with `fields` by directly modifying the database.
    pub(crate) async fn create_user(&self, fields: &UserFields) -> DocumentId {
        db::insert_one(&mut self.ex().await, Collection::Users, fields).await.unwrap()
    }

    /// Gets the user `id` directly from the database, if it exists.
    pub(crate) async fn get_user(&self, id: &DocumentId) -> Option<User> {
        match db::find_one(&mut self.ex().await, Collection::Users, id).await {
            Ok(doc) => Some(User::try_from(doc).unwrap()),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Gets all users directly from the database.
    pub(crate) async fn get_users(&self) -> Vec<User> {
        let docs = db::find_all(&mut self.ex().await, Collection::Users).await.unwrap();
        docs.into_iter().map(|doc| User::try_from(doc).unwrap()).collect()
    }

    /// Stores an item with `body` by directly modifying the database.
    pub(crate) async fn create_item(&self, body: Value) -> DocumentId {
        db::insert_one(&mut self.ex().await, Collection::Items, &body).await.unwrap()
    }

    /// Gets all items directly from the database.
    pub(crate) async fn get_items(&self) -> Vec<Item> {
        let docs = db::find_all(&mut self.ex().await, Collection::Items).await.unwrap();
        docs.into_iter().map(Item::from).collect()
    }
}

/// Creates a set of user fields whose values derive from `name`.
pub(crate) fn test_user_fields(name: &str) -> UserFields {
    UserFields::new(
        name.to_owned(),
        format!("{} last", name),
        format!("{}@example.com", name),
        format!("{} password", name),
        Balance::Number(serde_json::Number::from(100u32)),
    )
}
