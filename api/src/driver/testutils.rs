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

//! Test utilities for the business logic.

use crate::db;
use crate::driver::Driver;
use crate::model::{Collection, DocumentId, UserFields};
use docrud_core::db::{Db, Executor};
use serde_json::Value;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database that backs the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(docrud_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        Self { db, driver }
    }

    /// Gets a copy of the driver under test.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Stores a user with `fields` bypassing the driver and returns its identifier.
    pub(crate) async fn create_user(&self, fields: UserFields) -> DocumentId {
        db::insert_one(&mut self.ex().await, Collection::Users, &fields).await.unwrap()
    }

    /// Stores an arbitrary `body` in the users collection bypassing any validation.
    pub(crate) async fn create_user_raw(&self, body: Value) -> DocumentId {
        db::insert_one(&mut self.ex().await, Collection::Users, &body).await.unwrap()
    }

    /// Stores an item with `body` bypassing the driver and returns its identifier.
    pub(crate) async fn create_item(&self, body: Value) -> DocumentId {
        db::insert_one(&mut self.ex().await, Collection::Items, &body).await.unwrap()
    }
}
