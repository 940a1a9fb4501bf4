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

//! Extends the driver with the operations on the `users` collection.

use crate::db;
use crate::driver::{Driver, describe_not_found};
use crate::model::{Collection, DocumentId, InsertResult, User, UserFields};
use docrud_core::db::DbError;
use docrud_core::driver::DriverResult;

impl Driver {
    /// Gets all users in the order in which they were created.
    pub(crate) async fn get_users(self) -> DriverResult<Vec<User>> {
        let mut ex = self.db.ex().await?;
        let docs = db::find_all(&mut ex, Collection::Users).await?;
        let mut users = Vec::with_capacity(docs.len());
        for doc in docs {
            users.push(User::try_from(doc).map_err(DbError::from)?);
        }
        Ok(users)
    }

    /// Gets the user identified by `id`.
    pub(crate) async fn get_user(self, id: DocumentId) -> DriverResult<User> {
        let mut ex = self.db.ex().await?;
        let doc = db::find_one(&mut ex, Collection::Users, &id)
            .await
            .map_err(|e| describe_not_found(e.into(), format!("User {}", id)))?;
        Ok(User::try_from(doc).map_err(DbError::from)?)
    }

    /// Creates a new user with the given `fields`.
    pub(crate) async fn create_user(self, fields: UserFields) -> DriverResult<InsertResult> {
        let mut ex = self.db.ex().await?;
        let id = db::insert_one(&mut ex, Collection::Users, &fields).await?;
        Ok(InsertResult::from(id))
    }

    /// Replaces all fields of the existing user `id` with `fields`.
    pub(crate) async fn replace_user(self, id: DocumentId, fields: UserFields) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        db::replace_one(&mut ex, Collection::Users, &id, &fields)
            .await
            .map_err(|e| describe_not_found(e.into(), format!("User {}", id)))
    }

    /// Deletes the existing user `id`.
    pub(crate) async fn delete_user(self, id: DocumentId) -> DriverResult<()> {
        let mut ex = self.db.ex().await?;
        db::delete_one(&mut ex, Collection::Users, &id)
            .await
            .map_err(|e| describe_not_found(e.into(), format!("User {}", id)))
    }
}
