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

//! Extends the driver with the operations on the `items` collection.

use crate::db;
use crate::driver::Driver;
use crate::model::{Collection, InsertResult, Item, ItemBody};
use docrud_core::driver::DriverResult;
use serde_json::{Map, Value};

impl Driver {
    /// Gets all items in the order in which they were created.
    pub(crate) async fn get_items(self) -> DriverResult<Vec<Item>> {
        let mut ex = self.db.ex().await?;
        let docs = db::find_all(&mut ex, Collection::Items).await?;
        Ok(docs.into_iter().map(Item::from).collect())
    }

    /// Creates a new item with the caller-supplied `body`.
    pub(crate) async fn create_item(self, body: Map<String, Value>) -> DriverResult<InsertResult> {
        let body = ItemBody::new(body)?;

        let mut ex = self.db.ex().await?;
        let id = db::insert_one(&mut ex, Collection::Items, &body).await?;
        Ok(InsertResult::from(id))
    }
}
