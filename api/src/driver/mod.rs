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

//! Business logic for the document collections.

use docrud_core::db::Db;
use docrud_core::driver::DriverError;
use std::sync::Arc;

mod items;
#[cfg(test)]
pub(crate) mod testutils;
mod users;

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": each issues a single call into
/// the database.  For this reason, these operations consume the driver to discourage the caller
/// from chaining separate operations and expecting them to be atomic.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }
}

/// Rewrites a generic "not found" error `e` to describe the missing `what`.
fn describe_not_found(e: DriverError, what: String) -> DriverError {
    match e {
        DriverError::NotFound(_) => DriverError::NotFound(format!("{} not found", what)),
        e => e,
    }
}
