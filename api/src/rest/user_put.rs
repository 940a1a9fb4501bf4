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

//! API to replace all fields of an existing user.

use crate::driver::Driver;
use crate::model::{DocumentId, UserFields};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use docrud_core::rest::RestResult;

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    Json(fields): Json<UserFields>,
) -> RestResult<StatusCode> {
    let id = DocumentId::parse(id)?;

    driver.replace_user(id, fields).await?;

    Ok(StatusCode::NO_CONTENT)
}
