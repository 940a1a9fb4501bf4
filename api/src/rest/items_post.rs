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

//! API to create a new item.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use docrud_core::rest::RestResult;
use serde_json::{Map, Value};

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(body): Json<Map<String, Value>>,
) -> RestResult<impl IntoResponse> {
    let result = driver.create_item(body).await?;

    Ok((StatusCode::CREATED, Json(result)))
}
