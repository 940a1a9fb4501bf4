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

//! API to get a single user.

use crate::driver::Driver;
use crate::model::DocumentId;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use docrud_core::rest::{EmptyBody, RestResult};

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> RestResult<impl IntoResponse> {
    let id = DocumentId::parse(id)?;

    let user = driver.get_user(id).await?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use crate::model::{DocumentId, User};
    use crate::rest::testutils::*;
    use axum::http;
    use docrud_core::rest::testutils::OneShotBuilder;
    use docrud_core::test_payload_must_be_empty;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/api/users/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        context.create_user(&test_user_fields("a")).await;
        let id = context.create_user(&test_user_fields("b")).await;

        let response = OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_json::<User>()
            .await;
        assert_eq!(User::new(id, test_user_fields("b")), response);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        context.create_user(&test_user_fields("a")).await;
        let id = DocumentId::generate();

        OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error(&format!("User {} not found", id))
            .await;
    }

    #[tokio::test]
    async fn test_item_is_not_a_user() {
        let context = TestContext::setup().await;

        let id = context.create_item(serde_json::json!({"firstName": "x"})).await;

        OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("507f1f77bcf86cd799439011"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid document id '507f1f77bcf86cd799439011'")
            .await;
    }

    #[tokio::test]
    async fn test_store_failure() {
        let context = TestContext::setup().await;
        let id = context.create_user(&test_user_fields("a")).await;
        context.break_store().await;

        OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("Database error")
            .await;
    }

    test_payload_must_be_empty!(
        TestContext::setup().await.into_app(),
        route("67e55044-10b1-426f-9247-bb680e5fe0c8")
    );
}
