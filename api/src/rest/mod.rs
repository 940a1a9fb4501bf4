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

//! REST interface for the document collections.

use crate::driver::Driver;
use axum::Router;
use tower_http::cors::CorsLayer;

mod items_get;
mod items_post;
#[cfg(test)]
mod testutils;
mod user_delete;
mod user_get;
mod user_put;
mod users_get;
mod users_post;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/users", get(users_get::handler).post(users_post::handler))
        .route(
            "/api/users/:id",
            get(user_get::handler).put(user_put::handler).delete(user_delete::handler),
        )
        .route("/api/items", get(items_get::handler).post(items_post::handler))
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
