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

//! Entry point to the service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use docrud_api::{ServiceOptions, connect_db, serve};
use docrud_core::db::DbOptions;
use log::{error, info, warn};
use std::process;

/// Prefix of all environment variables that configure the service.
const ENV_PREFIX: &str = "DOCRUD";

/// Loads the configuration, confirms database connectivity and serves requests until terminated.
async fn run() -> Result<(), String> {
    let service_opts = ServiceOptions::from_env(ENV_PREFIX)?;
    let db_opts = DbOptions::from_env(ENV_PREFIX)?;

    let db = connect_db(db_opts).await.map_err(|e| format!("Database connection failed: {}", e))?;
    info!("Database connection established");

    serve(service_opts, db).await.map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    env_logger::init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Failed to load .env file: {}", e);
        }
    }

    if let Err(e) = run().await {
        error!("{}", e);
        process::exit(1);
    }
}
