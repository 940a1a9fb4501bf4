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

//! REST service that exposes CRUD operations over the `users` and `items` document collections.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use docrud_core::db::{Db, DbOptions, DbResult};
use docrud_core::env::get_optional_var;
use log::{info, warn};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

mod db;
mod driver;
use driver::Driver;
mod model;
mod rest;
use rest::app;

/// Default value for the `PORT` setting when not specified.
const DEFAULT_PORT: u16 = 8080;

/// Default value for the `BIND_ADDR` setting when not specified.
const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Configuration options for the HTTP listener.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct ServiceOptions {
    /// Address to listen on.
    pub bind_addr: IpAddr,

    /// Port to listen on.
    pub port: u16,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_BIND_ADDR, port: DEFAULT_PORT }
    }
}

impl ServiceOptions {
    /// Creates a new set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_BIND_ADDR` and `<prefix>_PORT`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            bind_addr: get_optional_var::<IpAddr>(prefix, "BIND_ADDR")?
                .unwrap_or(DEFAULT_BIND_ADDR),
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
        })
    }

    /// Returns the socket address to listen on.
    fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// Connects to the database described by `opts` and prepares it for use by the service.
///
/// Initializing the schema requires talking to the server, so a successful return confirms that
/// the database is reachable.
pub async fn connect_db(opts: DbOptions) -> DbResult<Arc<dyn Db + Send + Sync>> {
    let db: Arc<dyn Db + Send + Sync> = Arc::from(docrud_core::db::connect(opts).await?);

    let result = match db.ex().await {
        Ok(mut ex) => db::init_schema(&mut ex).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        db.close().await;
        return Err(e);
    }

    Ok(db)
}

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for termination signals; will not shut down cleanly: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Termination requested; draining in-flight requests");
}

/// Serves the application on the address described by `opts` using the already-connected `db`.
///
/// The database is closed before returning, whether serving succeeded or not.
pub async fn serve(
    opts: ServiceOptions,
    db: Arc<dyn Db + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let driver = Driver::new(db.clone());
    let app = app(driver);

    let addr = opts.socket_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            db.close().await;
            return Err(format!("Cannot listen on {}: {}", addr, e).into());
        }
    };
    info!("Listening on {}", addr);

    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;
    db.close().await;
    result?;
    Ok(())
}
