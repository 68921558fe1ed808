// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Library interface to the network provider
//!
//! The provider exposes a Neutron-style REST API and realizes it against an
//! OVN northbound database.  Two dropshot servers run side by side: the
//! network API itself and a small token endpoint for Keystone-style clients.

mod config;
mod context;
mod http_entrypoints_auth;
mod http_entrypoints_external;
mod ovn_north;

pub mod mappers;
pub mod northbound;

pub use config::Config;
pub use config::ConfigDhcp;
pub use config::ConfigProvider;
pub use config::DEFAULT_TENANT;
pub use context::ServerContext;
pub use ovn_north::OvnNorth;

use crate::northbound::sim::SimNorthbound;
use crate::northbound::NorthboundApi;
use ovn_provider_common::cmd::CmdError;
use slog::info;
use slog::o;
use slog::Logger;
use std::sync::Arc;

/// Packages up the running provider server
pub struct Server {
    /// shared state used by API request handlers
    pub apictx: Arc<ServerContext>,
    /// dropshot server for the network API
    pub http_server_api: dropshot::HttpServer<Arc<ServerContext>>,
    /// dropshot server for the token endpoint
    pub http_server_auth: dropshot::HttpServer<Arc<ServerContext>>,
}

impl Server {
    /// Start the provider servers described by `config`, with requests
    /// realized through `nb`.
    pub async fn start(
        config: &Config,
        nb: Arc<dyn NorthboundApi>,
        log: &Logger,
    ) -> Result<Server, String> {
        let log = log.new(o!());
        info!(log, "setting up provider server");

        let ovn_north = Arc::new(OvnNorth::new(
            nb,
            config.dhcp.clone(),
            config.provider.tenant_id.clone(),
            log.new(o!("component" => "OvnNorth")),
        ));
        let apictx = ServerContext::new(
            ovn_north,
            config.provider.tenant_id.clone(),
            log.new(o!("component" => "ServerContext")),
        );

        let http_server_api = dropshot::HttpServerStarter::new(
            &config.dropshot_api,
            http_entrypoints_external::external_api(),
            Arc::clone(&apictx),
            &log.new(o!("component" => "dropshot_api")),
        )
        .map_err(|error| format!("initializing network API server: {}", error))?
        .start();

        let http_server_auth = dropshot::HttpServerStarter::new(
            &config.dropshot_auth,
            http_entrypoints_auth::auth_api(),
            Arc::clone(&apictx),
            &log.new(o!("component" => "dropshot_auth")),
        )
        .map_err(|error| format!("initializing token server: {}", error))?
        .start();

        Ok(Server { apictx, http_server_api, http_server_auth })
    }

    /// Wait for both servers to shut down
    ///
    /// Note that this doesn't initiate a graceful shutdown, so if you call
    /// this function and nothing else, the servers will run forever.
    pub async fn wait_for_finish(self) -> Result<(), String> {
        let (api_result, auth_result) =
            futures::join!(self.http_server_api, self.http_server_auth);
        match (api_result, auth_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(error), Ok(())) | (Ok(()), Err(error)) => Err(error),
            (Err(api_error), Err(auth_error)) => Err(format!(
                "network API server: {}; token server: {}",
                api_error, auth_error
            )),
        }
    }
}

/// Run an instance of the provider server backed by the in-memory simulated
/// northbound database.
pub async fn run_server(config: &Config) -> Result<(), String> {
    let log = config
        .log
        .to_logger("ovn-provider")
        .map_err(|message| format!("initializing logger: {}", message))?;
    let nb = Arc::new(SimNorthbound::new());
    let server = Server::start(config, nb, &log).await?;
    server.wait_for_finish().await
}

/// Print the OpenAPI spec for the network API to stdout
pub fn run_openapi_external() -> Result<(), CmdError> {
    http_entrypoints_external::external_api()
        .openapi("OVN Network Provider API", "2.0")
        .write(&mut std::io::stdout())
        .map_err(|e| CmdError::Failure(e.to_string()))
}
