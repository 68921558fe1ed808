// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handler functions (entrypoints) for the network API

use crate::context::ServerContext;
use dropshot::endpoint;
use dropshot::ApiDescription;
use dropshot::HttpError;
use dropshot::HttpResponseCreated;
use dropshot::HttpResponseDeleted;
use dropshot::HttpResponseOk;
use dropshot::Path;
use dropshot::RequestContext;
use dropshot::TypedBody;
use ovn_provider_common::api::NetworkCreateBody;
use ovn_provider_common::api::NetworkListResponse;
use ovn_provider_common::api::NetworkResponse;
use ovn_provider_common::api::NetworkUpdateBody;
use ovn_provider_common::api::PortCreateBody;
use ovn_provider_common::api::PortListResponse;
use ovn_provider_common::api::PortResponse;
use ovn_provider_common::api::PortUpdateBody;
use ovn_provider_common::api::RouterResponse;
use ovn_provider_common::api::SubnetCreateBody;
use ovn_provider_common::api::SubnetListResponse;
use ovn_provider_common::api::SubnetResponse;
use ovn_provider_common::api::SubnetUpdateBody;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Returns a description of the network API
pub fn external_api() -> ApiDescription<Arc<ServerContext>> {
    fn register_endpoints(
        api: &mut ApiDescription<Arc<ServerContext>>,
    ) -> Result<(), String> {
        api.register(networks_get)?;
        api.register(networks_post)?;
        api.register(networks_get_network)?;
        api.register(networks_put_network)?;
        api.register(networks_delete_network)?;

        api.register(subnets_get)?;
        api.register(subnets_post)?;
        api.register(subnets_get_subnet)?;
        api.register(subnets_put_subnet)?;
        api.register(subnets_delete_subnet)?;

        api.register(ports_get)?;
        api.register(ports_post)?;
        api.register(ports_get_port)?;
        api.register(ports_put_port)?;
        api.register(ports_delete_port)?;

        api.register(routers_get_router)?;
        api.register(routers_delete_router)?;
        Ok(())
    }

    let mut api = ApiDescription::new();
    if let Err(err) = register_endpoints(&mut api) {
        panic!("failed to register entrypoints: {}", err);
    }
    api
}

/*
 * Networks
 */

/// List networks
#[endpoint {
    method = GET,
    path = "/v2.0/networks",
}]
async fn networks_get(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<HttpResponseOk<NetworkListResponse>, HttpError> {
    let apictx = rqctx.context();
    let networks = apictx.ovn_north.networks_list().await?;
    Ok(HttpResponseOk(NetworkListResponse { networks }))
}

/// Create a network
#[endpoint {
    method = POST,
    path = "/v2.0/networks",
}]
async fn networks_post(
    rqctx: RequestContext<Arc<ServerContext>>,
    body: TypedBody<NetworkCreateBody>,
) -> Result<HttpResponseCreated<NetworkResponse>, HttpError> {
    let apictx = rqctx.context();
    let params = body.into_inner().network;
    let network = apictx.ovn_north.network_create(&params).await?;
    Ok(HttpResponseCreated(NetworkResponse { network }))
}

/// Path parameters for network requests
#[derive(Deserialize, JsonSchema)]
struct NetworkPathParam {
    network_id: Uuid,
}

/// Fetch a network
#[endpoint {
    method = GET,
    path = "/v2.0/networks/{network_id}",
}]
async fn networks_get_network(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<NetworkPathParam>,
) -> Result<HttpResponseOk<NetworkResponse>, HttpError> {
    let apictx = rqctx.context();
    let network_id = path_params.into_inner().network_id;
    let network = apictx.ovn_north.network_get(network_id).await?;
    Ok(HttpResponseOk(NetworkResponse { network }))
}

/// Update a network
#[endpoint {
    method = PUT,
    path = "/v2.0/networks/{network_id}",
}]
async fn networks_put_network(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<NetworkPathParam>,
    body: TypedBody<NetworkUpdateBody>,
) -> Result<HttpResponseOk<NetworkResponse>, HttpError> {
    let apictx = rqctx.context();
    let network_id = path_params.into_inner().network_id;
    let params = body.into_inner().network;
    let network =
        apictx.ovn_north.network_update(network_id, &params).await?;
    Ok(HttpResponseOk(NetworkResponse { network }))
}

/// Delete a network
#[endpoint {
    method = DELETE,
    path = "/v2.0/networks/{network_id}",
}]
async fn networks_delete_network(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<NetworkPathParam>,
) -> Result<HttpResponseDeleted, HttpError> {
    let apictx = rqctx.context();
    let network_id = path_params.into_inner().network_id;
    apictx.ovn_north.network_delete(network_id).await?;
    Ok(HttpResponseDeleted())
}

/*
 * Subnets
 */

/// List subnets
#[endpoint {
    method = GET,
    path = "/v2.0/subnets",
}]
async fn subnets_get(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<HttpResponseOk<SubnetListResponse>, HttpError> {
    let apictx = rqctx.context();
    let subnets = apictx.ovn_north.subnets_list().await?;
    Ok(HttpResponseOk(SubnetListResponse { subnets }))
}

/// Create a subnet
#[endpoint {
    method = POST,
    path = "/v2.0/subnets",
}]
async fn subnets_post(
    rqctx: RequestContext<Arc<ServerContext>>,
    body: TypedBody<SubnetCreateBody>,
) -> Result<HttpResponseCreated<SubnetResponse>, HttpError> {
    let apictx = rqctx.context();
    let params = body.into_inner().subnet;
    let subnet = apictx.ovn_north.subnet_create(&params).await?;
    Ok(HttpResponseCreated(SubnetResponse { subnet }))
}

/// Path parameters for subnet requests
#[derive(Deserialize, JsonSchema)]
struct SubnetPathParam {
    subnet_id: Uuid,
}

/// Fetch a subnet
#[endpoint {
    method = GET,
    path = "/v2.0/subnets/{subnet_id}",
}]
async fn subnets_get_subnet(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<SubnetPathParam>,
) -> Result<HttpResponseOk<SubnetResponse>, HttpError> {
    let apictx = rqctx.context();
    let subnet_id = path_params.into_inner().subnet_id;
    let subnet = apictx.ovn_north.subnet_get(subnet_id).await?;
    Ok(HttpResponseOk(SubnetResponse { subnet }))
}

/// Update a subnet
#[endpoint {
    method = PUT,
    path = "/v2.0/subnets/{subnet_id}",
}]
async fn subnets_put_subnet(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<SubnetPathParam>,
    body: TypedBody<SubnetUpdateBody>,
) -> Result<HttpResponseOk<SubnetResponse>, HttpError> {
    let apictx = rqctx.context();
    let subnet_id = path_params.into_inner().subnet_id;
    let params = body.into_inner().subnet;
    let subnet = apictx.ovn_north.subnet_update(subnet_id, &params).await?;
    Ok(HttpResponseOk(SubnetResponse { subnet }))
}

/// Delete a subnet
#[endpoint {
    method = DELETE,
    path = "/v2.0/subnets/{subnet_id}",
}]
async fn subnets_delete_subnet(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<SubnetPathParam>,
) -> Result<HttpResponseDeleted, HttpError> {
    let apictx = rqctx.context();
    let subnet_id = path_params.into_inner().subnet_id;
    apictx.ovn_north.subnet_delete(subnet_id).await?;
    Ok(HttpResponseDeleted())
}

/*
 * Ports
 */

/// List ports
#[endpoint {
    method = GET,
    path = "/v2.0/ports",
}]
async fn ports_get(
    rqctx: RequestContext<Arc<ServerContext>>,
) -> Result<HttpResponseOk<PortListResponse>, HttpError> {
    let apictx = rqctx.context();
    let ports = apictx.ovn_north.ports_list().await?;
    Ok(HttpResponseOk(PortListResponse { ports }))
}

/// Create a port
#[endpoint {
    method = POST,
    path = "/v2.0/ports",
}]
async fn ports_post(
    rqctx: RequestContext<Arc<ServerContext>>,
    body: TypedBody<PortCreateBody>,
) -> Result<HttpResponseCreated<PortResponse>, HttpError> {
    let apictx = rqctx.context();
    let params = body.into_inner().port;
    let port = apictx.ovn_north.port_create(&params).await?;
    Ok(HttpResponseCreated(PortResponse { port }))
}

/// Path parameters for port requests
#[derive(Deserialize, JsonSchema)]
struct PortPathParam {
    port_id: Uuid,
}

/// Fetch a port
#[endpoint {
    method = GET,
    path = "/v2.0/ports/{port_id}",
}]
async fn ports_get_port(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<PortPathParam>,
) -> Result<HttpResponseOk<PortResponse>, HttpError> {
    let apictx = rqctx.context();
    let port_id = path_params.into_inner().port_id;
    let port = apictx.ovn_north.port_get(port_id).await?;
    Ok(HttpResponseOk(PortResponse { port }))
}

/// Update a port
#[endpoint {
    method = PUT,
    path = "/v2.0/ports/{port_id}",
}]
async fn ports_put_port(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<PortPathParam>,
    body: TypedBody<PortUpdateBody>,
) -> Result<HttpResponseOk<PortResponse>, HttpError> {
    let apictx = rqctx.context();
    let port_id = path_params.into_inner().port_id;
    let params = body.into_inner().port;
    let port = apictx.ovn_north.port_update(port_id, &params).await?;
    Ok(HttpResponseOk(PortResponse { port }))
}

/// Delete a port
#[endpoint {
    method = DELETE,
    path = "/v2.0/ports/{port_id}",
}]
async fn ports_delete_port(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<PortPathParam>,
) -> Result<HttpResponseDeleted, HttpError> {
    let apictx = rqctx.context();
    let port_id = path_params.into_inner().port_id;
    apictx.ovn_north.port_delete(port_id).await?;
    Ok(HttpResponseDeleted())
}

/*
 * Routers
 */

/// Path parameters for router requests
#[derive(Deserialize, JsonSchema)]
struct RouterPathParam {
    router_id: Uuid,
}

/// Fetch a router
#[endpoint {
    method = GET,
    path = "/v2.0/routers/{router_id}",
}]
async fn routers_get_router(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<RouterPathParam>,
) -> Result<HttpResponseOk<RouterResponse>, HttpError> {
    let apictx = rqctx.context();
    let router_id = path_params.into_inner().router_id;
    let router = apictx.ovn_north.router_get(router_id).await?;
    Ok(HttpResponseOk(RouterResponse { router }))
}

/// Delete a router
#[endpoint {
    method = DELETE,
    path = "/v2.0/routers/{router_id}",
}]
async fn routers_delete_router(
    rqctx: RequestContext<Arc<ServerContext>>,
    path_params: Path<RouterPathParam>,
) -> Result<HttpResponseDeleted, HttpError> {
    let apictx = rqctx.context();
    let router_id = path_params.into_inner().router_id;
    apictx.ovn_north.router_delete(router_id).await?;
    Ok(HttpResponseDeleted())
}
