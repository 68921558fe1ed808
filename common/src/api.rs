// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST wire types for the provider's Neutron-style API
//!
//! Each resource comes as a trio: a view (what clients read), create params,
//! and update params.  Request and response bodies are wrapped the way
//! Neutron wraps them (`{"network": {...}}` for a single object,
//! `{"networks": [...]}` for a list), so every body type here has a thin
//! wrapper struct as well.
//!
//! These types are deliberately dumb.  Deriving fields from backend rows
//! (and the reverse) is the mappers' job in the provider crate.

use crate::error::Error;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/*
 * Result types returned by the orchestration engine.  These pass through the
 * HTTP layer unchanged, which keeps handler bodies to a few lines.
 */

pub type CreateResult<T> = Result<T, Error>;
pub type DeleteResult = Result<(), Error>;
pub type ListResult<T> = Result<Vec<T>, Error>;
pub type LookupResult<T> = Result<T, Error>;
pub type UpdateResult<T> = Result<T, Error>;

/// The type of a REST resource, used mostly for error messages
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum ResourceType {
    Network,
    Subnet,
    Port,
    Router,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResourceType::Network => "network",
                ResourceType::Subnet => "subnet",
                ResourceType::Port => "port",
                ResourceType::Router => "router",
            }
        )
    }
}

/*
 * Networks
 */

/// Client view of a network
///
/// The `provider:*` attributes only appear for networks connected to a
/// physical network; they are materialized from the network's localnet port.
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct NetworkView {
    pub id: Uuid,
    pub name: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(
        rename = "provider:network_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_network_type: Option<String>,
    #[serde(
        rename = "provider:physical_network",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_physical_network: Option<String>,
    #[serde(
        rename = "provider:segmentation_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider_segmentation_id: Option<u16>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct NetworkCreateParams {
    pub name: String,
    pub mtu: Option<u32>,
    #[serde(rename = "provider:network_type")]
    pub provider_network_type: Option<String>,
    #[serde(rename = "provider:physical_network")]
    pub provider_physical_network: Option<String>,
    #[serde(rename = "provider:segmentation_id")]
    pub provider_segmentation_id: Option<u16>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct NetworkUpdateParams {
    pub name: Option<String>,
    pub mtu: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct NetworkResponse {
    pub network: NetworkView,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct NetworkListResponse {
    pub networks: Vec<NetworkView>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct NetworkCreateBody {
    pub network: NetworkCreateParams,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct NetworkUpdateBody {
    pub network: NetworkUpdateParams,
}

/*
 * Subnets
 */

/// Client view of a subnet
///
/// Only IPv4 DHCP-backed subnets exist in this provider, so `ip_version` is
/// always 4 and `enable_dhcp` is always true.
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct SubnetView {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub cidr: String,
    /// id of the owning network, recovered from the row's attribute bag
    pub network_id: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_ip: Option<String>,
    pub dns_nameservers: Vec<String>,
    pub enable_dhcp: bool,
    pub ip_version: u8,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct SubnetCreateParams {
    pub name: Option<String>,
    pub cidr: String,
    #[serde(default)]
    pub network_id: String,
    pub gateway_ip: Option<String>,
    #[serde(default)]
    pub dns_nameservers: Vec<String>,
    pub enable_dhcp: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct SubnetUpdateParams {
    pub name: Option<String>,
    pub cidr: Option<String>,
    pub gateway_ip: Option<String>,
    pub dns_nameservers: Option<Vec<String>>,
    pub lease_time: Option<u32>,
    pub server_mac: Option<String>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct SubnetResponse {
    pub subnet: SubnetView,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct SubnetListResponse {
    pub subnets: Vec<SubnetView>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct SubnetCreateBody {
    pub subnet: SubnetCreateParams,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct SubnetUpdateBody {
    pub subnet: SubnetUpdateParams,
}

/*
 * Ports
 */

/// An IP address assigned to a port, with the subnet it was drawn from
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct FixedIp {
    pub ip_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<Uuid>,
}

/// Client view of a port
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct PortView {
    pub id: Uuid,
    pub name: String,
    pub network_id: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_owner: Option<String>,
    /// true iff the backend has reported the port up
    pub admin_state_up: bool,
    pub fixed_ips: Vec<FixedIp>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct PortCreateParams {
    pub name: Option<String>,
    pub network_id: String,
    pub mac_address: Option<String>,
    pub device_id: Option<String>,
    pub device_owner: Option<String>,
    pub admin_state_up: Option<bool>,
    #[serde(default)]
    pub fixed_ips: Vec<FixedIp>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct PortUpdateParams {
    pub name: Option<String>,
    pub mac_address: Option<String>,
    pub device_id: Option<String>,
    pub device_owner: Option<String>,
    pub admin_state_up: Option<bool>,
    pub fixed_ips: Option<Vec<FixedIp>>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct PortResponse {
    pub port: PortView,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct PortListResponse {
    pub ports: Vec<PortView>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct PortCreateBody {
    pub port: PortCreateParams,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct PortUpdateBody {
    pub port: PortUpdateParams,
}

/*
 * Routers
 */

/// Client view of a router
///
/// Routers are created by a separate management path; this API only reads
/// and deletes them.
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct RouterView {
    pub id: Uuid,
    pub name: String,
    pub tenant_id: String,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct RouterResponse {
    pub router: RouterView,
}

#[cfg(test)]
mod test {
    use super::NetworkCreateBody;
    use super::NetworkView;
    use uuid::Uuid;

    /*
     * The "provider:" prefixes cannot be expressed as Rust field names, so
     * make sure the renames hold on both ends of the wire.
     */
    #[test]
    fn test_provider_attribute_names() {
        let body = r#"{
            "network": {
                "name": "phys0",
                "provider:network_type": "vlan",
                "provider:physical_network": "datacenter",
                "provider:segmentation_id": 17
            }
        }"#;
        let parsed: NetworkCreateBody = serde_json::from_str(body).unwrap();
        let network = parsed.network;
        assert_eq!(network.name, "phys0");
        assert_eq!(network.provider_network_type.as_deref(), Some("vlan"));
        assert_eq!(
            network.provider_physical_network.as_deref(),
            Some("datacenter")
        );
        assert_eq!(network.provider_segmentation_id, Some(17));

        let view = NetworkView {
            id: Uuid::nil(),
            name: "phys0".to_string(),
            tenant_id: "tenant".to_string(),
            mtu: None,
            provider_network_type: Some("vlan".to_string()),
            provider_physical_network: Some("datacenter".to_string()),
            provider_segmentation_id: Some(17),
        };
        let serialized = serde_json::to_string(&view).unwrap();
        assert!(serialized.contains("\"provider:network_type\""));
        assert!(serialized.contains("\"provider:segmentation_id\":17"));
        /* absent optional fields must not appear at all */
        assert!(!serialized.contains("mtu"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        /* Neutron clients send plenty of attributes this provider ignores. */
        let body = r#"{
            "network": {
                "name": "net1",
                "shared": false,
                "port_security_enabled": true
            }
        }"#;
        let parsed: NetworkCreateBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.network.name, "net1");
    }
}
