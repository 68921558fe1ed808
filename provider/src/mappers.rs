// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation between REST attributes and northbound rows
//!
//! REST-level resources do not exist as such in the northbound database.
//! They are folded into generic rows: a network's MTU lives in the switch's
//! attribute bag, a port's interface name and device identity live in the
//! port's attribute bag, a subnet is a DHCP options row, and a network's
//! connection to a physical network is a hidden port of type "localnet".
//! The mappers own every one of those encodings, in both directions, and
//! the composite types ([`Network`], [`NetworkPort`]) carry the extra rows a
//! single REST object is assembled from.
//!
//! Everything in this module is pure; the orchestration engine does the
//! reads and writes.

use crate::config::ConfigDhcp;
use crate::northbound::DhcpOptionsRow;
use crate::northbound::LogicalRouterRow;
use crate::northbound::LogicalSwitchPortRow;
use crate::northbound::LogicalSwitchRow;
use ovn_provider_common::api::FixedIp;
use ovn_provider_common::api::NetworkCreateParams;
use ovn_provider_common::api::NetworkView;
use ovn_provider_common::api::PortCreateParams;
use ovn_provider_common::api::PortView;
use ovn_provider_common::api::RouterView;
use ovn_provider_common::api::SubnetCreateParams;
use ovn_provider_common::api::SubnetView;
use std::collections::BTreeMap;

/// Port type marking the hidden port that models a physical network
/// connection
pub const LSP_TYPE_LOCALNET: &str = "localnet";
/// Option key on a localnet port naming the physical network
pub const LSP_OPTION_NETWORK_NAME: &str = "network_name";
/// Name given to every localnet port; at most one exists per switch
pub const LOCALNET_SWITCH_PORT_NAME: &str = "localnet_port";

/// A network as clients see it: the logical switch plus its localnet port,
/// if one exists.  The localnet port is an implementation detail of the
/// network and never appears in port listings.
#[derive(Clone, Debug)]
pub struct Network {
    pub ls: LogicalSwitchRow,
    pub localnet_lsp: Option<LogicalSwitchPortRow>,
}

impl Network {
    pub fn compose(ls: LogicalSwitchRow) -> Network {
        let localnet_lsp = ls
            .ports
            .iter()
            .find(|port| port.port_type == LSP_TYPE_LOCALNET)
            .cloned();
        Network { ls, localnet_lsp }
    }
}

/// A port as clients see it: the switch port itself, the switch that owns
/// it, and the DHCP options row its address assignment points at (if any).
/// The resolved row is the source of the fixed-IP subnet id, so a dangling
/// DHCP reference reads back as an address without a subnet.
#[derive(Clone, Debug)]
pub struct NetworkPort {
    pub lsp: LogicalSwitchPortRow,
    pub ls: LogicalSwitchRow,
    pub dhcp_options: Option<DhcpOptionsRow>,
}

pub struct NetworkMapper;

impl NetworkMapper {
    /// Attribute-bag key holding the network MTU
    pub const MTU: &'static str = "mtu";
    /// other_config key marking the CIDR of the network's subnet
    pub const SUBNET: &'static str = "subnet";

    pub const TYPE_VLAN: &'static str = "vlan";
    pub const TYPE_FLAT: &'static str = "flat";

    pub fn create_external_ids(
        params: &NetworkCreateParams,
    ) -> BTreeMap<String, String> {
        let mut external_ids = BTreeMap::new();
        if let Some(mtu) = params.mtu {
            external_ids.insert(Self::MTU.to_string(), mtu.to_string());
        }
        external_ids
    }

    pub fn to_view(network: &Network, tenant_id: &str) -> NetworkView {
        let ls = &network.ls;
        let mtu = ls
            .external_ids
            .get(Self::MTU)
            .and_then(|value| value.parse::<u32>().ok());
        let (network_type, physical_network, segmentation_id) =
            match &network.localnet_lsp {
                Some(lsp) => (
                    Some(
                        if lsp.tag.is_some() {
                            Self::TYPE_VLAN
                        } else {
                            Self::TYPE_FLAT
                        }
                        .to_string(),
                    ),
                    lsp.options.get(LSP_OPTION_NETWORK_NAME).cloned(),
                    lsp.tag,
                ),
                None => (None, None, None),
            };
        NetworkView {
            id: ls.id,
            name: ls.name.clone(),
            tenant_id: tenant_id.to_string(),
            mtu,
            provider_network_type: network_type,
            provider_physical_network: physical_network,
            provider_segmentation_id: segmentation_id,
        }
    }
}

pub struct SubnetMapper;

impl SubnetMapper {
    /// Attribute-bag key holding the subnet's display name
    pub const NAME: &'static str = "provider_name";
    /// Attribute-bag key holding the owning network's id
    pub const NETWORK_ID: &'static str = "provider_network_id";

    /*
     * DHCP option names, as the backend's DHCP implementation expects them.
     */
    pub const OPT_ROUTER: &'static str = "router";
    pub const OPT_SERVER_ID: &'static str = "server_id";
    pub const OPT_SERVER_MAC: &'static str = "server_mac";
    pub const OPT_LEASE_TIME: &'static str = "lease_time";
    pub const OPT_MTU: &'static str = "mtu";
    pub const OPT_DNS_SERVER: &'static str = "dns_server";

    pub fn create_external_ids(
        params: &SubnetCreateParams,
    ) -> BTreeMap<String, String> {
        let mut external_ids = BTreeMap::new();
        if let Some(name) = &params.name {
            external_ids.insert(Self::NAME.to_string(), name.clone());
        }
        external_ids.insert(
            Self::NETWORK_ID.to_string(),
            params.network_id.clone(),
        );
        external_ids
    }

    /// Derives the full DHCP options map for a new subnet.  The gateway
    /// address doubles as the DHCP server identity, and the advertised MTU
    /// is the owning network's MTU when the network has one configured.
    pub fn dhcp_options(
        params: &SubnetCreateParams,
        network_mtu: Option<&str>,
        dhcp: &ConfigDhcp,
    ) -> BTreeMap<String, String> {
        let mut options = BTreeMap::new();
        if let Some(gateway_ip) = &params.gateway_ip {
            options.insert(Self::OPT_ROUTER.to_string(), gateway_ip.clone());
            options
                .insert(Self::OPT_SERVER_ID.to_string(), gateway_ip.clone());
        }
        if let Some(dns_server) = params.dns_nameservers.first() {
            options
                .insert(Self::OPT_DNS_SERVER.to_string(), dns_server.clone());
        }
        options.insert(
            Self::OPT_LEASE_TIME.to_string(),
            dhcp.lease_time.to_string(),
        );
        options
            .insert(Self::OPT_SERVER_MAC.to_string(), dhcp.server_mac.clone());
        options.insert(
            Self::OPT_MTU.to_string(),
            network_mtu
                .map(str::to_string)
                .unwrap_or_else(|| dhcp.mtu.to_string()),
        );
        options
    }

    pub fn to_view(row: &DhcpOptionsRow, tenant_id: &str) -> SubnetView {
        SubnetView {
            id: row.id,
            name: row.external_ids.get(Self::NAME).cloned(),
            cidr: row.cidr.clone(),
            network_id: row
                .external_ids
                .get(Self::NETWORK_ID)
                .cloned()
                .unwrap_or_default(),
            tenant_id: tenant_id.to_string(),
            gateway_ip: row.options.get(Self::OPT_ROUTER).cloned(),
            dns_nameservers: row
                .options
                .get(Self::OPT_DNS_SERVER)
                .cloned()
                .into_iter()
                .collect(),
            enable_dhcp: true,
            ip_version: 4,
        }
    }
}

pub struct PortMapper;

impl PortMapper {
    /// Attribute-bag key holding the port's interface name
    pub const NIC_NAME: &'static str = "provider_nic_name";
    /// Attribute-bag key holding the id of the device using the port
    pub const DEVICE_ID: &'static str = "provider_device_id";
    /// Attribute-bag key holding the owner class of the device
    pub const DEVICE_OWNER: &'static str = "provider_device_owner";

    /// device_owner value marking a port attached to a router.  Such ports
    /// belong to the router's lifecycle and cannot be deleted directly.
    pub const DEVICE_OWNER_ROUTER: &'static str = "network:router_interface";

    pub fn create_external_ids(
        params: &PortCreateParams,
    ) -> BTreeMap<String, String> {
        let mut external_ids = BTreeMap::new();
        if let Some(device_id) = &params.device_id {
            external_ids
                .insert(Self::DEVICE_ID.to_string(), device_id.clone());
        }
        if let Some(name) = &params.name {
            external_ids.insert(Self::NIC_NAME.to_string(), name.clone());
        }
        if let Some(device_owner) = &params.device_owner {
            external_ids
                .insert(Self::DEVICE_OWNER.to_string(), device_owner.clone());
        }
        external_ids
    }

    /// A port is administratively up iff the backend has reported it up.
    /// The `enabled` column is our write-side request and never feeds back
    /// into this derivation; an unreported (`None`) state counts as down.
    pub fn admin_state_up(lsp: &LogicalSwitchPortRow) -> bool {
        lsp.up == Some(true)
    }

    pub fn is_router_owned(lsp: &LogicalSwitchPortRow) -> bool {
        lsp.external_ids.get(Self::DEVICE_OWNER).map(String::as_str)
            == Some(Self::DEVICE_OWNER_ROUTER)
    }

    /// Splits an addresses entry of the form `"<mac>"` or `"<mac> <ip>"`.
    fn mac_and_ip(lsp: &LogicalSwitchPortRow) -> (Option<String>, Option<String>) {
        match lsp.addresses.first() {
            Some(entry) => {
                let mut tokens = entry.split_whitespace();
                let mac = tokens.next().map(str::to_string);
                let ip = tokens.next().map(str::to_string);
                (mac, ip)
            }
            None => (None, None),
        }
    }

    pub fn to_view(port: &NetworkPort, tenant_id: &str) -> PortView {
        let lsp = &port.lsp;
        let (mac_address, ip_address) = Self::mac_and_ip(lsp);
        let fixed_ips = ip_address
            .map(|ip_address| {
                vec![FixedIp {
                    ip_address,
                    subnet_id: port.dhcp_options.as_ref().map(|row| row.id),
                }]
            })
            .unwrap_or_default();
        PortView {
            id: lsp.id,
            name: lsp
                .external_ids
                .get(Self::NIC_NAME)
                .cloned()
                .unwrap_or_default(),
            network_id: port.ls.id.to_string(),
            tenant_id: tenant_id.to_string(),
            mac_address,
            device_id: lsp.external_ids.get(Self::DEVICE_ID).cloned(),
            device_owner: lsp.external_ids.get(Self::DEVICE_OWNER).cloned(),
            admin_state_up: Self::admin_state_up(lsp),
            fixed_ips,
        }
    }
}

pub struct RouterMapper;

impl RouterMapper {
    pub fn to_view(row: &LogicalRouterRow, tenant_id: &str) -> RouterView {
        RouterView {
            id: row.id,
            name: row.name.clone(),
            tenant_id: tenant_id.to_string(),
        }
    }
}
