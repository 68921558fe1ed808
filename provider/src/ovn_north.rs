// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orchestration engine translating REST operations into northbound commands
//!
//! `OvnNorth` is the only stateful component of the provider.  Each REST
//! operation becomes a short sequence of commands against the northbound
//! database, with the referential invariants checked up front:
//!
//! * a network has at most one subnet
//! * subnets are always DHCP-backed (`enable_dhcp = false` is rejected)
//! * a port attached to a router cannot be deleted through the port API
//! * a router that still has ports cannot be deleted
//!
//! The commands of a multi-command operation are independent.  There is no
//! transaction and no rollback: if a command in the middle of a sequence
//! fails, the error is returned and the earlier commands remain applied.
//! A mutex serializes mutating operations so at most one such sequence is
//! in flight at a time.

use crate::config::ConfigDhcp;
use crate::mappers::Network;
use crate::mappers::NetworkMapper;
use crate::mappers::NetworkPort;
use crate::mappers::PortMapper;
use crate::mappers::RouterMapper;
use crate::mappers::SubnetMapper;
use crate::mappers::LOCALNET_SWITCH_PORT_NAME;
use crate::mappers::LSP_OPTION_NETWORK_NAME;
use crate::mappers::LSP_TYPE_LOCALNET;
use crate::northbound::ColumnValue;
use crate::northbound::DhcpOptionsRow;
use crate::northbound::LogicalSwitchPortRow;
use crate::northbound::LogicalSwitchRow;
use crate::northbound::NbTable;
use crate::northbound::NorthboundApi;
use futures::lock::Mutex;
use ovn_provider_common::api::CreateResult;
use ovn_provider_common::api::DeleteResult;
use ovn_provider_common::api::ListResult;
use ovn_provider_common::api::LookupResult;
use ovn_provider_common::api::NetworkCreateParams;
use ovn_provider_common::api::NetworkUpdateParams;
use ovn_provider_common::api::NetworkView;
use ovn_provider_common::api::PortCreateParams;
use ovn_provider_common::api::PortUpdateParams;
use ovn_provider_common::api::PortView;
use ovn_provider_common::api::RouterView;
use ovn_provider_common::api::SubnetCreateParams;
use ovn_provider_common::api::SubnetUpdateParams;
use ovn_provider_common::api::SubnetView;
use ovn_provider_common::api::UpdateResult;
use ovn_provider_common::Error;
use slog::info;
use slog::Logger;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct OvnNorth {
    log: Logger,
    nb: Arc<dyn NorthboundApi>,
    dhcp: ConfigDhcp,
    tenant_id: String,
    /// held across the command sequence of every mutating operation
    mutation_lock: Mutex<()>,
}

impl OvnNorth {
    pub fn new(
        nb: Arc<dyn NorthboundApi>,
        dhcp: ConfigDhcp,
        tenant_id: String,
        log: Logger,
    ) -> OvnNorth {
        OvnNorth { log, nb, dhcp, tenant_id, mutation_lock: Mutex::new(()) }
    }

    /*
     * Networks
     */

    pub async fn networks_list(&self) -> ListResult<NetworkView> {
        let switches = self.nb.ls_list().await?;
        Ok(switches
            .into_iter()
            .map(|ls| {
                NetworkMapper::to_view(&Network::compose(ls), &self.tenant_id)
            })
            .collect())
    }

    pub async fn network_get(
        &self,
        network_id: Uuid,
    ) -> LookupResult<NetworkView> {
        self.network_view(network_id).await
    }

    pub async fn network_create(
        &self,
        params: &NetworkCreateParams,
    ) -> CreateResult<NetworkView> {
        let _lock = self.mutation_lock.lock().await;
        let external_ids = NetworkMapper::create_external_ids(params);
        let ls = self.nb.ls_add(&params.name, external_ids).await?;
        info!(self.log, "created network";
            "network_id" => ls.id.to_string(),
            "name" => &params.name);

        /*
         * A network connected to a physical network gets a hidden localnet
         * port carrying the connection details.
         */
        if let Some(physical_network) = &params.provider_physical_network {
            let lsp =
                self.nb.lsp_add(ls.id, LOCALNET_SWITCH_PORT_NAME).await?;
            let mut options = BTreeMap::new();
            options.insert(
                LSP_OPTION_NETWORK_NAME.to_string(),
                physical_network.clone(),
            );
            self.nb
                .db_set(
                    NbTable::LogicalSwitchPort,
                    lsp.id,
                    vec![
                        ColumnValue::PortType(LSP_TYPE_LOCALNET.to_string()),
                        ColumnValue::Options(options),
                    ],
                )
                .await?;
            if let Some(tag) = params.provider_segmentation_id {
                self.nb
                    .db_set(
                        NbTable::LogicalSwitchPort,
                        lsp.id,
                        vec![ColumnValue::Tag(tag)],
                    )
                    .await?;
            }
            info!(self.log, "attached network to physical network";
                "network_id" => ls.id.to_string(),
                "physical_network" => physical_network.clone());
        }

        self.network_view(ls.id).await
    }

    pub async fn network_update(
        &self,
        network_id: Uuid,
        params: &NetworkUpdateParams,
    ) -> UpdateResult<NetworkView> {
        let _lock = self.mutation_lock.lock().await;
        let mut values = Vec::new();
        if let Some(name) = &params.name {
            values.push(ColumnValue::Name(name.clone()));
        }
        if let Some(mtu) = params.mtu {
            let mut external_ids = BTreeMap::new();
            external_ids
                .insert(NetworkMapper::MTU.to_string(), mtu.to_string());
            values.push(ColumnValue::ExternalIds(external_ids));
        }
        if !values.is_empty() {
            self.nb
                .db_set(NbTable::LogicalSwitch, network_id, values)
                .await?;
        }

        /*
         * The subnet advertises the network MTU through its DHCP options, so
         * an MTU change must be mirrored there.
         */
        if let Some(mtu) = params.mtu {
            if let Some(subnet) = self.subnet_for_network(network_id).await? {
                let mut options = BTreeMap::new();
                options.insert(
                    SubnetMapper::OPT_MTU.to_string(),
                    mtu.to_string(),
                );
                self.nb
                    .db_set(
                        NbTable::DhcpOptions,
                        subnet.id,
                        vec![ColumnValue::Options(options)],
                    )
                    .await?;
                info!(self.log, "mirrored mtu update to subnet";
                    "network_id" => network_id.to_string(),
                    "subnet_id" => subnet.id.to_string(),
                    "mtu" => mtu);
            }
        }

        self.network_view(network_id).await
    }

    pub async fn network_delete(&self, network_id: Uuid) -> DeleteResult {
        let _lock = self.mutation_lock.lock().await;
        let ls = self.nb.ls_get(network_id).await?;
        if let Some(subnet) = self.subnet_for_network(network_id).await? {
            self.nb.dhcp_options_del(subnet.id).await?;
        }
        self.nb.ls_del(ls.id).await?;
        info!(self.log, "deleted network";
            "network_id" => network_id.to_string());
        Ok(())
    }

    async fn network_view(
        &self,
        network_id: Uuid,
    ) -> LookupResult<NetworkView> {
        let ls = self.nb.ls_get(network_id).await?;
        Ok(NetworkMapper::to_view(&Network::compose(ls), &self.tenant_id))
    }

    /*
     * Subnets
     */

    pub async fn subnets_list(&self) -> ListResult<SubnetView> {
        let rows = self.nb.dhcp_options_list().await?;
        Ok(rows
            .iter()
            .map(|row| SubnetMapper::to_view(row, &self.tenant_id))
            .collect())
    }

    pub async fn subnet_get(
        &self,
        subnet_id: Uuid,
    ) -> LookupResult<SubnetView> {
        let row = self.nb.dhcp_options_get(subnet_id).await?;
        Ok(SubnetMapper::to_view(&row, &self.tenant_id))
    }

    pub async fn subnet_create(
        &self,
        params: &SubnetCreateParams,
    ) -> CreateResult<SubnetView> {
        if params.enable_dhcp == Some(false) {
            return Err(Error::unsupported_value(
                "enable_dhcp",
                "subnets are always DHCP-backed",
            ));
        }

        let _lock = self.mutation_lock.lock().await;
        if params.network_id.is_empty() {
            return Err(Error::subnet_config(
                "cannot create a subnet without a network_id",
            ));
        }
        let network_id =
            Uuid::parse_str(&params.network_id).map_err(|_| {
                Error::subnet_config(&format!(
                    "invalid network_id \"{}\"",
                    params.network_id
                ))
            })?;
        let ls = match self.nb.ls_get(network_id).await {
            Ok(ls) => ls,
            Err(Error::ObjectNotFound { .. }) => {
                return Err(Error::subnet_config(&format!(
                    "network \"{}\" does not exist",
                    params.network_id
                )));
            }
            Err(error) => return Err(error),
        };
        if self.subnet_for_network(network_id).await?.is_some() {
            return Err(Error::subnet_config(&format!(
                "network \"{}\" already has a subnet",
                params.network_id
            )));
        }

        let mut other_config = BTreeMap::new();
        other_config
            .insert(NetworkMapper::SUBNET.to_string(), params.cidr.clone());
        self.nb
            .db_set(
                NbTable::LogicalSwitch,
                network_id,
                vec![ColumnValue::OtherConfig(other_config)],
            )
            .await?;

        let row = self
            .nb
            .dhcp_options_add(
                &params.cidr,
                SubnetMapper::create_external_ids(params),
            )
            .await?;
        let options = SubnetMapper::dhcp_options(
            params,
            ls.external_ids.get(NetworkMapper::MTU).map(String::as_str),
            &self.dhcp,
        );
        self.nb.dhcp_options_set_options(row.id, options).await?;
        info!(self.log, "created subnet";
            "subnet_id" => row.id.to_string(),
            "network_id" => network_id.to_string(),
            "cidr" => &params.cidr);

        let row = self.nb.dhcp_options_get(row.id).await?;
        Ok(SubnetMapper::to_view(&row, &self.tenant_id))
    }

    pub async fn subnet_update(
        &self,
        subnet_id: Uuid,
        params: &SubnetUpdateParams,
    ) -> UpdateResult<SubnetView> {
        let _lock = self.mutation_lock.lock().await;
        self.nb.dhcp_options_get(subnet_id).await?;

        let mut values = Vec::new();
        if let Some(name) = &params.name {
            let mut external_ids = BTreeMap::new();
            external_ids.insert(SubnetMapper::NAME.to_string(), name.clone());
            values.push(ColumnValue::ExternalIds(external_ids));
        }
        if let Some(cidr) = &params.cidr {
            values.push(ColumnValue::Cidr(cidr.clone()));
        }
        let mut options = BTreeMap::new();
        if let Some(gateway_ip) = &params.gateway_ip {
            options.insert(
                SubnetMapper::OPT_ROUTER.to_string(),
                gateway_ip.clone(),
            );
            options.insert(
                SubnetMapper::OPT_SERVER_ID.to_string(),
                gateway_ip.clone(),
            );
        }
        if let Some(dns_nameservers) = &params.dns_nameservers {
            if let Some(dns_server) = dns_nameservers.first() {
                options.insert(
                    SubnetMapper::OPT_DNS_SERVER.to_string(),
                    dns_server.clone(),
                );
            }
        }
        if let Some(lease_time) = params.lease_time {
            options.insert(
                SubnetMapper::OPT_LEASE_TIME.to_string(),
                lease_time.to_string(),
            );
        }
        if let Some(server_mac) = &params.server_mac {
            options.insert(
                SubnetMapper::OPT_SERVER_MAC.to_string(),
                server_mac.clone(),
            );
        }
        if !options.is_empty() {
            values.push(ColumnValue::Options(options));
        }
        if !values.is_empty() {
            self.nb
                .db_set(NbTable::DhcpOptions, subnet_id, values)
                .await?;
            info!(self.log, "updated subnet";
                "subnet_id" => subnet_id.to_string());
        }

        let row = self.nb.dhcp_options_get(subnet_id).await?;
        Ok(SubnetMapper::to_view(&row, &self.tenant_id))
    }

    pub async fn subnet_delete(&self, subnet_id: Uuid) -> DeleteResult {
        let _lock = self.mutation_lock.lock().await;
        let row = self.nb.dhcp_options_get(subnet_id).await?;
        self.nb.dhcp_options_del(row.id).await?;
        info!(self.log, "deleted subnet";
            "subnet_id" => subnet_id.to_string());
        Ok(())
    }

    async fn subnet_for_network(
        &self,
        network_id: Uuid,
    ) -> Result<Option<DhcpOptionsRow>, Error> {
        let network_id = network_id.to_string();
        let rows = self.nb.dhcp_options_list().await?;
        Ok(rows.into_iter().find(|row| {
            row.external_ids.get(SubnetMapper::NETWORK_ID)
                == Some(&network_id)
        }))
    }

    /*
     * Ports
     */

    pub async fn ports_list(&self) -> ListResult<PortView> {
        let ports = self.nb.lsp_list().await?;
        let switches = self.nb.ls_list().await?;
        let dhcp_rows = self.nb.dhcp_options_list().await?;
        let mut views = Vec::new();
        for lsp in ports {
            /* localnet ports model physical networks, not client ports */
            if lsp.port_type == LSP_TYPE_LOCALNET {
                continue;
            }
            let view = self.compose_port(lsp, &switches, &dhcp_rows)?;
            views.push(view);
        }
        Ok(views)
    }

    pub async fn port_get(&self, port_id: Uuid) -> LookupResult<PortView> {
        let lsp = self.nb.lsp_get(port_id).await?;
        self.port_view(lsp).await
    }

    pub async fn port_create(
        &self,
        params: &PortCreateParams,
    ) -> CreateResult<PortView> {
        let _lock = self.mutation_lock.lock().await;
        let network_id =
            Uuid::parse_str(&params.network_id).map_err(|_| {
                Error::invalid_request(&format!(
                    "invalid network_id \"{}\"",
                    params.network_id
                ))
            })?;
        self.nb.ls_get(network_id).await?;

        let name = params.name.clone().unwrap_or_default();
        let lsp = self.nb.lsp_add(network_id, &name).await?;

        /*
         * The backend knows the port by its row id; the requested name only
         * survives in the attribute bag.
         */
        self.nb
            .db_set(
                NbTable::LogicalSwitchPort,
                lsp.id,
                vec![ColumnValue::Name(lsp.id.to_string())],
            )
            .await?;

        let mut values = Vec::new();
        let external_ids = PortMapper::create_external_ids(params);
        if !external_ids.is_empty() {
            values.push(ColumnValue::ExternalIds(external_ids));
        }
        values.push(ColumnValue::Enabled(
            params.admin_state_up.unwrap_or(true),
        ));
        self.nb
            .db_set(NbTable::LogicalSwitchPort, lsp.id, values)
            .await?;

        if let Some(mac_address) = &params.mac_address {
            let mut values = Vec::new();
            let address = match params.fixed_ips.first() {
                Some(fixed_ip) => {
                    if let Some(subnet) =
                        self.subnet_for_network(network_id).await?
                    {
                        values.push(ColumnValue::Dhcpv4Options(subnet.id));
                    }
                    format!("{} {}", mac_address, fixed_ip.ip_address)
                }
                None => mac_address.clone(),
            };
            values.push(ColumnValue::Addresses(vec![address]));
            self.nb
                .db_set(NbTable::LogicalSwitchPort, lsp.id, values)
                .await?;
        }

        info!(self.log, "created port";
            "port_id" => lsp.id.to_string(),
            "network_id" => network_id.to_string());

        let lsp = self.nb.lsp_get(lsp.id).await?;
        self.port_view(lsp).await
    }

    pub async fn port_update(
        &self,
        port_id: Uuid,
        params: &PortUpdateParams,
    ) -> UpdateResult<PortView> {
        let _lock = self.mutation_lock.lock().await;
        self.nb.lsp_get(port_id).await?;

        let mut values = Vec::new();
        let mut external_ids = BTreeMap::new();
        if let Some(name) = &params.name {
            external_ids
                .insert(PortMapper::NIC_NAME.to_string(), name.clone());
        }
        if let Some(device_id) = &params.device_id {
            external_ids
                .insert(PortMapper::DEVICE_ID.to_string(), device_id.clone());
        }
        if let Some(device_owner) = &params.device_owner {
            external_ids.insert(
                PortMapper::DEVICE_OWNER.to_string(),
                device_owner.clone(),
            );
        }
        if !external_ids.is_empty() {
            values.push(ColumnValue::ExternalIds(external_ids));
        }
        if let Some(admin_state_up) = params.admin_state_up {
            values.push(ColumnValue::Enabled(admin_state_up));
        }
        if !values.is_empty() {
            self.nb
                .db_set(NbTable::LogicalSwitchPort, port_id, values)
                .await?;
        }

        if let Some(mac_address) = &params.mac_address {
            let mut values = Vec::new();
            let fixed_ip =
                params.fixed_ips.as_ref().and_then(|ips| ips.first());
            let address = match fixed_ip {
                Some(fixed_ip) => {
                    let ls = self.owning_switch(port_id).await?;
                    if let Some(subnet) =
                        self.subnet_for_network(ls.id).await?
                    {
                        values.push(ColumnValue::Dhcpv4Options(subnet.id));
                    }
                    format!("{} {}", mac_address, fixed_ip.ip_address)
                }
                None => mac_address.clone(),
            };
            values.push(ColumnValue::Addresses(vec![address]));
            self.nb
                .db_set(NbTable::LogicalSwitchPort, port_id, values)
                .await?;
        }

        info!(self.log, "updated port"; "port_id" => port_id.to_string());

        let lsp = self.nb.lsp_get(port_id).await?;
        self.port_view(lsp).await
    }

    pub async fn port_delete(&self, port_id: Uuid) -> DeleteResult {
        let _lock = self.mutation_lock.lock().await;
        let lsp = self.nb.lsp_get(port_id).await?;
        if PortMapper::is_router_owned(&lsp) {
            return Err(Error::conflict(&format!(
                "port \"{}\" belongs to a router interface \
                 and cannot be deleted directly",
                port_id
            )));
        }
        self.nb.lsp_del(port_id).await?;
        info!(self.log, "deleted port"; "port_id" => port_id.to_string());
        Ok(())
    }

    async fn port_view(
        &self,
        lsp: LogicalSwitchPortRow,
    ) -> LookupResult<PortView> {
        let switches = self.nb.ls_list().await?;
        let dhcp_rows = self.nb.dhcp_options_list().await?;
        self.compose_port(lsp, &switches, &dhcp_rows)
    }

    fn compose_port(
        &self,
        lsp: LogicalSwitchPortRow,
        switches: &[LogicalSwitchRow],
        dhcp_rows: &[DhcpOptionsRow],
    ) -> LookupResult<PortView> {
        let ls = switches
            .iter()
            .find(|ls| ls.ports.iter().any(|port| port.id == lsp.id))
            .cloned()
            .ok_or_else(|| {
                Error::internal_error(&format!(
                    "port \"{}\" has no owning network",
                    lsp.id
                ))
            })?;
        let dhcp_options = lsp.dhcpv4_options.and_then(|subnet_id| {
            dhcp_rows.iter().find(|row| row.id == subnet_id).cloned()
        });
        Ok(PortMapper::to_view(
            &NetworkPort { lsp, ls, dhcp_options },
            &self.tenant_id,
        ))
    }

    async fn owning_switch(
        &self,
        port_id: Uuid,
    ) -> LookupResult<LogicalSwitchRow> {
        let switches = self.nb.ls_list().await?;
        switches
            .into_iter()
            .find(|ls| ls.ports.iter().any(|port| port.id == port_id))
            .ok_or_else(|| {
                Error::internal_error(&format!(
                    "port \"{}\" has no owning network",
                    port_id
                ))
            })
    }

    /*
     * Routers
     */

    pub async fn router_get(
        &self,
        router_id: Uuid,
    ) -> LookupResult<RouterView> {
        let row = self.nb.lr_lookup(router_id).await?;
        Ok(RouterMapper::to_view(&row, &self.tenant_id))
    }

    pub async fn router_delete(&self, router_id: Uuid) -> DeleteResult {
        let _lock = self.mutation_lock.lock().await;
        let router = self.nb.lr_lookup(router_id).await?;
        if !router.ports.is_empty() {
            return Err(Error::conflict(&format!(
                "router \"{}\" still has ports attached",
                router_id
            )));
        }
        self.nb.lr_del(router_id).await?;
        info!(self.log, "deleted router";
            "router_id" => router_id.to_string());
        Ok(())
    }
}
