// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory simulated northbound database
//!
//! This is the backend the server runs against until a real OVSDB transport
//! lands, and the backend the test suite runs against always.  It applies
//! commands to plain in-memory tables and records every mutating command so
//! tests can assert on exactly what an operation issued.

use super::ColumnValue;
use super::DhcpOptionsRow;
use super::LogicalRouterRow;
use super::LogicalSwitchPortRow;
use super::LogicalSwitchRow;
use super::NbCommand;
use super::NbTable;
use super::NorthboundApi;
use async_trait::async_trait;
use futures::lock::Mutex;
use ovn_provider_common::api::ResourceType;
use ovn_provider_common::Error;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Switch rows store member ports by id; the full rows are materialized on
/// read so that callers see the same shape a live row cache would give them.
#[derive(Clone, Debug)]
struct SimSwitch {
    id: Uuid,
    name: String,
    external_ids: BTreeMap<String, String>,
    other_config: BTreeMap<String, String>,
    port_ids: Vec<Uuid>,
}

#[derive(Default)]
struct SimState {
    switches: BTreeMap<Uuid, SimSwitch>,
    ports: BTreeMap<Uuid, LogicalSwitchPortRow>,
    dhcp_options: BTreeMap<Uuid, DhcpOptionsRow>,
    routers: BTreeMap<Uuid, LogicalRouterRow>,
    commands: Vec<NbCommand>,
}

pub struct SimNorthbound {
    state: Mutex<SimState>,
}

impl SimNorthbound {
    pub fn new() -> SimNorthbound {
        SimNorthbound { state: Mutex::new(SimState::default()) }
    }

    /// Returns every mutating command issued so far, in order.
    pub async fn recorded_commands(&self) -> Vec<NbCommand> {
        self.state.lock().await.commands.clone()
    }

    pub async fn clear_recorded_commands(&self) {
        self.state.lock().await.commands.clear();
    }

    /// Seeds a router row directly.  Routers are created by a separate
    /// management path, so tests insert them here rather than through the
    /// provider API.
    pub async fn router_insert(&self, row: LogicalRouterRow) {
        self.state.lock().await.routers.insert(row.id, row);
    }

    /// Overrides the backend-reported `up` column of a port.
    pub async fn port_set_up(&self, port_id: Uuid, up: Option<bool>) {
        let mut state = self.state.lock().await;
        state.ports.get_mut(&port_id).expect("no such port").up = up;
    }

    /// Overrides the `enabled` column of a port.
    pub async fn port_set_enabled(&self, port_id: Uuid, enabled: Option<bool>) {
        let mut state = self.state.lock().await;
        state.ports.get_mut(&port_id).expect("no such port").enabled = enabled;
    }
}

impl Default for SimNorthbound {
    fn default() -> Self {
        SimNorthbound::new()
    }
}

impl SimState {
    fn switch_row(&self, switch: &SimSwitch) -> LogicalSwitchRow {
        LogicalSwitchRow {
            id: switch.id,
            name: switch.name.clone(),
            external_ids: switch.external_ids.clone(),
            other_config: switch.other_config.clone(),
            ports: switch
                .port_ids
                .iter()
                .filter_map(|port_id| self.ports.get(port_id).cloned())
                .collect(),
        }
    }
}

fn not_found(table: NbTable, row_id: Uuid) -> Error {
    let type_name = match table {
        NbTable::LogicalSwitch => ResourceType::Network,
        NbTable::LogicalSwitchPort => ResourceType::Port,
        NbTable::DhcpOptions => ResourceType::Subnet,
        NbTable::LogicalRouter => ResourceType::Router,
    };
    Error::not_found_by_id(type_name, &row_id)
}

fn merge(
    target: &mut BTreeMap<String, String>,
    update: &BTreeMap<String, String>,
) {
    for (key, value) in update {
        target.insert(key.clone(), value.clone());
    }
}

fn bad_column(table: NbTable, value: &ColumnValue) -> Error {
    Error::internal_error(&format!(
        "table {} has no column for value {:?}",
        table, value
    ))
}

#[async_trait]
impl NorthboundApi for SimNorthbound {
    async fn ls_list(&self) -> Result<Vec<LogicalSwitchRow>, Error> {
        let state = self.state.lock().await;
        Ok(state.switches.values().map(|s| state.switch_row(s)).collect())
    }

    async fn ls_get(
        &self,
        switch_id: Uuid,
    ) -> Result<LogicalSwitchRow, Error> {
        let state = self.state.lock().await;
        state
            .switches
            .get(&switch_id)
            .map(|s| state.switch_row(s))
            .ok_or_else(|| not_found(NbTable::LogicalSwitch, switch_id))
    }

    async fn ls_add(
        &self,
        name: &str,
        external_ids: BTreeMap<String, String>,
    ) -> Result<LogicalSwitchRow, Error> {
        let mut state = self.state.lock().await;
        let switch = SimSwitch {
            id: Uuid::new_v4(),
            name: name.to_string(),
            external_ids: external_ids.clone(),
            other_config: BTreeMap::new(),
            port_ids: Vec::new(),
        };
        let row = state.switch_row(&switch);
        state.commands.push(NbCommand::LsAdd {
            name: name.to_string(),
            external_ids,
        });
        state.switches.insert(switch.id, switch);
        Ok(row)
    }

    async fn ls_del(&self, switch_id: Uuid) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        let switch = state
            .switches
            .remove(&switch_id)
            .ok_or_else(|| not_found(NbTable::LogicalSwitch, switch_id))?;
        for port_id in &switch.port_ids {
            state.ports.remove(port_id);
        }
        state.commands.push(NbCommand::LsDel { switch_id });
        Ok(())
    }

    async fn lsp_list(&self) -> Result<Vec<LogicalSwitchPortRow>, Error> {
        let state = self.state.lock().await;
        Ok(state.ports.values().cloned().collect())
    }

    async fn lsp_get(
        &self,
        port_id: Uuid,
    ) -> Result<LogicalSwitchPortRow, Error> {
        let state = self.state.lock().await;
        state
            .ports
            .get(&port_id)
            .cloned()
            .ok_or_else(|| not_found(NbTable::LogicalSwitchPort, port_id))
    }

    async fn lsp_add(
        &self,
        switch_id: Uuid,
        name: &str,
    ) -> Result<LogicalSwitchPortRow, Error> {
        let mut state = self.state.lock().await;
        let row = LogicalSwitchPortRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            addresses: Vec::new(),
            external_ids: BTreeMap::new(),
            options: BTreeMap::new(),
            port_type: String::new(),
            tag: None,
            enabled: None,
            up: None,
            dhcpv4_options: None,
        };
        let switch = state
            .switches
            .get_mut(&switch_id)
            .ok_or_else(|| not_found(NbTable::LogicalSwitch, switch_id))?;
        switch.port_ids.push(row.id);
        state.commands.push(NbCommand::LspAdd {
            switch_id,
            name: name.to_string(),
        });
        state.ports.insert(row.id, row.clone());
        Ok(row)
    }

    async fn lsp_del(&self, port_id: Uuid) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state
            .ports
            .remove(&port_id)
            .ok_or_else(|| not_found(NbTable::LogicalSwitchPort, port_id))?;
        for switch in state.switches.values_mut() {
            switch.port_ids.retain(|id| *id != port_id);
        }
        state.commands.push(NbCommand::LspDel { port_id });
        Ok(())
    }

    async fn dhcp_options_list(&self) -> Result<Vec<DhcpOptionsRow>, Error> {
        let state = self.state.lock().await;
        Ok(state.dhcp_options.values().cloned().collect())
    }

    async fn dhcp_options_get(
        &self,
        row_id: Uuid,
    ) -> Result<DhcpOptionsRow, Error> {
        let state = self.state.lock().await;
        state
            .dhcp_options
            .get(&row_id)
            .cloned()
            .ok_or_else(|| not_found(NbTable::DhcpOptions, row_id))
    }

    async fn dhcp_options_add(
        &self,
        cidr: &str,
        external_ids: BTreeMap<String, String>,
    ) -> Result<DhcpOptionsRow, Error> {
        let mut state = self.state.lock().await;
        let row = DhcpOptionsRow {
            id: Uuid::new_v4(),
            cidr: cidr.to_string(),
            external_ids: external_ids.clone(),
            options: BTreeMap::new(),
        };
        state.commands.push(NbCommand::DhcpOptionsAdd {
            cidr: cidr.to_string(),
            external_ids,
        });
        state.dhcp_options.insert(row.id, row.clone());
        Ok(row)
    }

    async fn dhcp_options_set_options(
        &self,
        row_id: Uuid,
        options: BTreeMap<String, String>,
    ) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        let row = state
            .dhcp_options
            .get_mut(&row_id)
            .ok_or_else(|| not_found(NbTable::DhcpOptions, row_id))?;
        row.options = options.clone();
        state
            .commands
            .push(NbCommand::DhcpOptionsSetOptions { row_id, options });
        Ok(())
    }

    async fn dhcp_options_del(&self, row_id: Uuid) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state
            .dhcp_options
            .remove(&row_id)
            .ok_or_else(|| not_found(NbTable::DhcpOptions, row_id))?;
        state.commands.push(NbCommand::DhcpOptionsDel { row_id });
        Ok(())
    }

    async fn lr_lookup(
        &self,
        router_id: Uuid,
    ) -> Result<LogicalRouterRow, Error> {
        let state = self.state.lock().await;
        state
            .routers
            .get(&router_id)
            .cloned()
            .ok_or_else(|| not_found(NbTable::LogicalRouter, router_id))
    }

    async fn lr_del(&self, router_id: Uuid) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state
            .routers
            .remove(&router_id)
            .ok_or_else(|| not_found(NbTable::LogicalRouter, router_id))?;
        state.commands.push(NbCommand::LrDel { router_id });
        Ok(())
    }

    async fn db_set(
        &self,
        table: NbTable,
        row_id: Uuid,
        values: Vec<ColumnValue>,
    ) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        match table {
            NbTable::LogicalSwitch => {
                let switch = state
                    .switches
                    .get_mut(&row_id)
                    .ok_or_else(|| not_found(table, row_id))?;
                for value in &values {
                    match value {
                        ColumnValue::Name(name) => {
                            switch.name = name.clone();
                        }
                        ColumnValue::ExternalIds(update) => {
                            merge(&mut switch.external_ids, update);
                        }
                        ColumnValue::OtherConfig(update) => {
                            merge(&mut switch.other_config, update);
                        }
                        other => return Err(bad_column(table, other)),
                    }
                }
            }
            NbTable::LogicalSwitchPort => {
                let port = state
                    .ports
                    .get_mut(&row_id)
                    .ok_or_else(|| not_found(table, row_id))?;
                for value in &values {
                    match value {
                        ColumnValue::Name(name) => {
                            port.name = name.clone();
                        }
                        ColumnValue::ExternalIds(update) => {
                            merge(&mut port.external_ids, update);
                        }
                        ColumnValue::Options(update) => {
                            merge(&mut port.options, update);
                        }
                        ColumnValue::Enabled(enabled) => {
                            port.enabled = Some(*enabled);
                        }
                        ColumnValue::Addresses(addresses) => {
                            port.addresses = addresses.clone();
                        }
                        ColumnValue::Dhcpv4Options(subnet_id) => {
                            port.dhcpv4_options = Some(*subnet_id);
                        }
                        ColumnValue::PortType(port_type) => {
                            port.port_type = port_type.clone();
                        }
                        ColumnValue::Tag(tag) => {
                            port.tag = Some(*tag);
                        }
                        other => return Err(bad_column(table, other)),
                    }
                }
            }
            NbTable::DhcpOptions => {
                let row = state
                    .dhcp_options
                    .get_mut(&row_id)
                    .ok_or_else(|| not_found(table, row_id))?;
                for value in &values {
                    match value {
                        ColumnValue::Cidr(cidr) => {
                            row.cidr = cidr.clone();
                        }
                        ColumnValue::ExternalIds(update) => {
                            merge(&mut row.external_ids, update);
                        }
                        ColumnValue::Options(update) => {
                            merge(&mut row.options, update);
                        }
                        other => return Err(bad_column(table, other)),
                    }
                }
            }
            NbTable::LogicalRouter => {
                let router = state
                    .routers
                    .get_mut(&row_id)
                    .ok_or_else(|| not_found(table, row_id))?;
                for value in &values {
                    match value {
                        ColumnValue::Name(name) => {
                            router.name = name.clone();
                        }
                        other => return Err(bad_column(table, other)),
                    }
                }
            }
        }
        state.commands.push(NbCommand::DbSet { table, row_id, values });
        Ok(())
    }
}
