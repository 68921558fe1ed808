// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interface to the northbound database
//!
//! The provider treats the northbound database as a generic row store with a
//! small command vocabulary: typed add/get/list/delete commands per table
//! plus a generic `db_set` that updates named columns on an existing row.
//! Map-valued columns (attribute bags, options) merge key-by-key on update;
//! scalar columns replace.
//!
//! Everything above this module works in terms of [`NorthboundApi`], so the
//! real OVSDB transport and the in-memory [`sim`] implementation are
//! interchangeable.

pub mod sim;

use async_trait::async_trait;
use ovn_provider_common::Error;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The northbound tables this provider touches
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NbTable {
    LogicalSwitch,
    LogicalSwitchPort,
    DhcpOptions,
    LogicalRouter,
}

impl fmt::Display for NbTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                NbTable::LogicalSwitch => "Logical_Switch",
                NbTable::LogicalSwitchPort => "Logical_Switch_Port",
                NbTable::DhcpOptions => "DHCP_Options",
                NbTable::LogicalRouter => "Logical_Router",
            }
        )
    }
}

/// A row in the logical switch table
///
/// `ports` carries the full rows of the switch's member ports, matching the
/// row cache a live northbound connection maintains.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalSwitchRow {
    pub id: Uuid,
    pub name: String,
    pub external_ids: BTreeMap<String, String>,
    pub other_config: BTreeMap<String, String>,
    pub ports: Vec<LogicalSwitchPortRow>,
}

/// A row in the logical switch port table
///
/// `enabled` and `up` are both optional booleans in the schema: a column
/// that was never written is `None`, which is distinct from `Some(false)`.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalSwitchPortRow {
    pub id: Uuid,
    pub name: String,
    pub addresses: Vec<String>,
    pub external_ids: BTreeMap<String, String>,
    pub options: BTreeMap<String, String>,
    pub port_type: String,
    pub tag: Option<u16>,
    pub enabled: Option<bool>,
    pub up: Option<bool>,
    pub dhcpv4_options: Option<Uuid>,
}

/// A row in the DHCP options table (the backend face of a subnet)
#[derive(Clone, Debug, PartialEq)]
pub struct DhcpOptionsRow {
    pub id: Uuid,
    pub cidr: String,
    pub external_ids: BTreeMap<String, String>,
    pub options: BTreeMap<String, String>,
}

/// A row in the logical router table
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalRouterRow {
    pub id: Uuid,
    pub name: String,
    pub ports: Vec<Uuid>,
}

/// A single (column, value) assignment within a `db_set` command
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnValue {
    Name(String),
    /// merged into the row's attribute bag
    ExternalIds(BTreeMap<String, String>),
    /// merged into the row's options bag
    Options(BTreeMap<String, String>),
    /// merged into the row's other_config bag
    OtherConfig(BTreeMap<String, String>),
    /// replaces the cidr column of a DHCP options row
    Cidr(String),
    Enabled(bool),
    Addresses(Vec<String>),
    Dhcpv4Options(Uuid),
    PortType(String),
    Tag(u16),
}

/// A mutating command issued against the northbound database
///
/// The simulated backend records these verbatim so tests can assert on the
/// exact command sequence an operation produced.
#[derive(Clone, Debug, PartialEq)]
pub enum NbCommand {
    LsAdd { name: String, external_ids: BTreeMap<String, String> },
    LsDel { switch_id: Uuid },
    LspAdd { switch_id: Uuid, name: String },
    LspDel { port_id: Uuid },
    DhcpOptionsAdd { cidr: String, external_ids: BTreeMap<String, String> },
    DhcpOptionsSetOptions { row_id: Uuid, options: BTreeMap<String, String> },
    DhcpOptionsDel { row_id: Uuid },
    LrDel { router_id: Uuid },
    DbSet { table: NbTable, row_id: Uuid, values: Vec<ColumnValue> },
}

/// Command and row access to the northbound database
///
/// Get-style methods return `Error::ObjectNotFound` (mapped to the REST
/// resource type backed by the table) when the row does not exist.
/// Transport-level failures surface as `Error::ServiceUnavailable`.
#[async_trait]
pub trait NorthboundApi: Send + Sync {
    async fn ls_list(&self) -> Result<Vec<LogicalSwitchRow>, Error>;
    async fn ls_get(&self, switch_id: Uuid)
        -> Result<LogicalSwitchRow, Error>;
    async fn ls_add(
        &self,
        name: &str,
        external_ids: BTreeMap<String, String>,
    ) -> Result<LogicalSwitchRow, Error>;
    async fn ls_del(&self, switch_id: Uuid) -> Result<(), Error>;

    async fn lsp_list(&self) -> Result<Vec<LogicalSwitchPortRow>, Error>;
    async fn lsp_get(
        &self,
        port_id: Uuid,
    ) -> Result<LogicalSwitchPortRow, Error>;
    async fn lsp_add(
        &self,
        switch_id: Uuid,
        name: &str,
    ) -> Result<LogicalSwitchPortRow, Error>;
    async fn lsp_del(&self, port_id: Uuid) -> Result<(), Error>;

    async fn dhcp_options_list(&self) -> Result<Vec<DhcpOptionsRow>, Error>;
    async fn dhcp_options_get(
        &self,
        row_id: Uuid,
    ) -> Result<DhcpOptionsRow, Error>;
    async fn dhcp_options_add(
        &self,
        cidr: &str,
        external_ids: BTreeMap<String, String>,
    ) -> Result<DhcpOptionsRow, Error>;
    async fn dhcp_options_set_options(
        &self,
        row_id: Uuid,
        options: BTreeMap<String, String>,
    ) -> Result<(), Error>;
    async fn dhcp_options_del(&self, row_id: Uuid) -> Result<(), Error>;

    async fn lr_lookup(
        &self,
        router_id: Uuid,
    ) -> Result<LogicalRouterRow, Error>;
    async fn lr_del(&self, router_id: Uuid) -> Result<(), Error>;

    async fn db_set(
        &self,
        table: NbTable,
        row_id: Uuid,
        values: Vec<ColumnValue>,
    ) -> Result<(), Error>;
}
