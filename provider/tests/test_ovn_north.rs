// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tests for the orchestration engine, run against the simulated northbound
//! database.  Mutating operations are checked down to the exact command
//! sequence they issue; failed validations are checked to have issued no
//! commands at all.

use ovn_provider::northbound::sim::SimNorthbound;
use ovn_provider::northbound::ColumnValue;
use ovn_provider::northbound::LogicalRouterRow;
use ovn_provider::northbound::NbCommand;
use ovn_provider::northbound::NbTable;
use ovn_provider::northbound::NorthboundApi;
use ovn_provider::ConfigDhcp;
use ovn_provider::OvnNorth;
use ovn_provider_common::api::FixedIp;
use ovn_provider_common::api::NetworkCreateParams;
use ovn_provider_common::api::NetworkUpdateParams;
use ovn_provider_common::api::PortCreateParams;
use ovn_provider_common::api::SubnetCreateParams;
use ovn_provider_common::api::SubnetUpdateParams;
use ovn_provider_common::Error;
use slog::o;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

const TENANT: &str = "test-tenant";

fn test_north() -> (Arc<SimNorthbound>, OvnNorth) {
    let sim = Arc::new(SimNorthbound::new());
    let north = OvnNorth::new(
        Arc::clone(&sim) as Arc<dyn NorthboundApi>,
        ConfigDhcp::default(),
        TENANT.to_string(),
        slog::Logger::root(slog::Discard, o!()),
    );
    (sim, north)
}

fn network_params(name: &str) -> NetworkCreateParams {
    NetworkCreateParams {
        name: name.to_string(),
        mtu: None,
        provider_network_type: None,
        provider_physical_network: None,
        provider_segmentation_id: None,
    }
}

fn subnet_params(network_id: &str) -> SubnetCreateParams {
    SubnetCreateParams {
        name: Some("subnet1".to_string()),
        cidr: "10.0.0.0/24".to_string(),
        network_id: network_id.to_string(),
        gateway_ip: Some("10.0.0.1".to_string()),
        dns_nameservers: vec!["8.8.8.8".to_string(), "8.8.4.4".to_string()],
        enable_dhcp: None,
    }
}

fn port_params(network_id: &str) -> PortCreateParams {
    PortCreateParams {
        name: Some("eth0".to_string()),
        network_id: network_id.to_string(),
        mac_address: None,
        device_id: None,
        device_owner: None,
        admin_state_up: None,
        fixed_ips: Vec::new(),
    }
}

/*
 * Networks
 */

#[tokio::test]
async fn test_add_network() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    assert_eq!(network.name, "net1");
    assert_eq!(network.tenant_id, TENANT);
    assert_eq!(network.mtu, None);
    assert_eq!(network.provider_network_type, None);

    let commands = sim.recorded_commands().await;
    assert_eq!(commands.len(), 1);
    assert_eq!(
        commands[0],
        NbCommand::LsAdd {
            name: "net1".to_string(),
            external_ids: BTreeMap::new(),
        }
    );
}

#[tokio::test]
async fn test_add_network_with_mtu() {
    let (sim, north) = test_north();
    let mut params = network_params("net1");
    params.mtu = Some(1442);
    let network = north.network_create(&params).await.unwrap();
    assert_eq!(network.mtu, Some(1442));

    let commands = sim.recorded_commands().await;
    let mut external_ids = BTreeMap::new();
    external_ids.insert("mtu".to_string(), "1442".to_string());
    assert_eq!(
        commands[0],
        NbCommand::LsAdd { name: "net1".to_string(), external_ids }
    );
}

#[tokio::test]
async fn test_add_localnet_vlan_network() {
    let (sim, north) = test_north();
    let mut params = network_params("phys-net");
    params.provider_network_type = Some("vlan".to_string());
    params.provider_physical_network = Some("datacenter".to_string());
    params.provider_segmentation_id = Some(17);
    let network = north.network_create(&params).await.unwrap();
    assert_eq!(network.provider_network_type.as_deref(), Some("vlan"));
    assert_eq!(
        network.provider_physical_network.as_deref(),
        Some("datacenter")
    );
    assert_eq!(network.provider_segmentation_id, Some(17));

    let commands = sim.recorded_commands().await;
    assert_eq!(commands.len(), 4);
    assert!(matches!(commands[0], NbCommand::LsAdd { .. }));
    match &commands[1] {
        NbCommand::LspAdd { switch_id, name } => {
            assert_eq!(*switch_id, network.id);
            assert_eq!(name, "localnet_port");
        }
        other => panic!("expected LspAdd, got {:?}", other),
    }
    match &commands[2] {
        NbCommand::DbSet { table, values, .. } => {
            assert_eq!(*table, NbTable::LogicalSwitchPort);
            let mut options = BTreeMap::new();
            options.insert(
                "network_name".to_string(),
                "datacenter".to_string(),
            );
            assert_eq!(
                *values,
                vec![
                    ColumnValue::PortType("localnet".to_string()),
                    ColumnValue::Options(options),
                ]
            );
        }
        other => panic!("expected DbSet, got {:?}", other),
    }
    match &commands[3] {
        NbCommand::DbSet { table, values, .. } => {
            assert_eq!(*table, NbTable::LogicalSwitchPort);
            assert_eq!(*values, vec![ColumnValue::Tag(17)]);
        }
        other => panic!("expected DbSet, got {:?}", other),
    }
}

#[tokio::test]
async fn test_add_localnet_flat_network() {
    let (sim, north) = test_north();
    let mut params = network_params("phys-net");
    params.provider_physical_network = Some("datacenter".to_string());
    let network = north.network_create(&params).await.unwrap();
    /* no segmentation id, so no tag write and the network reads as flat */
    assert_eq!(network.provider_network_type.as_deref(), Some("flat"));
    assert_eq!(network.provider_segmentation_id, None);
    assert_eq!(sim.recorded_commands().await.len(), 3);
}

#[tokio::test]
async fn test_localnet_port_hidden_from_ports_list() {
    let (_sim, north) = test_north();
    let mut params = network_params("phys-net");
    params.provider_physical_network = Some("datacenter".to_string());
    let network = north.network_create(&params).await.unwrap();

    assert!(north.ports_list().await.unwrap().is_empty());

    let port = north
        .port_create(&port_params(&network.id.to_string()))
        .await
        .unwrap();
    let ports = north.ports_list().await.unwrap();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].id, port.id);
}

#[tokio::test]
async fn test_update_network_name() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    sim.clear_recorded_commands().await;

    let params = NetworkUpdateParams {
        name: Some("net1-renamed".to_string()),
        mtu: None,
    };
    let updated = north.network_update(network.id, &params).await.unwrap();
    assert_eq!(updated.name, "net1-renamed");

    let commands = sim.recorded_commands().await;
    assert_eq!(
        commands,
        vec![NbCommand::DbSet {
            table: NbTable::LogicalSwitch,
            row_id: network.id,
            values: vec![ColumnValue::Name("net1-renamed".to_string())],
        }]
    );
}

#[tokio::test]
async fn test_update_network_mtu_mirrors_to_subnet() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let subnet = north
        .subnet_create(&subnet_params(&network.id.to_string()))
        .await
        .unwrap();
    sim.clear_recorded_commands().await;

    let params = NetworkUpdateParams { name: None, mtu: Some(1400) };
    let updated = north.network_update(network.id, &params).await.unwrap();
    assert_eq!(updated.mtu, Some(1400));

    let commands = sim.recorded_commands().await;
    assert_eq!(commands.len(), 2);
    let mut external_ids = BTreeMap::new();
    external_ids.insert("mtu".to_string(), "1400".to_string());
    assert_eq!(
        commands[0],
        NbCommand::DbSet {
            table: NbTable::LogicalSwitch,
            row_id: network.id,
            values: vec![ColumnValue::ExternalIds(external_ids)],
        }
    );
    let mut options = BTreeMap::new();
    options.insert("mtu".to_string(), "1400".to_string());
    assert_eq!(
        commands[1],
        NbCommand::DbSet {
            table: NbTable::DhcpOptions,
            row_id: subnet.id,
            values: vec![ColumnValue::Options(options)],
        }
    );
}

#[tokio::test]
async fn test_update_network_mtu_without_subnet() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    sim.clear_recorded_commands().await;

    let params = NetworkUpdateParams { name: None, mtu: Some(1400) };
    north.network_update(network.id, &params).await.unwrap();
    assert_eq!(sim.recorded_commands().await.len(), 1);
}

#[tokio::test]
async fn test_delete_network_with_subnet() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let subnet = north
        .subnet_create(&subnet_params(&network.id.to_string()))
        .await
        .unwrap();
    sim.clear_recorded_commands().await;

    north.network_delete(network.id).await.unwrap();
    assert_eq!(
        sim.recorded_commands().await,
        vec![
            NbCommand::DhcpOptionsDel { row_id: subnet.id },
            NbCommand::LsDel { switch_id: network.id },
        ]
    );

    let error = north.network_get(network.id).await.unwrap_err();
    assert!(matches!(error, Error::ObjectNotFound { .. }));
}

#[tokio::test]
async fn test_delete_network_not_found() {
    let (sim, north) = test_north();
    let error = north.network_delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(error, Error::ObjectNotFound { .. }));
    assert!(sim.recorded_commands().await.is_empty());
}

/*
 * Subnets
 */

#[tokio::test]
async fn test_add_subnet() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    sim.clear_recorded_commands().await;

    let params = subnet_params(&network.id.to_string());
    let subnet = north.subnet_create(&params).await.unwrap();
    assert_eq!(subnet.cidr, "10.0.0.0/24");
    assert_eq!(subnet.network_id, network.id.to_string());
    assert_eq!(subnet.tenant_id, TENANT);
    assert_eq!(subnet.gateway_ip.as_deref(), Some("10.0.0.1"));
    /* only the first nameserver survives the translation */
    assert_eq!(subnet.dns_nameservers, vec!["8.8.8.8".to_string()]);
    assert!(subnet.enable_dhcp);
    assert_eq!(subnet.ip_version, 4);

    let commands = sim.recorded_commands().await;
    assert_eq!(commands.len(), 3);

    let mut other_config = BTreeMap::new();
    other_config.insert("subnet".to_string(), "10.0.0.0/24".to_string());
    assert_eq!(
        commands[0],
        NbCommand::DbSet {
            table: NbTable::LogicalSwitch,
            row_id: network.id,
            values: vec![ColumnValue::OtherConfig(other_config)],
        }
    );

    let mut external_ids = BTreeMap::new();
    external_ids.insert("provider_name".to_string(), "subnet1".to_string());
    external_ids.insert(
        "provider_network_id".to_string(),
        network.id.to_string(),
    );
    assert_eq!(
        commands[1],
        NbCommand::DhcpOptionsAdd {
            cidr: "10.0.0.0/24".to_string(),
            external_ids,
        }
    );

    let mut options = BTreeMap::new();
    options.insert("router".to_string(), "10.0.0.1".to_string());
    options.insert("server_id".to_string(), "10.0.0.1".to_string());
    options.insert("dns_server".to_string(), "8.8.8.8".to_string());
    options.insert("lease_time".to_string(), "86400".to_string());
    options
        .insert("server_mac".to_string(), "02:00:00:00:00:00".to_string());
    options.insert("mtu".to_string(), "1442".to_string());
    assert_eq!(
        commands[2],
        NbCommand::DhcpOptionsSetOptions { row_id: subnet.id, options }
    );
}

#[tokio::test]
async fn test_add_subnet_inherits_network_mtu() {
    let (sim, north) = test_north();
    let mut params = network_params("net1");
    params.mtu = Some(9000);
    let network = north.network_create(&params).await.unwrap();
    sim.clear_recorded_commands().await;

    north
        .subnet_create(&subnet_params(&network.id.to_string()))
        .await
        .unwrap();
    let commands = sim.recorded_commands().await;
    match &commands[2] {
        NbCommand::DhcpOptionsSetOptions { options, .. } => {
            assert_eq!(options.get("mtu").map(String::as_str), Some("9000"));
        }
        other => panic!("expected DhcpOptionsSetOptions, got {:?}", other),
    }
}

#[tokio::test]
async fn test_add_subnet_duplicate() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let params = subnet_params(&network.id.to_string());
    north.subnet_create(&params).await.unwrap();
    sim.clear_recorded_commands().await;

    let error = north.subnet_create(&params).await.unwrap_err();
    assert!(matches!(error, Error::SubnetConfig { .. }));
    assert!(sim.recorded_commands().await.is_empty());
}

#[tokio::test]
async fn test_add_subnet_enable_dhcp_false() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    sim.clear_recorded_commands().await;

    let mut params = subnet_params(&network.id.to_string());
    params.enable_dhcp = Some(false);
    let error = north.subnet_create(&params).await.unwrap_err();
    assert!(matches!(error, Error::UnsupportedDataValue { .. }));
    assert!(sim.recorded_commands().await.is_empty());
}

#[tokio::test]
async fn test_add_subnet_missing_network() {
    let (sim, north) = test_north();

    /* no network_id at all */
    let error = north.subnet_create(&subnet_params("")).await.unwrap_err();
    assert!(matches!(error, Error::SubnetConfig { .. }));

    /* network_id that isn't a uuid */
    let error =
        north.subnet_create(&subnet_params("not-a-uuid")).await.unwrap_err();
    assert!(matches!(error, Error::SubnetConfig { .. }));

    /* well-formed id for a network that doesn't exist */
    let error = north
        .subnet_create(&subnet_params(&Uuid::new_v4().to_string()))
        .await
        .unwrap_err();
    assert!(matches!(error, Error::SubnetConfig { .. }));

    assert!(sim.recorded_commands().await.is_empty());
}

#[tokio::test]
async fn test_update_subnet() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let subnet = north
        .subnet_create(&subnet_params(&network.id.to_string()))
        .await
        .unwrap();
    sim.clear_recorded_commands().await;

    let params = SubnetUpdateParams {
        name: Some("subnet1-renamed".to_string()),
        cidr: None,
        gateway_ip: Some("10.0.0.254".to_string()),
        dns_nameservers: None,
        lease_time: None,
        server_mac: None,
    };
    let updated = north.subnet_update(subnet.id, &params).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("subnet1-renamed"));
    assert_eq!(updated.gateway_ip.as_deref(), Some("10.0.0.254"));

    let commands = sim.recorded_commands().await;
    let mut external_ids = BTreeMap::new();
    external_ids.insert(
        "provider_name".to_string(),
        "subnet1-renamed".to_string(),
    );
    let mut options = BTreeMap::new();
    options.insert("router".to_string(), "10.0.0.254".to_string());
    options.insert("server_id".to_string(), "10.0.0.254".to_string());
    assert_eq!(
        commands,
        vec![NbCommand::DbSet {
            table: NbTable::DhcpOptions,
            row_id: subnet.id,
            values: vec![
                ColumnValue::ExternalIds(external_ids),
                ColumnValue::Options(options),
            ],
        }]
    );
}

#[tokio::test]
async fn test_update_subnet_cidr_and_dhcp_fields() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let subnet = north
        .subnet_create(&subnet_params(&network.id.to_string()))
        .await
        .unwrap();
    sim.clear_recorded_commands().await;

    let params = SubnetUpdateParams {
        name: None,
        cidr: Some("10.0.1.0/24".to_string()),
        gateway_ip: None,
        dns_nameservers: None,
        lease_time: Some(7200),
        server_mac: Some("02:00:00:00:00:aa".to_string()),
    };
    let updated = north.subnet_update(subnet.id, &params).await.unwrap();
    assert_eq!(updated.cidr, "10.0.1.0/24");
    /* untouched options survive the merge */
    assert_eq!(updated.gateway_ip.as_deref(), Some("10.0.0.1"));

    let commands = sim.recorded_commands().await;
    let mut options = BTreeMap::new();
    options.insert("lease_time".to_string(), "7200".to_string());
    options
        .insert("server_mac".to_string(), "02:00:00:00:00:aa".to_string());
    assert_eq!(
        commands,
        vec![NbCommand::DbSet {
            table: NbTable::DhcpOptions,
            row_id: subnet.id,
            values: vec![
                ColumnValue::Cidr("10.0.1.0/24".to_string()),
                ColumnValue::Options(options),
            ],
        }]
    );
}

#[tokio::test]
async fn test_delete_subnet() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let subnet = north
        .subnet_create(&subnet_params(&network.id.to_string()))
        .await
        .unwrap();
    sim.clear_recorded_commands().await;

    north.subnet_delete(subnet.id).await.unwrap();
    assert_eq!(
        sim.recorded_commands().await,
        vec![NbCommand::DhcpOptionsDel { row_id: subnet.id }]
    );

    let error = north.subnet_get(subnet.id).await.unwrap_err();
    assert!(matches!(error, Error::ObjectNotFound { .. }));
}

/*
 * Ports
 */

#[tokio::test]
async fn test_add_port_with_fixed_ip() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let subnet = north
        .subnet_create(&subnet_params(&network.id.to_string()))
        .await
        .unwrap();
    sim.clear_recorded_commands().await;

    let mut params = port_params(&network.id.to_string());
    params.mac_address = Some("02:00:00:00:00:05".to_string());
    params.device_id = Some("vm-1".to_string());
    params.fixed_ips = vec![FixedIp {
        ip_address: "10.0.0.5".to_string(),
        subnet_id: None,
    }];
    let port = north.port_create(&params).await.unwrap();
    assert_eq!(port.name, "eth0");
    assert_eq!(port.network_id, network.id.to_string());
    assert_eq!(port.mac_address.as_deref(), Some("02:00:00:00:00:05"));
    assert_eq!(port.device_id.as_deref(), Some("vm-1"));
    assert_eq!(port.fixed_ips.len(), 1);
    assert_eq!(port.fixed_ips[0].ip_address, "10.0.0.5");
    assert_eq!(port.fixed_ips[0].subnet_id, Some(subnet.id));
    /* the backend hasn't reported the port up yet */
    assert!(!port.admin_state_up);

    let commands = sim.recorded_commands().await;
    assert_eq!(commands.len(), 4);
    assert_eq!(
        commands[0],
        NbCommand::LspAdd {
            switch_id: network.id,
            name: "eth0".to_string(),
        }
    );
    assert_eq!(
        commands[1],
        NbCommand::DbSet {
            table: NbTable::LogicalSwitchPort,
            row_id: port.id,
            values: vec![ColumnValue::Name(port.id.to_string())],
        }
    );
    let mut external_ids = BTreeMap::new();
    external_ids.insert("provider_device_id".to_string(), "vm-1".to_string());
    external_ids.insert("provider_nic_name".to_string(), "eth0".to_string());
    assert_eq!(
        commands[2],
        NbCommand::DbSet {
            table: NbTable::LogicalSwitchPort,
            row_id: port.id,
            values: vec![
                ColumnValue::ExternalIds(external_ids),
                ColumnValue::Enabled(true),
            ],
        }
    );
    assert_eq!(
        commands[3],
        NbCommand::DbSet {
            table: NbTable::LogicalSwitchPort,
            row_id: port.id,
            values: vec![
                ColumnValue::Dhcpv4Options(subnet.id),
                ColumnValue::Addresses(vec![
                    "02:00:00:00:00:05 10.0.0.5".to_string()
                ]),
            ],
        }
    );
}

#[tokio::test]
async fn test_add_port_without_fixed_ip() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    sim.clear_recorded_commands().await;

    let mut params = port_params(&network.id.to_string());
    params.mac_address = Some("02:00:00:00:00:06".to_string());
    let port = north.port_create(&params).await.unwrap();
    assert!(port.fixed_ips.is_empty());

    let commands = sim.recorded_commands().await;
    assert_eq!(commands.len(), 4);
    assert_eq!(
        commands[3],
        NbCommand::DbSet {
            table: NbTable::LogicalSwitchPort,
            row_id: port.id,
            values: vec![ColumnValue::Addresses(vec![
                "02:00:00:00:00:06".to_string()
            ])],
        }
    );
}

#[tokio::test]
async fn test_add_port_admin_state_down() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    sim.clear_recorded_commands().await;

    let mut params = port_params(&network.id.to_string());
    params.admin_state_up = Some(false);
    let port = north.port_create(&params).await.unwrap();

    let commands = sim.recorded_commands().await;
    match &commands[2] {
        NbCommand::DbSet { values, .. } => {
            assert!(values.contains(&ColumnValue::Enabled(false)));
        }
        other => panic!("expected DbSet, got {:?}", other),
    }
    assert!(!port.admin_state_up);
}

#[tokio::test]
async fn test_add_port_nonexistent_network() {
    let (sim, north) = test_north();
    let error = north
        .port_create(&port_params(&Uuid::new_v4().to_string()))
        .await
        .unwrap_err();
    assert!(matches!(error, Error::ObjectNotFound { .. }));
    assert!(sim.recorded_commands().await.is_empty());
}

#[tokio::test]
async fn test_port_admin_state_reflects_up() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let port = north
        .port_create(&port_params(&network.id.to_string()))
        .await
        .unwrap();
    assert!(!port.admin_state_up);

    sim.port_set_up(port.id, Some(true)).await;
    assert!(north.port_get(port.id).await.unwrap().admin_state_up);

    sim.port_set_up(port.id, Some(false)).await;
    assert!(!north.port_get(port.id).await.unwrap().admin_state_up);

    /* enabled is a request, not a status; it never makes the port up */
    sim.port_set_up(port.id, None).await;
    sim.port_set_enabled(port.id, Some(true)).await;
    assert!(!north.port_get(port.id).await.unwrap().admin_state_up);
}

#[tokio::test]
async fn test_delete_port() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let port = north
        .port_create(&port_params(&network.id.to_string()))
        .await
        .unwrap();
    sim.clear_recorded_commands().await;

    north.port_delete(port.id).await.unwrap();
    assert_eq!(
        sim.recorded_commands().await,
        vec![NbCommand::LspDel { port_id: port.id }]
    );

    let error = north.port_get(port.id).await.unwrap_err();
    assert!(matches!(error, Error::ObjectNotFound { .. }));
}

#[tokio::test]
async fn test_delete_router_owned_port() {
    let (sim, north) = test_north();
    let network =
        north.network_create(&network_params("net1")).await.unwrap();
    let mut params = port_params(&network.id.to_string());
    params.device_owner = Some("network:router_interface".to_string());
    let port = north.port_create(&params).await.unwrap();
    sim.clear_recorded_commands().await;

    let error = north.port_delete(port.id).await.unwrap_err();
    assert!(matches!(error, Error::Conflict { .. }));
    assert!(sim.recorded_commands().await.is_empty());

    /* the port is still there */
    north.port_get(port.id).await.unwrap();
}

/*
 * Routers
 */

#[tokio::test]
async fn test_get_router() {
    let (sim, north) = test_north();
    let router_id = Uuid::new_v4();
    sim.router_insert(LogicalRouterRow {
        id: router_id,
        name: "router1".to_string(),
        ports: Vec::new(),
    })
    .await;

    let router = north.router_get(router_id).await.unwrap();
    assert_eq!(router.id, router_id);
    assert_eq!(router.name, "router1");
    assert_eq!(router.tenant_id, TENANT);

    let error = north.router_get(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(error, Error::ObjectNotFound { .. }));
}

#[tokio::test]
async fn test_delete_router() {
    let (sim, north) = test_north();
    let router_id = Uuid::new_v4();
    sim.router_insert(LogicalRouterRow {
        id: router_id,
        name: "router1".to_string(),
        ports: Vec::new(),
    })
    .await;

    north.router_delete(router_id).await.unwrap();
    assert_eq!(
        sim.recorded_commands().await,
        vec![NbCommand::LrDel { router_id }]
    );
}

#[tokio::test]
async fn test_delete_router_with_ports() {
    let (sim, north) = test_north();
    let router_id = Uuid::new_v4();
    sim.router_insert(LogicalRouterRow {
        id: router_id,
        name: "router1".to_string(),
        ports: vec![Uuid::new_v4()],
    })
    .await;

    let error = north.router_delete(router_id).await.unwrap_err();
    assert!(matches!(error, Error::Conflict { .. }));
    assert!(sim.recorded_commands().await.is_empty());

    /* still present */
    north.router_get(router_id).await.unwrap();
}
