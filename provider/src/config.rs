// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces for parsing configuration files and working with the provider
//! server configuration

use dropshot::ConfigDropshot;
use dropshot::ConfigLogging;
use serde::Deserialize;
use std::path::Path;

/// Tenant reported for every resource.  The provider has no tenant model of
/// its own; everything belongs to this one.
pub const DEFAULT_TENANT: &str = "00000000000000000000000000000001";

/// Configuration for the provider server
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Dropshot configuration for the network API server
    pub dropshot_api: ConfigDropshot,
    /// Dropshot configuration for the token endpoint server
    pub dropshot_auth: ConfigDropshot,
    /// Server-wide logging configuration
    pub log: ConfigLogging,
    /// Identity configuration
    #[serde(default)]
    pub provider: ConfigProvider,
    /// Defaults applied to the DHCP options of new subnets
    #[serde(default)]
    pub dhcp: ConfigDhcp,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConfigProvider {
    pub tenant_id: String,
}

impl Default for ConfigProvider {
    fn default() -> Self {
        ConfigProvider { tenant_id: DEFAULT_TENANT.to_string() }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ConfigDhcp {
    /// lease time handed out with every subnet, in seconds
    pub lease_time: u32,
    /// MAC address the DHCP server answers from
    pub server_mac: String,
    /// MTU advertised when the owning network does not configure one
    pub mtu: u32,
}

impl Default for ConfigDhcp {
    fn default() -> Self {
        ConfigDhcp {
            lease_time: 86400,
            server_mac: "02:00:00:00:00:00".to_string(),
            mtu: 1442,
        }
    }
}

impl Config {
    /// Load a `Config` from the given TOML file.  This config object can
    /// then be used to create a new server.
    pub fn from_file(path: &Path) -> Result<Config, String> {
        let file_contents = std::fs::read_to_string(path)
            .map_err(|error| format!("read \"{}\": {}", path.display(), error))?;
        let config_parsed: Config = toml::from_str(&file_contents)
            .map_err(|error| {
                format!("parse \"{}\": {}", path.display(), error)
            })?;
        Ok(config_parsed)
    }
}

#[cfg(test)]
mod test {
    use super::Config;
    use std::fs;
    use std::path::Path;

    /*
     * Chunks of valid config file.  These are put together with invalid
     * chunks in the test suite to construct complete config files that will
     * only fail on the known invalid chunk.
     */
    const CONFIG_VALID_SERVERS: &str = r##"
            [dropshot_api]
            bind_address = "127.0.0.1:9696"
            [dropshot_auth]
            bind_address = "127.0.0.1:35357"
        "##;
    const CONFIG_VALID_LOG: &str = r##"
            [log]
            level = "info"
            mode = "stderr-terminal"
        "##;

    fn read_config(label: &str, contents: &str) -> Result<Config, String> {
        let arg0str = std::env::args().next().expect("expected process arg0");
        let arg0 = Path::new(&arg0str)
            .file_name()
            .expect("expected arg0 filename")
            .to_str()
            .expect("expected arg0 filename to be valid Unicode");
        let pid = std::process::id();
        let mut pathbuf = std::env::temp_dir();
        pathbuf.push(format!("{}.{}.{}", arg0, pid, label));
        let path = pathbuf.as_path();
        eprintln!("writing test config {}", path.display());
        fs::write(path, contents).expect("write to tempfile failed");

        let result = Config::from_file(path);
        fs::remove_file(path).expect("failed to remove temporary file");
        eprintln!("{:?}", result);
        result
    }

    /*
     * Totally bogus config files (nonexistent, bad TOML syntax)
     */

    #[test]
    fn test_config_nonexistent() {
        let error = Config::from_file(Path::new("/nonexistent"))
            .expect_err("expected config to fail from /nonexistent");
        assert!(error
            .starts_with("read \"/nonexistent\": No such file or directory"));
    }

    #[test]
    fn test_config_bad_toml() {
        let error =
            read_config("bad_toml", "foo =").expect_err("expected failure");
        assert!(error.starts_with("parse \""));
    }

    /*
     * Empty config (special case of a missing required field, but worth
     * calling out explicitly)
     */

    #[test]
    fn test_config_empty() {
        let error = read_config("empty", "").expect_err("expected failure");
        assert!(error.starts_with("parse \""));
        assert!(error.contains("missing field"));
    }

    #[test]
    fn test_config_missing_log() {
        let bad_config = CONFIG_VALID_SERVERS.to_string();
        let error = read_config("missing_log", &bad_config)
            .expect_err("expected failure");
        assert!(error.starts_with("parse \""));
        assert!(error.contains("missing field `log`"));
    }

    #[test]
    fn test_config_bad_log_mode() {
        let bad_config = format!(
            "{}{}",
            CONFIG_VALID_SERVERS,
            r##"
            [log]
            mode = "bonkers"
            "##
        );
        let error = read_config("bad_log_mode", &bad_config)
            .expect_err("expected failure");
        assert!(error.starts_with("parse \""));
        assert!(error.contains("unknown variant `bonkers`"));
    }

    /*
     * Working config, including the defaulted sections
     */

    #[test]
    fn test_config_minimal() {
        let config_text =
            format!("{}{}", CONFIG_VALID_SERVERS, CONFIG_VALID_LOG);
        let config =
            read_config("minimal", &config_text).expect("expected success");
        assert_eq!(
            config.dropshot_api.bind_address.to_string(),
            "127.0.0.1:9696"
        );
        assert_eq!(
            config.dropshot_auth.bind_address.to_string(),
            "127.0.0.1:35357"
        );
        assert_eq!(config.provider.tenant_id, super::DEFAULT_TENANT);
        assert_eq!(config.dhcp.lease_time, 86400);
        assert_eq!(config.dhcp.server_mac, "02:00:00:00:00:00");
        assert_eq!(config.dhcp.mtu, 1442);
    }

    #[test]
    fn test_config_overrides() {
        let config_text = format!(
            "{}{}{}",
            CONFIG_VALID_SERVERS,
            CONFIG_VALID_LOG,
            r##"
            [provider]
            tenant_id = "some-tenant"
            [dhcp]
            lease_time = 3600
            server_mac = "02:00:00:00:00:aa"
            mtu = 1400
            "##
        );
        let config =
            read_config("overrides", &config_text).expect("expected success");
        assert_eq!(config.provider.tenant_id, "some-tenant");
        assert_eq!(config.dhcp.lease_time, 3600);
        assert_eq!(config.dhcp.server_mac, "02:00:00:00:00:aa");
        assert_eq!(config.dhcp.mtu, 1400);
    }
}
