// TCP/IP page: DHCP switches, link negotiation, and address readout.

use serde::Serialize;

use crate::cache::ConfigInvalidator;
use crate::document::ConfigMap;
use crate::error::Error;
use crate::session::Session;

use super::{FormEndpoint, flag};

const ENDPOINT: &str = "/delta/adm_ipconfig";

/// IPv4 settings as exported in the system configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ipv4Info {
    pub dhcp: Option<String>,
    pub address: Option<String>,
    pub subnet_mask: Option<String>,
    pub gateway: Option<String>,
    pub dns: Option<String>,
    pub search_domain: Option<String>,
}

impl Ipv4Info {
    pub fn from_config(config: &ConfigMap) -> Self {
        let value = |key: &str| config.get(key).map(str::to_owned);
        Self {
            dhcp: value("Bootp"),
            address: value("IP"),
            subnet_mask: value("Mask"),
            gateway: value("Gateway"),
            dns: value("DNS IP"),
            search_domain: value("Domain"),
        }
    }
}

/// IPv6 settings; the card exports the address in `addr/prefix` form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Ipv6Info {
    pub dhcp: Option<String>,
    pub address: Option<String>,
    pub prefix_length: Option<u8>,
    pub gateway: Option<String>,
    pub dns: Option<String>,
}

impl Ipv6Info {
    pub fn from_config(config: &ConfigMap) -> Self {
        let value = |key: &str| config.get(key).map(str::to_owned);
        let (address, prefix_length) = match config.get("V6 IP") {
            Some(raw) => match raw.split_once('/') {
                Some((addr, prefix)) => (Some(addr.to_owned()), prefix.trim().parse().ok()),
                None => (Some(raw.to_owned()), None),
            },
            None => (None, None),
        };
        Self {
            dhcp: value("V6 DHCP"),
            address,
            prefix_length,
            gateway: value("V6 Gateway"),
            dns: value("V6 DNS"),
        }
    }
}

pub struct TcpIp<'a> {
    form: FormEndpoint<'a>,
}

impl<'a> TcpIp<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            form: FormEndpoint::new(session, ENDPOINT),
        }
    }

    pub fn with_invalidator(session: &'a Session, invalidator: &'a dyn ConfigInvalidator) -> Self {
        Self {
            form: FormEndpoint::with_invalidator(session, invalidator, ENDPOINT),
        }
    }

    /// Changing addressing may move the card off the session's host.
    pub async fn set_ipv4_dhcp(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("SYS_DHCP", flag(enabled))]).await
    }

    pub async fn set_ipv6_dhcp(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("SYS_V6DHCP", flag(enabled))]).await
    }

    pub async fn set_autonegotiation(&self, enabled: bool) -> Result<(), Error> {
        self.form.submit(&[("SYS_AUTONEG", flag(enabled))]).await
    }

    pub async fn ipv4_info(&self) -> Result<Ipv4Info, Error> {
        let config = self.form.system_config().await?;
        Ok(Ipv4Info::from_config(&config))
    }

    pub async fn ipv6_info(&self) -> Result<Ipv6Info, Error> {
        let config = self.form.system_config().await?;
        Ok(Ipv6Info::from_config(&config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_from_exact_keys() {
        let config = ConfigMap::parse(
            "Bootp=0\nIP=10.0.0.5\nMask=255.255.255.0\nGateway=10.0.0.1\nDNS IP=10.0.0.2\nDomain=lan\nV6 IP=::1/128\n",
        );
        let info = Ipv4Info::from_config(&config);
        assert_eq!(info.address.as_deref(), Some("10.0.0.5"));
        assert_eq!(info.subnet_mask.as_deref(), Some("255.255.255.0"));
        assert_eq!(info.search_domain.as_deref(), Some("lan"));
        assert_eq!(info.dhcp.as_deref(), Some("0"));
    }

    #[test]
    fn ipv6_splits_prefix() {
        let config = ConfigMap::parse("V6 DHCP=1\nV6 IP=fe80::2/64\nV6 Gateway=fe80::1\n");
        let info = Ipv6Info::from_config(&config);
        assert_eq!(info.address.as_deref(), Some("fe80::2"));
        assert_eq!(info.prefix_length, Some(64));
        assert_eq!(info.gateway.as_deref(), Some("fe80::1"));
        assert_eq!(info.dns, None);
    }

    #[test]
    fn ipv6_without_prefix() {
        let info = Ipv6Info::from_config(&ConfigMap::parse("V6 IP=fe80::2\n"));
        assert_eq!(info.address.as_deref(), Some("fe80::2"));
        assert_eq!(info.prefix_length, None);
    }
}
