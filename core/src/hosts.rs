//! # Host List Generation
//!
//! Derives an ordered list of [`HostRecord`]s from a base name, a starting
//! address and a count. Every record shares the same [`NetworkSettings`]; only
//! the name, address and preseed filename change from one record to the next.
//!
//! Generation is a pure function of its inputs: calling [`generate`] twice with
//! the same request produces the same list.

use std::fmt;
use std::net::Ipv4Addr;

use isoseed_common::config::NetworkDefaults;
use isoseed_common::network::ipv4::{self, MAX_HOST_OCTET};
use isoseed_common::network::range::Ipv4Range;
use thiserror::Error;

/// Longest hostname label the installer accepts.
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostListError {
    #[error("{field}: '{input}' is not a valid IPv4 address")]
    InvalidAddress { field: &'static str, input: String },
    #[error("{count} hosts starting at {first_ip} would run past .{MAX_HOST_OCTET}")]
    AddressOverflow { first_ip: Ipv4Addr, count: u32 },
    #[error("number of hosts must be a positive integer, got '{0}'")]
    InvalidCount(String),
    #[error("{field}: '{input}' could not be understood")]
    MalformedOperatorInput { field: &'static str, input: String },
    #[error("'{0}' is not a valid netmask")]
    InvalidNetmask(String),
    #[error("'{0}' cannot be used as a hostname")]
    InvalidBaseName(String),
    #[error("'{0}' is not a valid domain")]
    InvalidDomain(String),
}

/// Network parameters shared by every record of one generated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub gateway: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub dns: Ipv4Addr,
    pub domain: String,
}

/// One generated server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub name: String,
    pub ip: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub dns: Ipv4Addr,
    pub domain: String,
    pub config_filename: String,
}

impl HostRecord {
    fn new(name: String, ip: Ipv4Addr, network: &NetworkSettings) -> Self {
        Self {
            config_filename: config_filename(&name),
            name,
            ip,
            gateway: network.gateway,
            netmask: network.netmask,
            dns: network.dns,
            domain: network.domain.clone(),
        }
    }

    pub fn fqdn(&self) -> String {
        format!("{}.{}", self.name, self.domain)
    }
}

/// A non-empty, ordered list of host records.
///
/// Only [`generate`] builds one, so names are always unique and addresses
/// always consecutive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostList {
    records: Vec<HostRecord>,
    network: NetworkSettings,
    range: Ipv4Range,
}

impl HostList {
    pub fn records(&self) -> &[HostRecord] {
        &self.records
    }

    pub fn network(&self) -> &NetworkSettings {
        &self.network
    }

    /// The inclusive range of addresses handed out, first record to last.
    pub fn address_range(&self) -> Ipv4Range {
        self.range
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HostRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a HostList {
    type Item = &'a HostRecord;
    type IntoIter = std::slice::Iter<'a, HostRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Raw inputs for one generation attempt.
///
/// Addresses are kept as text so a malformed value surfaces as
/// [`HostListError::InvalidAddress`] instead of being rejected earlier.
/// `None` selects the default for that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostListRequest {
    pub base_name: String,
    pub first_ip: String,
    pub gateway: Option<String>,
    pub netmask: Option<String>,
    pub dns: Option<String>,
    pub domain: Option<String>,
    pub count: u32,
}

impl HostListRequest {
    pub fn new(base_name: impl Into<String>, first_ip: impl Into<String>, count: u32) -> Self {
        Self {
            base_name: base_name.into(),
            first_ip: first_ip.into(),
            gateway: None,
            netmask: None,
            dns: None,
            domain: None,
            count,
        }
    }

    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    pub fn with_netmask(mut self, netmask: impl Into<String>) -> Self {
        self.netmask = Some(netmask.into());
        self
    }

    pub fn with_dns(mut self, dns: impl Into<String>) -> Self {
        self.dns = Some(dns.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Interprets operator text as a host count.
    ///
    /// Text that is not a number at all is malformed input; a number that is
    /// zero, negative or fractional is an invalid count.
    pub fn parse_count(input: &str) -> Result<u32, HostListError> {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) if n <= 0 => Err(HostListError::InvalidCount(trimmed.to_string())),
            // Anything this large overflows the /24 and is reported as such.
            Ok(n) => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
            Err(_) if is_fractional(trimmed) => {
                Err(HostListError::InvalidCount(trimmed.to_string()))
            }
            Err(_) => Err(HostListError::MalformedOperatorInput {
                field: "number of hosts",
                input: trimmed.to_string(),
            }),
        }
    }
}

/// `inf` and `NaN` parse as floats but are not numbers an operator means.
fn is_fractional(input: &str) -> bool {
    input.chars().any(|c| c.is_ascii_digit()) && input.parse::<f64>().is_ok()
}

/// Generates a host list, falling back to the built-in network defaults.
pub fn generate(request: &HostListRequest) -> Result<HostList, HostListError> {
    generate_with_defaults(request, &NetworkDefaults::default())
}

/// Generates a host list, using `defaults` for an omitted netmask or domain.
///
/// An omitted gateway becomes the `.1` address of the first IP's /24, and an
/// omitted DNS server becomes the gateway.
pub fn generate_with_defaults(
    request: &HostListRequest,
    defaults: &NetworkDefaults,
) -> Result<HostList, HostListError> {
    let first_ip = parse_address("first IP address", &request.first_ip)?;
    validate_base_name(&request.base_name, request.count)?;

    if request.count == 0 {
        return Err(HostListError::InvalidCount(request.count.to_string()));
    }

    let network = resolve_network(request, first_ip, defaults)?;

    let last_ip = ipv4::offset_host(first_ip, request.count - 1).ok_or(
        HostListError::AddressOverflow {
            first_ip,
            count: request.count,
        },
    )?;
    let range = Ipv4Range::new(first_ip, last_ip);

    let records: Vec<HostRecord> = range
        .iter()
        .zip(1..=request.count)
        .map(|(ip, seq)| HostRecord::new(host_name(&request.base_name, seq), ip, &network))
        .collect();

    Ok(HostList {
        records,
        network,
        range,
    })
}

/// `{base}{seq:02}`. Sequences past 99 simply grow a digit.
pub fn host_name(base_name: &str, seq: u32) -> String {
    format!("{base_name}{seq:02}")
}

pub fn config_filename(host_name: &str) -> String {
    format!("preseed-{host_name}.cfg")
}

fn resolve_network(
    request: &HostListRequest,
    first_ip: Ipv4Addr,
    defaults: &NetworkDefaults,
) -> Result<NetworkSettings, HostListError> {
    let gateway = match non_empty(&request.gateway) {
        Some(gateway) => parse_address("gateway", gateway)?,
        None => ipv4::default_gateway(first_ip),
    };

    let netmask_text = non_empty(&request.netmask).unwrap_or(&defaults.netmask);
    let netmask = ipv4::parse_ipv4(netmask_text)
        .map_err(|_| HostListError::InvalidNetmask(netmask_text.trim().to_string()))?;
    ipv4::netmask_prefix(netmask)
        .map_err(|_| HostListError::InvalidNetmask(netmask_text.trim().to_string()))?;

    let dns = match non_empty(&request.dns) {
        Some(dns) => parse_address("name server", dns)?,
        None => gateway,
    };

    let domain = non_empty(&request.domain).unwrap_or(&defaults.domain).trim();
    validate_domain(domain)?;

    Ok(NetworkSettings {
        gateway,
        netmask,
        dns,
        domain: domain.to_string(),
    })
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

fn parse_address(field: &'static str, input: &str) -> Result<Ipv4Addr, HostListError> {
    ipv4::parse_ipv4(input).map_err(|_| HostListError::InvalidAddress {
        field,
        input: input.trim().to_string(),
    })
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn validate_base_name(base_name: &str, count: u32) -> Result<(), HostListError> {
    // The sequence suffix is digits, so checking the longest generated name is enough.
    let longest = host_name(base_name, count.max(1));
    if base_name.is_empty() || base_name.starts_with('-') || !is_label(&longest) {
        return Err(HostListError::InvalidBaseName(base_name.to_string()));
    }
    Ok(())
}

fn validate_domain(domain: &str) -> Result<(), HostListError> {
    if domain.is_empty() || !domain.split('.').all(is_label) {
        return Err(HostListError::InvalidDomain(domain.to_string()));
    }
    Ok(())
}

impl fmt::Display for HostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.fqdn(), self.ip)
    }
}
