use colored::*;
use isoseed_core::hosts::{HostList, HostRecord};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn record_to_details(record: &HostRecord) -> Vec<Detail> {
    vec![
        (
            String::from("IPv4"),
            record.ip.to_string().color(colors::IPV4_ADDR),
        ),
        (String::from("FQDN"), record.fqdn().color(colors::DOMAIN)),
        (
            String::from("Config"),
            record.config_filename.as_str().color(colors::FILE_PATH),
        ),
    ]
}

/// Settings every record of the list shares, as `(key, value)` lines.
pub fn network_to_details(hosts: &HostList) -> Vec<Detail> {
    let network = hosts.network();
    vec![
        (
            String::from("Gateway"),
            network.gateway.to_string().color(colors::IPV4_ADDR),
        ),
        (
            String::from("Netmask"),
            network.netmask.to_string().color(colors::IPV4_ADDR),
        ),
        (
            String::from("DNS"),
            network.dns.to_string().color(colors::IPV4_ADDR),
        ),
        (
            String::from("Domain"),
            network.domain.as_str().color(colors::DOMAIN),
        ),
        (
            String::from("Range"),
            hosts.address_range().to_string().color(colors::IPV4_ADDR),
        ),
    ]
}

pub fn host_count(count: usize) -> ColoredString {
    let noun = if count == 1 { "server" } else { "servers" };
    format!("{count} {noun}").bold().green()
}
