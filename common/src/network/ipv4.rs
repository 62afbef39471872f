//! # IPv4 Helpers
//!
//! Small, pure helpers for the dotted-quad arithmetic the host generator relies on.
//! Every host block is treated as a /24: the first three octets are carried over
//! unchanged and only the last octet moves.

use std::net::{AddrParseError, Ipv4Addr};

use pnet::ipnetwork::{self, IpNetworkError};

/// Highest last octet a generated host may use. `.255` is the broadcast address of the block.
pub const MAX_HOST_OCTET: u8 = 254;

/// Last octet of the default gateway inside a /24.
pub const GATEWAY_OCTET: u8 = 1;

/// Parses a strict dotted quad (`a.b.c.d`, each octet in `0..=255`).
///
/// Surrounding whitespace is ignored; anything else, including IPv6 or
/// shortened forms, is rejected.
pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr, AddrParseError> {
    s.trim().parse::<Ipv4Addr>()
}

/// Returns the `.1` address of the /24 that `ip` belongs to.
pub fn default_gateway(ip: Ipv4Addr) -> Ipv4Addr {
    with_last_octet(ip, GATEWAY_OCTET)
}

pub fn with_last_octet(ip: Ipv4Addr, last: u8) -> Ipv4Addr {
    let [a, b, c, _] = ip.octets();
    Ipv4Addr::new(a, b, c, last)
}

/// Moves `ip` forward by `offset` hosts within its /24.
///
/// Returns `None` once the last octet would pass [`MAX_HOST_OCTET`].
pub fn offset_host(ip: Ipv4Addr, offset: u32) -> Option<Ipv4Addr> {
    let last = u32::from(ip.octets()[3]).checked_add(offset)?;
    if last > u32::from(MAX_HOST_OCTET) {
        return None;
    }
    Some(with_last_octet(ip, last as u8))
}

/// Converts a netmask such as `255.255.255.0` into its prefix length.
///
/// Fails for masks with non-contiguous bits (e.g. `255.0.255.0`).
pub fn netmask_prefix(mask: Ipv4Addr) -> Result<u8, IpNetworkError> {
    ipnetwork::ipv4_mask_to_prefix(mask)
}
