//! IPv4 subnet arithmetic.
//!
//! Addresses are handled as [`Ipv4Addr`] at the API boundary and as host-order
//! `u32` internally. These helpers build the lease pool and validate the
//! server settings against the server's subnet.

use std::net::Ipv4Addr;

/// Returns the network address of `addr` under `mask`.
pub fn network(addr: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(addr) & u32::from(mask))
}

/// Returns the directed broadcast address of `addr` under `mask`.
pub fn broadcast(addr: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(addr) | !u32::from(mask))
}

/// Returns true if `a` and `b` share a network under `mask`.
pub fn same_subnet(a: Ipv4Addr, b: Ipv4Addr, mask: Ipv4Addr) -> bool {
    network(a, mask) == network(b, mask)
}

/// Returns the next host address after `addr`.
///
/// Yields `None` when `addr` is the last host address before the subnet's
/// broadcast address (or is the broadcast address itself).
pub fn successor(addr: Ipv4Addr, mask: Ipv4Addr) -> Option<Ipv4Addr> {
    let next = u32::from(addr).checked_add(1)?;
    if next >= u32::from(broadcast(addr, mask)) {
        return None;
    }
    Some(Ipv4Addr::from(next))
}

/// Enumerates every usable host address in the server's subnet, excluding the
/// server's own address.
///
/// Usable hosts exclude the network and broadcast addresses, so /31 and /32
/// subnets yield nothing.
pub fn all_hosts(server_addr: Ipv4Addr, mask: Ipv4Addr) -> impl Iterator<Item = Ipv4Addr> {
    let first = u32::from(network(server_addr, mask)).saturating_add(1);
    let last = u32::from(broadcast(server_addr, mask)).saturating_sub(1);
    let server = u32::from(server_addr);

    (first..=last)
        .filter(move |host| *host != server)
        .map(Ipv4Addr::from)
}
