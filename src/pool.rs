//! In-memory lease pool.
//!
//! The pool is a flat arena of [`PooledAddress`] entries built once when the
//! server starts. Entries are mutated in place and only removed when a client
//! declines an address. There is no time-based expiry.
//!
//! [`LeasePool`] itself is not synchronized; [`DhcpServer`](crate::DhcpServer)
//! keeps it behind a single mutex so every operation here runs as one
//! critical section.

use std::net::Ipv4Addr;

use crate::addr;

/// One candidate address and its allocation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledAddress {
    pub address: Ipv4Addr,
    /// Set by a successful acknowledgement, cleared by RELEASE.
    pub allocated: bool,
    /// MAC the address was last acknowledged to. Survives RELEASE.
    pub authorized_mac: Option<String>,
}

impl PooledAddress {
    fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            allocated: false,
            authorized_mac: None,
        }
    }

    fn is_authorized_to(&self, mac: &str) -> bool {
        self.authorized_mac.as_deref() == Some(mac)
    }

    fn grant(&mut self, mac: &str) {
        self.allocated = true;
        self.authorized_mac = Some(mac.to_string());
    }
}

/// The set of addresses the server may hand out.
#[derive(Debug, Clone, Default)]
pub struct LeasePool {
    entries: Vec<PooledAddress>,
}

impl LeasePool {
    /// Builds the pool for a server at `server_ip`.
    ///
    /// With an explicit `range`, addresses run from start to end inclusive
    /// (stopping early at the last host before the subnet broadcast address).
    /// Without one, every host address of the server's subnet is used. The
    /// server's own address is never a member.
    pub fn new(
        server_ip: Ipv4Addr,
        subnet_mask: Ipv4Addr,
        range: Option<(Ipv4Addr, Ipv4Addr)>,
    ) -> Self {
        let entries = match range {
            Some((start, end)) => {
                std::iter::successors(Some(start), |current| addr::successor(*current, subnet_mask))
                    .take_while(|candidate| u32::from(*candidate) <= u32::from(end))
                    .filter(|candidate| *candidate != server_ip)
                    .map(PooledAddress::new)
                    .collect()
            }
            None => addr::all_hosts(server_ip, subnet_mask)
                .map(PooledAddress::new)
                .collect(),
        };

        Self { entries }
    }

    /// Returns the address to offer to `mac`.
    ///
    /// An address already authorized to `mac` wins; otherwise the first entry
    /// that is neither allocated nor authorized to anyone. `None` means the
    /// pool is exhausted for this client. The pool is not modified.
    pub fn find_for_offer(&self, mac: &str) -> Option<Ipv4Addr> {
        self.entries
            .iter()
            .find(|entry| entry.is_authorized_to(mac))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|entry| !entry.allocated && entry.authorized_mac.is_none())
            })
            .map(|entry| entry.address)
    }

    /// Allocates `address` to `mac` if it is in the pool and not allocated.
    pub fn confirm(&mut self, address: Ipv4Addr, mac: &str) -> bool {
        match self.entry_mut(address) {
            Some(entry) if !entry.allocated => {
                entry.grant(mac);
                true
            }
            _ => false,
        }
    }

    /// Returns true if `address` is in the pool and authorized to `mac`,
    /// whatever its allocation flag.
    pub fn reauthorize_if_owned(&self, address: Ipv4Addr, mac: &str) -> bool {
        self.get(address).is_some_and(|entry| entry.is_authorized_to(mac))
    }

    /// Allocates the first unallocated entry to `mac`, ignoring any
    /// authorization it still carries.
    pub fn allocate_any_free(&mut self, mac: &str) -> Option<Ipv4Addr> {
        let entry = self.entries.iter_mut().find(|entry| !entry.allocated)?;
        entry.grant(mac);
        Some(entry.address)
    }

    /// Removes `address` from the pool for good.
    ///
    /// Returns false if it was not a member.
    pub fn withdraw(&mut self, address: Ipv4Addr) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.address != address);
        self.entries.len() != before
    }

    /// Clears the allocated flag of `address`, keeping its authorization.
    ///
    /// Returns false if it was not a member.
    pub fn release(&mut self, address: Ipv4Addr) -> bool {
        match self.entry_mut(address) {
            Some(entry) => {
                entry.allocated = false;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, address: Ipv4Addr) -> Option<&PooledAddress> {
        self.entries.iter().find(|entry| entry.address == address)
    }

    fn entry_mut(&mut self, address: Ipv4Addr) -> Option<&mut PooledAddress> {
        self.entries.iter_mut().find(|entry| entry.address == address)
    }

    pub fn contains(&self, address: Ipv4Addr) -> bool {
        self.get(address).is_some()
    }

    pub fn entries(&self) -> &[PooledAddress] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);
    const MASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);
    const MAC_A: &str = "aa:bb:cc:dd:ee:ff";
    const MAC_B: &str = "11:22:33:44:55:66";

    fn ip(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(192, 168, 1, last)
    }

    fn small_pool() -> LeasePool {
        LeasePool::new(SERVER, MASK, Some((ip(10), ip(12))))
    }

    #[test]
    fn test_range_is_inclusive() {
        let pool = small_pool();
        let addresses: Vec<Ipv4Addr> = pool.entries().iter().map(|e| e.address).collect();
        assert_eq!(addresses, vec![ip(10), ip(11), ip(12)]);
    }

    #[test]
    fn test_range_skips_server_address() {
        let pool = LeasePool::new(SERVER, MASK, Some((ip(1), ip(3))));
        assert_eq!(pool.len(), 2);
        assert!(!pool.contains(SERVER));
    }

    #[test]
    fn test_range_single_address() {
        let pool = LeasePool::new(SERVER, MASK, Some((ip(50), ip(50))));
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(ip(50)));
    }

    #[test]
    fn test_range_stops_before_broadcast() {
        let pool = LeasePool::new(SERVER, MASK, Some((ip(250), ip(255))));
        assert_eq!(pool.len(), 5);
        assert!(pool.contains(ip(254)));
        assert!(!pool.contains(ip(255)));
    }

    #[test]
    fn test_whole_subnet_without_range() {
        let pool = LeasePool::new(SERVER, MASK, None);
        assert_eq!(pool.len(), 253);
        assert!(!pool.contains(SERVER));
        assert!(pool.entries().iter().all(|e| !e.allocated && e.authorized_mac.is_none()));
    }

    #[test]
    fn test_find_for_offer_does_not_mutate() {
        let pool = small_pool();
        assert_eq!(pool.find_for_offer(MAC_A), Some(ip(10)));
        assert_eq!(pool.find_for_offer(MAC_B), Some(ip(10)));
    }

    #[test]
    fn test_confirm_then_exclusive() {
        let mut pool = small_pool();
        assert!(pool.confirm(ip(10), MAC_A));
        assert!(!pool.confirm(ip(10), MAC_B));

        let entry = pool.get(ip(10)).unwrap();
        assert!(entry.allocated);
        assert_eq!(entry.authorized_mac.as_deref(), Some(MAC_A));

        assert_eq!(pool.find_for_offer(MAC_A), Some(ip(10)));
        assert_eq!(pool.find_for_offer(MAC_B), Some(ip(11)));
    }

    #[test]
    fn test_confirm_unknown_address() {
        let mut pool = small_pool();
        assert!(!pool.confirm(ip(99), MAC_A));
    }

    #[test]
    fn test_exhaustion() {
        let mut pool = small_pool();
        for last in 10..=12 {
            assert!(pool.confirm(ip(last), MAC_A));
        }
        assert_eq!(pool.find_for_offer(MAC_B), None);
        assert_eq!(pool.allocate_any_free(MAC_B), None);
    }

    #[test]
    fn test_reauthorize_if_owned() {
        let mut pool = small_pool();
        assert!(!pool.reauthorize_if_owned(ip(10), MAC_A));

        pool.confirm(ip(10), MAC_A);
        assert!(pool.reauthorize_if_owned(ip(10), MAC_A));
        assert!(!pool.reauthorize_if_owned(ip(10), MAC_B));

        pool.release(ip(10));
        assert!(pool.reauthorize_if_owned(ip(10), MAC_A));
    }

    #[test]
    fn test_release_keeps_authorization() {
        let mut pool = small_pool();
        pool.confirm(ip(10), MAC_A);

        assert!(pool.release(ip(10)));
        let entry = pool.get(ip(10)).unwrap();
        assert!(!entry.allocated);
        assert_eq!(entry.authorized_mac.as_deref(), Some(MAC_A));

        // Still reserved for the original client when offering.
        assert_eq!(pool.find_for_offer(MAC_B), Some(ip(11)));
        assert_eq!(pool.find_for_offer(MAC_A), Some(ip(10)));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = small_pool();
        let before = pool.entries().to_vec();
        assert!(pool.release(ip(11)));
        assert_eq!(pool.entries(), &before[..]);
        assert!(!pool.release(ip(99)));
    }

    #[test]
    fn test_allocate_any_free_ignores_stale_authorization() {
        let mut pool = small_pool();
        pool.confirm(ip(10), MAC_A);
        pool.release(ip(10));

        assert_eq!(pool.allocate_any_free(MAC_B), Some(ip(10)));
        let entry = pool.get(ip(10)).unwrap();
        assert!(entry.allocated);
        assert_eq!(entry.authorized_mac.as_deref(), Some(MAC_B));
    }

    #[test]
    fn test_withdraw_removes_entry() {
        let mut pool = small_pool();
        assert!(pool.withdraw(ip(10)));
        assert!(!pool.contains(ip(10)));
        assert_eq!(pool.len(), 2);
        assert!(!pool.withdraw(ip(10)));
        assert_eq!(pool.find_for_offer(MAC_A), Some(ip(11)));
    }
}
