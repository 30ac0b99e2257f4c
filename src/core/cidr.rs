//! NB-006: CIDR blocks for subnet validation and address allocation.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// An address block in CIDR notation (e.g. `10.1.0.0/24`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    address: IpAddr,
    prefix: u8,
}

impl Cidr {
    /// Network address as written.
    pub fn address(&self) -> IpAddr {
        self.address
    }

    /// Prefix length.
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// True if `ip` falls inside this block. Mixed families never match.
    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.address, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = u32::MAX.checked_shl(32 - u32::from(self.prefix)).unwrap_or(0);
                u32::from(net) & mask == u32::from(ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = u128::MAX
                    .checked_shl(128 - u32::from(self.prefix))
                    .unwrap_or(0);
                u128::from(net) & mask == u128::from(ip) & mask
            }
            _ => false,
        }
    }
}

impl FromStr for Cidr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| format!("'{}' is missing a prefix length", s))?;
        let address =
            IpAddr::from_str(addr).map_err(|_| format!("'{}' is not a valid address", addr))?;
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| format!("'{}' is not a valid prefix length", prefix))?;
        let max = match address {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if prefix > max {
            return Err(format!("prefix /{} exceeds /{}", prefix, max));
        }
        Ok(Self { address, prefix })
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

/// Address `offset` positions after `start`, or None on overflow.
pub fn nth_address(start: Ipv4Addr, offset: u32) -> Option<Ipv4Addr> {
    u32::from(start).checked_add(offset).map(Ipv4Addr::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nb006_parse_v4() {
        let cidr: Cidr = "10.1.0.0/24".parse().unwrap();
        assert_eq!(cidr.prefix(), 24);
        assert_eq!(cidr.to_string(), "10.1.0.0/24");
    }

    #[test]
    fn test_nb006_rejects_malformed() {
        assert!("10.1.0.0".parse::<Cidr>().is_err());
        assert!("10.1.0.0/33".parse::<Cidr>().is_err());
        assert!("web/24".parse::<Cidr>().is_err());
        assert!("10.1.0.0/x".parse::<Cidr>().is_err());
    }

    #[test]
    fn test_nb006_contains() {
        let cidr: Cidr = "10.1.0.0/24".parse().unwrap();
        assert!(cidr.contains("10.1.0.11".parse().unwrap()));
        assert!(!cidr.contains("10.1.1.11".parse().unwrap()));
        assert!(!cidr.contains("::1".parse().unwrap()));
    }

    #[test]
    fn test_nb006_zero_prefix_contains_all() {
        let cidr: Cidr = "0.0.0.0/0".parse().unwrap();
        assert!(cidr.contains("192.168.7.7".parse().unwrap()));
    }

    #[test]
    fn test_nb006_v6_contains() {
        let cidr: Cidr = "fd00::/64".parse().unwrap();
        assert!(cidr.contains("fd00::1".parse().unwrap()));
        assert!(!cidr.contains("fd01::1".parse().unwrap()));
    }

    #[test]
    fn test_nb006_nth_address() {
        let start: Ipv4Addr = "10.1.0.11".parse().unwrap();
        assert_eq!(nth_address(start, 2), Some("10.1.0.13".parse().unwrap()));
        assert_eq!(nth_address(Ipv4Addr::BROADCAST, 1), None);
    }
}
