//! NB-007: Deferred-resolution placeholders.
//!
//! A placeholder is a dotted path into the same execution message:
//!
//! ```text
//! $(<collection>.items.<index>.<field>)
//! ```
//!
//! `collection` and `field` are lowercase identifiers (`[a-z0-9_]+`), `index`
//! is a zero-based decimal position in the collection's `items`. The
//! orchestrator substitutes the referenced value once the sibling resource is
//! materialized; nothing in this crate resolves placeholders.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Collection key of the datacenter items.
pub const DATACENTERS: &str = "datacenters";

/// Collection key of the VPC items.
pub const VPCS: &str = "vpcs";

/// A parsed `$(collection.items.N.field)` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub collection: String,
    pub index: usize,
    pub field: String,
}

impl Placeholder {
    pub fn new(collection: &str, index: usize, field: &str) -> Self {
        Self {
            collection: collection.to_string(),
            index,
            field: field.to_string(),
        }
    }

    /// Attribute of the first datacenter item.
    pub fn datacenter(field: &str) -> Self {
        Self::new(DATACENTERS, 0, field)
    }

    /// Attribute of the first VPC item.
    pub fn vpc(field: &str) -> Self {
        Self::new(VPCS, 0, field)
    }

    /// Parse a placeholder string.
    pub fn parse(s: &str) -> Result<Self> {
        let path = s
            .strip_prefix("$(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| Error::placeholder(format!("'{}' is not wrapped in $(...)", s)))?;

        let parts: Vec<&str> = path.splitn(4, '.').collect();
        if parts.len() != 4 || parts[1] != "items" {
            return Err(Error::placeholder(format!(
                "'{}' must look like $(collection.items.N.field)",
                s
            )));
        }
        if !is_identifier(parts[0]) {
            return Err(Error::placeholder(format!("bad collection '{}'", parts[0])));
        }
        let index = parts[2]
            .parse::<usize>()
            .map_err(|_| Error::placeholder(format!("bad index '{}'", parts[2])))?;
        if !is_identifier(parts[3]) {
            return Err(Error::placeholder(format!("bad field '{}'", parts[3])));
        }

        Ok(Self::new(parts[0], index, parts[3]))
    }

    /// True if `s` has placeholder syntax.
    pub fn is_placeholder(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$({}.items.{}.{})", self.collection, self.index, self.field)
    }
}

impl FromStr for Placeholder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
