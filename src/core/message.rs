//! NB-002: Execution message — the orchestrator-facing representation.
//!
//! One message per service apply. Every resource kind lives in its own
//! `{ "items": [...] }` collection; items reference each other by generated
//! name and by `$(collection.items.N.field)` placeholders.

use super::detector;
use super::placeholder::Placeholder;
use super::resolver::Named;
use crate::resources::datacenter::DatacenterItem;
use crate::resources::ebs::EbsVolumeItem;
use crate::resources::elb::ElbItem;
use crate::resources::firewall::FirewallItem;
use crate::resources::instance::InstanceItem;
use crate::resources::nat::NatItem;
use crate::resources::network::NetworkItem;
use crate::resources::rds::{RdsClusterItem, RdsInstanceItem};
use crate::resources::route53::Route53Item;
use crate::resources::s3::S3Item;
use crate::resources::vpc::VpcItem;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource tags, in insertion order (`Name` first).
pub type Tags = IndexMap<String, String>;

/// Full execution message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionMessage {
    /// Execution identifier
    pub id: String,
    /// Service identifier
    pub service: String,
    /// Human-readable service name
    pub service_name: String,
    /// Owning client
    pub client_name: String,
    /// Provider type of the datacenter
    #[serde(rename = "type")]
    pub provider_type: String,

    pub datacenters: Collection<DatacenterItem>,
    pub vpcs: Collection<VpcItem>,
    pub networks: Collection<NetworkItem>,
    pub instances: Collection<InstanceItem>,
    pub firewalls: Collection<FirewallItem>,
    pub nats: Collection<NatItem>,
    pub elbs: Collection<ElbItem>,
    pub s3s: Collection<S3Item>,
    pub route53s: Collection<Route53Item>,
    pub rds_clusters: Collection<RdsClusterItem>,
    pub rds_instances: Collection<RdsInstanceItem>,
    pub ebs_volumes: Collection<EbsVolumeItem>,
}

impl ExecutionMessage {
    /// Total number of resource items across all collections.
    pub fn item_count(&self) -> usize {
        self.datacenters.len()
            + self.vpcs.len()
            + self.networks.len()
            + self.instances.len()
            + self.firewalls.len()
            + self.nats.len()
            + self.elbs.len()
            + self.s3s.len()
            + self.route53s.len()
            + self.rds_clusters.len()
            + self.rds_instances.len()
            + self.ebs_volumes.len()
    }
}

/// An ordered `{ "items": [...] }` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

// ============================================================================
// Provider context
// ============================================================================

/// Datacenter and credential fields carried by every resource item.
///
/// Forward mapping fills these with literal values from the payload; the
/// provider-data merge replaces them with placeholders into the first
/// datacenter item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderContext {
    pub datacenter_type: String,
    pub datacenter_name: String,
    pub datacenter_region: String,
    #[serde(rename = "aws_access_key_id")]
    pub access_key_id: String,
    #[serde(rename = "aws_secret_access_key")]
    pub secret_access_key: String,
}

impl ProviderContext {
    /// Placeholders into `datacenters.items.0`.
    pub fn deferred() -> Self {
        Self {
            datacenter_type: Placeholder::datacenter("type").to_string(),
            datacenter_name: Placeholder::datacenter("name").to_string(),
            datacenter_region: Placeholder::datacenter("region").to_string(),
            access_key_id: Placeholder::datacenter("aws_access_key_id").to_string(),
            secret_access_key: Placeholder::datacenter("aws_secret_access_key").to_string(),
        }
    }

    /// True once every field has been deferred.
    pub fn is_deferred(&self) -> bool {
        [
            &self.datacenter_type,
            &self.datacenter_name,
            &self.datacenter_region,
            &self.access_key_id,
            &self.secret_access_key,
        ]
        .iter()
        .all(|v| Placeholder::is_placeholder(v))
    }
}

/// Placeholder for the service VPC identifier.
pub fn deferred_vpc_id() -> String {
    Placeholder::vpc("vpc_id").to_string()
}

// ============================================================================
// Resource kinds
// ============================================================================

/// Resource kind — one per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Datacenter,
    Vpc,
    Network,
    Instance,
    Firewall,
    Nat,
    Elb,
    S3,
    Route53,
    RdsCluster,
    RdsInstance,
    EbsVolume,
}

impl ResourceKind {
    /// Collection key inside the execution message.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Datacenter => "datacenters",
            Self::Vpc => "vpcs",
            Self::Network => "networks",
            Self::Instance => "instances",
            Self::Firewall => "firewalls",
            Self::Nat => "nats",
            Self::Elb => "elbs",
            Self::S3 => "s3s",
            Self::Route53 => "route53s",
            Self::RdsCluster => "rds_clusters",
            Self::RdsInstance => "rds_instances",
            Self::EbsVolume => "ebs_volumes",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Datacenter => write!(f, "datacenter"),
            Self::Vpc => write!(f, "vpc"),
            Self::Network => write!(f, "network"),
            Self::Instance => write!(f, "instance"),
            Self::Firewall => write!(f, "firewall"),
            Self::Nat => write!(f, "nat"),
            Self::Elb => write!(f, "elb"),
            Self::S3 => write!(f, "s3"),
            Self::Route53 => write!(f, "route53"),
            Self::RdsCluster => write!(f, "rds_cluster"),
            Self::RdsInstance => write!(f, "rds_instance"),
            Self::EbsVolume => write!(f, "ebs_volume"),
        }
    }
}

/// A mergeable, diffable resource item.
pub trait ResourceItem: Named + Serialize {
    /// Kind of this item.
    const KIND: ResourceKind;

    /// Author-controlled fields whose change requires an update. Provider-only
    /// fields (identifiers, allocated addresses, credentials) never appear here.
    const SIGNIFICANT_FIELDS: &'static [&'static str];

    /// Copy provider-assigned attributes from the previously applied item with
    /// the same name and defer datacenter/VPC fields to placeholders.
    fn carry_provider_data(&mut self, previous: &Self);

    /// Significant fields that differ from `previous`.
    fn changed_fields(&self, previous: &Self) -> Vec<&'static str> {
        detector::changed_fields(self, previous)
    }

    /// True if an update is required to go from `previous` to `self`.
    fn has_changed(&self, previous: &Self) -> bool {
        !self.changed_fields(previous).is_empty()
    }
}
