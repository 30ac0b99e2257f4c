//! NB-008: Forward and reverse mapping.
//!
//! `convert_payload` projects a validated payload into an execution message;
//! `convert_message` rebuilds a payload from one. The per-kind work lives in
//! `resources::*::{map, unmap}`; this module owns the shared naming,
//! reference and regrouping rules.
//!
//! Forward mapping assumes validated input. A reference that does not
//! resolve maps to an empty string (scalar) or is left out (list).

use super::definition::{Client, Definition, Payload};
use super::message::{deferred_vpc_id, ExecutionMessage, ProviderContext, Tags};
use super::placeholder::Placeholder;
use super::resolver::{GroupSlots, NameIndex};
use crate::resources::elb::Elb;
use crate::resources::firewall::SecurityGroup;
use crate::resources::network::Network;
use crate::resources::rds::RdsCluster;
use crate::resources::{
    datacenter, ebs, elb, firewall, instance, nat, network, rds, route53, s3, vpc,
};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Tag carrying the generated resource name.
pub const TAG_NAME: &str = "Name";

/// Tag carrying the owning service name.
pub const TAG_SERVICE: &str = "ernest.service";

/// Project a payload into an execution message.
pub fn convert_payload(payload: &Payload) -> ExecutionMessage {
    let ctx = MapContext::new(payload);

    let message = ExecutionMessage {
        id: payload.service_id.clone(),
        service: payload.service_id.clone(),
        service_name: payload.service.name.clone(),
        client_name: payload.client.name.clone(),
        provider_type: payload.datacenter.provider_type.clone(),
        datacenters: datacenter::map(&ctx).into(),
        vpcs: vpc::map(&ctx).into(),
        networks: network::map(&ctx).into(),
        instances: instance::map(&ctx).into(),
        firewalls: firewall::map(&ctx).into(),
        nats: nat::map(&ctx).into(),
        elbs: elb::map(&ctx).into(),
        s3s: s3::map(&ctx).into(),
        route53s: route53::map(&ctx).into(),
        rds_clusters: rds::map_clusters(&ctx).into(),
        rds_instances: rds::map_instances(&ctx).into(),
        ebs_volumes: ebs::map(&ctx).into(),
    };

    info!(
        service = %payload.service.name,
        items = message.item_count(),
        "payload mapped"
    );
    message
}

/// Rebuild a payload from an execution message.
pub fn convert_message(message: &ExecutionMessage) -> Payload {
    let datacenter = datacenter::unmap(message);
    let service_datacenter = naming_datacenter(message, &datacenter.name);
    let rev = ReverseContext::new(message, &service_datacenter);

    let (vpc_id, vpc_subnet) = message
        .vpcs
        .items
        .first()
        .map(|v| (v.vpc_id.clone(), v.vpc_subnet.clone()))
        .unwrap_or_default();

    let service = Definition {
        name: message.service_name.clone(),
        datacenter: service_datacenter,
        vpc_id,
        vpc_subnet,
        networks: network::unmap(message, &rev),
        instances: instance::unmap(message, &rev),
        security_groups: firewall::unmap(message, &rev),
        nat_gateways: nat::unmap(message, &rev),
        elbs: elb::unmap(message, &rev),
        s3_buckets: s3::unmap(message, &rev),
        route53_zones: route53::unmap(message, &rev),
        rds_clusters: rds::unmap_clusters(message, &rev),
        rds_instances: rds::unmap_instances(message, &rev),
        ebs_volumes: ebs::unmap(message, &rev),
        ..Default::default()
    };

    info!(service = %service.name, "message converted");

    Payload {
        service_id: message.service.clone(),
        service,
        client: Client {
            name: message.client_name.clone(),
        },
        datacenter,
    }
}

/// Datacenter the generated names were built from. The VPC item is always
/// named `{datacenter}-{service}-vpc`; the datacenter item only stands in
/// when a message carries no VPC.
fn naming_datacenter(message: &ExecutionMessage, fallback: &str) -> String {
    let suffix = format!("-{}-vpc", message.service_name);
    message
        .vpcs
        .items
        .first()
        .and_then(|v| v.name.strip_suffix(suffix.as_str()))
        .unwrap_or(fallback)
        .to_string()
}

// ============================================================================
// Forward context
// ============================================================================

/// A mapped cross-reference: the sibling's generated name and a placeholder
/// for one of its provider attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub placeholder: String,
}

impl Reference {
    fn resolved(name: String, collection: &str, position: usize, field: &str) -> Self {
        Self {
            name,
            placeholder: Placeholder::new(collection, position, field).to_string(),
        }
    }
}

/// Split references into parallel name and placeholder lists.
pub fn split(references: Vec<Reference>) -> (Vec<String>, Vec<String>) {
    references
        .into_iter()
        .map(|r| (r.name, r.placeholder))
        .unzip()
}

/// Everything a per-kind mapper needs: the payload, naming rules and name
/// indexes over the authored collections.
pub struct MapContext<'a> {
    payload: &'a Payload,
    prefix: String,
    networks: NameIndex<'a, Network>,
    security_groups: NameIndex<'a, SecurityGroup>,
    elbs: NameIndex<'a, Elb>,
    rds_clusters: NameIndex<'a, RdsCluster>,
    instances: GroupSlots<'a>,
    rds_instances: GroupSlots<'a>,
    ebs_volumes: GroupSlots<'a>,
}

impl<'a> MapContext<'a> {
    pub fn new(payload: &'a Payload) -> Self {
        let def = &payload.service;
        let ctx = Self {
            payload,
            prefix: def.generated_prefix(),
            networks: NameIndex::new(&def.networks),
            security_groups: NameIndex::new(&def.security_groups),
            elbs: NameIndex::new(&def.elbs),
            rds_clusters: NameIndex::new(&def.rds_clusters),
            instances: GroupSlots::new(def.instances.iter().map(|i| (i.name.as_str(), i.count))),
            rds_instances: GroupSlots::new(
                def.rds_instances
                    .iter()
                    .map(|i| (i.name.as_str(), i.count)),
            ),
            ebs_volumes: GroupSlots::new(
                def.ebs_volumes.iter().map(|v| (v.name.as_str(), v.count)),
            ),
        };
        debug!(prefix = %ctx.prefix, "map context built");
        ctx
    }

    pub fn payload(&self) -> &'a Payload {
        self.payload
    }

    pub fn definition(&self) -> &'a Definition {
        &self.payload.service
    }

    /// Service identifier stamped on every item.
    pub fn service_id(&self) -> &str {
        &self.payload.service_id
    }

    /// `{datacenter}-{service}-`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generated name of a singleton: `{datacenter}-{service}-{role}`.
    pub fn name(&self, role: &str) -> String {
        format!("{}{}", self.prefix, role)
    }

    /// Generated name of a counted member: `{datacenter}-{service}-{role}-{index}`.
    pub fn indexed_name(&self, role: &str, index: usize) -> String {
        format!("{}{}-{}", self.prefix, role, index)
    }

    /// `Name` plus `ernest.service`.
    pub fn tags(&self, name: &str) -> Tags {
        let mut tags = IndexMap::new();
        tags.insert(TAG_NAME.to_string(), name.to_string());
        tags.insert(TAG_SERVICE.to_string(), self.definition().name.clone());
        tags
    }

    /// Literal provider context from the payload datacenter.
    pub fn provider(&self) -> ProviderContext {
        let dc = &self.payload.datacenter;
        ProviderContext {
            datacenter_type: dc.provider_type.clone(),
            datacenter_name: dc.name.clone(),
            datacenter_region: dc.region.clone(),
            access_key_id: dc.access_key_id.clone(),
            secret_access_key: dc.secret_access_key.clone(),
        }
    }

    /// The authored VPC id, or a placeholder into the VPC item when the VPC
    /// is created by this service.
    pub fn vpc_id(&self) -> String {
        let authored = &self.definition().vpc_id;
        if authored.is_empty() {
            deferred_vpc_id()
        } else {
            authored.clone()
        }
    }

    /// Authored network by name.
    pub fn network(&self, name: &str) -> Option<&'a Network> {
        self.networks.get(name)
    }

    /// Reference to a network's `network_aws_id`.
    pub fn network_ref(&self, name: &str) -> Reference {
        self.networks
            .position(name)
            .map(|p| Reference::resolved(self.name(name), "networks", p, "network_aws_id"))
            .unwrap_or_default()
    }

    /// References to several networks, unresolved names left out.
    pub fn network_refs(&self, names: &[String]) -> Vec<Reference> {
        names
            .iter()
            .filter(|n| self.networks.contains(n.as_str()))
            .map(|n| self.network_ref(n))
            .collect()
    }

    /// Reference to a firewall's `security_group_aws_id`.
    pub fn firewall_ref(&self, name: &str) -> Reference {
        self.security_groups
            .position(name)
            .map(|p| Reference::resolved(self.name(name), "firewalls", p, "security_group_aws_id"))
            .unwrap_or_default()
    }

    /// References to several firewalls, unresolved names left out.
    pub fn firewall_refs(&self, names: &[String]) -> Vec<Reference> {
        names
            .iter()
            .filter(|n| self.security_groups.contains(n.as_str()))
            .map(|n| self.firewall_ref(n))
            .collect()
    }

    /// Reference to an ELB attribute.
    pub fn elb_ref(&self, name: &str, field: &str) -> Option<Reference> {
        self.elbs
            .position(name)
            .map(|p| Reference::resolved(self.name(name), "elbs", p, field))
    }

    /// Reference to an RDS cluster attribute.
    pub fn rds_cluster_ref(&self, name: &str, field: &str) -> Option<Reference> {
        self.rds_clusters
            .position(name)
            .map(|p| Reference::resolved(self.name(name), "rds_clusters", p, field))
    }

    /// References to every member of an instance group.
    pub fn instance_refs(&self, group: &str, field: &str) -> Vec<Reference> {
        self.members(&self.instances, group, "instances", field)
    }

    /// References to every member of an RDS instance group.
    pub fn rds_instance_refs(&self, group: &str, field: &str) -> Vec<Reference> {
        self.members(&self.rds_instances, group, "rds_instances", field)
    }

    /// Reference to the `index`-th (1-based) member of an EBS volume group.
    pub fn ebs_volume_ref(&self, group: &str, index: usize) -> Reference {
        self.ebs_volumes
            .member(group, index)
            .map(|p| {
                Reference::resolved(
                    self.indexed_name(group, index),
                    "ebs_volumes",
                    p,
                    "volume_aws_id",
                )
            })
            .unwrap_or_default()
    }

    fn members(
        &self,
        slots: &GroupSlots<'_>,
        group: &str,
        collection: &str,
        field: &str,
    ) -> Vec<Reference> {
        slots
            .range(group)
            .map(|range| {
                range
                    .enumerate()
                    .map(|(k, p)| {
                        Reference::resolved(self.indexed_name(group, k + 1), collection, p, field)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Reverse context
// ============================================================================

/// Naming rules run backwards: strip the service prefix and member indexes.
pub struct ReverseContext<'a> {
    message: &'a ExecutionMessage,
    prefix: String,
}

impl<'a> ReverseContext<'a> {
    pub fn new(message: &'a ExecutionMessage, datacenter: &str) -> Self {
        Self {
            message,
            prefix: format!("{}-{}-", datacenter, message.service_name),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Authored name of a singleton. Names without the prefix pass through.
    pub fn role(&self, name: &str) -> String {
        name.strip_prefix(self.prefix.as_str())
            .unwrap_or(name)
            .to_string()
    }

    /// Authored group name of a counted member (`-{index}` stripped).
    pub fn group(&self, name: &str) -> String {
        let role = self.role(name);
        match role.rsplit_once('-') {
            Some((group, index)) if !group.is_empty() && index.parse::<usize>().is_ok() => {
                group.to_string()
            }
            _ => role,
        }
    }

    pub fn roles(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|n| !n.is_empty())
            .map(|n| self.role(n))
            .collect()
    }

    /// Distinct group names, in order of first appearance.
    pub fn groups(&self, names: &[String]) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for name in names.iter().filter(|n| !n.is_empty()) {
            let group = self.group(name);
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Members of counted items grouped by authored name, in order of first
    /// appearance. The group size is the authored count.
    pub fn regroup<'i, T>(
        &self,
        items: &'i [T],
        name: impl Fn(&T) -> &str,
    ) -> IndexMap<String, Vec<&'i T>> {
        let mut groups: IndexMap<String, Vec<&'i T>> = IndexMap::new();
        for item in items {
            groups.entry(self.group(name(item))).or_default().push(item);
        }
        groups
    }

    /// Authored name of the sibling a placeholder points at, together with
    /// the placeholder's collection. None for literals and dangling indexes.
    pub fn referent(&self, value: &str) -> Option<(String, String)> {
        let placeholder = Placeholder::parse(value).ok()?;
        let m = self.message;
        let i = placeholder.index;
        let name = match placeholder.collection.as_str() {
            "instances" => self.group(&m.instances.items.get(i)?.name),
            "rds_instances" => self.group(&m.rds_instances.items.get(i)?.name),
            "elbs" => self.role(&m.elbs.items.get(i)?.name),
            "rds_clusters" => self.role(&m.rds_clusters.items.get(i)?.name),
            "networks" => self.role(&m.networks.items.get(i)?.name),
            "firewalls" => self.role(&m.firewalls.items.get(i)?.name),
            _ => return None,
        };
        Some((placeholder.collection, name))
    }
}
