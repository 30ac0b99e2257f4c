//! NB-018: Route53 hosted zone resource.
//!
//! Record values may point at other resources of the service. Those become
//! placeholders into the referenced items: instance addresses (`ip` in
//! private zones, `public_ip` otherwise), ELB `dns_name`, RDS `endpoint`.
//! The referenced items' names travel alongside as `targets`; change
//! detection compares those instead of the positional placeholders.

use crate::core::detector;
use crate::core::mapper::{self, MapContext, Reference, ReverseContext};
use crate::core::message::{
    deferred_vpc_id, ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags,
};
use crate::core::placeholder::Placeholder;
use crate::core::resolver::Named;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route53Zone {
    pub name: String,
    pub private: bool,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub entry: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub values: Vec<String>,
    pub ttl: u32,
    /// Instance groups whose addresses are added to `values`
    pub instances: Vec<String>,
    pub loadbalancers: Vec<String>,
    pub rds_clusters: Vec<String>,
    pub rds_instances: Vec<String>,
}

impl Named for Route53Zone {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route53Item {
    pub name: String,
    pub hosted_zone_id: String,
    pub private: bool,
    pub records: Vec<RecordItem>,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub vpc_id: String,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordItem {
    pub entry: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub values: Vec<String>,
    pub ttl: u32,
    /// Generated names of the items behind the placeholder values
    pub targets: Vec<String>,
}

impl Named for Route53Item {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for Route53Item {
    const KIND: ResourceKind = ResourceKind::Route53;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &["private", "records"];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.hosted_zone_id = previous.hosted_zone_id.clone();
        self.provider = ProviderContext::deferred();
        self.vpc_id = deferred_vpc_id();
        self.exists = true;
    }

    fn changed_fields(&self, previous: &Self) -> Vec<&'static str> {
        detector::changed_fields(&self.authored(), &previous.authored())
    }
}

impl Route53Item {
    /// Copy without placeholder values. Positions move whenever an earlier
    /// sibling is added or removed; `targets` still names what they point at.
    fn authored(&self) -> Self {
        let mut item = self.clone();
        for record in &mut item.records {
            record.values.retain(|v| !Placeholder::is_placeholder(v));
        }
        item
    }
}

fn map_record(ctx: &MapContext, zone: &Route53Zone, record: &Record) -> RecordItem {
    let address = if zone.private { "ip" } else { "public_ip" };

    let mut refs: Vec<Reference> = Vec::new();
    for group in &record.instances {
        refs.extend(ctx.instance_refs(group, address));
    }
    refs.extend(
        record
            .loadbalancers
            .iter()
            .filter_map(|lb| ctx.elb_ref(lb, "dns_name")),
    );
    refs.extend(
        record
            .rds_clusters
            .iter()
            .filter_map(|c| ctx.rds_cluster_ref(c, "endpoint")),
    );
    for group in &record.rds_instances {
        refs.extend(ctx.rds_instance_refs(group, "endpoint"));
    }

    let (targets, placeholders) = mapper::split(refs);
    let mut values = record.values.clone();
    values.extend(placeholders);

    RecordItem {
        entry: record.entry.clone(),
        record_type: record.record_type.clone(),
        values,
        ttl: record.ttl,
        targets,
    }
}

pub fn map(ctx: &MapContext) -> Vec<Route53Item> {
    ctx.definition()
        .route53_zones
        .iter()
        .map(|zone| Route53Item {
            name: zone.name.clone(),
            tags: ctx.tags(&zone.name),
            private: zone.private,
            records: zone
                .records
                .iter()
                .map(|r| map_record(ctx, zone, r))
                .collect(),
            provider: ctx.provider(),
            vpc_id: ctx.vpc_id(),
            service: ctx.service_id().to_string(),
            ..Default::default()
        })
        .collect()
}

fn push_unique(list: &mut Vec<String>, name: String) {
    if !list.contains(&name) {
        list.push(name);
    }
}

fn unmap_record(rev: &ReverseContext, record: &RecordItem) -> Record {
    let mut out = Record {
        entry: record.entry.clone(),
        record_type: record.record_type.clone(),
        ttl: record.ttl,
        ..Default::default()
    };
    for value in &record.values {
        if !Placeholder::is_placeholder(value) {
            out.values.push(value.clone());
            continue;
        }
        let Some((collection, name)) = rev.referent(value) else {
            continue;
        };
        match collection.as_str() {
            "instances" => push_unique(&mut out.instances, name),
            "elbs" => push_unique(&mut out.loadbalancers, name),
            "rds_clusters" => push_unique(&mut out.rds_clusters, name),
            "rds_instances" => push_unique(&mut out.rds_instances, name),
            _ => {}
        }
    }
    out
}

pub fn unmap(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<Route53Zone> {
    message
        .route53s
        .items
        .iter()
        .map(|zone| Route53Zone {
            name: zone.name.clone(),
            private: zone.private,
            records: zone.records.iter().map(|r| unmap_record(rev, r)).collect(),
        })
        .collect()
}
