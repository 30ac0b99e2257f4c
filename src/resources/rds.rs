//! NB-019: RDS clusters and instances.
//!
//! Clusters are singletons; instances are counted groups and may join a
//! cluster, in which case `cluster` carries the generated cluster name.

use crate::core::mapper::{self, MapContext, ReverseContext};
use crate::core::message::{
    deferred_vpc_id, ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags,
};
use crate::core::resolver::Named;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backups {
    pub window: String,
    pub retention: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    #[serde(rename = "type")]
    pub storage_type: String,
    pub size: u32,
    pub iops: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdsCluster {
    pub name: String,
    pub engine: String,
    pub port: u16,
    pub availability_zones: Vec<String>,
    pub security_groups: Vec<String>,
    pub networks: Vec<String>,
    pub database_name: String,
    pub database_username: String,
    pub database_password: String,
    pub backups: Backups,
    pub maintenance_window: String,
    pub replication_source: String,
    pub final_snapshot: bool,
}

impl Named for RdsCluster {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdsInstance {
    pub name: String,
    pub size: String,
    pub engine: String,
    pub engine_version: String,
    pub port: u16,
    /// Authored name of the cluster this instance joins
    pub cluster: String,
    pub public: bool,
    pub multi_az: bool,
    pub promotion_tier: u32,
    pub storage: Storage,
    pub availability_zone: String,
    pub security_groups: Vec<String>,
    pub networks: Vec<String>,
    pub database_name: String,
    pub database_username: String,
    pub database_password: String,
    pub auto_upgrade: bool,
    pub backups: Backups,
    pub maintenance_window: String,
    pub final_snapshot: bool,
    pub replication_source: String,
    pub license: String,
    pub timezone: String,
    pub count: usize,
}

impl Default for RdsInstance {
    fn default() -> Self {
        Self {
            name: String::new(),
            size: String::new(),
            engine: String::new(),
            engine_version: String::new(),
            port: 0,
            cluster: String::new(),
            public: false,
            multi_az: false,
            promotion_tier: 0,
            storage: Storage::default(),
            availability_zone: String::new(),
            security_groups: Vec::new(),
            networks: Vec::new(),
            database_name: String::new(),
            database_username: String::new(),
            database_password: String::new(),
            auto_upgrade: false,
            backups: Backups::default(),
            maintenance_window: String::new(),
            final_snapshot: false,
            replication_source: String::new(),
            license: String::new(),
            timezone: String::new(),
            count: 1,
        }
    }
}

impl Named for RdsInstance {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdsClusterItem {
    pub name: String,
    pub arn: String,
    pub endpoint: String,
    pub engine: String,
    pub port: u16,
    pub availability_zones: Vec<String>,
    pub security_groups: Vec<String>,
    pub security_group_aws_ids: Vec<String>,
    pub networks: Vec<String>,
    pub network_aws_ids: Vec<String>,
    pub database_name: String,
    pub database_username: String,
    pub database_password: String,
    pub backup_window: String,
    pub backup_retention: u32,
    pub maintenance_window: String,
    pub replication_source: String,
    pub final_snapshot: bool,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub vpc_id: String,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

impl Named for RdsClusterItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for RdsClusterItem {
    const KIND: ResourceKind = ResourceKind::RdsCluster;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &[
        "engine",
        "port",
        "availability_zones",
        "security_groups",
        "networks",
        "database_name",
        "database_username",
        "database_password",
        "backup_window",
        "backup_retention",
        "maintenance_window",
        "replication_source",
        "final_snapshot",
    ];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.arn = previous.arn.clone();
        self.endpoint = previous.endpoint.clone();
        self.provider = ProviderContext::deferred();
        self.vpc_id = deferred_vpc_id();
        self.exists = true;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdsInstanceItem {
    pub name: String,
    pub arn: String,
    pub endpoint: String,
    pub size: String,
    pub engine: String,
    pub engine_version: String,
    pub port: u16,
    pub cluster: String,
    pub public: bool,
    pub multi_az: bool,
    pub promotion_tier: u32,
    pub storage_type: String,
    pub storage_size: u32,
    pub storage_iops: u32,
    pub availability_zone: String,
    pub security_groups: Vec<String>,
    pub security_group_aws_ids: Vec<String>,
    pub networks: Vec<String>,
    pub network_aws_ids: Vec<String>,
    pub database_name: String,
    pub database_username: String,
    pub database_password: String,
    pub auto_upgrade: bool,
    pub backup_window: String,
    pub backup_retention: u32,
    pub maintenance_window: String,
    pub final_snapshot: bool,
    pub replication_source: String,
    pub license: String,
    pub timezone: String,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub vpc_id: String,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

impl Named for RdsInstanceItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for RdsInstanceItem {
    const KIND: ResourceKind = ResourceKind::RdsInstance;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &[
        "size",
        "engine",
        "engine_version",
        "port",
        "cluster",
        "public",
        "multi_az",
        "promotion_tier",
        "storage_type",
        "storage_size",
        "storage_iops",
        "availability_zone",
        "security_groups",
        "networks",
        "database_name",
        "database_username",
        "database_password",
        "auto_upgrade",
        "backup_window",
        "backup_retention",
        "maintenance_window",
        "final_snapshot",
        "license",
        "timezone",
    ];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.arn = previous.arn.clone();
        self.endpoint = previous.endpoint.clone();
        self.provider = ProviderContext::deferred();
        self.vpc_id = deferred_vpc_id();
        self.exists = true;
    }
}

pub fn map_clusters(ctx: &MapContext) -> Vec<RdsClusterItem> {
    ctx.definition()
        .rds_clusters
        .iter()
        .map(|c| {
            let name = ctx.name(&c.name);
            let (security_groups, security_group_aws_ids) =
                mapper::split(ctx.firewall_refs(&c.security_groups));
            let (networks, network_aws_ids) = mapper::split(ctx.network_refs(&c.networks));
            RdsClusterItem {
                tags: ctx.tags(&name),
                name,
                engine: c.engine.clone(),
                port: c.port,
                availability_zones: c.availability_zones.clone(),
                security_groups,
                security_group_aws_ids,
                networks,
                network_aws_ids,
                database_name: c.database_name.clone(),
                database_username: c.database_username.clone(),
                database_password: c.database_password.clone(),
                backup_window: c.backups.window.clone(),
                backup_retention: c.backups.retention,
                maintenance_window: c.maintenance_window.clone(),
                replication_source: c.replication_source.clone(),
                final_snapshot: c.final_snapshot,
                provider: ctx.provider(),
                vpc_id: ctx.vpc_id(),
                service: ctx.service_id().to_string(),
                ..Default::default()
            }
        })
        .collect()
}

pub fn map_instances(ctx: &MapContext) -> Vec<RdsInstanceItem> {
    let mut items = Vec::new();
    for group in &ctx.definition().rds_instances {
        let cluster = ctx
            .rds_cluster_ref(&group.cluster, "arn")
            .map(|r| r.name)
            .unwrap_or_default();
        let (security_groups, security_group_aws_ids) =
            mapper::split(ctx.firewall_refs(&group.security_groups));
        let (networks, network_aws_ids) = mapper::split(ctx.network_refs(&group.networks));

        for index in 1..=group.count {
            let name = ctx.indexed_name(&group.name, index);
            items.push(RdsInstanceItem {
                tags: ctx.tags(&name),
                name,
                size: group.size.clone(),
                engine: group.engine.clone(),
                engine_version: group.engine_version.clone(),
                port: group.port,
                cluster: cluster.clone(),
                public: group.public,
                multi_az: group.multi_az,
                promotion_tier: group.promotion_tier,
                storage_type: group.storage.storage_type.clone(),
                storage_size: group.storage.size,
                storage_iops: group.storage.iops,
                availability_zone: group.availability_zone.clone(),
                security_groups: security_groups.clone(),
                security_group_aws_ids: security_group_aws_ids.clone(),
                networks: networks.clone(),
                network_aws_ids: network_aws_ids.clone(),
                database_name: group.database_name.clone(),
                database_username: group.database_username.clone(),
                database_password: group.database_password.clone(),
                auto_upgrade: group.auto_upgrade,
                backup_window: group.backups.window.clone(),
                backup_retention: group.backups.retention,
                maintenance_window: group.maintenance_window.clone(),
                final_snapshot: group.final_snapshot,
                replication_source: group.replication_source.clone(),
                license: group.license.clone(),
                timezone: group.timezone.clone(),
                provider: ctx.provider(),
                vpc_id: ctx.vpc_id(),
                service: ctx.service_id().to_string(),
                ..Default::default()
            });
        }
    }
    items
}

pub fn unmap_clusters(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<RdsCluster> {
    message
        .rds_clusters
        .items
        .iter()
        .map(|c| RdsCluster {
            name: rev.role(&c.name),
            engine: c.engine.clone(),
            port: c.port,
            availability_zones: c.availability_zones.clone(),
            security_groups: rev.roles(&c.security_groups),
            networks: rev.roles(&c.networks),
            database_name: c.database_name.clone(),
            database_username: c.database_username.clone(),
            database_password: c.database_password.clone(),
            backups: Backups {
                window: c.backup_window.clone(),
                retention: c.backup_retention,
            },
            maintenance_window: c.maintenance_window.clone(),
            replication_source: c.replication_source.clone(),
            final_snapshot: c.final_snapshot,
        })
        .collect()
}

pub fn unmap_instances(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<RdsInstance> {
    rev.regroup(&message.rds_instances.items, |i| i.name.as_str())
        .into_iter()
        .filter_map(|(name, members)| {
            let first = members.first()?;
            Some(RdsInstance {
                name,
                size: first.size.clone(),
                engine: first.engine.clone(),
                engine_version: first.engine_version.clone(),
                port: first.port,
                cluster: if first.cluster.is_empty() {
                    String::new()
                } else {
                    rev.role(&first.cluster)
                },
                public: first.public,
                multi_az: first.multi_az,
                promotion_tier: first.promotion_tier,
                storage: Storage {
                    storage_type: first.storage_type.clone(),
                    size: first.storage_size,
                    iops: first.storage_iops,
                },
                availability_zone: first.availability_zone.clone(),
                security_groups: rev.roles(&first.security_groups),
                networks: rev.roles(&first.networks),
                database_name: first.database_name.clone(),
                database_username: first.database_username.clone(),
                database_password: first.database_password.clone(),
                auto_upgrade: first.auto_upgrade,
                backups: Backups {
                    window: first.backup_window.clone(),
                    retention: first.backup_retention,
                },
                maintenance_window: first.maintenance_window.clone(),
                final_snapshot: first.final_snapshot,
                replication_source: first.replication_source.clone(),
                license: first.license.clone(),
                timezone: first.timezone.clone(),
                count: members.len(),
            })
        })
        .collect()
}
