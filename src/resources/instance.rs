//! NB-013: Compute instance resource.
//!
//! An authored instance is a group: `count` members named `{role}-1` ..
//! `{role}-N`, with consecutive private addresses from `start_ip`.

use crate::core::cidr::{self, Cidr};
use crate::core::mapper::{self, MapContext, ReverseContext};
use crate::core::message::{
    deferred_vpc_id, ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags,
};
use crate::core::placeholder::Placeholder;
use crate::core::resolver::Named;
use crate::core::validator::ValidationError;
use crate::resources::network::Network;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// An authored instance group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
    pub name: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub image: String,
    pub count: usize,
    pub network: String,
    /// Address of the first member; the rest follow consecutively
    pub start_ip: String,
    pub key_pair: String,
    pub elastic_ip: bool,
    pub security_groups: Vec<String>,
    pub volumes: Vec<InstanceVolume>,
    pub user_data: String,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            name: String::new(),
            instance_type: String::new(),
            image: String::new(),
            count: 1,
            network: String::new(),
            start_ip: String::new(),
            key_pair: String::new(),
            elastic_ip: false,
            security_groups: Vec::new(),
            volumes: Vec::new(),
            user_data: String::new(),
        }
    }
}

/// EBS volume group attached to every member of an instance group. Member N
/// gets volume N of the group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceVolume {
    pub volume: String,
    pub device: String,
}

impl Instance {
    /// Validate against the network the instance names (None = undeclared).
    pub fn validate(&self, network: Option<&Network>) -> Result<(), ValidationError> {
        let fail = |reason: String| Err(ValidationError::instance(&self.name, reason));

        if self.name.is_empty() {
            return fail("name should not be null".to_string());
        }
        if self.image.is_empty() {
            return fail("image should not be null".to_string());
        }
        if self.instance_type.is_empty() {
            return fail("type should not be null".to_string());
        }
        if self.count < 1 {
            return fail("count should be greater than 0".to_string());
        }
        let Some(network) = network else {
            return fail(format!("network '{}' is not defined", self.network));
        };
        if self.start_ip.is_empty() {
            return Ok(());
        }
        let Ok(start) = self.start_ip.parse::<Ipv4Addr>() else {
            return fail(format!("start_ip '{}' is not a valid IPv4 address", self.start_ip));
        };
        let Ok(subnet) = network.subnet.parse::<Cidr>() else {
            return fail(format!(
                "network '{}' has no valid subnet ({})",
                network.name, network.subnet
            ));
        };
        if !subnet.contains(IpAddr::V4(start)) {
            return fail(format!(
                "start_ip '{}' is not inside network '{}' ({})",
                self.start_ip, network.name, network.subnet
            ));
        }
        match self.member_ip(self.count) {
            Some(last) if subnet.contains(IpAddr::V4(last)) => Ok(()),
            _ => fail(format!(
                "{} members from '{}' do not fit in network '{}' ({})",
                self.count, self.start_ip, network.name, network.subnet
            )),
        }
    }

    /// Private address of the `index`-th (1-based) member.
    pub fn member_ip(&self, index: usize) -> Option<Ipv4Addr> {
        let start: Ipv4Addr = self.start_ip.parse().ok()?;
        let offset = u32::try_from(index.checked_sub(1)?).ok()?;
        cidr::nth_address(start, offset)
    }
}

impl Named for Instance {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceItem {
    pub name: String,
    pub instance_aws_id: String,
    pub instance_type: String,
    pub image: String,
    pub ip: String,
    pub key_pair: String,
    pub user_data: String,
    pub network: String,
    pub network_aws_id: String,
    pub network_is_public: bool,
    pub security_groups: Vec<String>,
    pub security_group_aws_ids: Vec<String>,
    pub assign_elastic_ip: bool,
    pub public_ip: String,
    pub elastic_ip: String,
    pub elastic_ip_aws_id: String,
    pub volumes: Vec<InstanceVolumeItem>,
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
pub struct InstanceVolumeItem {
    pub volume: String,
    pub device: String,
    pub volume_aws_id: String,
}

impl Named for InstanceItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for InstanceItem {
    const KIND: ResourceKind = ResourceKind::Instance;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &[
        "instance_type",
        "image",
        "ip",
        "key_pair",
        "user_data",
        "network",
        "security_groups",
        "assign_elastic_ip",
        "volumes",
    ];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.instance_aws_id = previous.instance_aws_id.clone();
        self.public_ip = previous.public_ip.clone();
        self.elastic_ip = previous.elastic_ip.clone();
        self.elastic_ip_aws_id = previous.elastic_ip_aws_id.clone();
        for volume in &mut self.volumes {
            // Only a provider-assigned id carries; a previous placeholder may
            // point at a position that has since moved.
            let carried = previous
                .volumes
                .iter()
                .find(|v| v.volume == volume.volume)
                .filter(|v| !Placeholder::is_placeholder(&v.volume_aws_id));
            if let Some(old) = carried {
                volume.volume_aws_id = old.volume_aws_id.clone();
            }
        }
        self.provider = ProviderContext::deferred();
        self.vpc_id = deferred_vpc_id();
        self.exists = true;
    }
}

pub fn map(ctx: &MapContext) -> Vec<InstanceItem> {
    let mut items = Vec::new();
    for group in &ctx.definition().instances {
        let network = ctx.network_ref(&group.network);
        let network_is_public = ctx.network(&group.network).is_some_and(|n| n.public);
        let (security_groups, security_group_aws_ids) =
            mapper::split(ctx.firewall_refs(&group.security_groups));

        for index in 1..=group.count {
            let name = ctx.indexed_name(&group.name, index);
            let volumes = group
                .volumes
                .iter()
                .map(|v| {
                    let volume = ctx.ebs_volume_ref(&v.volume, index);
                    InstanceVolumeItem {
                        volume: volume.name,
                        device: v.device.clone(),
                        volume_aws_id: volume.placeholder,
                    }
                })
                .collect();

            items.push(InstanceItem {
                tags: ctx.tags(&name),
                name,
                instance_type: group.instance_type.clone(),
                image: group.image.clone(),
                ip: group
                    .member_ip(index)
                    .map(|ip| ip.to_string())
                    .unwrap_or_default(),
                key_pair: group.key_pair.clone(),
                user_data: group.user_data.clone(),
                network: network.name.clone(),
                network_aws_id: network.placeholder.clone(),
                network_is_public,
                security_groups: security_groups.clone(),
                security_group_aws_ids: security_group_aws_ids.clone(),
                assign_elastic_ip: group.elastic_ip,
                volumes,
                provider: ctx.provider(),
                vpc_id: ctx.vpc_id(),
                service: ctx.service_id().to_string(),
                ..Default::default()
            });
        }
    }
    items
}

pub fn unmap(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<Instance> {
    rev.regroup(&message.instances.items, |i| i.name.as_str())
        .into_iter()
        .filter_map(|(name, members)| {
            let first = members.first()?;
            Some(Instance {
                name,
                instance_type: first.instance_type.clone(),
                image: first.image.clone(),
                count: members.len(),
                network: rev.role(&first.network),
                start_ip: first.ip.clone(),
                key_pair: first.key_pair.clone(),
                elastic_ip: first.assign_elastic_ip,
                security_groups: rev.roles(&first.security_groups),
                volumes: first
                    .volumes
                    .iter()
                    .filter(|v| !v.volume.is_empty())
                    .map(|v| InstanceVolume {
                        volume: rev.group(&v.volume),
                        device: v.device.clone(),
                    })
                    .collect(),
                user_data: first.user_data.clone(),
            })
        })
        .collect()
}
