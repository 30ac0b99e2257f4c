//! NB-020: EBS volume resource. Volumes are counted groups; instance N of a
//! group that attaches a volume group gets volume N.

use crate::core::mapper::{MapContext, ReverseContext};
use crate::core::message::{ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags};
use crate::core::resolver::Named;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EbsVolume {
    pub name: String,
    #[serde(rename = "type")]
    pub volume_type: String,
    pub size: u32,
    pub iops: u32,
    pub availability_zone: String,
    pub encrypted: bool,
    pub encryption_key_id: String,
    pub count: usize,
}

impl Default for EbsVolume {
    fn default() -> Self {
        Self {
            name: String::new(),
            volume_type: String::new(),
            size: 0,
            iops: 0,
            availability_zone: String::new(),
            encrypted: false,
            encryption_key_id: String::new(),
            count: 1,
        }
    }
}

impl Named for EbsVolume {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EbsVolumeItem {
    pub name: String,
    pub volume_aws_id: String,
    pub volume_type: String,
    pub size: u32,
    pub iops: u32,
    pub availability_zone: String,
    pub encrypted: bool,
    pub encryption_key_id: String,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

impl Named for EbsVolumeItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for EbsVolumeItem {
    const KIND: ResourceKind = ResourceKind::EbsVolume;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &[
        "volume_type",
        "size",
        "iops",
        "availability_zone",
        "encrypted",
        "encryption_key_id",
    ];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.volume_aws_id = previous.volume_aws_id.clone();
        self.provider = ProviderContext::deferred();
        self.exists = true;
    }
}

pub fn map(ctx: &MapContext) -> Vec<EbsVolumeItem> {
    let mut items = Vec::new();
    for group in &ctx.definition().ebs_volumes {
        for index in 1..=group.count {
            let name = ctx.indexed_name(&group.name, index);
            items.push(EbsVolumeItem {
                tags: ctx.tags(&name),
                name,
                volume_type: group.volume_type.clone(),
                size: group.size,
                iops: group.iops,
                availability_zone: group.availability_zone.clone(),
                encrypted: group.encrypted,
                encryption_key_id: group.encryption_key_id.clone(),
                provider: ctx.provider(),
                service: ctx.service_id().to_string(),
                ..Default::default()
            });
        }
    }
    items
}

pub fn unmap(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<EbsVolume> {
    rev.regroup(&message.ebs_volumes.items, |v| v.name.as_str())
        .into_iter()
        .filter_map(|(name, members)| {
            let first = members.first()?;
            Some(EbsVolume {
                name,
                volume_type: first.volume_type.clone(),
                size: first.size,
                iops: first.iops,
                availability_zone: first.availability_zone.clone(),
                encrypted: first.encrypted,
                encryption_key_id: first.encryption_key_id.clone(),
                count: members.len(),
            })
        })
        .collect()
}
