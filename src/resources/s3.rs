//! NB-017: S3 bucket resource. Bucket names are global and kept as authored.

use crate::core::mapper::{MapContext, ReverseContext};
use crate::core::message::{ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags};
use crate::core::resolver::Named;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Bucket {
    pub name: String,
    pub acl: String,
    pub bucket_location: String,
    pub grantees: Vec<Grantee>,
}

/// Access grant on a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grantee {
    pub id: String,
    #[serde(rename = "type")]
    pub grantee_type: String,
    pub permissions: String,
}

impl Named for S3Bucket {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Item {
    pub name: String,
    pub bucket_uri: String,
    pub acl: String,
    pub bucket_location: String,
    pub grantees: Vec<Grantee>,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

impl Named for S3Item {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for S3Item {
    const KIND: ResourceKind = ResourceKind::S3;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &["acl", "bucket_location", "grantees"];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.bucket_uri = previous.bucket_uri.clone();
        self.provider = ProviderContext::deferred();
        self.exists = true;
    }
}

pub fn map(ctx: &MapContext) -> Vec<S3Item> {
    ctx.definition()
        .s3_buckets
        .iter()
        .map(|b| S3Item {
            name: b.name.clone(),
            tags: ctx.tags(&b.name),
            acl: b.acl.clone(),
            bucket_location: b.bucket_location.clone(),
            grantees: b.grantees.clone(),
            provider: ctx.provider(),
            service: ctx.service_id().to_string(),
            ..Default::default()
        })
        .collect()
}

pub fn unmap(message: &ExecutionMessage, _rev: &ReverseContext) -> Vec<S3Bucket> {
    message
        .s3s
        .items
        .iter()
        .map(|b| S3Bucket {
            name: b.name.clone(),
            acl: b.acl.clone(),
            bucket_location: b.bucket_location.clone(),
            grantees: b.grantees.clone(),
        })
        .collect()
}
