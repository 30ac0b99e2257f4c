//! NB-010: Datacenter item.

use crate::core::definition::Datacenter;
use crate::core::mapper::MapContext;
use crate::core::message::{ExecutionMessage, ResourceItem, ResourceKind};
use crate::core::resolver::Named;
use serde::{Deserialize, Serialize};

/// The target datacenter as seen by the orchestrator. Always item 0 of
/// `datacenters`; provider context placeholders point here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatacenterItem {
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub region: String,
    #[serde(rename = "aws_access_key_id")]
    pub access_key_id: String,
    #[serde(rename = "aws_secret_access_key")]
    pub secret_access_key: String,
    pub vpc_id: String,
    pub status: String,
}

impl Named for DatacenterItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for DatacenterItem {
    const KIND: ResourceKind = ResourceKind::Datacenter;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &["type", "region"];

    fn carry_provider_data(&mut self, _previous: &Self) {}
}

pub fn map(ctx: &MapContext) -> Vec<DatacenterItem> {
    let dc = &ctx.payload().datacenter;
    vec![DatacenterItem {
        name: dc.name.clone(),
        provider_type: dc.provider_type.clone(),
        region: dc.region.clone(),
        access_key_id: dc.access_key_id.clone(),
        secret_access_key: dc.secret_access_key.clone(),
        vpc_id: ctx.definition().vpc_id.clone(),
        status: String::new(),
    }]
}

/// Datacenter from the first item; empty when the message has none.
pub fn unmap(message: &ExecutionMessage) -> Datacenter {
    message
        .datacenters
        .items
        .first()
        .map(|dc| Datacenter {
            name: dc.name.clone(),
            provider_type: dc.provider_type.clone(),
            region: dc.region.clone(),
            access_key_id: dc.access_key_id.clone(),
            secret_access_key: dc.secret_access_key.clone(),
        })
        .unwrap_or_default()
}
