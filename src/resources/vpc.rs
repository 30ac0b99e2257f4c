//! NB-011: VPC item.
//!
//! Every service maps to exactly one VPC item. When the definition names an
//! existing VPC the item is marked `exists` and carries that id; otherwise the
//! orchestrator creates it from `vpc_subnet`.

use crate::core::mapper::MapContext;
use crate::core::message::{ProviderContext, ResourceItem, ResourceKind, Tags};
use crate::core::resolver::Named;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VpcItem {
    pub name: String,
    pub vpc_id: String,
    pub vpc_subnet: String,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

impl Named for VpcItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for VpcItem {
    const KIND: ResourceKind = ResourceKind::Vpc;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &["vpc_subnet"];

    fn carry_provider_data(&mut self, previous: &Self) {
        if self.vpc_id.is_empty() {
            self.vpc_id = previous.vpc_id.clone();
        }
        self.provider = ProviderContext::deferred();
        self.exists = true;
    }
}

pub fn map(ctx: &MapContext) -> Vec<VpcItem> {
    let def = ctx.definition();
    let name = ctx.name("vpc");
    vec![VpcItem {
        tags: ctx.tags(&name),
        name,
        vpc_id: def.vpc_id.clone(),
        vpc_subnet: def.vpc_subnet.clone(),
        provider: ctx.provider(),
        service: ctx.service_id().to_string(),
        status: String::new(),
        exists: !def.vpc_id.is_empty(),
    }]
}
