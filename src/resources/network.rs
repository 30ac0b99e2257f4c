//! NB-012: Network (subnet) resource.

use crate::core::cidr::Cidr;
use crate::core::mapper::{MapContext, ReverseContext};
use crate::core::message::{
    deferred_vpc_id, ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags,
};
use crate::core::resolver::Named;
use crate::core::validator::ValidationError;
use serde::{Deserialize, Serialize};

/// An authored subnet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub name: String,
    /// Address block in CIDR notation
    pub subnet: String,
    /// Routed to an internet gateway
    pub public: bool,
    pub availability_zone: String,
}

impl Network {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::network(&self.name, "name should not be null"));
        }
        self.subnet.parse::<Cidr>().map_err(|e| {
            ValidationError::network(&self.name, format!("subnet is not a valid CIDR: {}", e))
        })?;
        Ok(())
    }
}

impl Named for Network {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkItem {
    pub name: String,
    pub network_aws_id: String,
    pub subnet: String,
    pub is_public: bool,
    pub availability_zone: String,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub vpc_id: String,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

impl Named for NetworkItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for NetworkItem {
    const KIND: ResourceKind = ResourceKind::Network;
    const SIGNIFICANT_FIELDS: &'static [&'static str] =
        &["subnet", "is_public", "availability_zone"];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.network_aws_id = previous.network_aws_id.clone();
        // An authored zone wins over the one the provider picked.
        if self.availability_zone.is_empty() {
            self.availability_zone = previous.availability_zone.clone();
        }
        self.provider = ProviderContext::deferred();
        self.vpc_id = deferred_vpc_id();
        self.exists = true;
    }
}

pub fn map(ctx: &MapContext) -> Vec<NetworkItem> {
    ctx.definition()
        .networks
        .iter()
        .map(|n| {
            let name = ctx.name(&n.name);
            NetworkItem {
                tags: ctx.tags(&name),
                name,
                network_aws_id: String::new(),
                subnet: n.subnet.clone(),
                is_public: n.public,
                availability_zone: n.availability_zone.clone(),
                provider: ctx.provider(),
                vpc_id: ctx.vpc_id(),
                service: ctx.service_id().to_string(),
                status: String::new(),
                exists: false,
            }
        })
        .collect()
}

pub fn unmap(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<Network> {
    message
        .networks
        .items
        .iter()
        .map(|n| Network {
            name: rev.role(&n.name),
            subnet: n.subnet.clone(),
            public: n.is_public,
            availability_zone: n.availability_zone.clone(),
        })
        .collect()
}
