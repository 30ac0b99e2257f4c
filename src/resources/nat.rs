//! NB-015: NAT gateway resource.

use crate::core::mapper::{self, MapContext, ReverseContext};
use crate::core::message::{
    deferred_vpc_id, ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags,
};
use crate::core::resolver::{NameIndex, Named};
use crate::core::validator::ValidationError;
use crate::resources::network::Network;
use serde::{Deserialize, Serialize};

/// An authored NAT gateway: lives in a public network and routes outbound
/// traffic for private ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatGateway {
    pub name: String,
    pub public_network: String,
    pub routed_networks: Vec<String>,
}

impl NatGateway {
    pub fn validate(&self, networks: &NameIndex<'_, Network>) -> Result<(), ValidationError> {
        let fail = |reason: String| Err(ValidationError::nat_gateway(&self.name, reason));

        if self.name.is_empty() {
            return fail("name should not be null".to_string());
        }
        if self.public_network.is_empty() {
            return fail("public network should not be null".to_string());
        }
        match networks.get(&self.public_network) {
            None => {
                return fail(format!(
                    "public network '{}' is not defined",
                    self.public_network
                ))
            }
            Some(n) if !n.public => {
                return fail(format!("network '{}' is not public", self.public_network))
            }
            Some(_) => {}
        }
        if let Some(missing) = self
            .routed_networks
            .iter()
            .find(|n| !networks.contains(n.as_str()))
        {
            return fail(format!("routed network '{}' is not defined", missing));
        }
        Ok(())
    }
}

impl Named for NatGateway {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatItem {
    pub name: String,
    pub nat_gateway_aws_id: String,
    pub public_network: String,
    pub public_network_aws_id: String,
    pub routed_networks: Vec<String>,
    pub routed_networks_aws_ids: Vec<String>,
    pub nat_gateway_allocation_id: String,
    pub nat_gateway_allocation_ip: String,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub vpc_id: String,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

impl Named for NatItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for NatItem {
    const KIND: ResourceKind = ResourceKind::Nat;
    // Order matters: a reordered route list is an update.
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &["routed_networks"];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.nat_gateway_aws_id = previous.nat_gateway_aws_id.clone();
        self.nat_gateway_allocation_id = previous.nat_gateway_allocation_id.clone();
        self.nat_gateway_allocation_ip = previous.nat_gateway_allocation_ip.clone();
        self.provider = ProviderContext::deferred();
        self.vpc_id = deferred_vpc_id();
        self.exists = true;
    }
}

pub fn map(ctx: &MapContext) -> Vec<NatItem> {
    ctx.definition()
        .nat_gateways
        .iter()
        .map(|gw| {
            let name = ctx.name(&gw.name);
            let public = ctx.network_ref(&gw.public_network);
            let (routed_networks, routed_networks_aws_ids) =
                mapper::split(ctx.network_refs(&gw.routed_networks));
            NatItem {
                tags: ctx.tags(&name),
                name,
                public_network: public.name,
                public_network_aws_id: public.placeholder,
                routed_networks,
                routed_networks_aws_ids,
                provider: ctx.provider(),
                vpc_id: ctx.vpc_id(),
                service: ctx.service_id().to_string(),
                ..Default::default()
            }
        })
        .collect()
}

pub fn unmap(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<NatGateway> {
    message
        .nats
        .items
        .iter()
        .map(|nat| NatGateway {
            name: rev.role(&nat.name),
            public_network: rev.role(&nat.public_network),
            routed_networks: rev.roles(&nat.routed_networks),
        })
        .collect()
}
