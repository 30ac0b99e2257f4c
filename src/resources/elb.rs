//! NB-016: Elastic load balancer resource.

use crate::core::mapper::{self, MapContext, ReverseContext};
use crate::core::message::{
    deferred_vpc_id, ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags,
};
use crate::core::resolver::Named;
use serde::{Deserialize, Serialize};

/// An authored load balancer. `instances` names instance groups; every member
/// of each group is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Elb {
    pub name: String,
    pub private: bool,
    pub subnets: Vec<String>,
    pub instances: Vec<String>,
    pub security_groups: Vec<String>,
    pub listeners: Vec<Listener>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listener {
    pub from_port: u16,
    pub to_port: u16,
    pub protocol: String,
    pub ssl_cert: String,
}

impl Named for Elb {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElbItem {
    pub name: String,
    pub dns_name: String,
    pub is_private: bool,
    pub networks: Vec<String>,
    pub network_aws_ids: Vec<String>,
    pub instance_names: Vec<String>,
    pub instance_aws_ids: Vec<String>,
    pub security_groups: Vec<String>,
    pub security_group_aws_ids: Vec<String>,
    pub listeners: Vec<Listener>,
    pub tags: Tags,
    #[serde(flatten)]
    pub provider: ProviderContext,
    pub vpc_id: String,
    pub service: String,
    pub status: String,
    pub exists: bool,
}

impl Named for ElbItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for ElbItem {
    const KIND: ResourceKind = ResourceKind::Elb;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &[
        "is_private",
        "networks",
        "instance_names",
        "security_groups",
        "listeners",
    ];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.dns_name = previous.dns_name.clone();
        self.provider = ProviderContext::deferred();
        self.vpc_id = deferred_vpc_id();
        self.exists = true;
    }
}

pub fn map(ctx: &MapContext) -> Vec<ElbItem> {
    ctx.definition()
        .elbs
        .iter()
        .map(|lb| {
            let name = ctx.name(&lb.name);
            let (networks, network_aws_ids) = mapper::split(ctx.network_refs(&lb.subnets));
            let (instance_names, instance_aws_ids) = mapper::split(
                lb.instances
                    .iter()
                    .flat_map(|group| ctx.instance_refs(group, "instance_aws_id"))
                    .collect(),
            );
            let (security_groups, security_group_aws_ids) =
                mapper::split(ctx.firewall_refs(&lb.security_groups));
            ElbItem {
                tags: ctx.tags(&name),
                name,
                is_private: lb.private,
                networks,
                network_aws_ids,
                instance_names,
                instance_aws_ids,
                security_groups,
                security_group_aws_ids,
                listeners: lb.listeners.clone(),
                provider: ctx.provider(),
                vpc_id: ctx.vpc_id(),
                service: ctx.service_id().to_string(),
                ..Default::default()
            }
        })
        .collect()
}

pub fn unmap(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<Elb> {
    message
        .elbs
        .items
        .iter()
        .map(|lb| Elb {
            name: rev.role(&lb.name),
            private: lb.is_private,
            subnets: rev.roles(&lb.networks),
            instances: rev.groups(&lb.instance_names),
            security_groups: rev.roles(&lb.security_groups),
            listeners: lb.listeners.clone(),
        })
        .collect()
}
