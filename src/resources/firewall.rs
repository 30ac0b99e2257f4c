//! NB-014: Security group (firewall) resource.

use crate::core::cidr::Cidr;
use crate::core::mapper::{MapContext, ReverseContext};
use crate::core::message::{
    deferred_vpc_id, ExecutionMessage, ProviderContext, ResourceItem, ResourceKind, Tags,
};
use crate::core::resolver::{NameIndex, Named};
use crate::core::validator::ValidationError;
use crate::resources::network::Network;
use serde::{Deserialize, Deserializer, Serialize};

/// Protocols a rule may name. `-1` means all.
pub const PROTOCOLS: &[&str] = &["tcp", "udp", "icmp", "-1"];

/// An authored security group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroup {
    pub name: String,
    pub rules: Rules,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub ingress: Vec<Rule>,
    pub egress: Vec<Rule>,
}

/// One rule. `ip` is a CIDR literal or the name of a declared network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub ip: String,
    pub from_port: u16,
    pub to_port: u16,
    #[serde(deserialize_with = "text_or_number")]
    pub protocol: String,
}

// `protocol: -1` is written unquoted as often as not.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

impl SecurityGroup {
    pub fn validate(&self, networks: &NameIndex<'_, Network>) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::security_group(
                &self.name,
                "name should not be null",
            ));
        }
        for (direction, rules) in [("ingress", &self.rules.ingress), ("egress", &self.rules.egress)]
        {
            for rule in rules {
                rule.validate(networks)
                    .map_err(|reason| {
                        ValidationError::security_group(
                            &self.name,
                            format!("{} rule: {}", direction, reason),
                        )
                    })?;
            }
        }
        Ok(())
    }
}

impl Rule {
    fn validate(&self, networks: &NameIndex<'_, Network>) -> Result<(), String> {
        if !PROTOCOLS.contains(&self.protocol.as_str()) {
            return Err(format!(
                "protocol '{}' is not one of {}",
                self.protocol,
                PROTOCOLS.join(", ")
            ));
        }
        if self.from_port > self.to_port {
            return Err(format!(
                "from_port {} is greater than to_port {}",
                self.from_port, self.to_port
            ));
        }
        if self.ip.parse::<Cidr>().is_err() && !networks.contains(&self.ip) {
            return Err(format!(
                "ip '{}' is neither a CIDR nor a declared network",
                self.ip
            ));
        }
        Ok(())
    }
}

impl Named for SecurityGroup {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallItem {
    pub name: String,
    pub security_group_aws_id: String,
    pub rules: FirewallRules,
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
pub struct FirewallRules {
    pub ingress: Vec<FirewallRule>,
    pub egress: Vec<FirewallRule>,
}

/// A mapped rule. When the authored rule named a network, `ip` holds that
/// network's subnet and `network` its generated name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallRule {
    pub ip: String,
    pub from_port: u16,
    pub to_port: u16,
    pub protocol: String,
    pub network: String,
}

impl Named for FirewallItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl ResourceItem for FirewallItem {
    const KIND: ResourceKind = ResourceKind::Firewall;
    const SIGNIFICANT_FIELDS: &'static [&'static str] = &["rules"];

    fn carry_provider_data(&mut self, previous: &Self) {
        self.security_group_aws_id = previous.security_group_aws_id.clone();
        self.provider = ProviderContext::deferred();
        self.vpc_id = deferred_vpc_id();
        self.exists = true;
    }
}

fn map_rule(ctx: &MapContext, rule: &Rule) -> FirewallRule {
    let (ip, network) = if rule.ip.parse::<Cidr>().is_ok() {
        (rule.ip.clone(), String::new())
    } else {
        ctx.network(&rule.ip)
            .map(|n| (n.subnet.clone(), ctx.name(&n.name)))
            .unwrap_or_default()
    };
    FirewallRule {
        ip,
        from_port: rule.from_port,
        to_port: rule.to_port,
        protocol: rule.protocol.clone(),
        network,
    }
}

pub fn map(ctx: &MapContext) -> Vec<FirewallItem> {
    ctx.definition()
        .security_groups
        .iter()
        .map(|sg| {
            let name = ctx.name(&sg.name);
            FirewallItem {
                tags: ctx.tags(&name),
                name,
                security_group_aws_id: String::new(),
                rules: FirewallRules {
                    ingress: sg.rules.ingress.iter().map(|r| map_rule(ctx, r)).collect(),
                    egress: sg.rules.egress.iter().map(|r| map_rule(ctx, r)).collect(),
                },
                provider: ctx.provider(),
                vpc_id: ctx.vpc_id(),
                service: ctx.service_id().to_string(),
                status: String::new(),
                exists: false,
            }
        })
        .collect()
}

fn unmap_rule(rev: &ReverseContext, rule: &FirewallRule) -> Rule {
    Rule {
        ip: if rule.network.is_empty() {
            rule.ip.clone()
        } else {
            rev.role(&rule.network)
        },
        from_port: rule.from_port,
        to_port: rule.to_port,
        protocol: rule.protocol.clone(),
    }
}

pub fn unmap(message: &ExecutionMessage, rev: &ReverseContext) -> Vec<SecurityGroup> {
    message
        .firewalls
        .items
        .iter()
        .map(|fw| SecurityGroup {
            name: rev.role(&fw.name),
            rules: Rules {
                ingress: fw.rules.ingress.iter().map(|r| unmap_rule(rev, r)).collect(),
                egress: fw.rules.egress.iter().map(|r| unmap_rule(rev, r)).collect(),
            },
        })
        .collect()
}
