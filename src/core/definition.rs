//! NB-001: Declarative definition — the authored description of a service.
//!
//! A `Payload` wraps the definition with the execution identifier, the owning
//! client and the datacenter (provider type, region, credentials).

use super::resolver::{self, Named};
use super::validator::{self, ValidationError};
use crate::resources::ebs::EbsVolume;
use crate::resources::elb::Elb;
use crate::resources::firewall::SecurityGroup;
use crate::resources::instance::Instance;
use crate::resources::nat::NatGateway;
use crate::resources::network::Network;
use crate::resources::rds::{RdsCluster, RdsInstance};
use crate::resources::route53::Route53Zone;
use crate::resources::s3::S3Bucket;
use serde::{Deserialize, Serialize};

/// Maximum service name length, in Unicode codepoints.
pub const MAX_NAME_LENGTH: usize = 50;

/// Everything needed to map one service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payload {
    /// Execution identifier
    pub service_id: String,

    /// The authored definition
    pub service: Definition,

    /// Owning client
    pub client: Client,

    /// Target datacenter
    pub datacenter: Datacenter,
}

impl Payload {
    /// Wrap a bare definition. The service id defaults to the definition name
    /// and the datacenter name to the definition's datacenter.
    pub fn from_definition(definition: Definition) -> Self {
        Self {
            service_id: definition.name.clone(),
            datacenter: Datacenter {
                name: definition.datacenter.clone(),
                ..Default::default()
            },
            service: definition,
            client: Client::default(),
        }
    }
}

/// Owning client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
}

/// Datacenter the service is applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Datacenter {
    pub name: String,

    /// Provider type (e.g. `aws`, `aws-fake`)
    #[serde(rename = "type")]
    pub provider_type: String,

    pub region: String,

    #[serde(rename = "aws_access_key_id")]
    pub access_key_id: String,

    #[serde(rename = "aws_secret_access_key")]
    pub secret_access_key: String,
}

/// Root definition — the desired state of one service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    /// Service name (1..=50 codepoints)
    pub name: String,

    /// Datacenter name
    pub datacenter: String,

    /// Operator addresses allowed to reach the service
    pub ernest_ip: Vec<String>,

    /// Service-level virtual IP
    pub service_ip: String,

    /// Existing VPC to deploy into (empty = create one)
    pub vpc_id: String,

    /// VPC address block
    pub vpc_subnet: String,

    pub networks: Vec<Network>,
    pub instances: Vec<Instance>,
    pub security_groups: Vec<SecurityGroup>,
    pub nat_gateways: Vec<NatGateway>,
    pub elbs: Vec<Elb>,
    pub s3_buckets: Vec<S3Bucket>,
    pub route53_zones: Vec<Route53Zone>,
    pub rds_clusters: Vec<RdsCluster>,
    pub rds_instances: Vec<RdsInstance>,
    pub ebs_volumes: Vec<EbsVolume>,
}

impl Definition {
    /// Validate the definition, stopping at the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validator::validate(self)
    }

    /// Prefix shared by all generated names: `{datacenter}-{service}-`.
    pub fn generated_prefix(&self) -> String {
        format!("{}-{}-", self.datacenter, self.name)
    }

    /// Network matched by name.
    pub fn find_network(&self, name: &str) -> Option<&Network> {
        resolver::find(&self.networks, name)
    }

    /// Instance group matched by name.
    pub fn find_instance(&self, name: &str) -> Option<&Instance> {
        resolver::find(&self.instances, name)
    }

    /// Security group matched by name.
    pub fn find_security_group(&self, name: &str) -> Option<&SecurityGroup> {
        resolver::find(&self.security_groups, name)
    }
}

impl Named for Definition {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nb001_definition_parse() {
        let yaml = r#"
name: my-service
datacenter: fakeaws
service_ip: 10.1.1.1
ernest_ip: [31.210.240.161]
networks:
  - name: web
    subnet: 10.1.0.0/24
    public: true
instances:
  - name: web
    type: e1.micro
    image: ami-6666f915
    count: 2
    network: web
    start_ip: 10.1.0.11
"#;
        let def: Definition = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(def.name, "my-service");
        assert_eq!(def.ernest_ip, vec!["31.210.240.161"]);
        assert_eq!(def.networks.len(), 1);
        assert!(def.networks[0].public);
        assert_eq!(def.instances[0].count, 2);
        assert!(def.security_groups.is_empty());
        assert!(def.ebs_volumes.is_empty());
    }

    #[test]
    fn test_nb001_generated_prefix() {
        let def = Definition {
            name: "svc".to_string(),
            datacenter: "fakeaws".to_string(),
            ..Default::default()
        };
        assert_eq!(def.generated_prefix(), "fakeaws-svc-");
    }

    #[test]
    fn test_nb001_find_network() {
        let def = Definition {
            networks: vec![Network {
                name: "web".to_string(),
                subnet: "10.1.0.0/24".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(def.find_network("web").is_some());
        assert!(def.find_network("db").is_none());
        assert!(def.find_instance("web").is_none());
    }

    #[test]
    fn test_nb001_payload_from_definition() {
        let def = Definition {
            name: "svc".to_string(),
            datacenter: "fakeaws".to_string(),
            ..Default::default()
        };
        let payload = Payload::from_definition(def);
        assert_eq!(payload.service_id, "svc");
        assert_eq!(payload.datacenter.name, "fakeaws");
        assert_eq!(payload.service.name, "svc");
    }

    #[test]
    fn test_nb001_payload_parse() {
        let yaml = r#"
service_id: "aws-123"
client:
  name: r3labs
datacenter:
  name: fakeaws
  type: aws-fake
  region: fake
  aws_access_key_id: key
  aws_secret_access_key: secret
service:
  name: svc
  datacenter: fakeaws
"#;
        let payload: Payload = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(payload.datacenter.provider_type, "aws-fake");
        assert_eq!(payload.datacenter.access_key_id, "key");
        assert_eq!(payload.client.name, "r3labs");
    }
}
