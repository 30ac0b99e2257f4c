//! NB-004: Definition validation.
//!
//! Checks run in a fixed order and the first violation wins:
//! 1. service name present and at most 50 codepoints
//! 2. service IP empty or a valid IP literal
//! 3. datacenter present
//! 4. each network, then each instance (against its resolved network),
//!    each security group and each NAT gateway (against all networks)
//! 5. duplicate network names, then duplicate instance names
//!
//! `validate_all` walks the same checks without stopping, one error per
//! failing check.

use super::definition::{Definition, MAX_NAME_LENGTH};
use super::resolver::{self, NameIndex, Named};
use crate::resources::network::Network;
use std::iter;
use std::net::IpAddr;
use thiserror::Error;
use tracing::debug;

/// A structural violation in a definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service name should not be null")]
    MissingName,

    #[error("service name can't be greater than {max} characters")]
    NameTooLong { max: usize },

    #[error("service IP '{0}' is not a valid IP")]
    InvalidServiceIp(String),

    #[error("datacenter not specified")]
    MissingDatacenter,

    #[error("network '{name}': {reason}")]
    Network { name: String, reason: String },

    #[error("instance '{name}': {reason}")]
    Instance { name: String, reason: String },

    #[error("security group '{name}': {reason}")]
    SecurityGroup { name: String, reason: String },

    #[error("nat gateway '{name}': {reason}")]
    NatGateway { name: String, reason: String },

    #[error("duplicate network names found: '{0}'")]
    DuplicateNetwork(String),

    #[error("duplicate instance names found: '{0}'")]
    DuplicateInstance(String),
}

impl ValidationError {
    pub fn network(name: &str, reason: impl Into<String>) -> Self {
        Self::Network {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn instance(name: &str, reason: impl Into<String>) -> Self {
        Self::Instance {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn security_group(name: &str, reason: impl Into<String>) -> Self {
        Self::SecurityGroup {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub fn nat_gateway(name: &str, reason: impl Into<String>) -> Self {
        Self::NatGateway {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Validate a definition. Returns the first violation found.
pub fn validate(definition: &Definition) -> Result<(), ValidationError> {
    let mut report = Report::new(false);
    walk(definition, &mut report);
    match report.errors.into_iter().next() {
        Some(e) => {
            debug!(service = %definition.name, error = %e, "definition rejected");
            Err(e)
        }
        None => {
            debug!(service = %definition.name, "definition valid");
            Ok(())
        }
    }
}

/// Validate a definition, collecting every violation in check order.
pub fn validate_all(definition: &Definition) -> Vec<ValidationError> {
    let mut report = Report::new(true);
    walk(definition, &mut report);
    report.errors
}

struct Report {
    collect_all: bool,
    errors: Vec<ValidationError>,
}

impl Report {
    fn new(collect_all: bool) -> Self {
        Self {
            collect_all,
            errors: Vec::new(),
        }
    }

    /// Record one check. False once the walk should stop.
    fn record(&mut self, result: Result<(), ValidationError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.errors.push(e);
                self.collect_all
            }
        }
    }
}

fn walk(definition: &Definition, report: &mut Report) {
    let networks = NameIndex::new(&definition.networks);

    // Lazy: a fail-fast report stops before later checks run.
    let checks = iter::once_with(|| validate_name(definition))
        .chain(iter::once_with(|| validate_service_ip(definition)))
        .chain(iter::once_with(|| validate_datacenter(definition)))
        .chain(definition.networks.iter().map(Network::validate))
        .chain(
            definition
                .instances
                .iter()
                .map(|i| i.validate(networks.get(&i.network))),
        )
        .chain(
            definition
                .security_groups
                .iter()
                .map(|g| g.validate(&networks)),
        )
        .chain(definition.nat_gateways.iter().map(|g| g.validate(&networks)))
        .chain(iter::once_with(|| {
            unique(&definition.networks, ValidationError::DuplicateNetwork)
        }))
        .chain(iter::once_with(|| {
            unique(&definition.instances, ValidationError::DuplicateInstance)
        }));

    for result in checks {
        if !report.record(result) {
            break;
        }
    }
}

fn unique<T: Named>(
    items: &[T],
    duplicate: fn(String) -> ValidationError,
) -> Result<(), ValidationError> {
    match resolver::first_duplicate(items) {
        Some(name) => Err(duplicate(name.to_string())),
        None => Ok(()),
    }
}

fn validate_name(definition: &Definition) -> Result<(), ValidationError> {
    if definition.name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if definition.name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

fn validate_service_ip(definition: &Definition) -> Result<(), ValidationError> {
    if definition.service_ip.is_empty() {
        return Ok(());
    }
    definition
        .service_ip
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| ValidationError::InvalidServiceIp(definition.service_ip.clone()))
}

fn validate_datacenter(definition: &Definition) -> Result<(), ValidationError> {
    if definition.datacenter.is_empty() {
        return Err(ValidationError::MissingDatacenter);
    }
    Ok(())
}
