//! Validation properties.

use super::{loose_definition, valid_definition};
use nimbus::resources::network::Network;
use nimbus::{validate, validate_all, Definition, ValidationError};
use proptest::prelude::*;
use std::net::Ipv4Addr;

fn named(name: &str) -> Definition {
    Definition {
        name: name.to_string(),
        datacenter: "fakeaws".to_string(),
        ..Default::default()
    }
}

proptest! {
    /// Property: names of at most 50 codepoints are accepted, whatever
    /// their byte length
    #[test]
    fn prop_name_within_limit_accepted(name in "[a-zα-ω0-9-]{1,50}") {
        prop_assert!(validate(&named(&name)).is_ok());
    }

    /// Property: names over 50 codepoints are rejected
    #[test]
    fn prop_name_over_limit_rejected(name in "[a-zα-ω0-9-]{51,80}") {
        prop_assert_eq!(
            validate(&named(&name)),
            Err(ValidationError::NameTooLong { max: 50 })
        );
    }

    /// Property: any IPv4 literal is a valid service IP
    #[test]
    fn prop_service_ip_literal_accepted(octets in any::<[u8; 4]>()) {
        let mut def = named("svc");
        def.service_ip = Ipv4Addr::from(octets).to_string();
        prop_assert!(validate(&def).is_ok());
    }

    /// Property: a non-IP service IP is rejected before anything else
    #[test]
    fn prop_service_ip_garbage_rejected(ip in "[a-z]{1,12}") {
        let mut def = named("svc");
        def.service_ip = ip.clone();
        def.datacenter.clear();
        prop_assert_eq!(validate(&def), Err(ValidationError::InvalidServiceIp(ip)));
    }

    /// Property: a repeated network name is always reported
    #[test]
    fn prop_duplicate_network_rejected(count in 1usize..6, dup in 0usize..6) {
        let dup = dup % count;
        let mut def = named("svc");
        def.networks = (0..count)
            .map(|i| Network {
                name: format!("net{}", i),
                subnet: format!("10.{}.0.0/24", i),
                ..Default::default()
            })
            .collect();
        let mut copy = def.networks[dup].clone();
        copy.subnet = "10.200.0.0/24".to_string();
        def.networks.push(copy);

        prop_assert_eq!(
            validate(&def),
            Err(ValidationError::DuplicateNetwork(format!("net{}", dup)))
        );
    }

    /// Property: generated valid definitions pass both entry points
    #[test]
    fn prop_valid_definition_passes(def in valid_definition()) {
        prop_assert!(validate(&def).is_ok());
        prop_assert!(validate_all(&def).is_empty());
    }

    /// Property: a definition that validates has every instance network declared
    #[test]
    fn prop_valid_implies_networks_resolve(def in loose_definition()) {
        if validate(&def).is_ok() {
            for instance in &def.instances {
                prop_assert!(def.find_network(&instance.network).is_some());
            }
        } else {
            prop_assert!(def.instances.iter().any(|i| i.network == "ghost"));
        }
    }

    /// Property: fail-fast reports the first of the collected errors
    #[test]
    fn prop_fail_fast_matches_first_collected(def in loose_definition()) {
        let all = validate_all(&def);
        match validate(&def) {
            Ok(()) => prop_assert!(all.is_empty()),
            Err(e) => prop_assert_eq!(Some(&e), all.first()),
        }
    }
}
