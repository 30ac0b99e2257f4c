//! Forward and reverse mapping properties.

use super::{payload, valid_definition};
use nimbus::{convert_message, convert_payload};
use proptest::prelude::*;

proptest! {
    /// Property: every member of every instance group is emitted, named
    /// `{datacenter}-{service}-{group}-{index}`
    #[test]
    fn prop_instance_members_expanded(def in valid_definition()) {
        let message = convert_payload(&payload(def.clone()));
        let expected: Vec<String> = def
            .instances
            .iter()
            .flat_map(|g| (1..=g.count).map(move |k| format!("fakeaws-svc-{}-{}", g.name, k)))
            .collect();
        let names: Vec<String> = message.instances.items.iter().map(|i| i.name.clone()).collect();
        prop_assert_eq!(names, expected);
    }

    /// Property: an instance references the mapped item of its network
    #[test]
    fn prop_instance_network_reference(def in valid_definition()) {
        let message = convert_payload(&payload(def));
        for instance in &message.instances.items {
            let position = message
                .networks
                .items
                .iter()
                .position(|n| n.name == instance.network);
            prop_assert!(position.is_some(), "dangling network {}", instance.network);
            prop_assert_eq!(
                &instance.network_aws_id,
                &format!("$(networks.items.{}.network_aws_id)", position.unwrap_or_default())
            );
        }
    }

    /// Property: members of a group get consecutive addresses from start_ip
    #[test]
    fn prop_member_addresses_consecutive(def in valid_definition()) {
        let message = convert_payload(&payload(def.clone()));
        let mut items = message.instances.items.iter();
        for group in &def.instances {
            for k in 0..group.count {
                let item = items.next();
                prop_assert!(item.is_some());
                let ip = item.map(|i| i.ip.clone()).unwrap_or_default();
                if group.start_ip.is_empty() {
                    prop_assert!(ip.is_empty());
                } else {
                    let start: std::net::Ipv4Addr = group.start_ip.parse().unwrap();
                    let expected = std::net::Ipv4Addr::from(u32::from(start) + k as u32);
                    prop_assert_eq!(ip, expected.to_string());
                }
            }
        }
    }

    /// Property: reverse mapping restores names, subnets and instance
    /// network references
    #[test]
    fn prop_round_trip(def in valid_definition()) {
        let back = convert_message(&convert_payload(&payload(def.clone())));
        prop_assert_eq!(&back.service.name, &def.name);
        prop_assert_eq!(&back.service.datacenter, &def.datacenter);
        prop_assert_eq!(&back.service.networks, &def.networks);
        prop_assert_eq!(&back.service.instances, &def.instances);
    }
}
