//! Change detection properties.

use nimbus::resources::nat::NatItem;
use nimbus::resources::vpc::VpcItem;
use nimbus::ResourceItem;
use proptest::prelude::*;

fn vpc(subnet: &str, vpc_id: &str, status: &str) -> VpcItem {
    VpcItem {
        name: "fakeaws-svc-vpc".to_string(),
        vpc_id: vpc_id.to_string(),
        vpc_subnet: subnet.to_string(),
        status: status.to_string(),
        ..Default::default()
    }
}

fn nat(routed: Vec<String>) -> NatItem {
    NatItem {
        name: "fakeaws-svc-nat".to_string(),
        public_network: "fakeaws-svc-web".to_string(),
        routed_networks: routed,
        ..Default::default()
    }
}

proptest! {
    /// Property: provider-assigned fields never make a VPC differ
    #[test]
    fn prop_vpc_provider_fields_ignored(
        a in "vpc-[0-9a-f]{0,8}",
        b in "vpc-[0-9a-f]{0,8}",
        status in "[a-z]{0,10}",
    ) {
        let before = vpc("10.0.0.0/16", &a, "");
        let after = vpc("10.0.0.0/16", &b, &status);
        prop_assert!(!after.has_changed(&before));
    }

    /// Property: a VPC differs exactly when its subnet does
    #[test]
    fn prop_vpc_subnet_decides(x in any::<u8>(), y in any::<u8>()) {
        let before = vpc(&format!("10.{}.0.0/16", x), "", "");
        let after = vpc(&format!("10.{}.0.0/16", y), "", "");
        prop_assert_eq!(after.has_changed(&before), x != y);
    }

    /// Property: reordering routed networks is a change unless the order
    /// comes out the same
    #[test]
    fn prop_nat_reorder_detected(
        shuffled in Just((0..5).map(|i| format!("fakeaws-svc-net{}", i)).collect::<Vec<_>>())
            .prop_shuffle()
    ) {
        let original: Vec<String> = (0..5).map(|i| format!("fakeaws-svc-net{}", i)).collect();
        let same_order = shuffled == original;
        let before = nat(original);
        let after = nat(shuffled);
        prop_assert_eq!(after.has_changed(&before), !same_order);
        if !same_order {
            prop_assert_eq!(after.changed_fields(&before), vec!["routed_networks"]);
        }
    }
}
