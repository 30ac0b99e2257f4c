//! Provider-data merge properties.

use super::{payload, simulate_apply, valid_definition};
use nimbus::core::planner;
use nimbus::{convert_payload, merge_provider_data};
use proptest::prelude::*;

proptest! {
    /// Property: merging twice gives the same message as merging once
    #[test]
    fn prop_merge_idempotent(def in valid_definition()) {
        let applied = simulate_apply(&convert_payload(&payload(def.clone())));

        let mut once = convert_payload(&payload(def));
        merge_provider_data(&mut once, &applied);
        let mut twice = once.clone();
        merge_provider_data(&mut twice, &applied);

        prop_assert_eq!(once, twice);
    }

    /// Property: every item with an applied predecessor keeps its provider id
    /// and is marked as existing
    #[test]
    fn prop_merge_carries_ids(def in valid_definition()) {
        let applied = simulate_apply(&convert_payload(&payload(def.clone())));
        let mut message = convert_payload(&payload(def));
        merge_provider_data(&mut message, &applied);

        for (item, old) in message.instances.items.iter().zip(&applied.instances.items) {
            prop_assert_eq!(&item.instance_aws_id, &old.instance_aws_id);
            prop_assert!(item.exists);
            prop_assert!(item.provider.is_deferred());
        }
        for (item, old) in message.networks.items.iter().zip(&applied.networks.items) {
            prop_assert_eq!(&item.network_aws_id, &old.network_aws_id);
            prop_assert!(item.exists);
        }
    }

    /// Property: remapping an unchanged definition plans no work
    #[test]
    fn prop_unchanged_definition_plans_nothing(def in valid_definition()) {
        let applied = simulate_apply(&convert_payload(&payload(def.clone())));
        let mut message = convert_payload(&payload(def));
        merge_provider_data(&mut message, &applied);

        let plan = planner::plan(&message, Some(&applied));
        prop_assert!(plan.is_empty(), "{:?}", plan.changes);
        prop_assert_eq!(plan.unchanged as usize, message.item_count());
    }
}
