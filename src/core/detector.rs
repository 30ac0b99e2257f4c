//! NB-005: Change detection.
//!
//! Each kind declares its significant fields. Two observations of the same
//! named resource differ when any significant field differs: scalars by
//! value, lists as ordered sequences (reordering is a change), nested rule
//! and listener lists element by element.

use super::message::ResourceItem;
use serde_json::Value;
use tracing::trace;

/// Significant fields of `candidate` that differ from `previous`.
pub fn changed_fields<R: ResourceItem + ?Sized>(candidate: &R, previous: &R) -> Vec<&'static str> {
    let current = snapshot(candidate);
    let before = snapshot(previous);

    let changed: Vec<&'static str> = R::SIGNIFICANT_FIELDS
        .iter()
        .copied()
        .filter(|field| current.get(*field) != before.get(*field))
        .collect();

    if !changed.is_empty() {
        trace!(kind = %R::KIND, name = candidate.name(), ?changed, "resource changed");
    }
    changed
}

// Items are plain string/number/bool structs; serialization cannot fail.
fn snapshot<R: ResourceItem + ?Sized>(item: &R) -> Value {
    serde_json::to_value(item).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use crate::core::message::ResourceItem;
    use crate::resources::nat::NatItem;
    use crate::resources::vpc::VpcItem;

    fn vpc(subnet: &str) -> VpcItem {
        VpcItem {
            name: "dc-svc-vpc".to_string(),
            vpc_subnet: subnet.to_string(),
            ..Default::default()
        }
    }

    fn nat(routed: &[&str]) -> NatItem {
        NatItem {
            name: "dc-svc-nat".to_string(),
            public_network: "dc-svc-web".to_string(),
            routed_networks: routed.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_nb005_vpc_same_subnet() {
        assert!(!vpc("10.0.0.0/16").has_changed(&vpc("10.0.0.0/16")));
    }

    #[test]
    fn test_nb005_vpc_subnet_changed() {
        let a = vpc("10.0.0.0/16");
        let b = vpc("10.1.0.0/16");
        assert!(a.has_changed(&b));
        assert_eq!(a.changed_fields(&b), vec!["vpc_subnet"]);
    }

    #[test]
    fn test_nb005_vpc_ignores_provider_id() {
        let a = vpc("10.0.0.0/16");
        let mut b = vpc("10.0.0.0/16");
        b.vpc_id = "vpc-0abc".to_string();
        b.status = "completed".to_string();
        assert!(!a.has_changed(&b));
    }

    #[test]
    fn test_nb005_nat_reorder_is_change() {
        let a = nat(&["dc-svc-db", "dc-svc-cache"]);
        let b = nat(&["dc-svc-cache", "dc-svc-db"]);
        assert!(a.has_changed(&b));
    }

    #[test]
    fn test_nb005_nat_same_routes() {
        let a = nat(&["dc-svc-db"]);
        let mut b = nat(&["dc-svc-db"]);
        b.nat_gateway_aws_id = "nat-123".to_string();
        b.nat_gateway_allocation_ip = "52.1.1.1".to_string();
        assert!(!a.has_changed(&b));
    }

    #[test]
    fn test_nb005_nat_public_network_not_significant() {
        let a = nat(&["dc-svc-db"]);
        let mut b = nat(&["dc-svc-db"]);
        b.public_network = "dc-svc-other".to_string();
        assert!(!a.has_changed(&b));
    }
}
