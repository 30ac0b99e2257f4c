//! NB-009: Provider-data merge.
//!
//! Folds provider-assigned attributes of a previously applied message into a
//! freshly mapped one. Items are matched by name, one `NameIndex` per
//! collection; unmatched items stay new. Applying the merge twice gives the
//! same result as applying it once.

use super::message::{ExecutionMessage, ResourceItem};
use super::resolver::NameIndex;
use tracing::{debug, info};

/// Merge provider data from `previous` into `message`.
pub fn merge_provider_data(message: &mut ExecutionMessage, previous: &ExecutionMessage) {
    let mut carried = 0;
    carried += merge_kind(&mut message.vpcs.items, &previous.vpcs.items);
    carried += merge_kind(&mut message.networks.items, &previous.networks.items);
    carried += merge_kind(&mut message.instances.items, &previous.instances.items);
    carried += merge_kind(&mut message.firewalls.items, &previous.firewalls.items);
    carried += merge_kind(&mut message.nats.items, &previous.nats.items);
    carried += merge_kind(&mut message.elbs.items, &previous.elbs.items);
    carried += merge_kind(&mut message.s3s.items, &previous.s3s.items);
    carried += merge_kind(&mut message.route53s.items, &previous.route53s.items);
    carried += merge_kind(&mut message.rds_clusters.items, &previous.rds_clusters.items);
    carried += merge_kind(&mut message.rds_instances.items, &previous.rds_instances.items);
    carried += merge_kind(&mut message.ebs_volumes.items, &previous.ebs_volumes.items);

    info!(
        service = %message.service_name,
        carried,
        total = message.item_count(),
        "provider data merged"
    );
}

/// Carry provider data into every item with a same-named predecessor.
/// Returns the number of matched items.
fn merge_kind<R: ResourceItem>(items: &mut [R], previous: &[R]) -> usize {
    let index = NameIndex::new(previous);
    let mut matched = 0;
    for item in items.iter_mut() {
        if let Some(old) = index.get(item.name()) {
            item.carry_provider_data(old);
            matched += 1;
        }
    }
    debug!(kind = %R::KIND, matched, of = items.len(), "merged kind");
    matched
}
