//! NB-021: Plan generation — diff a mapped message against the previous one.
//!
//! Every item of every kind is classified by name: absent before → create,
//! present on both sides with a significant-field difference → update,
//! otherwise unchanged; items only in the previous message are deleted.
//! The plan does not order operations; that is the orchestrator's job.

use super::message::{ExecutionMessage, ResourceItem, ResourceKind};
use super::resolver::NameIndex;
use std::fmt;
use tracing::info;

/// Action to take on a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Create,
    Update,
    Delete,
    NoOp,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::NoOp => write!(f, "NO-OP"),
        }
    }
}

/// A single planned change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub kind: ResourceKind,

    /// Generated item name
    pub name: String,

    pub action: PlanAction,

    /// Significant fields that differ (updates only)
    pub changed_fields: Vec<&'static str>,

    /// Human-readable description
    pub description: String,
}

/// Full plan for one service.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    /// Service name
    pub name: String,

    pub changes: Vec<PlannedChange>,

    /// Summary counts
    pub to_create: u32,
    pub to_update: u32,
    pub to_delete: u32,
    pub unchanged: u32,
}

impl ExecutionPlan {
    /// True when nothing needs to happen.
    pub fn is_empty(&self) -> bool {
        self.to_create == 0 && self.to_update == 0 && self.to_delete == 0
    }

    fn record(&mut self, change: PlannedChange) {
        match change.action {
            PlanAction::Create => self.to_create += 1,
            PlanAction::Update => self.to_update += 1,
            PlanAction::Delete => self.to_delete += 1,
            PlanAction::NoOp => self.unchanged += 1,
        }
        self.changes.push(change);
    }

    /// Changes that are not no-ops.
    pub fn actionable(&self) -> impl Iterator<Item = &PlannedChange> {
        self.changes.iter().filter(|c| c.action != PlanAction::NoOp)
    }
}

/// Plan the transition from `previous` (None = nothing applied yet) to `message`.
pub fn plan(message: &ExecutionMessage, previous: Option<&ExecutionMessage>) -> ExecutionPlan {
    let empty = ExecutionMessage::default();
    let old = previous.unwrap_or(&empty);
    let mut plan = ExecutionPlan {
        name: message.service_name.clone(),
        ..Default::default()
    };

    plan_kind(&mut plan, &message.datacenters.items, &old.datacenters.items);
    plan_kind(&mut plan, &message.vpcs.items, &old.vpcs.items);
    plan_kind(&mut plan, &message.networks.items, &old.networks.items);
    plan_kind(&mut plan, &message.firewalls.items, &old.firewalls.items);
    plan_kind(&mut plan, &message.nats.items, &old.nats.items);
    plan_kind(&mut plan, &message.ebs_volumes.items, &old.ebs_volumes.items);
    plan_kind(&mut plan, &message.instances.items, &old.instances.items);
    plan_kind(&mut plan, &message.elbs.items, &old.elbs.items);
    plan_kind(&mut plan, &message.s3s.items, &old.s3s.items);
    plan_kind(&mut plan, &message.rds_clusters.items, &old.rds_clusters.items);
    plan_kind(&mut plan, &message.rds_instances.items, &old.rds_instances.items);
    plan_kind(&mut plan, &message.route53s.items, &old.route53s.items);

    info!(
        service = %plan.name,
        create = plan.to_create,
        update = plan.to_update,
        delete = plan.to_delete,
        unchanged = plan.unchanged,
        "plan computed"
    );
    plan
}

fn plan_kind<R: ResourceItem>(plan: &mut ExecutionPlan, items: &[R], previous: &[R]) {
    let before = NameIndex::new(previous);
    for item in items {
        let (action, changed_fields) = match before.get(item.name()) {
            None => (PlanAction::Create, Vec::new()),
            Some(old) => {
                let changed = item.changed_fields(old);
                if changed.is_empty() {
                    (PlanAction::NoOp, changed)
                } else {
                    (PlanAction::Update, changed)
                }
            }
        };
        plan.record(change::<R>(item.name(), action, changed_fields));
    }

    let now = NameIndex::new(items);
    for old in previous.iter().filter(|o| !now.contains(o.name())) {
        plan.record(change::<R>(old.name(), PlanAction::Delete, Vec::new()));
    }
}

fn change<R: ResourceItem>(
    name: &str,
    action: PlanAction,
    changed_fields: Vec<&'static str>,
) -> PlannedChange {
    let description = describe_action(R::KIND, name, action, &changed_fields);
    PlannedChange {
        kind: R::KIND,
        name: name.to_string(),
        action,
        changed_fields,
        description,
    }
}

/// Generate a human-readable description of a planned action.
fn describe_action(
    kind: ResourceKind,
    name: &str,
    action: PlanAction,
    changed_fields: &[&str],
) -> String {
    match action {
        PlanAction::Create => format!("{} {}: create", kind, name),
        PlanAction::Update => format!("{} {}: update ({})", kind, name, changed_fields.join(", ")),
        PlanAction::Delete => format!("{} {}: delete", kind, name),
        PlanAction::NoOp => format!("{} {}: no changes", kind, name),
    }
}
