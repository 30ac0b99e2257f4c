//! Property test modules and the definition generators they share.

mod detection;
mod mapping;
mod merge;
mod validation;

use nimbus::core::definition::Datacenter;
use nimbus::resources::instance::Instance;
use nimbus::resources::network::Network;
use nimbus::{Definition, ExecutionMessage, Payload};
use proptest::prelude::*;

/// One to five networks `net0..netN` with disjoint /24 subnets.
pub fn networks() -> impl Strategy<Value = Vec<Network>> {
    proptest::collection::vec(any::<bool>(), 1..6).prop_map(|publics| {
        publics
            .into_iter()
            .enumerate()
            .map(|(i, public)| Network {
                name: format!("net{}", i),
                subnet: format!("10.{}.0.0/24", i),
                public,
                ..Default::default()
            })
            .collect()
    })
}

fn instance(j: usize, network: &str, net_index: usize, count: usize, with_ip: bool) -> Instance {
    Instance {
        name: format!("grp{}", j),
        instance_type: "e1.micro".to_string(),
        image: "ami-6666f915".to_string(),
        count,
        network: network.to_string(),
        start_ip: if with_ip {
            format!("10.{}.0.10", net_index)
        } else {
            String::new()
        },
        ..Default::default()
    }
}

fn definition_with(networks: Vec<Network>, instances: Vec<Instance>) -> Definition {
    Definition {
        name: "svc".to_string(),
        datacenter: "fakeaws".to_string(),
        vpc_subnet: "10.0.0.0/8".to_string(),
        networks,
        instances,
        ..Default::default()
    }
}

/// Valid definitions: every instance group sits on a declared network.
pub fn valid_definition() -> impl Strategy<Value = Definition> {
    networks()
        .prop_flat_map(|nets| {
            let n = nets.len();
            let groups = proptest::collection::vec((0..n, 1usize..4, any::<bool>()), 0..5);
            (Just(nets), groups)
        })
        .prop_map(|(networks, groups)| {
            let instances = groups
                .into_iter()
                .enumerate()
                .map(|(j, (net, count, with_ip))| {
                    instance(j, &format!("net{}", net), net, count, with_ip)
                })
                .collect();
            definition_with(networks, instances)
        })
}

/// Definitions whose instance groups may name an undeclared network.
pub fn loose_definition() -> impl Strategy<Value = Definition> {
    networks()
        .prop_flat_map(|nets| {
            let n = nets.len();
            let groups = proptest::collection::vec((0..=n, 1usize..4), 0..5);
            (Just(nets), groups)
        })
        .prop_map(|(networks, groups)| {
            let n = networks.len();
            let instances = groups
                .into_iter()
                .enumerate()
                .map(|(j, (net, count))| {
                    let network = if net == n {
                        "ghost".to_string()
                    } else {
                        format!("net{}", net)
                    };
                    instance(j, &network, net, count, false)
                })
                .collect();
            definition_with(networks, instances)
        })
}

pub fn payload(definition: Definition) -> Payload {
    Payload {
        service_id: "svc-1".to_string(),
        datacenter: Datacenter {
            name: "fakeaws".to_string(),
            provider_type: "aws-fake".to_string(),
            region: "fake".to_string(),
            ..Default::default()
        },
        service: definition,
        ..Default::default()
    }
}

/// Fill in what the provider would assign during an apply.
pub fn simulate_apply(message: &ExecutionMessage) -> ExecutionMessage {
    let mut applied = message.clone();
    for item in &mut applied.vpcs.items {
        item.vpc_id = "vpc-1".to_string();
    }
    for (i, n) in applied.networks.items.iter_mut().enumerate() {
        n.network_aws_id = format!("subnet-{}", i);
        n.availability_zone = "fake-1a".to_string();
    }
    for (i, instance) in applied.instances.items.iter_mut().enumerate() {
        instance.instance_aws_id = format!("i-{}", i);
        instance.public_ip = format!("52.0.{}.{}", i / 250, i % 250 + 1);
    }
    applied
}
