//! Benchmarks for nimbus core operations.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nimbus::core::definition::Datacenter;
use nimbus::core::parser;
use nimbus::core::planner;
use nimbus::resources::firewall::{Rule, Rules, SecurityGroup};
use nimbus::resources::instance::Instance;
use nimbus::resources::network::Network;
use nimbus::{convert_message, convert_payload, merge_provider_data, validate, Definition, Payload};

/// A service with `n` networks, one instance group of 3 per network and a
/// security group per network.
fn payload(n: usize) -> Payload {
    let networks = (0..n)
        .map(|i| Network {
            name: format!("net{i}"),
            subnet: format!("10.{}.{}.0/24", i / 256, i % 256),
            public: i == 0,
            ..Default::default()
        })
        .collect();
    let instances = (0..n)
        .map(|i| Instance {
            name: format!("app{i}"),
            instance_type: "e1.micro".to_string(),
            image: "ami-6666f915".to_string(),
            count: 3,
            network: format!("net{i}"),
            start_ip: format!("10.{}.{}.10", i / 256, i % 256),
            security_groups: vec![format!("sg{i}")],
            ..Default::default()
        })
        .collect();
    let security_groups = (0..n)
        .map(|i| SecurityGroup {
            name: format!("sg{i}"),
            rules: Rules {
                ingress: vec![Rule {
                    ip: format!("net{i}"),
                    from_port: 80,
                    to_port: 80,
                    protocol: "tcp".to_string(),
                }],
                egress: Vec::new(),
            },
        })
        .collect();

    Payload {
        service_id: "bench-1".to_string(),
        datacenter: Datacenter {
            name: "fakeaws".to_string(),
            provider_type: "aws-fake".to_string(),
            region: "fake".to_string(),
            ..Default::default()
        },
        service: Definition {
            name: "bench".to_string(),
            datacenter: "fakeaws".to_string(),
            vpc_subnet: "10.0.0.0/8".to_string(),
            networks,
            instances,
            security_groups,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for n in [10, 50, 200] {
        let p = payload(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &p, |b, p| {
            b.iter(|| black_box(validate(black_box(&p.service))));
        });
    }
    group.finish();
}

fn bench_convert_payload(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_payload");
    for n in [10, 50, 200] {
        let p = payload(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &p, |b, p| {
            b.iter(|| black_box(convert_payload(black_box(p))));
        });
    }
    group.finish();
}

fn bench_convert_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_message");
    for n in [10, 50, 200] {
        let message = convert_payload(&payload(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &message, |b, m| {
            b.iter(|| black_box(convert_message(black_box(m))));
        });
    }
    group.finish();
}

fn bench_merge_and_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_and_plan");
    for n in [10, 50, 200] {
        let p = payload(n);
        let mut applied = convert_payload(&p);
        for (i, item) in applied.instances.items.iter_mut().enumerate() {
            item.instance_aws_id = format!("i-{i}");
        }
        group.bench_with_input(BenchmarkId::from_parameter(n), &p, |b, p| {
            b.iter(|| {
                let mut message = convert_payload(p);
                merge_provider_data(&mut message, black_box(&applied));
                black_box(planner::plan(&message, Some(&applied)))
            });
        });
    }
    group.finish();
}

fn bench_message_json(c: &mut Criterion) {
    let message = convert_payload(&payload(50));
    let json = parser::message_to_json(&message).unwrap();

    c.bench_function("message_json_parse", |b| {
        b.iter(|| black_box(parser::parse_message(black_box(&json)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_validate,
    bench_convert_payload,
    bench_convert_message,
    bench_merge_and_plan,
    bench_message_json
);
criterion_main!(benches);
