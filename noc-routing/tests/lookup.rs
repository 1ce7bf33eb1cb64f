// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use noc_routing::config::RoutingConfig;
use noc_routing::net_dest::NetDest;
use noc_routing::network::Network;
use noc_routing::topology::build_mesh;
use noc_track::entity::toplevel;
use noc_track::test_helpers::create_tracker;

fn dests(nodes: &[usize]) -> NetDest {
    nodes.iter().copied().collect()
}

/// Router 0 gets four links in two vnets. Links 1, 2 and 3 all reach node 9
/// with the lowest weight, link 0 reaches it with a higher weight.
fn network_with_parallel_links(seed: u64) -> Network {
    let tracker = create_tracker(file!());
    let top = toplevel(&tracker, "top");
    let config = RoutingConfig {
        num_vnets: 2,
        ordered_vnets: vec![1],
        seed,
        ..Default::default()
    };
    let mut network = Network::new(&top, "network", config).unwrap();

    let router = network.router_mut(0).unwrap();
    for (nodes, weight) in [
        (vec![9usize, 10], 5),
        (vec![9], 1),
        (vec![8, 9], 1),
        (vec![9, 11], 1),
    ] {
        router.add_route(vec![dests(&nodes), dests(&nodes)]);
        router.add_weight(weight);
    }
    network
}

#[test]
fn ordered_vnet_is_deterministic() {
    let network = network_with_parallel_links(1);
    let router = network.router(0).unwrap();
    for _ in 0..100 {
        assert_eq!(router.lookup_routing_table(1, &dests(&[9])), Ok(1));
    }
}

#[test]
fn ordered_vnet_ignores_seed() {
    for seed in 0..10 {
        let network = network_with_parallel_links(seed);
        let router = network.router(0).unwrap();
        assert_eq!(router.lookup_routing_table(1, &dests(&[9])), Ok(1));
    }
}

#[test]
fn unordered_vnet_uses_every_candidate() {
    let network = network_with_parallel_links(7);
    let router = network.router(0).unwrap();

    let mut counts = [0; 4];
    for _ in 0..300 {
        let link = router.lookup_routing_table(0, &dests(&[9])).unwrap();
        counts[link] += 1;
    }
    assert_eq!(counts[0], 0, "higher weight link must never be used");
    for (link, count) in counts.iter().enumerate().skip(1) {
        assert!(*count > 0, "link {link} starved: {counts:?}");
    }
}

#[test]
fn unordered_vnet_is_repeatable_with_seed() {
    let picks = |seed| {
        let network = network_with_parallel_links(seed);
        let router = network.router(0).unwrap();
        (0..20)
            .map(|_| router.lookup_routing_table(0, &dests(&[9])).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(3), picks(3));
}

#[test]
fn single_candidate_is_used() {
    let network = network_with_parallel_links(1);
    let router = network.router(0).unwrap();
    assert_eq!(router.lookup_routing_table(0, &dests(&[10])), Ok(0));
    assert_eq!(router.lookup_routing_table(0, &dests(&[8])), Ok(2));
    assert_eq!(router.lookup_routing_table(0, &dests(&[11])), Ok(3));
}

#[test]
fn lookup_returns_reaching_min_weight_link() {
    let tracker = create_tracker(file!());
    let top = toplevel(&tracker, "top");
    let config = RoutingConfig {
        num_rows: 3,
        num_cols: 5,
        ..Default::default()
    };
    let mut network = Network::new(&top, "network", config).unwrap();
    build_mesh(&mut network).unwrap();

    for id in 0..network.num_routers() {
        let router = network.router(id).unwrap();
        let table = router.table();
        for dest in 0..network.num_routers() {
            let destination = NetDest::single(dest);
            let link = router.lookup_routing_table(0, &destination).unwrap();

            assert!(table.route(0, link).unwrap().intersects(&destination));
            let min_weight = (0..table.num_links())
                .filter(|l| table.route(0, *l).unwrap().intersects(&destination))
                .map(|l| table.weight(l).unwrap())
                .min()
                .unwrap();
            assert_eq!(table.weight(link), Some(min_weight));
        }
    }
}

#[test]
fn supports_vnet() {
    let network = network_with_parallel_links(1);
    let router = network.router(0).unwrap();
    assert!(router.supports_vnet(1, &[]));
    assert!(router.supports_vnet(1, &[0, 1]));
    assert!(!router.supports_vnet(1, &[0]));
}
