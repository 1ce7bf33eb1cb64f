// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Populate the routing units of a [`Network`] as a standard mesh.
//!
//! Every router gets one network interface on output/input port 0 (facing
//! `Local`) followed by one port per neighbouring router. A link leaving in
//! a cardinal direction reaches every router on that side of the current
//! one. Horizontal links are given a lower weight than vertical ones so that
//! routing from the table alone behaves as X-then-Y.
//!
//! The end-point attached to router `i` is end-point `i`.

use noc_track::debug;

use crate::direction::PortDirection;
use crate::net_dest::NetDest;
use crate::network::Network;
use crate::types::RoutingResult;

/// Weight of the link to the local network interface.
pub const LOCAL_WEIGHT: i32 = 1;

/// Weight of East/West links.
pub const HORIZONTAL_WEIGHT: i32 = 1;

/// Weight of North/South links.
pub const VERTICAL_WEIGHT: i32 = 2;

/// Add ports, routes and weights to every routing unit of `network`.
pub fn build_mesh(network: &mut Network) -> RoutingResult<()> {
    let mesh = network.mesh();
    let num_vnets = network.config().num_vnets;
    let num_routers = mesh.num_routers();

    for router in network.routers_mut() {
        let id = router.id();
        let (my_x, my_y) = mesh.coords(id);

        router.add_in_direction(PortDirection::Local, 0);
        router.add_out_direction(PortDirection::Local, 0);
        router.add_route(vec![NetDest::single(id); num_vnets]);
        router.add_weight(LOCAL_WEIGHT);

        let mut port = 1;
        for dirn in PortDirection::CARDINAL {
            if mesh.neighbour(id, dirn).is_none() {
                continue;
            }

            let reachable: NetDest = (0..num_routers)
                .filter(|dest| {
                    let (x, y) = mesh.coords(*dest);
                    match dirn {
                        PortDirection::North => y > my_y,
                        PortDirection::South => y < my_y,
                        PortDirection::East => x > my_x,
                        PortDirection::West => x < my_x,
                        PortDirection::Local | PortDirection::Unknown => false,
                    }
                })
                .collect();

            let weight = match dirn {
                PortDirection::East | PortDirection::West => HORIZONTAL_WEIGHT,
                _ => VERTICAL_WEIGHT,
            };

            // Input and output to the same neighbour share a port index
            router.add_in_direction(dirn, port);
            router.add_out_direction(dirn, port);
            router.add_route(vec![reachable; num_vnets]);
            router.add_weight(weight);
            port += 1;
        }
        debug!(router.entity ; "{} ports", port);
    }
    Ok(())
}
