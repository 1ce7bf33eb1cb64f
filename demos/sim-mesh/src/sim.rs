// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A cycle-stepped driver that moves flits through a [`Network`].
//!
//! Every cycle each source router injects at most one new packet (until it
//! has sent its quota) and every flit in flight moves one hop. Links have no
//! capacity limit, so flits never wait; the interest is in how the routing
//! decisions and the congestion ledger evolve as traffic interleaves.

use std::rc::Rc;

use noc_routing::direction::PortDirection;
use noc_routing::flit::Flit;
use noc_routing::network::Network;
use noc_routing::route::RouteInfo;
use noc_routing::routing_error;
use noc_routing::types::{RouterId, RoutingResult, VnetId};
use noc_track::entity::Entity;
use noc_track::{debug, info, trace, warn};

use crate::traffic::TrafficGen;

/// Parameters of one simulation run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Number of packets each router sends.
    pub packets_per_source: usize,

    /// Virtual network all packets are sent on.
    pub vnet: VnetId,

    /// Give up if traffic has not drained after this many cycles.
    pub max_cycles: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            packets_per_source: 10,
            vnet: 0,
            max_cycles: 10_000,
        }
    }
}

/// Results of a simulation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimStats {
    pub injected: usize,
    pub delivered: usize,
    pub total_hops: usize,
    pub max_hops: usize,
    pub total_latency: u64,
    pub cycles: u64,
}

impl SimStats {
    #[must_use]
    pub fn mean_hops(&self) -> f64 {
        if self.delivered == 0 {
            0.0
        } else {
            self.total_hops as f64 / self.delivered as f64
        }
    }

    #[must_use]
    pub fn mean_latency(&self) -> f64 {
        if self.delivered == 0 {
            0.0
        } else {
            self.total_latency as f64 / self.delivered as f64
        }
    }
}

struct InFlight {
    route: RouteInfo,
    flit: Flit,
    router: RouterId,
    inport: usize,
    inport_dirn: PortDirection,
    injected_at: u64,
}

pub struct MeshSim<'a> {
    pub entity: Rc<Entity>,
    network: &'a Network,
    traffic: TrafficGen,
    config: SimConfig,
    in_flight: Vec<InFlight>,
    sent: Vec<usize>,
    next_flit_id: u64,
    stats: SimStats,
}

impl<'a> MeshSim<'a> {
    #[must_use]
    pub fn new(
        parent: &Rc<Entity>,
        network: &'a Network,
        traffic: TrafficGen,
        config: SimConfig,
    ) -> Self {
        Self {
            entity: parent.child("sim"),
            network,
            traffic,
            config,
            in_flight: Vec::new(),
            sent: vec![0; network.num_routers()],
            next_flit_id: 0,
            stats: SimStats::default(),
        }
    }

    /// Run until all packets have been delivered.
    pub fn run(mut self) -> RoutingResult<SimStats> {
        info!(self.entity ;
            "{} packets per source on vnet {} with {} traffic",
            self.config.packets_per_source,
            self.config.vnet,
            self.traffic.pattern()
        );

        loop {
            let injecting = self.inject();
            if !injecting && self.in_flight.is_empty() {
                break;
            }
            if self.stats.cycles >= self.config.max_cycles {
                return routing_error!(
                    "{} flits still in flight after {} cycles",
                    self.in_flight.len(),
                    self.stats.cycles
                );
            }
            self.step()?;
            self.stats.cycles += 1;
        }

        if self.stats.injected == 0 {
            warn!(self.entity ; "no packets were injected");
        }

        info!(self.entity ;
            "{}/{} packets delivered in {} cycles",
            self.stats.delivered, self.stats.injected, self.stats.cycles
        );
        Ok(self.stats)
    }

    /// Inject one packet per source that still has packets to send. Returns
    /// false once every source has finished.
    fn inject(&mut self) -> bool {
        let mut injecting = false;
        for src in 0..self.sent.len() {
            if self.sent[src] >= self.config.packets_per_source {
                continue;
            }
            injecting = true;
            self.sent[src] += 1;

            let Some(dest) = self.traffic.next_dest(src) else {
                continue;
            };
            let flit = Flit::new(self.next_flit_id, src);
            self.next_flit_id += 1;
            trace!(self.entity ; "inject {} {}->{}", flit, src, dest);

            self.in_flight.push(InFlight {
                route: RouteInfo::to_router(src, dest, self.config.vnet),
                flit,
                router: src,
                inport: 0,
                inport_dirn: PortDirection::Local,
                injected_at: self.stats.cycles,
            });
            self.stats.injected += 1;
        }
        injecting
    }

    /// Make one routing decision for every flit in flight.
    fn step(&mut self) -> RoutingResult<()> {
        let mut still_in_flight = Vec::with_capacity(self.in_flight.len());
        for mut packet in self.in_flight.drain(..) {
            let outport = self.network.compute_output_port(
                packet.router,
                &packet.route,
                packet.inport,
                packet.inport_dirn,
                &mut packet.flit,
            )?;

            if packet.router == packet.route.dest_router {
                let hops = packet.flit.num_hops();
                let latency = self.stats.cycles - packet.injected_at;
                debug!(self.entity ;
                    "{} delivered at router {} port {} after {} hops",
                    packet.flit, packet.router, outport, hops
                );
                self.stats.delivered += 1;
                self.stats.total_hops += hops;
                self.stats.max_hops = self.stats.max_hops.max(hops);
                self.stats.total_latency += latency;
                continue;
            }

            let (next, inport_dirn, inport) = self.network.next_hop(packet.router, outport)?;
            packet.flit.arrive_at(next);
            packet.router = next;
            packet.inport = inport;
            packet.inport_dirn = inport_dirn;
            still_in_flight.push(packet);
        }
        self.in_flight = still_in_flight;
        Ok(())
    }
}
