// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The routing unit of one router.
//!
//! The routing unit owns the router's static [`RoutingTable`] and
//! [`DirectionIndexMap`] and decides, for every flit, the index of the
//! output port it should leave on. The decision depends on where the flit
//! is going:
//!
//!  - at the destination router the flit's recorded path is credited in the
//!    [`CongestionLedger`](crate::ledger::CongestionLedger) and the local
//!    egress port is taken from the routing table (several network
//!    interfaces can share the `Local` direction, so only the table can
//!    name the right one);
//!  - elsewhere the configured [`RoutingAlgorithm`] picks the next hop.
//!
//! With the default [`RoutingAlgorithm::AdaptiveXy`] a flit that only has to
//! move along one axis is forced in that direction. When both axes still
//! need to be reduced the router compares its trust in the two productive
//! directions and takes the one with the higher value. Whatever direction
//! is taken is debited at this router and appended to the flit's history.
//!
//! The adaptive choice does not by itself guarantee deadlock freedom.

use std::rc::Rc;

use noc_track::entity::Entity;
use noc_track::{debug, trace};
use rand::Rng;

use crate::config::RoutingAlgorithm;
use crate::direction::{DirectionIndexMap, PortDirection};
use crate::flit::Flit;
use crate::net_dest::NetDest;
use crate::network::NetworkState;
use crate::route::RouteInfo;
use crate::routing_error;
use crate::table::RoutingTable;
use crate::types::{LinkId, RouterId, RoutingError, RoutingResult, VnetId};

pub struct RoutingUnit {
    pub entity: Rc<Entity>,
    id: RouterId,
    table: RoutingTable,
    directions: DirectionIndexMap,
    state: Rc<NetworkState>,
}

impl RoutingUnit {
    #[must_use]
    pub fn new(parent: &Rc<Entity>, id: RouterId, state: Rc<NetworkState>) -> Self {
        Self {
            entity: parent.child(&format!("router{id}")),
            id,
            table: RoutingTable::new(),
            directions: DirectionIndexMap::new(),
            state,
        }
    }

    #[must_use]
    pub fn id(&self) -> RouterId {
        self.id
    }

    #[must_use]
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    #[must_use]
    pub fn directions(&self) -> &DirectionIndexMap {
        &self.directions
    }

    /// Register the next output link. See [`RoutingTable::add_route`].
    pub fn add_route(&mut self, entry: Vec<NetDest>) {
        self.table.add_route(entry);
    }

    /// Set the weight of the next output link.
    pub fn add_weight(&mut self, weight: i32) {
        self.table.add_weight(weight);
    }

    #[must_use]
    pub fn supports_vnet(&self, vnet: VnetId, allowed: &[VnetId]) -> bool {
        RoutingTable::supports_vnet(vnet, allowed)
    }

    pub fn add_in_direction(&mut self, dirn: PortDirection, idx: usize) {
        self.directions.add_in(dirn, idx);
    }

    pub fn add_out_direction(&mut self, dirn: PortDirection, idx: usize) {
        self.directions.add_out(dirn, idx);
    }

    /// Pick the output link for `destination` in `vnet` from the routing
    /// table.
    ///
    /// Only the lowest-weight links that reach the destination are
    /// considered. Ordered virtual networks always take the first of them
    /// so that packets cannot overtake each other; otherwise one is chosen
    /// at random.
    pub fn lookup_routing_table(
        &self,
        vnet: VnetId,
        destination: &NetDest,
    ) -> RoutingResult<LinkId> {
        let candidates = self.table.min_weight_candidates(vnet, destination)?;
        if candidates.is_empty() {
            return Err(RoutingError::NoRoute {
                router: self.id,
                vnet,
                destination: destination.clone(),
            });
        }

        let candidate = if self.state.config.is_vnet_ordered(vnet) {
            0
        } else {
            self.state.rng.borrow_mut().random_range(0..candidates.len())
        };
        let link = candidates[candidate];
        trace!(self.entity ;
            "table: vnet{} {} -> link {} of {:?}",
            vnet, destination, link, candidates
        );
        Ok(link)
    }

    /// Compute the output port for `flit` which is at this router having
    /// arrived on `inport` (facing `inport_dirn`).
    pub fn outport_compute(
        &self,
        route: &RouteInfo,
        inport: usize,
        inport_dirn: PortDirection,
        flit: &mut Flit,
    ) -> RoutingResult<usize> {
        if route.dest_router == self.id {
            assert_eq!(
                flit.directions().len() + 1,
                flit.path().len(),
                "{flit} reached router {} with an inconsistent history",
                self.id
            );

            self.state
                .ledger
                .borrow_mut()
                .credit_path(flit.path(), flit.directions())?;
            debug!(self.entity ;
                "{} delivered after {} hops, credited {:?}",
                flit,
                flit.num_hops(),
                flit.directions()
            );

            return self.lookup_routing_table(route.vnet, &route.net_dest);
        }

        match self.state.config.routing_algorithm {
            RoutingAlgorithm::Table => self.outport_compute_table(route, flit),
            RoutingAlgorithm::Xy => self.outport_compute_xy(route, inport_dirn, flit),
            RoutingAlgorithm::AdaptiveXy => self.outport_compute_dxy(route, flit),
            RoutingAlgorithm::Custom => self.outport_compute_custom(route, inport, inport_dirn),
        }
    }

    /// Route a transit hop from the routing table, recording the direction
    /// of the chosen port on the flit.
    pub fn outport_compute_table(
        &self,
        route: &RouteInfo,
        flit: &mut Flit,
    ) -> RoutingResult<usize> {
        let outport = self.lookup_routing_table(route.vnet, &route.net_dest)?;
        let dirn = self
            .directions
            .out_direction(outport)
            .unwrap_or(PortDirection::Unknown);
        flit.add_direction(dirn);
        Ok(outport)
    }

    /// Adaptive dimension-order routing guided by this router's trust
    /// counters.
    pub fn outport_compute_dxy(&self, route: &RouteInfo, flit: &mut Flit) -> RoutingResult<usize> {
        let (x_hops, y_hops) = self.hops_to(route.dest_router)?;

        let outport_dirn = if x_hops == 0 || y_hops == 0 {
            if x_hops == 0 {
                if y_hops > 0 {
                    PortDirection::North
                } else {
                    PortDirection::South
                }
            } else if x_hops > 0 {
                PortDirection::East
            } else {
                PortDirection::West
            }
        } else {
            let vertical = if y_hops > 0 {
                PortDirection::North
            } else {
                PortDirection::South
            };
            let horizontal = if x_hops > 0 {
                PortDirection::East
            } else {
                PortDirection::West
            };
            self.choose_by_trust(vertical, horizontal)?
        };

        let outport = self.outport_for(outport_dirn)?;
        self.state
            .ledger
            .borrow_mut()
            .decrement(self.id, outport_dirn)?;
        flit.add_direction(outport_dirn);
        trace!(self.entity ;
            "dxy: {} to {} ({}, {}) -> {}",
            flit, route.dest_router, x_hops, y_hops, outport_dirn
        );
        Ok(outport)
    }

    /// Compare the trust of the two productive directions. The more trusted
    /// one wins. Equal trust goes East when heading East, South when heading
    /// South-West and West when heading North-West.
    fn choose_by_trust(
        &self,
        vertical: PortDirection,
        horizontal: PortDirection,
    ) -> RoutingResult<PortDirection> {
        let ledger = self.state.ledger.borrow();
        let vertical_trust = ledger.value(self.id, vertical)?;
        let horizontal_trust = ledger.value(self.id, horizontal)?;

        let dirn = match (vertical, horizontal) {
            (PortDirection::South, PortDirection::West) => {
                if horizontal_trust > vertical_trust {
                    horizontal
                } else {
                    vertical
                }
            }
            _ => {
                if vertical_trust > horizontal_trust {
                    vertical
                } else {
                    horizontal
                }
            }
        };
        trace!(self.entity ;
            "trust {}={} {}={} -> {}",
            vertical, vertical_trust, horizontal, horizontal_trust, dirn
        );
        Ok(dirn)
    }

    /// Deterministic X-then-Y routing using port directions.
    ///
    /// Checks that the flit is not turning back on itself or moving from the
    /// Y to the X dimension.
    pub fn outport_compute_xy(
        &self,
        route: &RouteInfo,
        inport_dirn: PortDirection,
        flit: &mut Flit,
    ) -> RoutingResult<usize> {
        let (x_hops, y_hops) = self.hops_to(route.dest_router)?;

        let outport_dirn = if x_hops > 0 {
            if inport_dirn != PortDirection::Local && inport_dirn != PortDirection::West {
                return routing_error!(
                    "xy: router {} cannot send East a flit that arrived from {}",
                    self.id,
                    inport_dirn
                );
            }
            PortDirection::East
        } else if x_hops < 0 {
            if inport_dirn != PortDirection::Local && inport_dirn != PortDirection::East {
                return routing_error!(
                    "xy: router {} cannot send West a flit that arrived from {}",
                    self.id,
                    inport_dirn
                );
            }
            PortDirection::West
        } else if y_hops > 0 {
            if inport_dirn == PortDirection::North {
                return routing_error!(
                    "xy: router {} cannot send North a flit that arrived from North",
                    self.id
                );
            }
            PortDirection::North
        } else {
            if inport_dirn == PortDirection::South {
                return routing_error!(
                    "xy: router {} cannot send South a flit that arrived from South",
                    self.id
                );
            }
            PortDirection::South
        };

        let outport = self.outport_for(outport_dirn)?;
        flit.add_direction(outport_dirn);
        trace!(self.entity ; "xy: {} to {} -> {}", flit, route.dest_router, outport_dirn);
        Ok(outport)
    }

    /// Placeholder for a topology-specific adaptive algorithm. Always fails.
    pub fn outport_compute_custom(
        &self,
        route: &RouteInfo,
        inport: usize,
        inport_dirn: PortDirection,
    ) -> RoutingResult<usize> {
        debug!(self.entity ;
            "custom routing requested for {} from port {} ({})",
            route, inport, inport_dirn
        );
        Err(RoutingError::Unimplemented(
            "outport_compute_custom".to_string(),
        ))
    }

    /// Signed hops to `dest`, which must be another router of the mesh.
    fn hops_to(&self, dest: RouterId) -> RoutingResult<(i64, i64)> {
        let mesh = self.state.mesh;
        if !mesh.contains(dest) {
            return routing_error!(
                "router {} asked to route to {} outside the {}x{} mesh",
                self.id,
                dest,
                mesh.num_cols(),
                mesh.num_rows()
            );
        }
        let (x_hops, y_hops) = mesh.hops(self.id, dest);
        if x_hops == 0 && y_hops == 0 {
            return routing_error!(
                "router {} asked to route a transit hop to itself",
                self.id
            );
        }
        Ok((x_hops, y_hops))
    }

    fn outport_for(&self, dirn: PortDirection) -> RoutingResult<usize> {
        self.directions
            .out_index(dirn)
            .ok_or(RoutingError::UnknownDirection {
                router: self.id,
                direction: dirn,
            })
    }
}
