// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The static routing table and link weights of one router.
//!
//! Routes are populated during topology construction. For every virtual
//! network each output link holds the set of destinations it can reach, and
//! every link carries one weight shared by all virtual networks. Lower
//! weights win, so the topology can bias which links are used. Correct
//! weight assignments are what provide deadlock avoidance when routing from
//! the table.

use crate::net_dest::NetDest;
use crate::routing_error;
use crate::types::{LinkId, RoutingResult, VnetId};

#[derive(Debug, Default)]
pub struct RoutingTable {
    /// `routes[vnet][link]`, kept rectangular.
    routes: Vec<Vec<NetDest>>,
    weights: Vec<i32>,
}

impl RoutingTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next output link with one destination set per virtual
    /// network.
    ///
    /// Virtual networks not covered by `entry` get an empty set for this
    /// link, and virtual networks seen for the first time are padded with
    /// empty sets for all earlier links.
    pub fn add_route(&mut self, entry: Vec<NetDest>) {
        let link = self.num_links();
        if entry.len() > self.routes.len() {
            self.routes
                .resize_with(entry.len(), || vec![NetDest::new(); link]);
        }

        let mut entry = entry.into_iter();
        for vnet_routes in &mut self.routes {
            vnet_routes.push(entry.next().unwrap_or_default());
        }
    }

    /// Set the weight of the next link.
    pub fn add_weight(&mut self, weight: i32) {
        self.weights.push(weight);
    }

    #[must_use]
    pub fn num_links(&self) -> usize {
        self.routes.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn num_vnets(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn weight(&self, link: LinkId) -> Option<i32> {
        self.weights.get(link).copied()
    }

    #[must_use]
    pub fn route(&self, vnet: VnetId, link: LinkId) -> Option<&NetDest> {
        self.routes.get(vnet).and_then(|links| links.get(link))
    }

    /// Returns true if `vnet` is one of `allowed`, or `allowed` places no
    /// restriction.
    #[must_use]
    pub fn supports_vnet(vnet: VnetId, allowed: &[VnetId]) -> bool {
        allowed.is_empty() || allowed.contains(&vnet)
    }

    /// Return, in link order, every link that reaches `destination` in
    /// `vnet` and has the lowest weight among those that do.
    ///
    /// An empty result means there is no route. A reachable link without a
    /// weight is an error.
    pub fn min_weight_candidates(
        &self,
        vnet: VnetId,
        destination: &NetDest,
    ) -> RoutingResult<Vec<LinkId>> {
        let Some(links) = self.routes.get(vnet) else {
            return Ok(Vec::new());
        };

        let mut reachable = Vec::new();
        let mut min_weight = i32::MAX;
        for (link, dest) in links.iter().enumerate() {
            if !destination.intersects(dest) {
                continue;
            }
            let Some(weight) = self.weight(link) else {
                return routing_error!(
                    "link {} reaches {} on vnet {} but has no weight",
                    link,
                    destination,
                    vnet
                );
            };
            if weight <= min_weight {
                min_weight = weight;
            }
            reachable.push((link, weight));
        }

        Ok(reachable
            .into_iter()
            .filter(|(_, weight)| *weight == min_weight)
            .map(|(link, _)| link)
            .collect())
    }
}
