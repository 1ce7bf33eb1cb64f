// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::fmt;

use noc_routing::mesh::MeshConfig;
use noc_routing::types::RouterId;
use rand::SeedableRng;
use rand::seq::IteratorRandom;
use rand_xoshiro::Xoshiro256PlusPlus;

#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, PartialEq)]
pub enum TrafficPattern {
    /// Every packet goes to a random router
    #[default]
    UniformRandom,

    /// Router (x, y) sends to router (y, x)
    Transpose,

    /// All routers send to one router chosen at random
    AllToOne,

    /// Every router sends to its eastern neighbour, wrapping within the row
    Neighbour,
}

impl fmt::Display for TrafficPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Chooses the destination router of every packet.
pub struct TrafficGen {
    mesh: MeshConfig,
    pattern: TrafficPattern,
    hotspot: RouterId,
    rng: Xoshiro256PlusPlus,
}

impl TrafficGen {
    #[must_use]
    pub fn new(mesh: MeshConfig, pattern: TrafficPattern, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let hotspot = (0..mesh.num_routers()).choose(&mut rng).unwrap_or(0);
        Self {
            mesh,
            pattern,
            hotspot,
            rng,
        }
    }

    #[must_use]
    pub fn pattern(&self) -> TrafficPattern {
        self.pattern
    }

    /// The router every source sends to under [`TrafficPattern::AllToOne`].
    #[must_use]
    pub fn hotspot(&self) -> RouterId {
        self.hotspot
    }

    /// Destination of the next packet from `src`, or `None` if the pattern
    /// would have `src` send to itself.
    pub fn next_dest(&mut self, src: RouterId) -> Option<RouterId> {
        let num_routers = self.mesh.num_routers();
        let dest = match self.pattern {
            TrafficPattern::UniformRandom => (0..num_routers)
                .filter(|r| *r != src)
                .choose(&mut self.rng)?,
            TrafficPattern::Transpose => {
                let (x, y) = self.mesh.coords(src);
                self.mesh
                    .router_id(y % self.mesh.num_cols(), x % self.mesh.num_rows())
            }
            TrafficPattern::AllToOne => self.hotspot,
            TrafficPattern::Neighbour => {
                let (x, y) = self.mesh.coords(src);
                self.mesh.router_id((x + 1) % self.mesh.num_cols(), y)
            }
        };

        if dest == src { None } else { Some(dest) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transpose_swaps_coordinates() {
        let mesh = MeshConfig::new(4, 4);
        let mut traffic = TrafficGen::new(mesh, TrafficPattern::Transpose, 1);
        assert_eq!(traffic.next_dest(1), Some(4));
        assert_eq!(traffic.next_dest(14), Some(11));
        assert_eq!(traffic.next_dest(5), None);
    }

    #[test]
    fn neighbour_wraps_in_row() {
        let mesh = MeshConfig::new(2, 3);
        let mut traffic = TrafficGen::new(mesh, TrafficPattern::Neighbour, 1);
        assert_eq!(traffic.next_dest(0), Some(1));
        assert_eq!(traffic.next_dest(2), Some(0));
        assert_eq!(traffic.next_dest(5), Some(3));
    }

    #[test]
    fn all_to_one_skips_hotspot() {
        let mesh = MeshConfig::new(4, 4);
        let mut traffic = TrafficGen::new(mesh, TrafficPattern::AllToOne, 3);
        let hotspot = traffic.hotspot();
        for src in 0..16 {
            let expected = if src == hotspot { None } else { Some(hotspot) };
            assert_eq!(traffic.next_dest(src), expected);
        }
    }

    #[test]
    fn uniform_random_never_sends_to_self() {
        let mesh = MeshConfig::new(3, 3);
        let mut traffic = TrafficGen::new(mesh, TrafficPattern::UniformRandom, 5);
        for _ in 0..50 {
            for src in 0..9 {
                let dest = traffic.next_dest(src).unwrap();
                assert_ne!(dest, src);
                assert!(mesh.contains(dest));
            }
        }
    }
}
