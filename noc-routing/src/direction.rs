// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Symbolic port directions and the per-router registry mapping them to
//! port indices.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::types::RoutingError;

/// The direction a router port faces.
///
/// `Local` ports connect the router to network interfaces; the four cardinal
/// directions connect to neighbouring routers of the mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PortDirection {
    North,
    South,
    East,
    West,
    Local,
    #[default]
    Unknown,
}

impl PortDirection {
    /// The directions that move a flit between routers, in ledger order.
    pub const CARDINAL: [PortDirection; 4] = [
        PortDirection::North,
        PortDirection::South,
        PortDirection::East,
        PortDirection::West,
    ];

    /// Position of this direction within [`PortDirection::CARDINAL`].
    #[must_use]
    pub fn cardinal_index(self) -> Option<usize> {
        match self {
            PortDirection::North => Some(0),
            PortDirection::South => Some(1),
            PortDirection::East => Some(2),
            PortDirection::West => Some(3),
            PortDirection::Local | PortDirection::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_cardinal(self) -> bool {
        self.cardinal_index().is_some()
    }

    /// The direction a link leaving in `self` arrives from at the far end.
    #[must_use]
    pub fn opposite(self) -> PortDirection {
        match self {
            PortDirection::North => PortDirection::South,
            PortDirection::South => PortDirection::North,
            PortDirection::East => PortDirection::West,
            PortDirection::West => PortDirection::East,
            other => other,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for PortDirection {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" => Ok(PortDirection::North),
            "south" => Ok(PortDirection::South),
            "east" => Ok(PortDirection::East),
            "west" => Ok(PortDirection::West),
            "local" => Ok(PortDirection::Local),
            "unknown" => Ok(PortDirection::Unknown),
            _ => Err(RoutingError::Config(format!(
                "unable to parse port direction '{s}'"
            ))),
        }
    }
}

/// Mapping between port directions and port indices for one router.
///
/// Inputs and outputs are kept separately. Registering a direction again
/// replaces the index it resolves to, which is how several `Local` ports
/// share one direction: every index still resolves back to `Local`.
#[derive(Debug, Default)]
pub struct DirectionIndexMap {
    in_dirn_to_idx: HashMap<PortDirection, usize>,
    in_idx_to_dirn: HashMap<usize, PortDirection>,
    out_dirn_to_idx: HashMap<PortDirection, usize>,
    out_idx_to_dirn: HashMap<usize, PortDirection>,
}

impl DirectionIndexMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_in(&mut self, dirn: PortDirection, idx: usize) {
        self.in_dirn_to_idx.insert(dirn, idx);
        self.in_idx_to_dirn.insert(idx, dirn);
    }

    pub fn add_out(&mut self, dirn: PortDirection, idx: usize) {
        self.out_dirn_to_idx.insert(dirn, idx);
        self.out_idx_to_dirn.insert(idx, dirn);
    }

    #[must_use]
    pub fn in_index(&self, dirn: PortDirection) -> Option<usize> {
        self.in_dirn_to_idx.get(&dirn).copied()
    }

    #[must_use]
    pub fn in_direction(&self, idx: usize) -> Option<PortDirection> {
        self.in_idx_to_dirn.get(&idx).copied()
    }

    #[must_use]
    pub fn out_index(&self, dirn: PortDirection) -> Option<usize> {
        self.out_dirn_to_idx.get(&dirn).copied()
    }

    #[must_use]
    pub fn out_direction(&self, idx: usize) -> Option<PortDirection> {
        self.out_idx_to_dirn.get(&idx).copied()
    }

    #[must_use]
    pub fn num_in_ports(&self) -> usize {
        self.in_idx_to_dirn.len()
    }

    #[must_use]
    pub fn num_out_ports(&self) -> usize {
        self.out_idx_to_dirn.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        for dirn in [
            PortDirection::North,
            PortDirection::South,
            PortDirection::East,
            PortDirection::West,
            PortDirection::Local,
            PortDirection::Unknown,
        ] {
            assert_eq!(dirn.to_string().parse::<PortDirection>().unwrap(), dirn);
        }
        assert_eq!("EAST".parse::<PortDirection>().unwrap(), PortDirection::East);
        assert!("up".parse::<PortDirection>().is_err());
    }

    #[test]
    fn cardinal_only() {
        assert!(PortDirection::CARDINAL.iter().all(|d| d.is_cardinal()));
        assert!(!PortDirection::Local.is_cardinal());
        assert!(!PortDirection::Unknown.is_cardinal());
        for (i, d) in PortDirection::CARDINAL.iter().enumerate() {
            assert_eq!(d.cardinal_index(), Some(i));
            assert_eq!(d.opposite().opposite(), *d);
        }
    }

    #[test]
    fn inputs_and_outputs_are_separate() {
        let mut map = DirectionIndexMap::new();
        map.add_in(PortDirection::West, 2);
        map.add_out(PortDirection::East, 2);

        assert_eq!(map.in_index(PortDirection::West), Some(2));
        assert_eq!(map.in_index(PortDirection::East), None);
        assert_eq!(map.out_index(PortDirection::East), Some(2));
        assert_eq!(map.in_direction(2), Some(PortDirection::West));
        assert_eq!(map.out_direction(2), Some(PortDirection::East));
        assert_eq!(map.out_direction(3), None);
    }

    #[test]
    fn many_local_ports() {
        let mut map = DirectionIndexMap::new();
        map.add_out(PortDirection::Local, 0);
        map.add_out(PortDirection::Local, 1);

        assert_eq!(map.out_index(PortDirection::Local), Some(1));
        assert_eq!(map.out_direction(0), Some(PortDirection::Local));
        assert_eq!(map.out_direction(1), Some(PortDirection::Local));
        assert_eq!(map.num_out_ports(), 2);
    }
}
