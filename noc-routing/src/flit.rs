// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The path history carried by a flit.

use std::fmt;

use crate::direction::PortDirection;
use crate::types::RouterId;

/// The routing-relevant state of a flit.
///
/// The flit remembers every router it has been at (starting with the router
/// it was injected at) and the direction it left each of them in. The
/// router pipeline calls [`Flit::arrive_at`] when the flit enters a router
/// and the routing unit calls [`Flit::add_direction`] when it picks the
/// output, so at the destination `directions().len() + 1 == path().len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Flit {
    id: u64,
    directions: Vec<PortDirection>,
    path: Vec<RouterId>,
}

impl Flit {
    #[must_use]
    pub fn new(id: u64, origin: RouterId) -> Self {
        Self {
            id,
            directions: Vec::new(),
            path: vec![origin],
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Record that the flit has entered `router`.
    pub fn arrive_at(&mut self, router: RouterId) {
        self.path.push(router);
    }

    /// Record the direction the flit is leaving the current router in.
    pub fn add_direction(&mut self, dirn: PortDirection) {
        self.directions.push(dirn);
    }

    #[must_use]
    pub fn directions(&self) -> &[PortDirection] {
        &self.directions
    }

    #[must_use]
    pub fn path(&self) -> &[RouterId] {
        &self.path
    }

    /// The router the flit is currently at.
    #[must_use]
    pub fn current_router(&self) -> RouterId {
        // The path always holds at least the origin
        self.path[self.path.len() - 1]
    }

    /// Number of router-to-router hops taken so far.
    #[must_use]
    pub fn num_hops(&self) -> usize {
        self.path.len() - 1
    }
}

impl fmt::Display for Flit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "flit{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_grows_per_hop() {
        let mut flit = Flit::new(7, 0);
        assert_eq!(flit.path(), &[0]);
        assert_eq!(flit.current_router(), 0);
        assert_eq!(flit.num_hops(), 0);

        flit.add_direction(PortDirection::East);
        flit.arrive_at(1);
        flit.add_direction(PortDirection::North);
        flit.arrive_at(5);

        assert_eq!(flit.path(), &[0, 1, 5]);
        assert_eq!(
            flit.directions(),
            &[PortDirection::East, PortDirection::North]
        );
        assert_eq!(flit.directions().len() + 1, flit.path().len());
        assert_eq!(flit.current_router(), 5);
        assert_eq!(flit.num_hops(), 2);
        assert_eq!(flit.to_string(), "flit7");
    }
}
