// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The congestion ledger ("trust") used to steer adaptive tie-breaks.
//!
//! Every router owns four counters, one per cardinal direction. A router
//! debits a direction each time it sends a flit that way, and once the flit
//! reaches its destination every (router, direction) pair on its path is
//! credited again. Directions that keep delivering flits therefore look more
//! attractive to the next adaptive decision.
//!
//! Each counter is tracked as a _value_ on its own entity
//! (`...::ledger::router3::east`) so the history of a counter can be
//! followed in the trace output.

use std::rc::Rc;

use noc_track::entity::Entity;
use noc_track::{trace, value};

use crate::direction::PortDirection;
use crate::routing_error;
use crate::types::{RouterId, RoutingResult};

/// The trust counters held for one router.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrustCounters {
    pub north: i64,
    pub south: i64,
    pub east: i64,
    pub west: i64,
}

impl TrustCounters {
    #[must_use]
    pub fn new(initial: i64) -> Self {
        Self {
            north: initial,
            south: initial,
            east: initial,
            west: initial,
        }
    }

    /// Counter for `dirn`, or `None` for non-cardinal directions.
    #[must_use]
    pub fn get(&self, dirn: PortDirection) -> Option<i64> {
        match dirn {
            PortDirection::North => Some(self.north),
            PortDirection::South => Some(self.south),
            PortDirection::East => Some(self.east),
            PortDirection::West => Some(self.west),
            PortDirection::Local | PortDirection::Unknown => None,
        }
    }

    fn get_mut(&mut self, dirn: PortDirection) -> Option<&mut i64> {
        match dirn {
            PortDirection::North => Some(&mut self.north),
            PortDirection::South => Some(&mut self.south),
            PortDirection::East => Some(&mut self.east),
            PortDirection::West => Some(&mut self.west),
            PortDirection::Local | PortDirection::Unknown => None,
        }
    }
}

pub struct CongestionLedger {
    pub entity: Rc<Entity>,
    counters: Vec<TrustCounters>,
    counter_entities: Vec<[Entity; 4]>,
}

impl CongestionLedger {
    #[must_use]
    pub fn new(parent: &Rc<Entity>, num_routers: usize, initial: i64) -> Self {
        let entity = parent.child("ledger");
        let counter_entities = (0..num_routers)
            .map(|router| {
                let router_entity = entity.child(&format!("router{router}"));
                std::array::from_fn(|i| {
                    let name = PortDirection::CARDINAL[i].to_string().to_lowercase();
                    Entity::new(&router_entity, &name)
                })
            })
            .collect();

        Self {
            entity,
            counters: vec![TrustCounters::new(initial); num_routers],
            counter_entities,
        }
    }

    #[must_use]
    pub fn num_routers(&self) -> usize {
        self.counters.len()
    }

    /// All four counters of `router`.
    pub fn counters(&self, router: RouterId) -> RoutingResult<TrustCounters> {
        match self.counters.get(router) {
            Some(counters) => Ok(*counters),
            None => routing_error!("ledger has no entry for router {}", router),
        }
    }

    /// The counter of `router` for the cardinal direction `dirn`.
    pub fn value(&self, router: RouterId, dirn: PortDirection) -> RoutingResult<i64> {
        match self.counters(router)?.get(dirn) {
            Some(value) => Ok(value),
            None => routing_error!("ledger has no {} counter", dirn),
        }
    }

    /// Debit `dirn` at `router` because a flit was sent that way.
    pub fn decrement(&mut self, router: RouterId, dirn: PortDirection) -> RoutingResult<i64> {
        self.update(router, dirn, -1)
    }

    /// Credit `dirn` at `router` because a flit sent that way arrived.
    pub fn increment(&mut self, router: RouterId, dirn: PortDirection) -> RoutingResult<i64> {
        self.update(router, dirn, 1)
    }

    /// Credit every (router, direction) step of a completed path.
    ///
    /// `routers` holds the routers visited, starting with the origin, and
    /// `directions[i]` the direction taken when leaving `routers[i]`. Steps
    /// that did not leave along a mesh axis are skipped.
    pub fn credit_path(
        &mut self,
        routers: &[RouterId],
        directions: &[PortDirection],
    ) -> RoutingResult<()> {
        for (router, dirn) in routers.iter().zip(directions) {
            if dirn.is_cardinal() {
                self.increment(*router, *dirn)?;
            }
        }
        Ok(())
    }

    fn update(&mut self, router: RouterId, dirn: PortDirection, delta: i64) -> RoutingResult<i64> {
        let Some(counters) = self.counters.get_mut(router) else {
            return routing_error!("ledger has no entry for router {}", router);
        };
        let Some(counter) = counters.get_mut(dirn) else {
            return routing_error!("ledger has no {} counter", dirn);
        };
        *counter += delta;
        let new_value = *counter;

        trace!(self.entity ; "router{} {}: {}", router, dirn, new_value);
        if let Some(i) = dirn.cardinal_index() {
            let counter_entity = &self.counter_entities[router][i];
            value!(counter_entity ; new_value);
        }
        Ok(new_value)
    }
}

#[cfg(test)]
mod tests {
    use noc_track::entity::toplevel;
    use noc_track::test_helpers::create_in_memory_tracker;
    use noc_track::tracker::dev_null_tracker;

    use super::*;

    fn ledger(num_routers: usize, initial: i64) -> CongestionLedger {
        let tracker = dev_null_tracker();
        let top = toplevel(&tracker, "top");
        CongestionLedger::new(&top, num_routers, initial)
    }

    #[test]
    fn starts_at_initial_value() {
        let ledger = ledger(4, 3);
        assert_eq!(ledger.num_routers(), 4);
        assert_eq!(ledger.counters(3), Ok(TrustCounters::new(3)));
        assert_eq!(ledger.value(0, PortDirection::West), Ok(3));
        assert!(ledger.counters(4).is_err());
        assert!(ledger.value(0, PortDirection::Local).is_err());
    }

    #[test]
    fn decrement_and_increment() {
        let mut ledger = ledger(2, 0);
        assert_eq!(ledger.decrement(1, PortDirection::North), Ok(-1));
        assert_eq!(ledger.decrement(1, PortDirection::North), Ok(-2));
        assert_eq!(ledger.increment(1, PortDirection::North), Ok(-1));
        assert_eq!(
            ledger.counters(1),
            Ok(TrustCounters {
                north: -1,
                south: 0,
                east: 0,
                west: 0
            })
        );
        assert_eq!(ledger.counters(0), Ok(TrustCounters::new(0)));
        assert!(ledger.decrement(2, PortDirection::North).is_err());
        assert!(ledger.increment(0, PortDirection::Unknown).is_err());
    }

    #[test]
    fn credit_path_skips_local() {
        let mut ledger = ledger(3, 0);
        ledger
            .credit_path(
                &[0, 1, 2],
                &[
                    PortDirection::East,
                    PortDirection::Local,
                    PortDirection::North,
                ],
            )
            .unwrap();

        assert_eq!(ledger.value(0, PortDirection::East), Ok(1));
        assert_eq!(ledger.counters(1), Ok(TrustCounters::new(0)));
        assert_eq!(ledger.value(2, PortDirection::North), Ok(1));
    }

    #[test]
    fn counters_are_tracked_as_values() {
        let (in_memory, tracker) = create_in_memory_tracker(log::Level::Trace);
        let top = toplevel(&tracker, "top");
        let mut ledger = CongestionLedger::new(&top, 2, 5);

        ledger.decrement(1, PortDirection::East).unwrap();
        ledger.increment(1, PortDirection::East).unwrap();

        assert_eq!(
            in_memory.values_for("top::ledger::router1::east"),
            vec![4.0, 5.0]
        );
        assert!(in_memory.values_for("top::ledger::router0::east").is_empty());
        assert_eq!(in_memory.logs_for("top::ledger").len(), 2);
    }
}
