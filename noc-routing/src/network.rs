// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The container for all routing units of a mesh.
//!
//! The [`Network`] owns the state that every routing unit shares: the
//! configuration, the [`CongestionLedger`] and the random number generator
//! used for tie-breaks. Routing units only reach other routers' trust
//! counters through the ledger, indexed by router id.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use noc_track::entity::Entity;
use noc_track::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::RoutingConfig;
use crate::direction::PortDirection;
use crate::flit::Flit;
use crate::ledger::{CongestionLedger, TrustCounters};
use crate::mesh::MeshConfig;
use crate::route::RouteInfo;
use crate::routing_error;
use crate::routing_unit::RoutingUnit;
use crate::types::{RouterId, RoutingError, RoutingResult};

/// State shared by all routing units of one network.
///
/// Simulation is single-threaded so interior mutability is enough; the
/// ledger is only changed by debiting a chosen direction or by crediting a
/// delivered flit's path.
pub struct NetworkState {
    pub config: RoutingConfig,
    pub mesh: MeshConfig,
    pub ledger: RefCell<CongestionLedger>,
    pub rng: RefCell<Xoshiro256PlusPlus>,
}

pub struct Network {
    pub entity: Rc<Entity>,
    state: Rc<NetworkState>,
    routers: Vec<RoutingUnit>,
}

impl Network {
    /// Create a network with one (empty) routing unit per mesh router.
    ///
    /// Ports and routes still need to be added, for example with
    /// [`build_mesh`](crate::topology::build_mesh).
    pub fn new(parent: &Rc<Entity>, name: &str, config: RoutingConfig) -> RoutingResult<Self> {
        config.validate()?;

        let entity = parent.child(name);
        let mesh = config.mesh();
        let ledger = CongestionLedger::new(&entity, mesh.num_routers(), config.initial_trust);
        let rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);

        info!(entity ;
            "{}x{} mesh, {} vnets, {} routing, ordered vnets {:?}, seed {}",
            mesh.num_cols(),
            mesh.num_rows(),
            config.num_vnets,
            config.routing_algorithm,
            config.ordered_vnets,
            config.seed
        );

        let state = Rc::new(NetworkState {
            config,
            mesh,
            ledger: RefCell::new(ledger),
            rng: RefCell::new(rng),
        });

        let routers = (0..mesh.num_routers())
            .map(|id| RoutingUnit::new(&entity, id, state.clone()))
            .collect();

        Ok(Self {
            entity,
            state,
            routers,
        })
    }

    #[must_use]
    pub fn config(&self) -> &RoutingConfig {
        &self.state.config
    }

    #[must_use]
    pub fn mesh(&self) -> MeshConfig {
        self.state.mesh
    }

    #[must_use]
    pub fn num_routers(&self) -> usize {
        self.routers.len()
    }

    pub fn router(&self, id: RouterId) -> RoutingResult<&RoutingUnit> {
        match self.routers.get(id) {
            Some(router) => Ok(router),
            None => routing_error!("{} has no router {}", self.entity, id),
        }
    }

    pub fn router_mut(&mut self, id: RouterId) -> RoutingResult<&mut RoutingUnit> {
        match self.routers.get_mut(id) {
            Some(router) => Ok(router),
            None => routing_error!("{} has no router {}", self.entity, id),
        }
    }

    pub fn routers_mut(&mut self) -> impl Iterator<Item = &mut RoutingUnit> {
        self.routers.iter_mut()
    }

    /// Decide the output port at `router` for `flit`, which arrived on
    /// `inport` facing `inport_dirn`.
    pub fn compute_output_port(
        &self,
        router: RouterId,
        route: &RouteInfo,
        inport: usize,
        inport_dirn: PortDirection,
        flit: &mut Flit,
    ) -> RoutingResult<usize> {
        self.router(router)?
            .outport_compute(route, inport, inport_dirn, flit)
    }

    /// Follow the link behind `outport` of `router`.
    ///
    /// Returns the neighbouring router together with the direction and index
    /// of the input port the flit arrives on there.
    pub fn next_hop(
        &self,
        router: RouterId,
        outport: usize,
    ) -> RoutingResult<(RouterId, PortDirection, usize)> {
        let Some(dirn) = self.router(router)?.directions().out_direction(outport) else {
            return routing_error!("router {} has no output port {}", router, outport);
        };
        let Some(next) = self.state.mesh.neighbour(router, dirn) else {
            return routing_error!(
                "output port {} ({}) of router {} leaves the mesh",
                outport,
                dirn,
                router
            );
        };
        let inport_dirn = dirn.opposite();
        let Some(inport) = self.router(next)?.directions().in_index(inport_dirn) else {
            return Err(RoutingError::UnknownDirection {
                router: next,
                direction: inport_dirn,
            });
        };
        Ok((next, inport_dirn, inport))
    }

    pub fn ledger(&self) -> Ref<'_, CongestionLedger> {
        self.state.ledger.borrow()
    }

    /// The trust counters currently held for `router`.
    pub fn trust(&self, router: RouterId) -> RoutingResult<TrustCounters> {
        self.state.ledger.borrow().counters(router)
    }
}
