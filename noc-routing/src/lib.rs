// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Output-port decision engine for the routers of a 2D mesh network-on-chip.
//!
//! For every flit arriving at a router the engine decides which output port
//! the flit leaves on. Two strategies cooperate:
//!
//!  - a static, topology-derived [routing table](crate::table) where the
//!    lowest-weight links that reach the destination are eligible, chosen
//!    deterministically for ordered virtual networks and at random
//!    otherwise;
//!  - adaptive dimension-order routing where the choice between the two
//!    productive directions is steered by per-router, per-direction trust
//!    counters held in the [congestion ledger](crate::ledger).
//!
//! The ledger closes a feedback loop: sending a flit in a direction debits
//! that direction at the sending router and, when the flit reaches its
//! destination, every router on its path is credited for the direction it
//! chose.
//!
//! # Example
//!
//! ```rust
//! use noc_routing::config::RoutingConfig;
//! use noc_routing::direction::PortDirection;
//! use noc_routing::flit::Flit;
//! use noc_routing::network::Network;
//! use noc_routing::route::RouteInfo;
//! use noc_routing::topology::build_mesh;
//! use noc_track::entity::toplevel;
//! use noc_track::tracker::dev_null_tracker;
//!
//! let tracker = dev_null_tracker();
//! let top = toplevel(&tracker, "top");
//! let mut network = Network::new(&top, "network", RoutingConfig::default()).unwrap();
//! build_mesh(&mut network).unwrap();
//!
//! // Router 0 to router 12 on a 4x4 mesh only needs to go North
//! let route = RouteInfo::to_router(0, 12, 0);
//! let mut flit = Flit::new(0, 0);
//! let port = network
//!     .compute_output_port(0, &route, 0, PortDirection::Local, &mut flit)
//!     .unwrap();
//!
//! let router = network.router(0).unwrap();
//! assert_eq!(router.directions().out_direction(port), Some(PortDirection::North));
//! assert_eq!(network.trust(0).unwrap().north, -1);
//! ```

pub mod config;
pub mod direction;
pub mod flit;
pub mod ledger;
pub mod mesh;
pub mod net_dest;
pub mod network;
pub mod route;
pub mod routing_unit;
pub mod table;
pub mod topology;
pub mod types;
