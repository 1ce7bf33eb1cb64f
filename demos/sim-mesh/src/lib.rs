// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Simulate packets being routed across a 2D mesh.
//!
//! The model builds a mesh [`Network`](noc_routing::network::Network) with
//! the configured routing algorithm and drives packets from every router
//! according to a traffic pattern. At the end it reports how many packets
//! were delivered, the hop counts seen and, at `Debug` level, the trust
//! counters left in the congestion ledger.
//!
//! # Examples
//!
//! Running the default adaptive routing with uniform random traffic
//! ```text
//! cargo run --bin sim-mesh --release -- --packets-per-source 100
//! ```
//!
//! Comparing against plain XY routing on a larger mesh
//! ```text
//! cargo run --bin sim-mesh --release -- --rows 8 --cols 8 --routing-algorithm xy
//! ```
//!
//! Settings can also come from a TOML file and `NOC_` environment variables,
//! with command-line options taking priority
//! ```text
//! NOC_INITIAL_TRUST=4 cargo run --bin sim-mesh -- --config mesh.toml --traffic-pattern transpose
//! ```
//!
//! Following the ledger of one router
//! ```text
//! cargo run --bin sim-mesh -- --stdout-level trace --stdout-filter-regex '.*ledger::router5.*'
//! ```

pub mod sim;
pub mod traffic;
