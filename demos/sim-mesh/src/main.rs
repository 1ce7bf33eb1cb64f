// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Simulate packets being routed across a 2D mesh.
//!
//! See `lib.rs` for details.
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use noc_routing::config::{RoutingAlgorithm, RoutingConfig};
use noc_routing::network::Network;
use noc_routing::topology::build_mesh;
use noc_routing::types::{RoutingError, RoutingResult};
use noc_track::builder::{TrackerConfig, TrackersConfig, setup_trackers};
use noc_track::entity::{Entity, toplevel};
use noc_track::{Tracker, debug, error, info};
use sim_mesh::sim::{MeshSim, SimConfig, SimStats};
use sim_mesh::traffic::{TrafficGen, TrafficPattern};

/// Command-line arguments.
#[derive(Parser)]
#[command(about = "Mesh routing evaluation application")]
struct Cli {
    /// Disable logging to the console.
    #[arg(long, default_value = "false")]
    quiet: bool,

    /// Level of log message to display.
    #[arg(long, default_value = "Info")]
    stdout_level: log::Level,

    /// Set a regular expression for which entites should have logging level set
    /// to `--stdout-level`. Others will have level set to `Error`.
    #[arg(long, default_value = "")]
    stdout_filter_regex: String,

    /// Enable logging to a text file.
    #[arg(long, default_value = "false")]
    log: bool,

    /// Level of log message to write to the file.
    #[arg(long, default_value = "Trace")]
    log_level: log::Level,

    /// Set a regular expression for which entites should have file output
    /// level set to `--log-level`. Others will have level set to `Error`.
    #[arg(long, default_value = "")]
    log_filter_regex: String,

    /// The filename log output is written to.
    #[arg(long, default_value = "sim-mesh.log")]
    log_file: String,

    /// TOML file providing the routing configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of rows in the mesh.
    #[arg(long)]
    rows: Option<usize>,

    /// Override the number of columns in the mesh.
    #[arg(long)]
    cols: Option<usize>,

    /// Override the routing algorithm.
    #[clap(long, value_enum)]
    routing_algorithm: Option<RoutingAlgorithm>,

    /// Override the seed for random number generators.
    #[clap(long)]
    seed: Option<u64>,

    /// What traffic pattern to use.
    #[clap(long, default_value_t, value_enum)]
    traffic_pattern: TrafficPattern,

    /// Number of packets each router sends.
    #[arg(long, default_value = "10")]
    packets_per_source: usize,

    /// Virtual network used for all packets.
    #[arg(long, default_value = "0")]
    vnet: usize,

    /// Fail if the traffic has not drained after this many cycles.
    #[arg(long, default_value = "10000")]
    max_cycles: u64,
}

fn setup_all_trackers(args: &Cli) -> RoutingResult<Tracker> {
    let config = TrackersConfig {
        stdout: TrackerConfig {
            enable: !args.quiet,
            level: args.stdout_level,
            filter_regex: &args.stdout_filter_regex,
            file: None,
        },
        file: TrackerConfig {
            enable: args.log,
            level: args.log_level,
            filter_regex: &args.log_filter_regex,
            file: Some(&args.log_file),
        },
    };
    setup_trackers(&config).map_err(|e| RoutingError::Config(e.to_string()))
}

/// Combine the file/environment configuration with command-line overrides.
fn create_config(args: &Cli) -> RoutingResult<RoutingConfig> {
    let mut config = RoutingConfig::load(args.config.as_deref())?;
    if let Some(rows) = args.rows {
        config.num_rows = rows;
    }
    if let Some(cols) = args.cols {
        config.num_cols = cols;
    }
    if let Some(routing_algorithm) = args.routing_algorithm {
        config.routing_algorithm = routing_algorithm;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.vnet >= config.num_vnets {
        return Err(RoutingError::Config(format!(
            "vnet {} out of range (num_vnets = {})",
            args.vnet, config.num_vnets
        )));
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), RoutingError> {
    let args = Cli::parse();
    let tracker = setup_all_trackers(&args)?;
    let top = toplevel(&tracker, "top");

    let config = create_config(&args)?;
    let seed = config.seed;
    let mut network = Network::new(&top, "network", config)?;
    build_mesh(&mut network)?;
    info!(top ; "Mesh built");

    let traffic = TrafficGen::new(network.mesh(), args.traffic_pattern, seed);
    let sim_config = SimConfig {
        packets_per_source: args.packets_per_source,
        vnet: args.vnet,
        max_cycles: args.max_cycles,
    };

    let result = MeshSim::new(&top, &network, traffic, sim_config).run();
    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            error!(top ; "{}", e);
            tracker.flush();
            return Err(e);
        }
    };

    print_summary(&top, &network, &stats)?;
    tracker.flush();
    Ok(())
}

fn print_summary(top: &Rc<Entity>, network: &Network, stats: &SimStats) -> RoutingResult<()> {
    info!(top ;
        "Pass: delivered {}/{} packets in {} cycles.",
        stats.delivered, stats.injected, stats.cycles
    );
    info!(top ;
        "Hops: mean {:.2}, max {}. Latency: mean {:.2} cycles.",
        stats.mean_hops(),
        stats.max_hops,
        stats.mean_latency()
    );

    for router in 0..network.num_routers() {
        let trust = network.trust(router)?;
        debug!(top ;
            "router{}: north {} south {} east {} west {}",
            router, trust.north, trust.south, trust.east, trust.west
        );
    }
    Ok(())
}
