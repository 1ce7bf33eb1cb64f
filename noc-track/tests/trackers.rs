// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::fs;
use std::rc::Rc;

use noc_track::builder::{TrackerConfig, TrackersConfig, setup_trackers};
use noc_track::entity::{Entity, toplevel};
use noc_track::test_helpers::create_in_memory_tracker;
use noc_track::tracker::EntityManager;
use noc_track::{debug, info, str_to_level, trace, value, warn};

#[test]
fn hierarchical_names() {
    let (in_memory, tracker) = create_in_memory_tracker(log::Level::Trace);
    let top = toplevel(&tracker, "top");
    let network = Rc::new(Entity::new(&top, "network"));
    let router = Entity::new(&network, "router3");

    assert_eq!(router.full_name(), "top::network::router3");
    assert_eq!(format!("{router}"), "top::network::router3");

    info!(router ; "hello {}", 3);
    assert_eq!(in_memory.logs_for("top::network::router3"), vec!["hello 3"]);
    assert!(in_memory.logs_for("top::network").is_empty());
}

#[test]
fn level_suppresses_events() {
    let (in_memory, tracker) = create_in_memory_tracker(log::Level::Info);
    let top = toplevel(&tracker, "top");

    trace!(top ; "not seen");
    debug!(top ; "not seen");
    value!(top ; 4);
    assert_eq!(in_memory.num_events(), 0);

    info!(top ; "seen");
    warn!(top ; "also seen");
    assert_eq!(in_memory.logs_for("top"), vec!["seen", "also seen"]);
}

#[test]
fn values_are_recorded() {
    let (in_memory, tracker) = create_in_memory_tracker(log::Level::Trace);
    let top = toplevel(&tracker, "top");
    let ledger = Entity::new(&top, "ledger");

    value!(ledger ; 1);
    value!(ledger ; -2i32);
    assert_eq!(in_memory.values_for("top::ledger"), vec![1.0, -2.0]);

    in_memory.clear();
    assert_eq!(in_memory.num_events(), 0);
}

#[test]
fn entity_manager_names_unknown_ids() {
    let manager = EntityManager::new(log::Level::Warn);
    assert_eq!(manager.name_for(noc_track::Id(42)), "42");
}

#[test]
fn parse_levels() {
    assert_eq!(str_to_level("trace").unwrap(), log::Level::Trace);
    assert_eq!(str_to_level("WARN").unwrap(), log::Level::Warn);
    assert!(str_to_level("loud").is_err());
}

#[test]
fn file_tracker_writes_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.log");
    let path_str = path.to_str().unwrap();

    let config = TrackersConfig {
        stdout: TrackerConfig {
            enable: false,
            ..Default::default()
        },
        file: TrackerConfig {
            enable: true,
            level: log::Level::Debug,
            filter_regex: "",
            file: Some(path_str),
        },
    };
    let tracker = setup_trackers(&config).unwrap();
    let top = toplevel(&tracker, "top");
    debug!(top ; "written to file");
    trace!(top ; "filtered out");
    tracker.flush();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "top:DEBUG: written to file\n");
}

#[test]
fn file_tracker_requires_name() {
    let config = TrackersConfig {
        stdout: TrackerConfig {
            enable: false,
            ..Default::default()
        },
        file: TrackerConfig {
            enable: true,
            ..Default::default()
        },
    };
    assert!(setup_trackers(&config).is_err());
}

#[test]
fn bad_filter_is_reported() {
    let config = TrackersConfig {
        stdout: TrackerConfig {
            enable: true,
            level: log::Level::Trace,
            filter_regex: "(",
            file: None,
        },
        file: TrackerConfig {
            enable: false,
            ..Default::default()
        },
    };
    assert!(setup_trackers(&config).is_err());
}
