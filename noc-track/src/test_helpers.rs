// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Trackers for use in tests.

use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

use crate::tracker::{EntityManager, InMemoryTracker, TextTracker};
use crate::{Tracker, Writer};

/// Folder that [`create_tracker`] writes to.
pub const TRACE_FOLDER: &str = "traces";

/// Create a tracker that writes every event of a test file to
/// `traces/<file stem>.log`.
///
/// Pass `file!()` as the argument.
#[must_use]
pub fn create_tracker(full_filepath: &str) -> Tracker {
    fs::create_dir_all(TRACE_FOLDER).unwrap();
    let stem = Path::new(full_filepath).file_stem().unwrap();
    let path = Path::new(TRACE_FOLDER).join(stem).with_extension("log");
    let writer: Writer = Box::new(BufWriter::new(fs::File::create(path).unwrap()));
    Rc::new(TextTracker::new(EntityManager::new(log::Level::Trace), writer))
}

/// Create an [`InMemoryTracker`] keeping events at `level` and above.
///
/// Returns the concrete tracker, for inspection, as well as the shared
/// handle to build entities with.
#[must_use]
pub fn create_in_memory_tracker(level: log::Level) -> (Rc<InMemoryTracker>, Tracker) {
    let in_memory = Rc::new(InMemoryTracker::new(EntityManager::new(level)));
    let tracker: Tracker = in_memory.clone();
    (in_memory, tracker)
}
