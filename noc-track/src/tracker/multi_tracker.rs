// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::cell::Cell;
use std::fmt;

use crate::tracker::{Track, Tracker};
use crate::{Id, ROOT};

/// Forwards every event to a set of [`Tracker`]s.
///
/// Ids are handed out here so that all the wrapped trackers agree on them.
pub struct MultiTracker {
    next_id: Cell<u64>,
    trackers: Vec<Tracker>,
}

impl MultiTracker {
    /// Wrap `trackers`.
    #[must_use]
    pub fn new(trackers: Vec<Tracker>) -> Self {
        Self {
            next_id: Cell::new(ROOT.0),
            trackers,
        }
    }

    fn enabled_for(&self, id: Id, level: log::Level) -> impl Iterator<Item = &Tracker> {
        self.trackers
            .iter()
            .filter(move |t| t.is_enabled(id, level))
    }
}

impl Track for MultiTracker {
    fn allocate_id(&self) -> Id {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Id(id)
    }

    fn is_enabled(&self, id: Id, level: log::Level) -> bool {
        self.enabled_for(id, level).next().is_some()
    }

    fn register_entity(&self, id: Id, path: &str) {
        self.trackers
            .iter()
            .for_each(|t| t.register_entity(id, path));
    }

    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments) {
        self.enabled_for(id, level)
            .for_each(|t| t.log(id, level, msg));
    }

    fn value(&self, id: Id, value: f64) {
        self.enabled_for(id, log::Level::Trace)
            .for_each(|t| t.value(id, value));
    }

    fn flush(&self) {
        self.trackers.iter().for_each(|t| t.flush());
    }
}
