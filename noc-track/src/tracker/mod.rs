// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The [`Track`] trait and the trackers that implement it.

/// Include the /dev/null tracker.
pub mod dev_null;
/// Include the in-memory tracker.
pub mod in_memory;
/// Include the multi-tracker.
pub mod multi_tracker;
/// Include the text-based tracker.
pub mod text;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::rc::Rc;

pub use dev_null::DevNullTracker;
pub use in_memory::InMemoryTracker;
pub use multi_tracker::MultiTracker;
use regex::Regex;
pub use text::TextTracker;

use crate::{Id, ROOT};

/// Errors raised while building trackers.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackConfigError {
    /// A level filter is not a valid regular expression.
    BadFilter {
        /// The expression as given.
        regex: String,
        /// Reason reported by the regex parser.
        reason: String,
    },

    /// A log level could not be parsed.
    BadLevel(String),

    /// A file tracker was enabled without naming a file.
    MissingFile,

    /// The log file could not be created.
    Io {
        /// Path of the file.
        path: String,
        /// Reason reported by the OS.
        reason: String,
    },
}

impl fmt::Display for TrackConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::BadFilter { regex, reason } => {
                write!(f, "failed to parse filter '{regex}': {reason}")
            }
            Self::BadLevel(level) => write!(f, "unable to parse level '{level}'"),
            Self::MissingFile => write!(f, "file tracker enabled without a file name"),
            Self::Io { path, reason } => write!(f, "failed to create {path}: {reason}"),
        }
    }
}

impl std::error::Error for TrackConfigError {}

/// Interface supported by every [`Tracker`].
pub trait Track {
    /// Hand out an [`Id`] that no other entity of this tracker uses.
    fn allocate_id(&self) -> Id;

    /// Whether events at `level` from entity `id` should be emitted.
    fn is_enabled(&self, id: Id, level: log::Level) -> bool;

    /// Associate `id` with the full path of its entity.
    fn register_entity(&self, id: Id, path: &str);

    /// Record a log message.
    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments);

    /// Record a numeric value owned by entity `id`.
    fn value(&self, id: Id, value: f64);

    /// Push out anything buffered. Called before the program exits.
    fn flush(&self);
}

/// The type of a [`Tracker`] that is shared across entities.
pub type Tracker = Rc<dyn Track>;

/// Create a [`Tracker`] that prints everything at `level` and above.
#[must_use]
pub fn stdout_tracker(level: log::Level) -> Tracker {
    let writer = Box::new(io::BufWriter::new(io::stdout()));
    Rc::new(TextTracker::new(EntityManager::new(level), writer))
}

/// Create a [`Tracker`] that drops every event.
#[must_use]
pub fn dev_null_tracker() -> Tracker {
    Rc::new(DevNullTracker)
}

struct Registered {
    path: String,
    level: log::Level,
}

/// Decides the level of each entity and remembers its path.
///
/// Levels are fixed when an entity registers: the first filter whose
/// expression matches the path wins, otherwise the default level applies.
pub struct EntityManager {
    default_level: log::Level,
    filters: Vec<(Regex, log::Level)>,
    next_id: Cell<u64>,
    registry: RefCell<HashMap<Id, Registered>>,
}

impl EntityManager {
    /// Create a manager applying `default_level` to all entities.
    #[must_use]
    pub fn new(default_level: log::Level) -> Self {
        Self {
            default_level,
            filters: Vec::new(),
            next_id: Cell::new(ROOT.0),
            registry: RefCell::new(HashMap::new()),
        }
    }

    /// Entities whose path matches `regex` get `level` instead of the
    /// default. Filters are tried in the order they were added.
    ///
    /// # Example
    ///
    /// ```rust
    /// use noc_track::tracker::EntityManager;
    /// let mut manager = EntityManager::new(log::Level::Warn);
    /// manager.add_level_filter(".*router3.*", log::Level::Trace).unwrap();
    /// ```
    pub fn add_level_filter(
        &mut self,
        regex: &str,
        level: log::Level,
    ) -> Result<(), TrackConfigError> {
        let compiled = Regex::new(regex).map_err(|e| TrackConfigError::BadFilter {
            regex: regex.to_owned(),
            reason: e.to_string(),
        })?;
        self.filters.push((compiled, level));
        Ok(())
    }

    fn allocate_id(&self) -> Id {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Id(id)
    }

    fn level_for_path(&self, path: &str) -> log::Level {
        self.filters
            .iter()
            .find(|(regex, _)| regex.is_match(path))
            .map_or(self.default_level, |(_, level)| *level)
    }

    fn register(&self, id: Id, path: &str) {
        let level = self.level_for_path(path);
        self.registry.borrow_mut().insert(
            id,
            Registered {
                path: path.to_owned(),
                level,
            },
        );
    }

    fn is_enabled(&self, id: Id, level: log::Level) -> bool {
        let entity_level = self
            .registry
            .borrow()
            .get(&id)
            .map_or(self.default_level, |r| r.level);
        level <= entity_level
    }

    /// The path registered for `id`, or the raw id if it was never seen.
    #[must_use]
    pub fn name_for(&self, id: Id) -> String {
        self.registry
            .borrow()
            .get(&id)
            .map_or_else(|| id.to_string(), |r| r.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::*;

    const PATHS: [&str; 4] = [
        "top",
        "top::network",
        "top::network::router0",
        "top::network::ledger",
    ];

    #[test]
    fn default_level_everywhere() {
        let manager = EntityManager::new(Level::Error);
        assert!(PATHS.iter().all(|p| manager.level_for_path(p) == Level::Error));
    }

    #[test]
    fn filter_network_trace() {
        let mut manager = EntityManager::new(Level::Error);
        manager
            .add_level_filter(r".*network.*", Level::Trace)
            .unwrap();

        let levels: Vec<_> = PATHS.iter().map(|p| manager.level_for_path(p)).collect();
        assert_eq!(
            levels,
            [Level::Error, Level::Trace, Level::Trace, Level::Trace]
        );
    }

    #[test]
    fn first_matching_filter_wins() {
        let mut manager = EntityManager::new(Level::Warn);
        manager.add_level_filter(r".*router0", Level::Error).unwrap();
        manager.add_level_filter(r".*network.*", Level::Debug).unwrap();

        assert_eq!(manager.level_for_path("top"), Level::Warn);
        assert_eq!(manager.level_for_path("top::network"), Level::Debug);
        assert_eq!(manager.level_for_path("top::network::router0"), Level::Error);
    }

    #[test]
    fn bad_regex() {
        let mut manager = EntityManager::new(Level::Warn);
        let err = manager.add_level_filter(r"(", Level::Debug).unwrap_err();
        assert!(matches!(err, TrackConfigError::BadFilter { regex, .. } if regex == "("));
    }

    #[test]
    fn enabled_by_id() {
        let mut manager = EntityManager::new(Level::Warn);
        manager.add_level_filter(r".*ledger", Level::Trace).unwrap();
        let quiet = manager.allocate_id();
        manager.register(quiet, "top::network");
        let loud = manager.allocate_id();
        manager.register(loud, "top::network::ledger");

        assert_ne!(quiet, loud);
        assert!(!manager.is_enabled(quiet, Level::Debug));
        assert!(manager.is_enabled(quiet, Level::Warn));
        assert!(manager.is_enabled(loud, Level::Trace));
        assert_eq!(manager.name_for(loud), "top::network::ledger");
    }
}
