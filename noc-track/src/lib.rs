// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Combined _track_ capabilities for the mesh routing engine.
//!
//! _Track_ means the combination of _log_ and _value_ events where:
//!
//!   - _log_ are text-based human-readable messages emitted at various levels
//!     of verbosity (from `Trace` through to `Error`).
//!   - _value_ events record a numeric quantity owned by an
//!     [`Entity`](crate::entity::Entity), for example the congestion counters
//!     held for each router.
//!
//! All events are emitted against an entity so that the user can select which
//! parts of a model produce output using regular expressions on the entity
//! names (see [`EntityManager`](crate::tracker::EntityManager)).
//!
//! Tracking never feeds back into a model: disabling it must not change any
//! modelling decision.

// Enable warnings for missing documentation
#![warn(missing_docs)]

use std::fmt;
use std::str::FromStr;

pub use log;

pub mod builder;
pub mod entity;
pub mod test_helpers;

/// Include the trackers.
pub mod tracker;
pub use tracker::{Track, Tracker};

/// A type alias for objects that receive _log_ / _value_ events.
pub type Writer = Box<dyn std::io::Write>;

/// Unique identifier given to every [`Entity`](crate::entity::Entity).
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id(pub u64);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id value which indicates where there is no valid entity
pub const NO_ID: Id = Id(0);

/// The root id from which all other ids are derived
pub const ROOT: Id = Id(1);

/// Take a command-line string and convert it to a Level
pub fn str_to_level(lvl: &str) -> Result<log::Level, tracker::TrackConfigError> {
    log::Level::from_str(lvl).map_err(|_| tracker::TrackConfigError::BadLevel(lvl.to_owned()))
}

/// Emit a log message against an entity at an explicit level.
///
/// Only formats the message if the entity is enabled at the given level.
#[macro_export]
macro_rules! log_at {
    ($entity:expr ; $lvl:expr, $($arg:tt)+) => (
        if $entity.tracker.is_enabled($entity.id, $lvl) {
            $entity.tracker.log($entity.id, $lvl, format_args!($($arg)+));
        }
    );
}

/// Log at level `log::Level::Trace`
#[macro_export]
macro_rules! trace {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_at!($entity ; $crate::log::Level::Trace, $($arg)+);
    );
}

/// Log at level `log::Level::Debug`
#[macro_export]
macro_rules! debug {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_at!($entity ; $crate::log::Level::Debug, $($arg)+);
    );
}

/// Log at level `log::Level::Info`
#[macro_export]
macro_rules! info {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_at!($entity ; $crate::log::Level::Info, $($arg)+);
    );
}

/// Log at level `log::Level::Warn`
#[macro_export]
macro_rules! warn {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_at!($entity ; $crate::log::Level::Warn, $($arg)+);
    );
}

/// Log at level `log::Level::Error`
#[macro_export]
macro_rules! error {
    ($entity:expr ; $($arg:tt)+) => (
        $crate::log_at!($entity ; $crate::log::Level::Error, $($arg)+);
    );
}

/// Track an entity setting a numeric value.
///
/// Values are emitted at `log::Level::Trace`.
#[macro_export]
macro_rules! value {
    ($entity:expr ; $value:expr) => {{
        if $entity
            .tracker
            .is_enabled($entity.id, $crate::log::Level::Trace)
        {
            $entity.tracker.value($entity.id, $value as f64);
        }
    }};
}
