// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::fmt;

use crate::Id;
use crate::tracker::{EntityManager, Track};

/// A [`Track`] event kept by the [`InMemoryTracker`].
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// A log message.
    Log {
        /// Originating entity.
        id: Id,
        /// Level the message was emitted at.
        level: log::Level,
        /// Formatted message text.
        text: String,
    },
    /// A value update.
    Value {
        /// Originating entity.
        id: Id,
        /// The value set.
        value: f64,
    },
}

/// A tracker that keeps all events in memory so that they can be inspected.
///
/// Mainly used by tests to check what a model reports without parsing text.
pub struct InMemoryTracker {
    entity_manager: EntityManager,
    events: RefCell<Vec<TrackEvent>>,
}

impl InMemoryTracker {
    /// Create a new [`InMemoryTracker`] with an [`EntityManager`].
    #[must_use]
    pub fn new(entity_manager: EntityManager) -> Self {
        Self {
            entity_manager,
            events: RefCell::new(Vec::new()),
        }
    }

    /// Number of events seen so far.
    #[must_use]
    pub fn num_events(&self) -> usize {
        self.events.borrow().len()
    }

    /// Return the text of all log messages emitted by the entity with the
    /// given full name.
    #[must_use]
    pub fn logs_for(&self, full_name: &str) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                TrackEvent::Log { id, text, .. } if self.is_named(*id, full_name) => {
                    Some(text.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Return all values set by the entity with the given full name.
    #[must_use]
    pub fn values_for(&self, full_name: &str) -> Vec<f64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                TrackEvent::Value { id, value } if self.is_named(*id, full_name) => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Drop all events seen so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn is_named(&self, id: Id, full_name: &str) -> bool {
        self.entity_manager.name_for(id) == full_name
    }
}

impl Track for InMemoryTracker {
    fn allocate_id(&self) -> Id {
        self.entity_manager.allocate_id()
    }

    fn is_enabled(&self, id: Id, level: log::Level) -> bool {
        self.entity_manager.is_enabled(id, level)
    }

    fn register_entity(&self, id: Id, path: &str) {
        self.entity_manager.register(id, path);
    }

    fn log(&self, id: Id, level: log::Level, msg: fmt::Arguments) {
        self.events.borrow_mut().push(TrackEvent::Log {
            id,
            level,
            text: format!("{msg}"),
        });
    }

    fn value(&self, id: Id, value: f64) {
        self.events.borrow_mut().push(TrackEvent::Value { id, value });
    }

    fn flush(&self) {}
}
