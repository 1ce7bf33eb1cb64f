// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Named nodes in the tracking hierarchy.
//!
//! Each router, ledger counter and driver owns an [`Entity`]. Its path
//! (e.g. `top::network::router3`) is fixed when it is created and is what
//! level filters are matched against.

use std::fmt;
use std::rc::Rc;

use crate::{Id, Tracker};

/// Separator placed between the levels of an entity path.
pub const SEPARATOR: &str = "::";

/// A tracked entity
///
/// The first entity is made by [`toplevel`]; every other one hangs below an
/// existing parent and shares its [`Tracker`].
pub struct Entity {
    /// Identifier that log/value events are emitted against.
    pub id: Id,

    /// Receives all events for this entity.
    pub tracker: Tracker,

    path: String,
    depth: usize,
}

impl Entity {
    /// Create a new entity below `parent`.
    #[must_use]
    pub fn new(parent: &Rc<Entity>, name: &str) -> Self {
        let path = format!("{}{SEPARATOR}{name}", parent.path);
        Self::register(&parent.tracker, path, parent.depth + 1)
    }

    /// Create a new entity below `self` and wrap it ready to be shared.
    #[must_use]
    pub fn child(self: &Rc<Self>, name: &str) -> Rc<Entity> {
        Rc::new(Entity::new(self, name))
    }

    fn register(tracker: &Tracker, path: String, depth: usize) -> Self {
        let id = tracker.allocate_id();
        tracker.register_entity(id, &path);
        Self {
            id,
            tracker: tracker.clone(),
            path,
            depth,
        }
    }

    /// The full `::` separated path of this entity.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.path
    }

    /// The last component of the path.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path
            .rsplit_once(SEPARATOR)
            .map_or(self.path.as_str(), |(_, name)| name)
    }

    /// Number of ancestors; zero for the top level.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({} #{})", self.path, self.id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Create the root of an entity hierarchy.
pub fn toplevel(tracker: &Tracker, name: &str) -> Rc<Entity> {
    Rc::new(Entity::register(tracker, name.to_owned(), 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::dev_null_tracker;

    #[test]
    fn paths_and_names() {
        let tracker = dev_null_tracker();
        let top = toplevel(&tracker, "top");
        let ledger = top.child("ledger");
        let counter = Entity::new(&ledger, "router2");

        assert_eq!(top.name(), "top");
        assert_eq!(top.depth(), 0);
        assert_eq!(counter.full_name(), "top::ledger::router2");
        assert_eq!(counter.name(), "router2");
        assert_eq!(counter.depth(), 2);
    }
}
