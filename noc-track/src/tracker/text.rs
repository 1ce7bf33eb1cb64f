// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::fmt;
use std::io::Write;

use crate::tracker::{EntityManager, Track};
use crate::{Id, Writer};

/// Writes one line of text per event.
///
/// Log lines read `<path>:<LEVEL>: <message>` and values `<path> = <value>`.
pub struct TextTracker {
    entity_manager: EntityManager,
    writer: RefCell<Writer>,
}

impl TextTracker {
    /// Create a new [`TextTracker`] writing to `writer`.
    pub fn new(entity_manager: EntityManager, writer: Writer) -> Self {
        Self {
            entity_manager,
            writer: RefCell::new(writer),
        }
    }
}

impl Track for TextTracker {
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
        let path = self.entity_manager.name_for(id);
        // Tracking must never stop a run, so write failures are only reported
        if let Err(e) = writeln!(self.writer.borrow_mut(), "{path}:{level}: {msg}") {
            eprintln!("{path}: dropped log line: {e}");
        }
    }

    fn value(&self, id: Id, value: f64) {
        let path = self.entity_manager.name_for(id);
        if let Err(e) = writeln!(self.writer.borrow_mut(), "{path} = {value}") {
            eprintln!("{path}: dropped value: {e}");
        }
    }

    fn flush(&self) {
        if let Err(e) = self.writer.borrow_mut().flush() {
            eprintln!("TextTracker: failed to flush: {e}");
        }
    }
}
