// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Build the trackers requested on the command line.

use std::fs;
use std::io::{self, BufWriter};
use std::rc::Rc;

use crate::tracker::{EntityManager, MultiTracker, TextTracker, TrackConfigError};
use crate::{Tracker, Writer};

/// Options for one text tracker.
pub struct TrackerConfig<'a> {
    /// Whether this tracker is built at all.
    pub enable: bool,

    /// Level applied to the entities selected by `filter_regex`.
    pub level: log::Level,

    /// Entities whose path matches get `level`; all others only report
    /// errors. Empty selects every entity.
    pub filter_regex: &'a str,

    /// Destination file, for trackers that write to one.
    pub file: Option<&'a str>,
}

impl Default for TrackerConfig<'_> {
    fn default() -> Self {
        Self {
            enable: true,
            level: log::Level::Warn,
            filter_regex: "",
            file: None,
        }
    }
}

impl TrackerConfig<'_> {
    fn entity_manager(&self) -> Result<EntityManager, TrackConfigError> {
        if self.filter_regex.is_empty() {
            return Ok(EntityManager::new(self.level));
        }
        let mut manager = EntityManager::new(log::Level::Error);
        manager.add_level_filter(self.filter_regex, self.level)?;
        Ok(manager)
    }

    fn text_tracker(&self, writer: Writer) -> Result<Tracker, TrackConfigError> {
        Ok(Rc::new(TextTracker::new(self.entity_manager()?, writer)))
    }

    fn file_writer(&self) -> Result<Writer, TrackConfigError> {
        let path = self.file.ok_or(TrackConfigError::MissingFile)?;
        let file = fs::File::create(path).map_err(|e| TrackConfigError::Io {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Options for all trackers.
pub struct TrackersConfig<'a> {
    /// Text written to `stdout`.
    pub stdout: TrackerConfig<'a>,

    /// Text written to `file`.
    pub file: TrackerConfig<'a>,
}

/// Build the enabled trackers, combining them if there is more than one.
///
/// With nothing enabled, warnings and errors still go to `stdout`.
pub fn setup_trackers(config: &TrackersConfig) -> Result<Tracker, TrackConfigError> {
    let mut trackers = Vec::new();
    if config.stdout.enable {
        let writer = Box::new(BufWriter::new(io::stdout()));
        trackers.push(config.stdout.text_tracker(writer)?);
    }
    if config.file.enable {
        let writer = config.file.file_writer()?;
        trackers.push(config.file.text_tracker(writer)?);
    }

    match trackers.len() {
        0 => {
            let fallback = TrackerConfig::default();
            fallback.text_tracker(Box::new(BufWriter::new(io::stdout())))
        }
        1 => Ok(trackers.remove(0)),
        _ => Ok(Rc::new(MultiTracker::new(trackers))),
    }
}
