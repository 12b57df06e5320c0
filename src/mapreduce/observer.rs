use std::fmt;
use std::time::Duration;

use crate::types::Key;

/// Events emitted while a [`crate::MapReduce`] job runs.
#[derive(Debug, Clone)]
pub enum MapReduceEvent {
    MappingStarted,
    MappingFinished {
        rows: usize,
        groups: usize,
        direct_results: usize,
    },
    GroupReduced {
        key: Key,
        values: usize,
    },
    Finished {
        results: usize,
        elapsed: Duration,
    },
}

/// Observer hook for map/reduce events.
pub trait MapReduceObserver: Send + Sync {
    fn on_event(&self, event: &MapReduceEvent);
}

/// A simple stderr logger for map/reduce events.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl MapReduceObserver for StdErrObserver {
    fn on_event(&self, event: &MapReduceEvent) {
        eprintln!("{event:?}");
    }
}

/// Summary of a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapReduceStats {
    pub rows_mapped: usize,
    pub groups: usize,
    pub direct_results: usize,
    pub results: usize,
    pub elapsed: Duration,
}

impl fmt::Display for MapReduceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows_mapped={}, groups={}, direct_results={}, results={}, elapsed={:?}",
            self.rows_mapped, self.groups, self.direct_results, self.results, self.elapsed
        )
    }
}
