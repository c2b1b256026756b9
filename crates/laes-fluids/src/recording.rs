//! Query-counting backend wrapper.
//!
//! Wraps any `PropertyBackend` and tallies queries per input pair. Useful to
//! check which property evaluations a model actually performs, e.g. that a
//! disabled component never queries the equation of state.

use crate::backend::PropertyBackend;
use crate::error::FluidResult;
use crate::state::{FluidState, InputPair, StateInput};
use std::sync::Mutex;

/// Number of queries issued, per input pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryCounts {
    pub pt: usize,
    pub ps: usize,
    pub ph: usize,
    pub pq: usize,
    /// Queries that returned an error.
    pub failures: usize,
}

impl QueryCounts {
    pub fn total(&self) -> usize {
        self.pt + self.ps + self.ph + self.pq
    }

    pub fn of(&self, pair: InputPair) -> usize {
        match pair {
            InputPair::PT => self.pt,
            InputPair::PS => self.ps,
            InputPair::PH => self.ph,
            InputPair::PQ => self.pq,
        }
    }
}

/// Backend decorator that records every query before delegating.
pub struct RecordingBackend<B> {
    inner: B,
    counts: Mutex<QueryCounts>,
}

impl<B: PropertyBackend> RecordingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            counts: Mutex::new(QueryCounts::default()),
        }
    }

    /// Snapshot of the counters.
    pub fn counts(&self) -> QueryCounts {
        match self.counts.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Zero all counters.
    pub fn reset(&self) {
        let mut guard = match self.counts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = QueryCounts::default();
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    fn record(&self, pair: InputPair, failed: bool) {
        let mut guard = match self.counts.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match pair {
            InputPair::PT => guard.pt += 1,
            InputPair::PS => guard.ps += 1,
            InputPair::PH => guard.ph += 1,
            InputPair::PQ => guard.pq += 1,
        }
        if failed {
            guard.failures += 1;
        }
    }
}

impl<B: PropertyBackend> PropertyBackend for RecordingBackend<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn state_at(&self, input: StateInput) -> FluidResult<FluidState> {
        let result = self.inner.state_at(input);
        self.record(input.pair(), result.is_err());
        result
    }
}
