//! Mobility trace container

use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::slice;

use super::types::{Event, Position};
use crate::validation::error::{TrajectoryError, TrajectoryResult};

/// Time-ordered sequence of events recorded for one moving object.
///
/// The container is append-only and does not sort: callers supply events in
/// non-decreasing timestamp order. Use [`Trace::check_time_order`] to verify
/// that precondition before running time-dependent algorithms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    events: Vec<Event>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn first(&self) -> Option<&Event> {
        self.events.first()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn positions(&self) -> Vec<Position> {
        self.events.iter().map(|e| e.position).collect()
    }

    /// Seconds between the first and the last event (0 for fewer than two)
    pub fn duration_seconds(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.time_difference(first),
            _ => 0.0,
        }
    }

    /// Report the first event whose timestamp goes backwards.
    ///
    /// Equal consecutive timestamps are accepted.
    pub fn check_time_order(&self) -> TrajectoryResult<()> {
        for (index, pair) in self.events.windows(2).enumerate() {
            if pair[1].timestamp < pair[0].timestamp {
                return Err(TrajectoryError::NonMonotonicTimestamps {
                    index: index + 1,
                    previous: pair[0].timestamp,
                    current: pair[1].timestamp,
                });
            }
        }
        Ok(())
    }
}

impl Index<usize> for Trace {
    type Output = Event;

    fn index(&self, index: usize) -> &Self::Output {
        &self.events[index]
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Event;
    type IntoIter = slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl IntoIterator for Trace {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl FromIterator<Event> for Trace {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl Extend<Event> for Trace {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

impl From<Vec<Event>> for Trace {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}
