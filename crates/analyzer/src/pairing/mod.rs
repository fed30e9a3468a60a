//! Pairing — reconstructs start/end intervals of mutex and barrier operations
//! from the global timeline.
//!
//! The matcher is a single sequential pass. Its state (last create per name,
//! open lock stacks) is owned by one [`PairMatcher`] and discarded afterwards,
//! so concurrent analyses never share it.

use std::collections::HashMap;

use serde::Serialize;

use crate::timeline::TimelineEvent;

pub const MUTEX_TYPE: &str = "mutex";
pub const BARRIER_TYPE: &str = "barrier";

/// Capture-group names carrying the primitive's name.
const MUTEX_FIELD: &str = "mutex";
const BARRIER_FIELD: &str = "barrier";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairType {
    MutexCreateUnlock,
    MutexLockUnlock,
    BarrierCreateWait,
}

/// A reconstructed interval between two lifecycle operations on one primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPair {
    /// Mutex or barrier name
    pub key: String,
    pub start_event: TimelineEvent,
    pub end_event: TimelineEvent,
    pub pair_type: PairType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairingResult {
    /// In order of the closing event
    pub pairs: Vec<EventPair>,
    /// Named mutex/barrier events seen (diagnostic)
    pub sync_event_count: usize,
}

/// Matching state for one pass over a timeline.
#[derive(Debug, Default)]
pub struct PairMatcher<'a> {
    last_mutex_create: HashMap<&'a str, &'a TimelineEvent>,
    open_locks: HashMap<&'a str, Vec<&'a TimelineEvent>>,
    last_barrier_create: HashMap<&'a str, &'a TimelineEvent>,
    pairs: Vec<EventPair>,
    sync_event_count: usize,
}

impl<'a> PairMatcher<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next event. Events must arrive in ascending timestamp order.
    pub fn observe(&mut self, event: &'a TimelineEvent) {
        let Some(event_name) = event.event_name() else {
            return;
        };

        match event.entry.entry_type.as_str() {
            MUTEX_TYPE => {
                let Some(mutex) = event.field(MUTEX_FIELD) else {
                    return;
                };
                self.sync_event_count += 1;
                self.observe_mutex(mutex, event_name, event);
            }
            BARRIER_TYPE => {
                let Some(barrier) = event.field(BARRIER_FIELD) else {
                    return;
                };
                self.sync_event_count += 1;
                self.observe_barrier(barrier, event_name, event);
            }
            _ => {}
        }
    }

    fn observe_mutex(&mut self, mutex: &'a str, event_name: &str, event: &'a TimelineEvent) {
        match event_name {
            "mutex_create" => {
                self.last_mutex_create.insert(mutex, event);
            }
            "mutex_lock" => {
                self.open_locks.entry(mutex).or_default().push(event);
            }
            "mutex_unlock" => {
                // The create slot is never retired: one create pairs with
                // every later unlock until another create replaces it.
                if let Some(create) = self.last_mutex_create.get(mutex) {
                    self.pairs.push(EventPair {
                        key: mutex.to_string(),
                        start_event: (*create).clone(),
                        end_event: event.clone(),
                        pair_type: PairType::MutexCreateUnlock,
                    });
                }
                // Innermost open lock closes first.
                if let Some(lock) = self.open_locks.get_mut(mutex).and_then(Vec::pop) {
                    self.pairs.push(EventPair {
                        key: mutex.to_string(),
                        start_event: lock.clone(),
                        end_event: event.clone(),
                        pair_type: PairType::MutexLockUnlock,
                    });
                }
            }
            _ => {}
        }
    }

    fn observe_barrier(&mut self, barrier: &'a str, event_name: &str, event: &'a TimelineEvent) {
        match event_name {
            "barrier_create" => {
                self.last_barrier_create.insert(barrier, event);
            }
            "barrier_wait" => {
                if let Some(create) = self.last_barrier_create.get(barrier) {
                    self.pairs.push(EventPair {
                        key: barrier.to_string(),
                        start_event: (*create).clone(),
                        end_event: event.clone(),
                        pair_type: PairType::BarrierCreateWait,
                    });
                }
            }
            _ => {}
        }
    }

    pub fn finish(self) -> PairingResult {
        let open: usize = self.open_locks.values().map(Vec::len).sum();
        if open > 0 {
            tracing::debug!(open_locks = open, "locks left without a matching unlock");
        }
        PairingResult {
            pairs: self.pairs,
            sync_event_count: self.sync_event_count,
        }
    }
}

/// Match create/lock/unlock and create/wait pairs over a timeline.
///
/// The caller must pass the timeline sorted ascending by timestamp (as
/// produced by [`crate::timeline::assemble`]); nesting and create reuse are
/// undefined otherwise. Unmatched openings or closings produce no pair.
pub fn find_pairs(timeline: &[TimelineEvent]) -> PairingResult {
    let mut matcher = PairMatcher::new();
    for event in timeline {
        matcher.observe(event);
    }
    matcher.finish()
}
