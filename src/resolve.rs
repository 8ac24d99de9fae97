//! Sequential resolution of name collisions produced by batch adds.
//!
//! The resolver is a small state machine decoupled from any presentation
//! layer: a UI observes [`ConflictResolver::state`] and the head pair, and
//! feeds back one [`Decision`] at a time. Single decisions touch only the
//! head of the queue; the `*All` decisions drain the queue in one atomic
//! store mutation.

use crate::entry::{Entry, EntryStore};
use std::collections::VecDeque;
use tracing::debug;

/// A new entry and the existing entry it would overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictPair {
    pub incoming: Entry,
    pub existing: Entry,
}

/// Observable resolver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// No conflicts pending.
    Idle,
    /// The head of the queue awaits a decision.
    AwaitingDecision,
}

/// How to settle the pending conflict(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Replace the existing entry with the incoming one, head pair only.
    Replace,
    /// Drop the incoming entry, head pair only.
    Skip,
    /// Replace every remaining pair in one batch mutation.
    ReplaceAll,
    /// Drop every remaining incoming entry.
    SkipAll,
}

/// Queue of unresolved conflict pairs, consumed strictly in order.
#[derive(Debug, Default)]
pub struct ConflictResolver {
    queue: VecDeque<ConflictPair>,
}

impl ConflictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a fresh batch of conflicts. Pairs from an unfinished previous
    /// batch stay ahead of the new ones.
    pub fn begin(&mut self, pairs: Vec<ConflictPair>) {
        self.queue.extend(pairs);
    }

    pub fn state(&self) -> ResolverState {
        if self.queue.is_empty() {
            ResolverState::Idle
        } else {
            ResolverState::AwaitingDecision
        }
    }

    /// The pair currently awaiting a decision.
    pub fn current(&self) -> Option<&ConflictPair> {
        self.queue.front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Apply one decision against the store. A decision with an empty queue
    /// is a no-op.
    pub fn resolve(&mut self, store: &mut EntryStore, decision: Decision) {
        match decision {
            Decision::Replace => {
                if let Some(pair) = self.queue.pop_front() {
                    Self::apply(store, &[pair]);
                }
            }
            Decision::Skip => {
                self.queue.pop_front();
            }
            Decision::ReplaceAll => {
                let pairs: Vec<ConflictPair> = self.queue.drain(..).collect();
                Self::apply(store, &pairs);
            }
            Decision::SkipAll => {
                self.queue.clear();
            }
        }
        debug!(pending = self.queue.len(), ?decision, "conflict resolved");
    }

    /// Swap each pair's incoming entry in for its existing one, as a single
    /// store mutation.
    fn apply(store: &mut EntryStore, pairs: &[ConflictPair]) {
        if pairs.is_empty() {
            return;
        }
        let mut updated = store.list().to_vec();
        for pair in pairs {
            if let Some(slot) = updated.iter_mut().find(|e| e.path == pair.incoming.path) {
                *slot = pair.incoming.clone();
            } else {
                // The existing entry vanished since the batch was queued
                // (deleted or moved); honor the decision by adding.
                updated.push(pair.incoming.clone());
            }
        }
        store.replace_all(updated);
    }
}
