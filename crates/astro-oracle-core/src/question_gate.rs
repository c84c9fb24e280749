//! Question Gate: one free question per identity (lowercased name + raw date of birth).
//!
//! Each identity moves Unused → Used exactly once and stays Used for the life of the
//! store. The slot is consumed as soon as a question is accepted, before generation runs.

use std::sync::Arc;

use dashmap::DashSet;

/// Rate-limit key: (lowercased name, raw date-of-birth string).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub name: String,
    pub dob: String,
}

impl IdentityKey {
    pub fn new(name: &str, dob: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            dob: dob.to_string(),
        }
    }
}

/// Backing store for seen identities.
pub trait IdentityStore: Send + Sync {
    fn contains(&self, key: &IdentityKey) -> bool;

    /// Atomically marks `key` as used; returns `true` when it was not marked before.
    fn mark(&self, key: IdentityKey) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&self);
}

/// Process-lifetime store: unbounded, no expiry, lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    seen: DashSet<IdentityKey>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn contains(&self, key: &IdentityKey) -> bool {
        self.seen.contains(key)
    }

    fn mark(&self, key: IdentityKey) -> bool {
        self.seen.insert(key)
    }

    fn len(&self) -> usize {
        self.seen.len()
    }

    fn clear(&self) {
        self.seen.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    AlreadyUsed,
}

#[derive(Clone)]
pub struct QuestionGate {
    store: Arc<dyn IdentityStore>,
}

impl Default for QuestionGate {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryIdentityStore::new()))
    }
}

impl QuestionGate {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Read-only check; does not consume.
    pub fn is_used(&self, key: &IdentityKey) -> bool {
        self.store.contains(key)
    }

    /// Consumes the identity's free question. Concurrent callers for one identity
    /// see exactly one `Allowed`.
    pub fn check_and_consume(&self, key: IdentityKey) -> GateDecision {
        if self.store.mark(key) {
            GateDecision::Allowed
        } else {
            GateDecision::AlreadyUsed
        }
    }

    pub fn used_count(&self) -> usize {
        self.store.len()
    }

    pub fn reset(&self) {
        self.store.clear();
    }
}
