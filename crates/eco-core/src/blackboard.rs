//! Scoped, typed blackboard shared by the nodes of one behavior tree.
//!
//! Values live in *scopes*. A scope belongs to a composite node (or to the tree
//! itself, [`ScopeId::ROOT`]). While a tree is evaluated, every composite pushes
//! a frame (with or without a scope of its own) and pops it afterwards, so the
//! blackboard always knows which composites enclose the node currently running:
//!
//! - [`Blackboard::get`] looks a key up from the innermost scope outward.
//! - [`Blackboard::set`] writes into the innermost scope.
//! - [`Blackboard::publish`] writes into the nearest scope *above* the enclosing
//!   composite, which makes a value cached by one branch visible to its siblings.
//!
//! Every read or write touches the entry; entries left untouched for longer than
//! [`BlackboardConfig::idle_ttl_seconds`] are dropped by [`Blackboard::begin_pass`].

use std::any::Any;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    id: u64,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// Tree-level scope; always visible, used when no composite scope encloses a write.
    pub const ROOT: ScopeId = ScopeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlackboardConfig {
    /// Entries not read or written for longer than this are dropped at the next pass.
    pub idle_ttl_seconds: f64,
}

impl Default for BlackboardConfig {
    fn default() -> Self {
        Self {
            idle_ttl_seconds: 30.0,
        }
    }
}

struct Entry {
    value: Box<dyn Any>,
    touched_at: Cell<f64>,
}

pub struct Blackboard {
    config: BlackboardConfig,
    values: BTreeMap<(ScopeId, u64), Entry>,
    frames: Vec<Option<ScopeId>>,
    now: f64,
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::with_config(BlackboardConfig::default())
    }
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BlackboardConfig) -> Self {
        Self {
            config,
            values: BTreeMap::new(),
            frames: Vec::new(),
            now: 0.0,
        }
    }

    pub fn config(&self) -> BlackboardConfig {
        self.config
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Start an evaluation pass at simulation time `now`.
    ///
    /// Drops frames left open by an aborted pass and expires idle entries.
    pub fn begin_pass(&mut self, now: f64) {
        self.now = now;
        self.frames.clear();
        let ttl = self.config.idle_ttl_seconds;
        self.values
            .retain(|_, entry| now - entry.touched_at.get() <= ttl);
    }

    /// Push the frame of a composite node. `scope` is `None` for composites that do not own one.
    pub fn enter(&mut self, scope: Option<ScopeId>) {
        self.frames.push(scope);
    }

    pub fn exit(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.scope_holding(key.id).is_some()
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        let scope = self.innermost_scope();
        self.insert(scope, key, value);
    }

    /// Write into the nearest scope above the enclosing composite.
    pub fn publish<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        let scope = self.publish_scope();
        self.insert(scope, key, value);
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let scope = self.scope_holding(key.id)?;
        let entry = self.values.get(&(scope, key.id))?;
        entry.touched_at.set(self.now);
        Some(
            entry
                .value
                .downcast_ref::<T>()
                .unwrap_or_else(|| type_mismatch(key.id)),
        )
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let scope = self.scope_holding(key.id)?;
        let now = self.now;
        let entry = self.values.get_mut(&(scope, key.id))?;
        entry.touched_at.set(now);
        Some(
            entry
                .value
                .downcast_mut::<T>()
                .unwrap_or_else(|| type_mismatch(key.id)),
        )
    }

    /// Remove the nearest visible value for `key`.
    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let scope = self.scope_holding(key.id)?;
        let entry = self.values.remove(&(scope, key.id))?;
        Some(
            entry
                .value
                .downcast::<T>()
                .map(|b| *b)
                .unwrap_or_else(|_| type_mismatch(key.id)),
        )
    }

    fn insert<T: 'static>(&mut self, scope: ScopeId, key: BbKey<T>, value: T) {
        self.values.insert(
            (scope, key.id),
            Entry {
                value: Box::new(value),
                touched_at: Cell::new(self.now),
            },
        );
    }

    fn visible_scopes(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.frames
            .iter()
            .rev()
            .flatten()
            .copied()
            .chain(std::iter::once(ScopeId::ROOT))
    }

    fn scope_holding(&self, id: u64) -> Option<ScopeId> {
        self.visible_scopes()
            .find(|scope| self.values.contains_key(&(*scope, id)))
    }

    fn innermost_scope(&self) -> ScopeId {
        self.visible_scopes().next().unwrap_or(ScopeId::ROOT)
    }

    fn publish_scope(&self) -> ScopeId {
        let Some((_, ancestors)) = self.frames.split_last() else {
            return ScopeId::ROOT;
        };
        ancestors
            .iter()
            .rev()
            .flatten()
            .copied()
            .next()
            .unwrap_or(ScopeId::ROOT)
    }
}

fn type_mismatch(id: u64) -> ! {
    panic!("blackboard type mismatch for key id={id} (stored type differs from requested)")
}
