//! Per-element animation state, keyed by identity.
//!
//! The registry keeps records in a flat `Vec` and an identity → index map.
//! Every record's `index` equals its position in the `Vec`; removal is a
//! swap-remove that re-indexes the record moved into the freed slot, so the
//! map and the list never diverge.

use std::collections::HashMap;
use std::rc::Rc;

use engine_core::Transform2D;

use crate::snippet::{Arg, SnippetRef};
use crate::spring::SpringState;

/// State kept for one live element across frames.
pub struct AnimationRecord<M> {
    pub(crate) identity: String,
    pub(crate) instance: SnippetRef<M>,
    pub(crate) index: usize,
    pub(crate) drawn: bool,
    pub(crate) presence: f32,
    pub(crate) transitioning: bool,
    pub(crate) transform: Transform2D,
    pub(crate) springs: Vec<SpringState>,
    pub(crate) slot: usize,
    pub(crate) calls: Vec<Vec<Arg>>,
}

impl<M> AnimationRecord<M> {
    fn new(identity: String, instance: SnippetRef<M>, index: usize, delay_ratio: f32) -> Self {
        Self {
            identity,
            instance,
            index,
            drawn: false,
            presence: -delay_ratio,
            transitioning: true,
            transform: Transform2D::identity(),
            springs: Vec::new(),
            slot: 0,
            calls: Vec::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn instance(&self) -> &SnippetRef<M> {
        &self.instance
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn drawn(&self) -> bool {
        self.drawn
    }

    /// Fade level: negative while the fade-in delay runs, 1 when fully present.
    pub fn presence(&self) -> f32 {
        self.presence
    }

    pub fn transitioning(&self) -> bool {
        self.transitioning
    }

    /// Transform in effect when the element was last painted.
    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    pub fn springs(&self) -> &[SpringState] {
        &self.springs
    }

    /// Argument sets recorded this frame, one per `draw` call with arguments.
    pub fn calls(&self) -> &[Vec<Arg>] {
        &self.calls
    }

    /// Consume the next spring slot, advancing it toward `target`.
    /// A slot used for the first time starts at rest on the target.
    pub(crate) fn interpolate(&mut self, target: f32, dt: f32, movement: f32) -> f32 {
        let slot = self.slot;
        self.slot += 1;
        match self.springs.get_mut(slot) {
            Some(spring) => spring.advance(target, dt, movement),
            None => {
                let mut spring = SpringState::at_rest(target);
                let value = spring.advance(target, dt, movement);
                self.springs.push(spring);
                value
            }
        }
    }

    fn begin_frame(&mut self) {
        self.drawn = false;
        self.slot = 0;
    }
}

pub struct Registry<M> {
    by_identity: HashMap<String, usize>,
    records: Vec<AnimationRecord<M>>,
}

impl<M> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Registry<M> {
    pub fn new() -> Self {
        Self { by_identity: HashMap::new(), records: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.by_identity.contains_key(identity)
    }

    pub fn get(&self, identity: &str) -> Option<&AnimationRecord<M>> {
        self.by_identity.get(identity).map(|&i| &self.records[i])
    }

    pub fn index_of(&self, identity: &str) -> Option<usize> {
        self.by_identity.get(identity).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnimationRecord<M>> {
        self.records.iter()
    }

    pub(crate) fn record(&self, index: usize) -> &AnimationRecord<M> {
        &self.records[index]
    }

    pub(crate) fn record_mut(&mut self, index: usize) -> &mut AnimationRecord<M> {
        &mut self.records[index]
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut AnimationRecord<M>> {
        self.records.iter_mut()
    }

    /// Index of the record for `identity`, creating it if unseen.
    pub(crate) fn resolve(&mut self, identity: &str, instance: &SnippetRef<M>, delay_ratio: f32) -> usize {
        if let Some(&index) = self.by_identity.get(identity) {
            return index;
        }
        let index = self.records.len();
        self.records
            .push(AnimationRecord::new(identity.to_string(), Rc::clone(instance), index, delay_ratio));
        self.by_identity.insert(identity.to_string(), index);
        tracing::trace!(identity, index, "created animation record");
        index
    }

    /// Mark every record undrawn and rewind its spring cursor.
    pub(crate) fn begin_frame(&mut self) {
        for record in &mut self.records {
            record.begin_frame();
        }
    }

    /// Remove the record at `index`; the last record moves into its slot.
    pub(crate) fn swap_remove(&mut self, index: usize) -> AnimationRecord<M> {
        let removed = self.records.swap_remove(index);
        self.by_identity.remove(&removed.identity);
        if let Some(moved) = self.records.get_mut(index) {
            moved.index = index;
            self.by_identity.insert(moved.identity.clone(), index);
        }
        tracing::trace!(identity = %removed.identity, index, "removed animation record");
        removed
    }

    /// Remove all records at `indices`, in any order, without disturbing the
    /// others' identity mapping.
    pub(crate) fn remove_all(&mut self, mut indices: Vec<usize>) -> usize {
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        for &index in &indices {
            self.swap_remove(index);
        }
        indices.len()
    }

    /// Whether the map and list agree and every `index` matches its slot.
    pub fn is_consistent(&self) -> bool {
        self.records.len() == self.by_identity.len()
            && self.records.iter().enumerate().all(|(i, r)| {
                r.index == i && self.by_identity.get(&r.identity) == Some(&i)
            })
    }
}
