//! Pointer hits collected while painting.

use std::fmt;
use std::rc::Rc;

use crate::snippet::SnippetRef;

/// One primitive under the pointer, attributed to the element that drew it.
pub struct HitRecord<M> {
    pub identity: String,
    pub snippet: SnippetRef<M>,
    /// Pointer in the element's local coordinates.
    pub local: [f32; 2],
    /// Pointer relative to the primitive's box, when the primitive is box-shaped.
    pub normalized: Option<[f32; 2]>,
}

impl<M> Clone for HitRecord<M> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            snippet: Rc::clone(&self.snippet),
            local: self.local,
            normalized: self.normalized,
        }
    }
}

impl<M> fmt::Debug for HitRecord<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HitRecord")
            .field("identity", &self.identity)
            .field("local", &self.local)
            .field("normalized", &self.normalized)
            .finish()
    }
}

/// Hits in paint order; the last one is the topmost.
pub struct HitList<M> {
    hits: Vec<HitRecord<M>>,
}

impl<M> Default for HitList<M> {
    fn default() -> Self {
        Self { hits: Vec::new() }
    }
}

impl<M> Clone for HitList<M> {
    fn clone(&self) -> Self {
        Self { hits: self.hits.clone() }
    }
}

impl<M> fmt::Debug for HitList<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.hits.iter()).finish()
    }
}

impl<M> HitList<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, hit: HitRecord<M>) {
        self.hits.push(hit);
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// The authoritative interaction target.
    pub fn topmost(&self) -> Option<&HitRecord<M>> {
        self.hits.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitRecord<M>> {
        self.hits.iter()
    }

    pub fn as_slice(&self) -> &[HitRecord<M>] {
        &self.hits
    }

    /// Identities in paint order; an element appears once per hit primitive.
    pub fn identities(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.identity.as_str()).collect()
    }

    pub fn to_vec(&self) -> Vec<HitRecord<M>> {
        self.hits.clone()
    }
}
