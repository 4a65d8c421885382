//! View events handed to the application layer.
//!
//! Pointer events carry a snapshot of the hit list from the tick that was
//! current when the event occurred, so the handler sees exactly what was
//! under the pointer on screen.

use crate::hit::HitRecord;
use crate::snippet::{EventResult, Interaction};

/// Pointer interaction with the hits under the pointer.
pub struct PointerEvent<M> {
    pub kind: Interaction,
    /// Logical pointer position.
    pub position: [f32; 2],
    /// Hits in paint order; the last is the topmost.
    pub hits: Vec<HitRecord<M>>,
}

impl<M> Clone for PointerEvent<M> {
    fn clone(&self) -> Self {
        Self { kind: self.kind, position: self.position, hits: self.hits.clone() }
    }
}

impl<M> std::fmt::Debug for PointerEvent<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerEvent")
            .field("kind", &self.kind)
            .field("position", &self.position)
            .field("hits", &self.hits)
            .finish()
    }
}

impl<M> PointerEvent<M> {
    pub fn new(kind: Interaction, position: [f32; 2], hits: Vec<HitRecord<M>>) -> Self {
        Self { kind, position, hits }
    }

    pub fn topmost(&self) -> Option<&HitRecord<M>> {
        self.hits.last()
    }

    pub fn topmost_identity(&self) -> Option<&str> {
        self.topmost().map(|h| h.identity.as_str())
    }

    /// Let every hit element react, in paint order. Handled if any element
    /// handled it.
    pub fn dispatch(&self, model: &mut M) -> EventResult {
        let mut result = EventResult::Ignored;
        for hit in &self.hits {
            if hit.snippet.on_interaction(self.kind, self, hit.local, model).is_handled() {
                result = EventResult::Handled;
            }
        }
        result
    }

    /// Snapshot `model`, let every hit element mutate the copy, and return it.
    pub fn apply(&self, model: &M) -> M
    where
        M: Clone,
    {
        let mut next = model.clone();
        let result = self.dispatch(&mut next);
        tracing::trace!(
            kind = self.kind.name(),
            hits = self.hits.len(),
            handled = result.is_handled(),
            "applied pointer event"
        );
        next
    }
}

/// Key press with modifier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key name, e.g. `"a"`, `"Enter"`, `"Backspace"`.
    pub key: String,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), shift: false, ctrl: false, alt: false }
    }
}

/// Generic view event.
pub enum ViewEvent<M> {
    /// New logical viewport size.
    Resize([f32; 2]),
    Pointer(PointerEvent<M>),
    Key(KeyEvent),
}

impl<M> ViewEvent<M> {
    pub fn kind(&self) -> &'static str {
        match self {
            ViewEvent::Resize(_) => "resize",
            ViewEvent::Pointer(e) => e.kind.name(),
            ViewEvent::Key(_) => "key",
        }
    }

    /// Run `action` with the event, the topmost hit identity and all hits
    /// when this is a pointer event.
    pub fn on_pointer(&self, action: impl FnOnce(&PointerEvent<M>, Option<&str>, &[HitRecord<M>])) {
        if let ViewEvent::Pointer(e) = self {
            action(e, e.topmost_identity(), &e.hits);
        }
    }

    pub fn on_resize(&self, action: impl FnOnce([f32; 2])) {
        if let ViewEvent::Resize(size) = self {
            action(*size);
        }
    }

    pub fn on_key(&self, action: impl FnOnce(&KeyEvent)) {
        if let ViewEvent::Key(key) = self {
            action(key);
        }
    }

    /// Model after this event: pointer events go through their hits, every
    /// other event leaves a plain copy.
    pub fn apply(&self, model: &M) -> M
    where
        M: Clone,
    {
        match self {
            ViewEvent::Pointer(e) => e.apply(model),
            _ => model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identify;
    use crate::session::PaintSession;
    use crate::snippet::{Arg, Snippet};
    use std::borrow::Cow;
    use std::rc::Rc;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Counter {
        clicks: Vec<String>,
    }

    struct Button(&'static str);

    impl Identify for Button {
        fn identity(&self) -> Cow<'_, str> {
            Cow::Borrowed(self.0)
        }
    }

    impl Snippet<Counter> for Button {
        fn paint(&self, _session: &mut PaintSession<'_, Counter>, _args: &[Arg]) -> anyhow::Result<()> {
            Ok(())
        }

        fn on_interaction(
            &self,
            kind: Interaction,
            _event: &PointerEvent<Counter>,
            local: [f32; 2],
            model: &mut Counter,
        ) -> EventResult {
            match kind {
                Interaction::Click => {
                    model.clicks.push(format!("{}@{},{}", self.0, local[0], local[1]));
                    EventResult::Handled
                }
                _ => EventResult::Ignored,
            }
        }
    }

    fn hit(id: &'static str, local: [f32; 2]) -> HitRecord<Counter> {
        HitRecord { identity: id.to_string(), snippet: Rc::new(Button(id)), local, normalized: None }
    }

    #[test]
    fn apply_mutates_a_copy_for_every_hit() {
        let event = PointerEvent::new(Interaction::Click, [5.0, 5.0], vec![hit("a", [1.0, 2.0]), hit("b", [3.0, 4.0])]);
        let before = Counter::default();
        let after = event.apply(&before);
        assert!(before.clicks.is_empty());
        assert_eq!(after.clicks, vec!["a@1,2", "b@3,4"]);
        assert_eq!(event.topmost_identity(), Some("b"));
    }

    #[test]
    fn unhandled_kinds_leave_model_equal() {
        let event = PointerEvent::new(Interaction::Move, [0.0, 0.0], vec![hit("a", [0.0, 0.0])]);
        let mut model = Counter::default();
        assert_eq!(event.dispatch(&mut model), EventResult::Ignored);
        assert_eq!(model, Counter::default());
    }

    #[test]
    fn view_event_delegates() {
        let resize: ViewEvent<Counter> = ViewEvent::Resize([800.0, 600.0]);
        let mut seen = None;
        resize.on_resize(|size| seen = Some(size));
        resize.on_key(|_| panic!("not a key event"));
        assert_eq!(seen, Some([800.0, 600.0]));
        assert_eq!(resize.kind(), "resize");

        let pointer = ViewEvent::Pointer(PointerEvent::new(Interaction::Click, [1.0, 1.0], vec![hit("a", [0.0, 0.0])]));
        let mut top = None;
        pointer.on_pointer(|_, id, hits| top = id.map(|s| format!("{s}/{}", hits.len())));
        assert_eq!(top.as_deref(), Some("a/1"));
        assert_eq!(pointer.apply(&Counter::default()).clicks.len(), 1);

        let key: ViewEvent<Counter> = ViewEvent::Key(KeyEvent::new("Enter"));
        assert_eq!(key.kind(), "key");
    }
}
