//! Paintable, identifiable scene elements.

use std::rc::Rc;

use crate::events::PointerEvent;
use crate::identity::Identify;
use crate::session::PaintSession;

/// Shared handle to a scene element. The registry keeps one alive while the
/// element is fading out so it can be replayed after the scene drops it.
pub type SnippetRef<M> = Rc<dyn Snippet<M>>;

/// Extra per-call argument passed to [`Snippet::paint`].
///
/// Arguments are recorded with the element each frame and handed back
/// verbatim when a fading element is replayed.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    Number(f32),
    Vector([f32; 2]),
    Text(String),
    Bool(bool),
    Index(usize),
}

impl Arg {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Arg::Number(n) => Some(*n),
            Arg::Index(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<[f32; 2]> {
        match self {
            Arg::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Arg::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Arg::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Arg::Index(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<f32> for Arg {
    fn from(v: f32) -> Self {
        Arg::Number(v)
    }
}

impl From<[f32; 2]> for Arg {
    fn from(v: [f32; 2]) -> Self {
        Arg::Vector(v)
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Self {
        Arg::Text(v.to_string())
    }
}

impl From<String> for Arg {
    fn from(v: String) -> Self {
        Arg::Text(v)
    }
}

impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        Arg::Bool(v)
    }
}

impl From<usize> for Arg {
    fn from(v: usize) -> Self {
        Arg::Index(v)
    }
}

/// Pointer interaction kinds routed to hit elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    Click,
    Down,
    Up,
    /// Motion with the primary button held.
    Drag,
    /// Motion with no button held.
    Move,
}

impl Interaction {
    pub fn from_motion(primary_down: bool) -> Self {
        if primary_down { Interaction::Drag } else { Interaction::Move }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Click => "click",
            Interaction::Down => "down",
            Interaction::Up => "up",
            Interaction::Drag => "drag",
            Interaction::Move => "move",
        }
    }
}

/// Result of an interaction callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The element changed the model in response
    Handled,
    /// The element does not react to this interaction
    Ignored,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled)
    }
}

/// A drawable element of a scene over model `M`.
pub trait Snippet<M>: Identify {
    /// Issue draw calls for this element. `args` are the extra arguments the
    /// caller passed to [`PaintSession::draw`].
    fn paint(&self, session: &mut PaintSession<'_, M>, args: &[Arg]) -> anyhow::Result<()>;

    /// React to a pointer interaction that hit this element. `local` is the
    /// pointer in the element's local coordinates at paint time.
    fn on_interaction(
        &self,
        _kind: Interaction,
        _event: &PointerEvent<M>,
        _local: [f32; 2],
        _model: &mut M,
    ) -> EventResult {
        EventResult::Ignored
    }

    /// Whether the element may be repainted from its recorded calls while it
    /// fades out. Elements whose `paint` has side effects beyond drawing
    /// should return `false`.
    fn replayable(&self) -> bool {
        true
    }
}
