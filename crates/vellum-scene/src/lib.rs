//! vellum-scene: immediate-mode scene painting with retained animation.
//!
//! A scene painter redraws the whole model every tick through a
//! [`PaintSession`]. Elements are keyed by identity; the [`FrameDriver`]
//! keeps one [`AnimationRecord`] per identity so geometry and colors glide
//! between frames, new elements fade in, and elements that stop being drawn
//! fade out before they are dropped.

pub mod driver;
pub mod events;
pub mod hit;
pub mod identity;
pub mod registry;
pub mod session;
pub mod shapes;
pub mod snippet;
pub mod spring;
pub mod transform;

pub use driver::{AnimationSettings, CursorIcon, DriverState, FrameDriver, RenderError, ScenePainter};
pub use events::{KeyEvent, PointerEvent, ViewEvent};
pub use hit::{HitList, HitRecord};
pub use identity::{Identify, identify};
pub use registry::{AnimationRecord, Registry};
pub use session::PaintSession;
pub use shapes::{Anchor, Background, Group, Label, LabelStyle, Rectangle, Triangle};
pub use snippet::{Arg, EventResult, Interaction, Snippet, SnippetRef};
pub use spring::SpringState;
pub use transform::{DrawState, TransformStack};
