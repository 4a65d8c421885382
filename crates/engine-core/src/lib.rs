//! engine-core: geometry, color and drawing-surface primitives shared by the
//! scene layer, plus a display-list recorder and a CPU rasterizer.

mod color;
mod display_list;
pub mod dpi;
mod hit_test;
mod painter;
pub mod raster;
mod scene;
mod surface;
pub mod text;

pub use color::Color;
pub use display_list::*;
pub use hit_test::HitShape;
pub use painter::Painter;
pub use scene::*;
pub use surface::{Surface, SurfaceError};
pub use text::{FontdueText, HeuristicMeasure, TextMeasure};
