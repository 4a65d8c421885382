//! Vellum: animated immediate-mode 2D scenes.
//!
//! Re-exports the workspace crates under one name:
//! - [`engine`]: geometry, colors, the drawing surface and the rasterizer
//! - [`scene`]: paint sessions, the animation registry and the frame driver
//! - [`config`]: `vellum.toml` loading

pub use engine_core as engine;
pub use vellum_config as config;
pub use vellum_scene as scene;

pub use engine_core::{Color, DisplayList, Painter, Surface, Viewport};
pub use vellum_config::VellumConfig;
pub use vellum_scene::{AnimationSettings, FrameDriver, PaintSession, Snippet, SnippetRef};
