//! Host drawing surface.
//!
//! The scene layer resolves every animated value before calling into a
//! [`Surface`]; implementations only ever see concrete geometry, colors and
//! the local-to-device transform in effect for the call.

use thiserror::Error;

use crate::display_list::Viewport;
use crate::scene::*;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to load font: {0}")]
    Font(String),

    #[error("invalid pixmap size {width}x{height}")]
    PixmapSize { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Surface {
    /// Logical size and scale factor of the drawing area.
    fn viewport(&self) -> Viewport;

    /// Discard anything drawn in the previous frame.
    fn begin_frame(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: ColorLinPremul, transform: Transform2D);

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke, color: ColorLinPremul, transform: Transform2D);

    fn fill_path(&mut self, path: &Path, color: ColorLinPremul, transform: Transform2D);

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, color: ColorLinPremul, transform: Transform2D);

    fn fill_text(&mut self, run: &TextRun, transform: Transform2D);

    fn stroke_text(&mut self, run: &TextRun, stroke: &Stroke, transform: Transform2D);

    fn draw_image(&mut self, image: &ImageHandle, src: Rect, dst: Rect, alpha: f32, transform: Transform2D);

    /// Advance width of `text` in logical units.
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32;
}
