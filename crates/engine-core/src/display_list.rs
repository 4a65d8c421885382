use crate::scene::*;

/// Logical surface size plus the logical→device scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0, height: 0, scale_factor: 1.0 }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, scale_factor: 1.0 }
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = crate::dpi::sanitize_scale_factor(scale_factor);
        self
    }

    /// Logical size as floats.
    pub fn size(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Backing store size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        let s = crate::dpi::sanitize_scale_factor(self.scale_factor);
        (
            (self.width as f32 * s).round().max(1.0) as u32,
            (self.height as f32 * s).round().max(1.0) as u32,
        )
    }
}

#[derive(Clone, Debug)]
pub enum Command {
    FillRect { rect: Rect, color: ColorLinPremul, transform: Transform2D },
    StrokeRect { rect: Rect, stroke: Stroke, color: ColorLinPremul, transform: Transform2D },
    FillPath { path: Path, color: ColorLinPremul, transform: Transform2D },
    StrokePath { path: Path, stroke: Stroke, color: ColorLinPremul, transform: Transform2D },
    FillText { run: TextRun, transform: Transform2D },
    StrokeText { run: TextRun, stroke: Stroke, transform: Transform2D },
    /// Blit `src` (image pixels) into `dst` (local units).
    DrawImage { image: ImageHandle, src: Rect, dst: Rect, alpha: f32, transform: Transform2D },
}

impl Command {
    pub fn transform(&self) -> Transform2D {
        match self {
            Command::FillRect { transform, .. }
            | Command::StrokeRect { transform, .. }
            | Command::FillPath { transform, .. }
            | Command::StrokePath { transform, .. }
            | Command::FillText { transform, .. }
            | Command::StrokeText { transform, .. }
            | Command::DrawImage { transform, .. } => *transform,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    pub viewport: Viewport,
    pub commands: Vec<Command>,
}

impl DisplayList {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
