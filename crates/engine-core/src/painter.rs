use crate::display_list::{Command, DisplayList, Viewport};
use crate::scene::*;
use crate::surface::Surface;
use crate::text::{HeuristicMeasure, TextMeasure};

/// Reference [`Surface`] that records every call into a [`DisplayList`].
pub struct Painter {
    list: DisplayList,
    measure: Box<dyn TextMeasure>,
}

impl Painter {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_measure(viewport, Box::new(HeuristicMeasure::default()))
    }

    pub fn with_measure(viewport: Viewport, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            list: DisplayList { viewport, commands: Vec::new() },
            measure,
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.list.viewport = viewport;
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.list
    }

    /// Take the recorded list, leaving an empty one with the same viewport.
    pub fn finish(&mut self) -> DisplayList {
        let viewport = self.list.viewport;
        std::mem::replace(&mut self.list, DisplayList { viewport, commands: Vec::new() })
    }

    pub fn commands(&self) -> &[Command] {
        &self.list.commands
    }
}

impl Surface for Painter {
    fn viewport(&self) -> Viewport {
        self.list.viewport
    }

    fn begin_frame(&mut self) {
        self.list.commands.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: ColorLinPremul, transform: Transform2D) {
        self.list.commands.push(Command::FillRect { rect, color, transform });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: &Stroke, color: ColorLinPremul, transform: Transform2D) {
        self.list.commands.push(Command::StrokeRect {
            rect,
            stroke: stroke.clone(),
            color,
            transform,
        });
    }

    fn fill_path(&mut self, path: &Path, color: ColorLinPremul, transform: Transform2D) {
        self.list.commands.push(Command::FillPath { path: path.clone(), color, transform });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, color: ColorLinPremul, transform: Transform2D) {
        self.list.commands.push(Command::StrokePath {
            path: path.clone(),
            stroke: stroke.clone(),
            color,
            transform,
        });
    }

    fn fill_text(&mut self, run: &TextRun, transform: Transform2D) {
        self.list.commands.push(Command::FillText { run: run.clone(), transform });
    }

    fn stroke_text(&mut self, run: &TextRun, stroke: &Stroke, transform: Transform2D) {
        self.list.commands.push(Command::StrokeText {
            run: run.clone(),
            stroke: stroke.clone(),
            transform,
        });
    }

    fn draw_image(&mut self, image: &ImageHandle, src: Rect, dst: Rect, alpha: f32, transform: Transform2D) {
        self.list.commands.push(Command::DrawImage {
            image: image.clone(),
            src,
            dst,
            alpha,
            transform,
        });
    }

    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        self.measure.measure(text, font)
    }
}
