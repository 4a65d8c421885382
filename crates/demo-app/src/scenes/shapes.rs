use std::borrow::Cow;
use std::f32::consts::TAU;
use std::rc::Rc;

use engine_core::{Color, FontSpec, ImageHandle, TextAlign, TextBaseline};
use image::{Rgba, RgbaImage};
use vellum_scene::{
    Arg, Background, Identify, Label, LabelStyle, PaintSession, Rectangle, Snippet, SnippetRef, Triangle,
};

use super::{Board, DemoScene};

/// Primitive showcase: paths, ellipses, dashed strokes, text and image blits.
pub struct ShapesScene {
    background: Color,
    text_size: f32,
    sprite: ImageHandle,
}

impl ShapesScene {
    pub fn new(background: Color, text_size: f32) -> Self {
        Self { background, text_size, sprite: checkerboard(32, 8) }
    }
}

fn checkerboard(size: u32, cell: u32) -> ImageHandle {
    let pixels = image_buffer(size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { [240, 240, 240, 255] } else { [55, 126, 184, 255] }
    });
    ImageHandle::from_rgba("checkerboard", pixels)
}

fn image_buffer(size: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| Rgba(f(x, y)))
}

fn item(snippet: impl Snippet<Board> + 'static) -> SnippetRef<Board> {
    Rc::new(snippet)
}

impl DemoScene for ShapesScene {
    fn name(&self) -> &'static str {
        "shapes"
    }

    fn initial_model(&self) -> Board {
        Board::default()
    }

    fn paint(&self, session: &mut PaintSession<'_, Board>, board: &Board) -> anyhow::Result<()> {
        let [w, h] = session.dimensions();
        let items = vec![
            item(Background::new(self.background)),
            item(
                Rectangle::new("panel", [0.05 * w, 0.1 * h], [0.35 * w, 0.5 * h])
                    .with_color(Color::grey(255.0, 0.15))
                    .pickable(true),
            ),
            item(
                Triangle::new("wedge", [[0.1 * w, 0.55 * h], [0.35 * w, 0.15 * h], [0.35 * w, 0.55 * h]])
                    .with_color(Color::CRIMSON)
                    .pickable(true),
            ),
            item(Orbit { center: [0.7 * w, 0.4 * h], radius: 0.2 * h.min(w), phase: board.phase }),
            item(Sprite { image: self.sprite.clone(), pos: [0.05 * w, 0.7 * h] }),
            item(Label::new("title", "vellum primitives", [0.05 * w, 0.05 * h]).with_style(LabelStyle {
                font: FontSpec::new(self.text_size),
                color: Color::WHITE,
                ..LabelStyle::default()
            })),
        ];
        session.draw_many(&items, &[])
    }

    fn script(&self, _frame: u32, board: &mut Board) -> bool {
        board.phase = (board.phase + 0.25) % TAU;
        true
    }

    fn pointer(&self, frame: u32, size: [f32; 2]) -> Option<[f32; 2]> {
        let t = frame as f32 * 0.15;
        Some([size[0] * (0.5 + 0.3 * t.cos()), size[1] * (0.45 + 0.3 * t.sin())])
    }
}

/// Dashed ring with a spoke and a planet at `phase`.
struct Orbit {
    center: [f32; 2],
    radius: f32,
    phase: f32,
}

impl Identify for Orbit {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed("orbit")
    }
}

impl Snippet<Board> for Orbit {
    fn paint(&self, session: &mut PaintSession<'_, Board>, _args: &[Arg]) -> anyhow::Result<()> {
        let [cx, cy] = self.center;
        let r = self.radius;
        session.set_pickable(true);

        session.stroke_style(Color::grey(200.0, 0.8));
        session.line_width(2.0);
        session.line_dash(&[6.0, 4.0]);
        session.begin_path();
        session.arc(cx, cy, r, 0.0, TAU);
        session.stroke();
        session.line_dash(&[]);

        let planet = [cx + r * self.phase.cos(), cy + r * self.phase.sin()];
        session.stroke_line(self.center, planet);
        session.fill_style(Color::nominal8()[4]);
        session.fill_ellipse(planet[0], planet[1], 12.0, 12.0);
        session.stroke_style(Color::WHITE);
        session.stroke_ellipse(cx, cy, 0.25 * r, 0.15 * r);

        session.text_align(TextAlign::Center);
        session.text_baseline(TextBaseline::Middle);
        session.fill_style(Color::WHITE);
        session.fill_text(&format!("{:.0}°", self.phase.to_degrees()), cx, cy);
        Ok(())
    }
}

/// The same image drawn whole, scaled and as a clipped quarter.
struct Sprite {
    image: ImageHandle,
    pos: [f32; 2],
}

impl Identify for Sprite {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed("sprite")
    }
}

impl Snippet<Board> for Sprite {
    fn paint(&self, session: &mut PaintSession<'_, Board>, _args: &[Arg]) -> anyhow::Result<()> {
        let [x, y] = self.pos;
        let [w, h] = self.image.size();
        session.set_pickable(true);
        session.draw_image(&self.image, [x, y]);
        session.draw_image_scaled(&self.image, [x + w + 8.0, y], [2.0 * w, 2.0 * h]);
        session.draw_image_clipped(&self.image, [0.0, 0.0], [0.5 * w, 0.5 * h], [x + 3.0 * w + 16.0, y], [2.0 * w, 2.0 * h]);
        Ok(())
    }
}
