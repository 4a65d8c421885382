//! CPU rasterization of a [`DisplayList`] into a `tiny_skia::Pixmap`.
//!
//! Command transforms already map local units to device pixels, so the
//! pixmap is allocated at the viewport's device size.

use std::path::Path as FsPath;

use tiny_skia::{
    FillRule as SkFillRule, FilterQuality, IntSize, Paint, PathBuilder, Pattern, Pixmap, PixmapPaint, SpreadMode,
    StrokeDash, Transform,
};

use crate::display_list::{Command, DisplayList};
use crate::scene::*;
use crate::surface::SurfaceError;
use crate::text::{FontdueText, TextMeasure};

fn to_skia_transform(t: Transform2D) -> Transform {
    let [a, b, c, d, e, f] = t.m;
    Transform::from_row(a, b, c, d, e, f)
}

fn solid_paint(color: ColorLinPremul) -> Paint<'static> {
    let [r, g, b, a] = color.to_srgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn skia_stroke(stroke: &Stroke) -> tiny_skia::Stroke {
    let mut sk = tiny_skia::Stroke { width: stroke.width.max(0.0), ..tiny_skia::Stroke::default() };
    if !stroke.dash.is_empty() {
        let mut dash = stroke.dash.clone();
        // Odd-length patterns repeat, matching canvas setLineDash.
        if dash.len() % 2 == 1 {
            dash.extend_from_within(..);
        }
        sk.dash = StrokeDash::new(dash, 0.0);
    }
    sk
}

fn skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for cmd in &path.cmds {
        match *cmd {
            PathCmd::MoveTo(p) => pb.move_to(p[0], p[1]),
            PathCmd::LineTo(p) => pb.line_to(p[0], p[1]),
            PathCmd::QuadTo(c, p) => pb.quad_to(c[0], c[1], p[0], p[1]),
            PathCmd::CubicTo(c1, c2, p) => pb.cubic_to(c1[0], c1[1], c2[0], c2[1], p[0], p[1]),
            PathCmd::Close => pb.close(),
        }
    }
    pb.finish()
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    // Canvas accepts negative sizes; normalize them.
    let (x, w) = if rect.w < 0.0 { (rect.x + rect.w, -rect.w) } else { (rect.x, rect.w) };
    let (y, h) = if rect.h < 0.0 { (rect.y + rect.h, -rect.h) } else { (rect.y, rect.h) };
    tiny_skia::Rect::from_xywh(x, y, w, h)
}

fn image_pixmap(image: &ImageHandle) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let mut data = Vec::with_capacity(image.pixels.as_raw().len());
    for px in image.pixels.pixels() {
        let [r, g, b, a] = px.0;
        let premul = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        data.extend_from_slice(&[premul(r), premul(g), premul(b), a]);
    }
    Pixmap::from_vec(data, size)
}

fn glyph_pixmap(width: u32, height: u32, coverage: &[u8], color: [u8; 4]) -> Option<Pixmap> {
    let size = IntSize::from_wh(width, height)?;
    let mut data = Vec::with_capacity(coverage.len() * 4);
    for &cov in coverage {
        let a = cov as u16 * color[3] as u16 / 255;
        let premul = |c: u8| ((c as u16 * a + 127) / 255) as u8;
        data.extend_from_slice(&[premul(color[0]), premul(color[1]), premul(color[2]), a as u8]);
    }
    Pixmap::from_vec(data, size)
}

fn draw_text(pixmap: &mut Pixmap, run: &TextRun, font: Option<&FontdueText>, transform: Transform2D) {
    let Some(font) = font else {
        tracing::trace!(text = %run.text, "no font configured, skipping text");
        return;
    };
    let width = font.measure(&run.text, &run.font);
    let origin = run.bounds(width);
    let color = run.color.to_srgba_u8();
    let paint = PixmapPaint { quality: FilterQuality::Bilinear, ..PixmapPaint::default() };
    for glyph in font.rasterize_line(&run.text, run.font.size) {
        let Some(mask) = glyph_pixmap(glyph.width, glyph.height, &glyph.coverage, color) else {
            continue;
        };
        let t = transform.concat(Transform2D::translate(origin.x + glyph.offset[0], origin.y + glyph.offset[1]));
        pixmap.draw_pixmap(0, 0, mask.as_ref(), &paint, to_skia_transform(t), None);
    }
}

fn draw_image(pixmap: &mut Pixmap, image: &ImageHandle, src: Rect, dst: Rect, alpha: f32, transform: Transform2D) {
    if src.w <= 0.0 || src.h <= 0.0 {
        return;
    }
    let (Some(img), Some(dst_rect)) = (image_pixmap(image), skia_rect(dst)) else {
        return;
    };
    // Image space → local space: src maps onto dst.
    let pattern_t = Transform2D::translate(dst.x, dst.y)
        .concat(Transform2D::scale(dst.w / src.w, dst.h / src.h))
        .concat(Transform2D::translate(-src.x, -src.y));
    let paint = Paint {
        shader: Pattern::new(
            img.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            alpha.clamp(0.0, 1.0),
            to_skia_transform(pattern_t),
        ),
        anti_alias: true,
        ..Paint::default()
    };
    pixmap.fill_rect(dst_rect, &paint, to_skia_transform(transform), None);
}

/// Render `list` into a new pixmap. Text is skipped when `font` is `None`.
pub fn rasterize(list: &DisplayList, font: Option<&FontdueText>) -> Result<Pixmap, SurfaceError> {
    let (width, height) = list.viewport.device_size();
    let mut pixmap = Pixmap::new(width, height).ok_or(SurfaceError::PixmapSize { width, height })?;

    for cmd in &list.commands {
        match cmd {
            Command::FillRect { rect, color, transform } => {
                if let Some(r) = skia_rect(*rect) {
                    pixmap.fill_rect(r, &solid_paint(*color), to_skia_transform(*transform), None);
                }
            }
            Command::StrokeRect { rect, stroke, color, transform } => {
                if let Some(r) = skia_rect(*rect) {
                    let path = PathBuilder::from_rect(r);
                    pixmap.stroke_path(&path, &solid_paint(*color), &skia_stroke(stroke), to_skia_transform(*transform), None);
                }
            }
            Command::FillPath { path, color, transform } => {
                if let Some(p) = skia_path(path) {
                    let rule = match path.fill_rule {
                        FillRule::NonZero => SkFillRule::Winding,
                        FillRule::EvenOdd => SkFillRule::EvenOdd,
                    };
                    pixmap.fill_path(&p, &solid_paint(*color), rule, to_skia_transform(*transform), None);
                }
            }
            Command::StrokePath { path, stroke, color, transform } => {
                if let Some(p) = skia_path(path) {
                    pixmap.stroke_path(&p, &solid_paint(*color), &skia_stroke(stroke), to_skia_transform(*transform), None);
                }
            }
            Command::FillText { run, transform } | Command::StrokeText { run, transform, .. } => {
                draw_text(&mut pixmap, run, font, *transform);
            }
            Command::DrawImage { image, src, dst, alpha, transform } => {
                draw_image(&mut pixmap, image, *src, *dst, *alpha, *transform);
            }
        }
    }
    tracing::debug!(commands = list.commands.len(), width, height, "rasterized display list");
    Ok(pixmap)
}

pub fn save_png<P: AsRef<FsPath>>(pixmap: &Pixmap, path: P) -> Result<(), SurfaceError> {
    pixmap.save_png(path.as_ref()).map_err(|e| SurfaceError::Encode(e.to_string()))
}
