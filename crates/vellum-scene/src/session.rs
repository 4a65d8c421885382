//! Frame-scoped paint session.
//!
//! Every primitive resolves the active element's record, passes its numeric
//! arguments through that element's springs, forwards the interpolated values
//! to the [`Surface`], and, when the element is pickable, tests the pointer
//! against the primitive's target geometry in local space.
//!
//! Spring slots are consumed in call order, so an element must interpolate
//! its values in the same order every frame for them to pair up.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::rc::Rc;

use engine_core::{
    Color, ColorLinPremul, FontSpec, HitShape, ImageHandle, Path, PathCmd, Rect, Stroke, Surface, TextAlign,
    TextBaseline, TextRun, Transform2D, Viewport, dpi, text_bounds,
};

use crate::hit::{HitList, HitRecord};
use crate::registry::Registry;
use crate::snippet::{Arg, SnippetRef};
use crate::transform::{DrawState, TransformStack};

/// Line segments per full turn when flattening arcs and ellipses.
const ARC_SEGMENTS: f32 = 64.0;

/// Timing shared by every interpolation in one tick, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FrameTiming {
    pub dt: f32,
    pub movement: f32,
    pub delay_ratio: f32,
}

/// Bookkeeping while undrawn records are replayed.
///
/// Each record is painted by at most one top-level replay per tick: the first
/// replay that reaches it (directly or through a nested draw) owns it.
#[derive(Debug, Default)]
struct ReplayPass {
    current: usize,
    owners: HashMap<usize, usize>,
}

pub struct PaintSession<'a, M> {
    surface: &'a mut dyn Surface,
    registry: &'a mut Registry<M>,
    timing: FrameTiming,
    viewport: Viewport,
    /// Pointer in device pixels.
    pointer: Option<[f32; 2]>,
    local_pointer: Option<[f32; 2]>,
    stack: TransformStack,
    path: Path,
    active: Option<usize>,
    transitioning: bool,
    pickable: bool,
    replay: Option<ReplayPass>,
    hits: HitList<M>,
}

impl<'a, M> PaintSession<'a, M> {
    pub(crate) fn new(
        surface: &'a mut dyn Surface,
        registry: &'a mut Registry<M>,
        timing: FrameTiming,
        pointer: Option<[f32; 2]>,
        hits: HitList<M>,
    ) -> Self {
        let viewport = surface.viewport();
        let root = dpi::device_transform(viewport.scale_factor);
        let mut session = Self {
            surface,
            registry,
            timing,
            viewport,
            pointer,
            local_pointer: None,
            stack: TransformStack::new(root),
            path: Path::new(),
            active: None,
            transitioning: false,
            pickable: false,
            replay: None,
            hits,
        };
        session.update_pointer();
        session
    }

    pub(crate) fn into_hits(self) -> HitList<M> {
        self.hits
    }

    // --- Elements ---

    /// Paint `snippet` as an element with its own animation record.
    ///
    /// Inside `paint` the element is transitioning and not pickable unless it
    /// says otherwise; the enclosing element's context is restored afterwards.
    pub fn draw(&mut self, snippet: &SnippetRef<M>, args: &[Arg]) -> anyhow::Result<()> {
        let identity = snippet.identity();
        let index = self.registry.resolve(&identity, snippet, self.timing.delay_ratio);
        if let Some(pass) = self.replay.as_mut() {
            // Replayed draws repaint the recorded calls; they never extend them.
            let record = self.registry.record_mut(index);
            let owner = match pass.owners.get(&index) {
                Some(&owner) => owner,
                None if record.drawn => return Ok(()),
                None => {
                    pass.owners.insert(index, pass.current);
                    pass.current
                }
            };
            if owner != pass.current {
                return Ok(());
            }
            record.drawn = true;
        } else {
            let transform = self.stack.current();
            let record = self.registry.record_mut(index);
            if !record.drawn {
                record.calls.clear();
            }
            record.drawn = true;
            record.instance = Rc::clone(snippet);
            record.transform = transform;
            if !args.is_empty() {
                record.calls.push(args.to_vec());
            }
        }

        let outer = (self.active, self.transitioning, self.pickable);
        self.active = Some(index);
        self.transitioning = true;
        self.pickable = false;

        let result = snippet.paint(self, args);

        self.registry.record_mut(index).transitioning = self.transitioning;
        (self.active, self.transitioning, self.pickable) = outer;
        result
    }

    pub fn draw_many(&mut self, snippets: &[SnippetRef<M>], args: &[Arg]) -> anyhow::Result<()> {
        for snippet in snippets {
            self.draw(snippet, args)?;
        }
        Ok(())
    }

    /// Repaint every record not drawn this frame from its recorded calls,
    /// under the transform it was last painted with.
    ///
    /// The set of undrawn records is fixed before anything is repainted. A
    /// record reached again through another element's replay is not painted
    /// twice in the same tick.
    pub(crate) fn replay_undrawn(&mut self) -> usize {
        let pending: Vec<(usize, SnippetRef<M>, Vec<Vec<Arg>>, Transform2D)> = self
            .registry
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.drawn && record.instance.replayable())
            .map(|(i, record)| (i, Rc::clone(&record.instance), record.calls.clone(), record.transform))
            .collect();

        let outer = self.replay.replace(ReplayPass::default());
        let mut replayed = 0;
        for (index, instance, calls, transform) in pending {
            if let Some(pass) = self.replay.as_mut() {
                if pass.owners.contains_key(&index) {
                    continue;
                }
                pass.current = index;
            }

            self.stack.save();
            self.stack.set_transform(transform);
            self.update_pointer();
            let result = if calls.is_empty() {
                self.draw(&instance, &[])
            } else {
                calls.iter().try_for_each(|args| self.draw(&instance, args))
            };
            self.stack.restore();
            self.update_pointer();

            if let Err(e) = result {
                tracing::warn!(identity = %instance.identity(), error = %e, "replay of fading element failed");
            }
            replayed += 1;
        }
        self.replay = outer;
        replayed
    }

    /// Whether values of the active element are interpolated.
    pub fn transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn set_transitioning(&mut self, transitioning: bool) {
        self.transitioning = transitioning;
    }

    /// Whether primitives of the active element produce hits.
    pub fn pickable(&self) -> bool {
        self.pickable
    }

    pub fn set_pickable(&mut self, pickable: bool) {
        self.pickable = pickable;
    }

    /// Presence of the active element, 0 outside any element.
    pub fn presence(&self) -> f32 {
        self.active.map(|i| self.registry.record(i).presence).unwrap_or(0.0)
    }

    /// Identity of the element currently painting.
    pub fn active_identity(&self) -> Option<&str> {
        self.active.map(|i| self.registry.record(i).identity.as_str())
    }

    /// Interpolate `target` through the active element's next spring slot.
    /// Returns `target` unchanged outside an element or when not transitioning.
    pub fn t(&mut self, target: f32) -> f32 {
        match self.active {
            Some(index) if self.transitioning => {
                let FrameTiming { dt, movement, .. } = self.timing;
                self.registry.record_mut(index).interpolate(target, dt, movement)
            }
            _ => target,
        }
    }

    fn t_color(&mut self, color: Color) -> ColorLinPremul {
        let r = self.t(color.r).round();
        let g = self.t(color.g).round();
        let b = self.t(color.b).round();
        let a = self.t(color.a) * self.presence();
        Color::new(r, g, b, a).to_lin_premul()
    }

    // --- Queries ---

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Logical viewport size.
    pub fn dimensions(&self) -> [f32; 2] {
        self.viewport.size()
    }

    /// Pointer in the current local coordinates, if any and invertible.
    pub fn local_pointer(&self) -> Option<[f32; 2]> {
        self.local_pointer
    }

    pub fn transform(&self) -> Transform2D {
        self.stack.current()
    }

    pub fn state(&self) -> &DrawState {
        self.stack.state()
    }

    pub fn hits(&self) -> &HitList<M> {
        &self.hits
    }

    /// Advance width of `text` in the current font.
    pub fn measure_text(&self, text: &str) -> f32 {
        self.surface.measure_text(text, &self.stack.state().font)
    }

    // --- Styles ---

    pub fn fill_style(&mut self, color: Color) {
        let fill = self.t_color(color);
        self.stack.state_mut().fill = fill;
    }

    pub fn stroke_style(&mut self, color: Color) {
        let stroke = self.t_color(color);
        self.stack.state_mut().stroke = stroke;
    }

    pub fn line_width(&mut self, width: f32) {
        let width = self.t(width);
        self.stack.state_mut().line_width = width;
    }

    pub fn line_dash(&mut self, segments: &[f32]) {
        self.stack.state_mut().dash = segments.to_vec();
    }

    pub fn global_alpha(&mut self, alpha: f32) {
        let alpha = self.t(alpha).clamp(0.0, 1.0);
        self.stack.state_mut().global_alpha = alpha;
    }

    /// Fonts are not interpolated.
    pub fn font(&mut self, font: FontSpec) {
        self.stack.state_mut().font = font;
    }

    pub fn text_align(&mut self, align: TextAlign) {
        self.stack.state_mut().align = align;
    }

    pub fn text_baseline(&mut self, baseline: TextBaseline) {
        self.stack.state_mut().baseline = baseline;
    }

    fn fill_color(&self) -> ColorLinPremul {
        let state = self.stack.state();
        state.fill.with_alpha_factor(state.global_alpha)
    }

    fn stroke_color(&self) -> ColorLinPremul {
        let state = self.stack.state();
        state.stroke.with_alpha_factor(state.global_alpha)
    }

    fn current_stroke(&self) -> Stroke {
        let state = self.stack.state();
        Stroke { width: state.line_width, dash: state.dash.clone() }
    }

    // --- Transforms ---

    pub fn translate(&mut self, d: [f32; 2]) {
        let dx = self.t(d[0]);
        let dy = self.t(d[1]);
        self.stack.translate(dx, dy);
        self.update_pointer();
    }

    pub fn rotate(&mut self, angle: f32) {
        let angle = self.t(angle);
        self.stack.rotate(angle);
        self.update_pointer();
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        let sx = self.t(sx);
        let sy = self.t(sy);
        self.stack.scale(sx, sy);
        self.update_pointer();
    }

    pub fn save(&mut self) {
        self.stack.save();
    }

    pub fn restore(&mut self) {
        if !self.stack.restore() {
            tracing::warn!(
                element = self.active_identity().unwrap_or("<root>"),
                "restore without matching save; transform reset to root"
            );
        }
        self.update_pointer();
    }

    fn update_pointer(&mut self) {
        let transform = self.stack.current();
        self.local_pointer = self.pointer.and_then(|p| transform.inverse_apply(p));
    }

    // --- Hits ---

    fn hit_point(&self) -> Option<[f32; 2]> {
        if self.pickable && self.active.is_some() { self.local_pointer } else { None }
    }

    fn hit_test(&mut self, shape: &HitShape) {
        if let Some(p) = self.hit_point() {
            self.record_hit(shape, p, p);
        }
    }

    fn record_hit(&mut self, shape: &HitShape, local: [f32; 2], reported: [f32; 2]) {
        let Some(index) = self.active else {
            return;
        };
        if !shape.contains(local) {
            return;
        }
        let normalized = match shape {
            HitShape::Rect(_) => shape.normalized(local),
            _ => None,
        };
        let record = self.registry.record(index);
        self.hits.push(HitRecord {
            identity: record.identity.clone(),
            snippet: Rc::clone(&record.instance),
            local: reported,
            normalized,
        });
    }

    // --- Rectangles ---

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = Rect::new(self.t(x), self.t(y), self.t(w), self.t(h));
        let color = self.fill_color();
        self.surface.fill_rect(rect, color, self.stack.current());
        self.hit_test(&HitShape::Rect(Rect::new(x, y, w, h)));
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = Rect::new(self.t(x), self.t(y), self.t(w), self.t(h));
        let color = self.stroke_color();
        let stroke = self.current_stroke();
        self.surface.stroke_rect(rect, &stroke, color, self.stack.current());
        self.hit_test(&HitShape::StrokeRect { rect: Rect::new(x, y, w, h), width: stroke.width });
    }

    fn round_rect_path(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.begin_path();
        self.move_to(x + radius, y);
        self.arc_to(x + w, y, x + w, y + h, radius);
        self.arc_to(x + w, y + h, x, y + h, radius);
        self.arc_to(x, y + h, x, y, radius);
        self.arc_to(x, y, x + w, y, radius);
        self.close_path();
    }

    pub fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.round_rect_path(x, y, w, h, radius);
        self.fill();
    }

    pub fn stroke_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        self.round_rect_path(x, y, w, h, radius);
        self.stroke();
    }

    // --- Paths ---

    pub fn begin_path(&mut self) {
        self.path = Path::new();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = [self.t(x), self.t(y)];
        self.path.cmds.push(PathCmd::MoveTo(p));
    }

    /// Starts a subpath when the path is empty.
    pub fn line_to(&mut self, x: f32, y: f32) {
        let p = [self.t(x), self.t(y)];
        self.push_point(p);
    }

    pub fn close_path(&mut self) {
        if !self.path.is_empty() {
            self.path.cmds.push(PathCmd::Close);
        }
    }

    /// Clockwise arc around `(x, y)` from `start` to `end` radians.
    pub fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        let center = [self.t(x), self.t(y)];
        let radius = self.t(radius);
        let start = self.t(start);
        let end = self.t(end);
        let sweep = end - start;
        let sweep = if sweep >= TAU { TAU } else { sweep.rem_euclid(TAU) };
        self.push_arc(center, [radius, radius], start, sweep);
    }

    /// Arc of `radius` tangent to the lines current→(x1, y1) and
    /// (x1, y1)→(x2, y2).
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        let p1 = [self.t(x1), self.t(y1)];
        let p2 = [self.t(x2), self.t(y2)];
        let radius = self.t(radius);

        let Some(p0) = self.path.current_point() else {
            self.path.cmds.push(PathCmd::MoveTo(p1));
            return;
        };
        let v1 = [p0[0] - p1[0], p0[1] - p1[1]];
        let v2 = [p2[0] - p1[0], p2[1] - p1[1]];
        let len1 = v1[0].hypot(v1[1]);
        let len2 = v2[0].hypot(v2[1]);
        let cross = v1[0] * v2[1] - v1[1] * v2[0];
        if radius <= 0.0 || len1 <= f32::EPSILON || len2 <= f32::EPSILON || cross.abs() <= f32::EPSILON {
            self.push_point(p1);
            return;
        }
        let u1 = [v1[0] / len1, v1[1] / len1];
        let u2 = [v2[0] / len2, v2[1] / len2];
        let angle = (u1[0] * u2[0] + u1[1] * u2[1]).clamp(-1.0, 1.0).acos();
        let tangent = radius / (angle * 0.5).tan();
        let t1 = [p1[0] + u1[0] * tangent, p1[1] + u1[1] * tangent];
        let t2 = [p1[0] + u2[0] * tangent, p1[1] + u2[1] * tangent];
        let bisector = [u1[0] + u2[0], u1[1] + u2[1]];
        let bisector_len = bisector[0].hypot(bisector[1]);
        let center_dist = radius / (angle * 0.5).sin();
        let center = [
            p1[0] + bisector[0] / bisector_len * center_dist,
            p1[1] + bisector[1] / bisector_len * center_dist,
        ];

        let a1 = (t1[1] - center[1]).atan2(t1[0] - center[0]);
        let a2 = (t2[1] - center[1]).atan2(t2[0] - center[0]);
        let mut sweep = a2 - a1;
        if sweep > PI {
            sweep -= TAU;
        } else if sweep < -PI {
            sweep += TAU;
        }
        self.push_arc(center, [radius, radius], a1, sweep);
    }

    fn push_point(&mut self, p: [f32; 2]) {
        if self.path.current_point().is_some() {
            self.path.cmds.push(PathCmd::LineTo(p));
        } else {
            self.path.cmds.push(PathCmd::MoveTo(p));
        }
    }

    /// Flattened elliptical arc; connects to the current point with a line.
    fn push_arc(&mut self, center: [f32; 2], radii: [f32; 2], start: f32, sweep: f32) {
        let at = |a: f32| [center[0] + radii[0] * a.cos(), center[1] + radii[1] * a.sin()];
        self.push_point(at(start));
        let segments = (sweep.abs() / TAU * ARC_SEGMENTS).ceil().max(1.0) as usize;
        for i in 1..=segments {
            let a = start + sweep * i as f32 / segments as f32;
            self.path.cmds.push(PathCmd::LineTo(at(a)));
        }
    }

    fn ellipse_path(&mut self, cx: f32, cy: f32, rw: f32, rh: f32) {
        let center = [self.t(cx), self.t(cy)];
        let radii = [self.t(rw), self.t(rh)];
        self.begin_path();
        self.push_arc(center, radii, 0.0, TAU);
        self.close_path();
    }

    /// Fill the current path. Path points are local coordinates and are drawn
    /// under the transform current at this call, not the one current when each
    /// point was added.
    pub fn fill(&mut self) {
        let color = self.fill_color();
        self.surface.fill_path(&self.path, color, self.stack.current());
        if self.hit_point().is_some() {
            let shape = HitShape::Polygon { rings: self.path.flatten(), fill_rule: self.path.fill_rule };
            self.hit_test(&shape);
        }
    }

    /// Stroke the current path under the transform current at this call.
    pub fn stroke(&mut self) {
        let color = self.stroke_color();
        let stroke = self.current_stroke();
        self.surface.stroke_path(&self.path, &stroke, color, self.stack.current());
        if self.hit_point().is_some() {
            let shape = HitShape::Polyline { lines: self.path.flatten(), width: stroke.width };
            self.hit_test(&shape);
        }
    }

    pub fn stroke_line(&mut self, from: [f32; 2], to: [f32; 2]) {
        self.begin_path();
        self.move_to(from[0], from[1]);
        self.line_to(to[0], to[1]);
        self.stroke();
    }

    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rw: f32, rh: f32) {
        self.ellipse_path(cx, cy, rw, rh);
        let color = self.fill_color();
        self.surface.fill_path(&self.path, color, self.stack.current());
        self.hit_test(&HitShape::Ellipse { center: [cx, cy], radii: [rw, rh] });
    }

    pub fn stroke_ellipse(&mut self, cx: f32, cy: f32, rw: f32, rh: f32) {
        self.ellipse_path(cx, cy, rw, rh);
        self.stroke();
    }

    // --- Text ---

    fn text_run(&mut self, text: &str, x: f32, y: f32, color: ColorLinPremul) -> TextRun {
        let pos = [self.t(x), self.t(y)];
        let state = self.stack.state();
        TextRun {
            text: text.to_string(),
            pos,
            font: state.font.clone(),
            color,
            align: state.align,
            baseline: state.baseline,
        }
    }

    fn text_hit(&mut self, text: &str, x: f32, y: f32) {
        if self.hit_point().is_none() {
            return;
        }
        let width = self.measure_text(text);
        let state = self.stack.state();
        let bounds = text_bounds([x, y], width, &state.font, state.align, state.baseline);
        self.hit_test(&HitShape::Rect(bounds));
    }

    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let color = self.fill_color();
        let run = self.text_run(text, x, y, color);
        self.surface.fill_text(&run, self.stack.current());
        self.text_hit(text, x, y);
    }

    pub fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        let color = self.stroke_color();
        let run = self.text_run(text, x, y, color);
        let stroke = self.current_stroke();
        self.surface.stroke_text(&run, &stroke, self.stack.current());
        self.text_hit(text, x, y);
    }

    // --- Images ---

    fn image_alpha(&self) -> f32 {
        self.presence().max(0.0) * self.stack.state().global_alpha
    }

    fn blit(&mut self, image: &ImageHandle, src: Rect, dst: Rect) {
        let alpha = self.image_alpha();
        self.surface.draw_image(image, src, dst, alpha, self.stack.current());
    }

    /// Draw `image` at its natural size.
    pub fn draw_image(&mut self, image: &ImageHandle, pos: [f32; 2]) {
        let [w, h] = image.size();
        let dst = Rect::new(self.t(pos[0]), self.t(pos[1]), w, h);
        self.blit(image, Rect::new(0.0, 0.0, w, h), dst);
        self.hit_test(&HitShape::Rect(Rect::new(pos[0], pos[1], w, h)));
    }

    pub fn draw_image_scaled(&mut self, image: &ImageHandle, pos: [f32; 2], dim: [f32; 2]) {
        let [w, h] = image.size();
        let dst = Rect::new(self.t(pos[0]), self.t(pos[1]), self.t(dim[0]), self.t(dim[1]));
        self.blit(image, Rect::new(0.0, 0.0, w, h), dst);
        self.hit_test(&HitShape::Rect(Rect::new(pos[0], pos[1], dim[0], dim[1])));
    }

    /// Blit the `src_pos`/`src_dim` region of `image` into `pos`/`dim`.
    /// Hits report the pointer in source image coordinates.
    pub fn draw_image_clipped(
        &mut self,
        image: &ImageHandle,
        src_pos: [f32; 2],
        src_dim: [f32; 2],
        pos: [f32; 2],
        dim: [f32; 2],
    ) {
        let dst = Rect::new(self.t(pos[0]), self.t(pos[1]), self.t(dim[0]), self.t(dim[1]));
        self.blit(image, Rect::new(src_pos[0], src_pos[1], src_dim[0], src_dim[1]), dst);

        let Some(p) = self.hit_point() else {
            return;
        };
        if dim[0].abs() <= f32::EPSILON || dim[1].abs() <= f32::EPSILON {
            return;
        }
        let in_source = [
            src_pos[0] + (p[0] - pos[0]) * src_dim[0] / dim[0],
            src_pos[1] + (p[1] - pos[1]) * src_dim[1] / dim[1],
        ];
        self.record_hit(&HitShape::Rect(Rect::new(pos[0], pos[1], dim[0], dim[1])), p, in_source);
    }
}
