use std::path::Path as FsPath;
use std::sync::Arc;

use crate::surface::SurfaceError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    // Affine 2D: [a, b, c, d, e, f] for matrix [[a c e],[b d f],[0 0 1]]
    pub m: [f32; 6],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }

    /// Compose two transforms: self ∘ other (apply `other`, then `self`).
    pub fn concat(self, other: Self) -> Self {
        let [a1, b1, c1, d1, e1, f1] = self.m;
        let [a2, b2, c2, d2, e2, f2] = other.m;
        let a = a1 * a2 + c1 * b2;
        let b = b1 * a2 + d1 * b2;
        let c = a1 * c2 + c1 * d2;
        let d = b1 * c2 + d1 * d2;
        let e = a1 * e2 + c1 * f2 + e1;
        let f = b1 * e2 + d1 * f2 + f1;
        Self {
            m: [a, b, c, d, e, f],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 1.0, tx, ty],
        }
    }

    /// Rotation by `angle` radians (clockwise in y-down coordinates).
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [cos, sin, -sin, cos, 0.0, 0.0],
        }
    }

    pub fn determinant(&self) -> f32 {
        self.m[0] * self.m[3] - self.m[1] * self.m[2]
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let [a, b, c, d, e, f] = self.m;
        let det = self.determinant();
        if !det.is_finite() || det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Self {
            m: [
                d * inv_det,
                -b * inv_det,
                -c * inv_det,
                a * inv_det,
                (c * f - d * e) * inv_det,
                (b * e - a * f) * inv_det,
            ],
        })
    }

    /// Apply the transform to a point (x, y).
    pub fn apply(&self, p: [f32; 2]) -> [f32; 2] {
        let [a, b, c, d, e, f] = self.m;
        [a * p[0] + c * p[1] + e, b * p[0] + d * p[1] + f]
    }

    /// Apply the inverse transform to a world-space point. Returns None if non-invertible.
    pub fn inverse_apply(&self, p: [f32; 2]) -> Option<[f32; 2]> {
        self.inverse().map(|inv| inv.apply(p))
    }

    pub fn is_identity(&self, epsilon: f32) -> bool {
        let id = Self::identity();
        self.m.iter().zip(id.m.iter()).all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorLinPremul {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive containment, matching canvas hit semantics on shape edges.
    pub fn contains(&self, p: [f32; 2]) -> bool {
        p[0] >= self.x && p[1] >= self.y && p[0] <= self.x + self.w && p[1] <= self.y + self.h
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoundedRadii {
    pub tl: f32,
    pub tr: f32,
    pub br: f32,
    pub bl: f32,
}

impl RoundedRadii {
    pub fn uniform(r: f32) -> Self {
        Self { tl: r, tr: r, br: r, bl: r }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRect {
    pub rect: Rect,
    pub radii: RoundedRadii,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub width: f32,
    /// Alternating dash/gap lengths; empty for a solid line.
    pub dash: Vec<f32>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self { width: 1.0, dash: Vec::new() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self { size: 16.0, family: "OpenSans".to_string() }
    }
}

impl FontSpec {
    pub fn new(size: f32) -> Self {
        Self { size, ..Self::default() }
    }

    /// CSS-like font shorthand, e.g. `16px OpenSans`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
    #[default]
    Bottom,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Anchor point; its meaning follows `align` and `baseline`.
    pub pos: [f32; 2],
    pub font: FontSpec,
    pub color: ColorLinPremul,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextRun {
    /// Box covered by the run given its measured advance width.
    pub fn bounds(&self, width: f32) -> Rect {
        text_bounds(self.pos, width, &self.font, self.align, self.baseline)
    }
}

/// Box covered by text anchored at `pos`, using the font size as line height.
pub fn text_bounds(
    pos: [f32; 2],
    width: f32,
    font: &FontSpec,
    align: TextAlign,
    baseline: TextBaseline,
) -> Rect {
    let h = font.size;
    let x = match align {
        TextAlign::Left => pos[0],
        TextAlign::Center => pos[0] - 0.5 * width,
        TextAlign::Right => pos[0] - width,
    };
    let y = match baseline {
        TextBaseline::Top => pos[1],
        TextBaseline::Middle => pos[1] - 0.5 * h,
        TextBaseline::Alphabetic => pos[1] - 0.8 * h,
        TextBaseline::Bottom => pos[1] - h,
    };
    Rect { x, y, w: width, h }
}

/// Decoded RGBA image shared between frames.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    pub key: String,
    pub pixels: Arc<image::RgbaImage>,
}

impl ImageHandle {
    pub fn from_rgba(key: impl Into<String>, pixels: image::RgbaImage) -> Self {
        Self { key: key.into(), pixels: Arc::new(pixels) }
    }

    /// Decode a PNG/JPEG/GIF/WebP file.
    pub fn load<P: AsRef<FsPath>>(path: P) -> Result<Self, SurfaceError> {
        let path = path.as_ref();
        let pixels = image::open(path)?.to_rgba8();
        Ok(Self::from_rgba(path.display().to_string(), pixels))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [f32; 2] {
        [self.width() as f32, self.height() as f32]
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

// --- Path geometry ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PathCmd {
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    QuadTo([f32; 2], [f32; 2]),
    CubicTo([f32; 2], [f32; 2], [f32; 2]),
    Close,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    pub cmds: Vec<PathCmd>,
    pub fill_rule: FillRule,
}

const CURVE_STEPS: usize = 12;

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Last point of the path, if any.
    pub fn current_point(&self) -> Option<[f32; 2]> {
        let mut start = None;
        let mut current = None;
        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    start = Some(p);
                    current = Some(p);
                }
                PathCmd::LineTo(p) | PathCmd::QuadTo(_, p) | PathCmd::CubicTo(_, _, p) => {
                    current = Some(p)
                }
                PathCmd::Close => current = start,
            }
        }
        current
    }

    /// Axis-aligned bounds over end and control points.
    pub fn bounds(&self) -> Option<Rect> {
        let mut minx = f32::INFINITY;
        let mut miny = f32::INFINITY;
        let mut maxx = f32::NEG_INFINITY;
        let mut maxy = f32::NEG_INFINITY;
        let mut any = false;
        let mut add = |q: [f32; 2]| {
            minx = minx.min(q[0]);
            miny = miny.min(q[1]);
            maxx = maxx.max(q[0]);
            maxy = maxy.max(q[1]);
        };
        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) | PathCmd::LineTo(p) => {
                    add(p);
                    any = true;
                }
                PathCmd::QuadTo(c, p) => {
                    add(c);
                    add(p);
                    any = true;
                }
                PathCmd::CubicTo(c1, c2, p) => {
                    add(c1);
                    add(c2);
                    add(p);
                    any = true;
                }
                PathCmd::Close => {}
            }
        }
        any.then(|| Rect { x: minx, y: miny, w: (maxx - minx).max(0.0), h: (maxy - miny).max(0.0) })
    }

    /// Flatten into polylines, one per subpath. Closed subpaths repeat their first point.
    pub fn flatten(&self) -> Vec<Vec<[f32; 2]>> {
        let mut out: Vec<Vec<[f32; 2]>> = Vec::new();
        let mut current: Vec<[f32; 2]> = Vec::new();
        for cmd in &self.cmds {
            match *cmd {
                PathCmd::MoveTo(p) => {
                    if current.len() > 1 {
                        out.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                PathCmd::LineTo(p) => current.push(p),
                PathCmd::QuadTo(c, p) => {
                    let p0 = current.last().copied().unwrap_or(c);
                    for i in 1..=CURVE_STEPS {
                        let t = i as f32 / CURVE_STEPS as f32;
                        let u = 1.0 - t;
                        current.push([
                            u * u * p0[0] + 2.0 * u * t * c[0] + t * t * p[0],
                            u * u * p0[1] + 2.0 * u * t * c[1] + t * t * p[1],
                        ]);
                    }
                }
                PathCmd::CubicTo(c1, c2, p) => {
                    let p0 = current.last().copied().unwrap_or(c1);
                    for i in 1..=CURVE_STEPS {
                        let t = i as f32 / CURVE_STEPS as f32;
                        let u = 1.0 - t;
                        let (w0, w1, w2, w3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
                        current.push([
                            w0 * p0[0] + w1 * c1[0] + w2 * c2[0] + w3 * p[0],
                            w0 * p0[1] + w1 * c1[1] + w2 * c2[1] + w3 * p[1],
                        ]);
                    }
                }
                PathCmd::Close => {
                    if let Some(&first) = current.first() {
                        current.push(first);
                        out.push(std::mem::take(&mut current));
                        // A new subpath implicitly starts where the closed one began.
                        current.push(first);
                    }
                }
            }
        }
        if current.len() > 1 {
            out.push(current);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn concat_applies_right_operand_first() {
        let t = Transform2D::translate(10.0, 20.0).concat(Transform2D::scale(2.0, 2.0));
        assert!(approx(t.apply([1.0, 1.0]), [12.0, 22.0]));
    }

    #[test]
    fn inverse_round_trips() {
        let t = Transform2D::translate(5.0, -3.0)
            .concat(Transform2D::rotate(0.7))
            .concat(Transform2D::scale(2.0, 0.5));
        let p = [3.0, 4.0];
        let back = t.inverse_apply(t.apply(p)).unwrap();
        assert!(approx(back, p));
        assert!(t.concat(t.inverse().unwrap()).is_identity(1e-5));
    }

    #[test]
    fn singular_transform_has_no_inverse() {
        assert!(Transform2D::scale(0.0, 1.0).inverse().is_none());
        assert!(Transform2D::scale(0.0, 1.0).inverse_apply([1.0, 1.0]).is_none());
    }

    #[test]
    fn text_bounds_follow_baseline_and_align() {
        let font = FontSpec::new(10.0);
        let r = text_bounds([100.0, 50.0], 40.0, &font, TextAlign::Left, TextBaseline::Bottom);
        assert_eq!(r, Rect::new(100.0, 40.0, 40.0, 10.0));
        let r = text_bounds([100.0, 50.0], 40.0, &font, TextAlign::Center, TextBaseline::Top);
        assert_eq!(r, Rect::new(80.0, 50.0, 40.0, 10.0));
    }

    #[test]
    fn flatten_closes_subpaths() {
        let path = Path {
            cmds: vec![
                PathCmd::MoveTo([0.0, 0.0]),
                PathCmd::LineTo([10.0, 0.0]),
                PathCmd::LineTo([10.0, 10.0]),
                PathCmd::Close,
            ],
            fill_rule: FillRule::NonZero,
        };
        let polys = path.flatten();
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].first(), polys[0].last());
        assert_eq!(path.current_point(), Some([0.0, 0.0]));
        assert_eq!(path.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }
}
