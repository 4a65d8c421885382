use crate::scene::*;

/// Geometry snapshot tested against a pointer already mapped into local space.
#[derive(Clone, Debug, PartialEq)]
pub enum HitShape {
    Rect(Rect),
    Ellipse { center: [f32; 2], radii: [f32; 2] },
    StrokeRect { rect: Rect, width: f32 },
    /// Flattened subpaths, tested with the given fill rule.
    Polygon { rings: Vec<Vec<[f32; 2]>>, fill_rule: FillRule },
    /// Stroked polylines; a point hits within half the line width.
    Polyline { lines: Vec<Vec<[f32; 2]>>, width: f32 },
}

impl HitShape {
    pub fn contains(&self, p: [f32; 2]) -> bool {
        match self {
            HitShape::Rect(r) => r.contains(p),
            HitShape::Ellipse { center, radii } => point_in_ellipse(p, *center, *radii),
            HitShape::StrokeRect { rect, width } => point_in_stroke_rect(p, *rect, *width),
            HitShape::Polygon { rings, fill_rule } => point_in_polygon(p, rings, *fill_rule),
            HitShape::Polyline { lines, width } => point_near_polyline(p, lines, *width),
        }
    }

    pub fn bounds(&self) -> Option<Rect> {
        match self {
            HitShape::Rect(r) => Some(*r),
            HitShape::Ellipse { center, radii } => Some(Rect {
                x: center[0] - radii[0],
                y: center[1] - radii[1],
                w: 2.0 * radii[0],
                h: 2.0 * radii[1],
            }),
            HitShape::StrokeRect { rect, width } => Some(Rect {
                x: rect.x - width * 0.5,
                y: rect.y - width * 0.5,
                w: rect.w + width,
                h: rect.h + width,
            }),
            HitShape::Polygon { rings, .. } => bbox_for_points(rings.iter().flatten().copied()),
            HitShape::Polyline { lines, width } => bbox_for_points(lines.iter().flatten().copied()).map(|b| Rect {
                x: b.x - width * 0.5,
                y: b.y - width * 0.5,
                w: b.w + width,
                h: b.h + width,
            }),
        }
    }

    /// Position of `p` within the shape's bounding box, clamped to [0, 1].
    /// `None` when the box is degenerate.
    pub fn normalized(&self, p: [f32; 2]) -> Option<[f32; 2]> {
        let b = self.bounds()?;
        if b.w.abs() <= f32::EPSILON || b.h.abs() <= f32::EPSILON {
            return None;
        }
        Some([
            ((p[0] - b.x) / b.w).clamp(0.0, 1.0),
            ((p[1] - b.y) / b.h).clamp(0.0, 1.0),
        ])
    }
}

fn bbox_for_points(points: impl Iterator<Item = [f32; 2]>) -> Option<Rect> {
    let mut minx = f32::INFINITY;
    let mut miny = f32::INFINITY;
    let mut maxx = f32::NEG_INFINITY;
    let mut maxy = f32::NEG_INFINITY;
    let mut any = false;
    for q in points {
        minx = minx.min(q[0]);
        miny = miny.min(q[1]);
        maxx = maxx.max(q[0]);
        maxy = maxy.max(q[1]);
        any = true;
    }
    any.then(|| Rect { x: minx, y: miny, w: (maxx - minx).max(0.0), h: (maxy - miny).max(0.0) })
}

fn point_in_ellipse(p: [f32; 2], center: [f32; 2], radii: [f32; 2]) -> bool {
    let dx = (p[0] - center[0]) / radii[0].abs().max(1e-6);
    let dy = (p[1] - center[1]) / radii[1].abs().max(1e-6);
    dx * dx + dy * dy <= 1.0 + 1e-5
}

fn point_in_stroke_rect(p: [f32; 2], rect: Rect, width: f32) -> bool {
    let half = width.max(0.0) * 0.5;
    let outer = Rect { x: rect.x - half, y: rect.y - half, w: rect.w + 2.0 * half, h: rect.h + 2.0 * half };
    let inner = Rect {
        x: rect.x + half,
        y: rect.y + half,
        w: (rect.w - 2.0 * half).max(0.0),
        h: (rect.h - 2.0 * half).max(0.0),
    };
    let strictly_inner = p[0] > inner.x && p[1] > inner.y && p[0] < inner.x + inner.w && p[1] < inner.y + inner.h;
    outer.contains(p) && !strictly_inner
}

// Winding number over all rings; even-odd uses its parity.
fn point_in_polygon(p: [f32; 2], rings: &[Vec<[f32; 2]>], fill_rule: FillRule) -> bool {
    let mut winding = 0i32;
    for ring in rings {
        let n = ring.len();
        if n < 3 {
            continue;
        }
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            if a[1] <= p[1] {
                if b[1] > p[1] && cross(a, b, p) > 0.0 {
                    winding += 1;
                }
            } else if b[1] <= p[1] && cross(a, b, p) < 0.0 {
                winding -= 1;
            }
        }
    }
    match fill_rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => winding % 2 != 0,
    }
}

fn point_near_polyline(p: [f32; 2], lines: &[Vec<[f32; 2]>], width: f32) -> bool {
    let half = width.max(0.0) * 0.5 + 1e-4;
    lines.iter().any(|line| match line.as_slice() {
        [only] => dist_sq(p, *only) <= half * half,
        pts => pts.windows(2).any(|seg| segment_dist_sq(p, seg[0], seg[1]) <= half * half),
    })
}

fn dist_sq(a: [f32; 2], b: [f32; 2]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

fn segment_dist_sq(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let len_sq = ab[0] * ab[0] + ab[1] * ab[1];
    if len_sq <= f32::EPSILON {
        return dist_sq(p, a);
    }
    let t = (((p[0] - a[0]) * ab[0] + (p[1] - a[1]) * ab[1]) / len_sq).clamp(0.0, 1.0);
    dist_sq(p, [a[0] + t * ab[0], a[1] + t * ab[1]])
}

fn cross(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (p[1] - a[1]) - (p[0] - a[0]) * (b[1] - a[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_are_inclusive() {
        let s = HitShape::Rect(Rect::new(10.0, 10.0, 20.0, 20.0));
        assert!(s.contains([10.0, 10.0]));
        assert!(s.contains([30.0, 30.0]));
        assert!(!s.contains([30.1, 20.0]));
        assert_eq!(s.normalized([20.0, 15.0]), Some([0.5, 0.25]));
    }

    #[test]
    fn ellipse_uses_both_radii() {
        let s = HitShape::Ellipse { center: [0.0, 0.0], radii: [10.0, 2.0] };
        assert!(s.contains([9.0, 0.0]));
        assert!(!s.contains([0.0, 3.0]));
    }

    #[test]
    fn stroke_rect_is_a_ring() {
        let s = HitShape::StrokeRect { rect: Rect::new(0.0, 0.0, 20.0, 20.0), width: 4.0 };
        assert!(s.contains([1.0, 10.0]));
        assert!(s.contains([-1.5, 10.0]));
        assert!(!s.contains([10.0, 10.0]));
    }

    #[test]
    fn triangle_polygon() {
        let s = HitShape::Polygon {
            rings: vec![vec![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [0.0, 0.0]]],
            fill_rule: FillRule::NonZero,
        };
        assert!(s.contains([2.0, 2.0]));
        assert!(!s.contains([8.0, 8.0]));
        assert_eq!(s.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn even_odd_leaves_holes() {
        let outer = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let inner = vec![[3.0, 3.0], [7.0, 3.0], [7.0, 7.0], [3.0, 7.0]];
        let even_odd = HitShape::Polygon { rings: vec![outer.clone(), inner.clone()], fill_rule: FillRule::EvenOdd };
        let non_zero = HitShape::Polygon { rings: vec![outer, inner], fill_rule: FillRule::NonZero };
        assert!(!even_odd.contains([5.0, 5.0]));
        assert!(non_zero.contains([5.0, 5.0]));
        assert!(even_odd.contains([1.0, 5.0]));
    }

    #[test]
    fn polyline_hits_within_half_width() {
        let s = HitShape::Polyline { lines: vec![vec![[0.0, 0.0], [10.0, 0.0]]], width: 4.0 };
        assert!(s.contains([5.0, 1.9]));
        assert!(!s.contains([5.0, 2.5]));
        assert!(!s.contains([13.0, 0.0]));
    }

    #[test]
    fn degenerate_bounds_have_no_normalized_position() {
        let s = HitShape::Rect(Rect::new(0.0, 0.0, 0.0, 10.0));
        assert!(s.contains([0.0, 5.0]));
        assert_eq!(s.normalized([0.0, 5.0]), None);
    }
}
