//! Minimal DPI helpers so logical→device scaling stays consistent.
//!
//! Callers provide the platform scale factor (logical→physical) as `f32`.

use crate::scene::Transform2D;

/// Non-finite or non-positive factors fall back to 1.0.
#[inline]
pub fn sanitize_scale_factor(scale_factor: f32) -> f32 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

/// Root transform mapping logical units to device pixels.
#[inline]
pub fn device_transform(scale_factor: f32) -> Transform2D {
    let s = sanitize_scale_factor(scale_factor);
    Transform2D::scale(s, s)
}

/// Logical pointer position in device pixels.
#[inline]
pub fn logical_to_device(p: [f32; 2], scale_factor: f32) -> [f32; 2] {
    let s = sanitize_scale_factor(scale_factor);
    [p[0] * s, p[1] * s]
}

/// Snap a coordinate to the nearest device pixel for crisp edges.
#[inline]
pub fn snap_to_device(v: f32, scale_factor: f32) -> f32 {
    let sf = sanitize_scale_factor(scale_factor);
    (v * sf).round() / sf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_factors_fall_back_to_one() {
        assert_eq!(sanitize_scale_factor(0.0), 1.0);
        assert_eq!(sanitize_scale_factor(f32::NAN), 1.0);
        assert_eq!(sanitize_scale_factor(2.0), 2.0);
    }

    #[test]
    fn device_mapping_matches_root_transform() {
        let p = [3.0, 4.5];
        assert_eq!(logical_to_device(p, 2.0), device_transform(2.0).apply(p));
    }

    #[test]
    fn snaps_to_half_pixels_at_2x() {
        assert_eq!(snap_to_device(1.3, 2.0), 1.5);
    }
}
