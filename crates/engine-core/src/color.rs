use palette::{FromColor, LinSrgba, Srgba};

use crate::scene::ColorLinPremul;

/// sRGB color with channels in [0, 255] and alpha in [0, 1].
///
/// Channels are kept as `f32` so interpolated colors can pass through
/// fractional values between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(255.0, 255.0, 255.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(255.0, 0.0, 0.0);
    pub const CRIMSON: Color = Color::rgb(165.0, 28.0, 48.0);
    pub const GREEN: Color = Color::rgb(0.0, 255.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 255.0);
    pub const NONE: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn grey(v: f32, a: f32) -> Self {
        Self::new(v, v, v, a)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let s = hex.trim().trim_start_matches('#');
        let nibble = |i: usize| u8::from_str_radix(&s[i..i + 1], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        if !s.is_ascii() {
            return None;
        }
        match s.len() {
            3 => Some(Self::rgb(nibble(0)? as f32, nibble(1)? as f32, nibble(2)? as f32)),
            6 => Some(Self::rgb(byte(0)? as f32, byte(2)? as f32, byte(4)? as f32)),
            8 => Some(Self::new(
                byte(0)? as f32,
                byte(2)? as f32,
                byte(4)? as f32,
                byte(6)? as f32 / 255.0,
            )),
            _ => None,
        }
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn alpha(self, factor: f32) -> Self {
        Self { a: self.a * factor, ..self }
    }

    /// Scale the rgb channels by `factor`, flooring to whole channel values.
    pub fn darken(self, factor: f32) -> Self {
        Self {
            r: (factor * self.r).floor(),
            g: (factor * self.g).floor(),
            b: (factor * self.b).floor(),
            a: self.a,
        }
    }

    /// `s == 0` yields `self`, `s == 1` yields `target`.
    pub fn interpolate(self, target: Color, s: f32) -> Self {
        let ns = 1.0 - s;
        Self {
            r: (ns * self.r + s * target.r).round(),
            g: (ns * self.g + s * target.g).round(),
            b: (ns * self.b + s * target.b).round(),
            a: ns * self.a + s * target.a,
        }
    }

    /// Clamp channels to their valid ranges.
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 255.0),
            g: self.g.clamp(0.0, 255.0),
            b: self.b.clamp(0.0, 255.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    pub fn to_srgba_u8(self) -> [u8; 4] {
        let c = self.clamped();
        [
            c.r.round() as u8,
            c.g.round() as u8,
            c.b.round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }

    /// Premultiplied linear color for the surface.
    pub fn to_lin_premul(self) -> ColorLinPremul {
        let c = self.clamped();
        ColorLinPremul::from_srgba(c.r.round() as u8, c.g.round() as u8, c.b.round() as u8, c.a)
    }

    /// CSS `rgba(...)` notation.
    pub fn css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }

    /// Eight qualitative colors for categorical data.
    pub fn nominal8() -> &'static [Color] {
        &NOMINAL_8
    }

    /// Eighteen qualitative colors for categorical data.
    pub fn nominal18() -> &'static [Color] {
        &NOMINAL_18
    }
}

const NOMINAL_8: [Color; 8] = [
    Color::rgb(228.0, 26.0, 28.0),
    Color::rgb(55.0, 126.0, 184.0),
    Color::rgb(77.0, 175.0, 74.0),
    Color::rgb(152.0, 78.0, 163.0),
    Color::rgb(255.0, 127.0, 0.0),
    Color::rgb(255.0, 255.0, 51.0),
    Color::rgb(166.0, 86.0, 40.0),
    Color::rgb(247.0, 129.0, 191.0),
];

const NOMINAL_18: [Color; 18] = [
    Color::rgb(27.0, 158.0, 119.0),
    Color::rgb(217.0, 95.0, 2.0),
    Color::rgb(117.0, 112.0, 179.0),
    Color::rgb(231.0, 41.0, 138.0),
    Color::rgb(102.0, 166.0, 30.0),
    Color::rgb(230.0, 171.0, 2.0),
    Color::rgb(166.0, 118.0, 29.0),
    Color::rgb(102.0, 102.0, 102.0),
    Color::rgb(228.0, 26.0, 28.0),
    Color::rgb(55.0, 126.0, 184.0),
    Color::rgb(77.0, 175.0, 74.0),
    Color::rgb(152.0, 78.0, 163.0),
    Color::rgb(255.0, 127.0, 0.0),
    Color::rgb(255.0, 255.0, 51.0),
    Color::rgb(166.0, 86.0, 40.0),
    Color::rgb(247.0, 129.0, 191.0),
    Color::rgb(141.0, 211.0, 199.0),
    Color::rgb(190.0, 186.0, 218.0),
];

// sRGB → linear premultiplied conversions for the surface boundary.
impl ColorLinPremul {
    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_srgba_u8([r, g, b, a])
    }

    #[inline]
    pub fn from_srgba_u8(c: [u8; 4]) -> Self {
        Self::from_srgba(c[0], c[1], c[2], c[3] as f32 / 255.0)
    }

    /// sRGB u8 channels with float alpha (CSS-like rgba).
    #[inline]
    pub fn from_srgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        let s = Srgba::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a);
        let lin: LinSrgba = LinSrgba::from_color(s);
        Self {
            r: lin.red * lin.alpha,
            g: lin.green * lin.alpha,
            b: lin.blue * lin.alpha,
            a: lin.alpha,
        }
    }

    /// Scale every channel, keeping the color premultiplied.
    #[inline]
    pub fn with_alpha_factor(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self { r: self.r * f, g: self.g * f, b: self.b * f, a: self.a * f }
    }

    /// Back to unpremultiplied sRGB u8 RGBA.
    #[inline]
    pub fn to_srgba_u8(&self) -> [u8; 4] {
        let (r, g, b) = if self.a > 0.0001 {
            (self.r / self.a, self.g / self.a, self.b / self.a)
        } else {
            (0.0, 0.0, 0.0)
        };

        let lin = LinSrgba::new(r, g, b, self.a);
        let srgb: Srgba = Srgba::from_color(lin);

        [
            (srgb.red * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.green * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.blue * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.alpha * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("a51c30"), Some(Color::CRIMSON));
        let c = Color::from_hex("#00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
    }

    #[test]
    fn darken_floors_channels() {
        let c = Color::rgb(101.0, 51.0, 3.0).darken(0.5);
        assert_eq!(c, Color::rgb(50.0, 25.0, 1.0));
    }

    #[test]
    fn interpolate_endpoints() {
        let a = Color::RED;
        let b = Color::BLUE.alpha(0.0);
        assert_eq!(a.interpolate(b, 0.0), a);
        assert_eq!(a.interpolate(b, 1.0), b);
        let mid = a.interpolate(b, 0.5);
        assert_eq!(mid.r, 128.0);
        assert!((mid.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn srgb_round_trip_through_linear() {
        let c = Color::rgb(200.0, 100.0, 50.0);
        assert_eq!(c.to_lin_premul().to_srgba_u8(), [200, 100, 50, 255]);
    }

    #[test]
    fn out_of_range_is_clamped() {
        let c = Color::new(300.0, -5.0, 10.0, 1.5);
        assert_eq!(c.to_srgba_u8(), [255, 0, 10, 255]);
    }

    #[test]
    fn palettes_have_expected_sizes() {
        assert_eq!(Color::nominal8().len(), 8);
        assert_eq!(Color::nominal18().len(), 18);
    }
}
