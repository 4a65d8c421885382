//! Draw-state stack for a paint session.
//!
//! Mirrors canvas `save`/`restore` semantics: `save` pushes a copy of the full
//! draw state (transform, styles, font), `restore` pops it.

use engine_core::{ColorLinPremul, FontSpec, TextAlign, TextBaseline, Transform2D};

/// Everything `save` captures.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub transform: Transform2D,
    pub fill: ColorLinPremul,
    pub stroke: ColorLinPremul,
    pub line_width: f32,
    pub dash: Vec<f32>,
    pub global_alpha: f32,
    pub font: FontSpec,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl DrawState {
    fn with_transform(transform: Transform2D) -> Self {
        Self {
            transform,
            fill: ColorLinPremul::rgba(0, 0, 0, 255),
            stroke: ColorLinPremul::rgba(0, 0, 0, 255),
            line_width: 1.0,
            dash: Vec::new(),
            global_alpha: 1.0,
            font: FontSpec::default(),
            align: TextAlign::Left,
            baseline: TextBaseline::Bottom,
        }
    }
}

impl Default for DrawState {
    fn default() -> Self {
        Self::with_transform(Transform2D::identity())
    }
}

/// Stack of draw states above a fixed root transform.
#[derive(Debug, Clone)]
pub struct TransformStack {
    root: Transform2D,
    current: DrawState,
    saved: Vec<DrawState>,
}

impl TransformStack {
    pub fn new(root: Transform2D) -> Self {
        Self {
            root,
            current: DrawState::with_transform(root),
            saved: Vec::new(),
        }
    }

    pub fn root(&self) -> Transform2D {
        self.root
    }

    /// Current local-to-device transform.
    pub fn current(&self) -> Transform2D {
        self.current.transform
    }

    pub fn state(&self) -> &DrawState {
        &self.current
    }

    pub fn state_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.apply(Transform2D::translate(dx, dy));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.apply(Transform2D::rotate(angle));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.apply(Transform2D::scale(sx, sy));
    }

    /// Post-multiply `t` onto the current transform.
    pub fn apply(&mut self, t: Transform2D) {
        self.current.transform = self.current.transform.concat(t);
    }

    /// Replace the current transform outright.
    pub fn set_transform(&mut self, t: Transform2D) {
        self.current.transform = t;
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state. With nothing saved the transform resets to
    /// the root and `false` is returned.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => {
                self.current.transform = self.root;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn test_translate_then_scale() {
        let mut stack = TransformStack::new(Transform2D::identity());
        stack.translate(10.0, 5.0);
        stack.scale(2.0, 2.0);
        assert!(approx_eq(stack.current().apply([1.0, 1.0]), [12.0, 7.0]));
    }

    #[test]
    fn test_root_applies_last() {
        let mut stack = TransformStack::new(Transform2D::scale(2.0, 2.0));
        stack.translate(10.0, 0.0);
        assert!(approx_eq(stack.current().apply([0.0, 0.0]), [20.0, 0.0]));
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let mut stack = TransformStack::new(Transform2D::identity());
        stack.rotate(std::f32::consts::FRAC_PI_2);
        assert!(approx_eq(stack.current().apply([1.0, 0.0]), [0.0, 1.0]));
    }

    #[test]
    fn test_save_restore_round_trip() {
        let mut stack = TransformStack::new(Transform2D::identity());
        stack.state_mut().line_width = 3.0;
        stack.save();
        stack.translate(5.0, 5.0);
        stack.state_mut().line_width = 7.0;
        stack.state_mut().dash = vec![2.0, 1.0];
        assert_eq!(stack.depth(), 1);
        assert!(stack.restore());
        assert_eq!(stack.current(), Transform2D::identity());
        assert_eq!(stack.state().line_width, 3.0);
        assert!(stack.state().dash.is_empty());
    }

    #[test]
    fn test_unbalanced_restore_falls_back_to_root() {
        let root = Transform2D::scale(2.0, 2.0);
        let mut stack = TransformStack::new(root);
        stack.translate(3.0, 3.0);
        assert!(!stack.restore());
        assert_eq!(stack.current(), root);
    }

    #[test]
    fn test_default_state() {
        let state = DrawState::default();
        assert_eq!(state.baseline, TextBaseline::Bottom);
        assert_eq!(state.global_alpha, 1.0);
    }
}
