//! Basic snippets: background, rectangle, triangle, text label and group.

use std::borrow::Cow;

use engine_core::text::{word_wrap, wrap_dimensions};
use engine_core::{Color, FontSpec};

use crate::identity::Identify;
use crate::session::PaintSession;
use crate::snippet::{Arg, Snippet, SnippetRef};

/// Full-viewport fill. Its color fades, its extent never animates.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub color: Color,
}

impl Background {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Identify for Background {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed("Background")
    }
}

impl<M> Snippet<M> for Background {
    fn paint(&self, session: &mut PaintSession<'_, M>, _args: &[Arg]) -> anyhow::Result<()> {
        session.fill_style(self.color);
        session.set_transitioning(false);
        let [w, h] = session.dimensions();
        session.fill_rect(0.0, 0.0, w, h);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub identity: String,
    pub top_left: [f32; 2],
    pub size: [f32; 2],
    pub color: Color,
    pub pickable: bool,
}

impl Rectangle {
    pub fn new(identity: impl Into<String>, top_left: [f32; 2], size: [f32; 2]) -> Self {
        Self { identity: identity.into(), top_left, size, color: Color::BLACK, pickable: false }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }
}

impl Identify for Rectangle {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identity)
    }
}

impl<M> Snippet<M> for Rectangle {
    fn paint(&self, session: &mut PaintSession<'_, M>, _args: &[Arg]) -> anyhow::Result<()> {
        session.set_pickable(self.pickable);
        session.save();
        session.fill_style(self.color);
        session.translate(self.top_left);
        session.fill_rect(0.0, 0.0, self.size[0], self.size[1]);
        session.restore();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub identity: String,
    pub corners: [[f32; 2]; 3],
    pub color: Color,
    pub pickable: bool,
}

impl Triangle {
    pub fn new(identity: impl Into<String>, corners: [[f32; 2]; 3]) -> Self {
        Self { identity: identity.into(), corners, color: Color::BLACK, pickable: false }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }
}

impl Identify for Triangle {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identity)
    }
}

impl<M> Snippet<M> for Triangle {
    fn paint(&self, session: &mut PaintSession<'_, M>, _args: &[Arg]) -> anyhow::Result<()> {
        let [a, b, c] = self.corners;
        session.set_pickable(self.pickable);
        session.save();
        session.fill_style(self.color);
        session.translate(a);
        session.begin_path();
        session.move_to(0.0, 0.0);
        session.line_to(b[0] - a[0], b[1] - a[1]);
        session.line_to(c[0] - a[0], c[1] - a[1]);
        session.close_path();
        session.fill();
        session.restore();
        Ok(())
    }
}

/// Which side of a label its position refers to, per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Left or top edge.
    #[default]
    Start,
    Middle,
    /// Right or bottom edge.
    End,
}

impl Anchor {
    fn offset(self, extent: f32) -> f32 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Middle => -0.5 * extent,
            Anchor::End => -extent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub font: FontSpec,
    pub color: Color,
    pub horizontal: Anchor,
    pub vertical: Anchor,
    /// Radians, around the label's top-left corner.
    pub rotation: f32,
    pub wrap_length: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            color: Color::BLACK,
            horizontal: Anchor::Start,
            vertical: Anchor::Start,
            rotation: 0.0,
            wrap_length: 1000.0,
        }
    }
}

/// Word-wrapped text anchored at a position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub identity: String,
    pub text: String,
    pub position: [f32; 2],
    pub style: LabelStyle,
    pub pickable: bool,
}

impl Label {
    pub fn new(identity: impl Into<String>, text: impl Into<String>, position: [f32; 2]) -> Self {
        Self {
            identity: identity.into(),
            text: text.into(),
            position,
            style: LabelStyle::default(),
            pickable: false,
        }
    }

    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    pub fn pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }
}

impl Identify for Label {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identity)
    }
}

impl<M> Snippet<M> for Label {
    fn paint(&self, session: &mut PaintSession<'_, M>, _args: &[Arg]) -> anyhow::Result<()> {
        let style = &self.style;
        session.set_pickable(self.pickable);
        session.fill_style(style.color);
        session.font(style.font.clone());

        let lines = word_wrap(&self.text, style.wrap_length, |s| session.measure_text(s));
        let [w, h] = wrap_dimensions(&lines, style.font.size, |s| session.measure_text(s));
        let top_left = [
            self.position[0] + style.horizontal.offset(w),
            self.position[1] + style.vertical.offset(h),
        ];

        session.save();
        session.translate(top_left);
        session.rotate(style.rotation);
        let mut dy = 0.0;
        for line in &lines {
            dy += style.font.size;
            session.fill_text(line, 0.0, dy);
        }
        session.restore();
        Ok(())
    }
}

/// Children painted in order, each as its own element.
pub struct Group<M> {
    pub identity: String,
    pub children: Vec<SnippetRef<M>>,
}

impl<M> Group<M> {
    pub fn new(identity: impl Into<String>, children: Vec<SnippetRef<M>>) -> Self {
        Self { identity: identity.into(), children }
    }
}

impl<M> Identify for Group<M> {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identity)
    }
}

impl<M> Snippet<M> for Group<M> {
    fn paint(&self, session: &mut PaintSession<'_, M>, args: &[Arg]) -> anyhow::Result<()> {
        session.draw_many(&self.children, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{AnimationSettings, FrameDriver};
    use engine_core::{Command, Painter, Rect, Transform2D, Viewport};
    use std::rc::Rc;
    use std::time::Instant;

    struct Scene(Vec<SnippetRef<Scene>>);

    fn item(snippet: impl Snippet<Scene> + 'static) -> SnippetRef<Scene> {
        Rc::new(snippet)
    }

    fn paint_scene(session: &mut PaintSession<'_, Scene>, scene: &Scene) -> anyhow::Result<()> {
        session.draw_many(&scene.0, &[])
    }

    fn render(
        items: Vec<SnippetRef<Scene>>,
        pointer: Option<[f32; 2]>,
    ) -> (FrameDriver<Scene>, Painter) {
        let mut painter = Painter::new(Viewport::new(200, 100));
        let mut driver = FrameDriver::new(AnimationSettings::default(), paint_scene);
        let now = Instant::now();
        if let Some(p) = pointer {
            driver.set_pointer(p, now);
        }
        driver.request_update(Some(Scene(items)), &mut painter, now).unwrap();
        (driver, painter)
    }

    #[test]
    fn test_background_fills_viewport() {
        let (driver, painter) = render(vec![item(Background::new(Color::WHITE))], None);
        match &painter.commands()[0] {
            Command::FillRect { rect, .. } => assert_eq!(*rect, Rect::new(0.0, 0.0, 200.0, 100.0)),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!driver.registry().get("Background").unwrap().transitioning());
    }

    #[test]
    fn test_pickable_rectangle_is_hovered() {
        let rect = Rectangle::new("r", [10.0, 10.0], [20.0, 20.0]).pickable(true);
        let (driver, _) = render(vec![item(rect)], Some([15.0, 25.0]));
        assert_eq!(driver.hovered(), Some("r"));
        assert_eq!(driver.hits().topmost().unwrap().normalized, Some([0.25, 0.75]));
    }

    #[test]
    fn test_triangle_hit_respects_edges() {
        let tri = || item(Triangle::new("t", [[0.0, 0.0], [20.0, 0.0], [0.0, 20.0]]).pickable(true));
        let (inside, _) = render(vec![tri()], Some([5.0, 5.0]));
        assert_eq!(inside.hovered(), Some("t"));
        let (outside, _) = render(vec![tri()], Some([15.0, 15.0]));
        assert!(outside.hovered().is_none());
    }

    #[test]
    fn test_label_wraps_and_anchors_on_real_size() {
        let style = LabelStyle {
            font: FontSpec::new(10.0),
            horizontal: Anchor::Middle,
            vertical: Anchor::Middle,
            wrap_length: 60.0,
            ..LabelStyle::default()
        };
        let label = Label::new("l", "aaaa bbbb cccc", [100.0, 100.0]).with_style(style).pickable(true);
        let (driver, painter) = render(vec![item(label)], Some([80.0, 95.0]));

        let texts: Vec<_> = painter
            .commands()
            .iter()
            .filter_map(|c| match c {
                Command::FillText { run, transform } => Some((run.text.clone(), run.pos, *transform)),
                _ => None,
            })
            .collect();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0].0, "aaaa bbbb");
        assert_eq!(texts[1].0, "cccc");
        assert_eq!(texts[1].1, [0.0, 20.0]);
        // Widest line 49.5, two lines of 10.
        assert_eq!(texts[0].2, Transform2D::translate(75.25, 90.0));
        assert_eq!(driver.hovered(), Some("l"));
    }

    #[test]
    fn test_group_draws_children_as_elements() {
        let a = item(Rectangle::new("a", [0.0, 0.0], [5.0, 5.0]));
        let b = item(Rectangle::new("b", [5.0, 0.0], [5.0, 5.0]));
        let (driver, painter) = render(vec![item(Group::new("g", vec![a, b]))], None);
        assert_eq!(driver.registry().len(), 3);
        assert_eq!(painter.commands().len(), 2);
        assert_eq!(painter.commands()[1].transform(), Transform2D::translate(5.0, 0.0));
    }
}
