use engine_core::Color;
use vellum_scene::PaintSession;

/// Application state shared by every demo scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub cards: Vec<Card>,
    pub selected: Option<String>,
    pub hovered: Option<String>,
    /// Free-running animation phase in radians.
    pub phase: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub color: Color,
}

impl Card {
    pub fn new(id: &str, title: &str, color: Color) -> Self {
        Self { id: id.to_string(), title: title.to_string(), color }
    }
}

pub trait DemoScene {
    fn name(&self) -> &'static str;

    fn initial_model(&self) -> Board;

    fn paint(&self, session: &mut PaintSession<'_, Board>, board: &Board) -> anyhow::Result<()>;

    /// Apply the scripted change for `frame`. Returns whether the model changed.
    fn script(&self, _frame: u32, _board: &mut Board) -> bool {
        false
    }

    /// Logical pointer position at `frame`.
    fn pointer(&self, _frame: u32, _size: [f32; 2]) -> Option<[f32; 2]> {
        None
    }

    fn clicks_at(&self, _frame: u32) -> bool {
        false
    }
}

pub mod cards;
pub mod shapes;
