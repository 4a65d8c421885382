use std::borrow::Cow;
use std::rc::Rc;

use engine_core::{Color, FontSpec};
use vellum_scene::{
    Anchor, Arg, Background, EventResult, Identify, Interaction, Label, LabelStyle, PaintSession, PointerEvent,
    Snippet, SnippetRef,
};

use super::{Board, Card, DemoScene};

const MARGIN: f32 = 16.0;
const CARD_HEIGHT: f32 = 96.0;
const CORNER: f32 = 10.0;

/// Grid of selectable cards. Midway the cards rotate one slot and the last
/// one is dropped, so positions glide and the dropped card fades out.
pub struct CardsScene {
    background: Color,
    text_size: f32,
    columns: usize,
}

impl CardsScene {
    pub fn new(background: Color, text_size: f32) -> Self {
        Self { background, text_size, columns: 3 }
    }
}

impl DemoScene for CardsScene {
    fn name(&self) -> &'static str {
        "cards"
    }

    fn initial_model(&self) -> Board {
        let titles = ["Plates", "Wells", "Features", "Exemplars", "Clusters", "Histograms"];
        let cards = titles
            .iter()
            .zip(Color::nominal8().iter().copied())
            .map(|(title, color)| Card::new(&title.to_lowercase(), title, color))
            .collect();
        Board { cards, ..Board::default() }
    }

    fn paint(&self, session: &mut PaintSession<'_, Board>, board: &Board) -> anyhow::Result<()> {
        let background: SnippetRef<Board> = Rc::new(Background::new(self.background));
        session.draw(&background, &[])?;

        let [w, h] = session.dimensions();
        let columns = self.columns.max(1);
        let cell_width = (w - MARGIN * (columns as f32 + 1.0)) / columns as f32;
        for (i, card) in board.cards.iter().enumerate() {
            let (col, row) = ((i % columns) as f32, (i / columns) as f32);
            let view: SnippetRef<Board> = Rc::new(CardView {
                card: card.clone(),
                pos: [MARGIN + col * (cell_width + MARGIN), MARGIN + row * (CARD_HEIGHT + MARGIN)],
                size: [cell_width, CARD_HEIGHT],
                selected: board.selected.as_deref() == Some(card.id.as_str()),
                hovered: board.hovered.as_deref() == Some(card.id.as_str()),
                text_size: self.text_size,
            });
            session.draw(&view, &[])?;
        }

        let status = match &board.selected {
            Some(id) => format!("selected: {id}"),
            None => "click a card".to_string(),
        };
        let caption: SnippetRef<Board> = Rc::new(Label::new("caption", status, [0.5 * w, h - MARGIN]).with_style(
            LabelStyle {
                font: FontSpec::new(self.text_size),
                color: Color::WHITE,
                horizontal: Anchor::Middle,
                vertical: Anchor::End,
                ..LabelStyle::default()
            },
        ));
        session.draw(&caption, &[])
    }

    fn script(&self, frame: u32, board: &mut Board) -> bool {
        match frame {
            12 => {
                board.cards.rotate_left(1);
                true
            }
            20 => board.cards.pop().is_some(),
            _ => false,
        }
    }

    fn pointer(&self, frame: u32, size: [f32; 2]) -> Option<[f32; 2]> {
        let t = (frame % 40) as f32 / 40.0;
        Some([size[0] * (0.1 + 0.6 * t), size[1] * (0.1 + 0.3 * t)])
    }

    fn clicks_at(&self, frame: u32) -> bool {
        frame == 8
    }
}

struct CardView {
    card: Card,
    pos: [f32; 2],
    size: [f32; 2],
    selected: bool,
    hovered: bool,
    text_size: f32,
}

impl Identify for CardView {
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.card.id)
    }
}

impl Snippet<Board> for CardView {
    fn paint(&self, session: &mut PaintSession<'_, Board>, _args: &[Arg]) -> anyhow::Result<()> {
        let [w, h] = self.size;
        session.set_pickable(true);
        session.save();
        session.translate(self.pos);

        let fill = if self.hovered { self.card.color } else { self.card.color.darken(0.8) };
        session.fill_style(fill);
        session.fill_round_rect(0.0, 0.0, w, h, CORNER);
        if self.selected {
            session.stroke_style(Color::WHITE);
            session.line_width(3.0);
            session.stroke_round_rect(0.0, 0.0, w, h, CORNER);
        }

        let title: SnippetRef<Board> = Rc::new(
            Label::new(format!("{}:title", self.card.id), self.card.title.clone(), [12.0, 12.0]).with_style(
                LabelStyle {
                    font: FontSpec::new(self.text_size),
                    color: Color::WHITE,
                    wrap_length: w - 24.0,
                    ..LabelStyle::default()
                },
            ),
        );
        session.draw(&title, &[])?;
        session.restore();
        Ok(())
    }

    fn on_interaction(
        &self,
        kind: Interaction,
        _event: &PointerEvent<Board>,
        _local: [f32; 2],
        board: &mut Board,
    ) -> EventResult {
        if kind != Interaction::Click {
            return EventResult::Ignored;
        }
        board.selected = if board.selected.as_deref() == Some(self.card.id.as_str()) {
            None
        } else {
            Some(self.card.id.clone())
        };
        EventResult::Handled
    }
}
