use crate::config::Rgb;
use crate::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub color: Rgb,
    pub border: bool,
}

/// Everything the screen needs for one tick. Later cells paint over earlier
/// ones; the erase cell is painted with the background before any of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: Rgb,
    pub border_color: Rgb,
    pub cells: Vec<Cell>,
    pub erase: Option<Position>,
}

impl Frame {
    pub fn new(background: Rgb, border_color: Rgb) -> Self {
        Frame { background, border_color, cells: vec![], erase: None }
    }

    pub fn fill(&mut self, position: Position, color: Rgb, border: bool) {
        self.cells.push(Cell { position, color, border });
    }

    pub fn erase(&mut self, position: Position) {
        self.erase = Some(position);
    }
}

/// Game objects that know how to put themselves on a frame.
pub trait Renderable {
    fn draw(&self, frame: &mut Frame);
}

/// Whatever ends up showing frames to the player.
pub trait RenderSink {
    fn render(&mut self, frame: &Frame) -> color_eyre::Result<()>;
}
