use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, terminal};
use log::warn;

use crate::config::Rgb;
use crate::grid::{Grid, Position};
use crate::input::{InputEvent, InputSource};
use crate::render::{Frame, RenderSink};
use crate::{Coords, TermInt};

/// Terminal columns per board cell, so cells come out roughly square.
const CELL_WIDTH: TermInt = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Paint {
    color: Rgb,
    border: bool,
}

/// Owns the terminal for as long as it lives: raw mode and the alternate
/// screen are entered on construction and left again on drop.
pub struct TermManager {
    grid: Grid,
    stdout: Stdout,
    border_color: Rgb,
    // What is on screen right now, one entry per board cell.
    screen: Vec<Option<Paint>>,
}

impl TermManager {
    pub fn new(grid: Grid, border_color: Rgb) -> Result<Self> {
        let (width, height) = terminal::size()?;
        let (need_w, need_h) = board_size(&grid);
        if width < need_w || height < need_h {
            return Err(eyre!(
                "terminal is {}x{}, the board needs at least {}x{}",
                width,
                height,
                need_w,
                need_h
            ));
        }

        let mut term = TermManager {
            grid,
            stdout: stdout(),
            border_color,
            screen: vec![None; grid.cell_count()],
        };
        term.setup()?;
        Ok(term)
    }

    fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(
            self.stdout,
            cursor::Hide,
            cursor::DisableBlinking,
            terminal::Clear(ClearType::All)
        )?;
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )?;
        Ok(())
    }

    fn paint_at(&mut self, pos: Coords, paint: Paint, background: Rgb) -> Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), SetBackgroundColor(paint.color.into()))?;
        if paint.border {
            let border_color = self.border_color;
            queue!(self.stdout, SetForegroundColor(border_color.into()), Print("[]"))?;
        } else {
            queue!(self.stdout, Print("  "))?;
        }
        queue!(self.stdout, SetBackgroundColor(background.into()))?;
        Ok(())
    }
}

impl RenderSink for TermManager {
    fn render(&mut self, frame: &Frame) -> Result<()> {
        let next = layout(&self.grid, frame);

        self.border_color = frame.border_color;
        let columns = self.grid.columns() as usize;
        for (slot, paint) in next.iter().enumerate() {
            if self.screen[slot] == Some(*paint) {
                continue;
            }
            let coords = ((slot % columns) as TermInt * CELL_WIDTH, (slot / columns) as TermInt);
            self.paint_at(coords, *paint, frame.background)?;
            self.screen[slot] = Some(*paint);
        }

        queue!(self.stdout, ResetColor)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl InputSource for TermManager {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                events.push(key_event(ev));
            }
        }

        Ok(events)
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("failed to restore the terminal: {}", e);
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb { r: rgb.0, g: rgb.1, b: rgb.2 }
    }
}

/// Terminal columns and rows the board takes up.
pub fn board_size(grid: &Grid) -> Coords {
    (grid.columns() as TermInt * CELL_WIDTH, grid.rows() as TermInt)
}

/// What every board cell should show for `frame`. Any cell not listed goes
/// back to the background, which covers the erase hint and the body left
/// behind by a reset.
fn layout(grid: &Grid, frame: &Frame) -> Vec<Paint> {
    let mut next = vec![Paint { color: frame.background, border: false }; grid.cell_count()];

    for cell in &frame.cells {
        if !grid.contains(cell.position) {
            warn!("skipping off-board cell {}", cell.position);
            continue;
        }
        next[cell_slot(grid, cell.position)] = Paint { color: cell.color, border: cell.border };
    }

    next
}

fn cell_slot(grid: &Grid, pos: Position) -> usize {
    let (col, row) = grid.cell_index(pos);
    row as usize * grid.columns() as usize + col as usize
}

fn key_event(ev: KeyEvent) -> InputEvent {
    match ev.code {
        KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
        KeyCode::Char('q') | KeyCode::Esc => InputEvent::Quit,
        code => InputEvent::KeyPress(code),
    }
}
