use crossterm::event::KeyCode;

use crate::snake::Direction;

/// Raw events, as delivered by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyPress(KeyCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Turn(Direction),
    Quit,
}

/// Source of the events queued since the last tick. Must not block.
pub trait InputSource {
    fn poll_events(&mut self) -> color_eyre::Result<Vec<InputEvent>>;
}

pub fn key_direction(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Turns a raw event into an action. Unknown keys and reversals of
/// `current` yield nothing.
pub fn translate(event: InputEvent, current: Direction) -> Option<Action> {
    match event {
        InputEvent::Quit => Some(Action::Quit),
        InputEvent::KeyPress(code) => key_direction(code)
            .filter(|dir| *dir != current.opposite())
            .map(Action::Turn),
    }
}
