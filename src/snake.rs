use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::Rgb;
use crate::grid::{Grid, Position};
use crate::render::{Frame, Renderable};
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Right)
    }

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Unit step in screen space, y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    // Head first.
    body: VecDeque<Position>,
    length: usize,
    direction: Direction,
    pending: Option<Direction>,
    last: Option<Position>,
    color: Rgb,
    border: bool,
}

impl Snake {
    /// A single-segment snake at the board center.
    pub fn new(grid: &Grid, direction: Direction, color: Rgb, border: bool) -> Self {
        let mut body = VecDeque::new();
        body.push_front(grid.center());
        Snake { body, length: 1, direction, pending: None, last: None, color, border }
    }

    pub fn random<R: Rng + ?Sized>(grid: &Grid, rng: &mut R, color: Rgb, border: bool) -> Self {
        Snake::new(grid, Direction::random(rng), color, border)
    }

    /// A snake made of explicit segments, head first. Its target length is
    /// the number of segments; no segments gives the single-cell start snake.
    pub fn from_segments(
        grid: &Grid,
        segments: Vec<Position>,
        direction: Direction,
        color: Rgb,
        border: bool,
    ) -> Self {
        if segments.is_empty() {
            return Snake::new(grid, direction, color, border);
        }

        Snake {
            length: segments.len(),
            body: VecDeque::from(segments),
            direction,
            pending: None,
            last: None,
            color,
            border,
        }
    }

    pub fn positions(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    /// The cell dropped from the tail by the last move, if any.
    pub fn last_vacated(&self) -> Option<Position> {
        self.last
    }

    /// Queues a turn for the next move. A reversal of the current direction
    /// is dropped, otherwise the head would run straight into the neck.
    pub fn request_direction(&mut self, new_direction: Direction) {
        if new_direction != self.direction.opposite() {
            self.pending = Some(new_direction);
        }
    }

    pub fn advance(&mut self, grid: &Grid) {
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }

        let new_head = grid.wrap(self.head(), self.direction.delta());
        self.body.push_front(new_head);

        self.last = if self.body.len() > self.length {
            self.body.pop_back()
        } else {
            None
        };
    }

    /// Takes effect on the next `advance`, which keeps its tail.
    pub fn grow(&mut self) {
        self.length += 1;
    }

    pub fn check_self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|pos| *pos == head)
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        self.length = 1;
        self.body.clear();
        self.body.push_front(grid.center());
        self.direction = Direction::random(rng);
        self.pending = None;
        self.last = None;
    }
}

impl Renderable for Snake {
    fn draw(&self, frame: &mut Frame) {
        if let Some(last) = self.last {
            frame.erase(last);
        }

        for pos in self.body.iter().skip(1) {
            frame.fill(*pos, self.color, self.border);
        }
        frame.fill(self.head(), self.color, self.border);
    }
}
