use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::Rgb;
use crate::error::{Error, Result};
use crate::grid::{Grid, Position};
use crate::render::{Frame, Renderable};

/// Blind draws tried before falling back to scanning the whole board.
const SAMPLE_ATTEMPTS: usize = 32;

#[derive(Debug, Clone)]
pub struct Food {
    position: Position,
    color: Rgb,
    border: bool,
}

impl Food {
    /// Places new food on a cell outside `occupied`.
    pub fn new<R: Rng + ?Sized>(
        grid: &Grid,
        occupied: &HashSet<Position>,
        rng: &mut R,
        color: Rgb,
        border: bool,
    ) -> Result<Self> {
        let mut food = Food { position: grid.center(), color, border };
        food.relocate(grid, occupied, rng)?;
        Ok(food)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the food to a uniformly random free cell and returns it.
    pub fn relocate<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        occupied: &HashSet<Position>,
        rng: &mut R,
    ) -> Result<Position> {
        self.position = free_cell(grid, occupied, rng)?;
        Ok(self.position)
    }
}

fn free_cell<R: Rng + ?Sized>(grid: &Grid, occupied: &HashSet<Position>, rng: &mut R) -> Result<Position> {
    let size = grid.cell_size();

    for _ in 0..SAMPLE_ATTEMPTS {
        let pos = Position::new(
            rng.gen_range(0..grid.columns()) * size,
            rng.gen_range(0..grid.rows()) * size,
        );
        if !occupied.contains(&pos) {
            return Ok(pos);
        }
    }

    // Crowded board, pick among what is actually left.
    let free: Vec<Position> = grid.cells().filter(|pos| !occupied.contains(pos)).collect();
    free.choose(rng)
        .copied()
        .ok_or(Error::Exhausted { cells: grid.cell_count() })
}

impl Renderable for Food {
    fn draw(&self, frame: &mut Frame) {
        frame.fill(self.position, self.color, self.border);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FOOD_COLOR;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_lands_on_occupied_cells() {
        let grid = Grid::new(100, 100, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let occupied: HashSet<Position> = grid.cells().take(20).collect();
        let mut food = Food::new(&grid, &occupied, &mut rng, FOOD_COLOR, true).unwrap();

        for _ in 0..200 {
            let pos = food.relocate(&grid, &occupied, &mut rng).unwrap();
            assert!(!occupied.contains(&pos));
            assert!(grid.contains(pos));
            assert_eq!(food.position(), pos);
        }
    }

    #[test]
    fn finds_the_last_free_cell() {
        let grid = Grid::new(100, 100, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let last = Position::new(60, 80);
        let occupied: HashSet<Position> = grid.cells().filter(|p| *p != last).collect();

        let food = Food::new(&grid, &occupied, &mut rng, FOOD_COLOR, true).unwrap();
        assert_eq!(food.position(), last);
    }

    #[test]
    fn full_board_is_exhausted() {
        let grid = Grid::new(60, 40, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let occupied: HashSet<Position> = grid.cells().collect();

        let err = Food::new(&grid, &occupied, &mut rng, FOOD_COLOR, true).unwrap_err();
        assert_eq!(err, Error::Exhausted { cells: 6 });
    }

    #[test]
    fn draws_one_cell() {
        let grid = Grid::new(60, 40, 20).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let food = Food::new(&grid, &HashSet::new(), &mut rng, FOOD_COLOR, false).unwrap();

        let mut frame = Frame::new(Rgb(0, 0, 0), Rgb(0, 0, 0));
        food.draw(&mut frame);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].position, food.position());
        assert_eq!(frame.cells[0].color, FOOD_COLOR);
        assert!(!frame.cells[0].border);
    }
}
