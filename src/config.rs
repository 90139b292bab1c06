use std::env;
use std::str::FromStr;

use log::warn;

use crate::error::{Error, Result};
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const SCREEN_WIDTH: i32 = 640;
pub const SCREEN_HEIGHT: i32 = 480;
pub const GRID_SIZE: i32 = 20;

/// Ticks per second.
pub const SPEED: u32 = 10;

pub const BOARD_BACKGROUND_COLOR: Rgb = Rgb(0, 0, 0);
pub const BORDER_COLOR: Rgb = Rgb(93, 216, 228);
pub const FOOD_COLOR: Rgb = Rgb(255, 0, 0);
pub const SNAKE_COLOR: Rgb = Rgb(0, 255, 0);

const SPEED_VAR: &str = "SNAKE_SPEED";
const CELL_BORDERS_VAR: &str = "SNAKE_CELL_BORDERS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub screen_width: i32,
    pub screen_height: i32,
    pub grid_size: i32,
    pub speed: u32,
    pub background: Rgb,
    pub border: Rgb,
    pub food_color: Rgb,
    pub snake_color: Rgb,
    /// Outline every filled cell with the border color.
    pub cell_borders: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            grid_size: GRID_SIZE,
            speed: SPEED,
            background: BOARD_BACKGROUND_COLOR,
            border: BORDER_COLOR,
            food_color: FOOD_COLOR,
            snake_color: SNAKE_COLOR,
            cell_borders: true,
        }
    }
}

impl Config {
    /// Defaults with `SNAKE_SPEED` and `SNAKE_CELL_BORDERS` applied on top.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Some(speed) = read_var(SPEED_VAR) {
            config.speed = speed;
        }
        if let Some(borders) = read_var(CELL_BORDERS_VAR) {
            config.cell_borders = borders;
        }
        config
    }

    /// Checks the configuration and builds the board geometry from it.
    pub fn grid(&self) -> Result<Grid> {
        if self.speed == 0 {
            return Err(Error::InvalidConfig("tick rate must be at least 1"));
        }
        Grid::new(self.screen_width, self.screen_height, self.grid_size)
    }
}

fn read_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {}={:?}, not a valid value", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builds_the_board() {
        let grid = Config::default().grid().unwrap();
        assert_eq!((grid.columns(), grid.rows()), (32, 24));
    }

    #[test]
    fn misaligned_board_is_rejected() {
        let config = Config { screen_width: 630, ..Config::default() };
        assert!(matches!(config.grid(), Err(Error::Misaligned { dimension: "width", .. })));
    }

    #[test]
    fn zero_speed_is_rejected() {
        let config = Config { speed: 0, ..Config::default() };
        assert!(matches!(config.grid(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn env_overrides() {
        env::set_var(SPEED_VAR, "15");
        env::set_var(CELL_BORDERS_VAR, "not-a-bool");
        let config = Config::from_env();
        env::remove_var(SPEED_VAR);
        env::remove_var(CELL_BORDERS_VAR);

        assert_eq!(config.speed, 15);
        assert!(config.cell_borders);
    }
}
