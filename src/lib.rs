pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod render;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);
