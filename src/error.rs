use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Every cell of the board is occupied, food has nowhere to go.
    Exhausted { cells: usize },
    /// A board dimension does not divide evenly into cells.
    Misaligned { dimension: &'static str, value: i32, cell_size: i32 },
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Exhausted { cells } => {
                write!(f, "no free cell left for food, all {} cells are occupied", cells)
            }
            Error::Misaligned { dimension, value, cell_size } => write!(
                f,
                "board {} of {} is not a multiple of the cell size {}",
                dimension, value, cell_size
            ),
            Error::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for Error {}
