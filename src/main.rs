use color_eyre::Result;
use log::error;

use toroid_snake::config::Config;
use toroid_snake::game::{Clock, SnakeGame};
use toroid_snake::term::TermManager;

fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();

    let config = Config::from_env();
    let mut game = SnakeGame::new(&config).map_err(|e| {
        error!("bad configuration: {}", e);
        e
    })?;
    let mut clock = Clock::new(config.speed);

    // The terminal is handed back when `term` drops, including on errors.
    let mut term = TermManager::new(*game.grid(), config.border)?;
    let res = game.run(&mut term, &mut clock);
    drop(term);

    if let Err(e) = &res {
        error!("game aborted: {}", e);
    }
    res
}
