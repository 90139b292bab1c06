use std::collections::HashSet;
use std::thread::sleep;
use std::time::{Duration, Instant};

use log::{debug, info, trace};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::config::{Config, Rgb};
use crate::error::Result;
use crate::food::Food;
use crate::grid::{Grid, Position};
use crate::input::{translate, Action, InputEvent, InputSource};
use crate::render::{Frame, RenderSink, Renderable};
use crate::snake::{Direction, Snake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct SnakeGame<R = ThreadRng> {
    grid: Grid,
    snake: Snake,
    food: Food,
    state: State,
    best_length: usize,
    background: Rgb,
    border: Rgb,
    rng: R,
}

impl SnakeGame<ThreadRng> {
    pub fn new(config: &Config) -> Result<Self> {
        SnakeGame::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> SnakeGame<R> {
    pub fn with_rng(config: &Config, mut rng: R) -> Result<Self> {
        let grid = config.grid()?;
        let snake = Snake::random(&grid, &mut rng, config.snake_color, config.cell_borders);
        let food = Food::new(&grid, &occupied(&snake), &mut rng, config.food_color, config.cell_borders)?;

        Ok(SnakeGame {
            grid,
            snake,
            food,
            state: State::Running,
            best_length: 1,
            background: config.background,
            border: config.border,
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn best_length(&self) -> usize {
        self.best_length
    }

    /// Picks the turn for this tick: the last accepted direction key wins.
    /// Reversals are judged against the direction in effect before the tick.
    pub fn handle_input<I>(&self, events: I) -> (Control, Option<Direction>)
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let current = self.snake.direction();
        let mut next = None;

        for event in events {
            match translate(event, current) {
                Some(Action::Quit) => return (Control::Quit, next),
                Some(Action::Turn(dir)) => next = Some(dir),
                None => {}
            }
        }

        (Control::Continue, next)
    }

    /// Runs a single game step with the events gathered since the last one.
    pub fn tick<I>(&mut self, events: I) -> Result<Control>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        if self.state == State::Terminated {
            return Ok(Control::Quit);
        }

        let (control, next_direction) = self.handle_input(events);
        if control == Control::Quit {
            info!("quit requested, best length {}", self.best_length);
            self.state = State::Terminated;
            return Ok(Control::Quit);
        }

        if let Some(dir) = next_direction {
            self.snake.request_direction(dir);
        }
        self.snake.advance(&self.grid);
        trace!("head at {} moving {}", self.snake.head(), self.snake.direction());

        if self.snake.head() == self.food.position() {
            self.snake.grow();
            self.best_length = self.best_length.max(self.snake.len());
            let food = self.food.relocate(&self.grid, &occupied(&self.snake), &mut self.rng)?;
            debug!("food eaten, length {}, next food at {}", self.snake.len(), food);
        }

        if self.snake.check_self_collision() {
            debug!("ran into itself at length {}, resetting", self.snake.len());
            self.snake.reset(&self.grid, &mut self.rng);
            self.food.relocate(&self.grid, &occupied(&self.snake), &mut self.rng)?;
        }

        Ok(Control::Continue)
    }

    pub fn frame(&self) -> Frame {
        let mut frame = Frame::new(self.background, self.border);
        self.food.draw(&mut frame);
        self.snake.draw(&mut frame);
        frame
    }

    /// Plays until the input source asks to quit.
    pub fn run<T>(&mut self, term: &mut T, clock: &mut Clock) -> color_eyre::Result<()>
    where
        T: InputSource + RenderSink,
    {
        info!(
            "starting on a {}x{} board at {} ticks/s",
            self.grid.columns(),
            self.grid.rows(),
            clock.rate()
        );
        term.render(&self.frame())?;

        loop {
            clock.tick();

            let events = term.poll_events()?;
            if self.tick(events)? == Control::Quit {
                break;
            }

            term.render(&self.frame())?;
        }

        Ok(())
    }
}

#[cfg(test)]
impl<R: Rng> SnakeGame<R> {
    /// Replaces the snake, moving the food off it if needed.
    fn set_snake(&mut self, snake: Snake) -> Result<()> {
        self.snake = snake;
        if self.snake.positions().contains(&self.food.position()) {
            self.food.relocate(&self.grid, &occupied(&self.snake), &mut self.rng)?;
        }
        Ok(())
    }

    fn place_food(&mut self, pos: Position) -> Result<()> {
        assert!(!self.snake.positions().contains(&pos), "food placed on the snake at {}", pos);
        let others: HashSet<Position> = self.grid.cells().filter(|cell| *cell != pos).collect();
        self.food.relocate(&self.grid, &others, &mut self.rng)?;
        Ok(())
    }
}

fn occupied(snake: &Snake) -> HashSet<Position> {
    snake.positions().iter().copied().collect()
}

/// Fixed-rate pacing: each `tick` sleeps away what is left of the frame
/// budget since the previous one.
pub struct Clock {
    rate: u32,
    frame: Duration,
    last: Option<Instant>,
}

impl Clock {
    pub fn new(rate: u32) -> Self {
        let rate = rate.max(1);
        Clock { rate, frame: Duration::from_secs(1) / rate, last: None }
    }

    pub fn rate(&self) -> u32 {
        self.rate
    }

    pub fn frame_time(&self) -> Duration {
        self.frame
    }

    pub fn tick(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.frame {
                sleep(self.frame - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SNAKE_COLOR;
    use crossterm::event::KeyCode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;
    use crate::snake::Direction::*;

    fn game(seed: u64) -> SnakeGame<StdRng> {
        SnakeGame::with_rng(&Config::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    fn game_moving(direction: Direction) -> SnakeGame<StdRng> {
        let mut game = game(5);
        let grid = *game.grid();
        game.set_snake(Snake::new(&grid, direction, SNAKE_COLOR, true)).unwrap();
        game
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::KeyPress(code)
    }

    #[test]
    fn starts_running_with_food_off_the_snake() {
        for seed in 0..20 {
            let game = game(seed);
            assert_eq!(game.state(), State::Running);
            assert_eq!(game.snake().len(), 1);
            assert_eq!(game.snake().head(), game.grid().center());
            assert_ne!(game.food().position(), game.snake().head());
        }
    }

    #[test]
    fn misaligned_config_fails_at_startup() {
        let config = Config { screen_height: 470, ..Config::default() };
        assert!(SnakeGame::with_rng(&config, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn moves_three_cells_right() {
        let mut game = game_moving(Right);
        game.place_food(Position::new(0, 0)).unwrap();
        let start = game.snake().head();

        for _ in 0..3 {
            assert_eq!(game.tick(vec![]).unwrap(), Control::Continue);
            assert_eq!(game.snake().len(), 1);
        }

        assert_eq!(game.snake().head(), Position::new(start.x + 60, start.y));
    }

    #[test]
    fn eating_grows_and_moves_the_food() {
        let mut game = game_moving(Right);
        let ahead = Position::new(game.snake().head().x + 20, game.snake().head().y);
        game.place_food(ahead).unwrap();

        game.tick(vec![]).unwrap();

        assert_eq!(game.snake().head(), ahead);
        assert_eq!(game.snake().len(), 2);
        assert_eq!(game.best_length(), 2);
        assert!(!game.snake().positions().contains(&game.food().position()));

        game.place_food(Position::new(0, 0)).unwrap();
        // The growth shows up on the following move.
        game.tick(vec![]).unwrap();
        assert_eq!(game.snake().positions().len(), 2);
        assert_eq!(game.snake().last_vacated(), None);
    }

    #[test]
    fn last_turn_wins_and_reversals_are_ignored() {
        let mut game = game_moving(Right);
        game.place_food(Position::new(0, 0)).unwrap();
        let start = game.snake().head();

        game.tick(vec![key(KeyCode::Up), key(KeyCode::Left), key(KeyCode::Char('x'))]).unwrap();
        assert_eq!(game.snake().direction(), Up);
        assert_eq!(game.snake().head(), Position::new(start.x, start.y - 20));

        game.tick(vec![key(KeyCode::Down)]).unwrap();
        assert_eq!(game.snake().direction(), Up);

        game.tick(vec![key(KeyCode::Left), key(KeyCode::Right)]).unwrap();
        assert_eq!(game.snake().direction(), Right);
    }

    #[test]
    fn quit_terminates_before_moving() {
        let mut game = game_moving(Down);
        let head = game.snake().head();

        let control = game.tick(vec![key(KeyCode::Left), InputEvent::Quit, key(KeyCode::Up)]).unwrap();
        assert_eq!(control, Control::Quit);
        assert_eq!(game.state(), State::Terminated);
        assert_eq!(game.snake().head(), head);

        assert_eq!(game.tick(vec![]).unwrap(), Control::Quit);
    }

    #[test]
    fn self_collision_resets() {
        let mut game = game(11);
        let grid = *game.grid();
        let c = grid.center();
        // A tight loop: moving up brings the head onto the fourth segment.
        let segments = vec![
            Position::new(c.x, c.y),
            Position::new(c.x + 20, c.y),
            Position::new(c.x + 20, c.y - 20),
            Position::new(c.x, c.y - 20),
            Position::new(c.x - 20, c.y - 20),
        ];
        game.set_snake(Snake::from_segments(&grid, segments, Left, SNAKE_COLOR, true)).unwrap();
        game.place_food(Position::new(0, 0)).unwrap();

        game.tick(vec![key(KeyCode::Up)]).unwrap();

        assert_eq!(game.state(), State::Running);
        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.snake().head(), grid.center());
        assert_ne!(game.food().position(), grid.center());
    }

    #[test]
    fn reset_moves_food_off_the_center() {
        let mut game = game(23);
        let grid = *game.grid();
        let c = grid.center();
        // Two rows below the center, so the food can sit where the reset
        // snake lands.
        let segments = vec![
            Position::new(c.x, c.y + 40),
            Position::new(c.x + 20, c.y + 40),
            Position::new(c.x + 20, c.y + 20),
            Position::new(c.x, c.y + 20),
            Position::new(c.x - 20, c.y + 20),
        ];
        game.set_snake(Snake::from_segments(&grid, segments, Left, SNAKE_COLOR, true)).unwrap();
        game.place_food(c).unwrap();
        assert_eq!(game.food().position(), c);

        game.tick(vec![key(KeyCode::Up)]).unwrap();

        assert_eq!(game.snake().len(), 1);
        assert_eq!(game.snake().head(), c);
        assert_ne!(game.food().position(), c);
    }

    #[test]
    fn frame_lists_food_then_snake() {
        let mut game = game_moving(Left);
        game.place_food(Position::new(0, 0)).unwrap();
        let start = game.snake().head();
        game.tick(vec![]).unwrap();

        let frame = game.frame();
        assert_eq!(frame.background, Rgb(0, 0, 0));
        assert_eq!(frame.cells.len(), 2);
        assert_eq!(frame.cells[0].position, Position::new(0, 0));
        assert_eq!(frame.cells[1].position, game.snake().head());
        assert_eq!(frame.erase, Some(start));
    }

    struct Scripted {
        ticks: VecDeque<Vec<InputEvent>>,
        frames: Vec<Frame>,
    }

    impl InputSource for Scripted {
        fn poll_events(&mut self) -> color_eyre::Result<Vec<InputEvent>> {
            Ok(self.ticks.pop_front().unwrap_or_else(|| vec![InputEvent::Quit]))
        }
    }

    impl RenderSink for Scripted {
        fn render(&mut self, frame: &Frame) -> color_eyre::Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    #[test]
    fn run_renders_every_tick_until_quit() {
        let mut game = game_moving(Right);
        game.place_food(Position::new(0, 0)).unwrap();
        let mut term = Scripted {
            ticks: vec![vec![], vec![key(KeyCode::Down)], vec![]].into_iter().collect(),
            frames: vec![],
        };
        let mut clock = Clock::new(1000);

        game.run(&mut term, &mut clock).unwrap();

        // The opening frame plus one per completed tick.
        assert_eq!(term.frames.len(), 4);
        assert_eq!(game.state(), State::Terminated);
        assert_eq!(game.snake().direction(), Down);
    }

    #[test]
    fn clock_paces_ticks() {
        let mut clock = Clock::new(100);
        assert_eq!(clock.frame_time(), Duration::from_millis(10));

        let start = Instant::now();
        clock.tick();
        clock.tick();
        clock.tick();
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
