use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const GRID_WIDTH: usize = 20;
pub const GRID_HEIGHT: usize = 15;
const START_LENGTH: u16 = 1;

// Random probes before falling back to scanning for free cells.
const APPLE_SAMPLE_ATTEMPTS: usize = 64;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A turn through a cell: the heading the snake entered with, then the one
/// it left with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Turn {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
}

impl Turn {
    pub fn entered(self) -> Direction {
        match self {
            Turn::UpLeft | Turn::UpRight => Direction::Up,
            Turn::DownLeft | Turn::DownRight => Direction::Down,
            Turn::LeftUp | Turn::LeftDown => Direction::Left,
            Turn::RightUp | Turn::RightDown => Direction::Right,
        }
    }

    pub fn left(self) -> Direction {
        match self {
            Turn::LeftUp | Turn::RightUp => Direction::Up,
            Turn::LeftDown | Turn::RightDown => Direction::Down,
            Turn::UpLeft | Turn::DownLeft => Direction::Left,
            Turn::UpRight | Turn::DownRight => Direction::Right,
        }
    }
}

use Turn::*;

// Indexed by [entered][left] in `Direction` order (Up, Down, Left, Right).
// Straight runs and reversals have no corner.
const CORNERS: [[Option<Turn>; 4]; 4] = [
    [None, None, Some(UpLeft), Some(UpRight)],
    [None, None, Some(DownLeft), Some(DownRight)],
    [Some(LeftUp), Some(LeftDown), None, None],
    [Some(RightUp), Some(RightDown), None, None],
];

/// How a body cell is drawn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BodyTile {
    Vertical,
    #[default]
    Horizontal,
    Corner(Turn),
}

impl BodyTile {
    pub fn between(entered: Direction, left: Direction) -> Self {
        match CORNERS[entered.index()][left.index()] {
            Some(turn) => BodyTile::Corner(turn),
            None if left.is_vertical() => BodyTile::Vertical,
            None => BodyTile::Horizontal,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    /// Ticks until this cell drops out of the body. 0 means empty.
    pub timer: u16,
    pub tile: BodyTile,
    /// Heading the snake left this cell with. Orients the tail.
    pub heading: Direction,
}

impl Cell {
    pub fn is_live(&self) -> bool {
        self.timer > 0
    }

    /// The oldest live segment.
    pub fn is_tail(&self) -> bool {
        self.timer == 1
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickResult {
    Continuing,
    AppleEaten,
    SelfCollision,
}

/// Toroidal snake world.
///
/// The body is not stored as a list. Every cell the head passes through gets
/// `timer = length`, and all live timers count down once per tick, so exactly
/// `length` cells are live at any time. The head cell itself is marked at the
/// start of the next tick.
pub struct SnakeEngine {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    head: Position,
    length: u16,
    direction: Direction,
    last_direction: Direction,
    apple: Position,
    ate_last_tick: bool,
    collided: bool,
    rng: StdRng,
}

impl SnakeEngine {
    pub fn new(seed: u64) -> Self {
        Self::with_size(GRID_WIDTH, GRID_HEIGHT, seed)
    }

    pub fn with_size(width: usize, height: usize, seed: u64) -> Self {
        assert!(width > 0 && height > 0, "grid must not be empty");
        let mut engine = Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
            head: Position::default(),
            length: START_LENGTH,
            direction: Direction::Right,
            last_direction: Direction::Right,
            apple: Position::default(),
            ate_last_tick: false,
            collided: false,
            rng: StdRng::seed_from_u64(seed),
        };
        engine.reset(seed);
        engine
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn reset(&mut self, seed: u64) {
        self.cells.fill(Cell::default());
        self.head = self.start_position();
        self.length = START_LENGTH;
        self.direction = Direction::Right;
        self.last_direction = Direction::Right;
        self.ate_last_tick = false;
        self.collided = false;
        self.rng = StdRng::seed_from_u64(seed);
        self.relocate_apple();
    }

    /// Advances the snake one cell.
    ///
    /// `requested` is ignored when it would reverse the snake onto itself.
    ///
    /// # Panics
    ///
    /// If called again after it returned [`TickResult::SelfCollision`].
    pub fn tick(&mut self, requested: Option<Direction>) -> TickResult {
        assert!(!self.collided, "tick called on a collided snake");

        // Growth earned last tick keeps every timer where it is for one tick.
        if !std::mem::take(&mut self.ate_last_tick) {
            for cell in self.cells.iter_mut().filter(|c| c.timer > 0) {
                cell.timer -= 1;
            }
        }

        let i = self.index(self.head);
        if self.cells[i].timer != 0 {
            self.collided = true;
            return TickResult::SelfCollision;
        }
        self.cells[i].timer = self.length;

        self.last_direction = self.direction;
        if let Some(dir) = requested {
            if dir != self.last_direction.opposite() {
                self.direction = dir;
            }
        }
        self.cells[i].tile = BodyTile::between(self.last_direction, self.direction);
        self.cells[i].heading = self.direction;

        self.head = self.neighbour(self.head, self.direction);

        if self.head == self.apple {
            self.length += 1;
            self.ate_last_tick = true;
            self.relocate_apple();
            return TickResult::AppleEaten;
        }
        TickResult::Continuing
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn apple(&self) -> Position {
        self.apple
    }

    #[cfg(test)]
    pub(crate) fn is_collided(&self) -> bool {
        self.collided
    }

    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    /// Body cells, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_live())
            .map(|(i, c)| (Position::new(i % self.width, i / self.width), c))
    }

    fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    fn neighbour(&self, pos: Position, dir: Direction) -> Position {
        let (w, h) = (self.width, self.height);
        match dir {
            Direction::Up => Position::new(pos.x, (pos.y + h - 1) % h),
            Direction::Down => Position::new(pos.x, (pos.y + 1) % h),
            Direction::Left => Position::new((pos.x + w - 1) % w, pos.y),
            Direction::Right => Position::new((pos.x + 1) % w, pos.y),
        }
    }

    fn is_free(&self, pos: Position) -> bool {
        pos != self.head && !self.cell(pos).is_live()
    }

    fn relocate_apple(&mut self) {
        for _ in 0..APPLE_SAMPLE_ATTEMPTS {
            let candidate = Position::new(
                self.rng.gen_range(0..self.width),
                self.rng.gen_range(0..self.height),
            );
            if self.is_free(candidate) {
                self.apple = candidate;
                return;
            }
        }

        let free: Vec<Position> = (0..self.width * self.height)
            .map(|i| Position::new(i % self.width, i / self.width))
            .filter(|p| self.is_free(*p))
            .collect();
        match free.choose(&mut self.rng) {
            Some(pos) => self.apple = *pos,
            None => log::debug!("no free cell left for the apple"),
        }
    }

    #[cfg(test)]
    pub(crate) fn place_apple(&mut self, pos: Position) {
        self.apple = pos;
    }

    #[cfg(test)]
    pub(crate) fn place_snake(&mut self, head: Position, direction: Direction, body: &[(Position, u16)]) {
        self.head = head;
        self.direction = direction;
        self.last_direction = direction;
        self.length = (body.len() as u16).max(START_LENGTH);
        for &(pos, timer) in body {
            let i = self.index(pos);
            self.cells[i].timer = timer;
        }
    }
}
