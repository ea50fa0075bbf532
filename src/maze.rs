use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Smallest side length accepted by [`generate`].
pub const MIN_SIDE: usize = 11;

/// Largest side a requested size is clamped to.
pub const MAX_SIDE: usize = 199;

/// Lattice steps examined by the carver, in this order.
const CARVE_DIRS: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The position `dist` cells away in `dir`, or `None` if that would go
    /// below zero on either axis.
    pub fn offset(self, dir: Dir, dist: usize) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let dist = dist as isize;
        Some(Pos {
            x: self.x.checked_add_signed(dx * dist)?,
            y: self.y.checked_add_signed(dy * dist)?,
        })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    /// Maps a cardinal unit vector back to its direction. Diagonals and the
    /// zero vector have no direction.
    pub fn from_delta(dx: isize, dy: isize) -> Option<Dir> {
        match (dx, dy) {
            (0, -1) => Some(Dir::Up),
            (0, 1) => Some(Dir::Down),
            (-1, 0) => Some(Dir::Left),
            (1, 0) => Some(Dir::Right),
            _ => None,
        }
    }
}

/// Rectangular wall/open occupancy grid, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos).then(|| pos.y * self.width + pos.x)
    }

    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    pub fn is_open(&self, pos: Pos) -> bool {
        self.get(pos) == Some(Cell::Open)
    }

    fn set(&mut self, pos: Pos, cell: Cell) {
        let idx = pos.y * self.width + pos.x;
        self.cells[idx] = cell;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Open)
            .map(|(idx, _)| Pos::new(idx % self.width, idx / self.width))
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell == Cell::Open).count()
    }

    /// The neighbour of `pos` in `dir` if it is inside the grid and open.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        pos.offset(dir, 1).filter(|next| self.is_open(*next))
    }

    /// Flood fill over open cells from `start`, indexed like the grid
    /// (`y * width + x`). Nothing is reachable from a wall.
    pub fn reachable_from(&self, start: Pos) -> Vec<bool> {
        let mut seen = vec![false; self.cells.len()];
        if !self.is_open(start) {
            return seen;
        }
        let mut q = VecDeque::new();
        seen[start.y * self.width + start.x] = true;
        q.push_back(start);
        while let Some(pos) = q.pop_front() {
            for dir in Dir::ALL {
                if let Some(next) = self.step(pos, dir) {
                    let idx = next.y * self.width + next.x;
                    if !seen[idx] {
                        seen[idx] = true;
                        q.push_back(next);
                    }
                }
            }
        }
        seen
    }

    /// Shortest open path from `from` to `to`, both ends included.
    pub fn path(&self, from: Pos, to: Pos) -> Option<Vec<Pos>> {
        if !self.is_open(from) || !self.is_open(to) {
            return None;
        }
        let mut prev: Vec<Option<usize>> = vec![None; self.cells.len()];
        let mut seen = vec![false; self.cells.len()];
        let mut q = VecDeque::new();
        let start_idx = from.y * self.width + from.x;
        seen[start_idx] = true;
        q.push_back(from);

        while let Some(pos) = q.pop_front() {
            if pos == to {
                let mut path = vec![to];
                let mut idx = to.y * self.width + to.x;
                while let Some(p) = prev[idx] {
                    path.push(Pos::new(p % self.width, p / self.width));
                    idx = p;
                }
                path.reverse();
                return Some(path);
            }
            let idx = pos.y * self.width + pos.x;
            for dir in Dir::ALL {
                if let Some(next) = self.step(pos, dir) {
                    let nidx = next.y * self.width + next.x;
                    if !seen[nidx] {
                        seen[nidx] = true;
                        prev[nidx] = Some(idx);
                        q.push_back(next);
                    }
                }
            }
        }
        None
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let ch = match cell {
                    Cell::Wall => '#',
                    Cell::Open => ' ',
                };
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseGridError {
    #[error("grid has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unexpected {ch:?} at ({x}, {y})")]
    BadCell { ch: char, x: usize, y: usize },
}

/// Parses `#` as wall and `.` or space as open, one row per line.
impl FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut width = None;
        let mut height = 0;
        let mut cells = Vec::new();
        for (y, line) in s.lines().enumerate() {
            let found = line.chars().count();
            let expected = *width.get_or_insert(found);
            if found != expected {
                return Err(ParseGridError::Ragged {
                    row: y,
                    expected,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                cells.push(match ch {
                    '#' => Cell::Wall,
                    '.' | ' ' => Cell::Open,
                    _ => return Err(ParseGridError::BadCell { ch, x, y }),
                });
            }
            height += 1;
        }
        match width {
            Some(width) if width > 0 => Ok(Grid {
                width,
                height,
                cells,
            }),
            _ => Err(ParseGridError::Empty),
        }
    }
}

/// Carves a perfect maze with a randomized depth-first backtracker.
///
/// Only cells with both coordinates odd act as rooms; joining two rooms two
/// cells apart opens the wall cell between them. The walk starts at `(1, 1)`
/// and keeps its path on an explicit stack, so large grids never recurse.
/// Every room ends up connected to the start by exactly one path, and the
/// outer border stays solid.
///
/// Panics unless both sides are odd and at least [`MIN_SIDE`].
pub fn generate(rng: &mut impl Rng, width: usize, height: usize) -> Grid {
    assert!(
        width % 2 == 1 && height % 2 == 1,
        "maze sides must be odd, got {width}x{height}"
    );
    assert!(
        width >= MIN_SIDE && height >= MIN_SIDE,
        "maze sides must be at least {MIN_SIDE}, got {width}x{height}"
    );

    let mut grid = Grid::filled(width, height, Cell::Wall);
    let start = Pos::new(1, 1);
    grid.set(start, Cell::Open);
    let mut stack = vec![start];
    let mut options = Vec::with_capacity(CARVE_DIRS.len());

    while let Some(&current) = stack.last() {
        options.clear();
        options.extend(CARVE_DIRS.iter().filter_map(|&dir| {
            let next = current.offset(dir, 2)?;
            let inside = next.x >= 1 && next.x <= width - 2 && next.y >= 1 && next.y <= height - 2;
            (inside && grid.get(next) == Some(Cell::Wall)).then_some(next)
        }));

        match options.choose(rng) {
            None => {
                stack.pop();
            }
            Some(&next) => {
                let between = Pos::new((current.x + next.x) / 2, (current.y + next.y) / 2);
                grid.set(between, Cell::Open);
                grid.set(next, Cell::Open);
                stack.push(next);
            }
        }
    }
    grid
}
