use log::{debug, info};
use rand::Rng;

use crate::level::{LevelConfig, SizeOverride};
use crate::maze::{generate, Dir, Grid, Pos};

/// Result of a single [`GameSession::move_player`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Wall, edge of the grid, or the level is already won. Nothing changed.
    Rejected,
    Moved(Pos),
    /// The player just stepped onto the goal of `level`.
    Won { level: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Won,
}

/// One player walking through one maze at a time.
///
/// Every level change builds a fresh grid and puts the player back on
/// `(1, 1)` with the goal on the opposite corner.
pub struct GameSession<R> {
    rng: R,
    level: u32,
    size: Option<SizeOverride>,
    config: LevelConfig,
    grid: Grid,
    player: Pos,
    goal: Pos,
    phase: Phase,
    moves: u32,
}

fn build_level(rng: &mut impl Rng, level: u32, size: Option<SizeOverride>) -> (LevelConfig, Grid) {
    let config = LevelConfig::for_level(level).with_size(size);
    let grid = generate(rng, config.columns, config.rows);
    debug!(
        "level {level}: generated {}x{} maze, {} open cells, step delay {}ms",
        config.columns,
        config.rows,
        grid.open_count(),
        config.step_delay_ms
    );
    (config, grid)
}

fn goal_for(grid: &Grid) -> Pos {
    Pos::new(grid.width() - 2, grid.height() - 2)
}

impl<R: Rng> GameSession<R> {
    pub fn new(mut rng: R, level: u32, size: Option<SizeOverride>) -> Self {
        let (config, grid) = build_level(&mut rng, level, size);
        let goal = goal_for(&grid);
        Self {
            rng,
            level,
            size,
            config,
            grid,
            player: Pos::new(1, 1),
            goal,
            phase: Phase::Ready,
            moves: 0,
        }
    }

    /// Replaces the maze with a fresh one for `level`. An explicit `size`
    /// wins over the level's dimensions; the step delay always follows the
    /// level.
    pub fn start_level(&mut self, level: u32, size: Option<SizeOverride>) {
        let (config, grid) = build_level(&mut self.rng, level, size);
        self.level = level;
        self.size = size;
        self.config = config;
        self.goal = goal_for(&grid);
        self.grid = grid;
        self.player = Pos::new(1, 1);
        self.phase = Phase::Ready;
        self.moves = 0;
    }

    /// Next level; the last representable level repeats.
    pub fn advance_level(&mut self) {
        self.start_level(self.level.saturating_add(1), self.size);
    }

    /// New maze, same level and size.
    pub fn restart_level(&mut self) {
        self.start_level(self.level, self.size);
    }

    /// Switches size and regenerates the current level.
    pub fn set_size(&mut self, size: Option<SizeOverride>) {
        self.start_level(self.level, size);
    }

    pub fn move_player(&mut self, dir: Dir) -> MoveOutcome {
        if self.phase == Phase::Won {
            return MoveOutcome::Rejected;
        }
        let Some(next) = self.grid.step(self.player, dir) else {
            return MoveOutcome::Rejected;
        };
        self.player = next;
        self.moves += 1;
        // Only checked after an accepted step, so standing on the goal
        // cannot report the same win twice.
        if next == self.goal {
            self.phase = Phase::Won;
            info!("level {} complete in {} moves", self.level, self.moves);
            return MoveOutcome::Won { level: self.level };
        }
        MoveOutcome::Moved(next)
    }

    /// Moves by a raw `(dx, dy)` vector. Anything but a cardinal unit step
    /// is rejected.
    pub fn move_by(&mut self, dx: isize, dy: isize) -> MoveOutcome {
        match Dir::from_delta(dx, dy) {
            Some(dir) => self.move_player(dir),
            None => MoveOutcome::Rejected,
        }
    }

    #[cfg(test)]
    fn load_grid(&mut self, grid: Grid) {
        self.goal = goal_for(&grid);
        self.grid = grid;
        self.player = Pos::new(1, 1);
        self.phase = Phase::Ready;
        self.moves = 0;
    }

    #[cfg(test)]
    fn place_player(&mut self, pos: Pos) {
        assert!(self.grid.is_open(pos));
        self.player = pos;
    }
}

impl<R> GameSession<R> {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> Pos {
        self.player
    }

    pub fn goal(&self) -> Pos {
        self.goal
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn config(&self) -> LevelConfig {
        self.config
    }

    pub fn size(&self) -> Option<SizeOverride> {
        self.size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Accepted moves on the current level.
    pub fn moves(&self) -> u32 {
        self.moves
    }
}
