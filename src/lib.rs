//! Perfect-maze generation and a single-player session that walks it.
//!
//! [`generate`] carves the maze, [`GameSession`] owns the current grid and
//! the player/goal positions and reports wins through [`MoveOutcome`].
//! Drawing and input live in the `maze` binary.

pub mod config;
pub mod level;
pub mod maze;
pub mod session;

pub use config::Settings;
pub use level::{LevelConfig, SizeOverride, SizePreset, LEVELS};
pub use maze::{generate, Cell, Dir, Grid, Pos, MAX_SIDE, MIN_SIDE};
pub use session::{GameSession, MoveOutcome, Phase};
