use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::maze::{MAX_SIDE, MIN_SIDE};

/// Grid size and hold-to-move repeat delay for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    pub columns: usize,
    pub rows: usize,
    pub step_delay_ms: u64,
}

const fn level(columns: usize, rows: usize, step_delay_ms: u64) -> LevelConfig {
    LevelConfig {
        columns,
        rows,
        step_delay_ms,
    }
}

/// Level progression. Levels past the end reuse the last entry.
pub const LEVELS: [LevelConfig; 8] = [
    level(15, 11, 110),
    level(21, 15, 95),
    level(27, 19, 85),
    level(33, 23, 75),
    level(41, 31, 70),
    level(51, 35, 65),
    level(61, 45, 60),
    level(71, 51, 55),
];

impl LevelConfig {
    /// Config for a 1-based level number. Panics on level 0.
    pub fn for_level(level: u32) -> Self {
        assert!(level >= 1, "levels are numbered from 1");
        let idx = (level as usize - 1).min(LEVELS.len() - 1);
        LEVELS[idx]
    }

    /// Applies an explicit size on top of the level's config. Only the
    /// dimensions change; the step delay stays tied to the level.
    pub fn with_size(self, size: Option<SizeOverride>) -> Self {
        match size {
            None => self,
            Some(size) => {
                let (columns, rows) = size.dimensions();
                Self {
                    columns,
                    rows,
                    ..self
                }
            }
        }
    }
}

/// Rounds an even side down to the next odd value, then clamps to
/// [`MIN_SIDE`]..=[`MAX_SIDE`]. Both bounds are odd.
pub fn coerce_side(n: usize) -> usize {
    let odd = if n % 2 == 0 { n.saturating_sub(1) } else { n };
    odd.clamp(MIN_SIDE, MAX_SIDE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizePreset {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl SizePreset {
    pub const ALL: [SizePreset; 4] = [
        SizePreset::Small,
        SizePreset::Medium,
        SizePreset::Large,
        SizePreset::ExtraLarge,
    ];

    pub fn dimensions(self) -> (usize, usize) {
        match self {
            SizePreset::Small => (21, 15),
            SizePreset::Medium => (41, 29),
            SizePreset::Large => (71, 51),
            SizePreset::ExtraLarge => (199, 199),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SizePreset::Small => "small",
            SizePreset::Medium => "medium",
            SizePreset::Large => "large",
            SizePreset::ExtraLarge => "extra-large",
        }
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseSizeError {
    #[error("unknown size preset {0:?}")]
    UnknownPreset(String),
    #[error("invalid size {0:?}, expected WIDTHxHEIGHT")]
    BadDimensions(String),
    #[error("size {columns}x{rows} exceeds the {max}x{max} maximum")]
    TooLarge {
        columns: usize,
        rows: usize,
        max: usize,
    },
}

impl FromStr for SizePreset {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(SizePreset::Small),
            "medium" | "m" => Ok(SizePreset::Medium),
            "large" | "l" => Ok(SizePreset::Large),
            "extra-large" | "extra_large" | "xl" => Ok(SizePreset::ExtraLarge),
            _ => Err(ParseSizeError::UnknownPreset(s.to_string())),
        }
    }
}

/// A size chosen independently of the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeOverride {
    Preset(SizePreset),
    Custom { columns: usize, rows: usize },
}

impl SizeOverride {
    /// Grid dimensions, already odd and within [`MIN_SIDE`]..=[`MAX_SIDE`].
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            SizeOverride::Preset(preset) => preset.dimensions(),
            SizeOverride::Custom { columns, rows } => (coerce_side(columns), coerce_side(rows)),
        }
    }
}

impl fmt::Display for SizeOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeOverride::Preset(preset) => write!(f, "{preset}"),
            SizeOverride::Custom { columns, rows } => write!(f, "{columns}x{rows}"),
        }
    }
}

/// Accepts a preset name or `WIDTHxHEIGHT`.
impl FromStr for SizeOverride {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
            return trimmed.parse().map(SizeOverride::Preset);
        }
        let (w, h) = trimmed
            .split_once(|c| c == 'x' || c == 'X')
            .ok_or_else(|| ParseSizeError::BadDimensions(s.to_string()))?;
        match (w.trim().parse(), h.trim().parse()) {
            (Ok(columns), Ok(rows)) if columns > MAX_SIDE || rows > MAX_SIDE => {
                Err(ParseSizeError::TooLarge {
                    columns,
                    rows,
                    max: MAX_SIDE,
                })
            }
            (Ok(columns), Ok(rows)) => Ok(SizeOverride::Custom { columns, rows }),
            _ => Err(ParseSizeError::BadDimensions(s.to_string())),
        }
    }
}
