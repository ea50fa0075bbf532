use log::warn;

use crate::level::SizeOverride;

const DEFAULT_RENDER_FPS: u64 = 60;

/// Runtime knobs, read from `MAZE_LEVEL`, `MAZE_SIZE` and `MAZE_FPS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub start_level: u32,
    pub size: Option<SizeOverride>,
    pub render_fps: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_level: 1,
            size: None,
            render_fps: DEFAULT_RENDER_FPS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Bad values are logged and replaced by the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let start_level = lookup("MAZE_LEVEL")
            .and_then(|v| parse_or_warn("MAZE_LEVEL", &v, |v| v.parse::<u32>().ok()))
            .filter(|v| *v > 0)
            .unwrap_or(defaults.start_level);
        let size = lookup("MAZE_SIZE").and_then(|v| match v.parse::<SizeOverride>() {
            Ok(size) => Some(size),
            Err(err) => {
                warn!("ignoring MAZE_SIZE: {err}");
                None
            }
        });
        let render_fps = lookup("MAZE_FPS")
            .and_then(|v| parse_or_warn("MAZE_FPS", &v, |v| v.parse::<u64>().ok()))
            .filter(|v| *v > 0)
            .unwrap_or(defaults.render_fps);
        Self {
            start_level,
            size,
            render_fps,
        }
    }
}

fn parse_or_warn<T>(key: &str, value: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(value.trim());
    if parsed.is_none() {
        warn!("ignoring {key}={value:?}");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::SizePreset;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_env() {
        assert_eq!(settings(&[]), Settings::default());
        assert_eq!(Settings::default().start_level, 1);
        assert_eq!(Settings::default().size, None);
    }

    #[test]
    fn reads_all_values() {
        let s = settings(&[("MAZE_LEVEL", "3"), ("MAZE_SIZE", "large"), ("MAZE_FPS", "30")]);
        assert_eq!(s.start_level, 3);
        assert_eq!(s.size, Some(SizeOverride::Preset(SizePreset::Large)));
        assert_eq!(s.render_fps, 30);
    }

    #[test]
    fn custom_size() {
        let s = settings(&[("MAZE_SIZE", "40x30")]);
        assert_eq!(s.size, Some(SizeOverride::Custom { columns: 40, rows: 30 }));
    }

    #[test]
    fn bad_values_fall_back() {
        let s = settings(&[("MAZE_LEVEL", "0"), ("MAZE_SIZE", "giant"), ("MAZE_FPS", "fast")]);
        assert_eq!(s, Settings::default());
        assert_eq!(settings(&[("MAZE_LEVEL", "-2")]).start_level, 1);
    }

    #[test]
    fn oversized_maze_falls_back_to_level_size() {
        let s = settings(&[("MAZE_SIZE", "9999999999x9999999999")]);
        assert_eq!(s.size, None);
        assert_eq!(settings(&[("MAZE_SIZE", "100001x100001")]).size, None);
    }
}
