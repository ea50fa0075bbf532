use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use maze_game::{Dir, SizeOverride, SizePreset};

/// Terminals only report presses, so a direction counts as held for this
/// long after its last key event.
const INPUT_HOLD_MS: u64 = 160;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Move(Dir),
    NewMaze,
    NextLevel,
    Replay,
    CycleSize,
    Quit,
}

pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(Dir::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(Dir::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(Dir::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(Dir::Right)),
        KeyCode::Char('n') => Some(Action::NewMaze),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::NextLevel),
        KeyCode::Char('r') => Some(Action::Replay),
        KeyCode::Char('s') => Some(Action::CycleSize),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Level-based size, then each preset from small to extra-large, then back.
pub fn next_size(current: Option<SizeOverride>) -> Option<SizeOverride> {
    match current {
        None => Some(SizeOverride::Preset(SizePreset::Small)),
        Some(SizeOverride::Preset(preset)) => SizePreset::ALL
            .iter()
            .position(|p| *p == preset)
            .and_then(|idx| SizePreset::ALL.get(idx + 1))
            .map(|p| SizeOverride::Preset(*p)),
        Some(SizeOverride::Custom { .. }) => None,
    }
}

/// Tracks held directions and paces repeated steps.
pub struct Hold {
    last_seen: [Option<Instant>; 4],
    last_pressed: Option<Dir>,
    last_step: Option<Instant>,
}

impl Hold {
    pub fn new() -> Self {
        Self {
            last_seen: [None; 4],
            last_pressed: None,
            last_step: None,
        }
    }

    /// Records a key event for `dir`. Returns true when `dir` was not
    /// already held, in which case the caller steps right away and the
    /// repeat timer restarts from `now`.
    pub fn press(&mut self, dir: Dir, now: Instant) -> bool {
        let fresh = self.active(now) != Some(dir);
        self.last_seen[idx_for_dir(dir)] = Some(now);
        self.last_pressed = Some(dir);
        if fresh {
            self.last_step = Some(now);
        }
        fresh
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// The held direction, preferring the most recently pressed one.
    pub fn active(&self, now: Instant) -> Option<Dir> {
        let window = Duration::from_millis(INPUT_HOLD_MS);
        if let Some(dir) = self.last_pressed {
            if let Some(t) = self.last_seen[idx_for_dir(dir)] {
                if now.duration_since(t) <= window {
                    return Some(dir);
                }
            }
        }
        let mut best: Option<(Dir, Instant)> = None;
        for (idx, dir) in Dir::ALL.iter().enumerate() {
            if let Some(t) = self.last_seen[idx] {
                if now.duration_since(t) <= window {
                    match best {
                        None => best = Some((*dir, t)),
                        Some((_, bt)) if t > bt => best = Some((*dir, t)),
                        _ => {}
                    }
                }
            }
        }
        best.map(|(dir, _)| dir)
    }

    /// The direction to step now, if one is held and `step_delay` has passed
    /// since the previous step.
    pub fn due(&mut self, now: Instant, step_delay: Duration) -> Option<Dir> {
        let dir = self.active(now)?;
        if let Some(t) = self.last_step {
            if now.duration_since(t) < step_delay {
                return None;
            }
        }
        self.last_step = Some(now);
        Some(dir)
    }
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn maps_keys() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(key_action(key(KeyCode::Char('k'))), Some(Action::Move(Dir::Up)));
        assert_eq!(key_action(key(KeyCode::Right)), Some(Action::Move(Dir::Right)));
        assert_eq!(key_action(key(KeyCode::Enter)), Some(Action::NextLevel));
        assert_eq!(key_action(key(KeyCode::Char('x'))), None);
        assert_eq!(
            key_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn size_cycle_wraps_to_level_size() {
        let mut size = None;
        let mut seen = Vec::new();
        for _ in 0..5 {
            size = next_size(size);
            seen.push(size);
        }
        assert_eq!(
            seen,
            vec![
                Some(SizeOverride::Preset(SizePreset::Small)),
                Some(SizeOverride::Preset(SizePreset::Medium)),
                Some(SizeOverride::Preset(SizePreset::Large)),
                Some(SizeOverride::Preset(SizePreset::ExtraLarge)),
                None,
            ]
        );
        assert_eq!(next_size(Some(SizeOverride::Custom { columns: 31, rows: 21 })), None);
    }

    #[test]
    fn first_press_steps_then_repeats_at_delay() {
        let t0 = Instant::now();
        let mut hold = Hold::new();
        assert!(hold.press(Dir::Right, t0));
        assert_eq!(hold.due(t0 + ms(50), ms(110)), None);

        // Key repeat keeps the direction alive without an extra step.
        assert!(!hold.press(Dir::Right, t0 + ms(100)));
        assert_eq!(hold.due(t0 + ms(110), ms(110)), Some(Dir::Right));
        assert_eq!(hold.due(t0 + ms(150), ms(110)), None);
    }

    #[test]
    fn hold_expires_without_key_events() {
        let t0 = Instant::now();
        let mut hold = Hold::new();
        hold.press(Dir::Up, t0);
        assert_eq!(hold.active(t0 + ms(INPUT_HOLD_MS)), Some(Dir::Up));
        assert_eq!(hold.active(t0 + ms(INPUT_HOLD_MS + 1)), None);
        assert_eq!(hold.due(t0 + ms(500), ms(110)), None);
    }

    #[test]
    fn latest_direction_wins() {
        let t0 = Instant::now();
        let mut hold = Hold::new();
        hold.press(Dir::Up, t0);
        assert!(hold.press(Dir::Left, t0 + ms(20)));
        assert_eq!(hold.active(t0 + ms(30)), Some(Dir::Left));
        hold.clear();
        assert_eq!(hold.active(t0 + ms(30)), None);
    }
}
