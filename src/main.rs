use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::info;
use maze_game::{Dir, GameSession, MoveOutcome, Phase, Settings};
use rand::Rng;

mod input;
mod render;

use input::{key_action, next_size, Action, Hold};
use render::Renderer;

fn main() -> io::Result<()> {
    env_logger::Builder::from_default_env().init();
    let settings = Settings::from_env();
    info!(
        "starting at level {} ({})",
        settings.start_level,
        settings
            .size
            .map_or_else(|| "level size".to_string(), |s| s.to_string())
    );

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, settings: Settings) -> io::Result<()> {
    let mut session = GameSession::new(rand::thread_rng(), settings.start_level, settings.size);
    let mut renderer = Renderer::new();
    let mut hold = Hold::new();
    let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
                    let Some(action) = key_action(key) else {
                        continue;
                    };
                    match action {
                        Action::Quit => return Ok(()),
                        Action::Move(dir) => {
                            if hold.press(dir, Instant::now()) {
                                step(&mut session, &mut hold, dir);
                            }
                        }
                        Action::NewMaze => {
                            session.restart_level();
                            hold.clear();
                        }
                        Action::NextLevel if session.phase() == Phase::Won => {
                            session.advance_level();
                            hold.clear();
                        }
                        Action::Replay if session.phase() == Phase::Won => {
                            session.restart_level();
                            hold.clear();
                        }
                        Action::CycleSize => {
                            session.set_size(next_size(session.size()));
                            hold.clear();
                        }
                        Action::NextLevel | Action::Replay => {}
                    }
                }
                Event::Resize(_, _) => renderer.invalidate(),
                _ => {}
            }
        }

        let step_delay = Duration::from_millis(session.config().step_delay_ms);
        if let Some(dir) = hold.due(Instant::now(), step_delay) {
            step(&mut session, &mut hold, dir);
        }
        renderer.render(stdout, &session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn step<R: Rng>(session: &mut GameSession<R>, hold: &mut Hold, dir: Dir) {
    if let MoveOutcome::Won { level } = session.move_player(dir) {
        info!("won level {level}");
        hold.clear();
    }
}
