use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use maze_game::{Cell, GameSession, Phase, Pos};
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const PLAYER_GLYPHS: [&str; 6] = ["●", "■", "◆", "▲", "★", "⬢"];

/// Colours for one level, all derived from a hue that rotates per level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub wall: Color,
    pub path: Color,
    pub player: Color,
    pub goal: Color,
}

impl Theme {
    pub fn for_level(level: u32) -> Self {
        let base = ((level as u64 * 47) % 360) as f32;
        Self {
            text: hsl(base, 0.28, 0.94),
            wall: hsl(base, 0.22, 0.18),
            path: hsl(base, 0.30, 0.08),
            player: hsl((base + 40.0) % 360.0, 0.90, 0.55),
            goal: hsl((base + 320.0) % 360.0, 0.80, 0.55),
        }
    }
}

fn hsl(h: f32, s: f32, l: f32) -> Color {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::Rgb {
        r: byte(r),
        g: byte(g),
        b: byte(b),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player(usize),
    Goal,
    Wall,
    Path,
}

#[derive(Clone, Copy, PartialEq)]
struct Tile {
    glyph: Glyph,
    fg: Color,
    bg: Color,
}

const BLANK: Tile = Tile {
    glyph: Glyph::Path,
    fg: Color::Reset,
    bg: Color::Reset,
};

/// Redraws only the cells, HUD and banner that changed since the last frame.
pub struct Renderer {
    last: Vec<Tile>,
    last_hud: String,
    last_banner: String,
    dims: (usize, usize),
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_hud: String::new(),
            last_banner: String::new(),
            dims: (0, 0),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn render<R>(&mut self, stdout: &mut Stdout, session: &GameSession<R>) -> io::Result<()> {
        let grid = session.grid();
        let (width, height) = (grid.width(), grid.height());
        if self.dims != (width, height) {
            self.dims = (width, height);
            self.last = vec![BLANK; width * height];
            self.needs_full = true;
        }

        let needed_h = height + 3;
        let needed_w = width * CELL_W;
        let (term_w, term_h) = terminal::size()?;
        if (term_w as usize) < needed_w || (term_h as usize) < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(MoveTo(0, 0))?;
            let msg = format!(
                "Terminal too small for a {width}x{height} maze. Need at least {needed_w}x{needed_h} (cols x rows). Current: {term_w}x{term_h}. Press s to change size, q to quit."
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w as u16) / 2;
        let origin_y = (term_h - needed_h as u16) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
        }

        let theme = Theme::for_level(session.level());
        let size = match session.size() {
            Some(size) => size.to_string(),
            None => "level".to_string(),
        };
        let hud = format!(
            "Level {}  {}x{} ({})  Moves: {}",
            session.level(),
            width,
            height,
            size,
            session.moves()
        );
        if self.needs_full || hud != self.last_hud {
            self.print_line(stdout, self.origin_y - 1, &hud, theme.text)?;
            self.last_hud = hud;
        }

        for y in 0..height {
            for x in 0..width {
                let tile = tile_for(session, Pos::new(x, y), &theme);
                let idx = y * width + x;
                if self.needs_full || tile != self.last[idx] {
                    self.last[idx] = tile;
                    self.draw_tile(stdout, x, y, tile)?;
                }
            }
        }

        let banner = match session.phase() {
            Phase::Won => format!(
                "Level {} complete in {} moves!  Enter: next level  r: play again",
                session.level(),
                session.moves()
            ),
            Phase::Ready => "arrows/hjkl move  n new maze  s size  q quit".to_string(),
        };
        if self.needs_full || banner != self.last_banner {
            let color = match session.phase() {
                Phase::Won => theme.goal,
                Phase::Ready => theme.text,
            };
            self.print_line(stdout, self.origin_y + height as u16, &banner, color)?;
            self.last_banner = banner;
        }
        self.needs_full = false;

        stdout.flush()?;
        Ok(())
    }

    fn print_line(&self, stdout: &mut Stdout, y: u16, text: &str, color: Color) -> io::Result<()> {
        stdout.queue(MoveTo(0, y))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(MoveTo(self.origin_x, y))?;
        stdout.queue(SetForegroundColor(color))?;
        stdout.queue(Print(text))?;
        stdout.queue(ResetColor)?;
        Ok(())
    }

    fn draw_tile(&self, stdout: &mut Stdout, x: usize, y: usize, tile: Tile) -> io::Result<()> {
        let text = glyph_text(tile.glyph);
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        stdout.queue(MoveTo(x_pos, y_pos))?;
        stdout.queue(SetBackgroundColor(tile.bg))?;
        stdout.queue(SetForegroundColor(tile.fg))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                stdout.queue(Print(' '))?;
            }
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

fn glyph_text(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Player(shape) => PLAYER_GLYPHS[shape % PLAYER_GLYPHS.len()],
        Glyph::Goal => "▓▓",
        Glyph::Wall => "██",
        Glyph::Path => "  ",
    }
}

fn tile_for<R>(session: &GameSession<R>, pos: Pos, theme: &Theme) -> Tile {
    if pos == session.player() {
        let shape = (session.level() as usize).saturating_sub(1) % PLAYER_GLYPHS.len();
        return Tile {
            glyph: Glyph::Player(shape),
            fg: theme.player,
            bg: theme.path,
        };
    }
    if pos == session.goal() {
        return Tile {
            glyph: Glyph::Goal,
            fg: theme.goal,
            bg: theme.path,
        };
    }
    match session.grid().get(pos) {
        Some(Cell::Open) | None => Tile {
            glyph: Glyph::Path,
            fg: theme.path,
            bg: theme.path,
        },
        Some(Cell::Wall) => Tile {
            glyph: Glyph::Wall,
            fg: theme.wall,
            bg: theme.path,
        },
    }
}
