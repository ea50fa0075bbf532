use maze_game::{
    generate, Dir, GameSession, Grid, MoveOutcome, Phase, Pos, SizeOverride, LEVELS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SIZES: [(usize, usize); 5] = [(11, 11), (15, 11), (21, 15), (41, 31), (71, 51)];

fn mazes() -> impl Iterator<Item = Grid> {
    SIZES.into_iter().flat_map(|(w, h)| {
        (0..20u64).map(move |seed| generate(&mut StdRng::seed_from_u64(seed), w, h))
    })
}

/// Undirected edges between horizontally or vertically adjacent open cells.
fn open_edges(grid: &Grid) -> usize {
    grid.open_cells()
        .map(|pos| {
            [Dir::Right, Dir::Down]
                .into_iter()
                .filter(|dir| grid.step(pos, *dir).is_some())
                .count()
        })
        .sum()
}

#[test]
fn every_open_cell_is_reachable_from_start() {
    for grid in mazes() {
        let seen = grid.reachable_from(Pos::new(1, 1));
        let reached = seen.iter().filter(|s| **s).count();
        assert_eq!(reached, grid.open_count(), "disconnected maze:\n{grid}");
    }
}

#[test]
fn open_cells_form_a_tree() {
    for grid in mazes() {
        let rooms = ((grid.width() - 1) / 2) * ((grid.height() - 1) / 2);
        // The start room plus two cells per carving step.
        assert_eq!(grid.open_count(), 1 + 2 * (rooms - 1));
        assert_eq!(open_edges(&grid), grid.open_count() - 1, "maze has a loop:\n{grid}");
    }
}

#[test]
fn border_is_always_wall() {
    for grid in mazes() {
        let (w, h) = (grid.width(), grid.height());
        for x in 0..w {
            assert!(!grid.is_open(Pos::new(x, 0)));
            assert!(!grid.is_open(Pos::new(x, h - 1)));
        }
        for y in 0..h {
            assert!(!grid.is_open(Pos::new(0, y)));
            assert!(!grid.is_open(Pos::new(w - 1, y)));
        }
    }
}

#[test]
fn start_and_goal_are_open() {
    for grid in mazes() {
        assert!(grid.is_open(Pos::new(1, 1)));
        assert!(grid.is_open(Pos::new(grid.width() - 2, grid.height() - 2)));
    }
}

#[test]
fn even_width_is_coerced_before_generation() {
    let s = GameSession::new(
        StdRng::seed_from_u64(5),
        1,
        Some(SizeOverride::Custom { columns: 40, rows: 11 }),
    );
    assert_eq!(s.grid().width(), 39);
    assert_eq!(s.grid().height(), 11);
    assert_eq!(s.goal(), Pos::new(37, 9));
}

#[test]
fn rejected_moves_never_win() {
    for seed in 0..20 {
        let mut s = GameSession::new(StdRng::seed_from_u64(seed), 1, None);
        for dir in [Dir::Up, Dir::Left] {
            assert_eq!(s.move_player(dir), MoveOutcome::Rejected);
        }
        assert_eq!(s.player(), Pos::new(1, 1));
        assert_eq!(s.phase(), Phase::Ready);
    }
}

#[test]
fn walking_to_goal_wins_exactly_once_per_level() {
    let mut s = GameSession::new(StdRng::seed_from_u64(77), 1, None);
    for level in 1..=LEVELS.len() as u32 + 1 {
        assert_eq!(s.level(), level);
        let path = s.grid().path(s.player(), s.goal()).expect("goal reachable");
        let mut wins = Vec::new();
        for pair in path.windows(2) {
            let dx = pair[1].x as isize - pair[0].x as isize;
            let dy = pair[1].y as isize - pair[0].y as isize;
            match s.move_by(dx, dy) {
                MoveOutcome::Won { level } => wins.push(level),
                MoveOutcome::Moved(pos) => assert_eq!(pos, pair[1]),
                MoveOutcome::Rejected => panic!("path step rejected at {}", pair[0]),
            }
        }
        assert_eq!(wins, vec![level]);
        assert_eq!(s.player(), s.goal());
        for dir in Dir::ALL {
            assert_eq!(s.move_player(dir), MoveOutcome::Rejected);
        }
        s.advance_level();
        assert_eq!(s.player(), Pos::new(1, 1));
        assert_eq!(s.phase(), Phase::Ready);
    }
}
