#![allow(dead_code)]

use gridpath::{Grid, Position, Session};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

/// Parse a grid drawing
/// Format:
/// - s: start
/// - d: destination
/// - ■: barricade
/// - □: free cell
pub fn parse_grid(layout: &str) -> Grid {
    let lines: Vec<&str> = layout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let rows = lines.len() as i32;
    let cols = lines[0].chars().count() as i32;

    let mut grid = Grid::new(cols, rows).unwrap();
    let mut start = None;
    let mut dest = None;

    for (y, line) in lines.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            let (x, y) = (x as i32, y as i32);
            match ch {
                's' => start = Some((x, y)),
                'd' => dest = Some((x, y)),
                '■' => grid.set_barricade(x, y).unwrap(),
                _ => {}
            }
        }
    }

    if let Some((x, y)) = start {
        grid.set_start(x, y).unwrap();
    }
    if let Some((x, y)) = dest {
        grid.set_destination(x, y).unwrap();
    }
    grid
}

pub fn session_from(layout: &str) -> Session {
    Session::new(parse_grid(layout), Duration::ZERO)
}

/// Cells reachable from `from` through walkable cells, 4-connected
pub fn flood_fill(grid: &Grid, from: Position) -> HashSet<Position> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(from);
    queue.push_back(from);

    while let Some(pos) = queue.pop_front() {
        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = Position::new(pos.x + dx, pos.y + dy);
            if grid.is_walkable(next.x, next.y).unwrap_or(false) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Visualize a path on a grid
pub fn visualize_path(grid: &Grid, path: &[Position]) -> String {
    let mut result = String::new();
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let pos = Position::new(x, y);
            let symbol = if Some(pos) == grid.start() {
                'S'
            } else if Some(pos) == grid.destination() {
                'D'
            } else if path.contains(&pos) {
                '*'
            } else if !grid.is_walkable(x, y).unwrap() {
                '█'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}

/// Every step of the path moves to a 4-adjacent walkable cell
pub fn assert_contiguous(grid: &Grid, path: &[Position]) {
    for pair in path.windows(2) {
        assert_eq!(
            pair[0].manhattan(&pair[1]),
            1,
            "path jumps from {:?} to {:?}",
            pair[0],
            pair[1]
        );
        assert!(grid.is_walkable(pair[1].x, pair[1].y).unwrap());
    }
}
