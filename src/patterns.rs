//! Small known patterns, as (x, y) offsets of live cells.

/// Glider heading +x +y. After 4 generations it reappears shifted by (1, 1).
pub const GLIDER: [(i32, i32); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];

/// 2x2 still life.
pub const BLOCK: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

/// Period-2 oscillator, horizontal phase.
pub const BLINKER: [(i32, i32); 3] = [(0, 0), (1, 0), (2, 0)];

/// Row-major cell vector of a `width` x `height` torus with `pattern`
/// stamped at (ox, oy). Offsets wrap.
pub fn stamp(width: i32, height: i32, pattern: &[(i32, i32)], ox: i32, oy: i32) -> Vec<bool> {
    let mut cells = vec![false; width.max(0) as usize * height.max(0) as usize];
    if cells.is_empty() {
        return cells;
    }
    for &(dx, dy) in pattern {
        cells[crate::grid::wrap_index(ox + dx, oy + dy, width, height) as usize] = true;
    }
    cells
}
