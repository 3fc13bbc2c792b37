use crate::grid::{NEIGHBORS8, wrap_index};

/// B3/S23: birth on exactly 3 live neighbours, survival on 2 or 3.
#[inline]
pub fn rule(alive: bool, neighbors: u8) -> bool {
    (alive && neighbors == 2) || neighbors == 3
}

/// Live cells among the 8 toroidal neighbours of (x, y).
#[inline]
pub fn live_neighbors(current: &[bool], x: i32, y: i32, width: i32, height: i32) -> u8 {
    NEIGHBORS8
        .iter()
        .map(|&(dx, dy)| current[wrap_index(x + dx, y + dy, width, height) as usize] as u8)
        .sum()
}

/// Next state of cell (x, y). Reads only `current`.
#[inline]
pub fn step(current: &[bool], x: i32, y: i32, width: i32, height: i32) -> bool {
    let alive = current[wrap_index(x, y, width, height) as usize];
    rule(alive, live_neighbors(current, x, y, width, height))
}

/// `step` addressed by linear index, the form every scheduler policy uses.
#[inline]
pub fn step_index(current: &[bool], index: usize, width: i32, height: i32) -> bool {
    let x = (index % width as usize) as i32;
    let y = (index / width as usize) as i32;
    step(current, x, y, width, height)
}
