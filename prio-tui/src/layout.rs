//! Geometry of the prioritization matrix.
//!
//! Coordinates are in grid units on a square surface of `GRID_SIZE` with the origin in the
//! top-left corner: x grows with effort, y shrinks as benefit grows.
//!
//! Markers that share a score pair are nudged apart by a fixed offset chosen from
//! `index % 3`. The offset ignores other markers and their sizes, so a fourth project on the
//! same scores lands exactly on the first one.

use crate::types::{Score, SCORE_MAX};

pub const GRID_SIZE: f64 = 300.0;
pub const BALL_MIN_SIZE: f64 = 20.0;
pub const BALL_MAX_SIZE: f64 = 40.0;
pub const JITTER_STEP: f64 = 5.0;

const MAX_TOTAL: f64 = (2 * SCORE_MAX) as f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Marker diameter, from `BALL_MIN_SIZE` at 0/0 up to `BALL_MAX_SIZE` at 10/10.
pub fn ball_size(effort: Score, benefit: Score) -> f64 {
    let total = (effort.value() + benefit.value()) as f64;
    BALL_MIN_SIZE + (BALL_MAX_SIZE - BALL_MIN_SIZE) * (total / MAX_TOTAL)
}

/// Marker center for the project rendered at `index` in the list.
pub fn ball_position(effort: Score, benefit: Score, index: usize) -> Point {
    let span = GRID_SIZE - BALL_MAX_SIZE;
    let margin = BALL_MAX_SIZE / 2.0;
    let offset = jitter(index);

    let x = axis_fraction(effort) * span + margin;
    let y = GRID_SIZE - axis_fraction(benefit) * span - margin;

    Point::new(x + offset, y + offset)
}

/// -5, 0 or +5 depending on `index % 3`; applied to both axes.
pub fn jitter(index: usize) -> f64 {
    ((index % 3) as f64 - 1.0) * JITTER_STEP
}

fn axis_fraction(score: Score) -> f64 {
    score.value() as f64 / SCORE_MAX as f64
}
