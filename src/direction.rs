use std::str::FromStr;

use crate::error::SimError;
use crate::vec::Pos;

/// Which way is "down" for the grains, in screen coordinates (y grows
/// downwards, so `S` is the hourglass standing upright).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GravityDirection {
    #[default]
    Flat,
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

/// Candidate displacements for one grain, tried in order of preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepVectors {
    pub primary: Pos,
    pub left_diagonal: Pos,
    pub right_diagonal: Pos,
}

const fn steps(primary: [i32; 2], left: [i32; 2], right: [i32; 2]) -> StepVectors {
    StepVectors {
        primary: Pos::new(primary[0], primary[1]),
        left_diagonal: Pos::new(left[0], left[1]),
        right_diagonal: Pos::new(right[0], right[1]),
    }
}

// Indexed by discriminant. The left fallback is the next compass point in
// the ring S, SW, W, NW, N, NE, E, SE; the right fallback is the previous one.
const STEP_TABLE: [StepVectors; 9] = [
    steps([0, 0], [0, 0], [0, 0]),     // Flat
    steps([0, -1], [1, -1], [-1, -1]), // N
    steps([0, 1], [-1, 1], [1, 1]),    // S
    steps([1, 0], [1, 1], [1, -1]),    // E
    steps([-1, 0], [-1, -1], [-1, 1]), // W
    steps([1, -1], [1, 0], [0, -1]),   // NE
    steps([-1, -1], [0, -1], [-1, 0]), // NW
    steps([1, 1], [0, 1], [1, 0]),     // SE
    steps([-1, 1], [-1, 0], [0, 1]),   // SW
];

impl GravityDirection {
    pub const ALL: [GravityDirection; 9] = [
        GravityDirection::Flat,
        GravityDirection::N,
        GravityDirection::S,
        GravityDirection::E,
        GravityDirection::W,
        GravityDirection::NE,
        GravityDirection::NW,
        GravityDirection::SE,
        GravityDirection::SW,
    ];

    pub fn steps(self) -> StepVectors {
        STEP_TABLE[self as usize]
    }

    pub fn is_flat(self) -> bool {
        self == GravityDirection::Flat
    }

    /// Direction of a step; only the signs of `dx` and `dy` matter.
    pub fn from_step(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, -1) => GravityDirection::N,
            (0, 1) => GravityDirection::S,
            (1, 0) => GravityDirection::E,
            (-1, 0) => GravityDirection::W,
            (1, -1) => GravityDirection::NE,
            (-1, -1) => GravityDirection::NW,
            (1, 1) => GravityDirection::SE,
            (-1, 1) => GravityDirection::SW,
            _ => GravityDirection::Flat,
        }
    }
}

impl FromStr for GravityDirection {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let direction = match s.to_ascii_lowercase().as_str() {
            "flat" => GravityDirection::Flat,
            "n" => GravityDirection::N,
            "s" => GravityDirection::S,
            "e" => GravityDirection::E,
            "w" => GravityDirection::W,
            "ne" => GravityDirection::NE,
            "nw" => GravityDirection::NW,
            "se" => GravityDirection::SE,
            "sw" => GravityDirection::SW,
            _ => return Err(SimError::InvalidConfig(format!("unknown gravity direction '{}'", s))),
        };
        Ok(direction)
    }
}

/// Pull-based gravity input, sampled at the start of every pass.
pub trait DirectionSource {
    fn sample(&mut self) -> GravityDirection;
}

impl DirectionSource for GravityDirection {
    fn sample(&mut self) -> GravityDirection {
        *self
    }
}

impl<F> DirectionSource for F
where
    F: FnMut() -> GravityDirection,
{
    fn sample(&mut self) -> GravityDirection {
        self()
    }
}

/// Replays a fixed list of directions, one per pass, wrapping around.
pub struct Scripted {
    directions: Vec<GravityDirection>,
    next: usize,
}

impl Scripted {
    pub fn new(directions: Vec<GravityDirection>) -> Self {
        Self {
            directions,
            next: 0,
        }
    }

    pub fn samples_taken(&self) -> usize {
        self.next
    }
}

impl DirectionSource for Scripted {
    fn sample(&mut self) -> GravityDirection {
        if self.directions.is_empty() {
            return GravityDirection::Flat;
        }
        let direction = self.directions[self.next % self.directions.len()];
        self.next += 1;
        direction
    }
}
