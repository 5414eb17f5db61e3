//! Relaxation engine: moves every grain at most one cell per pass toward
//! the current gravity direction.
//!
//! Passes are sequential. Grains are visited in their stored scan order and
//! each move is applied to the occupancy grid before the next grain is
//! looked at, so later grains see the cells earlier ones just vacated.

use std::thread;
use std::time::{Duration, Instant};

use crate::direction::{DirectionSource, GravityDirection};
use crate::display::{redraw, DisplaySink};
use crate::grid::OccupancyGrid;
use crate::simulation::Simulation;
use crate::vec::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Drain with the hourglass standing upright, whatever the tilt, and
    /// stop at the first pass that moves nothing.
    Timed,
    /// Keep going until the caller's control callback says stop.
    Continuous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Redraw after every `redraw_every` passes (0 is treated as 1).
    pub redraw_every: u32,
    /// Sleep between passes of a timed run.
    pub pass_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            redraw_every: 1,
            pass_delay: Duration::ZERO,
        }
    }
}

/// Gravity of a timed run. The direction source is not read.
pub const TIMED_DIRECTION: GravityDirection = GravityDirection::S;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// 1-based pass number within the run.
    pub pass: u64,
    pub direction: GravityDirection,
    pub moves: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub passes: u64,
    pub total_moves: u64,
    pub elapsed: Duration,
}

/// Runs one pass over `grains` and returns how many of them moved.
pub fn relax_pass(grid: &mut OccupancyGrid, grains: &mut [Pos], direction: GravityDirection) -> usize {
    if direction.is_flat() {
        return 0;
    }
    let steps = direction.steps();
    let left_first = [steps.primary, steps.left_diagonal, steps.right_diagonal];
    let right_first = [steps.primary, steps.right_diagonal, steps.left_diagonal];

    let mut moves = 0;
    let mut check_left_first = true;
    for grain in grains.iter_mut() {
        let candidates = if check_left_first { &left_first } else { &right_first };
        if let Some(target) = candidates
            .iter()
            .map(|&step| *grain + step)
            .find(|&target| grid.is_empty(target))
        {
            if grid.move_grain(*grain, target) {
                *grain = target;
                moves += 1;
            } else {
                debug_assert!(false, "grain record {:?} has no grain marker", grain);
            }
        }
        check_left_first = !check_left_first;
    }
    moves
}

pub struct RelaxationEngine {
    config: EngineConfig,
}

impl RelaxationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_pass_delay(&mut self, delay: Duration) {
        self.config.pass_delay = delay;
    }

    /// Runs passes until the mode's stop condition is met. `source` is
    /// sampled once per pass in continuous mode only. `control` is called
    /// after every pass and is the only place the run yields; returning false
    /// cancels it, in either mode.
    pub fn run(
        &self,
        sim: &mut Simulation,
        mode: RunMode,
        source: &mut dyn DirectionSource,
        sink: &mut dyn DisplaySink,
        mut control: impl FnMut(&PassReport) -> bool,
    ) -> RunStats {
        let redraw_every = u64::from(self.config.redraw_every.max(1));
        let started = Instant::now();
        let mut stats = RunStats::default();
        let mut drawn: bool;

        loop {
            let direction = match mode {
                RunMode::Timed => TIMED_DIRECTION,
                RunMode::Continuous => source.sample(),
            };
            let moves = sim.relax(direction);
            stats.passes += 1;
            stats.total_moves += moves as u64;

            drawn = stats.passes % redraw_every == 0;
            if drawn {
                redraw(sim.grid(), sink);
            }

            let report = PassReport {
                pass: stats.passes,
                direction,
                moves,
            };
            tracing::debug!(?report, "pass done");

            if mode == RunMode::Timed && moves == 0 {
                break;
            }
            if !control(&report) {
                break;
            }
            if mode == RunMode::Timed && !self.config.pass_delay.is_zero() {
                thread::sleep(self.config.pass_delay);
            }
        }

        if !drawn {
            redraw(sim.grid(), sink);
        }
        stats.elapsed = started.elapsed();
        tracing::info!(
            ?mode,
            passes = stats.passes,
            total_moves = stats.total_moves,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "run finished"
        );
        stats
    }

    pub fn run_timed(&self, sim: &mut Simulation, sink: &mut dyn DisplaySink) -> RunStats {
        let mut upright = TIMED_DIRECTION;
        self.run(sim, RunMode::Timed, &mut upright, sink, |_| true)
    }

    pub fn run_continuous(
        &self,
        sim: &mut Simulation,
        source: &mut dyn DirectionSource,
        sink: &mut dyn DisplaySink,
        keep_running: impl FnMut(&PassReport) -> bool,
    ) -> RunStats {
        self.run(sim, RunMode::Continuous, source, sink, keep_running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::FieldState;
    use crate::silhouette::Silhouette;

    fn open_grid(art: &str, grains: &[[i32; 2]]) -> (OccupancyGrid, Vec<Pos>) {
        let s = Silhouette::from_ascii(art).unwrap();
        let mut grid = OccupancyGrid::from_silhouette(&s);
        let grains: Vec<Pos> = grains.iter().map(|&g| Pos::from(g)).collect();
        for &g in &grains {
            assert!(grid.place_grain(g));
        }
        (grid, grains)
    }

    #[test]
    fn flat_pass_moves_nothing() {
        let (mut grid, mut grains) = open_grid("...\n...\n...", &[[1, 0]]);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::Flat), 0);
        assert_eq!(grains, vec![Pos::new(1, 0)]);
    }

    #[test]
    fn primary_step_wins_when_free() {
        let (mut grid, mut grains) = open_grid("...\n...\n...", &[[1, 0]]);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::S), 1);
        assert_eq!(grains, vec![Pos::new(1, 1)]);
        assert_eq!(grid.get(Pos::new(1, 0)), FieldState::Empty);
        assert_eq!(grid.get(Pos::new(1, 1)), FieldState::Grain);
    }

    #[test]
    fn blocked_grains_alternate_diagonal_preference() {
        // Both grains rest on outline; the first tries left first, the second right first.
        let (mut grid, mut grains) = open_grid(".....\n.....\n.#.#.\n.....", &[[1, 1], [3, 1]]);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::S), 2);
        assert_eq!(grains, vec![Pos::new(0, 2), Pos::new(4, 2)]);
    }

    #[test]
    fn later_grains_see_earlier_moves() {
        // Column of two: the lower one falls first and the upper one follows it.
        let (mut grid, mut grains) = open_grid("...\n...\n...\n...", &[[1, 1], [1, 0]]);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::S), 2);
        assert_eq!(grains, vec![Pos::new(1, 2), Pos::new(1, 1)]);

        // In the other order the upper grain is blocked and slides diagonally.
        let (mut grid, mut grains) = open_grid("...\n...\n...\n...", &[[1, 0], [1, 1]]);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::S), 2);
        assert_eq!(grains, vec![Pos::new(0, 1), Pos::new(1, 2)]);
    }

    #[test]
    fn fully_blocked_grain_stays() {
        let (mut grid, mut grains) = open_grid("...\n.#.\n###", &[[1, 0], [0, 1], [2, 1]]);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::S), 0);
        assert_eq!(grid.count(FieldState::Grain), 3);
    }

    #[test]
    fn grains_cannot_leave_the_screen() {
        let (mut grid, mut grains) = open_grid("..", &[[0, 0]]);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::S), 0);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::E), 1);
        assert_eq!(relax_pass(&mut grid, &mut grains, GravityDirection::E), 0);
        assert_eq!(grains, vec![Pos::new(1, 0)]);
    }
}
