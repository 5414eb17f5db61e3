//! Mode state machine around the simulation: what the four buttons of the
//! device do and which kind of run each mode triggers.

use std::time::Duration;

use crate::config::Config;
use crate::direction::DirectionSource;
use crate::display::DisplaySink;
use crate::engine::{PassReport, RelaxationEngine, RunMode, RunStats};
use crate::error::SimResult;
use crate::silhouette::Silhouette;
use crate::simulation::Simulation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Refill the hourglass, then wait.
    Menu,
    Idle,
    /// Drain once until nothing moves.
    Timing,
    /// Follow the tilt until cancelled.
    Continuous,
    /// Measure a timed run and derive the pass delay for the configured timer.
    Calibrate,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    X,
    Y,
}

pub struct Session {
    sim: Simulation,
    engine: RelaxationEngine,
    seed_rows: usize,
    timer: Duration,
    mode: Mode,
    last_run: Option<RunStats>,
}

impl Session {
    pub fn new(silhouette: Silhouette, config: &Config) -> Self {
        Self {
            sim: Simulation::new(silhouette),
            engine: RelaxationEngine::new(config.engine_config()),
            seed_rows: config.seed_rows,
            timer: config.timer(),
            mode: Mode::Menu,
            last_run: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn engine(&self) -> &RelaxationEngine {
        &self.engine
    }

    pub fn last_run(&self) -> Option<&RunStats> {
        self.last_run.as_ref()
    }

    /// While a run is going or has just finished, any button goes back to
    /// the menu. Otherwise A times, B calibrates, X runs continuously and Y
    /// refills.
    pub fn press(&mut self, button: Button) {
        self.mode = match (self.mode, button) {
            (Mode::Timing | Mode::Continuous | Mode::Finished, _) => Mode::Menu,
            (_, Button::A) => Mode::Timing,
            (_, Button::B) => Mode::Calibrate,
            (_, Button::X) => Mode::Continuous,
            (_, Button::Y) => Mode::Menu,
        };
        tracing::debug!(?button, mode = ?self.mode, "button pressed");
    }

    /// Performs the work of the current mode and moves to the next one.
    /// `control` is polled between passes of a run; returning false ends it.
    pub fn step(
        &mut self,
        source: &mut dyn DirectionSource,
        sink: &mut dyn DisplaySink,
        control: impl FnMut(&PassReport) -> bool,
    ) -> SimResult<Mode> {
        match self.mode {
            Mode::Menu => {
                if let Err(e) = self.sim.reset(self.seed_rows, sink) {
                    tracing::error!(error = %e, "cannot fill hourglass");
                    self.mode = Mode::Idle;
                    return Err(e);
                }
                self.mode = Mode::Idle;
            }
            Mode::Timing => {
                let stats = self.engine.run(&mut self.sim, RunMode::Timed, source, sink, control);
                tracing::info!(
                    seconds = stats.elapsed.as_secs_f64(),
                    passes = stats.passes,
                    "timer finished"
                );
                self.last_run = Some(stats);
                self.mode = Mode::Finished;
            }
            Mode::Continuous => {
                let stats = self.engine.run(&mut self.sim, RunMode::Continuous, source, sink, control);
                self.last_run = Some(stats);
                self.mode = Mode::Menu;
            }
            Mode::Calibrate => {
                self.calibrate(self.timer, sink)?;
                self.mode = Mode::Menu;
            }
            Mode::Idle | Mode::Finished => {}
        }
        Ok(self.mode)
    }

    /// Refills the hourglass, drains it with no pacing and sets the pass
    /// delay so a timed run lasts about `target`. A target shorter than the
    /// unpaced run gives no delay.
    pub fn calibrate(&mut self, target: Duration, sink: &mut dyn DisplaySink) -> SimResult<Duration> {
        self.sim.reset(self.seed_rows, sink)?;
        self.engine.set_pass_delay(Duration::ZERO);
        let stats = self.engine.run_timed(&mut self.sim, sink);
        self.last_run = Some(stats);

        let delay = match target.checked_sub(stats.elapsed) {
            Some(spare) if stats.passes > 0 && !spare.is_zero() => spare.div_f64(stats.passes as f64),
            _ => {
                tracing::warn!(
                    target_secs = target.as_secs_f64(),
                    measured_secs = stats.elapsed.as_secs_f64(),
                    "timer target is shorter than an unpaced run"
                );
                Duration::ZERO
            }
        };
        self.engine.set_pass_delay(delay);
        tracing::info!(delay_ms = delay.as_secs_f64() * 1000.0, passes = stats.passes, "calibrated");
        Ok(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::GravityDirection;
    use crate::display::NullSink;

    fn small_session() -> Session {
        let config = Config {
            seed_rows: 6,
            ..Config::default()
        };
        Session::new(Silhouette::hourglass(40, 40), &config)
    }

    #[test]
    fn buttons_follow_the_menu() {
        let mut session = small_session();
        assert_eq!(session.mode(), Mode::Menu);
        session.press(Button::A);
        assert_eq!(session.mode(), Mode::Timing);
        session.press(Button::X);
        assert_eq!(session.mode(), Mode::Menu);
        session.press(Button::X);
        assert_eq!(session.mode(), Mode::Continuous);
        session.press(Button::Y);
        assert_eq!(session.mode(), Mode::Menu);
        session.press(Button::B);
        assert_eq!(session.mode(), Mode::Calibrate);
    }

    #[test]
    fn menu_fills_then_timing_drains() {
        let mut session = small_session();
        let mut down = GravityDirection::S;

        assert_eq!(session.step(&mut down, &mut NullSink, |_| true).unwrap(), Mode::Idle);
        let seeded = session.simulation().grain_count();
        assert!(seeded > 0);

        session.press(Button::A);
        assert_eq!(session.step(&mut down, &mut NullSink, |_| true).unwrap(), Mode::Finished);
        let stats = session.last_run().unwrap();
        assert!(stats.total_moves > 0);
        assert_eq!(session.simulation().grain_count(), seeded);

        // Finished waits for a button, which goes back to the menu.
        assert_eq!(session.step(&mut down, &mut NullSink, |_| true).unwrap(), Mode::Finished);
        session.press(Button::A);
        assert_eq!(session.mode(), Mode::Menu);
    }

    #[test]
    fn timer_drains_whatever_the_tilt() {
        let mut session = small_session();
        let mut flat = GravityDirection::Flat;
        session.step(&mut flat, &mut NullSink, |_| true).unwrap();

        session.press(Button::A);
        assert_eq!(session.step(&mut flat, &mut NullSink, |_| true).unwrap(), Mode::Finished);
        let centre_y = session.simulation().bounds().unwrap().centre_y;
        assert!(session.simulation().grains().iter().all(|g| g.y > centre_y));
    }

    #[test]
    fn continuous_runs_until_cancelled() {
        let mut session = small_session();
        let mut down = GravityDirection::S;
        session.step(&mut down, &mut NullSink, |_| true).unwrap();

        session.press(Button::X);
        let mode = session
            .step(&mut down, &mut NullSink, |report| report.pass < 500)
            .unwrap();
        assert_eq!(mode, Mode::Menu);
        assert_eq!(session.last_run().unwrap().passes, 500);
    }

    #[test]
    fn calibration_spreads_spare_time_over_passes() {
        let mut session = small_session();
        let target = Duration::from_secs(5);
        let delay = session.calibrate(target, &mut NullSink).unwrap();
        let passes = session.last_run().unwrap().passes as u32;
        assert!(delay > Duration::ZERO);
        assert!(delay * passes <= target);
        assert_eq!(session.engine().config().pass_delay, delay);

        let none = session.calibrate(Duration::ZERO, &mut NullSink).unwrap();
        assert_eq!(none, Duration::ZERO);
    }
}
