//! Direction resolver: classifies accelerometer readings into one of the
//! nine gravity directions.
//!
//! A reading beyond the orientation threshold on one axis picks the main
//! direction (the y axis wins when both qualify). A moderate reading on the
//! other axis, inside the tilt band, leans it onto the neighbouring
//! diagonal. Anything else is `Flat` and the grains stay put.

use crate::direction::{DirectionSource, GravityDirection};

/// Raw counts per g at the sensor's +/-2 g range.
pub const COUNTS_PER_G: f32 = 16384.0;
pub const ORIENTATION_THRESHOLD: f32 = 0.7;
pub const TILT_MIN: f32 = 0.15;
pub const TILT_MAX: f32 = 0.75;

/// Acceleration in g along the screen's x and y axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccelSample {
    pub ax: f32,
    pub ay: f32,
}

impl AccelSample {
    pub fn new(ax: f32, ay: f32) -> Self {
        Self { ax, ay }
    }

    pub fn from_raw(x: i16, y: i16) -> Self {
        Self {
            ax: x as f32 / COUNTS_PER_G,
            ay: y as f32 / COUNTS_PER_G,
        }
    }

    /// For sensors mounted a quarter turn from the screen.
    pub fn swapped(self) -> Self {
        Self {
            ax: self.ay,
            ay: self.ax,
        }
    }
}

fn lean(v: f32) -> i32 {
    if v > TILT_MIN && v < TILT_MAX {
        -1
    } else if v < -TILT_MIN && v > -TILT_MAX {
        1
    } else {
        0
    }
}

pub fn resolve(sample: AccelSample) -> GravityDirection {
    let AccelSample { ax, ay } = sample;
    let (dx, dy) = if ay > ORIENTATION_THRESHOLD {
        (lean(ax), -1)
    } else if ay < -ORIENTATION_THRESHOLD {
        (lean(ax), 1)
    } else if ax > ORIENTATION_THRESHOLD {
        (-1, lean(ay))
    } else if ax < -ORIENTATION_THRESHOLD {
        (1, lean(ay))
    } else {
        return GravityDirection::Flat;
    };
    GravityDirection::from_step(dx, dy)
}

/// Direction source backed by a sensor read callback.
pub struct AccelerometerSource<F> {
    read: F,
    swap_axes: bool,
}

impl<F> AccelerometerSource<F>
where
    F: FnMut() -> AccelSample,
{
    pub fn new(read: F) -> Self {
        Self {
            read,
            swap_axes: false,
        }
    }

    pub fn with_swapped_axes(mut self) -> Self {
        self.swap_axes = true;
        self
    }
}

impl<F> DirectionSource for AccelerometerSource<F>
where
    F: FnMut() -> AccelSample,
{
    fn sample(&mut self) -> GravityDirection {
        let reading = (self.read)();
        resolve(if self.swap_axes { reading.swapped() } else { reading })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GravityDirection::*;

    #[test]
    fn main_orientations() {
        assert_eq!(resolve(AccelSample::new(0.0, -1.0)), S);
        assert_eq!(resolve(AccelSample::new(0.0, 1.0)), N);
        assert_eq!(resolve(AccelSample::new(1.0, 0.0)), W);
        assert_eq!(resolve(AccelSample::new(-1.0, 0.0)), E);
    }

    #[test]
    fn lying_flat_or_between_orientations() {
        assert_eq!(resolve(AccelSample::new(0.0, 0.0)), Flat);
        assert_eq!(resolve(AccelSample::new(0.6, -0.6)), Flat);
        assert_eq!(resolve(AccelSample::new(0.7, 0.0)), Flat);
    }

    #[test]
    fn leaning_picks_the_diagonal() {
        assert_eq!(resolve(AccelSample::new(0.3, -0.9)), SW);
        assert_eq!(resolve(AccelSample::new(-0.3, -0.9)), SE);
        assert_eq!(resolve(AccelSample::new(0.3, 0.9)), NW);
        assert_eq!(resolve(AccelSample::new(-0.3, 0.9)), NE);
        assert_eq!(resolve(AccelSample::new(0.9, 0.3)), NW);
        assert_eq!(resolve(AccelSample::new(0.9, -0.3)), SW);
        assert_eq!(resolve(AccelSample::new(-0.9, 0.3)), NE);
        assert_eq!(resolve(AccelSample::new(-0.9, -0.3)), SE);
    }

    #[test]
    fn lean_band_is_exclusive() {
        assert_eq!(resolve(AccelSample::new(0.15, -0.9)), S);
        assert_eq!(resolve(AccelSample::new(0.1, -0.9)), S);
        // Past the band the reading no longer counts as a lean.
        assert_eq!(resolve(AccelSample::new(0.75, -0.8)), S);
    }

    #[test]
    fn y_axis_wins_when_both_qualify() {
        assert_eq!(resolve(AccelSample::new(0.8, -0.8)), S);
    }

    #[test]
    fn raw_counts_scale_to_g() {
        let s = AccelSample::from_raw(-16384, 8192);
        assert_eq!(s, AccelSample::new(-1.0, 0.5));
        assert_eq!(s.swapped(), AccelSample::new(0.5, -1.0));
    }

    #[test]
    fn source_reads_sensor_every_sample() {
        let mut readings = vec![AccelSample::new(0.0, 1.0), AccelSample::new(-1.0, 0.0)].into_iter();
        let mut source = AccelerometerSource::new(move || readings.next().unwrap_or_default());
        assert_eq!(source.sample(), N);
        assert_eq!(source.sample(), E);
        assert_eq!(source.sample(), Flat);

        let mut swapped = AccelerometerSource::new(|| AccelSample::new(0.0, -1.0)).with_swapped_axes();
        assert_eq!(swapped.sample(), E);
    }
}
