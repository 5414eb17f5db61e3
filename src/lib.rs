//! Falling sand inside an hourglass silhouette.
//!
//! The silhouette is analysed for its interior, the top chamber is seeded
//! with grains row by row, and relaxation passes move every grain one cell
//! toward whichever way gravity currently points.

pub mod config;
pub mod direction;
pub mod display;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod order;
pub mod seeder;
pub mod session;
pub mod silhouette;
pub mod simulation;
pub mod tilt;
pub mod vec;

pub use config::Config;
pub use direction::{DirectionSource, GravityDirection, Scripted, StepVectors};
pub use display::{DisplaySink, FrameBuffer, NullSink, Region, Rgb};
pub use engine::{EngineConfig, PassReport, RelaxationEngine, RunMode, RunStats};
pub use error::{Scan, SimError, SimResult};
pub use geometry::InteriorBounds;
pub use grid::{FieldState, OccupancyGrid};
pub use session::{Button, Mode, Session};
pub use silhouette::{Mask, Silhouette};
pub use simulation::Simulation;
pub use tilt::{AccelSample, AccelerometerSource};
pub use vec::{Pos, Vec2};
