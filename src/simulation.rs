use std::collections::HashSet;

use crate::direction::GravityDirection;
use crate::display::{redraw, DisplaySink};
use crate::engine::relax_pass;
use crate::error::{SimError, SimResult};
use crate::geometry::InteriorBounds;
use crate::grid::{FieldState, OccupancyGrid};
use crate::seeder::fill_hourglass;
use crate::silhouette::Silhouette;
use crate::vec::Pos;

/// Everything one hourglass session owns: the mask, its derived interior,
/// the occupancy grid and the grains in scan order.
pub struct Simulation {
    silhouette: Silhouette,
    bounds: Option<InteriorBounds>,
    grid: OccupancyGrid,
    grains: Vec<Pos>,
}

impl Simulation {
    pub fn new(silhouette: Silhouette) -> Self {
        let grid = OccupancyGrid::from_silhouette(&silhouette);
        Self {
            silhouette,
            bounds: None,
            grid,
            grains: Vec::new(),
        }
    }

    /// Starts from hand-placed grains instead of a seeded hourglass. The
    /// grains keep the given order as their scan order.
    pub fn with_grains(silhouette: Silhouette, grains: impl IntoIterator<Item = Pos>) -> SimResult<Self> {
        let mut sim = Self::new(silhouette);
        for pos in grains {
            if !sim.grid.place_grain(pos) {
                return Err(SimError::BlockedCell { x: pos.x, y: pos.y });
            }
            sim.grains.push(pos);
        }
        Ok(sim)
    }

    /// Drops every grain and restores the bare silhouette.
    pub fn clear(&mut self) {
        self.grains.clear();
        self.grid = OccupancyGrid::from_silhouette(&self.silhouette);
    }

    /// Re-analyses the silhouette and refills the top chamber with
    /// `seed_rows` rows of grains. On error the simulation is left empty.
    pub fn reset(&mut self, seed_rows: usize, sink: &mut dyn DisplaySink) -> SimResult<InteriorBounds> {
        self.clear();
        self.bounds = None;
        redraw(&self.grid, sink);

        let bounds = InteriorBounds::analyze(&self.silhouette)?;
        if let Err(e) = fill_hourglass(&mut self.grid, &mut self.grains, &bounds, seed_rows, sink) {
            self.clear();
            return Err(e);
        }
        self.check_invariants()?;
        self.bounds = Some(bounds);

        tracing::info!(
            grains = self.grains.len(),
            rows = seed_rows,
            centre_x = bounds.centre_x,
            centre_y = bounds.centre_y,
            "hourglass filled"
        );
        Ok(bounds)
    }

    /// One relaxation pass; returns the number of grains that moved.
    pub fn relax(&mut self, direction: GravityDirection) -> usize {
        relax_pass(&mut self.grid, &mut self.grains, direction)
    }

    /// Checks that grain records and grain cells correspond one to one.
    pub fn check_invariants(&self) -> SimResult<()> {
        let marked = self.grid.count(FieldState::Grain);
        if marked != self.grains.len() {
            return Err(SimError::Desync {
                marked,
                grains: self.grains.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.grains.len());
        for &g in &self.grains {
            if !seen.insert(g) {
                return Err(SimError::DoubleOccupancy { x: g.x, y: g.y });
            }
            if self.grid.get(g) != FieldState::Grain {
                return Err(SimError::Desync {
                    marked,
                    grains: self.grains.len(),
                });
            }
        }
        Ok(())
    }

    pub fn silhouette(&self) -> &Silhouette {
        &self.silhouette
    }

    pub fn bounds(&self) -> Option<&InteriorBounds> {
        self.bounds.as_ref()
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn grains(&self) -> &[Pos] {
        &self.grains
    }

    pub fn grain_count(&self) -> usize {
        self.grains.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullSink;

    #[test]
    fn reset_fills_and_refills_from_scratch() {
        let mut sim = Simulation::new(Silhouette::hourglass(240, 240));
        let bounds = sim.reset(32, &mut NullSink).unwrap();
        assert_eq!(bounds.centre_y, 119);
        assert_eq!(sim.grain_count(), 1088);
        sim.check_invariants().unwrap();

        sim.relax(GravityDirection::S);
        let again = sim.reset(32, &mut NullSink).unwrap();
        assert_eq!(again, bounds);
        assert_eq!(sim.grain_count(), 1088);
        assert_eq!(sim.grid().count(FieldState::Grain), 1088);
    }

    #[test]
    fn failed_reset_leaves_no_grains() {
        let s = Silhouette::from_ascii(
            "
            .....
            .###.
            .#.#.
            .###.
            ",
        )
        .unwrap();
        let mut sim = Simulation::new(s);
        assert!(sim.reset(5, &mut NullSink).is_err());
        assert_eq!(sim.grain_count(), 0);
        assert!(sim.bounds().is_none());
        sim.check_invariants().unwrap();
    }

    #[test]
    fn hand_placed_grains_must_be_free() {
        let s = Silhouette::from_ascii("#..").unwrap();
        assert!(Simulation::with_grains(s.clone(), [Pos::new(1, 0), Pos::new(2, 0)]).is_ok());
        assert!(matches!(
            Simulation::with_grains(s.clone(), [Pos::new(0, 0)]),
            Err(SimError::BlockedCell { x: 0, y: 0 })
        ));
        assert!(Simulation::with_grains(s, [Pos::new(1, 0), Pos::new(1, 0)]).is_err());
    }
}
