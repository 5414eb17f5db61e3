use crate::display::{render_region, DisplaySink, Region};
use crate::error::{Scan, SimError, SimResult};
use crate::geometry::InteriorBounds;
use crate::grid::{FieldState, OccupancyGrid};
use crate::order::reorder_row;
use crate::vec::Pos;

/// Open span of row `y` around `centre_x`: one cell in from the first
/// outline found walking outwards each way. `None` when the centre cell is
/// itself outline.
pub fn row_bounds(grid: &OccupancyGrid, centre_x: i32, y: i32) -> SimResult<Option<(i32, i32)>> {
    if y < 0 || y >= grid.height() {
        return Err(SimError::MalformedSilhouette {
            scan: Scan::SeedRow,
            line: y,
        });
    }
    let is_outline = |x: i32| grid.get(Pos::new(x, y)) == FieldState::Outline;

    let left = (0..=centre_x)
        .rev()
        .find(|&x| is_outline(x))
        .ok_or(SimError::MalformedSilhouette {
            scan: Scan::LeftWall,
            line: y,
        })?;
    let right = (centre_x..grid.width())
        .find(|&x| is_outline(x))
        .ok_or(SimError::MalformedSilhouette {
            scan: Scan::RightWall,
            line: y,
        })?;

    let (left, right) = (left + 1, right - 1);
    Ok((left <= right).then_some((left, right)))
}

/// Seeds every open cell of row `y` and puts the new grains in scan order.
/// Returns how many grains the row received.
pub fn fill_row(grid: &mut OccupancyGrid, grains: &mut Vec<Pos>, centre_x: i32, y: i32) -> SimResult<usize> {
    let Some((left, right)) = row_bounds(grid, centre_x, y)? else {
        return Ok(0);
    };

    let row_start = grains.len();
    for x in left..=right {
        let pos = Pos::new(x, y);
        if grid.place_grain(pos) {
            grains.push(pos);
        }
    }
    let seeded = grains.len() - row_start;
    if seeded > 0 {
        let row_end = grains.len() - 1;
        reorder_row(grains, row_start, row_end);
    }
    Ok(seeded)
}

/// Fills `rows` rows from the hourglass centre upwards, redrawing each row
/// as soon as it is seeded.
pub fn fill_hourglass(
    grid: &mut OccupancyGrid,
    grains: &mut Vec<Pos>,
    bounds: &InteriorBounds,
    rows: usize,
    sink: &mut dyn DisplaySink,
) -> SimResult<usize> {
    let rows = i32::try_from(rows)
        .ok()
        .filter(|&rows| rows <= grid.height())
        .ok_or_else(|| {
            SimError::InvalidConfig(format!("cannot seed {} rows on a {} row screen", rows, grid.height()))
        })?;

    let mut total = 0;
    for y in (0..rows).map(|i| bounds.centre_y - i) {
        let seeded = fill_row(grid, grains, bounds.centre_x, y)?;
        tracing::debug!(row = y, seeded, "seeded row");

        let region = Region::row(y, grid.width());
        sink.blit(&render_region(grid, region), region);
        total += seeded;
    }
    Ok(total)
}
