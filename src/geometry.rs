//! Locates the usable interior of the hourglass by walking the silhouette.
//!
//! The walks assume a single outline band in every direction (one
//! outline-to-open transition per scan). A mask with several bands is
//! resolved by the first match.

use crate::error::{Scan, SimError, SimResult};
use crate::silhouette::Silhouette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteriorBounds {
    pub top_y: i32,
    pub bottom_y: i32,
    pub centre_x: i32,
    pub centre_y: i32,
}

fn find(mut range: impl Iterator<Item = i32>, scan: Scan, line: i32, hit: impl Fn(i32) -> bool) -> SimResult<i32> {
    range
        .find(|&i| hit(i))
        .ok_or(SimError::MalformedSilhouette { scan, line })
}

impl InteriorBounds {
    pub fn analyze(silhouette: &Silhouette) -> SimResult<Self> {
        let width = silhouette.width();
        let height = silhouette.height();
        let mid_x = width / 2;

        let outline_at = |y: i32| silhouette.is_outline(mid_x, y);

        let top_edge = find(0..height, Scan::TopOutline, mid_x, outline_at)?;
        let top_y = find(top_edge..height, Scan::TopInterior, mid_x, |y| !outline_at(y))?;

        let bottom_edge = find((top_y..height).rev(), Scan::BottomOutline, mid_x, outline_at)?;
        let bottom_y = find((top_y..=bottom_edge).rev(), Scan::BottomInterior, mid_x, |y| {
            !outline_at(y)
        })?;

        let centre_y = top_y + (bottom_y - top_y) / 2;

        let wall_at = |x: i32| silhouette.is_outline(x, top_y);
        let left_x = find((0..=mid_x).rev(), Scan::LeftWall, top_y, wall_at)?;
        let right_x = find(mid_x..width, Scan::RightWall, top_y, wall_at)?;
        let centre_x = left_x + (right_x - left_x) / 2;

        let bounds = Self {
            top_y,
            bottom_y,
            centre_x,
            centre_y,
        };
        tracing::debug!(?bounds, left_x, right_x, "analysed silhouette");
        Ok(bounds)
    }
}
