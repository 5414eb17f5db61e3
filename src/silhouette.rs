//! Binary hourglass mask: every cell is either part of the drawn outline or
//! open space. Loaded once per session and never mutated by the simulation.

use std::path::Path;

use image::RgbImage;
use lazy_static::lazy_static;

use crate::error::{SimError, SimResult};
use crate::vec::Pos;

pub const DEFAULT_SCREEN_SIZE: i32 = 240;

/// Half width of the procedural hourglass neck, giving a 3 cell opening.
const NECK_HALF_WIDTH: i32 = 1;
const OUTLINE_THICKNESS: i32 = 2;

lazy_static! {
    pub static ref DEFAULT_SILHOUETTE: Silhouette =
        Silhouette::hourglass(DEFAULT_SCREEN_SIZE, DEFAULT_SCREEN_SIZE);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mask {
    Outline,
    Open,
}

impl Mask {
    pub fn is_outline(&self) -> bool {
        matches!(self, Mask::Outline)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Silhouette {
    width: i32,
    height: i32,
    cells: Vec<Mask>,
}

impl Silhouette {
    pub fn from_fn(width: i32, height: i32, mut mask_at: impl FnMut(i32, i32) -> Mask) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(mask_at(x, y));
            }
        }
        Self { width, height, cells }
    }

    /// Builds a mask from text rows: `#` is outline, anything else is open.
    /// Short rows are padded with open cells.
    pub fn from_ascii(art: &str) -> SimResult<Self> {
        let rows: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        if width == 0 {
            return Err(SimError::InvalidConfig("empty silhouette art".to_string()));
        }
        let grid: Vec<Vec<char>> = rows.iter().map(|row| row.chars().collect()).collect();
        Ok(Self::from_fn(width as i32, grid.len() as i32, |x, y| {
            match grid[y as usize].get(x as usize) {
                Some('#') => Mask::Outline,
                _ => Mask::Open,
            }
        }))
    }

    /// Only pure white pixels are open; anti-aliasing and text count as outline.
    pub fn from_rgb(image: &RgbImage) -> Self {
        Self::from_fn(image.width() as i32, image.height() as i32, |x, y| {
            match image.get_pixel(x as u32, y as u32).0 {
                [255, 255, 255] => Mask::Open,
                _ => Mask::Outline,
            }
        })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let image = image::open(path.as_ref())?.to_rgb8();
        let silhouette = Self::from_rgb(&image);
        tracing::info!(
            path = %path.as_ref().display(),
            width = silhouette.width,
            height = silhouette.height,
            "loaded silhouette"
        );
        Ok(silhouette)
    }

    /// Procedural hourglass centred on the screen: two mirrored funnels
    /// meeting at a narrow neck, wrapped in a closed outline band.
    pub fn hourglass(width: i32, height: i32) -> Self {
        let cx = width / 2;
        let top = height / 12;
        let bottom = height - 1 - height / 12;
        let cy = top + (bottom - top) / 2;
        let half = (cy - top).max(1);
        let widest = (width / 2 - width / 12).max(NECK_HALF_WIDTH);

        let inside = |x: i32, y: i32| {
            if y < top || y > bottom {
                return false;
            }
            let reach = NECK_HALF_WIDTH + (widest - NECK_HALF_WIDTH) * (y - cy).abs() / half;
            (x - cx).abs() <= reach
        };

        let band = -OUTLINE_THICKNESS..=OUTLINE_THICKNESS;
        Self::from_fn(width, height, |x, y| {
            if inside(x, y) {
                Mask::Open
            } else if band
                .clone()
                .any(|dy| band.clone().any(|dx| inside(x + dx, y + dy)))
            {
                Mask::Outline
            } else {
                Mask::Open
            }
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Cells off the screen read as outline.
    pub fn get(&self, pos: Pos) -> Mask {
        if self.contains(pos) {
            self.cells[(pos.x + self.width * pos.y) as usize]
        } else {
            Mask::Outline
        }
    }

    pub fn is_outline(&self, x: i32, y: i32) -> bool {
        self.get(Pos::new(x, y)).is_outline()
    }
}
