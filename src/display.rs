//! Presentation side of the simulation. The occupancy grid is never drawn
//! into directly: regions of it are rendered to RGB pixels and pushed to a
//! `DisplaySink`, which gives nothing back.

use crate::grid::{FieldState, OccupancyGrid};
use crate::vec::Pos;

pub type Rgb = [u8; 3];

pub const OUTLINE_COLOR: Rgb = [0, 0, 0];
pub const OPEN_COLOR: Rgb = [255, 255, 255];
pub const GRAIN_COLOR: Rgb = [0, 255, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn full(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    pub fn row(y: i32, width: i32) -> Self {
        Self {
            x: 0,
            y,
            width,
            height: 1,
        }
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) * self.height.max(0)) as usize
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Pos> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| Pos::new(x, y)))
    }
}

pub trait DisplaySink {
    /// `pixels` holds `region.area()` colours in row-major order.
    fn blit(&mut self, pixels: &[Rgb], region: Region);
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn blit(&mut self, pixels: &[Rgb], region: Region) {
        (**self).blit(pixels, region)
    }
}

pub struct NullSink;

impl DisplaySink for NullSink {
    fn blit(&mut self, _pixels: &[Rgb], _region: Region) {}
}

fn set_color(state: FieldState) -> Rgb {
    match state {
        FieldState::Grain => GRAIN_COLOR,
        FieldState::Outline => OUTLINE_COLOR,
        FieldState::Empty => OPEN_COLOR,
    }
}

pub fn render_region(grid: &OccupancyGrid, region: Region) -> Vec<Rgb> {
    region.cells().map(|pos| set_color(grid.get(pos))).collect()
}

/// Renders the whole grid and pushes it as one blit.
pub fn redraw(grid: &OccupancyGrid, sink: &mut dyn DisplaySink) {
    let region = Region::full(grid.width(), grid.height());
    sink.blit(&render_region(grid, region), region);
}

/// Text rendering for terminals: `#` outline, `o` grain, blank when open.
/// Rows with nothing but open space are skipped.
pub fn render_ascii(grid: &OccupancyGrid) -> String {
    let mut out = String::new();
    for y in 0..grid.height() {
        let row = grid.row(y);
        if row.iter().all(FieldState::is_empty) {
            continue;
        }
        let line: String = row
            .iter()
            .map(|f| match f {
                FieldState::Grain => 'o',
                FieldState::Outline => '#',
                FieldState::Empty => ' ',
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// In-memory screen: keeps the last pushed pixels for every cell.
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<Rgb>,
    blits: usize,
}

impl FrameBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            pixels: vec![OPEN_COLOR; (width.max(0) * height.max(0)) as usize],
            blits: 0,
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(x + self.width * y) as usize])
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn blit_count(&self) -> usize {
        self.blits
    }
}

impl DisplaySink for FrameBuffer {
    fn blit(&mut self, pixels: &[Rgb], region: Region) {
        self.blits += 1;
        for (pos, &color) in region.cells().zip(pixels) {
            if pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height {
                self.pixels[(pos.x + self.width * pos.y) as usize] = color;
            }
        }
    }
}
