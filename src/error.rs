use std::fmt;

use thiserror::Error;

/// Boundary scan that failed to find the cell state it was walking towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    TopOutline,
    TopInterior,
    BottomOutline,
    BottomInterior,
    LeftWall,
    RightWall,
    SeedRow,
}

impl fmt::Display for Scan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scan::TopOutline => "top outline",
            Scan::TopInterior => "top interior",
            Scan::BottomOutline => "bottom outline",
            Scan::BottomInterior => "bottom interior",
            Scan::LeftWall => "left wall",
            Scan::RightWall => "right wall",
            Scan::SeedRow => "seed row",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Malformed silhouette: {scan} scan found nothing (line {line})")]
    MalformedSilhouette { scan: Scan, line: i32 },

    #[error("Occupancy desync: {marked} cells marked as grain, {grains} grain records")]
    Desync { marked: usize, grains: usize },

    #[error("Two grains share cell ({x}, {y})")]
    DoubleOccupancy { x: i32, y: i32 },

    #[error("Cannot place a grain at ({x}, {y}): cell is not empty")]
    BlockedCell { x: i32, y: i32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type SimResult<T> = Result<T, SimError>;
