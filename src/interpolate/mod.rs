//! Scattered samples to regular grid
//!
//! Three strategies are available:
//! - `idw`: exact inverse-distance weighting, tolerates irregular input
//! - `smooth`: Gaussian kernel smoothing with a data-driven bandwidth
//! - binned: samples already on a lattice are dropped into their cells

pub mod binning;
pub mod grid;
pub mod idw;
pub mod kernel;

pub use grid::Grid;
pub use kernel::Bandwidth;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{MapError, MapResult, Stage};
use crate::field::ScatteredField;

/// Interpolation strategy
///
/// Parsed from text: `"idw"` and `"smooth"` are recognised, anything else
/// selects raw binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Idw,
    Smooth,
    Binned,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Idw => "idw",
            Method::Smooth => "smooth",
            Method::Binned => "none",
        }
    }
}

impl FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "idw" => Method::Idw,
            "smooth" => Method::Smooth,
            _ => Method::Binned,
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Method {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(text.parse().unwrap_or_default())
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Fits a grid to a scattered field
#[derive(Debug, Clone)]
pub struct Interpolator {
    method: Method,
    grid_size: usize,
    idw_power: f64,
}

impl Interpolator {
    pub fn new(method: Method, grid_size: usize) -> Self {
        Self {
            method,
            grid_size,
            idw_power: 2.0,
        }
    }

    /// Override the IDW distance exponent (default 2)
    pub fn with_power(mut self, power: f64) -> Self {
        self.idw_power = power;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Estimate the field over its own x/y range
    ///
    /// # Returns
    /// * `grid_size x grid_size` grid for idw and smooth
    /// * `nx x ny` grid (distinct x/y counts) for binning
    pub fn fit(&self, field: &ScatteredField) -> MapResult<Grid> {
        if self.grid_size == 0 && self.method != Method::Binned {
            return Err(MapError::invalid_input(
                Stage::Interpolation,
                "grid size must be at least 1",
            ));
        }

        let n = self.grid_size;
        let samples = field.samples();

        let grid = match self.method {
            Method::Idw => {
                let power = self.idw_power;
                Grid::from_fn(n, n, field.bounds(), |x, y| {
                    idw::idw_estimate(samples, x, y, power)
                })
            }
            Method::Smooth => {
                let bw = Bandwidth::scott(samples);
                debug!(hx = bw.hx, hy = bw.hy, "smoothing bandwidth");
                Grid::from_fn(n, n, field.bounds(), |x, y| {
                    kernel::smooth_estimate(samples, x, y, bw)
                })
            }
            Method::Binned => binning::bin_samples(field),
        };

        debug!(
            method = %self.method,
            nx = grid.nx(),
            ny = grid.ny(),
            defined = grid.defined_cells(),
            "fitted grid"
        );

        Ok(grid)
    }
}
