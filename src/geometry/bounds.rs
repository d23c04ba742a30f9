use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Axis-aligned rectangle used for data ranges, grid domains and viewports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Create bounds from a set of points
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut bounds = Self {
            min_x: f64::MAX,
            max_x: f64::MIN,
            min_y: f64::MAX,
            max_y: f64::MIN,
        };
        bounds.expand(points);

        Some(bounds)
    }

    /// Expand bounds to include another set of points
    pub fn expand(&mut self, points: &[(f64, f64)]) {
        for &(x, y) in points {
            self.min_x = self.min_x.min(x);
            self.max_x = self.max_x.max(x);
            self.min_y = self.min_y.min(y);
            self.max_y = self.max_y.max(y);
        }
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.min_x, self.max_x)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.min_y, self.max_y)
    }

    /// Inclusive containment test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl FromStr for Bounds {
    type Err = String;

    /// Parse `min_x,max_x,min_y,max_y`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|e| format!("invalid bound {:?}: {}", part.trim(), e))
            })
            .collect::<Result<_, _>>()?;

        let &[min_x, max_x, min_y, max_y] = values.as_slice() else {
            return Err(format!(
                "expected 4 comma-separated values (min_x,max_x,min_y,max_y), got {}",
                values.len()
            ));
        };

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(format!("bounds must be finite, got {}", bad));
        }

        if min_x > max_x || min_y > max_y {
            return Err(format!("bounds are inverted: {}", s));
        }

        Ok(Self::new(min_x, max_x, min_y, max_y))
    }
}
