use crate::geometry::Bounds;

/// Regular grid of estimates over a rectangular domain
///
/// Cells are addressed as `[xi][yi]` with 1-based indices at the public
/// API. Cell `(i, j)` holds the estimate at the i-th of `nx` evenly spaced
/// x positions across the domain and the j-th of `ny` y positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    domain: Bounds,
    /// x-major storage: `values[(xi - 1) * ny + (yi - 1)]`
    values: Vec<Option<f64>>,
}

impl Grid {
    /// Grid with every cell undefined
    pub fn empty(nx: usize, ny: usize, domain: Bounds) -> Self {
        Self {
            nx,
            ny,
            domain,
            values: vec![None; nx * ny],
        }
    }

    /// Build a grid by evaluating `estimate` at every node
    pub fn from_fn(
        nx: usize,
        ny: usize,
        domain: Bounds,
        mut estimate: impl FnMut(f64, f64) -> Option<f64>,
    ) -> Self {
        let xs = axis_positions(domain.min_x, domain.max_x, nx);
        let ys = axis_positions(domain.min_y, domain.max_y, ny);

        let mut values = Vec::with_capacity(nx * ny);
        for &x in &xs {
            for &y in &ys {
                values.push(estimate(x, y));
            }
        }

        Self {
            nx,
            ny,
            domain,
            values,
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    pub fn domain(&self) -> &Bounds {
        &self.domain
    }

    /// Direct cell lookup with 1-based indices, no further interpolation
    pub fn sample(&self, xi: usize, yi: usize) -> Option<f64> {
        if xi == 0 || yi == 0 || xi > self.nx || yi > self.ny {
            return None;
        }
        self.values[(xi - 1) * self.ny + (yi - 1)]
    }

    pub(crate) fn set(&mut self, xi: usize, yi: usize, value: f64) {
        debug_assert!(xi >= 1 && yi >= 1 && xi <= self.nx && yi <= self.ny);
        self.values[(xi - 1) * self.ny + (yi - 1)] = Some(value);
    }

    /// Look up the cell covering a coordinate, clamping to the grid edge
    pub fn value_at(&self, x: f64, y: f64) -> Option<f64> {
        let xi = cell_index(x, self.domain.x_range(), self.nx)?;
        let yi = cell_index(y, self.domain.y_range(), self.ny)?;
        self.sample(
            xi.clamp(1, self.nx as i64) as usize,
            yi.clamp(1, self.ny as i64) as usize,
        )
    }

    /// Min and max over defined cells
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let mut defined = self.values.iter().flatten();
        let first = *defined.next()?;
        Some(defined.fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
    }

    pub fn defined_cells(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Evenly spaced positions spanning `[min, max]`
pub fn axis_positions(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n <= 1 || max <= min {
        return vec![min; n];
    }
    let step = (max - min) / (n - 1) as f64;
    (0..n).map(|i| min + i as f64 * step).collect()
}

/// Map a coordinate to a 1-based cell index: `ceil(n * (v - min) / (max - min))`
///
/// The result is not clamped. A value exactly at `min` belongs to cell 1
/// rather than the 0 the bare formula gives, so a point on the lower data
/// edge keeps its value when out-of-range indices are excluded. A
/// zero-width range maps everything to cell 1. Returns None for non-finite
/// input.
pub fn cell_index(value: f64, range: (f64, f64), n: usize) -> Option<i64> {
    let (min, max) = range;
    if !value.is_finite() {
        return None;
    }
    if max <= min || value == min {
        return Some(1);
    }
    Some((n as f64 * (value - min) / (max - min)).ceil() as i64)
}
