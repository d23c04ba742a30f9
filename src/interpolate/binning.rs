use super::grid::Grid;
use crate::field::ScatteredField;

/// Place samples that already lie on a regular lattice into grid cells
///
/// `nx`/`ny` are the distinct x/y counts. Each axis is cut into that many
/// equal-width classes over the data range; a sample's z goes into its
/// cell, later samples overwriting earlier ones. Cells without a sample
/// stay undefined, which is how irregular input shows up.
pub fn bin_samples(field: &ScatteredField) -> Grid {
    let nx = field.distinct_x().len();
    let ny = field.distinct_y().len();
    let domain = field.bounds();

    let mut grid = Grid::empty(nx, ny, domain);
    for s in field.samples() {
        let xi = class_of(s.x, domain.x_range(), nx);
        let yi = class_of(s.y, domain.y_range(), ny);
        grid.set(xi, yi, s.z);
    }

    grid
}

/// 1-based equal-width class, lowest value included in the first class
fn class_of(value: f64, range: (f64, f64), n: usize) -> usize {
    let (min, max) = range;
    if max <= min {
        return 1;
    }
    let class = (n as f64 * (value - min) / (max - min)).floor() as usize;
    class.min(n - 1) + 1
}
