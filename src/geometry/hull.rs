use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::kernels::RobustKernel;
use geo::{Area, ConvexHull, Coord, Kernel, MultiPoint, Orientation, Point, Polygon, coord};

use crate::error::{MapError, MapResult, Stage};
use crate::field::ScatteredField;

/// Position of a query point relative to the hull
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Outside,
    Inside,
    OnBoundary,
}

impl Membership {
    /// Boundary points count as inside
    pub fn is_inside(self) -> bool {
        !matches!(self, Membership::Outside)
    }
}

/// Convex hull of the sample locations
#[derive(Debug, Clone)]
pub struct ConvexHullFilter {
    hull: Polygon<f64>,
}

impl ConvexHullFilter {
    /// Build the hull of a field's (x, y) locations, ignoring z
    pub fn from_field(field: &ScatteredField) -> MapResult<Self> {
        Self::from_points(&field.locations())
    }

    pub fn from_points(points: &[(f64, f64)]) -> MapResult<Self> {
        let mut distinct = points.to_vec();
        distinct.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        distinct.dedup();

        if distinct.len() < 3 {
            return Err(MapError::InsufficientPoints {
                stage: Stage::HullConstruction,
                expected: 3,
                actual: distinct.len(),
            });
        }

        if all_collinear(&distinct) {
            return Err(MapError::DegenerateHull);
        }

        let multi: MultiPoint<f64> = distinct.into_iter().map(Point::from).collect();
        Ok(Self {
            hull: multi.convex_hull(),
        })
    }

    pub fn contains(&self, x: f64, y: f64) -> Membership {
        match self.hull.coordinate_position(&coord! { x: x, y: y }) {
            CoordPos::Inside => Membership::Inside,
            CoordPos::OnBoundary => Membership::OnBoundary,
            CoordPos::Outside => Membership::Outside,
        }
    }

    /// Closed boundary ring, first vertex repeated at the end
    pub fn boundary(&self) -> Vec<(f64, f64)> {
        self.hull.exterior().coords().map(|c| (c.x, c.y)).collect()
    }

    pub fn area(&self) -> f64 {
        self.hull.unsigned_area()
    }
}

/// Exact orientation test against the line through the first two points
fn all_collinear(points: &[(f64, f64)]) -> bool {
    let [a, b, rest @ ..] = points else {
        return true;
    };
    let (a, b) = (Coord::from(*a), Coord::from(*b));
    rest.iter()
        .all(|&p| RobustKernel::orient2d(a, b, Coord::from(p)) == Orientation::Collinear)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_with_interior() -> Vec<(f64, f64)> {
        vec![
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (5.0, 5.0),
            (2.0, 7.0),
        ]
    }

    #[test]
    fn test_hull_boundary_is_closed() {
        let filter = ConvexHullFilter::from_points(&square_with_interior()).unwrap();
        let ring = filter.boundary();

        // 4 corners plus the closing vertex, interior points excluded
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert!(!ring.contains(&(5.0, 5.0)));
        assert!((filter.area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_centroid_and_far_point() {
        let points = square_with_interior();
        let filter = ConvexHullFilter::from_points(&points).unwrap();

        let n = points.len() as f64;
        let cx = points.iter().map(|p| p.0).sum::<f64>() / n;
        let cy = points.iter().map(|p| p.1).sum::<f64>() / n;
        assert_eq!(filter.contains(cx, cy), Membership::Inside);

        assert_eq!(filter.contains(1000.0, 1000.0), Membership::Outside);
        assert!(!filter.contains(-1000.0, 5.0).is_inside());
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let filter = ConvexHullFilter::from_points(&square_with_interior()).unwrap();

        let edge = filter.contains(10.0, 5.0);
        assert_eq!(edge, Membership::OnBoundary);
        assert!(edge.is_inside());
        assert!(filter.contains(0.0, 0.0).is_inside());
    }

    #[test]
    fn test_too_few_distinct_points() {
        let points = [(0.0, 0.0), (1.0, 1.0), (1.0, 1.0)];
        let err = ConvexHullFilter::from_points(&points).unwrap_err();
        assert!(matches!(
            err,
            MapError::InsufficientPoints {
                expected: 3,
                actual: 2,
                ..
            }
        ));
        assert_eq!(err.stage(), Stage::HullConstruction);
    }

    #[test]
    fn test_collinear_points() {
        let diagonal = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)];
        let err = ConvexHullFilter::from_points(&diagonal).unwrap_err();
        assert!(matches!(err, MapError::DegenerateHull));

        let horizontal = [(0.0, 3.0), (1.0, 3.0), (5.0, 3.0)];
        let err = ConvexHullFilter::from_points(&horizontal).unwrap_err();
        assert!(matches!(err, MapError::DegenerateHull));
    }

    #[test]
    fn test_tiny_triangle_is_valid() {
        let points = [(0.0, 0.0), (1e-8, 0.0), (0.0, 1e-8)];
        let filter = ConvexHullFilter::from_points(&points).unwrap();

        assert!(filter.area() > 0.0);
        assert_eq!(filter.contains(2e-9, 2e-9), Membership::Inside);
        assert_eq!(filter.contains(1e-8, 1e-8), Membership::Outside);
    }
}
