use tracing::debug;

use crate::domain::{AttributedRecord, MapObject, ObjectCollection};
use crate::geometry::{Bounds, ConvexHullFilter};
use crate::interpolate::Grid;
use crate::interpolate::grid::cell_index;

/// Maps map objects onto a fitted grid
///
/// Borrows the grid and optional hull; the object collection is never
/// modified, surviving objects are tracked by index.
#[derive(Debug, Clone, Copy)]
pub struct ObjectAttributor<'a> {
    grid: &'a Grid,
    hull: Option<&'a ConvexHullFilter>,
}

/// Per-object lookup result before flattening
#[derive(Debug, Clone, Copy, PartialEq)]
struct Attribution {
    z: Option<f64>,
    inside_hull: Option<bool>,
}

impl<'a> ObjectAttributor<'a> {
    pub fn new(grid: &'a Grid, hull: Option<&'a ConvexHullFilter>) -> Self {
        Self { grid, hull }
    }

    /// Attribute every visible object and flatten to records
    ///
    /// # Algorithm
    /// 1. Representative point per object
    /// 2. Drop objects whose point lies outside the viewport
    /// 3. Map the point to 1-based grid indices; clamp to the grid edge
    ///    without a hull, mark out-of-range indices undefined with one
    /// 4. Look up the grid value and hull membership
    /// 5. Emit records with sequential ids, one per vertex (or per point)
    pub fn attribute(
        &self,
        objects: &ObjectCollection,
        viewport: &Bounds,
    ) -> Vec<AttributedRecord> {
        let survivors: Vec<usize> = objects
            .objects()
            .iter()
            .enumerate()
            .filter(|(_, obj)| {
                let (x, y) = obj.representative_point();
                viewport.contains(x, y)
            })
            .map(|(idx, _)| idx)
            .collect();

        debug!(
            total = objects.len(),
            visible = survivors.len(),
            hull = self.hull.is_some(),
            "attributing objects"
        );

        let mut records = Vec::new();
        for (seq, &idx) in survivors.iter().enumerate() {
            let object = &objects.objects()[idx];
            let attribution = self.attribute_object(object);
            emit_records(object, (seq + 1) as u32, attribution, &mut records);
        }

        records
    }

    fn attribute_object(&self, object: &MapObject) -> Attribution {
        let (x, y) = object.representative_point();

        let inside_hull = self.hull.map(|hull| hull.contains(x, y).is_inside());

        let xi = self.grid_index(x, self.grid.domain().x_range(), self.grid.nx());
        let yi = self.grid_index(y, self.grid.domain().y_range(), self.grid.ny());
        let z = match (xi, yi) {
            (Some(xi), Some(yi)) => self.grid.sample(xi, yi),
            _ => None,
        };

        Attribution { z, inside_hull }
    }

    /// 1-based index along one axis under the active clamping policy
    fn grid_index(&self, value: f64, range: (f64, f64), n: usize) -> Option<usize> {
        let idx = cell_index(value, range, n)?;
        if self.hull.is_some() {
            (1..=n as i64).contains(&idx).then_some(idx as usize)
        } else {
            Some(idx.clamp(1, n as i64) as usize)
        }
    }
}

fn emit_records(
    object: &MapObject,
    id: u32,
    attribution: Attribution,
    records: &mut Vec<AttributedRecord>,
) {
    for &(x, y) in object.vertices() {
        records.push(AttributedRecord {
            id,
            x,
            y,
            z: attribution.z,
            inside_hull: attribution.inside_hull,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeometryKind;
    use crate::field::{Sample, ScatteredField};
    use crate::interpolate::{Interpolator, Method};
    use std::collections::HashSet;

    fn corner_field() -> ScatteredField {
        ScatteredField::from_samples(vec![
            Sample::new(0.0, 0.0, 1.0),
            Sample::new(1.0, 0.0, 2.0),
            Sample::new(0.0, 1.0, 3.0),
            Sample::new(1.0, 1.0, 4.0),
        ])
        .unwrap()
    }

    fn fitted(n: usize) -> Grid {
        let interpolator = Interpolator::new(Method::Idw, n);
        interpolator.fit(&corner_field()).unwrap()
    }

    fn wide_viewport() -> Bounds {
        Bounds::new(-100.0, 100.0, -100.0, 100.0)
    }

    fn squares() -> ObjectCollection {
        ObjectCollection::from_raw(
            "polygon",
            vec![
                vec![(0.0, 0.0), (0.2, 0.0), (0.2, 0.2), (0.0, 0.2)],
                vec![(0.8, 0.8), (1.0, 0.8), (1.0, 1.0)],
                vec![(0.4, 0.4), (0.6, 0.4), (0.6, 0.6), (0.4, 0.6), (0.4, 0.4)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_polygon_record_counts() {
        let grid = fitted(10);
        let objects = squares();
        let attributor = ObjectAttributor::new(&grid, None);
        let records = attributor.attribute(&objects, &wide_viewport());

        assert_eq!(records.len(), objects.vertex_count());
        let ids: HashSet<u32> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, HashSet::from([1, 2, 3]));
        assert!(records.iter().all(|r| r.inside_hull.is_none()));
        assert!(records.iter().all(|r| r.z.is_some()));
    }

    #[test]
    fn test_vertex_order_and_shared_value() {
        let grid = fitted(10);
        let objects = squares();
        let attributor = ObjectAttributor::new(&grid, None);
        let records = attributor.attribute(&objects, &wide_viewport());

        let first: Vec<&AttributedRecord> = records.iter().filter(|r| r.id == 1).collect();
        let coords: Vec<(f64, f64)> = first.iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(coords, objects.objects()[0].vertices());
        assert!(first.iter().all(|r| r.z == first[0].z));
    }

    #[test]
    fn test_viewport_prefilter_renumbers_ids() {
        let grid = fitted(10);
        let objects = ObjectCollection::from_raw(
            "point",
            vec![vec![(0.1, 0.1)], vec![(2.0, 2.0)], vec![(0.9, 0.9)]],
        )
        .unwrap();
        let viewport = Bounds::new(0.0, 1.0, 0.0, 1.0);

        let records = ObjectAttributor::new(&grid, None).attribute(&objects, &viewport);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].id, 2);
        assert_eq!((records[1].x, records[1].y), (0.9, 0.9));
    }

    #[test]
    fn test_clamping_without_hull() {
        let grid = fitted(10);
        let objects = ObjectCollection::from_raw(
            "point",
            vec![vec![(1.0, 0.0)], vec![(5.0, 5.0)], vec![(-3.0, -3.0)]],
        )
        .unwrap();
        let attributor = ObjectAttributor::new(&grid, None);

        // Exactly at x-max lands in the last cell, not past it
        assert_eq!(attributor.grid_index(1.0, (0.0, 1.0), 10), Some(10));

        let records = attributor.attribute(&objects, &wide_viewport());
        assert_eq!(records[0].z, grid.sample(10, 1));
        assert_eq!(records[1].z, grid.sample(10, 10));
        assert_eq!(records[2].z, grid.sample(1, 1));
        assert!((records[2].z.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_exclusion_with_hull() {
        let field = corner_field();
        let grid = fitted(10);
        let hull = ConvexHullFilter::from_field(&field).unwrap();
        let objects = ObjectCollection::from_raw(
            "point",
            vec![vec![(0.5, 0.5)], vec![(5.0, 0.5)], vec![(1.0, 1.0)]],
        )
        .unwrap();

        let attributor = ObjectAttributor::new(&grid, Some(&hull));
        let records = attributor.attribute(&objects, &wide_viewport());

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].inside_hull, Some(true));
        assert!(records[0].z.is_some());

        // Outside the data range: no lookup, flagged outside
        assert_eq!(records[1].inside_hull, Some(false));
        assert_eq!(records[1].z, None);

        // Hull corner counts as inside
        assert_eq!(records[2].inside_hull, Some(true));
        assert!((records[2].z.unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_lower_data_edge_kept_with_hull() {
        let field = corner_field();
        let grid = fitted(10);
        let hull = ConvexHullFilter::from_field(&field).unwrap();
        let objects = ObjectCollection::from_raw(
            "point",
            vec![vec![(0.0, 0.0)], vec![(0.0, 0.5)], vec![(-0.01, 0.5)]],
        )
        .unwrap();
        let attributor = ObjectAttributor::new(&grid, Some(&hull));

        assert_eq!(attributor.grid_index(0.0, (0.0, 1.0), 10), Some(1));
        assert_eq!(attributor.grid_index(-0.01, (0.0, 1.0), 10), None);

        let records = attributor.attribute(&objects, &wide_viewport());
        assert!((records[0].z.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(records[1].z, grid.sample(1, 5));
        assert_eq!(records[2].z, None);
        assert_eq!(records[2].inside_hull, Some(false));
    }

    #[test]
    fn test_hull_flags_always_defined() {
        let field = corner_field();
        let grid = fitted(10);
        let hull = ConvexHullFilter::from_field(&field).unwrap();
        let objects = ObjectCollection::from_raw(
            "polyline",
            vec![
                vec![(0.0, 0.0), (0.5, 0.5)],
                vec![(3.0, 3.0), (4.0, 4.0)],
                vec![(-1.0, 0.5), (0.5, 0.5), (2.0, 0.5)],
            ],
        )
        .unwrap();

        let attributor = ObjectAttributor::new(&grid, Some(&hull));
        let records = attributor.attribute(&objects, &wide_viewport());
        assert_eq!(records.len(), 7);
        assert!(records.iter().all(|r| r.inside_hull.is_some()));
    }

    #[test]
    fn test_point_outside_viewport_dropped() {
        let grid = fitted(10);
        let objects = ObjectCollection::from_raw("point", vec![vec![(2.0, 2.0)]]).unwrap();
        let viewport = Bounds::new(0.0, 1.0, 0.0, 1.0);

        let records = ObjectAttributor::new(&grid, None).attribute(&objects, &viewport);
        assert!(records.is_empty());
        assert_eq!(objects.kind(), GeometryKind::Point);
    }
}
