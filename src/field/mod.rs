//! Scattered (x, y, z) samples validated from a raw table

pub mod table;

pub use table::SampleTable;

use crate::error::{ConfigurationWarning, MapError, MapResult, Stage};
use crate::geometry::Bounds;
use table::coerce_cell;
use tracing::{debug, warn};

/// A single observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// How one coordinate column is identified in a sample table
struct ColumnRule {
    axis: char,
    /// Accepted names, first match in column order wins
    names: &'static [&'static str],
    label: &'static str,
    /// 0-based position used when no name matches
    fallback: usize,
}

const X_COLUMN: ColumnRule = ColumnRule {
    axis: 'x',
    names: &["x", "lon"],
    label: "x/lon",
    fallback: 0,
};
const Y_COLUMN: ColumnRule = ColumnRule {
    axis: 'y',
    names: &["y", "lat"],
    label: "y/lat",
    fallback: 1,
};
const Z_COLUMN: ColumnRule = ColumnRule {
    axis: 'z',
    names: &["z"],
    label: "z",
    fallback: 2,
};

/// Validated scattered samples
///
/// Owns a copy of the retained samples. Rows with an undefined coordinate
/// or value are dropped; at least one sample always remains.
#[derive(Debug, Clone)]
pub struct ScatteredField {
    samples: Vec<Sample>,
    bounds: Bounds,
    warnings: Vec<ConfigurationWarning>,
}

impl ScatteredField {
    /// Validate a sample table
    ///
    /// # Algorithm
    /// 1. Resolve x/y/z columns by name, falling back to positions 1/2/3
    /// 2. Coerce every cell of the table to a number
    /// 3. Drop rows with an undefined x, y or z
    pub fn from_table(table: &SampleTable) -> MapResult<Self> {
        if table.column_count() < 3 {
            return Err(MapError::invalid_input(
                Stage::FieldValidation,
                format!(
                    "sample table needs at least 3 columns, got {}",
                    table.column_count()
                ),
            ));
        }

        let mut warnings = Vec::new();
        let x_col = resolve_column(table, &X_COLUMN, &mut warnings);
        let y_col = resolve_column(table, &Y_COLUMN, &mut warnings);
        let z_col = resolve_column(table, &Z_COLUMN, &mut warnings);

        let mut samples = Vec::with_capacity(table.rows.len());
        let mut dropped = 0usize;

        for (row_idx, row) in table.rows.iter().enumerate() {
            if row.len() != table.column_count() {
                return Err(MapError::invalid_input(
                    Stage::FieldValidation,
                    format!(
                        "row {} has {} cells, expected {}",
                        row_idx + 1,
                        row.len(),
                        table.column_count()
                    ),
                ));
            }

            let values = row
                .iter()
                .map(coerce_cell)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|reason| {
                    MapError::invalid_input(
                        Stage::FieldValidation,
                        format!("row {}: {}", row_idx + 1, reason),
                    )
                })?;

            match (values[x_col], values[y_col], values[z_col]) {
                (Some(x), Some(y), Some(z)) => samples.push(Sample::new(x, y, z)),
                _ => dropped += 1,
            }
        }

        Self::from_samples_with_warnings(samples, warnings).inspect(|_| {
            if dropped > 0 {
                debug!(dropped, "dropped rows with undefined values");
            }
        })
    }

    /// Build a field directly from numeric samples, dropping non-finite ones
    pub fn from_samples(samples: Vec<Sample>) -> MapResult<Self> {
        Self::from_samples_with_warnings(samples, Vec::new())
    }

    fn from_samples_with_warnings(
        samples: Vec<Sample>,
        warnings: Vec<ConfigurationWarning>,
    ) -> MapResult<Self> {
        let samples: Vec<Sample> = samples
            .into_iter()
            .filter(|s| s.x.is_finite() && s.y.is_finite() && s.z.is_finite())
            .collect();

        let points: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, s.y)).collect();
        let bounds = Bounds::from_points(&points).ok_or_else(|| {
            MapError::invalid_input(
                Stage::FieldValidation,
                "no samples with a defined z value remain",
            )
        })?;

        debug!(
            samples = samples.len(),
            x_range = ?bounds.x_range(),
            y_range = ?bounds.y_range(),
            "built scattered field"
        );

        Ok(Self {
            samples,
            bounds,
            warnings,
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn x_range(&self) -> (f64, f64) {
        self.bounds.x_range()
    }

    pub fn y_range(&self) -> (f64, f64) {
        self.bounds.y_range()
    }

    /// Data extent, which is also the domain of any grid fitted to it
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Sample locations without values
    pub fn locations(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.x, s.y)).collect()
    }

    /// Sorted distinct x values
    pub fn distinct_x(&self) -> Vec<f64> {
        distinct(self.samples.iter().map(|s| s.x))
    }

    /// Sorted distinct y values
    pub fn distinct_y(&self) -> Vec<f64> {
        distinct(self.samples.iter().map(|s| s.y))
    }

    pub fn warnings(&self) -> &[ConfigurationWarning] {
        &self.warnings
    }
}

fn resolve_column(
    table: &SampleTable,
    rule: &ColumnRule,
    warnings: &mut Vec<ConfigurationWarning>,
) -> usize {
    if let Some(idx) = table.find_column(rule.names) {
        return idx;
    }

    let warning = ConfigurationWarning::PositionalColumn {
        axis: rule.axis,
        names: rule.label,
        column: rule.fallback + 1,
    };
    warn!("{}", warning);
    warnings.push(warning);
    rule.fallback
}

fn distinct(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(columns: &[&str], rows: Vec<Vec<serde_json::Value>>) -> SampleTable {
        SampleTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn test_named_columns_any_order() {
        let t = table(
            &["z", "lat", "lon"],
            vec![vec![json!(5.0), json!(10.0), json!(20.0)]],
        );
        let field = ScatteredField::from_table(&t).unwrap();

        assert_eq!(field.samples()[0], Sample::new(20.0, 10.0, 5.0));
        assert!(field.warnings().is_empty());
    }

    #[test]
    fn test_positional_fallback_warns() {
        let t = table(
            &["easting", "northing", "depth"],
            vec![vec![json!(1.0), json!(2.0), json!(3.0)]],
        );
        let field = ScatteredField::from_table(&t).unwrap();

        assert_eq!(field.samples()[0], Sample::new(1.0, 2.0, 3.0));
        assert_eq!(field.warnings().len(), 3);
        assert!(matches!(
            field.warnings()[0],
            ConfigurationWarning::PositionalColumn {
                axis: 'x',
                column: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_too_few_columns() {
        let t = table(&["x", "y"], vec![vec![json!(1.0), json!(2.0)]]);
        let err = ScatteredField::from_table(&t).unwrap_err();
        assert_eq!(err.stage(), Stage::FieldValidation);
    }

    #[test]
    fn test_non_numeric_table() {
        let t = table(
            &["x", "y", "z"],
            vec![
                vec![json!(1.0), json!(2.0), json!(3.0)],
                vec![json!(1.0), json!("north"), json!(3.0)],
            ],
        );
        let err = ScatteredField::from_table(&t).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_ragged_row() {
        let t = table(&["x", "y", "z"], vec![vec![json!(1.0), json!(2.0)]]);
        assert!(ScatteredField::from_table(&t).is_err());
    }

    #[test]
    fn test_drops_undefined_z() {
        let t = table(
            &["x", "y", "z"],
            vec![
                vec![json!(0.0), json!(0.0), json!(1.0)],
                vec![json!(5.0), json!(5.0), json!(null)],
                vec![json!(2.0), json!(1.0), json!("NA")],
                vec![json!(1.0), json!(3.0), json!("4")],
            ],
        );
        let field = ScatteredField::from_table(&t).unwrap();

        assert_eq!(field.len(), 2);
        assert_eq!(field.x_range(), (0.0, 1.0));
        assert_eq!(field.y_range(), (0.0, 3.0));
    }

    #[test]
    fn test_all_undefined_fails() {
        let t = table(
            &["x", "y", "z"],
            vec![vec![json!(0.0), json!(0.0), json!(null)]],
        );
        let err = ScatteredField::from_table(&t).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidInput {
                stage: Stage::FieldValidation,
                ..
            }
        ));
    }

    #[test]
    fn test_distinct_values() {
        let field = ScatteredField::from_samples(vec![
            Sample::new(1.0, 0.0, 0.0),
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(1.0, 2.0, 0.0),
        ])
        .unwrap();

        assert_eq!(field.distinct_x(), vec![0.0, 1.0]);
        assert_eq!(field.distinct_y(), vec![0.0, 2.0]);
    }
}
