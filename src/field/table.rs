use serde::Deserialize;
use serde_json::Value;

/// Raw sample table as supplied by the caller
///
/// Cells are loosely typed: numbers, numeric strings and missing-value
/// markers are all accepted and coerced when the field is built.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SampleTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SampleTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from numeric triples with columns `x`, `y`, `z`
    pub fn from_xyz(samples: &[(f64, f64, f64)]) -> Self {
        let rows = samples
            .iter()
            .map(|&(x, y, z)| vec![Value::from(x), Value::from(y), Value::from(z)])
            .collect();
        Self::new(vec!["x".into(), "y".into(), "z".into()], rows)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Position of the first column whose name is one of `names`
    pub fn find_column(&self, names: &[&str]) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| names.contains(&c.as_str()))
    }
}

/// Missing-value markers accepted in text cells
const MISSING_MARKERS: [&str; 3] = ["", "NA", "NaN"];

/// Coerce one cell to a number
///
/// # Returns
/// * `Ok(Some(v))` - finite numeric value
/// * `Ok(None)` - undefined (null, missing marker or non-finite)
/// * `Err` - the cell is not numeric
pub fn coerce_cell(cell: &Value) -> Result<Option<f64>, String> {
    match cell {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64().filter(|v| v.is_finite())),
        Value::String(s) => {
            let trimmed = s.trim();
            if MISSING_MARKERS.contains(&trimmed) {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(|v| Some(v).filter(|v| v.is_finite()))
                .map_err(|_| format!("non-numeric value {:?}", s))
        }
        other => Err(format!("non-numeric value {}", other)),
    }
}
