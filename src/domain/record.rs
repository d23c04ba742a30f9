use serde::{Serialize, Serializer};

/// One row of the attributed table handed to the renderer
///
/// Polygons and polylines produce one record per vertex, all sharing the
/// object's id, value and hull flag. Points produce a single record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributedRecord {
    /// Sequential, 1-based over surviving objects
    pub id: u32,
    pub x: f64,
    pub y: f64,
    /// Grid value, None when the lookup was skipped or the cell is undefined
    pub z: Option<f64>,
    /// Hull membership as 0/1, null when hull filtering is off
    #[serde(serialize_with = "serialize_flag")]
    pub inside_hull: Option<bool>,
}

impl AttributedRecord {
    /// Whether the renderer should draw this record in the background colour
    pub fn is_background(&self) -> bool {
        self.inside_hull == Some(false)
    }
}

fn serialize_flag<S: Serializer>(flag: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
    match flag {
        Some(inside) => serializer.serialize_u8(u8::from(*inside)),
        None => serializer.serialize_none(),
    }
}
