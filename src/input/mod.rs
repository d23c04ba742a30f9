//! JSON documents for samples, map objects and the attributed output

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::domain::ObjectCollection;
use crate::error::MapResult;
use crate::field::SampleTable;
use crate::pipeline::AttributedTable;

/// One object as written in the document
///
/// Points may be given bare (`[x, y]`) or as a one-vertex list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawObject {
    Vertices(Vec<[f64; 2]>),
    Point([f64; 2]),
}

impl RawObject {
    fn into_vertices(self) -> Vec<(f64, f64)> {
        match self {
            RawObject::Vertices(v) => v.into_iter().map(|[x, y]| (x, y)).collect(),
            RawObject::Point([x, y]) => vec![(x, y)],
        }
    }
}

/// Object collection document: `{"kind": "polygon", "objects": [...]}`
#[derive(Debug, Deserialize)]
pub struct ObjectDocument {
    pub kind: String,
    pub objects: Vec<RawObject>,
}

impl ObjectDocument {
    pub fn into_collection(self) -> MapResult<ObjectCollection> {
        let objects = self
            .objects
            .into_iter()
            .map(RawObject::into_vertices)
            .collect();
        ObjectCollection::from_raw(&self.kind, objects)
    }
}

/// Read a sample table document: `{"columns": [...], "rows": [[...], ...]}`
pub fn read_samples(path: &Path) -> Result<SampleTable> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open sample file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse sample file: {}", path.display()))
}

/// Read and validate an object collection document
pub fn read_objects(path: &Path) -> Result<ObjectCollection> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open object file: {}", path.display()))?;
    let document: ObjectDocument = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse object file: {}", path.display()))?;
    document
        .into_collection()
        .with_context(|| format!("Invalid objects in {}", path.display()))
}

/// Write the attributed table as pretty JSON to a file, or stdout when
/// no path is given
pub fn write_table(path: Option<&Path>, table: &AttributedTable) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, table)
                .context("Failed to serialize attributed table")?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, table)
                .context("Failed to serialize attributed table")?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
