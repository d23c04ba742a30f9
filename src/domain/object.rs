use crate::error::{MapError, MapResult, Stage};
use serde::Serialize;
use std::str::FromStr;

/// Geometry kind shared by every object of a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Polygon,
    Polyline,
    Point,
}

impl GeometryKind {
    /// Minimum vertex count an object of this kind needs
    fn min_vertices(self) -> usize {
        match self {
            GeometryKind::Polygon => 3,
            GeometryKind::Polyline => 2,
            GeometryKind::Point => 1,
        }
    }
}

impl FromStr for GeometryKind {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "polygon" | "polygons" => Ok(GeometryKind::Polygon),
            "polyline" | "polylines" | "line" | "lines" | "linestring" => {
                Ok(GeometryKind::Polyline)
            }
            "point" | "points" => Ok(GeometryKind::Point),
            _ => Err(MapError::invalid_input(
                Stage::Attribution,
                format!("cannot determine geometry kind from {:?}", s),
            )),
        }
    }
}

/// A map object whose colour is derived from the grid
#[derive(Debug, Clone, PartialEq)]
pub enum MapObject {
    /// Ordered ring of vertices
    Polygon(Vec<(f64, f64)>),
    /// Ordered vertex sequence
    Polyline(Vec<(f64, f64)>),
    Point((f64, f64)),
}

impl MapObject {
    pub fn kind(&self) -> GeometryKind {
        match self {
            MapObject::Polygon(_) => GeometryKind::Polygon,
            MapObject::Polyline(_) => GeometryKind::Polyline,
            MapObject::Point(_) => GeometryKind::Point,
        }
    }

    /// Build an object of `kind` from its vertices
    pub fn from_vertices(kind: GeometryKind, vertices: Vec<(f64, f64)>) -> MapResult<Self> {
        if vertices.len() < kind.min_vertices() {
            return Err(MapError::invalid_input(
                Stage::Attribution,
                format!(
                    "{:?} needs at least {} vertices, got {}",
                    kind,
                    kind.min_vertices(),
                    vertices.len()
                ),
            ));
        }
        if vertices
            .iter()
            .any(|&(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(MapError::invalid_input(
                Stage::Attribution,
                "vertex with a non-finite coordinate",
            ));
        }

        match kind {
            GeometryKind::Polygon => Ok(MapObject::Polygon(vertices)),
            GeometryKind::Polyline => Ok(MapObject::Polyline(vertices)),
            GeometryKind::Point => match vertices.as_slice() {
                &[p] => Ok(MapObject::Point(p)),
                _ => Err(MapError::invalid_input(
                    Stage::Attribution,
                    format!("point needs exactly 1 vertex, got {}", vertices.len()),
                )),
            },
        }
    }

    /// Vertices in order; a point yields itself
    pub fn vertices(&self) -> &[(f64, f64)] {
        match self {
            MapObject::Polygon(v) | MapObject::Polyline(v) => v,
            MapObject::Point(p) => std::slice::from_ref(p),
        }
    }

    /// Single coordinate used for the grid lookup
    ///
    /// The mean of all listed vertices for polygons and polylines, which is
    /// not the area centroid.
    pub fn representative_point(&self) -> (f64, f64) {
        match self {
            MapObject::Point(p) => *p,
            MapObject::Polygon(v) | MapObject::Polyline(v) => {
                let n = v.len() as f64;
                let (sx, sy) = v
                    .iter()
                    .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
                (sx / n, sy / n)
            }
        }
    }
}

/// Homogeneous set of map objects, kind fixed at construction
#[derive(Debug, Clone)]
pub struct ObjectCollection {
    kind: GeometryKind,
    objects: Vec<MapObject>,
}

impl ObjectCollection {
    pub fn new(kind: GeometryKind, objects: Vec<MapObject>) -> MapResult<Self> {
        if let Some(idx) = objects.iter().position(|o| o.kind() != kind) {
            return Err(MapError::invalid_input(
                Stage::Attribution,
                format!(
                    "object {} is a {:?} in a {:?} collection",
                    idx + 1,
                    objects[idx].kind(),
                    kind
                ),
            ));
        }
        Ok(Self { kind, objects })
    }

    /// Build from a textual kind and raw vertex lists
    pub fn from_raw(kind: &str, objects: Vec<Vec<(f64, f64)>>) -> MapResult<Self> {
        let kind: GeometryKind = kind.parse()?;
        let objects = objects
            .into_iter()
            .enumerate()
            .map(|(idx, vertices)| {
                MapObject::from_vertices(kind, vertices).map_err(|e| match e {
                    MapError::InvalidInput { stage, reason } => MapError::InvalidInput {
                        stage,
                        reason: format!("object {}: {}", idx + 1, reason),
                    },
                    other => other,
                })
            })
            .collect::<MapResult<Vec<_>>>()?;
        Self::new(kind, objects)
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.objects.iter().map(|o| o.vertices().len()).sum()
    }

    /// Points of every vertex across all objects
    pub fn all_vertices(&self) -> Vec<(f64, f64)> {
        self.objects
            .iter()
            .flat_map(|o| o.vertices().iter().copied())
            .collect()
    }
}
