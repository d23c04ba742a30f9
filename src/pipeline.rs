//! One interpolation-and-attribution run for a single map layer

use serde::Serialize;
use tracing::debug;

use crate::attribute::ObjectAttributor;
use crate::config::MapConfig;
use crate::domain::{AttributedRecord, ObjectCollection};
use crate::error::{ConfigurationWarning, MapResult};
use crate::field::{SampleTable, ScatteredField};
use crate::geometry::{Bounds, ConvexHullFilter};
use crate::interpolate::{Grid, Interpolator};

/// Styling the renderer needs alongside the records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderStyle {
    pub colour_scale: Vec<String>,
    /// Colour for records outside the hull, None when filtering is off
    pub background_colour: Option<String>,
    /// (foreground, background)
    pub size: (f64, f64),
    /// (foreground, background)
    pub shape: (f64, f64),
}

/// Output of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct AttributedTable {
    pub records: Vec<AttributedRecord>,
    pub style: RenderStyle,
    /// Value range of the fitted grid, for the colour scale
    pub z_range: Option<(f64, f64)>,
    #[serde(serialize_with = "serialize_warnings")]
    pub warnings: Vec<ConfigurationWarning>,
}

impl AttributedTable {
    /// Number of distinct objects in the table
    pub fn object_count(&self) -> usize {
        self.records.last().map(|r| r.id as usize).unwrap_or(0)
    }
}

fn serialize_warnings<S: serde::Serializer>(
    warnings: &[ConfigurationWarning],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(warnings.iter().map(|w| w.to_string()))
}

/// Validated configuration ready to run
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: MapConfig,
    style: RenderStyle,
    warnings: Vec<ConfigurationWarning>,
}

impl Pipeline {
    pub fn new(config: MapConfig) -> MapResult<Self> {
        let (colour_scale, warnings) = config.validate()?;
        let style = RenderStyle {
            colour_scale,
            background_colour: config.background_colour.clone(),
            size: config.size.resolve(),
            shape: config.shape.resolve(),
        };

        Ok(Self {
            config,
            style,
            warnings,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Fit the grid and, when a background colour is set, the hull
    pub fn fit(
        &self,
        samples: &SampleTable,
    ) -> MapResult<(ScatteredField, Grid, Option<ConvexHullFilter>)> {
        let field = ScatteredField::from_table(samples)?;

        let grid = Interpolator::new(self.config.method, self.config.grid_size)
            .with_power(self.config.idw_power)
            .fit(&field)?;

        let hull = if self.config.hull_filtering() {
            Some(ConvexHullFilter::from_field(&field)?)
        } else {
            None
        };

        Ok((field, grid, hull))
    }

    /// Run every stage: field, grid, optional hull, attribution
    pub fn run(
        &self,
        samples: &SampleTable,
        objects: &ObjectCollection,
        viewport: &Bounds,
    ) -> MapResult<AttributedTable> {
        let (field, grid, hull) = self.fit(samples)?;

        let records = ObjectAttributor::new(&grid, hull.as_ref()).attribute(objects, viewport);

        let mut warnings = field.warnings().to_vec();
        warnings.extend(self.warnings.iter().cloned());

        debug!(
            records = records.len(),
            warnings = warnings.len(),
            "pipeline finished"
        );

        Ok(AttributedTable {
            records,
            style: self.style.clone(),
            z_range: grid.z_range(),
            warnings,
        })
    }
}
