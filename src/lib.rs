//! interpmap - Interpolate scattered samples onto a grid and attribute map objects from it

pub mod attribute;
pub mod config;
pub mod domain;
pub mod error;
pub mod field;
pub mod geometry;
pub mod input;
pub mod interpolate;
pub mod pipeline;

pub use error::{ConfigurationWarning, MapError, MapResult, Stage};
pub use pipeline::{AttributedTable, Pipeline};
