use std::fmt;
use thiserror::Error;

/// Pipeline stage that raised an error or warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    FieldValidation,
    Interpolation,
    HullConstruction,
    Attribution,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::FieldValidation => "field validation",
            Stage::Interpolation => "interpolation",
            Stage::HullConstruction => "hull construction",
            Stage::Attribution => "attribution",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Invalid input during {stage}: {reason}")]
    InvalidInput { stage: Stage, reason: String },

    #[error("Insufficient points during {stage}: expected at least {expected}, got {actual}")]
    InsufficientPoints {
        stage: Stage,
        expected: usize,
        actual: usize,
    },

    #[error("Degenerate convex hull during hull construction: sample locations are collinear")]
    DegenerateHull,

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl MapError {
    pub fn invalid_input(stage: Stage, reason: impl Into<String>) -> Self {
        MapError::InvalidInput {
            stage,
            reason: reason.into(),
        }
    }

    /// Stage the error was raised in.
    pub fn stage(&self) -> Stage {
        match self {
            MapError::InvalidInput { stage, .. } | MapError::InsufficientPoints { stage, .. } => {
                *stage
            }
            MapError::DegenerateHull => Stage::HullConstruction,
            MapError::InvalidConfiguration { .. } => Stage::Configuration,
        }
    }
}

pub type MapResult<T> = Result<T, MapError>;

/// Non-fatal issues resolved with a documented fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationWarning {
    #[error("No column named {names} for the {axis} coordinate, using column {column}")]
    PositionalColumn {
        axis: char,
        names: &'static str,
        column: usize,
    },

    #[error("Colour scale entry {index} is not text, coerced to \"{value}\"")]
    ColourCoerced { index: usize, value: String },
}
