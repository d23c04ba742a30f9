use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{ConfigurationWarning, MapError, MapResult};
use crate::interpolate::Method;

/// Largest accepted `grid_size`; an idw grid costs `grid_size^2 * samples`
pub const MAX_GRID_SIZE: usize = 2048;

fn default_method() -> Method {
    Method::Idw
}
fn default_grid_size() -> usize {
    100
}
fn default_idw_power() -> f64 {
    2.0
}
fn default_colour_scale() -> Vec<ColourEntry> {
    ["#2b83ba", "#abdda4", "#ffffbf", "#fdae61", "#d7191c"]
        .into_iter()
        .map(|c| ColourEntry::Text(c.to_string()))
        .collect()
}
fn default_size() -> Pair {
    Pair::Single(1.0)
}
fn default_shape() -> Pair {
    Pair::Both(19.0, 15.0)
}

/// Colour scale entry as written by the user
///
/// Only text is a colour; numbers and RGB triples are coerced to text with
/// a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColourEntry {
    Text(String),
    Number(f64),
    Rgb([u8; 3]),
}

impl ColourEntry {
    fn coerce(&self) -> (String, bool) {
        match self {
            ColourEntry::Text(text) => (text.clone(), false),
            ColourEntry::Number(n) => (format!("{}", n), true),
            ColourEntry::Rgb([r, g, b]) => (format!("#{:02x}{:02x}{:02x}", r, g, b), true),
        }
    }
}

/// Number or (foreground, background) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pair {
    Single(f64),
    Both(f64, f64),
}

impl Pair {
    /// Resolve to (foreground, background); a single value serves both
    pub fn resolve(self) -> (f64, f64) {
        match self {
            Pair::Single(v) => (v, v),
            Pair::Both(fg, bg) => (fg, bg),
        }
    }
}

/// Options file, every field optional
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub method: Option<Method>,
    #[serde(default)]
    pub grid_size: Option<usize>,
    #[serde(default)]
    pub idw_power: Option<f64>,
    #[serde(default)]
    pub colour_scale: Option<Vec<ColourEntry>>,
    #[serde(default)]
    pub background_colour: Option<String>,
    #[serde(default)]
    pub size: Option<Pair>,
    #[serde(default)]
    pub shape: Option<Pair>,
    #[serde(default)]
    pub verbose: bool,
}

impl FileConfig {
    /// Search the default locations and return the first config that parses
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Read an explicitly requested config file
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("interpmap.toml"));
    paths.push(PathBuf::from(".interpmap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("interpmap").join("config.toml"));
        paths.push(config_dir.join("interpmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".interpmap.toml"));
    }

    paths
}

/// Every option of one pipeline run, with explicit defaults
///
/// `background_colour` doubles as the switch for convex hull filtering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_method")]
    pub method: Method,
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_idw_power")]
    pub idw_power: f64,
    #[serde(default = "default_colour_scale")]
    pub colour_scale: Vec<ColourEntry>,
    #[serde(default)]
    pub background_colour: Option<String>,
    #[serde(default = "default_size")]
    pub size: Pair,
    #[serde(default = "default_shape")]
    pub shape: Pair,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            grid_size: default_grid_size(),
            idw_power: default_idw_power(),
            colour_scale: default_colour_scale(),
            background_colour: None,
            size: default_size(),
            shape: default_shape(),
        }
    }
}

impl MapConfig {
    /// Defaults overridden by whatever the file sets
    pub fn from_file(file: &FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            method: file.method.unwrap_or(defaults.method),
            grid_size: file.grid_size.unwrap_or(defaults.grid_size),
            idw_power: file.idw_power.unwrap_or(defaults.idw_power),
            colour_scale: file.colour_scale.clone().unwrap_or(defaults.colour_scale),
            background_colour: file.background_colour.clone(),
            size: file.size.unwrap_or(defaults.size),
            shape: file.shape.unwrap_or(defaults.shape),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_background(mut self, colour: impl Into<String>) -> Self {
        self.background_colour = Some(colour.into());
        self
    }

    pub fn hull_filtering(&self) -> bool {
        self.background_colour.is_some()
    }

    /// Check ranges and normalise the colour scale to text
    ///
    /// # Returns
    /// * `Ok((colours, warnings))` - text colour scale and coercion warnings
    /// * `Err` - an option is out of range
    pub fn validate(&self) -> MapResult<(Vec<String>, Vec<ConfigurationWarning>)> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(invalid(format!(
                "grid_size must be between 1 and {}, got {}",
                MAX_GRID_SIZE, self.grid_size
            )));
        }
        if !(self.idw_power.is_finite() && self.idw_power > 0.0) {
            return Err(invalid(format!("idw_power must be positive, got {}", self.idw_power)));
        }
        if self.colour_scale.is_empty() {
            return Err(invalid("colour_scale must contain at least one colour"));
        }
        if let Some(bg) = &self.background_colour
            && bg.trim().is_empty()
        {
            return Err(invalid("background_colour must not be empty"));
        }

        let (fg_size, bg_size) = self.size.resolve();
        if !(fg_size > 0.0 && bg_size > 0.0) {
            return Err(invalid("size values must be positive"));
        }
        let (fg_shape, bg_shape) = self.shape.resolve();
        if !(fg_shape >= 0.0 && bg_shape >= 0.0) {
            return Err(invalid("shape values must not be negative"));
        }

        let mut warnings = Vec::new();
        let colours = self
            .colour_scale
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let (value, coerced) = entry.coerce();
                if coerced {
                    let warning = ConfigurationWarning::ColourCoerced {
                        index,
                        value: value.clone(),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
                value
            })
            .collect();

        Ok((colours, warnings))
    }
}

fn invalid(message: impl Into<String>) -> MapError {
    MapError::InvalidConfiguration {
        message: message.into(),
    }
}
