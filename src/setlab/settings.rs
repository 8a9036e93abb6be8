//! Workbench settings
//!
//! Every key has a value in `defaults/setlab.default.toml`, which is compiled in. The
//! sections cover export details (CSV delimiter), PDF pages, the terminal diagram and
//! the optional code-metrics run. [`Loader`] stacks user files and flag overrides over
//! those defaults.

use crate::setlab::metrics::MetricsConfig;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use ratatui::symbols::Marker;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/setlab.default.toml");

/// Name of the optional per-directory configuration file
pub const LOCAL_CONFIG_FILE: &str = "setlab.toml";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SetlabConfig {
    pub export: ExportConfig,
    pub pdf: PdfConfig,
    pub diagram: DiagramConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub csv_delimiter: char,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub page_size: PageSize,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    /// Width and height in PostScript points
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiagramConfig {
    pub width: u16,
    pub height: u16,
    pub marker: MarkerKind,
}

/// Canvas resolution for terminal diagrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    Braille,
    Dot,
    Block,
    HalfBlock,
}

impl From<MarkerKind> for Marker {
    fn from(kind: MarkerKind) -> Self {
        match kind {
            MarkerKind::Braille => Marker::Braille,
            MarkerKind::Dot => Marker::Dot,
            MarkerKind::Block => Marker::Block,
            MarkerKind::HalfBlock => Marker::HalfBlock,
        }
    }
}

/// Builds a [`SetlabConfig`] from the embedded defaults plus any number of layers
///
/// Later layers win: a `setlab.toml` beside the user, then `--config`, then single keys
/// set from command-line flags.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Loader {
            builder: Config::builder().add_source(defaults),
        }
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        log::debug!("config layer {} (required: {required})", path.display());
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(file);
        self
    }

    /// Add a TOML file that must exist; `build` fails otherwise
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Add a TOML file that is skipped when absent
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    /// Set one dotted key, e.g. `diagram.width`
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<SetlabConfig, ConfigError> {
        let config = self.builder.build()?;
        config.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with nothing layered on top
pub fn load_defaults() -> Result<SetlabConfig, ConfigError> {
    Loader::new().build()
}
