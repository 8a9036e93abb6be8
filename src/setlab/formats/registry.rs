//! Exporter lookup
//!
//! Exporters are chosen by name on the command line (`text`, `csv`, `json`, `yaml`,
//! `pdf`). [`FormatRegistry`] maps those names to [`Formatter`] objects;
//! [`FormatRegistry::from_config`] applies the configured CSV delimiter and PDF page
//! settings.

use crate::setlab::computation::Computation;
use crate::setlab::settings::SetlabConfig;
use std::collections::BTreeMap;
use std::fmt;

/// Why an export could not be produced
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No exporter is registered under this name
    FormatNotFound(String),
    /// The exporter rejected its settings or the serializer failed
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Turns a finished [`Computation`] into one export document
pub trait Formatter: Send + Sync {
    /// Name used on the command line, e.g. `csv`
    fn name(&self) -> &str;

    fn serialize(&self, computation: &Computation) -> Result<String, FormatError>;

    /// One line for `setlab formats`
    fn description(&self) -> &str {
        ""
    }

    /// File extension for exports, without the dot
    fn extension(&self) -> &str {
        self.name()
    }
}

/// Exporters keyed by name; registering a name twice keeps the later exporter
#[derive(Default)]
pub struct FormatRegistry {
    formatters: BTreeMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// A registry with no exporters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        let name = formatter.name().to_string();
        if self.formatters.insert(name, Box::new(formatter)).is_some() {
            log::debug!("replaced an exporter in the format registry");
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|formatter| formatter.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Export `computation` with the exporter called `format`
    pub fn serialize(&self, computation: &Computation, format: &str) -> Result<String, FormatError> {
        match self.get(format) {
            Some(formatter) => formatter.serialize(computation),
            None => Err(FormatError::FormatNotFound(format.to_string())),
        }
    }

    /// Registered names in alphabetical order
    pub fn list_formats(&self) -> Vec<String> {
        self.formatters.keys().cloned().collect()
    }

    /// Every built-in exporter with its default settings
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(super::TextFormatter);
        registry.register(super::CsvFormatter::default());
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry.register(super::PdfFormatter::default());

        registry
    }

    /// Built-in exporters, with the CSV delimiter and PDF page settings from `config`
    pub fn from_config(config: &SetlabConfig) -> Self {
        let mut registry = Self::with_defaults();
        registry.register(super::CsvFormatter::new(config.export.csv_delimiter));
        registry.register(super::PdfFormatter::from_config(config));
        registry
    }
}
