//! Export formats
//!
//! Every exporter implements [`Formatter`] and is looked up by name through
//! [`FormatRegistry`]. Project files are not an export format; see
//! [`crate::setlab::project`].

mod csv;
mod document;
pub mod pdf;
mod registry;
mod text;

pub use csv::{CsvFormatter, DEFAULT_DELIMITER};
pub use document::{ExportDocument, ExportRegion, JsonFormatter, YamlFormatter};
pub use pdf::PdfFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use text::TextFormatter;
