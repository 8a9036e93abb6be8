//! Plain-text report export

use crate::setlab::computation::Computation;
use crate::setlab::formats::registry::{FormatError, Formatter};
use crate::setlab::report::Report;

/// Writes the full report as shown on screen
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn serialize(&self, computation: &Computation) -> Result<String, FormatError> {
        Ok(Report::build(computation).render_text())
    }

    fn description(&self) -> &str {
        "Full report as plain text"
    }

    fn extension(&self) -> &str {
        "txt"
    }
}
