//! Membership table as delimited values
//!
//! Header `Element;A;B;…;Result`, then one row per universe element with `1`/`0` flags,
//! rows ordered like the on-screen membership table.

use crate::setlab::computation::Computation;
use crate::setlab::formats::registry::{FormatError, Formatter};
use crate::setlab::report::MembershipTable;

pub const DEFAULT_DELIMITER: char = ';';

pub struct CsvFormatter {
    delimiter: char,
}

impl CsvFormatter {
    pub fn new(delimiter: char) -> Self {
        CsvFormatter { delimiter }
    }

    fn field(&self, value: &str) -> String {
        let needs_quotes = value.contains(self.delimiter)
            || value.contains('"')
            || value.contains('\n')
            || value.contains('\r');
        if needs_quotes {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    fn row<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> String {
        let separator = self.delimiter.to_string();
        fields
            .into_iter()
            .map(|value| self.field(value))
            .collect::<Vec<_>>()
            .join(separator.as_str())
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

fn flag(present: bool) -> &'static str {
    if present {
        "1"
    } else {
        "0"
    }
}

impl Formatter for CsvFormatter {
    fn name(&self) -> &str {
        "csv"
    }

    fn serialize(&self, computation: &Computation) -> Result<String, FormatError> {
        if matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(FormatError::SerializationError(format!(
                "unusable CSV delimiter {:?}",
                self.delimiter
            )));
        }

        let table = MembershipTable::build(computation);
        let header = std::iter::once("Element")
            .chain(table.labels.iter().map(|label| label.as_str()))
            .chain(std::iter::once("Result"));

        let mut lines = vec![self.row(header)];
        for row in &table.rows {
            let flags = row
                .membership
                .iter()
                .chain(std::iter::once(&row.in_result))
                .map(|present| flag(*present));
            lines.push(self.row(std::iter::once(row.element.as_str()).chain(flags)));
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }

    fn description(&self) -> &str {
        "Membership table as delimited values"
    }
}
