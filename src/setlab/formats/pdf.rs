//! Paged PDF report
//!
//! The report sections are flowed onto pages by [`flow`] and serialized by [`writer`].
//! When code metrics are enabled in the configuration and a target is set, the
//! analyzer output and its interpretation follow on a new page.

pub mod flow;
pub mod writer;

use crate::setlab::computation::Computation;
use crate::setlab::formats::registry::{FormatError, Formatter};
use crate::setlab::metrics::{MetricsConfig, MetricsRunner};
use crate::setlab::report::Report;
use crate::setlab::settings::{PageSize, SetlabConfig};
use flow::{PageFlow, PageGeometry};

pub const DEFAULT_TITLE: &str = "Finite set workbench";

pub struct PdfFormatter {
    page_size: PageSize,
    title: String,
    metrics: Option<MetricsConfig>,
}

impl PdfFormatter {
    pub fn new(page_size: PageSize, title: impl Into<String>) -> Self {
        PdfFormatter {
            page_size,
            title: title.into(),
            metrics: None,
        }
    }

    pub fn from_config(config: &SetlabConfig) -> Self {
        PdfFormatter {
            page_size: config.pdf.page_size,
            title: config.pdf.title.clone(),
            metrics: Some(config.metrics.clone()),
        }
    }

    /// Lay the report out into pages without serializing
    pub fn layout(&self, computation: &Computation) -> Vec<flow::Page> {
        let mut flow = PageFlow::new(PageGeometry::new(self.page_size));
        flow.title(&self.title);
        for (heading, body) in Report::build(computation).sections() {
            flow.block(&heading, &body);
        }

        if let Some(metrics) = &self.metrics {
            if let Some(target) = metrics.active_target() {
                log::info!("running code metrics on {}", target.display());
                let report = MetricsRunner::new(metrics).run(target);
                flow.page_break();
                flow.block("Code analysis", &report.render_output());
                flow.block("Interpretation", &report.explanation().join("\n"));
            }
        }
        flow.finish()
    }
}

impl Default for PdfFormatter {
    fn default() -> Self {
        Self::new(PageSize::A4, DEFAULT_TITLE)
    }
}

impl Formatter for PdfFormatter {
    fn name(&self) -> &str {
        "pdf"
    }

    fn serialize(&self, computation: &Computation) -> Result<String, FormatError> {
        let pages = self.layout(computation);
        Ok(writer::render(&pages, PageGeometry::new(self.page_size)))
    }

    fn description(&self) -> &str {
        "Paged report document"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setlab::metrics::AnalyzerCommand;
    use crate::setlab::operation::Operation;
    use crate::setlab::sets::{Label, NamedSets};

    fn computation() -> Computation {
        let sets = NamedSets::from_inputs([(Label::A, "1 2 3"), (Label::B, "3 4")]);
        Computation::compute(sets, Operation::Union).unwrap()
    }

    fn page_texts(pages: &[flow::Page]) -> Vec<Vec<String>> {
        pages
            .iter()
            .map(|page| page.runs.iter().map(|run| run.text.clone()).collect())
            .collect()
    }

    #[test]
    fn test_report_sections_in_order() {
        let pages = PdfFormatter::default().layout(&computation());
        assert_eq!(pages.len(), 1);
        let texts = &page_texts(&pages)[0];
        assert_eq!(texts[0], DEFAULT_TITLE);
        assert_eq!(texts[1], "Operation");
        assert_eq!(texts[2], "UNION: A ∪ B");

        let headings: Vec<&str> = pages[0]
            .runs
            .iter()
            .filter(|run| run.font == flow::Font::Bold)
            .map(|run| run.text.as_str())
            .collect();
        assert_eq!(
            headings,
            vec![
                DEFAULT_TITLE,
                "Operation",
                "Membership table",
                "Pairwise analysis",
                "Summary"
            ]
        );
    }

    #[test]
    fn test_serialize_produces_pdf() {
        let pdf = PdfFormatter::new(PageSize::Letter, "Sets")
            .serialize(&computation())
            .unwrap();
        assert!(pdf.starts_with("%PDF-1.4"));
        assert!(pdf.contains("/MediaBox [0 0 612.00 792.00]"));
        assert!(pdf.contains("(Sets) Tj"));
        assert!(pdf.contains("(UNION: A | B) Tj"));
    }

    #[cfg(unix)]
    #[test]
    fn test_metrics_page_appended_when_enabled() {
        let metrics = MetricsConfig {
            enabled: true,
            timeout_secs: 5,
            target: Some("target.py".into()),
            commands: vec![AnalyzerCommand {
                title: "Echo".to_string(),
                program: "echo".to_string(),
                args: vec!["LOC: 42".to_string()],
                metric: Some(crate::setlab::metrics::MetricKind::LinesOfCode),
            }],
        };
        let formatter = PdfFormatter {
            page_size: PageSize::A4,
            title: DEFAULT_TITLE.to_string(),
            metrics: Some(metrics),
        };
        let pages = formatter.layout(&computation());
        assert_eq!(pages.len(), 2);
        let texts = &page_texts(&pages)[1];
        assert_eq!(texts[0], "Code analysis");
        assert!(texts.iter().any(|text| text.starts_with("LOC: 42")));
        assert!(texts.iter().any(|text| text == "Interpretation"));
        assert!(texts
            .iter()
            .any(|text| text.contains("the code has 42 lines")));
    }

    #[test]
    fn test_metrics_skipped_when_disabled() {
        let metrics = MetricsConfig {
            enabled: false,
            timeout_secs: 5,
            target: Some("target.py".into()),
            commands: Vec::new(),
        };
        let formatter = PdfFormatter {
            page_size: PageSize::A4,
            title: DEFAULT_TITLE.to_string(),
            metrics: Some(metrics),
        };
        assert_eq!(formatter.layout(&computation()).len(), 1);
    }
}
