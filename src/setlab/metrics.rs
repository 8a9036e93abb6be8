//! Optional code-metrics collaborator
//!
//! PDF reports can embed the output of external static-analysis tools run against a
//! configured target file. Each configured command gets the target appended to its
//! arguments and runs as a subprocess under a timeout. Selected numbers are scraped
//! from the output and explained in plain English.
//!
//! Nothing here can fail the caller: a missing tool, a timeout or a non-zero exit
//! status becomes text in the report.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

static LOC_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"LOC:\s*(\d+)").unwrap());
static COMPLEXITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Average complexity:\s*([A-F])").unwrap());
static MAINTAINABILITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*(\d+(?:\.\d+)?)\s*\)").unwrap());
static QUALITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"rated at (-?\d+(?:\.\d+)?)/10").unwrap());

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
    /// File handed to every analyzer command
    #[serde(default)]
    pub target: Option<PathBuf>,
    #[serde(default)]
    pub commands: Vec<AnalyzerCommand>,
}

impl MetricsConfig {
    /// The target to analyze, when metrics are enabled and a target is set
    pub fn active_target(&self) -> Option<&Path> {
        if self.enabled {
            self.target.as_deref()
        } else {
            None
        }
    }
}

/// One external analyzer invocation
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerCommand {
    pub title: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Which number to scrape from the output; inferred from `args` when absent
    #[serde(default)]
    pub metric: Option<MetricKind>,
}

impl AnalyzerCommand {
    fn metric(&self) -> Option<MetricKind> {
        self.metric.or_else(|| match self.args.first().map(String::as_str) {
            Some("raw") => Some(MetricKind::LinesOfCode),
            Some("cc") => Some(MetricKind::Complexity),
            Some("mi") => Some(MetricKind::Maintainability),
            _ if self.program == "pylint" => Some(MetricKind::Quality),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    LinesOfCode,
    Complexity,
    Maintainability,
    Quality,
}

/// Numbers scraped from analyzer output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CodeMetrics {
    pub lines_of_code: Option<u64>,
    pub complexity_grade: Option<char>,
    pub maintainability: Option<f64>,
    /// Score out of 10
    pub quality: Option<f64>,
}

impl CodeMetrics {
    /// Record the metric of the given kind from `output`, keeping earlier values
    pub fn absorb(&mut self, kind: MetricKind, output: &str) {
        match kind {
            MetricKind::LinesOfCode => {
                self.lines_of_code = self.lines_of_code.or_else(|| capture(&LOC_PATTERN, output));
            }
            MetricKind::Complexity => {
                self.complexity_grade = self.complexity_grade.or_else(|| {
                    COMPLEXITY_PATTERN
                        .captures(output)
                        .and_then(|caps| caps[1].chars().next())
                });
            }
            MetricKind::Maintainability => {
                self.maintainability = self
                    .maintainability
                    .or_else(|| capture(&MAINTAINABILITY_PATTERN, output));
            }
            MetricKind::Quality => {
                self.quality = self.quality.or_else(|| capture(&QUALITY_PATTERN, output));
            }
        }
    }
}

fn capture<T: std::str::FromStr>(pattern: &Regex, output: &str) -> Option<T> {
    pattern
        .captures(output)
        .and_then(|caps| caps[1].parse().ok())
}

/// Output of one analyzer command
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerSection {
    pub title: String,
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsReport {
    pub sections: Vec<AnalyzerSection>,
    pub metrics: CodeMetrics,
}

impl MetricsReport {
    /// Raw analyzer output, one titled section after another
    pub fn render_output(&self) -> String {
        let rule = "=".repeat(30);
        self.sections
            .iter()
            .map(|section| format!("{rule}\n{}\n{rule}\n{}", section.title, section.output.trim_end()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn explanation(&self) -> Vec<String> {
        explain(&self.metrics)
    }
}

/// Plain-English interpretation of the scraped metrics
pub fn explain(metrics: &CodeMetrics) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(loc) = metrics.lines_of_code {
        let size = match loc {
            0..=200 => "small",
            201..=500 => "medium-sized",
            _ => "large",
        };
        lines.push(format!(
            "• Size: the code has {loc} lines. It counts as a {size} project."
        ));
    }

    if let Some(grade) = metrics.complexity_grade {
        let structure = match grade {
            'A' => "excellent",
            'B' => "good",
            'C' => "moderate (watch it)",
            _ => "complex (should be simplified)",
        };
        lines.push(format!(
            "• Complexity: the average grade is {grade}. The program structure is {structure}."
        ));
    }

    if let Some(score) = metrics.maintainability {
        let effort = if score > 50.0 {
            "easy to maintain"
        } else if score > 20.0 {
            "moderately hard to maintain"
        } else {
            "hard to maintain"
        };
        lines.push(format!(
            "• Maintainability: the index is {score:.2}. The code is {effort}."
        ));
    }

    if let Some(score) = metrics.quality {
        lines.push(format!("• Quality: the linter rates the code {score:.2}/10."));
    }

    if lines.is_empty() {
        lines.push("• No metrics could be extracted from the analyzer output.".to_string());
    }
    lines
}

/// Runs the configured analyzers against a target
pub struct MetricsRunner {
    commands: Vec<AnalyzerCommand>,
    timeout: Duration,
}

impl MetricsRunner {
    pub fn new(config: &MetricsConfig) -> Self {
        MetricsRunner {
            commands: config.commands.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Run every analyzer in turn, blocking until all have finished or timed out
    pub fn run(&self, target: &Path) -> MetricsReport {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                log::warn!("code metrics unavailable: {err}");
                return MetricsReport {
                    sections: vec![AnalyzerSection {
                        title: "Code metrics".to_string(),
                        output: format!("Could not start the analyzer runtime: {err}"),
                    }],
                    metrics: CodeMetrics::default(),
                };
            }
        };
        runtime.block_on(self.run_all(target))
    }

    async fn run_all(&self, target: &Path) -> MetricsReport {
        let mut report = MetricsReport::default();
        for command in &self.commands {
            let output = match run_command(command, target, self.timeout).await {
                Ok(output) => {
                    if let Some(kind) = command.metric() {
                        report.metrics.absorb(kind, &output);
                    }
                    output
                }
                Err(message) => {
                    log::warn!("{} failed: {message}", command.title);
                    format!("Error running {}: {message}", command.title)
                }
            };
            report.sections.push(AnalyzerSection {
                title: command.title.clone(),
                output,
            });
        }
        report
    }
}

/// Run one analyzer; stdout comes first, then stderr under a marker
async fn run_command(
    command: &AnalyzerCommand,
    target: &Path,
    limit: Duration,
) -> Result<String, String> {
    log::debug!("running {} {:?} {}", command.program, command.args, target.display());
    let mut process = Command::new(&command.program);
    process.args(&command.args).arg(target).kill_on_drop(true);

    let output = match tokio::time::timeout(limit, process.output()).await {
        Err(_) => return Err(format!("timed out after {}s", limit.as_secs())),
        Ok(Err(err)) => return Err(err.to_string()),
        Ok(Ok(output)) => output,
    };

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str("[stderr]\n");
        text.push_str(&stderr);
    }
    if !output.status.success() && text.trim().is_empty() {
        return Err(format!("exited with {}", output.status));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const RAW_OUTPUT: &str = "main.py\n    LOC: 368\n    LLOC: 250\n    SLOC: 300\n";
    const CC_OUTPUT: &str = "main.py\n    F 12:0 parse - A (3)\n\n1 blocks analyzed.\nAverage complexity: B (6.2)\n";
    const MI_OUTPUT: &str = "main.py - A (87.42)\n";

    #[test]
    fn test_absorb_extracts_metrics() {
        let mut metrics = CodeMetrics::default();
        metrics.absorb(MetricKind::LinesOfCode, RAW_OUTPUT);
        metrics.absorb(MetricKind::Complexity, CC_OUTPUT);
        metrics.absorb(MetricKind::Maintainability, MI_OUTPUT);
        metrics.absorb(MetricKind::Quality, "Your code has been rated at 6.50/10");
        assert_eq!(metrics.lines_of_code, Some(368));
        assert_eq!(metrics.complexity_grade, Some('B'));
        assert_eq!(metrics.maintainability, Some(87.42));
        assert_eq!(metrics.quality, Some(6.5));
    }

    #[test]
    fn test_absorb_keeps_first_value() {
        let mut metrics = CodeMetrics::default();
        metrics.absorb(MetricKind::LinesOfCode, "LOC: 10");
        metrics.absorb(MetricKind::LinesOfCode, "LOC: 20");
        assert_eq!(metrics.lines_of_code, Some(10));
    }

    #[test]
    fn test_absorb_ignores_unrelated_output() {
        let mut metrics = CodeMetrics::default();
        metrics.absorb(MetricKind::Maintainability, "no score here");
        metrics.absorb(MetricKind::Complexity, "Average complexity: unknown");
        assert_eq!(metrics, CodeMetrics::default());
    }

    #[test]
    fn test_explain_bands() {
        let metrics = CodeMetrics {
            lines_of_code: Some(368),
            complexity_grade: Some('A'),
            maintainability: Some(42.0),
            quality: None,
        };
        let lines = explain(&metrics);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("368 lines") && lines[0].contains("medium-sized"));
        assert!(lines[1].contains("excellent"));
        assert!(lines[2].contains("42.00") && lines[2].contains("moderately hard"));
        assert_eq!(explain(&CodeMetrics::default()).len(), 1);
    }

    #[test]
    fn test_metric_inferred_from_args() {
        let command = |program: &str, args: &[&str]| AnalyzerCommand {
            title: String::new(),
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            metric: None,
        };
        assert_eq!(command("radon", &["raw"]).metric(), Some(MetricKind::LinesOfCode));
        assert_eq!(command("radon", &["cc", "-a"]).metric(), Some(MetricKind::Complexity));
        assert_eq!(command("pylint", &["--reports=y"]).metric(), Some(MetricKind::Quality));
        assert_eq!(command("radon", &["hal"]).metric(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_runner_collects_output() {
        let config = MetricsConfig {
            enabled: true,
            timeout_secs: 5,
            target: None,
            commands: vec![AnalyzerCommand {
                title: "Echo".to_string(),
                program: "echo".to_string(),
                args: vec!["LOC: 42".to_string()],
                metric: Some(MetricKind::LinesOfCode),
            }],
        };
        let report = MetricsRunner::new(&config).run(Path::new("target.py"));
        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].output.trim(), "LOC: 42 target.py");
        assert_eq!(report.metrics.lines_of_code, Some(42));
    }

    #[test]
    fn test_runner_reports_missing_tool() {
        let config = MetricsConfig {
            enabled: true,
            timeout_secs: 5,
            target: None,
            commands: vec![AnalyzerCommand {
                title: "Missing".to_string(),
                program: "setlab-no-such-analyzer".to_string(),
                args: Vec::new(),
                metric: None,
            }],
        };
        let report = MetricsRunner::new(&config).run(Path::new("target.py"));
        assert!(report.sections[0].output.starts_with("Error running Missing:"));
        assert_eq!(report.metrics, CodeMetrics::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_runner_times_out() {
        let config = MetricsConfig {
            enabled: true,
            timeout_secs: 1,
            target: None,
            commands: vec![AnalyzerCommand {
                title: "Slow".to_string(),
                program: "sleep".to_string(),
                args: Vec::new(),
                metric: None,
            }],
        };
        // `sleep 5` once the target is appended
        let report = MetricsRunner::new(&config).run(Path::new("5"));
        assert!(report.sections[0].output.contains("timed out after 1s"));
    }

    #[test]
    fn test_render_output() {
        let report = MetricsReport {
            sections: vec![AnalyzerSection {
                title: "Raw".to_string(),
                output: "LOC: 1\n".to_string(),
            }],
            metrics: CodeMetrics::default(),
        };
        let rule = "=".repeat(30);
        assert_eq!(report.render_output(), format!("{rule}\nRaw\n{rule}\nLOC: 1"));
    }
}
