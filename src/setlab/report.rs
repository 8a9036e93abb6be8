//! Textual reports over a computation
//!
//! Everything here is a pure function of a [`Computation`]: the membership table, the
//! pairwise relation analysis and the templated summary. [`Report`] assembles them into
//! the text export and into titled blocks for paged output.

use crate::setlab::computation::Computation;
use crate::setlab::elements::{display_order, format_set, sorted_universe, ElementSet};
use crate::setlab::operation::Operation;
use crate::setlab::sets::{Label, NamedSets};
use serde::Serialize;

const PRESENT: &str = "✓";
const ABSENT: &str = ".";

/// One universe element and the sets it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipRow {
    pub element: String,
    pub membership: Vec<bool>,
    pub in_result: bool,
}

/// Element-by-set presence grid, rows sorted by length then lexically
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipTable {
    pub labels: Vec<Label>,
    pub rows: Vec<MembershipRow>,
}

impl MembershipTable {
    pub fn build(computation: &Computation) -> Self {
        let labels = computation.labels().to_vec();
        let universe = computation.universe();
        let rows = sorted_universe(&universe)
            .into_iter()
            .map(|element| MembershipRow {
                element: element.to_string(),
                membership: labels
                    .iter()
                    .map(|label| {
                        computation
                            .sets()
                            .get(*label)
                            .is_some_and(|set| set.contains(element))
                    })
                    .collect(),
                in_result: computation.result().contains(element),
            })
            .collect();
        MembershipTable { labels, rows }
    }

    pub fn render(&self) -> String {
        let mut header = format!("{:<10}", "Element");
        for label in &self.labels {
            header.push_str(&format!("{:^6}", label.as_str()));
        }
        header.push_str(&format!("{:^6}", "Result"));

        let mut lines = vec![
            "MEMBERSHIP TABLE".to_string(),
            header.trim_end().to_string(),
            "-".repeat(header.chars().count()),
        ];
        for row in &self.rows {
            let mut line = format!("{:<10}", row.element);
            for present in row.membership.iter().chain(std::iter::once(&row.in_result)) {
                line.push_str(&format!("{:^6}", marker(*present)));
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }
}

fn marker(present: bool) -> &'static str {
    if present {
        PRESENT
    } else {
        ABSENT
    }
}

/// How two sets relate, checked in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Equal,
    Subset,
    Superset,
    Disjoint,
    Overlapping,
}

impl Relation {
    pub fn classify(first: &ElementSet, second: &ElementSet) -> Self {
        if first == second {
            Relation::Equal
        } else if first.is_subset(second) {
            Relation::Subset
        } else if first.is_superset(second) {
            Relation::Superset
        } else if first.is_disjoint(second) {
            Relation::Disjoint
        } else {
            Relation::Overlapping
        }
    }
}

/// Relation and overlap statistics for one unordered pair of sets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAnalysis {
    pub first: Label,
    pub second: Label,
    pub relation: Relation,
    pub first_size: usize,
    pub second_size: usize,
    pub intersection_size: usize,
    pub union_size: usize,
    /// |X∩Y| / |X∪Y|, 0 when both sets are empty
    pub jaccard: f64,
    /// |X∩Y| as a percentage of the union of all sets
    pub intersection_percent: f64,
    pub only_first: Vec<String>,
    pub only_second: Vec<String>,
}

impl PairAnalysis {
    pub fn new(first: Label, a: &ElementSet, second: Label, b: &ElementSet, universe_size: usize) -> Self {
        let intersection_size = a.intersection(b).count();
        let union_size = a.union(b).count();
        let jaccard = if union_size == 0 {
            0.0
        } else {
            intersection_size as f64 / union_size as f64
        };
        let only = |x: &ElementSet, y: &ElementSet| -> Vec<String> {
            let only: ElementSet = x.difference(y).cloned().collect();
            display_order(&only).into_iter().map(str::to_string).collect()
        };
        PairAnalysis {
            first,
            second,
            relation: Relation::classify(a, b),
            first_size: a.len(),
            second_size: b.len(),
            intersection_size,
            union_size,
            jaccard,
            intersection_percent: intersection_size as f64 / universe_size.max(1) as f64 * 100.0,
            only_first: only(a, b),
            only_second: only(b, a),
        }
    }

    fn relation_text(&self) -> String {
        match self.relation {
            Relation::Equal => "are equal.".to_string(),
            Relation::Subset => format!("{} is a subset of {}.", self.first, self.second),
            Relation::Superset => format!("{} is a subset of {}.", self.second, self.first),
            Relation::Disjoint => "are disjoint (no common elements).".to_string(),
            Relation::Overlapping => {
                "share some elements, but neither is a subset of the other.".to_string()
            }
        }
    }

    pub fn render(&self) -> Vec<String> {
        let (x, y) = (self.first, self.second);
        let mut lines = vec![format!(
            "- {x} and {y}: {} | |{x}|={}, |{y}|={}, |{x}∩{y}|={}, |{x}∪{y}|={}, Jaccard={:.2}, {x}∩{y} ≈ {:.1}% of the universe.",
            self.relation_text(),
            self.first_size,
            self.second_size,
            self.intersection_size,
            self.union_size,
            self.jaccard,
            self.intersection_percent,
        )];
        if !self.only_first.is_empty() {
            lines.push(format!("    Only in {x}: {}", self.only_first.join(", ")));
        }
        if !self.only_second.is_empty() {
            lines.push(format!("    Only in {y}: {}", self.only_second.join(", ")));
        }
        lines
    }
}

/// Analyse every unordered pair of sets, in label order
pub fn analyze_pairs(sets: &NamedSets) -> Vec<PairAnalysis> {
    let universe_size = sets.union_all().len();
    let bound: Vec<(Label, &ElementSet)> = sets.iter().collect();
    let mut pairs = Vec::new();
    for (i, (first, a)) in bound.iter().enumerate() {
        for (second, b) in &bound[i + 1..] {
            pairs.push(PairAnalysis::new(*first, a, *second, b, universe_size));
        }
    }
    pairs
}

fn render_analysis(pairs: &[PairAnalysis]) -> String {
    let mut lines = vec!["PAIRWISE ANALYSIS:".to_string()];
    if pairs.is_empty() {
        lines.push("Not enough sets to compare.".to_string());
    }
    lines.extend(pairs.iter().flat_map(PairAnalysis::render));
    lines.join("\n")
}

/// Templated sentences describing the result of the operation
pub fn summarize(computation: &Computation) -> Vec<String> {
    let sets = computation.sets();
    let result = computation.result();
    let size = |label: Label| sets.get(label).map_or(0, |set| set.len());

    match computation.operation() {
        Operation::Union => {
            let mut lines = vec![format!(
                "- The union contains {} element(s) out of {} possible.",
                result.len(),
                sets.union_all().len()
            )];
            let largest = computation
                .labels()
                .iter()
                .copied()
                .fold(None, |best: Option<Label>, label| match best {
                    Some(best) if size(best) >= size(label) => Some(best),
                    _ => Some(label),
                });
            if let Some(label) = largest {
                lines.push(format!(
                    "- The largest set is {label} with {} element(s).",
                    size(label)
                ));
            }
            lines
        }
        Operation::Intersection => {
            if result.is_empty() {
                vec!["- The intersection is empty: the sets share no elements.".to_string()]
            } else {
                vec![format!(
                    "- The intersection has {} element(s): {}",
                    result.len(),
                    format_set(result)
                )]
            }
        }
        Operation::Difference { first, second } => vec![
            format!("- Elements of {second} were removed from {first}."),
            format!(
                "- {first} had {} element(s); {} remain after the difference.",
                size(*first),
                result.len()
            ),
        ],
        Operation::SymmetricDifference { first, second } => vec![
            format!(
                "- The symmetric difference {first} Δ {second} contains the elements that are in one of the two sets, but not in both."
            ),
            format!(
                "- The result has {} element(s): {}",
                result.len(),
                format_set(result)
            ),
        ],
        Operation::Expression { source, .. } => {
            let mut lines = vec![format!(
                "- The expression {source} yields {} element(s): {}",
                result.len(),
                format_set(result)
            )];
            let labels = computation.labels();
            let covered: Vec<String> = computation
                .regions()
                .active_regions()
                .map(|region| region.mask.describe(labels))
                .collect();
            if covered.is_empty() {
                lines.push("- No Venn region is covered by the expression.".to_string());
            } else {
                lines.push(format!("- Regions covered: {}.", covered.join(", ")));
            }
            lines
        }
    }
}

/// Full report for one computation
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub description: String,
    pub sets: Vec<(Label, String)>,
    pub result: String,
    pub table: MembershipTable,
    pub analysis: Vec<PairAnalysis>,
    pub summary: Vec<String>,
}

impl Report {
    pub fn build(computation: &Computation) -> Self {
        Report {
            description: computation.description(),
            sets: computation
                .sets()
                .iter()
                .map(|(label, set)| (label, format_set(set)))
                .collect(),
            result: format_set(computation.result()),
            table: MembershipTable::build(computation),
            analysis: analyze_pairs(computation.sets()),
            summary: summarize(computation),
        }
    }

    fn sets_block(&self) -> String {
        let mut lines = vec!["Sets:".to_string()];
        lines.extend(self.sets.iter().map(|(label, set)| format!("{label} = {set}")));
        lines.push(String::new());
        lines.push("Result:".to_string());
        lines.push(format!("R = {}", self.result));
        lines.join("\n")
    }

    fn summary_block(&self) -> String {
        let mut lines = vec!["SUMMARY:".to_string()];
        lines.extend(self.summary.iter().cloned());
        lines.join("\n")
    }

    /// Titled blocks in reading order
    pub fn sections(&self) -> Vec<(String, String)> {
        vec![
            (
                "Operation".to_string(),
                format!("{}\n\n{}", self.description, self.sets_block()),
            ),
            ("Membership table".to_string(), self.table.render()),
            ("Pairwise analysis".to_string(), render_analysis(&self.analysis)),
            ("Summary".to_string(), self.summary_block()),
        ]
    }

    /// The report as plain text
    pub fn render_text(&self) -> String {
        let blocks = [
            format!("Operation: {}", self.description),
            self.sets_block(),
            self.table.render(),
            render_analysis(&self.analysis),
            self.summary_block(),
        ];
        let mut text = blocks.join("\n\n");
        text.push('\n');
        text
    }
}
