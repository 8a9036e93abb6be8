//! Structured export documents (JSON and YAML)

use crate::setlab::computation::Computation;
use crate::setlab::elements::display_order;
use crate::setlab::formats::registry::{FormatError, Formatter};
use crate::setlab::operation::Operation;
use crate::setlab::report::{analyze_pairs, PairAnalysis};
use serde::Serialize;
use std::collections::BTreeMap;

/// Serializable view of a computation
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub operation: &'static str,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_label: Option<&'static str>,
    pub sets: BTreeMap<&'static str, Vec<&'a str>>,
    pub result: Vec<&'a str>,
    pub regions: Vec<ExportRegion<'a>>,
    pub analysis: Vec<PairAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct ExportRegion<'a> {
    /// Bit string, one character per label
    pub mask: String,
    /// Subset name such as `AB`; empty for the outside region
    pub name: String,
    pub elements: Vec<&'a str>,
    pub active: bool,
}

impl<'a> ExportDocument<'a> {
    pub fn new(computation: &'a Computation) -> Self {
        let operation = computation.operation();
        let labels = computation.labels();
        let operands = operation.operands();
        let expression = match operation {
            Operation::Expression { source, .. } => Some(source.as_str()),
            _ => None,
        };

        ExportDocument {
            operation: operation.kind().as_str(),
            description: computation.description(),
            expression,
            first_label: operands.map(|(first, _)| first.as_str()),
            second_label: operands.map(|(_, second)| second.as_str()),
            sets: computation
                .sets()
                .iter()
                .map(|(label, set)| (label.as_str(), display_order(set)))
                .collect(),
            result: display_order(computation.result()),
            regions: computation
                .regions()
                .iter()
                .map(|region| ExportRegion {
                    mask: region.mask.to_string(),
                    name: region.mask.name(labels),
                    elements: display_order(&region.elements),
                    active: region.active,
                })
                .collect(),
            analysis: analyze_pairs(computation.sets()),
        }
    }
}

/// Pretty-printed JSON document
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, computation: &Computation) -> Result<String, FormatError> {
        serde_json::to_string_pretty(&ExportDocument::new(computation))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Sets, result, regions and analysis as JSON"
    }
}

/// YAML document with the same shape as the JSON export
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, computation: &Computation) -> Result<String, FormatError> {
        serde_yaml::to_string(&ExportDocument::new(computation))
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Sets, result, regions and analysis as YAML"
    }

    fn extension(&self) -> &str {
        "yml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setlab::sets::{Label, NamedSets};
    use serde_json::Value;

    fn computation(operation: Operation) -> Computation {
        let sets = NamedSets::from_inputs([(Label::A, "10 9 1"), (Label::B, "9 4")]);
        Computation::compute(sets, operation).unwrap()
    }

    #[test]
    fn test_json_document_shape() {
        let json = JsonFormatter
            .serialize(&computation(Operation::Difference {
                first: Label::A,
                second: Label::B,
            }))
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["operation"], "difference");
        assert_eq!(value["first_label"], "A");
        assert_eq!(value["second_label"], "B");
        assert!(value.get("expression").is_none());
        assert_eq!(value["sets"]["A"], serde_json::json!(["1", "9", "10"]));
        assert_eq!(value["result"], serde_json::json!(["1", "10"]));

        let regions = value["regions"].as_array().unwrap();
        assert_eq!(regions.len(), 4);
        assert_eq!(regions[2]["mask"], "10");
        assert_eq!(regions[2]["name"], "A");
        assert_eq!(regions[2]["active"], true);
        assert_eq!(value["analysis"][0]["relation"], "overlapping");
    }

    #[test]
    fn test_json_expression_field() {
        let json = JsonFormatter
            .serialize(&computation(Operation::expression("A ∩ B").unwrap()))
            .unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["expression"], "A ∩ B");
        assert!(value.get("first_label").is_none());
        assert_eq!(value["result"], serde_json::json!(["9"]));
    }

    #[test]
    fn test_yaml_matches_json_content() {
        let computation = computation(Operation::Union);
        let yaml = YamlFormatter.serialize(&computation).unwrap();
        let from_yaml: Value = serde_yaml::from_str(&yaml).unwrap();
        let from_json: Value =
            serde_json::from_str(&JsonFormatter.serialize(&computation).unwrap()).unwrap();
        assert_eq!(from_yaml, from_json);
    }
}
