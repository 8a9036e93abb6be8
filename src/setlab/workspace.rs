//! Editable workspace state
//!
//! The workspace holds what a user typed: the set count, one raw text per label and the
//! operation choice. Every compute rebuilds the named sets from that text. A failed
//! compute leaves the previous [`Computation`] in place.

use crate::setlab::computation::Computation;
use crate::setlab::error::SetlabError;
use crate::setlab::operation::OperationChoice;
use crate::setlab::sets::{Label, NamedSets, SetCount};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    count: SetCount,
    inputs: BTreeMap<Label, String>,
    choice: OperationChoice,
    last: Option<Computation>,
}

impl Workspace {
    pub fn new(count: SetCount) -> Self {
        Workspace {
            count,
            ..Self::default()
        }
    }

    pub fn count(&self) -> SetCount {
        self.count
    }

    /// Change the number of active sets; text of labels that stay active is kept
    pub fn set_count(&mut self, count: SetCount) {
        self.count = count;
        let active = count.labels();
        self.inputs.retain(|label, _| active.contains(label));
    }

    pub fn labels(&self) -> &'static [Label] {
        self.count.labels()
    }

    /// Replace the raw text for one set
    pub fn set_input(&mut self, label: Label, raw: impl Into<String>) -> Result<(), SetlabError> {
        if !self.labels().contains(&label) {
            return Err(SetlabError::InvalidLabel(format!(
                "{label} (only {} sets are active)",
                self.count
            )));
        }
        self.inputs.insert(label, raw.into());
        Ok(())
    }

    pub fn input(&self, label: Label) -> &str {
        self.inputs.get(&label).map(String::as_str).unwrap_or("")
    }

    pub fn choice(&self) -> &OperationChoice {
        &self.choice
    }

    pub fn choose(&mut self, choice: OperationChoice) {
        self.choice = choice;
    }

    /// Parse the raw inputs of the active labels
    pub fn read_sets(&self) -> NamedSets {
        NamedSets::from_inputs(self.labels().iter().map(|label| (*label, self.input(*label))))
    }

    /// Rebuild the sets, evaluate, and store the new snapshot
    pub fn compute(&mut self) -> Result<&Computation, SetlabError> {
        let operation = self.choice.resolve()?;
        let computation = Computation::compute(self.read_sets(), operation)?;
        let computation: &Computation = self.last.insert(computation);
        Ok(computation)
    }

    /// The last successful computation
    pub fn last(&self) -> Option<&Computation> {
        self.last.as_ref()
    }

    /// The last computation, computing first if there is none yet
    pub fn ensure_computed(&mut self) -> Result<&Computation, SetlabError> {
        let computation = match self.last.take() {
            Some(computation) => computation,
            None => {
                log::debug!("no computation yet, computing before export");
                Computation::compute(self.read_sets(), self.choice.resolve()?)?
            }
        };
        let computation: &Computation = self.last.insert(computation);
        Ok(computation)
    }

    /// Forget all inputs and results
    pub fn clear(&mut self) {
        *self = Workspace::new(self.count);
    }
}
