//! Set labels and the named-set environment
//!
//! A workspace has 2, 3 or 4 active sets. Their labels are always the first n of
//! `A`, `B`, `C`, `D`, in that order, so the label position doubles as the bit index
//! used for Venn regions.

use crate::setlab::elements::{parse_set_input, ElementSet};
use crate::setlab::error::SetlabError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Name of one user-entered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Label {
    A,
    B,
    C,
    D,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::A, Label::B, Label::C, Label::D];

    /// Position of the label, which is also its bit index in a region mask
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::A => "A",
            Label::B => "B",
            Label::C => "C",
            Label::D => "D",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = SetlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Label::A),
            "B" => Ok(Label::B),
            "C" => Ok(Label::C),
            "D" => Ok(Label::D),
            other => Err(SetlabError::InvalidLabel(other.to_string())),
        }
    }
}

/// Number of active sets, always between 2 and 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetCount(usize);

impl SetCount {
    pub const MIN: usize = 2;
    pub const MAX: usize = 4;

    pub fn new(count: usize) -> Result<Self, SetlabError> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(SetCount(count))
        } else {
            Err(SetlabError::InvalidSetCount(count))
        }
    }

    pub fn get(self) -> usize {
        self.0
    }

    /// The active labels, in bit order
    pub fn labels(self) -> &'static [Label] {
        &Label::ALL[..self.0]
    }
}

impl Default for SetCount {
    fn default() -> Self {
        SetCount(Self::MIN)
    }
}

impl fmt::Display for SetCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mapping from label to its concrete element set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedSets {
    sets: BTreeMap<Label, ElementSet>,
}

impl NamedSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build sets from raw input text, one entry per label
    pub fn from_inputs<'a, I>(inputs: I) -> Self
    where
        I: IntoIterator<Item = (Label, &'a str)>,
    {
        inputs
            .into_iter()
            .map(|(label, raw)| (label, parse_set_input(raw)))
            .collect()
    }

    pub fn insert(&mut self, label: Label, set: ElementSet) -> Option<ElementSet> {
        self.sets.insert(label, set)
    }

    pub fn get(&self, label: Label) -> Option<&ElementSet> {
        self.sets.get(&label)
    }

    /// Labels that are bound, in bit order
    pub fn labels(&self) -> Vec<Label> {
        self.sets.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, &ElementSet)> {
        self.sets.iter().map(|(label, set)| (*label, set))
    }

    /// Union of every bound set
    pub fn union_all(&self) -> ElementSet {
        self.sets.values().flatten().cloned().collect()
    }

    /// Intersection of every bound set; empty when nothing is bound
    pub fn intersection_all(&self) -> ElementSet {
        let mut values = self.sets.values();
        let Some(first) = values.next() else {
            return ElementSet::new();
        };
        values.fold(first.clone(), |mut acc, set| {
            acc.retain(|element| set.contains(element));
            acc
        })
    }
}

impl FromIterator<(Label, ElementSet)> for NamedSets {
    fn from_iter<T: IntoIterator<Item = (Label, ElementSet)>>(iter: T) -> Self {
        NamedSets {
            sets: iter.into_iter().collect(),
        }
    }
}
