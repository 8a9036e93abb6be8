//! Venn region enumeration
//!
//! For n active sets there are 2^n disjoint regions, one per membership bitmask. Each
//! region gets two facts:
//!
//! - its concrete members, obtained by intersecting or subtracting every set in turn
//!   starting from the union of all sets;
//! - whether it belongs to the operation's result, obtained by probe evaluation: every
//!   label is bound to `{"x"}` or `{}` according to the mask, and the region is active
//!   when the probe element survives.
//!
//! Set algebra over a single marker element is boolean algebra on its membership bit,
//! so one evaluator classifies every region without a per-n formula.

use crate::setlab::elements::{Element, ElementSet};
use crate::setlab::expression::Evaluate;
use crate::setlab::sets::{Label, NamedSets};
use std::fmt;

/// Marker element used for probe evaluation
pub const PROBE_ELEMENT: &str = "x";

/// Membership bitmask; bit `i` refers to label `i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionMask {
    bits: u8,
    len: u8,
}

impl RegionMask {
    /// Mask of `len` bits with the given label indices set
    ///
    /// `len` is capped at the number of labels; indices past it are ignored.
    pub fn new(len: usize, members: impl IntoIterator<Item = usize>) -> Self {
        let len = len.min(Label::ALL.len());
        let bits = members
            .into_iter()
            .filter(|index| *index < len)
            .fold(0u8, |bits, index| bits | (1 << index));
        RegionMask {
            bits,
            len: len as u8,
        }
    }

    /// Parse a bit string such as `101`
    pub fn parse(bits: &str) -> Option<Self> {
        if bits.is_empty() || bits.len() > Label::ALL.len() {
            return None;
        }
        let mut members = Vec::new();
        for (index, ch) in bits.chars().enumerate() {
            match ch {
                '1' => members.push(index),
                '0' => {}
                _ => return None,
            }
        }
        Some(RegionMask::new(bits.len(), members))
    }

    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// True when the mask lies outside every set
    pub fn is_outside(&self) -> bool {
        self.bits == 0
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len() && self.bits & (1 << index) != 0
    }

    /// Number of sets the region lies in
    pub fn degree(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Labels the region lies in
    pub fn members(&self, labels: &[Label]) -> Vec<Label> {
        labels
            .iter()
            .enumerate()
            .filter(|(index, _)| self.contains(*index))
            .map(|(_, label)| *label)
            .collect()
    }

    /// Subset name such as `AB`; empty for the outside region
    pub fn name(&self, labels: &[Label]) -> String {
        self.members(labels).iter().map(|label| label.as_str()).collect()
    }

    /// Readable description such as `A only` or `A∩C`
    pub fn describe(&self, labels: &[Label]) -> String {
        let members = self.members(labels);
        match members.as_slice() {
            [] => "outside all sets".to_string(),
            [single] => format!("{single} only"),
            many => many
                .iter()
                .map(|label| label.as_str())
                .collect::<Vec<_>>()
                .join("∩"),
        }
    }
}

/// Renders the mask as a bit string, label 0 first
impl fmt::Display for RegionMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.len() {
            f.write_str(if self.contains(index) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// All 2^n masks in ascending binary order of their bit strings
pub fn enumerate_regions(n: usize) -> Vec<RegionMask> {
    let n = n.min(Label::ALL.len());
    (0..1usize << n)
        .map(|value| RegionMask::new(n, (0..n).filter(|index| value & (1 << (n - 1 - index)) != 0)))
        .collect()
}

/// Elements that lie in exactly the sets named by the mask
pub fn region_elements(sets: &NamedSets, labels: &[Label], mask: RegionMask) -> ElementSet {
    let mut members = sets.union_all();
    for (index, label) in labels.iter().enumerate() {
        let Some(set) = sets.get(*label) else {
            continue;
        };
        if mask.contains(index) {
            members.retain(|element| set.contains(element));
        } else {
            members.retain(|element| !set.contains(element));
        }
    }
    members
}

/// Environment binding each label to `{"x"}` or `{}` according to the mask
pub fn probe_sets(labels: &[Label], mask: RegionMask) -> NamedSets {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let set = if mask.contains(index) {
                ElementSet::from([Element::from(PROBE_ELEMENT)])
            } else {
                ElementSet::new()
            };
            (*label, set)
        })
        .collect()
}

/// Whether the region belongs to the operation's result
///
/// Evaluation failures classify the region as inactive.
pub fn is_region_active<E>(operation: &E, labels: &[Label], mask: RegionMask) -> bool
where
    E: Evaluate + ?Sized,
{
    match operation.evaluate(&probe_sets(labels, mask)) {
        Ok(result) => result.contains(PROBE_ELEMENT),
        Err(err) => {
            log::debug!("probe for region {mask} failed: {err}");
            false
        }
    }
}

/// One cell of the Venn partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub mask: RegionMask,
    pub elements: ElementSet,
    pub active: bool,
}

/// Every region for a set of labels, in [`enumerate_regions`] order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPartition {
    labels: Vec<Label>,
    regions: Vec<Region>,
}

impl RegionPartition {
    pub fn new<E>(sets: &NamedSets, operation: &E) -> Self
    where
        E: Evaluate + ?Sized,
    {
        let labels = sets.labels();
        let regions = enumerate_regions(labels.len())
            .into_iter()
            .map(|mask| Region {
                mask,
                elements: region_elements(sets, &labels, mask),
                active: is_region_active(operation, &labels, mask),
            })
            .collect();
        RegionPartition { labels, regions }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn get(&self, mask: RegionMask) -> Option<&Region> {
        self.regions.iter().find(|region| region.mask == mask)
    }

    /// Region whose subset name is `name` (e.g. `AC`)
    pub fn by_name(&self, name: &str) -> Option<&Region> {
        self.regions
            .iter()
            .find(|region| region.mask.name(&self.labels) == name)
    }

    pub fn active_regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|region| region.active)
    }

    /// Union of the members of every active region
    pub fn active_elements(&self) -> ElementSet {
        self.active_regions()
            .flat_map(|region| region.elements.iter().cloned())
            .collect()
    }
}
