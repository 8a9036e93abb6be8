//! Immutable compute snapshot
//!
//! A [`Computation`] is produced by one compute call and handed by reference to every
//! downstream consumer (diagram, report, exporters). It is never mutated; the next
//! compute simply produces a new one.

use crate::setlab::elements::ElementSet;
use crate::setlab::error::ExpressionError;
use crate::setlab::expression::Evaluate;
use crate::setlab::operation::Operation;
use crate::setlab::region::RegionPartition;
use crate::setlab::sets::{Label, NamedSets};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computation {
    sets: NamedSets,
    operation: Operation,
    result: ElementSet,
    regions: RegionPartition,
}

impl Computation {
    /// Evaluate the operation and classify every Venn region
    pub fn compute(sets: NamedSets, operation: Operation) -> Result<Self, ExpressionError> {
        let result = operation.evaluate(&sets)?;
        let regions = RegionPartition::new(&sets, &operation);
        log::debug!(
            "computed {} over {} sets: {} elements, {} active regions",
            operation.kind(),
            sets.len(),
            result.len(),
            regions.active_regions().count()
        );
        Ok(Computation {
            sets,
            operation,
            result,
            regions,
        })
    }

    pub fn sets(&self) -> &NamedSets {
        &self.sets
    }

    pub fn labels(&self) -> &[Label] {
        self.regions.labels()
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn result(&self) -> &ElementSet {
        &self.result
    }

    pub fn regions(&self) -> &RegionPartition {
        &self.regions
    }

    /// Union of all sets and the result
    pub fn universe(&self) -> ElementSet {
        let mut universe = self.sets.union_all();
        universe.extend(self.result.iter().cloned());
        universe
    }

    pub fn description(&self) -> String {
        self.operation.describe(self.labels())
    }
}
