//! Finite-set workbench
//!
//! Up to four labelled sets (`A` to `D`) are combined with a fixed operation or a
//! free-form set expression. One compute call produces an immutable [`Computation`]:
//! the result plus every Venn region with its members and whether it belongs to the
//! result. Diagrams, reports and exports all read from that snapshot.
//!
//! Data flows one way:
//!
//! ```text
//! raw text --elements--> NamedSets --operation/expression--> result
//!                                  \--region--> RegionPartition
//!            Computation --> diagram | report | formats
//! ```
//!
//! [`Workspace`] keeps the raw inputs between computes and [`project`] persists them.

pub mod computation;
pub mod diagram;
pub mod elements;
pub mod error;
pub mod expression;
pub mod formats;
pub mod layout;
pub mod metrics;
pub mod operation;
pub mod project;
pub mod region;
pub mod report;
pub mod sets;
pub mod settings;
pub mod workspace;

pub use computation::Computation;
pub use elements::{parse_set_input, ElementSet};
pub use error::{ExpressionError, SetlabError};
pub use operation::{Operation, OperationChoice, OperationKind};
pub use region::{RegionMask, RegionPartition};
pub use sets::{Label, NamedSets, SetCount};
pub use workspace::Workspace;
