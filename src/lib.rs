//! # setlab
//!
//! A finite-set algebra workbench: parse sets of elements, combine them with union,
//! intersection, difference, symmetric difference or a free-form expression, and
//! inspect the result as Venn regions, a membership table, a written analysis and
//! exports (text, CSV, JSON, YAML, PDF).
//!
//! Everything lives under the [`setlab`] module; see its docs for the data flow.

pub mod setlab;
