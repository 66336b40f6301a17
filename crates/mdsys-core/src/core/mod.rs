//! # Core Module
//!
//! The data layer of the library: molecular data structures, typed physical
//! quantities, geometric primitives, and property-name configuration.
//!
//! ## Key Components
//!
//! - [`models`] - Atoms, residues, molecules, and the `MolecularSystem` store
//! - [`units`] - `Length` and `Charge` quantities with canonical units
//! - [`space`] - Periodic boxes and axis-aligned bounding boxes
//! - [`properties`] - The `PropertyMap` logical-name indirection
//! - [`utils`] - Static residue-classification tables

pub mod models;
pub mod properties;
pub mod space;
pub mod units;
pub mod utils;
