//! # Core Models Module
//!
//! The data structures used to represent molecular systems: atoms grouped
//! into residues, residues grouped into molecules, and molecules grouped
//! into a [`system::MolecularSystem`] store with named molecule groups.
//!
//! Coordinates and charges are not stored on atoms directly; they live in
//! per-molecule property bags ([`property::Property`]) keyed by name, so
//! several property sets can coexist on one molecule. Merged dual-topology
//! molecules rely on this to carry divergent endpoint data under `…0`/`…1`
//! key suffixes.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom identity records
//! - [`residue`] - Residues owning atoms in insertion order
//! - [`molecule`] - Molecules owning residues and a property bag
//! - [`property`] - Tagged property values (coordinates, charges, box, ...)
//! - [`system`] - The molecule store with groups, selectors, and counts
//! - [`ids`] - Stable molecule identifiers

pub mod atom;
pub mod ids;
pub mod molecule;
pub mod property;
pub mod residue;
pub mod system;
