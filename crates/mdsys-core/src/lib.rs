//! # mdsys
//!
//! An in-memory molecular system container for assembling and editing systems
//! ahead of molecular-dynamics and free-energy simulations.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a clear separation of concerns:
//!
//! - **[`core`]: The Data Layer.** Contains the molecular data model
//!   (`MolecularSystem`, `Molecule`, `Residue`, `Atom`), typed physical
//!   quantities (`Length`, `Charge`), geometric primitives (`PeriodicBox`,
//!   `AABox`), and the `PropertyMap` configuration used to resolve logical
//!   property names against heterogeneous file-format conventions.
//!
//! - **[`system`]: The Public API.** The [`system::System`] container owns a
//!   data-layer system and exposes the editing operations callers work with:
//!   adding, removing, and updating molecules, selector queries, charge
//!   aggregation, periodic-box management, translation, renumbering for
//!   cross-system merges, and coordinate propagation between compatible
//!   systems.
//!
//! Merged dual-topology molecules (used for free-energy perturbation) carry
//! divergent per-endpoint properties under `…0`/`…1` key suffixes; the
//! container resolves these automatically wherever a lambda endpoint is
//! relevant.

pub mod core;
pub mod system;
