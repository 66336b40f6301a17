use thiserror::Error;

/// Errors raised by the [`System`](super::System) container.
///
/// Structural validation failures are raised immediately and never retried.
/// Best-effort aggregate queries (total charge, box retrieval) do not use
/// this type; they fold per-item absence into their result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("No molecule group named '{name}' in the system")]
    GroupNotFound { name: String },

    #[error("System does not contain a residue named '{name}'")]
    ResidueNotFound { name: String },

    #[error("Box size must contain exactly 3 lengths, found {found}")]
    InvalidBoxDimensions { found: usize },

    #[error("A molecule numbered {number} already exists in the system")]
    DuplicateMoleculeNumber { number: usize },

    #[error("Molecule count mismatch between systems: expected {expected}, found {found}")]
    MoleculeCountMismatch { expected: usize, found: usize },

    #[error("Atom count mismatch for molecule index {index}: expected {expected}, found {found}")]
    AtomCountMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Unable to update '{property}' for molecule index {index}")]
    CoordinateUpdate { index: usize, property: String },

    #[error("Molecule index {index} has no '{property}' property")]
    MissingProperty { index: usize, property: String },
}
