//! # System Module
//!
//! The public container API over the data layer: a [`System`] owns a
//! [`MolecularSystem`] store and exposes the editing, query, and geometry
//! operations callers assemble simulations with.
//!
//! All cross-system operations have deep-copy semantics: molecules returned
//! from a system are independent copies, and combining systems never aliases
//! molecule state between them.

mod error;

pub use error::SystemError;

use crate::core::models::molecule::Molecule;
use crate::core::models::property::Property;
use crate::core::models::system::{DEFAULT_GROUP, MolecularSystem, Selector};
use crate::core::properties::{PropertyMap, endpoint_key};
use crate::core::space::{AABox, PeriodicBox};
use crate::core::units::{Charge, Length};
use nalgebra::{Point3, Vector3};
use std::fmt;
use std::ops::{Add, Sub};
use tracing::{debug, instrument};

/// A container for one simulatable molecular system.
///
/// The container keeps molecule, residue, and atom numbering consistent
/// across structural edits and resolves every property access through a
/// caller-supplied [`PropertyMap`], so systems loaded from different file
/// formats can be edited uniformly. Merged dual-topology molecules are
/// handled transparently: operations that depend on a lambda endpoint pick
/// the `…0`/`…1` property variant as appropriate.
///
/// The container is not synchronized; callers sharing one across threads
/// must serialize access externally.
#[derive(Debug, Clone, Default)]
pub struct System {
    raw: MolecularSystem,
}

impl System {
    /// Wraps an existing data-layer store.
    pub fn from_raw(raw: MolecularSystem) -> Self {
        Self { raw }
    }

    /// Creates a system holding a single molecule in the "all" group.
    pub fn from_molecule(molecule: Molecule) -> Self {
        let mut system = Self::default();
        let _ = system.raw.add_molecule(molecule, DEFAULT_GROUP);
        system
    }

    /// Creates a system holding the given molecules in the "all" group.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::DuplicateMoleculeNumber`] when two molecules
    /// share a number.
    pub fn from_molecules(molecules: Vec<Molecule>) -> Result<Self, SystemError> {
        let mut system = Self::default();
        system.add_molecules(molecules)?;
        Ok(system)
    }

    /// The underlying data-layer store.
    ///
    /// # Return
    ///
    /// An immutable reference to the wrapped [`MolecularSystem`].
    pub fn raw(&self) -> &MolecularSystem {
        &self.raw
    }

    /// Consumes the container, yielding the underlying data-layer store.
    pub fn into_raw(self) -> MolecularSystem {
        self.raw
    }

    /// The number of molecules in the system.
    pub fn n_molecules(&self) -> usize {
        self.raw.n_molecules()
    }

    /// The total number of residues across all molecules.
    pub fn n_residues(&self) -> usize {
        self.raw.n_residues()
    }

    /// The total number of chains across all molecules.
    ///
    /// Chains are identified by the chain labels on residues; molecules
    /// whose residues carry no chain label contribute zero.
    pub fn n_chains(&self) -> usize {
        self.raw.n_chains()
    }

    /// The total number of atoms across all molecules.
    pub fn n_atoms(&self) -> usize {
        self.raw.n_atoms()
    }

    /// Adds a molecule to the system's "all" group.
    pub fn add_molecule(&mut self, molecule: Molecule) -> Result<(), SystemError> {
        self.add_molecules([molecule])
    }

    /// Adds molecules to the system's "all" group.
    ///
    /// An empty system is rebuilt around the incoming molecules, which
    /// establishes the "all" group and discards any stale system-level
    /// properties; otherwise each molecule is appended to the existing
    /// group.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::DuplicateMoleculeNumber`] when an incoming
    /// molecule's number is already present. Molecules added before the
    /// failing one remain in the system; callers merging molecules from a
    /// foreign system should renumber first (see
    /// [`System::renumber_molecules`]).
    pub fn add_molecules(
        &mut self,
        molecules: impl IntoIterator<Item = Molecule>,
    ) -> Result<(), SystemError> {
        if self.raw.n_molecules() == 0 {
            self.raw = MolecularSystem::new();
        }
        for molecule in molecules {
            let number = molecule.number();
            if self.raw.add_molecule(molecule, DEFAULT_GROUP).is_none() {
                return Err(SystemError::DuplicateMoleculeNumber { number });
            }
        }
        Ok(())
    }

    /// Removes a molecule by its identity number.
    ///
    /// Removing a molecule that is not in the system is a no-op.
    pub fn remove_molecule(&mut self, molecule: &Molecule) {
        if self.raw.remove_molecule_by_number(molecule.number()).is_none() {
            debug!(
                number = molecule.number(),
                "Molecule not in system; nothing removed"
            );
        }
    }

    /// Removes molecules by their identity numbers. Absent molecules are
    /// skipped.
    pub fn remove_molecules<'a>(&mut self, molecules: impl IntoIterator<Item = &'a Molecule>) {
        for molecule in molecules {
            self.remove_molecule(molecule);
        }
    }

    /// Removes every water molecule from the system.
    pub fn remove_water_molecules(&mut self) {
        let waters = self.water_molecules();
        debug!(count = waters.len(), "Removing water molecules");
        self.remove_molecules(waters.iter());
    }

    /// Replaces a stored molecule with an updated copy.
    ///
    /// The update happens in place when the molecule's residue/atom layout
    /// is unchanged. Structural edits are applied by removing the old copy
    /// and appending the new one to the "all" group; either path yields the
    /// same molecule content, but the fallback moves the molecule to the
    /// end of the system order.
    pub fn update_molecule(&mut self, molecule: &Molecule) {
        if let Err(err) = self.raw.update_molecule(molecule) {
            debug!(
                number = molecule.number(),
                %err,
                "In-place update rejected; falling back to remove-and-add"
            );
            self.raw.remove_molecule_by_number(molecule.number());
            let _ = self.raw.add_molecule(molecule.clone(), DEFAULT_GROUP);
        }
    }

    /// Replaces stored molecules with updated copies. See
    /// [`System::update_molecule`].
    pub fn update_molecules<'a>(&mut self, molecules: impl IntoIterator<Item = &'a Molecule>) {
        for molecule in molecules {
            self.update_molecule(molecule);
        }
    }

    /// Returns copies of the molecules in the named group.
    ///
    /// # Arguments
    ///
    /// * `group` - The name of the molecule group to read.
    ///
    /// # Return
    ///
    /// Independent copies of the group's molecules, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::GroupNotFound`] when the group does not
    /// exist. The "all" group always exists, so an empty system yields an
    /// empty list rather than an error.
    pub fn molecules(&self, group: &str) -> Result<Vec<Molecule>, SystemError> {
        let ids = self.raw.group(group).ok_or_else(|| SystemError::GroupNotFound {
            name: group.to_string(),
        })?;
        Ok(ids
            .iter()
            .filter_map(|&id| self.raw.molecule(id))
            .cloned()
            .collect())
    }

    /// Returns copies of all water molecules in the system.
    pub fn water_molecules(&self) -> Vec<Molecule> {
        self.search(Selector::Water)
    }

    /// The number of water molecules in the system.
    pub fn n_water_molecules(&self) -> usize {
        self.raw.search(Selector::Water).len()
    }

    /// Returns copies of all merged dual-topology molecules in the system.
    pub fn perturbable_molecules(&self) -> Vec<Molecule> {
        self.search(Selector::Perturbable)
    }

    /// The number of merged dual-topology molecules in the system.
    pub fn n_perturbable_molecules(&self) -> usize {
        self.raw.search(Selector::Perturbable).len()
    }

    fn search(&self, selector: Selector) -> Vec<Molecule> {
        self.raw
            .search(selector)
            .into_iter()
            .filter_map(|id| self.raw.molecule(id))
            .cloned()
            .collect()
    }

    /// Returns the first molecule (in system order) containing a residue
    /// with the given name.
    ///
    /// # Arguments
    ///
    /// * `name` - The residue name to search for (exact match).
    ///
    /// # Return
    ///
    /// An independent copy of the first matching molecule.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::ResidueNotFound`] when no molecule contains
    /// such a residue.
    pub fn molecule_with_residue_name(&self, name: &str) -> Result<Molecule, SystemError> {
        self.raw
            .molecules_iter()
            .find(|molecule| molecule.residues().iter().any(|residue| residue.name == name))
            .cloned()
            .ok_or_else(|| SystemError::ResidueNotFound {
                name: name.to_string(),
            })
    }

    /// The total charge over all molecules.
    ///
    /// Merged molecules contribute their lambda-endpoint charge selected by
    /// `use_lambda1`. A molecule without a readable charge property
    /// contributes zero; the aggregate never fails.
    ///
    /// # Arguments
    ///
    /// * `map` - Resolves the logical "charge" name to a stored key.
    /// * `use_lambda1` - Selects the lambda = 1 endpoint for merged
    ///   molecules; otherwise lambda = 0 is used.
    ///
    /// # Return
    ///
    /// The summed charge in elementary charge units.
    pub fn charge(&self, map: &PropertyMap, use_lambda1: bool) -> Charge {
        self.raw
            .molecules_iter()
            .filter_map(|molecule| {
                let key = if molecule.is_perturbable() {
                    endpoint_key("charge", use_lambda1)
                } else {
                    map.charge().to_string()
                };
                let charge = molecule.total_charge(&key);
                if charge.is_none() {
                    debug!(
                        number = molecule.number(),
                        key = key.as_str(),
                        "No readable charge property; contributing zero"
                    );
                }
                charge
            })
            .sum()
    }

    /// The file format tag associated with the system, if recorded.
    ///
    /// # Arguments
    ///
    /// * `map` - Resolves the logical "fileformat" name to a stored key.
    ///
    /// # Return
    ///
    /// The stored format tag, or `None` when the system carries none.
    pub fn file_format(&self, map: &PropertyMap) -> Option<String> {
        self.raw
            .property(map.fileformat())
            .and_then(Property::as_text)
            .map(str::to_owned)
    }

    /// Sets the periodic simulation box from three edge lengths.
    ///
    /// # Arguments
    ///
    /// * `size` - The box edge lengths; exactly three are required.
    /// * `map` - Resolves the logical "space" name to a stored key.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidBoxDimensions`] unless exactly three
    /// lengths are given.
    pub fn set_box(&mut self, size: &[Length], map: &PropertyMap) -> Result<(), SystemError> {
        if size.len() != 3 {
            return Err(SystemError::InvalidBoxDimensions { found: size.len() });
        }
        let dimensions = Vector3::new(size[0].value(), size[1].value(), size[2].value());
        self.raw
            .set_property(map.space(), Property::Space(PeriodicBox::new(dimensions)));
        Ok(())
    }

    /// The periodic box edge lengths.
    ///
    /// # Arguments
    ///
    /// * `map` - Resolves the logical "space" name to a stored key.
    ///
    /// # Return
    ///
    /// The three edge lengths, or `None` when no box is stored (or the
    /// stored property is not a box).
    pub fn get_box(&self, map: &PropertyMap) -> Option<[Length; 3]> {
        let space = self.raw.property(map.space())?.as_space()?;
        let dimensions = space.dimensions();
        Some([
            Length::angstroms(dimensions.x),
            Length::angstroms(dimensions.y),
            Length::angstroms(dimensions.z),
        ])
    }

    /// Translates every molecule in the system by the given vector.
    ///
    /// Merged molecules move their lambda-0 coordinates. The operation
    /// validates that every molecule carries the required coordinate
    /// property before touching any of them.
    ///
    /// # Arguments
    ///
    /// * `vector` - The shift to apply along each axis.
    /// * `map` - Resolves the logical "coordinates" name to a stored key.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::MissingProperty`] naming the first molecule
    /// without a readable coordinate set; the system is left unmodified.
    pub fn translate(&mut self, vector: [Length; 3], map: &PropertyMap) -> Result<(), SystemError> {
        let shift = Vector3::new(vector[0].value(), vector[1].value(), vector[2].value());

        let mut keys = Vec::with_capacity(self.n_molecules());
        for (index, molecule) in self.raw.molecules_iter().enumerate() {
            let key = if molecule.is_perturbable() {
                endpoint_key("coordinates", false)
            } else {
                map.coordinates().to_string()
            };
            if molecule
                .property(&key)
                .and_then(Property::as_coordinates)
                .is_none()
            {
                return Err(SystemError::MissingProperty {
                    index,
                    property: key,
                });
            }
            keys.push(key);
        }

        let ids = self.raw.molecule_ids().to_vec();
        for (&id, key) in ids.iter().zip(&keys) {
            if let Some(molecule) = self.raw.molecule_mut(id) {
                let _ = molecule.translate(&shift, key);
            }
        }
        Ok(())
    }

    /// Renumbers copies of the given molecules so they can be merged into
    /// this system without number clashes.
    ///
    /// Molecule, residue, and atom numbers are reassigned sequentially in
    /// input order (residues, then atoms, in iteration order within each
    /// molecule), continuing from this system's current counts, or from one
    /// when `rebuild` is set. Source numbering from a foreign system must
    /// be rewritten this way before insertion; reusing it would corrupt
    /// atom addressing once merged.
    ///
    /// # Arguments
    ///
    /// * `molecules` - The molecules to renumber; they are not modified.
    /// * `rebuild` - Start the counters at one instead of continuing from
    ///   this system's counts.
    ///
    /// # Return
    ///
    /// Renumbered copies, in input order.
    pub fn renumber_molecules(&self, molecules: &[Molecule], rebuild: bool) -> Vec<Molecule> {
        if rebuild {
            renumber_with(molecules, 1, 1, 1)
        } else {
            renumber_with(
                molecules,
                self.n_molecules() + 1,
                self.n_residues() + 1,
                self.n_atoms() + 1,
            )
        }
    }

    /// Copies the coordinates of every molecule in `other` onto the
    /// matching molecule (by position) in this system.
    ///
    /// Source coordinates are read under `map1`'s coordinate key; each
    /// target molecule receives them under `map0`'s coordinate key, or the
    /// lambda-endpoint key selected by `use_lambda1` when the target is a
    /// merged molecule. The operation is atomic: every copy is validated
    /// and staged before any molecule is modified, so a failure leaves this
    /// system's coordinates untouched.
    ///
    /// # Arguments
    ///
    /// * `other` - The system to read coordinates from; molecules are
    ///   matched to this system's by position.
    /// * `map0` - Resolves the coordinate key written on this system.
    /// * `map1` - Resolves the coordinate key read from `other`.
    /// * `use_lambda1` - Selects the lambda = 1 endpoint for merged target
    ///   molecules; otherwise lambda = 0 is written.
    ///
    /// # Errors
    ///
    /// - [`SystemError::MoleculeCountMismatch`] when the systems hold
    ///   different molecule counts.
    /// - [`SystemError::AtomCountMismatch`] when a molecule pair disagrees
    ///   on atom count.
    /// - [`SystemError::CoordinateUpdate`] when a source coordinate set is
    ///   absent, mistyped, or of the wrong length.
    #[instrument(skip_all, fields(n_molecules = self.n_molecules()))]
    pub fn update_coordinates(
        &mut self,
        other: &System,
        map0: &PropertyMap,
        map1: &PropertyMap,
        use_lambda1: bool,
    ) -> Result<(), SystemError> {
        if self.n_molecules() != other.n_molecules() {
            return Err(SystemError::MoleculeCountMismatch {
                expected: self.n_molecules(),
                found: other.n_molecules(),
            });
        }

        let source_key = map1.coordinates();
        let mut staged: Vec<(usize, String, Property)> = Vec::with_capacity(self.n_molecules());

        for (index, (target, source)) in self
            .raw
            .molecules_iter()
            .zip(other.raw.molecules_iter())
            .enumerate()
        {
            if target.n_atoms() != source.n_atoms() {
                return Err(SystemError::AtomCountMismatch {
                    index,
                    expected: target.n_atoms(),
                    found: source.n_atoms(),
                });
            }

            let target_key = if target.is_perturbable() {
                endpoint_key("coordinates", use_lambda1)
            } else {
                map0.coordinates().to_string()
            };

            let coordinates = source
                .property(source_key)
                .and_then(Property::as_coordinates)
                .ok_or_else(|| SystemError::CoordinateUpdate {
                    index,
                    property: source_key.to_string(),
                })?;
            if coordinates.len() != target.n_atoms() {
                return Err(SystemError::CoordinateUpdate {
                    index,
                    property: target_key,
                });
            }

            staged.push((
                target.number(),
                target_key,
                Property::Coordinates(coordinates.to_vec()),
            ));
        }

        for (number, key, property) in staged {
            if let Some(id) = self.raw.find_by_number(number) {
                if let Some(molecule) = self.raw.molecule_mut(id) {
                    molecule.set_property(&key, property);
                }
            }
        }
        Ok(())
    }

    /// The axis-aligned bounding box over all atom coordinates.
    ///
    /// Merged molecules contribute their lambda-0 coordinates unless the
    /// map overrides the coordinate key. An empty system yields the
    /// degenerate box at the origin.
    ///
    /// # Arguments
    ///
    /// * `map` - Resolves the logical "coordinates" name to a stored key;
    ///   an explicit override also applies to merged molecules.
    ///
    /// # Return
    ///
    /// The tightest box containing every atom coordinate in the system.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::MissingProperty`] naming the first molecule
    /// without a readable coordinate set.
    pub fn aabox(&self, map: &PropertyMap) -> Result<AABox, SystemError> {
        let mut points: Vec<Point3<f64>> = Vec::new();
        for (index, molecule) in self.raw.molecules_iter().enumerate() {
            let key = match map.coordinates_override() {
                Some(key) => key.to_string(),
                None if molecule.is_perturbable() => endpoint_key("coordinates", false),
                None => map.coordinates().to_string(),
            };
            let coordinates = molecule
                .property(&key)
                .and_then(Property::as_coordinates)
                .ok_or_else(|| SystemError::MissingProperty {
                    index,
                    property: key.clone(),
                })?;
            points.extend_from_slice(coordinates);
        }
        Ok(AABox::from_points(points))
    }
}

/// Renumbers molecule copies with the given starting counters.
fn renumber_with(
    molecules: &[Molecule],
    mut next_molecule: usize,
    mut next_residue: usize,
    mut next_atom: usize,
) -> Vec<Molecule> {
    molecules
        .iter()
        .map(|molecule| {
            let mut renumbered = molecule.clone();
            renumbered.set_number(next_molecule);
            next_molecule += 1;
            next_residue = renumbered.renumber_residues(next_residue);
            next_atom = renumbered.renumber_atoms(next_atom);
            renumbered
        })
        .collect()
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "System(n_molecules={})", self.n_molecules())
    }
}

impl Add<&System> for &System {
    type Output = System;

    /// Combines two systems into a new one with deep-copy semantics.
    ///
    /// When any incoming molecule number is already present, the incoming
    /// molecules are renumbered to continue past the combined system's
    /// largest molecule, residue, and atom numbers, so the merge is always
    /// clash-free.
    fn add(self, rhs: &System) -> System {
        let mut combined = self.clone();
        let mut incoming: Vec<Molecule> = rhs.raw.molecules_iter().cloned().collect();

        let clashes = incoming
            .iter()
            .any(|molecule| combined.raw.find_by_number(molecule.number()).is_some());
        if clashes {
            let (max_molecule, max_residue, max_atom) = max_numbers(&combined.raw);
            incoming = renumber_with(&incoming, max_molecule + 1, max_residue + 1, max_atom + 1);
        }

        for molecule in incoming {
            let _ = combined.raw.add_molecule(molecule, DEFAULT_GROUP);
        }
        combined
    }
}

impl Sub<&System> for &System {
    type Output = System;

    /// Returns a copy of the left system with the right system's molecules
    /// (matched by number) removed.
    fn sub(self, rhs: &System) -> System {
        let mut difference = self.clone();
        for molecule in rhs.raw.molecules_iter() {
            difference.raw.remove_molecule_by_number(molecule.number());
        }
        difference
    }
}

/// The largest molecule, residue, and atom numbers present in the store.
fn max_numbers(raw: &MolecularSystem) -> (usize, usize, usize) {
    let mut max_molecule = 0;
    let mut max_residue = 0;
    let mut max_atom = 0;
    for molecule in raw.molecules_iter() {
        max_molecule = max_molecule.max(molecule.number());
        for residue in molecule.residues() {
            max_residue = max_residue.max(residue.number);
            for atom in residue.atoms() {
                max_atom = max_atom.max(atom.number);
            }
        }
    }
    (max_molecule, max_residue, max_atom)
}
