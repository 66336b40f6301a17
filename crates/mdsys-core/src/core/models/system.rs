use super::ids::MoleculeId;
use super::molecule::Molecule;
use super::property::Property;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// The molecule group every system starts with.
pub const DEFAULT_GROUP: &str = "all";

/// A molecule-level selector for system searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Water molecules, by residue name or composition.
    Water,
    /// Merged dual-topology molecules.
    Perturbable,
}

#[derive(Debug, Error)]
#[error("Invalid selector string")]
pub struct ParseSelectorError;

impl FromStr for Selector {
    type Err = ParseSelectorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "water" => Ok(Selector::Water),
            "perturbable" => Ok(Selector::Perturbable),
            _ => Err(ParseSelectorError),
        }
    }
}

/// Why an in-place molecule update was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("No molecule numbered {0} in the system")]
    UnknownMolecule(usize),
    #[error("Molecule {0} has a different residue/atom layout than the stored copy")]
    StructureChanged(usize),
}

/// The molecule store underlying a system.
///
/// Molecules live in a slot map keyed by stable [`MoleculeId`]s; named
/// groups and a system-wide insertion order are kept as ordered ID lists,
/// and a number index maps molecule numbers to IDs. System-level state
/// (box geometry, file-format tag) lives in a named property bag.
///
/// Molecule numbers are unique within a store: adding a molecule whose
/// number is already present is rejected.
#[derive(Debug, Clone)]
pub struct MolecularSystem {
    /// Primary storage for molecules.
    molecules: SlotMap<MoleculeId, Molecule>,
    /// System-wide molecule order (insertion order).
    order: Vec<MoleculeId>,
    /// Named molecule groups, each in insertion order.
    groups: HashMap<String, Vec<MoleculeId>>,
    /// Lookup from molecule number to its stable ID.
    number_map: HashMap<usize, MoleculeId>,
    /// System-level properties (e.g., "space", "fileformat").
    properties: HashMap<String, Property>,
}

impl MolecularSystem {
    /// Creates an empty store with the default "all" group present.
    pub fn new() -> Self {
        let mut groups = HashMap::new();
        groups.insert(DEFAULT_GROUP.to_string(), Vec::new());
        Self {
            molecules: SlotMap::with_key(),
            order: Vec::new(),
            groups,
            number_map: HashMap::new(),
            properties: HashMap::new(),
        }
    }

    /// Adds a molecule to the named group, creating the group if needed.
    ///
    /// # Arguments
    ///
    /// * `molecule` - The molecule to store.
    /// * `group` - The name of the group the molecule joins.
    ///
    /// # Return
    ///
    /// Returns `Some(MoleculeId)` for the stored molecule, or `None` when a
    /// molecule with the same number already exists; the store is left
    /// unchanged in that case.
    pub fn add_molecule(&mut self, molecule: Molecule, group: &str) -> Option<MoleculeId> {
        let number = molecule.number();
        if self.number_map.contains_key(&number) {
            return None;
        }
        let id = self.molecules.insert(molecule);
        self.order.push(id);
        self.groups.entry(group.to_string()).or_default().push(id);
        self.number_map.insert(number, id);
        Some(id)
    }

    /// Removes a molecule by its number.
    ///
    /// # Arguments
    ///
    /// * `number` - The number of the molecule to remove.
    ///
    /// # Return
    ///
    /// Returns the removed molecule, or `None` when no molecule carries the
    /// number; removing an absent number is a no-op.
    pub fn remove_molecule_by_number(&mut self, number: usize) -> Option<Molecule> {
        let id = self.number_map.remove(&number)?;
        self.order.retain(|&other| other != id);
        for ids in self.groups.values_mut() {
            ids.retain(|&other| other != id);
        }
        self.molecules.remove(id)
    }

    /// Replaces the stored molecule with the same number in place.
    ///
    /// In-place replacement requires the residue/atom layout to match the
    /// stored copy; structural edits must go through remove-then-add.
    ///
    /// # Arguments
    ///
    /// * `molecule` - The updated copy; its number selects the stored
    ///   molecule to replace.
    ///
    /// # Return
    ///
    /// Returns `Ok(())` on success, or an [`UpdateError`] naming why the
    /// in-place replacement was rejected.
    pub fn update_molecule(&mut self, molecule: &Molecule) -> Result<(), UpdateError> {
        let number = molecule.number();
        let id = *self
            .number_map
            .get(&number)
            .ok_or(UpdateError::UnknownMolecule(number))?;
        let stored = &self.molecules[id];

        let same_layout = stored.n_residues() == molecule.n_residues()
            && stored
                .residues()
                .iter()
                .zip(molecule.residues())
                .all(|(a, b)| a.n_atoms() == b.n_atoms());
        if !same_layout {
            return Err(UpdateError::StructureChanged(number));
        }

        self.molecules[id] = molecule.clone();
        Ok(())
    }

    /// Retrieves an immutable reference to a molecule by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The molecule ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Molecule)` if the molecule exists, otherwise `None`.
    pub fn molecule(&self, id: MoleculeId) -> Option<&Molecule> {
        self.molecules.get(id)
    }

    /// Retrieves a mutable reference to a molecule by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The molecule ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&mut Molecule)` if the molecule exists, otherwise
    /// `None`.
    pub fn molecule_mut(&mut self, id: MoleculeId) -> Option<&mut Molecule> {
        self.molecules.get_mut(id)
    }

    /// Finds a molecule's stable ID by its number.
    ///
    /// # Arguments
    ///
    /// * `number` - The molecule number to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(MoleculeId)` if a molecule carries the number,
    /// otherwise `None`.
    pub fn find_by_number(&self, number: usize) -> Option<MoleculeId> {
        self.number_map.get(&number).copied()
    }

    /// System-wide molecule IDs in insertion order.
    pub fn molecule_ids(&self) -> &[MoleculeId] {
        &self.order
    }

    /// Iterates over all molecules in insertion order.
    pub fn molecules_iter(&self) -> impl Iterator<Item = &Molecule> {
        self.order.iter().map(|&id| &self.molecules[id])
    }

    /// The IDs in the named group.
    ///
    /// # Arguments
    ///
    /// * `name` - The group name to look up.
    ///
    /// # Return
    ///
    /// Returns the group's IDs in insertion order, or `None` if the group
    /// does not exist.
    pub fn group(&self, name: &str) -> Option<&[MoleculeId]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Searches the store for molecules matching a selector.
    ///
    /// # Arguments
    ///
    /// * `selector` - The molecule-level predicate to match.
    ///
    /// # Return
    ///
    /// The IDs of matching molecules, in system order.
    pub fn search(&self, selector: Selector) -> Vec<MoleculeId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| {
                let molecule = &self.molecules[id];
                match selector {
                    Selector::Water => molecule.is_water(),
                    Selector::Perturbable => molecule.is_perturbable(),
                }
            })
            .collect()
    }

    /// The number of molecules in the store.
    pub fn n_molecules(&self) -> usize {
        self.order.len()
    }

    /// The total number of residues across all molecules.
    pub fn n_residues(&self) -> usize {
        self.molecules_iter().map(Molecule::n_residues).sum()
    }

    /// The total number of chains across all molecules.
    pub fn n_chains(&self) -> usize {
        self.molecules_iter().map(Molecule::n_chains).sum()
    }

    /// The total number of atoms across all molecules.
    pub fn n_atoms(&self) -> usize {
        self.molecules_iter().map(Molecule::n_atoms).sum()
    }

    /// Retrieves a system-level property by its stored key.
    ///
    /// # Arguments
    ///
    /// * `key` - The stored key to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Property)` if the property exists, otherwise `None`.
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    /// Stores a system-level property, replacing any previous value.
    ///
    /// # Arguments
    ///
    /// * `key` - The stored key to write under.
    /// * `property` - The value to store.
    pub fn set_property(&mut self, key: &str, property: Property) {
        self.properties.insert(key.to_string(), property);
    }
}

impl Default for MolecularSystem {
    fn default() -> Self {
        Self::new()
    }
}
