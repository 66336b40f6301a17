use super::atom::Atom;
use super::property::Property;
use super::residue::Residue;
use crate::core::units::Charge;
use crate::core::utils::residues::is_water_residue;
use nalgebra::Vector3;
use std::collections::{HashMap, HashSet};

/// The property key marking a merged dual-topology molecule.
pub const PERTURBABLE_FLAG: &str = "is_perturbable";

/// A molecule: numbered residues plus a named property bag.
///
/// Residues (and atoms within them) are kept in insertion order. Per-atom
/// properties in the bag are indexed in the flattened atom order produced by
/// [`Molecule::atoms_iter`].
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    number: usize,
    name: String,
    residues: Vec<Residue>,
    properties: HashMap<String, Property>,
}

impl Molecule {
    pub fn new(number: usize, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            residues: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// The molecule number. Unique within a system.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_residue(&mut self, residue: Residue) {
        self.residues.push(residue);
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    /// Iterates over all atoms in residue order, then atom order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = &Atom> {
        self.residues.iter().flat_map(|residue| residue.atoms().iter())
    }

    pub fn n_residues(&self) -> usize {
        self.residues.len()
    }

    pub fn n_atoms(&self) -> usize {
        self.residues.iter().map(Residue::n_atoms).sum()
    }

    /// The number of distinct chains in the molecule.
    ///
    /// Chains are identified by the chain labels carried on residues;
    /// residues without a chain label (small molecules, solvent) do not
    /// contribute a chain.
    ///
    /// # Return
    ///
    /// The count of distinct chain identifiers across all residues.
    pub fn n_chains(&self) -> usize {
        self.residues
            .iter()
            .filter_map(|residue| residue.chain)
            .collect::<HashSet<char>>()
            .len()
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties.get(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn set_property(&mut self, key: &str, property: Property) {
        self.properties.insert(key.to_string(), property);
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Property> {
        self.properties.remove(key)
    }

    /// Whether this is a merged dual-topology molecule.
    pub fn is_perturbable(&self) -> bool {
        self.properties
            .get(PERTURBABLE_FLAG)
            .and_then(Property::as_flag)
            .unwrap_or(false)
    }

    /// Whether this molecule is a water.
    ///
    /// A molecule counts as water when every residue carries a recognized
    /// water residue name, or when it is a bare three-atom molecule with one
    /// oxygen and two hydrogens.
    pub fn is_water(&self) -> bool {
        if !self.residues.is_empty()
            && self.residues.iter().all(|r| is_water_residue(&r.name))
        {
            return true;
        }
        if self.n_residues() == 1 && self.n_atoms() == 3 {
            let mut oxygens = 0;
            let mut hydrogens = 0;
            for atom in self.atoms_iter() {
                if atom.element.eq_ignore_ascii_case("O") {
                    oxygens += 1;
                } else if atom.element.eq_ignore_ascii_case("H") {
                    hydrogens += 1;
                }
            }
            return oxygens == 1 && hydrogens == 2;
        }
        false
    }

    /// Sums the per-atom charges stored under `key`.
    ///
    /// Returns `None` when the property is absent or not a charge array; the
    /// caller decides whether that is an error or a zero contribution.
    pub fn total_charge(&self, key: &str) -> Option<Charge> {
        let charges = self.properties.get(key)?.as_charges()?;
        Some(Charge::electron_charges(charges.iter().sum()))
    }

    /// Shifts the coordinate set stored under `key` by `shift` (angstroms).
    ///
    /// Returns `None` when the property is absent or not a coordinate array.
    pub fn translate(&mut self, shift: &Vector3<f64>, key: &str) -> Option<()> {
        match self.properties.get_mut(key)? {
            Property::Coordinates(points) => {
                for point in points.iter_mut() {
                    *point += *shift;
                }
                Some(())
            }
            _ => None,
        }
    }

    pub(crate) fn set_number(&mut self, number: usize) {
        self.number = number;
    }

    /// Reassigns residue numbers sequentially starting at `start`.
    ///
    /// Returns the next free number after the last assigned one.
    pub(crate) fn renumber_residues(&mut self, start: usize) -> usize {
        let mut next = start;
        for residue in &mut self.residues {
            residue.number = next;
            next += 1;
        }
        next
    }

    /// Reassigns atom numbers sequentially starting at `start`, walking
    /// residues in insertion order.
    ///
    /// Returns the next free number after the last assigned one.
    pub(crate) fn renumber_atoms(&mut self, start: usize) -> usize {
        let mut next = start;
        for residue in &mut self.residues {
            next = residue.renumber_atoms(next);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn water(number: usize) -> Molecule {
        let mut mol = Molecule::new(number, "water");
        let mut residue = Residue::new(1, "WAT");
        residue.add_atom(Atom::new(1, "OW", "O"));
        residue.add_atom(Atom::new(2, "HW1", "H"));
        residue.add_atom(Atom::new(3, "HW2", "H"));
        mol.add_residue(residue);
        mol.set_property(
            "coordinates",
            Property::Coordinates(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.96, 0.0, 0.0),
                Point3::new(-0.24, 0.93, 0.0),
            ]),
        );
        mol.set_property("charge", Property::Charges(vec![-0.8, 0.4, 0.4]));
        mol
    }

    fn two_residue_molecule() -> Molecule {
        let mut mol = Molecule::new(1, "dipeptide");
        let mut gly = Residue::new(4, "GLY");
        gly.add_atom(Atom::new(10, "N", "N"));
        gly.add_atom(Atom::new(11, "CA", "C"));
        let mut ala = Residue::new(9, "ALA");
        ala.add_atom(Atom::new(30, "CA", "C"));
        mol.add_residue(gly);
        mol.add_residue(ala);
        mol
    }

    #[test]
    fn counts_cover_all_residues_and_atoms() {
        let mol = two_residue_molecule();
        assert_eq!(mol.n_residues(), 2);
        assert_eq!(mol.n_atoms(), 3);
        assert_eq!(mol.atoms_iter().count(), 3);
    }

    #[test]
    fn n_chains_counts_distinct_labels_only() {
        let mut mol = Molecule::new(1, "protein");
        mol.add_residue(Residue::new(1, "ALA").with_chain('A'));
        mol.add_residue(Residue::new(2, "GLY").with_chain('A'));
        mol.add_residue(Residue::new(3, "VAL").with_chain('B'));
        assert_eq!(mol.n_chains(), 2);
    }

    #[test]
    fn unlabelled_residues_contribute_no_chain() {
        assert_eq!(water(1).n_chains(), 0);
        assert_eq!(two_residue_molecule().n_chains(), 0);
    }

    #[test]
    fn atoms_iter_walks_residues_in_insertion_order() {
        let mol = two_residue_molecule();
        let numbers: Vec<_> = mol.atoms_iter().map(|a| a.number).collect();
        assert_eq!(numbers, [10, 11, 30]);
    }

    #[test]
    fn property_round_trip_and_removal() {
        let mut mol = Molecule::new(1, "m");
        assert!(!mol.has_property("fileformat"));
        mol.set_property("fileformat", Property::Text("GroTop".to_string()));
        assert_eq!(
            mol.property("fileformat").and_then(Property::as_text),
            Some("GroTop")
        );
        assert!(mol.remove_property("fileformat").is_some());
        assert!(mol.property("fileformat").is_none());
    }

    #[test]
    fn perturbable_flag_defaults_to_false() {
        let mut mol = Molecule::new(1, "m");
        assert!(!mol.is_perturbable());
        mol.set_property(PERTURBABLE_FLAG, Property::Flag(true));
        assert!(mol.is_perturbable());
        mol.set_property(PERTURBABLE_FLAG, Property::Flag(false));
        assert!(!mol.is_perturbable());
    }

    #[test]
    fn water_detection_by_residue_name() {
        assert!(water(1).is_water());
    }

    #[test]
    fn water_detection_by_composition() {
        let mut mol = Molecule::new(1, "solvent");
        let mut residue = Residue::new(1, "XXX");
        residue.add_atom(Atom::new(1, "O", "O"));
        residue.add_atom(Atom::new(2, "H1", "H"));
        residue.add_atom(Atom::new(3, "H2", "H"));
        mol.add_residue(residue);
        assert!(mol.is_water());
    }

    #[test]
    fn non_water_molecules_are_rejected() {
        assert!(!two_residue_molecule().is_water());

        let mut methanol = Molecule::new(1, "methanol");
        let mut residue = Residue::new(1, "MOH");
        residue.add_atom(Atom::new(1, "C", "C"));
        residue.add_atom(Atom::new(2, "O", "O"));
        residue.add_atom(Atom::new(3, "H", "H"));
        methanol.add_residue(residue);
        assert!(!methanol.is_water());
    }

    #[test]
    fn total_charge_sums_the_named_property() {
        let mol = water(1);
        let q = mol.total_charge("charge").unwrap();
        assert!((q.value() - 0.0).abs() < 1e-12);
        assert!(mol.total_charge("charge0").is_none());
    }

    #[test]
    fn total_charge_rejects_mistyped_property() {
        let mut mol = water(1);
        mol.set_property("charge", Property::Text("oops".to_string()));
        assert!(mol.total_charge("charge").is_none());
    }

    #[test]
    fn translate_shifts_only_the_named_coordinate_set() {
        let mut mol = water(1);
        mol.set_property(
            "coordinates0",
            Property::Coordinates(vec![Point3::origin(); 3]),
        );
        mol.translate(&Vector3::new(1.0, 2.0, 3.0), "coordinates")
            .unwrap();

        let moved = mol.property("coordinates").unwrap().as_coordinates().unwrap();
        assert_eq!(moved[0], Point3::new(1.0, 2.0, 3.0));

        let untouched = mol
            .property("coordinates0")
            .unwrap()
            .as_coordinates()
            .unwrap();
        assert_eq!(untouched[0], Point3::origin());
    }

    #[test]
    fn translate_missing_property_returns_none() {
        let mut mol = Molecule::new(1, "m");
        assert!(mol.translate(&Vector3::zeros(), "coordinates").is_none());
    }

    #[test]
    fn renumbering_is_sequential_across_residues() {
        let mut mol = two_residue_molecule();
        mol.set_number(5);
        let next_res = mol.renumber_residues(3);
        let next_atom = mol.renumber_atoms(7);

        assert_eq!(mol.number(), 5);
        assert_eq!(next_res, 5);
        assert_eq!(next_atom, 10);
        let res_numbers: Vec<_> = mol.residues().iter().map(|r| r.number).collect();
        assert_eq!(res_numbers, [3, 4]);
        let atom_numbers: Vec<_> = mol.atoms_iter().map(|a| a.number).collect();
        assert_eq!(atom_numbers, [7, 8, 9]);
    }
}
