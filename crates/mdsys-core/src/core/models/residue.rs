use super::atom::Atom;

/// A residue: a named, numbered group of atoms.
///
/// Atoms are kept in insertion order; that order is the iteration order the
/// renumbering operations rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// The residue number. Unique within a system after renumbering.
    pub number: usize,
    /// The residue name (e.g., "ALA", "LIG", "WAT").
    pub name: String,
    /// The chain identifier (e.g., 'A', 'B'), when the source format
    /// recorded one. Small molecules and solvent typically carry none.
    pub chain: Option<char>,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(number: usize, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            chain: None,
            atoms: Vec::new(),
        }
    }

    /// Sets the chain identifier, for use when building a residue inline.
    pub fn with_chain(mut self, chain: char) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn add_atom(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Reassigns atom numbers sequentially starting at `start`.
    ///
    /// Returns the next free number after the last assigned one.
    pub(crate) fn renumber_atoms(&mut self, start: usize) -> usize {
        let mut next = start;
        for atom in &mut self.atoms {
            atom.number = next;
            next += 1;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_residue_is_empty() {
        let residue = Residue::new(3, "GLY");
        assert_eq!(residue.number, 3);
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.n_atoms(), 0);
        assert_eq!(residue.chain, None);
    }

    #[test]
    fn with_chain_records_the_identifier() {
        let residue = Residue::new(1, "ALA").with_chain('A');
        assert_eq!(residue.chain, Some('A'));
    }

    #[test]
    fn add_atom_preserves_insertion_order() {
        let mut residue = Residue::new(1, "WAT");
        residue.add_atom(Atom::new(1, "OW", "O"));
        residue.add_atom(Atom::new(2, "HW1", "H"));
        residue.add_atom(Atom::new(3, "HW2", "H"));
        let names: Vec<_> = residue.atoms().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["OW", "HW1", "HW2"]);
    }

    #[test]
    fn renumber_atoms_assigns_sequential_numbers() {
        let mut residue = Residue::new(1, "ALA");
        residue.add_atom(Atom::new(90, "N", "N"));
        residue.add_atom(Atom::new(17, "CA", "C"));
        let next = residue.renumber_atoms(5);
        assert_eq!(next, 7);
        let numbers: Vec<_> = residue.atoms().iter().map(|a| a.number).collect();
        assert_eq!(numbers, [5, 6]);
    }
}
