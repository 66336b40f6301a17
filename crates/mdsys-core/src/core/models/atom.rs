/// An atom identity record.
///
/// Atoms carry only identity here: their number, name, and element symbol.
/// Coordinates and charges live in the parent molecule's property bag,
/// indexed in the molecule's flattened atom order, so that several property
/// sets (e.g. two perturbation endpoints) can coexist for the same atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// The atom number. Unique within a system after renumbering.
    pub number: usize,
    /// The atom name (e.g., "CA", "OW", "H1").
    pub name: String,
    /// The element symbol (e.g., "C", "O", "H").
    pub element: String,
}

impl Atom {
    pub fn new(number: usize, name: &str, element: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            element: element.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_stores_identity_fields() {
        let atom = Atom::new(7, "CA", "C");
        assert_eq!(atom.number, 7);
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.element, "C");
    }

    #[test]
    fn atom_equality_and_clone_work() {
        let atom = Atom::new(1, "OW", "O");
        assert_eq!(atom, atom.clone());
    }
}
