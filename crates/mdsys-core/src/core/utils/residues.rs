use phf::{Set, phf_set};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "WAT", "HOH", "H2O", "SOL", "OH2",
    "TIP", "TIP2", "TIP3", "TIP4", "TIP5",
    "T3P", "T4P", "T5P", "SPC", "SPCE",
};

pub fn is_water_residue(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim().to_ascii_uppercase().as_str())
}
