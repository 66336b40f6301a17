use crate::core::space::PeriodicBox;
use nalgebra::Point3;

/// A value stored under a named key in a molecule or system property bag.
///
/// Per-atom properties (`Coordinates`, `Charges`) are indexed in the owning
/// molecule's flattened atom order.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// Per-atom positions in angstroms.
    Coordinates(Vec<Point3<f64>>),
    /// Per-atom partial charges in elementary charge units.
    Charges(Vec<f64>),
    /// A periodic box geometry.
    Space(PeriodicBox),
    /// An opaque string value (e.g., a file-format tag).
    Text(String),
    /// A boolean marker (e.g., the merged-molecule flag).
    Flag(bool),
}

impl Property {
    pub fn as_coordinates(&self) -> Option<&[Point3<f64>]> {
        match self {
            Property::Coordinates(points) => Some(points),
            _ => None,
        }
    }

    pub fn as_charges(&self) -> Option<&[f64]> {
        match self {
            Property::Charges(charges) => Some(charges),
            _ => None,
        }
    }

    pub fn as_space(&self) -> Option<&PeriodicBox> {
        match self {
            Property::Space(space) => Some(space),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Property::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Property::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}
