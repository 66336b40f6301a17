use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A length, stored canonically in angstroms.
///
/// All geometry in the library is expressed in angstroms; constructors for
/// other units convert on the way in.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Length(f64);

impl Length {
    pub fn angstroms(value: f64) -> Self {
        Self(value)
    }

    pub fn nanometers(value: f64) -> Self {
        Self(value * 10.0)
    }

    /// The magnitude in angstroms.
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Add for Length {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Length {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Length {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<f64> for Length {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} A", self.0)
    }
}

/// An electric charge, stored canonically in elementary charge units.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Charge(f64);

impl Charge {
    pub fn electron_charges(value: f64) -> Self {
        Self(value)
    }

    /// The magnitude in elementary charge units.
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Add for Charge {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Charge {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Neg for Charge {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Charge {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} |e|", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angstroms_round_trips_magnitude() {
        let l = Length::angstroms(12.5);
        assert_eq!(l.value(), 12.5);
    }

    #[test]
    fn nanometers_convert_to_angstroms() {
        let l = Length::nanometers(1.5);
        assert_eq!(l.value(), 15.0);
    }

    #[test]
    fn length_arithmetic_works_in_angstroms() {
        let a = Length::angstroms(2.0);
        let b = Length::nanometers(0.1);
        assert_eq!((a + b).value(), 3.0);
        assert_eq!((a - b).value(), 1.0);
        assert_eq!((-a).value(), -2.0);
        assert_eq!((a * 2.5).value(), 5.0);
    }

    #[test]
    fn length_comparison_uses_canonical_unit() {
        assert!(Length::angstroms(9.0) < Length::nanometers(1.0));
    }

    #[test]
    fn charge_sums_over_iterator() {
        let total: Charge = [1.0, -0.5, 0.25]
            .iter()
            .map(|&q| Charge::electron_charges(q))
            .sum();
        assert!((total.value() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn charge_add_assign_accumulates() {
        let mut q = Charge::electron_charges(1.0);
        q += Charge::electron_charges(-2.0);
        assert_eq!(q.value(), -1.0);
    }

    #[test]
    fn default_values_are_zero() {
        assert_eq!(Length::default().value(), 0.0);
        assert_eq!(Charge::default().value(), 0.0);
    }

    #[test]
    fn quantities_round_trip_through_toml() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Config {
            cutoff: Length,
            net_charge: Charge,
        }

        let config = Config {
            cutoff: Length::nanometers(1.2),
            net_charge: Charge::electron_charges(-1.0),
        };
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.cutoff.value(), 12.0);
    }

    #[test]
    fn display_formats_with_units() {
        assert_eq!(format!("{}", Length::angstroms(10.0)), "10.0000 A");
        assert_eq!(format!("{}", Charge::electron_charges(-1.0)), "-1.0000 |e|");
    }
}
