#![warn(missing_docs)]
//! The common wavelength domain of all materials taking part in a simulation.
use std::{fmt::Display, ops::RangeInclusive};

use log::warn;
use uom::fmt::DisplayStyle::Abbreviation;
use uom::si::{f64::Length, length::nanometer};

use super::InterpolatedIndex;
use crate::error::{EllResult, EllipsError};

/// Intersection of the wavelength spans of a set of materials (in nanometers, bounds inclusive).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavelengthDomain {
    min: f64,
    max: f64,
}
impl WavelengthDomain {
    /// Compute the [`WavelengthDomain`] as the intersection of the spans of all given materials.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - no material is given ([`EllipsError::InvalidParameter`]).
    ///   - the spans do not overlap ([`EllipsError::OutOfDomain`]).
    pub fn intersect(indices: &[&InterpolatedIndex]) -> EllResult<Self> {
        if indices.is_empty() {
            return Err(EllipsError::InvalidParameter(
                "at least one material is needed for a wavelength domain".into(),
            ));
        }
        let min = indices
            .iter()
            .map(|i| i.span().0)
            .fold(f64::NEG_INFINITY, f64::max);
        let max = indices
            .iter()
            .map(|i| i.span().1)
            .fold(f64::INFINITY, f64::min);
        if min > max {
            let names: Vec<&str> = indices.iter().map(|i| i.name()).collect();
            return Err(EllipsError::OutOfDomain(format!(
                "wavelength ranges of materials {names:?} do not overlap"
            )));
        }
        Ok(Self { min, max })
    }
    /// Returns the lower limit of this [`WavelengthDomain`] in nanometers.
    #[must_use]
    pub const fn min_nm(&self) -> f64 {
        self.min
    }
    /// Returns the upper limit of this [`WavelengthDomain`] in nanometers.
    #[must_use]
    pub const fn max_nm(&self) -> f64 {
        self.max
    }
    /// Returns the range of this [`WavelengthDomain`].
    #[must_use]
    pub fn range(&self) -> RangeInclusive<Length> {
        Length::new::<nanometer>(self.min)..=Length::new::<nanometer>(self.max)
    }
    /// Check if the given wavelength (in nm) lies inside this [`WavelengthDomain`].
    #[must_use]
    pub fn contains(&self, wavelength: f64) -> bool {
        (self.min..=self.max).contains(&wavelength)
    }
    /// Restrict the requested wavelengths (in nm) to this [`WavelengthDomain`].
    ///
    /// The order of the remaining wavelengths is preserved. A warning is logged if wavelengths
    /// had to be dropped.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::OutOfDomain`] naming the valid range if none
    /// of the wavelengths lies inside this [`WavelengthDomain`].
    pub fn restrict(&self, wavelengths: &[f64]) -> EllResult<Vec<f64>> {
        let active: Vec<f64> = wavelengths
            .iter()
            .copied()
            .filter(|w| self.contains(*w))
            .collect();
        if active.is_empty() {
            return Err(EllipsError::OutOfDomain(format!(
                "all wavelengths are out of bounds. Valid range: {} to {} nm",
                self.min, self.max
            )));
        }
        if active.len() < wavelengths.len() {
            warn!(
                "{} of {} wavelengths lie outside the valid range {self} and are ignored",
                wavelengths.len() - active.len(),
                wavelengths.len()
            );
        }
        Ok(active)
    }
}

impl Display for WavelengthDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_length = Length::format_args(nanometer, Abbreviation);
        write!(
            f,
            "{:.1} - {:.1}",
            fmt_length.with(Length::new::<nanometer>(self.min)),
            fmt_length.with(Length::new::<nanometer>(self.max))
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::optical_constants::OpticalConstantTable;
    use crate::utils::test_helper::test_helper::check_warnings;
    use assert_matches::assert_matches;

    fn table(start: f64, end: f64) -> InterpolatedIndex {
        OpticalConstantTable::new("t", vec![(start, 1.5, 0.0), (end, 1.5, 0.0)])
            .unwrap()
            .interpolate()
    }
    #[test]
    fn intersect() {
        let a = table(0.3, 1.0);
        let b = table(0.4, 1.2);
        let c = table(0.25, 0.9);
        let d = WavelengthDomain::intersect(&[&a, &b, &c]).unwrap();
        assert_eq!(d.min_nm(), 400.0);
        assert_eq!(d.max_nm(), 900.0);
        let d = WavelengthDomain::intersect(&[&a]).unwrap();
        assert_eq!(d.min_nm(), 300.0);
        assert_eq!(d.max_nm(), 1000.0);
    }
    #[test]
    fn intersect_empty() {
        assert_matches!(
            WavelengthDomain::intersect(&[]),
            Err(EllipsError::InvalidParameter(_))
        );
        let a = table(0.3, 0.5);
        let b = table(0.6, 1.0);
        assert_matches!(
            WavelengthDomain::intersect(&[&a, &b]),
            Err(EllipsError::OutOfDomain(_))
        );
    }
    #[test]
    fn restrict() {
        let a = table(0.4, 0.6);
        let d = WavelengthDomain::intersect(&[&a]).unwrap();
        testing_logger::setup();
        let active = d.restrict(&[600.0, 350.0, 400.0, 500.0, 650.0]).unwrap();
        assert_eq!(active, vec![600.0, 400.0, 500.0]);
        check_warnings(vec![
            "2 of 5 wavelengths lie outside the valid range 400.0 nm - 600.0 nm and are ignored",
        ]);
    }
    #[test]
    fn restrict_all_inside() {
        let d = WavelengthDomain::intersect(&[&table(0.4, 0.6)]).unwrap();
        testing_logger::setup();
        assert_eq!(d.restrict(&[450.0, 550.0]).unwrap(), vec![450.0, 550.0]);
        check_warnings(vec![]);
    }
    #[test]
    fn restrict_none_inside() {
        let d = WavelengthDomain::intersect(&[&table(0.4, 0.6)]).unwrap();
        assert_eq!(
            d.restrict(&[200.0, 700.0]),
            Err(EllipsError::OutOfDomain(
                "all wavelengths are out of bounds. Valid range: 400 to 600 nm".into()
            ))
        );
    }
    #[test]
    fn display() {
        let d = WavelengthDomain::intersect(&[&table(0.3, 1.0)]).unwrap();
        assert_eq!(format!("{d}"), "300.0 nm - 1000.0 nm");
    }
}
