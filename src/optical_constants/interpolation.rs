#![warn(missing_docs)]
//! Piecewise-linear interpolation of tabulated optical constants.
use num::complex::Complex64;

use super::OpticalConstantTable;
use crate::error::{EllResult, EllipsError};

/// Conversion factor from the table unit (micrometers) to the working unit (nanometers).
pub const MICROMETER_TO_NANOMETER: f64 = 1000.0;

/// Continuous n(λ), k(λ) functions of one material.
///
/// The functions are piecewise-linear over the wavelength span of the underlying
/// [`OpticalConstantTable`]. All wavelengths are in nanometers. There is no extrapolation: queries
/// outside the span return `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolatedIndex {
    name: String,
    wavelengths: Vec<f64>,
    n: Vec<f64>,
    k: Vec<f64>,
}
impl InterpolatedIndex {
    /// Create a new [`InterpolatedIndex`] from the given [`OpticalConstantTable`].
    ///
    /// The table wavelengths are converted from micrometers to nanometers.
    #[must_use]
    pub fn from_table(table: &OpticalConstantTable) -> Self {
        let wavelengths = table
            .iter()
            .map(|s| s.0 * MICROMETER_TO_NANOMETER)
            .collect();
        let n = table.iter().map(|s| s.1).collect();
        let k = table.iter().map(|s| s.2).collect();
        Self {
            name: table.name().to_owned(),
            wavelengths,
            n,
            k,
        }
    }
    /// Returns the material identifier of this [`InterpolatedIndex`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Returns the (lower, upper) wavelength limits in nanometers.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        (
            self.wavelengths.first().copied().unwrap_or(f64::NAN),
            self.wavelengths.last().copied().unwrap_or(f64::NAN),
        )
    }
    /// Return the interpolated `(n, k)` pair at the given wavelength (in nm).
    ///
    /// Returns `None` if the wavelength lies outside the span of the table.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn nk_at(&self, wavelength: f64) -> Option<(f64, f64)> {
        let (min, max) = self.span();
        if !(min..=max).contains(&wavelength) {
            return None;
        }
        let idx = self.wavelengths.partition_point(|w| *w < wavelength);
        if self.wavelengths[idx] == wavelength {
            return Some((self.n[idx], self.k[idx]));
        }
        let lower = idx - 1;
        let ratio =
            (wavelength - self.wavelengths[lower]) / (self.wavelengths[idx] - self.wavelengths[lower]);
        Some((
            self.n[lower].mul_add(1.0 - ratio, self.n[idx] * ratio),
            self.k[lower].mul_add(1.0 - ratio, self.k[idx] * ratio),
        ))
    }
    /// Return the complex refractive index `n + ik` at the given wavelength (in nm).
    ///
    /// Returns `None` if the wavelength lies outside the span of the table.
    #[must_use]
    pub fn index_at(&self, wavelength: f64) -> Option<Complex64> {
        self.nk_at(wavelength).map(|(n, k)| Complex64::new(n, k))
    }
    /// Return the complex refractive indices for all given wavelengths (in nm).
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::OutOfDomain`] if any of the wavelengths lies
    /// outside the span of the table.
    pub fn indices_at(&self, wavelengths: &[f64]) -> EllResult<Vec<Complex64>> {
        wavelengths
            .iter()
            .map(|w| {
                self.index_at(*w).ok_or_else(|| {
                    let (min, max) = self.span();
                    EllipsError::OutOfDomain(format!(
                        "wavelength {w} nm outside of data range {min} - {max} nm of material '{}'",
                        self.name
                    ))
                })
            })
            .collect()
    }
}
