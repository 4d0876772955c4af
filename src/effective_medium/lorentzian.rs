//! Single damped Lorentzian oscillator in wavelength space.
use std::fmt::Display;

use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use super::index_from_permittivity;
use crate::error::{EllResult, EllipsError};

/// Parameters of a damped Lorentzian oscillator.
///
/// Center wavelength and linewidth are given in nanometers, the amplitude is dimensionless.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LorentzOscillator {
    center_wavelength: f64,
    linewidth: f64,
    amplitude: f64,
}
impl LorentzOscillator {
    /// Creates a new [`LorentzOscillator`].
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::InvalidParameter`] if
    ///   - one of the values is not finite
    ///   - the center wavelength or the linewidth is not positive
    ///   - the amplitude is negative
    pub fn new(center_wavelength: f64, linewidth: f64, amplitude: f64) -> EllResult<Self> {
        if !center_wavelength.is_finite() || center_wavelength <= 0.0 {
            return Err(EllipsError::InvalidParameter(
                "center wavelength must be positive and finite".into(),
            ));
        }
        if !linewidth.is_finite() || linewidth <= 0.0 {
            return Err(EllipsError::InvalidParameter(
                "linewidth must be positive and finite".into(),
            ));
        }
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(EllipsError::InvalidParameter(
                "amplitude must be >= 0.0 and finite".into(),
            ));
        }
        Ok(Self {
            center_wavelength,
            linewidth,
            amplitude,
        })
    }
    pub(crate) const fn new_unchecked(center_wavelength: f64, linewidth: f64, amplitude: f64) -> Self {
        Self {
            center_wavelength,
            linewidth,
            amplitude,
        }
    }
    /// Returns the center wavelength (in nm) of this [`LorentzOscillator`].
    #[must_use]
    pub const fn center_wavelength(&self) -> f64 {
        self.center_wavelength
    }
    /// Returns the linewidth (in nm) of this [`LorentzOscillator`].
    #[must_use]
    pub const fn linewidth(&self) -> f64 {
        self.linewidth
    }
    /// Returns the amplitude of this [`LorentzOscillator`].
    #[must_use]
    pub const fn amplitude(&self) -> f64 {
        self.amplitude
    }
    /// Permittivity contribution of this oscillator at the given wavelength (in nm).
    #[must_use]
    pub fn permittivity(&self, wavelength: f64) -> Complex64 {
        let lambda_sq = wavelength * wavelength;
        let detuning = lambda_sq - self.center_wavelength * self.center_wavelength;
        let denominator = detuning.mul_add(
            detuning,
            self.linewidth * self.linewidth * lambda_sq,
        );
        Complex64::new(
            self.amplitude * lambda_sq * detuning / denominator,
            self.amplitude * lambda_sq * wavelength * self.linewidth / denominator,
        )
    }
    /// Additive correction of a complex refractive index `n + ik` at the given wavelength (in nm).
    ///
    /// The oscillator permittivity is decomposed into `(n_L, k_L)` and returned as `n_L − i·k_L`.
    #[must_use]
    pub fn index_correction(&self, wavelength: f64) -> Complex64 {
        let (n, k) = index_from_permittivity(self.permittivity(wavelength));
        Complex64::new(n, -k)
    }
}

impl Display for LorentzOscillator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "λ0 = {:.2} nm, γ = {:.2} nm, A = {:.4}",
            self.center_wavelength, self.linewidth, self.amplitude
        )
    }
}

/// Permittivity of a damped oscillator for each of the given wavelengths (in nm).
///
/// `Re ε = A·λ²·(λ² − λ0²) / D` and `Im ε = A·λ³·γ / D` with `D = (λ² − λ0²)² + γ²λ²`.
///
/// # Errors
///
/// This function will return an [`EllipsError::InvalidParameter`] if the oscillator parameters are
/// invalid (see [`LorentzOscillator::new`]).
pub fn lorentzian_permittivity(
    wavelengths: &[f64],
    amplitude: f64,
    center_wavelength: f64,
    linewidth: f64,
) -> EllResult<Vec<Complex64>> {
    let oscillator = LorentzOscillator::new(center_wavelength, linewidth, amplitude)?;
    Ok(wavelengths
        .iter()
        .map(|w| oscillator.permittivity(*w))
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;

    #[test]
    fn new() {
        let o = LorentzOscillator::new(500.0, 50.0, 0.15).unwrap();
        assert_eq!(o.center_wavelength(), 500.0);
        assert_eq!(o.linewidth(), 50.0);
        assert_eq!(o.amplitude(), 0.15);
        assert!(LorentzOscillator::new(500.0, 50.0, 0.0).is_ok());
    }
    #[test]
    fn new_wrong() {
        assert_matches!(
            LorentzOscillator::new(0.0, 50.0, 0.15),
            Err(EllipsError::InvalidParameter(_))
        );
        assert_matches!(
            LorentzOscillator::new(f64::NAN, 50.0, 0.15),
            Err(EllipsError::InvalidParameter(_))
        );
        assert_matches!(
            LorentzOscillator::new(500.0, 0.0, 0.15),
            Err(EllipsError::InvalidParameter(_))
        );
        assert_matches!(
            LorentzOscillator::new(500.0, f64::INFINITY, 0.15),
            Err(EllipsError::InvalidParameter(_))
        );
        assert_matches!(
            LorentzOscillator::new(500.0, 50.0, -0.1),
            Err(EllipsError::InvalidParameter(_))
        );
    }
    #[test]
    fn permittivity_at_resonance() {
        let o = LorentzOscillator::new(500.0, 50.0, 0.15).unwrap();
        let eps = o.permittivity(500.0);
        assert_abs_diff_eq!(eps.re, 0.0);
        assert_relative_eq!(eps.im, 0.15 * 500.0 / 50.0);
    }
    #[test]
    fn permittivity_dispersion() {
        let o = LorentzOscillator::new(500.0, 50.0, 0.15).unwrap();
        assert!(o.permittivity(450.0).re < 0.0);
        assert!(o.permittivity(550.0).re > 0.0);
        for w in [300.0, 450.0, 500.0, 550.0, 900.0] {
            assert!(o.permittivity(w).im > 0.0);
        }
    }
    #[test]
    fn resonance_peak() {
        let wavelengths: Vec<f64> = (300..=900).map(f64::from).collect();
        let eps = lorentzian_permittivity(&wavelengths, 0.15, 500.0, 50.0).unwrap();
        assert_eq!(eps.len(), wavelengths.len());
        let (peak, _) = wavelengths
            .iter()
            .zip(eps.iter())
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .unwrap();
        assert!((peak - 500.0).abs() <= 25.0);
        let at_peak = eps[200];
        assert!(at_peak.im.abs() > at_peak.re.abs());
        assert!(eps[0].norm() < at_peak.norm());
        assert!(eps[600].norm() < at_peak.norm());
    }
    #[test]
    fn lorentzian_permittivity_empty() {
        assert!(lorentzian_permittivity(&[], 0.15, 500.0, 50.0)
            .unwrap()
            .is_empty());
    }
    #[test]
    fn lorentzian_permittivity_wrong_parameters() {
        assert_matches!(
            lorentzian_permittivity(&[500.0], 0.15, 500.0, 0.0),
            Err(EllipsError::InvalidParameter(_))
        );
        assert_matches!(
            lorentzian_permittivity(&[500.0], -0.1, 500.0, 50.0),
            Err(EllipsError::InvalidParameter(_))
        );
        assert_matches!(
            lorentzian_permittivity(&[500.0], 0.15, f64::NAN, 50.0),
            Err(EllipsError::InvalidParameter(_))
        );
    }
    #[test]
    fn index_correction() {
        let o = LorentzOscillator::new(500.0, 50.0, 0.15).unwrap();
        let correction = o.index_correction(500.0);
        let (n, k) = index_from_permittivity(o.permittivity(500.0));
        assert_abs_diff_eq!(correction.re, n);
        assert_abs_diff_eq!(correction.im, -k);
        assert!(correction.re > 0.0);
        assert!(correction.im < 0.0);
        let zero = LorentzOscillator::new(500.0, 50.0, 0.0).unwrap();
        assert_eq!(zero.index_correction(600.0), Complex64::new(0.0, 0.0));
    }
    #[test]
    fn display() {
        let o = LorentzOscillator::new(500.0, 50.0, 0.15).unwrap();
        assert_eq!(format!("{o}"), "λ0 = 500.00 nm, γ = 50.00 nm, A = 0.1500");
    }
}
