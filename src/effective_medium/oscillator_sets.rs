//! Random perturbation of nominal nanoparticle oscillators.
use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use super::LorentzOscillator;
use crate::error::{EllResult, EllipsError};

/// Number of oscillator parameter sets generated if nothing else is requested.
pub const DEFAULT_NR_OF_PARAMETER_SETS: usize = 30;

/// Lower bound of the random perturbation strength.
const MIN_PERTURBATION: f64 = 10.0;
/// Upper bound of the random perturbation strength.
const MAX_PERTURBATION: f64 = 100.0;
/// Lower limit of a perturbed linewidth (nm).
const MIN_LINEWIDTH: f64 = 1.0;
/// Lower limit of a perturbed amplitude.
const MIN_AMPLITUDE: f64 = 0.01;

/// Nanoparticle materials with a known plasmon resonance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, Serialize, Deserialize)]
pub enum NanoparticleMaterial {
    /// gold nanoparticles
    Gold,
    /// silver nanoparticles
    Silver,
}
impl NanoparticleMaterial {
    /// Returns the material identifier (material file name) of this [`NanoparticleMaterial`].
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        match self {
            Self::Gold => "Au.nk",
            Self::Silver => "Ag.nk",
        }
    }
    /// Returns the nominal (unperturbed) oscillator of this [`NanoparticleMaterial`].
    #[must_use]
    pub const fn nominal_oscillator(&self) -> LorentzOscillator {
        match self {
            Self::Gold => LorentzOscillator::new_unchecked(500.0, 50.0, 0.150),
            Self::Silver => LorentzOscillator::new_unchecked(405.0, 40.0, 0.150),
        }
    }
}

impl FromStr for NanoparticleMaterial {
    type Err = EllipsError;

    /// Accepts the material identifier (e.g. `Au.nk`) or the bare element symbol (e.g. `Au`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::iter()
            .find(|m| {
                let id = m.identifier();
                name == id || Some(name) == id.strip_suffix(".nk")
            })
            .ok_or_else(|| {
                EllipsError::InvalidMaterial(format!(
                    "nanoparticle material '{s}' is not supported. Choose one of: {}",
                    Self::iter().map(|m| m.identifier()).join(", ")
                ))
            })
    }
}

impl Display for NanoparticleMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// Perturb a nominal oscillator with the given perturbation strength `r` (expected in `[10, 100]`).
///
/// - `λ0' = λ0 + 0.6·(r − 10)^0.9`
/// - `γ' = max(γ + 0.2·(r − 10)^1.1, 1)`
/// - `A' = max(A + 0.0025·r − 0.000015·r², 0.01)`
#[must_use]
pub fn perturb(nominal: &LorentzOscillator, r: f64) -> LorentzOscillator {
    let excess = (r - MIN_PERTURBATION).max(0.0);
    let center_wavelength = 0.6f64.mul_add(excess.powf(0.9), nominal.center_wavelength());
    let linewidth = 0.2f64
        .mul_add(excess.powf(1.1), nominal.linewidth())
        .max(MIN_LINEWIDTH);
    let amplitude = (0.000_015 * r)
        .mul_add(-r, 0.0025f64.mul_add(r, nominal.amplitude()))
        .max(MIN_AMPLITUDE);
    LorentzOscillator::new_unchecked(center_wavelength, linewidth, amplitude)
}

/// Generate a number of randomly perturbed oscillators around the nominal oscillator of the given
/// [`NanoparticleMaterial`].
///
/// The perturbation strength of each set is drawn uniformly from `[10, 100]` using the given random
/// number generator. The sets are returned in generation order.
///
/// # Errors
///
/// This function will return an [`EllipsError::InvalidParameter`] if `nr_of_sets` is zero.
pub fn generate_oscillator_sets<R: Rng + ?Sized>(
    material: NanoparticleMaterial,
    nr_of_sets: usize,
    rng: &mut R,
) -> EllResult<Vec<LorentzOscillator>> {
    if nr_of_sets == 0 {
        return Err(EllipsError::InvalidParameter(
            "at least one oscillator parameter set must be generated".into(),
        ));
    }
    let nominal = material.nominal_oscillator();
    Ok((0..nr_of_sets)
        .map(|_| perturb(&nominal, rng.random_range(MIN_PERTURBATION..=MAX_PERTURBATION)))
        .collect())
}
