//! Module for effective optical properties of composite layers.
//!
//! Two independent models are available:
//!   - [`maxwell_garnett`]: classical effective medium mixing of a host matrix with a dilute
//!     volume fraction of inclusions.
//!   - [`lorentzian`]: a damped oscillator whose permittivity contribution directly perturbs the
//!     refractive index of the host layer.
//!
//! Complex refractive indices are converted into permittivities with the convention
//! `ε = n² − k² − 2i·n·k`, i.e. `ε = (n − ik)²`.
#![warn(missing_docs)]

pub mod lorentzian;
pub mod maxwell_garnett;
pub mod oscillator_sets;

use num::complex::Complex64;
use serde::{Deserialize, Serialize};

pub use lorentzian::{lorentzian_permittivity, LorentzOscillator};
pub use maxwell_garnett::effective_index;
pub use oscillator_sets::{
    generate_oscillator_sets, NanoparticleMaterial, DEFAULT_NR_OF_PARAMETER_SETS,
};

/// The parameter of a composite layer model at one sweep point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MixingParameter {
    /// volume fraction of the inclusions for the Maxwell-Garnett model
    VolumeFraction(f64),
    /// parameters of the Lorentzian oscillator
    Oscillator(LorentzOscillator),
}

/// Convert a refractive index `(n, k)` into the complex permittivity `n² − k² − 2i·n·k`.
#[must_use]
pub fn permittivity_from_index(n: f64, k: f64) -> Complex64 {
    Complex64::new(n.mul_add(n, -k * k), -2.0 * n * k)
}

/// Decompose a complex permittivity into a refractive index `(n, k)`.
///
/// `n = sqrt((|ε| + Re ε)/2)` and `k = sqrt((|ε| − Re ε)/2)`. Both values are non-negative by
/// construction.
#[must_use]
pub fn index_from_permittivity(permittivity: Complex64) -> (f64, f64) {
    let abs = permittivity.norm();
    let n = (0.5 * (abs + permittivity.re)).max(0.0).sqrt();
    let k = (0.5 * (abs - permittivity.re)).max(0.0).sqrt();
    (n, k)
}
