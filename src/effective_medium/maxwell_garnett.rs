//! Maxwell-Garnett effective medium approximation.
use num::complex::Complex64;

use super::{index_from_permittivity, permittivity_from_index};

/// Effective refractive index of a host matrix containing a volume fraction of inclusions.
///
/// Both indices are converted to permittivities and mixed with the Maxwell-Garnett formula
///
/// `ε_eff = ε_h·(ε_i + 2ε_h + 2f·(ε_i − ε_h)) / (ε_i + 2ε_h − f·(ε_i − ε_h))`
///
/// The result is returned as `(n_eff, k_eff)`, both non-negative. For `f = 0` the host index and
/// for `f = 1` the inclusion index is recovered.
#[must_use]
pub fn effective_index(
    volume_fraction: f64,
    n_inclusion: f64,
    k_inclusion: f64,
    n_host: f64,
    k_host: f64,
) -> (f64, f64) {
    let eps_incl = permittivity_from_index(n_inclusion, k_inclusion);
    let eps_host = permittivity_from_index(n_host, k_host);
    let contrast = eps_incl - eps_host;
    let eps_eff = eps_host * (eps_incl + 2.0 * eps_host + 2.0 * volume_fraction * contrast)
        / (eps_incl + 2.0 * eps_host - volume_fraction * contrast);
    index_from_permittivity(eps_eff)
}

/// Same as [`effective_index`] for indices given as complex numbers `n + ik`.
#[must_use]
pub fn effective_complex_index(
    volume_fraction: f64,
    inclusion: Complex64,
    host: Complex64,
) -> Complex64 {
    let (n, k) = effective_index(volume_fraction, inclusion.re, inclusion.im, host.re, host.im);
    Complex64::new(n, k)
}
