//! Coherent transfer-matrix method for planar multilayers.
use std::f64::consts::{FRAC_PI_2, PI};

use log::warn;
use nalgebra::Matrix2;
use num::complex::Complex64;

use super::{EllipsometricAngles, EllipsometrySolver};
use crate::error::{EllResult, EllipsError};

/// Largest imaginary part of the propagation phase of a single layer.
///
/// Larger values lead to overflowing exponentials. The transmission through such a layer is
/// already below `exp(-35)`.
const MAX_PHASE_ATTENUATION: f64 = 35.0;

/// Polarisation of the incoming light.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Polarization {
    S,
    P,
}

/// Ellipsometry solver using the coherent 2×2 characteristic-matrix formalism.
///
/// All layers are treated coherently. The ambient medium must be non-absorbing.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransferMatrix;

impl TransferMatrix {
    fn validate(indices: &[Complex64], thicknesses: &[f64], angle: f64, wavelength: f64) -> EllResult<()> {
        if indices.len() < 2 {
            return Err(EllipsError::Solver(
                "a layer stack needs at least an ambient and a substrate medium".into(),
            ));
        }
        if indices.len() != thicknesses.len() {
            return Err(EllipsError::Solver(format!(
                "number of indices ({}) and thicknesses ({}) differ",
                indices.len(),
                thicknesses.len()
            )));
        }
        if indices.iter().any(|n| !n.is_finite()) {
            return Err(EllipsError::Solver("refractive indices must be finite".into()));
        }
        if thicknesses.first().is_some_and(|d| d.is_finite())
            || thicknesses.last().is_some_and(|d| d.is_finite())
        {
            return Err(EllipsError::Solver(
                "ambient and substrate must be semi-infinite".into(),
            ));
        }
        if thicknesses[1..thicknesses.len() - 1]
            .iter()
            .any(|d| !d.is_finite() || *d < 0.0)
        {
            return Err(EllipsError::Solver(
                "layer thicknesses must be finite and >= 0.0".into(),
            ));
        }
        if !(0.0..FRAC_PI_2).contains(&angle) {
            return Err(EllipsError::Solver(
                "angle of incidence must be in the range [0, π/2)".into(),
            ));
        }
        if !wavelength.is_finite() || wavelength <= 0.0 {
            return Err(EllipsError::Solver(
                "wavelength must be positive and finite".into(),
            ));
        }
        if (indices[0] * angle.sin()).im.abs() > 100.0 * f64::EPSILON {
            return Err(EllipsError::Solver(
                "ambient medium must be non-absorbing".into(),
            ));
        }
        Ok(())
    }
    /// Complex propagation angles in all media following Snell's law.
    fn snell_angles(indices: &[Complex64], angle: f64) -> Vec<Complex64> {
        let invariant = indices[0] * angle.sin();
        let mut angles: Vec<Complex64> = indices.iter().map(|n| (invariant / n).asin()).collect();
        let last = angles.len() - 1;
        for i in [0, last] {
            if !is_forward_angle(indices[i], angles[i]) {
                angles[i] = PI - angles[i];
            }
        }
        angles
    }
    fn reflection(
        polarization: Polarization,
        indices: &[Complex64],
        angles: &[Complex64],
        thicknesses: &[f64],
        wavelength: f64,
    ) -> Complex64 {
        let cosines: Vec<Complex64> = angles.iter().map(|a| a.cos()).collect();
        let interface = |i: usize| {
            interface_coefficients(
                polarization,
                indices[i],
                indices[i + 1],
                cosines[i],
                cosines[i + 1],
            )
        };
        let (r_01, t_01) = interface(0);
        let entrance = Matrix2::new(Complex64::new(1.0, 0.0), r_01, r_01, Complex64::new(1.0, 0.0))
            .map(|m| m / t_01);
        let total = (1..indices.len() - 1).fold(entrance, |acc, i| {
            let kz = 2.0 * PI * indices[i] * cosines[i] / wavelength;
            let mut delta = kz * thicknesses[i];
            if delta.im > MAX_PHASE_ATTENUATION {
                warn!("layer {i} is almost opaque at {wavelength} nm, its attenuation is capped");
                delta.im = MAX_PHASE_ATTENUATION;
            }
            let (r, t) = interface(i);
            let backward = (-Complex64::i() * delta).exp();
            let forward = (Complex64::i() * delta).exp();
            acc * Matrix2::new(backward / t, r * backward / t, r * forward / t, forward / t)
        });
        total[(1, 0)] / total[(0, 0)]
    }
}

impl EllipsometrySolver for TransferMatrix {
    fn solve(
        &self,
        indices: &[Complex64],
        thicknesses: &[f64],
        angle: f64,
        wavelength: f64,
    ) -> EllResult<EllipsometricAngles> {
        Self::validate(indices, thicknesses, angle, wavelength)?;
        let angles = Self::snell_angles(indices, angle);
        let r_s = Self::reflection(Polarization::S, indices, &angles, thicknesses, wavelength);
        let r_p = Self::reflection(Polarization::P, indices, &angles, thicknesses, wavelength);
        let ratio = r_p / r_s;
        let psi = ratio.norm().atan();
        let delta = (-ratio).arg();
        if !psi.is_finite() || !delta.is_finite() {
            return Err(EllipsError::Solver(format!(
                "ellipsometric angles at {wavelength} nm are not finite"
            )));
        }
        Ok(EllipsometricAngles::new(psi, delta))
    }
}

/// Check if a wave with the given propagation angle travels forward (into the stack).
///
/// For absorbing media the wave must decay, for transparent ones it must carry energy forward.
fn is_forward_angle(index: Complex64, angle: Complex64) -> bool {
    let n_cos = index * angle.cos();
    if n_cos.im.abs() > 100.0 * f64::EPSILON {
        n_cos.im > 0.0
    } else {
        n_cos.re > 0.0
    }
}

/// Fresnel reflection and transmission amplitudes of the interface between two media.
fn interface_coefficients(
    polarization: Polarization,
    n_i: Complex64,
    n_f: Complex64,
    cos_i: Complex64,
    cos_f: Complex64,
) -> (Complex64, Complex64) {
    match polarization {
        Polarization::S => {
            let denominator = n_i * cos_i + n_f * cos_f;
            ((n_i * cos_i - n_f * cos_f) / denominator, 2.0 * n_i * cos_i / denominator)
        }
        Polarization::P => {
            let denominator = n_f * cos_i + n_i * cos_f;
            ((n_f * cos_i - n_i * cos_f) / denominator, 2.0 * n_i * cos_i / denominator)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::test_helper::test_helper::check_warnings;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    const INF: f64 = f64::INFINITY;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }
    fn bare(substrate: Complex64, angle: f64) -> EllipsometricAngles {
        TransferMatrix
            .solve(&[c(1.0, 0.0), substrate], &[INF, INF], angle, 600.0)
            .unwrap()
    }
    #[test]
    fn normal_incidence() {
        let a = bare(c(1.5, 0.0), 0.0);
        assert_abs_diff_eq!(a.psi_deg(), 45.0, epsilon = 1e-10);
        assert_abs_diff_eq!(a.delta_deg(), 0.0, epsilon = 1e-10);
        let a = bare(c(3.94, 0.02), 0.0);
        assert_abs_diff_eq!(a.psi_deg(), 45.0, epsilon = 1e-10);
    }
    #[test]
    fn brewster_angle() {
        let a = bare(c(1.5, 0.0), 1.5f64.atan());
        assert_abs_diff_eq!(a.psi_deg(), 0.0, epsilon = 1e-6);
    }
    #[test]
    fn dielectric_below_and_above_brewster() {
        let below = bare(c(1.5, 0.0), 40.0f64.to_radians());
        let above = bare(c(1.5, 0.0), 70.0f64.to_radians());
        assert!(below.psi_deg() > 0.0 && below.psi_deg() < 45.0);
        assert!(above.psi_deg() > 0.0 && above.psi_deg() < 45.0);
        assert_abs_diff_eq!(below.delta_deg().abs(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(above.delta_deg().abs(), 180.0, epsilon = 1e-9);
    }
    #[test]
    fn absorbing_substrate() {
        let a = bare(c(3.94, 0.02), 70.0f64.to_radians());
        assert!(a.psi_deg() > 0.0 && a.psi_deg() < 45.0);
        assert!(a.delta_deg().abs() <= 180.0);
    }
    #[test]
    fn film_matching_substrate() {
        let angle = 70.0f64.to_radians();
        let substrate = c(3.94, 0.02);
        let reference = bare(substrate, angle);
        for d in [0.0, 10.0, 123.4, 600.0] {
            let a = TransferMatrix
                .solve(
                    &[c(1.0, 0.0), substrate, substrate],
                    &[INF, d, INF],
                    angle,
                    600.0,
                )
                .unwrap();
            assert_abs_diff_eq!(a.psi_rad(), reference.psi_rad(), epsilon = 1e-10);
            assert_abs_diff_eq!(a.delta_rad(), reference.delta_rad(), epsilon = 1e-10);
        }
    }
    #[test]
    fn zero_thickness_film() {
        let angle = 65.0f64.to_radians();
        let substrate = c(3.94, 0.02);
        let reference = bare(substrate, angle);
        let a = TransferMatrix
            .solve(
                &[c(1.0, 0.0), c(1.46, 0.0), substrate],
                &[INF, 0.0, INF],
                angle,
                600.0,
            )
            .unwrap();
        assert_abs_diff_eq!(a.psi_rad(), reference.psi_rad(), epsilon = 1e-10);
        assert_abs_diff_eq!(a.delta_rad(), reference.delta_rad(), epsilon = 1e-10);
    }
    #[test]
    fn half_wave_film_is_absentee() {
        // a non-absorbing film with an optical thickness of λ/2 at normal incidence
        let n_film = 1.46;
        let d = 600.0 / (2.0 * n_film);
        let stack = [c(1.0, 0.0), c(n_film, 0.0), c(3.94, 0.02)];
        let with_film = TransferMatrix
            .solve(&stack, &[INF, d, INF], 0.0, 600.0)
            .unwrap();
        let without = bare(c(3.94, 0.02), 0.0);
        assert_abs_diff_eq!(with_film.psi_rad(), without.psi_rad(), epsilon = 1e-10);
        assert_abs_diff_eq!(with_film.delta_rad(), without.delta_rad(), epsilon = 1e-10);
    }
    #[test]
    fn film_changes_result() {
        let angle = 70.0f64.to_radians();
        let stack = [c(1.0, 0.0), c(1.46, 0.0), c(3.94, 0.02)];
        let thin = TransferMatrix.solve(&stack, &[INF, 10.0, INF], angle, 600.0).unwrap();
        let thick = TransferMatrix.solve(&stack, &[INF, 100.0, INF], angle, 600.0).unwrap();
        assert!((thin.delta_rad() - thick.delta_rad()).abs() > 1e-3);
    }
    #[test]
    fn split_layer() {
        let angle = 70.0f64.to_radians();
        let film = c(1.46, 0.0);
        let substrate = c(3.94, 0.02);
        let single = TransferMatrix
            .solve(&[c(1.0, 0.0), film, substrate], &[INF, 100.0, INF], angle, 500.0)
            .unwrap();
        let split = TransferMatrix
            .solve(
                &[c(1.0, 0.0), film, film, substrate],
                &[INF, 40.0, 60.0, INF],
                angle,
                500.0,
            )
            .unwrap();
        assert_abs_diff_eq!(single.psi_rad(), split.psi_rad(), epsilon = 1e-10);
        assert_abs_diff_eq!(single.delta_rad(), split.delta_rad(), epsilon = 1e-10);
    }
    #[test]
    fn opaque_layer() {
        testing_logger::setup();
        let angle = 70.0f64.to_radians();
        let metal = c(0.2, 3.0);
        let a = TransferMatrix
            .solve(
                &[c(1.0, 0.0), metal, c(1.5, 0.0)],
                &[INF, 10_000.0, INF],
                angle,
                500.0,
            )
            .unwrap();
        check_warnings(vec![
            "layer 1 is almost opaque at 500 nm, its attenuation is capped",
        ]);
        let reference = bare(metal, angle);
        assert_abs_diff_eq!(a.psi_rad(), reference.psi_rad(), epsilon = 1e-9);
    }
    #[test]
    fn wrong_stacks() {
        let one = [c(1.0, 0.0)];
        assert_matches!(
            TransferMatrix.solve(&one, &[INF], 0.0, 500.0),
            Err(EllipsError::Solver(_))
        );
        let stack = [c(1.0, 0.0), c(1.46, 0.0), c(3.94, 0.02)];
        assert_matches!(
            TransferMatrix.solve(&stack, &[INF, INF], 0.0, 500.0),
            Err(EllipsError::Solver(_))
        );
        assert_matches!(
            TransferMatrix.solve(&stack, &[0.0, 10.0, INF], 0.0, 500.0),
            Err(EllipsError::Solver(_))
        );
        assert_matches!(
            TransferMatrix.solve(&stack, &[INF, -1.0, INF], 0.0, 500.0),
            Err(EllipsError::Solver(_))
        );
        assert_matches!(
            TransferMatrix.solve(&stack, &[INF, f64::NAN, INF], 0.0, 500.0),
            Err(EllipsError::Solver(_))
        );
        let nan = [c(1.0, 0.0), c(f64::NAN, 0.0), c(3.94, 0.02)];
        assert_matches!(
            TransferMatrix.solve(&nan, &[INF, 10.0, INF], 0.0, 500.0),
            Err(EllipsError::Solver(_))
        );
        let absorbing_ambient = [c(1.0, 0.5), c(1.46, 0.0), c(3.94, 0.02)];
        assert_matches!(
            TransferMatrix.solve(&absorbing_ambient, &[INF, 10.0, INF], 0.5, 500.0),
            Err(EllipsError::Solver(_))
        );
    }
    #[test]
    fn wrong_angle_or_wavelength() {
        let stack = [c(1.0, 0.0), c(1.46, 0.0), c(3.94, 0.02)];
        let d = [INF, 10.0, INF];
        assert_matches!(
            TransferMatrix.solve(&stack, &d, -0.1, 500.0),
            Err(EllipsError::Solver(_))
        );
        assert_matches!(
            TransferMatrix.solve(&stack, &d, FRAC_PI_2, 500.0),
            Err(EllipsError::Solver(_))
        );
        assert_matches!(
            TransferMatrix.solve(&stack, &d, 0.5, 0.0),
            Err(EllipsError::Solver(_))
        );
        assert_matches!(
            TransferMatrix.solve(&stack, &d, 0.5, f64::INFINITY),
            Err(EllipsError::Solver(_))
        );
    }
    #[test]
    fn forward_angle() {
        assert!(is_forward_angle(c(1.5, 0.0), c(0.3, 0.0)));
        assert!(!is_forward_angle(c(1.5, 0.0), c(PI - 0.3, 0.0)));
        assert!(is_forward_angle(c(3.94, 0.02), c(0.2, -0.001)));
    }
}
