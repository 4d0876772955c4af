#![warn(missing_docs)]
//! Parameter sweeps of a single film on a substrate.
//!
//! Three variants are available:
//!   - plain: the film consists of a single material,
//!   - Maxwell-Garnett: nanoparticle inclusions are mixed into the film material for a range of
//!     volume fractions,
//!   - Lorentzian: the film index is perturbed by randomly generated nanoparticle oscillators.
//!
//! Every variant sweeps the cross product of the active wavelengths, the film thicknesses and (for
//! the composite variants) the mixing parameters. The results are returned as [`Supervector`].
mod layer;

use std::{f64::consts::FRAC_PI_2, str::FromStr, time::Instant};

use itertools::iproduct;
use log::info;
use num::complex::Complex64;
use rand::Rng;
use rayon::prelude::*;
use uom::si::{angle::radian, f64::Angle};

pub use layer::LayerSpec;

use crate::{
    effective_medium::{
        generate_oscillator_sets, maxwell_garnett::effective_complex_index, LorentzOscillator,
        NanoparticleMaterial, DEFAULT_NR_OF_PARAMETER_SETS,
    },
    error::{EllResult, EllipsError},
    optical_constants::{InterpolatedIndex, OpticalConstantTable, WavelengthDomain},
    solver::{EllipsometricAngles, EllipsometrySolver, TransferMatrix},
    supervector::{MixingAxis, Supervector},
    utils::has_duplicates,
};

/// Refractive index of the ambient medium.
const AMBIENT_INDEX: Complex64 = Complex64::new(1.0, 0.0);

/// Active wavelengths with the interpolated substrate and layer indices.
struct ActiveStack {
    wavelengths: Vec<f64>,
    substrate: Vec<Complex64>,
    layer: Vec<Complex64>,
}

/// Sweep driver for a film of a given material on a substrate.
#[derive(Debug)]
pub struct Simulation<'a, S = TransferMatrix> {
    wavelengths: Vec<f64>,
    angle: Angle,
    substrate: &'a OpticalConstantTable,
    layer: &'a LayerSpec,
    solver: S,
}

impl<'a> Simulation<'a, TransferMatrix> {
    /// Creates a new [`Simulation`] using the [`TransferMatrix`] solver.
    ///
    /// The wavelengths are given in nanometers and are later restricted to the common wavelength
    /// domain of all participating materials.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::InvalidParameter`] if
    ///   - no wavelength is given or a wavelength is not finite
    ///   - a wavelength occurs more than once
    ///   - the angle of incidence is outside the range [0°, 90°)
    pub fn new(
        wavelengths: &[f64],
        angle: Angle,
        substrate: &'a OpticalConstantTable,
        layer: &'a LayerSpec,
    ) -> EllResult<Self> {
        if wavelengths.is_empty() {
            return Err(EllipsError::InvalidParameter("no wavelengths given".into()));
        }
        if wavelengths.iter().any(|w| !w.is_finite()) {
            return Err(EllipsError::InvalidParameter(
                "wavelengths must be finite".into(),
            ));
        }
        if has_duplicates(wavelengths) {
            return Err(EllipsError::InvalidParameter(
                "wavelengths must be distinct".into(),
            ));
        }
        if !(0.0..FRAC_PI_2).contains(&angle.get::<radian>()) {
            return Err(EllipsError::InvalidParameter(
                "angle of incidence must be in the range [0°, 90°)".into(),
            ));
        }
        Ok(Self {
            wavelengths: wavelengths.to_vec(),
            angle,
            substrate,
            layer,
            solver: TransferMatrix,
        })
    }
}

impl<'a, S: EllipsometrySolver> Simulation<'a, S> {
    /// Replace the ellipsometry solver of this [`Simulation`].
    pub fn with_solver<T: EllipsometrySolver>(self, solver: T) -> Simulation<'a, T> {
        Simulation {
            wavelengths: self.wavelengths,
            angle: self.angle,
            substrate: self.substrate,
            layer: self.layer,
            solver,
        }
    }
    /// Returns the angle of incidence of this [`Simulation`].
    #[must_use]
    pub const fn angle(&self) -> Angle {
        self.angle
    }
    /// Sweep a film consisting only of the layer material.
    ///
    /// The resulting [`Supervector`] has the shape `[2·nwave, n_thickness]`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - none of the wavelengths lies inside the common wavelength domain of substrate and layer
    ///     ([`EllipsError::OutOfDomain`])
    ///   - the solver fails ([`EllipsError::Solver`])
    pub fn run_plain(&self) -> EllResult<Supervector> {
        let stack = self.active_stack(None)?;
        self.sweep(
            stack.wavelengths,
            &stack.substrate,
            &[stack.layer],
            MixingAxis::None,
        )
    }
    /// Sweep a Maxwell-Garnett composite of the layer material (host) with nanoparticle inclusions.
    ///
    /// The resulting [`Supervector`] has the shape `[2·nwave, n_thickness, n_fractions]`. A volume
    /// fraction of zero reproduces the plain film.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - no volume fraction is given or a volume fraction is outside [0, 1]
    ///     ([`EllipsError::InvalidParameter`])
    ///   - none of the wavelengths lies inside the common wavelength domain of substrate, layer and
    ///     nanoparticle material ([`EllipsError::OutOfDomain`])
    ///   - the solver fails ([`EllipsError::Solver`])
    pub fn run_maxwell_garnett(
        &self,
        nanoparticle: &OpticalConstantTable,
        volume_fractions: &[f64],
    ) -> EllResult<Supervector> {
        if volume_fractions.is_empty() {
            return Err(EllipsError::InvalidParameter(
                "no volume fractions given".into(),
            ));
        }
        if volume_fractions
            .iter()
            .any(|f| !(0.0..=1.0).contains(f))
        {
            return Err(EllipsError::InvalidParameter(
                "volume fractions must be in the range [0, 1]".into(),
            ));
        }
        let inclusion = nanoparticle.interpolate();
        let stack = self.active_stack(Some(&inclusion))?;
        let inclusion_indices = inclusion.indices_at(&stack.wavelengths)?;
        let film_indices: Vec<Vec<Complex64>> = volume_fractions
            .iter()
            .map(|f| {
                inclusion_indices
                    .iter()
                    .zip(&stack.layer)
                    .map(|(incl, host)| effective_complex_index(*f, *incl, *host))
                    .collect()
            })
            .collect();
        self.sweep(
            stack.wavelengths,
            &stack.substrate,
            &film_indices,
            MixingAxis::VolumeFractions(volume_fractions.to_vec()),
        )
    }
    /// Sweep a film whose index is perturbed by randomly generated oscillators of the given
    /// nanoparticle material.
    ///
    /// The oscillator parameter sets are drawn from the given random number generator and are stored
    /// (in generation order) in the [`MixingAxis`] of the resulting [`Supervector`], which has the
    /// shape `[2·nwave, n_thickness, nr_of_sets]`. No random numbers are drawn if the material is
    /// not supported or the wavelengths do not match.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the nanoparticle material is not supported ([`EllipsError::InvalidMaterial`])
    ///   - `nr_of_sets` is zero ([`EllipsError::InvalidParameter`])
    ///   - none of the wavelengths lies inside the common wavelength domain of substrate and layer
    ///     ([`EllipsError::OutOfDomain`])
    ///   - the solver fails ([`EllipsError::Solver`])
    pub fn run_lorentzian<R: Rng + ?Sized>(
        &self,
        nanoparticle_material: &str,
        nr_of_sets: usize,
        rng: &mut R,
    ) -> EllResult<Supervector> {
        self.lorentzian_sweep(nanoparticle_material, nr_of_sets, rng)
            .map(|(supervector, _)| supervector)
    }
    fn lorentzian_sweep<R: Rng + ?Sized>(
        &self,
        nanoparticle_material: &str,
        nr_of_sets: usize,
        rng: &mut R,
    ) -> EllResult<(Supervector, Vec<LorentzOscillator>)> {
        let material = NanoparticleMaterial::from_str(nanoparticle_material)?;
        if nr_of_sets == 0 {
            return Err(EllipsError::InvalidParameter(
                "at least one oscillator parameter set must be generated".into(),
            ));
        }
        let stack = self.active_stack(None)?;
        let oscillators = generate_oscillator_sets(material, nr_of_sets, rng)?;
        info!(
            "generated {} {material} oscillator parameter sets",
            oscillators.len()
        );
        let supervector = self.oscillator_sweep(stack, &oscillators)?;
        Ok((supervector, oscillators))
    }
    /// Sweep a film whose index is perturbed by each of the given oscillators.
    ///
    /// For every oscillator the correction `n_L − i·k_L`, derived from its permittivity, is added
    /// to the interpolated index `n + ik` of the layer material.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - no oscillator is given ([`EllipsError::InvalidParameter`])
    ///   - none of the wavelengths lies inside the common wavelength domain of substrate and layer
    ///     ([`EllipsError::OutOfDomain`])
    ///   - the solver fails ([`EllipsError::Solver`])
    pub fn run_with_oscillators(&self, oscillators: &[LorentzOscillator]) -> EllResult<Supervector> {
        if oscillators.is_empty() {
            return Err(EllipsError::InvalidParameter(
                "no oscillator parameter sets given".into(),
            ));
        }
        let stack = self.active_stack(None)?;
        self.oscillator_sweep(stack, oscillators)
    }
    fn oscillator_sweep(
        &self,
        stack: ActiveStack,
        oscillators: &[LorentzOscillator],
    ) -> EllResult<Supervector> {
        let film_indices: Vec<Vec<Complex64>> = oscillators
            .iter()
            .map(|o| {
                stack
                    .wavelengths
                    .iter()
                    .zip(&stack.layer)
                    .map(|(w, host)| host + o.index_correction(*w))
                    .collect()
            })
            .collect();
        self.sweep(
            stack.wavelengths,
            &stack.substrate,
            &film_indices,
            MixingAxis::Oscillators(oscillators.to_vec()),
        )
    }
    /// Restrict the wavelengths to the common domain of substrate, layer and the optional
    /// nanoparticle material and interpolate substrate and layer indices.
    fn active_stack(&self, nanoparticle: Option<&InterpolatedIndex>) -> EllResult<ActiveStack> {
        let substrate = self.substrate.interpolate();
        let layer = self.layer.material().interpolate();
        let mut materials = vec![&substrate, &layer];
        materials.extend(nanoparticle);
        let wavelengths = WavelengthDomain::intersect(&materials)?.restrict(&self.wavelengths)?;
        Ok(ActiveStack {
            substrate: substrate.indices_at(&wavelengths)?,
            layer: layer.indices_at(&wavelengths)?,
            wavelengths,
        })
    }
    /// Evaluate all (thickness, mixing) points in parallel and assemble the [`Supervector`].
    ///
    /// `film_indices` holds the film index at every active wavelength for each mixing point.
    fn sweep(
        &self,
        wavelengths: Vec<f64>,
        substrate_indices: &[Complex64],
        film_indices: &[Vec<Complex64>],
        mixing: MixingAxis,
    ) -> EllResult<Supervector> {
        let start = Instant::now();
        let angle = self.angle.get::<radian>();
        let thicknesses = self.layer.thicknesses();
        let points: Vec<(usize, usize)> =
            iproduct!(0..film_indices.len(), 0..thicknesses.len()).collect();
        let columns = points
            .par_iter()
            .map(|(m, t)| -> EllResult<(usize, usize, Vec<EllipsometricAngles>)> {
                let stack_thicknesses = [f64::INFINITY, thicknesses[*t], f64::INFINITY];
                let angles = wavelengths
                    .iter()
                    .zip(&film_indices[*m])
                    .zip(substrate_indices)
                    .map(|((w, film), substrate)| {
                        self.solver.solve(
                            &[AMBIENT_INDEX, *film, *substrate],
                            &stack_thicknesses,
                            angle,
                            *w,
                        )
                    })
                    .collect::<EllResult<Vec<_>>>()?;
                Ok((*m, *t, angles))
            })
            .collect::<EllResult<Vec<_>>>()?;
        let mut supervector = Supervector::zeros(wavelengths, thicknesses.to_vec(), mixing)?;
        for (m, t, angles) in &columns {
            supervector.set_column(*t, *m, angles)?;
        }
        info!(
            "generated {supervector} ({} solver calls) in {:.3} s",
            columns.len() * supervector.nr_of_wavelengths(),
            start.elapsed().as_secs_f64()
        );
        Ok(supervector)
    }
}

/// Sweep a plain film on a substrate using the [`TransferMatrix`] solver.
///
/// See [`Simulation::run_plain`].
///
/// # Errors
///
/// This function will return an error if the parameters are invalid, none of the wavelengths lies
/// inside the common wavelength domain or the solver fails.
pub fn simulate(
    wavelengths: &[f64],
    angle: Angle,
    substrate: &OpticalConstantTable,
    layer: &LayerSpec,
) -> EllResult<Supervector> {
    Simulation::new(wavelengths, angle, substrate, layer)?.run_plain()
}

/// Sweep a Maxwell-Garnett composite film on a substrate using the [`TransferMatrix`] solver.
///
/// See [`Simulation::run_maxwell_garnett`].
///
/// # Errors
///
/// This function will return an error if the parameters are invalid, none of the wavelengths lies
/// inside the common wavelength domain or the solver fails.
pub fn simulate_maxwell_garnett(
    wavelengths: &[f64],
    angle: Angle,
    substrate: &OpticalConstantTable,
    layer: &LayerSpec,
    nanoparticle: &OpticalConstantTable,
    volume_fractions: &[f64],
) -> EllResult<Supervector> {
    Simulation::new(wavelengths, angle, substrate, layer)?
        .run_maxwell_garnett(nanoparticle, volume_fractions)
}

/// Sweep a film perturbed by [`DEFAULT_NR_OF_PARAMETER_SETS`] random oscillators of the given
/// nanoparticle material using the [`TransferMatrix`] solver.
///
/// Returns the [`Supervector`] together with the generated oscillators, which are aligned with
/// its last axis.
///
/// # Errors
///
/// This function will return an error if the nanoparticle material is not supported, the
/// parameters are invalid, none of the wavelengths lies inside the common wavelength domain or the
/// solver fails.
pub fn simulate_lorentzian<R: Rng + ?Sized>(
    wavelengths: &[f64],
    angle: Angle,
    substrate: &OpticalConstantTable,
    layer: &LayerSpec,
    nanoparticle_material: &str,
    rng: &mut R,
) -> EllResult<(Supervector, Vec<LorentzOscillator>)> {
    Simulation::new(wavelengths, angle, substrate, layer)?.lorentzian_sweep(
        nanoparticle_material,
        DEFAULT_NR_OF_PARAMETER_SETS,
        rng,
    )
}
