#![warn(missing_docs)]
//! The result array of a parameter sweep.
//!
//! A [`Supervector`] stores Psi and Delta (in degrees) of every sweep point. The first axis has
//! the length `2 × nwave`: the first `nwave` rows hold Psi, the following `nwave` rows Delta, both
//! in the order of the active wavelengths. The second axis is the thickness index and the third
//! axis the index of the volume fraction or oscillator parameter set. A plain sweep has no third
//! axis.
use std::fmt::Display;

use itertools::Itertools;
use ndarray::{Array3, ArrayD, Axis};
use serde::{Deserialize, Serialize};

use crate::{
    effective_medium::{LorentzOscillator, MixingParameter},
    error::{EllResult, EllipsError},
    solver::EllipsometricAngles,
    utils::has_duplicates,
};

/// The values of the innermost sweep axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MixingAxis {
    /// plain single layer, no mixing model
    None,
    /// volume fractions of a Maxwell-Garnett composite
    VolumeFractions(Vec<f64>),
    /// oscillator parameter sets of a Lorentzian composite (in generation order)
    Oscillators(Vec<LorentzOscillator>),
}
impl MixingAxis {
    /// Returns the number of sweep points of this [`MixingAxis`]. A plain sweep counts as one point.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::None => 1,
            Self::VolumeFractions(v) => v.len(),
            Self::Oscillators(o) => o.len(),
        }
    }
    /// Returns `true` if this [`MixingAxis`] has no sweep points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Returns the mixing parameter at the given index or `None` for a plain sweep or an invalid
    /// index.
    #[must_use]
    pub fn parameter(&self, index: usize) -> Option<MixingParameter> {
        match self {
            Self::None => None,
            Self::VolumeFractions(v) => v.get(index).copied().map(MixingParameter::VolumeFraction),
            Self::Oscillators(o) => o.get(index).copied().map(MixingParameter::Oscillator),
        }
    }
}

/// Psi / Delta values of a sweep over wavelength, thickness and (optional) mixing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supervector {
    data: Array3<f64>,
    wavelengths: Vec<f64>,
    thicknesses: Vec<f64>,
    mixing: MixingAxis,
}
impl Supervector {
    /// Creates a new, zero-initialized [`Supervector`] for the given sweep axes.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::InvalidParameter`] if one of the axes is empty
    /// or a wavelength or thickness value occurs more than once.
    pub fn zeros(wavelengths: Vec<f64>, thicknesses: Vec<f64>, mixing: MixingAxis) -> EllResult<Self> {
        if wavelengths.is_empty() || thicknesses.is_empty() || mixing.is_empty() {
            return Err(EllipsError::InvalidParameter(
                "sweep axes of a supervector must not be empty".into(),
            ));
        }
        if has_duplicates(&wavelengths) || has_duplicates(&thicknesses) {
            return Err(EllipsError::InvalidParameter(
                "wavelengths and thicknesses of a supervector must be distinct".into(),
            ));
        }
        let data = Array3::zeros((2 * wavelengths.len(), thicknesses.len(), mixing.len()));
        Ok(Self {
            data,
            wavelengths,
            thicknesses,
            mixing,
        })
    }
    /// Returns the active wavelengths (in nm) of this [`Supervector`].
    #[must_use]
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }
    /// Returns the thickness sweep points (in nm) of this [`Supervector`].
    #[must_use]
    pub fn thicknesses(&self) -> &[f64] {
        &self.thicknesses
    }
    /// Returns the mixing axis of this [`Supervector`].
    #[must_use]
    pub const fn mixing(&self) -> &MixingAxis {
        &self.mixing
    }
    /// Returns the number of active wavelengths.
    #[must_use]
    pub fn nr_of_wavelengths(&self) -> usize {
        self.wavelengths.len()
    }
    /// Returns the shape of this [`Supervector`].
    ///
    /// This is `[2·nwave, n_thickness]` for a plain sweep and `[2·nwave, n_thickness, n_mixing]`
    /// otherwise.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        let shape = self.data.shape();
        if self.mixing == MixingAxis::None {
            shape[..2].to_vec()
        } else {
            shape.to_vec()
        }
    }
    /// Returns Psi (in degrees) at the given wavelength, thickness and mixing index.
    #[must_use]
    pub fn psi(&self, wavelength: usize, thickness: usize, mixing: usize) -> Option<f64> {
        if wavelength >= self.nr_of_wavelengths() {
            return None;
        }
        self.data.get((wavelength, thickness, mixing)).copied()
    }
    /// Returns Delta (in degrees) at the given wavelength, thickness and mixing index.
    #[must_use]
    pub fn delta(&self, wavelength: usize, thickness: usize, mixing: usize) -> Option<f64> {
        if wavelength >= self.nr_of_wavelengths() {
            return None;
        }
        self.data
            .get((wavelength + self.nr_of_wavelengths(), thickness, mixing))
            .copied()
    }
    /// Store the given ellipsometric angles (one per active wavelength) at a sweep coordinate.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::InvalidParameter`] if the coordinate is out of
    /// range or the number of angles does not match the number of wavelengths.
    pub fn set_column(
        &mut self,
        thickness: usize,
        mixing: usize,
        angles: &[EllipsometricAngles],
    ) -> EllResult<()> {
        let (_, nt, nm) = self.data.dim();
        if thickness >= nt || mixing >= nm || angles.len() != self.nr_of_wavelengths() {
            return Err(EllipsError::InvalidParameter(format!(
                "cannot store {} values at supervector column ({thickness}, {mixing})",
                angles.len()
            )));
        }
        let nwave = self.nr_of_wavelengths();
        let mut column = self
            .data
            .index_axis_mut(Axis(2), mixing)
            .index_axis_move(Axis(1), thickness);
        for (i, angle) in angles.iter().enumerate() {
            column[i] = angle.psi_deg();
            column[i + nwave] = angle.delta_deg();
        }
        Ok(())
    }
    /// Returns the raw data with shape `[2·nwave, n_thickness, n_mixing]` (`n_mixing` = 1 for a plain
    /// sweep).
    #[must_use]
    pub const fn data(&self) -> &Array3<f64> {
        &self.data
    }
    pub(crate) fn data_mut(&mut self) -> &mut Array3<f64> {
        &mut self.data
    }
    /// Converts the data into an array of the dimension given by [`Supervector::shape`].
    #[must_use]
    pub fn to_dyn(&self) -> ArrayD<f64> {
        let data = self.data.clone().into_dyn();
        if self.mixing == MixingAxis::None {
            data.index_axis_move(Axis(2), 0)
        } else {
            data
        }
    }
    /// Check if all Psi and Delta values are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl Display for Supervector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "supervector ({})", self.shape().iter().join(" x "))
    }
}
