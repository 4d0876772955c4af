//! Computation of ellipsometric angles of planar layer stacks.
//!
//! A layer stack is described by the complex refractive indices `n + ik` of its media (ambient
//! first, substrate last) and their thicknesses in nanometers. The first and the last medium are
//! semi-infinite, which is expressed by an infinite thickness.
#![warn(missing_docs)]
mod transfer_matrix;

use std::fmt::Display;

use num::complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::EllResult;

pub use transfer_matrix::TransferMatrix;

/// Ellipsometric angles Psi and Delta (stored in radians).
///
/// They are defined by `rp/rs = tan(Psi)·exp(iΔ)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EllipsometricAngles {
    psi: f64,
    delta: f64,
}
impl EllipsometricAngles {
    /// Creates new [`EllipsometricAngles`] from values given in radians.
    #[must_use]
    pub const fn new(psi: f64, delta: f64) -> Self {
        Self { psi, delta }
    }
    /// Returns Psi in radians.
    #[must_use]
    pub const fn psi_rad(&self) -> f64 {
        self.psi
    }
    /// Returns Delta in radians.
    #[must_use]
    pub const fn delta_rad(&self) -> f64 {
        self.delta
    }
    /// Returns Psi in degrees.
    #[must_use]
    pub fn psi_deg(&self) -> f64 {
        self.psi.to_degrees()
    }
    /// Returns Delta in degrees.
    #[must_use]
    pub fn delta_deg(&self) -> f64 {
        self.delta.to_degrees()
    }
}
impl Display for EllipsometricAngles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Psi: {:.4}°, Delta: {:.4}°",
            self.psi_deg(),
            self.delta_deg()
        )
    }
}

/// Interface of an ellipsometry solver.
///
/// Implementations must be free of side effects, since a sweep may call them concurrently from
/// several threads.
pub trait EllipsometrySolver: Sync {
    /// Compute the ellipsometric angles of a layer stack.
    ///
    /// `indices` and `thicknesses` list the media from the ambient to the substrate. The
    /// thicknesses (nm) of ambient and substrate must be infinite. The angle of incidence is given in
    /// radians, the vacuum wavelength in nanometers.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::Solver`](crate::error::EllipsError::Solver)
    /// if the stack is malformed or cannot be evaluated.
    fn solve(
        &self,
        indices: &[Complex64],
        thicknesses: &[f64],
        angle: f64,
        wavelength: f64,
    ) -> EllResult<EllipsometricAngles>;
}
