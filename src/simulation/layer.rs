#![warn(missing_docs)]
//! The swept film of a simulation.
use std::sync::Arc;

use crate::{
    error::{EllResult, EllipsError},
    optical_constants::OpticalConstantTable,
    utils::has_duplicates,
};

/// Material and thickness sweep points of the film between ambient and substrate.
///
/// The thickness values are independent sweep points. Each of them describes a single film on the
/// substrate, not a stack of layers.
#[derive(Clone, Debug)]
pub struct LayerSpec {
    material: Arc<OpticalConstantTable>,
    thicknesses: Vec<f64>,
}
impl LayerSpec {
    /// Creates a new [`LayerSpec`]. Thicknesses are given in nanometers.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::InvalidParameter`] if no thickness is given, a
    /// thickness is negative or not finite or a thickness occurs more than once.
    pub fn new(material: Arc<OpticalConstantTable>, thicknesses: Vec<f64>) -> EllResult<Self> {
        if thicknesses.is_empty() {
            return Err(EllipsError::InvalidParameter(format!(
                "no thickness values given for layer '{}'",
                material.name()
            )));
        }
        if thicknesses.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(EllipsError::InvalidParameter(
                "layer thicknesses must be finite and >= 0.0".into(),
            ));
        }
        if has_duplicates(&thicknesses) {
            return Err(EllipsError::InvalidParameter(format!(
                "thickness values of layer '{}' must be distinct",
                material.name()
            )));
        }
        Ok(Self {
            material,
            thicknesses,
        })
    }
    /// Returns a reference to the material table of this [`LayerSpec`].
    #[must_use]
    pub fn material(&self) -> &OpticalConstantTable {
        &self.material
    }
    /// Returns the thickness sweep points (in nm) of this [`LayerSpec`].
    #[must_use]
    pub fn thicknesses(&self) -> &[f64] {
        &self.thicknesses
    }
}
