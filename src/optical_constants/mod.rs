//! Module for handling measured optical constants of the materials of a simulation.
//!
//! A material is given as an [`OpticalConstantTable`] of `(wavelength, n, k)` samples. For a
//! simulation each table is turned into an [`InterpolatedIndex`] and the valid
//! [`WavelengthDomain`] is computed as the intersection of the spans of all participating
//! materials.
#![warn(missing_docs)]

mod domain;
mod interpolation;
mod library;
mod table;

pub use domain::WavelengthDomain;
pub use interpolation::{InterpolatedIndex, MICROMETER_TO_NANOMETER};
pub use library::{MaterialLibrary, MATERIAL_FILE_EXTENSION};
pub use table::OpticalConstantTable;
