//! This is the documentation for the **ellipsim** software package.
//!
//! **ellipsim** computes the ellipsometric angles Psi and Delta of a single film on a substrate,
//! swept over wavelength, film thickness and optionally a nanoparticle mixing parameter. The film
//! is either a plain material, a Maxwell-Garnett composite of the film material and nanoparticle
//! inclusions or a film perturbed by randomly generated Lorentzian oscillators. The results are
//! packed into a [`Supervector`] which can be exported as CSV file and plotted for single sweep
//! points.
//!
//! ```no_run
//! use ellipsim::{degree, optical_constants::MaterialLibrary, simulate, LayerSpec};
//! use std::path::Path;
//!
//! let library = MaterialLibrary::new(Path::new("assets/Materials"));
//! let substrate = library.get("sicr.nk").unwrap();
//! let layer = LayerSpec::new(library.get("sio2.nk").unwrap(), vec![50.0, 100.0]).unwrap();
//! let supervector = simulate(&[400.0, 500.0, 600.0], degree!(70.0), &substrate, &layer).unwrap();
//! assert_eq!(supervector.shape(), vec![6, 2]);
//! ```
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod console;
pub mod effective_medium;
pub mod error;
pub mod export;
pub mod optical_constants;
pub mod plot;
pub mod simulation;
pub mod solver;
pub mod supervector;
pub mod utils;

pub use simulation::{simulate, simulate_lorentzian, simulate_maxwell_garnett, LayerSpec, Simulation};
pub use supervector::Supervector;

/// Return the version information of the currently built ellipsim executable.
///
/// This function returns a `String` which contains the package version as well as the build
/// profile.
#[must_use]
pub fn get_version() -> String {
    let profile = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };
    format!("{} ({profile})", env!("CARGO_PKG_VERSION"))
}
