#![warn(missing_docs)]
//! Job descriptions for sweeps, read from YAML files.
//!
//! ```yaml
//! angle: 70.0
//! material_directory: files_for_testing/materials
//! output_directory: results
//! substrate: sicr.nk
//! wavelengths:
//!   range: {min: 400.0, max: 700.0, step: 1.0}
//! layer:
//!   material: sio2.nk
//!   thickness:
//!     range: {min: 0.0, max: 600.0, step: 1.0}
//! model:
//!   type: maxwell_garnett
//!   nanoparticle: Au.nk
//!   volume_fractions:
//!     values: [0.001, 0.01, 0.05]
//! ```
use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    degree,
    effective_medium::DEFAULT_NR_OF_PARAMETER_SETS,
    error::{EllResult, EllipsError},
    optical_constants::MaterialLibrary,
    simulation::{LayerSpec, Simulation},
    supervector::Supervector,
    utils::{f64_to_usize, usize_to_f64},
};

/// Directory of the material files if no other directory is given.
pub const DEFAULT_MATERIAL_DIRECTORY: &str = "assets/Materials";
/// Relative tolerance (in units of the step) for including the upper limit of a [`SweepRange`].
const RANGE_TOLERANCE: f64 = 1e-9;
/// Maximum number of values a single [`SweepRange`] may produce.
pub const MAX_SWEEP_POINTS: usize = 1_000_000;

fn default_angle() -> f64 {
    70.0
}
fn default_material_directory() -> PathBuf {
    PathBuf::from(DEFAULT_MATERIAL_DIRECTORY)
}
fn default_output_directory() -> PathBuf {
    PathBuf::from("results")
}
fn default_substrate() -> String {
    "sicr.nk".into()
}
const fn default_parameter_sets() -> usize {
    DEFAULT_NR_OF_PARAMETER_SETS
}

/// Equidistant sweep points from `min` to `max` (inclusive) with a given `step`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    /// first value
    pub min: f64,
    /// last value (included if it is hit by the step)
    pub max: f64,
    /// distance of two values
    pub step: f64,
}
impl SweepRange {
    /// Returns the values of this [`SweepRange`].
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::InvalidParameter`] if
    ///   - the values are not finite
    ///   - the step is not positive
    ///   - `max` is smaller than `min`
    ///   - the range would produce more than [`MAX_SWEEP_POINTS`] values
    pub fn values(&self) -> EllResult<Vec<f64>> {
        if !self.min.is_finite() || !self.max.is_finite() || !self.step.is_finite() {
            return Err(EllipsError::InvalidParameter(
                "sweep range limits and step must be finite".into(),
            ));
        }
        if self.step <= 0.0 {
            return Err(EllipsError::InvalidParameter(
                "sweep range step must be positive".into(),
            ));
        }
        if self.max < self.min {
            return Err(EllipsError::InvalidParameter(format!(
                "sweep range maximum {} is smaller than minimum {}",
                self.max, self.min
            )));
        }
        let steps = ((self.max - self.min) / self.step + RANGE_TOLERANCE).floor();
        if steps >= usize_to_f64(MAX_SWEEP_POINTS) {
            return Err(EllipsError::InvalidParameter(format!(
                "sweep range from {} to {} with step {} exceeds {MAX_SWEEP_POINTS} values",
                self.min, self.max, self.step
            )));
        }
        let nr_of_steps = f64_to_usize(steps);
        Ok((0..=nr_of_steps)
            .map(|i| usize_to_f64(i).mul_add(self.step, self.min))
            .collect())
    }
}

/// Sweep values given either as [`SweepRange`] or as explicit list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SweepValues {
    /// equidistant values
    Range {
        /// the range
        range: SweepRange,
    },
    /// explicit values
    Values {
        /// the values
        values: Vec<f64>,
    },
}
impl SweepValues {
    /// Returns the values of this [`SweepValues`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the underlying [`SweepRange`] is invalid.
    pub fn values(&self) -> EllResult<Vec<f64>> {
        match self {
            Self::Range { range } => range.values(),
            Self::Values { values } => Ok(values.clone()),
        }
    }
}

/// Wavelengths (in nm) of a job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WavelengthSpec {
    /// equidistant wavelengths
    Range {
        /// the range
        range: SweepRange,
    },
    /// explicit wavelengths
    Values {
        /// the wavelengths
        values: Vec<f64>,
    },
    /// wavelengths read from a whitespace-separated text file
    File {
        /// path of the file
        file: PathBuf,
    },
}
impl WavelengthSpec {
    /// Returns the wavelengths (in nm) of this [`WavelengthSpec`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the range is invalid or the file cannot be read.
    pub fn values(&self) -> EllResult<Vec<f64>> {
        match self {
            Self::Range { range } => range.values(),
            Self::Values { values } => Ok(values.clone()),
            Self::File { file } => load_wavelengths(file),
        }
    }
}

/// Read a list of wavelengths (in nm) from a whitespace-separated text file.
///
/// Lines starting with `#` are ignored.
///
/// # Errors
///
/// This function will return an [`EllipsError::DataFormat`] if the file cannot be read, contains
/// non-numeric values or no values at all.
pub fn load_wavelengths(path: &Path) -> EllResult<Vec<f64>> {
    let contents = fs::read_to_string(path).map_err(|e| {
        EllipsError::DataFormat(format!("cannot read wavelength file {} : {e}", path.display()))
    })?;
    let wavelengths = contents
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                EllipsError::DataFormat(format!(
                    "wavelength file {}: '{token}' is not a number",
                    path.display()
                ))
            })
        })
        .collect::<EllResult<Vec<f64>>>()?;
    if wavelengths.is_empty() {
        return Err(EllipsError::DataFormat(format!(
            "wavelength file {} contains no values",
            path.display()
        )));
    }
    Ok(wavelengths)
}

/// The film of a job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// material identifier (file name in the material directory)
    pub material: String,
    /// thickness sweep (in nm)
    pub thickness: SweepValues,
}

/// The model of the film.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelConfig {
    /// film of a single material
    #[default]
    Plain,
    /// Maxwell-Garnett composite of film material and nanoparticles
    MaxwellGarnett {
        /// material identifier of the nanoparticles
        nanoparticle: String,
        /// volume fraction sweep
        volume_fractions: SweepValues,
    },
    /// film perturbed by random nanoparticle oscillators
    Lorentzian {
        /// nanoparticle material (`Au.nk` or `Ag.nk`)
        nanoparticle: String,
        /// number of generated oscillator parameter sets
        #[serde(default = "default_parameter_sets")]
        parameter_sets: usize,
        /// seed of the random number generator. A random seed is used if missing.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
}

/// Complete description of a sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// angle of incidence in degrees
    #[serde(default = "default_angle")]
    pub angle: f64,
    /// directory containing the material files
    #[serde(default = "default_material_directory")]
    pub material_directory: PathBuf,
    /// directory receiving the timestamped result directories
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
    /// material identifier of the substrate
    #[serde(default = "default_substrate")]
    pub substrate: String,
    /// requested wavelengths
    pub wavelengths: WavelengthSpec,
    /// the film
    pub layer: LayerConfig,
    /// the film model
    #[serde(default)]
    pub model: ModelConfig,
}
impl JobConfig {
    /// Parse a [`JobConfig`] from a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::Config`] if the string cannot be parsed.
    pub fn from_yaml_str(yaml: &str) -> EllResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| EllipsError::Config(format!("parsing of job description failed: {e}")))
    }
    /// Read a [`JobConfig`] from a YAML file.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> EllResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            EllipsError::Config(format!("cannot read job file {} : {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }
    /// Serialize this [`JobConfig`] into a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::Config`] if the serialization fails.
    pub fn to_yaml(&self) -> EllResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| EllipsError::Config(format!("serialization of job description failed: {e}")))
    }
    /// Override the seed of a Lorentzian job. Other models do not use random numbers.
    pub fn set_seed(&mut self, new_seed: u64) {
        if let ModelConfig::Lorentzian { seed, .. } = &mut self.model {
            *seed = Some(new_seed);
        }
    }
    /// Load all materials and run the sweep described by this [`JobConfig`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - a material file is missing or malformed
    ///   - a sweep parameter is invalid
    ///   - the sweep itself fails
    pub fn run(&self) -> EllResult<Supervector> {
        self.run_with_library(&MaterialLibrary::new(&self.material_directory))
    }
    /// Run the sweep described by this [`JobConfig`] taking the materials from the given
    /// [`MaterialLibrary`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - a material file is missing or malformed
    ///   - a sweep parameter is invalid
    ///   - the sweep itself fails
    pub fn run_with_library(&self, library: &MaterialLibrary) -> EllResult<Supervector> {
        let substrate = library.get(&self.substrate)?;
        let layer = LayerSpec::new(
            library.get(&self.layer.material)?,
            self.layer.thickness.values()?,
        )?;
        let wavelengths = self.wavelengths.values()?;
        let simulation = Simulation::new(&wavelengths, degree!(self.angle), &substrate, &layer)?;
        info!(
            "sweeping {} on {} at {}° ({} wavelengths, {} thicknesses)",
            self.layer.material,
            self.substrate,
            self.angle,
            wavelengths.len(),
            layer.thicknesses().len()
        );
        match &self.model {
            ModelConfig::Plain => simulation.run_plain(),
            ModelConfig::MaxwellGarnett {
                nanoparticle,
                volume_fractions,
            } => {
                let inclusion = library.get(nanoparticle)?;
                simulation.run_maxwell_garnett(&inclusion, &volume_fractions.values()?)
            }
            ModelConfig::Lorentzian {
                nanoparticle,
                parameter_sets,
                seed,
            } => match seed {
                Some(seed) => simulation.run_lorentzian(
                    nanoparticle,
                    *parameter_sets,
                    &mut StdRng::seed_from_u64(*seed),
                ),
                None => simulation.run_lorentzian(nanoparticle, *parameter_sets, &mut rand::rng()),
            },
        }
    }
}
