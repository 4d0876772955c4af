#![warn(missing_docs)]
//! Persistence of [`Supervector`]s as CSV files.
//!
//! Every sweep point is written as one row. Rows iterate the mixing index (outermost), then the
//! thickness index and finally the wavelength index. The columns are
//!   - plain: `psi, delta, wavelength, thickness`
//!   - Maxwell-Garnett: `psi, delta, wavelength, thickness, vfraction`
//!   - Lorentzian: `psi, delta, wavelength, thickness, lambda0, gamma, amplitude`
//!
//! The wavelength and thickness values of a [`Supervector`] are distinct, so [`read_csv`] recovers
//! the sweep grid from the row order. Repeated mixing values are separate sweep points.
use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use csv::{ReaderBuilder, StringRecord, Writer};
use itertools::iproduct;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    effective_medium::LorentzOscillator,
    error::{EllResult, EllipsError},
    supervector::{MixingAxis, Supervector},
};

/// Format of the timestamped result directories.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

#[derive(Serialize, Deserialize)]
struct PlainRow {
    psi: f64,
    delta: f64,
    wavelength: f64,
    thickness: f64,
}
#[derive(Serialize, Deserialize)]
struct MaxwellGarnettRow {
    psi: f64,
    delta: f64,
    wavelength: f64,
    thickness: f64,
    vfraction: f64,
}
#[derive(Serialize, Deserialize)]
struct LorentzianRow {
    psi: f64,
    delta: f64,
    wavelength: f64,
    thickness: f64,
    lambda0: f64,
    gamma: f64,
    amplitude: f64,
}

/// One row of a result file, independent of its variant.
struct Row {
    psi: f64,
    delta: f64,
    wavelength: f64,
    thickness: f64,
    mixing: Option<MixingValue>,
}
#[derive(Clone, Copy, PartialEq)]
enum MixingValue {
    Fraction(f64),
    Oscillator(LorentzOscillator),
}

/// Returns the file name used for the given kind of sweep.
#[must_use]
pub const fn file_name(mixing: &MixingAxis) -> &'static str {
    match mixing {
        MixingAxis::None => "supervector.csv",
        MixingAxis::VolumeFractions(_) => "supervector_maxwell_garnett.csv",
        MixingAxis::Oscillators(_) => "supervector_lorentzian.csv",
    }
}

/// Create (if necessary) the subdirectory `<output_dir>/<YYYYMMDD_HHMM>` for the given timestamp.
///
/// # Errors
///
/// This function will return an [`EllipsError::Export`] if the directory cannot be created.
pub fn timestamped_directory(output_dir: &Path, timestamp: &DateTime<Local>) -> EllResult<PathBuf> {
    let dir = output_dir.join(timestamp.format(TIMESTAMP_FORMAT).to_string());
    fs::create_dir_all(&dir).map_err(|e| {
        EllipsError::Export(format!("cannot create directory {} : {e}", dir.display()))
    })?;
    Ok(dir)
}

/// Save a [`Supervector`] into a timestamped subdirectory of the given output directory.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// This function will return an [`EllipsError::Export`] if the directory or the file cannot be
/// written.
pub fn save(supervector: &Supervector, output_dir: &Path) -> EllResult<PathBuf> {
    let dir = timestamped_directory(output_dir, &Local::now())?;
    let path = dir.join(file_name(supervector.mixing()));
    write_csv(supervector, &path)?;
    info!("{supervector} saved to {}", path.display());
    Ok(path)
}

/// Write a [`Supervector`] to the given CSV file.
///
/// # Errors
///
/// This function will return an [`EllipsError::Export`] if the file cannot be written.
pub fn write_csv(supervector: &Supervector, path: &Path) -> EllResult<()> {
    let mut writer = Writer::from_path(path)
        .map_err(|e| EllipsError::Export(format!("cannot create {} : {e}", path.display())))?;
    let wavelengths = supervector.wavelengths();
    let thicknesses = supervector.thicknesses();
    let mixing = supervector.mixing();
    for (k, j, i) in iproduct!(0..mixing.len(), 0..thicknesses.len(), 0..wavelengths.len()) {
        let psi = supervector.psi(i, j, k).unwrap_or(f64::NAN);
        let delta = supervector.delta(i, j, k).unwrap_or(f64::NAN);
        let (wavelength, thickness) = (wavelengths[i], thicknesses[j]);
        let result = match mixing {
            MixingAxis::None => writer.serialize(PlainRow {
                psi,
                delta,
                wavelength,
                thickness,
            }),
            MixingAxis::VolumeFractions(fractions) => writer.serialize(MaxwellGarnettRow {
                psi,
                delta,
                wavelength,
                thickness,
                vfraction: fractions[k],
            }),
            MixingAxis::Oscillators(oscillators) => writer.serialize(LorentzianRow {
                psi,
                delta,
                wavelength,
                thickness,
                lambda0: oscillators[k].center_wavelength(),
                gamma: oscillators[k].linewidth(),
                amplitude: oscillators[k].amplitude(),
            }),
        };
        result.map_err(|e| EllipsError::Export(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| EllipsError::Export(e.to_string()))
}

fn parse_row(headers: &StringRecord, record: &StringRecord) -> Result<Row, csv::Error> {
    if headers.iter().any(|h| h == "vfraction") {
        let r: MaxwellGarnettRow = record.deserialize(Some(headers))?;
        Ok(Row {
            psi: r.psi,
            delta: r.delta,
            wavelength: r.wavelength,
            thickness: r.thickness,
            mixing: Some(MixingValue::Fraction(r.vfraction)),
        })
    } else if headers.iter().any(|h| h == "lambda0") {
        let r: LorentzianRow = record.deserialize(Some(headers))?;
        Ok(Row {
            psi: r.psi,
            delta: r.delta,
            wavelength: r.wavelength,
            thickness: r.thickness,
            mixing: Some(MixingValue::Oscillator(LorentzOscillator::new_unchecked(
                r.lambda0,
                r.gamma,
                r.amplitude,
            ))),
        })
    } else {
        let r: PlainRow = record.deserialize(Some(headers))?;
        Ok(Row {
            psi: r.psi,
            delta: r.delta,
            wavelength: r.wavelength,
            thickness: r.thickness,
            mixing: None,
        })
    }
}

/// Length of the leading run of `values` before the first value repeats.
fn leading_period<T: PartialEq>(values: &[T]) -> usize {
    values
        .iter()
        .skip(1)
        .position(|v| *v == values[0])
        .map_or(values.len(), |p| p + 1)
}

/// Reload a [`Supervector`] from a CSV file written by [`write_csv`].
///
/// # Errors
///
/// This function will return an [`EllipsError::DataFormat`] if the file cannot be read, is empty
/// or its rows do not form a complete wavelength × thickness × mixing grid.
pub fn read_csv(path: &Path) -> EllResult<Supervector> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| EllipsError::DataFormat(format!("cannot open {} : {e}", path.display())))?;
    let headers = reader
        .headers()
        .map_err(|e| EllipsError::DataFormat(e.to_string()))?
        .clone();
    let rows = reader
        .records()
        .map(|record| {
            record.and_then(|r| parse_row(&headers, &r)).map_err(|e| {
                EllipsError::DataFormat(format!("{} : {e}", path.display()))
            })
        })
        .collect::<EllResult<Vec<Row>>>()?;
    if rows.is_empty() {
        return Err(EllipsError::DataFormat(format!(
            "{} contains no data",
            path.display()
        )));
    }
    let row_wavelengths: Vec<f64> = rows.iter().map(|r| r.wavelength).collect();
    let nr_of_wavelengths = leading_period(&row_wavelengths);
    let block_thicknesses: Vec<f64> = rows
        .iter()
        .step_by(nr_of_wavelengths)
        .map(|r| r.thickness)
        .collect();
    let nr_of_thicknesses = leading_period(&block_thicknesses);
    let block_size = nr_of_wavelengths * nr_of_thicknesses;
    if rows.len() % block_size != 0 {
        return Err(EllipsError::DataFormat(format!(
            "{} does not contain a complete sweep grid",
            path.display()
        )));
    }
    let wavelengths = row_wavelengths[..nr_of_wavelengths].to_vec();
    let thicknesses = block_thicknesses[..nr_of_thicknesses].to_vec();
    let mixing_values: Vec<Option<MixingValue>> =
        rows.iter().step_by(block_size).map(|r| r.mixing).collect();
    let mixing = match mixing_values.first().copied().flatten() {
        None if mixing_values.len() == 1 => MixingAxis::None,
        Some(MixingValue::Fraction(_)) => MixingAxis::VolumeFractions(
            mixing_values
                .iter()
                .filter_map(|m| match m {
                    Some(MixingValue::Fraction(f)) => Some(*f),
                    _ => None,
                })
                .collect(),
        ),
        Some(MixingValue::Oscillator(_)) => MixingAxis::Oscillators(
            mixing_values
                .iter()
                .filter_map(|m| match m {
                    Some(MixingValue::Oscillator(o)) => Some(*o),
                    _ => None,
                })
                .collect(),
        ),
        None => {
            return Err(EllipsError::DataFormat(format!(
                "{} does not contain a complete sweep grid",
                path.display()
            )))
        }
    };
    let mut supervector = Supervector::zeros(wavelengths, thicknesses, mixing)?;
    let nwave = nr_of_wavelengths;
    for (r, row) in rows.iter().enumerate() {
        let (k, j, i) = (r / block_size, (r / nwave) % nr_of_thicknesses, r % nwave);
        #[allow(clippy::float_cmp)]
        let consistent = row.wavelength == supervector.wavelengths()[i]
            && row.thickness == supervector.thicknesses()[j]
            && row.mixing == mixing_values[k];
        if !consistent {
            return Err(EllipsError::DataFormat(format!(
                "{}, row {}: sweep coordinates do not match the grid",
                path.display(),
                r + 1
            )));
        }
        let data = supervector.data_mut();
        data[[i, j, k]] = row.psi;
        data[[i + nwave, j, k]] = row.delta;
    }
    Ok(supervector)
}
