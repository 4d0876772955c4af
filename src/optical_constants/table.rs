#![warn(missing_docs)]
//! Tabulated optical constants (wavelength, n, k) of a single material.
use std::{fmt::Display, fs, ops::RangeInclusive, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};
use uom::fmt::DisplayStyle::Abbreviation;
use uom::si::{
    f64::Length,
    length::{micrometer, nanometer},
};

use super::InterpolatedIndex;
use crate::error::{EllResult, EllipsError};
use crate::utils::math_utils::is_strictly_increasing;

/// Measured dispersion data of one material.
///
/// The table holds `(wavelength, n, k)` triples with the wavelength given in micrometers, which is
/// the unit used by the `.nk` material files. A table is validated on creation and immutable
/// afterwards. Unsorted samples are sorted by wavelength, duplicate wavelengths are rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpticalConstantTable {
    name: String,
    data: Vec<(f64, f64, f64)>, // (wavelength in micrometers, n, k)
}
impl OpticalConstantTable {
    /// Create a new [`OpticalConstantTable`] from `(wavelength [µm], n, k)` samples.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::DataFormat`] if
    ///   - less than two samples are given.
    ///   - any value is NaN or infinite.
    ///   - a wavelength is not positive.
    ///   - two samples share the same wavelength.
    pub fn new(name: &str, mut samples: Vec<(f64, f64, f64)>) -> EllResult<Self> {
        if samples.len() < 2 {
            return Err(EllipsError::DataFormat(format!(
                "material table '{name}' must contain at least 2 samples, found {}",
                samples.len()
            )));
        }
        if samples
            .iter()
            .any(|s| !s.0.is_finite() || !s.1.is_finite() || !s.2.is_finite())
        {
            return Err(EllipsError::DataFormat(format!(
                "material table '{name}' contains non-finite values"
            )));
        }
        if samples.iter().any(|s| s.0 <= 0.0) {
            return Err(EllipsError::DataFormat(format!(
                "material table '{name}' contains non-positive wavelengths"
            )));
        }
        let lambdas: Vec<f64> = samples.iter().map(|s| s.0).collect();
        if !is_strictly_increasing(&lambdas) {
            debug!("sorting samples of material table '{name}' by wavelength");
            samples.sort_by(|a, b| a.0.total_cmp(&b.0));
            #[allow(clippy::float_cmp)]
            let has_duplicates = samples.windows(2).any(|w| w[0].0 == w[1].0);
            if has_duplicates {
                return Err(EllipsError::DataFormat(format!(
                    "material table '{name}' contains duplicate wavelengths"
                )));
            }
        }
        Ok(Self {
            name: name.to_owned(),
            data: samples,
        })
    }
    /// Parse a [`OpticalConstantTable`] from the contents of an `.nk` file.
    ///
    /// The format is plain text with one whitespace separated `wavelength n k` triple per line
    /// (wavelength in micrometers). Empty lines and lines starting with `#` are ignored.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::DataFormat`] if a line does not consist of
    /// exactly three numbers or if the resulting table is invalid (see [`OpticalConstantTable::new`]).
    pub fn from_nk_str(name: &str, contents: &str) -> EllResult<Self> {
        let mut samples: Vec<(f64, f64, f64)> = Vec::new();
        for (line_nr, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let values = line
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|e| {
                    EllipsError::DataFormat(format!(
                        "material table '{name}', line {}: {e}",
                        line_nr + 1
                    ))
                })?;
            if let [lambda, n, k] = values[..] {
                samples.push((lambda, n, k));
            } else {
                return Err(EllipsError::DataFormat(format!(
                    "material table '{name}', line {}: expected 3 columns, found {}",
                    line_nr + 1,
                    values.len()
                )));
            }
        }
        Self::new(name, samples)
    }
    /// Read a [`OpticalConstantTable`] from an `.nk` file.
    ///
    /// The name of the table is the file name (e.g. `sio2.nk`).
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::DataFormat`] if the file is missing, cannot be
    /// read or is malformed.
    pub fn from_nk_file(path: &Path) -> EllResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            EllipsError::DataFormat(format!(
                "cannot read material file {} : {e}",
                path.display()
            ))
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |f| f.to_string_lossy().to_string());
        Self::from_nk_str(&name, &contents)
    }
    /// Returns the material identifier of this [`OpticalConstantTable`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Returns the number of samples of this [`OpticalConstantTable`].
    #[must_use]
    pub fn nr_of_samples(&self) -> usize {
        self.data.len()
    }
    /// Returns the iterator over the `(wavelength [µm], n, k)` samples.
    pub fn iter(&self) -> std::slice::Iter<'_, (f64, f64, f64)> {
        self.data.iter()
    }
    /// Returns the wavelength span covered by this [`OpticalConstantTable`].
    #[must_use]
    pub fn wavelength_range(&self) -> RangeInclusive<Length> {
        let first = self.data.first().map_or(0.0, |s| s.0);
        let last = self.data.last().map_or(0.0, |s| s.0);
        Length::new::<micrometer>(first)..=Length::new::<micrometer>(last)
    }
    /// Build the continuous (piecewise-linear) n(λ), k(λ) functions of this material.
    #[must_use]
    pub fn interpolate(&self) -> InterpolatedIndex {
        InterpolatedIndex::from_table(self)
    }
}

impl<'a> IntoIterator for &'a OpticalConstantTable {
    type IntoIter = std::slice::Iter<'a, (f64, f64, f64)>;
    type Item = &'a (f64, f64, f64);
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for OpticalConstantTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_length = Length::format_args(nanometer, Abbreviation);
        let range = self.wavelength_range();
        write!(
            f,
            "{} ({} samples, {:.1} - {:.1})",
            self.name,
            self.data.len(),
            fmt_length.with(*range.start()),
            fmt_length.with(*range.end())
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::micrometer;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn new() {
        let t = OpticalConstantTable::new("test", vec![(0.3, 1.5, 0.0), (1.0, 1.4, 0.1)]);
        assert!(t.is_ok());
        let t = t.unwrap();
        assert_eq!(t.name(), "test");
        assert_eq!(t.nr_of_samples(), 2);
    }
    #[test]
    fn new_too_short() {
        assert_matches!(
            OpticalConstantTable::new("test", vec![]),
            Err(EllipsError::DataFormat(_))
        );
        assert_matches!(
            OpticalConstantTable::new("test", vec![(0.5, 1.5, 0.0)]),
            Err(EllipsError::DataFormat(_))
        );
    }
    #[test]
    fn new_wrong_values() {
        assert!(OpticalConstantTable::new("t", vec![(0.3, f64::NAN, 0.0), (1.0, 1.4, 0.1)]).is_err());
        assert!(
            OpticalConstantTable::new("t", vec![(0.3, 1.5, f64::INFINITY), (1.0, 1.4, 0.1)])
                .is_err()
        );
        assert!(OpticalConstantTable::new("t", vec![(-0.3, 1.5, 0.0), (1.0, 1.4, 0.1)]).is_err());
        assert!(OpticalConstantTable::new("t", vec![(0.0, 1.5, 0.0), (1.0, 1.4, 0.1)]).is_err());
    }
    #[test]
    fn new_unsorted() {
        let t = OpticalConstantTable::new(
            "t",
            vec![(1.0, 1.4, 0.1), (0.3, 1.5, 0.0), (0.5, 1.45, 0.05)],
        )
        .unwrap();
        let lambdas: Vec<f64> = t.iter().map(|s| s.0).collect();
        assert_eq!(lambdas, vec![0.3, 0.5, 1.0]);
        assert_eq!(t.iter().next().unwrap().1, 1.5);
    }
    #[test]
    fn new_duplicates() {
        assert_matches!(
            OpticalConstantTable::new("t", vec![(1.0, 1.4, 0.1), (0.3, 1.5, 0.0), (1.0, 1.5, 0.0)]),
            Err(EllipsError::DataFormat(_))
        );
    }
    #[test]
    fn from_nk_str() {
        let contents = "# lambda n k\n0.3 1.5 0.0\n\n  0.5\t1.45   0.01\n1.0 1.40 0.02\n";
        let t = OpticalConstantTable::from_nk_str("sio2.nk", contents).unwrap();
        assert_eq!(t.nr_of_samples(), 3);
        assert_eq!(t.iter().nth(1), Some(&(0.5, 1.45, 0.01)));
    }
    #[test]
    fn from_nk_str_wrong_columns() {
        let e = OpticalConstantTable::from_nk_str("bad.nk", "0.3 1.5 0.0\n0.5 1.45\n").unwrap_err();
        assert_eq!(
            e,
            EllipsError::DataFormat(
                "material table 'bad.nk', line 2: expected 3 columns, found 2".into()
            )
        );
        assert!(OpticalConstantTable::from_nk_str("bad.nk", "0.3 1.5 0.0 7.0\n0.5 1.4 0.0\n").is_err());
    }
    #[test]
    fn from_nk_str_not_numeric() {
        assert_matches!(
            OpticalConstantTable::from_nk_str("bad.nk", "0.3 1.5 0.0\n0.5 abc 0.0\n"),
            Err(EllipsError::DataFormat(_))
        );
    }
    #[test]
    fn from_nk_file() {
        let t = OpticalConstantTable::from_nk_file(Path::new("files_for_testing/materials/sio2.nk"))
            .unwrap();
        assert_eq!(t.name(), "sio2.nk");
        assert!(t.nr_of_samples() > 2);
    }
    #[test]
    fn from_nk_file_err() {
        assert_matches!(
            OpticalConstantTable::from_nk_file(Path::new("wrong_path.nk")),
            Err(EllipsError::DataFormat(_))
        );
        assert_matches!(
            OpticalConstantTable::from_nk_file(Path::new(
                "files_for_testing/materials/bad_columns.nk"
            )),
            Err(EllipsError::DataFormat(_))
        );
    }
    #[test]
    fn wavelength_range() {
        let t = OpticalConstantTable::new("t", vec![(0.3, 1.5, 0.0), (1.0, 1.4, 0.1)]).unwrap();
        let r = t.wavelength_range();
        assert_abs_diff_eq!(r.start().value, micrometer!(0.3).value);
        assert_abs_diff_eq!(r.end().value, micrometer!(1.0).value);
    }
    #[test]
    fn display() {
        let t = OpticalConstantTable::new("sio2", vec![(0.3, 1.5, 0.0), (1.0, 1.4, 0.1)]).unwrap();
        assert_eq!(format!("{t}"), "sio2 (2 samples, 300.0 nm - 1000.0 nm)");
    }
}
