#![warn(missing_docs)]
//! Psi / Delta spectra of a single sweep point.
//!
//! A [`PsiDeltaCurve`] extracts Psi (red) and Delta (blue) over the active wavelengths for one
//! thickness and mixing index of a [`Supervector`]. It is rendered with `plotters` into an SVG or
//! a bitmap file, depending on the file extension.
use std::{fmt::Display, path::Path, path::PathBuf, str::FromStr};

use chrono::Local;
use log::info;
use plotters::{
    chart::{ChartBuilder, SeriesLabelPosition},
    coord::Shift,
    element::PathElement,
    prelude::{BitMapBackend, DrawingArea, DrawingBackend, IntoDrawingArea, SVGBackend},
    series::LineSeries,
    style::{Color, IntoFont, BLACK, BLUE, RED, WHITE},
};

use crate::{
    error::{EllResult, EllipsError},
    export::timestamped_directory,
    supervector::{MixingAxis, Supervector},
};

/// Size of the rendered figure in pixels.
const FIGURE_SIZE: (u32, u32) = (1000, 650);

/// Thickness and mixing index of the sweep point to be plotted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlotSelection {
    /// index into the thickness axis
    pub thickness: usize,
    /// index into the mixing axis (always 0 for a plain sweep)
    pub mixing: usize,
}
impl FromStr for PlotSelection {
    type Err = EllipsError;

    /// Parse `<thickness_idx>` or `<thickness_idx>,<mixing_idx>`.
    fn from_str(s: &str) -> EllResult<Self> {
        let parse_index = |token: &str| {
            token.trim().parse::<usize>().map_err(|_| {
                EllipsError::InvalidParameter(format!(
                    "'{s}' is not a valid plot selection, expected <thickness>[,<mixing>]"
                ))
            })
        };
        match s.split_once(',') {
            Some((thickness, mixing)) => Ok(Self {
                thickness: parse_index(thickness)?,
                mixing: parse_index(mixing)?,
            }),
            None => Ok(Self {
                thickness: parse_index(s)?,
                mixing: 0,
            }),
        }
    }
}
impl Display for PlotSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.thickness, self.mixing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlotFormat {
    Svg,
    Bitmap,
}
impl PlotFormat {
    fn from_path(path: &Path) -> EllResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("svg") => Ok(Self::Svg),
            Some("png" | "bmp" | "jpg") => Ok(Self::Bitmap),
            _ => Err(EllipsError::InvalidParameter(format!(
                "unsupported plot file {}, use .svg, .png, .bmp or .jpg",
                path.display()
            ))),
        }
    }
}

/// Psi and Delta (in degrees) over wavelength for one sweep point of a [`Supervector`].
#[derive(Debug, Clone, PartialEq)]
pub struct PsiDeltaCurve {
    title: String,
    wavelengths: Vec<f64>,
    psi: Vec<f64>,
    delta: Vec<f64>,
}
impl PsiDeltaCurve {
    /// Extract the curve at the given thickness and mixing index.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::InvalidParameter`] if one of the indices is out
    /// of range.
    pub fn new(supervector: &Supervector, thickness: usize, mixing: usize) -> EllResult<Self> {
        let thickness_value = supervector.thicknesses().get(thickness).ok_or_else(|| {
            EllipsError::InvalidParameter(format!(
                "thickness index {thickness} out of range (0..{})",
                supervector.thicknesses().len()
            ))
        })?;
        let mixing_axis = supervector.mixing();
        if mixing >= mixing_axis.len() {
            return Err(EllipsError::InvalidParameter(format!(
                "mixing index {mixing} out of range (0..{})",
                mixing_axis.len()
            )));
        }
        let base = format!("Ellipsometric data for thickness {thickness_value} nm");
        let title = match mixing_axis {
            MixingAxis::None => base,
            MixingAxis::VolumeFractions(fractions) => {
                format!("{base}, {:.1}% volume fraction", fractions[mixing] * 100.0)
            }
            MixingAxis::Oscillators(oscillators) => format!("{base}, {}", oscillators[mixing]),
        };
        let nwave = supervector.nr_of_wavelengths();
        let psi = (0..nwave)
            .map(|i| supervector.psi(i, thickness, mixing))
            .collect::<Option<Vec<f64>>>();
        let delta = (0..nwave)
            .map(|i| supervector.delta(i, thickness, mixing))
            .collect::<Option<Vec<f64>>>();
        let (Some(psi), Some(delta)) = (psi, delta) else {
            return Err(EllipsError::InvalidParameter(format!(
                "no data at sweep point ({thickness}, {mixing})"
            )));
        };
        Ok(Self {
            title,
            wavelengths: supervector.wavelengths().to_vec(),
            psi,
            delta,
        })
    }
    /// Returns the title of this [`PsiDeltaCurve`].
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
    /// Returns the wavelengths (in nm) of this [`PsiDeltaCurve`].
    #[must_use]
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }
    /// Returns the Psi values (in degrees) of this [`PsiDeltaCurve`].
    #[must_use]
    pub fn psi(&self) -> &[f64] {
        &self.psi
    }
    /// Returns the Delta values (in degrees) of this [`PsiDeltaCurve`].
    #[must_use]
    pub fn delta(&self) -> &[f64] {
        &self.delta
    }
    /// Render this curve into the given file. The backend is selected by the file extension
    /// (`svg` or `png` / `bmp` / `jpg`).
    ///
    /// # Errors
    ///
    /// This function will return
    ///   - an [`EllipsError::InvalidParameter`] if the file extension is not supported
    ///   - an [`EllipsError::Plot`] if drawing or writing the plot fails
    pub fn to_plot(&self, path: &Path) -> EllResult<()> {
        match PlotFormat::from_path(path)? {
            PlotFormat::Svg => self.draw(&SVGBackend::new(path, FIGURE_SIZE).into_drawing_area()),
            PlotFormat::Bitmap => {
                self.draw(&BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area())
            }
        }
    }
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> EllResult<()> {
        root.fill(&WHITE).map_err(plot_error)?;
        let (x_min, x_max) = axis_limits(self.wavelengths.iter().copied());
        let (y_min, y_max) = axis_limits(self.psi.iter().chain(&self.delta).copied());
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 22).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(plot_error)?;
        chart
            .configure_mesh()
            .x_desc("wavelength (nm)")
            .y_desc("ψ (red), Δ (blue) (°)")
            .draw()
            .map_err(plot_error)?;
        chart
            .draw_series(LineSeries::new(
                self.wavelengths.iter().copied().zip(self.psi.iter().copied()),
                RED.stroke_width(2),
            ))
            .map_err(plot_error)?
            .label("Psi")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        chart
            .draw_series(LineSeries::new(
                self.wavelengths
                    .iter()
                    .copied()
                    .zip(self.delta.iter().copied()),
                BLUE.stroke_width(2),
            ))
            .map_err(plot_error)?
            .label("Delta")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_error)?;
        root.present().map_err(plot_error)
    }
}

fn plot_error<E: Display>(e: E) -> EllipsError {
    EllipsError::Plot(e.to_string())
}

/// Minimum and maximum of the values, widened by 5 % (or by 1.0 for a single value).
fn axis_limits(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let margin = if max - min > f64::EPSILON {
        0.05 * (max - min)
    } else {
        1.0
    };
    (min - margin, max + margin)
}

/// Plot Psi and Delta of the selected sweep point into the given file.
///
/// # Errors
///
/// This function will return an error if the selection is out of range, the file extension is not
/// supported or the plot cannot be written.
pub fn plot_psi_delta(supervector: &Supervector, selection: PlotSelection, path: &Path) -> EllResult<()> {
    PsiDeltaCurve::new(supervector, selection.thickness, selection.mixing)?.to_plot(path)?;
    info!("plot of sweep point ({selection}) saved to {}", path.display());
    Ok(())
}

/// Plot Psi and Delta of the selected sweep point as SVG into a timestamped subdirectory of the
/// given output directory.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// This function will return an error if the selection is out of range, the directory cannot be
/// created or the plot cannot be written.
pub fn save_plot(
    supervector: &Supervector,
    selection: PlotSelection,
    output_dir: &Path,
) -> EllResult<PathBuf> {
    let dir = timestamped_directory(output_dir, &Local::now())?;
    let path = dir.join(format!(
        "psi_delta_{}_{}.svg",
        selection.thickness, selection.mixing
    ));
    plot_psi_delta(supervector, selection, &path)?;
    Ok(path)
}
