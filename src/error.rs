#![warn(missing_docs)]
//! ellipsim specific error structures
use std::{error::Error, fmt::Display};

/// ellipsim specific Result type
pub type EllResult<T> = std::result::Result<T, EllipsError>;

/// Errors that can be returned by the various simulation functions.
#[derive(Debug, PartialEq, Eq)]
pub enum EllipsError {
    /// a material table is missing, unreadable or malformed
    DataFormat(String),
    /// none of the requested wavelengths lies inside the valid wavelength domain
    OutOfDomain(String),
    /// unsupported nanoparticle material
    InvalidMaterial(String),
    /// missing or inconsistent sweep parameters (thickness, volume fraction, angle, ...)
    InvalidParameter(String),
    /// the ellipsometry solver could not evaluate a layer stack
    Solver(String),
    /// errors while writing or reading result files
    Export(String),
    /// errors while rendering a plot
    Plot(String),
    /// errors in connection with job configuration files
    Config(String),
    /// errors console io
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for EllipsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataFormat(m) => {
                write!(f, "DataFormat:{m}")
            }
            Self::OutOfDomain(m) => {
                write!(f, "OutOfDomain:{m}")
            }
            Self::InvalidMaterial(m) => {
                write!(f, "InvalidMaterial:{m}")
            }
            Self::InvalidParameter(m) => {
                write!(f, "InvalidParameter:{m}")
            }
            Self::Solver(m) => {
                write!(f, "Solver:{m}")
            }
            Self::Export(m) => {
                write!(f, "Export:{m}")
            }
            Self::Plot(m) => {
                write!(f, "Plot:{m}")
            }
            Self::Config(m) => {
                write!(f, "Config:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "ellipsim Error:Other:{m}"),
        }
    }
}
impl Error for EllipsError {}

impl std::convert::From<String> for EllipsError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from() {
        let error = EllipsError::from("test".to_string());
        assert_eq!(error, EllipsError::Other("test".to_string()));
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", EllipsError::DataFormat("test".to_string())),
            "DataFormat:test"
        );
        assert_eq!(
            format!("{}", EllipsError::OutOfDomain("test".to_string())),
            "OutOfDomain:test"
        );
        assert_eq!(
            format!("{}", EllipsError::InvalidMaterial("test".to_string())),
            "InvalidMaterial:test"
        );
        assert_eq!(
            format!("{}", EllipsError::InvalidParameter("test".to_string())),
            "InvalidParameter:test"
        );
        assert_eq!(
            format!("{}", EllipsError::Solver("test".to_string())),
            "Solver:test"
        );
        assert_eq!(
            format!("{}", EllipsError::Export("test".to_string())),
            "Export:test"
        );
        assert_eq!(
            format!("{}", EllipsError::Plot("test".to_string())),
            "Plot:test"
        );
        assert_eq!(
            format!("{}", EllipsError::Config("test".to_string())),
            "Config:test"
        );
        assert_eq!(
            format!("{}", EllipsError::Console("test".to_string())),
            "Console:test"
        );
        assert_eq!(
            format!("{}", EllipsError::Other("test".to_string())),
            "ellipsim Error:Other:test"
        );
    }
    #[test]
    fn debug() {
        assert_eq!(
            format!("{:?}", EllipsError::OutOfDomain("test".to_string())),
            "OutOfDomain(\"test\")"
        );
    }
}
