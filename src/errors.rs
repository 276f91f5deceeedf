//! Error types shared by the DIMACS loader, the clock and the YAML bookkeeping.

use std::error::Error;
use std::fmt;
use std::io;
use std::num::ParseIntError;

/// Error returned by the Clock when a subroutine timer is misused, e.g. when
/// exiting a subroutine that has never been entered.
#[derive(Debug)]
pub struct ClockError {
    pub message: String,
}

impl ClockError {
    pub fn new(message: &str) -> ClockError {
        ClockError {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ClockError {}

/// Error returned when a DIMACS file cannot be read or contains a line that is
/// not one of the known kinds (`c`, `d`, `v`, `x`, `p`, `e`, `n`).
#[derive(Debug)]
pub struct InvalidClqFileFormat {
    pub message: String,
}

impl InvalidClqFileFormat {
    pub fn new(message: &str) -> InvalidClqFileFormat {
        InvalidClqFileFormat {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for InvalidClqFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for InvalidClqFileFormat {}

impl From<io::Error> for InvalidClqFileFormat {
    fn from(err: io::Error) -> Self {
        InvalidClqFileFormat::new(&err.to_string())
    }
}

impl From<ParseIntError> for InvalidClqFileFormat {
    fn from(err: ParseIntError) -> Self {
        InvalidClqFileFormat::new(&err.to_string())
    }
}

/// Errors raised by the YAML bookkeeping layer (`graph_data.yml` and
/// `time_result.yml`).
pub enum YamlError {
    /// Error returned when there is an error while creating / opening a file.
    IoError(String, io::Error),
    /// Error returned when a graph id is not registered in the YAML file.
    NotFound(String, String),
    /// Error returned when an error occurs while parsing the YAML file.
    YamlParsingError(String, serde_yaml::Error),
    /// Error returned when the YAML file does not have the expected shape.
    YamlFormatError(String, serde_yaml::Error),
}

impl fmt::Display for YamlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            YamlError::IoError(msg, _err) => write!(f, "{}", msg),
            YamlError::NotFound(msg, _err) => write!(f, "{}", msg),
            YamlError::YamlParsingError(msg, _err) => write!(f, "{}.", msg),
            YamlError::YamlFormatError(msg, _err) => write!(f, "{}.", msg),
        }
    }
}

impl fmt::Debug for YamlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            YamlError::IoError(msg, err) => write!(f, "{}:\n {:?}", msg, err),
            YamlError::NotFound(msg, err) => write!(f, "{}:\n {:?}", msg, err),
            YamlError::YamlParsingError(msg, err) => write!(f, "{}:\n {:?}", msg, err),
            YamlError::YamlFormatError(msg, err) => write!(f, "{}:\n {:?}", msg, err),
        }
    }
}

impl Error for YamlError {}

impl From<serde_yaml::Error> for YamlError {
    fn from(err: serde_yaml::Error) -> Self {
        YamlError::YamlParsingError("Error parsing YAML file".to_string(), err)
    }
}

impl From<io::Error> for YamlError {
    fn from(err: io::Error) -> Self {
        YamlError::IoError("Error while creating / opening file".to_string(), err)
    }
}
