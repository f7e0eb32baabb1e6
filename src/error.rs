//! Error management.

use derive_more::Display;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Every error is fatal to the read that raised it: no retries, no partial
/// results.
#[derive(Debug, Display)]
pub enum Error {
    /// A malformed numeric token.
    #[display(fmt = "{}: line {}: invalid token '{}'", file, line, token)]
    Parse {
        file: String,
        line: usize,
        token: String,
    },
    /// An input file declared by the configuration is absent.
    #[display(fmt = "missing input file: {}", "_0.display()")]
    MissingFile(PathBuf),
    /// The input files break the TU format contract.
    #[display(fmt = "format violation: {}", _0)]
    FormatViolation(String),
    /// Any other I/O failure.
    #[display(fmt = "{}", _0)]
    Io(io::Error),
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
