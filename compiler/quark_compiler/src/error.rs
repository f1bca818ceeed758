//! Driver errors: failures outside the compiler proper.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// I/O failure while reading a source file or writing its artifact.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
