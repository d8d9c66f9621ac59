use std::fmt;

/// Result type for gdbmi-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Breakpoint number is neither "N" nor "N.M"
    InvalidBreakpointId(String),

    /// Execution command outside the supported set
    UnknownExecCommand(String),

    /// Breakpoint location given neither as file+line nor as a function
    InvalidLocation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBreakpointId(raw) => write!(f, "Invalid breakpoint number: {}", raw),
            Error::UnknownExecCommand(cmd) => write!(f, "Unknown exec command: {}", cmd),
            Error::InvalidLocation(msg) => write!(f, "Invalid breakpoint location: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
