use gdbmi_types::{BreakpointId, CommandToken};
use std::fmt;

/// Result type for gdbmi-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// A line of debugger output could not be parsed
    Parse(gdbmi_protocol::ParseError),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// The session's channel or read loop has ended
    Closed(String),

    /// Caller supplied arguments that cannot form a command
    InvalidArgument(String),

    /// No breakpoint at the requested source position
    BreakpointNotFound { file: String, line: u32 },

    /// No breakpoint with the requested number
    UnknownBreakpoint(BreakpointId),

    /// The debugger answered with `^error`
    Command { token: CommandToken, message: String },

    /// A result record lacked a field the operation depends on
    UnexpectedResult(String),

    /// No result arrived within the configured command timeout
    Timeout(CommandToken),

    /// A session with this name is already running
    SessionExists(String),

    /// No session with this name
    UnknownSession(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "Parse error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Closed(name) => write!(f, "Session closed: {}", name),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::BreakpointNotFound { file, line } => {
                write!(f, "No breakpoint at {}:{}", file, line)
            }
            Error::UnknownBreakpoint(id) => write!(f, "Unknown breakpoint: {}", id),
            Error::Command { token, message } => {
                write!(f, "Command {} failed: {}", token, message)
            }
            Error::UnexpectedResult(msg) => write!(f, "Unexpected result: {}", msg),
            Error::Timeout(token) => write!(f, "Timed out waiting for command {}", token),
            Error::SessionExists(name) => write!(f, "Session already exists: {}", name),
            Error::UnknownSession(name) => write!(f, "Unknown session: {}", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<gdbmi_protocol::ParseError> for Error {
    fn from(err: gdbmi_protocol::ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<gdbmi_types::Error> for Error {
    fn from(err: gdbmi_types::Error) -> Self {
        Error::InvalidArgument(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
