use std::fmt;

/// Result type for gdbmi-protocol operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// A line of debugger output that does not follow the MI grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No token rule matches at this offset
    UnexpectedChar { offset: usize, fragment: String },

    /// A token of the wrong kind
    UnexpectedToken { expected: &'static str, found: String },

    /// The line ended before the record was complete
    UnexpectedEnd { expected: &'static str },

    /// Malformed backslash escape inside a quoted constant
    InvalidEscape { fragment: String },

    /// Numeric prefix that does not fit a command token
    InvalidToken(String),

    /// Result class outside done/running/connected/error/exit
    UnknownResultClass(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedChar { offset, fragment } => {
                write!(f, "Unexpected input at offset {}: {:?}", offset, fragment)
            }
            ParseError::UnexpectedToken { expected, found } => {
                write!(f, "Expected {}, found {:?}", expected, found)
            }
            ParseError::UnexpectedEnd { expected } => {
                write!(f, "Unexpected end of line, expected {}", expected)
            }
            ParseError::InvalidEscape { fragment } => {
                write!(f, "Invalid escape sequence: {:?}", fragment)
            }
            ParseError::InvalidToken(raw) => write!(f, "Invalid command token: {}", raw),
            ParseError::UnknownResultClass(class) => write!(f, "Unknown result class: {}", class),
        }
    }
}

impl std::error::Error for ParseError {}
