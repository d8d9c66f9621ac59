use crate::event::AsyncEvent;
use crate::value::Results;
use serde::Serialize;
use std::fmt;

/// Correlation token prefixed to outbound commands and echoed on their
/// result records. Rendered zero-padded to four digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CommandToken(pub u32);

impl CommandToken {
    pub fn next(self) -> Self {
        CommandToken(self.0 + 1)
    }
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultClass {
    Done,
    Running,
    Connected,
    Error,
    Exit,
}

impl ResultClass {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "done" => Some(ResultClass::Done),
            "running" => Some(ResultClass::Running),
            "connected" => Some(ResultClass::Connected),
            "error" => Some(ResultClass::Error),
            "exit" => Some(ResultClass::Exit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultClass::Done => "done",
            ResultClass::Running => "running",
            ResultClass::Connected => "connected",
            ResultClass::Error => "error",
            ResultClass::Exit => "exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AsyncClass {
    /// `*` records: execution state changes
    Exec,
    /// `+` records: progress of long operations
    Status,
    /// `=` records: supplementary notifications
    Notify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamClass {
    Console,
    Target,
    Log,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub class: ResultClass,
    pub results: Results,
}

impl ResultRecord {
    pub fn is_error(&self) -> bool {
        self.class == ResultClass::Error
    }

    /// The `msg` field of an `^error` record.
    pub fn error_message(&self) -> Option<&str> {
        if self.is_error() {
            self.results.get_str("msg")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsyncRecord {
    pub class: AsyncClass,
    pub name: String,
    pub results: Results,
}

impl AsyncRecord {
    pub fn event(&self) -> AsyncEvent {
        AsyncEvent::classify(self.class, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamRecord {
    pub class: StreamClass,
    pub text: String,
}

/// One parsed line of debugger output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    /// The `(gdb)` end-of-output marker.
    Prompt,
    Result(ResultRecord),
    Async(AsyncRecord),
    Stream(StreamRecord),
}

/// A record together with the token it was prefixed with, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    pub token: Option<CommandToken>,
    pub record: Record,
}

impl Output {
    pub fn prompt() -> Self {
        Self {
            token: None,
            record: Record::Prompt,
        }
    }

    pub fn is_prompt(&self) -> bool {
        matches!(self.record, Record::Prompt)
    }
}
