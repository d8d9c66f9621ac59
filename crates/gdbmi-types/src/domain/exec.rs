use crate::error::{Error, Result};
use crate::event::ExecEvent;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Execution status of the debuggee, driven only by `*running`/`*stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecState {
    #[default]
    Ready,
    Running,
    Stopped,
}

impl ExecState {
    pub fn on_event(self, event: &ExecEvent) -> ExecState {
        match event {
            ExecEvent::Running => ExecState::Running,
            ExecEvent::Stopped => ExecState::Stopped,
            ExecEvent::Other(_) => self,
        }
    }
}

impl fmt::Display for ExecState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecState::Ready => "ready",
            ExecState::Running => "running",
            ExecState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// The `-exec-*` commands a session may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecCommand {
    Run,
    Next,
    Step,
    Continue,
    Finish,
    NextInstruction,
    StepInstruction,
}

impl ExecCommand {
    pub const ALL: [ExecCommand; 7] = [
        ExecCommand::Run,
        ExecCommand::Next,
        ExecCommand::Step,
        ExecCommand::Continue,
        ExecCommand::Finish,
        ExecCommand::NextInstruction,
        ExecCommand::StepInstruction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecCommand::Run => "run",
            ExecCommand::Next => "next",
            ExecCommand::Step => "step",
            ExecCommand::Continue => "continue",
            ExecCommand::Finish => "finish",
            ExecCommand::NextInstruction => "next-instruction",
            ExecCommand::StepInstruction => "step-instruction",
        }
    }
}

impl FromStr for ExecCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ExecCommand::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| Error::UnknownExecCommand(s.to_string()))
    }
}

impl fmt::Display for ExecCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
