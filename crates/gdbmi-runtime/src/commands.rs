use gdbmi_types::{
    BreakpointChange, BreakpointId, CommandToken, Frame, ResultClass, ResultRecord,
};
use std::collections::BTreeMap;
use tokio::sync::oneshot;

/// Invoked with the stop frame once the exec command that registered it
/// stops.
pub type ExecCallback = Box<dyn FnOnce(Frame) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    Sent,
    Done,
    Running,
    Error,
}

impl CommandState {
    fn from_class(class: ResultClass) -> Self {
        match class {
            ResultClass::Done | ResultClass::Connected | ResultClass::Exit => CommandState::Done,
            ResultClass::Running => CommandState::Running,
            ResultClass::Error => CommandState::Error,
        }
    }
}

/// Store bookkeeping to run once a command succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Followup {
    DeleteBreakpoint(BreakpointId),
    ChangeBreakpoint(BreakpointId, BreakpointChange),
    /// One watch expression evaluated at a stop; `last` marks the final one
    /// of the batch, after which the collected values are shown.
    Display {
        expr: String,
        frame: Frame,
        last: bool,
    },
}

pub struct Command {
    pub token: CommandToken,
    pub text: String,
    pub state: CommandState,
    pub result: Option<ResultRecord>,
    pub(crate) followup: Option<Followup>,
    pub(crate) completion: Option<oneshot::Sender<ResultRecord>>,
    pub(crate) exec_callback: Option<ExecCallback>,
}

/// What the dispatcher must act on after a result arrives.
pub(crate) struct Resolved {
    pub completion: Option<oneshot::Sender<ResultRecord>>,
    pub followup: Option<Followup>,
}

/// Pending commands keyed by token.
///
/// Tokens increase strictly for the table's lifetime. An entry lives until
/// its result arrives, or past that while an exec callback still waits for
/// a stop.
#[derive(Default)]
pub struct CommandTable {
    last: CommandToken,
    pending: BTreeMap<CommandToken, Command>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next token and record `text` under it.
    pub fn allocate(&mut self, text: &str) -> &mut Command {
        self.last = self.last.next();
        let token = self.last;
        self.pending.entry(token).or_insert(Command {
            token,
            text: text.to_string(),
            state: CommandState::Sent,
            result: None,
            followup: None,
            completion: None,
            exec_callback: None,
        })
    }

    pub fn last_token(&self) -> CommandToken {
        self.last
    }

    pub fn get(&self, token: CommandToken) -> Option<&Command> {
        self.pending.get(&token)
    }

    pub fn remove(&mut self, token: CommandToken) -> Option<Command> {
        self.pending.remove(&token)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Record `record` as the result of `token`; `None` if no such command
    /// is pending.
    pub(crate) fn resolve(
        &mut self,
        token: CommandToken,
        record: &ResultRecord,
    ) -> Option<Resolved> {
        let command = self.pending.get_mut(&token)?;
        command.state = CommandState::from_class(record.class);
        command.result = Some(record.clone());

        if command.state == CommandState::Error {
            // an exec command that failed never stops
            command.exec_callback = None;
        }

        let resolved = Resolved {
            completion: command.completion.take(),
            followup: command.followup.take(),
        };
        if command.exec_callback.is_none() {
            self.pending.remove(&token);
        }
        Some(resolved)
    }

    pub(crate) fn take_exec_callback(&mut self, token: CommandToken) -> Option<ExecCallback> {
        let command = self.pending.get_mut(&token)?;
        let callback = command.exec_callback.take();
        if command.state != CommandState::Sent {
            self.pending.remove(&token);
        }
        callback
    }

    /// Discard every waiting exec callback, pruning entries whose result
    /// already arrived. Returns how many were discarded.
    pub(crate) fn drop_exec_callbacks(&mut self) -> usize {
        let mut dropped = 0;
        for command in self.pending.values_mut() {
            if command.exec_callback.take().is_some() {
                dropped += 1;
            }
        }
        self.pending.retain(|_, c| c.state == CommandState::Sent);
        dropped
    }

    /// The callback of the most recently sent exec command still waiting
    /// for a stop.
    pub(crate) fn take_latest_exec_callback(&mut self) -> Option<ExecCallback> {
        let token = self
            .pending
            .values()
            .rev()
            .find(|c| c.exec_callback.is_some())
            .map(|c| c.token)?;
        self.take_exec_callback(token)
    }
}
