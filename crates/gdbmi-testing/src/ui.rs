use anyhow::{Result, anyhow};
use gdbmi_runtime::{DisplayContext, Ui};
use gdbmi_types::{BreakpointId, ThreadGroupId};
use std::sync::Mutex;
use std::time::Duration;

const WAIT_LIMIT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// One call a session made on its UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCall {
    Jump { file: String, line: u32 },
    SetBreakpoint { id: BreakpointId, file: String, line: u32 },
    DelBreakpoint(BreakpointId),
    DelCursor(ThreadGroupId),
    Error(String),
    AsyncError(String),
    Display(DisplayContext),
    FloatDisplay(DisplayContext),
    VirtualDisplay(DisplayContext),
}

/// `Ui` that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingUi {
    calls: Mutex<Vec<UiCall>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<UiCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    /// Poll until a recorded call matches, since sessions report from their
    /// own task.
    pub async fn wait_for<F>(&self, what: &str, matches: F) -> Result<UiCall>
    where
        F: Fn(&UiCall) -> bool,
    {
        let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
        loop {
            if let Some(call) = self.calls().into_iter().find(|c| matches(c)) {
                return Ok(call);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(anyhow!("no {} call; recorded: {:?}", what, self.calls()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    fn record(&self, call: UiCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Ui for RecordingUi {
    fn jump(&self, file: &str, line: u32) {
        self.record(UiCall::Jump {
            file: file.to_string(),
            line,
        });
    }

    fn set_breakpoint(&self, id: BreakpointId, file: &str, line: u32) {
        self.record(UiCall::SetBreakpoint {
            id,
            file: file.to_string(),
            line,
        });
    }

    fn del_breakpoint(&self, id: BreakpointId) {
        self.record(UiCall::DelBreakpoint(id));
    }

    fn del_cursor(&self, group: &ThreadGroupId) {
        self.record(UiCall::DelCursor(group.clone()));
    }

    fn error(&self, message: &str) {
        self.record(UiCall::Error(message.to_string()));
    }

    fn async_error(&self, message: &str) {
        self.record(UiCall::AsyncError(message.to_string()));
    }

    fn display(&self, context: &DisplayContext) {
        self.record(UiCall::Display(context.clone()));
    }

    fn float_display(&self, context: &DisplayContext) {
        self.record(UiCall::FloatDisplay(context.clone()));
    }

    fn virtual_display(&self, context: &DisplayContext) {
        self.record(UiCall::VirtualDisplay(context.clone()));
    }
}
