use crate::config::DisplayMode;
use gdbmi_engine::UiEffect;
use gdbmi_types::{BreakpointId, Frame, ThreadGroupId};
use serde::Serialize;

/// Value of one watch expression at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayValue {
    pub expr: String,
    pub value: String,
}

/// Everything the presentation layer needs to render watch expressions for
/// one stop location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayContext {
    pub session: String,
    pub addr: String,
    pub frame: Frame,
    pub values: Vec<DisplayValue>,
}

/// Presentation layer a session reports observable changes to.
///
/// Calls are made from the session's read task and must not block.
pub trait Ui: Send + Sync {
    fn jump(&self, file: &str, line: u32);

    /// Move the execution cursor to `frame`; frames without a source
    /// position are ignored.
    fn jump_frame(&self, frame: &Frame) {
        if let Some((file, line)) = frame.source() {
            self.jump(file, line);
        }
    }

    fn set_breakpoint(&self, id: BreakpointId, file: &str, line: u32);
    fn del_breakpoint(&self, id: BreakpointId);
    fn del_cursor(&self, group: &ThreadGroupId);

    /// Failure of a command nobody was waiting on.
    fn error(&self, message: &str);
    /// Failure not tied to any command: unmatched results, unreadable output.
    fn async_error(&self, message: &str);

    fn display(&self, context: &DisplayContext);

    fn float_display(&self, context: &DisplayContext) {
        self.display(context);
    }

    fn virtual_display(&self, context: &DisplayContext) {
        self.display(context);
    }
}

pub(crate) fn perform(ui: &dyn Ui, effect: UiEffect) {
    match effect {
        UiEffect::SetBreakpoint { id, file, line } => ui.set_breakpoint(id, &file, line),
        UiEffect::DelBreakpoint(id) => ui.del_breakpoint(id),
        UiEffect::DelCursor(group) => ui.del_cursor(&group),
        UiEffect::JumpFrame(frame) => ui.jump_frame(&frame),
    }
}

pub(crate) fn show(ui: &dyn Ui, mode: DisplayMode, context: &DisplayContext) {
    match mode {
        DisplayMode::Panel => ui.display(context),
        DisplayMode::Float => ui.float_display(context),
        DisplayMode::Virtual => ui.virtual_display(context),
    }
}
