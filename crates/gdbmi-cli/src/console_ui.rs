use gdbmi_runtime::{DisplayContext, Ui};
use gdbmi_types::{BreakpointId, ThreadGroupId};
use std::io::Write;

/// Prints each UI call as one line on stdout: the call name followed by its
/// arguments, displays as JSON.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    fn emit(&self, line: String) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }

    fn emit_display(&self, call: &str, context: &DisplayContext) {
        match serde_json::to_string(context) {
            Ok(json) => self.emit(format!("{} {}", call, json)),
            Err(err) => self.emit(format!("async_error cannot encode display: {}", err)),
        }
    }
}

impl Ui for ConsoleUi {
    fn jump(&self, file: &str, line: u32) {
        self.emit(format!("jump {} {}", file, line));
    }

    fn set_breakpoint(&self, id: BreakpointId, file: &str, line: u32) {
        self.emit(format!("set_breakpoint {} {} {}", id, file, line));
    }

    fn del_breakpoint(&self, id: BreakpointId) {
        self.emit(format!("del_breakpoint {}", id));
    }

    fn del_cursor(&self, group: &ThreadGroupId) {
        self.emit(format!("del_cursor {}", group));
    }

    fn error(&self, message: &str) {
        self.emit(format!("error {}", message));
    }

    fn async_error(&self, message: &str) {
        self.emit(format!("async_error {}", message));
    }

    fn display(&self, context: &DisplayContext) {
        self.emit_display("display", context);
    }

    fn float_display(&self, context: &DisplayContext) {
        self.emit_display("float_display", context);
    }

    fn virtual_display(&self, context: &DisplayContext) {
        self.emit_display("virtual_display", context);
    }
}
