//! Outbound MI command text.

use crate::escape::{quote, quote_arg};
use gdbmi_types::{BreakLocation, BreakpointChange, BreakpointId, CommandToken, ExecCommand};

pub const LIST_LOCALS: &str = "-stack-list-variables --simple-values";
pub const LIST_FRAMES: &str = "-stack-list-frames";
pub const GDB_EXIT: &str = "-gdb-exit";
pub const EXEC_INTERRUPT: &str = "-exec-interrupt";

/// Wire form of a command: `<token><command>\n`.
pub fn encode(token: CommandToken, command: &str) -> String {
    format!("{}{}\n", token, command)
}

pub fn break_insert(location: &BreakLocation, temporary: bool) -> String {
    let location = quote_arg(&location.to_string());
    if temporary {
        format!("-break-insert -t {}", location)
    } else {
        format!("-break-insert {}", location)
    }
}

pub fn break_delete(id: BreakpointId) -> String {
    format!("-break-delete {}", id)
}

pub fn break_change(id: BreakpointId, change: &BreakpointChange) -> String {
    match change {
        BreakpointChange::Condition(condition) if condition.is_empty() => {
            format!("-break-condition {}", id)
        }
        BreakpointChange::Condition(condition) => format!("-break-condition {} {}", id, condition),
        BreakpointChange::IgnoreCount(count) => format!("-break-after {} {}", id, count),
        BreakpointChange::Enabled(true) => format!("-break-enable {}", id),
        BreakpointChange::Enabled(false) => format!("-break-disable {}", id),
    }
}

pub fn exec(command: ExecCommand, args: &[String]) -> String {
    let mut text = format!("-exec-{}", command);
    for arg in args {
        text.push(' ');
        text.push_str(&quote_arg(arg));
    }
    text
}

pub fn evaluate_expression(expr: &str) -> String {
    format!("-data-evaluate-expression {}", quote(expr))
}

/// Run a CLI command through the MI interpreter.
pub fn console(command: &str) -> String {
    format!("-interpreter-exec console {}", quote(command))
}

pub fn inferior_tty_set(path: &str) -> String {
    format!("-inferior-tty-set {}", quote_arg(path))
}
