// gdbmi command-line front end.
//
// `parse` turns an MI transcript into JSON, one object per record, for
// inspecting what a debugger actually said. `serve` hosts named debugger
// sessions behind a line-oriented request protocol on stdin and prints the
// UI calls those sessions make on stdout, one per line.

mod args;
mod commands;
mod console_ui;
mod handlers;
mod logging;

pub use args::{Cli, Commands, ConfigCommand, LogLevel};
pub use commands::run;
pub use console_ui::ConsoleUi;
