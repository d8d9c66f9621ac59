use crate::config::GdbConfig;
use crate::{Error, Result};
use std::process::Stdio;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::info;

/// A running debugger with its MI pipes taken out.
pub struct DebuggerProcess {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
}

/// Build the debugger command line: configured arguments, then the debuggee
/// and its own arguments after `--args` when it has any.
pub fn debugger_args(config: &GdbConfig, debuggee: &[String]) -> Vec<String> {
    let mut args = config.args.clone();
    if debuggee.len() > 1 {
        args.push("--args".to_string());
    }
    args.extend(debuggee.iter().cloned());
    args
}

pub fn spawn_debugger(config: &GdbConfig, debuggee: &[String]) -> Result<DebuggerProcess> {
    let args = debugger_args(config, debuggee);
    info!(gdb = %config.path, args = ?args, "starting debugger");

    let mut child = Command::new(&config.path)
        .args(&args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| Error::Closed("debugger stdin unavailable".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Closed("debugger stdout unavailable".to_string()))?;

    Ok(DebuggerProcess {
        child,
        stdin,
        stdout,
    })
}
