use crate::config::Config;
use crate::process::spawn_debugger;
use crate::session::Session;
use crate::ui::Ui;
use crate::{Error, Result};
use gdbmi_protocol::command;
use gdbmi_types::{BreakLocation, BreakpointId, CommandToken, ExecCommand};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Child;
use tracing::{debug, info};

/// Outcome of toggling a breakpoint at a source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakSwitch {
    Inserted(BreakpointId),
    Deleted(BreakpointId),
}

struct Hosted {
    session: Session,
    // held so the handle outlives the session; the debugger exits on its
    // own once its input closes
    _child: Option<Child>,
}

/// Named sessions driven by an editor front end.
pub struct Host {
    config: Config,
    ui: Arc<dyn Ui>,
    sessions: BTreeMap<String, Hosted>,
}

impl Host {
    pub fn new(config: Config, ui: Arc<dyn Ui>) -> Self {
        Self {
            config,
            ui,
            sessions: BTreeMap::new(),
        }
    }

    /// Launch a debugger for `debuggee` (program path and arguments) under
    /// `name`, then point the debuggee's terminal at `gdb.inferior_tty`.
    pub async fn start(&mut self, name: &str, debuggee: &[String]) -> Result<&Session> {
        if self.sessions.contains_key(name) {
            return Err(Error::SessionExists(name.to_string()));
        }
        if debuggee.is_empty() {
            return Err(Error::InvalidArgument("no debuggee given".to_string()));
        }

        let process = spawn_debugger(&self.config.gdb, debuggee)?;
        let session = Session::spawn(
            name,
            process.stdout,
            process.stdin,
            self.ui.clone(),
            self.config.session.clone(),
        );
        info!(session = name, debuggee = %debuggee.join(" "), "session started");
        self.insert(name, session, Some(process.child));
        self.redirect_inferior(name).await?;
        self.session(name)
    }

    /// Send `-inferior-tty-set` for the configured terminal without waiting
    /// for its result; a failure reaches the UI as a command error. Returns
    /// `None` when no terminal is configured.
    pub async fn redirect_inferior(&self, name: &str) -> Result<Option<CommandToken>> {
        let session = self.session(name)?;
        let tty = &self.config.gdb.inferior_tty;
        if tty.is_empty() {
            return Ok(None);
        }
        debug!(session = name, tty = %tty, "redirecting debuggee terminal");
        let token = session.send(&command::inferior_tty_set(tty)).await?;
        Ok(Some(token))
    }

    /// Run a session over an already connected transport.
    pub fn attach<R, W>(&mut self, name: &str, reader: R, writer: W) -> Result<&Session>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        if self.sessions.contains_key(name) {
            return Err(Error::SessionExists(name.to_string()));
        }
        let session = Session::spawn(
            name,
            reader,
            writer,
            self.ui.clone(),
            self.config.session.clone(),
        );
        Ok(self.insert(name, session, None))
    }

    fn insert(&mut self, name: &str, session: Session, child: Option<Child>) -> &Session {
        &self
            .sessions
            .entry(name.to_string())
            .or_insert(Hosted {
                session,
                _child: child,
            })
            .session
    }

    pub async fn stop(&mut self, name: &str) -> Result<()> {
        let hosted = self
            .sessions
            .remove(name)
            .ok_or_else(|| Error::UnknownSession(name.to_string()))?;
        info!(session = name, "session stopped");
        hosted.session.stop().await
    }

    /// Stop every session, reporting the first failure.
    pub async fn shutdown(&mut self) -> Result<()> {
        let mut first_error = None;
        for (_, hosted) in std::mem::take(&mut self.sessions) {
            if let Err(err) = hosted.session.stop().await
                && first_error.is_none()
            {
                first_error = Some(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Delete the plain breakpoint at `file:line`, or insert one if there is
    /// none.
    pub async fn breakswitch(&self, name: &str, file: &str, line: u32) -> Result<BreakSwitch> {
        let session = self.session(name)?;
        match session.breakpoints_status(file, line).await? {
            Some(id) => {
                session.do_break_delete(file, line).await?;
                Ok(BreakSwitch::Deleted(id))
            }
            None => {
                let location = BreakLocation::Source {
                    file: file.to_string(),
                    line,
                };
                let id = session.do_break_insert(&location, false).await?;
                Ok(BreakSwitch::Inserted(id))
            }
        }
    }

    pub async fn display(&self, name: &str, expr: &str) -> Result<bool> {
        self.session(name)?.add_display(expr).await
    }

    /// Run an exec command given by name (`next`, `step-instruction`, ...).
    pub async fn exec(&self, name: &str, command: &str, args: &[String]) -> Result<CommandToken> {
        let command: ExecCommand = command.parse()?;
        self.session(name)?.do_exec(command, args, None).await
    }

    pub fn session(&self, name: &str) -> Result<&Session> {
        self.sessions
            .get(name)
            .map(|hosted| &hosted.session)
            .ok_or_else(|| Error::UnknownSession(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.sessions.keys().map(String::as_str).collect()
    }
}
