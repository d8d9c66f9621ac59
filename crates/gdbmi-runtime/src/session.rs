use crate::commands::{CommandTable, ExecCallback, Followup};
use crate::config::SessionConfig;
use crate::dispatch::Actor;
use crate::display::DisplayRegistry;
use crate::ui::Ui;
use crate::{Error, Result};
use gdbmi_engine::StateStore;
use gdbmi_protocol::command;
use gdbmi_types::{
    BreakLocation, Breakpoint, BreakpointFilter, BreakpointId, BreakpointPatch, CommandToken,
    ExecCommand, ExecState, Frame, ResultRecord, StreamClass, StreamRecord, ThreadGroup, Variable,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// State owned by a session's read task. Callers reach it only through
/// requests the task executes between lines.
pub(crate) struct SessionState {
    pub(crate) table: CommandTable,
    pub(crate) store: StateStore,
    pub(crate) exec_state: ExecState,
    pub(crate) displays: DisplayRegistry,
    console: VecDeque<String>,
    console_limit: usize,
}

impl SessionState {
    pub(crate) fn new(console_limit: usize) -> Self {
        Self {
            table: CommandTable::new(),
            store: StateStore::new(),
            exec_state: ExecState::default(),
            displays: DisplayRegistry::default(),
            console: VecDeque::new(),
            console_limit,
        }
    }

    pub(crate) fn on_stream(&mut self, record: StreamRecord) {
        match record.class {
            StreamClass::Console => {
                if self.console_limit == 0 {
                    return;
                }
                while self.console.len() >= self.console_limit {
                    self.console.pop_front();
                }
                self.console.push_back(record.text);
            }
            StreamClass::Target | StreamClass::Log => {
                debug!(class = ?record.class, text = %record.text.trim_end(), "stream output");
            }
        }
    }
}

/// How a command should be tracked once written.
#[derive(Default)]
pub(crate) struct Setup {
    pub completion: Option<oneshot::Sender<ResultRecord>>,
    pub followup: Option<Followup>,
    pub exec_callback: Option<ExecCallback>,
}

pub(crate) type Access = Box<dyn FnOnce(&mut SessionState) + Send>;

pub(crate) enum Request {
    Send {
        text: String,
        setup: Setup,
        reply: oneshot::Sender<Result<CommandToken>>,
    },
    Access(Access),
    Stop,
}

/// Handle to one debugger session.
///
/// The session's read task owns the command table, the state store and the
/// debugger's input stream. Handles are cheap to clone and talk to the task
/// over a channel, so any number of callers may suspend on results while
/// the task keeps dispatching output.
#[derive(Clone)]
pub struct Session {
    name: String,
    requests: mpsc::UnboundedSender<Request>,
    timeout: Option<Duration>,
    task: Arc<Mutex<Option<JoinHandle<Result<()>>>>>,
}

impl Session {
    /// Start the read task over a debugger's output (`reader`) and input
    /// (`writer`). Must be called within a tokio runtime.
    pub fn spawn<R, W>(
        name: impl Into<String>,
        reader: R,
        writer: W,
        ui: Arc<dyn Ui>,
        config: SessionConfig,
    ) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let name = name.into();
        let (requests, inbox) = mpsc::unbounded_channel();
        let timeout = config.command_timeout();
        let actor = Actor::new(name.clone(), writer, ui, config);
        let task = tokio::spawn(actor.run(reader, inbox));

        Self {
            name,
            requests,
            timeout,
            task: Arc::new(Mutex::new(Some(task))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the read task has ended.
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }

    // --- commands ---

    /// Write a command without waiting for its result.
    pub async fn send(&self, text: &str) -> Result<CommandToken> {
        self.submit(text, Setup::default()).await
    }

    /// Write a command and suspend until its result record arrives.
    /// An `^error` result becomes [`Error::Command`].
    pub async fn execute(&self, text: &str) -> Result<ResultRecord> {
        self.execute_with(text, None).await
    }

    pub async fn do_break_insert(
        &self,
        location: &BreakLocation,
        temporary: bool,
    ) -> Result<BreakpointId> {
        let record = self
            .execute(&command::break_insert(location, temporary))
            .await?;
        let bkpt = record.results.get("bkpt").ok_or_else(|| {
            Error::UnexpectedResult("-break-insert result without bkpt".to_string())
        })?;
        Breakpoint::from_value(bkpt)
            .map(|bp| bp.id)
            .ok_or_else(|| Error::UnexpectedResult("bkpt without a valid number".to_string()))
    }

    /// Delete the breakpoint at `file:line`. Nothing is sent when there is
    /// none.
    pub async fn do_break_delete(&self, file: &str, line: u32) -> Result<BreakpointId> {
        let lookup = file.to_string();
        let id = self
            .access(move |state| state.store.find_by_location(&lookup, line))
            .await?
            .ok_or_else(|| Error::BreakpointNotFound {
                file: file.to_string(),
                line,
            })?;

        self.execute_with(
            &command::break_delete(id),
            Some(Followup::DeleteBreakpoint(id)),
        )
        .await?;
        Ok(id)
    }

    /// Send one command per field of `patch` that differs from the stored
    /// breakpoint, without waiting for their results.
    pub async fn modify_breakpoint(
        &self,
        id: BreakpointId,
        patch: &BreakpointPatch,
    ) -> Result<Vec<CommandToken>> {
        let patch = patch.clone();
        let changes = self
            .access(move |state| {
                state
                    .store
                    .breakpoint(id)
                    .map(|bp| patch.changes_against(bp))
            })
            .await?
            .ok_or(Error::UnknownBreakpoint(id))?;

        let mut tokens = Vec::with_capacity(changes.len());
        for change in changes {
            let text = command::break_change(id, &change);
            let setup = Setup {
                followup: Some(Followup::ChangeBreakpoint(id, change)),
                ..Setup::default()
            };
            tokens.push(self.submit(text, setup).await?);
        }
        Ok(tokens)
    }

    /// Start an exec command. `callback` runs with the stop frame when the
    /// command's `*stopped` record arrives.
    pub async fn do_exec(
        &self,
        command: ExecCommand,
        args: &[String],
        callback: Option<ExecCallback>,
    ) -> Result<CommandToken> {
        let setup = Setup {
            exec_callback: callback,
            ..Setup::default()
        };
        self.submit(command::exec(command, args), setup).await
    }

    pub async fn interrupt(&self) -> Result<CommandToken> {
        self.send(command::EXEC_INTERRUPT).await
    }

    /// Point the debuggee's terminal at `path`.
    pub async fn inferior_tty_set(&self, path: &str) -> Result<()> {
        self.execute(&command::inferior_tty_set(path)).await?;
        Ok(())
    }

    /// Locals of the selected frame; empty unless stopped.
    pub async fn get_locals(&self) -> Result<Vec<Variable>> {
        if self.exec_state().await? != ExecState::Stopped {
            return Ok(Vec::new());
        }
        let record = self.execute(command::LIST_LOCALS).await?;
        Ok(record
            .results
            .get("variables")
            .map(|v| v.items().iter().filter_map(Variable::from_value).collect())
            .unwrap_or_default())
    }

    /// Call stack of the selected thread; empty unless stopped.
    pub async fn get_frames(&self) -> Result<Vec<Frame>> {
        if self.exec_state().await? != ExecState::Stopped {
            return Ok(Vec::new());
        }
        let record = self.execute(command::LIST_FRAMES).await?;
        Ok(record
            .results
            .get("stack")
            .map(|v| v.items().iter().filter_map(Frame::from_value).collect())
            .unwrap_or_default())
    }

    /// Run a console command; `n`, `c` and `r` go through the exec path.
    pub async fn send_console_command(&self, cmd: &str) -> Result<CommandToken> {
        let exec = match cmd.trim() {
            "n" => Some(ExecCommand::Next),
            "c" => Some(ExecCommand::Continue),
            "r" => Some(ExecCommand::Run),
            _ => None,
        };
        match exec {
            Some(exec) => self.do_exec(exec, &[], None).await,
            None => self.send(&command::console(cmd)).await,
        }
    }

    // --- reads ---

    /// The plain breakpoint at `file:line`, if any.
    pub async fn breakpoints_status(&self, file: &str, line: u32) -> Result<Option<BreakpointId>> {
        let file = file.to_string();
        self.access(move |state| state.store.breakpoint_at(&file, line).map(|bp| bp.id))
            .await
    }

    pub async fn get_breakpoints(&self, filter: BreakpointFilter) -> Result<Vec<Breakpoint>> {
        self.access(move |state| state.store.breakpoints(&filter))
            .await
    }

    pub async fn thread_groups(&self) -> Result<Vec<ThreadGroup>> {
        self.access(|state| state.store.thread_groups()).await
    }

    /// Commands still tracked by the read task: awaiting a result, or an
    /// exec command awaiting its stop.
    pub async fn pending_commands(&self) -> Result<usize> {
        self.access(|state| state.table.len()).await
    }

    pub async fn exec_state(&self) -> Result<ExecState> {
        self.access(|state| state.exec_state).await
    }

    /// Retained console stream output, oldest first.
    pub async fn console_output(&self) -> Result<Vec<String>> {
        self.access(|state| state.console.iter().cloned().collect())
            .await
    }

    /// Watch `expr`; it is evaluated at every subsequent stop. Returns
    /// `false` if it was already watched.
    pub async fn add_display(&self, expr: &str) -> Result<bool> {
        let expr = expr.to_string();
        self.access(move |state| state.displays.add(&expr)).await
    }

    pub async fn displays(&self) -> Result<Vec<String>> {
        self.access(|state| state.displays.exprs().to_vec()).await
    }

    // --- lifecycle ---

    /// Detach the read task. The debugger process is left alone.
    pub async fn stop(&self) -> Result<()> {
        let _ = self.requests.send(Request::Stop);
        self.join().await
    }

    /// Ask the debugger to exit and wait for its output to end.
    pub async fn quit(&self) -> Result<()> {
        self.send(command::GDB_EXIT).await?;
        self.join().await
    }

    async fn join(&self) -> Result<()> {
        let handle = self.task.lock().await.take();
        match handle {
            Some(handle) => handle
                .await
                .map_err(|err| Error::Closed(format!("{}: {}", self.name, err)))?,
            None => Ok(()),
        }
    }

    // --- plumbing ---

    async fn submit(&self, text: impl Into<String>, setup: Setup) -> Result<CommandToken> {
        let (reply, replied) = oneshot::channel();
        self.requests
            .send(Request::Send {
                text: text.into(),
                setup,
                reply,
            })
            .map_err(|_| self.closed())?;
        replied.await.map_err(|_| self.closed())?
    }

    async fn execute_with(&self, text: &str, followup: Option<Followup>) -> Result<ResultRecord> {
        let (completion, done) = oneshot::channel();
        let setup = Setup {
            completion: Some(completion),
            followup,
            ..Setup::default()
        };
        let token = self.submit(text, setup).await?;
        let record = self.wait(token, done).await?;

        if record.is_error() {
            return Err(Error::Command {
                token,
                message: record
                    .error_message()
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }
        Ok(record)
    }

    async fn wait(
        &self,
        token: CommandToken,
        done: oneshot::Receiver<ResultRecord>,
    ) -> Result<ResultRecord> {
        let received = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, done).await {
                Ok(received) => received,
                Err(_) => {
                    self.forget(token);
                    return Err(Error::Timeout(token));
                }
            },
            None => done.await,
        };
        received.map_err(|_| self.closed())
    }

    /// Drop `token` from the command table; a result arriving later is
    /// treated as unmatched.
    fn forget(&self, token: CommandToken) {
        let access: Access = Box::new(move |state| {
            if state.table.remove(token).is_some() {
                debug!(token = %token, "timed out command forgotten");
            }
        });
        let _ = self.requests.send(Request::Access(access));
    }

    async fn access<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SessionState) -> T + Send + 'static,
    {
        let (reply, replied) = oneshot::channel();
        let access: Access = Box::new(move |state| {
            let _ = reply.send(f(state));
        });
        self.requests
            .send(Request::Access(access))
            .map_err(|_| self.closed())?;
        replied.await.map_err(|_| self.closed())
    }

    fn closed(&self) -> Error {
        Error::Closed(self.name.clone())
    }
}
