use crate::commands::Followup;
use crate::config::{ParseErrorPolicy, SessionConfig};
use crate::display::stop_address;
use crate::session::{Request, SessionState, Setup};
use crate::ui::{Ui, perform, show};
use crate::{Error, Result};
use gdbmi_engine::{
    UiEffect, apply_breakpoint, apply_exec, apply_notification, remove_breakpoint,
};
use gdbmi_protocol::command::{self, encode};
use gdbmi_protocol::parse;
use gdbmi_types::{AsyncClass, AsyncRecord, CommandToken, Frame, Output, Record, ResultRecord};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The session's read task: sole owner of the debugger's input stream and
/// of all session state.
pub(crate) struct Actor<W> {
    name: String,
    writer: W,
    state: SessionState,
    ui: Arc<dyn Ui>,
    config: SessionConfig,
}

impl<W> Actor<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub(crate) fn new(name: String, writer: W, ui: Arc<dyn Ui>, config: SessionConfig) -> Self {
        Self {
            name,
            writer,
            state: SessionState::new(config.console_history),
            ui,
            config,
        }
    }

    pub(crate) async fn run<R>(
        mut self,
        reader: R,
        mut requests: mpsc::UnboundedReceiver<Request>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let mut lines = BufReader::new(reader).lines();
        info!(session = %self.name, "read loop started");

        loop {
            tokio::select! {
                request = requests.recv() => match request {
                    Some(Request::Stop) | None => {
                        info!(session = %self.name, "read loop detached");
                        return Ok(());
                    }
                    Some(request) => self.handle_request(request).await,
                },
                line = lines.next_line() => match line {
                    Ok(Some(line)) => self.handle_line(line).await?,
                    Ok(None) => {
                        info!(session = %self.name, "debugger output closed");
                        return Ok(());
                    }
                    Err(err) => {
                        error!(session = %self.name, error = %err, "reading debugger output failed");
                        self.ui.async_error(&format!("Debugger output failed: {}", err));
                        return Err(Error::Io(err));
                    }
                },
            }
        }
    }

    async fn handle_request(&mut self, request: Request) {
        match request {
            Request::Send { text, setup, reply } => {
                let result = self.write_command(&text, setup).await;
                let _ = reply.send(result);
            }
            Request::Access(access) => access(&mut self.state),
            Request::Stop => {}
        }
    }

    async fn write_command(&mut self, text: &str, setup: Setup) -> Result<CommandToken> {
        if setup.exec_callback.is_some() {
            let dropped = self.state.table.drop_exec_callbacks();
            if dropped > 0 {
                debug!(session = %self.name, dropped, "older exec callbacks superseded");
            }
        }
        let command = self.state.table.allocate(text);
        command.completion = setup.completion;
        command.followup = setup.followup;
        command.exec_callback = setup.exec_callback;
        let token = command.token;

        let wire = encode(token, text);
        debug!(session = %self.name, "SENT {}", wire.trim_end());
        if let Err(err) = self.write_wire(&wire).await {
            self.state.table.remove(token);
            return Err(Error::Io(err));
        }
        Ok(token)
    }

    async fn write_wire(&mut self, wire: &str) -> std::io::Result<()> {
        self.writer.write_all(wire.as_bytes()).await?;
        self.writer.flush().await
    }

    async fn handle_line(&mut self, line: String) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }
        debug!(session = %self.name, "RAW {}", line);

        let mut raw = line;
        raw.push('\n');
        match parse(&raw) {
            Ok(output) => {
                self.dispatch(output).await;
                Ok(())
            }
            Err(err) => {
                let message = format!("Failed to parse debugger output: {}", err);
                match self.config.on_parse_error {
                    ParseErrorPolicy::Abort => {
                        error!(session = %self.name, error = %err, line = %raw.trim_end(), "unparsable output, stopping read loop");
                        self.ui.async_error(&message);
                        Err(Error::Parse(err))
                    }
                    ParseErrorPolicy::Skip => {
                        warn!(session = %self.name, error = %err, line = %raw.trim_end(), "unparsable output skipped");
                        self.ui.async_error(&message);
                        Ok(())
                    }
                }
            }
        }
    }

    async fn dispatch(&mut self, output: Output) {
        match output.record {
            Record::Prompt => {}
            Record::Result(record) => self.on_result(output.token, record),
            Record::Async(record) => match record.class {
                AsyncClass::Exec => self.on_exec(output.token, &record).await,
                AsyncClass::Notify => {
                    let effects = apply_notification(&mut self.state.store, &record);
                    self.apply_effects(effects);
                }
                AsyncClass::Status => debug!(session = %self.name, name = %record.name, "status"),
            },
            Record::Stream(record) => self.state.on_stream(record),
        }
    }

    fn on_result(&mut self, token: Option<CommandToken>, record: ResultRecord) {
        let Some((token, resolved)) =
            token.and_then(|t| self.state.table.resolve(t, &record).map(|r| (t, r)))
        else {
            warn!(
                session = %self.name,
                token = %token.map(|t| t.to_string()).unwrap_or_default(),
                class = record.class.as_str(),
                "result for unknown token dropped"
            );
            if let Some(message) = record.error_message() {
                self.ui.async_error(message);
            }
            return;
        };

        if let Some(bkpt) = record.results.get("bkpt") {
            let effects = apply_breakpoint(&mut self.state.store, bkpt);
            self.apply_effects(effects);
        }

        let mut reported = false;
        if let Some(followup) = resolved.followup {
            reported = matches!(followup, Followup::Display { .. });
            self.run_followup(followup, &record);
        }

        match resolved.completion {
            Some(completion) => {
                // the caller may have timed out and gone away
                let _ = completion.send(record);
            }
            None if record.is_error() && !reported => {
                let message = record.error_message().unwrap_or("command failed");
                warn!(session = %self.name, token = %token, message, "command failed");
                self.ui.error(message);
            }
            None => {}
        }
    }

    fn run_followup(&mut self, followup: Followup, record: &ResultRecord) {
        match followup {
            Followup::DeleteBreakpoint(id) if !record.is_error() => {
                let effects = remove_breakpoint(&mut self.state.store, id);
                self.apply_effects(effects);
            }
            Followup::ChangeBreakpoint(id, change) if !record.is_error() => {
                if !self.state.store.apply_change(id, &change) {
                    debug!(session = %self.name, id = %id, "change for unknown breakpoint");
                }
            }
            Followup::Display { expr, frame, last } => {
                let value = match record.error_message() {
                    Some(message) => format!("<error: {}>", message),
                    None => record.results.get_str("value").unwrap_or("").to_string(),
                };
                self.state
                    .displays
                    .record(&stop_address(&frame), &expr, value);
                if last {
                    let context = self.state.displays.context(&self.name, &frame);
                    show(self.ui.as_ref(), self.config.display_mode, &context);
                }
            }
            _ => {}
        }
    }

    async fn on_exec(&mut self, token: Option<CommandToken>, record: &AsyncRecord) {
        let transition = apply_exec(self.state.exec_state, record);
        self.state.exec_state = transition.state;

        if !transition.stopped {
            return;
        }

        // every stop settles the waiting callback, even one without a frame
        let callback = match token {
            Some(token) => self.state.table.take_exec_callback(token),
            None => self.state.table.take_latest_exec_callback(),
        };
        let Some(frame) = transition.frame else {
            if callback.is_some() {
                debug!(session = %self.name, "stop without frame, exec callback dropped");
            }
            return;
        };
        if let Some(callback) = callback {
            callback(frame.clone());
        }

        self.ui.jump_frame(&frame);
        self.evaluate_displays(&frame).await;
    }

    async fn evaluate_displays(&mut self, frame: &Frame) {
        let exprs = self.state.displays.exprs().to_vec();
        let count = exprs.len();
        for (index, expr) in exprs.into_iter().enumerate() {
            let text = command::evaluate_expression(&expr);
            let setup = Setup {
                followup: Some(Followup::Display {
                    expr,
                    frame: frame.clone(),
                    last: index + 1 == count,
                }),
                ..Setup::default()
            };
            if let Err(err) = self.write_command(&text, setup).await {
                warn!(session = %self.name, error = %err, "display evaluation not sent");
                break;
            }
        }
    }

    fn apply_effects(&self, effects: Vec<UiEffect>) {
        for effect in effects {
            perform(self.ui.as_ref(), effect);
        }
    }
}
