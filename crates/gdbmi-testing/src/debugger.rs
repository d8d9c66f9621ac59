//! Scripted debugger end of an in-memory pipe.

use anyhow::{Context, Result, anyhow};
use gdbmi_runtime::Session;
use gdbmi_types::CommandToken;
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf, duplex,
    split,
};

const PIPE_CAPACITY: usize = 64 * 1024;
const SYNC_COMMAND: &str = "-gdb-version";
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Session-side halves of the pipe, to hand to `Session::spawn`.
pub struct SessionPipe {
    pub reader: ReadHalf<DuplexStream>,
    pub writer: WriteHalf<DuplexStream>,
}

/// The debugger side: reads the commands a session writes and emits MI
/// output lines back.
pub struct FakeDebugger {
    commands: Lines<BufReader<ReadHalf<DuplexStream>>>,
    output: WriteHalf<DuplexStream>,
}

impl FakeDebugger {
    pub fn pair() -> (FakeDebugger, SessionPipe) {
        let (session_end, debugger_end) = duplex(PIPE_CAPACITY);
        let (reader, writer) = split(session_end);
        let (commands, output) = split(debugger_end);

        let debugger = FakeDebugger {
            commands: BufReader::new(commands).lines(),
            output,
        };
        (debugger, SessionPipe { reader, writer })
    }

    /// Next command written by the session, split into token and text.
    pub async fn read_command(&mut self) -> Result<(CommandToken, String)> {
        let line = tokio::time::timeout(READ_TIMEOUT, self.commands.next_line())
            .await
            .context("timed out waiting for a command")??
            .ok_or_else(|| anyhow!("session closed its input"))?;

        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return Err(anyhow!("command without token: {}", line));
        }
        let token = line[..digits].parse()?;
        Ok((CommandToken(token), line[digits..].to_string()))
    }

    /// Read the next command and check its text.
    pub async fn expect_command(&mut self, text: &str) -> Result<CommandToken> {
        let (token, command) = self.read_command().await?;
        if command != text {
            return Err(anyhow!("expected {:?}, got {:?}", text, command));
        }
        Ok(token)
    }

    /// Write one line of MI output; the newline is added if missing.
    pub async fn emit(&mut self, line: &str) -> Result<()> {
        self.output.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.output.write_all(b"\n").await?;
        }
        self.output.flush().await?;
        Ok(())
    }

    /// Emit `<token><record>` followed by a prompt.
    pub async fn respond(&mut self, token: CommandToken, record: &str) -> Result<()> {
        self.emit(&format!("{}{}", token, record)).await?;
        self.emit("(gdb)").await
    }

    /// Round-trip a no-op command through `session`. Output is dispatched
    /// in order, so everything emitted before has been applied on return.
    pub async fn sync(&mut self, session: &Session) -> Result<()> {
        let answer = async {
            let token = self.expect_command(SYNC_COMMAND).await?;
            self.respond(token, "^done").await
        };
        let (executed, answered) = tokio::join!(session.execute(SYNC_COMMAND), answer);
        answered?;
        executed?;
        Ok(())
    }

    /// End the output stream, as a debugger exiting would.
    pub async fn close(mut self) -> Result<()> {
        self.output.shutdown().await?;
        Ok(())
    }
}
