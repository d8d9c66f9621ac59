//! Sessions and hosts wired to a fake debugger and a recording UI.

use anyhow::Result;
use gdbmi_runtime::{Config, GdbConfig, Host, Session, SessionConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use crate::debugger::FakeDebugger;
use crate::ui::RecordingUi;

/// Declarative test environment.
///
/// # Example
/// ```no_run
/// use gdbmi_testing::TestWorld;
///
/// # async fn demo() -> anyhow::Result<()> {
/// let world = TestWorld::new()?;
/// let (session, mut gdb) = world.spawn_session("main");
/// let token = session.send("-gdb-version").await?;
/// gdb.respond(token, "^done").await?;
/// # Ok(())
/// # }
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    ui: Arc<RecordingUi>,
    config: Config,
}

impl TestWorld {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
            ui: Arc::new(RecordingUi::new()),
            config: Config::default(),
        })
    }

    pub fn with_session_config(mut self, session: SessionConfig) -> Self {
        self.config.session = session;
        self
    }

    pub fn with_gdb_config(mut self, gdb: GdbConfig) -> Self {
        self.config.gdb = gdb;
        self
    }

    pub fn ui(&self) -> &RecordingUi {
        &self.ui
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn spawn_session(&self, name: &str) -> (Session, FakeDebugger) {
        let (debugger, pipe) = FakeDebugger::pair();
        let session = Session::spawn(
            name,
            pipe.reader,
            pipe.writer,
            self.ui.clone(),
            self.config.session.clone(),
        );
        (session, debugger)
    }

    pub fn host(&self) -> Host {
        Host::new(self.config.clone(), self.ui.clone())
    }

    /// Attach a fake debugger to `host` under `name`.
    pub fn attach(&self, host: &mut Host, name: &str) -> Result<FakeDebugger> {
        let (debugger, pipe) = FakeDebugger::pair();
        host.attach(name, pipe.reader, pipe.writer)?;
        Ok(debugger)
    }

    /// Write MI lines to a file in the world's directory.
    pub fn write_transcript(&self, name: &str, lines: &[&str]) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        let mut text = lines.join("\n");
        text.push('\n');
        std::fs::write(&path, text)?;
        Ok(path)
    }

    /// Save the world's configuration and return its path.
    pub fn write_config(&self) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("config.toml");
        self.config.save_to(&path)?;
        Ok(path)
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}
