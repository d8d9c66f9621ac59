//! Debugger sessions over GDB/MI.
//!
//! A [`Session`] owns one debugger's pipes. Its read task parses every line
//! of output, correlates results with pending commands by token, keeps the
//! breakpoint and thread-group state current and reports observable
//! changes to a [`Ui`]. A [`Host`] keeps named sessions for an editor front
//! end.

pub mod commands;
pub mod config;
mod dispatch;
pub mod display;
pub mod error;
pub mod host;
pub mod process;
pub mod session;
pub mod ui;

pub use commands::{CommandState, CommandTable, ExecCallback};
pub use config::{Config, DisplayMode, GdbConfig, ParseErrorPolicy, SessionConfig};
pub use display::DisplayRegistry;
pub use error::{Error, Result};
pub use host::{BreakSwitch, Host};
pub use session::Session;
pub use ui::{DisplayContext, DisplayValue, Ui};
