//! Testing infrastructure for gdbmi integration tests.
//!
//! This crate provides utilities for driving sessions without a real debugger:
//! - `FakeDebugger`: scripted debugger end of an in-memory pipe
//! - `RecordingUi`: `Ui` implementation that records every call
//! - `TestWorld`: sessions and hosts wired to the two above
//! - `fixtures`: MI output lines and transcript files

pub mod debugger;
pub mod fixtures;
pub mod ui;
pub mod world;

pub use debugger::FakeDebugger;
pub use ui::{RecordingUi, UiCall};
pub use world::TestWorld;
