// Engine module - debugger-side state derived from MI records
// No I/O here: the runtime feeds records in and performs the returned UI effects

mod apply;
mod effects;
mod store;

pub use apply::{
    ExecTransition, apply_breakpoint, apply_exec, apply_notification, remove_breakpoint,
};
pub use effects::UiEffect;
pub use store::StateStore;
