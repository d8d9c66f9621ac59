use crate::effects::{UiEffect, markers, unmarkers};
use crate::store::StateStore;
use gdbmi_types::{
    AsyncEvent, AsyncRecord, Breakpoint, BreakpointId, ExecEvent, ExecState, Frame, Library,
    Notification, ThreadGroupId, Value,
};
use tracing::{debug, warn};

/// Apply a `=` notification to the store, returning the UI effects it implies.
pub fn apply_notification(store: &mut StateStore, record: &AsyncRecord) -> Vec<UiEffect> {
    let AsyncEvent::Notify(notification) = record.event() else {
        return Vec::new();
    };
    let results = &record.results;
    let group_id = |key: &str| results.get_str(key).map(ThreadGroupId::from);

    match notification {
        Notification::ThreadGroupAdded => {
            if let Some(id) = group_id("id") {
                store.add_thread_group(id);
            }
            Vec::new()
        }
        Notification::ThreadGroupStarted => {
            if let Some(id) = group_id("id") {
                store.start_thread_group(id, results.get_str("pid").map(str::to_string));
            }
            Vec::new()
        }
        Notification::ThreadGroupExited => match group_id("id") {
            Some(id) => {
                store.remove_thread_group(&id);
                vec![UiEffect::DelCursor(id)]
            }
            None => Vec::new(),
        },
        Notification::ThreadGroupRemoved => {
            if let Some(id) = group_id("id") {
                store.remove_thread_group(&id);
            }
            Vec::new()
        }
        Notification::ThreadCreated => {
            if let (Some(thread), Some(group)) = (results.get_str("id"), group_id("group-id")) {
                store.add_thread(&group, thread);
            }
            Vec::new()
        }
        Notification::ThreadExited => {
            if let (Some(thread), Some(group)) = (results.get_str("id"), group_id("group-id")) {
                store.remove_thread(&group, thread);
            }
            Vec::new()
        }
        Notification::ThreadSelected => results
            .get("frame")
            .and_then(Frame::from_value)
            .map(UiEffect::JumpFrame)
            .into_iter()
            .collect(),
        Notification::LibraryLoaded => {
            if let Some(library) = Library::from_results(results) {
                store.add_library(group_id("thread-group").as_ref(), library);
            }
            Vec::new()
        }
        Notification::LibraryUnloaded => {
            if let Some(id) = results.get_str("id") {
                store.remove_library(group_id("thread-group").as_ref(), id);
            }
            Vec::new()
        }
        Notification::BreakpointCreated | Notification::BreakpointModified => {
            match results.get("bkpt") {
                Some(bkpt) => apply_breakpoint(store, bkpt),
                None => {
                    warn!(name = %record.name, "breakpoint notification without bkpt");
                    Vec::new()
                }
            }
        }
        Notification::BreakpointDeleted => {
            match results.get_str("id").map(str::parse::<BreakpointId>) {
                Some(Ok(id)) => remove_breakpoint(store, id),
                _ => {
                    warn!("breakpoint-deleted without a valid id");
                    Vec::new()
                }
            }
        }
        Notification::Other(name) => {
            debug!(name = %name, "notification ignored");
            Vec::new()
        }
    }
}

/// Merge a `bkpt` value into the store.
///
/// Markers are placed when the breakpoint is new, or when a pending
/// breakpoint gains a source position it did not have before.
pub fn apply_breakpoint(store: &mut StateStore, bkpt: &Value) -> Vec<UiEffect> {
    let Some(breakpoint) = Breakpoint::from_value(bkpt) else {
        warn!("bkpt without a valid number");
        return Vec::new();
    };

    let before = store
        .breakpoint(breakpoint.id.parent())
        .map(markers)
        .unwrap_or_default();

    let Some((stored, created)) = store.upsert_breakpoint(breakpoint) else {
        return Vec::new();
    };
    if created {
        debug!(id = %stored.id, "breakpoint recorded");
    }
    markers(stored)
        .into_iter()
        .filter(|effect| !before.contains(effect))
        .collect()
}

/// Remove a breakpoint (and its sub-locations) and clear its markers.
pub fn remove_breakpoint(store: &mut StateStore, id: BreakpointId) -> Vec<UiEffect> {
    match store.remove_breakpoint(id) {
        Some(removed) => unmarkers(&removed),
        None => {
            debug!(id = %id, "delete of unknown breakpoint");
            Vec::new()
        }
    }
}

/// Result of applying a `*` record to the execution state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecTransition {
    pub state: ExecState,
    /// Set for every `*stopped` record, with or without a frame.
    pub stopped: bool,
    /// The stop frame, present only on `*stopped` records that carry one.
    pub frame: Option<Frame>,
}

pub fn apply_exec(current: ExecState, record: &AsyncRecord) -> ExecTransition {
    let AsyncEvent::Exec(event) = record.event() else {
        return ExecTransition {
            state: current,
            stopped: false,
            frame: None,
        };
    };

    let state = current.on_event(&event);
    let stopped = event == ExecEvent::Stopped;
    let frame = match event {
        ExecEvent::Stopped => record.results.get("frame").and_then(Frame::from_value),
        _ => None,
    };
    if state != current {
        debug!(from = %current, to = %state, "exec state changed");
    }
    ExecTransition {
        state,
        stopped,
        frame,
    }
}
