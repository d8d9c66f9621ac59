use crate::record::AsyncClass;

/// Typed view of an async record's class and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncEvent {
    Exec(ExecEvent),
    Status(String),
    Notify(Notification),
}

impl AsyncEvent {
    pub fn classify(class: AsyncClass, name: &str) -> Self {
        match class {
            AsyncClass::Exec => AsyncEvent::Exec(ExecEvent::from_name(name)),
            AsyncClass::Status => AsyncEvent::Status(name.to_string()),
            AsyncClass::Notify => AsyncEvent::Notify(Notification::from_name(name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecEvent {
    Running,
    Stopped,
    Other(String),
}

impl ExecEvent {
    pub fn from_name(name: &str) -> Self {
        match name {
            "running" => ExecEvent::Running,
            "stopped" => ExecEvent::Stopped,
            other => ExecEvent::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    ThreadGroupAdded,
    ThreadGroupRemoved,
    ThreadGroupStarted,
    ThreadGroupExited,
    ThreadCreated,
    ThreadExited,
    ThreadSelected,
    LibraryLoaded,
    LibraryUnloaded,
    BreakpointCreated,
    BreakpointModified,
    BreakpointDeleted,
    Other(String),
}

impl Notification {
    pub fn from_name(name: &str) -> Self {
        match name {
            "thread-group-added" => Notification::ThreadGroupAdded,
            "thread-group-removed" => Notification::ThreadGroupRemoved,
            "thread-group-started" => Notification::ThreadGroupStarted,
            // older debuggers spell it in the plural
            "thread-group-exited" | "thread-groups-exited" => Notification::ThreadGroupExited,
            "thread-created" => Notification::ThreadCreated,
            "thread-exited" => Notification::ThreadExited,
            "thread-selected" => Notification::ThreadSelected,
            "library-loaded" => Notification::LibraryLoaded,
            "library-unloaded" => Notification::LibraryUnloaded,
            "breakpoint-created" => Notification::BreakpointCreated,
            "breakpoint-modified" => Notification::BreakpointModified,
            "breakpoint-deleted" => Notification::BreakpointDeleted,
            other => Notification::Other(other.to_string()),
        }
    }
}
