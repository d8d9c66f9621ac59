use crate::value::Results;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Inferior identifier such as `i1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ThreadGroupId(pub String);

impl fmt::Display for ThreadGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThreadGroupId {
    fn from(s: &str) -> Self {
        ThreadGroupId(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadGroup {
    pub id: ThreadGroupId,
    pub pid: Option<String>,
    pub exit_code: Option<String>,
    pub threads: BTreeSet<String>,
    pub libraries: BTreeMap<String, Library>,
}

impl ThreadGroup {
    pub fn new(id: ThreadGroupId) -> Self {
        Self {
            id,
            pid: None,
            exit_code: None,
            threads: BTreeSet::new(),
            libraries: BTreeMap::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.pid.is_some()
    }
}

/// Shared library reported by `=library-loaded`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Library {
    pub id: String,
    pub target_name: Option<String>,
    pub host_name: Option<String>,
    pub symbols_loaded: bool,
}

impl Library {
    pub fn from_results(results: &Results) -> Option<Self> {
        Some(Library {
            id: results.get_str("id")?.to_string(),
            target_name: results.get_str("target-name").map(str::to_string),
            host_name: results.get_str("host-name").map(str::to_string),
            symbols_loaded: results.get_str("symbols-loaded") == Some("1"),
        })
    }
}
