use crate::error::{Error, Result};
use crate::value::{Results, Value};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address GDB reports for a breakpoint that resolved to several locations.
pub const MULTIPLE_ADDRESS: &str = "<MULTIPLE>";

/// Breakpoint number: `N` for a breakpoint, `N.M` for one of its locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BreakpointId {
    pub number: u32,
    pub location: Option<u32>,
}

impl BreakpointId {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            location: None,
        }
    }

    pub fn location(number: u32, location: u32) -> Self {
        Self {
            number,
            location: Some(location),
        }
    }

    pub fn is_location(&self) -> bool {
        self.location.is_some()
    }

    /// The owning breakpoint; a plain id is its own parent.
    pub fn parent(&self) -> BreakpointId {
        BreakpointId::new(self.number)
    }
}

impl FromStr for BreakpointId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidBreakpointId(s.to_string());
        match s.split_once('.') {
            Some((number, location)) => Ok(BreakpointId::location(
                number.parse().map_err(|_| invalid())?,
                location.parse().map_err(|_| invalid())?,
            )),
            None => Ok(BreakpointId::new(s.parse().map_err(|_| invalid())?)),
        }
    }
}

impl fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{}.{}", self.number, location),
            None => write!(f, "{}", self.number),
        }
    }
}

impl Serialize for BreakpointId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakpoint {
    pub id: BreakpointId,
    pub kind: Option<String>,
    pub disposition: Option<String>,
    /// `None` until the debugger reports it; an unreported flag reads as
    /// enabled.
    pub enabled: Option<bool>,
    pub address: Option<String>,
    pub function: Option<String>,
    pub file: Option<String>,
    pub fullname: Option<String>,
    pub line: Option<u32>,
    pub condition: Option<String>,
    pub ignore_count: Option<u32>,
    pub hit_count: Option<u32>,
    pub original_location: Option<String>,
    pub sub_locations: Vec<Breakpoint>,
}

impl Breakpoint {
    pub fn new(id: BreakpointId) -> Self {
        Self {
            id,
            kind: None,
            disposition: None,
            enabled: None,
            address: None,
            function: None,
            file: None,
            fullname: None,
            line: None,
            condition: None,
            ignore_count: None,
            hit_count: None,
            original_location: None,
            sub_locations: Vec::new(),
        }
    }

    /// Build from a `bkpt` tuple; `None` when the `number` field is missing
    /// or malformed.
    pub fn from_results(results: &Results) -> Option<Self> {
        let id = results.get_str("number")?.parse().ok()?;
        let mut breakpoint = Breakpoint::new(id);
        breakpoint.apply(results);
        Some(breakpoint)
    }

    /// Build from a whole `bkpt` value. A list is a multi-location
    /// breakpoint: the head is the parent, the tail its locations.
    pub fn from_value(value: &Value) -> Option<Self> {
        let (head, tail) = value.items().split_first()?;
        let mut parent = Breakpoint::from_results(head.unkeyed().as_tuple()?)?;
        let locations: Vec<Breakpoint> = tail
            .iter()
            .filter_map(|v| v.unkeyed().as_tuple())
            .filter_map(Breakpoint::from_results)
            .collect();
        if !locations.is_empty() {
            parent.sub_locations = locations;
        }
        Some(parent)
    }

    /// Merge every field present in `results`, leaving absent ones alone.
    pub fn apply(&mut self, results: &Results) {
        for (key, value) in results.iter() {
            let Some(text) = value.as_const() else {
                continue;
            };
            match key {
                "type" => self.kind = Some(text.to_string()),
                "disp" => self.disposition = Some(text.to_string()),
                "enabled" => self.enabled = Some(text == "y"),
                "addr" => self.address = Some(text.to_string()),
                "func" => self.function = Some(text.to_string()),
                "file" => self.file = Some(text.to_string()),
                "fullname" => self.fullname = Some(text.to_string()),
                "line" => self.line = text.parse().ok(),
                "cond" => self.condition = Some(text.to_string()),
                "ignore" => self.ignore_count = text.parse().ok(),
                "times" => self.hit_count = text.parse().ok(),
                "original-location" => self.original_location = Some(text.to_string()),
                _ => {}
            }
        }

        // MI3 nests locations inside the parent tuple
        if let Some(Value::List(locations)) = results.get("locations") {
            self.sub_locations = locations
                .iter()
                .filter_map(|v| v.unkeyed().as_tuple())
                .filter_map(Breakpoint::from_results)
                .collect();
        }
    }

    /// Overwrite fields with another snapshot of the same breakpoint.
    pub fn merge(&mut self, other: Breakpoint) {
        let Breakpoint {
            id: _,
            kind,
            disposition,
            enabled,
            address,
            function,
            file,
            fullname,
            line,
            condition,
            ignore_count,
            hit_count,
            original_location,
            sub_locations,
        } = other;

        self.enabled = enabled.or(self.enabled);
        self.kind = kind.or(self.kind.take());
        self.disposition = disposition.or(self.disposition.take());
        self.address = address.or(self.address.take());
        self.function = function.or(self.function.take());
        self.file = file.or(self.file.take());
        self.fullname = fullname.or(self.fullname.take());
        self.line = line.or(self.line);
        self.condition = condition.or(self.condition.take());
        self.ignore_count = ignore_count.or(self.ignore_count);
        self.hit_count = hit_count.or(self.hit_count);
        self.original_location = original_location.or(self.original_location.take());
        if !sub_locations.is_empty() {
            self.sub_locations = sub_locations;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn is_multiple(&self) -> bool {
        self.address.as_deref() == Some(MULTIPLE_ADDRESS) || !self.sub_locations.is_empty()
    }

    /// Source position, preferring the absolute path.
    pub fn source(&self) -> Option<(&str, u32)> {
        let file = self.fullname.as_deref().or(self.file.as_deref())?;
        Some((file, self.line?))
    }

    /// Whether this breakpoint sits at `file:line`, matching either the
    /// absolute or the relative file name.
    pub fn is_at(&self, file: &str, line: u32) -> bool {
        self.line == Some(line)
            && (self.fullname.as_deref() == Some(file) || self.file.as_deref() == Some(file))
    }

    pub fn sub_location(&self, id: &BreakpointId) -> Option<&Breakpoint> {
        self.sub_locations.iter().find(|loc| loc.id == *id)
    }

    pub fn sub_location_mut(&mut self, id: &BreakpointId) -> Option<&mut Breakpoint> {
        self.sub_locations.iter_mut().find(|loc| loc.id == *id)
    }
}

/// Where `-break-insert` should place a breakpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakLocation {
    Source { file: String, line: u32 },
    Function(String),
}

impl BreakLocation {
    /// Exactly one of `file`+`line` or `function` must be given.
    pub fn from_parts(
        file: Option<String>,
        line: Option<u32>,
        function: Option<String>,
    ) -> Result<Self> {
        match (file, line, function) {
            (Some(file), Some(line), None) => Ok(BreakLocation::Source { file, line }),
            (None, None, Some(function)) => Ok(BreakLocation::Function(function)),
            (None, None, None) => Err(Error::InvalidLocation(
                "either file and line or a function is required".to_string(),
            )),
            (_, _, Some(_)) => Err(Error::InvalidLocation(
                "file/line and function are mutually exclusive".to_string(),
            )),
            _ => Err(Error::InvalidLocation(
                "file and line must be given together".to_string(),
            )),
        }
    }
}

impl fmt::Display for BreakLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakLocation::Source { file, line } => write!(f, "{}:{}", file, line),
            BreakLocation::Function(function) => f.write_str(function),
        }
    }
}

/// Requested changes to an existing breakpoint. An empty condition string
/// clears the condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointPatch {
    pub condition: Option<String>,
    pub ignore_count: Option<u32>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakpointChange {
    Condition(String),
    IgnoreCount(u32),
    Enabled(bool),
}

impl BreakpointPatch {
    /// The subset of this patch that differs from `current`.
    pub fn changes_against(&self, current: &Breakpoint) -> Vec<BreakpointChange> {
        let mut changes = Vec::new();

        if let Some(condition) = &self.condition
            && current.condition.as_deref().unwrap_or("") != condition
        {
            changes.push(BreakpointChange::Condition(condition.clone()));
        }
        if let Some(count) = self.ignore_count
            && current.ignore_count.unwrap_or(0) != count
        {
            changes.push(BreakpointChange::IgnoreCount(count));
        }
        if let Some(enabled) = self.enabled
            && current.is_enabled() != enabled
        {
            changes.push(BreakpointChange::Enabled(enabled));
        }

        changes
    }
}

impl BreakpointChange {
    pub fn apply_to(&self, breakpoint: &mut Breakpoint) {
        match self {
            BreakpointChange::Condition(c) if c.is_empty() => breakpoint.condition = None,
            BreakpointChange::Condition(c) => breakpoint.condition = Some(c.clone()),
            BreakpointChange::IgnoreCount(0) => breakpoint.ignore_count = None,
            BreakpointChange::IgnoreCount(n) => breakpoint.ignore_count = Some(*n),
            BreakpointChange::Enabled(enabled) => breakpoint.enabled = Some(*enabled),
        }
    }
}

/// Read-side filter for breakpoint listings.
#[derive(Debug, Clone, Default)]
pub struct BreakpointFilter {
    pub file: Option<String>,
    pub enabled: Option<bool>,
}

impl BreakpointFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_file(file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            enabled: None,
        }
    }

    pub fn matches(&self, breakpoint: &Breakpoint) -> bool {
        let file_ok = match &self.file {
            None => true,
            Some(file) => {
                let matches_file = |bp: &Breakpoint| {
                    bp.fullname.as_deref() == Some(file.as_str())
                        || bp.file.as_deref() == Some(file.as_str())
                };
                matches_file(breakpoint) || breakpoint.sub_locations.iter().any(matches_file)
            }
        };
        let enabled_ok = self.enabled.is_none_or(|e| breakpoint.is_enabled() == e);
        file_ok && enabled_ok
    }
}
