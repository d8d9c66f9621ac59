use gdbmi_types::{
    Breakpoint, BreakpointChange, BreakpointFilter, BreakpointId, Library, ThreadGroup,
    ThreadGroupId,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Breakpoints and thread groups as last reported by the debugger.
///
/// Breakpoints are keyed by their plain number; sub-locations (`N.M`) live
/// inside their parent's `sub_locations`, so deleting a parent drops them
/// with it.
#[derive(Debug, Default)]
pub struct StateStore {
    breakpoints: BTreeMap<BreakpointId, Breakpoint>,
    thread_groups: BTreeMap<ThreadGroupId, ThreadGroup>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- breakpoints ---

    /// Insert or merge a breakpoint snapshot. Returns the stored breakpoint
    /// and whether it was previously unknown.
    pub fn upsert_breakpoint(&mut self, breakpoint: Breakpoint) -> Option<(&Breakpoint, bool)> {
        let id = breakpoint.id;

        if id.is_location() {
            let Some(parent) = self.breakpoints.get_mut(&id.parent()) else {
                warn!(id = %id, "sub-location for unknown breakpoint dropped");
                return None;
            };
            let created = match parent.sub_location_mut(&id) {
                Some(existing) => {
                    existing.merge(breakpoint);
                    false
                }
                None => {
                    parent.sub_locations.push(breakpoint);
                    parent.sub_locations.sort_by_key(|loc| loc.id);
                    true
                }
            };
            return Some((&*parent, created));
        }

        let created = match self.breakpoints.get_mut(&id) {
            Some(existing) => {
                existing.merge(breakpoint);
                false
            }
            None => {
                info!(id = %id, "breakpoint added");
                self.breakpoints.insert(id, breakpoint);
                true
            }
        };
        self.breakpoints.get(&id).map(|bp| (bp, created))
    }

    /// Remove a breakpoint with all of its sub-locations, or a single
    /// sub-location when `id` is `N.M`. Returns what was removed.
    pub fn remove_breakpoint(&mut self, id: BreakpointId) -> Option<Breakpoint> {
        if id.is_location() {
            let parent = self.breakpoints.get_mut(&id.parent())?;
            let index = parent.sub_locations.iter().position(|loc| loc.id == id)?;
            return Some(parent.sub_locations.remove(index));
        }

        let removed = self.breakpoints.remove(&id);
        if removed.is_some() {
            info!(id = %id, "breakpoint removed");
        }
        removed
    }

    pub fn breakpoint(&self, id: BreakpointId) -> Option<&Breakpoint> {
        let parent = self.breakpoints.get(&id.parent())?;
        if id.is_location() {
            parent.sub_location(&id)
        } else {
            Some(parent)
        }
    }

    /// The plain breakpoint at `file:line`; multi-location breakpoints never
    /// match.
    pub fn breakpoint_at(&self, file: &str, line: u32) -> Option<&Breakpoint> {
        self.breakpoints
            .values()
            .find(|bp| !bp.is_multiple() && bp.is_at(file, line))
    }

    /// The breakpoint number to delete for `file:line`: a plain breakpoint
    /// there, or else the parent of a sub-location there.
    pub fn find_by_location(&self, file: &str, line: u32) -> Option<BreakpointId> {
        if let Some(bp) = self.breakpoint_at(file, line) {
            return Some(bp.id);
        }
        self.breakpoints
            .values()
            .find(|bp| bp.is_at(file, line) || bp.sub_locations.iter().any(|l| l.is_at(file, line)))
            .map(|bp| bp.id)
    }

    pub fn breakpoints(&self, filter: &BreakpointFilter) -> Vec<Breakpoint> {
        self.breakpoints
            .values()
            .filter(|bp| filter.matches(bp))
            .cloned()
            .collect()
    }

    pub fn apply_change(&mut self, id: BreakpointId, change: &BreakpointChange) -> bool {
        let Some(parent) = self.breakpoints.get_mut(&id.parent()) else {
            return false;
        };
        let target = if id.is_location() {
            parent.sub_location_mut(&id)
        } else {
            Some(parent)
        };
        match target {
            Some(bp) => {
                change.apply_to(bp);
                true
            }
            None => false,
        }
    }

    // --- thread groups ---

    pub fn add_thread_group(&mut self, id: ThreadGroupId) {
        info!(group = %id, "thread group added");
        self.thread_groups
            .entry(id.clone())
            .or_insert_with(|| ThreadGroup::new(id));
    }

    pub fn start_thread_group(&mut self, id: ThreadGroupId, pid: Option<String>) {
        info!(group = %id, pid = pid.as_deref().unwrap_or("?"), "thread group started");
        let group = self
            .thread_groups
            .entry(id.clone())
            .or_insert_with(|| ThreadGroup::new(id));
        group.pid = pid;
        group.exit_code = None;
    }

    pub fn remove_thread_group(&mut self, id: &ThreadGroupId) -> Option<ThreadGroup> {
        let removed = self.thread_groups.remove(id);
        if removed.is_some() {
            info!(group = %id, "thread group removed");
        }
        removed
    }

    pub fn add_thread(&mut self, group: &ThreadGroupId, thread: &str) {
        match self.thread_groups.get_mut(group) {
            Some(g) => {
                g.threads.insert(thread.to_string());
            }
            None => warn!(group = %group, thread, "thread for unknown group dropped"),
        }
    }

    pub fn remove_thread(&mut self, group: &ThreadGroupId, thread: &str) {
        if let Some(g) = self.thread_groups.get_mut(group) {
            g.threads.remove(thread);
        }
    }

    /// Record a library for one group, or for every group when `group` is
    /// `None`.
    pub fn add_library(&mut self, group: Option<&ThreadGroupId>, library: Library) {
        for g in self.groups_mut(group) {
            g.libraries.insert(library.id.clone(), library.clone());
        }
    }

    pub fn remove_library(&mut self, group: Option<&ThreadGroupId>, library_id: &str) {
        for g in self.groups_mut(group) {
            g.libraries.remove(library_id);
        }
    }

    fn groups_mut<'s>(
        &'s mut self,
        group: Option<&ThreadGroupId>,
    ) -> Box<dyn Iterator<Item = &'s mut ThreadGroup> + 's> {
        match group {
            Some(id) => Box::new(self.thread_groups.get_mut(id).into_iter()),
            None => Box::new(self.thread_groups.values_mut()),
        }
    }

    pub fn thread_group(&self, id: &ThreadGroupId) -> Option<&ThreadGroup> {
        self.thread_groups.get(id)
    }

    pub fn thread_groups(&self) -> Vec<ThreadGroup> {
        self.thread_groups.values().cloned().collect()
    }
}
