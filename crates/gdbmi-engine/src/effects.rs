use gdbmi_types::{Breakpoint, BreakpointId, Frame, ThreadGroupId};

/// Observable change the presentation layer should reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    SetBreakpoint {
        id: BreakpointId,
        file: String,
        line: u32,
    },
    DelBreakpoint(BreakpointId),
    DelCursor(ThreadGroupId),
    JumpFrame(Frame),
}

/// Marker placements for a breakpoint: the breakpoint itself when it has a
/// source position, otherwise each located sub-location.
pub(crate) fn markers(breakpoint: &Breakpoint) -> Vec<UiEffect> {
    if let Some((file, line)) = breakpoint.source() {
        return vec![UiEffect::SetBreakpoint {
            id: breakpoint.id,
            file: file.to_string(),
            line,
        }];
    }

    breakpoint
        .sub_locations
        .iter()
        .filter_map(|loc| {
            let (file, line) = loc.source()?;
            Some(UiEffect::SetBreakpoint {
                id: loc.id,
                file: file.to_string(),
                line,
            })
        })
        .collect()
}

/// Removal of every marker [`markers`] would have placed.
pub(crate) fn unmarkers(breakpoint: &Breakpoint) -> Vec<UiEffect> {
    markers(breakpoint)
        .into_iter()
        .filter_map(|effect| match effect {
            UiEffect::SetBreakpoint { id, .. } => Some(UiEffect::DelBreakpoint(id)),
            _ => None,
        })
        .collect()
}
