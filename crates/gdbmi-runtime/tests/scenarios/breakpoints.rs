//! Breakpoint Tests
//!
//! Insert, delete and modify through a session, and the markers the UI
//! receives for plain and multi-location breakpoints.

use anyhow::Result;
use gdbmi_runtime::Error;
use gdbmi_testing::fixtures::{BKPT_DONE_BODY, BREAKPOINT_CREATED_MULTI};
use gdbmi_testing::{TestWorld, UiCall};
use gdbmi_types::{BreakLocation, BreakpointFilter, BreakpointId, BreakpointPatch};

fn source(file: &str, line: u32) -> BreakLocation {
    BreakLocation::Source {
        file: file.to_string(),
        line,
    }
}

#[tokio::test]
async fn test_break_insert_records_breakpoint_and_places_marker() -> Result<()> {
    // Given: a session
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    // When: a breakpoint is inserted and the debugger confirms it
    let location = source("/t/a.c", 7);
    let (inserted, answered) = tokio::join!(session.do_break_insert(&location, false), async {
        let token = gdb.expect_command("-break-insert /t/a.c:7").await?;
        gdb.respond(token, BKPT_DONE_BODY).await
    });
    answered?;

    // Then: the id is returned, stored and marked
    assert_eq!(inserted?, BreakpointId::new(1));
    assert_eq!(
        session.breakpoints_status("/t/a.c", 7).await?,
        Some(BreakpointId::new(1))
    );
    assert!(world.ui().calls().contains(&UiCall::SetBreakpoint {
        id: BreakpointId::new(1),
        file: "/t/a.c".to_string(),
        line: 7,
    }));

    let stored = session.get_breakpoints(BreakpointFilter::all()).await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].function.as_deref(), Some("loop"));
    assert_eq!(stored[0].hit_count, Some(0));
    Ok(())
}

#[tokio::test]
async fn test_temporary_function_breakpoint() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    let location = BreakLocation::Function("main".to_string());
    let (inserted, answered) = tokio::join!(session.do_break_insert(&location, true), async {
        let token = gdb.expect_command("-break-insert -t main").await?;
        gdb.respond(
            token,
            r#"^done,bkpt={number="4",type="breakpoint",disp="del",enabled="y",func="main",fullname="/t/a.c",line="3"}"#,
        )
        .await
    });
    answered?;

    assert_eq!(inserted?, BreakpointId::new(4));
    let stored = session.get_breakpoints(BreakpointFilter::all()).await?;
    assert_eq!(stored[0].disposition.as_deref(), Some("del"));
    Ok(())
}

#[tokio::test]
async fn test_rejected_insert_reports_debugger_message() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    let location = source("nowhere.c", 1);
    let (inserted, answered) = tokio::join!(session.do_break_insert(&location, false), async {
        let token = gdb.expect_command("-break-insert nowhere.c:1").await?;
        gdb.respond(token, r#"^error,msg="No source file named nowhere.c.""#)
            .await
    });
    answered?;

    match inserted {
        Err(Error::Command { message, .. }) => {
            assert_eq!(message, "No source file named nowhere.c.")
        }
        other => panic!("expected command error, got {:?}", other),
    }
    assert!(
        session
            .get_breakpoints(BreakpointFilter::all())
            .await?
            .is_empty()
    );
    Ok(())
}

#[tokio::test]
async fn test_delete_without_breakpoint_sends_nothing() -> Result<()> {
    // Given: a session with no breakpoints
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    // When: deleting at a source line
    let result = session.do_break_delete("/t/a.c", 99).await;

    // Then: not found, and the next command the debugger sees is unrelated
    assert!(matches!(
        result,
        Err(Error::BreakpointNotFound { ref file, line: 99 }) if file == "/t/a.c"
    ));
    gdb.sync(&session).await?;
    Ok(())
}

#[tokio::test]
async fn test_delete_removes_breakpoint_and_marker() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    let location = source("/t/a.c", 7);
    let (inserted, answered) = tokio::join!(session.do_break_insert(&location, false), async {
        let token = gdb.read_command().await?.0;
        gdb.respond(token, BKPT_DONE_BODY).await
    });
    answered?;
    inserted?;

    let (deleted, answered) = tokio::join!(session.do_break_delete("a.c", 7), async {
        let token = gdb.expect_command("-break-delete 1").await?;
        gdb.respond(token, "^done").await
    });
    answered?;

    assert_eq!(deleted?, BreakpointId::new(1));
    assert_eq!(session.breakpoints_status("/t/a.c", 7).await?, None);
    assert!(
        world
            .ui()
            .calls()
            .contains(&UiCall::DelBreakpoint(BreakpointId::new(1)))
    );
    Ok(())
}

#[tokio::test]
async fn test_multi_location_breakpoint_lifecycle() -> Result<()> {
    // Given: gdb reports a breakpoint resolved to two locations
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    gdb.emit(BREAKPOINT_CREATED_MULTI).await?;
    gdb.sync(&session).await?;

    // Then: one parent holds both locations and each location is marked
    let stored = session.get_breakpoints(BreakpointFilter::all()).await?;
    assert_eq!(stored.len(), 1);
    let parent = &stored[0];
    assert_eq!(parent.id, BreakpointId::new(2));
    assert!(parent.is_multiple());
    let ids: Vec<_> = parent.sub_locations.iter().map(|l| l.id).collect();
    assert_eq!(
        ids,
        vec![BreakpointId::location(2, 1), BreakpointId::location(2, 2)]
    );

    let markers: Vec<_> = world
        .ui()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, UiCall::SetBreakpoint { .. }))
        .collect();
    assert_eq!(markers.len(), 2);

    // When: deleting by a location's source line
    let (deleted, answered) = tokio::join!(session.do_break_delete("/t/tmpl.h", 10), async {
        let token = gdb.expect_command("-break-delete 2").await?;
        gdb.respond(token, "^done").await
    });
    answered?;

    // Then: the parent goes and both markers are cleared
    assert_eq!(deleted?, BreakpointId::new(2));
    let calls = world.ui().calls();
    assert!(calls.contains(&UiCall::DelBreakpoint(BreakpointId::location(2, 1))));
    assert!(calls.contains(&UiCall::DelBreakpoint(BreakpointId::location(2, 2))));
    assert!(
        session
            .get_breakpoints(BreakpointFilter::all())
            .await?
            .is_empty()
    );
    Ok(())
}

#[tokio::test]
async fn test_modify_sends_only_changed_fields() -> Result<()> {
    // Given: an enabled breakpoint with no condition
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    gdb.emit(
        r#"=breakpoint-created,bkpt={number="1",type="breakpoint",enabled="y",fullname="/t/a.c",line="7"}"#,
    )
    .await?;
    gdb.sync(&session).await?;

    // When: the patch repeats the enabled flag and adds a condition
    let patch = BreakpointPatch {
        condition: Some("i > 2".to_string()),
        ignore_count: None,
        enabled: Some(true),
    };
    let tokens = session
        .modify_breakpoint(BreakpointId::new(1), &patch)
        .await?;

    // Then: only the condition is sent
    assert_eq!(tokens.len(), 1);
    let token = gdb.expect_command("-break-condition 1 i > 2").await?;
    assert_eq!(token, tokens[0]);
    gdb.respond(token, "^done").await?;
    gdb.sync(&session).await?;

    let stored = session.get_breakpoints(BreakpointFilter::all()).await?;
    assert_eq!(stored[0].condition.as_deref(), Some("i > 2"));
    Ok(())
}

#[tokio::test]
async fn test_modify_unknown_breakpoint_fails() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, _gdb) = world.spawn_session("main");

    let result = session
        .modify_breakpoint(BreakpointId::new(9), &BreakpointPatch::default())
        .await;

    assert!(matches!(result, Err(Error::UnknownBreakpoint(id)) if id == BreakpointId::new(9)));
    Ok(())
}

#[tokio::test]
async fn test_breakpoint_modified_notification_updates_store() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    gdb.emit(
        r#"=breakpoint-created,bkpt={number="1",type="breakpoint",enabled="y",fullname="/t/a.c",line="7",times="0"}"#,
    )
    .await?;
    gdb.emit(r#"=breakpoint-modified,bkpt={number="1",type="breakpoint",enabled="n",fullname="/t/a.c",line="7",times="3"}"#)
        .await?;
    gdb.sync(&session).await?;

    let disabled = session
        .get_breakpoints(BreakpointFilter {
            file: None,
            enabled: Some(false),
        })
        .await?;
    assert_eq!(disabled.len(), 1);
    assert_eq!(disabled[0].hit_count, Some(3));

    // a modification is not a new marker
    let markers = world
        .ui()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, UiCall::SetBreakpoint { .. }))
        .count();
    assert_eq!(markers, 1);
    Ok(())
}
