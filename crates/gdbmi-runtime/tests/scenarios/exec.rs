//! Execution Tests
//!
//! Exec commands, the stopped/running state machine and stop callbacks.

use anyhow::{Context, Result};
use gdbmi_runtime::ExecCallback;
use gdbmi_testing::fixtures::{
    FRAMES_DONE_BODY, LOCALS_DONE_BODY, RUNNING, STOPPED_BREAKPOINT_HIT, STOPPED_END_STEPPING,
    STOPPED_EXITED_NORMALLY,
};
use gdbmi_testing::{TestWorld, UiCall};
use gdbmi_types::{ExecCommand, ExecState, Frame};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

fn frame_channel() -> (ExecCallback, oneshot::Receiver<Frame>) {
    let (tx, rx) = oneshot::channel();
    let callback: ExecCallback = Box::new(move |frame| {
        let _ = tx.send(frame);
    });
    (callback, rx)
}

async fn received(rx: oneshot::Receiver<Frame>) -> Result<Frame> {
    let frame = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .context("exec callback not invoked")??;
    Ok(frame)
}

#[tokio::test]
async fn test_stopped_invokes_exec_callback_with_frame() -> Result<()> {
    // Given: a pending `next` with a callback
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    let (callback, frame_rx) = frame_channel();
    let token = session
        .do_exec(ExecCommand::Next, &[], Some(callback))
        .await?;
    assert_eq!(gdb.expect_command("-exec-next").await?, token);

    // When: gdb runs and stops without echoing the token
    gdb.respond(token, "^running").await?;
    gdb.emit(RUNNING).await?;
    gdb.emit(STOPPED_END_STEPPING).await?;

    // Then: the callback gets the stop frame and the cursor moves
    let frame = received(frame_rx).await?;
    assert_eq!(frame.line, Some(4));
    assert_eq!(frame.func.as_deref(), Some("main"));
    assert_eq!(frame.fullname.as_deref(), Some("/t/a.c"));

    world
        .ui()
        .wait_for("jump", |c| {
            *c == UiCall::Jump {
                file: "/t/a.c".to_string(),
                line: 4,
            }
        })
        .await?;
    gdb.sync(&session).await?;
    assert_eq!(session.exec_state().await?, ExecState::Stopped);
    Ok(())
}

#[tokio::test]
async fn test_tokened_stop_reaches_its_own_callback() -> Result<()> {
    // Given: a `continue` without a callback, then a `step` with one
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    let (callback, mut step_rx) = frame_channel();
    let continue_token = session.do_exec(ExecCommand::Continue, &[], None).await?;
    let step_token = session
        .do_exec(ExecCommand::Step, &[], Some(callback))
        .await?;
    gdb.read_command().await?;
    gdb.read_command().await?;

    // When: the stop echoes the `continue` token
    gdb.emit(&format!("{}{}", continue_token, STOPPED_BREAKPOINT_HIT))
        .await?;
    gdb.sync(&session).await?;

    // Then: the `step` callback is left waiting
    assert!(matches!(step_rx.try_recv(), Err(TryRecvError::Empty)));

    // When: the stop echoes the `step` token
    gdb.emit(&format!("{}{}", step_token, STOPPED_END_STEPPING))
        .await?;

    // Then: it receives that frame
    assert_eq!(received(step_rx).await?.line, Some(4));
    Ok(())
}

#[tokio::test]
async fn test_stop_without_frame_settles_exec_callback() -> Result<()> {
    // Given: a `run` with a callback whose program exits without a frame
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    let (callback, mut run_rx) = frame_channel();
    let token = session
        .do_exec(ExecCommand::Run, &[], Some(callback))
        .await?;
    gdb.expect_command("-exec-run").await?;
    gdb.respond(token, "^running").await?;
    gdb.emit(RUNNING).await?;
    gdb.emit(STOPPED_EXITED_NORMALLY).await?;
    gdb.sync(&session).await?;

    // When: a second `run` without a callback stops at a breakpoint
    let token = session.do_exec(ExecCommand::Run, &[], None).await?;
    gdb.expect_command("-exec-run").await?;
    gdb.respond(token, "^running").await?;
    gdb.emit(RUNNING).await?;
    gdb.emit(STOPPED_BREAKPOINT_HIT).await?;
    gdb.sync(&session).await?;

    // Then: the first callback was dropped unused
    assert!(matches!(run_rx.try_recv(), Err(TryRecvError::Closed)));
    assert_eq!(session.pending_commands().await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_new_exec_callback_supersedes_waiting_one() -> Result<()> {
    // Given: a `continue` whose callback is still waiting
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    let (first, mut first_rx) = frame_channel();
    let (second, second_rx) = frame_channel();
    let token = session
        .do_exec(ExecCommand::Continue, &[], Some(first))
        .await?;
    gdb.expect_command("-exec-continue").await?;
    gdb.respond(token, "^running").await?;

    // When: another exec command registers a callback and the stop arrives
    session
        .do_exec(ExecCommand::Next, &[], Some(second))
        .await?;
    gdb.expect_command("-exec-next").await?;
    gdb.emit(STOPPED_END_STEPPING).await?;

    // Then: only the newer callback sees the frame
    assert_eq!(received(second_rx).await?.line, Some(4));
    assert!(matches!(first_rx.try_recv(), Err(TryRecvError::Closed)));
    Ok(())
}

#[tokio::test]
async fn test_exec_state_follows_running_and_stopped() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    assert_eq!(session.exec_state().await?, ExecState::Ready);

    gdb.emit(RUNNING).await?;
    gdb.sync(&session).await?;
    assert_eq!(session.exec_state().await?, ExecState::Running);

    gdb.emit(STOPPED_BREAKPOINT_HIT).await?;
    gdb.sync(&session).await?;
    assert_eq!(session.exec_state().await?, ExecState::Stopped);

    gdb.emit(RUNNING).await?;
    gdb.sync(&session).await?;
    assert_eq!(session.exec_state().await?, ExecState::Running);
    Ok(())
}

#[tokio::test]
async fn test_exec_arguments_are_passed_through() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    session
        .do_exec(ExecCommand::Run, &["--start".to_string()], None)
        .await?;
    session.interrupt().await?;

    gdb.expect_command("-exec-run --start").await?;
    gdb.expect_command("-exec-interrupt").await?;
    Ok(())
}

#[tokio::test]
async fn test_locals_and_frames_empty_unless_stopped() -> Result<()> {
    // Given: a session that never stopped
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    // Then: nothing is asked of the debugger
    assert!(session.get_locals().await?.is_empty());
    assert!(session.get_frames().await?.is_empty());
    gdb.sync(&session).await?;
    Ok(())
}

#[tokio::test]
async fn test_locals_and_frames_when_stopped() -> Result<()> {
    // Given: a stopped debuggee
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    gdb.emit(STOPPED_BREAKPOINT_HIT).await?;
    gdb.sync(&session).await?;

    // When: listing locals
    let (locals, answered) = tokio::join!(session.get_locals(), async {
        let token = gdb
            .expect_command("-stack-list-variables --simple-values")
            .await?;
        gdb.respond(token, LOCALS_DONE_BODY).await
    });
    answered?;

    // Then: names, types and simple values come back
    let locals = locals?;
    assert_eq!(locals.len(), 2);
    assert_eq!(locals[0].name, "i");
    assert_eq!(locals[0].value.as_deref(), Some("3"));
    assert_eq!(locals[1].type_name.as_deref(), Some("char [8]"));
    assert_eq!(locals[1].value, None);

    // When: listing frames
    let (frames, answered) = tokio::join!(session.get_frames(), async {
        let token = gdb.expect_command("-stack-list-frames").await?;
        gdb.respond(token, FRAMES_DONE_BODY).await
    });
    answered?;

    let frames = frames?;
    let funcs: Vec<_> = frames.iter().filter_map(|f| f.func.as_deref()).collect();
    assert_eq!(funcs, vec!["loop", "main"]);
    assert_eq!(frames[1].level, Some(1));
    Ok(())
}
