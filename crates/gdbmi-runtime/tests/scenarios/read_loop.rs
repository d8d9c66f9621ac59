//! Read Loop Tests
//!
//! Unparsable output, end of stream and detaching.

use anyhow::Result;
use gdbmi_runtime::{Error, ParseErrorPolicy, SessionConfig};
use gdbmi_testing::fixtures::{PROMPT, THREAD_GROUP_ADDED};
use gdbmi_testing::{TestWorld, UiCall};

fn is_parse_report(call: &UiCall) -> bool {
    matches!(call, UiCall::AsyncError(message) if message.starts_with("Failed to parse debugger output"))
}

#[tokio::test]
async fn test_parse_error_aborts_by_default() -> Result<()> {
    // Given: the default policy
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    // When: gdb emits a line that is not MI
    gdb.emit("this is not mi").await?;

    // Then: the error is reported and the read loop ends with it
    world.ui().wait_for("parse error", is_parse_report).await?;
    assert!(matches!(session.stop().await, Err(Error::Parse(_))));
    assert!(matches!(
        session.send("-gdb-version").await,
        Err(Error::Closed(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_parse_error_skipped_when_configured() -> Result<()> {
    let world = TestWorld::new()?.with_session_config(SessionConfig {
        on_parse_error: ParseErrorPolicy::Skip,
        ..SessionConfig::default()
    });
    let (session, mut gdb) = world.spawn_session("main");

    gdb.emit(r#"^done,value="unterminated"#).await?;
    gdb.emit(THREAD_GROUP_ADDED).await?;
    gdb.sync(&session).await?;

    assert!(world.ui().calls().iter().any(is_parse_report));
    assert_eq!(session.thread_groups().await?.len(), 1);
    session.stop().await?;
    Ok(())
}

#[tokio::test]
async fn test_prompts_and_blank_lines_are_ignored() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    gdb.emit(PROMPT).await?;
    gdb.emit("").await?;
    gdb.emit("(gdb) ").await?;
    gdb.sync(&session).await?;

    assert!(world.ui().calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_end_of_output_closes_session() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, gdb) = world.spawn_session("main");

    gdb.close().await?;

    // the loop ends cleanly and later commands fail
    session.stop().await?;
    assert!(matches!(
        session.breakpoints_status("a.c", 1).await,
        Err(Error::Closed(name)) if name == "main"
    ));
    Ok(())
}

#[tokio::test]
async fn test_quit_sends_exit_and_waits() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    let (quit, answered) = tokio::join!(session.quit(), async {
        let token = gdb.expect_command("-gdb-exit").await?;
        gdb.emit(&format!("{}^exit", token)).await?;
        gdb.close().await
    });
    answered?;
    quit?;
    assert!(session.is_closed());
    Ok(())
}
