//! Command Correlation Tests
//!
//! Token allocation, result matching, failures and timeouts.

use anyhow::Result;
use gdbmi_runtime::{Error, SessionConfig};
use gdbmi_testing::fixtures::CONSOLE_HELLO;
use gdbmi_testing::{TestWorld, UiCall};
use gdbmi_types::ResultClass;

#[tokio::test]
async fn test_tokens_strictly_increase() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    let mut tokens = Vec::new();
    for _ in 0..5 {
        tokens.push(session.send("-list-features").await?);
    }

    assert!(tokens.windows(2).all(|pair| pair[0] < pair[1]));
    for expected in &tokens {
        let (token, text) = gdb.read_command().await?;
        assert_eq!(token, *expected);
        assert_eq!(text, "-list-features");
    }
    Ok(())
}

#[tokio::test]
async fn test_execute_returns_matching_result() -> Result<()> {
    // Given: two commands in flight
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    // When: gdb answers them out of order
    let (first, second, answered) = tokio::join!(
        session.execute("-data-evaluate-expression a"),
        session.execute("-data-evaluate-expression b"),
        async {
            let (a, _) = gdb.read_command().await?;
            let (b, _) = gdb.read_command().await?;
            gdb.respond(b, r#"^done,value="2""#).await?;
            gdb.respond(a, r#"^done,value="1""#).await
        }
    );
    answered?;

    // Then: each caller gets its own record
    assert_eq!(first?.results.get_str("value"), Some("1"));
    assert_eq!(second?.results.get_str("value"), Some("2"));
    Ok(())
}

#[tokio::test]
async fn test_execute_surfaces_error_result() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    let (executed, answered) = tokio::join!(session.execute("-bogus"), async {
        let token = gdb.expect_command("-bogus").await?;
        gdb.respond(token, r#"^error,msg="Undefined MI command: bogus""#)
            .await
    });
    answered?;

    match executed {
        Err(Error::Command { message, .. }) => assert_eq!(message, "Undefined MI command: bogus"),
        other => panic!("expected command error, got {:?}", other),
    }
    // the waiter got the error, so the UI is not told twice
    assert!(!world
        .ui()
        .calls()
        .iter()
        .any(|c| matches!(c, UiCall::Error(_))));
    Ok(())
}

#[tokio::test]
async fn test_unawaited_error_goes_to_ui() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    let token = session.send("-bogus").await?;
    gdb.expect_command("-bogus").await?;
    gdb.respond(token, r#"^error,msg="Undefined MI command: bogus""#)
        .await?;

    world
        .ui()
        .wait_for("error", |c| {
            *c == UiCall::Error("Undefined MI command: bogus".to_string())
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_result_for_unknown_token_is_dropped() -> Result<()> {
    // Given: a session with nothing pending
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    // When: results arrive for tokens nobody sent
    gdb.emit(r#"0099^done,value="1""#).await?;
    gdb.emit(r#"0098^error,msg="stale""#).await?;
    gdb.emit(r#"^done"#).await?;

    // Then: the session keeps working and only the error is reported
    gdb.sync(&session).await?;
    let calls = world.ui().calls();
    assert_eq!(calls, vec![UiCall::AsyncError("stale".to_string())]);
    Ok(())
}

#[tokio::test]
async fn test_command_timeout() -> Result<()> {
    let world = TestWorld::new()?.with_session_config(SessionConfig {
        command_timeout_ms: Some(50),
        ..SessionConfig::default()
    });
    let (session, mut gdb) = world.spawn_session("main");

    let result = session.execute("-gdb-version").await;
    let (token, _) = gdb.read_command().await?;

    assert!(matches!(result, Err(Error::Timeout(t)) if t == token));

    // a late answer is harmless
    gdb.respond(token, "^done").await?;
    gdb.sync(&session).await?;
    Ok(())
}

#[tokio::test]
async fn test_timed_out_command_is_forgotten() -> Result<()> {
    // Given: a short command timeout
    let world = TestWorld::new()?.with_session_config(SessionConfig {
        command_timeout_ms: Some(50),
        ..SessionConfig::default()
    });
    let (session, mut gdb) = world.spawn_session("main");

    // When: a command is never answered in time
    let result = session.execute("-symbol-info-functions").await;
    let (token, _) = gdb.read_command().await?;
    assert!(matches!(result, Err(Error::Timeout(t)) if t == token));

    // Then: the table no longer tracks it
    assert_eq!(session.pending_commands().await?, 0);

    // and a late failure is reported as unmatched
    gdb.respond(token, r#"^error,msg="too late""#).await?;
    world
        .ui()
        .wait_for("async error", |c| *c == UiCall::AsyncError("too late".to_string()))
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_console_shortcuts_use_exec_commands() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    session.send_console_command("n").await?;
    session.send_console_command("c").await?;
    session.send_console_command("r").await?;
    session.send_console_command("info registers").await?;

    gdb.expect_command("-exec-next").await?;
    gdb.expect_command("-exec-continue").await?;
    gdb.expect_command("-exec-run").await?;
    gdb.expect_command(r#"-interpreter-exec console "info registers""#)
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_console_output_is_kept() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    gdb.emit(CONSOLE_HELLO).await?;
    gdb.emit(r#"@"target says hi\n""#).await?;
    gdb.emit(r#"&"log line\n""#).await?;
    gdb.sync(&session).await?;

    assert_eq!(session.console_output().await?, vec!["hello\n".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_inferior_tty_set() -> Result<()> {
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");

    let (set, answered) = tokio::join!(session.inferior_tty_set("/dev/pts/4"), async {
        let token = gdb.expect_command("-inferior-tty-set /dev/pts/4").await?;
        gdb.respond(token, "^done").await
    });
    answered?;
    set?;

    let (record, answered) = tokio::join!(session.execute("-exec-continue"), async {
        let token = gdb.read_command().await?.0;
        gdb.respond(token, "^running").await
    });
    answered?;
    assert_eq!(record?.class, ResultClass::Running);
    Ok(())
}
