//! Host Tests
//!
//! The editor-facing surface: named sessions, breakpoint toggling and
//! exec commands by name.

use anyhow::Result;
use gdbmi_runtime::{BreakSwitch, Error, GdbConfig};
use gdbmi_testing::TestWorld;
use gdbmi_testing::fixtures::BKPT_DONE_BODY;
use gdbmi_types::BreakpointId;

#[tokio::test]
async fn test_breakswitch_toggles_breakpoint() -> Result<()> {
    // Given: a host with one attached session
    let world = TestWorld::new()?;
    let mut host = world.host();
    let mut gdb = world.attach(&mut host, "main")?;

    // When: toggling an empty line
    let (switched, answered) = tokio::join!(host.breakswitch("main", "/t/a.c", 7), async {
        let token = gdb.expect_command("-break-insert /t/a.c:7").await?;
        gdb.respond(token, BKPT_DONE_BODY).await
    });
    answered?;

    // Then: a breakpoint is inserted
    assert_eq!(switched?, BreakSwitch::Inserted(BreakpointId::new(1)));

    // When: toggling the same line again
    let (switched, answered) = tokio::join!(host.breakswitch("main", "/t/a.c", 7), async {
        let token = gdb.expect_command("-break-delete 1").await?;
        gdb.respond(token, "^done").await
    });
    answered?;

    // Then: it is deleted
    assert_eq!(switched?, BreakSwitch::Deleted(BreakpointId::new(1)));
    host.shutdown().await?;
    Ok(())
}

#[tokio::test]
async fn test_exec_by_name() -> Result<()> {
    let world = TestWorld::new()?;
    let mut host = world.host();
    let mut gdb = world.attach(&mut host, "main")?;

    host.exec("main", "step-instruction", &[]).await?;
    gdb.expect_command("-exec-step-instruction").await?;

    let unknown = host.exec("main", "jump", &[]).await;
    assert!(matches!(unknown, Err(Error::InvalidArgument(_))));
    Ok(())
}

#[tokio::test]
async fn test_display_registers_on_session() -> Result<()> {
    let world = TestWorld::new()?;
    let mut host = world.host();
    let _gdb = world.attach(&mut host, "main")?;

    assert!(host.display("main", "argc").await?);
    assert!(!host.display("main", "argc").await?);
    assert_eq!(host.session("main")?.displays().await?, vec!["argc"]);
    Ok(())
}

#[tokio::test]
async fn test_session_names_are_unique() -> Result<()> {
    let world = TestWorld::new()?;
    let mut host = world.host();
    let _main = world.attach(&mut host, "main")?;
    let _other = world.attach(&mut host, "other")?;

    assert!(matches!(
        world.attach(&mut host, "main"),
        Err(err) if err.to_string().contains("main")
    ));
    assert_eq!(host.names(), vec!["main", "other"]);

    host.stop("other").await?;
    assert_eq!(host.names(), vec!["main"]);
    assert!(matches!(
        host.stop("other").await,
        Err(Error::UnknownSession(_))
    ));
    assert!(matches!(
        host.breakswitch("other", "a.c", 1).await,
        Err(Error::UnknownSession(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_start_requires_debuggee() -> Result<()> {
    let world = TestWorld::new()?;
    let mut host = world.host();

    assert!(matches!(
        host.start("main", &[]).await,
        Err(Error::InvalidArgument(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_redirect_inferior_uses_configured_tty() -> Result<()> {
    // Given: a host with the default configuration
    let world = TestWorld::new()?;
    let mut host = world.host();
    let mut gdb = world.attach(&mut host, "main")?;

    // When: redirecting the debuggee terminal
    let token = host.redirect_inferior("main").await?;

    // Then: gdb is told to use /dev/null
    assert_eq!(gdb.expect_command("-inferior-tty-set /dev/null").await?, token.unwrap());
    Ok(())
}

#[tokio::test]
async fn test_redirect_inferior_skipped_without_tty() -> Result<()> {
    // Given: a host configured to leave the terminal inherited
    let world = TestWorld::new()?.with_gdb_config(GdbConfig {
        inferior_tty: String::new(),
        ..GdbConfig::default()
    });
    let mut host = world.host();
    let mut gdb = world.attach(&mut host, "main")?;

    // When: redirecting
    let token = host.redirect_inferior("main").await?;

    // Then: nothing is sent before the next command
    assert_eq!(token, None);
    let session = host.session("main")?.clone();
    gdb.sync(&session).await?;
    Ok(())
}
