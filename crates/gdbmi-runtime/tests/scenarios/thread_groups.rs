//! Thread Group Tests
//!
//! Inferior lifecycle notifications and the cursor they clear.

use anyhow::Result;
use gdbmi_testing::fixtures::{
    THREAD_CREATED, THREAD_GROUP_ADDED, THREAD_GROUP_EXITED, THREAD_GROUP_STARTED,
};
use gdbmi_testing::{TestWorld, UiCall};
use gdbmi_types::ThreadGroupId;

#[tokio::test]
async fn test_thread_group_lifecycle() -> Result<()> {
    // Given: an inferior that starts with one thread
    let world = TestWorld::new()?;
    let (session, mut gdb) = world.spawn_session("main");
    gdb.emit(THREAD_GROUP_ADDED).await?;
    gdb.emit(THREAD_GROUP_STARTED).await?;
    gdb.emit(THREAD_CREATED).await?;
    gdb.emit(r#"=library-loaded,id="/lib/libc.so.6",target-name="/lib/libc.so.6",host-name="/lib/libc.so.6",symbols-loaded="0",thread-group="i1""#)
        .await?;
    gdb.sync(&session).await?;

    let groups = session.thread_groups().await?;
    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.id, ThreadGroupId::from("i1"));
    assert_eq!(group.pid.as_deref(), Some("4242"));
    assert!(group.threads.contains("1"));
    assert!(group.libraries.contains_key("/lib/libc.so.6"));

    // When: the inferior exits
    gdb.emit(THREAD_GROUP_EXITED).await?;
    gdb.sync(&session).await?;

    // Then: the group is gone and its cursor cleared
    assert!(session.thread_groups().await?.is_empty());
    assert!(
        world
            .ui()
            .calls()
            .contains(&UiCall::DelCursor(ThreadGroupId::from("i1")))
    );
    Ok(())
}

#[tokio::test]
async fn test_thread_selected_moves_cursor() -> Result<()> {
    let world = TestWorld::new()?;
    let (_session, mut gdb) = world.spawn_session("main");

    gdb.emit(r#"=thread-selected,id="2",frame={level="0",addr="0x400600",func="worker",file="w.c",fullname="/t/w.c",line="12"}"#)
        .await?;

    world
        .ui()
        .wait_for("jump", |c| {
            *c == UiCall::Jump {
                file: "/t/w.c".to_string(),
                line: 12,
            }
        })
        .await?;
    Ok(())
}
