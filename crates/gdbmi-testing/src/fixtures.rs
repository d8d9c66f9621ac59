//! MI output lines used across tests.

pub const PROMPT: &str = "(gdb)";

pub const STOPPED_END_STEPPING: &str = r#"*stopped,reason="end-stepping-range",frame={addr="0x4005c8",func="main",args=[],file="a.c",fullname="/t/a.c",line="4"},thread-id="1",stopped-threads="all",core="2""#;

pub const STOPPED_BREAKPOINT_HIT: &str = r#"*stopped,reason="breakpoint-hit",disp="keep",bkptno="1",frame={addr="0x400600",func="loop",args=[],file="a.c",fullname="/t/a.c",line="7"},thread-id="1",stopped-threads="all""#;

pub const RUNNING: &str = r#"*running,thread-id="all""#;

pub const STOPPED_EXITED_NORMALLY: &str = r#"*stopped,reason="exited-normally""#;

pub const BKPT_DONE_BODY: &str = r#"^done,bkpt={number="1",type="breakpoint",disp="keep",enabled="y",addr="0x400600",func="loop",file="a.c",fullname="/t/a.c",line="7",times="0",original-location="/t/a.c:7"}"#;

pub const BREAKPOINT_CREATED_MULTI: &str = r#"=breakpoint-created,bkpt={number="2",type="breakpoint",disp="keep",enabled="y",addr="<MULTIPLE>",times="0",original-location="tmpl.h:10"},{number="2.1",enabled="y",addr="0x400700",func="f<int>",file="tmpl.h",fullname="/t/tmpl.h",line="10"},{number="2.2",enabled="y",addr="0x400800",func="f<long>",file="tmpl.h",fullname="/t/tmpl.h",line="10"}"#;

pub const BREAKPOINT_DELETED_MULTI: &str = r#"=breakpoint-deleted,id="2""#;

pub const THREAD_GROUP_ADDED: &str = r#"=thread-group-added,id="i1""#;
pub const THREAD_GROUP_STARTED: &str = r#"=thread-group-started,id="i1",pid="4242""#;
pub const THREAD_CREATED: &str = r#"=thread-created,id="1",group-id="i1""#;
pub const THREAD_GROUP_EXITED: &str = r#"=thread-group-exited,id="i1""#;

pub const CONSOLE_HELLO: &str = r#"~"hello\n""#;

/// Stack listing for `-stack-list-frames`.
pub const FRAMES_DONE_BODY: &str = r#"^done,stack=[frame={level="0",addr="0x400600",func="loop",file="a.c",fullname="/t/a.c",line="7"},frame={level="1",addr="0x4005c8",func="main",file="a.c",fullname="/t/a.c",line="4"}]"#;

/// Locals for `-stack-list-variables --simple-values`.
pub const LOCALS_DONE_BODY: &str = r#"^done,variables=[{name="i",type="int",value="3"},{name="buf",type="char [8]"}]"#;

/// A startup transcript: every record kind once, one line each.
pub fn transcript() -> Vec<&'static str> {
    vec![
        THREAD_GROUP_ADDED,
        PROMPT,
        r#"0001^done,bkpt={number="1",type="breakpoint",enabled="y",fullname="/t/a.c",line="7"}"#,
        PROMPT,
        r#"0002^running"#,
        THREAD_GROUP_STARTED,
        THREAD_CREATED,
        RUNNING,
        CONSOLE_HELLO,
        STOPPED_BREAKPOINT_HIT,
        PROMPT,
    ]
}
