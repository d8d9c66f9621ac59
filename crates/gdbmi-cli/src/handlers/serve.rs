//! Line-oriented host: one request per line on stdin, one reply per request
//! on stdout. UI calls from the sessions are interleaved on stdout as they
//! happen.
//!
//! Requests:
//!
//! ```text
//! start NAME DEBUGGEE [ARGS..]
//! stop NAME
//! breakswitch NAME FILE LINE
//! display NAME EXPR..
//! exec NAME CMD [ARGS..]
//! quit
//! ```

use crate::console_ui::ConsoleUi;
use anyhow::{Result, anyhow, bail};
use gdbmi_runtime::{BreakSwitch, Config, Host};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Start { name: String, debuggee: Vec<String> },
    Stop { name: String },
    Breakswitch { name: String, file: String, line: u32 },
    Display { name: String, expr: String },
    Exec { name: String, command: String, args: Vec<String> },
    Quit,
}

impl FromStr for Request {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();

        match words.as_slice() {
            ["start", name, debuggee @ ..] if !debuggee.is_empty() => Ok(Request::Start {
                name: name.to_string(),
                debuggee: owned(debuggee),
            }),
            ["stop", name] => Ok(Request::Stop {
                name: name.to_string(),
            }),
            ["breakswitch", name, file, line] => Ok(Request::Breakswitch {
                name: name.to_string(),
                file: file.to_string(),
                line: line
                    .parse()
                    .map_err(|_| anyhow!("invalid line number: {}", line))?,
            }),
            ["display", name, expr @ ..] if !expr.is_empty() => Ok(Request::Display {
                name: name.to_string(),
                expr: expr.join(" "),
            }),
            ["exec", name, command, args @ ..] => Ok(Request::Exec {
                name: name.to_string(),
                command: command.to_string(),
                args: owned(args),
            }),
            ["quit"] => Ok(Request::Quit),
            [verb, ..] => bail!("unknown request or missing arguments: {}", verb),
            [] => bail!("empty request"),
        }
    }
}

pub fn handle(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let served = runtime.block_on(serve(config));
    // a blocked stdin read must not hold the process open
    runtime.shutdown_timeout(Duration::from_millis(100));
    served
}

async fn serve(config: Config) -> Result<()> {
    let mut host = Host::new(config, Arc::new(ConsoleUi));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!("serving requests on stdin");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!(request = %line, "request");

        let request = match line.parse::<Request>() {
            Ok(request) => request,
            Err(err) => {
                println!("error: {}", err);
                continue;
            }
        };
        if request == Request::Quit {
            break;
        }

        match dispatch(&mut host, request).await {
            Ok(reply) => println!("ok{}", reply),
            Err(err) => println!("error: {}", err),
        }
    }

    host.shutdown().await?;
    Ok(())
}

/// Run one request; the reply text follows `ok` on the same line.
async fn dispatch(host: &mut Host, request: Request) -> Result<String> {
    let reply = match request {
        Request::Start { name, debuggee } => {
            host.start(&name, &debuggee).await?;
            String::new()
        }
        Request::Stop { name } => {
            host.stop(&name).await?;
            String::new()
        }
        Request::Breakswitch { name, file, line } => {
            match host.breakswitch(&name, &file, line).await? {
                BreakSwitch::Inserted(id) => format!(" inserted {}", id),
                BreakSwitch::Deleted(id) => format!(" deleted {}", id),
            }
        }
        Request::Display { name, expr } => {
            if host.display(&name, &expr).await? {
                " added".to_string()
            } else {
                " exists".to_string()
            }
        }
        Request::Exec {
            name,
            command,
            args,
        } => {
            let token = host.exec(&name, &command, &args).await?;
            format!(" {}", token)
        }
        Request::Quit => String::new(),
    };
    Ok(reply)
}
