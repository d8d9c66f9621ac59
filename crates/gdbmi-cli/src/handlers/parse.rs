use anyhow::{Context, Result, bail};
use gdbmi_protocol::parse;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

pub fn handle(file: Option<&Path>, skip_errors: bool) -> Result<()> {
    let input: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;

    for (index, line) in input.lines().enumerate() {
        let mut line = line?;
        if line.trim().is_empty() {
            continue;
        }
        line.push('\n');

        match parse(&line) {
            Ok(output) => writeln!(out, "{}", serde_json::to_string(&output)?)?,
            Err(err) if skip_errors => {
                failures += 1;
                eprintln!("line {}: {}", index + 1, err);
            }
            Err(err) => bail!("line {}: {}", index + 1, err),
        }
    }
    out.flush()?;

    if failures > 0 {
        tracing::warn!(failures, "transcript had unparsable lines");
    }
    Ok(())
}
