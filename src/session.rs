//! The read-eval loops that feed lines to the engine: an interactive prompt
//! and a batch-file reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::config::Config;
use crate::engine;
use crate::error::ShellError;
use crate::parser;

pub const PROMPT: &str = "mysh> ";

/// Typed at the prompt, ends an interactive session. Batch files have no
/// such keyword.
pub const EXIT_COMMAND: &str = "exit";

/// Tokenize and run one raw line.
///
/// Non-fatal failures are reported on stderr and swallowed so the loop moves
/// on; fatal ones are handed back to stop it.
pub fn run_line(line: &str) -> Result<(), ShellError> {
    let line = parser::clamp_line(line);
    match engine::execute(parser::parse_line(line)) {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            eprintln!("mysh: {}", e);
            Ok(())
        }
    }
}

/// Run every line of `reader` in order. Invalid UTF-8 is replaced rather than
/// aborting the script.
pub fn run_script<R: BufRead>(mut reader: R) -> Result<(), ShellError> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        run_line(&String::from_utf8_lossy(&buf))?;
    }
}

/// Batch mode: one command per line of `path`. Failing to open the file is
/// fatal.
pub fn run_batch(path: &Path) -> Result<(), ShellError> {
    let file = File::open(path).map_err(|source| ShellError::BatchOpen {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "running batch file");
    run_script(BufReader::new(file))
}

/// Interactive mode: prompt, read, run, until `exit` or end of input.
pub fn run_interactive(config: &Config) -> Result<(), ShellError> {
    let mut rl = DefaultEditor::new()?;
    if let Some(path) = &config.history_file {
        if let Err(e) = rl.load_history(path) {
            debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    println!("Welcome to mysh! Type `{}` to leave.", EXIT_COMMAND);

    let result = loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if line == EXIT_COMMAND {
                    println!("mysh: exiting");
                    break Ok(());
                }
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                if let Err(e) = run_line(&line) {
                    break Err(e);
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break Ok(()),
            Err(err) => break Err(err.into()),
        }
    };

    if let Some(path) = &config.history_file {
        if let Err(e) = rl.save_history(path) {
            debug!(path = %path.display(), error = %e, "could not save history");
        }
    }
    result
}
