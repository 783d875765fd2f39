use tracing::debug;

use crate::builtins;
use crate::error::ShellError;
use crate::parser::{ArgVector, CommandLine};

use super::pipeline::run_pipeline;
use super::process::{exec_or_exit, fork_process, ExecArgs, Forked};

/// Run one tokenized line to completion.
///
/// An `Err` means the command failed; the caller decides, via
/// [`ShellError::is_fatal`], whether the interpreter keeps going.
pub fn execute(line: CommandLine) -> Result<(), ShellError> {
    match line {
        CommandLine::Simple(argv) => dispatch(&argv),
        CommandLine::Pipeline(producer, consumer) => run_pipeline(&producer, &consumer),
    }
}

// ── Single command (no pipe) ──────────────────────────────────────────────

/// Builtins first, in registry order, then external programs. A blank line
/// does nothing.
fn dispatch(argv: &ArgVector) -> Result<(), ShellError> {
    let Some(name) = argv.name() else {
        return Ok(());
    };

    if let Some(cmd_info) = builtins::registry::find_command(name) {
        debug!(builtin = cmd_info.name, "running builtin");
        return (cmd_info.run)(argv.params());
    }

    run_external(argv).map(|_| ())
}

/// Fork one child, exec `argv` in it and block until it terminates.
/// Returns the child's exit code.
///
/// A failed fork abandons just this command. A failed exec is reported by
/// the child itself and shows up here only as exit code 127 or 126.
pub fn run_external(argv: &ArgVector) -> Result<i32, ShellError> {
    let args = ExecArgs::new(argv)?;

    let child = match fork_process() {
        Ok(Forked::Child) => exec_or_exit(&args),
        Ok(Forked::Parent(child)) => child,
        Err(source) => {
            return Err(ShellError::Spawn { program: args.name().to_string(), source });
        }
    };

    let code = child.wait()?;
    debug!(program = args.name(), code, "command finished");
    Ok(code)
}

// ── Tests ──────────────────────────────────────────────────────────────────
