use std::env;
use std::io::{self, Write};

use tracing::debug;

use crate::builtins::registry::CommandInfo;
use crate::error::ShellError;

pub const COMMAND_INFO_CD: CommandInfo = CommandInfo {
    name: "cd",
    usage: "cd <dir>",
    run,
};

pub const COMMAND_INFO_PWD: CommandInfo = CommandInfo {
    name: "pwd",
    usage: "pwd",
    run: pwd_runner,
};

/// Extra arguments are ignored.
pub fn pwd_runner(_args: &[String]) -> Result<(), ShellError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    pwd(&mut out)
}

/// Change the process working directory. Takes exactly one path, used as
/// given; every later child inherits the new directory.
pub fn run(args: &[String]) -> Result<(), ShellError> {
    let [target] = args else {
        return Err(ShellError::CdArgCount(args.len()));
    };

    env::set_current_dir(target).map_err(|source| ShellError::ChangeDir {
        path: target.clone(),
        source,
    })?;
    debug!(dir = %target, "changed directory");
    Ok(())
}

/// Write the absolute working directory followed by a newline.
pub fn pwd<W: Write>(out: &mut W) -> Result<(), ShellError> {
    let cwd = env::current_dir().map_err(ShellError::CurrentDir)?;
    writeln!(out, "{}", cwd.display()).map_err(ShellError::CurrentDir)?;
    out.flush().map_err(ShellError::CurrentDir)
}
