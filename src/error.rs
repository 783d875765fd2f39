use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use nix::unistd::Pid;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Everything that can go wrong while reading or running a command line.
///
/// Most variants only abandon the current command. [`ShellError::is_fatal`]
/// picks out the few that end the interpreter.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("cd: expected exactly one argument, got {0}\nusage: {usage}", usage = crate::builtins::cd::COMMAND_INFO_CD.usage)]
    CdArgCount(usize),

    #[error("cd: {path}: {source}")]
    ChangeDir {
        path: String,
        source: io::Error,
    },

    #[error("pwd: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("{0}: argument contains a NUL byte")]
    NulByte(String),

    #[error("missing command in pipeline")]
    EmptyCommand,

    #[error("error executing '{program}': {source}")]
    Spawn {
        program: String,
        source: Errno,
    },

    #[error("cannot create pipe: {0}")]
    Pipe(#[source] Errno),

    #[error("cannot start pipeline stage '{program}': {source}")]
    PipelineSpawn {
        program: String,
        source: Errno,
    },

    #[error("wait for process {pid}: {source}")]
    Wait {
        pid: Pid,
        source: Errno,
    },

    #[error("{}: {source}", .path.display())]
    BatchOpen {
        path: PathBuf,
        source: io::Error,
    },

    #[error("{0}")]
    Input(#[from] io::Error),

    #[error("{0}")]
    Readline(#[from] ReadlineError),
}

impl ShellError {
    /// Whether the interpreter must stop instead of moving on to the next
    /// line.
    ///
    /// Pipeline setup is fatal while a failed fork for a single command is
    /// not. The asymmetry is deliberate.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ShellError::Pipe(_)
                | ShellError::PipelineSpawn { .. }
                | ShellError::BatchOpen { .. }
                | ShellError::Input(_)
                | ShellError::Readline(_)
        )
    }
}
