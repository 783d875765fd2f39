use std::ffi::CString;
use std::io::{self, Write};

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{execvp, fork, ForkResult, Pid};
use tracing::debug;

use crate::error::ShellError;
use crate::parser::ArgVector;

/// Child status when the program could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Child status when the program was found but could not be executed.
pub const EXIT_CANNOT_EXEC: i32 = 126;
/// Child status when stream setup failed before exec.
pub const EXIT_SETUP_FAILED: i32 = 1;

/// An argument vector converted for `execvp`, prepared in the parent so the
/// child does as little as possible between fork and exec.
#[derive(Debug)]
pub struct ExecArgs {
    name: String,
    argv: Vec<CString>,
}

impl ExecArgs {
    pub fn new(argv: &ArgVector) -> Result<Self, ShellError> {
        let name = argv.name().ok_or(ShellError::EmptyCommand)?.to_string();
        let argv = argv
            .as_slice()
            .iter()
            .map(|arg| CString::new(arg.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ShellError::NulByte(name.clone()))?;
        Ok(ExecArgs { name, argv })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A spawned child that has not been reaped yet.
///
/// [`ChildHandle::wait`] consumes the handle, so a child cannot be waited on
/// twice. A handle dropped without waiting reaps the child in `drop`, which
/// keeps early returns from leaving zombies behind.
#[derive(Debug)]
pub struct ChildHandle {
    pid: Pid,
    reaped: bool,
}

impl ChildHandle {
    pub fn new(pid: Pid) -> Self {
        ChildHandle { pid, reaped: false }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Block until the child terminates and return its exit code
    /// (`128 + signal` when it was killed).
    pub fn wait(mut self) -> Result<i32, ShellError> {
        let pid = self.pid;
        self.reap().map_err(|source| ShellError::Wait { pid, source })
    }

    fn reap(&mut self) -> Result<i32, Errno> {
        loop {
            match waitpid(self.pid, None) {
                Ok(WaitStatus::Exited(_, code)) => {
                    self.reaped = true;
                    debug!(pid = %self.pid, code, "reaped child");
                    return Ok(code);
                }
                Ok(WaitStatus::Signaled(_, sig, _)) => {
                    self.reaped = true;
                    debug!(pid = %self.pid, signal = %sig, "reaped child");
                    return Ok(128 + sig as i32);
                }
                Ok(_) | Err(Errno::EINTR) => continue,
                Err(e) => {
                    // ECHILD and friends: there is nothing left to wait for.
                    self.reaped = true;
                    return Err(e);
                }
            }
        }
    }
}

impl Drop for ChildHandle {
    fn drop(&mut self) {
        if !self.reaped {
            if let Err(e) = self.reap() {
                debug!(pid = %self.pid, error = %e, "reaping dropped child failed");
            }
        }
    }
}

pub enum Forked {
    Child,
    Parent(ChildHandle),
}

/// Fork the interpreter. Pending stdout/stderr output is flushed first so the
/// child does not inherit and re-emit it.
pub fn fork_process() -> Result<Forked, Errno> {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();

    // SAFETY: the child side only rearranges descriptors, then execs or _exits.
    match unsafe { fork() }? {
        ForkResult::Parent { child } => {
            debug!(pid = %child, "forked");
            Ok(Forked::Parent(ChildHandle::new(child)))
        }
        ForkResult::Child => Ok(Forked::Child),
    }
}

/// Child side: replace the process image. On failure, report from the child
/// and terminate it right away; control never returns to shell code.
pub fn exec_or_exit(args: &ExecArgs) -> ! {
    let err = match execvp(&args.argv[0], &args.argv) {
        Ok(never) => match never {},
        Err(e) => e,
    };

    let code = if err == Errno::ENOENT {
        eprintln!("mysh: command not found: {}", args.name);
        EXIT_NOT_FOUND
    } else {
        eprintln!("mysh: error executing '{}': {}", args.name, err.desc());
        EXIT_CANNOT_EXEC
    };
    exit_now(code)
}

/// Terminate the current (child) process without running exit handlers or
/// flushing buffers that belong to the parent.
pub fn exit_now(code: i32) -> ! {
    unsafe { nix::libc::_exit(code) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(list: &[&str]) -> ArgVector {
        list.iter().copied().collect()
    }

    fn spawn(list: &[&str]) -> ChildHandle {
        let args = ExecArgs::new(&argv(list)).unwrap();
        match fork_process().unwrap() {
            Forked::Child => exec_or_exit(&args),
            Forked::Parent(child) => child,
        }
    }

    #[test]
    fn test_exec_args_rejects_empty() {
        assert!(matches!(ExecArgs::new(&ArgVector::new()), Err(ShellError::EmptyCommand)));
    }

    #[test]
    fn test_exec_args_rejects_nul() {
        let err = ExecArgs::new(&argv(&["echo", "a\0b"])).unwrap_err();
        assert!(matches!(err, ShellError::NulByte(ref name) if name == "echo"));
    }

    #[test]
    fn test_wait_returns_exit_code() {
        assert_eq!(spawn(&["true"]).wait().unwrap(), 0);
        assert_eq!(spawn(&["false"]).wait().unwrap(), 1);
        assert_eq!(spawn(&["sh", "-c", "exit 7"]).wait().unwrap(), 7);
    }

    #[test]
    fn test_unknown_program_exits_not_found() {
        let code = spawn(&["mysh-no-such-program-xyzzy"]).wait().unwrap();
        assert_eq!(code, EXIT_NOT_FOUND);
    }

    #[test]
    fn test_non_executable_exits_cannot_exec() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("plain.txt");
        std::fs::write(&script, "not a program").unwrap();
        let path = script.to_string_lossy().into_owned();
        assert_eq!(spawn(&[path.as_str()]).wait().unwrap(), EXIT_CANNOT_EXEC);
    }

    #[test]
    fn test_killed_child_reports_signal() {
        let code = spawn(&["sh", "-c", "kill -9 $$"]).wait().unwrap();
        assert_eq!(code, 128 + 9);
    }

    #[test]
    fn test_dropped_handle_reaps_child() {
        let child = spawn(&["true"]);
        let pid = child.pid();
        drop(child);
        assert_eq!(waitpid(pid, None), Err(Errno::ECHILD));
    }
}
