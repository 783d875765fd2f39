use std::os::fd::AsRawFd;

use nix::fcntl::OFlag;
use nix::unistd::{dup2_stdin, dup2_stdout, pipe2};
use tracing::debug;

use super::process::{exec_or_exit, exit_now, fork_process, ExecArgs, Forked, EXIT_SETUP_FAILED};
use crate::error::ShellError;
use crate::parser::ArgVector;

// ── Two-stage pipeline ────────────────────────────────────────────────────

/// Run `producer | consumer`: the producer's stdout feeds the consumer's
/// stdin through one pipe, both run concurrently, and both are reaped before
/// returning.
///
/// Builtin names are not special here; they are exec'd like any program.
/// The stages' exit codes are not reported to the caller.
///
/// Failing to create the pipe or to fork either stage is fatal. Every other
/// failure, including a stage whose program cannot be exec'd, is local to
/// this command line.
pub fn run_pipeline(producer: &ArgVector, consumer: &ArgVector) -> Result<(), ShellError> {
    let producer = ExecArgs::new(producer)?;
    let consumer = ExecArgs::new(consumer)?;

    // Close-on-exec keeps both ends out of every exec'd program; dup2 clears
    // the flag on the std stream each stage actually uses.
    let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC).map_err(ShellError::Pipe)?;
    debug!(
        read = read_end.as_raw_fd(),
        write = write_end.as_raw_fd(),
        producer = producer.name(),
        consumer = consumer.name(),
        "pipeline"
    );

    let first = match fork_process() {
        Ok(Forked::Child) => {
            drop(read_end);
            let redirected = dup2_stdout(&write_end);
            drop(write_end);
            if let Err(e) = redirected {
                eprintln!("mysh: {}: cannot redirect stdout: {}", producer.name(), e.desc());
                exit_now(EXIT_SETUP_FAILED);
            }
            exec_or_exit(&producer)
        }
        Ok(Forked::Parent(child)) => child,
        Err(source) => {
            drop(read_end);
            drop(write_end);
            return Err(ShellError::PipelineSpawn { program: producer.name().to_string(), source });
        }
    };

    let second = match fork_process() {
        Ok(Forked::Child) => {
            drop(write_end);
            let redirected = dup2_stdin(&read_end);
            drop(read_end);
            if let Err(e) = redirected {
                eprintln!("mysh: {}: cannot redirect stdin: {}", consumer.name(), e.desc());
                exit_now(EXIT_SETUP_FAILED);
            }
            exec_or_exit(&consumer)
        }
        Ok(Forked::Parent(child)) => child,
        Err(source) => {
            // Close both ends before waiting, or the producer may block on a
            // full pipe forever.
            drop(read_end);
            drop(write_end);
            if let Err(e) = first.wait() {
                debug!(error = %e, "reaping first stage after failed fork");
            }
            return Err(ShellError::PipelineSpawn { program: consumer.name().to_string(), source });
        }
    };

    // The parent never touches the data. Holding the write end open would
    // keep the consumer from ever seeing end-of-file.
    drop(read_end);
    drop(write_end);

    let producer_status = first.wait();
    let consumer_status = second.wait();
    debug!(
        producer = ?producer_status.as_ref().ok(),
        consumer = ?consumer_status.as_ref().ok(),
        "pipeline finished"
    );
    producer_status?;
    consumer_status?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────
