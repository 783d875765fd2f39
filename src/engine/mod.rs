mod execution;
mod pipeline;
mod process;

// Re-export the public API so that callers (`session`, tests) only need
// `engine::execute`, `engine::run_external`, etc.
pub use execution::{execute, run_external};
pub use pipeline::run_pipeline;
pub use process::{ChildHandle, EXIT_CANNOT_EXEC, EXIT_NOT_FOUND};
