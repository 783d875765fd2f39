// ── AST types ──────────────────────────────────────────────────────────────

/// Upper bound on the entries of one argument vector, including the slot the
/// exec terminator would occupy.
pub const MAX_ARGS: usize = 100;

/// The ordered, owned tokens of one command: program name first.
///
/// Holds at most `MAX_ARGS - 1` tokens. Pushing past that is refused, which
/// is how over-long command lines and large glob expansions get truncated.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ArgVector {
    args: Vec<String>,
}

impl ArgVector {
    pub const CAPACITY: usize = MAX_ARGS - 1;

    pub fn new() -> Self {
        ArgVector { args: Vec::new() }
    }

    /// Append `arg` unless the vector is full. Returns whether it was stored.
    pub fn push(&mut self, arg: String) -> bool {
        debug_assert!(!arg.is_empty(), "argument vectors never hold empty tokens");
        if self.is_full() {
            return false;
        }
        self.args.push(arg);
        true
    }

    pub fn is_full(&self) -> bool {
        self.args.len() >= Self::CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// The program (or builtin) name.
    pub fn name(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// Everything after the name.
    pub fn params(&self) -> &[String] {
        self.args.get(1..).unwrap_or(&[])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.args
    }
}

impl<S: Into<String>> FromIterator<S> for ArgVector {
    /// Collects up to capacity; the rest is dropped.
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut argv = ArgVector::new();
        for arg in iter {
            if !argv.push(arg.into()) {
                break;
            }
        }
        argv
    }
}

/// A tokenized input line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CommandLine {
    /// One command. Empty for a blank line.
    Simple(ArgVector),
    /// `producer | consumer`. Either side may be empty if the user left it
    /// out; the pipeline runner rejects that.
    Pipeline(ArgVector, ArgVector),
}
