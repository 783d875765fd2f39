mod ast;
mod combinators;
mod expand;

pub use ast::{ArgVector, CommandLine, MAX_ARGS};
pub use expand::expand_wildcard;

use combinators::split_words;
use expand::is_pattern;
use tracing::debug;

/// Size of the raw line buffer. A line keeps at most `MAX_LINE_LEN - 1`
/// bytes of content.
pub const MAX_LINE_LEN: usize = 1000;

/// The pipeline separator. Only its first occurrence is meaningful.
pub const PIPE: &str = "|";

// ── Public API ────────────────────────────────────────────────────────────

/// Strip the trailing newline and cut `line` down to the raw buffer size,
/// backing off to a UTF-8 boundary.
pub fn clamp_line(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    if line.len() < MAX_LINE_LEN {
        return line;
    }
    let mut end = MAX_LINE_LEN - 1;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    debug!(len = line.len(), kept = end, "command line truncated");
    &line[..end]
}

/// Tokenize one input line, expanding `*` patterns as it goes.
///
/// The first `|` splits the line into a two-stage pipeline; anything after
/// that, further `|` included, belongs to the second stage. Each stage is
/// capped at [`ArgVector::CAPACITY`] tokens and the excess is dropped. A `|`
/// that only shows up after the first stage is already full is never seen.
///
/// `*` expansion applies to the second stage too, so `ls | grep *.rs` hands
/// `grep` the matching file names rather than the pattern itself.
pub fn parse_line(line: &str) -> CommandLine {
    let mut words = split_words(line).into_iter();

    let mut producer = ArgVector::new();
    let mut pipe_found = false;
    while !producer.is_full() {
        let Some(word) = words.next() else { break };
        if word == PIPE {
            pipe_found = true;
            break;
        }
        push_word(&mut producer, word);
    }

    if !pipe_found {
        log_dropped(words.count());
        return CommandLine::Simple(producer);
    }

    let mut consumer = ArgVector::new();
    while !consumer.is_full() {
        let Some(word) = words.next() else { break };
        push_word(&mut consumer, word);
    }
    log_dropped(words.count());

    CommandLine::Pipeline(producer, consumer)
}

fn push_word(argv: &mut ArgVector, word: &str) {
    if is_pattern(word) {
        expand_wildcard(word, argv);
    } else {
        argv.push(word.to_string());
    }
}

fn log_dropped(count: usize) {
    if count > 0 {
        debug!(count, "argument vector full, dropping remaining tokens");
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(line: &str) -> Vec<String> {
        match parse_line(line) {
            CommandLine::Simple(argv) => argv.as_slice().to_vec(),
            other => panic!("expected a simple command, got {:?}", other),
        }
    }

    fn pipeline(line: &str) -> (Vec<String>, Vec<String>) {
        match parse_line(line) {
            CommandLine::Pipeline(a, b) => (a.as_slice().to_vec(), b.as_slice().to_vec()),
            other => panic!("expected a pipeline, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(simple("ls -la"), vec!["ls", "-la"]);
    }

    #[test]
    fn test_extra_spaces() {
        assert_eq!(simple("  ls   -la  "), vec!["ls", "-la"]);
    }

    #[test]
    fn test_blank_line_is_empty_command() {
        assert!(simple("").is_empty());
        assert!(simple("    ").is_empty());
    }

    #[test]
    fn test_quotes_are_literal() {
        assert_eq!(simple("echo \"a b\""), vec!["echo", "\"a", "b\""]);
    }

    #[test]
    fn test_pipe_splits_into_two_stages() {
        let (a, b) = pipeline("echo hello | cat");
        assert_eq!(a, vec!["echo", "hello"]);
        assert_eq!(b, vec!["cat"]);
    }

    #[test]
    fn test_pipe_needs_surrounding_spaces() {
        assert_eq!(simple("echo a|cat"), vec!["echo", "a|cat"]);
    }

    #[test]
    fn test_second_pipe_is_literal() {
        let (a, b) = pipeline("echo a | echo b | cat");
        assert_eq!(a, vec!["echo", "a"]);
        assert_eq!(b, vec!["echo", "b", "|", "cat"]);
    }

    #[test]
    fn test_missing_stages_are_empty() {
        let (a, b) = pipeline("| cat");
        assert!(a.is_empty());
        assert_eq!(b, vec!["cat"]);

        let (a, b) = pipeline("echo |");
        assert_eq!(a, vec!["echo"]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_builtin_names_stay_plain_tokens_in_pipeline() {
        let (a, b) = pipeline("cd /tmp | pwd");
        assert_eq!(a, vec!["cd", "/tmp"]);
        assert_eq!(b, vec!["pwd"]);
    }

    #[test]
    fn test_long_line_truncated_at_capacity() {
        let line = (0..150).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let argv = simple(&line);
        assert_eq!(argv.len(), MAX_ARGS - 1);
        assert_eq!(argv.last().unwrap(), "w98");
    }

    #[test]
    fn test_pipe_after_capacity_is_never_seen() {
        let mut words: Vec<String> = (0..ArgVector::CAPACITY).map(|i| format!("w{}", i)).collect();
        words.push(PIPE.to_string());
        words.push("cat".to_string());
        let argv = simple(&words.join(" "));
        assert_eq!(argv.len(), ArgVector::CAPACITY);
        assert!(!argv.iter().any(|w| w == PIPE));
    }

    #[test]
    fn test_consumer_truncated_at_capacity() {
        let tail = (0..150).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let (_, b) = pipeline(&format!("echo | {}", tail));
        assert_eq!(b.len(), ArgVector::CAPACITY);
    }

    #[test]
    fn test_unmatched_glob_in_both_stages_is_literal() {
        let (a, b) = pipeline("ls *.nonexistent-ext-zzz | grep *.nonexistent-ext-yyy");
        assert_eq!(a, vec!["ls", "*.nonexistent-ext-zzz"]);
        assert_eq!(b, vec!["grep", "*.nonexistent-ext-yyy"]);
    }

    #[test]
    fn test_glob_replaced_by_matches() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["one.log", "two.log"] {
            std::fs::File::create(dir.path().join(name)).unwrap();
        }
        let base = dir.path().to_string_lossy().into_owned();
        let argv = simple(&format!("rm -f {}/*.log end", base));
        assert_eq!(
            argv,
            vec![
                "rm".to_string(),
                "-f".to_string(),
                format!("{}/one.log", base),
                format!("{}/two.log", base),
                "end".to_string(),
            ]
        );
    }

    #[test]
    fn test_glob_expanded_in_second_stage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("only.rs")).unwrap();
        let base = dir.path().to_string_lossy().into_owned();
        let (_, b) = pipeline(&format!("ls | grep {}/*.rs", base));
        assert_eq!(b, vec!["grep".to_string(), format!("{}/only.rs", base)]);
    }

    #[test]
    fn test_clamp_line() {
        assert_eq!(clamp_line("pwd\n"), "pwd");
        assert_eq!(clamp_line("pwd"), "pwd");

        let long = "a".repeat(MAX_LINE_LEN + 50);
        assert_eq!(clamp_line(&long).len(), MAX_LINE_LEN - 1);

        // 2-byte characters straddling the cut point back off to a boundary.
        let wide = "é".repeat(MAX_LINE_LEN);
        let clamped = clamp_line(&wide);
        assert!(clamped.len() < MAX_LINE_LEN);
        assert!(clamped.chars().all(|c| c == 'é'));
    }
}
