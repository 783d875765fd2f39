use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::path::PathBuf;

use nix::libc;
use nix::unistd::User;
use tracing::debug;

use super::ast::ArgVector;

/// Character that marks a token for filesystem expansion.
pub const WILDCARD: char = '*';

pub fn is_pattern(token: &str) -> bool {
    token.contains(WILDCARD)
}

/// Expand `pattern` against the filesystem and append the matches to `argv`.
///
/// - Matches are appended in the host `glob(3)` order (sorted), each as its
///   own token, until `argv` is full; the remainder is dropped without
///   complaint.
/// - `*` never crosses `/` and never matches a leading dot. `**` is just two
///   `*`s.
/// - No matches (or a malformed pattern) → the original pattern is appended
///   unchanged, `~` included.
/// - A leading `~` or `~user` is replaced by the home directory first.
/// - File names that are not UTF-8 come through lossily.
pub fn expand_wildcard(pattern: &str, argv: &mut ArgVector) {
    let expanded = expand_tilde(pattern);
    let matches = host_glob(&expanded);

    if matches.is_empty() {
        argv.push(pattern.to_string());
        return;
    }

    let total = matches.len();
    let mut stored = 0;
    for path in matches {
        if !argv.push(path) {
            break;
        }
        stored += 1;
    }
    debug!(pattern, total, stored, "expanded glob");
}

/// Run `glob(3)` on `pattern`. Every failure, no match included, comes back
/// as an empty list.
fn host_glob(pattern: &str) -> Vec<String> {
    let Ok(c_pattern) = CString::new(pattern) else {
        debug!(pattern, "glob pattern contains a NUL byte, keeping it literally");
        return Vec::new();
    };
    match GlobBuf::run(&c_pattern) {
        Ok(buf) => buf.paths(),
        Err(libc::GLOB_NOMATCH) => Vec::new(),
        Err(code) => {
            debug!(pattern, code, "glob failed, keeping pattern literally");
            Vec::new()
        }
    }
}

/// A `glob_t` filled in by `glob(3)`, released with `globfree(3)` on drop.
struct GlobBuf(libc::glob_t);

impl GlobBuf {
    fn run(pattern: &CStr) -> Result<Self, libc::c_int> {
        // SAFETY: glob(3) expects a zeroed glob_t when GLOB_APPEND is unset.
        let mut buf = GlobBuf(unsafe { std::mem::zeroed() });
        // SAFETY: `pattern` is NUL-terminated and `buf.0` outlives the call.
        let code = unsafe { libc::glob(pattern.as_ptr(), 0, None, &mut buf.0) };
        if code == 0 { Ok(buf) } else { Err(code) }
    }

    fn paths(&self) -> Vec<String> {
        let count = self.0.gl_pathc as usize;
        (0..count)
            .map(|i| {
                // SAFETY: glob(3) stores `gl_pathc` valid C strings in
                // `gl_pathv`, which live until globfree.
                let path = unsafe { CStr::from_ptr(*self.0.gl_pathv.add(i)) };
                String::from_utf8_lossy(path.to_bytes()).into_owned()
            })
            .collect()
    }
}

impl Drop for GlobBuf {
    fn drop(&mut self) {
        // SAFETY: `self.0` was zeroed or filled by glob(3), both of which
        // globfree accepts.
        unsafe { libc::globfree(&mut self.0) }
    }
}

/// Replace a leading `~` (current user) or `~name` (that user) with the
/// matching home directory. Anything unresolvable is returned untouched.
fn expand_tilde(pattern: &str) -> Cow<'_, str> {
    let Some(rest) = pattern.strip_prefix('~') else {
        return Cow::Borrowed(pattern);
    };
    let (user, tail) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let home = if user.is_empty() {
        dirs::home_dir()
    } else if is_pattern(user) {
        None
    } else {
        home_of(user)
    };

    match home {
        Some(home) => Cow::Owned(format!("{}{}", home.to_string_lossy(), tail)),
        None => Cow::Borrowed(pattern),
    }
}

fn home_of(user: &str) -> Option<PathBuf> {
    match User::from_name(user) {
        Ok(Some(entry)) => Some(entry.dir),
        Ok(None) => None,
        Err(e) => {
            debug!(user, error = %e, "user lookup failed");
            None
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────
