//! Pattern compilation for key invalidation.
//!
//! Patterns are globs by default (`*` and `?` wildcards, everything else
//! literal). A `re:` prefix opts into raw regex for upstream integrations
//! that already speak regex. Both compile to anchored regexes.

use regex::Regex;

use bindery_core::errors::{BinderyResult, CacheError};

/// Compile a glob or `re:`-prefixed regex pattern into an anchored regex.
pub fn compile_pattern(pattern: &str) -> BinderyResult<Regex> {
    let body = match pattern.strip_prefix("re:") {
        Some(raw) => raw.to_string(),
        None => glob_to_regex(pattern),
    };
    Regex::new(&format!("^(?:{body})$")).map_err(|e| {
        CacheError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() * 2);
    for c in glob.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c if "\\.+()[]{}^$|".contains(c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
