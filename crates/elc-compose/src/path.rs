//! Lexical path cleaning for path variables.
//!
//! Values are never made absolute nor checked against the filesystem.

use std::collections::BTreeSet;
use std::path::MAIN_SEPARATOR;

use crate::vars::VarMap;

const fn is_separator(c: char) -> bool {
    c == '/' || c == MAIN_SEPARATOR
}

/// Returns the shortest lexically equivalent form of `path`.
///
/// - repeated separators collapse into one,
/// - `.` components are dropped,
/// - `name/..` pairs are folded,
/// - leading `..` components of a relative path are kept,
/// - `..` directly under the root is dropped,
/// - an empty result becomes `.`.
///
/// Components are joined with the platform's native separator.
#[must_use]
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with(is_separator);
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(is_separator) {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    let _ = parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join(&MAIN_SEPARATOR.to_string());
    match (rooted, joined.is_empty()) {
        (true, _) => format!("{MAIN_SEPARATOR}{joined}"),
        (false, true) => ".".into(),
        (false, false) => joined,
    }
}

/// Rewrites every variable named in `path_vars` with [`clean_path`],
/// leaving its position unchanged.
pub fn normalize_path_vars(vars: &mut VarMap, path_vars: &BTreeSet<String>) {
    for name in path_vars {
        let cleaned = vars.get(name).map(clean_path);
        if let Some(cleaned) = cleaned {
            let _ = vars.replace(name, cleaned);
        }
    }
}
