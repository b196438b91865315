//! Join-key derivation for matching rows across the two source tables.
//!
//! Player listings exported from different sheets disagree on punctuation,
//! suffixes, and casing ("P.J. Tucker" vs "PJ Tucker Jr."). The key flattens
//! a row's name and team into a canonical `name|team` string; two rows refer
//! to the same entity iff their keys are equal. Both tables must pass through
//! this module, otherwise merges silently fail to match.

use std::sync::OnceLock;

use regex::Regex;

pub const KEY_SEPARATOR: &str = "|";

static NON_NAME_CHARS: OnceLock<Regex> = OnceLock::new();

fn non_name_chars() -> &'static Regex {
    NON_NAME_CHARS.get_or_init(|| Regex::new(r"[^a-z ]+").expect("valid name character class"))
}

/// Canonical form of a raw name cell: lowercase, backtick smoothed to an
/// apostrophe, everything outside `[a-z ]` removed, surrounding whitespace
/// trimmed. Infallible and idempotent.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace('`', "'");
    non_name_chars()
        .replace_all(&lowered, "")
        .trim()
        .to_string()
}

/// Canonical form of a raw team cell: uppercased and trimmed.
pub fn normalize_team(raw: &str) -> String {
    raw.to_uppercase().trim().to_string()
}

/// Derives the join key for a name/team pair. Two empty inputs yield `"|"`.
pub fn join_key(raw_name: &str, raw_team: &str) -> String {
    format!(
        "{}{KEY_SEPARATOR}{}",
        normalize_name(raw_name),
        normalize_team(raw_team)
    )
}

/// Derives the join key from a row's positional cells; a missing cell is
/// treated as an empty string.
pub fn row_key(row: &[String], name_column: usize, team_column: usize) -> String {
    let name = row.get(name_column).map(|s| s.as_str()).unwrap_or("");
    let team = row.get(team_column).map(|s| s.as_str()).unwrap_or("");
    join_key(name, team)
}
