//! Response parsing: turns free-form model output into typed artifacts.
//!
//! Parsers are pure functions of their input text. They never fail: when the
//! model drifts from the marker protocol they fall back to a best-effort value
//! and tag the result as `Degraded`, so callers can log quality drift without
//! losing the response.

pub mod badge;
pub mod recommendations;

use serde::Serialize;

/// Why a parser had to fall back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradeReason {
    /// The response was empty or whitespace only.
    EmptyResponse,
    /// A required section marker never appeared.
    MissingMarker { marker: &'static str },
    /// Marker present but the section under it was empty.
    EmptySection { marker: &'static str },
    /// No numbered entries or repeated title labels; the whole text was one block.
    NoBlockStructure,
    /// Every candidate block was rejected or none were found.
    NoItems { rejected: usize },
}

/// Tagged parser result. Both arms carry a usable value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    Ok(T),
    Degraded(T, DegradeReason),
}

impl<T> ParseOutcome<T> {
    #[cfg(test)]
    pub fn value(&self) -> &T {
        match self {
            ParseOutcome::Ok(value) | ParseOutcome::Degraded(value, _) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            ParseOutcome::Ok(value) | ParseOutcome::Degraded(value, _) => value,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ParseOutcome::Degraded(..))
    }

    pub fn degrade_reason(&self) -> Option<&DegradeReason> {
        match self {
            ParseOutcome::Ok(_) => None,
            ParseOutcome::Degraded(_, reason) => Some(reason),
        }
    }
}

/// Strips list numbering, bullets and markdown emphasis/heading characters
/// from the start of a line.
pub(crate) fn strip_line_decoration(line: &str) -> &str {
    let line = line.trim_start();
    let line = strip_number_prefix(line).unwrap_or(line);
    line.trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '#' | '>' | '_') || c.is_whitespace())
}

/// Returns the remainder of `line` after a list number such as `1.`, `2)` or `#3`,
/// or `None` when the line does not start with one.
pub(crate) fn strip_number_prefix(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let after_hash = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let after_emphasis = after_hash.trim_start_matches('*');
    let digits = after_emphasis
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 || digits > 3 {
        return None;
    }
    let rest = &after_emphasis[digits..];
    let rest = rest
        .strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .or_else(|| {
            // `#3 Title` style numbering has no punctuation after the digits.
            (after_hash.len() != trimmed.len()).then_some(rest)
        })?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) && !rest.starts_with('*') {
        // "1.5 hours" is not a list number.
        return None;
    }
    Some(rest.trim_start_matches('*').trim_start())
}

/// Removes markdown emphasis and surrounding quotes from a field value.
pub(crate) fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c: char| matches!(c, '*' | '_' | '`'))
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\u{201c}' | '\u{201d}'))
        .trim()
        .to_string()
}
