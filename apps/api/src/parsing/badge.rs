//! Badge/post parsing.
//!
//! Expected shape (requested by the badge prompt):
//!
//! ```text
//! BADGE: <short badge text>
//! LINKEDIN_POST: <post text, possibly many lines>
//! ```
//!
//! Markers are matched case-sensitively at the start of a line, after any
//! markdown emphasis or heading characters. Text may follow the marker on the
//! same line or start on the next one. A post marker that trails other text on
//! a line (`BADGE: X LINKEDIN_POST: Y`) still opens the post section.

use serde::Serialize;

use crate::llm_client::prompts::{BADGE_MARKER, POST_MARKER};
use crate::parsing::{clean_value, strip_line_decoration, DegradeReason, ParseOutcome};

/// Character budget for a badge text derived from the first line of a
/// response that ignored the markers.
pub const BADGE_FALLBACK_CHARS: usize = 60;

/// Used when the response has nothing usable at all.
pub const DEFAULT_BADGE_TEXT: &str = "Learning Champion";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeAndPost {
    pub badge_text: String,
    pub post_text: String,
}

/// Splits a badge/post response into its two sections.
///
/// Always returns non-empty `badge_text` and `post_text`.
pub fn parse_badge_and_post(raw: &str) -> ParseOutcome<BadgeAndPost> {
    if raw.trim().is_empty() {
        return ParseOutcome::Degraded(
            BadgeAndPost {
                badge_text: DEFAULT_BADGE_TEXT.to_string(),
                post_text: DEFAULT_BADGE_TEXT.to_string(),
            },
            DegradeReason::EmptyResponse,
        );
    }

    let lines = marker_lines(raw);
    let badge_at = find_marker(&lines, BADGE_MARKER);
    let post_at = find_marker(&lines, POST_MARKER);

    let (badge_at, post_at) = match (badge_at, post_at) {
        (Some(b), Some(p)) => (b, p),
        (None, _) => return fallback(&lines, BADGE_MARKER),
        (_, None) => return fallback(&lines, POST_MARKER),
    };

    let badge_body = section_body(&lines, badge_at, post_at.0);
    let post_body = section_body(&lines, post_at, badge_at.0);

    let mut badge_text = clean_value(&collapse_echoed_labels(&badge_body));
    let mut post_text = clean_post(&collapse_echoed_labels(&post_body));
    let mut reason = None;

    if badge_text.is_empty() {
        badge_text = derive_badge_text(&post_text);
        reason = Some(DegradeReason::EmptySection {
            marker: BADGE_MARKER,
        });
    }
    if post_text.is_empty() {
        post_text = badge_text.clone();
        if reason.is_none() {
            reason = Some(DegradeReason::EmptySection {
                marker: POST_MARKER,
            });
        }
    }

    let parsed = BadgeAndPost {
        badge_text,
        post_text,
    };
    match reason {
        None => ParseOutcome::Ok(parsed),
        Some(reason) => ParseOutcome::Degraded(parsed, reason),
    }
}

/// Lines of `raw`. When no line opens with the post marker, the first line
/// carrying it mid-line is split in two at the marker.
fn marker_lines(raw: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = raw.lines().collect();
    if find_marker(&lines, POST_MARKER).is_some() {
        return lines;
    }
    let split = lines.iter().copied().enumerate().find_map(|(index, line)| {
        line.find(POST_MARKER).map(|at| (index, line.split_at(at)))
    });
    if let Some((index, (head, tail))) = split {
        lines[index] = tail;
        lines.insert(index, head);
    }
    lines
}

/// Index of the first line carrying `marker`, with the text following it.
fn find_marker<'a>(lines: &[&'a str], marker: &str) -> Option<(usize, &'a str)> {
    lines.iter().enumerate().find_map(|(index, line)| {
        strip_line_decoration(line)
            .strip_prefix(marker)
            .map(|rest| (index, rest))
    })
}

/// Text from the marker to the other marker (when it comes later) or the end.
fn section_body(lines: &[&str], (start, inline): (usize, &str), other_start: usize) -> String {
    let end = if other_start > start {
        other_start
    } else {
        lines.len()
    };
    let mut body = String::from(inline);
    for line in &lines[start + 1..end] {
        body.push('\n');
        body.push_str(line);
    }
    body.trim().to_string()
}

/// Drops marker labels the model repeated at the start of a section body,
/// e.g. `BADGE: BADGE: Rust Ranger` or `LINKEDIN_POST: **LINKEDIN_POST:** …`.
fn collapse_echoed_labels(body: &str) -> String {
    let mut rest = body;
    loop {
        let trimmed = rest.trim_start_matches(|c: char| c == '*' || c == ':' || c.is_whitespace());
        match trimmed
            .strip_prefix(BADGE_MARKER)
            .or_else(|| trimmed.strip_prefix(POST_MARKER))
        {
            Some(after) => rest = after,
            None => return trimmed.to_string(),
        }
    }
}

/// Trims the post and drops a dangling closing `**` left over from `**LABEL: text**`.
fn clean_post(body: &str) -> String {
    let body = body.trim();
    if body.matches("**").count() % 2 == 1 {
        if let Some(stripped) = body.strip_suffix("**") {
            return stripped.trim_end().to_string();
        }
    }
    body.to_string()
}

/// First non-empty line of `text` with labels and decoration removed,
/// truncated to `BADGE_FALLBACK_CHARS`.
fn derive_badge_text(text: &str) -> String {
    text.lines()
        .map(|line| clean_value(&collapse_echoed_labels(strip_line_decoration(line))))
        .find(|line| !line.is_empty())
        .map(|line| truncate_chars(&line, BADGE_FALLBACK_CHARS))
        .unwrap_or_else(|| DEFAULT_BADGE_TEXT.to_string())
}

fn fallback(lines: &[&str], missing: &'static str) -> ParseOutcome<BadgeAndPost> {
    let post_text = lines
        .iter()
        .map(|line| strip_marker_label(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    let badge_text = derive_badge_text(&lines.join("\n"));
    let post_text = if post_text.is_empty() {
        badge_text.clone()
    } else {
        post_text
    };

    ParseOutcome::Degraded(
        BadgeAndPost {
            badge_text,
            post_text,
        },
        DegradeReason::MissingMarker { marker: missing },
    )
}

/// Removes a marker label from the start of a line, leaving other lines untouched.
fn strip_marker_label(line: &str) -> &str {
    let decorated = strip_line_decoration(line);
    decorated
        .strip_prefix(BADGE_MARKER)
        .or_else(|| decorated.strip_prefix(POST_MARKER))
        .map(|rest| rest.trim_start_matches(|c: char| c == '*' || c.is_whitespace()))
        .unwrap_or(line)
}

fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(budget.saturating_sub(1)).collect();
    truncated = truncated.trim_end().to_string();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_markers() {
        let raw = "BADGE: Priya conquered Advanced React Hooks | Hard\n\
                   LINKEDIN_POST: Proud moment at Branding Pioneers!\n\
                   Learning never stops.\n\n#LearningJourney #GrowthMindset";
        let parsed = parse_badge_and_post(raw);
        assert!(!parsed.is_degraded());
        let value = parsed.value();
        assert_eq!(value.badge_text, "Priya conquered Advanced React Hooks | Hard");
        assert!(value.post_text.starts_with("Proud moment"));
        assert!(value.post_text.ends_with("#GrowthMindset"));
        assert!(!value.post_text.contains(POST_MARKER));
    }

    #[test]
    fn test_markers_on_their_own_lines() {
        let raw = "BADGE:\nRust Ranger: Ownership Mastered\n\nLINKEDIN_POST:\nFirst line.\nSecond line.";
        let parsed = parse_badge_and_post(raw);
        assert_eq!(
            parsed,
            ParseOutcome::Ok(BadgeAndPost {
                badge_text: "Rust Ranger: Ownership Mastered".to_string(),
                post_text: "First line.\nSecond line.".to_string(),
            })
        );
    }

    #[test]
    fn test_markdown_wrapped_markers() {
        let raw = "**BADGE:** SQL Sleuth\n\n**LINKEDIN_POST:** Window functions finally clicked.";
        let parsed = parse_badge_and_post(raw).into_value();
        assert_eq!(parsed.badge_text, "SQL Sleuth");
        assert_eq!(parsed.post_text, "Window functions finally clicked.");
    }

    #[test]
    fn test_fully_bold_lines_lose_dangling_emphasis() {
        let raw = "**BADGE: SQL Sleuth**\n**LINKEDIN_POST: Window functions clicked.**";
        let parsed = parse_badge_and_post(raw).into_value();
        assert_eq!(parsed.badge_text, "SQL Sleuth");
        assert_eq!(parsed.post_text, "Window functions clicked.");
    }

    #[test]
    fn test_preamble_is_discarded() {
        let raw = "Sure! Here is your content:\n\nBADGE: Figma Fanatic\nLINKEDIN_POST: Auto-layout is magic.";
        let parsed = parse_badge_and_post(raw);
        assert!(!parsed.is_degraded());
        assert_eq!(parsed.value().badge_text, "Figma Fanatic");
    }

    #[test]
    fn test_echoed_label_is_collapsed() {
        let raw = "BADGE: BADGE: Kafka Captain\nLINKEDIN_POST: LINKEDIN_POST: Streams everywhere.";
        let parsed = parse_badge_and_post(raw).into_value();
        assert_eq!(parsed.badge_text, "Kafka Captain");
        assert_eq!(parsed.post_text, "Streams everywhere.");
    }

    #[test]
    fn test_reversed_marker_order() {
        let raw = "LINKEDIN_POST: Post body here.\nMore post.\nBADGE: Docker Diver";
        let parsed = parse_badge_and_post(raw).into_value();
        assert_eq!(parsed.badge_text, "Docker Diver");
        assert_eq!(parsed.post_text, "Post body here.\nMore post.");
    }

    #[test]
    fn test_missing_markers_still_yield_both_fields() {
        let raw = "Celebrating Maya for completing an intensive course on distributed tracing with OpenTelemetry!\n\
                   It was a tough journey but worth it.";
        let parsed = parse_badge_and_post(raw);
        assert_eq!(
            parsed.degrade_reason(),
            Some(&DegradeReason::MissingMarker {
                marker: BADGE_MARKER
            })
        );
        let value = parsed.value();
        assert!(!value.badge_text.is_empty());
        assert!(!value.post_text.is_empty());
        assert!(value.badge_text.chars().count() <= BADGE_FALLBACK_CHARS);
        assert!(value.badge_text.starts_with("Celebrating Maya"));
        assert_eq!(value.post_text, raw.trim());
    }

    #[test]
    fn test_missing_post_marker_falls_back() {
        let raw = "BADGE: Go Gopher\nJust finished the Go tour.";
        let parsed = parse_badge_and_post(raw);
        assert_eq!(
            parsed.degrade_reason(),
            Some(&DegradeReason::MissingMarker {
                marker: POST_MARKER
            })
        );
        let value = parsed.value();
        assert_eq!(value.badge_text, "Go Gopher");
        assert_eq!(value.post_text, "Go Gopher\nJust finished the Go tour.");
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        let raw = "badge: lower\nlinkedin_post: lower post";
        assert!(parse_badge_and_post(raw).is_degraded());
    }

    #[test]
    fn test_empty_response_uses_defaults() {
        let parsed = parse_badge_and_post("  \n\t ");
        assert_eq!(parsed.degrade_reason(), Some(&DegradeReason::EmptyResponse));
        assert_eq!(parsed.value().badge_text, DEFAULT_BADGE_TEXT);
        assert!(!parsed.value().post_text.is_empty());
    }

    #[test]
    fn test_empty_badge_section_is_derived_from_post() {
        let raw = "BADGE:\nLINKEDIN_POST: Wrapped up the Terraform associate prep.";
        let parsed = parse_badge_and_post(raw);
        assert_eq!(
            parsed.degrade_reason(),
            Some(&DegradeReason::EmptySection {
                marker: BADGE_MARKER
            })
        );
        assert_eq!(
            parsed.value().badge_text,
            "Wrapped up the Terraform associate prep."
        );
    }

    #[test]
    fn test_empty_post_section_reuses_badge() {
        let raw = "BADGE: Vim Virtuoso\nLINKEDIN_POST:";
        let parsed = parse_badge_and_post(raw);
        assert!(parsed.is_degraded());
        assert_eq!(parsed.value().post_text, "Vim Virtuoso");
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let inputs = [
            "BADGE: A\nLINKEDIN_POST: B",
            "no markers at all",
            "",
            "**BADGE:** X\n**LINKEDIN_POST:** Y\nZ",
        ];
        for raw in inputs {
            assert_eq!(parse_badge_and_post(raw), parse_badge_and_post(raw));
        }
    }

    #[test]
    fn test_truncate_chars_respects_budget() {
        let long = "x".repeat(100);
        let truncated = truncate_chars(&long, BADGE_FALLBACK_CHARS);
        assert_eq!(truncated.chars().count(), BADGE_FALLBACK_CHARS);
        assert!(truncated.ends_with('…'));
        assert_eq!(truncate_chars("short", BADGE_FALLBACK_CHARS), "short");
    }

    #[test]
    fn test_both_markers_on_one_line() {
        let raw = "BADGE: Rust Ranger LINKEDIN_POST: Proud to share my Rust journey!";
        let parsed = parse_badge_and_post(raw);
        assert_eq!(
            parsed,
            ParseOutcome::Ok(BadgeAndPost {
                badge_text: "Rust Ranger".to_string(),
                post_text: "Proud to share my Rust journey!".to_string(),
            })
        );
    }

    #[test]
    fn test_inline_post_marker_with_emphasis_and_continuation() {
        let raw = "**BADGE:** Helm Hero **LINKEDIN_POST:** Shipped my first chart.\nMore to come.";
        let value = parse_badge_and_post(raw).into_value();
        assert_eq!(value.badge_text, "Helm Hero");
        assert_eq!(value.post_text, "Shipped my first chart.\nMore to come.");
    }

    #[test]
    fn test_inline_post_marker_without_badge_marker_is_stripped_from_fallback() {
        let raw = "Congrats on Terraform! LINKEDIN_POST: Infrastructure as code, done.";
        let parsed = parse_badge_and_post(raw);
        assert_eq!(
            parsed.degrade_reason(),
            Some(&DegradeReason::MissingMarker {
                marker: BADGE_MARKER
            })
        );
        let value = parsed.value();
        assert!(!value.badge_text.contains(POST_MARKER));
        assert!(!value.post_text.contains(POST_MARKER));
    }
}
