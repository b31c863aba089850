//! Recommendation-list parsing.
//!
//! The recommendation prompt asks for numbered entries, one labelled field per
//! line:
//!
//! ```text
//! 1. Title: Go Concurrency Patterns
//!    Platform: Udemy
//!    Difficulty: intermediate
//!    Hours: 4
//!    Paid: yes
//!    Price: $20
//!    Tags: go, concurrency
//!    URL: https://…
//!    Reason: matches your Go interest
//!    Relevance: 0.9
//! ```
//!
//! Labels are matched case- and whitespace-insensitively through an alias table.
//! Blocks missing a required field are rejected one by one; the batch survives.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::models::profile::LabelSet;
use crate::models::recommendation::{Difficulty, RecommendationItem};
use crate::parsing::{
    clean_value, strip_line_decoration, strip_number_prefix, DegradeReason, ParseOutcome,
};

/// Relevance assigned when the model gives none or an unreadable one.
pub const DEFAULT_RELEVANCE: f64 = 0.5;

/// Longest text before a `:` that is still treated as a field label.
const MAX_LABEL_CHARS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Platform,
    Difficulty,
    Hours,
    Paid,
    Price,
    Tags,
    Reason,
    Url,
    Relevance,
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "title" => Ok(Field::Title),
            "platform" => Ok(Field::Platform),
            "difficulty" => Ok(Field::Difficulty),
            "hours" => Ok(Field::Hours),
            "paid" => Ok(Field::Paid),
            "price" => Ok(Field::Price),
            "tags" => Ok(Field::Tags),
            "reason" => Ok(Field::Reason),
            "url" => Ok(Field::Url),
            "relevance" => Ok(Field::Relevance),
            other => Err(format!("unknown recommendation field '{other}'")),
        }
    }
}

const DEFAULT_ALIASES: &[(&str, Field)] = &[
    ("title", Field::Title),
    ("course", Field::Title),
    ("course title", Field::Title),
    ("course name", Field::Title),
    ("name", Field::Title),
    ("resource", Field::Title),
    ("platform", Field::Platform),
    ("provider", Field::Platform),
    ("source", Field::Platform),
    ("website", Field::Platform),
    ("difficulty", Field::Difficulty),
    ("difficulty level", Field::Difficulty),
    ("level", Field::Difficulty),
    ("hours", Field::Hours),
    ("estimated hours", Field::Hours),
    ("estimated time", Field::Hours),
    ("duration", Field::Hours),
    ("time commitment", Field::Hours),
    ("time", Field::Hours),
    ("paid", Field::Paid),
    ("paid/free", Field::Paid),
    ("free/paid", Field::Paid),
    ("paid or free", Field::Paid),
    ("free or paid", Field::Paid),
    ("pricing", Field::Paid),
    ("access", Field::Paid),
    ("type", Field::Paid),
    ("price", Field::Price),
    ("cost", Field::Price),
    ("tags", Field::Tags),
    ("skill tags", Field::Tags),
    ("skills", Field::Tags),
    ("skills covered", Field::Tags),
    ("topics", Field::Tags),
    ("reason", Field::Reason),
    ("why", Field::Reason),
    ("why it fits", Field::Reason),
    ("justification", Field::Reason),
    ("rationale", Field::Reason),
    ("url", Field::Url),
    ("link", Field::Url),
    ("course url", Field::Url),
    ("course link", Field::Url),
    ("relevance", Field::Relevance),
    ("relevance score", Field::Relevance),
    ("score", Field::Relevance),
];

/// Which labels map to which fields, and which fields a block must carry.
///
/// The model's output has no fixed schema, so both tables can be adjusted
/// without touching the parser.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub required: Vec<Field>,
    /// A block marked paid must also carry a price.
    pub require_price_when_paid: bool,
    aliases: HashMap<String, Field>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            required: vec![Field::Title, Field::Url],
            require_price_when_paid: true,
            aliases: DEFAULT_ALIASES
                .iter()
                .map(|(alias, field)| (alias.to_string(), *field))
                .collect(),
        }
    }
}

impl FieldSchema {
    pub fn with_required(mut self, required: Vec<Field>) -> Self {
        self.required = required;
        self
    }

    pub fn with_alias(mut self, alias: &str, field: Field) -> Self {
        self.aliases.insert(normalize_label(alias), field);
        self
    }

    pub fn with_price_required_when_paid(mut self, required: bool) -> Self {
        self.require_price_when_paid = required;
        self
    }

    fn field_for(&self, label: &str) -> Option<Field> {
        self.aliases.get(label).copied()
    }
}

/// A candidate block dropped for missing required fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedBlock {
    /// Zero-based position of the block in the response.
    pub index: usize,
    pub missing: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationBatch {
    pub items: Vec<RecommendationItem>,
    pub rejected: Vec<RejectedBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockCue {
    Numbered,
    TitleLabel,
    Bulleted,
    Unstructured,
}

impl BlockCue {
    /// The first line of the block is the entry itself, so an unlabelled
    /// first line is its title.
    fn opens_entry(self) -> bool {
        matches!(self, BlockCue::Numbered | BlockCue::Bulleted)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationParser {
    schema: FieldSchema,
}

impl RecommendationParser {
    pub fn new(schema: FieldSchema) -> Self {
        Self { schema }
    }

    pub fn parse(&self, raw: &str) -> ParseOutcome<RecommendationBatch> {
        parse_recommendations(raw, &self.schema)
    }
}

pub fn parse_recommendations(raw: &str, schema: &FieldSchema) -> ParseOutcome<RecommendationBatch> {
    let (blocks, cue) = schema.split_blocks(raw);

    let mut items = Vec::new();
    let mut rejected = Vec::new();
    for (index, block) in blocks.iter().enumerate() {
        let fields = schema.extract_fields(block, cue);
        match schema.build_item(&fields) {
            Ok(item) => items.push(item),
            Err(missing) => rejected.push(RejectedBlock { index, missing }),
        }
    }

    let reason = if items.is_empty() {
        Some(DegradeReason::NoItems {
            rejected: rejected.len(),
        })
    } else if cue == BlockCue::Unstructured {
        Some(DegradeReason::NoBlockStructure)
    } else {
        None
    };

    let batch = RecommendationBatch { items, rejected };
    match reason {
        None => ParseOutcome::Ok(batch),
        Some(reason) => ParseOutcome::Degraded(batch, reason),
    }
}

impl FieldSchema {
    /// Splits on numbered entries, else on title labels, else on top-level
    /// bullets, else returns the whole text as one block. Lines before the
    /// first cue are preamble.
    fn split_blocks<'a>(&self, raw: &'a str) -> (Vec<Vec<&'a str>>, BlockCue) {
        let lines: Vec<&str> = raw.lines().collect();

        let numbered: Vec<bool> = lines
            .iter()
            .map(|line| strip_number_prefix(line).is_some())
            .collect();
        // When most numbered lines carry a non-title field ("2. Platform: …"),
        // the model numbered fields, not entries.
        let (field_numbered, entry_numbered) = lines
            .iter()
            .zip(&numbered)
            .filter(|(_, is_numbered)| **is_numbered)
            .fold((0usize, 0usize), |(fields, entries), (line, _)| {
                match self.label_of(strip_number_prefix(line).unwrap_or(line)) {
                    Some((field, _)) if field != Field::Title => (fields + 1, entries),
                    _ => (fields, entries + 1),
                }
            });
        let numbers_mark_entries = entry_numbered > field_numbered;

        let (starts, cue): (Vec<bool>, BlockCue) = if numbers_mark_entries {
            (numbered, BlockCue::Numbered)
        } else {
            let title_lines: Vec<bool> = lines
                .iter()
                .map(|line| matches!(self.label_of(line), Some((Field::Title, _))))
                .collect();
            let bullets = self.entry_bullets(&lines);
            if title_lines.iter().any(|t| *t) {
                (title_lines, BlockCue::TitleLabel)
            } else if bullets.iter().any(|b| *b) {
                (bullets, BlockCue::Bulleted)
            } else {
                return (vec![lines], BlockCue::Unstructured);
            }
        };

        let mut blocks: Vec<Vec<&str>> = Vec::new();
        for (line, is_start) in lines.iter().zip(starts) {
            if is_start {
                blocks.push(vec![line]);
            } else if let Some(current) = blocks.last_mut() {
                current.push(line);
            }
        }
        (blocks, cue)
    }

    /// Least-indented bullet lines, minus those carrying a non-title field
    /// (`- Platform: Udemy` belongs to the entry above it).
    fn entry_bullets(&self, lines: &[&str]) -> Vec<bool> {
        let top = lines.iter().filter_map(|line| bullet_indent(line)).min();
        lines
            .iter()
            .map(|line| {
                top.is_some()
                    && bullet_indent(line) == top
                    && !matches!(self.label_of(line), Some((field, _)) if field != Field::Title)
            })
            .collect()
    }

    /// Splits `Label: value` and maps the label through the alias table.
    fn label_of<'a>(&self, line: &'a str) -> Option<(Field, &'a str)> {
        let (label, value) = split_label(line)?;
        self.field_for(&label).map(|field| (field, value))
    }

    fn extract_fields(&self, block: &[&str], cue: BlockCue) -> HashMap<Field, String> {
        let mut fields: HashMap<Field, String> = HashMap::new();
        let mut last_field: Option<Field> = None;

        for (position, line) in block.iter().enumerate() {
            let content = if cue == BlockCue::Numbered && position == 0 {
                strip_number_prefix(line).unwrap_or(line)
            } else {
                line
            };

            if content.trim().is_empty() {
                last_field = None;
                continue;
            }

            if let Some((field, value)) = self.label_of(content) {
                let value = value.trim();
                fields
                    .entry(field)
                    .or_insert_with(|| value.to_string());
                last_field = Some(field);
                continue;
            }

            if cue.opens_entry() && position == 0 {
                // "1. **Go Concurrency Patterns**" or "- **Go Concurrency Patterns**"
                let title = strip_line_decoration(content).trim();
                fields.entry(Field::Title).or_insert_with(|| title.to_string());
                last_field = Some(Field::Title);
                continue;
            }

            let text = strip_line_decoration(content).trim();
            match last_field {
                Some(Field::Reason) => append(&mut fields, Field::Reason, text, " "),
                Some(Field::Tags) => append(&mut fields, Field::Tags, text, ","),
                _ if looks_like_url(text) && !fields.contains_key(&Field::Url) => {
                    fields.insert(Field::Url, text.to_string());
                }
                _ => last_field = None,
            }
        }

        fields
    }

    fn build_item(&self, fields: &HashMap<Field, String>) -> Result<RecommendationItem, Vec<Field>> {
        let text = |field: Field| fields.get(&field).map(|v| clean_value(v)).unwrap_or_default();

        let title = text(Field::Title);
        let url = fields.get(&Field::Url).map(|v| extract_url(v)).unwrap_or_default();
        let paid_marker = fields.get(&Field::Paid).and_then(|v| classify_paid(v));
        let paid = paid_marker.unwrap_or(false);
        let price = if paid {
            Some(text(Field::Price)).filter(|p| !p.is_empty())
        } else {
            None
        };
        let hours = fields.get(&Field::Hours).and_then(|v| first_number(v));
        let relevance = fields.get(&Field::Relevance).and_then(|v| parse_relevance(v));
        let tags = fields.get(&Field::Tags).map(|v| split_tags(v)).unwrap_or_default();
        let reason = text(Field::Reason);
        let platform = text(Field::Platform);

        let present = |field: Field| match field {
            Field::Title => !title.is_empty(),
            Field::Url => !url.is_empty(),
            Field::Platform => !platform.is_empty(),
            Field::Reason => !reason.is_empty(),
            Field::Tags => !tags.is_empty(),
            Field::Price => price.is_some(),
            Field::Hours => hours.is_some(),
            Field::Relevance => relevance.is_some(),
            Field::Paid => paid_marker.is_some(),
            Field::Difficulty => fields.contains_key(&Field::Difficulty),
        };

        let mut missing: Vec<Field> = self
            .required
            .iter()
            .copied()
            .filter(|field| !present(*field))
            .collect();
        if self.require_price_when_paid
            && paid
            && price.is_none()
            && !missing.contains(&Field::Price)
        {
            missing.push(Field::Price);
        }
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(RecommendationItem {
            title,
            platform,
            difficulty: fields
                .get(&Field::Difficulty)
                .map(|v| parse_difficulty(v))
                .unwrap_or_default(),
            estimated_hours: hours.map(|h| h.max(0.0)).unwrap_or(0.0),
            paid,
            price,
            skill_tags: tags,
            reason,
            url,
            relevance_score: relevance.unwrap_or(DEFAULT_RELEVANCE),
        })
    }
}

/// Indentation of a `-`, `*` or `•` bullet line; `None` for any other line.
fn bullet_indent(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some('-' | '*' | '•'), Some(c)) if c.is_whitespace() => Some(line.len() - trimmed.len()),
        _ => None,
    }
}

fn append(fields: &mut HashMap<Field, String>, field: Field, text: &str, separator: &str) {
    if text.is_empty() {
        return;
    }
    let entry = fields.entry(field).or_default();
    if !entry.is_empty() {
        entry.push_str(separator);
    }
    entry.push_str(text);
}

/// `Label: value` → (normalized label, value). Lines whose text before the
/// first colon is too long to be a label are prose, not fields.
fn split_label(line: &str) -> Option<(String, &str)> {
    let content = strip_line_decoration(line);
    let (label, value) = content.split_once(':')?;
    let label = normalize_label(label);
    if label.is_empty() || label.chars().count() > MAX_LABEL_CHARS {
        return None;
    }
    Some((label, value))
}

fn normalize_label(label: &str) -> String {
    label
        .trim_matches(|c: char| matches!(c, '*' | '_' | '`') || c.is_whitespace())
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Explicit paid/free marker. Only this decides the paid flag; a price
/// mentioned elsewhere never does.
fn classify_paid(value: &str) -> Option<bool> {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .find_map(|word| match word.to_lowercase().as_str() {
            "yes" | "y" | "true" | "paid" | "premium" | "subscription" => Some(true),
            "no" | "n" | "false" | "free" | "unpaid" => Some(false),
            _ => None,
        })
}

fn parse_difficulty(value: &str) -> Difficulty {
    let value = clean_value(value).to_lowercase();
    let first = value.split_whitespace().next().unwrap_or("");
    if ["beg", "intro", "basic", "novice", "easy"]
        .iter()
        .any(|p| first.starts_with(p))
    {
        Difficulty::Beginner
    } else if ["adv", "expert", "hard"].iter().any(|p| first.starts_with(p)) {
        Difficulty::Advanced
    } else {
        Difficulty::Intermediate
    }
}

/// First decimal number in `text`, including a directly preceding minus sign.
fn first_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let negative = text[..start].ends_with('-')
        && text[..start.saturating_sub(1)]
            .chars()
            .last()
            .map_or(true, |c| !c.is_ascii_digit());
    let mut end = start;
    let mut seen_dot = false;
    let bytes = text.as_bytes();
    while end < bytes.len() {
        let b = bytes[end];
        if b.is_ascii_digit() {
            end += 1;
        } else if b == b'.' && !seen_dot && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
            seen_dot = true;
            end += 1;
        } else {
            break;
        }
    }
    let number: f64 = text[start..end].parse().ok()?;
    if !number.is_finite() {
        return None;
    }
    Some(if negative { -number } else { number })
}

/// Relevance into 0.0 – 1.0. Accepts `0.8`, `80%` and `8/10`; any other
/// number is clamped as given, so `1.5` is full relevance.
fn parse_relevance(value: &str) -> Option<f64> {
    let value = clean_value(value);
    let number = first_number(&value)?;

    let score = if let Some((_, denominator)) = value.split_once('/') {
        match first_number(denominator) {
            Some(d) if d > 0.0 => number / d,
            _ => number,
        }
    } else if value.contains('%') {
        number / 100.0
    } else {
        number
    };

    Some(score.clamp(0.0, 1.0))
}

fn split_tags(value: &str) -> Vec<String> {
    value
        .split(|c: char| matches!(c, ',' | ';' | '|'))
        .map(|tag| clean_value(tag.trim().trim_start_matches('#')))
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .iter()
        .map(String::as_str)
        .collect::<LabelSet>()
        .into()
}

fn looks_like_url(text: &str) -> bool {
    let text = text.trim_start_matches(['<', '(', '[']);
    text.starts_with("http://") || text.starts_with("https://")
}

/// Pulls the address out of `[label](url)`, `<url>` or `see https://…` forms.
fn extract_url(value: &str) -> String {
    let value = value.trim();
    if let Some(start) = value.find("](") {
        let rest = &value[start + 2..];
        if let Some(end) = rest.find(')') {
            return rest[..end].trim().to_string();
        }
    }
    if let Some(token) = value
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| matches!(c, '<' | '>' | '(' | ')' | '*' | '`' | '"')))
        .find(|t| t.starts_with("http://") || t.starts_with("https://"))
    {
        return token.trim_end_matches(['.', ',']).to_string();
    }
    clean_value(value.trim_matches(|c: char| c == '<' || c == '>'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::ranker::rank_recommendations;

    fn parse(raw: &str) -> ParseOutcome<RecommendationBatch> {
        parse_recommendations(raw, &FieldSchema::default())
    }

    const GO_BLOCK: &str = "1. Title: Go Concurrency Patterns\nPlatform: Udemy\nDifficulty: intermediate\nHours: 4\nPaid: yes\nPrice: $20\nURL: http://x\nReason: matches your Go interest\n";

    #[test]
    fn test_single_numbered_block() {
        let parsed = parse(GO_BLOCK);
        assert!(!parsed.is_degraded());
        let batch = parsed.into_value();
        assert_eq!(batch.items.len(), 1);
        assert!(batch.rejected.is_empty());

        let item = &batch.items[0];
        assert_eq!(item.title, "Go Concurrency Patterns");
        assert_eq!(item.platform, "Udemy");
        assert_eq!(item.difficulty, Difficulty::Intermediate);
        assert_eq!(item.estimated_hours, 4.0);
        assert!(item.paid);
        assert_eq!(item.price.as_deref(), Some("$20"));
        assert_eq!(item.url, "http://x");
        assert_eq!(item.reason, "matches your Go interest");
        assert_eq!(item.relevance_score, DEFAULT_RELEVANCE);
    }

    #[test]
    fn test_multiple_markdown_blocks_with_preamble() {
        let raw = "Here are your picks:\n\n\
            1. **Title:** Rust for Rustaceans\n\
            - **Platform:** No Starch Press\n\
            - **Difficulty:** Advanced\n\
            - **Estimated Hours:** 20\n\
            - **Paid:** Paid\n\
            - **Price:** $39.95\n\
            - **Tags:** Rust, #ownership, rust\n\
            - **URL:** [Book](https://nostarch.com/rust-rustaceans)\n\
            - **Reason:** Deepens your systems skills.\n\
            - **Relevance:** 92%\n\n\
            2. **Title:** Intro to SQL\n\
            - **Platform:** Khan Academy\n\
            - **Difficulty:** Beginner\n\
            - **Hours:** 6-8\n\
            - **Paid:** Free\n\
            - **URL:** <https://www.khanacademy.org/computing/sql>\n\
            - **Reason:** Your peers are exploring data.\n\
            - **Relevance:** 0.7\n";
        let parsed = parse(raw);
        assert!(!parsed.is_degraded());
        let batch = parsed.into_value();
        assert_eq!(batch.items.len(), 2);

        let rust = &batch.items[0];
        assert_eq!(rust.title, "Rust for Rustaceans");
        assert_eq!(rust.difficulty, Difficulty::Advanced);
        assert_eq!(rust.estimated_hours, 20.0);
        assert_eq!(rust.price.as_deref(), Some("$39.95"));
        assert_eq!(rust.skill_tags, vec!["Rust", "ownership"]);
        assert_eq!(rust.url, "https://nostarch.com/rust-rustaceans");
        assert!((rust.relevance_score - 0.92).abs() < 1e-9);

        let sql = &batch.items[1];
        assert!(!sql.paid);
        assert_eq!(sql.price, None);
        assert_eq!(sql.estimated_hours, 6.0);
        assert_eq!(sql.difficulty, Difficulty::Beginner);
        assert_eq!(sql.url, "https://www.khanacademy.org/computing/sql");
        assert!((sql.relevance_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_explicit_free_marker_beats_stray_price() {
        let raw = "1. Title: Machine Learning\nPlatform: Coursera\nPaid: Free\nDescription: usually $49 for the certificate\nPrice: $49\nURL: https://coursera.org/ml\n";
        let item = &parse(raw).into_value().items[0];
        assert!(!item.paid);
        assert_eq!(item.price, None);
    }

    #[test]
    fn test_zero_price_with_paid_marker_stays_paid() {
        let raw = "1. Title: Upsell Course\nPlatform: Skillshare\nPaid: yes\nPrice: $0\nURL: https://skillshare.com/x\n";
        let item = &parse(raw).into_value().items[0];
        assert!(item.paid);
        assert_eq!(item.price.as_deref(), Some("$0"));
    }

    #[test]
    fn test_missing_paid_marker_defaults_to_unpaid_even_with_price() {
        let raw = "1. Title: Docker Deep Dive\nPrice: $15\nURL: https://example.com/docker\n";
        let item = &parse(raw).into_value().items[0];
        assert!(!item.paid);
        assert_eq!(item.price, None);
    }

    #[test]
    fn test_blocks_missing_required_fields_are_rejected_individually() {
        let raw = "1. Title: Has URL\nURL: https://a.example\n\n\
                   2. Title: No URL here\nPlatform: Udemy\n\n\
                   3. Platform: Nowhere\n\n\
                   4. Title: Paid without price\nPaid: yes\nURL: https://b.example\n\n\
                   5. Title: Also fine\nLink: https://c.example\n";
        let parsed = parse(raw);
        assert!(!parsed.is_degraded());
        let batch = parsed.into_value();

        let titles: Vec<&str> = batch.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Has URL", "Also fine"]);
        assert_eq!(
            batch.rejected,
            vec![
                RejectedBlock { index: 1, missing: vec![Field::Url] },
                RejectedBlock { index: 2, missing: vec![Field::Title, Field::Url] },
                RejectedBlock { index: 3, missing: vec![Field::Price] },
            ]
        );
    }

    #[test]
    fn test_numbered_line_without_label_is_the_title() {
        let raw = "1. **Kubernetes the Hard Way**\n   Platform: GitHub\n   URL: https://github.com/kelseyhightower/kubernetes-the-hard-way\n";
        let item = &parse(raw).into_value().items[0];
        assert_eq!(item.title, "Kubernetes the Hard Way");
        assert_eq!(item.platform, "GitHub");
    }

    #[test]
    fn test_unnumbered_blocks_split_on_title_labels() {
        let raw = "- Title: A\n- URL: https://a.example\n- Title: B\n- URL: https://b.example\n";
        let parsed = parse(raw);
        assert!(!parsed.is_degraded());
        assert_eq!(parsed.value().items.len(), 2);
    }

    #[test]
    fn test_numbered_fields_fall_back_to_title_split() {
        let raw = "Title: A\n1. URL: https://a.example\n2. Platform: Udemy\nTitle: B\n1. URL: https://b.example\n";
        let batch = parse(raw).into_value();
        let titles: Vec<&str> = batch.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(batch.items[0].platform, "Udemy");
    }

    #[test]
    fn test_unstructured_text_is_degraded() {
        let parsed = parse("I recommend learning more about Rust.");
        assert_eq!(
            parsed.degrade_reason(),
            Some(&DegradeReason::NoItems { rejected: 1 })
        );
        assert!(parsed.value().items.is_empty());

        let single = "Course: Lone Entry\nLink: https://lone.example";
        let parsed = parse(single);
        // A title label is a structural cue on its own.
        assert!(!parsed.is_degraded());

        let no_cue = "Platform: Udemy\nLink: https://lone.example";
        let schema = FieldSchema::default().with_required(vec![Field::Url]);
        let parsed = RecommendationParser::new(schema).parse(no_cue);
        assert_eq!(parsed.degrade_reason(), Some(&DegradeReason::NoBlockStructure));
        assert_eq!(parsed.value().items.len(), 1);
    }

    #[test]
    fn test_empty_response_is_degraded_with_no_items() {
        let parsed = parse("");
        assert_eq!(
            parsed.degrade_reason(),
            Some(&DegradeReason::NoItems { rejected: 1 })
        );
    }

    #[test]
    fn test_numeric_fields_are_clamped_or_defaulted() {
        let raw = "1. Title: T\nURL: https://t.example\nHours: -3\nRelevance: 140%\n\n\
                   2. Title: U\nURL: https://u.example\nHours: a few\nRelevance: very high\n\n\
                   3. Title: V\nURL: https://v.example\nRelevance: 8/10\n";
        let items = parse(raw).into_value().items;
        assert_eq!(items[0].estimated_hours, 0.0);
        assert_eq!(items[0].relevance_score, 1.0);
        assert_eq!(items[1].estimated_hours, 0.0);
        assert_eq!(items[1].relevance_score, DEFAULT_RELEVANCE);
        assert!((items[2].relevance_score - 0.8).abs() < 1e-9);
        for item in &items {
            assert!((0.0..=1.0).contains(&item.relevance_score));
            assert!(item.estimated_hours >= 0.0);
        }
    }

    #[test]
    fn test_labels_tolerate_case_and_whitespace() {
        let raw = "1.   TITLE :  Spaced Out\n  platform   : Pluralsight\n  Estimated_Hours: 2.5\n  url:https://p.example\n";
        let item = &parse(raw).into_value().items[0];
        assert_eq!(item.title, "Spaced Out");
        assert_eq!(item.platform, "Pluralsight");
        assert_eq!(item.estimated_hours, 2.5);
        assert_eq!(item.url, "https://p.example");
    }

    #[test]
    fn test_reason_and_tags_continue_on_following_lines() {
        let raw = "1. Title: Long Reason\nURL: https://l.example\nReason: First part\nsecond part.\nTags:\n- rust\n- async\n";
        let item = &parse(raw).into_value().items[0];
        assert_eq!(item.reason, "First part second part.");
        assert_eq!(item.skill_tags, vec!["rust", "async"]);
    }

    #[test]
    fn test_custom_schema_can_require_platform_and_add_aliases() {
        let schema = FieldSchema::default()
            .with_required(vec![Field::Title, Field::Url, Field::Platform])
            .with_alias("Offered By", Field::Platform)
            .with_price_required_when_paid(false);
        let parser = RecommendationParser::new(schema);

        let raw = "1. Title: A\nOffered by: edX\nPaid: yes\nURL: https://a.example\n\n2. Title: B\nURL: https://b.example\n";
        let batch = parser.parse(raw).into_value();
        assert_eq!(batch.items.len(), 1);
        assert_eq!(batch.items[0].platform, "edX");
        assert!(batch.items[0].paid);
        assert_eq!(batch.items[0].price, None);
        assert_eq!(batch.rejected[0].missing, vec![Field::Platform]);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let raw = format!("{GO_BLOCK}\n2. Title: Second\nURL: https://s.example\nPaid: maybe\n");
        assert_eq!(parse(&raw), parse(&raw));
    }

    #[test]
    fn test_field_names_parse() {
        assert_eq!(" URL ".parse::<Field>(), Ok(Field::Url));
        assert_eq!("Relevance".parse::<Field>(), Ok(Field::Relevance));
        assert!("cost".parse::<Field>().is_err());
    }

    #[test]
    fn test_classify_paid_tokens() {
        assert_eq!(classify_paid("Yes"), Some(true));
        assert_eq!(classify_paid("Paid ($20)"), Some(true));
        assert_eq!(classify_paid("Free (audit) / $49 certificate"), Some(false));
        assert_eq!(classify_paid("No - it's free"), Some(false));
        assert_eq!(classify_paid("$20"), None);
    }

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("about 1.5 hours"), Some(1.5));
        assert_eq!(first_number("10-12"), Some(10.0));
        assert_eq!(first_number("-3"), Some(-3.0));
        assert_eq!(first_number("v2."), Some(2.0));
        assert_eq!(first_number("none"), None);
    }

    #[test]
    fn test_extract_url_forms() {
        assert_eq!(extract_url("[Docs](https://d.example/x)"), "https://d.example/x");
        assert_eq!(extract_url("<https://d.example>"), "https://d.example");
        assert_eq!(extract_url("see https://d.example/y."), "https://d.example/y");
        assert_eq!(extract_url("http://x"), "http://x");
    }

    #[test]
    fn test_out_of_range_relevance_is_clamped_not_scaled() {
        let raw = "1. Title: Low\nURL: https://low.example\nRelevance: 0.3\n\n\
                   2. Title: High\nURL: https://high.example\nRelevance: 1.5\n\n\
                   3. Title: Whole\nURL: https://whole.example\nRelevance: 80\n";
        let items = parse(raw).into_value().items;
        assert_eq!(items[1].relevance_score, 1.0);
        assert_eq!(items[2].relevance_score, 1.0);

        let ranked = rank_recommendations(items);
        let titles: Vec<&str> = ranked.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["High", "Whole", "Low"]);
    }

    #[test]
    fn test_bulleted_entries_without_title_labels() {
        let raw = "Here are two picks:\n\
                   - **Go Concurrency Patterns**\n\
                   \x20 Platform: Udemy\n\
                   \x20 URL: https://udemy.com/go-concurrency\n\
                   - **Effective Go**\n\
                   \x20 - Platform: go.dev\n\
                   \x20 - URL: https://go.dev/doc/effective_go\n";
        let parsed = parse(raw);
        assert!(!parsed.is_degraded());
        let batch = parsed.into_value();
        assert!(batch.rejected.is_empty());

        let titles: Vec<&str> = batch.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Go Concurrency Patterns", "Effective Go"]);
        assert_eq!(batch.items[0].platform, "Udemy");
        assert_eq!(batch.items[1].url, "https://go.dev/doc/effective_go");
    }

    #[test]
    fn test_field_only_bullets_do_not_open_entries() {
        let schema = FieldSchema::default().with_required(vec![Field::Url]);
        let parsed = parse_recommendations("- Platform: Udemy\n- URL: https://u.example\n", &schema);
        assert_eq!(parsed.degrade_reason(), Some(&DegradeReason::NoBlockStructure));
        assert_eq!(parsed.value().items.len(), 1);
    }

    #[test]
    fn test_bullet_indent() {
        assert_eq!(bullet_indent("- Go"), Some(0));
        assert_eq!(bullet_indent("   * Go"), Some(3));
        assert_eq!(bullet_indent("• Go"), Some(0));
        assert_eq!(bullet_indent("**Go**"), None);
        assert_eq!(bullet_indent("---"), None);
    }
}
