//! Badge image: a fixed SVG template filled with the badge text and the
//! employee's name, delivered as a base64 data URL.

use base64::Engine;

pub const DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// Characters per badge-text line inside the inner circle.
const LINE_CHARS: usize = 30;
const MAX_LINES: usize = 3;

pub fn render_badge_svg(badge_text: &str, employee_name: &str) -> String {
    let badge_lines = wrap_words(badge_text, LINE_CHARS, MAX_LINES)
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let dy = if i == 0 { "0" } else { "1.2em" };
            format!(r#"<tspan x="200" dy="{dy}">{}</tspan>"#, escape_xml(line))
        })
        .collect::<String>();

    let employee_name = escape_xml(employee_name.trim());

    format!(
        r##"<svg width="400" height="400" viewBox="0 0 400 400" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="badgeGradient" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" stop-color="#FF416C"/>
      <stop offset="100%" stop-color="#FF4B2B"/>
    </linearGradient>
    <filter id="shadow" x="-20%" y="-20%" width="140%" height="140%">
      <feDropShadow dx="0" dy="4" stdDeviation="8" flood-color="rgba(0,0,0,0.2)"/>
    </filter>
  </defs>
  <circle cx="200" cy="200" r="180" fill="url(#badgeGradient)" filter="url(#shadow)"/>
  <circle cx="200" cy="200" r="150" fill="rgba(255,255,255,0.1)" stroke="rgba(255,255,255,0.3)" stroke-width="2"/>
  <g font-family="Inter, sans-serif" fill="white" text-anchor="middle">
    <text x="200" y="115" font-size="24" font-weight="bold">BRANDING</text>
    <text x="200" y="140" font-size="24" font-weight="bold">PIONEERS</text>
    <text x="200" y="172" font-size="14">{badge_lines}</text>
    <text x="200" y="235" font-size="18" font-weight="600">{employee_name}</text>
    <text x="200" y="262" font-size="12" fill-opacity="0.9">Learning Champion</text>
  </g>
  <circle cx="180" cy="295" r="2" fill="white" opacity="0.6"/>
  <circle cx="200" cy="295" r="3" fill="white" opacity="0.8"/>
  <circle cx="220" cy="295" r="2" fill="white" opacity="0.6"/>
</svg>"##
    )
}

pub fn badge_data_url(badge_text: &str, employee_name: &str) -> String {
    let svg = render_badge_svg(badge_text, employee_name);
    format!(
        "{DATA_URL_PREFIX}{}",
        base64::engine::general_purpose::STANDARD.encode(svg.as_bytes())
    )
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if c.is_control() => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Greedy word wrap. Words longer than a line are hard-split; text beyond
/// `max_lines` is cut and the last line ends with an ellipsis.
fn wrap_words(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    let mut words: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(width.max(1)) {
            words.push(chunk.iter().collect());
        }
    }

    for word in words {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let kept: String = last.chars().take(width.saturating_sub(1)).collect();
            *last = format!("{}…", kept.trim_end());
        }
    }
    lines
}
