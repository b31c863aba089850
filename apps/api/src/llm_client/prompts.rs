// Shared prompt fragments and the section markers the parsers look for.
// Each feature that needs generation keeps its own templates next to it;
// this file holds only what both the prompts and the parsers must agree on.

/// Marker line that opens the badge section of a badge/post response.
pub const BADGE_MARKER: &str = "BADGE:";

/// Marker line that opens the social-post section of a badge/post response.
pub const POST_MARKER: &str = "LINKEDIN_POST:";

/// Appended to every prompt that relies on the marker protocol.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond in plain text only. Do NOT use markdown tables or code fences. \
    Do NOT add commentary before or after the requested output.";
