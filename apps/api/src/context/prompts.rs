// Prompt templates for badge/post and recommendation generation.
// Placeholders are filled with `str::replace`; the marker lines must stay in
// sync with `llm_client::prompts` and the parsers.

use crate::context::builder::PromptContext;
use crate::llm_client::prompts::{BADGE_MARKER, PLAIN_TEXT_INSTRUCTION, POST_MARKER};
use crate::models::artifact::BadgeRequest;

/// How many recommendations the model is asked for.
pub const RECOMMENDATION_COUNT: usize = 6;

pub const BADGE_PROMPT_TEMPLATE: &str = r#"You are a copywriter for an internal learning programme. Celebrate an employee's completed learning.

Produce exactly two sections:

1. A badge line: short, celebratory, under 15 words. Mention what was learned and the difficulty.
2. A LinkedIn post of 150-200 words: proud and growth-oriented, a small storytelling element, a soft call to action, and 3-4 hashtags at the end (for example #LearningJourney #GrowthMindset).

FORMAT (exactly, each marker at the start of its own line):
{badge_marker} <badge line>
{post_marker} <post text>

EMPLOYEE:
Name: {employee_name}
Role: {position}, {department}

LEARNING:
What: {learning}
Difficulty: {difficulty}

RECENT LEARNING:
{milestones}

ACTIVE GOALS:
{goals}

{plain_text_instruction}"#;

pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"You are a learning advisor. Recommend {count} courses or resources for the employee below.
Mix free and paid options. Prefer resources that build on existing skills toward stated interests and goals.

EMPLOYEE:
Role: {position}, {department}
Existing skills: {skills}
Learning interests: {interests}
This month: {month_hours} hours logged ({month_progress}% of the monthly target)

ACTIVE GOALS:
{goals}

RECENT LEARNING:
{milestones}

WHAT PEERS ARE EXPLORING:
{peers}

FORMAT: a numbered list. Each entry uses exactly these labelled lines:
1. Title: <course title>
Platform: <provider>
Difficulty: beginner | intermediate | advanced
Hours: <estimated hours, a number>
Paid: yes | no
Price: <price, only when Paid is yes>
Tags: <comma-separated skills>
URL: <link>
Reason: <one sentence on why it fits this employee>
Relevance: <0.0 to 1.0>

{plain_text_instruction}"#;

const NONE_RECORDED: &str = "- none recorded";

pub fn render_badge_prompt(ctx: &PromptContext, request: &BadgeRequest) -> String {
    BADGE_PROMPT_TEMPLATE
        .replace("{badge_marker}", BADGE_MARKER)
        .replace("{post_marker}", POST_MARKER)
        .replace("{plain_text_instruction}", PLAIN_TEXT_INSTRUCTION)
        .replace("{milestones}", &render_milestones(ctx))
        .replace("{goals}", &render_goals(ctx))
        .replace("{position}", &ctx.position)
        .replace("{department}", &ctx.department)
        // Free-text request fields go last so braces inside them are never
        // mistaken for placeholders.
        .replace("{difficulty}", request.difficulty.trim())
        .replace("{learning}", request.learning.trim())
        .replace("{employee_name}", request.employee_name.trim())
}

pub fn render_recommendation_prompt(ctx: &PromptContext) -> String {
    RECOMMENDATION_PROMPT_TEMPLATE
        .replace("{count}", &RECOMMENDATION_COUNT.to_string())
        .replace("{plain_text_instruction}", PLAIN_TEXT_INSTRUCTION)
        .replace("{month_hours}", &format!("{:.1}", ctx.current_month.total_hours))
        .replace("{month_progress}", &format!("{:.0}", ctx.current_month.target_progress))
        .replace("{peers}", &render_peers(ctx))
        .replace("{milestones}", &render_milestones(ctx))
        .replace("{goals}", &render_goals(ctx))
        .replace("{skills}", &join_or_none(&ctx.skills))
        .replace("{interests}", &join_or_none(&ctx.interests))
        .replace("{position}", &ctx.position)
        .replace("{department}", &ctx.department)
}

fn join_or_none(labels: &[String]) -> String {
    if labels.is_empty() {
        "none listed".to_string()
    } else {
        labels.join(", ")
    }
}

fn render_milestones(ctx: &PromptContext) -> String {
    if ctx.recent_milestones.is_empty() {
        return NONE_RECORDED.to_string();
    }
    ctx.recent_milestones
        .iter()
        .map(|m| {
            let teach = if m.can_teach { ", can teach others" } else { "" };
            format!(
                "- {} ({}, {:.1}h, {}{})",
                m.learning, m.source, m.hours, m.month_key, teach
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_goals(ctx: &PromptContext) -> String {
    if ctx.active_goals.is_empty() {
        return NONE_RECORDED.to_string();
    }
    ctx.active_goals
        .iter()
        .map(|g| {
            let overdue = if g.overdue { ", overdue" } else { "" };
            format!("- {} (target {}{})", g.title, g.target_date, overdue)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_peers(ctx: &PromptContext) -> String {
    if ctx.peer_tags.is_empty() {
        return NONE_RECORDED.to_string();
    }
    ctx.peer_tags
        .iter()
        .map(|t| {
            let noun = if t.count == 1 { "peer" } else { "peers" };
            format!("- {} ({} {})", t.label, t.count, noun)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
