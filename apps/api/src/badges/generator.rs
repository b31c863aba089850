use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::badges::render::badge_data_url;
use crate::context::prompts::render_badge_prompt;
use crate::context::PromptContext;
use crate::errors::AppError;
use crate::llm_client::{GenerationMode, TextGenerator};
use crate::models::artifact::{BadgeRequest, GeneratedArtifact};
use crate::parsing::badge::parse_badge_and_post;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_LEARNING_CHARS: usize = 500;
pub const MAX_DIFFICULTY_CHARS: usize = 40;

/// Rejects blank or oversized request fields before any generation happens.
pub fn validate_request(request: &BadgeRequest) -> Result<(), AppError> {
    let fields = [
        ("employee_name", request.employee_name.as_str(), MAX_NAME_CHARS),
        ("learning", request.learning.as_str(), MAX_LEARNING_CHARS),
        ("difficulty", request.difficulty.as_str(), MAX_DIFFICULTY_CHARS),
    ];
    for (name, value, max) in fields {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Validation(format!("{name} cannot be empty")));
        }
        if value.chars().count() > max {
            return Err(AppError::Validation(format!(
                "{name} must be at most {max} characters"
            )));
        }
    }
    Ok(())
}

/// Generates one badge/post artifact. Persists nothing; a generation failure
/// leaves no trace beyond the returned error.
pub async fn generate_artifact(
    llm: &dyn TextGenerator,
    ctx: &PromptContext,
    request: &BadgeRequest,
    now: DateTime<Utc>,
) -> Result<GeneratedArtifact, AppError> {
    validate_request(request)?;

    let prompt = render_badge_prompt(ctx, request);
    debug!(user_id = %request.user_id, prompt_chars = prompt.len(), "Rendered badge prompt");

    let raw = llm.generate(&prompt, GenerationMode::BadgeAndPost).await?;

    let outcome = parse_badge_and_post(&raw);
    if let Some(reason) = outcome.degrade_reason() {
        warn!(user_id = %request.user_id, ?reason, "Badge response parsed in degraded mode");
    }
    let parse_degraded = outcome.is_degraded();
    let parsed = outcome.into_value();

    let employee_name = request.employee_name.trim().to_string();
    Ok(GeneratedArtifact {
        id: Uuid::new_v4(),
        user_id: request.user_id,
        badge_url: badge_data_url(&parsed.badge_text, &employee_name),
        employee_name,
        learning: request.learning.trim().to_string(),
        difficulty: request.difficulty.trim().to_string(),
        badge_text: parsed.badge_text,
        post_text: parsed.post_text,
        parse_degraded,
        created_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use chrono::TimeZone;

    use crate::badges::render::DATA_URL_PREFIX;
    use crate::context::builder::tests::profile;
    use crate::context::{ContextSources, PromptContextBuilder};
    use crate::llm_client::GenerationFailure;
    use crate::recommendations::refresh::tests::{CannedGenerator, FailingGenerator};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn ctx() -> PromptContext {
        let profile = profile();
        PromptContextBuilder::default().build(
            ContextSources {
                profile: &profile,
                goals: &[],
                milestones: &[],
                peer_interests: &[],
            },
            now(),
            6.0,
        )
    }

    fn request() -> BadgeRequest {
        BadgeRequest {
            user_id: Uuid::nil(),
            employee_name: "  Asha Rao ".to_string(),
            learning: "Async Rust".to_string(),
            difficulty: "Intermediate".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generates_artifact_from_marked_response() {
        let llm = CannedGenerator(
            "BADGE: Async Rust Trailblazer\nLINKEDIN_POST: Proud to share that I learned async Rust. #LearningJourney"
                .to_string(),
        );
        let artifact = generate_artifact(&llm, &ctx(), &request(), now()).await.unwrap();

        assert_eq!(artifact.badge_text, "Async Rust Trailblazer");
        assert!(artifact.post_text.starts_with("Proud to share"));
        assert_eq!(artifact.employee_name, "Asha Rao");
        assert!(!artifact.parse_degraded);
        assert_eq!(artifact.created_at, now());

        let encoded = artifact.badge_url.strip_prefix(DATA_URL_PREFIX).unwrap();
        let svg = String::from_utf8(
            base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .unwrap(),
        )
        .unwrap();
        assert!(svg.contains("Async Rust Trailblazer"));
        assert!(svg.contains("Asha Rao"));
    }

    #[tokio::test]
    async fn test_markerless_response_is_flagged_degraded() {
        let llm = CannedGenerator("Congratulations on learning async Rust!".to_string());
        let artifact = generate_artifact(&llm, &ctx(), &request(), now()).await.unwrap();

        assert!(artifact.parse_degraded);
        assert!(!artifact.badge_text.is_empty());
        assert!(!artifact.post_text.is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_is_surfaced() {
        let llm = FailingGenerator(GenerationFailure::Status(503));
        let err = generate_artifact(&llm, &ctx(), &request(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Generation(GenerationFailure::Status(503))));
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_the_model() {
        let llm = FailingGenerator(GenerationFailure::Timeout);
        let mut req = request();
        req.learning = "   ".to_string();
        let err = generate_artifact(&llm, &ctx(), &req, now()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validation_limits() {
        let mut req = request();
        assert!(validate_request(&req).is_ok());

        req.employee_name = "x".repeat(MAX_NAME_CHARS + 1);
        assert!(matches!(validate_request(&req), Err(AppError::Validation(_))));

        req.employee_name = "Asha".to_string();
        req.difficulty = String::new();
        assert!(matches!(validate_request(&req), Err(AppError::Validation(_))));
    }
}
