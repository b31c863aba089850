use anyhow::{Context, Result};

use crate::parsing::recommendations::{Field, FieldSchema};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    /// Overrides the generateContent endpoint (staging proxies, local stubs).
    pub gemini_api_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Per-attempt timeout for the text-generation call.
    pub llm_timeout_secs: u64,
    /// Upper bound on a whole HTTP request, including the generation retry.
    pub request_timeout_secs: u64,
    pub monthly_target_hours: f64,
    /// Fields a parsed recommendation block must carry to be kept.
    pub recommendation_required_fields: Vec<Field>,
    /// Extra label spellings on top of the built-in alias table.
    pub recommendation_field_aliases: Vec<(String, Field)>,
    pub require_price_when_paid: bool,
    /// How many other profiles feed the peer-interest roll-up.
    pub peer_sample_size: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_url: std::env::var("GEMINI_API_URL").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout_secs: parse_env_or("LLM_TIMEOUT_SECS", 20)?,
            request_timeout_secs: parse_env_or("REQUEST_TIMEOUT_SECS", 45)?,
            monthly_target_hours: parse_env_or("MONTHLY_TARGET_HOURS", 6.0)?,
            recommendation_required_fields: parse_field_list(
                &std::env::var("RECOMMENDATION_REQUIRED_FIELDS")
                    .unwrap_or_else(|_| "title,url".to_string()),
            )?,
            recommendation_field_aliases: parse_alias_list(
                &std::env::var("RECOMMENDATION_FIELD_ALIASES").unwrap_or_default(),
            )?,
            require_price_when_paid: parse_env_or("REQUIRE_PRICE_WHEN_PAID", true)?,
            peer_sample_size: parse_env_or("PEER_SAMPLE_SIZE", 500)?,
        })
    }

    pub fn field_schema(&self) -> FieldSchema {
        self.recommendation_field_aliases.iter().fold(
            FieldSchema::default()
                .with_required(self.recommendation_required_fields.clone())
                .with_price_required_when_paid(self.require_price_when_paid),
            |schema, (alias, field)| schema.with_alias(alias, *field),
        )
    }
}

fn parse_field_list(raw: &str) -> Result<Vec<Field>> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Field>()
                .map_err(anyhow::Error::msg)
                .context("RECOMMENDATION_REQUIRED_FIELDS must list known field names")
        })
        .collect()
}

/// `offered by=platform, instructor=platform`
fn parse_alias_list(raw: &str) -> Result<Vec<(String, Field)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (alias, field) = pair
                .split_once('=')
                .with_context(|| format!("RECOMMENDATION_FIELD_ALIASES entry '{pair}' must be alias=field"))?;
            let field = field
                .parse::<Field>()
                .map_err(anyhow::Error::msg)
                .context("RECOMMENDATION_FIELD_ALIASES must map to known field names")?;
            Ok((alias.trim().to_string(), field))
        })
        .collect()
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or(key, std::env::var(key).ok().as_deref(), default)
}

fn parse_or<T>(key: &str, raw: Option<&str>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
