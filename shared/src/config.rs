//! Configuration management for Lambda functions.

use std::env;

/// Identity of the event this deployment serves.
///
/// Interpolated into prompts and fallback copy. The prompt builders stay
/// pure by taking this by reference instead of reading the environment.
#[derive(Debug, Clone)]
pub struct EventProfile {
    /// Event name, e.g. "Sullstice"
    pub name: String,
    /// Short descriptor used in prompts, e.g. "a multi-day camping event"
    pub descriptor: String,
    /// When the event recurs, e.g. "Memorial Day weekend"
    pub timing: String,
    /// Public website referenced in fallback copy
    pub website: String,
}

/// Application configuration loaded from environment variables.
///
/// Built once at process start and passed by reference into the pipeline;
/// pure logic never reads the environment directly. Missing credentials are
/// represented as `None` and degrade the matching feature rather than
/// failing startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Event identity for prompt interpolation
    pub event: EventProfile,
    /// Host first name, used when the roster has no "they call me" entry
    pub host_name: String,
    /// Host inbox for question notifications and CC copies
    pub host_email: String,
    /// Verified SES sender address
    pub sender_email: String,
    /// OpenAI API key; absent means generation falls back to templates
    pub openai_api_key: Option<String>,
    /// Google Sheet holding the roster
    pub roster_sheet_id: Option<String>,
    /// API key for the Sheets values endpoint
    pub sheets_api_key: Option<String>,
    /// Roster tab and cell range
    pub roster_range: String,
    /// Bucket holding knowledge docs and the request archive
    pub event_bucket: String,
    /// Bucket the rendered details page publishes to
    pub site_bucket: Option<String>,
    /// CloudFront distribution invalidated after a publish
    pub cloudfront_distribution_id: Option<String>,
    /// Database host for the questions table
    pub db_host: Option<String>,
    /// Database name
    pub db_name: String,
    /// ARN of the secret containing database credentials
    pub db_secret_arn: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            event: EventProfile {
                name: env::var("EVENT_NAME").unwrap_or_else(|_| "Sullstice".to_string()),
                descriptor: env::var("EVENT_DESCRIPTOR")
                    .unwrap_or_else(|_| "a multi-day camping event".to_string()),
                timing: env::var("EVENT_TIMING")
                    .unwrap_or_else(|_| "Memorial Day weekend".to_string()),
                website: env::var("EVENT_WEBSITE").unwrap_or_else(|_| "sullstice.com".to_string()),
            },
            host_name: env::var("HOST_NAME").unwrap_or_else(|_| "Andrew".to_string()),
            host_email: env::var("HOST_EMAIL").unwrap_or_else(|_| "sullhouse@gmail.com".to_string()),
            sender_email: env::var("SENDER_EMAIL")
                .unwrap_or_else(|_| "no-reply@sullstice.com".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty()),
            roster_sheet_id: env::var("ROSTER_SHEET_ID").ok(),
            sheets_api_key: env::var("SHEETS_API_KEY").ok(),
            roster_range: env::var("ROSTER_RANGE").unwrap_or_else(|_| "Contacts!A2:F500".to_string()),
            event_bucket: env::var("EVENT_BUCKET").unwrap_or_else(|_| "sullstice".to_string()),
            site_bucket: env::var("SITE_BUCKET").ok(),
            cloudfront_distribution_id: env::var("CLOUDFRONT_DISTRIBUTION_ID").ok(),
            db_host: env::var("DB_HOST").ok(),
            db_name: env::var("DB_NAME").unwrap_or_else(|_| "sullstice".to_string()),
            db_secret_arn: env::var("DB_SECRET_ARN").ok(),
        }
    }
}

#[cfg(test)]
impl Config {
    /// Minimal configuration for unit tests: no credentials, no database.
    pub fn test_default() -> Self {
        Self {
            event: EventProfile {
                name: "Sullstice".to_string(),
                descriptor: "a multi-day camping event".to_string(),
                timing: "Memorial Day weekend".to_string(),
                website: "sullstice.com".to_string(),
            },
            host_name: "Andrew".to_string(),
            host_email: "host@example.com".to_string(),
            sender_email: "no-reply@example.com".to_string(),
            openai_api_key: None,
            roster_sheet_id: None,
            sheets_api_key: None,
            roster_range: "Contacts!A2:F500".to_string(),
            event_bucket: "sullstice-test".to_string(),
            site_bucket: None,
            cloudfront_distribution_id: None,
            db_host: None,
            db_name: "sullstice".to_string(),
            db_secret_arn: None,
        }
    }
}
