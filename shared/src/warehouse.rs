//! Analytics persistence for answered questions.
//!
//! Each question/answer pair lands in a Postgres `questions` table. The
//! connection is optional: without database configuration the pipeline
//! skips persistence with a log line.

use std::time::Duration;

use aws_sdk_secretsmanager::Client as SecretsClient;
use chrono::Utc;
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};

/// Database credentials stored in Secrets Manager.
#[derive(Debug, Deserialize)]
struct DatabaseCredentials {
    username: String,
    password: String,
}

/// Records answered questions.
pub struct QuestionLog {
    pool: PgPool,
}

impl QuestionLog {
    /// Connect using Secrets Manager credentials. Returns `None` when the
    /// database is not configured for this deployment.
    pub async fn connect(config: &Config, secrets: &SecretsClient) -> Result<Option<Self>> {
        let (Some(db_host), Some(secret_arn)) = (&config.db_host, &config.db_secret_arn) else {
            info!("Question database not configured, persistence disabled");
            return Ok(None);
        };

        let secret = secrets
            .get_secret_value()
            .secret_id(secret_arn)
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to get DB secret: {}", e)))?;
        let credentials: DatabaseCredentials =
            serde_json::from_str(secret.secret_string().unwrap_or("{}"))?;

        let database_url = format!(
            "postgres://{}:{}@{}:5432/{}",
            credentials.username, credentials.password, db_host, config.db_name
        );
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        Ok(Some(Self { pool }))
    }

    /// Insert one question/answer row; returns the row id.
    pub async fn record(&self, question: &str, answer: &str) -> Result<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO questions (id, created_at, question, answer)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(question)
        .bind(answer)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}
