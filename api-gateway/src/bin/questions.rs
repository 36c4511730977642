//! Questions Lambda - answers free-text questions about the event.
//!
//! Flow: validate, answer (or fall back), then persist the Q&A pair and
//! notify the host, both best-effort, before responding.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde_json::json;
use shared::http::{error_response, json_response, parse_json_body, ApiResponse};
use shared::models::{QuestionReceipt, QuestionRequest};
use shared::{
    archive, Config, ContentStore, GenerationClient, Mailer, OutboundEmail, QuestionLog,
    RequestArchive,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

struct AppState {
    config: Config,
    llm: GenerationClient,
    content: ContentStore,
    archive: RequestArchive,
    mailer: Mailer,
    questions: Option<QuestionLog>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3_client = aws_sdk_s3::Client::new(&aws_config);
        let ses_client = aws_sdk_ses::Client::new(&aws_config);
        let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);

        let config = Config::from_env();

        // A broken analytics store shouldn't keep questions from being
        // answered.
        let questions = match QuestionLog::connect(&config, &secrets_client).await {
            Ok(log) => log,
            Err(e) => {
                warn!(error = %e, "Question database unavailable, persistence disabled");
                None
            }
        };

        Ok(Self {
            llm: GenerationClient::new(&config),
            content: ContentStore::new(s3_client.clone(), config.event_bucket.clone()),
            archive: RequestArchive::new(s3_client, config.event_bucket.clone()),
            mailer: Mailer::new(ses_client, config.sender_email.clone()),
            questions,
            config,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let stamp = archive::request_stamp();

    let raw: serde_json::Value = match parse_json_body(event.body()) {
        Ok(value) => value,
        Err(response) => return Ok(response),
    };

    let request_record = json!({
        "method": event.method().as_str(),
        "path": event.uri().path(),
        "json": raw.clone(),
    });
    if let Err(e) = state.archive.store_request(&stamp, &request_record).await {
        warn!(error = %e, "Failed to archive request");
    }

    let request: QuestionRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(e) => return Ok(error_response(400, format!("Invalid question payload: {}", e))),
    };
    if request.validate().is_err() {
        return Ok(error_response(400, "No question provided"));
    }

    info!(question = %request.question, "Answering question");

    let content = state.content.event_content().await;
    let answer =
        shared::answer_question(&state.config, &state.llm, &content, &request.question).await;

    if let Some(log) = &state.questions {
        match log.record(&request.question, &answer).await {
            Ok(id) => info!(question_id = %id, "Question stored"),
            Err(e) => warn!(error = %e, "Failed to store question"),
        }
    }

    let subject = format!("{} Question", state.config.event.name);
    let notification = format!("Question: {}\n\nAnswer: {}", request.question, answer);
    let outbound = OutboundEmail {
        to: &state.config.host_email,
        subject: &subject,
        body: &notification,
        cc: None,
        reply_to: Some(&state.config.host_email),
    };
    if let Err(e) = state.mailer.send(&outbound).await {
        warn!(error = %e, "Failed to send question notification");
    }

    let receipt = QuestionReceipt {
        question: request.question,
        answer,
        status: "success".to_string(),
    };

    if let Err(e) = state
        .archive
        .store_response(&stamp, &serde_json::to_value(&receipt)?)
        .await
    {
        warn!(error = %e, "Failed to archive response");
    }

    Ok(json_response(200, &ApiResponse::success(receipt)))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);
    let state_clone = state.clone();

    run(service_fn(move |event| {
        let state = state_clone.clone();
        async move { handler(state, event).await }
    }))
    .await
}
