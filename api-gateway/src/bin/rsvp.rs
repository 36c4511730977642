//! RSVP Lambda - receives RSVP submissions, generates a personalized reply,
//! and delivers it by email.
//!
//! Flow: archive the raw request, resolve the submitter against the roster,
//! generate the reply (or fall back), email it, archive the response. Email
//! and archival failures never fail the request; the caller still gets the
//! generated reply.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde_json::json;
use shared::http::{error_response, json_response, parse_json_body, ApiResponse};
use shared::models::{RsvpReceipt, RsvpRecord};
use shared::{
    archive, Config, ContentStore, GenerationClient, Mailer, OutboundEmail, RequestArchive,
    RosterClient,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct AppState {
    config: Config,
    llm: GenerationClient,
    roster: RosterClient,
    content: ContentStore,
    archive: RequestArchive,
    mailer: Mailer,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3_client = aws_sdk_s3::Client::new(&aws_config);
        let ses_client = aws_sdk_ses::Client::new(&aws_config);

        let config = Config::from_env();
        Ok(Self {
            llm: GenerationClient::new(&config),
            roster: RosterClient::new(&config),
            content: ContentStore::new(s3_client.clone(), config.event_bucket.clone()),
            archive: RequestArchive::new(s3_client, config.event_bucket.clone()),
            mailer: Mailer::new(ses_client, config.sender_email.clone()),
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

    // Archive the raw submission before doing anything with it.
    let request_record = json!({
        "method": event.method().as_str(),
        "path": event.uri().path(),
        "json": raw.clone(),
    });
    if let Err(e) = state.archive.store_request(&stamp, &request_record).await {
        warn!(error = %e, "Failed to archive request");
    }

    let rsvp: RsvpRecord = match serde_json::from_value(raw) {
        Ok(rsvp) => rsvp,
        Err(e) => return Ok(error_response(400, format!("Invalid RSVP payload: {}", e))),
    };

    info!(name = %rsvp.name, attending = rsvp.is_attending(), "Processing RSVP");

    let roster = state.roster.fetch_or_empty().await;
    let content = state.content.event_content().await;
    let reply =
        shared::generate_rsvp_response(&state.config, &state.llm, &roster, &content, &rsvp).await;

    let recipient = rsvp.email.trim();
    if recipient.is_empty() {
        warn!("RSVP has no email address, skipping delivery");
    } else {
        let outbound = OutboundEmail {
            to: recipient,
            subject: &reply.subject,
            body: &reply.body,
            cc: Some(&state.config.host_email),
            reply_to: Some(&state.config.host_email),
        };
        match state.mailer.send(&outbound).await {
            Ok(message_id) => info!(message_id = %message_id, "RSVP reply sent"),
            Err(e) => warn!(error = %e, "Failed to send RSVP reply"),
        }
    }

    let receipt = RsvpReceipt {
        name: rsvp.name.clone(),
        email: rsvp.email.clone(),
        other_guests: rsvp.other_guests.clone(),
        arriving: rsvp.arriving.clone(),
        departing: rsvp.departing.clone(),
        camping: rsvp.camping.clone(),
        notes: rsvp.notes.clone(),
        questions: rsvp.questions.clone(),
        status: "RSVP received successfully".to_string(),
        ai_response: reply,
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
