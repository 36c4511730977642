//! Event Details Lambda - renders the updated details page from its source
//! document.
//!
//! GET returns the rendered HTML; `?publish=true` additionally uploads the
//! page to the site bucket and invalidates its CDN path.

use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use shared::http::{error_response, html_response};
use shared::{render_details_page, Config, ContentStore, KnowledgeDoc, SiteDeployer};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

struct AppState {
    content: ContentStore,
    deployer: Option<SiteDeployer>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3_client = aws_sdk_s3::Client::new(&aws_config);
        let cloudfront_client = aws_sdk_cloudfront::Client::new(&aws_config);

        let config = Config::from_env();
        let deployer = config.site_bucket.clone().map(|bucket| {
            SiteDeployer::new(
                s3_client.clone(),
                cloudfront_client,
                bucket,
                config.cloudfront_distribution_id.clone(),
            )
        });

        Ok(Self {
            content: ContentStore::new(s3_client, config.event_bucket.clone()),
            deployer,
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let doc = match state.content.fetch(KnowledgeDoc::UpdatedDetails).await {
        Ok(doc) if !doc.trim().is_empty() => doc,
        Ok(_) => return Ok(error_response(500, "Could not load document content")),
        Err(e) => {
            error!(error = %e, "Failed to load details document");
            return Ok(error_response(500, "Could not load document content"));
        }
    };

    let template = match state.content.fetch(KnowledgeDoc::SiteTemplate).await {
        Ok(template) => template,
        Err(e) => {
            error!(error = %e, "Failed to load details template");
            return Ok(error_response(500, "Could not load page template"));
        }
    };

    let html = match render_details_page(&template, &doc) {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Failed to render details page");
            return Ok(error_response(500, e.to_string()));
        }
    };

    if event.query_string_parameters().first("publish") == Some("true") {
        match &state.deployer {
            Some(deployer) => match deployer.publish(&html).await {
                Ok(()) => info!("Details page published"),
                Err(e) => warn!(error = %e, "Failed to publish details page"),
            },
            None => warn!("Publish requested but no site bucket configured"),
        }
    }

    Ok(html_response(html))
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
