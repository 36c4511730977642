//! Knowledge sources for prompt assembly.
//!
//! Event docs are plain-text/markdown objects in S3, addressed by a fixed
//! logical-name-to-key mapping. A failed fetch degrades to an empty string;
//! prompts simply carry less context.

use aws_sdk_s3::Client as S3Client;
use tracing::error;

use crate::error::FetchError;

/// Logical knowledge documents, mapped to object keys at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeDoc {
    /// Current event details (dates, directions, what to bring)
    EventDetails,
    /// Archive of the previous year's event
    PreviousEvent,
    /// Current lineup of performances and activities
    CurrentLineup,
    /// Markdown source for the updated details web page
    UpdatedDetails,
    /// HTML template the details page renders into
    SiteTemplate,
}

impl KnowledgeDoc {
    /// S3 object key for this document.
    pub fn object_key(self) -> &'static str {
        match self {
            KnowledgeDoc::EventDetails => "docs/event_details.md",
            KnowledgeDoc::PreviousEvent => "docs/previous_event.md",
            KnowledgeDoc::CurrentLineup => "docs/current_lineup.md",
            KnowledgeDoc::UpdatedDetails => "docs/updated_details.md",
            KnowledgeDoc::SiteTemplate => "site/details_template.html",
        }
    }
}

/// Free-text knowledge passed into the prompt builders.
#[derive(Debug, Clone, Default)]
pub struct EventContent {
    pub event_details: String,
    pub previous_event: String,
    pub current_lineup: String,
}

/// Reads knowledge documents from the event bucket.
///
/// No caching: every call re-fetches, so edits to the docs show up on the
/// next request.
pub struct ContentStore {
    s3: S3Client,
    bucket: String,
}

impl ContentStore {
    pub fn new(s3: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            s3,
            bucket: bucket.into(),
        }
    }

    /// Fetch one document as UTF-8 text.
    pub async fn fetch(&self, doc: KnowledgeDoc) -> Result<String, FetchError> {
        let object = self
            .s3
            .get_object()
            .bucket(&self.bucket)
            .key(doc.object_key())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?
            .into_bytes();

        String::from_utf8(bytes.to_vec()).map_err(|e| FetchError::Malformed(e.to_string()))
    }

    /// Fetch one document, degrading to an empty string on failure.
    pub async fn fetch_or_empty(&self, doc: KnowledgeDoc) -> String {
        match self.fetch(doc).await {
            Ok(text) => text,
            Err(e) => {
                error!(doc = ?doc, error = %e, "Failed to load knowledge document");
                String::new()
            }
        }
    }

    /// Load the three prompt knowledge sources. Each document degrades
    /// independently.
    pub async fn event_content(&self) -> EventContent {
        EventContent {
            event_details: self.fetch_or_empty(KnowledgeDoc::EventDetails).await,
            previous_event: self.fetch_or_empty(KnowledgeDoc::PreviousEvent).await,
            current_lineup: self.fetch_or_empty(KnowledgeDoc::CurrentLineup).await,
        }
    }
}
