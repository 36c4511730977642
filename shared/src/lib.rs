//! Shared library for the Sullstice Lambda functions.
//!
//! Everything from roster lookup to response generation lives here; the
//! Lambda bins in `api-gateway` are thin HTTP shells over these modules.

pub mod archive;
pub mod config;
pub mod content;
pub mod email;
pub mod error;
pub mod generate;
pub mod http;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod relationship;
pub mod roster;
pub mod site;
pub mod warehouse;

pub use archive::RequestArchive;
pub use config::{Config, EventProfile};
pub use content::{ContentStore, EventContent, KnowledgeDoc};
pub use email::{Mailer, OutboundEmail};
pub use error::{Error, FetchError, Result};
pub use generate::{answer_question, generate_rsvp_response};
pub use llm::GenerationClient;
pub use models::{GeneratedResponse, QuestionRequest, RsvpRecord};
pub use roster::{Roster, RosterClient};
pub use site::{render_details_page, SiteDeployer};
pub use warehouse::QuestionLog;
