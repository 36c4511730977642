//! Response generation: prompt selection, the provider call, output
//! parsing, and the deterministic fallback.
//!
//! Per request the flow is build context, build prompt, check the
//! credential, call the provider once, parse, append the disclosure. Any
//! failure after the prompt stage short-circuits to the fallback template.
//! One call, no retries.

use tracing::{error, warn};

use crate::config::Config;
use crate::content::EventContent;
use crate::llm::{Completion, GenerationClient};
use crate::models::{GeneratedResponse, RsvpRecord};
use crate::prompt::{
    build_attending_prompt, build_not_attending_prompt, build_question_prompt, capitalize,
};
use crate::relationship::{build_person_context, format_relationship_context, Personalization};
use crate::roster::Roster;

/// Model for RSVP replies; kept small since replies are short and frequent.
pub const RSVP_MODEL: &str = "gpt-4o-mini";
/// Model for question answering, where grounding in the docs matters more.
pub const QUESTION_MODEL: &str = "gpt-4o";

const RSVP_MAX_TOKENS: u32 = 1000;
const RSVP_TEMPERATURE: f32 = 0.7;
const QUESTION_MAX_TOKENS: u32 = 500;
const QUESTION_TEMPERATURE: f32 = 0.5;

const SUBJECT_TAG: &str = "SUBJECT:";
const BODY_TAG: &str = "BODY:";

/// Disclosure appended to every generated email body.
const DISCLOSURE_POSTSCRIPT: &str = "\n\n--\nThis reply was drafted by an AI assistant on the host's behalf. If anything looks off, just reply to this email and a real person will sort it out.";

/// Generate the reply email for an RSVP.
///
/// Never fails: a missing credential, a provider error, or an unparseable
/// completion all land on the deterministic fallback, and both fields of
/// the result are always non-empty.
pub async fn generate_rsvp_response(
    config: &Config,
    llm: &GenerationClient,
    roster: &Roster,
    content: &EventContent,
    rsvp: &RsvpRecord,
) -> GeneratedResponse {
    let (personalization, guests) = build_person_context(rsvp, roster, &config.host_name);
    let (relationship_context, levels_text) =
        format_relationship_context(&personalization, &guests);

    let prompt = build_rsvp_prompt(
        config,
        rsvp,
        &personalization,
        &relationship_context,
        &levels_text,
        content,
    );

    if !llm.has_credential() {
        warn!("No generation credential configured, using fallback RSVP response");
        return fallback_rsvp_response(config, rsvp, &personalization);
    }

    let completion = Completion {
        system: format!(
            "You are the host of {}, your name is {}, writing personalized RSVP responses.",
            config.event.name, personalization.they_call_me
        ),
        prompt,
        model: RSVP_MODEL,
        max_tokens: RSVP_MAX_TOKENS,
        temperature: RSVP_TEMPERATURE,
    };

    match llm.complete(&completion).await {
        Ok(raw) => finalize_generated(&raw, &default_subject(config)),
        Err(e) => {
            error!(error = %e, "Generation failed, using fallback RSVP response");
            fallback_rsvp_response(config, rsvp, &personalization)
        }
    }
}

/// Answer a free-form question about the event.
///
/// Same call/fallback shape as the RSVP path, but the result is a single
/// string with no subject/body split.
pub async fn answer_question(
    config: &Config,
    llm: &GenerationClient,
    content: &EventContent,
    question: &str,
) -> String {
    if !llm.has_credential() {
        warn!("No generation credential configured, using fallback answer");
        return fallback_answer(config);
    }

    let completion = Completion {
        system: format!(
            "You are a helpful assistant for {event}, {descriptor}.\n\
             When answering questions:\n\
             1. Prioritize information from the current year's details and lineup\n\
             2. If the current year's information doesn't fully address the question, you can reference how things worked last year, but clearly indicate that this is historical information and things might be different this year\n\
             3. Be conversational and friendly in your tone\n\
             4. Be concise but thorough\n\
             5. If the question is about something not mentioned in any of the provided information, acknowledge this and suggest contacting the organizers directly at {host_email}",
            event = config.event.name,
            descriptor = config.event.descriptor,
            host_email = config.host_email,
        ),
        prompt: build_question_prompt(&config.event, content, question),
        model: QUESTION_MODEL,
        max_tokens: QUESTION_MAX_TOKENS,
        temperature: QUESTION_TEMPERATURE,
    };

    match llm.complete(&completion).await {
        Ok(answer) => answer,
        Err(e) => {
            error!(error = %e, "Generation failed, using fallback answer");
            fallback_answer(config)
        }
    }
}

/// Pick the attending or declining prompt based on the `can_attend` field.
fn build_rsvp_prompt(
    config: &Config,
    rsvp: &RsvpRecord,
    personalization: &Personalization,
    relationship_context: &str,
    levels_text: &str,
    content: &EventContent,
) -> String {
    if rsvp.is_attending() {
        build_attending_prompt(
            &config.event,
            rsvp,
            personalization,
            relationship_context,
            levels_text,
            content,
        )
    } else {
        build_not_attending_prompt(
            &config.event,
            rsvp,
            personalization,
            relationship_context,
            levels_text,
            content,
        )
    }
}

/// Subject used when the completion lacks a SUBJECT tag.
fn default_subject(config: &Config) -> String {
    format!("{} RSVP", config.event.name)
}

/// Parse a completion into the final response, appending the disclosure.
fn finalize_generated(raw: &str, default_subject: &str) -> GeneratedResponse {
    let (subject, body) = split_subject_body(raw, default_subject);
    GeneratedResponse {
        subject,
        body: format!("{}{}", body, DISCLOSURE_POSTSCRIPT),
    }
}

/// Split a completion into subject and body via the tag convention.
///
/// Text after `SUBJECT:` up to `BODY:` (or the end) becomes the subject;
/// text after `BODY:` becomes the body. A missing tag falls back to the
/// default subject or to the full raw text as the body.
fn split_subject_body(raw: &str, default_subject: &str) -> (String, String) {
    let subject_at = raw.find(SUBJECT_TAG);
    let body_at = raw.find(BODY_TAG);

    let subject = match subject_at {
        Some(at) => {
            let start = at + SUBJECT_TAG.len();
            let end = body_at.filter(|&b| b >= start).unwrap_or(raw.len());
            let subject = raw[start..end].trim();
            if subject.is_empty() {
                default_subject.to_string()
            } else {
                subject.to_string()
            }
        }
        None => default_subject.to_string(),
    };

    let body = match body_at {
        Some(at) => raw[at + BODY_TAG.len()..].trim(),
        None => raw.trim(),
    };
    let body = if body.is_empty() { raw.trim() } else { body };

    (subject, body.to_string())
}

/// Deterministic reply built only from the submitted fields; used whenever
/// generation is unavailable or fails.
fn fallback_rsvp_response(
    config: &Config,
    rsvp: &RsvpRecord,
    personalization: &Personalization,
) -> GeneratedResponse {
    let mut body = format!(
        "{},\n\nThank you for your RSVP to {}! I've got you down for the following:\n\nArriving: {}\nDeparting: {}\nCamping option: {}\n",
        personalization.nickname,
        config.event.name,
        capitalize(&rsvp.arriving),
        capitalize(&rsvp.departing),
        rsvp.camping,
    );
    if !rsvp.other_guests.is_empty() {
        body.push_str(&format!("Additional guests: {}\n", rsvp.other_guests));
    }
    if !rsvp.notes.is_empty() {
        body.push_str(&format!("Your notes: {}\n", rsvp.notes));
    }
    body.push_str(&format!(
        "\nPlease visit {} for event details and updates.\n\nLooking forward to seeing you!\n{}",
        config.event.website, config.host_name
    ));

    GeneratedResponse {
        subject: format!(
            "Thanks for your {} RSVP, {}!",
            config.event.name, personalization.nickname
        ),
        body,
    }
}

/// Fixed answer used when question generation is unavailable.
fn fallback_answer(config: &Config) -> String {
    format!(
        "I couldn't find specific information about that. Please email {} for more details.",
        config.host_email
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::build_person_context;

    fn no_credential() -> (Config, GenerationClient) {
        let config = Config::test_default();
        let llm = GenerationClient::new(&config);
        (config, llm)
    }

    #[test]
    fn splits_tagged_subject_and_body() {
        let (subject, body) = split_subject_body("SUBJECT: Hi\nBODY: Hello there", "Default");
        assert_eq!(subject, "Hi");
        assert_eq!(body, "Hello there");
    }

    #[test]
    fn untagged_output_becomes_body_with_default_subject() {
        let (subject, body) = split_subject_body("Just some text", "Sullstice RSVP");
        assert_eq!(subject, "Sullstice RSVP");
        assert_eq!(body, "Just some text");
    }

    #[test]
    fn body_tag_alone_still_splits() {
        let (subject, body) = split_subject_body("BODY: Hello", "Default");
        assert_eq!(subject, "Default");
        assert_eq!(body, "Hello");
    }

    #[test]
    fn subject_tag_alone_keeps_full_text_as_body() {
        let (subject, body) = split_subject_body("SUBJECT: Hi there", "Default");
        assert_eq!(subject, "Hi there");
        assert_eq!(body, "SUBJECT: Hi there");
    }

    #[test]
    fn finalize_appends_disclosure_postscript() {
        let response = finalize_generated("SUBJECT: Hi\nBODY: Hello there", "Default");
        assert_eq!(response.subject, "Hi");
        assert!(response.body.starts_with("Hello there"));
        assert!(response.body.ends_with(DISCLOSURE_POSTSCRIPT));

        let response = finalize_generated("Just some text", "Sullstice RSVP");
        assert_eq!(response.subject, "Sullstice RSVP");
        assert!(response.body.starts_with("Just some text"));
        assert!(response.body.ends_with(DISCLOSURE_POSTSCRIPT));
    }

    #[test]
    fn prompt_selection_follows_attendance() {
        let config = Config::test_default();
        let roster = Roster::empty();
        let content = EventContent::default();

        let mut rsvp = RsvpRecord {
            name: "Pat".to_string(),
            can_attend: "Yes".to_string(),
            ..Default::default()
        };
        let (personalization, _) = build_person_context(&rsvp, &roster, &config.host_name);
        let prompt = build_rsvp_prompt(&config, &rsvp, &personalization, "ctx", "levels", &content);
        assert!(prompt.contains("responding to an RSVP for"));

        rsvp.can_attend = "no".to_string();
        let prompt = build_rsvp_prompt(&config, &rsvp, &personalization, "ctx", "levels", &content);
        assert!(prompt.contains("responding to an RSVP decline"));
    }

    #[tokio::test]
    async fn missing_credential_falls_back_to_rsvp_fields() {
        let (config, llm) = no_credential();
        let rsvp = RsvpRecord {
            name: "Pat".to_string(),
            arriving: "Friday".to_string(),
            departing: "Sunday".to_string(),
            camping: "RV".to_string(),
            can_attend: "yes".to_string(),
            ..Default::default()
        };

        let response =
            generate_rsvp_response(&config, &llm, &Roster::empty(), &EventContent::default(), &rsvp)
                .await;

        assert!(!response.subject.is_empty());
        assert!(!response.body.is_empty());
        assert!(response.subject.contains("Pat"));
        assert!(response.body.contains("Friday"));
        assert!(response.body.contains("Sunday"));
        assert!(response.body.contains("RV"));
        assert!(response.body.contains("sullstice.com"));
    }

    #[tokio::test]
    async fn fallback_includes_guests_and_notes_when_present() {
        let (config, llm) = no_credential();
        let rsvp = RsvpRecord {
            name: "Pat".to_string(),
            other_guests: "Alice, Sam".to_string(),
            notes: "We'll bring firewood".to_string(),
            can_attend: "no".to_string(),
            ..Default::default()
        };

        let response =
            generate_rsvp_response(&config, &llm, &Roster::empty(), &EventContent::default(), &rsvp)
                .await;

        assert!(response.body.contains("Additional guests: Alice, Sam"));
        assert!(response.body.contains("Your notes: We'll bring firewood"));
    }

    #[tokio::test]
    async fn question_fallback_points_at_the_host() {
        let (config, llm) = no_credential();
        let answer =
            answer_question(&config, &llm, &EventContent::default(), "Is there parking?").await;
        assert!(answer.contains(&config.host_email));
    }
}
