//! Shared data models.

use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_can_attend() -> String {
    "yes".to_string()
}

fn default_name() -> String {
    "Guest".to_string()
}

/// A submitted RSVP, as posted by the website form.
///
/// Every field is optional on the wire; missing fields default to empty
/// strings except `name` ("Guest") and `can_attend` ("yes"). Read-only once
/// deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsvpRecord {
    #[serde(default = "default_can_attend")]
    pub can_attend: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Comma-separated free text naming additional guests
    #[serde(default)]
    pub other_guests: String,
    #[serde(default)]
    pub arriving: String,
    #[serde(default)]
    pub departing: String,
    #[serde(default)]
    pub camping: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub questions: String,
}

impl RsvpRecord {
    /// Whether the submitter is attending. Anything other than a
    /// case-insensitive "yes" counts as a decline.
    pub fn is_attending(&self) -> bool {
        self.can_attend.trim().eq_ignore_ascii_case("yes")
    }
}

impl Default for RsvpRecord {
    fn default() -> Self {
        Self {
            can_attend: default_can_attend(),
            name: default_name(),
            email: String::new(),
            other_guests: String::new(),
            arriving: String::new(),
            departing: String::new(),
            camping: String::new(),
            notes: String::new(),
            questions: String::new(),
        }
    }
}

/// A free-text question about the event.
#[derive(Debug, Deserialize, Validate)]
pub struct QuestionRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "No question provided"))]
    pub question: String,
}

/// The two-field result of response generation.
///
/// Both fields are non-empty after generation; the fallback path guarantees
/// this even when the provider call fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedResponse {
    pub subject: String,
    pub body: String,
}

/// Receipt returned to the RSVP API caller: the submitted fields echoed
/// back, plus the generated reply.
#[derive(Debug, Serialize)]
pub struct RsvpReceipt {
    pub name: String,
    pub email: String,
    pub other_guests: String,
    pub arriving: String,
    pub departing: String,
    pub camping: String,
    pub notes: String,
    pub questions: String,
    pub status: String,
    pub ai_response: GeneratedResponse,
}

/// Payload returned to the questions API caller.
#[derive(Debug, Serialize)]
pub struct QuestionReceipt {
    pub question: String,
    pub answer: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_is_case_insensitive_yes() {
        let mut rsvp = RsvpRecord::default();
        assert!(rsvp.is_attending());

        rsvp.can_attend = "Yes".to_string();
        assert!(rsvp.is_attending());
        rsvp.can_attend = " YES ".to_string();
        assert!(rsvp.is_attending());
        rsvp.can_attend = "no".to_string();
        assert!(!rsvp.is_attending());
        rsvp.can_attend = "maybe".to_string();
        assert!(!rsvp.is_attending());
        rsvp.can_attend = String::new();
        assert!(!rsvp.is_attending());
    }

    #[test]
    fn rsvp_defaults_apply_to_missing_fields() {
        let rsvp: RsvpRecord = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(rsvp.name, "Guest");
        assert_eq!(rsvp.can_attend, "yes");
        assert_eq!(rsvp.arriving, "");
        assert_eq!(rsvp.other_guests, "");
    }

    #[test]
    fn blank_question_fails_validation() {
        use validator::Validate;

        let request: QuestionRequest = serde_json::from_str("{}").expect("empty object parses");
        assert!(request.validate().is_err());

        let request: QuestionRequest =
            serde_json::from_str(r#"{"question":"Is there parking?"}"#).expect("parses");
        assert!(request.validate().is_ok());
    }
}
