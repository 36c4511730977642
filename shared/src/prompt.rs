//! Prompt construction for the generation provider.
//!
//! Pure string templates: identical inputs produce byte-identical prompts.
//! All knowledge and personalization is passed in; nothing here performs
//! I/O.

use crate::config::EventProfile;
use crate::content::EventContent;
use crate::models::RsvpRecord;
use crate::relationship::Personalization;

/// Uppercase the first character and lowercase the rest ("friday" ->
/// "Friday").
pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Summarize submitted RSVP fields for prompt context.
pub fn format_rsvp_summary(rsvp: &RsvpRecord) -> String {
    format!(
        "\nName: {}\nEmail: {}\nArriving: {}\nDeparting: {}\nCamping preference: {}\nOther guests: {}\nNotes: {}\nQuestions: {}\n",
        rsvp.name,
        rsvp.email,
        capitalize(&rsvp.arriving),
        capitalize(&rsvp.departing),
        rsvp.camping,
        rsvp.other_guests,
        rsvp.notes,
        rsvp.questions,
    )
}

/// Prompt for an attending RSVP.
///
/// Instructs the generator to emit `SUBJECT:` and `BODY:` tagged sections;
/// the response parser depends on those markers.
pub fn build_attending_prompt(
    event: &EventProfile,
    rsvp: &RsvpRecord,
    personalization: &Personalization,
    relationship_context: &str,
    levels_text: &str,
    content: &EventContent,
) -> String {
    format!(
        r#"
You are responding to an RSVP for {event_name}, {descriptor}. Use a friendly, casual,
and informative tone appropriate for the specific relationship with this person.

Here's information about the RSVP:
{rsvp_summary}

Important personal context to help personalize this response:
{relationship_context}

Relationship level meanings:
{levels_text}

Here are the event details for reference:
{event_details}

Information about the previous {event_name}:
{previous_event}

Information about the current year's lineup and activities:
{current_lineup}

Create two parts: An email subject line and a body.

For the subject line:
- Create a brief, personalized subject line related to their {event_name} RSVP
- Include their name if appropriate
- Keep it under 60 characters
- Format it as "SUBJECT: Your subject line here"

For the body:
Write a personalized email response to {nickname} that:
1. Shows genuine excitement about seeing them (and their guests) at {event_name}, with the tone matching our relationship and relationship level
2. Confirms their RSVP details (arrival/departure days, camping preference, additional guests)
2a. If they are arriving and departing same day, they aren't camping and we don't need to mention anything about camping or RVs
3. Addresses any notes or questions they included (if applicable)
4. Provides relevant information from the event details based on their camping choice, arrival day, etc.
5. If appropriate, mentions activities or performances from this year's lineup that might interest them
5a. Tell them that the schedule is still being finalized and to check the website for updates
6. If we're close (relationship level 1-3), include a personal touch or inside reference that feels authentic
7. If it's someone I haven't seen in a while (level 3, 5, or 6), express that I'm looking forward to catching up
8. If it's family, use an appropriate familial tone
9. Sign off with my name as {they_call_me}

Format the body as "BODY: Your email body here"

The response should be conversational, reflecting the actual relationship I have with this person. Make it sound like it was written by me, not by an AI.
"#,
        event_name = event.name,
        descriptor = event.descriptor,
        rsvp_summary = format_rsvp_summary(rsvp),
        relationship_context = relationship_context,
        levels_text = levels_text,
        event_details = content.event_details,
        previous_event = content.previous_event,
        current_lineup = content.current_lineup,
        nickname = personalization.nickname,
        they_call_me = personalization.they_call_me,
    )
}

/// Prompt for a declining RSVP. Same shape as the attending variant with a
/// directive set built around gratitude and next year.
pub fn build_not_attending_prompt(
    event: &EventProfile,
    rsvp: &RsvpRecord,
    personalization: &Personalization,
    relationship_context: &str,
    levels_text: &str,
    content: &EventContent,
) -> String {
    format!(
        r#"
You are responding to an RSVP decline for {event_name}, {descriptor}. Use a friendly, casual,
and understanding tone appropriate for the specific relationship with this person.

Here's information about the RSVP:
{rsvp_summary}

Important personal context to help personalize this response:
{relationship_context}

Relationship level meanings:
{levels_text}

Here are the event details for reference:
{event_details}

Information about the previous {event_name}:
{previous_event}

Create two parts: An email subject line and a body.

For the subject line:
- Create a brief, personalized subject line acknowledging their {event_name} RSVP
- Include their name if appropriate
- Keep it under 60 characters
- Format it as "SUBJECT: Your subject line here"

For the body:
Write a personalized email response to {nickname} that:
1. Expresses understanding and appreciation that they took the time to RSVP even though they can't attend
2. Conveys that they'll be missed this year
3. Reminds them that {event_name} happens every year around the same time ({timing}) and you hope to see them next year
4. Addresses any notes or questions they included (if applicable)
5. If we're close (relationship level 1-3), include a personal touch or inside reference that feels authentic
6. If it's family, use an appropriate familial tone
7. Sign off with my name as {they_call_me}

Format the body as "BODY: Your email body here"

The response should be conversational, reflecting the actual relationship I have with this person. Make it sound like it was written by me, not by an AI.
"#,
        event_name = event.name,
        descriptor = event.descriptor,
        timing = event.timing,
        rsvp_summary = format_rsvp_summary(rsvp),
        relationship_context = relationship_context,
        levels_text = levels_text,
        event_details = content.event_details,
        previous_event = content.previous_event,
        nickname = personalization.nickname,
        they_call_me = personalization.they_call_me,
    )
}

/// Prompt for a free-form question. Current-year information comes first so
/// the generator prioritizes it over the archive.
pub fn build_question_prompt(event: &EventProfile, content: &EventContent, question: &str) -> String {
    format!(
        r#"Here is information about {event_name}:

GENERAL EVENT INFORMATION FOR THIS YEAR:
{event_details}

CURRENT YEAR'S LINEUP AND ACTIVITIES:
{current_lineup}

INFORMATION ABOUT LAST YEAR'S EVENT - Use this for reference if the question isn't clearly answered by current year information:
{previous_event}

Please answer this question: {question}"#,
        event_name = event.name,
        event_details = content.event_details,
        current_lineup = content.current_lineup,
        previous_event = content.previous_event,
        question = question,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> EventProfile {
        EventProfile {
            name: "Sullstice".to_string(),
            descriptor: "a multi-day camping event".to_string(),
            timing: "Memorial Day weekend".to_string(),
            website: "sullstice.com".to_string(),
        }
    }

    fn personalization() -> Personalization {
        Personalization {
            name: "Bobby Smith".to_string(),
            nickname: "Bobster".to_string(),
            they_call_me: "Sully".to_string(),
            relationship: "Old friend".to_string(),
            relationship_level: 3,
        }
    }

    fn content() -> EventContent {
        EventContent {
            event_details: "Details here.".to_string(),
            previous_event: "Last year recap.".to_string(),
            current_lineup: "Band A, Band B.".to_string(),
        }
    }

    fn rsvp() -> RsvpRecord {
        RsvpRecord {
            name: "Bobby Smith".to_string(),
            arriving: "friday".to_string(),
            departing: "sunday".to_string(),
            camping: "RV".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn capitalize_uppercases_first_letter_only() {
        assert_eq!(capitalize("friday"), "Friday");
        assert_eq!(capitalize("RV"), "Rv");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn summary_capitalizes_travel_days_but_not_camping() {
        let summary = format_rsvp_summary(&rsvp());
        assert!(summary.contains("Arriving: Friday"));
        assert!(summary.contains("Departing: Sunday"));
        assert!(summary.contains("Camping preference: RV"));
    }

    #[test]
    fn attending_prompt_is_deterministic() {
        let (event, p, c, r) = (profile(), personalization(), content(), rsvp());
        let (context, levels) = ("ctx".to_string(), "levels".to_string());
        let first = build_attending_prompt(&event, &r, &p, &context, &levels, &c);
        let second = build_attending_prompt(&event, &r, &p, &context, &levels, &c);
        assert_eq!(first, second);
    }

    #[test]
    fn attending_prompt_requests_tagged_sections() {
        let prompt = build_attending_prompt(
            &profile(),
            &rsvp(),
            &personalization(),
            "ctx",
            "levels",
            &content(),
        );
        assert!(prompt.contains("SUBJECT: Your subject line here"));
        assert!(prompt.contains("BODY: Your email body here"));
        assert!(prompt.contains("Write a personalized email response to Bobster"));
        assert!(prompt.contains("Sign off with my name as Sully"));
        assert!(prompt.contains("Band A, Band B."));
    }

    #[test]
    fn decline_prompt_reminds_about_next_year() {
        let prompt = build_not_attending_prompt(
            &profile(),
            &rsvp(),
            &personalization(),
            "ctx",
            "levels",
            &content(),
        );
        assert!(prompt.contains("responding to an RSVP decline"));
        assert!(prompt.contains("Memorial Day weekend"));
        assert!(prompt.contains("they'll be missed this year"));
        // Declines don't pitch the lineup.
        assert!(!prompt.contains("Band A, Band B."));
    }

    #[test]
    fn question_prompt_puts_current_year_before_archive() {
        let prompt = build_question_prompt(&profile(), &content(), "Is there parking?");
        let details_at = prompt.find("Details here.").expect("details present");
        let lineup_at = prompt.find("Band A, Band B.").expect("lineup present");
        let previous_at = prompt.find("Last year recap.").expect("archive present");
        assert!(details_at < lineup_at);
        assert!(lineup_at < previous_at);
        assert!(prompt.ends_with("Please answer this question: Is there parking?"));
    }
}
