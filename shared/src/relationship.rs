//! Relationship-aware personalization for the RSVP submitter and guests.

use crate::models::RsvpRecord;
use crate::roster::{Roster, NEVER_MET, RELATIONSHIP_LEVELS};

/// Resolved tone parameters for the primary RSVP submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Personalization {
    pub name: String,
    pub nickname: String,
    pub they_call_me: String,
    pub relationship: String,
    pub relationship_level: u8,
}

/// Resolved (or default) relationship data for one guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestInfo {
    pub name: String,
    pub nickname: String,
    pub relationship: String,
    pub relationship_level: u8,
}

/// Level assigned to a submitter the roster doesn't know. One notch above
/// "never met": they know enough to RSVP.
const UNKNOWN_SUBMITTER_LEVEL: u8 = 9;

fn first_token(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Resolve the submitter and each guest against the roster.
///
/// The submitter resolves by email first, then by name. Unknown submitters
/// default to a level-9 "Friend"; unknown guests to a level-10 "Unknown".
/// Guests keep the order they appear in the comma-separated input.
pub fn build_person_context(
    rsvp: &RsvpRecord,
    roster: &Roster,
    default_host: &str,
) -> (Personalization, Vec<GuestInfo>) {
    let person = roster
        .identify(&rsvp.email)
        .or_else(|| roster.identify(&rsvp.name));

    let personalization = match person {
        Some(person) => Personalization {
            name: person.name.clone(),
            nickname: or_default(&person.nickname, person.first_name()),
            they_call_me: or_default(&person.they_call_me, default_host),
            relationship: person.relationship.clone(),
            relationship_level: person.relationship_level,
        },
        None => Personalization {
            name: rsvp.name.clone(),
            nickname: first_token(&rsvp.name).to_string(),
            they_call_me: default_host.to_string(),
            relationship: "Friend".to_string(),
            relationship_level: UNKNOWN_SUBMITTER_LEVEL,
        },
    };

    let mut guests = Vec::new();
    for guest_name in rsvp.other_guests.split(',') {
        let guest_name = guest_name.trim();
        if guest_name.is_empty() {
            continue;
        }
        guests.push(match roster.identify(guest_name) {
            Some(person) => GuestInfo {
                name: person.name.clone(),
                nickname: or_default(&person.nickname, person.first_name()),
                relationship: person.relationship.clone(),
                relationship_level: person.relationship_level,
            },
            None => GuestInfo {
                name: guest_name.to_string(),
                nickname: first_token(guest_name).to_string(),
                relationship: "Unknown".to_string(),
                relationship_level: NEVER_MET,
            },
        });
    }

    (personalization, guests)
}

/// Render the relationship context block and level legend for prompt
/// injection.
///
/// Deterministic templates; the guest section is omitted entirely when
/// there are no guests.
pub fn format_relationship_context(
    personalization: &Personalization,
    guests: &[GuestInfo],
) -> (String, String) {
    let mut context = format!(
        "\nRelationship with {}:\n- They call me: {}\n- Nickname or how I refer to them: {}\n- Our relationship: {}\n- Relationship level (1-10 where 1 is closest): {}\n",
        personalization.name,
        personalization.they_call_me,
        personalization.nickname,
        personalization.relationship,
        personalization.relationship_level,
    );

    if !guests.is_empty() {
        context.push_str("\nRelationship with guests:\n");
        for guest in guests {
            context.push_str(&format!(
                "- {} (nickname: {}): {}, level {}\n",
                guest.name, guest.nickname, guest.relationship, guest.relationship_level
            ));
        }
    }

    (context, relationship_levels_text())
}

/// The level legend as "level = description" lines.
pub fn relationship_levels_text() -> String {
    RELATIONSHIP_LEVELS
        .iter()
        .map(|(level, description)| format!("{} = {}", level, description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    fn sample_roster() -> Roster {
        Roster::from_rows(vec![
            row(&["Bobby Smith", "bob@x.com", "Bobster", "Sully", "Old friend", "3"]),
            row(&["Alice Jones", "alice@example.com", "", "", "College friend", "2"]),
        ])
    }

    #[test]
    fn resolves_submitter_by_email_before_name() {
        let rsvp = RsvpRecord {
            name: "Alice Jones".to_string(),
            email: "bob@x.com".to_string(),
            ..Default::default()
        };
        let (personalization, _) = build_person_context(&rsvp, &sample_roster(), "Andrew");
        assert_eq!(personalization.name, "Bobby Smith");
        assert_eq!(personalization.nickname, "Bobster");
        assert_eq!(personalization.they_call_me, "Sully");
        assert_eq!(personalization.relationship_level, 3);
    }

    #[test]
    fn resolved_person_with_blank_columns_gets_fallbacks() {
        let rsvp = RsvpRecord {
            name: "Alice Jones".to_string(),
            ..Default::default()
        };
        let (personalization, _) = build_person_context(&rsvp, &sample_roster(), "Andrew");
        assert_eq!(personalization.nickname, "Alice");
        assert_eq!(personalization.they_call_me, "Andrew");
    }

    #[test]
    fn unknown_submitter_gets_friendly_defaults() {
        let rsvp = RsvpRecord {
            name: "Pat Doe".to_string(),
            ..Default::default()
        };
        let (personalization, _) = build_person_context(&rsvp, &sample_roster(), "Andrew");
        assert_eq!(personalization.name, "Pat Doe");
        assert_eq!(personalization.nickname, "Pat");
        assert_eq!(personalization.they_call_me, "Andrew");
        assert_eq!(personalization.relationship, "Friend");
        assert_eq!(personalization.relationship_level, 9);
    }

    #[test]
    fn guests_resolve_independently_in_input_order() {
        let rsvp = RsvpRecord {
            name: "Pat Doe".to_string(),
            other_guests: "Alice Jones, Unknown Person".to_string(),
            ..Default::default()
        };
        let (_, guests) = build_person_context(&rsvp, &sample_roster(), "Andrew");
        assert_eq!(guests.len(), 2);
        assert_eq!(guests[0].name, "Alice Jones");
        assert_eq!(guests[0].relationship_level, 2);
        assert_eq!(guests[1].name, "Unknown Person");
        assert_eq!(guests[1].relationship, "Unknown");
        assert_eq!(guests[1].relationship_level, NEVER_MET);
    }

    #[test]
    fn context_omits_guest_section_when_no_guests() {
        let rsvp = RsvpRecord {
            name: "Pat Doe".to_string(),
            ..Default::default()
        };
        let (personalization, guests) = build_person_context(&rsvp, &sample_roster(), "Andrew");
        let (context, levels) = format_relationship_context(&personalization, &guests);
        assert!(context.contains("Relationship with Pat Doe:"));
        assert!(!context.contains("Relationship with guests:"));
        assert!(levels.starts_with("1 = "));
        assert!(levels.ends_with("10 = never met"));
    }

    #[test]
    fn context_lists_each_guest() {
        let rsvp = RsvpRecord {
            name: "Pat Doe".to_string(),
            other_guests: "Alice Jones, Sam".to_string(),
            ..Default::default()
        };
        let (personalization, guests) = build_person_context(&rsvp, &sample_roster(), "Andrew");
        let (context, _) = format_relationship_context(&personalization, &guests);
        assert!(context.contains("Relationship with guests:"));
        assert!(context.contains("- Alice Jones (nickname: Alice): College friend, level 2"));
        assert!(context.contains("- Sam (nickname: Sam): Unknown, level 10"));
    }
}
