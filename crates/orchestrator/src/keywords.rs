//! Phrase lists that steer the WhatsApp workflow.
//!
//! Matching is a case-insensitive substring search, so "I'm ready!" counts
//! as "ready".

/// Phrases asking for a human to get in touch.
pub const TEAM_CONTACT_PHRASES: &[&str] = &[
    "team reach out",
    "contact me",
    "call me",
    "reach out",
    "team contact",
    "speak with team",
    "talk to team",
    "team call",
    "contact team",
    "team reach",
];

/// Phrases signalling the client is done describing the project.
pub const COMPLETION_PHRASES: &[&str] = &[
    "finalize",
    "complete",
    "done",
    "finished",
    "ready",
    "proceed",
    "start project",
    "begin",
    "go ahead",
    "confirm",
    "approve",
    "that's all",
    "that's it",
    "nothing else",
    "perfect",
    "sounds good",
];

fn contains_any(message: &str, phrases: &[&str]) -> bool {
    let lower = message.to_lowercase();
    phrases.iter().any(|phrase| lower.contains(phrase))
}

/// Whether the client is asking the team to contact them.
pub fn wants_team_contact(message: &str) -> bool {
    contains_any(message, TEAM_CONTACT_PHRASES)
}

/// Whether the client is wrapping up.
pub fn is_completion(message: &str) -> bool {
    contains_any(message, COMPLETION_PHRASES)
}
