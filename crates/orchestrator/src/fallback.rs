//! Canned responses for degraded paths.
//!
//! Two distinct pools: static fallbacks cover total provider outage, and
//! micro-answers stand in for a backend that answered with empty content.
//! Both are short, generic, and safety-appropriate; neither reads as an
//! error message.

use rand::Rng;

/// Static responses used when every configured provider has failed.
pub const STATIC_FALLBACKS: &[&str] = &[
    "I can't reach the answer service right now. Until I'm back: trust your gauges, \
     cross-check any critical reading against a second independent source, and log \
     what you observed so the next watch can follow up.",
    "The answer service is momentarily unavailable. A good habit in the meantime: \
     walk the affected machinery space, note temperatures, sounds and smells, and \
     compare against the last watch's log entries.",
    "I couldn't get an answer through just now. As a rule of thumb, isolate energy \
     sources and follow your vessel's permit-to-work procedure before opening up \
     any equipment, then try me again shortly.",
];

/// Micro-answers substituted when a backend returns no usable text.
pub const EMPTY_CONTENT_ANSWERS: &[&str] = &[
    "I don't have a solid answer for that one. Could you rephrase it with the \
     equipment type and the symptom you're seeing?",
    "That one came back blank on my side. Try asking again with a bit more detail, \
     such as the machinery involved and when the problem appears.",
    "I couldn't put together a useful answer there. Give me the make or type of \
     equipment and what changed recently, and I'll have another go.",
];

/// Pick a static fallback response.
pub fn static_fallback() -> &'static str {
    pick(STATIC_FALLBACKS)
}

/// Pick an empty-content micro-answer.
pub fn empty_content_answer() -> &'static str {
    pick(EMPTY_CONTENT_ANSWERS)
}

fn pick(options: &'static [&'static str]) -> &'static str {
    let idx = rand::thread_rng().gen_range(0..options.len());
    options[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pools_are_non_empty_and_short() {
        for text in STATIC_FALLBACKS.iter().chain(EMPTY_CONTENT_ANSWERS) {
            assert!(!text.is_empty());
            assert!(text.split_whitespace().count() < 60);
            // Canned text must never look like an error dump.
            assert!(!text.to_lowercase().contains("error"));
        }
    }

    #[test]
    fn test_picks_come_from_pools() {
        for _ in 0..20 {
            assert!(STATIC_FALLBACKS.contains(&static_fallback()));
            assert!(EMPTY_CONTENT_ANSWERS.contains(&empty_content_answer()));
        }
    }
}
