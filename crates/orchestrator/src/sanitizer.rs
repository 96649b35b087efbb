//! Follow-up block sanitization.
//!
//! Every provider is instructed to close its answer with a two-option
//! follow-up block, but compliance varies: option markers arrive as `1)`,
//! `q1)`, `(1)` or bolded, punctuation is inconsistent, and the closing
//! instruction line is phrased freely. This module locates the block by a
//! tolerant match on its opening phrase and rewrites only that trailing
//! section into one canonical shape. The technical answer above the block
//! is never touched, and text without the opening phrase passes through
//! unchanged. The transformation is pure and idempotent.
//!
//! The rewrite is an ordered set of named line rules rather than one large
//! pattern, so each rule stays independently testable.

use std::sync::LazyLock;

use regex::Regex;

/// Canonical closing line of a sanitized follow-up block.
pub const CONFIRM_LINE: &str = "Reply a or b to confirm.";

/// Tolerant match for the block's opening phrase.
static OPENING_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)would\s+(?:you|u)\s+(?:also\s+)?like\s+to\s+know").expect("opening phrase regex")
});

/// Rule: a line carrying one follow-up option, in any marker variant.
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[*_]*\(?q?([12ab])[.):]\s*[*_]*\s*(.*?)\s*[*_]*\s*$")
        .expect("option line regex")
});

/// Rule: the "or" separator between options.
static OR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[*_]*\s*or\s*[*_]*[.,]?\s*$").expect("or line regex")
});

/// Rule: any phrasing variant of the closing reply instruction.
static REPLY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[*_]*\s*(?:please\s+)?(?:reply|choose|type|answer|respond|select|write)\b.*\b(?:1|2|a|b)\b")
        .expect("reply line regex")
});

/// Emphasis markers stripped inside the block.
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[*_]+").expect("emphasis regex"));

/// Classified form of one line inside the follow-up block.
#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    /// An option line; carries the option text without its marker.
    Option(String),
    /// The "or" separator.
    OrSeparator,
    /// A closing reply-instruction variant.
    ReplyInstruction,
    /// Whitespace only.
    Blank,
    /// Anything else; treated as a continuation of the current option.
    Other(String),
}

fn classify_line(line: &str) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if OR_LINE.is_match(line) {
        return LineKind::OrSeparator;
    }
    if let Some(captures) = OPTION_LINE.captures(line) {
        return LineKind::Option(captures[2].to_string());
    }
    if REPLY_LINE.is_match(line) {
        return LineKind::ReplyInstruction;
    }
    LineKind::Other(line.trim().to_string())
}

/// Byte offset of the line that opens the follow-up block, if present.
///
/// Shared with the tier policy engine so both components agree on where
/// the untouchable block begins.
pub fn find_followup_start(text: &str) -> Option<usize> {
    let matched = OPENING_PHRASE.find(text)?;
    Some(
        text[..matched.start()]
            .rfind('\n')
            .map(|idx| idx + 1)
            .unwrap_or(0),
    )
}

/// Rewrite the trailing follow-up block into canonical shape.
///
/// Returns the input unchanged when no opening phrase is found, or when the
/// trailing section does not contain two recognizable options; a block is
/// never fabricated.
pub fn sanitize(text: &str) -> String {
    let Some(start) = find_followup_start(text) else {
        return text.to_string();
    };

    let (head, block) = text.split_at(start);
    match rewrite_block(block) {
        Some(rewritten) => format!("{}{}", head, rewritten),
        None => text.to_string(),
    }
}

fn rewrite_block(block: &str) -> Option<String> {
    let mut lines = block.lines();
    let opening = lines.next()?;

    let mut options: Vec<String> = Vec::new();
    for line in lines {
        match classify_line(line) {
            LineKind::Option(text) => {
                if options.len() < 2 {
                    options.push(text);
                }
            }
            LineKind::Other(text) => {
                // A wrapped option continues on the next line. Text before
                // the first option has nothing to attach to and is dropped.
                if let Some(current) = options.last_mut() {
                    current.push(' ');
                    current.push_str(&text);
                }
            }
            LineKind::OrSeparator | LineKind::ReplyInstruction | LineKind::Blank => {}
        }
    }

    if options.len() != 2 {
        return None;
    }

    Some(format!(
        "{}\na) {}\nor\nb) {}\n{}",
        opening.trim_end(),
        normalize_option(&options[0]),
        normalize_option(&options[1]),
        CONFIRM_LINE
    ))
}

/// Strip emphasis, capitalize the first letter, and end with exactly one
/// question mark.
fn normalize_option(text: &str) -> String {
    let stripped = EMPHASIS.replace_all(text, "");
    let trimmed = stripped
        .trim()
        .trim_end_matches(|c: char| matches!(c, '?' | '.' | '!' | '…'))
        .trim_end();

    let mut chars = trimmed.chars();
    let mut normalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    normalized.push('?');
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_example() {
        let input = "• Check X\n• Check Y\nWould u also like to know\nq1) what is A\nor\nq2) what is B";
        let expected = "• Check X\n• Check Y\nWould u also like to know\na) What is A?\nor\nb) What is B?\nReply a or b to confirm.";
        assert_eq!(sanitize(input), expected);
    }

    #[test]
    fn test_numeric_markers() {
        let input = "Answer here.\nWould you also like to know\n1) first thing\n2) second thing";
        let output = sanitize(input);
        assert!(output.contains("a) First thing?"));
        assert!(output.contains("b) Second thing?"));
        assert!(output.ends_with(CONFIRM_LINE));
    }

    #[test]
    fn test_parenthesized_and_bold_markers() {
        let input = "Answer.\nWould you like to know\n**(1)** pump curves\n**(2)** bowl assembly";
        let output = sanitize(input);
        assert!(output.contains("a) Pump curves?"));
        assert!(output.contains("b) Bowl assembly?"));
    }

    #[test]
    fn test_emphasis_stripped_inside_options() {
        let input = "Answer.\nWould you also like to know\na) the **exact** torque values\nb) the _inspection_ interval";
        let output = sanitize(input);
        assert!(output.contains("a) The exact torque values?"));
        assert!(output.contains("b) The inspection interval?"));
    }

    #[test]
    fn test_duplicate_terminal_punctuation_collapsed() {
        let input = "Answer.\nWould you also like to know\na) what is A??\nb) what is B.";
        let output = sanitize(input);
        assert!(output.contains("a) What is A?"));
        assert!(!output.contains("A??"));
        assert!(output.contains("b) What is B?"));
    }

    #[test]
    fn test_reply_variant_replaced_with_canonical_line() {
        let input = "Answer.\nWould you also like to know\n1) one thing\n2) another thing\nPlease reply with 1 or 2 to continue";
        let output = sanitize(input);
        assert!(output.ends_with(CONFIRM_LINE));
        assert!(!output.contains("1 or 2"));
    }

    #[test]
    fn test_or_separator_sits_alone() {
        let input = "Answer.\nWould you also like to know\n1) one\n**or**\n2) two";
        let output = sanitize(input);
        assert!(output.contains("?\nor\nb)"));
    }

    #[test]
    fn test_answer_prefix_untouched() {
        let head = "• Keep **this** exactly as it came\n• q1) even this line\n";
        let input = format!("{}Would you also like to know\n1) one\n2) two", head);
        let output = sanitize(&input);
        assert!(output.starts_with(head));
    }

    #[test]
    fn test_no_opening_phrase_passes_through() {
        let input = "Just an answer.\n1) looks like an option\n2) but no opening phrase";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_opening_phrase_without_options_passes_through() {
        let input = "Answer.\nWould you also like to know more about this topic next time?";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_single_option_passes_through() {
        let input = "Answer.\nWould you also like to know\n1) only one option";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_wrapped_option_joined() {
        let input =
            "Answer.\nWould you also like to know\n1) the rated capacity\nof the fire pump\n2) the test interval";
        let output = sanitize(input);
        assert!(output.contains("a) The rated capacity of the fire pump?"));
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "• Check X\nWould u also like to know\nq1) what is A\nor\nq2) what is B",
            "Answer.\nWould you also like to know\n**1)** bold option\n2) plain option.\nChoose 1/2",
            "No block here at all.",
        ];
        for input in inputs {
            let once = sanitize(input);
            let twice = sanitize(&once);
            assert_eq!(once, twice, "not idempotent for: {}", input);
        }
    }

    #[test]
    fn test_find_followup_start_at_line_boundary() {
        let text = "line one\nWould you also like to know\na) x?\nor\nb) y?";
        let start = find_followup_start(text).unwrap();
        assert_eq!(&text[..start], "line one\n");
        assert!(text[start..].starts_with("Would you"));
    }

    #[test]
    fn test_find_followup_start_absent() {
        assert_eq!(find_followup_start("plain answer"), None);
    }

    #[test]
    fn test_classify_line_rules() {
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("or"), LineKind::OrSeparator);
        assert_eq!(classify_line("OR."), LineKind::OrSeparator);
        assert!(matches!(classify_line("q2) text"), LineKind::Option(_)));
        assert!(matches!(classify_line("(1) text"), LineKind::Option(_)));
        assert!(matches!(classify_line("b. text"), LineKind::Option(_)));
        assert_eq!(
            classify_line("Reply a or b to confirm."),
            LineKind::ReplyInstruction
        );
        assert_eq!(
            classify_line("Type 1 or 2 to choose"),
            LineKind::ReplyInstruction
        );
        assert!(matches!(classify_line("free text"), LineKind::Other(_)));
    }
}
