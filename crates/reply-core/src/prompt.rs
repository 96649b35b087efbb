//! Provider-agnostic prompt composition.
//!
//! Every adapter receives the same [`ComposedPrompt`]; the instruction block
//! encodes the two format contracts the output sanitizer later enforces:
//! a short bulleted answer and the trailing two-option follow-up block.

use sha2::{Digest, Sha256};

use crate::request::{ChatTurn, GenerationRequest};

/// Default bound on injected dynamic rule text, in characters.
pub const DEFAULT_MAX_RULES_CHARS: usize = 600;

/// The instruction payload shared by all provider adapters.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    /// System-level instruction block.
    pub instructions: String,
    /// Prior conversation turns, oldest first.
    pub history: Vec<ChatTurn>,
    /// The current user message.
    pub message: String,
    /// SHA-256 fingerprint of the instruction block.
    pub fingerprint: String,
}

/// Builds the instruction payload for a request. Pure data transformation.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    max_rules_chars: usize,
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self {
            max_rules_chars: DEFAULT_MAX_RULES_CHARS,
        }
    }
}

impl PromptComposer {
    /// Create a composer with the default rule-text bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composer with a custom rule-text bound.
    pub fn with_max_rules_chars(max_rules_chars: usize) -> Self {
        Self { max_rules_chars }
    }

    /// Compose the instruction payload for a request.
    pub fn compose(&self, request: &GenerationRequest) -> ComposedPrompt {
        let mut instructions = String::with_capacity(1024);

        instructions.push_str(
            "You are Bosun, a maritime technical assistant for merchant vessel crews.\n",
        );
        instructions.push_str(&format!(
            "The requester is a {} aboard a {}. The question falls under the \"{}\" category.\n",
            request.profile.rank, request.profile.vessel, request.category
        ));
        instructions.push_str(request.language.instruction());
        instructions.push('\n');

        instructions.push_str(
            "\nGive a short technical answer as 3 to 5 bullet points. \
             Each bullet covers one practical step or fact and stays under 25 words.\n",
        );

        if let Some(rules) = request.active_rules.as_deref() {
            let rules = truncate_chars(rules.trim(), self.max_rules_chars);
            if !rules.is_empty() {
                instructions.push_str("\nShip rules currently in effect, follow them where relevant:\n");
                instructions.push_str(rules);
                instructions.push('\n');
            }
        }

        instructions.push_str(
            "\nAfter the bullets, always close with exactly this follow-up shape:\n\
             Would you also like to know\n\
             a) <first deepening question>?\n\
             or\n\
             b) <second deepening question>?\n\
             Reply a or b to confirm.\n",
        );

        let fingerprint = hash_prompt(&instructions);

        ComposedPrompt {
            instructions,
            history: request.history.clone(),
            message: request.message.clone(),
            fingerprint,
        }
    }
}

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Truncate to at most `max` characters on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
