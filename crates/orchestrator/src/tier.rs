//! Tier policy engine.
//!
//! Resolves a requester to the unrestricted or rate-limited tier and, for
//! rate-limited requesters, enforces a word budget without breaking the
//! sanitized follow-up block. The resolution precedence is fixed: admin
//! flag, then allowlist membership, then the explicit premium signal, then
//! the billing oracle, then default deny. The allowlist always wins over a
//! non-premium oracle answer because it is checked first.

use std::collections::HashSet;
use std::env;
use std::sync::Arc;

use reply_core::SeafarerProfile;
use tracing::{debug, warn};

use crate::oracle::PremiumOracle;
use crate::sanitizer;

/// Word-budget bounds for rate-limited content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    /// Floor for the truncated answer portion, in words.
    pub min_words: usize,
    /// Budget for rate-limited content, in words.
    pub max_words: usize,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            min_words: 20,
            max_words: 120,
        }
    }
}

impl TierLimits {
    /// Create validated limits. Both bounds must be positive and
    /// `min_words <= max_words`.
    pub fn new(min_words: usize, max_words: usize) -> Option<Self> {
        if min_words == 0 || max_words == 0 || min_words > max_words {
            return None;
        }
        Some(Self {
            min_words,
            max_words,
        })
    }

    /// Read limits from `TIER_MIN_WORDS` / `TIER_MAX_WORDS`.
    ///
    /// The configuration is external and mutable; an invalid combination
    /// falls back to the defaults with a warning rather than failing the
    /// delivery path.
    pub fn from_env() -> Self {
        let min_words = env::var("TIER_MIN_WORDS").ok().and_then(|v| v.parse().ok());
        let max_words = env::var("TIER_MAX_WORDS").ok().and_then(|v| v.parse().ok());

        let defaults = Self::default();
        let candidate = Self::new(
            min_words.unwrap_or(defaults.min_words),
            max_words.unwrap_or(defaults.max_words),
        );

        match candidate {
            Some(limits) => limits,
            None => {
                warn!(?min_words, ?max_words, "Invalid tier limits, using defaults");
                defaults
            }
        }
    }
}

/// The resolved content tier for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Content passes through unmodified.
    Unrestricted,
    /// Content is held to the configured word budget.
    RateLimited,
}

/// Resolves tiers and applies the rate-limited word budget.
pub struct TierPolicy {
    limits: TierLimits,
    allowlist: HashSet<String>,
    oracle: Option<Arc<dyn PremiumOracle>>,
}

impl TierPolicy {
    /// Create a policy with the given limits, no allowlist, and no oracle.
    pub fn new(limits: TierLimits) -> Self {
        Self {
            limits,
            allowlist: HashSet::new(),
            oracle: None,
        }
    }

    /// Set the static allowlist of unrestricted identity keys.
    pub fn with_allowlist<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowlist = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the premium oracle.
    pub fn with_oracle(mut self, oracle: Arc<dyn PremiumOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Build the policy from environment configuration.
    ///
    /// `UNRESTRICTED_KEYS` is a comma-separated list of identity keys.
    pub fn from_env(oracle: Option<Arc<dyn PremiumOracle>>) -> Self {
        let allowlist: HashSet<String> = env::var("UNRESTRICTED_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|key| !key.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            limits: TierLimits::from_env(),
            allowlist,
            oracle,
        }
    }

    /// The configured limits.
    pub fn limits(&self) -> &TierLimits {
        &self.limits
    }

    /// Resolve a requester to a tier.
    ///
    /// Checks run in order until one is decisive; an oracle failure is
    /// absorbed here and resolution continues to the rate-limited default.
    pub async fn resolve(&self, profile: &SeafarerProfile) -> Tier {
        if profile.admin {
            return Tier::Unrestricted;
        }

        let key = profile.key.trim();
        if key.is_empty() {
            // No identity: fail closed.
            return Tier::RateLimited;
        }

        if self.allowlist.contains(key) {
            return Tier::Unrestricted;
        }

        if profile.premium {
            return Tier::Unrestricted;
        }

        if let Some(oracle) = &self.oracle {
            match oracle.is_premium(key).await {
                Ok(Some(true)) => return Tier::Unrestricted,
                Ok(Some(false)) => return Tier::RateLimited,
                Ok(None) => {}
                Err(err) => {
                    warn!(requester = %key, error = %err, "Oracle failed, treating as rate-limited");
                }
            }
        }

        Tier::RateLimited
    }

    /// Apply the tier to sanitized content.
    pub fn apply(&self, content: &str, tier: Tier) -> String {
        match tier {
            Tier::Unrestricted => content.to_string(),
            Tier::RateLimited => enforce_word_budget(content, &self.limits),
        }
    }
}

/// Truncate content to the word budget while keeping a follow-up block,
/// if present, byte-identical.
///
/// When the content exceeds the budget and carries a block, only the answer
/// portion above the block is truncated, to the budget minus the block
/// length, floored at `min_words` so the answer never degenerates to
/// nothing. The cut lands on a word boundary and is closed with sentence
/// punctuation.
pub fn enforce_word_budget(content: &str, limits: &TierLimits) -> String {
    if count_words(content) <= limits.max_words {
        return content.to_string();
    }

    match sanitizer::find_followup_start(content) {
        Some(0) => {
            // The whole content is the block; keeping it intact outranks
            // the budget.
            content.to_string()
        }
        Some(start) => {
            let (answer, block) = content.split_at(start);
            let block_words = count_words(block);
            let answer_budget = limits
                .max_words
                .saturating_sub(block_words)
                .max(limits.min_words);
            let truncated = close_sentence(truncate_to_words(answer, answer_budget));
            debug!(
                answer_budget,
                block_words, "Truncated rate-limited answer above follow-up block"
            );
            format!("{}\n{}", truncated, block)
        }
        None => close_sentence(truncate_to_words(content, limits.max_words)),
    }
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Slice off everything after the first `max_words` words, preserving the
/// original formatting of what remains.
fn truncate_to_words(text: &str, max_words: usize) -> &str {
    let mut words = 0;
    let mut in_word = false;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_word {
                words += 1;
                in_word = false;
                if words == max_words {
                    return &text[..idx];
                }
            }
        } else {
            in_word = true;
        }
    }
    text
}

/// Drop dangling punctuation from a cut and end with a sentence mark.
fn close_sentence(text: &str) -> String {
    let trimmed = text
        .trim_end()
        .trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '-' | '(' | '"'))
        .trim_end();

    let mut closed = trimmed.to_string();
    match closed.chars().last() {
        Some('.') | Some('!') | Some('?') => {}
        _ => closed.push('.'),
    }
    closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{FailingOracle, StaticOracle};
    use crate::sanitizer::sanitize;

    fn profile(key: &str) -> SeafarerProfile {
        SeafarerProfile::new(key, "Third Engineer", "Oil Tanker")
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn test_admin_is_unrestricted() {
        let policy = TierPolicy::new(TierLimits::default());
        let mut profile = profile("usr-1");
        profile.admin = true;
        assert_eq!(policy.resolve(&profile).await, Tier::Unrestricted);
    }

    #[tokio::test]
    async fn test_allowlist_is_unrestricted() {
        let policy = TierPolicy::new(TierLimits::default()).with_allowlist(["usr-1"]);
        assert_eq!(policy.resolve(&profile("usr-1")).await, Tier::Unrestricted);
        assert_eq!(policy.resolve(&profile("usr-2")).await, Tier::RateLimited);
    }

    #[tokio::test]
    async fn test_allowlist_wins_over_non_premium_oracle() {
        let policy = TierPolicy::new(TierLimits::default())
            .with_allowlist(["usr-1"])
            .with_oracle(Arc::new(StaticOracle::default()));
        assert_eq!(policy.resolve(&profile("usr-1")).await, Tier::Unrestricted);
    }

    #[tokio::test]
    async fn test_premium_flag_is_unrestricted() {
        let policy = TierPolicy::new(TierLimits::default());
        let mut profile = profile("usr-1");
        profile.premium = true;
        assert_eq!(policy.resolve(&profile).await, Tier::Unrestricted);
    }

    #[tokio::test]
    async fn test_oracle_confirms_premium() {
        let policy = TierPolicy::new(TierLimits::default())
            .with_oracle(Arc::new(StaticOracle::new(["usr-1"])));
        assert_eq!(policy.resolve(&profile("usr-1")).await, Tier::Unrestricted);
        assert_eq!(policy.resolve(&profile("usr-2")).await, Tier::RateLimited);
    }

    #[tokio::test]
    async fn test_oracle_failure_fails_closed() {
        let policy =
            TierPolicy::new(TierLimits::default()).with_oracle(Arc::new(FailingOracle));
        assert_eq!(policy.resolve(&profile("usr-1")).await, Tier::RateLimited);
    }

    #[tokio::test]
    async fn test_missing_identity_fails_closed() {
        let policy = TierPolicy::new(TierLimits::default())
            .with_oracle(Arc::new(StaticOracle::new(["  "])));
        assert_eq!(policy.resolve(&profile("  ")).await, Tier::RateLimited);
    }

    #[tokio::test]
    async fn test_no_oracle_defaults_to_rate_limited() {
        let policy = TierPolicy::new(TierLimits::default());
        assert_eq!(policy.resolve(&profile("usr-1")).await, Tier::RateLimited);
    }

    #[test]
    fn test_unrestricted_apply_is_noop() {
        let policy = TierPolicy::new(TierLimits::new(5, 10).unwrap());
        let content = words(500);
        assert_eq!(policy.apply(&content, Tier::Unrestricted), content);
    }

    #[test]
    fn test_within_budget_unchanged() {
        let limits = TierLimits::new(10, 60).unwrap();
        let content = words(40);
        assert_eq!(enforce_word_budget(&content, &limits), content);
    }

    #[test]
    fn test_truncates_without_block() {
        let limits = TierLimits::new(10, 60).unwrap();
        let output = enforce_word_budget(&words(100), &limits);
        assert!(count_words(&output) <= 60);
        assert!(output.ends_with('.'));
    }

    #[test]
    fn test_block_preserved_byte_identical() {
        let limits = TierLimits::new(15, 60).unwrap();
        let block = "Would you also like to know\na) What is the pump curve?\nor\nb) What does wear pattern mean?\nReply a or b to confirm.";
        let content = format!("{}\n{}", words(120), block);
        assert_eq!(count_words(block), 25);

        let output = enforce_word_budget(&content, &limits);
        assert!(output.ends_with(block), "block was not preserved intact");

        let answer = &output[..output.len() - block.len()];
        assert!(count_words(answer) <= 35);
        assert!(count_words(&output) <= 60);
        assert!(answer.trim_end().ends_with('.'));
    }

    #[test]
    fn test_truncated_answer_floored_at_min_words() {
        // Budget 30 with a 25-word block leaves 5 words, below the floor
        // of 15; the floor wins over the strict budget.
        let limits = TierLimits::new(15, 30).unwrap();
        let block = "Would you also like to know\na) What is the pump curve?\nor\nb) What does wear pattern mean?\nReply a or b to confirm.";
        let content = format!("{}\n{}", words(120), block);

        let output = enforce_word_budget(&content, &limits);
        let answer = &output[..output.len() - block.len()];
        assert_eq!(count_words(answer), 15);
    }

    #[test]
    fn test_truncation_after_sanitization_keeps_canonical_block() {
        let limits = TierLimits::new(10, 40).unwrap();
        let raw = format!(
            "{}\nWould u also like to know\nq1) what is A\nor\nq2) what is B",
            words(80)
        );
        let sanitized = sanitize(&raw);
        let output = enforce_word_budget(&sanitized, &limits);
        assert!(output.contains("a) What is A?"));
        assert!(output.contains("b) What is B?"));
        assert!(output.ends_with("Reply a or b to confirm."));
    }

    #[test]
    fn test_limits_validation() {
        assert!(TierLimits::new(0, 10).is_none());
        assert!(TierLimits::new(10, 0).is_none());
        assert!(TierLimits::new(20, 10).is_none());
        assert!(TierLimits::new(10, 10).is_some());
    }

    #[test]
    fn test_close_sentence_cleans_dangling_punctuation() {
        assert_eq!(close_sentence("check the filter,"), "check the filter.");
        assert_eq!(close_sentence("check the filter"), "check the filter.");
        assert_eq!(close_sentence("check the filter!"), "check the filter!");
    }
}
