//! End-to-end cascade behavior over mock providers.

use std::sync::Arc;
use std::time::Duration;

use mock_provider::{EmptyProvider, FailingProvider, ScriptedProvider, SlowProvider};
use orchestrator::{
    ProviderRegistry, ReplyOrchestrator, TierLimits, TierPolicy, CONFIRM_LINE,
    EMPTY_CONTENT_ANSWERS, STATIC_FALLBACKS,
};
use reply_core::{GenerationRequest, ProviderId, SeafarerProfile};

fn profile() -> SeafarerProfile {
    SeafarerProfile::new("usr-1", "Third Engineer", "Oil Tanker")
}

fn request() -> GenerationRequest {
    GenerationRequest::builder("Why is the purifier vibrating?", "engine", profile()).build()
}

fn orchestrator(registry: ProviderRegistry) -> ReplyOrchestrator {
    ReplyOrchestrator::new(registry, TierPolicy::new(TierLimits::default()))
}

#[tokio::test]
async fn unconfigured_preference_skips_to_next_available() {
    let groq = Arc::new(ScriptedProvider::new(ProviderId::Groq, "groq answer"));
    let registry = ProviderRegistry::new().with_provider(groq.clone());

    let request = GenerationRequest::builder("q", "engine", profile())
        .preferred(ProviderId::OpenAi)
        .build();

    let result = orchestrator(registry).process(request).await.unwrap();

    assert_eq!(result.provider, ProviderId::Groq);
    assert_eq!(result.content, "groq answer");
    assert_eq!(groq.calls(), 1);
}

#[tokio::test]
async fn failure_follows_the_failed_providers_rescue_order() {
    // OpenAI fails; its rescue order starts with Gemini, so Groq must not
    // be contacted even though it is configured.
    let openai = Arc::new(FailingProvider::new(ProviderId::OpenAi));
    let gemini = Arc::new(ScriptedProvider::new(ProviderId::Gemini, "gemini answer"));
    let groq = Arc::new(ScriptedProvider::new(ProviderId::Groq, "groq answer"));
    let registry = ProviderRegistry::new()
        .with_provider(openai.clone())
        .with_provider(gemini.clone())
        .with_provider(groq.clone());

    let result = orchestrator(registry).process(request()).await.unwrap();

    assert_eq!(result.provider, ProviderId::Gemini);
    assert_eq!(openai.calls(), 1);
    assert_eq!(gemini.calls(), 1);
    assert_eq!(groq.calls(), 0);
}

#[tokio::test]
async fn total_outage_returns_static_fallback_without_error() {
    let openai = Arc::new(FailingProvider::new(ProviderId::OpenAi));
    let gemini = Arc::new(FailingProvider::new(ProviderId::Gemini));
    let groq = Arc::new(FailingProvider::new(ProviderId::Groq));
    let cohere = Arc::new(FailingProvider::new(ProviderId::Cohere));
    let registry = ProviderRegistry::new()
        .with_provider(openai.clone())
        .with_provider(gemini.clone())
        .with_provider(groq.clone())
        .with_provider(cohere.clone());

    let result = orchestrator(registry).process(request()).await.unwrap();

    assert_eq!(result.provider, ProviderId::Fallback);
    assert!(result.tokens_used.is_none());
    assert!(STATIC_FALLBACKS.contains(&result.content.as_str()));

    // Every provider tried exactly once, never retried.
    assert_eq!(openai.calls(), 1);
    assert_eq!(gemini.calls(), 1);
    assert_eq!(groq.calls(), 1);
    assert_eq!(cohere.calls(), 1);
}

#[tokio::test]
async fn empty_content_resolves_locally_without_advancing() {
    let openai = Arc::new(EmptyProvider::new(ProviderId::OpenAi));
    let gemini = Arc::new(ScriptedProvider::new(ProviderId::Gemini, "unused"));
    let registry = ProviderRegistry::new()
        .with_provider(openai.clone())
        .with_provider(gemini.clone());

    let result = orchestrator(registry).process(request()).await.unwrap();

    // Attributed to the provider that answered empty, not to a fallback.
    assert_eq!(result.provider, ProviderId::OpenAi);
    assert!(EMPTY_CONTENT_ANSWERS.contains(&result.content.as_str()));
    assert_eq!(openai.calls(), 1);
    assert_eq!(gemini.calls(), 0);
}

#[tokio::test]
async fn slow_provider_times_out_and_cascades() {
    let openai = Arc::new(SlowProvider::new(
        ProviderId::OpenAi,
        Duration::from_millis(200),
        "too late",
    ));
    let gemini = Arc::new(ScriptedProvider::new(ProviderId::Gemini, "gemini answer"));
    let registry = ProviderRegistry::new()
        .with_provider(openai)
        .with_provider(gemini.clone());

    let result = orchestrator(registry)
        .with_call_timeout(Duration::from_millis(50))
        .process(request())
        .await
        .unwrap();

    assert_eq!(result.provider, ProviderId::Gemini);
    assert_eq!(result.content, "gemini answer");
}

#[tokio::test]
async fn raw_output_is_sanitized_end_to_end() {
    let raw = "• Check X\n• Check Y\nWould u also like to know\nq1) what is A\nor\nq2) what is B";
    let openai = Arc::new(ScriptedProvider::new(ProviderId::OpenAi, raw));
    let registry = ProviderRegistry::new().with_provider(openai);

    let result = orchestrator(registry).process(request()).await.unwrap();

    assert_eq!(
        result.content,
        "• Check X\n• Check Y\nWould u also like to know\na) What is A?\nor\nb) What is B?\nReply a or b to confirm."
    );
}

#[tokio::test]
async fn rate_limited_reply_is_truncated_with_block_intact() {
    let answer: String = (0..120)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let raw = format!(
        "{}\nWould you also like to know\n1) what is the pump curve\n2) what does wear pattern mean",
        answer
    );
    let openai = Arc::new(ScriptedProvider::new(ProviderId::OpenAi, raw));
    let registry = ProviderRegistry::new().with_provider(openai);

    let orchestrator = ReplyOrchestrator::new(
        registry,
        TierPolicy::new(TierLimits::new(15, 60).unwrap()),
    );
    let result = orchestrator.process(request()).await.unwrap();

    assert!(result.content.ends_with(CONFIRM_LINE));
    assert!(result.content.contains("a) What is the pump curve?"));
    assert!(result.content.split_whitespace().count() <= 60);
    assert!(!result.content.contains("word59"), "answer not truncated");
}

#[tokio::test]
async fn admin_requester_is_never_truncated() {
    let long_reply: String = (0..500)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let openai = Arc::new(ScriptedProvider::new(ProviderId::OpenAi, long_reply.clone()));
    let registry = ProviderRegistry::new().with_provider(openai);

    let mut admin = profile();
    admin.admin = true;
    let request = GenerationRequest::builder("q", "engine", admin).build();

    let orchestrator = ReplyOrchestrator::new(
        registry,
        TierPolicy::new(TierLimits::new(15, 60).unwrap()),
    );
    let result = orchestrator.process(request).await.unwrap();

    assert_eq!(result.content, long_reply);
}

#[tokio::test]
async fn tokens_reported_for_the_winning_provider_only() {
    let openai = Arc::new(FailingProvider::new(ProviderId::OpenAi));
    let gemini = Arc::new(ScriptedProvider::with_tokens(
        ProviderId::Gemini,
        "answer",
        321,
    ));
    let registry = ProviderRegistry::new()
        .with_provider(openai)
        .with_provider(gemini);

    let result = orchestrator(registry).process(request()).await.unwrap();

    assert_eq!(result.provider, ProviderId::Gemini);
    assert_eq!(result.tokens_used, Some(321));
}

#[tokio::test]
async fn tier_resolution_uses_allowlist() {
    let long_reply: String = (0..300)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ");
    let openai = Arc::new(ScriptedProvider::new(ProviderId::OpenAi, long_reply.clone()));
    let registry = ProviderRegistry::new().with_provider(openai);

    let orchestrator = ReplyOrchestrator::new(
        registry,
        TierPolicy::new(TierLimits::new(15, 60).unwrap()).with_allowlist(["usr-1"]),
    );
    let result = orchestrator.process(request()).await.unwrap();

    assert_eq!(result.content, long_reply);
}

#[tokio::test]
async fn tier_is_applied_even_on_the_static_fallback_path() {
    let registry = ProviderRegistry::new();
    let orchestrator = ReplyOrchestrator::new(
        registry,
        TierPolicy::new(TierLimits::new(5, 20).unwrap()),
    );

    let result = orchestrator.process(request()).await.unwrap();
    assert_eq!(result.provider, ProviderId::Fallback);
    assert!(result.content.split_whitespace().count() <= 20);
}
