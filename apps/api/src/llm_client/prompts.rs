// Shared prompt fragments used by the network clients themselves.
// Generation prompts live in `crate::prompting`.

/// System prompt for the drafting model. JSON is enforced only when asked for.
pub const DRAFTER_SYSTEM: &str = "You are a precise, structured assistant. \
    When the request asks for JSON, respond with valid JSON only. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for free-form analysis calls.
pub const ANALYST_SYSTEM: &str = "You are a senior engineering career coach. \
    Answer concisely in Korean. Plain text only.";

/// Throwaway prompt sent by `ModelClient::health_check`.
pub const HEALTH_CHECK_PROMPT: &str = "안녕하세요. 간단한 테스트입니다.";
