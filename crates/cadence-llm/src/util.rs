//! Shared helpers for provider implementations

/// Minimum key length to display partial key
const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 8;

/// Number of characters to show at start/end of masked key
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Longest provider error passed through verbatim
const MAX_PASSTHROUGH_ERROR_LEN: usize = 200;

/// Sensitive patterns to filter from error messages
const SENSITIVE_PATTERNS: &[&str] = &[
    "api_key",
    "api-key",
    "apikey",
    "authorization",
    "bearer",
    "token",
    "secret",
    "password",
    "sk-",
];

/// Mask API key for safe display in logs
///
/// # Examples
/// ```
/// use cadence_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("sk-1234567890abcdef"), "sk-1...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY || !key.is_ascii() {
        return "****".to_string();
    }
    format!(
        "{}...{}",
        &key[..KEY_MASK_VISIBLE_CHARS],
        &key[key.len() - KEY_MASK_VISIBLE_CHARS..]
    )
}

/// Reduce a provider error body to something safe to log and return
#[must_use]
pub fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("invalid key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
        || lower.contains("incorrect api key")
    {
        return "API authentication error. Please check CADENCE_LLM_API_KEY.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") {
        return "LLM provider rate limit exceeded. Please wait.".to_string();
    }

    if SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return "An API error occurred. Please try again.".to_string();
    }

    if error.len() <= MAX_PASSTHROUGH_ERROR_LEN {
        return error.to_string();
    }

    "An API error occurred. Please try again.".to_string()
}
