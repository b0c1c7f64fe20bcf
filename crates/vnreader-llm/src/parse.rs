//! Model output post-processing

use std::sync::LazyLock;

use regex::Regex;

use crate::provider::Verification;

/// Verdict line prefix requested in the verification prompt
pub const RESULT_MARKER: &str = "RESULT:";
/// Correction line prefix requested in the verification prompt
pub const CORRECTION_MARKER: &str = "CORRECTION:";

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(（](.+?)[)）]").expect("valid parenthesis pattern"));

static VERDICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\W*RESULT\W*[:：]\W*(OK|NG)\b").expect("valid verdict pattern")
});

static CORRECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\W*CORRECTION\W*[:：][ \t]*(.+?)[ \t]*$").expect("valid correction pattern")
});

/// Models sometimes answer `食(た)べる`; convert to `食[た]べる`
pub fn normalize_brackets(text: &str) -> String {
    PARENTHESIZED.replace_all(text, "[$1]").into_owned()
}

/// Clean a generated annotated reading
pub fn clean_reading(response: &str) -> String {
    normalize_brackets(strip_code_fence(response).trim())
        .trim()
        .to_string()
}

/// Clean free-form generated text
pub fn clean_text(response: &str) -> String {
    strip_code_fence(response).trim().to_string()
}

/// Interpret a verification answer
pub fn parse_verification(response: &str) -> Verification {
    let is_correct = VERDICT
        .captures(response)
        .and_then(|c| c.get(1))
        .is_some_and(|m| m.as_str().eq_ignore_ascii_case("ok"));

    let corrected_reading = CORRECTION
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| {
            normalize_brackets(m.as_str().trim_matches(|c: char| matches!(c, '*' | '`' | '"' | '「' | '」')))
        })
        .map(|s| s.trim().to_string())
        // Placeholders such as "none" or "N/A" carry no reading
        .filter(|s| !s.is_ascii());

    Verification {
        is_correct,
        corrected_reading,
        details: response.trim().to_string(),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop an info string such as ```text
    match inner.split_once('\n') {
        Some((first, rest)) if !first.trim().is_empty() && !first.contains('[') => rest,
        _ => inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_brackets() {
        assert_eq!(normalize_brackets("食(た)べる"), "食[た]べる");
        assert_eq!(normalize_brackets("今日（きょう）は"), "今日[きょう]は");
        assert_eq!(normalize_brackets("食[た]べる"), "食[た]べる");
    }

    #[test]
    fn test_clean_reading() {
        assert_eq!(clean_reading("  今日(きょう)は\n"), "今日[きょう]は");
        assert_eq!(clean_reading("```\n猫[ねこ]だ\n```"), "猫[ねこ]だ");
        assert_eq!(clean_reading("```text\n猫[ねこ]だ\n```"), "猫[ねこ]だ");
    }

    #[test]
    fn test_parse_verification_ok() {
        let v = parse_verification("RESULT: OK\nAll readings are standard.");
        assert!(v.is_correct);
        assert_eq!(v.corrected_reading, None);
    }

    #[test]
    fn test_parse_verification_ng_with_correction() {
        let v = parse_verification(
            "**RESULT: NG**\nCORRECTION: 今日(きょう)は学校[がっこう]\nThe first word is read きょう.",
        );
        assert!(!v.is_correct);
        assert_eq!(v.corrected_reading.as_deref(), Some("今日[きょう]は学校[がっこう]"));
    }

    #[test]
    fn test_parse_verification_placeholder_correction() {
        let v = parse_verification("RESULT: OK\nCORRECTION: (none)");
        assert!(v.is_correct);
        assert!(v.corrected_reading.is_none());
    }

    #[test]
    fn test_parse_verification_garbage() {
        let v = parse_verification("I cannot help with that.");
        assert!(!v.is_correct);
        assert!(v.corrected_reading.is_none());
    }
}
