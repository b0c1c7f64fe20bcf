//! Prompt templates for sentence processing

use vnreader_core::DictionaryHint;

use crate::parse::{CORRECTION_MARKER, RESULT_MARKER};
use crate::provider::{PromptContext, SentenceRequest};

/// Build furigana generation prompt
pub fn build_reading_prompt(request: &SentenceRequest, context: &PromptContext) -> String {
    let (dict_section, example_section, dict_rule) = match request.hints.first() {
        Some(example) => (
            format!(
                "## DICTIONARY WORDS FOUND IN THIS SENTENCE (CRITICAL)\n\n{}\n\n",
                hint_lines(&request.hints, |h| format!(
                    "- \"{}\" MUST be written as: {}[{}]",
                    h.word, h.word, h.reading
                ))
            ),
            format!(
                r#"## EXAMPLE (Follow this pattern)

Dictionary says: "{word}" → {reading}
Input: 「{word}は重要だ」
Correct output: 「{word}[{reading}]は重要[じゅうよう]だ」

"#,
                word = example.word,
                reading = example.reading,
            ),
            "For dictionary words above: copy the EXACT format shown (word[reading]).".to_string(),
        ),
        None => (
            String::new(),
            String::new(),
            format!("Add readings based on context{}.", context_suffix(context)),
        ),
    };

    format!(
        r#"## SENTENCE TO PROCESS

{expression}

{dict_section}{example_section}## TASK

Add furigana to the kanji in the sentence above.

## RULES

1. {dict_rule}
2. Format: kanji[reading]. Example: 食[た]べる
3. Compound kanji: 今日[きょう]
4. Keep hiragana/katakana unchanged.
5. Output ONLY the result.

## OUTPUT:"#,
        expression = request.expression,
    )
}

/// Build translation prompt
pub fn build_meaning_prompt(request: &SentenceRequest, context: &PromptContext) -> String {
    let dict_section = if request.hints.is_empty() {
        String::new()
    } else {
        format!(
            "## PROPER NOUNS IN THIS SENTENCE\n\n{}\n\n",
            hint_lines(&request.hints, |h| format!("- {} (reading: {})", h.word, h.reading))
        )
    };

    format!(
        r#"## SENTENCE TO TRANSLATE

{expression}

{dict_section}## TASK

Translate the sentence above into natural {language}.

## RULES

1. Context: {work}. Maintain tone and mood.
2. Use natural, fluent {language}. Avoid literal translations.
3. Preserve emotional nuance.
4. Output ONLY the translation. No explanations.

## OUTPUT ({language} translation only):"#,
        expression = request.expression,
        language = context.translation_language,
        work = work_description(context),
    )
}

/// Build explanation prompt
pub fn build_explanation_prompt(request: &SentenceRequest, context: &PromptContext) -> String {
    let (dict_section, reading_rule) = if request.hints.is_empty() {
        (String::new(), "")
    } else {
        (
            format!(
                "## DICTIONARY WORDS IN THIS SENTENCE (USE THESE EXACT READINGS)\n\n{}\n\n",
                hint_lines(&request.hints, |h| format!(
                    "- \"{}\" MUST use reading: {}",
                    h.word, h.reading
                ))
            ),
            " Use dictionary readings above for marked words.",
        )
    };

    format!(
        r#"## SENTENCE TO EXPLAIN

{expression}

{dict_section}## TASK

Explain this Japanese sentence for learners. Write everything in {language}.

## OUTPUT FORMAT (Do NOT use markdown ** formatting)

[Sentence] (copy the original sentence)
[Reading] (add furigana in brackets [].{reading_rule})
[Translation] ({language} translation)
[Grammar] (1-2 key grammar points, briefly)
[Vocabulary] (2-3 important words with reading and meaning)

## CONTEXT: {work}

## OUTPUT:"#,
        expression = request.expression,
        language = context.translation_language,
        work = work_description(context),
    )
}

/// Build reading verification prompt
pub fn build_verification_prompt(
    request: &SentenceRequest,
    existing_reading: &str,
    context: &PromptContext,
) -> String {
    let (dict_section, dict_rule) = if request.hints.is_empty() {
        (String::new(), "Check standard Japanese reading accuracy.")
    } else {
        (
            format!(
                r#"## DICTIONARY WORDS IN THIS SENTENCE (ALWAYS CORRECT)

These readings are user-defined and MUST be considered correct:

{}

"#,
                hint_lines(&request.hints, |h| format!("- \"{}\" → {}", h.word, h.reading))
            ),
            "Dictionary words above are ALWAYS correct. Do not mark them as errors.",
        )
    };

    format!(
        r#"## INPUT TO VERIFY

Original: {expression}
Reading: {existing_reading}

{dict_section}## TASK

Verify if the reading above is correct. Explain in {language}.

## RULES

1. {dict_rule}
2. Consider context: {work}.
3. Use brackets [] only, never parentheses () or markdown **.

## OUTPUT FORMAT

Line 1: "{RESULT_MARKER} OK" or "{RESULT_MARKER} NG"
Line 2 (if NG): "{CORRECTION_MARKER} <full corrected reading>"
Line 3+: Brief explanation

## YOUR VERIFICATION:"#,
        expression = request.expression,
        language = context.translation_language,
        work = work_description(context),
    )
}

fn hint_lines(hints: &[DictionaryHint], line: impl Fn(&DictionaryHint) -> String) -> String {
    hints.iter().map(line).collect::<Vec<_>>().join("\n")
}

fn work_description(context: &PromptContext) -> &str {
    match context.work_context.as_deref() {
        Some(work) if !work.trim().is_empty() => work,
        _ => "a Japanese visual novel",
    }
}

fn context_suffix(context: &PromptContext) -> String {
    format!(" ({})", work_description(context))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(word: &str, reading: &str) -> DictionaryHint {
        DictionaryHint {
            word: word.to_string(),
            reading: reading.to_string(),
        }
    }

    #[test]
    fn test_reading_prompt_with_hints() {
        let request = SentenceRequest::new("この世界線は", vec![hint("世界線", "せかいせん")]);
        let prompt = build_reading_prompt(&request, &PromptContext::default());

        assert!(prompt.contains("この世界線は"));
        assert!(prompt.contains("世界線[せかいせん]"));
        assert!(prompt.contains("EXAMPLE"));
    }

    #[test]
    fn test_reading_prompt_without_hints() {
        let request = SentenceRequest::new("今日は学校に行く", vec![]);
        let context = PromptContext {
            work_context: Some("Steins;Gate visual novel".to_string()),
            ..Default::default()
        };
        let prompt = build_reading_prompt(&request, &context);

        assert!(!prompt.contains("DICTIONARY"));
        assert!(prompt.contains("Steins;Gate visual novel"));
    }

    #[test]
    fn test_meaning_prompt_uses_language() {
        let request = SentenceRequest::new("猫だ", vec![]);
        let context = PromptContext {
            translation_language: "English".to_string(),
            work_context: None,
        };
        let prompt = build_meaning_prompt(&request, &context);

        assert!(prompt.contains("natural English"));
        assert!(prompt.contains("a Japanese visual novel"));
    }

    #[test]
    fn test_verification_prompt_markers() {
        let request = SentenceRequest::new("猫だ", vec![hint("猫", "ねこ")]);
        let prompt = build_verification_prompt(&request, "猫[ねこ]だ", &PromptContext::default());

        assert!(prompt.contains("Reading: 猫[ねこ]だ"));
        assert!(prompt.contains(RESULT_MARKER));
        assert!(prompt.contains(CORRECTION_MARKER));
        assert!(prompt.contains("ALWAYS CORRECT"));
    }
}
