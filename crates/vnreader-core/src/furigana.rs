//! Furigana parsing and display segmentation
//!
//! Readings are written inline as `kanji[reading]`, e.g. `食[た]べる`. Only a
//! run of kanji directly before the brackets receives the reading:
//!
//! ```text
//! 夏[なつ]の強烈[きょうれつ] -> 夏/なつ, の, 強烈/きょうれつ
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{Sentence, Token};

const KANJI_CLASS: &str = r"\u{4E00}-\u{9FFF}\u{3400}-\u{4DBF}\u{F900}-\u{FAFF}々";

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"([{KANJI_CLASS}]+)\[([^\]]+)\]")).expect("valid furigana pattern")
});

/// A displayable piece of text, optionally with a reading above it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSegment {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
}

impl AnnotatedSegment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reading: None,
        }
    }

    pub fn annotated(text: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reading: Some(reading.into()),
        }
    }

    /// Whether this segment is the forced line break marker
    pub fn is_line_break(&self) -> bool {
        self.reading.is_none() && self.text == "\n"
    }
}

/// Check if a character is a kanji
pub fn is_kanji(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '々')
}

/// Check if a string contains at least one kanji
pub fn contains_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Distinct kanji in order of first appearance
pub fn extract_kanji(text: &str) -> Vec<char> {
    let mut seen = Vec::new();
    for c in text.chars().filter(|c| is_kanji(*c)) {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}

/// Parse an annotated reading into segments in source order.
///
/// Text between annotations becomes plain segments; an unterminated `[` is
/// left in the plain text. Never produces empty segments.
pub fn parse_annotated(source: &str) -> Vec<AnnotatedSegment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in ANNOTATION.captures_iter(source) {
        let (Some(whole), Some(kanji), Some(reading)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        if whole.start() > last_end {
            segments.push(AnnotatedSegment::plain(&source[last_end..whole.start()]));
        }
        segments.push(AnnotatedSegment::annotated(kanji.as_str(), reading.as_str()));
        last_end = whole.end();
    }

    if last_end < source.len() {
        segments.push(AnnotatedSegment::plain(&source[last_end..]));
    }

    segments
}

/// Split plain segments into single characters so layout can wrap anywhere,
/// while annotated runs stay grouped under one reading.
pub fn expand_to_display_units(segments: Vec<AnnotatedSegment>) -> Vec<AnnotatedSegment> {
    let mut units = Vec::with_capacity(segments.len());
    for segment in segments {
        if segment.reading.is_some() {
            units.push(segment);
        } else {
            units.extend(segment.text.chars().map(|c| AnnotatedSegment::plain(c)));
        }
    }
    units
}

/// Display segments for one tokenizer token.
///
/// Inline brackets in the surface win. Otherwise a single plain segment takes
/// the token's separate reading when it differs from the surface and the
/// surface has kanji.
pub fn resolve_token_display(token: &Token) -> Vec<AnnotatedSegment> {
    let mut segments = parse_annotated(&token.surface);

    if let [only] = segments.as_mut_slice() {
        if only.reading.is_none() {
            if let Some(reading) = token.reading.as_deref() {
                if !reading.is_empty()
                    && reading != token.surface
                    && contains_kanji(&token.surface)
                {
                    only.reading = Some(reading.to_string());
                }
            }
        }
    }

    segments
}

/// Remove the `[reading]` groups that annotate kanji: `食[た]べる` -> `食べる`
pub fn strip_furigana(source: &str) -> String {
    ANNOTATION.replace_all(source, "$1").into_owned()
}

/// Full kana rendering: `食[た]べる` -> `たべる`
pub fn to_kana(source: &str) -> String {
    parse_annotated(source)
        .into_iter()
        .map(|s| s.reading.unwrap_or(s.text))
        .collect()
}

/// A token ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayToken {
    pub segments: Vec<AnnotatedSegment>,
    /// Dictionary lookup target for taps on this token
    pub lookup_key: String,
    pub line_break: bool,
}

/// How a sentence should be laid out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "units", rename_all = "snake_case")]
pub enum RenderPlan {
    /// Tokenizer data available, one entry per token
    Tokens(Vec<DisplayToken>),
    /// Character units from the annotated reading (or the bare expression)
    Legacy(Vec<AnnotatedSegment>),
}

/// Pick the render strategy for a sentence, preferring tokens
pub fn render_plan(sentence: &Sentence) -> RenderPlan {
    if !sentence.tokens.is_empty() {
        let tokens = sentence
            .tokens
            .iter()
            .map(|token| {
                if token.is_line_break() {
                    DisplayToken {
                        segments: vec![AnnotatedSegment::plain("\n")],
                        lookup_key: String::new(),
                        line_break: true,
                    }
                } else {
                    DisplayToken {
                        segments: resolve_token_display(token),
                        lookup_key: token.lookup_key().to_string(),
                        line_break: false,
                    }
                }
            })
            .collect();
        return RenderPlan::Tokens(tokens);
    }

    let source = sentence.existing_reading().unwrap_or(&sentence.expression);
    RenderPlan::Legacy(expand_to_display_units(parse_annotated(source)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat_text(segments: &[AnnotatedSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_parse_basic() {
        let segments = parse_annotated("食[た]べる");
        assert_eq!(
            segments,
            vec![
                AnnotatedSegment::annotated("食", "た"),
                AnnotatedSegment::plain("べる"),
            ]
        );
    }

    #[test]
    fn test_parse_only_kanji_before_brackets() {
        let segments = parse_annotated("夏[なつ]の強烈[きょうれつ]な日差[ひざ]し");
        assert_eq!(
            segments,
            vec![
                AnnotatedSegment::annotated("夏", "なつ"),
                AnnotatedSegment::plain("の"),
                AnnotatedSegment::annotated("強烈", "きょうれつ"),
                AnnotatedSegment::plain("な"),
                AnnotatedSegment::annotated("日差", "ひざ"),
                AnnotatedSegment::plain("し"),
            ]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_annotated("").is_empty());
    }

    #[test]
    fn test_parse_without_brackets_is_single_segment() {
        let source = "こんにちは、世界！";
        assert_eq!(parse_annotated(source), vec![AnnotatedSegment::plain(source)]);
    }

    #[test]
    fn test_parse_adjacent_groups() {
        let segments = parse_annotated("今日[きょう]学校[がっこう]");
        assert_eq!(
            segments,
            vec![
                AnnotatedSegment::annotated("今日", "きょう"),
                AnnotatedSegment::annotated("学校", "がっこう"),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_newline_in_plain_text() {
        let segments = parse_annotated("はい\n猫[ねこ]");
        assert_eq!(segments[0], AnnotatedSegment::plain("はい\n"));
        assert_eq!(segments[1], AnnotatedSegment::annotated("猫", "ねこ"));
    }

    #[test]
    fn test_parse_unterminated_bracket_is_plain() {
        let segments = parse_annotated("食[たべる");
        assert_eq!(segments, vec![AnnotatedSegment::plain("食[たべる")]);

        let segments = parse_annotated("猫[ねこ]と犬[いぬ");
        assert_eq!(
            segments,
            vec![
                AnnotatedSegment::annotated("猫", "ねこ"),
                AnnotatedSegment::plain("と犬[いぬ"),
            ]
        );
    }

    #[test]
    fn test_parse_brackets_after_kana_are_plain() {
        let segments = parse_annotated("ひらがな[かな]");
        assert_eq!(segments, vec![AnnotatedSegment::plain("ひらがな[かな]")]);
    }

    #[test]
    fn test_parse_coverage_and_reading_only_on_kanji() {
        let samples = [
            "今日[きょう]は学校[がっこう]に行[い]く",
            "「岡部[おかべ]！」\nエル・プサイ・コングルゥ",
            "々[のま]と佐々木[ささき]",
            "世界線[せかいせん]変動率[へんどうりつ]1.048596%",
        ];

        for source in samples {
            let segments = parse_annotated(source);
            assert_eq!(concat_text(&segments), strip_furigana(source), "{source}");
            for segment in &segments {
                assert!(!segment.text.is_empty());
                assert!(!segment.text.contains('['));
                if segment.reading.is_some() {
                    assert!(segment.text.chars().all(is_kanji), "{segment:?}");
                }
            }
        }
    }

    #[test]
    fn test_expand_splits_plain_and_keeps_groups() {
        let units = expand_to_display_units(parse_annotated("今日[きょう]はいい\n天気[てんき]"));
        assert_eq!(
            units,
            vec![
                AnnotatedSegment::annotated("今日", "きょう"),
                AnnotatedSegment::plain("は"),
                AnnotatedSegment::plain("い"),
                AnnotatedSegment::plain("い"),
                AnnotatedSegment::plain("\n"),
                AnnotatedSegment::annotated("天気", "てんき"),
            ]
        );
        assert!(units[4].is_line_break());
    }

    #[test]
    fn test_expand_every_plain_unit_is_one_char() {
        let units = expand_to_display_units(vec![
            AnnotatedSegment::plain("漢字かな"),
            AnnotatedSegment::annotated("漢字", "かんじ"),
        ]);
        assert_eq!(units.len(), 5);
        for unit in &units[..4] {
            assert_eq!(unit.text.chars().count(), 1);
            assert!(unit.reading.is_none());
        }
        assert_eq!(units[4], AnnotatedSegment::annotated("漢字", "かんじ"));
    }

    #[test]
    fn test_resolve_token_uses_token_reading() {
        let token = Token::new("学校").with_reading("がっこう");
        assert_eq!(
            resolve_token_display(&token),
            vec![AnnotatedSegment::annotated("学校", "がっこう")]
        );
    }

    #[test]
    fn test_resolve_token_skips_kana_and_identical_reading() {
        let kana = Token::new("です").with_reading("デス");
        assert_eq!(resolve_token_display(&kana), vec![AnnotatedSegment::plain("です")]);

        let same = Token::new("猫").with_reading("猫");
        assert_eq!(resolve_token_display(&same), vec![AnnotatedSegment::plain("猫")]);
    }

    #[test]
    fn test_resolve_token_inline_brackets_win() {
        let token = Token::new("食[た]べた").with_reading("たべた");
        assert_eq!(
            resolve_token_display(&token),
            vec![
                AnnotatedSegment::annotated("食", "た"),
                AnnotatedSegment::plain("べた"),
            ]
        );
    }

    #[test]
    fn test_resolve_token_mixed_surface_gets_whole_reading() {
        let token = Token::new("食べた").with_reading("たべた");
        assert_eq!(
            resolve_token_display(&token),
            vec![AnnotatedSegment::annotated("食べた", "たべた")]
        );
    }

    #[test]
    fn test_strip_and_kana() {
        assert_eq!(strip_furigana("食[た]べる"), "食べる");
        assert_eq!(to_kana("食[た]べる"), "たべる");
        assert_eq!(to_kana("今日[きょう]は学校[がっこう]"), "きょうはがっこう");
    }

    #[test]
    fn test_extract_kanji_distinct_in_order() {
        assert_eq!(extract_kanji("学校の学生と先生"), vec!['学', '校', '生', '先']);
        assert!(extract_kanji("ひらがなカタカナ").is_empty());
    }

    #[test]
    fn test_render_plan_prefers_tokens() {
        let mut sentence = Sentence::new("食べた\nよ");
        sentence.reading = "食[た]べた\nよ".to_string();
        sentence.tokens = vec![
            Token::new("食べた").with_reading("たべた").with_base_form("食べる"),
            Token::new("\n"),
            Token::new("よ"),
        ];

        let RenderPlan::Tokens(tokens) = render_plan(&sentence) else {
            panic!("expected token plan");
        };
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].lookup_key, "食べる");
        assert!(tokens[1].line_break);
        assert_eq!(tokens[2].segments, vec![AnnotatedSegment::plain("よ")]);
    }

    #[test]
    fn test_render_plan_legacy_falls_back_to_expression() {
        let sentence = Sentence::new("猫だ");
        assert_eq!(
            render_plan(&sentence),
            RenderPlan::Legacy(vec![
                AnnotatedSegment::plain("猫"),
                AnnotatedSegment::plain("だ"),
            ])
        );
    }
}
