//! Annotated-text inspection

use vnreader_core::furigana::{
    expand_to_display_units, parse_annotated, render_plan, strip_furigana, to_kana, RenderPlan,
};
use vnreader_core::{AnnotatedSegment, Sentence};

/// Print the segments of an annotated string
pub fn parse(text: &str, units: bool) {
    let mut segments = parse_annotated(text);
    if units {
        segments = expand_to_display_units(segments);
    }

    for segment in &segments {
        println!("{}", describe(segment));
    }
    println!();
    println!("plain: {}", strip_furigana(text));
    println!("kana:  {}", to_kana(text));
}

/// Print how a stored sentence is laid out
pub fn print_render_plan(sentence: &Sentence) {
    match render_plan(sentence) {
        RenderPlan::Tokens(tokens) => {
            println!("layout: tokens");
            for token in tokens.iter().filter(|t| !t.line_break) {
                let shown: Vec<_> = token.segments.iter().map(describe).collect();
                println!("  {}  -> {}", shown.join(" "), token.lookup_key);
            }
        }
        RenderPlan::Legacy(units) => {
            println!("layout: characters");
            let shown: Vec<_> = units.iter().map(describe).collect();
            println!("  {}", shown.join(" "));
        }
    }
}

fn describe(segment: &AnnotatedSegment) -> String {
    if segment.is_line_break() {
        return "⏎".to_string();
    }
    match &segment.reading {
        Some(reading) => format!("{}({})", segment.text, reading),
        None => segment.text.clone(),
    }
}
