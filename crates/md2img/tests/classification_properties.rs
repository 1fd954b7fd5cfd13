//! Property-based tests for auto-convert classification
//!
//! The decision must be a pure function of the mode, the limit, the pattern and
//! the text, and the combined mode must be exactly the union of the other two.

use md2img::*;
use proptest::prelude::*;

/// Arbitrary text including multi-byte characters and markdown syntax
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,300}",
        "[a-z #*>`\\-\\[\\]()|$\n]{0,200}",
        "[日本語テキスト ]{0,150}",
    ]
}

/// Mode strings no parser accepts
fn garbage_mode_strategy() -> impl Strategy<Value = String> {
    "[a-z_]{1,16}".prop_filter("must not be a known mode", |s| {
        !matches!(
            s.as_str(),
            "disabled" | "off" | "none" | "length" | "regex" | "pattern" | "combined" | "both"
        )
    })
}

fn engine(mode: &str, limit: i64) -> ClassificationEngine {
    ClassificationEngine::from_config(&ConvertConfig {
        auto_convert_mode: mode.to_string(),
        length_limit: limit,
        ..Default::default()
    })
}

proptest! {
    /// Length mode converts exactly when the character count exceeds the limit
    #[test]
    fn prop_length_mode_iff_longer_than_limit(text in text_strategy(), limit in 1i64..200) {
        let engine = engine("length", limit);
        let expected = text.chars().count() as i64 > limit;
        prop_assert_eq!(engine.should_convert(&text), expected);
    }

    /// A non-positive limit disables length-based conversion
    #[test]
    fn prop_non_positive_limit_never_converts(text in text_strategy(), limit in -50i64..=0) {
        prop_assert!(!engine("length", limit).should_convert(&text));
    }

    /// Pattern mode converts exactly when the compiled pattern matches
    #[test]
    fn prop_pattern_mode_iff_match(text in text_strategy()) {
        let engine = engine("regex", 100);
        let regex = compile_pattern(DEFAULT_PATTERN).unwrap();
        prop_assert_eq!(engine.should_convert(&text), regex.is_match(&text));
    }

    /// Combined mode is the union of pattern and length
    #[test]
    fn prop_combined_is_union(text in text_strategy(), limit in 0i64..200) {
        let pattern = engine("regex", limit).should_convert(&text);
        let length = engine("length", limit).should_convert(&text);
        let combined = engine("combined", limit).should_convert(&text);
        prop_assert_eq!(combined, pattern || length);
    }

    /// Unrecognized mode strings never convert
    #[test]
    fn prop_garbage_mode_never_converts(mode in garbage_mode_strategy(), text in text_strategy()) {
        let engine = engine(&mode, 1);
        prop_assert!(matches!(engine.config().mode, AutoConvertMode::Unrecognized(_)));
        prop_assert!(!engine.should_convert(&text));
    }

    /// Disabled mode never converts regardless of limit or content
    #[test]
    fn prop_disabled_never_converts(text in text_strategy(), limit in 0i64..10) {
        prop_assert!(!engine("disabled", limit).should_convert(&text));
    }

    /// A pattern that does not compile makes pattern mode inert
    #[test]
    fn prop_invalid_pattern_never_converts(text in text_strategy()) {
        let engine = ClassificationEngine::from_config(&ConvertConfig {
            auto_convert_mode: "regex".to_string(),
            pattern: "([unclosed".to_string(),
            ..Default::default()
        });
        prop_assert!(engine.config().compiled_pattern.is_none());
        prop_assert!(!engine.should_convert(&text));
    }
}

#[test]
fn test_default_pattern_recognizes_markdown() {
    let engine = engine("regex", 100);

    for sample in [
        "# Heading",
        "intro\n## Sub heading",
        "> quoted line",
        "- item",
        "  * nested item",
        "1. first",
        "| a | b |",
        "see [docs](http://x)",
        "![alt](http://x/y.png)",
        "---",
        "```\ncode\n```",
        "$$\nx^2\n$$",
        "inline $x$ math",
    ] {
        assert!(engine.should_convert(sample), "expected match: {:?}", sample);
    }

    for sample in ["hello there", "price is 5 dollars", "#hashtag", "a - b"] {
        assert!(!engine.should_convert(sample), "unexpected match: {:?}", sample);
    }
}
