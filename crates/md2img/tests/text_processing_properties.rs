//! Property-based tests for sanitizing and extraction

use md2img::*;
use proptest::prelude::*;

/// Markdown-ish documents built from fences, blank lines and prose
fn document_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zA-Z .,]{0,40}",
        Just("```".to_string()),
        Just("```py".to_string()),
        Just("\n".to_string()),
        Just("\n\n".to_string()),
        Just("   ".to_string()),
        "`[a-z]{1,8}`",
        "\\[[a-z]{1,6}\\]\\(http://[a-z]{1,8}\\)",
        "https?://[a-z]{1,10}\\.com",
    ];
    prop::collection::vec(piece, 0..20).prop_map(|pieces| pieces.concat())
}

fn extractor(enabled: bool, links: bool, blocks: bool, inline: bool) -> PatternExtractor {
    PatternExtractor::new(ExtractionConfig {
        enabled,
        extract_links: links,
        extract_code_blocks: blocks,
        extract_inline_code: inline,
    })
}

proptest! {
    /// Cleaning an already cleaned text changes nothing
    #[test]
    fn prop_clean_is_idempotent(text in document_strategy()) {
        let once = TextSanitizer::clean(&text);
        let twice = TextSanitizer::clean(&once);
        prop_assert_eq!(once, twice);
    }

    /// Cleaned text never starts or ends with whitespace
    #[test]
    fn prop_clean_is_trimmed(text in document_strategy()) {
        let cleaned = TextSanitizer::clean(&text);
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
    }

    /// The master switch turns every category off
    #[test]
    fn prop_disabled_extracts_nothing(text in document_strategy()) {
        let content = extractor(false, true, true, true).extract(&text);
        prop_assert!(content.is_empty());
        prop_assert!(format_extracted(&content).is_none());
    }

    /// A disabled category is always absent, an enabled one is never empty
    #[test]
    fn prop_categories_respect_flags(
        text in document_strategy(),
        links in any::<bool>(),
        blocks in any::<bool>(),
        inline in any::<bool>(),
    ) {
        let content = extractor(true, links, blocks, inline).extract(&text);

        for (flag, category) in [
            (links, &content.links),
            (blocks, &content.code_blocks),
            (inline, &content.inline_codes),
        ] {
            if !flag {
                prop_assert!(category.is_none());
            }
            if let Some(items) = category {
                prop_assert!(!items.is_empty());
            }
        }
    }

    /// Extracted code blocks are always fenced and labelled
    #[test]
    fn prop_code_blocks_are_fenced(text in document_strategy()) {
        let content = extractor(true, false, true, false).extract(&text);
        for block in content.code_blocks.unwrap_or_default() {
            prop_assert!(block.starts_with("```"));
            prop_assert!(block.ends_with("\n```"));
            let first_line = block.lines().next().unwrap_or_default();
            prop_assert!(first_line.len() > 3, "missing language label: {:?}", block);
        }
    }
}

#[test]
fn test_links_example() {
    let content = extractor(true, true, false, false).extract("see [docs](http://a) and http://b");
    assert_eq!(
        content.links,
        Some(vec!["docs: http://a".to_string(), "http://b".to_string()])
    );
}

#[test]
fn test_code_block_example() {
    let text = "```py\nx=1\n```";
    assert_eq!(
        extractor(true, true, true, false).extract(text).code_blocks,
        Some(vec!["```py\nx=1\n```".to_string()])
    );
    assert!(extractor(true, true, false, false)
        .extract(text)
        .code_blocks
        .is_none());
}

#[test]
fn test_extraction_config_from_convert_config() {
    let config = ConvertConfig::from_yaml_str(
        "extract_links_and_code: true\nextract_links: false\nextract_inline_code: true\n",
    )
    .unwrap();

    let extraction = ExtractionConfig::from(&config);

    assert!(extraction.enabled);
    assert!(!extraction.extract_links);
    assert!(extraction.extract_code_blocks);
    assert!(extraction.extract_inline_code);
}
