use crate::tokenizer::{Block, Token};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[\s\S]*?```").expect("fenced code regex is valid"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`").expect("inline code regex is valid"));

/// Structural counts derived from one document body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub word_count: u64,
    pub heading_count: u64,
    pub table_count: u64,
    pub code_block_count: u64,
    pub image_count: u64,
}

/// Count block constructs in `tokens` and words in `body`.
///
/// Headings of every level count once each. Fenced and indented code blocks
/// both count; inline code does not. Images are looked for among the direct
/// children of every token.
pub fn extract_metadata(tokens: &[Token], body: &str) -> DocumentStats {
    let mut stats = DocumentStats {
        word_count: count_words(body),
        ..DocumentStats::default()
    };

    for token in tokens {
        match token {
            Token::Open(Block::Heading(_)) => stats.heading_count += 1,
            Token::Open(Block::Table) => stats.table_count += 1,
            Token::Fence { .. } | Token::CodeBlock { .. } => stats.code_block_count += 1,
            _ => {}
        }
        stats.image_count += token
            .children()
            .iter()
            .filter(|child| child.src().is_some())
            .count() as u64;
    }

    stats
}

/// Whitespace-separated words after removing ```` ``` ```` regions and
/// single-backtick spans from the raw text.
///
/// An unterminated fence is left in place and its contents are counted.
pub fn count_words(text: &str) -> u64 {
    let without_fences = FENCED_CODE.replace_all(text, "");
    let without_code = INLINE_CODE.replace_all(&without_fences, "");
    without_code.split_whitespace().count() as u64
}
