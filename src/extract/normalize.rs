//! Title normalization: strips visual noise from a raw displayed title so
//! the pattern matcher only sees structure.
//!
//! Every stage is a total function over strings; unmatched input passes
//! through unchanged. The full pipeline is a fixed point: normalizing its
//! own output yields the same string.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Emoji and pictographic material, including variation selectors and the
/// keycap combiner so whole ZWJ/keycap grapheme clusters are recognized.
static PICTOGRAPH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\u{FE0E}\u{FE0F}\u{20E3}\u{1F3FB}-\u{1F3FF}]").unwrap()
});

/// Zero-width, control and exotic whitespace characters, plus ordinary
/// whitespace runs. All collapse to a single space.
static EXOTIC_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\p{Cc}\p{Cf}]+").unwrap());

/// Dash variants (en dash, em dash, minus sign, fullwidth and small forms).
static DASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{2010}-\u{2015}\u{2212}\u{FE63}\u{FF0D}]").unwrap());

/// Vertical-bar-like divider glyphs.
static PIPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[｜∣│┃丨]").unwrap());

const FLUFF_KEYWORDS: &str = "official|m/?v|music|nmv|lyrics?|video|live|subs|clean|ver(?:sion)?|pinyin|karaoke|4k|1080p|uhd|performance|promotion";

/// A bracketed span whose content carries at least one fluff keyword.
static FLUFF_BRACKET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\[[^\[\]]*\b(?:{FLUFF_KEYWORDS})\b[^\[\]]*\]"
    ))
    .unwrap()
});

/// The same keywords standing alone outside brackets.
static FLUFF_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b(?:{FLUFF_KEYWORDS})\b")).unwrap());

static TRAILING_SLASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*/\s*$").unwrap());

static DOUBLE_HYPHEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").unwrap());

/// A hyphen acting as a separator: whitespace on at least one side. Tight
/// hyphens ("T-ara") are part of a word and stay untouched.
static HYPHEN_SEP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+-\s*|\s*-\s+").unwrap());

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Remove emoji/pictographic grapheme clusters. Shared with the structured
/// metadata reader, which applies the same cleanup to song text.
pub fn strip_pictographs(text: &str) -> String {
    text.graphemes(true)
        .filter(|g| !PICTOGRAPH_RE.is_match(g))
        .collect()
}

/// Rewrites fullwidth/Japanese bracket pairs and parentheses to square
/// brackets so one fluff pass covers them all. Corner quotes 「」 stay: the
/// parser treats them as an artist/song boundary.
fn unify_brackets(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '【' | '『' | '(' | '（' => '[',
            '】' | '』' | ')' | '）' => ']',
            other => other,
        })
        .collect()
}

/// Normalize a raw displayed title. Stage order matters; see module docs.
pub fn normalize(raw: &str) -> String {
    let s = strip_pictographs(raw);
    let s = EXOTIC_SPACE_RE.replace_all(&s, " ");
    let s = DASH_RE.replace_all(&s, "-");
    let s = PIPE_RE.replace_all(&s, "|");
    let s = unify_brackets(&s);
    let s = FLUFF_BRACKET_RE.replace_all(&s, " ");
    let s = FLUFF_WORD_RE.replace_all(&s, " ");
    let s = TRAILING_SLASH_RE.replace(&s, "");
    let s = DOUBLE_HYPHEN_RE.replace_all(&s, "-");
    let s = HYPHEN_SEP_RE.replace_all(&s, " - ");
    let s = MULTI_SPACE_RE.replace_all(&s, " ");
    s.trim().to_string()
}
