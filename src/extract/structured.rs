//! Defensive reads into the page's structured metadata tree.
//!
//! The tree is externally owned and loosely typed; a lookup that fails
//! (absent key, wrong type, missing index) is a normal "no data" outcome,
//! never an error. Only a shape with exactly one music carousel entry
//! produces a candidate: several entries mean there is no single confident
//! answer and the next tier decides.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::extract::normalize::strip_pictographs;
use crate::extract::types::MetadataCandidate;

/// Adjacent twin punctuation left behind by a localization substitution:
/// a typographic quote duplicated next to its ASCII lookalike. Collapsed to
/// the first glyph of the pair.
static LOOKALIKE_DUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{2019}'|'\u{2019}|\u{201C}\"|\"\u{201C}|\u{201D}\"|\"\u{201D}").unwrap());

/// Trailing `(Name Version)` / `(Name Ver.)` reduced to `(Name)`.
static VERSION_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*([^()]+?)\s+ver(?:sion|\.)?\s*\)\s*$").unwrap());

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Extract an (artist, song) pair from the structured metadata tree, if it
/// holds exactly one music attribution entry.
pub fn try_read(structured: Option<&Value>) -> Option<MetadataCandidate> {
    let lockups = music_lockups(structured?)?;
    if lockups.len() != 1 {
        debug!(entries = lockups.len(), "music carousel is ambiguous or empty");
        return None;
    }
    let rows = lockups[0]
        .pointer("/carouselLockupRenderer/infoRows")?
        .as_array()?;
    let song = clean_song(&row_text(rows.first()?)?);
    let artist = clean_artist(&row_text(rows.get(1)?)?);
    if song.is_empty() {
        return None;
    }
    debug!(%song, %artist, "structured metadata yielded a candidate");
    Some(MetadataCandidate { artist, song })
}

/// Walk panel list → section items → music section → carousel list.
fn music_lockups(root: &Value) -> Option<&Vec<Value>> {
    for panel in root.get("engagementPanels")?.as_array()? {
        let items = panel
            .pointer(
                "/engagementPanelSectionListRenderer/content/structuredDescriptionContentRenderer/items",
            )
            .and_then(Value::as_array);
        let Some(items) = items else { continue };
        for item in items {
            if let Some(music) = item.get("videoDescriptionMusicSectionRenderer") {
                return music.get("carouselLockups").and_then(Value::as_array);
            }
        }
    }
    None
}

/// Resolve one info row to text: a direct string field, the sole text-run
/// fragment, or all fragments joined with no separator.
fn row_text(row: &Value) -> Option<String> {
    let text = row.pointer("/infoRowRenderer/defaultMetadata")?;
    if let Some(s) = text.get("simpleText").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    let runs = text.get("runs")?.as_array()?;
    let fragments: Vec<&str> = runs
        .iter()
        .map(|run| run.get("text").and_then(Value::as_str))
        .collect::<Option<_>>()?;
    match fragments.as_slice() {
        [] => None,
        [sole] => Some((*sole).to_string()),
        many => Some(many.concat()),
    }
}

fn fix_lookalike_duplicates(s: &str) -> String {
    LOOKALIKE_DUP_RE
        .replace_all(s, |caps: &regex::Captures| {
            caps[0].chars().next().map(String::from).unwrap_or_default()
        })
        .into_owned()
}

fn clean_song(raw: &str) -> String {
    let s = strip_pictographs(raw);
    let s = MULTI_SPACE_RE.replace_all(&s, " ");
    let s = fix_lookalike_duplicates(s.trim());
    VERSION_SUFFIX_RE.replace(&s, "($1)").trim().to_string()
}

fn clean_artist(raw: &str) -> String {
    fix_lookalike_duplicates(raw.trim())
}
