//! Structural pattern matching over a normalized title.
//!
//! Patterns are tried in strict priority order; the first one that matches
//! structurally wins. Each pattern requires a distinct marker, so priority
//! only matters for inputs carrying several markers at once (an underscore
//! title that also contains " - " splits on the underscore, and so on).

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::extract::types::MetadataCandidate;

/// `<artist>「<song>」` / `<artist>『<song>』`, with an optional leading
/// divider segment (up to a `|` or a spaced hyphen) that is discarded.
static CORNER_QUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:.*(?:\|| - )\s*)?([^「『]*?)\s*(?:「([^」]+)」|『([^』]+)』)").unwrap()
});

/// One leading `[...]` block treated as a tag, not data.
static LEADING_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[[^\]]*\]\s*").unwrap());

/// Quote-like glyphs accepted as song delimiters. Plain apostrophes are
/// excluded: they appear inside too many artist and song names.
static QUOTED_SONG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^(.*?)\\s*[\"“”„‟«»＂](.+?)[\"“”„‟«»＂]\\s*$").unwrap()
});

static BRACKETED_ARTIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.+)$").unwrap());

static SONG_BY_ARTIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.+?)\s+by\s+(.+)$").unwrap());

/// A trailing parenthetical on one underscore side. Both `(...)` and `[...]`
/// are accepted since normalization rewrites parentheses to brackets.
static TRAILING_PAREN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*([(\[][^()\[\]]*[)\]])$").unwrap());

/// A trailing run starting at a 4+-digit number: a year or date suffix.
static YEAR_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[(\[]?\s*\d{4}.*$").unwrap());

/// Split a normalized title into (artist, song). `channel` supplies the
/// artist whenever a pattern finds a song but no artist.
pub fn parse(normalized: &str, channel: &str) -> MetadataCandidate {
    let input = normalized.trim();

    // 1. Corner-quote pattern.
    if let Some(caps) = CORNER_QUOTE_RE.captures(input) {
        let artist = caps.get(1).map_or("", |m| m.as_str());
        let song = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());
        if !song.trim().is_empty() {
            debug!(pattern = "corner-quote", "title matched");
            return finish(artist, song, channel);
        }
    }

    // 2. Leading-bracket-prefix strip, only when the remainder still carries
    //    another structural marker. A bare "[X] Y" is left for pattern 5.
    let mut rest = input;
    if let Some(m) = LEADING_TAG_RE.find(input) {
        let stripped = &input[m.end()..];
        if has_structural_marker(stripped) {
            debug!(tag = m.as_str(), "leading bracket stripped as tag");
            rest = stripped;
        }
    }

    // 3. Underscore pattern.
    if let Some((left, right)) = rest.split_once('_') {
        let song = refine_song_side(right);
        if !song.is_empty() {
            debug!(pattern = "underscore", "title matched");
            return finish(&refine_artist_side(left), &song, channel);
        }
    }

    // 4. Quoted-song pattern.
    if let Some(caps) = QUOTED_SONG_RE.captures(rest) {
        let (artist, song) = (&caps[1], &caps[2]);
        if !song.trim().is_empty() {
            debug!(pattern = "quoted-song", "title matched");
            return finish(artist, song, channel);
        }
    }

    // 5. Bracketed-artist pattern.
    if let Some(caps) = BRACKETED_ARTIST_RE.captures(rest) {
        let (artist, song) = (&caps[1], &caps[2]);
        if !song.trim().is_empty() {
            debug!(pattern = "bracketed-artist", "title matched");
            return finish(artist, song, channel);
        }
    }

    // 6. Hyphen pattern: first " - " wins.
    if let Some((artist, song)) = rest.split_once(" - ")
        && !song.trim().is_empty()
    {
        debug!(pattern = "hyphen", "title matched");
        return finish(artist, song, channel);
    }

    // 7. Pipe pattern.
    if let Some((artist, song)) = rest.split_once('|')
        && !song.trim().is_empty()
    {
        debug!(pattern = "pipe", "title matched");
        return finish(artist, song, channel);
    }

    // 8. "Song by Artist" pattern.
    if let Some(caps) = SONG_BY_ARTIST_RE.captures(rest) {
        let (song, artist) = (&caps[1], &caps[2]);
        if !song.trim().is_empty() {
            debug!(pattern = "song-by-artist", "title matched");
            return finish(artist, song, channel);
        }
    }

    // 9. Fallback: the whole title is the song.
    debug!(pattern = "fallback", "no structural marker");
    let song = rest.trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '|');
    finish("", song, channel)
}

fn finish(artist: &str, song: &str, channel: &str) -> MetadataCandidate {
    let artist = artist.trim();
    let artist = if artist.is_empty() { channel.trim() } else { artist };
    MetadataCandidate::new(artist, song.trim())
}

fn has_structural_marker(s: &str) -> bool {
    s.contains('_')
        || s.contains('[')
        || s.contains(" - ")
        || s.contains('|')
        || QUOTED_SONG_RE.is_match(s)
        || SONG_BY_ARTIST_RE.is_match(s)
}

/// Artist side of an underscore split: a trailing parenthetical stays
/// verbatim when the name before it contains a Latin letter, otherwise it
/// is dropped.
fn refine_artist_side(side: &str) -> String {
    let side = side.trim();
    if let Some(caps) = TRAILING_PAREN_RE.captures(side) {
        let prefix = caps[1].trim();
        // A bare parenthetical names nobody; leave the artist empty so the
        // channel fallback applies.
        if prefix.is_empty() {
            return String::new();
        }
        if !has_latin_letter(prefix) {
            return prefix.to_string();
        }
    }
    side.to_string()
}

/// Song side of an underscore split: a trailing year/date run is dropped
/// first, then the parenthetical rule applies with a separating space.
fn refine_song_side(side: &str) -> String {
    let side = side.trim();
    let stripped = YEAR_SUFFIX_RE.replace(side, "");
    let stripped = stripped.trim();
    // A title that is nothing but a year-like number stays as-is.
    let base = if stripped.is_empty() { side } else { stripped };
    if let Some(caps) = TRAILING_PAREN_RE.captures(base) {
        let prefix = caps[1].trim();
        if !prefix.is_empty() {
            if has_latin_letter(prefix) {
                return format!("{} {}", prefix, &caps[2]);
            }
            return prefix.to_string();
        }
    }
    base.to_string()
}

fn has_latin_letter(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphabetic())
}
