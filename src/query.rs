//! Search query construction from a resolved candidate.

use crate::extract::MetadataCandidate;

/// `artist + " " + song`, or just the song when no artist is known.
pub fn search_query(candidate: &MetadataCandidate) -> String {
    if candidate.artist.is_empty() {
        candidate.song.clone()
    } else {
        format!("{} {}", candidate.artist, candidate.song)
    }
}

/// Spotify search URL for the candidate.
pub fn search_url(candidate: &MetadataCandidate) -> String {
    format!(
        "https://open.spotify.com/search/{}",
        urlencoding::encode(&search_query(candidate))
    )
}
