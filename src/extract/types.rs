/// A tentative (artist, song) extraction result.
///
/// `artist` may be empty when no source could name one; `song` is never
/// empty in a candidate handed back by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataCandidate {
    pub artist: String,
    pub song: String,
}

impl MetadataCandidate {
    pub fn new(artist: impl Into<String>, song: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            song: song.into(),
        }
    }
}

/// Outcome of one resolution pass.
///
/// `pending` marks the transient case where the page has not finished
/// rendering the tiers that could improve on the title-derived candidate;
/// the caller may schedule a single bounded retry.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub candidate: MetadataCandidate,
    pub pending: bool,
}
