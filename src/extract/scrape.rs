//! Reads the rendered music attribution element, expanding the collapsed
//! description region when that is the only way to reach its text.

use tracing::debug;

use crate::extract::types::MetadataCandidate;
use crate::page::Page;

/// Scrape (artist, song) from the attribution element. Both headings must
/// be non-empty for the candidate to count.
///
/// Side effect: may expand a collapsed content region; the prior collapsed
/// state is restored only if this call performed the expansion. A region
/// the user already expanded is never collapsed behind their back.
pub fn try_scrape<P: Page>(page: &mut P) -> Option<MetadataCandidate> {
    if !page.has_attribution_elements() {
        return None;
    }

    let expanded_here = page.is_content_collapsed() == Some(true);
    if expanded_here {
        page.expand_content();
    }

    let found = page.read_attribution().and_then(|attr| {
        let song = attr.song.trim();
        let artist = attr.artist.trim();
        if song.is_empty() || artist.is_empty() {
            None
        } else {
            debug!(%song, %artist, "attribution element yielded a candidate");
            Some(MetadataCandidate::new(artist, song))
        }
    });

    if expanded_here {
        page.collapse_content();
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Attribution, PageSnapshot, SnapshotPage};

    fn page(attribution: Option<Attribution>, collapsed: Option<bool>) -> SnapshotPage {
        let page = SnapshotPage::new();
        page.apply(PageSnapshot {
            attribution,
            collapsed,
            ..Default::default()
        });
        page
    }

    fn attr(song: &str, artist: &str) -> Attribution {
        Attribution {
            song: song.into(),
            artist: artist.into(),
        }
    }

    #[test]
    fn reads_visible_attribution() {
        let mut p = page(Some(attr("Song", "Artist")), Some(false));
        assert_eq!(
            try_scrape(&mut p),
            Some(MetadataCandidate::new("Artist", "Song"))
        );
        // region was already expanded: left expanded
        assert_eq!(p.is_content_collapsed(), Some(false));
    }

    #[test]
    fn expands_and_restores_collapsed_region() {
        let mut p = page(Some(attr("Song", "Artist")), Some(true));
        assert_eq!(
            try_scrape(&mut p),
            Some(MetadataCandidate::new("Artist", "Song"))
        );
        assert_eq!(p.is_content_collapsed(), Some(true));
    }

    #[test]
    fn absent_elements_mean_no_data() {
        let mut p = page(None, Some(true));
        assert_eq!(try_scrape(&mut p), None);
        // never touched the toggle
        assert_eq!(p.is_content_collapsed(), Some(true));
    }

    #[test]
    fn empty_headings_are_not_a_candidate() {
        let mut p = page(Some(attr("Song", "")), Some(false));
        assert_eq!(try_scrape(&mut p), None);
        let mut p = page(Some(attr("", "Artist")), None);
        assert_eq!(try_scrape(&mut p), None);
    }

    #[test]
    fn missing_toggle_controls_skip_restoration() {
        let mut p = page(Some(attr("Song", "Artist")), None);
        assert_eq!(
            try_scrape(&mut p),
            Some(MetadataCandidate::new("Artist", "Song"))
        );
        assert_eq!(p.is_content_collapsed(), None);
    }
}
