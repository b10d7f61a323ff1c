//! Tiered metadata resolution: structured metadata, then the rendered
//! attribution element, then pattern matching over the normalized title.
//! The first tier to produce a candidate wins. There is no failure path:
//! the title tier always yields something usable.

use tracing::debug;

use crate::extract::types::Resolution;
use crate::extract::{normalize, parse, scrape, structured};
use crate::page::Page;

/// Resolve the current page to an (artist, song) candidate.
///
/// `pending` is true only when the structured tier had no data AND the
/// attribution element has not rendered at all: the page may still be
/// loading, and one retry is worth scheduling. An attribution element that
/// rendered empty is a confirmed non-match, not a pending state.
pub fn resolve<P: Page>(page: &mut P) -> Resolution {
    let shape = page.structured_metadata();
    if let Some(candidate) = structured::try_read(shape.as_ref()) {
        debug!(tier = "structured", "resolved");
        return Resolution {
            candidate,
            pending: false,
        };
    }

    let attribution_rendered = page.has_attribution_elements();
    if let Some(candidate) = scrape::try_scrape(page) {
        debug!(tier = "dom", "resolved");
        return Resolution {
            candidate,
            pending: false,
        };
    }

    let title = page.displayed_title();
    let channel = page.channel_name();
    let mut candidate = parse::parse(&normalize::normalize(&title), &channel);
    if candidate.song.is_empty() {
        // An all-fluff title normalizes to nothing; the raw title is still
        // the best available song text.
        candidate.song = title.trim().to_string();
    }
    let pending = !attribution_rendered;
    debug!(tier = "title", pending, "resolved");
    Resolution { candidate, pending }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::types::MetadataCandidate;
    use crate::page::{Attribution, PageSnapshot, SnapshotPage};
    use serde_json::{Value, json};

    fn structured_shape(song: &str, artist: &str, copies: usize) -> Value {
        let lockup = json!({ "carouselLockupRenderer": { "infoRows": [
            { "infoRowRenderer": { "defaultMetadata": { "simpleText": song } } },
            { "infoRowRenderer": { "defaultMetadata": { "simpleText": artist } } }
        ] } });
        json!({ "engagementPanels": [
            { "engagementPanelSectionListRenderer": { "content": {
                "structuredDescriptionContentRenderer": { "items": [
                    { "videoDescriptionMusicSectionRenderer": {
                        "carouselLockups": vec![lockup; copies]
                    } }
                ] }
            } } }
        ] })
    }

    fn page(snapshot: PageSnapshot) -> SnapshotPage {
        let page = SnapshotPage::new();
        page.apply(snapshot);
        page
    }

    #[test]
    fn structured_tier_takes_precedence() {
        let mut p = page(PageSnapshot {
            title: "Wrong Artist - Wrong Song".into(),
            structured: Some(structured_shape("Real Song", "Real Artist", 1)),
            attribution: Some(Attribution {
                song: "Dom Song".into(),
                artist: "Dom Artist".into(),
            }),
            ..Default::default()
        });
        let r = resolve(&mut p);
        assert_eq!(r.candidate, MetadataCandidate::new("Real Artist", "Real Song"));
        assert!(!r.pending);
    }

    #[test]
    fn ambiguous_structured_falls_to_dom_tier() {
        let mut p = page(PageSnapshot {
            title: "T".into(),
            structured: Some(structured_shape("S", "A", 2)),
            attribution: Some(Attribution {
                song: "Dom Song".into(),
                artist: "Dom Artist".into(),
            }),
            ..Default::default()
        });
        let r = resolve(&mut p);
        assert_eq!(r.candidate, MetadataCandidate::new("Dom Artist", "Dom Song"));
        assert!(!r.pending);
    }

    #[test]
    fn title_tier_with_absent_dom_is_pending() {
        let mut p = page(PageSnapshot {
            title: "Artist Name - Song Title (Official Music Video)".into(),
            ..Default::default()
        });
        let r = resolve(&mut p);
        assert_eq!(
            r.candidate,
            MetadataCandidate::new("Artist Name", "Song Title")
        );
        assert!(r.pending);
    }

    #[test]
    fn empty_attribution_is_confirmed_non_match() {
        let mut p = page(PageSnapshot {
            title: "Artist - Song".into(),
            attribution: Some(Attribution::default()),
            ..Default::default()
        });
        let r = resolve(&mut p);
        assert_eq!(r.candidate, MetadataCandidate::new("Artist", "Song"));
        assert!(!r.pending);
    }

    #[test]
    fn total_fallback_degrades_to_cleaned_title_and_channel() {
        let mut p = page(PageSnapshot {
            title: "Some Plain Title".into(),
            channel: "The Channel".into(),
            attribution: Some(Attribution::default()),
            ..Default::default()
        });
        let r = resolve(&mut p);
        assert_eq!(
            r.candidate,
            MetadataCandidate::new("The Channel", "Some Plain Title")
        );
    }

    #[test]
    fn all_fluff_title_falls_back_to_raw_title() {
        let mut p = page(PageSnapshot {
            title: "Official Music Video".into(),
            channel: "Chan".into(),
            attribution: Some(Attribution::default()),
            ..Default::default()
        });
        let r = resolve(&mut p);
        assert_eq!(
            r.candidate,
            MetadataCandidate::new("Chan", "Official Music Video")
        );
        assert!(!r.candidate.song.is_empty());
    }

    #[test]
    fn end_to_end_corner_quote_title() {
        let mut p = page(PageSnapshot {
            title: "【MV】Artist「Song」".into(),
            attribution: Some(Attribution::default()),
            ..Default::default()
        });
        let r = resolve(&mut p);
        assert_eq!(r.candidate, MetadataCandidate::new("Artist", "Song"));
    }

    #[test]
    fn end_to_end_song_by_artist_title() {
        let mut p = page(PageSnapshot {
            title: "Nice Song by Great Artist".into(),
            attribution: Some(Attribution::default()),
            ..Default::default()
        });
        let r = resolve(&mut p);
        assert_eq!(
            r.candidate,
            MetadataCandidate::new("Great Artist", "Nice Song")
        );
    }
}
