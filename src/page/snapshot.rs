//! Snapshot-backed `Page` implementation.
//!
//! The binary's stdin feeder and the watcher share one page through cloned
//! handles; `apply` swaps in a whole new observed state, which is how the
//! host page "mutates underneath" the core. A poisoned lock degrades to
//! default reads rather than panicking.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::page::{Attribution, Page, PageSnapshot};

#[derive(Debug, Clone, Default)]
pub struct SnapshotPage {
    state: Arc<Mutex<PageSnapshot>>,
}

impl SnapshotPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the observed page state.
    pub fn apply(&self, snapshot: PageSnapshot) {
        if let Ok(mut guard) = self.state.lock() {
            *guard = snapshot;
        }
    }

    fn read<T>(&self, default: T, f: impl FnOnce(&PageSnapshot) -> T) -> T {
        match self.state.lock() {
            Ok(guard) => f(&guard),
            Err(_) => default,
        }
    }
}

impl Page for SnapshotPage {
    fn displayed_title(&self) -> String {
        self.read(String::new(), |s| s.title.clone())
    }

    fn video_identity(&self) -> Option<String> {
        self.read(None, |s| s.video_id.clone())
    }

    fn structured_metadata(&self) -> Option<Value> {
        self.read(None, |s| s.structured.clone())
    }

    fn channel_name(&self) -> String {
        self.read(String::new(), |s| s.channel.clone())
    }

    fn has_attribution_elements(&self) -> bool {
        self.read(false, |s| s.attribution.is_some())
    }

    fn read_attribution(&self) -> Option<Attribution> {
        self.read(None, |s| {
            // Hidden while the region is collapsed.
            if s.collapsed == Some(true) {
                return None;
            }
            s.attribution.clone()
        })
    }

    fn is_content_collapsed(&self) -> Option<bool> {
        self.read(None, |s| s.collapsed)
    }

    fn expand_content(&mut self) {
        if let Ok(mut guard) = self.state.lock()
            && guard.collapsed.is_some()
        {
            guard.collapsed = Some(false);
        }
    }

    fn collapse_content(&mut self) {
        if let Ok(mut guard) = self.state.lock()
            && guard.collapsed.is_some()
        {
            guard.collapsed = Some(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_replaces_state() {
        let page = SnapshotPage::new();
        assert_eq!(page.displayed_title(), "");
        page.apply(PageSnapshot {
            title: "A - B".into(),
            video_id: Some("v1".into()),
            channel: "Chan".into(),
            ..Default::default()
        });
        assert_eq!(page.displayed_title(), "A - B");
        assert_eq!(page.video_identity().as_deref(), Some("v1"));
        assert_eq!(page.channel_name(), "Chan");
    }

    #[test]
    fn attribution_hidden_while_collapsed() {
        let mut page = SnapshotPage::new();
        page.apply(PageSnapshot {
            attribution: Some(Attribution {
                song: "S".into(),
                artist: "A".into(),
            }),
            collapsed: Some(true),
            ..Default::default()
        });
        assert!(page.has_attribution_elements());
        assert_eq!(page.read_attribution(), None);
        page.expand_content();
        assert!(page.read_attribution().is_some());
    }

    #[test]
    fn toggle_is_noop_without_controls() {
        let mut page = SnapshotPage::new();
        page.apply(PageSnapshot::default());
        page.expand_content();
        assert_eq!(page.is_content_collapsed(), None);
    }

    #[test]
    fn snapshot_parses_from_json() {
        let snap = PageSnapshot::from_json(
            r#"{"title":"A - B","video_id":"v1","channel":"C","collapsed":false}"#,
        )
        .unwrap();
        assert_eq!(snap.title, "A - B");
        assert_eq!(snap.collapsed, Some(false));
        assert!(PageSnapshot::from_json("not json").is_err());
    }
}
