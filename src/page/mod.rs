//! Page abstraction: the capability set the extraction core needs from the
//! host page, plus the snapshot-backed implementation used by the binary
//! and the tests.

pub mod snapshot;

pub use snapshot::SnapshotPage;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while decoding a page snapshot line.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("invalid page snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Song/artist headings of the rendered music attribution element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub song: String,
    pub artist: String,
}

/// One observed state of the page. Everything is optional or defaultable:
/// a half-loaded page is a legal snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSnapshot {
    /// Displayed title text; may be empty before load.
    pub title: String,
    /// Stable identifier for the current video, if determinable.
    pub video_id: Option<String>,
    /// Channel name, the fallback artist source.
    pub channel: String,
    /// Externally-owned structured metadata tree, when the page exposes one.
    pub structured: Option<Value>,
    /// Music attribution element content. `None` means the element has not
    /// rendered; `Some` with empty fields means it rendered empty.
    pub attribution: Option<Attribution>,
    /// Collapsed state of the description region. `None` means the page has
    /// no expand/collapse controls.
    pub collapsed: Option<bool>,
}

impl PageSnapshot {
    pub fn from_json(line: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Read/interact capabilities over the current page. Reads are fresh on
/// every call; the page mutates underneath between calls.
pub trait Page {
    fn displayed_title(&self) -> String;
    fn video_identity(&self) -> Option<String>;
    fn structured_metadata(&self) -> Option<Value>;
    fn channel_name(&self) -> String;

    /// Whether the music attribution element exists in the page at all,
    /// visible or not.
    fn has_attribution_elements(&self) -> bool;
    /// Attribution headings, readable only while the region is not
    /// collapsed.
    fn read_attribution(&self) -> Option<Attribution>;

    /// `None` when the page has no expand/collapse controls.
    fn is_content_collapsed(&self) -> Option<bool>;
    fn expand_content(&mut self);
    fn collapse_content(&mut self);
}
