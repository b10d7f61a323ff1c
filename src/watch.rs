//! Change detection and retry scheduling.
//!
//! `ChangeWatcher` is the synchronous state machine: it decides when a
//! resolution runs (exactly once per distinct title, again on a video-id
//! change) and owns the single retry ticket. `listen` is the async driver:
//! one select loop over the page-changed signal, the armed retry timer, a
//! fixed poll interval and shutdown. Signals may fire spuriously; `check`
//! is idempotent for an unchanged page.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

use crate::extract::{self, MetadataCandidate};
use crate::page::Page;

/// Delay before the single not-yet-loaded retry.
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// A resolved candidate handed to the output layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub title: String,
    pub video_id: Option<String>,
    pub candidate: MetadataCandidate,
}

/// The one scheduled re-attempt. Dropped whenever the title or video id it
/// was armed for stops being current.
#[derive(Debug)]
struct RetryTicket {
    title: String,
    video_id: Option<String>,
    due: Instant,
}

pub struct ChangeWatcher<P: Page> {
    page: P,
    last_title: Option<String>,
    last_video: Option<String>,
    retry: Option<RetryTicket>,
    retry_delay: Duration,
}

impl<P: Page> ChangeWatcher<P> {
    pub fn new(page: P) -> Self {
        Self::with_retry_delay(page, RETRY_DELAY)
    }

    pub fn with_retry_delay(page: P, retry_delay: Duration) -> Self {
        Self {
            page,
            last_title: None,
            last_video: None,
            retry: None,
            retry_delay,
        }
    }

    /// Re-check the page after a change signal or poll tick. Resolves at
    /// most once per distinct title; a video-id change always resolves,
    /// cancelling any pending retry first.
    pub fn check(&mut self) -> Option<Update> {
        let title = self.page.displayed_title().trim().to_string();
        let video = self.page.video_identity();

        let video_changed = video != self.last_video;
        if video_changed {
            // Stale ticket: it belongs to the previous video.
            self.retry = None;
            self.last_video = video.clone();
            self.last_title = None;
            debug!(video = ?video, "video identity changed");
        }

        if title.is_empty() {
            // Title not rendered yet; a later signal will pick it up.
            return None;
        }
        if !video_changed && self.last_title.as_deref() == Some(title.as_str()) {
            return None;
        }

        Some(self.resolve_current(title, video))
    }

    /// The retry timer fired. Consumes the ticket; never re-arms, so a
    /// title gets at most one retry.
    pub fn fire_retry(&mut self) -> Option<Update> {
        let ticket = self.retry.take()?;
        let title = self.page.displayed_title().trim().to_string();
        let video = self.page.video_identity();
        if title != ticket.title || video != ticket.video_id {
            // Page moved on; the change signal path owns the new state.
            debug!("retry ticket stale, dropped");
            return None;
        }
        debug!(%title, "retrying resolution");
        let resolution = extract::resolve(&mut self.page);
        Some(Update {
            title,
            video_id: video,
            candidate: resolution.candidate,
        })
    }

    /// Deadline of the armed retry, if any.
    pub fn retry_due(&self) -> Option<Instant> {
        self.retry.as_ref().map(|t| t.due)
    }

    fn resolve_current(&mut self, title: String, video: Option<String>) -> Update {
        // A new title always replaces whatever ticket was live.
        self.retry = None;
        let resolution = extract::resolve(&mut self.page);
        if resolution.pending {
            debug!(%title, "resolution pending, retry armed");
            self.retry = Some(RetryTicket {
                title: title.clone(),
                video_id: video.clone(),
                due: Instant::now() + self.retry_delay,
            });
        }
        self.last_title = Some(title.clone());
        Update {
            title,
            video_id: video,
            candidate: resolution.candidate,
        }
    }
}

/// Drive a watcher until shutdown, forwarding updates to `update_tx`.
pub async fn listen<P: Page>(
    mut watcher: ChangeWatcher<P>,
    update_tx: mpsc::Sender<Update>,
    poll_interval: Duration,
    mut signal_rx: mpsc::Receiver<()>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    loop {
        let retry_at = watcher.retry_due();
        let update = tokio::select! {
            _ = shutdown_rx.recv() => break,
            maybe_signal = signal_rx.recv() => match maybe_signal {
                Some(()) => watcher.check(),
                None => break,
            },
            _ = tokio::time::sleep_until(retry_at.unwrap_or_else(Instant::now)),
                if retry_at.is_some() =>
            {
                watcher.fire_retry()
            }
            _ = tokio::time::sleep(poll_interval) => watcher.check(),
        };
        if let Some(update) = update
            && update_tx.send(update).await.is_err()
        {
            break;
        }
    }
}
