use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};

use crate::SessionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
    pub shown_at: DateTime<Utc>,
}

#[derive(Default)]
struct BannerState {
    current: Option<Notice>,
    // Bumped on every notify; a hide task only acts on the generation it was
    // scheduled for.
    generation: u64,
    hide_task: Option<JoinHandle<()>>,
}

pub struct Notifier {
    hide_after: Duration,
    banner: Arc<Mutex<BannerState>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Notifier {
    pub fn new(hide_after: Duration, events: broadcast::Sender<SessionEvent>) -> Self {
        Self {
            hide_after,
            banner: Arc::new(Mutex::new(BannerState::default())),
            events,
        }
    }

    /// Replaces whatever is shown with `text` and restarts the hide timer.
    pub async fn notify(&self, text: impl Into<String>, severity: Severity) {
        let notice = Notice {
            text: text.into(),
            severity,
            shown_at: Utc::now(),
        };

        let mut banner = self.banner.lock().await;
        if let Some(pending) = banner.hide_task.take() {
            pending.abort();
        }
        banner.generation = banner.generation.wrapping_add(1);
        banner.current = Some(notice.clone());

        let generation = banner.generation;
        let shared = Arc::clone(&self.banner);
        let events = self.events.clone();
        let hide_after = self.hide_after;
        banner.hide_task = Some(tokio::spawn(async move {
            tokio::time::sleep(hide_after).await;
            let mut banner = shared.lock().await;
            if banner.generation != generation {
                return;
            }
            banner.current = None;
            banner.hide_task = None;
            let _ = events.send(SessionEvent::NoticeHidden);
        }));

        tracing::debug!(
            severity = severity.as_str(),
            text = %notice.text,
            "notice shown"
        );
        let _ = self.events.send(SessionEvent::NoticeShown(notice));
    }

    pub async fn visible(&self) -> Option<Notice> {
        self.banner.lock().await.current.clone()
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Ok(mut banner) = self.banner.try_lock() {
            if let Some(pending) = banner.hide_task.take() {
                pending.abort();
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/notifier_tests.rs"]
mod tests;
