use std::{sync::Arc, time::Duration};

use shared::protocol::MutationKind;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{error, info};

pub mod api;
pub mod config;
pub mod error;
pub mod initials;
pub mod mutation;
pub mod notifier;
pub mod render;

pub use api::{HttpRosterApi, MutationReply, RosterApi};
pub use config::{load_settings, Settings};
pub use error::RosterError;
pub use initials::{initials_from_email, looks_like_email};
pub use mutation::{AutoConfirm, MutationOutcome, UnregisterConfirmation};
pub use notifier::{Notice, Notifier, Severity};
pub use render::{render_roster, RosterList, RosterView};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    RosterLoading,
    RosterRendered { activities: usize },
    RosterFailed { reason: String },
    MutationStarted { kind: MutationKind },
    MutationFinished { kind: MutationKind, applied: bool },
    NoticeShown(Notice),
    NoticeHidden,
}

/// Contents of the signup form: the selected activity (empty when the
/// placeholder is selected) and the email field as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub activity: String,
    pub email: String,
}

impl SignupForm {
    pub fn reset(&mut self) {
        self.activity.clear();
        self.email.clear();
    }
}

/// One client session: owns the rendered view, the signup form and the
/// status banner, and is the only path to the roster service.
pub struct RosterSession {
    api: Arc<dyn RosterApi>,
    confirmation: Arc<dyn UnregisterConfirmation>,
    view: RwLock<RosterView>,
    form: Mutex<SignupForm>,
    notifier: Notifier,
    events: broadcast::Sender<SessionEvent>,
}

impl RosterSession {
    pub fn connect(
        settings: &Settings,
        confirmation: Arc<dyn UnregisterConfirmation>,
    ) -> Result<Arc<Self>, RosterError> {
        let api = HttpRosterApi::new(settings)?;
        info!("session: roster service at {}", api.base_url());
        Ok(Self::new_with_dependencies(
            Arc::new(api),
            confirmation,
            settings.notice_ttl(),
        ))
    }

    pub fn new_with_dependencies(
        api: Arc<dyn RosterApi>,
        confirmation: Arc<dyn UnregisterConfirmation>,
        notice_ttl: Duration,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            confirmation,
            view: RwLock::new(RosterView::loading()),
            form: Mutex::new(SignupForm::default()),
            notifier: Notifier::new(notice_ttl, events.clone()),
            events,
        })
    }

    /// Re-fetches the roster and replaces the whole view with the result.
    ///
    /// Never fails: a fetch error becomes the error placeholder. Overlapping
    /// calls are not cancelled; whichever resolves last owns the view.
    pub async fn refresh(&self) {
        *self.view.write().await = RosterView::loading();
        let _ = self.events.send(SessionEvent::RosterLoading);

        let (next, event) = match self.api.fetch_roster().await {
            Ok(roster) => {
                let view = render_roster(&roster);
                let event = SessionEvent::RosterRendered {
                    activities: view.cards().len(),
                };
                (view, event)
            }
            Err(err) => {
                error!("session: could not load activities: {err}");
                let event = SessionEvent::RosterFailed {
                    reason: err.to_string(),
                };
                (RosterView::failed(), event)
            }
        };

        {
            let mut view = self.view.write().await;
            *view = next;
            let mut form = self.form.lock().await;
            if !view.has_option(&form.activity) {
                form.activity.clear();
            }
        }
        let _ = self.events.send(event);
    }

    pub async fn view(&self) -> RosterView {
        self.view.read().await.clone()
    }

    pub async fn form(&self) -> SignupForm {
        self.form.lock().await.clone()
    }

    /// Selects `activity` in the form if the current view offers it. An empty
    /// name selects the placeholder.
    pub async fn select_activity(&self, activity: &str) -> bool {
        let view = self.view.read().await;
        if !activity.is_empty() && !view.has_option(activity) {
            return false;
        }
        self.form.lock().await.activity = activity.to_string();
        true
    }

    pub async fn set_email(&self, email: &str) {
        self.form.lock().await.email = email.to_string();
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
