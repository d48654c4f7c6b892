use async_trait::async_trait;
use reqwest::StatusCode;
use shared::protocol::MutationKind;
use tracing::{error, info, warn};

use crate::{
    api::MutationReply, error::RosterError, notifier::Severity, RosterSession, SessionEvent,
};

pub const SELECT_ACTIVITY_TEXT: &str = "Please select an activity to sign up.";
pub const ENTER_EMAIL_TEXT: &str = "Please enter a valid email.";

/// Asked before any unregister request goes out.
#[async_trait]
pub trait UnregisterConfirmation: Send + Sync {
    async fn confirm(&self, activity: &str, email: &str) -> bool;
}

/// Confirms every request, for non-interactive callers.
pub struct AutoConfirm;

#[async_trait]
impl UnregisterConfirmation for AutoConfirm {
    async fn confirm(&self, _activity: &str, _email: &str) -> bool {
        true
    }
}

pub fn confirmation_prompt(activity: &str, email: &str) -> String {
    format!("Unregister {email} from {activity}?")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Rejected client-side; nothing was sent.
    Invalid { message: String },
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    Applied { message: String },
    Refused { status: StatusCode, message: String },
    NetworkFailure { message: String },
}

impl MutationOutcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            MutationOutcome::Invalid { message }
            | MutationOutcome::Applied { message }
            | MutationOutcome::Refused { message, .. }
            | MutationOutcome::NetworkFailure { message } => Some(message),
            MutationOutcome::Cancelled => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied { .. })
    }
}

fn success_fallback(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Signup => "Signed up successfully!",
        MutationKind::Unregister => "Participant unregistered",
    }
}

fn failure_fallback(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Signup => "Failed to sign up.",
        MutationKind::Unregister => "Failed to unregister.",
    }
}

fn network_failure_text(kind: MutationKind) -> &'static str {
    match kind {
        MutationKind::Signup => "Network error while signing up.",
        MutationKind::Unregister => "Network error while unregistering.",
    }
}

impl RosterSession {
    /// Signs up with whatever the form currently holds.
    pub async fn submit_signup(&self) -> MutationOutcome {
        let form = self.form().await;
        self.signup(&form.activity, &form.email).await
    }

    pub async fn signup(&self, activity: &str, email: &str) -> MutationOutcome {
        let email = email.trim();
        if activity.is_empty() {
            return self.invalid(SELECT_ACTIVITY_TEXT).await;
        }
        if email.is_empty() {
            return self.invalid(ENTER_EMAIL_TEXT).await;
        }

        self.submit(MutationKind::Signup, activity, email).await
    }

    /// Removes `email` from `activity`. Both come from a rendered
    /// [`crate::render::UnregisterControl`] and are sent as is.
    pub async fn unregister(&self, activity: &str, email: &str) -> MutationOutcome {
        if !self.confirmation.confirm(activity, email).await {
            info!("mutation: unregister of {email} from {activity} declined");
            return MutationOutcome::Cancelled;
        }

        self.submit(MutationKind::Unregister, activity, email).await
    }

    async fn invalid(&self, message: &str) -> MutationOutcome {
        self.notifier.notify(message, Severity::Error).await;
        MutationOutcome::Invalid {
            message: message.to_string(),
        }
    }

    async fn submit(&self, kind: MutationKind, activity: &str, email: &str) -> MutationOutcome {
        let _ = self.events.send(SessionEvent::MutationStarted { kind });

        let outcome = match self.api.mutate(kind, activity, email).await {
            Ok(MutationReply::Accepted { message }) => {
                let message = message.unwrap_or_else(|| success_fallback(kind).to_string());
                info!(
                    "mutation: {} accepted activity={activity} email={email}",
                    kind.path_segment()
                );
                self.notifier.notify(message.clone(), Severity::Success).await;
                if kind == MutationKind::Signup {
                    self.form.lock().await.reset();
                }
                self.refresh().await;
                MutationOutcome::Applied { message }
            }
            Ok(MutationReply::Rejected { status, detail }) => {
                let message = detail.unwrap_or_else(|| failure_fallback(kind).to_string());
                warn!(
                    "mutation: {} rejected status={status} activity={activity} email={email}: {message}",
                    kind.path_segment()
                );
                self.notifier.notify(message.clone(), Severity::Error).await;
                MutationOutcome::Refused { status, message }
            }
            Err(err @ RosterError::ActivityName(_)) => {
                warn!("mutation: {} not sent: {err}", kind.path_segment());
                let message = failure_fallback(kind).to_string();
                self.notifier.notify(message.clone(), Severity::Error).await;
                MutationOutcome::Invalid { message }
            }
            Err(err) => {
                error!("mutation: {} failed: {err}", kind.path_segment());
                let message = network_failure_text(kind).to_string();
                self.notifier.notify(message.clone(), Severity::Error).await;
                MutationOutcome::NetworkFailure { message }
            }
        };

        let _ = self.events.send(SessionEvent::MutationFinished {
            kind,
            applied: outcome.is_applied(),
        });
        outcome
    }
}
