use serde::Serialize;
use shared::domain::{Activity, Roster};
use tracing::debug;

use crate::initials::initials_from_email;

pub const SELECTOR_PLACEHOLDER: &str = "-- Select an activity --";
pub const LOADING_TEXT: &str = "Loading activities...";
pub const LOAD_FAILED_TEXT: &str = "Could not load activities.";
pub const NO_PARTICIPANTS_TEXT: &str = "No participants yet.";
pub const SCHEDULE_FALLBACK: &str = "TBD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    /// Empty for the placeholder entry.
    pub value: String,
    pub label: String,
}

impl SelectorOption {
    fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: SELECTOR_PLACEHOLDER.into(),
        }
    }

    fn for_activity(name: &str) -> Self {
        Self {
            value: name.into(),
            label: name.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

/// Everything needed to issue an unregister request for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnregisterControl {
    pub activity: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantEntry {
    pub avatar: String,
    pub email: String,
    pub mailto: String,
    pub unregister: UnregisterControl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticipantRow {
    Placeholder { text: String },
    Participant(ParticipantEntry),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantsSection {
    pub heading: String,
    pub rows: Vec<ParticipantRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCard {
    pub title: String,
    pub description: String,
    pub schedule: String,
    pub participants: ParticipantsSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RosterList {
    Loading { text: String },
    Failed { text: String },
    Cards { cards: Vec<ActivityCard> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterView {
    pub selector: Vec<SelectorOption>,
    pub list: RosterList,
}

impl RosterView {
    pub fn loading() -> Self {
        Self {
            selector: vec![SelectorOption::placeholder()],
            list: RosterList::Loading {
                text: LOADING_TEXT.into(),
            },
        }
    }

    pub fn failed() -> Self {
        Self {
            selector: vec![SelectorOption::placeholder()],
            list: RosterList::Failed {
                text: LOAD_FAILED_TEXT.into(),
            },
        }
    }

    pub fn cards(&self) -> &[ActivityCard] {
        match &self.list {
            RosterList::Cards { cards } => cards,
            RosterList::Loading { .. } | RosterList::Failed { .. } => &[],
        }
    }

    pub fn has_option(&self, activity: &str) -> bool {
        !activity.is_empty()
            && self
                .selector
                .iter()
                .any(|option| option.value == activity)
    }

    pub fn card(&self, activity: &str) -> Option<&ActivityCard> {
        self.cards().iter().find(|card| card.title == activity)
    }
}

impl Default for RosterView {
    fn default() -> Self {
        Self::loading()
    }
}

/// Builds the selector and the cards from one roster snapshot, in the order
/// the service returned the activities.
pub fn render_roster(roster: &Roster) -> RosterView {
    let mut selector = Vec::with_capacity(roster.len() + 1);
    selector.push(SelectorOption::placeholder());

    let mut cards = Vec::with_capacity(roster.len());
    for activity in roster {
        debug!(
            activity = %activity.name,
            participants = activity.participants().len(),
            "rendering activity"
        );
        selector.push(SelectorOption::for_activity(&activity.name));
        cards.push(render_card(activity));
    }

    RosterView {
        selector,
        list: RosterList::Cards { cards },
    }
}

fn render_card(activity: &Activity) -> ActivityCard {
    let details = &activity.details;
    ActivityCard {
        title: activity.name.clone(),
        description: details.description.clone().unwrap_or_default(),
        schedule: details
            .schedule
            .clone()
            .unwrap_or_else(|| SCHEDULE_FALLBACK.into()),
        participants: render_participants(activity),
    }
}

fn render_participants(activity: &Activity) -> ParticipantsSection {
    let participants = activity.participants();
    let rows = if participants.is_empty() {
        vec![ParticipantRow::Placeholder {
            text: NO_PARTICIPANTS_TEXT.into(),
        }]
    } else {
        participants
            .iter()
            .map(|email| {
                ParticipantRow::Participant(ParticipantEntry {
                    avatar: initials_from_email(email),
                    email: email.clone(),
                    mailto: format!("mailto:{email}"),
                    unregister: UnregisterControl {
                        activity: activity.name.clone(),
                        email: email.clone(),
                    },
                })
            })
            .collect()
    };

    ParticipantsSection {
        heading: format!("Participants ({})", participants.len()),
        rows,
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
