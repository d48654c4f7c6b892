use std::fmt::Write as _;

use chrono::Local;
use roster_core::{
    render::{ParticipantRow, RosterList, RosterView},
    Notice,
};

pub fn draw_view(view: &RosterView) -> String {
    let mut out = String::new();

    match &view.list {
        RosterList::Loading { text } | RosterList::Failed { text } => {
            let _ = writeln!(out, "{text}");
        }
        RosterList::Cards { cards } if cards.is_empty() => {
            let _ = writeln!(out, "(no activities)");
        }
        RosterList::Cards { cards } => {
            for card in cards {
                let _ = writeln!(out, "== {} ==", card.title);
                if !card.description.is_empty() {
                    let _ = writeln!(out, "{}", card.description);
                }
                let _ = writeln!(out, "Schedule: {}", card.schedule);
                let _ = writeln!(out, "{}", card.participants.heading);
                for row in &card.participants.rows {
                    match row {
                        ParticipantRow::Placeholder { text } => {
                            let _ = writeln!(out, "  {text}");
                        }
                        ParticipantRow::Participant(entry) => {
                            let _ = writeln!(
                                out,
                                "  [{}] {} <{}>",
                                entry.avatar, entry.email, entry.mailto
                            );
                        }
                    }
                }
                out.push('\n');
            }
        }
    }

    let offered: Vec<&str> = view
        .selector
        .iter()
        .filter(|option| !option.is_placeholder())
        .map(|option| option.label.as_str())
        .collect();
    if !offered.is_empty() {
        let _ = writeln!(out, "Activities: {}", offered.join(", "));
    }

    out
}

pub fn draw_notice(notice: &Notice) -> String {
    format!(
        "[{}] {}: {}",
        notice.shown_at.with_timezone(&Local).format("%H:%M:%S"),
        notice.severity.as_str(),
        notice.text
    )
}
